//! Geometry providers for entity kinds.

use crate::error::{Error, Result};
use crate::geometry::GeometryTemplate;
use crate::types::EntityKind;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Source of geometry templates, handed to the world at construction time
pub trait AssetProvider {
    fn template(&self, kind: EntityKind) -> Result<Arc<GeometryTemplate>>;
}

/// In-memory template registry.
///
/// Kinds without a registered template share one built-in unit cube, unless the kind
/// needs an external asset, in which case the lookup fails.
#[derive(Debug, Clone)]
pub struct ModelLibrary {
    templates: HashMap<EntityKind, Arc<GeometryTemplate>>,
    fallback: Arc<GeometryTemplate>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            fallback: Arc::new(GeometryTemplate::unit_cube()),
        }
    }

    pub fn with_template(mut self, kind: EntityKind, template: GeometryTemplate) -> Self {
        self.register(kind, template);
        self
    }

    pub fn register(&mut self, kind: EntityKind, template: GeometryTemplate) {
        debug!(
            %kind,
            vertices = template.vertices.len(),
            triangles = template.triangles.len(),
            "Registered model template"
        );
        self.templates.insert(kind, Arc::new(template));
    }

    pub fn contains(&self, kind: EntityKind) -> bool {
        self.templates.contains_key(&kind)
    }
}

impl Default for ModelLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetProvider for ModelLibrary {
    fn template(&self, kind: EntityKind) -> Result<Arc<GeometryTemplate>> {
        if let Some(template) = self.templates.get(&kind) {
            return Ok(template.clone());
        }

        if kind.requires_asset() {
            return Err(Error::MissingAsset(kind));
        }

        Ok(self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TemplateSource;

    #[test]
    fn test_fallback_is_shared_cube() {
        let library = ModelLibrary::new();
        let terrain = library.template(EntityKind::Terrain).unwrap();
        let magic = library.template(EntityKind::MagicTerrain).unwrap();

        assert_eq!(terrain.source, TemplateSource::BuiltinCube);
        assert!(Arc::ptr_eq(&terrain, &magic));
    }

    #[test]
    fn test_missing_required_asset() {
        let library = ModelLibrary::new();
        let err = library.template(EntityKind::Rabbit).unwrap_err();
        assert!(matches!(err, Error::MissingAsset(EntityKind::Rabbit)));
    }

    #[test]
    fn test_registered_template() {
        let rabbit = GeometryTemplate::external(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
            Some(vec![[255, 255, 255, 255]; 3]),
        );
        let library = ModelLibrary::new().with_template(EntityKind::Rabbit, rabbit.clone());

        assert!(library.contains(EntityKind::Rabbit));
        assert_eq!(*library.template(EntityKind::Rabbit).unwrap(), rabbit);
    }
}
