//! Frame consumers.

use crate::mesh::Frame;
use cellvox_core::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Anything that draws, stores or forwards frames
pub trait FrameSink {
    fn consume(&mut self, frame: Frame) -> Result<()>;
}

/// Keeps every frame in order, forming the animation timeline
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next recorded frame must carry
    pub fn next_index(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.frames)?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, &self.frames)?;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;

        info!(frames = self.frames.len(), path = %path.display(), "Frames exported");
        Ok(())
    }
}

impl FrameSink for FrameRecorder {
    fn consume(&mut self, frame: Frame) -> Result<()> {
        if frame.index != self.next_index() {
            return Err(Error::InvalidState(format!(
                "expected frame {}, got frame {}",
                self.next_index(),
                frame.index
            )));
        }
        self.frames.push(frame);
        Ok(())
    }
}
