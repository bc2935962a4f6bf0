//! Intensity color scale for terrain faces.
//!
//! Intensities run from 0 to [`MAX_INTENSITY`]; each index maps to one stop. Colors
//! come in dark/light pairs so neighboring faces of one cube stay distinguishable.

use cellvox_core::Rgba;

pub const MAX_INTENSITY: u8 = 20;

const STOPS: [[u8; 3]; MAX_INTENSITY as usize + 1] = [
    [0, 0, 0],
    [100, 0, 0],
    [255, 0, 0],
    [100, 70, 0],
    [255, 165, 0],
    [100, 100, 0],
    [255, 255, 0],
    [0, 100, 0],
    [0, 200, 0],
    [0, 100, 100],
    [0, 255, 255],
    [0, 0, 100],
    [0, 0, 255],
    [50, 0, 50],
    [128, 0, 128],
    [100, 0, 100],
    [255, 0, 255],
    [200, 200, 200],
    [255, 255, 255],
    [50, 50, 50],
    [128, 128, 128],
];

/// RGB of an intensity index. Values above the scale clamp to the last stop.
pub fn intensity_rgb(intensity: u8) -> [u8; 3] {
    STOPS[intensity.min(MAX_INTENSITY) as usize]
}

pub fn intensity_rgba(intensity: u8) -> Rgba {
    let [r, g, b] = intensity_rgb(intensity);
    [r, g, b, 255]
}

/// Position of an intensity on a normalized `[0, 1]` color scale
pub fn normalized(intensity: u8) -> f32 {
    intensity.min(MAX_INTENSITY) as f32 / MAX_INTENSITY as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_stops() {
        assert_eq!(intensity_rgb(0), [0, 0, 0]);
        // Terrain sides and the live game-of-life color
        assert_eq!(intensity_rgb(7), [0, 100, 0]);
        assert_eq!(intensity_rgb(8), [0, 200, 0]);
        assert_eq!(intensity_rgb(18), [255, 255, 255]);
        assert_eq!(intensity_rgb(20), [128, 128, 128]);
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(intensity_rgb(200), intensity_rgb(MAX_INTENSITY));
        assert_eq!(normalized(40), 1.0);
        assert_eq!(intensity_rgba(2), [255, 0, 0, 255]);
    }

    #[test]
    fn test_normalized_scale() {
        assert_eq!(normalized(0), 0.0);
        assert!((normalized(4) - 0.2).abs() < f32::EPSILON);
    }
}
