//! Scene-wide lighting parameters

use glam::Vec3;
use vantage_core::Color;

/// Lighting rig handed to the external renderer with every frame.
///
/// The defaults reproduce the viewer's classic studio setup: soft white
/// ambient, a warm key light from the upper front, and a dimmer fill from
/// behind so silhouettes stay readable.
#[derive(Debug, Clone, Copy)]
pub struct SceneLighting {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    /// Key light direction (normalized, pointing from the light)
    pub key_direction: Vec3,
    pub key_intensity: f32,
    pub key_color: Color,
    /// Fill light direction
    pub fill_direction: Vec3,
    pub fill_intensity: f32,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            ambient_color: Color::WHITE,
            ambient_intensity: 0.8,
            key_direction: Vec3::new(2.0, 4.0, 5.0).normalize(),
            key_intensity: 0.8,
            key_color: Color::WHITE,
            fill_direction: Vec3::new(-2.0, -1.0, -3.0).normalize(),
            fill_intensity: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directions_are_normalized() {
        let lighting = SceneLighting::default();
        assert!((lighting.key_direction.length() - 1.0).abs() < 1e-6);
        assert!((lighting.fill_direction.length() - 1.0).abs() < 1e-6);
    }
}
