//! Visualization mode state machine
//!
//! Four representations of the same generation. Transitions are total (any
//! mode can follow any other) and memoryless: entering a mode builds its
//! ephemeral resources from the current generation alone, never from what
//! was shown before.

use std::fmt;
use std::str::FromStr;

use crate::error::ViewError;

/// How the current generation is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualizationMode {
    /// Shaded surfaces with the loaded materials
    #[default]
    Solid,
    /// Edge-only rendering
    Wireframe,
    /// One point per unique vertex position, over a ghosted surface
    VertexCloud,
    /// Flat translucent faces
    FacesTranslucent,
}

impl VisualizationMode {
    pub const ALL: [VisualizationMode; 4] = [
        VisualizationMode::Solid,
        VisualizationMode::Wireframe,
        VisualizationMode::VertexCloud,
        VisualizationMode::FacesTranslucent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Wireframe => "wireframe",
            Self::VertexCloud => "vertex-cloud",
            Self::FacesTranslucent => "faces-translucent",
        }
    }
}

impl fmt::Display for VisualizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The boundary where external (UI) strings become modes; anything
/// unrecognized fails here, so the state machine itself only ever sees
/// valid states.
impl FromStr for VisualizationMode {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" | "normal" => Ok(Self::Solid),
            "wireframe" => Ok(Self::Wireframe),
            "vertex-cloud" | "vertices" | "points" => Ok(Self::VertexCloud),
            "faces-translucent" | "faces" => Ok(Self::FacesTranslucent),
            _ => Err(ViewError::UnsupportedMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_solid() {
        assert_eq!(VisualizationMode::default(), VisualizationMode::Solid);
    }

    #[test]
    fn known_names_parse() {
        assert_eq!(
            "wireframe".parse::<VisualizationMode>().unwrap(),
            VisualizationMode::Wireframe
        );
        assert_eq!(
            "Vertices".parse::<VisualizationMode>().unwrap(),
            VisualizationMode::VertexCloud
        );
        assert_eq!(
            " faces ".parse::<VisualizationMode>().unwrap(),
            VisualizationMode::FacesTranslucent
        );
    }

    #[test]
    fn round_trips_through_display() {
        for mode in VisualizationMode::ALL {
            assert_eq!(mode.as_str().parse::<VisualizationMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_name_is_unsupported() {
        match "xray".parse::<VisualizationMode>() {
            Err(ViewError::UnsupportedMode(s)) => assert_eq!(s, "xray"),
            other => panic!("expected UnsupportedMode, got {other:?}"),
        }
    }
}
