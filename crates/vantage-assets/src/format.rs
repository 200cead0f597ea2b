use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Model file format, selected by file extension before any bytes are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFormat {
    Obj,
    Stl,
    Gltf,
    Glb,
}

impl ModelFormat {
    /// Determine the format from a file name. Extensions are matched
    /// case-insensitively; anything unrecognized is rejected here, before
    /// parsing.
    pub fn from_file_name(file_name: &str) -> Result<Self, LoadError> {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "obj" => Ok(Self::Obj),
            "stl" => Ok(Self::Stl),
            "gltf" => Ok(Self::Gltf),
            "glb" => Ok(Self::Glb),
            _ => Err(LoadError::UnsupportedFormat(file_name.to_string())),
        }
    }

    /// Display name, matching what the info panel shows
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Obj => "OBJ",
            Self::Stl => "STL",
            Self::Gltf => "GLTF",
            Self::Glb => "GLB",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_extensions() {
        assert_eq!(
            ModelFormat::from_file_name("model.obj").unwrap(),
            ModelFormat::Obj
        );
        assert_eq!(
            ModelFormat::from_file_name("part.stl").unwrap(),
            ModelFormat::Stl
        );
        assert_eq!(
            ModelFormat::from_file_name("scene.gltf").unwrap(),
            ModelFormat::Gltf
        );
        assert_eq!(
            ModelFormat::from_file_name("scene.glb").unwrap(),
            ModelFormat::Glb
        );
    }

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(
            ModelFormat::from_file_name("MODEL.OBJ").unwrap(),
            ModelFormat::Obj
        );
        assert_eq!(
            ModelFormat::from_file_name("Part.Stl").unwrap(),
            ModelFormat::Stl
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        for name in ["model.fbx", "model", "model.obj.bak", ".obj.zip"] {
            match ModelFormat::from_file_name(name) {
                Err(LoadError::UnsupportedFormat(_)) => {}
                other => panic!("expected UnsupportedFormat for {name}, got {other:?}"),
            }
        }
    }
}
