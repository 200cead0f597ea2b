use serde::Serialize;
use tracing::debug;

use crate::error::LoadError;
use crate::format::ModelFormat;
use crate::progress::ProgressSink;
use crate::scene::SceneGraph;
use crate::{gltf_loader, obj, stl};

/// Where a loaded model came from, carried alongside the graph for the
/// statistics panel.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub format: ModelFormat,
    pub file_name: String,
    pub file_size: u64,
}

/// A fully parsed model: the scene graph plus its source metadata.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub graph: SceneGraph,
    pub source: SourceInfo,
}

/// Parse raw model bytes into a scene graph.
///
/// The format is chosen by the file name's extension (case-insensitive);
/// unrecognized extensions are rejected before any parsing. Parsing is
/// all-or-nothing: truncated or malformed input fails wholesale and never
/// yields a partial graph. A parse that succeeds with zero vertices is
/// reported as [`LoadError::EmptyModel`].
pub fn load(
    bytes: &[u8],
    file_name: &str,
    progress: &ProgressSink,
) -> Result<LoadedModel, LoadError> {
    let format = ModelFormat::from_file_name(file_name)?;
    progress.report(0);

    let graph = match format {
        ModelFormat::Obj => obj::parse(bytes, progress)?,
        ModelFormat::Stl => stl::parse(bytes, progress)?,
        ModelFormat::Gltf | ModelFormat::Glb => gltf_loader::parse(bytes, progress)?,
    };

    if graph.vertex_count() == 0 {
        return Err(LoadError::EmptyModel);
    }

    progress.report(100);
    debug!(
        "loaded {} '{}': {} meshes, {} vertices",
        format,
        file_name,
        graph.mesh_count(),
        graph.vertex_count()
    );

    Ok(LoadedModel {
        graph,
        source: SourceInfo {
            format,
            file_name: file_name.to_string(),
            file_size: bytes.len() as u64,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_fails_before_parsing() {
        let result = load(b"garbage", "model.ply", &ProgressSink::disabled());
        assert!(matches!(result, Err(LoadError::UnsupportedFormat(_))));
    }

    #[test]
    fn zero_vertex_model_is_empty() {
        // Valid OBJ syntax, but nothing drawable in it
        let result = load(b"# just a comment\n", "empty.obj", &ProgressSink::disabled());
        assert!(matches!(result, Err(LoadError::EmptyModel)));
    }

    #[test]
    fn source_metadata_is_recorded() {
        let obj = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let model = load(obj, "tri.obj", &ProgressSink::disabled()).unwrap();
        assert_eq!(model.source.format, ModelFormat::Obj);
        assert_eq!(model.source.file_name, "tri.obj");
        assert_eq!(model.source.file_size, obj.len() as u64);
    }

    #[test]
    fn progress_starts_at_zero_and_ends_at_hundred() {
        let (sink, mut rx) = ProgressSink::channel();
        let obj = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        load(obj, "tri.obj", &sink).unwrap();

        let mut seen = Vec::new();
        while let Ok(p) = rx.try_recv() {
            seen.push(p.percent);
        }
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
    }
}
