//! Vantage Assets - Model ingestion
//!
//! Parses raw OBJ, STL, and glTF/GLB bytes into a normalized scene graph of
//! immutable mesh assets, with an optional progress stream during load.

mod error;
mod format;
mod gltf_loader;
mod loader;
mod material;
mod mesh;
mod obj;
mod progress;
mod scene;
mod stl;
mod texture;

pub use error::LoadError;
pub use format::ModelFormat;
pub use loader::{load, LoadedModel, SourceInfo};
pub use material::{Material, TextureSlot};
pub use mesh::MeshAsset;
pub use progress::{LoadProgress, ProgressSink};
pub use scene::{MaterialId, MeshId, NodeId, SceneGraph, SceneNode};
pub use texture::{TextureAsset, TextureFormat};
