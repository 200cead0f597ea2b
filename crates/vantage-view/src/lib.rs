//! Vantage View - Live visualization of loaded models
//!
//! Everything between a parsed scene graph and the external renderer:
//! derived statistics, canonical framing, the generation-based resource
//! lifecycle, and the visualization mode state machine. The output of a tick
//! is a [`FrameSnapshot`]; putting pixels on screen is someone else's job.

mod error;
mod frame;
mod framing;
mod generation;
mod handles;
mod helpers;
mod lighting;
mod modes;
mod stats;

pub use error::ViewError;
pub use frame::{DrawItem, FrameSnapshot, PointOverlay};
pub use framing::{fit_camera, normalize, world_bounds, CameraFit, FramingConfig, NormalizedModel};
pub use generation::{ResourceGeneration, SceneManager};
pub use handles::{GeometryHandle, HandleRegistry, MaterialHandle, RawHandle, TextureHandle};
pub use helpers::{axis_lines, grid_lines, AxisLine, HelperState};
pub use lighting::SceneLighting;
pub use modes::VisualizationMode;
pub use stats::{analyze, format_file_size, ModelStats};
