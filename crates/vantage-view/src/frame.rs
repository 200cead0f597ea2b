//! Per-tick render output
//!
//! A frame snapshot is the complete description of what to draw: resolved
//! draw items with world transforms and mode-adjusted materials, the
//! optional point overlay, camera placement, lighting, and helper toggles.
//! The external renderer consumes it; nothing here touches a GPU.

use glam::Mat4;
use vantage_assets::NodeId;

use crate::framing::CameraFit;
use crate::handles::{GeometryHandle, MaterialHandle};
use crate::helpers::HelperState;
use crate::lighting::SceneLighting;
use crate::modes::VisualizationMode;

/// One mesh to draw: geometry plus the material the current mode selected.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem {
    pub node: NodeId,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub world: Mat4,
}

/// The vertex-cloud point set drawn on top of the ghosted surface.
#[derive(Debug, Clone, Copy)]
pub struct PointOverlay {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub point_count: usize,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Id of the installed generation, if any model is loaded
    pub generation: Option<u64>,
    pub mode: VisualizationMode,
    pub items: Vec<DrawItem>,
    pub overlay: Option<PointOverlay>,
    /// Fitted camera; `None` means "leave the camera where it is"
    pub camera: Option<CameraFit>,
    pub lighting: SceneLighting,
    pub helpers: HelperState,
}
