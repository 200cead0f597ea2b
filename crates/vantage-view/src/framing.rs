//! Canonical framing: normalization and camera fitting
//!
//! Every successfully loaded model is scaled and centered into a fixed-size
//! viewing box so the camera maths never depends on source units. Degenerate
//! bounds (empty or zero-extent) are a condition, not an error: the model
//! still installs, the transform stays identity, and the camera is left
//! where it was.

use glam::Vec3;
use tracing::debug;
use vantage_core::{Aabb, Transform};

use vantage_assets::SceneGraph;

/// Fixed framing parameters, normally sourced from settings.
#[derive(Debug, Clone, Copy)]
pub struct FramingConfig {
    /// Edge length of the canonical viewing box models are scaled into
    pub canonical_size: f32,
    /// Vertical field of view, radians
    pub fov_y: f32,
    /// Padding factor applied to the fitted camera distance
    pub padding: f32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            canonical_size: 2.0,
            fov_y: 75.0_f32.to_radians(),
            padding: 1.5,
        }
    }
}

/// Result of normalizing a model into the canonical box.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedModel {
    /// The transform baked into the graph root
    pub transform: Transform,
    /// Bounding box after normalization (centered on the origin)
    pub bounding_box: Aabb,
    /// Set when the pre-normalization bounds had nothing to scale against
    pub degenerate: bool,
}

/// Camera placement framing the canonical box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFit {
    pub position: Vec3,
    pub target: Vec3,
}

/// Direction the fitted camera looks along (from target toward camera).
const VIEW_DIRECTION: Vec3 = Vec3::Z;

/// World-space bounding box over every vertex reachable from the root.
pub fn world_bounds(graph: &SceneGraph) -> Aabb {
    let mut bounds = Aabb::EMPTY;
    graph.visit_meshes(|_, mesh_id, _, world| {
        for p in graph.mesh(mesh_id).positions() {
            bounds.grow(world.transform_point3(Vec3::from(*p)));
        }
    });
    bounds
}

/// Scale and center the model into the canonical box, baking the result
/// into the root transform. Degenerate bounds leave the graph untouched and
/// flag the condition instead of failing.
pub fn normalize(graph: &mut SceneGraph, canonical_size: f32) -> NormalizedModel {
    let bounds = world_bounds(graph);

    if bounds.is_degenerate() {
        debug!("normalize: degenerate bounds, leaving transform at identity");
        return NormalizedModel {
            transform: Transform::IDENTITY,
            bounding_box: bounds,
            degenerate: true,
        };
    }

    let scale = canonical_size / bounds.max_extent();
    let center = bounds.center();
    let transform = Transform::from_uniform_scale(scale, -center * scale);
    graph.set_root_transform(transform);

    // The box transforms the same way the vertices do
    let normalized_box = Aabb::new(
        (bounds.min - center) * scale,
        (bounds.max - center) * scale,
    );

    NormalizedModel {
        transform,
        bounding_box: normalized_box,
        degenerate: false,
    }
}

/// Place the camera so the whole box fits in view.
///
/// Returns `None` on degenerate bounds, in which case the caller keeps its
/// current camera rather than repositioning.
pub fn fit_camera(bounds: &Aabb, fov_y: f32, padding: f32) -> Option<CameraFit> {
    if bounds.is_degenerate() {
        return None;
    }

    let target = bounds.center();
    let distance = bounds.max_extent() / (2.0 * (fov_y / 2.0).tan()) * padding;
    Some(CameraFit {
        position: target + VIEW_DIRECTION * distance,
        target,
    })
}
