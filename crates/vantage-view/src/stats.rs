//! Derived model statistics
//!
//! A single traversal over the scene graph produces the read-only summary
//! the info panel displays. Several figures are deliberate approximations
//! and stay that way: edge count assumes a closed manifold, and volume /
//! surface area are those of the bounding box, not of the enclosed mesh.

use glam::Vec3;
use serde::Serialize;
use vantage_core::Aabb;

use vantage_assets::{LoadedModel, ModelFormat};

/// Read-only geometric summary of a loaded model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStats {
    pub format: ModelFormat,
    pub file_name: String,
    pub file_size: u64,
    pub vertices: usize,
    pub faces: usize,
    /// Manifold approximation `round(3 * triangles / 2)`; inexact for open
    /// or non-manifold meshes.
    pub edges: usize,
    pub triangles: usize,
    pub material_count: usize,
    /// World-space extents before normalization
    pub extents: Vec3,
    /// Bounding-box volume, not exact enclosed volume
    pub volume: f32,
    /// Bounding-box surface area
    pub surface_area: f32,
}

/// Derive statistics from a loaded model in one traversal.
///
/// Vertex positions are reduced in world space (ancestor transforms
/// applied), and the caller is expected to run this before any
/// normalization is baked into the graph.
pub fn analyze(model: &LoadedModel) -> ModelStats {
    let graph = &model.graph;

    let mut vertices = 0usize;
    let mut triangles = 0usize;
    let mut materials = std::collections::BTreeSet::new();
    let mut bounds = Aabb::EMPTY;

    graph.visit_meshes(|_, mesh_id, material_id, world| {
        let mesh = graph.mesh(mesh_id);
        vertices += mesh.vertex_count();
        triangles += mesh.triangle_count();
        materials.insert(material_id);

        for p in mesh.positions() {
            bounds.grow(world.transform_point3(Vec3::from(*p)));
        }
    });

    let faces = triangles;
    let edges = (3.0 * triangles as f64 / 2.0).round() as usize;
    let extents = if bounds.is_empty() {
        Vec3::ZERO
    } else {
        bounds.size()
    };

    ModelStats {
        format: model.source.format,
        file_name: model.source.file_name.clone(),
        file_size: model.source.file_size,
        vertices,
        faces,
        edges,
        triangles,
        material_count: materials.len(),
        extents,
        volume: bounds.volume(),
        surface_area: bounds.surface_area(),
    }
}

/// Human-readable byte size for the info panel ("2.5 MB" style).
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_assets::{load, ProgressSink};

    /// Indexed unit cube: 8 shared vertices, 12 triangles, one material.
    fn cube_model() -> LoadedModel {
        let obj = "\
v -0.5 -0.5 -0.5
v  0.5 -0.5 -0.5
v  0.5  0.5 -0.5
v -0.5  0.5 -0.5
v -0.5 -0.5  0.5
v  0.5 -0.5  0.5
v  0.5  0.5  0.5
v -0.5  0.5  0.5
usemtl gray
f 1 2 3 4
f 6 5 8 7
f 5 1 4 8
f 2 6 7 3
f 4 3 7 8
f 5 6 2 1
";
        load(obj.as_bytes(), "cube.obj", &ProgressSink::disabled()).unwrap()
    }

    #[test]
    fn cube_counts_match_the_manifold_formulas() {
        let stats = analyze(&cube_model());
        assert_eq!(stats.vertices, 8);
        assert_eq!(stats.triangles, 12);
        assert_eq!(stats.faces, 12);
        // round(3 * 12 / 2)
        assert_eq!(stats.edges, 18);
        assert_eq!(stats.material_count, 1);
    }

    #[test]
    fn cube_box_figures_are_box_approximations() {
        let stats = analyze(&cube_model());
        assert!((stats.extents - Vec3::ONE).length() < 1e-6);
        assert!((stats.volume - 1.0).abs() < 1e-6);
        assert!((stats.surface_area - 6.0).abs() < 1e-6);
    }

    #[test]
    fn source_metadata_flows_through() {
        let stats = analyze(&cube_model());
        assert_eq!(stats.format, ModelFormat::Obj);
        assert_eq!(stats.file_name, "cube.obj");
        assert!(stats.file_size > 0);
    }

    #[test]
    fn odd_triangle_counts_round_the_edge_estimate() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let model = load(obj.as_bytes(), "tri.obj", &ProgressSink::disabled()).unwrap();
        let stats = analyze(&model);
        // round(3 * 1 / 2) = 2
        assert_eq!(stats.edges, 2);
    }

    #[test]
    fn stl_vertex_counts_match_the_file() {
        let stl = "\
solid plate
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 1 0 0
      vertex 1 1 0
      vertex 0 1 0
    endloop
  endfacet
endsolid plate
";
        let model = load(stl.as_bytes(), "plate.stl", &ProgressSink::disabled()).unwrap();
        let stats = analyze(&model);
        // STL is a triangle soup: three vertices per facet
        assert_eq!(stats.vertices, 6);
        assert_eq!(stats.triangles, 2);
        assert_eq!(stats.format, ModelFormat::Stl);
    }

    #[test]
    fn file_sizes_format_like_the_panel() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2 * 1024 * 1024 + 512 * 1024), "2.5 MB");
    }
}
