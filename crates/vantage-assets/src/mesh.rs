use std::sync::OnceLock;

use glam::Vec3;

/// An immutable vertex/index buffer set produced by a loader.
///
/// The buffers never change after creation. The single exception is the
/// lazily computed normal set: when a file carries no normals, the first
/// caller of [`MeshAsset::normals`] fills them in exactly once, and every
/// later call returns the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MeshAsset {
    name: String,
    positions: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    indices: Option<Vec<u32>>,
    computed_normals: OnceLock<Vec<[f32; 3]>>,
}

impl MeshAsset {
    pub fn new(
        name: impl Into<String>,
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        indices: Option<Vec<u32>>,
    ) -> Self {
        Self {
            name: name.into(),
            positions,
            normals,
            indices,
            computed_normals: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Triangle count under the triangle-list convention: indexCount/3 when
    /// an index buffer exists, positionCount/3 otherwise.
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Whether the source file carried normals of its own
    pub fn has_authored_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Per-vertex normals: the authored set when present, otherwise computed
    /// from the triangles on first use and cached for every later call.
    pub fn normals(&self) -> &[[f32; 3]] {
        if let Some(normals) = &self.normals {
            return normals;
        }
        self.computed_normals
            .get_or_init(|| compute_vertex_normals(&self.positions, self.indices.as_deref()))
    }
}

/// Area-weighted vertex normals from the triangle list. Unindexed meshes get
/// flat per-face normals; indexed meshes accumulate across shared vertices.
fn compute_vertex_normals(positions: &[[f32; 3]], indices: Option<&[u32]>) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];

    let mut add_face = |ia: usize, ib: usize, ic: usize| {
        let a = Vec3::from(positions[ia]);
        let b = Vec3::from(positions[ib]);
        let c = Vec3::from(positions[ic]);
        // Unnormalized cross product: magnitude weights by triangle area
        let n = (b - a).cross(c - a);
        acc[ia] += n;
        acc[ib] += n;
        acc[ic] += n;
    };

    match indices {
        Some(indices) => {
            for tri in indices.chunks_exact(3) {
                add_face(tri[0] as usize, tri[1] as usize, tri[2] as usize);
            }
        }
        None => {
            for i in (0..positions.len() / 3 * 3).step_by(3) {
                add_face(i, i + 1, i + 2);
            }
        }
    }

    acc.into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_positions() -> Vec<[f32; 3]> {
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]
    }

    #[test]
    fn triangle_count_prefers_index_buffer() {
        let indexed = MeshAsset::new(
            "quad",
            quad_positions(),
            None,
            Some(vec![0, 1, 2, 0, 2, 3]),
        );
        assert_eq!(indexed.triangle_count(), 2);

        let unindexed = MeshAsset::new("soup", vec![[0.0; 3]; 9], None, None);
        assert_eq!(unindexed.triangle_count(), 3);
    }

    #[test]
    fn authored_normals_are_returned_untouched() {
        let normals = vec![[0.0, 0.0, 1.0]; 4];
        let mesh = MeshAsset::new(
            "quad",
            quad_positions(),
            Some(normals.clone()),
            Some(vec![0, 1, 2, 0, 2, 3]),
        );
        assert!(mesh.has_authored_normals());
        assert_eq!(mesh.normals(), normals.as_slice());
    }

    #[test]
    fn missing_normals_are_computed_once() {
        let mesh = MeshAsset::new("quad", quad_positions(), None, Some(vec![0, 1, 2, 0, 2, 3]));
        assert!(!mesh.has_authored_normals());

        let first = mesh.normals();
        // Planar quad facing +Z
        for n in first {
            assert!((Vec3::from(*n) - Vec3::Z).length() < 1e-6);
        }

        // Second call must hand back the same cached buffer, not a recompute
        let second = mesh.normals();
        assert!(std::ptr::eq(first.as_ptr(), second.as_ptr()));
    }
}
