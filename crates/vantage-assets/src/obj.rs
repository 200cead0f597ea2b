//! Wavefront OBJ parsing
//!
//! Streaming line parser for the common constructs (v, vt, vn, f, o, g,
//! usemtl). Polygon faces are fan-triangulated. Each run of faces under one
//! (object, material) pair becomes its own mesh node, in file order, so
//! multi-material objects come out as one node per material element.
//!
//! Parsing is strict: a malformed line fails the whole load rather than
//! producing a partial graph.

use std::collections::HashMap;

use tracing::debug;

use crate::error::LoadError;
use crate::material::Material;
use crate::mesh::MeshAsset;
use crate::progress::ProgressSink;
use crate::scene::SceneGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey {
    vi: i32,
    vti: i32,
    vni: i32,
}

/// One (object, material) run of faces with its own deduplicated vertex
/// stream.
struct Segment {
    object: String,
    material: String,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    all_normals: bool,
    indices: Vec<u32>,
    remap: HashMap<VertexKey, u32>,
}

impl Segment {
    fn new(object: &str, material: &str) -> Self {
        Self {
            object: object.to_string(),
            material: material.to_string(),
            positions: Vec::new(),
            normals: Vec::new(),
            all_normals: true,
            indices: Vec::new(),
            remap: HashMap::new(),
        }
    }
}

pub fn parse(bytes: &[u8], progress: &ProgressSink) -> Result<SceneGraph, LoadError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| LoadError::malformed("OBJ data is not valid UTF-8"))?;

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();

    let mut segments: Vec<Segment> = Vec::new();
    let mut current: Option<usize> = None;
    let mut object = String::from("mesh");
    let mut material = String::from("default");

    let total = bytes.len().max(1);
    let mut consumed = 0usize;
    let mut last_decile = 0u8;

    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        consumed += line.len() + 1;
        let decile = (consumed * 10 / total).min(10) as u8;
        if decile > last_decile {
            last_decile = decile;
            progress.report(decile * 10);
        }

        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let mut it = s.split_whitespace();
        let tag = it.next().unwrap_or("");
        match tag {
            "v" => positions.push(parse_vec3(&mut it, line_no, "v")?),
            "vt" => tex_coords.push(parse_vec2(&mut it, line_no)?),
            "vn" => normals.push(parse_vec3(&mut it, line_no, "vn")?),
            "o" | "g" => {
                object = it.next().unwrap_or("mesh").to_string();
                current = None;
            }
            "usemtl" => {
                material = it.next().unwrap_or("default").to_string();
                current = None;
            }
            "f" => {
                let keys = it
                    .map(|tok| parse_face_vertex(tok, line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                if keys.len() < 3 {
                    return Err(LoadError::malformed(format!(
                        "line {line_no}: face has fewer than 3 vertices"
                    )));
                }

                let seg_idx = match current {
                    Some(i) => i,
                    None => {
                        segments.push(Segment::new(&object, &material));
                        let i = segments.len() - 1;
                        current = Some(i);
                        i
                    }
                };
                let seg = &mut segments[seg_idx];

                // Fan triangulation
                for t in 1..keys.len() - 1 {
                    for key in [keys[0], keys[t], keys[t + 1]] {
                        let index = emit_vertex(
                            seg,
                            key,
                            &positions,
                            &tex_coords,
                            &normals,
                            line_no,
                        )?;
                        seg.indices.push(index);
                    }
                }
            }
            // mtllib is unreachable from a bytes-only input; material names
            // from usemtl still partition the mesh.
            _ => {}
        }
    }

    let mut graph = SceneGraph::new();
    let root = graph.root();
    for seg in segments {
        let normals = (seg.all_normals && !seg.normals.is_empty()).then_some(seg.normals);
        let mesh = MeshAsset::new(seg.object, seg.positions, normals, Some(seg.indices));
        let material = Material::new(seg.material);
        graph.add_mesh(root, mesh, material);
    }

    debug!(
        "OBJ: {} meshes, {} vertices",
        graph.mesh_count(),
        graph.vertex_count()
    );
    Ok(graph)
}

fn emit_vertex(
    seg: &mut Segment,
    key: VertexKey,
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    normals: &[[f32; 3]],
    line_no: usize,
) -> Result<u32, LoadError> {
    if let Some(&index) = seg.remap.get(&key) {
        return Ok(index);
    }

    let vi = resolve_index(key.vi, positions.len(), line_no, "position")?;
    seg.positions.push(positions[vi]);

    if key.vti != 0 {
        // Texture coordinates are validated but not retained; the render
        // stack consumes positions, normals, and indices only.
        resolve_index(key.vti, tex_coords.len(), line_no, "texcoord")?;
    }

    if key.vni != 0 {
        let vni = resolve_index(key.vni, normals.len(), line_no, "normal")?;
        seg.normals.push(normals[vni]);
    } else {
        seg.all_normals = false;
    }

    let index = seg.positions.len() as u32 - 1;
    seg.remap.insert(key, index);
    Ok(index)
}

fn resolve_index(
    idx: i32,
    len: usize,
    line_no: usize,
    what: &str,
) -> Result<usize, LoadError> {
    let resolved = if idx > 0 {
        (idx - 1) as i64
    } else {
        len as i64 + idx as i64
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(LoadError::malformed(format!(
            "line {line_no}: {what} index {idx} out of bounds (1..={len})"
        )));
    }
    Ok(resolved as usize)
}

fn parse_face_vertex(tok: &str, line_no: usize) -> Result<VertexKey, LoadError> {
    let mut parts = tok.split('/');
    let vi = parse_face_index(parts.next(), line_no, tok)?;
    let vti = parse_face_index(parts.next(), line_no, tok)?;
    let vni = parse_face_index(parts.next(), line_no, tok)?;
    if vi == 0 {
        return Err(LoadError::malformed(format!(
            "line {line_no}: face vertex '{tok}' is missing its position index"
        )));
    }
    Ok(VertexKey { vi, vti, vni })
}

fn parse_face_index(part: Option<&str>, line_no: usize, tok: &str) -> Result<i32, LoadError> {
    match part {
        None | Some("") => Ok(0),
        Some(s) => s.parse::<i32>().map_err(|_| {
            LoadError::malformed(format!("line {line_no}: bad face vertex '{tok}'"))
        }),
    }
}

fn parse_vec3(
    it: &mut std::str::SplitWhitespace<'_>,
    line_no: usize,
    tag: &str,
) -> Result<[f32; 3], LoadError> {
    let x = parse_float(it.next(), line_no, tag)?;
    let y = parse_float(it.next(), line_no, tag)?;
    let z = parse_float(it.next(), line_no, tag)?;
    Ok([x, y, z])
}

fn parse_vec2(
    it: &mut std::str::SplitWhitespace<'_>,
    line_no: usize,
) -> Result<[f32; 2], LoadError> {
    let u = parse_float(it.next(), line_no, "vt")?;
    let v = parse_float(it.next(), line_no, "vt")?;
    Ok([u, v])
}

fn parse_float(part: Option<&str>, line_no: usize, tag: &str) -> Result<f32, LoadError> {
    part.ok_or_else(|| {
        LoadError::malformed(format!("line {line_no}: truncated '{tag}' directive"))
    })?
    .parse::<f32>()
    .map_err(|_| LoadError::malformed(format!("line {line_no}: bad number in '{tag}' directive")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNode;

    const CUBE: &str = "\
# unit cube, quads
v -0.5 -0.5 -0.5
v  0.5 -0.5 -0.5
v  0.5  0.5 -0.5
v -0.5  0.5 -0.5
v -0.5 -0.5  0.5
v  0.5 -0.5  0.5
v  0.5  0.5  0.5
v -0.5  0.5  0.5
f 1 2 3 4
f 6 5 8 7
f 5 1 4 8
f 2 6 7 3
f 4 3 7 8
f 5 6 2 1
";

    #[test]
    fn cube_dedupes_to_eight_vertices() {
        let graph = parse(CUBE.as_bytes(), &ProgressSink::disabled()).unwrap();
        assert_eq!(graph.mesh_count(), 1);
        let mut counts = (0, 0);
        graph.visit_meshes(|_, mesh, _, _| {
            let m = graph.mesh(mesh);
            counts = (m.vertex_count(), m.triangle_count());
        });
        // 6 quads fan into 12 triangles over 8 shared positions
        assert_eq!(counts, (8, 12));
    }

    #[test]
    fn objects_become_nodes_in_file_order() {
        let src = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o second
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";
        let graph = parse(src.as_bytes(), &ProgressSink::disabled()).unwrap();
        let mut names = Vec::new();
        graph.visit_meshes(|_, mesh, _, _| names.push(graph.mesh(mesh).name().to_string()));
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn usemtl_splits_material_elements() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
usemtl red
f 1 2 3
usemtl blue
f 2 4 3
";
        let graph = parse(src.as_bytes(), &ProgressSink::disabled()).unwrap();
        assert_eq!(graph.mesh_count(), 2);
        assert_eq!(graph.material_count(), 2);
        let names: Vec<_> = graph.materials().map(|(_, m)| m.name.clone()).collect();
        assert_eq!(names, vec!["red", "blue"]);
    }

    #[test]
    fn negative_indices_resolve_from_the_end() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let graph = parse(src.as_bytes(), &ProgressSink::disabled()).unwrap();
        graph.visit_meshes(|_, mesh, _, _| {
            assert_eq!(graph.mesh(mesh).positions()[1], [1.0, 0.0, 0.0]);
        });
    }

    #[test]
    fn authored_normals_survive() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
";
        let graph = parse(src.as_bytes(), &ProgressSink::disabled()).unwrap();
        graph.visit_meshes(|_, mesh, _, _| {
            let m = graph.mesh(mesh);
            assert!(m.has_authored_normals());
            assert_eq!(m.normals(), &[[0.0, 0.0, 1.0]; 3]);
        });
    }

    #[test]
    fn truncated_face_line_is_malformed() {
        let src = "v 0 0 0\nv 1 0 0\nf 1 2\n";
        let result = parse(src.as_bytes(), &ProgressSink::disabled());
        assert!(matches!(result, Err(LoadError::MalformedData(_))));
    }

    #[test]
    fn truncated_vertex_line_is_malformed() {
        let src = "v 0 0\n";
        let result = parse(src.as_bytes(), &ProgressSink::disabled());
        assert!(matches!(result, Err(LoadError::MalformedData(_))));
    }

    #[test]
    fn out_of_bounds_index_is_malformed() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        let result = parse(src.as_bytes(), &ProgressSink::disabled());
        assert!(matches!(result, Err(LoadError::MalformedData(_))));
    }

    #[test]
    fn nodes_hang_off_a_group_root() {
        let graph = parse(CUBE.as_bytes(), &ProgressSink::disabled()).unwrap();
        match graph.node(graph.root()) {
            SceneNode::Group { children, .. } => assert_eq!(children.len(), 1),
            SceneNode::Mesh { .. } => panic!("root must be a group"),
        }
    }
}
