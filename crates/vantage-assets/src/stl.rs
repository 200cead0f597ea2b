//! STL parsing, binary and ASCII
//!
//! The two encodings are auto-detected: data opening with `solid` is tried
//! as ASCII first and falls back to binary (some binary exporters write a
//! `solid` header anyway). Either way the result is exactly one mesh node.
//! Facets with a zero normal get a computed face normal, so downstream
//! shading never sees a null vector.

use glam::Vec3;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending, space1},
    combinator::opt,
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use tracing::debug;

use crate::error::LoadError;
use crate::material::Material;
use crate::mesh::MeshAsset;
use crate::progress::ProgressSink;
use crate::scene::SceneGraph;

/// One parsed facet: normal plus three corners.
#[derive(Debug, Clone, Copy)]
struct Facet {
    normal: [f32; 3],
    vertices: [[f32; 3]; 3],
}

pub fn parse(bytes: &[u8], progress: &ProgressSink) -> Result<SceneGraph, LoadError> {
    // "solid" openers are tried as ASCII first; real binary files whose
    // header happens to start with the word fall through below.
    if bytes.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(bytes) {
            match parse_ascii(text) {
                Ok((name, facets)) => return build_graph(name, facets, progress),
                Err(ascii_err) => {
                    if bytes.len() < 84 {
                        return Err(ascii_err);
                    }
                }
            }
        }
    }

    let facets = parse_binary(bytes, progress)?;
    build_graph(None, facets, progress)
}

fn build_graph(
    name: Option<String>,
    facets: Vec<Facet>,
    progress: &ProgressSink,
) -> Result<SceneGraph, LoadError> {
    let mut positions = Vec::with_capacity(facets.len() * 3);
    let mut normals = Vec::with_capacity(facets.len() * 3);

    for facet in &facets {
        let normal = effective_normal(facet);
        for vertex in facet.vertices {
            positions.push(vertex);
            normals.push(normal);
        }
    }
    progress.report(90);

    debug!("STL: {} facets", facets.len());

    let mesh = MeshAsset::new(
        name.unwrap_or_else(|| "stl".to_string()),
        positions,
        Some(normals),
        None,
    );

    let mut graph = SceneGraph::new();
    let root = graph.root();
    graph.add_mesh(root, mesh, Material::untextured_default());
    Ok(graph)
}

/// The facet's own normal when usable, else one computed from its winding.
fn effective_normal(facet: &Facet) -> [f32; 3] {
    let n = Vec3::from(facet.normal);
    if n.length_squared() > 1e-12 {
        return n.normalize().to_array();
    }
    let a = Vec3::from(facet.vertices[0]);
    let b = Vec3::from(facet.vertices[1]);
    let c = Vec3::from(facet.vertices[2]);
    (b - a).cross(c - a).normalize_or_zero().to_array()
}

// ---- Binary encoding ----

fn parse_binary(bytes: &[u8], progress: &ProgressSink) -> Result<Vec<Facet>, LoadError> {
    if bytes.len() < 84 {
        return Err(LoadError::malformed("STL data too small for a header"));
    }

    let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap()) as usize;
    let needed = 84 + count * 50;
    if bytes.len() < needed {
        return Err(LoadError::malformed(format!(
            "binary STL truncated: header promises {count} facets ({needed} bytes), got {}",
            bytes.len()
        )));
    }

    let mut facets = Vec::with_capacity(count);
    let mut offset = 84;
    for i in 0..count {
        let normal = read_vec3(bytes, offset);
        let vertices = [
            read_vec3(bytes, offset + 12),
            read_vec3(bytes, offset + 24),
            read_vec3(bytes, offset + 36),
        ];
        // 2-byte attribute count is skipped
        offset += 50;
        facets.push(Facet { normal, vertices });

        if count >= 10 && i % (count / 10) == 0 {
            progress.report((i * 80 / count) as u8);
        }
    }

    Ok(facets)
}

fn read_vec3(bytes: &[u8], offset: usize) -> [f32; 3] {
    let f = |o: usize| f32::from_le_bytes(bytes[o..o + 4].try_into().unwrap());
    [f(offset), f(offset + 4), f(offset + 8)]
}

// ---- ASCII encoding ----

fn parse_ascii(input: &str) -> Result<(Option<String>, Vec<Facet>), LoadError> {
    match parse_ascii_impl(input) {
        Ok((rest, parsed)) => {
            if rest.trim().is_empty() {
                Ok(parsed)
            } else {
                Err(LoadError::malformed(
                    "ASCII STL has trailing content after endsolid",
                ))
            }
        }
        Err(e) => Err(LoadError::malformed(format!("ASCII STL parse error: {e}"))),
    }
}

fn parse_ascii_impl(input: &str) -> IResult<&str, (Option<String>, Vec<Facet>)> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, name_line) = opt(preceded(space1, not_line_ending))(input)?;
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = opt(not_line_ending)(input)?;

    let name = name_line
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Ok((input, (name, facets)))
}

fn parse_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v0) = parse_vertex(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((
        input,
        Facet {
            normal,
            vertices: [v0, v1, v2],
        },
    ))
}

fn parse_vertex(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}
