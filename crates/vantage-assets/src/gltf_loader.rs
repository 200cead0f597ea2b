//! glTF 2.0 / GLB parsing
//!
//! Goes through the `gltf` crate's slice importer, which handles both the
//! binary container and JSON documents with data-URI buffers. The document's
//! node hierarchy is preserved: every glTF node becomes a group carrying its
//! decomposed transform, and each mesh primitive under it becomes one mesh
//! node with its own material instance.

use glam::{Quat, Vec3};
use tracing::debug;
use vantage_core::{Color, Transform};

use crate::error::LoadError;
use crate::material::{Material, TextureSlot};
use crate::mesh::MeshAsset;
use crate::progress::ProgressSink;
use crate::scene::{NodeId, SceneGraph};
use crate::texture::TextureAsset;

pub fn parse(bytes: &[u8], progress: &ProgressSink) -> Result<SceneGraph, LoadError> {
    let (document, buffers, images) = gltf::import_slice(bytes)
        .map_err(|e| LoadError::malformed(format!("glTF import failed: {e}")))?;
    progress.report(20);

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| LoadError::malformed("glTF document has no scene"))?;

    let mut graph = SceneGraph::new();
    let root = graph.root();
    for node in scene.nodes() {
        add_node(&mut graph, root, &node, &buffers, &images)?;
    }

    progress.report(80);
    debug!(
        "glTF: {} nodes, {} meshes",
        graph.node_count(),
        graph.mesh_count()
    );
    Ok(graph)
}

fn add_node(
    graph: &mut SceneGraph,
    parent: NodeId,
    node: &gltf::Node<'_>,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Result<(), LoadError> {
    let (translation, rotation, scale) = node.transform().decomposed();
    let transform = Transform::from_trs(
        Vec3::from(translation),
        Quat::from_array(rotation),
        Vec3::from(scale),
    );
    let group = graph.add_group(parent, transform);

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh.name().unwrap_or("unnamed").to_string();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .unwrap_or_default();
            if positions.is_empty() {
                debug!("skipping primitive of '{}' with no positions", mesh_name);
                continue;
            }

            let normals: Option<Vec<[f32; 3]>> =
                reader.read_normals().map(|iter| iter.collect());

            let indices: Option<Vec<u32>> =
                reader.read_indices().map(|idx| idx.into_u32().collect());

            let material = convert_material(&primitive.material(), images);
            let asset = MeshAsset::new(mesh_name.clone(), positions, normals, indices);
            graph.add_mesh(group, asset, material);
        }
    }

    for child in node.children() {
        add_node(graph, group, &child, buffers, images)?;
    }
    Ok(())
}

/// Instantiate a material for one primitive. glTF shares material definitions
/// across primitives; cloning here keeps ownership strictly per node so the
/// lifecycle manager never needs reference counts.
fn convert_material(material: &gltf::Material<'_>, images: &[gltf::image::Data]) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();

    let mut out = Material::new(material.name().unwrap_or("material"));
    out.base_color = Color::rgba(r, g, b, a);
    out.metallic = pbr.metallic_factor();
    out.roughness = pbr.roughness_factor();
    out.double_sided = material.double_sided();

    let mut assign = |slot: TextureSlot, index: usize| {
        if let Some(texture) = images.get(index).and_then(convert_image) {
            out.set_texture(slot, texture);
        }
    };

    if let Some(info) = pbr.base_color_texture() {
        assign(TextureSlot::Diffuse, info.texture().source().index());
    }
    // The combined metallic-roughness image lands in the metalness slot
    if let Some(info) = pbr.metallic_roughness_texture() {
        assign(TextureSlot::Metalness, info.texture().source().index());
    }
    if let Some(normal) = material.normal_texture() {
        assign(TextureSlot::Normal, normal.texture().source().index());
    }
    if let Some(occlusion) = material.occlusion_texture() {
        assign(TextureSlot::AmbientOcclusion, occlusion.texture().source().index());
    }
    if let Some(info) = material.emissive_texture() {
        assign(TextureSlot::Emissive, info.texture().source().index());
    }

    out
}

fn convert_image(data: &gltf::image::Data) -> Option<TextureAsset> {
    match data.format {
        gltf::image::Format::R8G8B8A8 => Some(TextureAsset::from_rgba8(
            data.width,
            data.height,
            data.pixels.clone(),
        )),
        gltf::image::Format::R8G8B8 => {
            Some(TextureAsset::from_rgb8(data.width, data.height, &data.pixels))
        }
        _ => {
            // Other layouts only round-trip if they already hold RGBA bytes
            let img = image::RgbaImage::from_raw(data.width, data.height, data.pixels.clone());
            match img {
                Some(img) => Some(TextureAsset::from_rgba8(
                    data.width,
                    data.height,
                    img.into_raw(),
                )),
                None => {
                    debug!("skipping glTF image with unsupported format");
                    None
                }
            }
        }
    }
}
