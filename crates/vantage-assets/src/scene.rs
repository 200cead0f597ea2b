//! Arena-indexed scene graph
//!
//! Nodes live in a flat table addressed by integer ids instead of a web of
//! owning pointers. Children are always appended after their parent, so the
//! child index is strictly greater than the parent's and cycles cannot be
//! constructed. Swapping a whole graph in or out is a plain value move.

use glam::Mat4;
use vantage_core::Transform;

use crate::material::Material;
use crate::mesh::MeshAsset;

/// Index of a node in a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// Index of a mesh asset in a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(u32);

/// Index of a material in a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A node is either a drawable mesh reference or a grouping transform.
/// Matched exhaustively everywhere; there is no third kind hiding behind a
/// runtime type check.
#[derive(Debug, Clone)]
pub enum SceneNode {
    Mesh { mesh: MeshId, material: MaterialId },
    Group {
        transform: Transform,
        children: Vec<NodeId>,
    },
}

/// A complete loaded scene: node arena plus the mesh and material tables the
/// nodes index into. The root is always a group.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    meshes: Vec<MeshAsset>,
    materials: Vec<Material>,
    root: NodeId,
}

impl SceneGraph {
    /// Create a graph holding only an identity root group.
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::Group {
                transform: Transform::IDENTITY,
                children: Vec::new(),
            }],
            meshes: Vec::new(),
            materials: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0 as usize]
    }

    pub fn mesh(&self, id: MeshId) -> &MeshAsset {
        &self.meshes[id.0 as usize]
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0 as usize]
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i as u32), m))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Total vertex count across every mesh in the graph
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertex_count()).sum()
    }

    /// Add a group under `parent` and return its id.
    pub fn add_group(&mut self, parent: NodeId, transform: Transform) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode::Group {
            transform,
            children: Vec::new(),
        });
        self.attach(parent, id);
        id
    }

    /// Add a mesh node under `parent`, taking ownership of the mesh and its
    /// (unshared) material.
    pub fn add_mesh(&mut self, parent: NodeId, mesh: MeshAsset, material: Material) -> NodeId {
        let mesh_id = MeshId(self.meshes.len() as u32);
        self.meshes.push(mesh);
        let material_id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode::Mesh {
            mesh: mesh_id,
            material: material_id,
        });
        self.attach(parent, id);
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.nodes[parent.0 as usize] {
            SceneNode::Group { children, .. } => children.push(child),
            SceneNode::Mesh { .. } => panic!("cannot attach children to a mesh node"),
        }
    }

    /// The root group's local transform (where normalization is baked).
    pub fn root_transform(&self) -> Transform {
        match self.node(self.root) {
            SceneNode::Group { transform, .. } => *transform,
            SceneNode::Mesh { .. } => unreachable!("root is always a group"),
        }
    }

    pub fn set_root_transform(&mut self, transform: Transform) {
        match &mut self.nodes[self.root.0 as usize] {
            SceneNode::Group { transform: t, .. } => *t = transform,
            SceneNode::Mesh { .. } => unreachable!("root is always a group"),
        }
    }

    /// Depth-first walk over every mesh node, in insertion (source file)
    /// order, with the accumulated world transform of its ancestors.
    pub fn visit_meshes<F>(&self, mut f: F)
    where
        F: FnMut(NodeId, MeshId, MaterialId, Mat4),
    {
        self.visit_inner(self.root, Mat4::IDENTITY, &mut f);
    }

    fn visit_inner<F>(&self, id: NodeId, world: Mat4, f: &mut F)
    where
        F: FnMut(NodeId, MeshId, MaterialId, Mat4),
    {
        match self.node(id) {
            SceneNode::Mesh { mesh, material } => f(id, *mesh, *material, world),
            SceneNode::Group {
                transform,
                children,
            } => {
                let world = world * transform.matrix();
                for child in children {
                    self.visit_inner(*child, world, f);
                }
            }
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use vantage_core::Transform;

    fn tri_mesh(name: &str) -> MeshAsset {
        MeshAsset::new(
            name,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            None,
            None,
        )
    }

    #[test]
    fn meshes_visit_in_insertion_order() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.add_mesh(root, tri_mesh("first"), Material::untextured_default());
        let group = graph.add_group(root, Transform::IDENTITY);
        graph.add_mesh(group, tri_mesh("second"), Material::untextured_default());
        graph.add_mesh(root, tri_mesh("third"), Material::untextured_default());

        let mut names = Vec::new();
        graph.visit_meshes(|_, mesh, _, _| names.push(graph.mesh(mesh).name().to_string()));
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(graph.vertex_count(), 9);
    }

    #[test]
    fn ancestor_transforms_accumulate() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.set_root_transform(Transform::from_uniform_scale(2.0, Vec3::ZERO));
        let group = graph.add_group(root, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        graph.add_mesh(group, tri_mesh("leaf"), Material::untextured_default());

        let mut world = Mat4::IDENTITY;
        graph.visit_meshes(|_, _, _, m| world = m);
        let p = world.transform_point3(Vec3::ZERO);
        // root scale applies to the group translation as well
        assert_eq!(p, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn materials_are_per_node() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.add_mesh(root, tri_mesh("a"), Material::untextured_default());
        graph.add_mesh(root, tri_mesh("b"), Material::untextured_default());
        let ids: Vec<_> = graph.materials().map(|(id, _)| id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }
}
