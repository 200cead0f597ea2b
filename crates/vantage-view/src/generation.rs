//! Generation-based resource lifecycle
//!
//! A generation is one complete, atomically-installed version of the
//! displayed scene: the parsed graph plus every renderer handle allocated
//! for it. The manager owns at most one live generation; replacing it
//! disposes the outgoing generation transitively before the new one becomes
//! visible, so no observer ever sees a mix of old and new resources.

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::{Mat4, Vec3};
use tracing::{debug, info};

use vantage_assets::{LoadedModel, MaterialId, NodeId, SceneGraph, TextureSlot};

use crate::error::ViewError;
use crate::frame::{DrawItem, FrameSnapshot, PointOverlay};
use crate::framing::{fit_camera, normalize, CameraFit, FramingConfig, NormalizedModel};
use crate::handles::{GeometryHandle, HandleRegistry, MaterialHandle, TextureHandle};
use crate::helpers::HelperState;
use crate::lighting::SceneLighting;
use crate::modes::VisualizationMode;
use crate::stats::{analyze, ModelStats};

/// One loaded model with its full set of renderer handles.
#[derive(Debug)]
pub struct ResourceGeneration {
    id: u64,
    model: LoadedModel,
    stats: ModelStats,
    normalized: NormalizedModel,
    camera: Option<CameraFit>,
    /// Geometry buffer per mesh node, in traversal order
    geometry: Vec<(NodeId, GeometryHandle)>,
    /// Material handle per material table entry
    materials: Vec<MaterialHandle>,
    /// Texture handle per (material, occupied slot)
    textures: BTreeMap<(u32, TextureSlot), TextureHandle>,
    disposed: bool,
}

impl ResourceGeneration {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn stats(&self) -> &ModelStats {
        &self.stats
    }

    pub fn normalized(&self) -> &NormalizedModel {
        &self.normalized
    }

    pub fn camera(&self) -> Option<CameraFit> {
        self.camera
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.model.graph
    }

    /// Total handles allocated for this generation
    pub fn handle_count(&self) -> usize {
        self.geometry.len() + self.materials.len() + self.textures.len()
    }

    fn material_handle(&self, id: MaterialId) -> MaterialHandle {
        self.materials[id.index()]
    }
}

/// Ephemeral resources owned by the active visualization mode, scoped to
/// one generation.
#[derive(Debug, Default)]
struct ModeResources {
    generation: u64,
    mode: VisualizationMode,
    /// Override material per mesh node (wireframe, translucency, ghosting)
    overrides: Vec<(NodeId, MaterialHandle)>,
    overlay: Option<PointOverlay>,
}

impl ModeResources {
    fn handle_count(&self) -> usize {
        self.overrides.len() + if self.overlay.is_some() { 2 } else { 0 }
    }
}

/// Owner of the single current generation and the mode state machine.
///
/// All mutation of the live resource set funnels through `swap` and
/// `set_mode` on one owner; the render tick reads through `frame`.
pub struct SceneManager {
    config: FramingConfig,
    registry: HandleRegistry,
    current: Option<ResourceGeneration>,
    mode: VisualizationMode,
    mode_resources: Option<ModeResources>,
    next_generation: u64,
}

impl SceneManager {
    pub fn new(config: FramingConfig) -> Self {
        Self {
            config,
            registry: HandleRegistry::new(),
            current: None,
            mode: VisualizationMode::default(),
            mode_resources: None,
            next_generation: 1,
        }
    }

    pub fn mode(&self) -> VisualizationMode {
        self.mode
    }

    pub fn current(&self) -> Option<&ResourceGeneration> {
        self.current.as_ref()
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Build a ready-to-install generation from a parsed model: statistics
    /// (pre-normalization), canonical framing, then handle allocation.
    ///
    /// Nothing becomes visible here; the caller decides whether the result
    /// is installed with [`swap`](Self::swap) or, if it lost the race to a
    /// newer load, thrown away with [`discard`](Self::discard).
    pub fn prepare(&mut self, mut model: LoadedModel) -> ResourceGeneration {
        let stats = analyze(&model);
        let normalized = normalize(&mut model.graph, self.config.canonical_size);
        let camera = fit_camera(&normalized.bounding_box, self.config.fov_y, self.config.padding);

        let mut geometry = Vec::new();
        model.graph.visit_meshes(|node, mesh_id, _, _| {
            // Warm the shading normal cache; later mode switches reuse it
            model.graph.mesh(mesh_id).normals();
            geometry.push((node, self.registry.allocate()));
        });

        let mut materials = Vec::new();
        let mut textures = BTreeMap::new();
        for (material_id, material) in model.graph.materials() {
            materials.push(self.registry.allocate());
            for slot in material.texture_slots() {
                textures.insert(
                    (material_id.index() as u32, slot),
                    self.registry.allocate(),
                );
            }
        }

        let id = self.next_generation;
        self.next_generation += 1;

        debug!(
            "prepared generation {id}: {} geometry, {} materials, {} textures",
            geometry.len(),
            materials.len(),
            textures.len()
        );

        ResourceGeneration {
            id,
            model,
            stats,
            normalized,
            camera,
            geometry,
            materials,
            textures,
            disposed: false,
        }
    }

    /// Replace the live generation. The outgoing generation (and the mode
    /// resources scoped to it) is disposed first; the new one is installed
    /// in a single assignment, so readers see either the whole old scene or
    /// the whole new one, never a blend.
    pub fn swap(&mut self, generation: ResourceGeneration) -> Result<(), ViewError> {
        self.dispose_mode_resources()?;
        if let Some(mut old) = self.current.take() {
            self.dispose_generation(&mut old)?;
        }

        info!(
            "installed generation {} ('{}', {} vertices)",
            generation.id, generation.stats.file_name, generation.stats.vertices
        );
        self.current = Some(generation);
        self.rebuild_mode_resources()
    }

    /// Dispose a generation that lost the race to a newer completed load:
    /// its resources are released without it ever having been visible.
    pub fn discard(&mut self, mut generation: ResourceGeneration) -> Result<(), ViewError> {
        debug!("discarding superseded generation {}", generation.id);
        self.dispose_generation(&mut generation)
    }

    /// Switch visualization mode. Re-entering the active mode is a no-op;
    /// otherwise the previous mode's ephemeral resources are disposed and
    /// the new mode's are built from the current generation.
    pub fn set_mode(&mut self, mode: VisualizationMode) -> Result<(), ViewError> {
        let already_built = self.mode_resources.as_ref().is_some_and(|res| {
            res.mode == mode
                && self
                    .current
                    .as_ref()
                    .is_some_and(|cur| cur.id == res.generation)
        });
        if mode == self.mode && (already_built || self.current.is_none()) {
            return Ok(());
        }

        debug!("visualization mode: {} -> {}", self.mode, mode);
        self.mode = mode;
        self.dispose_mode_resources()?;
        self.rebuild_mode_resources()
    }

    /// Resolve the scene into a frame snapshot for the external renderer.
    pub fn frame(
        &self,
        spin_y: f32,
        lighting: SceneLighting,
        helpers: HelperState,
    ) -> FrameSnapshot {
        let mut items = Vec::new();
        let mut overlay = None;
        let mut camera = None;
        let mut generation = None;

        if let Some(cur) = &self.current {
            generation = Some(cur.id);
            camera = cur.camera;

            let geometry: HashMap<NodeId, GeometryHandle> =
                cur.geometry.iter().copied().collect();
            let overrides: HashMap<NodeId, MaterialHandle> = self
                .mode_resources
                .iter()
                .flat_map(|res| res.overrides.iter().copied())
                .collect();
            let spin = Mat4::from_rotation_y(spin_y);

            cur.model.graph.visit_meshes(|node, _, material_id, world| {
                let material = overrides
                    .get(&node)
                    .copied()
                    .unwrap_or_else(|| cur.material_handle(material_id));
                items.push(DrawItem {
                    node,
                    geometry: geometry[&node],
                    material,
                    world: spin * world,
                });
            });

            overlay = self.mode_resources.as_ref().and_then(|res| res.overlay);
        }

        FrameSnapshot {
            generation,
            mode: self.mode,
            items,
            overlay,
            camera,
            lighting,
            helpers,
        }
    }

    /// Release every handle a generation owns. Disposing an
    /// already-disposed generation is a no-op; releasing a handle the
    /// registry does not hold live is the unreachable invariant violation.
    fn dispose_generation(&mut self, generation: &mut ResourceGeneration) -> Result<(), ViewError> {
        if generation.disposed {
            return Ok(());
        }

        for (_, handle) in &generation.geometry {
            self.registry.release(*handle)?;
        }
        for (index, _) in generation.materials.iter().enumerate() {
            // Walk the full slot set so a texture can never outlive its
            // material unnoticed
            for slot in TextureSlot::ALL {
                if let Some(handle) = generation.textures.get(&(index as u32, slot)) {
                    self.registry.release(*handle)?;
                }
            }
            self.registry.release(generation.materials[index])?;
        }

        generation.disposed = true;
        debug!("disposed generation {}", generation.id);
        Ok(())
    }

    fn dispose_mode_resources(&mut self) -> Result<(), ViewError> {
        let Some(res) = self.mode_resources.take() else {
            return Ok(());
        };
        for (_, handle) in res.overrides {
            self.registry.release(handle)?;
        }
        if let Some(overlay) = res.overlay {
            self.registry.release(overlay.geometry)?;
            self.registry.release(overlay.material)?;
        }
        Ok(())
    }

    fn rebuild_mode_resources(&mut self) -> Result<(), ViewError> {
        let Some(cur) = self.current.as_ref() else {
            self.mode_resources = None;
            return Ok(());
        };
        let registry = &mut self.registry;

        let mut resources = ModeResources {
            generation: cur.id,
            mode: self.mode,
            ..Default::default()
        };

        match self.mode {
            // Solid draws the base materials; nothing ephemeral to build
            VisualizationMode::Solid => {}
            VisualizationMode::Wireframe | VisualizationMode::FacesTranslucent => {
                cur.model.graph.visit_meshes(|node, _, _, _| {
                    resources.overrides.push((node, registry.allocate()));
                });
            }
            VisualizationMode::VertexCloud => {
                // Translucency override keeps the surface visible as context
                cur.model.graph.visit_meshes(|node, _, _, _| {
                    resources.overrides.push((node, registry.allocate()));
                });
                let point_count = unique_world_positions(&cur.model.graph);
                resources.overlay = Some(PointOverlay {
                    geometry: registry.allocate(),
                    material: registry.allocate(),
                    point_count,
                });
            }
        }

        debug!(
            "mode {} resources: {} handles",
            self.mode,
            resources.handle_count()
        );
        self.mode_resources = Some(resources);
        Ok(())
    }
}

/// Count of unique vertex positions across the graph, in world space. The
/// vertex cloud carries exactly one point for each.
fn unique_world_positions(graph: &SceneGraph) -> usize {
    let mut seen = HashSet::new();
    graph.visit_meshes(|_, mesh_id, _, world| {
        for p in graph.mesh(mesh_id).positions() {
            let q = world.transform_point3(Vec3::from(*p));
            seen.insert([q.x.to_bits(), q.y.to_bits(), q.z.to_bits()]);
        }
    });
    seen.len()
}
