//! Typed handles for renderer-owned resources
//!
//! Handles stand in for GPU-side objects (vertex buffers, materials,
//! textures). The registry issues them and tracks which are live, so the
//! lifecycle manager can prove that everything it allocated for a generation
//! came back when the generation was disposed.

use std::collections::HashSet;
use std::marker::PhantomData;

use crate::error::ViewError;

/// Raw numeric identity behind every typed handle.
pub type RawHandle = u64;

/// A typed handle referencing one renderer-owned resource.
#[derive(Debug)]
pub struct Handle<T> {
    id: RawHandle,
    _marker: PhantomData<T>,
}

impl<T> Handle<T> {
    fn new(id: RawHandle) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> RawHandle {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self::new(self.id)
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Marker for geometry buffer handles
#[derive(Debug)]
pub enum GeometryBuffer {}
/// Marker for material handles
#[derive(Debug)]
pub enum GpuMaterial {}
/// Marker for texture handles
#[derive(Debug)]
pub enum GpuTexture {}

pub type GeometryHandle = Handle<GeometryBuffer>;
pub type MaterialHandle = Handle<GpuMaterial>;
pub type TextureHandle = Handle<GpuTexture>;

/// Allocation table for renderer resources.
///
/// Ids are never reused, so a released handle can be told apart from one
/// that was never issued. The allocated/released tallies exist for the
/// leak-freedom assertions in tests and for lifecycle logging.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    next: RawHandle,
    live: HashSet<RawHandle>,
    allocated: u64,
    released: u64,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate<T>(&mut self) -> Handle<T> {
        self.next += 1;
        self.allocated += 1;
        self.live.insert(self.next);
        Handle::new(self.next)
    }

    /// Release a live handle. Releasing anything else is the unreachable
    /// branch of the lifecycle design and reported as such.
    pub fn release<T>(&mut self, handle: Handle<T>) -> Result<(), ViewError> {
        if self.live.remove(&handle.id) {
            self.released += 1;
            Ok(())
        } else {
            Err(ViewError::ResourceDisposal(handle.id))
        }
    }

    pub fn is_live<T>(&self, handle: Handle<T>) -> bool {
        self.live.contains(&handle.id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn allocated_count(&self) -> u64 {
        self.allocated
    }

    pub fn released_count(&self) -> u64 {
        self.released
    }
}
