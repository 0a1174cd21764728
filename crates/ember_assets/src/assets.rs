use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    sync::{Arc, PoisonError, RwLock},
};

use glam::Vec3;
use uuid::Uuid;

use crate::skin::{BoneRegistry, VertexInfluences};

// 1. The ID (Handle)
// It's just a unique number. Efficient to copy.
pub struct Handle<T> {
    pub id: Uuid,
    marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn new() -> Self {
        Self::from_id(Uuid::new_v4())
    }

    pub fn from_id(id: Uuid) -> Self {
        Self {
            id,
            marker: PhantomData,
        }
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

// Hash and order only by id, the marker carries no data.
impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// 2. The Storage (Bank)
// RwLock so several loads (and a renderer) can share one store.
pub struct Assets<T> {
    storage: Arc<RwLock<HashMap<Uuid, Arc<T>>>>,
}

impl<T> Default for Assets<T> {
    fn default() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Clone for Assets<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<T> Assets<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, asset: T) -> Handle<T> {
        let handle = Handle::new();
        self.storage
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.id, Arc::new(asset));
        handle
    }

    pub fn get(&self, handle: &Handle<T>) -> Option<Arc<T>> {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&handle.id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3], // Flat lists are easier for generic loaders
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Axis aligned bounding box in mesh space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;

        Some(points.fold(Self { min: first, max: first }, |bounds, point| Self {
            min: bounds.min.min(point),
            max: bounds.max.max(point),
        }))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// CPU side mesh owned by a mesh component.
///
/// `influences` runs parallel to `vertices`. Uploading to the GPU is the
/// renderer's business.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub influences: Vec<VertexInfluences>,
    pub bones: BoneRegistry,
    pub bounds: Option<Aabb>,
}

impl MeshData {
    /// Drops all geometry and skinning data, keeping allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.influences.clear();
        self.bones.clear();
        self.bounds = None;
    }

    /// Recomputes data derived from the vertices.
    pub fn recalculate(&mut self) {
        self.bounds = Aabb::from_points(
            self.vertices
                .iter()
                .map(|vertex| Vec3::from_array(vertex.position)),
        );
    }
}
