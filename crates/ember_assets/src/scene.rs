//! Read-only model of a decoded scene file.
//!
//! Decoders produce these values; the translator and the scene walker only
//! ever borrow them.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default)]
pub struct ImportedScene {
    pub root: Option<ImportedNode>,
    pub meshes: Vec<ImportedMesh>,
    pub materials: Vec<ImportedMaterial>,
    /// Set by decoders that could only read part of the file.
    pub incomplete: bool,
}

impl ImportedScene {
    /// Total number of nodes under (and including) the root.
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, ImportedNode::node_count)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ImportedNode {
    pub name: String,
    /// Indices into `ImportedScene::meshes`.
    pub meshes: Vec<usize>,
    pub children: Vec<ImportedNode>,
}

impl ImportedNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_meshes(mut self, meshes: impl IntoIterator<Item = usize>) -> Self {
        self.meshes.extend(meshes);
        self
    }

    pub fn with_child(mut self, child: ImportedNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&ImportedNode> {
        self.children.get(index)
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ImportedNode::node_count)
            .sum::<usize>()
    }
}

/// A face as an ordered list of vertex indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<u32>,
}

impl Face {
    pub fn new(indices: Vec<u32>) -> Self {
        Self { indices }
    }

    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self::new(vec![a, b, c])
    }

    pub fn is_triangle(&self) -> bool {
        self.indices.len() == 3
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexWeight {
    pub vertex: u32,
    pub weight: f32,
}

/// A skeletal joint bound to a mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportedBone {
    pub name: String,
    /// Inverse bind transform, row-major.
    pub offset: [[f32; 4]; 4],
    pub weights: Vec<VertexWeight>,
}

#[derive(Clone, Debug, Default)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    /// Parallel to `positions` when the source declares normals.
    pub normals: Option<Vec<[f32; 3]>>,
    /// First UV channel, parallel to `positions` when present.
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub faces: Vec<Face>,
    pub bones: Vec<ImportedBone>,
    pub material_index: usize,
}

impl ImportedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_tex_coords(&self) -> bool {
        self.tex_coords.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureChannel {
    Diffuse,
    Specular,
    Ambient,
    Emissive,
    Height,
    Normals,
    Shininess,
    Opacity,
    Occlusion,
}

#[derive(Clone, Debug, Default)]
pub struct ImportedMaterial {
    pub name: String,
    textures: HashMap<TextureChannel, Vec<PathBuf>>,
}

impl ImportedMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            textures: HashMap::new(),
        }
    }

    pub fn add_texture(&mut self, channel: TextureChannel, path: impl Into<PathBuf>) {
        self.textures.entry(channel).or_default().push(path.into());
    }

    pub fn with_texture(mut self, channel: TextureChannel, path: impl Into<PathBuf>) -> Self {
        self.add_texture(channel, path);
        self
    }

    pub fn texture_count(&self, channel: TextureChannel) -> usize {
        self.textures.get(&channel).map_or(0, Vec::len)
    }

    pub fn texture(&self, channel: TextureChannel, index: usize) -> Option<&Path> {
        self.textures
            .get(&channel)
            .and_then(|paths| paths.get(index))
            .map(PathBuf::as_path)
    }
}
