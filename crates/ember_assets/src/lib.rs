//! Model import building blocks: decoded-scene types, file decoders, mesh
//! translation with skinning, and texture resolution.
//!
//! Spawning the result into a world lives in `ember_scene`.

pub mod assets;
pub mod decoder;
pub mod error;
pub mod material;
pub mod mesh;
pub mod postprocess;
pub mod scene;
pub mod settings;
pub mod skin;

pub use assets::{Aabb, Assets, Handle, MeshData, Vertex};
pub use decoder::{FormatDecoder, SceneDecoder};
pub use error::{DecodeError, SettingsError, TextureError};
pub use material::{
    FileImageLoader, ImageLoader, MaterialInstance, TextureData, TextureFactory, TextureFormat,
    textures_from_material,
};
pub use mesh::{TranslationSummary, translate_mesh};
pub use postprocess::{ImportFlags, NormalGeneration};
pub use scene::{
    Face, ImportedBone, ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene,
    TextureChannel, VertexWeight,
};
pub use settings::ImportSettings;
pub use skin::{BoneInfo, BoneRegistry, MAX_BONE_INFLUENCES, NO_BONE, VertexInfluences};
