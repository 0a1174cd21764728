use std::path::Path;

use crate::{
    error::DecodeError,
    postprocess::{self, ImportFlags},
    scene::ImportedScene,
};

pub mod gltf_parser;
pub mod obj_parser;

/// Turns a model file into an [`ImportedScene`].
pub trait SceneDecoder {
    fn decode(&self, path: &Path, flags: ImportFlags) -> Result<ImportedScene, DecodeError>;
}

/// Picks a parser from the file extension, then post-processes the result
/// according to the requested flags.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormatDecoder;

impl SceneDecoder for FormatDecoder {
    fn decode(&self, path: &Path, flags: ImportFlags) -> Result<ImportedScene, DecodeError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let mut scene = match extension.as_str() {
            "gltf" | "glb" => gltf_parser::parse_gltf(path)?,
            "obj" => obj_parser::parse_obj(path, flags.triangulate)?,
            _ => return Err(DecodeError::UnsupportedFormat(extension)),
        };

        postprocess::apply(&mut scene, flags);
        Ok(scene)
    }
}
