use std::path::PathBuf;

use thiserror::Error;

/// Everything that makes a decoder refuse a file.
///
/// The entry points collapse all of these into one reported failure.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("glTF: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("unsupported model format '{0}'")]
    UnsupportedFormat(String),

    #[error("scene is incomplete")]
    IncompleteScene,

    #[error("scene has no root node")]
    MissingRootNode,
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load image '{}': {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}
