use std::path::{Path, PathBuf};

use crate::{
    assets::{Assets, Handle},
    error::TextureError,
    scene::{ImportedMaterial, TextureChannel},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8Unorm,     // Standard 32-bit color (0-255)
    Rgba8UnormSrgb, // Standard 32-bit color (0-255)
}

#[derive(Clone, Debug)]
pub struct TextureData {
    pub name: String,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat, // e.g., Rgba8Unorm
}

/// Reads image files into CPU side pixel data.
pub trait ImageLoader {
    fn load_image(&self, path: &Path) -> Result<TextureData, TextureError>;
}

/// Turns decoded images into handles the renderer can bind.
pub trait TextureFactory {
    fn create_texture(&self, image: TextureData) -> Handle<TextureData>;
}

/// Loads images from disk with the `image` crate, as sRGB RGBA8.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load_image(&self, path: &Path) -> Result<TextureData, TextureError> {
        let img = image::open(path)
            .map_err(|source| TextureError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let width = img.width();
        let height = img.height();

        Ok(TextureData {
            name: path.display().to_string(),
            width,
            height,
            pixels: img.into_raw(),
            format: TextureFormat::Rgba8UnormSrgb,
        })
    }
}

impl TextureFactory for Assets<TextureData> {
    fn create_texture(&self, image: TextureData) -> Handle<TextureData> {
        log::debug!(
            "Registering texture '{}' ({}x{})",
            image.name,
            image.width,
            image.height
        );
        self.add(image)
    }
}

/// Shader program and textures a mesh renders with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialInstance {
    /// Name of the shader program, resolved by the renderer.
    pub shader: Option<String>,
    pub textures: Vec<Handle<TextureData>>,
}

/// Texture paths in model files are relative to the model itself.
pub fn resolve_texture_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Loads every texture of `channel` in order and appends the handles.
///
/// A texture the image loader rejects is logged and skipped; the remaining
/// ones still load. Returns how many handles were appended.
pub fn textures_from_material<L, F>(
    material: &ImportedMaterial,
    channel: TextureChannel,
    base_dir: &Path,
    images: &L,
    factory: &F,
    textures: &mut Vec<Handle<TextureData>>,
) -> usize
where
    L: ImageLoader + ?Sized,
    F: TextureFactory + ?Sized,
{
    let before = textures.len();

    for index in 0..material.texture_count(channel) {
        let Some(path) = material.texture(channel, index) else {
            continue;
        };
        let path = resolve_texture_path(base_dir, path);

        match images.load_image(&path) {
            Ok(image) => textures.push(factory.create_texture(image)),
            Err(err) => log::warn!(
                "Material '{}': skipping {:?} texture: {}",
                material.name,
                channel,
                err
            ),
        }
    }

    textures.len() - before
}
