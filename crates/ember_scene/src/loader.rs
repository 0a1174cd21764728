use std::path::Path;

use ember_assets::{
    Assets, DecodeError, FileImageLoader, FormatDecoder, ImageLoader, ImportFlags,
    ImportSettings, ImportedNode, ImportedScene, SceneDecoder, TextureData, TextureFactory,
};
use ember_core::Name;
use flecs_ecs::prelude::*;

use crate::{AssetSource, error::ImportError, walker::SceneWalker};

/// Imports model files as entity hierarchies.
///
/// Holds no per-load state, so one loader can serve any number of loads.
/// Texture paths are resolved against the model's own directory; the process
/// working directory is never read or changed.
pub struct ModelLoader<D = FormatDecoder, L = FileImageLoader, R = Assets<TextureData>> {
    decoder: D,
    images: L,
    textures: R,
    settings: ImportSettings,
}

impl ModelLoader {
    /// Loader that reads files from disk and keeps textures in an [`Assets`]
    /// store.
    pub fn new(settings: ImportSettings) -> Self {
        Self::with_collaborators(FormatDecoder, FileImageLoader, Assets::new(), settings)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new(ImportSettings::default())
    }
}

impl<D, L, R> ModelLoader<D, L, R>
where
    D: SceneDecoder,
    L: ImageLoader,
    R: TextureFactory,
{
    pub fn with_collaborators(decoder: D, images: L, textures: R, settings: ImportSettings) -> Self {
        Self {
            decoder,
            images,
            textures,
            settings,
        }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn images(&self) -> &L {
        &self.images
    }

    pub fn textures(&self) -> &R {
        &self.textures
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Loads `path` as a new top-level entity of `scene`, named after the file.
    pub fn load_model<'w>(
        &self,
        path: impl AsRef<Path>,
        scene: &'w World,
    ) -> Result<EntityView<'w>, ImportError> {
        let path = path.as_ref();
        let (root, imported) = self.decode(path, self.settings.scene_flags)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let model = scene.entity().set(Name::new(file_name)).set(AssetSource {
            path: path.display().to_string(),
        });

        self.walk(&imported, &root, path, model);
        Ok(model)
    }

    /// Loads `path` as a new child of `parent`.
    pub fn load_model_into<'w>(
        &self,
        path: impl AsRef<Path>,
        parent: EntityView<'w>,
    ) -> Result<EntityView<'w>, ImportError> {
        let path = path.as_ref();
        let (root, imported) = self.decode(path, self.settings.child_flags)?;

        let world = parent.world();
        let model = world
            .entity()
            .child_of(parent)
            .set(Name::new(last_component(&path.to_string_lossy())));

        self.walk(&imported, &root, path, model);
        Ok(EntityView::new_from(parent.world(), model.id()))
    }

    fn decode(
        &self,
        path: &Path,
        flags: ImportFlags,
    ) -> Result<(ImportedNode, ImportedScene), ImportError> {
        let mut scene = self
            .decoder
            .decode(path, flags)
            .and_then(|scene| {
                if scene.incomplete {
                    Err(DecodeError::IncompleteScene)
                } else {
                    Ok(scene)
                }
            })
            .map_err(|source| decode_failed(path, source))?;

        let root = scene
            .root
            .take()
            .ok_or_else(|| decode_failed(path, DecodeError::MissingRootNode))?;

        log::info!("Importing model hierarchy from {}", path.display());
        Ok((root, scene))
    }

    fn walk(&self, scene: &ImportedScene, root: &ImportedNode, path: &Path, model: EntityView<'_>) {
        let base_dir = path.parent().unwrap_or(Path::new(""));

        SceneWalker::new(
            scene,
            base_dir,
            &self.images,
            &self.textures,
            &self.settings,
        )
        .process_node(root, model);
    }
}

fn decode_failed(path: &Path, source: DecodeError) -> ImportError {
    log::error!("Failed to decode {}: {}", path.display(), source);
    ImportError::Decode {
        path: path.to_path_buf(),
        source,
    }
}

/// File name after the last `/` or `\`, whatever platform wrote the path.
fn last_component(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
