//! Spawns imported models into a flecs world.

use ember_assets::{MaterialInstance, MeshData};
use ember_core::{App, Name, Plugin};
use flecs_ecs::prelude::*;

pub mod error;
pub mod loader;
pub mod walker;

pub use error::ImportError;
pub use loader::ModelLoader;
pub use walker::SceneWalker;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.world.component::<Name>();
        app.world.component::<MeshComponent>();
        app.world.component::<AssetSource>();
    }
}

/// Geometry and textures of one imported mesh.
#[derive(Component, Debug, Clone, Default)]
pub struct MeshComponent {
    pub mesh: MeshData,
    pub material: MaterialInstance,
}

/// The file a model root was loaded from.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSource {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_registers_import_components() {
        let mut app = App::new();
        app.add_plugin(ScenePlugin);

        let model = app
            .world
            .entity()
            .set(Name::new("crate.obj"))
            .set(AssetSource {
                path: "props/crate.obj".to_owned(),
            })
            .set(MeshComponent::default());

        let source = model.try_get::<&AssetSource>(|source| source.path.clone());
        assert_eq!(source.as_deref(), Some("props/crate.obj"));
        let textures = model.try_get::<&MeshComponent>(|mesh| mesh.material.textures.len());
        assert_eq!(textures, Some(0));
    }
}
