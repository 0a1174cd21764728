use std::path::Path;

use ember_assets::{
    ImageLoader, ImportSettings, ImportedMesh, ImportedNode, ImportedScene, TextureChannel,
    TextureFactory, textures_from_material, translate_mesh,
};
use ember_core::Name;
use flecs_ecs::prelude::*;

use crate::MeshComponent;

/// Spawns the meshes of one decoded scene.
///
/// Lives only for a single load; the loader builds a fresh one every call.
pub struct SceneWalker<'a, L: ?Sized, R: ?Sized> {
    scene: &'a ImportedScene,
    base_dir: &'a Path,
    images: &'a L,
    textures: &'a R,
    settings: &'a ImportSettings,
}

impl<'a, L, R> SceneWalker<'a, L, R>
where
    L: ImageLoader + ?Sized,
    R: TextureFactory + ?Sized,
{
    /// `base_dir` is the directory texture paths are resolved against.
    pub fn new(
        scene: &'a ImportedScene,
        base_dir: &'a Path,
        images: &'a L,
        textures: &'a R,
        settings: &'a ImportSettings,
    ) -> Self {
        Self {
            scene,
            base_dir,
            images,
            textures,
            settings,
        }
    }

    /// Creates one child of `parent` per mesh of `node`, then does the same
    /// for every descendant.
    ///
    /// The node hierarchy is not mirrored: mesh entities of nested nodes are
    /// attached to the same `parent`.
    pub fn process_node(&self, node: &ImportedNode, parent: EntityView<'_>) {
        let name = if node.name.is_empty() {
            self.settings.fallback_node_name.as_str()
        } else {
            node.name.as_str()
        };

        let world = parent.world();

        for &mesh_index in &node.meshes {
            let Some(source) = self.scene.meshes.get(mesh_index) else {
                log::warn!("Node '{}' references missing mesh {}", name, mesh_index);
                continue;
            };

            let entity = world
                .entity()
                .child_of(parent)
                .set(Name::new(name))
                .set(MeshComponent::default());

            entity.get::<&mut MeshComponent>(|component| self.process_mesh(source, component));
        }

        for child in (0..node.child_count()).filter_map(|index| node.child(index)) {
            self.process_node(child, parent);
        }
    }

    fn process_mesh(&self, source: &ImportedMesh, component: &mut MeshComponent) {
        let summary = translate_mesh(source, &mut component.mesh);
        component.material.shader = self.settings.shader.clone();
        log::debug!(
            "Mesh '{}': {} vertices, {} indices, {} bones",
            source.name,
            summary.vertices,
            summary.indices,
            summary.bones
        );

        let Some(material) = self.scene.materials.get(source.material_index) else {
            log::warn!(
                "Mesh '{}' references missing material {}",
                source.name,
                source.material_index
            );
            return;
        };

        textures_from_material(
            material,
            TextureChannel::Diffuse,
            self.base_dir,
            self.images,
            self.textures,
            &mut component.material.textures,
        );
    }
}
