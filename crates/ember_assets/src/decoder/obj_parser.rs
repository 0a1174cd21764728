use std::path::Path;

use crate::{
    error::DecodeError,
    scene::{Face, ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene, TextureChannel},
};

/// Reads a Wavefront OBJ file (and its MTL libraries).
///
/// Every object/group becomes one child of a nameless root node. Polygons are
/// only split when `triangulate` is set.
pub fn parse_obj(path: &Path, triangulate: bool) -> Result<ImportedScene, DecodeError> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let (models, materials) = tobj::load_obj(path, &options)?;

    // A broken material library still leaves usable geometry.
    let materials = materials.unwrap_or_else(|err| {
        log::warn!("{}: failed to load materials: {}", path.display(), err);
        Vec::new()
    });

    let mut scene = ImportedScene {
        materials: materials.iter().map(convert_material).collect(),
        ..Default::default()
    };

    let default_material = scene.materials.len();
    scene.materials.push(ImportedMaterial::new("DefaultMaterial"));

    let mut root = ImportedNode::new("");
    for model in &models {
        let mesh_index = scene.meshes.len();
        scene.meshes.push(convert_mesh(model, default_material));
        root.children
            .push(ImportedNode::new(model.name.as_str()).with_meshes([mesh_index]));
    }

    scene.root = Some(root);
    Ok(scene)
}

fn convert_material(material: &tobj::Material) -> ImportedMaterial {
    let mut imported = ImportedMaterial::new(material.name.as_str());

    let channels = [
        (TextureChannel::Diffuse, &material.diffuse_texture),
        (TextureChannel::Specular, &material.specular_texture),
        (TextureChannel::Ambient, &material.ambient_texture),
        (TextureChannel::Normals, &material.normal_texture),
        (TextureChannel::Shininess, &material.shininess_texture),
        (TextureChannel::Opacity, &material.dissolve_texture),
    ];

    for (channel, texture) in channels {
        if let Some(texture) = texture {
            imported.add_texture(channel, texture.as_str());
        }
    }

    imported
}

fn convert_mesh(model: &tobj::Model, default_material: usize) -> ImportedMesh {
    let mesh = &model.mesh;

    let positions: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();

    let normals = (!mesh.normals.is_empty()).then(|| {
        mesh.normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect()
    });

    let tex_coords = (!mesh.texcoords.is_empty()).then(|| {
        mesh.texcoords
            .chunks_exact(2)
            .map(|uv| [uv[0], uv[1]])
            .collect()
    });

    // No arities means every face is a triangle.
    let faces = if mesh.face_arities.is_empty() {
        mesh.indices
            .chunks_exact(3)
            .map(|tri| Face::triangle(tri[0], tri[1], tri[2]))
            .collect()
    } else {
        let mut start = 0;
        let mut faces = Vec::with_capacity(mesh.face_arities.len());
        for &arity in &mesh.face_arities {
            let end = (start + arity as usize).min(mesh.indices.len());
            faces.push(Face::new(mesh.indices[start..end].to_vec()));
            start = end;
        }
        faces
    };

    ImportedMesh {
        name: model.name.clone(),
        positions,
        normals,
        tex_coords,
        faces,
        bones: Vec::new(),
        material_index: mesh
            .material_id
            .filter(|&id| id < default_material)
            .unwrap_or(default_material),
    }
}
