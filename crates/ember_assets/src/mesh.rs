use crate::{
    assets::{MeshData, Vertex},
    scene::ImportedMesh,
    skin::VertexInfluences,
};

/// What a translation produced, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    pub vertices: usize,
    pub indices: usize,
    pub bones: usize,
    /// Influences discarded because their vertex already had four.
    pub dropped_influences: usize,
}

/// Fills `target` from an imported mesh.
///
/// The target is cleared first. Faces are copied verbatim, so the index
/// stream is only a triangle list if the decoder triangulated.
pub fn translate_mesh(source: &ImportedMesh, target: &mut MeshData) -> TranslationSummary {
    let vertex_count = source.vertex_count();

    target.clear();
    target.vertices.reserve_exact(vertex_count);
    target.influences.reserve_exact(vertex_count);
    target.indices.reserve_exact(source.faces.len() * 3);

    // --- STEP 1: VERTICES ---
    for i in 0..vertex_count {
        target.influences.push(VertexInfluences::default());

        let mut vertex = Vertex {
            position: source.positions[i],
            ..Default::default()
        };

        if let Some(normal) = source.normals.as_ref().and_then(|normals| normals.get(i)) {
            vertex.normal = *normal;
        }

        if let Some(uv) = source.tex_coords.as_ref().and_then(|uvs| uvs.get(i)) {
            vertex.uv = *uv;
        }

        target.vertices.push(vertex);
    }

    // --- STEP 2: INDICES ---
    for face in &source.faces {
        target.indices.extend_from_slice(&face.indices);
    }

    // --- STEP 3: BONES ---
    let mut dropped_influences = 0;

    for bone in &source.bones {
        let bone_id = target.bones.register(&bone.name, bone.offset);

        for weight in &bone.weights {
            let Some(influences) = target.influences.get_mut(weight.vertex as usize) else {
                log::warn!(
                    "Bone '{}' of mesh '{}' references missing vertex {}",
                    bone.name,
                    source.name,
                    weight.vertex
                );
                continue;
            };

            if !influences.insert(bone_id, weight.weight) {
                dropped_influences += 1;
            }
        }
    }

    if dropped_influences > 0 {
        log::debug!(
            "Mesh '{}': dropped {} bone influences beyond the per-vertex limit",
            source.name,
            dropped_influences
        );
    }

    target.recalculate();

    TranslationSummary {
        vertices: target.vertices.len(),
        indices: target.indices.len(),
        bones: target.bones.len(),
        dropped_influences,
    }
}
