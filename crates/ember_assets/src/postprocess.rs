//! Clean-up steps a decoder applies before handing a scene over.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::{Face, ImportedMesh, ImportedScene, VertexWeight};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalGeneration {
    #[default]
    None,
    /// One normal per face; shared vertices are split.
    Flat,
    /// Face normals averaged over every vertex.
    Smooth,
}

/// Processing requested from a decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportFlags {
    /// Only applied to meshes that carry no normals of their own.
    pub normals: NormalGeneration,
    pub triangulate: bool,
}

impl ImportFlags {
    pub fn smooth_triangulated() -> Self {
        Self {
            normals: NormalGeneration::Smooth,
            triangulate: true,
        }
    }

    pub fn flat_normals() -> Self {
        Self {
            normals: NormalGeneration::Flat,
            triangulate: false,
        }
    }
}

pub fn apply(scene: &mut ImportedScene, flags: ImportFlags) {
    for mesh in &mut scene.meshes {
        if flags.triangulate {
            triangulate(mesh);
        }

        if mesh.normals.is_none() {
            match flags.normals {
                NormalGeneration::None => {}
                NormalGeneration::Flat => generate_flat_normals(mesh),
                NormalGeneration::Smooth => generate_smooth_normals(mesh),
            }
        }
    }
}

/// Splits polygons into triangle fans. Points and lines pass through.
pub fn triangulate(mesh: &mut ImportedMesh) {
    if mesh.faces.iter().all(|face| face.indices.len() <= 3) {
        return;
    }

    let mut faces = Vec::with_capacity(mesh.faces.len());
    for face in mesh.faces.drain(..) {
        if face.indices.len() <= 3 {
            faces.push(face);
            continue;
        }

        let first = face.indices[0];
        faces.extend(
            face.indices[1..]
                .windows(2)
                .map(|pair| Face::triangle(first, pair[0], pair[1])),
        );
    }
    mesh.faces = faces;
}

/// Unnormalised polygon normal (Newell's method); its length is twice the
/// face area, so summing these weights by area.
fn face_normal(positions: &[[f32; 3]], face: &Face) -> Option<Vec3> {
    if face.indices.len() < 3 {
        return None;
    }

    let mut normal = Vec3::ZERO;
    for (i, &index) in face.indices.iter().enumerate() {
        let next = face.indices[(i + 1) % face.indices.len()];
        let current = Vec3::from_array(*positions.get(index as usize)?);
        let next = Vec3::from_array(*positions.get(next as usize)?);

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    Some(normal)
}

pub fn generate_smooth_normals(mesh: &mut ImportedMesh) {
    let mut accumulated = vec![Vec3::ZERO; mesh.positions.len()];

    for face in &mesh.faces {
        let Some(normal) = face_normal(&mesh.positions, face) else {
            continue;
        };
        for &index in &face.indices {
            if let Some(sum) = accumulated.get_mut(index as usize) {
                *sum += normal;
            }
        }
    }

    mesh.normals = Some(
        accumulated
            .into_iter()
            .map(|normal| normal.normalize_or_zero().to_array())
            .collect(),
    );
}

/// Gives every face its own copy of its vertices so each copy can carry the
/// face normal. Bone weights follow the copies.
pub fn generate_flat_normals(mesh: &mut ImportedMesh) {
    let face_index_count: usize = mesh.faces.iter().map(|face| face.indices.len()).sum();

    let mut positions = Vec::with_capacity(face_index_count);
    let mut normals = Vec::with_capacity(face_index_count);
    let mut tex_coords = mesh
        .tex_coords
        .as_ref()
        .map(|_| Vec::with_capacity(face_index_count));
    let mut copies: Vec<Vec<u32>> = vec![Vec::new(); mesh.positions.len()];

    for face in &mut mesh.faces {
        let normal = face_normal(&mesh.positions, face)
            .map(Vec3::normalize_or_zero)
            .unwrap_or(Vec3::ZERO)
            .to_array();

        for index in &mut face.indices {
            let original = *index as usize;
            let Some(position) = mesh.positions.get(original) else {
                continue;
            };

            let copy = positions.len() as u32;
            positions.push(*position);
            normals.push(normal);
            if let (Some(out), Some(uvs)) = (tex_coords.as_mut(), mesh.tex_coords.as_ref()) {
                out.push(uvs.get(original).copied().unwrap_or_default());
            }

            copies[original].push(copy);
            *index = copy;
        }
    }

    for bone in &mut mesh.bones {
        bone.weights = bone
            .weights
            .iter()
            .flat_map(|weight| {
                copies
                    .get(weight.vertex as usize)
                    .into_iter()
                    .flatten()
                    .map(move |&vertex| VertexWeight {
                        vertex,
                        weight: weight.weight,
                    })
            })
            .collect();
    }

    mesh.positions = positions;
    mesh.normals = Some(normals);
    mesh.tex_coords = tex_coords;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scene::ImportedBone, skin::IDENTITY_ROWS};

    fn quad() -> ImportedMesh {
        ImportedMesh {
            name: "quad".to_owned(),
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            faces: vec![Face::new(vec![0, 1, 2, 3])],
            ..Default::default()
        }
    }

    #[test]
    fn polygons_become_fans() {
        let mut mesh = quad();
        mesh.faces.push(Face::new(vec![0, 2]));

        triangulate(&mut mesh);

        assert_eq!(
            mesh.faces,
            vec![
                Face::triangle(0, 1, 2),
                Face::triangle(0, 2, 3),
                Face::new(vec![0, 2]),
            ]
        );
    }

    #[test]
    fn smooth_normals_point_out_of_a_ccw_quad() {
        let mut mesh = quad();
        triangulate(&mut mesh);
        generate_smooth_normals(&mut mesh);

        let normals = mesh.normals.expect("normals generated");
        assert_eq!(normals.len(), 4);
        for normal in normals {
            assert!((Vec3::from_array(normal) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn flat_normals_split_shared_vertices() {
        // Two triangles folded along the shared edge 0-2.
        let mut mesh = ImportedMesh {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 1.0],
            ],
            tex_coords: Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
            faces: vec![Face::triangle(0, 1, 2), Face::triangle(0, 2, 3)],
            bones: vec![ImportedBone {
                name: "Root".to_owned(),
                offset: IDENTITY_ROWS,
                weights: vec![VertexWeight {
                    vertex: 0,
                    weight: 0.75,
                }],
            }],
            ..Default::default()
        };

        generate_flat_normals(&mut mesh);

        assert_eq!(mesh.positions.len(), 6);
        assert_eq!(mesh.faces, vec![Face::triangle(0, 1, 2), Face::triangle(3, 4, 5)]);
        assert_eq!(mesh.tex_coords.as_ref().map(Vec::len), Some(6));

        let normals = mesh.normals.as_ref().expect("normals generated");
        assert_eq!(normals[0], [0.0, 0.0, 1.0]);
        assert_ne!(normals[3], normals[0]);

        // Vertex 0 now exists twice, once per face.
        let weights: Vec<u32> = mesh.bones[0].weights.iter().map(|w| w.vertex).collect();
        assert_eq!(weights, vec![0, 3]);
    }

    #[test]
    fn existing_normals_are_kept() {
        let mut scene = ImportedScene {
            meshes: vec![ImportedMesh {
                normals: Some(vec![[1.0, 0.0, 0.0]; 4]),
                ..quad()
            }],
            ..Default::default()
        };

        apply(&mut scene, ImportFlags::smooth_triangulated());

        assert_eq!(scene.meshes[0].faces.len(), 2);
        assert_eq!(scene.meshes[0].normals, Some(vec![[1.0, 0.0, 0.0]; 4]));
    }
}
