use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use gltf::{buffer::Data, mesh::Mode};

use crate::{
    error::DecodeError,
    scene::{
        Face, ImportedBone, ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene,
        TextureChannel, VertexWeight,
    },
    skin::IDENTITY_ROWS,
};

/// Reads a glTF 2.0 file (`.gltf` or `.glb`).
///
/// Images are not decoded here; materials only record texture URIs so the
/// texture resolver can load them like any other file. Every primitive
/// becomes its own imported mesh.
pub fn parse_gltf(path: &Path) -> Result<ImportedScene, DecodeError> {
    let base_path = path.parent().unwrap_or(Path::new("./"));

    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&document, Some(base_path), blob)?;

    let mut materials: Vec<ImportedMaterial> =
        document.materials().map(|mat| convert_material(&mat)).collect();

    // Primitives without a material point here.
    let default_material = materials.len();
    materials.push(ImportedMaterial::new("DefaultMaterial"));

    let mut scene = ImportedScene {
        materials,
        ..Default::default()
    };

    let Some(gltf_scene) = document.default_scene().or_else(|| document.scenes().next()) else {
        log::warn!("{}: file contains no scene", path.display());
        return Ok(scene);
    };

    let mut context = NodeContext {
        buffers: &buffers,
        default_material,
        meshes: Vec::new(),
    };

    let mut root = ImportedNode::new(gltf_scene.name().unwrap_or_default());
    for node in gltf_scene.nodes() {
        root.children.push(context.convert_node(&node));
    }

    scene.meshes = context.meshes;
    scene.root = Some(root);
    Ok(scene)
}

fn convert_material(material: &gltf::Material<'_>) -> ImportedMaterial {
    let mut imported = ImportedMaterial::new(material.name().unwrap_or_default());
    let pbr = material.pbr_metallic_roughness();

    let channels = [
        (
            TextureChannel::Diffuse,
            pbr.base_color_texture().map(|info| info.texture()),
        ),
        (
            TextureChannel::Normals,
            material.normal_texture().map(|info| info.texture()),
        ),
        (
            TextureChannel::Emissive,
            material.emissive_texture().map(|info| info.texture()),
        ),
        (
            TextureChannel::Occlusion,
            material.occlusion_texture().map(|info| info.texture()),
        ),
    ];

    for (channel, texture) in channels {
        if let Some(path) = texture.and_then(|texture| texture_path(&texture)) {
            imported.add_texture(channel, path);
        }
    }

    imported
}

/// Only external image files have a path; embedded images are skipped.
fn texture_path(texture: &gltf::Texture<'_>) -> Option<PathBuf> {
    match texture.source().source() {
        gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => {
            Some(PathBuf::from(percent_decode(uri)))
        }
        _ => {
            log::debug!(
                "Texture {} uses an embedded image, which has no file path",
                texture.index()
            );
            None
        }
    }
}

/// URIs that do not decode to UTF-8 are used as written.
fn percent_decode(uri: &str) -> String {
    urlencoding::decode(uri)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| uri.to_owned())
}

struct NodeContext<'a> {
    buffers: &'a [Data],
    default_material: usize,
    meshes: Vec<ImportedMesh>,
}

impl NodeContext<'_> {
    fn convert_node(&mut self, node: &gltf::Node<'_>) -> ImportedNode {
        let mut imported = ImportedNode::new(node.name().unwrap_or_default());

        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if let Some(converted) = self.convert_primitive(&mesh, &primitive, node.skin()) {
                    imported.meshes.push(self.meshes.len());
                    self.meshes.push(converted);
                }
            }
        }

        for child in node.children() {
            imported.children.push(self.convert_node(&child));
        }

        imported
    }

    fn convert_primitive(
        &self,
        mesh: &gltf::Mesh<'_>,
        primitive: &gltf::Primitive<'_>,
        skin: Option<gltf::Skin<'_>>,
    ) -> Option<ImportedMesh> {
        let name = mesh.name().unwrap_or_default();
        let buffers = self.buffers;
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

        let Some(positions) = reader.read_positions() else {
            log::warn!("Mesh '{}': primitive without positions skipped", name);
            return None;
        };
        let positions: Vec<[f32; 3]> = positions.collect();

        let normals = reader.read_normals().map(|iter| iter.collect());

        let tex_coords = reader
            .read_tex_coords(0)
            .map(|read| read.into_f32().collect());

        let indices: Vec<u32> = reader
            .read_indices()
            .map(|read| read.into_u32().collect())
            .unwrap_or_else(|| (0..positions.len() as u32).collect());

        let Some(faces) = triangle_faces(primitive.mode(), &indices) else {
            log::warn!(
                "Mesh '{}': {:?} primitive skipped, only triangles are imported",
                name,
                primitive.mode()
            );
            return None;
        };

        // Weights are stored per vertex in glTF, bones want them per joint.
        // Vertices with more than four influences spill into JOINTS_1.. sets.
        let mut bones = skin.map(|skin| self.skin_bones(&skin)).unwrap_or_default();
        let mut set = 0;
        while let (Some(joints), Some(weights)) =
            (reader.read_joints(set), reader.read_weights(set))
        {
            set += 1;
            for (vertex, (joint_set, weight_set)) in
                joints.into_u16().zip(weights.into_f32()).enumerate()
            {
                for (joint, weight) in joint_set.into_iter().zip(weight_set) {
                    if weight <= 0.0 {
                        continue;
                    }
                    if let Some(bone) = bones.get_mut(joint as usize) {
                        bone.weights.push(VertexWeight {
                            vertex: vertex as u32,
                            weight,
                        });
                    }
                }
            }
        }

        Some(ImportedMesh {
            name: name.to_owned(),
            positions,
            normals,
            tex_coords,
            faces,
            bones,
            material_index: primitive
                .material()
                .index()
                .unwrap_or(self.default_material),
        })
    }

    /// One bone per joint, in joint order, with no weights yet.
    fn skin_bones(&self, skin: &gltf::Skin<'_>) -> Vec<ImportedBone> {
        let buffers = self.buffers;
        let reader = skin.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));
        let inverse_binds: Vec<[[f32; 4]; 4]> = reader
            .read_inverse_bind_matrices()
            .map(|iter| iter.collect())
            .unwrap_or_default();

        skin.joints()
            .enumerate()
            .map(|(i, joint)| ImportedBone {
                name: joint
                    .name()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("joint_{}", joint.index())),
                offset: inverse_binds
                    .get(i)
                    .map(transpose)
                    .unwrap_or(IDENTITY_ROWS),
                weights: Vec::new(),
            })
            .collect()
    }
}

/// glTF matrices are column-major; imported bones carry rows.
fn transpose(columns: &[[f32; 4]; 4]) -> [[f32; 4]; 4] {
    std::array::from_fn(|row| std::array::from_fn(|col| columns[col][row]))
}

fn triangle_faces(mode: Mode, indices: &[u32]) -> Option<Vec<Face>> {
    let faces = match mode {
        Mode::Triangles => indices
            .chunks_exact(3)
            .map(|tri| Face::triangle(tri[0], tri[1], tri[2]))
            .collect(),
        // Every other strip triangle is flipped to keep the winding.
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .map(|(i, tri)| {
                if i % 2 == 0 {
                    Face::triangle(tri[0], tri[1], tri[2])
                } else {
                    Face::triangle(tri[1], tri[0], tri[2])
                }
            })
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((&center, rest)) => rest
                .windows(2)
                .map(|pair| Face::triangle(center, pair[0], pair[1]))
                .collect(),
            None => Vec::new(),
        },
        Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip => return None,
    };
    Some(faces)
}
