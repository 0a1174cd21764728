//! Skinning bookkeeping for a single mesh: bone numbering and the bounded
//! per-vertex influence list.

use std::collections::HashMap;

use glam::Mat4;

/// Number of bone influences a vertex can carry.
pub const MAX_BONE_INFLUENCES: usize = 4;

/// Bone id of an empty influence slot.
pub const NO_BONE: i32 = -1;

/// Row-major identity, the layout decoders hand bone offsets over in.
pub const IDENTITY_ROWS: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Converts a row-major matrix into glam's column-major `Mat4`.
pub fn mat4_from_rows(rows: &[[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(rows).transpose()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfo {
    pub id: i32,
    /// Inverse bind transform (mesh space -> bone space).
    pub offset: Mat4,
}

/// Maps bone names to mesh-local ids, assigned in first-seen order from 0.
#[derive(Debug, Clone, Default)]
pub struct BoneRegistry {
    bones: HashMap<String, BoneInfo>,
    counter: i32,
}

impl BoneRegistry {
    /// Returns the id of `name`, registering it with `offset` on first sight.
    ///
    /// The offset of an already known bone is left untouched.
    pub fn register(&mut self, name: &str, offset: [[f32; 4]; 4]) -> i32 {
        if let Some(info) = self.bones.get(name) {
            return info.id;
        }

        let id = self.counter;
        self.bones.insert(
            name.to_owned(),
            BoneInfo {
                id,
                offset: mat4_from_rows(&offset),
            },
        );
        self.counter += 1;
        id
    }

    pub fn id(&self, name: &str) -> Option<i32> {
        self.bones.get(name).map(|info| info.id)
    }

    pub fn get(&self, name: &str) -> Option<&BoneInfo> {
        self.bones.get(name)
    }

    /// Number of distinct bones seen so far.
    pub fn len(&self) -> usize {
        self.counter as usize
    }

    pub fn is_empty(&self) -> bool {
        self.counter == 0
    }

    pub fn clear(&mut self) {
        self.bones.clear();
        self.counter = 0;
    }
}

/// Fixed capacity (bone id, weight) slots of one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexInfluences {
    pub ids: [i32; MAX_BONE_INFLUENCES],
    pub weights: [f32; MAX_BONE_INFLUENCES],
}

impl Default for VertexInfluences {
    fn default() -> Self {
        Self {
            ids: [NO_BONE; MAX_BONE_INFLUENCES],
            weights: [0.0; MAX_BONE_INFLUENCES],
        }
    }
}

impl VertexInfluences {
    /// Writes the influence into the first empty slot.
    ///
    /// Returns `false` when every slot is taken; the influence is dropped and
    /// the existing slots stay as they are.
    pub fn insert(&mut self, bone_id: i32, weight: f32) -> bool {
        match self.ids.iter().position(|&id| id == NO_BONE) {
            Some(slot) => {
                self.ids[slot] = bone_id;
                self.weights[slot] = weight;
                true
            }
            None => false,
        }
    }

    /// Number of occupied slots.
    pub fn filled(&self) -> usize {
        self.ids.iter().filter(|&&id| id != NO_BONE).count()
    }

    pub fn is_full(&self) -> bool {
        self.filled() == MAX_BONE_INFLUENCES
    }

    /// Sum of the retained weights. Not renormalised, so it may differ from 1.
    pub fn weight_sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn bone_ids_follow_first_seen_order() {
        let mut bones = BoneRegistry::default();

        assert_eq!(bones.register("Hip", IDENTITY_ROWS), 0);
        assert_eq!(bones.register("Spine", IDENTITY_ROWS), 1);
        assert_eq!(bones.register("Hip", IDENTITY_ROWS), 0);
        assert_eq!(bones.register("Head", IDENTITY_ROWS), 2);

        assert_eq!(bones.len(), 3);
        assert_eq!(bones.id("Spine"), Some(1));
        assert_eq!(bones.id("Tail"), None);
    }

    #[test]
    fn reregistering_keeps_first_offset() {
        let mut translated = IDENTITY_ROWS;
        translated[0][3] = 5.0;

        let mut bones = BoneRegistry::default();
        bones.register("Arm", translated);
        bones.register("Arm", IDENTITY_ROWS);

        let offset = bones.get("Arm").map(|info| info.offset);
        assert_eq!(offset, Some(mat4_from_rows(&translated)));
    }

    #[test]
    fn row_major_offsets_are_transposed() {
        // Translation lives in the last column of a row-major matrix.
        let mut rows = IDENTITY_ROWS;
        rows[0][3] = 1.0;
        rows[1][3] = 2.0;
        rows[2][3] = 3.0;

        let matrix = mat4_from_rows(&rows);
        assert_eq!(matrix.w_axis, Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(
            matrix.transform_point3(glam::Vec3::ZERO),
            glam::Vec3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn empty_influences_use_sentinels() {
        let influences = VertexInfluences::default();

        assert_eq!(influences.ids, [NO_BONE; 4]);
        assert_eq!(influences.weights, [0.0; 4]);
        assert_eq!(influences.filled(), 0);
    }

    #[test]
    fn insert_fills_slots_in_order_and_rejects_overflow() {
        let mut influences = VertexInfluences::default();

        for (bone, weight) in [(3, 0.1), (1, 0.2), (7, 0.3), (2, 0.2)] {
            assert!(influences.insert(bone, weight));
        }
        assert!(influences.is_full());
        assert!(!influences.insert(9, 0.2));

        assert_eq!(influences.ids, [3, 1, 7, 2]);
        assert_eq!(influences.weights, [0.1, 0.2, 0.3, 0.2]);
        assert!((influences.weight_sum() - 0.8).abs() < 1e-6);
    }
}
