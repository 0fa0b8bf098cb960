//! Animation container: skeletons, clips, and bindings
//!
//! The three collections hold reference-counted records. Moving a clip or a
//! binding between containers appends another `Arc` reference; the payload is
//! never deep-copied.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Size of one sampled track transform in a clip payload (16 bytes)
pub const TRACK_KEYFRAME_SIZE: usize = 16;

/// Animation container object.
///
/// Holds bind-pose skeletons, sampled animation clips, and the bindings that
/// map clip tracks onto skeleton bones. Bindings are associated with clips
/// positionally within the owning container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationContainer {
    /// Bind-pose skeleton definitions
    pub skeletons: Vec<Arc<Skeleton>>,

    /// Animation clips, in order
    pub animations: Vec<Arc<AnimationClip>>,

    /// Skeleton-to-clip bindings, in order
    pub bindings: Vec<Arc<AnimationBinding>>,
}

impl AnimationContainer {
    /// Create an empty animation container
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every record in the container
    pub fn validate(&self) -> bool {
        self.skeletons.iter().all(|s| s.validate())
            && self.animations.iter().all(|a| a.validate())
            && self.bindings.iter().all(|b| b.validate())
    }
}

/// Bind-pose skeleton definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    /// Skeleton name (e.g., "c0101")
    pub name: String,

    /// Parent bone index per bone, -1 for roots
    pub parent_indices: Vec<i16>,

    /// Bone names, one per bone
    pub bone_names: Vec<String>,

    /// Reference pose, one 3x4 column-major matrix per bone
    pub reference_pose: Vec<[f32; 12]>,
}

impl Skeleton {
    /// Number of bones in the skeleton
    pub fn bone_count(&self) -> usize {
        self.bone_names.len()
    }

    /// Validate that the per-bone collections agree
    pub fn validate(&self) -> bool {
        !self.bone_names.is_empty()
            && self.parent_indices.len() == self.bone_names.len()
            && self.reference_pose.len() == self.bone_names.len()
    }
}

/// Sampled animation clip.
///
/// The payload is opaque to this crate: 16 bytes per transform track per
/// frame, stored sequentially [frame0_track0, frame0_track1, ..., frame1_track0, ...].
/// Nothing here decodes or resamples it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name (e.g., "idle", "cbbm_walk")
    pub name: String,

    /// Playback length in seconds
    pub duration_secs: f32,

    /// Number of transform tracks per frame
    pub track_count: u16,

    /// Number of sampled frames
    pub frame_count: u16,

    /// Raw sampled transforms (frame_count x track_count x 16 bytes)
    pub data: Vec<u8>,
}

impl AnimationClip {
    pub fn new(
        name: impl Into<String>,
        duration_secs: f32,
        track_count: u16,
        frame_count: u16,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            duration_secs,
            track_count,
            frame_count,
            data,
        }
    }

    /// Validate that the payload size matches the track and frame counts
    pub fn validate(&self) -> bool {
        let expected =
            self.track_count as usize * self.frame_count as usize * TRACK_KEYFRAME_SIZE;
        self.track_count > 0 && self.frame_count > 0 && self.data.len() == expected
    }
}

/// Links one clip's transform tracks onto the bones of a skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationBinding {
    /// Name of the skeleton the tracks were authored against
    pub skeleton_name: String,

    /// Bone index for each transform track
    pub track_to_bone_indices: Vec<u16>,

    /// How the bound clip combines with the pose underneath it
    #[serde(default)]
    pub blend_hint: BlendHint,
}

impl AnimationBinding {
    pub fn new(skeleton_name: impl Into<String>, track_to_bone_indices: Vec<u16>) -> Self {
        Self {
            skeleton_name: skeleton_name.into(),
            track_to_bone_indices,
            blend_hint: BlendHint::Normal,
        }
    }

    /// Validate the binding record
    pub fn validate(&self) -> bool {
        !self.track_to_bone_indices.is_empty()
    }
}

/// Blend behavior of a bound clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendHint {
    /// Tracks replace the underlying pose
    #[default]
    Normal,

    /// Tracks are added on top of the underlying pose
    Additive,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_skeleton() -> Skeleton {
        Skeleton {
            name: "biped".to_string(),
            parent_indices: vec![-1, 0, 1],
            bone_names: vec!["root".to_string(), "spine".to_string(), "head".to_string()],
            reference_pose: vec![[0.0; 12]; 3],
        }
    }

    #[test]
    fn test_skeleton_validate() {
        assert!(test_skeleton().validate());

        let mut skeleton = test_skeleton();
        skeleton.parent_indices.pop();
        assert!(!skeleton.validate());

        let mut skeleton = test_skeleton();
        skeleton.reference_pose.push([0.0; 12]);
        assert!(!skeleton.validate());
    }

    #[test]
    fn test_skeleton_bone_count() {
        assert_eq!(test_skeleton().bone_count(), 3);
    }

    #[test]
    fn test_clip_validate() {
        let clip = AnimationClip::new("walk", 1.0, 3, 10, vec![0u8; 3 * 10 * 16]);
        assert!(clip.validate());

        let short = AnimationClip::new("walk", 1.0, 3, 10, vec![0u8; 16]);
        assert!(!short.validate());

        let empty = AnimationClip::new("walk", 1.0, 0, 0, vec![]);
        assert!(!empty.validate());
    }

    #[test]
    fn test_binding_validate() {
        let binding = AnimationBinding::new("biped", vec![0, 1, 2]);
        assert!(binding.validate());
        assert_eq!(binding.blend_hint, BlendHint::Normal);

        let empty = AnimationBinding::new("biped", vec![]);
        assert!(!empty.validate());
    }

    #[test]
    fn test_container_validate() {
        let mut container = AnimationContainer::new();
        assert!(container.validate());

        container.skeletons.push(Arc::new(test_skeleton()));
        container
            .animations
            .push(Arc::new(AnimationClip::new("walk", 1.0, 3, 2, vec![0u8; 96])));
        container
            .bindings
            .push(Arc::new(AnimationBinding::new("biped", vec![0, 1, 2])));
        assert!(container.validate());

        container
            .animations
            .push(Arc::new(AnimationClip::new("bad", 1.0, 3, 2, vec![])));
        assert!(!container.validate());
    }

    #[test]
    fn test_shared_clip_is_not_copied() {
        let clip = Arc::new(AnimationClip::new("walk", 1.0, 1, 1, vec![0u8; 16]));
        let mut a = AnimationContainer::new();
        let mut b = AnimationContainer::new();
        a.animations.push(Arc::clone(&clip));
        b.animations.push(Arc::clone(&clip));
        assert_eq!(Arc::strong_count(&clip), 3);
        assert!(Arc::ptr_eq(&a.animations[0], &b.animations[0]));
    }
}
