//! Shared types and codec for rig animation containers
//!
//! This crate provides the container object model shared between:
//! - `rig-repack` (conversion tool)
//! - any other pipeline tool that reads or writes rig containers
//!
//! # Modules
//!
//! - [`formats`] - container object model and persisted encodings
//! - [`codec`] - load/save for the text-tagged, binary-tagged, and packed forms

pub mod codec;
pub mod formats;

// Re-export the codec entry points
pub use codec::{ContainerError, decode_container, encode_container, load_container, save_container};

// Re-export commonly used format items
pub use formats::{
    AnimationBinding,
    AnimationClip,
    // Container types
    AnimationContainer,
    BlendHint,
    // Format constants
    ContainerFormat,
    Encoding,
    LayoutRules,
    NamedObject,
    ObjectBody,
    ObjectType,
    PackedHeader,
    RIG_CONTAINER_FORMAT,
    RootContainer,
    Skeleton,
    TRACK_KEYFRAME_SIZE,
};
