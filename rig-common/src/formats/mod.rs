//! Rig container object model and persisted encodings
//!
//! A root container is the top-level deserialized unit for one file. It can be
//! persisted three ways: text-tagged (editable JSON), binary-tagged (compact),
//! or binary-packed (layout-explicit, relocatable). Multi-byte header fields
//! are little-endian with explicit byte serialization.

pub mod animation;
pub mod container;
pub mod layout;

pub use animation::*;
pub use container::*;
pub use layout::*;
