//! Root container and typed object lookup

use serde::{Deserialize, Serialize};

use crate::codec::ContainerError;
use crate::formats::animation::AnimationContainer;
use crate::formats::layout::RIG_CONTAINER_FORMAT;

/// Logical object types a root container can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    /// The animation container (skeletons, clips, bindings)
    AnimationContainer,

    /// Foreign payload carried through untouched
    Opaque,
}

impl ObjectType {
    /// Registered type name, as it appears in diagnostics and text output
    pub fn name(&self) -> &'static str {
        match self {
            ObjectType::AnimationContainer => "AnimationContainer",
            ObjectType::Opaque => "Opaque",
        }
    }
}

/// One top-level object with its graph-visible name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedObject {
    /// Object name (e.g., "Merged Animation Container")
    pub name: String,

    /// The typed payload
    pub body: ObjectBody,
}

/// Typed body of a top-level object.
///
/// Only animation containers are understood by this tooling; anything else is
/// carried as an opaque payload so foreign data survives a rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectBody {
    Animation(AnimationContainer),
    Opaque { type_name: String, data: Vec<u8> },
}

impl ObjectBody {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBody::Animation(_) => ObjectType::AnimationContainer,
            ObjectBody::Opaque { .. } => ObjectType::Opaque,
        }
    }
}

/// Top-level deserialized unit for one container file.
///
/// Owns every object reachable from it. Dropped normally when the owning run
/// ends; there is no teardown beyond that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootContainer {
    /// Container format version
    pub version: u32,

    /// Top-level objects, in file order
    pub objects: Vec<NamedObject>,
}

impl RootContainer {
    /// Create an empty root container at the current format version
    pub fn new() -> Self {
        Self {
            version: RIG_CONTAINER_FORMAT.version,
            objects: Vec::new(),
        }
    }

    /// Create a root container holding one animation container
    pub fn with_animation(name: impl Into<String>, container: AnimationContainer) -> Self {
        Self {
            version: RIG_CONTAINER_FORMAT.version,
            objects: vec![NamedObject {
                name: name.into(),
                body: ObjectBody::Animation(container),
            }],
        }
    }

    /// Find the first object of the given type
    pub fn find_object(&self, ty: ObjectType) -> Option<&NamedObject> {
        self.objects.iter().find(|o| o.body.object_type() == ty)
    }

    /// The animation container, or `TypeNotFound` if the graph has none
    pub fn animation_container(&self) -> Result<&AnimationContainer, ContainerError> {
        self.objects
            .iter()
            .find_map(|o| match &o.body {
                ObjectBody::Animation(container) => Some(container),
                _ => None,
            })
            .ok_or(ContainerError::TypeNotFound(
                ObjectType::AnimationContainer.name(),
            ))
    }

    /// Mutable access to the animation container
    pub fn animation_container_mut(&mut self) -> Result<&mut AnimationContainer, ContainerError> {
        self.objects
            .iter_mut()
            .find_map(|o| match &mut o.body {
                ObjectBody::Animation(container) => Some(container),
                _ => None,
            })
            .ok_or(ContainerError::TypeNotFound(
                ObjectType::AnimationContainer.name(),
            ))
    }

    /// Validate container structure
    ///
    /// Checks the format version and every animation record the graph holds.
    pub fn validate(&self) -> Result<(), ContainerError> {
        if self.version > RIG_CONTAINER_FORMAT.version {
            return Err(ContainerError::UnsupportedVersion {
                found: self.version,
                max: RIG_CONTAINER_FORMAT.version,
            });
        }
        for object in &self.objects {
            if let ObjectBody::Animation(container) = &object.body {
                if !container.validate() {
                    return Err(ContainerError::Malformed(format!(
                        "animation container '{}' has inconsistent records",
                        object.name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for RootContainer {
    fn default() -> Self {
        Self::new()
    }
}
