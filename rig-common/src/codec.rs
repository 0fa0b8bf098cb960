//! Load/save codec for rig root containers
//!
//! `load_container` sniffs the encoding (packed magic, tagged magic, or tagged
//! text) and validates the decoded graph before handing it out.
//! `save_container` writes one of the three encodings. A failed save may leave
//! a truncated file behind; there is no temp-file-then-rename step here.

use std::path::Path;

use crate::formats::{Encoding, PackedHeader, RIG_CONTAINER_FORMAT, RootContainer};

/// Errors produced while loading, locating, or saving containers.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// File could not be read or written
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// No known magic and not tagged text
    #[error("unrecognized container format (no known magic and not tagged text)")]
    UnrecognizedFormat,

    /// Container was written by a newer tool
    #[error("unsupported container version {found} (max supported: {max})")]
    UnsupportedVersion { found: u32, max: u32 },

    /// Packed layout names a pointer width no consumer can relocate
    #[error("unsupported pointer width {0} (must be 4 or 8)")]
    UnsupportedPointerWidth(u8),

    /// Packed layout header is truncated or inconsistent
    #[error("truncated or malformed packed layout header")]
    BadPackedHeader,

    /// Payload failed to parse
    #[error("failed to decode container: {0}")]
    Decode(String),

    /// Payload failed to serialize
    #[error("failed to encode container: {0}")]
    Encode(String),

    /// Decoded graph violates a structural invariant
    #[error("malformed container: {0}")]
    Malformed(String),

    /// A required object type is absent from the loaded graph
    #[error("no {0} object in container")]
    TypeNotFound(&'static str),
}

/// Load a root container from disk, auto-detecting its encoding.
pub fn load_container(path: &Path) -> Result<RootContainer, ContainerError> {
    let bytes = std::fs::read(path)?;
    decode_container(&bytes)
}

/// Decode a root container from bytes, auto-detecting its encoding.
pub fn decode_container(bytes: &[u8]) -> Result<RootContainer, ContainerError> {
    let root = if bytes.starts_with(RIG_CONTAINER_FORMAT.tagged_magic) {
        decode_tagged(bytes)?
    } else if bytes.starts_with(RIG_CONTAINER_FORMAT.packed_magic) {
        decode_packed(bytes)?
    } else if looks_like_text(bytes) {
        serde_json::from_slice(bytes).map_err(|e| ContainerError::Decode(e.to_string()))?
    } else {
        return Err(ContainerError::UnrecognizedFormat);
    };
    root.validate()?;
    Ok(root)
}

/// Save a root container to disk in the requested encoding.
pub fn save_container(
    root: &RootContainer,
    path: &Path,
    encoding: Encoding,
) -> Result<(), ContainerError> {
    let bytes = encode_container(root, encoding)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Encode a root container in the requested encoding.
pub fn encode_container(
    root: &RootContainer,
    encoding: Encoding,
) -> Result<Vec<u8>, ContainerError> {
    match encoding {
        Encoding::Text => {
            let mut bytes = serde_json::to_vec_pretty(root)
                .map_err(|e| ContainerError::Encode(e.to_string()))?;
            bytes.push(b'\n');
            Ok(bytes)
        }
        Encoding::Tagged => {
            let mut bytes = RIG_CONTAINER_FORMAT.tagged_magic.to_vec();
            let payload =
                bitcode::serialize(root).map_err(|e| ContainerError::Encode(e.to_string()))?;
            bytes.extend(payload);
            Ok(bytes)
        }
        Encoding::Packed(layout) => {
            if !layout.validate() {
                return Err(ContainerError::UnsupportedPointerWidth(
                    layout.bytes_in_pointer,
                ));
            }
            let payload =
                bitcode::serialize(root).map_err(|e| ContainerError::Encode(e.to_string()))?;
            if layout.bytes_in_pointer == 4 && payload.len() > u32::MAX as usize {
                return Err(ContainerError::Encode(
                    "payload too large for a 4-byte pointer layout".to_string(),
                ));
            }
            let header = PackedHeader::new(layout, payload.len() as u64);
            let mut bytes = header.to_bytes();
            bytes.extend(payload);
            Ok(bytes)
        }
    }
}

fn decode_tagged(bytes: &[u8]) -> Result<RootContainer, ContainerError> {
    bitcode::deserialize(&bytes[RIG_CONTAINER_FORMAT.tagged_magic.len()..])
        .map_err(|e| ContainerError::Decode(e.to_string()))
}

fn decode_packed(bytes: &[u8]) -> Result<RootContainer, ContainerError> {
    // Report an out-of-range pointer width specifically; everything else wrong
    // with the header is BadPackedHeader.
    if bytes.len() >= PackedHeader::FIXED_SIZE && !matches!(bytes[8], 4 | 8) {
        return Err(ContainerError::UnsupportedPointerWidth(bytes[8]));
    }
    let header = PackedHeader::from_bytes(bytes).ok_or(ContainerError::BadPackedHeader)?;
    if header.version > RIG_CONTAINER_FORMAT.version {
        return Err(ContainerError::UnsupportedVersion {
            found: header.version,
            max: RIG_CONTAINER_FORMAT.version,
        });
    }
    let start = header.size();
    let end = start
        .checked_add(header.payload_len as usize)
        .ok_or(ContainerError::BadPackedHeader)?;
    if bytes.len() < end {
        return Err(ContainerError::Malformed(format!(
            "packed payload truncated: header names {} bytes, file has {}",
            header.payload_len,
            bytes.len() - start
        )));
    }
    bitcode::deserialize(&bytes[start..end]).map_err(|e| ContainerError::Decode(e.to_string()))
}

/// Text containers are JSON objects; the first non-whitespace byte is '{'.
fn looks_like_text(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{
        AnimationBinding, AnimationClip, AnimationContainer, LayoutRules, Skeleton,
    };
    use std::sync::Arc;

    fn test_root() -> RootContainer {
        let mut container = AnimationContainer::new();
        container.skeletons.push(Arc::new(Skeleton {
            name: "biped".to_string(),
            parent_indices: vec![-1, 0],
            bone_names: vec!["root".to_string(), "spine".to_string()],
            reference_pose: vec![[1.0; 12], [2.0; 12]],
        }));
        container.animations.push(Arc::new(AnimationClip::new(
            "walk",
            0.5,
            2,
            3,
            (0..96).collect(),
        )));
        container
            .bindings
            .push(Arc::new(AnimationBinding::new("biped", vec![0, 1])));
        RootContainer::with_animation("container", container)
    }

    #[test]
    fn test_text_roundtrip() {
        let root = test_root();
        let bytes = encode_container(&root, Encoding::Text).unwrap();
        let decoded = decode_container(&bytes).unwrap();
        assert_eq!(decoded, root);
    }

    #[test]
    fn test_tagged_roundtrip() {
        let root = test_root();
        let bytes = encode_container(&root, Encoding::Tagged).unwrap();
        assert_eq!(&bytes[0..4], RIG_CONTAINER_FORMAT.tagged_magic);

        let decoded = decode_container(&bytes).unwrap();
        assert_eq!(decoded, root);
    }

    #[test]
    fn test_packed_roundtrip() {
        let root = test_root();
        let bytes =
            encode_container(&root, Encoding::Packed(LayoutRules::pointer64())).unwrap();
        assert_eq!(&bytes[0..4], RIG_CONTAINER_FORMAT.packed_magic);
        assert_eq!(bytes[8], 8);

        let decoded = decode_container(&bytes).unwrap();
        assert_eq!(decoded, root);
    }

    #[test]
    fn test_packed_roundtrip_pointer32() {
        let root = test_root();
        let layout = LayoutRules {
            bytes_in_pointer: 4,
            little_endian: true,
        };
        let bytes = encode_container(&root, Encoding::Packed(layout)).unwrap();
        assert_eq!(bytes[8], 4);

        let decoded = decode_container(&bytes).unwrap();
        assert_eq!(decoded, root);
    }

    #[test]
    fn test_text_output_is_editable_json() {
        let bytes = encode_container(&test_root(), Encoding::Text).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.starts_with('{'));
        assert!(text.contains("\"skeletons\""));
        assert!(text.contains("\"biped\""));
    }

    #[test]
    fn test_text_detection_with_leading_whitespace() {
        let mut bytes = b"\n  ".to_vec();
        bytes.extend(encode_container(&test_root(), Encoding::Text).unwrap());
        let decoded = decode_container(&bytes).unwrap();
        assert_eq!(decoded, test_root());
    }

    #[test]
    fn test_unrecognized_format() {
        let result = decode_container(b"BAD!not a container");
        assert!(matches!(result, Err(ContainerError::UnrecognizedFormat)));
    }

    #[test]
    fn test_rejects_newer_version() {
        let mut root = test_root();
        root.version = RIG_CONTAINER_FORMAT.version + 1;
        // Encode without the load-time validation in the way
        let bytes = encode_container(&root, Encoding::Tagged).unwrap();
        assert!(matches!(
            decode_container(&bytes),
            Err(ContainerError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_rejects_unsupported_pointer_width() {
        let mut bytes =
            encode_container(&test_root(), Encoding::Packed(LayoutRules::pointer64())).unwrap();
        bytes[8] = 2;
        assert!(matches!(
            decode_container(&bytes),
            Err(ContainerError::UnsupportedPointerWidth(2))
        ));
    }

    #[test]
    fn test_rejects_truncated_packed_payload() {
        let bytes =
            encode_container(&test_root(), Encoding::Packed(LayoutRules::pointer64())).unwrap();
        assert!(matches!(
            decode_container(&bytes[..bytes.len() - 1]),
            Err(ContainerError::Malformed(_))
        ));
    }

    #[test]
    fn test_encode_rejects_invalid_layout() {
        let layout = LayoutRules {
            bytes_in_pointer: 2,
            little_endian: true,
        };
        assert!(matches!(
            encode_container(&test_root(), Encoding::Packed(layout)),
            Err(ContainerError::UnsupportedPointerWidth(2))
        ));
    }

    #[test]
    fn test_save_and_load_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("container.rigb");

        let root = test_root();
        save_container(&root, &path, Encoding::Tagged).unwrap();
        let loaded = load_container(&path).unwrap();
        assert_eq!(loaded, root);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_container(&dir.path().join("nope.rigb"));
        assert!(matches!(result, Err(ContainerError::Io(_))));
    }
}
