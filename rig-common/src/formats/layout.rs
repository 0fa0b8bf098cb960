//! Encoding selection, layout rules, and the packed layout header
//!
//! # Packed layout (`.rigp`)
//! ```text
//! 0x00: magic "RIGP" (4 bytes)
//! 0x04: version u32 LE
//! 0x08: bytes_in_pointer u8 (4 or 8)
//! 0x09: little_endian u8 (1 = little-endian consumer layout)
//! 0x0A: reserved u16 LE (must be 0)
//! 0x0C: payload_len, stored in bytes_in_pointer bytes LE
//! then: payload
//! ```
//!
//! Header fields themselves are always little-endian; `little_endian` records
//! the byte order the relocatable payload was laid out for.

/// Container format specification.
///
/// Single source of truth for the format constants used by every encoder
/// and by load-time format detection.
#[derive(Debug, Clone, Copy)]
pub struct ContainerFormat {
    /// Format version for backward compatibility
    pub version: u32,

    /// Magic bytes at the start of a binary-tagged container (4 bytes)
    pub tagged_magic: &'static [u8; 4],

    /// Magic bytes at the start of a binary-packed container (4 bytes)
    pub packed_magic: &'static [u8; 4],

    /// Text-tagged file extension without dot (e.g., "rigt")
    pub text_ext: &'static str,

    /// Binary-tagged file extension (e.g., "rigb")
    pub tagged_ext: &'static str,

    /// Binary-packed file extension (e.g., "rigp")
    pub packed_ext: &'static str,
}

/// Rig container format specification.
pub const RIG_CONTAINER_FORMAT: ContainerFormat = ContainerFormat {
    version: 1,
    tagged_magic: b"RIGB",
    packed_magic: b"RIGP",
    text_ext: "rigt",
    tagged_ext: "rigb",
    packed_ext: "rigp",
};

/// Target encoding for a container write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Editable tagged text (pretty JSON)
    Text,
    /// Compact binary-tagged form, host-default layout
    Tagged,
    /// Layout-explicit packed binary form
    Packed(LayoutRules),
}

/// Pointer layout a packed container is written for.
///
/// The consuming runtime checks these before relocating the payload, so a
/// producer can target a pointer width other than its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRules {
    /// Pointer width in bytes (4 or 8)
    pub bytes_in_pointer: u8,

    /// Byte order of the consumer (true = little-endian)
    pub little_endian: bool,
}

impl LayoutRules {
    /// Layout rules matching the host process.
    pub fn host() -> Self {
        Self {
            bytes_in_pointer: std::mem::size_of::<usize>() as u8,
            little_endian: cfg!(target_endian = "little"),
        }
    }

    /// Host layout rules with the pointer width forced to 8 bytes.
    pub fn pointer64() -> Self {
        Self {
            bytes_in_pointer: 8,
            ..Self::host()
        }
    }

    /// Check that the pointer width is one a consumer can relocate
    pub fn validate(&self) -> bool {
        matches!(self.bytes_in_pointer, 4 | 8)
    }
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self::host()
    }
}

/// Packed container header (magic + version + layout + payload length).
#[derive(Debug, Clone, Copy)]
pub struct PackedHeader {
    /// Container format version
    pub version: u32,
    /// Pointer layout the payload was written for
    pub layout: LayoutRules,
    /// Payload length in bytes
    pub payload_len: u64,
}

impl PackedHeader {
    /// Size of the fixed header fields, before the pointer-width length field
    pub const FIXED_SIZE: usize = 12;

    pub fn new(layout: LayoutRules, payload_len: u64) -> Self {
        Self {
            version: RIG_CONTAINER_FORMAT.version,
            layout,
            payload_len,
        }
    }

    /// Total header size, including the pointer-width length field
    pub fn size(&self) -> usize {
        Self::FIXED_SIZE + self.layout.bytes_in_pointer as usize
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size());
        bytes.extend_from_slice(RIG_CONTAINER_FORMAT.packed_magic);
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.push(self.layout.bytes_in_pointer);
        bytes.push(self.layout.little_endian as u8);
        bytes.extend_from_slice(&0u16.to_le_bytes());
        match self.layout.bytes_in_pointer {
            4 => bytes.extend_from_slice(&(self.payload_len as u32).to_le_bytes()),
            _ => bytes.extend_from_slice(&self.payload_len.to_le_bytes()),
        }
        bytes
    }

    /// Read header from bytes
    ///
    /// Returns `None` if the slice is too short, the magic is wrong, or the
    /// layout fields are out of range.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::FIXED_SIZE {
            return None;
        }
        if &bytes[0..4] != RIG_CONTAINER_FORMAT.packed_magic {
            return None;
        }
        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let bytes_in_pointer = bytes[8];
        let little_endian = bytes[9];
        let reserved = u16::from_le_bytes([bytes[10], bytes[11]]);
        if little_endian > 1 || reserved != 0 {
            return None;
        }
        let payload_len = match bytes_in_pointer {
            4 => {
                if bytes.len() < Self::FIXED_SIZE + 4 {
                    return None;
                }
                u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as u64
            }
            8 => {
                if bytes.len() < Self::FIXED_SIZE + 8 {
                    return None;
                }
                u64::from_le_bytes([
                    bytes[12], bytes[13], bytes[14], bytes[15], bytes[16], bytes[17], bytes[18],
                    bytes[19],
                ])
            }
            _ => return None,
        };
        Some(Self {
            version,
            layout: LayoutRules {
                bytes_in_pointer,
                little_endian: little_endian == 1,
            },
            payload_len,
        })
    }
}
