//! Core types and errors for SNET (IPv4 subnet calculator)
//!
//! This crate provides the foundational types shared by the SNET crates:
//! - [`Octets`] - A four-octet IPv4 address or mask
//! - [`SnetError`] - Error types
//!
//! ```
//! use snet_core::Octets;
//!
//! let mask = Octets([255, 255, 255, 0]);
//! assert_eq!(mask.to_string(), "255.255.255.0");
//! ```

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Four ordered octets of an IPv4 address or subnet mask
///
/// The most significant octet comes first, as written in dotted-quad form.
///
/// # Examples
///
/// ```
/// use snet_core::Octets;
///
/// let addr = Octets([192, 168, 1, 10]);
/// assert_eq!(addr.to_u32(), 0xC0A8010A);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Octets(pub [u8; 4]);

impl Octets {
    /// Pack the octets into a big-endian u32
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Render as a 32 character bit string, most significant octet first
    pub fn to_bit_string(self) -> String {
        format!(
            "{:08b}{:08b}{:08b}{:08b}",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for Octets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl From<[u8; 4]> for Octets {
    fn from(value: [u8; 4]) -> Self {
        Octets(value)
    }
}

impl From<u32> for Octets {
    fn from(value: u32) -> Self {
        Octets(value.to_be_bytes())
    }
}

impl Serialize for Octets {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Broad classes of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input string does not match the dotted-quad or CIDR grammar
    Format,
    /// Mask bits are not contiguous and left-justified
    Mask,
    /// Missing or contradictory flags
    Usage,
    /// A constructor was handed input the validator would have rejected
    Parse,
}

/// Error types for SNET operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnetError {
    /// CIDR argument failed validation
    #[error("Address with CIDR (-c) is not in the format x.x.x.x/x or is out of range.")]
    CidrFormat,

    /// Address or mask argument failed validation
    #[error("Network Address or Subnet Mask is not in the format x.x.x.x or is out of range")]
    AddressFormat,

    /// Mask is well formed but not canonical
    #[error("Subnet Mask is not valid.")]
    InvalidMask,

    /// Only one of address and mask was given
    #[error("Subnet Mask (-m) must be specified with a Network Address (-a)")]
    UnpairedMask,

    /// No network was given at all
    #[error("The snet command requires flag arguments.")]
    MissingArguments,

    /// Malformed input reached a constructor
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SnetError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SnetError::CidrFormat | SnetError::AddressFormat => ErrorKind::Format,
            SnetError::InvalidMask => ErrorKind::Mask,
            SnetError::UnpairedMask | SnetError::MissingArguments => ErrorKind::Usage,
            SnetError::Parse(_) => ErrorKind::Parse,
        }
    }
}

/// Result type alias for SNET operations
pub type Result<T> = std::result::Result<T, SnetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octets_display() {
        let octets = Octets([10, 0, 0, 255]);
        assert_eq!(format!("{}", octets), "10.0.0.255");
    }

    #[test]
    fn test_octets_to_u32() {
        assert_eq!(Octets([192, 168, 1, 0]).to_u32(), 0xC0A80100);
        assert_eq!(Octets([0, 0, 0, 0]).to_u32(), 0);
    }

    #[test]
    fn test_octets_from_u32() {
        let octets: Octets = 0xFFFFFF00u32.into();
        assert_eq!(octets, Octets([255, 255, 255, 0]));
    }

    #[test]
    fn test_bit_string() {
        assert_eq!(
            Octets([255, 240, 0, 1]).to_bit_string(),
            "11111111111100000000000000000001"
        );
    }

    #[test]
    fn test_octets_serialization() {
        let json = serde_json::to_string(&Octets([255, 255, 0, 0])).expect("serialization failed");
        assert_eq!(json, "\"255.255.0.0\"");
    }

    #[test]
    fn test_error_display() {
        let err = SnetError::InvalidMask;
        assert_eq!(format!("{}", err), "Subnet Mask is not valid.");

        let err = SnetError::Parse("octet 'x'".to_string());
        assert_eq!(format!("{}", err), "Parse error: octet 'x'");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(SnetError::CidrFormat.kind(), ErrorKind::Format);
        assert_eq!(SnetError::AddressFormat.kind(), ErrorKind::Format);
        assert_eq!(SnetError::InvalidMask.kind(), ErrorKind::Mask);
        assert_eq!(SnetError::UnpairedMask.kind(), ErrorKind::Usage);
        assert_eq!(SnetError::MissingArguments.kind(), ErrorKind::Usage);
        assert_eq!(SnetError::Parse(String::new()).kind(), ErrorKind::Parse);
    }
}
