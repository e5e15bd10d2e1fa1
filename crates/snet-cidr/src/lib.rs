//! IPv4 subnet arithmetic and input validation
//!
//! Provides the per-octet calculations behind the `snet` calculator:
//! - Validate dotted-quad and CIDR input ([`validate`])
//! - Build a [`Net4`] from an address and mask, or from CIDR notation
//! - Derive network, broadcast, usable range and prefix length
//! - Check that a mask is canonical before anything is rendered
//!
//! # Examples
//!
//! ```
//! use snet_cidr::Net4;
//!
//! let net = Net4::from_cidr("192.168.1.10/24").unwrap();
//! let summary = net.validate().unwrap();
//! assert_eq!(summary.network.to_string(), "192.168.1.0");
//! assert_eq!(summary.useable.to_string(), "192.168.1.1-254");
//! assert_eq!(summary.cidr, 24);
//! ```

use serde::{Serialize, Serializer};
use snet_core::{Octets, Result, SnetError};
use std::fmt;
use tracing::debug;

pub mod validate;

pub use validate::{is_cidr, is_dotted_quad};

/// An IPv4 address paired with a subnet mask
///
/// The mask is stored as given, so a `Net4` may hold a non-canonical mask.
/// Call [`Net4::is_mask_valid`] or [`Net4::validate`] before relying on
/// the derived values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Net4 {
    address: Octets,
    mask: Octets,
}

impl Net4 {
    /// Create a descriptor from already parsed octets
    pub fn new(address: Octets, mask: Octets) -> Self {
        Self { address, mask }
    }

    /// Build from a dotted-quad address and a dotted-quad mask
    ///
    /// Input is expected to have passed [`is_dotted_quad`]. Anything else
    /// is reported as [`SnetError::Parse`].
    ///
    /// # Examples
    ///
    /// ```
    /// use snet_cidr::Net4;
    ///
    /// let net = Net4::from_address_and_mask("10.1.2.3", "255.255.0.0").unwrap();
    /// assert_eq!(net.prefix_len(), 16);
    /// ```
    pub fn from_address_and_mask(address: &str, mask: &str) -> Result<Self> {
        let address = parse_quad(address)?;
        let mask = parse_quad(mask)?;
        debug!(%address, %mask, "built network from address and mask");
        Ok(Self { address, mask })
    }

    /// Build from CIDR notation, expanding the prefix length into a mask
    ///
    /// Input is expected to have passed [`is_cidr`].
    ///
    /// # Examples
    ///
    /// ```
    /// use snet_cidr::Net4;
    ///
    /// let net = Net4::from_cidr("172.16.5.4/20").unwrap();
    /// assert_eq!(net.mask().to_string(), "255.255.240.0");
    /// ```
    pub fn from_cidr(cidr: &str) -> Result<Self> {
        let (address, prefix) = cidr
            .split_once('/')
            .ok_or_else(|| SnetError::Parse(format!("missing '/' in {}", cidr)))?;

        let prefix_len: u8 = prefix
            .parse()
            .map_err(|_| SnetError::Parse(format!("invalid prefix length: {}", prefix)))?;

        let address = parse_quad(address)?;
        let mask = mask_from_prefix(prefix_len)?;
        debug!(%address, %mask, prefix_len, "built network from CIDR");
        Ok(Self { address, mask })
    }

    /// Host address as given
    pub fn address(&self) -> Octets {
        self.address
    }

    /// Subnet mask as given
    pub fn mask(&self) -> Octets {
        self.mask
    }

    /// Check that the mask's 1-bits are contiguous and left-justified
    ///
    /// Reading the mask as 32 bits, once a 0 appears every later bit must
    /// be 0 too. All-ones and all-zeros both qualify.
    pub fn is_mask_valid(&self) -> bool {
        let bits = self.mask.to_u32();
        bits.leading_ones() + bits.trailing_zeros() == 32
    }

    /// Number of set bits across the mask, whether or not it is canonical
    pub fn prefix_len(&self) -> u8 {
        self.mask.0.iter().map(|m| m.count_ones() as u8).sum()
    }

    /// Lowest address of the subnet
    pub fn network(&self) -> Octets {
        let mut network = [0u8; 4];
        for (i, octet) in network.iter_mut().enumerate() {
            *octet = network_octet(self.address.0[i], self.mask.0[i]);
        }
        Octets(network)
    }

    /// Highest address of the subnet
    pub fn broadcast(&self) -> Octets {
        let mut broadcast = [0u8; 4];
        for (i, octet) in broadcast.iter_mut().enumerate() {
            let (addr, mask) = (self.address.0[i], self.mask.0[i]);
            *octet = match mask {
                255 => addr,
                0 => 255,
                _ => (u16::from(network_octet(addr, mask)) + block_size(mask) - 1) as u8,
            };
        }
        Octets(broadcast)
    }

    /// Usable hosts, shown per octet
    ///
    /// Only the last octet excludes the network and broadcast values; the
    /// other octets show the full network-to-broadcast span. When the last
    /// octet leaves fewer than two usable hosts the range is
    /// [`UsableRange::NotApplicable`].
    pub fn usable_range(&self) -> UsableRange {
        let na = self.network().0;
        let bc = self.broadcast().0;

        if i16::from(na[3]) + 1 >= i16::from(bc[3]) - 1 {
            return UsableRange::NotApplicable;
        }

        let mut spans = [OctetSpan::Single(0); 4];
        for (i, span) in spans.iter_mut().enumerate() {
            *span = if na[i] == bc[i] {
                OctetSpan::Single(na[i])
            } else if i == 3 {
                OctetSpan::Range(na[i] + 1, bc[i] - 1)
            } else {
                OctetSpan::Range(na[i], bc[i])
            };
        }
        UsableRange::Span(spans)
    }

    /// Compute every derived value, refusing non-canonical masks
    ///
    /// # Errors
    ///
    /// Returns [`SnetError::InvalidMask`] without computing anything else
    /// when the mask fails [`Net4::is_mask_valid`].
    pub fn validate(&self) -> Result<SubnetSummary> {
        if !self.is_mask_valid() {
            debug!(mask = %self.mask, "mask bits are not contiguous");
            return Err(SnetError::InvalidMask);
        }

        Ok(SubnetSummary {
            network: self.network(),
            useable: self.usable_range(),
            broadcast: self.broadcast(),
            mask: self.mask,
            cidr: self.prefix_len(),
        })
    }
}

/// Expand a prefix length into a canonical mask
///
/// Octets are filled left to right: 255 while at least 8 bits remain,
/// then the high bits of the next octet, then zeros.
///
/// # Examples
///
/// ```
/// use snet_cidr::mask_from_prefix;
///
/// assert_eq!(mask_from_prefix(26).unwrap().to_string(), "255.255.255.192");
/// assert!(mask_from_prefix(33).is_err());
/// ```
pub fn mask_from_prefix(prefix_len: u8) -> Result<Octets> {
    if prefix_len > 32 {
        return Err(SnetError::Parse(format!(
            "prefix length {} exceeds 32",
            prefix_len
        )));
    }

    let mut remaining = prefix_len;
    let mut mask = [0u8; 4];
    for octet in mask.iter_mut() {
        if remaining >= 8 {
            *octet = 255;
            remaining -= 8;
        } else {
            *octet = !(0xFFu8 >> remaining);
            remaining = 0;
        }
    }
    Ok(Octets(mask))
}

fn parse_quad(quad: &str) -> Result<Octets> {
    let groups: Vec<&str> = quad.split('.').collect();
    if groups.len() != 4 {
        return Err(SnetError::Parse(format!(
            "expected 4 octets in {}, found {}",
            quad,
            groups.len()
        )));
    }

    let mut octets = [0u8; 4];
    for (octet, group) in octets.iter_mut().zip(&groups) {
        *octet = group
            .parse()
            .map_err(|_| SnetError::Parse(format!("invalid octet: {}", group)))?;
    }
    Ok(Octets(octets))
}

// Addresses covered by one step of a partial mask octet.
fn block_size(mask: u8) -> u16 {
    256 - u16::from(mask)
}

fn network_octet(addr: u8, mask: u8) -> u8 {
    match mask {
        255 => addr,
        0 => 0,
        _ => {
            let addr = u16::from(addr);
            (addr - addr % block_size(mask)) as u8
        }
    }
}

/// One octet of a usable range: a shared value or an inclusive span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OctetSpan {
    Single(u8),
    Range(u8, u8),
}

impl fmt::Display for OctetSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OctetSpan::Single(v) => write!(f, "{}", v),
            OctetSpan::Range(lo, hi) => write!(f, "{}-{}", lo, hi),
        }
    }
}

/// Usable host range of a subnet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsableRange {
    /// Fewer than two usable hosts in the last octet (e.g. /31, /32)
    NotApplicable,
    /// Per-octet spans, most significant first
    Span([OctetSpan; 4]),
}

impl fmt::Display for UsableRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsableRange::NotApplicable => write!(f, "N/A"),
            UsableRange::Span(s) => write!(f, "{}.{}.{}.{}", s[0], s[1], s[2], s[3]),
        }
    }
}

impl Serialize for UsableRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Derived values of a network with a canonical mask
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetSummary {
    pub network: Octets,
    pub useable: UsableRange,
    pub broadcast: Octets,
    pub mask: Octets,
    pub cidr: u8,
}
