//! Input grammar checks
//!
//! Pure predicates deciding whether a raw string is a dotted-quad
//! (`0-255.0-255.0-255.0-255`) or an address with a prefix length
//! (`0-255.0-255.0-255.0-255/0-32`). They never fail; a non-match is
//! simply `false` and the caller reports the problem.

/// Test whether `s` is four period-separated octets in range 0-255
///
/// An octet is one to three decimal digits, so leading zeros such as
/// `"010"` are accepted while `"0010"` is not.
///
/// # Examples
///
/// ```
/// use snet_cidr::validate::is_dotted_quad;
///
/// assert!(is_dotted_quad("255.255.255.0"));
/// assert!(!is_dotted_quad("256.0.0.0"));
/// ```
pub fn is_dotted_quad(s: &str) -> bool {
    let groups: Vec<&str> = s.split('.').collect();
    groups.len() == 4 && groups.iter().all(|g| is_octet(g))
}

/// Test whether `s` is a dotted-quad followed by `/` and a prefix length 0-32
///
/// # Examples
///
/// ```
/// use snet_cidr::validate::is_cidr;
///
/// assert!(is_cidr("10.0.0.1/24"));
/// assert!(!is_cidr("10.0.0.1/33"));
/// ```
pub fn is_cidr(s: &str) -> bool {
    match s.split_once('/') {
        Some((address, prefix)) => is_dotted_quad(address) && is_prefix_len(prefix),
        None => false,
    }
}

fn is_octet(group: &str) -> bool {
    (1..=3).contains(&group.len())
        && group.bytes().all(|b| b.is_ascii_digit())
        && group.parse::<u16>().is_ok_and(|v| v <= 255)
}

// One digit, or two digits without a leading zero.
fn is_prefix_len(group: &str) -> bool {
    let digits = group.as_bytes();
    match digits {
        [d] => d.is_ascii_digit(),
        [b'1'..=b'2', d] => d.is_ascii_digit(),
        [b'3', b'0'..=b'2'] => true,
        _ => false,
    }
}
