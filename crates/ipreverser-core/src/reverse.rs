//! Octet reversal of dotted-quad IPv4 strings.
//!
//! [`reverse_ip`] checks only the *shape* of its input: four groups of one to
//! three ASCII digits. Out-of-range groups such as `999.1.1.1` are accepted and
//! reversed unchanged. [`is_valid_ip`] is the stricter predicate that also
//! bounds every octet to `0..=255`; it is not consulted by [`reverse_ip`].

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// Four dot-separated groups of 1-3 digits.
static DOTTED_QUAD_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("valid dotted quad shape pattern")
});

/// Four dot-separated octets, each in `0..=255`.
static DOTTED_QUAD_STRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("valid dotted quad octet pattern")
});

/// Reverses the octet order of a dotted-quad IPv4 address.
///
/// Accepts either a `&str` or an `Option<&str>`, so an absent value can be
/// passed through without unwrapping.
///
/// # Errors
///
/// Returns an [`InvalidInput`] error when the address is absent or empty, or
/// when it does not have the dotted-quad shape.
///
/// [`InvalidInput`]: crate::ErrorKind::InvalidInput
///
/// # Example
///
/// ```
/// use ipreverser_core::reverse_ip;
///
/// assert_eq!(reverse_ip("192.168.1.100").unwrap(), "100.1.168.192");
/// assert!(reverse_ip(None).is_err());
/// ```
pub fn reverse_ip<'a>(ip: impl Into<Option<&'a str>>) -> Result<String> {
    let ip = ip
        .into()
        .filter(|ip| !ip.is_empty())
        .ok_or_else(|| Error::invalid_input().with_message("IP address is required"))?;

    if !DOTTED_QUAD_SHAPE.is_match(ip) {
        return Err(Error::invalid_input().with_message("Invalid IP address format"));
    }

    let mut octets: Vec<&str> = ip.split('.').collect();
    octets.reverse();
    Ok(octets.join("."))
}

/// Returns whether `ip` is a dotted-quad IPv4 address with every octet in `0..=255`.
pub fn is_valid_ip(ip: &str) -> bool {
    DOTTED_QUAD_STRICT.is_match(ip)
}
