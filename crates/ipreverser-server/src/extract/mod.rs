//! Custom request extractors.
//!
//! - [`ClientIp`]: the caller's address, resolved from forwarding headers and
//!   the connection's socket address.

mod client_ip;

pub use client_ip::{ClientIp, HeaderSource};
