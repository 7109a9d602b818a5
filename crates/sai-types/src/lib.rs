//! Foundational value types for the SAI control plane.
//!
//! This crate provides the small, widely shared primitives the ACL and UDF
//! subsystems build on:
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`Ipv4Address`] / [`Ipv6Address`]: IP addresses used as match data and
//!   match masks in ACL filters

mod ip;
mod mac;

pub use ip::{Ipv4Address, Ipv6Address};
pub use mac::MacAddress;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid IP address format: {0}")]
    InvalidIpAddress(String),
}
