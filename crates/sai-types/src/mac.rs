//! MAC address type with safe parsing and formatting.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address.
///
/// ACL filters carry MAC addresses both as match data and as match masks,
/// so the all-ones and all-zeros values have dedicated constants. Address
/// classification (multicast, locally administered, ...) is a forwarding
/// concern and is not modeled here.
///
/// # Examples
///
/// ```
/// use sai_types::MacAddress;
///
/// let mac: MacAddress = "00:11:22:33:44:55".parse().unwrap();
/// assert_eq!(mac.to_string(), "00:11:22:33:44:55");
///
/// // Hyphen-separated form is accepted as well
/// let mac2: MacAddress = "00-11-22-33-44-55".parse().unwrap();
/// assert_eq!(mac, mac2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// The all-ones address (ff:ff:ff:ff:ff:ff), used as the exact-match mask.
    pub const BROADCAST: MacAddress = MacAddress([0xff; 6]);

    /// The all-zeros address (00:00:00:00:00:00).
    pub const ZERO: MacAddress = MacAddress([0; 6]);

    /// Creates a new MAC address from raw bytes.
    pub const fn new(octets: [u8; 6]) -> Self {
        MacAddress(octets)
    }

    /// Returns the raw bytes of the MAC address.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for octet in self.0 {
            write!(f, "{}{:02x}", sep, octet)?;
            sep = ":";
        }
        Ok(())
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseError::InvalidMacAddress(s.to_string());

        // Six two-digit hex octets, ':' or '-' separated.
        let mut octets = [0u8; 6];
        let mut filled = 0;
        for piece in s.split([':', '-']) {
            if filled == octets.len() || piece.len() != 2 {
                return Err(bad());
            }
            octets[filled] = u8::from_str_radix(piece, 16).map_err(|_| bad())?;
            filled += 1;
        }
        if filled != octets.len() {
            return Err(bad());
        }

        Ok(MacAddress(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> String {
        mac.to_string()
    }
}
