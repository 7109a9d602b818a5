//! ACL enums shared across the subsystem.

use std::fmt;
use std::str::FromStr;

/// Pipeline location a table is applied at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AclStage {
    #[default]
    Ingress,
    Egress,
}

impl fmt::Display for AclStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingress => write!(f, "INGRESS"),
            Self::Egress => write!(f, "EGRESS"),
        }
    }
}

impl FromStr for AclStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INGRESS" => Ok(Self::Ingress),
            "EGRESS" => Ok(Self::Egress),
            _ => Err(format!("Unknown ACL stage: {}", s)),
        }
    }
}

impl AclStage {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Ingress),
            1 => Some(Self::Egress),
            _ => None,
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Self::Ingress => 0,
            Self::Egress => 1,
        }
    }
}

/// What an ACL counter counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AclCounterType {
    /// Byte count only (the default).
    #[default]
    Bytes,
    /// Packet count only.
    Packets,
    /// Both packet and byte counts.
    BytesPackets,
}

impl AclCounterType {
    /// Number of 64-bit values an NPU read returns for this type.
    pub fn value_count(&self) -> usize {
        match self {
            Self::BytesPackets => 2,
            _ => 1,
        }
    }

    pub fn counts_bytes(&self) -> bool {
        matches!(self, Self::Bytes | Self::BytesPackets)
    }

    pub fn counts_packets(&self) -> bool {
        matches!(self, Self::Packets | Self::BytesPackets)
    }
}

impl fmt::Display for AclCounterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes => write!(f, "BYTES"),
            Self::Packets => write!(f, "PACKETS"),
            Self::BytesPackets => write!(f, "BYTES_PACKETS"),
        }
    }
}

/// Kind of range an `AclRange` matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclRangeType {
    L4SrcPortRange,
    L4DstPortRange,
    OuterVlanRange,
    InnerVlanRange,
    PacketLengthRange,
}

impl AclRangeType {
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Self::L4SrcPortRange,
            1 => Self::L4DstPortRange,
            2 => Self::OuterVlanRange,
            3 => Self::InnerVlanRange,
            4 => Self::PacketLengthRange,
            _ => return None,
        })
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Self::L4SrcPortRange => 0,
            Self::L4DstPortRange => 1,
            Self::OuterVlanRange => 2,
            Self::InnerVlanRange => 3,
            Self::PacketLengthRange => 4,
        }
    }
}

impl fmt::Display for AclRangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L4SrcPortRange => write!(f, "L4_SRC_PORT_RANGE"),
            Self::L4DstPortRange => write!(f, "L4_DST_PORT_RANGE"),
            Self::OuterVlanRange => write!(f, "OUTER_VLAN_RANGE"),
            Self::InnerVlanRange => write!(f, "INNER_VLAN_RANGE"),
            Self::PacketLengthRange => write!(f, "PACKET_LENGTH_RANGE"),
        }
    }
}

/// How the members of a table group are searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AclGroupType {
    #[default]
    Sequential,
    Parallel,
}

impl AclGroupType {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Sequential),
            1 => Some(Self::Parallel),
            _ => None,
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Self::Sequential => 0,
            Self::Parallel => 1,
        }
    }
}

/// Where a table group can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclBindPointType {
    Port,
    Lag,
    Vlan,
    RouterInterface,
    Switch,
}

impl AclBindPointType {
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Self::Port,
            1 => Self::Lag,
            2 => Self::Vlan,
            3 => Self::RouterInterface,
            4 => Self::Switch,
            _ => return None,
        })
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Self::Port => 0,
            Self::Lag => 1,
            Self::Vlan => 2,
            Self::RouterInterface => 3,
            Self::Switch => 4,
        }
    }
}

impl fmt::Display for AclBindPointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Port => write!(f, "PORT"),
            Self::Lag => write!(f, "LAG"),
            Self::Vlan => write!(f, "VLAN"),
            Self::RouterInterface => write!(f, "ROUTER_INTERFACE"),
            Self::Switch => write!(f, "SWITCH"),
        }
    }
}
