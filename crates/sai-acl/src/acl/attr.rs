//! ACL attribute id spaces and schemas.
//!
//! The id namespace is numeric and partitioned into per-object ranges. Table
//! and entry field attributes share offsets inside their FIELD sub-ranges,
//! which is what lets a rule-side user-defined field resolve to its
//! table-side UDF-group attribute by plain index arithmetic.

use sai_common::{AttrFlags, AttrSchema};
use std::fmt;

/// Number of user-defined field slots per table.
pub const UDF_SLOT_COUNT: u32 = 16;

// Table attribute ids.
pub const TABLE_ATTR_STAGE: u32 = 0x0000;
pub const TABLE_ATTR_PRIORITY: u32 = 0x0001;
pub const TABLE_ATTR_SIZE: u32 = 0x0002;
pub const TABLE_ATTR_GROUP_ID: u32 = 0x0003;
pub const TABLE_FIELD_START: u32 = 0x1000;
pub const TABLE_FIELD_END: u32 = 0x17ff;
pub const TABLE_UDF_GROUP_MIN: u32 = 0x2000;
pub const TABLE_UDF_GROUP_MAX: u32 = TABLE_UDF_GROUP_MIN + UDF_SLOT_COUNT - 1;

// Entry attribute ids.
pub const ENTRY_ATTR_TABLE_ID: u32 = 0x0000;
pub const ENTRY_ATTR_PRIORITY: u32 = 0x0001;
pub const ENTRY_ATTR_ADMIN_STATE: u32 = 0x0002;
pub const ENTRY_FIELD_START: u32 = 0x1000;
pub const ENTRY_FIELD_USER_DEFINED_MIN: u32 = 0x1800;
pub const ENTRY_FIELD_USER_DEFINED_MAX: u32 = ENTRY_FIELD_USER_DEFINED_MIN + UDF_SLOT_COUNT - 1;
pub const ENTRY_FIELD_END: u32 = 0x18ff;
pub const ENTRY_ACTION_START: u32 = 0x2000;
pub const ENTRY_ACTION_END: u32 = 0x20ff;

// Counter attribute ids.
pub const COUNTER_ATTR_TABLE_ID: u32 = 0x0000;
pub const COUNTER_ATTR_ENABLE_PACKET_COUNT: u32 = 0x0001;
pub const COUNTER_ATTR_ENABLE_BYTE_COUNT: u32 = 0x0002;
pub const COUNTER_ATTR_PACKETS: u32 = 0x0003;
pub const COUNTER_ATTR_BYTES: u32 = 0x0004;

// Range attribute ids.
pub const RANGE_ATTR_TYPE: u32 = 0x0000;
pub const RANGE_ATTR_LIMIT: u32 = 0x0001;

// Table-group attribute ids.
pub const TABLE_GROUP_ATTR_STAGE: u32 = 0x0000;
pub const TABLE_GROUP_ATTR_TYPE: u32 = 0x0001;
pub const TABLE_GROUP_ATTR_BIND_POINT_TYPE_LIST: u32 = 0x0002;

// Table-group-member attribute ids.
pub const TABLE_GROUP_MEMBER_ATTR_GROUP_ID: u32 = 0x0000;
pub const TABLE_GROUP_MEMBER_ATTR_TABLE_ID: u32 = 0x0001;
pub const TABLE_GROUP_MEMBER_ATTR_PRIORITY: u32 = 0x0002;

pub fn entry_field_attr_range(id: u32) -> bool {
    (ENTRY_FIELD_START..=ENTRY_FIELD_END).contains(&id)
}

pub fn entry_udf_field_attr_range(id: u32) -> bool {
    (ENTRY_FIELD_USER_DEFINED_MIN..=ENTRY_FIELD_USER_DEFINED_MAX).contains(&id)
}

pub fn entry_action_attr_range(id: u32) -> bool {
    (ENTRY_ACTION_START..=ENTRY_ACTION_END).contains(&id)
}

pub fn table_field_attr_range(id: u32) -> bool {
    (TABLE_FIELD_START..=TABLE_FIELD_END).contains(&id)
}

pub fn table_udf_group_attr_range(id: u32) -> bool {
    (TABLE_UDF_GROUP_MIN..=TABLE_UDF_GROUP_MAX).contains(&id)
}

/// Resolves a rule-side user-defined field attribute to the table-side
/// UDF-group attribute holding the group binding for the same slot.
pub fn entry_udf_field_to_table_udf_group(entry_attr: u32) -> Option<u32> {
    if entry_udf_field_attr_range(entry_attr) {
        Some(TABLE_UDF_GROUP_MIN + (entry_attr - ENTRY_FIELD_USER_DEFINED_MIN))
    } else {
        None
    }
}

/// Shape of a match value or action parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    U8,
    U16,
    U32,
    Enum,
    Mac,
    Ipv4,
    Ipv6,
    Oid,
    ObjectList,
    ByteList,
}

/// Match-field tags.
///
/// Regular fields share an offset between the table FIELD range and the
/// entry FIELD range; user-defined fields occupy the per-table slot space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclField {
    SrcIpv6,
    DstIpv6,
    SrcMac,
    DstMac,
    SrcIp,
    DstIp,
    InPorts,
    OutPorts,
    InPort,
    OutPort,
    SrcPort,
    DstPort,
    OuterVlanId,
    InnerVlanId,
    L4SrcPort,
    L4DstPort,
    EtherType,
    IpProtocol,
    Dscp,
    Ecn,
    Ttl,
    Tos,
    IpFlags,
    TcpFlags,
    IpType,
    IpFrag,
    Tc,
    IcmpType,
    IcmpCode,
    RangeList,
    /// User-defined field in per-table slot `0..UDF_SLOT_COUNT`.
    UserDefined(u8),
}

const FIELD_OFFSETS: &[(AclField, u32)] = &[
    (AclField::SrcIpv6, 0),
    (AclField::DstIpv6, 1),
    (AclField::SrcMac, 2),
    (AclField::DstMac, 3),
    (AclField::SrcIp, 4),
    (AclField::DstIp, 5),
    (AclField::InPorts, 6),
    (AclField::OutPorts, 7),
    (AclField::InPort, 8),
    (AclField::OutPort, 9),
    (AclField::SrcPort, 10),
    (AclField::DstPort, 11),
    (AclField::OuterVlanId, 12),
    (AclField::InnerVlanId, 13),
    (AclField::L4SrcPort, 14),
    (AclField::L4DstPort, 15),
    (AclField::EtherType, 16),
    (AclField::IpProtocol, 17),
    (AclField::Dscp, 18),
    (AclField::Ecn, 19),
    (AclField::Ttl, 20),
    (AclField::Tos, 21),
    (AclField::IpFlags, 22),
    (AclField::TcpFlags, 23),
    (AclField::IpType, 24),
    (AclField::IpFrag, 25),
    (AclField::Tc, 26),
    (AclField::IcmpType, 27),
    (AclField::IcmpCode, 28),
    (AclField::RangeList, 29),
];

impl AclField {
    fn offset(self) -> Option<u32> {
        FIELD_OFFSETS
            .iter()
            .find(|(f, _)| *f == self)
            .map(|(_, off)| *off)
    }

    fn from_offset(offset: u32) -> Option<Self> {
        FIELD_OFFSETS
            .iter()
            .find(|(_, off)| *off == offset)
            .map(|(f, _)| *f)
    }

    /// Entry-side attribute id for this field.
    pub fn entry_attr(self) -> u32 {
        match self {
            Self::UserDefined(slot) => ENTRY_FIELD_USER_DEFINED_MIN + slot as u32,
            other => {
                // Offsets cover every non-UDF variant.
                ENTRY_FIELD_START + other.offset().unwrap_or(0)
            }
        }
    }

    /// Table-side attribute id for this field. For user-defined fields this
    /// is the UDF-group attribute of the same slot.
    pub fn table_attr(self) -> u32 {
        match self {
            Self::UserDefined(slot) => TABLE_UDF_GROUP_MIN + slot as u32,
            other => TABLE_FIELD_START + other.offset().unwrap_or(0),
        }
    }

    pub fn from_entry_attr(id: u32) -> Option<Self> {
        if entry_udf_field_attr_range(id) {
            return Some(Self::UserDefined((id - ENTRY_FIELD_USER_DEFINED_MIN) as u8));
        }
        if !entry_field_attr_range(id) {
            return None;
        }
        Self::from_offset(id - ENTRY_FIELD_START)
    }

    pub fn from_table_attr(id: u32) -> Option<Self> {
        if table_udf_group_attr_range(id) {
            return Some(Self::UserDefined((id - TABLE_UDF_GROUP_MIN) as u8));
        }
        if !table_field_attr_range(id) {
            return None;
        }
        Self::from_offset(id - TABLE_FIELD_START)
    }

    /// Shape of the data and mask carried by this field.
    pub fn kind(self) -> ValueKind {
        match self {
            Self::SrcIpv6 | Self::DstIpv6 => ValueKind::Ipv6,
            Self::SrcMac | Self::DstMac => ValueKind::Mac,
            Self::SrcIp | Self::DstIp => ValueKind::Ipv4,
            Self::InPorts | Self::OutPorts | Self::RangeList => ValueKind::ObjectList,
            Self::InPort | Self::OutPort | Self::SrcPort | Self::DstPort => ValueKind::Oid,
            Self::OuterVlanId
            | Self::InnerVlanId
            | Self::L4SrcPort
            | Self::L4DstPort
            | Self::EtherType => ValueKind::U16,
            Self::IpProtocol
            | Self::Dscp
            | Self::Ecn
            | Self::Ttl
            | Self::Tos
            | Self::IpFlags
            | Self::TcpFlags
            | Self::Tc
            | Self::IcmpType
            | Self::IcmpCode => ValueKind::U8,
            Self::IpType | Self::IpFrag => ValueKind::Enum,
            Self::UserDefined(_) => ValueKind::ByteList,
        }
    }

    /// Fields whose match data is a list of port objects.
    pub fn is_port_list(self) -> bool {
        matches!(self, Self::InPorts | Self::OutPorts)
    }

    /// Fields whose match data is a single port object.
    pub fn is_single_port(self) -> bool {
        matches!(self, Self::InPort | Self::OutPort)
    }

    pub fn is_user_defined(self) -> bool {
        matches!(self, Self::UserDefined(_))
    }
}

impl fmt::Display for AclField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SrcIpv6 => write!(f, "SRC_IPV6"),
            Self::DstIpv6 => write!(f, "DST_IPV6"),
            Self::SrcMac => write!(f, "SRC_MAC"),
            Self::DstMac => write!(f, "DST_MAC"),
            Self::SrcIp => write!(f, "SRC_IP"),
            Self::DstIp => write!(f, "DST_IP"),
            Self::InPorts => write!(f, "IN_PORTS"),
            Self::OutPorts => write!(f, "OUT_PORTS"),
            Self::InPort => write!(f, "IN_PORT"),
            Self::OutPort => write!(f, "OUT_PORT"),
            Self::SrcPort => write!(f, "SRC_PORT"),
            Self::DstPort => write!(f, "DST_PORT"),
            Self::OuterVlanId => write!(f, "OUTER_VLAN_ID"),
            Self::InnerVlanId => write!(f, "INNER_VLAN_ID"),
            Self::L4SrcPort => write!(f, "L4_SRC_PORT"),
            Self::L4DstPort => write!(f, "L4_DST_PORT"),
            Self::EtherType => write!(f, "ETHER_TYPE"),
            Self::IpProtocol => write!(f, "IP_PROTOCOL"),
            Self::Dscp => write!(f, "DSCP"),
            Self::Ecn => write!(f, "ECN"),
            Self::Ttl => write!(f, "TTL"),
            Self::Tos => write!(f, "TOS"),
            Self::IpFlags => write!(f, "IP_FLAGS"),
            Self::TcpFlags => write!(f, "TCP_FLAGS"),
            Self::IpType => write!(f, "IP_TYPE"),
            Self::IpFrag => write!(f, "IP_FRAG"),
            Self::Tc => write!(f, "TC"),
            Self::IcmpType => write!(f, "ICMP_TYPE"),
            Self::IcmpCode => write!(f, "ICMP_CODE"),
            Self::RangeList => write!(f, "RANGE_LIST"),
            Self::UserDefined(slot) => write!(f, "USER_DEFINED_{}", slot),
        }
    }
}

/// Action tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclActionTag {
    PacketAction,
    Redirect,
    RedirectList,
    Counter,
    MirrorIngress,
    MirrorEgress,
    SetPolicer,
    IngressSamplePacket,
    EgressSamplePacket,
    SetTc,
    SetDscp,
    SetEcn,
    SetInnerVlanId,
    SetSrcMac,
    SetDstMac,
    SetPacketColor,
    SetMetaData,
}

const ACTION_OFFSETS: &[(AclActionTag, u32)] = &[
    (AclActionTag::PacketAction, 0),
    (AclActionTag::Redirect, 1),
    (AclActionTag::RedirectList, 2),
    (AclActionTag::Counter, 3),
    (AclActionTag::MirrorIngress, 4),
    (AclActionTag::MirrorEgress, 5),
    (AclActionTag::SetPolicer, 6),
    (AclActionTag::IngressSamplePacket, 7),
    (AclActionTag::EgressSamplePacket, 8),
    (AclActionTag::SetTc, 9),
    (AclActionTag::SetDscp, 10),
    (AclActionTag::SetEcn, 11),
    (AclActionTag::SetInnerVlanId, 12),
    (AclActionTag::SetSrcMac, 13),
    (AclActionTag::SetDstMac, 14),
    (AclActionTag::SetPacketColor, 15),
    (AclActionTag::SetMetaData, 16),
];

impl AclActionTag {
    pub fn entry_attr(self) -> u32 {
        let offset = ACTION_OFFSETS
            .iter()
            .find(|(a, _)| *a == self)
            .map(|(_, off)| *off)
            .unwrap_or(0);
        ENTRY_ACTION_START + offset
    }

    pub fn from_entry_attr(id: u32) -> Option<Self> {
        if !entry_action_attr_range(id) {
            return None;
        }
        let offset = id - ENTRY_ACTION_START;
        ACTION_OFFSETS
            .iter()
            .find(|(_, off)| *off == offset)
            .map(|(a, _)| *a)
    }

    /// Shape of the action parameter.
    pub fn kind(self) -> ValueKind {
        match self {
            Self::PacketAction | Self::SetPacketColor => ValueKind::Enum,
            Self::Redirect | Self::Counter | Self::SetPolicer => ValueKind::Oid,
            Self::IngressSamplePacket | Self::EgressSamplePacket => ValueKind::Oid,
            Self::RedirectList | Self::MirrorIngress | Self::MirrorEgress => ValueKind::ObjectList,
            Self::SetTc | Self::SetDscp | Self::SetEcn => ValueKind::U8,
            Self::SetInnerVlanId => ValueKind::U16,
            Self::SetSrcMac | Self::SetDstMac => ValueKind::Mac,
            Self::SetMetaData => ValueKind::U32,
        }
    }
}

impl fmt::Display for AclActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PacketAction => write!(f, "PACKET_ACTION"),
            Self::Redirect => write!(f, "REDIRECT"),
            Self::RedirectList => write!(f, "REDIRECT_LIST"),
            Self::Counter => write!(f, "COUNTER"),
            Self::MirrorIngress => write!(f, "MIRROR_INGRESS"),
            Self::MirrorEgress => write!(f, "MIRROR_EGRESS"),
            Self::SetPolicer => write!(f, "SET_POLICER"),
            Self::IngressSamplePacket => write!(f, "INGRESS_SAMPLEPACKET"),
            Self::EgressSamplePacket => write!(f, "EGRESS_SAMPLEPACKET"),
            Self::SetTc => write!(f, "SET_TC"),
            Self::SetDscp => write!(f, "SET_DSCP"),
            Self::SetEcn => write!(f, "SET_ECN"),
            Self::SetInnerVlanId => write!(f, "SET_INNER_VLAN_ID"),
            Self::SetSrcMac => write!(f, "SET_SRC_MAC"),
            Self::SetDstMac => write!(f, "SET_DST_MAC"),
            Self::SetPacketColor => write!(f, "SET_PACKET_COLOR"),
            Self::SetMetaData => write!(f, "SET_ACL_META_DATA"),
        }
    }
}

/// Schema for ACL table attributes.
pub struct TableSchema;

impl AttrSchema for TableSchema {
    fn flags(&self, id: u32) -> Option<AttrFlags> {
        match id {
            TABLE_ATTR_STAGE | TABLE_ATTR_PRIORITY => Some(AttrFlags::CREATE_ONLY_MANDATORY),
            TABLE_ATTR_SIZE | TABLE_ATTR_GROUP_ID => Some(AttrFlags::CREATE_ONLY),
            id if table_field_attr_range(id) && AclField::from_table_attr(id).is_some() => {
                Some(AttrFlags::CREATE_ONLY)
            }
            id if table_udf_group_attr_range(id) => Some(AttrFlags::CREATE_ONLY),
            _ => None,
        }
    }

    fn mandatory_ids(&self) -> &'static [u32] {
        &[TABLE_ATTR_STAGE, TABLE_ATTR_PRIORITY]
    }
}

/// Schema for ACL entry (rule) attributes.
pub struct EntrySchema;

impl AttrSchema for EntrySchema {
    fn flags(&self, id: u32) -> Option<AttrFlags> {
        match id {
            ENTRY_ATTR_TABLE_ID => Some(AttrFlags::CREATE_ONLY_MANDATORY),
            ENTRY_ATTR_PRIORITY | ENTRY_ATTR_ADMIN_STATE => Some(AttrFlags::CREATE_AND_SET),
            id if entry_field_attr_range(id) && AclField::from_entry_attr(id).is_some() => {
                Some(AttrFlags::CREATE_AND_SET)
            }
            id if entry_action_attr_range(id) && AclActionTag::from_entry_attr(id).is_some() => {
                Some(AttrFlags::CREATE_AND_SET)
            }
            _ => None,
        }
    }

    fn mandatory_ids(&self) -> &'static [u32] {
        &[ENTRY_ATTR_TABLE_ID]
    }
}

/// Schema for ACL counter attributes.
pub struct CounterSchema;

impl AttrSchema for CounterSchema {
    fn flags(&self, id: u32) -> Option<AttrFlags> {
        match id {
            COUNTER_ATTR_TABLE_ID => Some(AttrFlags::CREATE_ONLY_MANDATORY),
            COUNTER_ATTR_ENABLE_PACKET_COUNT | COUNTER_ATTR_ENABLE_BYTE_COUNT => {
                Some(AttrFlags::CREATE_ONLY)
            }
            COUNTER_ATTR_PACKETS | COUNTER_ATTR_BYTES => Some(AttrFlags::SET_ONLY),
            _ => None,
        }
    }

    fn mandatory_ids(&self) -> &'static [u32] {
        &[COUNTER_ATTR_TABLE_ID]
    }
}

/// Schema for ACL range attributes.
pub struct RangeSchema;

const RANGE_LIMIT_FLAGS: AttrFlags = AttrFlags {
    mandatory_on_create: true,
    valid_for_create: true,
    valid_for_set: true,
    valid_for_get: true,
};

impl AttrSchema for RangeSchema {
    fn flags(&self, id: u32) -> Option<AttrFlags> {
        match id {
            RANGE_ATTR_TYPE => Some(AttrFlags::CREATE_ONLY_MANDATORY),
            RANGE_ATTR_LIMIT => Some(RANGE_LIMIT_FLAGS),
            _ => None,
        }
    }

    fn mandatory_ids(&self) -> &'static [u32] {
        &[RANGE_ATTR_TYPE, RANGE_ATTR_LIMIT]
    }
}

/// Schema for ACL table-group attributes.
pub struct TableGroupSchema;

impl AttrSchema for TableGroupSchema {
    fn flags(&self, id: u32) -> Option<AttrFlags> {
        match id {
            TABLE_GROUP_ATTR_STAGE => Some(AttrFlags::CREATE_ONLY_MANDATORY),
            TABLE_GROUP_ATTR_TYPE | TABLE_GROUP_ATTR_BIND_POINT_TYPE_LIST => {
                Some(AttrFlags::CREATE_ONLY)
            }
            _ => None,
        }
    }

    fn mandatory_ids(&self) -> &'static [u32] {
        &[TABLE_GROUP_ATTR_STAGE]
    }
}

/// Schema for ACL table-group-member attributes.
pub struct TableGroupMemberSchema;

impl AttrSchema for TableGroupMemberSchema {
    fn flags(&self, id: u32) -> Option<AttrFlags> {
        match id {
            TABLE_GROUP_MEMBER_ATTR_GROUP_ID
            | TABLE_GROUP_MEMBER_ATTR_TABLE_ID
            | TABLE_GROUP_MEMBER_ATTR_PRIORITY => Some(AttrFlags::CREATE_ONLY_MANDATORY),
            _ => None,
        }
    }

    fn mandatory_ids(&self) -> &'static [u32] {
        &[
            TABLE_GROUP_MEMBER_ATTR_GROUP_ID,
            TABLE_GROUP_MEMBER_ATTR_TABLE_ID,
            TABLE_GROUP_MEMBER_ATTR_PRIORITY,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_entry_attr_round_trip() {
        for (field, _) in FIELD_OFFSETS {
            assert_eq!(AclField::from_entry_attr(field.entry_attr()), Some(*field));
        }
    }

    #[test]
    fn test_field_table_attr_round_trip() {
        for (field, _) in FIELD_OFFSETS {
            assert_eq!(AclField::from_table_attr(field.table_attr()), Some(*field));
        }
    }

    #[test]
    fn test_user_defined_field_mapping() {
        let field = AclField::UserDefined(3);
        assert_eq!(field.entry_attr(), ENTRY_FIELD_USER_DEFINED_MIN + 3);
        assert_eq!(field.table_attr(), TABLE_UDF_GROUP_MIN + 3);
        assert_eq!(
            AclField::from_entry_attr(ENTRY_FIELD_USER_DEFINED_MIN + 3),
            Some(field)
        );
        assert_eq!(
            entry_udf_field_to_table_udf_group(ENTRY_FIELD_USER_DEFINED_MIN + 3),
            Some(TABLE_UDF_GROUP_MIN + 3)
        );
    }

    #[test]
    fn test_action_attr_round_trip() {
        for (action, _) in ACTION_OFFSETS {
            assert_eq!(
                AclActionTag::from_entry_attr(action.entry_attr()),
                Some(*action)
            );
        }
    }

    #[test]
    fn test_udf_fields_are_inside_field_range() {
        assert!(entry_field_attr_range(ENTRY_FIELD_USER_DEFINED_MIN));
        assert!(entry_field_attr_range(ENTRY_FIELD_USER_DEFINED_MAX));
        assert!(entry_udf_field_attr_range(ENTRY_FIELD_USER_DEFINED_MIN));
        assert!(!entry_udf_field_attr_range(AclField::SrcIp.entry_attr()));
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(AclField::SrcIp.kind(), ValueKind::Ipv4);
        assert_eq!(AclField::DstIpv6.kind(), ValueKind::Ipv6);
        assert_eq!(AclField::InPorts.kind(), ValueKind::ObjectList);
        assert_eq!(AclField::OutPort.kind(), ValueKind::Oid);
        assert_eq!(AclField::TcpFlags.kind(), ValueKind::U8);
        assert_eq!(AclField::UserDefined(0).kind(), ValueKind::ByteList);
    }

    #[test]
    fn test_action_kinds() {
        assert_eq!(AclActionTag::Counter.kind(), ValueKind::Oid);
        assert_eq!(AclActionTag::MirrorIngress.kind(), ValueKind::ObjectList);
        assert_eq!(AclActionTag::PacketAction.kind(), ValueKind::Enum);
        assert_eq!(AclActionTag::SetMetaData.kind(), ValueKind::U32);
    }

    #[test]
    fn test_entry_schema_flags() {
        let schema = EntrySchema;
        assert_eq!(
            schema.flags(ENTRY_ATTR_TABLE_ID),
            Some(AttrFlags::CREATE_ONLY_MANDATORY)
        );
        assert_eq!(
            schema.flags(AclField::SrcIp.entry_attr()),
            Some(AttrFlags::CREATE_AND_SET)
        );
        assert_eq!(schema.flags(0x9999), None);
    }

    #[test]
    fn test_counter_schema_counts_not_creatable() {
        let schema = CounterSchema;
        let flags = schema.flags(COUNTER_ATTR_BYTES).unwrap();
        assert!(!flags.valid_for_create);
        assert!(flags.valid_for_set);
    }
}
