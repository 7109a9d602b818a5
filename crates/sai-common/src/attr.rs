//! Raw attribute lists and the schema-driven validator.
//!
//! Every create/set/get entry point takes a list of `(id, value)` pairs. The
//! id namespace is numeric and partitioned per object class; each object
//! manager supplies an [`AttrSchema`] describing which ids it knows and what
//! each id is allowed to do. Validation is a single pass that reports the
//! offending list index through the indexed [`SaiStatus`] codes.

use crate::oid::Oid;
use crate::status::{SaiResult, SaiStatus};
use sai_types::{Ipv4Address, Ipv6Address, MacAddress};

/// A value in a match-data or match-mask slot, or an action parameter.
///
/// Tagged union over every shape an ACL filter or action can carry. Byte
/// lists compare length-first, object lists element-wise, both by the derived
/// equality.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MatchValue {
    /// No value (e.g. the mask slot of a bool field).
    #[default]
    None,
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    /// Enumerated value (packet action, color, IP type...).
    Enum(i32),
    Mac(MacAddress),
    Ipv4(Ipv4Address),
    Ipv6(Ipv6Address),
    Oid(Oid),
    ObjectList(Vec<Oid>),
    ByteList(Vec<u8>),
}

impl MatchValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<Oid> {
        match self {
            Self::Oid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_object_list(&self) -> Option<&[Oid]> {
        match self {
            Self::ObjectList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_byte_list(&self) -> Option<&[u8]> {
        match self {
            Self::ByteList(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Field payload of an ACL-entry field attribute: enable flag plus the
/// data/mask pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AclFieldValue {
    pub enable: bool,
    pub data: MatchValue,
    pub mask: MatchValue,
}

impl AclFieldValue {
    pub fn new(data: MatchValue, mask: MatchValue) -> Self {
        Self {
            enable: true,
            data,
            mask,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enable: false,
            data: MatchValue::None,
            mask: MatchValue::None,
        }
    }
}

/// Action payload of an ACL-entry action attribute: enable flag plus a
/// parameter. Actions carry no mask.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AclActionValue {
    pub enable: bool,
    pub parameter: MatchValue,
}

impl AclActionValue {
    pub fn new(parameter: MatchValue) -> Self {
        Self {
            enable: true,
            parameter,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enable: false,
            parameter: MatchValue::None,
        }
    }
}

/// Value slot of a raw attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S32(i32),
    Mac(MacAddress),
    Ipv4(Ipv4Address),
    Ipv6(Ipv6Address),
    Oid(Oid),
    ObjectList(Vec<Oid>),
    ByteList(Vec<u8>),
    S32List(Vec<i32>),
    /// Inclusive (min, max) pair, e.g. an ACL range limit.
    U32Range { min: u32, max: u32 },
    AclField(AclFieldValue),
    AclAction(AclActionValue),
}

impl AttrValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Self::U16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_s32(&self) -> Option<i32> {
        match self {
            Self::S32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<Oid> {
        match self {
            Self::Oid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_byte_list(&self) -> Option<&[u8]> {
        match self {
            Self::ByteList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object_list(&self) -> Option<&[Oid]> {
        match self {
            Self::ObjectList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_s32_list(&self) -> Option<&[i32]> {
        match self {
            Self::S32List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u32_range(&self) -> Option<(u32, u32)> {
        match self {
            Self::U32Range { min, max } => Some((*min, *max)),
            _ => None,
        }
    }

    pub fn as_acl_field(&self) -> Option<&AclFieldValue> {
        match self {
            Self::AclField(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_acl_action(&self) -> Option<&AclActionValue> {
        match self {
            Self::AclAction(v) => Some(v),
            _ => None,
        }
    }
}

/// A raw `(id, value)` attribute as carried on every entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: u32,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(id: u32, value: AttrValue) -> Self {
        Self { id, value }
    }
}

/// What a known attribute id is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttrFlags {
    pub mandatory_on_create: bool,
    pub valid_for_create: bool,
    pub valid_for_set: bool,
    pub valid_for_get: bool,
}

impl AttrFlags {
    /// Mandatory at create, never settable afterwards.
    pub const CREATE_ONLY_MANDATORY: AttrFlags = AttrFlags {
        mandatory_on_create: true,
        valid_for_create: true,
        valid_for_set: false,
        valid_for_get: true,
    };

    /// Optional at create, never settable afterwards.
    pub const CREATE_ONLY: AttrFlags = AttrFlags {
        mandatory_on_create: false,
        valid_for_create: true,
        valid_for_set: false,
        valid_for_get: true,
    };

    /// Optional at create, settable afterwards.
    pub const CREATE_AND_SET: AttrFlags = AttrFlags {
        mandatory_on_create: false,
        valid_for_create: true,
        valid_for_set: true,
        valid_for_get: true,
    };

    /// Not accepted at create; settable and gettable afterwards.
    pub const SET_ONLY: AttrFlags = AttrFlags {
        mandatory_on_create: false,
        valid_for_create: false,
        valid_for_set: true,
        valid_for_get: true,
    };

    /// Read-only.
    pub const READ_ONLY: AttrFlags = AttrFlags {
        mandatory_on_create: false,
        valid_for_create: false,
        valid_for_set: false,
        valid_for_get: true,
    };
}

/// Per-object-class attribute schema.
pub trait AttrSchema {
    /// Flags for a known id; `None` for ids outside the class's namespace.
    fn flags(&self, id: u32) -> Option<AttrFlags>;

    /// Ids that must appear in every create list.
    fn mandatory_ids(&self) -> &'static [u32];
}

/// Operation the attribute list is being validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    Create,
    Set,
    Get,
}

/// One-pass validation of a user attribute list against a schema.
///
/// Failures carry the index of the offending attribute; duplicate ids are
/// reported at the later of the two positions.
pub fn validate_attr_list<S: AttrSchema + ?Sized>(
    attrs: &[Attribute],
    op: AttrOp,
    schema: &S,
) -> SaiResult<()> {
    for (index, attr) in attrs.iter().enumerate() {
        let flags = schema
            .flags(attr.id)
            .ok_or(SaiStatus::UnknownAttribute(index as u32))?;

        for (dup_index, dup) in attrs.iter().enumerate().skip(index + 1) {
            if dup.id == attr.id {
                log::error!(
                    "duplicate attribute id {} at indices {} and {}",
                    attr.id,
                    index,
                    dup_index
                );
                return Err(SaiStatus::InvalidAttribute(dup_index as u32));
            }
        }

        match op {
            AttrOp::Create => {
                if !flags.valid_for_create {
                    return Err(SaiStatus::InvalidAttribute(index as u32));
                }
            }
            AttrOp::Set => {
                if !flags.valid_for_set {
                    return Err(SaiStatus::AttrNotSupported(index as u32));
                }
            }
            AttrOp::Get => {
                if !flags.valid_for_get {
                    return Err(SaiStatus::InvalidAttribute(index as u32));
                }
            }
        }
    }

    if op == AttrOp::Create {
        for mandatory in schema.mandatory_ids() {
            if !attrs.iter().any(|a| a.id == *mandatory) {
                log::error!("mandatory attribute id {} missing from create", mandatory);
                return Err(SaiStatus::MandatoryAttributeMissing);
            }
        }
    }

    Ok(())
}

/// Finds an attribute by id.
pub fn find_attr(attrs: &[Attribute], id: u32) -> Option<&Attribute> {
    attrs.iter().find(|a| a.id == id)
}
