//! SAI status codes.
//!
//! Mirrors the `sai_status_t` convention: zero is success, plain errors are
//! small negative codes, and attribute-list errors fold the offending list
//! index into the code so callers can report which attribute failed.

use std::fmt;
use thiserror::Error;

const INVALID_ATTRIBUTE_BASE: i32 = 0x0001_0000;
const INVALID_ATTR_VALUE_BASE: i32 = 0x0002_0000;
const ATTR_NOT_IMPLEMENTED_BASE: i32 = 0x0003_0000;
const UNKNOWN_ATTRIBUTE_BASE: i32 = 0x0004_0000;
const ATTR_NOT_SUPPORTED_BASE: i32 = 0x0005_0000;
const INDEX_MASK: i32 = 0xffff;

/// Status of a SAI operation.
///
/// The indexed variants carry the position of the offending attribute in the
/// caller's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SaiStatus {
    #[error("SAI_STATUS_FAILURE")]
    Failure,
    #[error("SAI_STATUS_NOT_SUPPORTED")]
    NotSupported,
    #[error("SAI_STATUS_NO_MEMORY")]
    NoMemory,
    #[error("SAI_STATUS_INSUFFICIENT_RESOURCES")]
    InsufficientResources,
    #[error("SAI_STATUS_INVALID_PARAMETER")]
    InvalidParameter,
    #[error("SAI_STATUS_ITEM_ALREADY_EXISTS")]
    ItemAlreadyExists,
    #[error("SAI_STATUS_ITEM_NOT_FOUND")]
    ItemNotFound,
    #[error("SAI_STATUS_BUFFER_OVERFLOW")]
    BufferOverflow,
    #[error("SAI_STATUS_TABLE_FULL")]
    TableFull,
    #[error("SAI_STATUS_MANDATORY_ATTRIBUTE_MISSING")]
    MandatoryAttributeMissing,
    #[error("SAI_STATUS_NOT_IMPLEMENTED")]
    NotImplemented,
    #[error("SAI_STATUS_OBJECT_IN_USE")]
    ObjectInUse,
    #[error("SAI_STATUS_INVALID_OBJECT_TYPE")]
    InvalidObjectType,
    #[error("SAI_STATUS_INVALID_OBJECT_ID")]
    InvalidObjectId,
    #[error("SAI_STATUS_INVALID_ATTRIBUTE_{0}")]
    InvalidAttribute(u32),
    #[error("SAI_STATUS_INVALID_ATTR_VALUE_{0}")]
    InvalidAttrValue(u32),
    #[error("SAI_STATUS_ATTR_NOT_IMPLEMENTED_{0}")]
    AttrNotImplemented(u32),
    #[error("SAI_STATUS_UNKNOWN_ATTRIBUTE_{0}")]
    UnknownAttribute(u32),
    #[error("SAI_STATUS_ATTR_NOT_SUPPORTED_{0}")]
    AttrNotSupported(u32),
}

impl SaiStatus {
    /// Raw `sai_status_t` value, with the list index folded into indexed
    /// codes the way the C headers do (`base + index`, negated).
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Failure => -1,
            Self::NotSupported => -2,
            Self::NoMemory => -3,
            Self::InsufficientResources => -4,
            Self::InvalidParameter => -5,
            Self::ItemAlreadyExists => -6,
            Self::ItemNotFound => -7,
            Self::BufferOverflow => -8,
            Self::TableFull => -13,
            Self::MandatoryAttributeMissing => -14,
            Self::NotImplemented => -15,
            Self::ObjectInUse => -17,
            Self::InvalidObjectType => -18,
            Self::InvalidObjectId => -19,
            Self::InvalidAttribute(i) => -(INVALID_ATTRIBUTE_BASE + i as i32),
            Self::InvalidAttrValue(i) => -(INVALID_ATTR_VALUE_BASE + i as i32),
            Self::AttrNotImplemented(i) => -(ATTR_NOT_IMPLEMENTED_BASE + i as i32),
            Self::UnknownAttribute(i) => -(UNKNOWN_ATTRIBUTE_BASE + i as i32),
            Self::AttrNotSupported(i) => -(ATTR_NOT_SUPPORTED_BASE + i as i32),
        }
    }

    /// Decodes a raw `sai_status_t` error value. `None` for non-negative
    /// input (success is not a `SaiStatus`).
    pub fn from_raw(raw: i32) -> Option<Self> {
        if raw >= 0 {
            return None;
        }
        let code = -raw;
        let base = code & !INDEX_MASK;
        let index = (code & INDEX_MASK) as u32;
        Some(match base {
            INVALID_ATTRIBUTE_BASE => Self::InvalidAttribute(index),
            INVALID_ATTR_VALUE_BASE => Self::InvalidAttrValue(index),
            ATTR_NOT_IMPLEMENTED_BASE => Self::AttrNotImplemented(index),
            UNKNOWN_ATTRIBUTE_BASE => Self::UnknownAttribute(index),
            ATTR_NOT_SUPPORTED_BASE => Self::AttrNotSupported(index),
            _ => match raw {
                -2 => Self::NotSupported,
                -3 => Self::NoMemory,
                -4 => Self::InsufficientResources,
                -5 => Self::InvalidParameter,
                -6 => Self::ItemAlreadyExists,
                -7 => Self::ItemNotFound,
                -8 => Self::BufferOverflow,
                -13 => Self::TableFull,
                -14 => Self::MandatoryAttributeMissing,
                -15 => Self::NotImplemented,
                -17 => Self::ObjectInUse,
                -18 => Self::InvalidObjectType,
                -19 => Self::InvalidObjectId,
                _ => Self::Failure,
            },
        })
    }

    /// The list index carried by an indexed code, if any.
    pub fn attr_index(&self) -> Option<u32> {
        match self {
            Self::InvalidAttribute(i)
            | Self::InvalidAttrValue(i)
            | Self::AttrNotImplemented(i)
            | Self::UnknownAttribute(i)
            | Self::AttrNotSupported(i) => Some(*i),
            _ => None,
        }
    }

    /// Re-anchors an indexed code at a different list index; other codes
    /// pass through unchanged.
    pub fn at_index(self, index: u32) -> Self {
        match self {
            Self::InvalidAttribute(_) => Self::InvalidAttribute(index),
            Self::InvalidAttrValue(_) => Self::InvalidAttrValue(index),
            Self::AttrNotImplemented(_) => Self::AttrNotImplemented(index),
            Self::UnknownAttribute(_) => Self::UnknownAttribute(index),
            Self::AttrNotSupported(_) => Self::AttrNotSupported(index),
            other => other,
        }
    }
}

/// Result alias used by every SAI entry point.
pub type SaiResult<T> = Result<T, SaiStatus>;

// fmt::Display comes from thiserror; keep a short alias for log call sites.
impl SaiStatus {
    pub fn name(&self) -> String {
        format!("{}", self)
    }

    /// Helper for fmt in contexts wanting the raw code too.
    pub fn describe(&self) -> impl fmt::Display + '_ {
        struct D<'a>(&'a SaiStatus);
        impl fmt::Display for D<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} ({})", self.0, self.0.to_raw())
            }
        }
        D(self)
    }
}
