//! UDF object types.

use sai_common::Oid;
use std::fmt;

use crate::npu::NpuHandle;

/// How the extracted bytes are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UdfGroupType {
    /// Match input for ACL user-defined field qualifiers.
    #[default]
    Generic,
    /// Hash input; not admissible on ACL tables.
    Hash,
}

impl UdfGroupType {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Generic),
            1 => Some(Self::Hash),
            _ => None,
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Self::Generic => 0,
            Self::Hash => 1,
        }
    }
}

impl fmt::Display for UdfGroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => write!(f, "GENERIC"),
            Self::Hash => write!(f, "HASH"),
        }
    }
}

/// Header base the UDF offset is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UdfBase {
    #[default]
    L2,
    L3,
    L4,
}

impl UdfBase {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::L2),
            1 => Some(Self::L3),
            2 => Some(Self::L4),
            _ => None,
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Self::L2 => 0,
            Self::L3 => 1,
            Self::L4 => 2,
        }
    }
}

impl fmt::Display for UdfBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L2 => write!(f, "L2"),
            Self::L3 => write!(f, "L3"),
            Self::L4 => write!(f, "L4"),
        }
    }
}

/// A UDF group: `length` bytes extracted per member UDF.
#[derive(Debug, Clone)]
pub struct UdfGroup {
    pub oid: Oid,
    pub group_type: UdfGroupType,
    pub length: u16,
    pub udf_list: Vec<Oid>,
    pub npu_handle: Option<NpuHandle>,
}

impl UdfGroup {
    pub fn new(oid: Oid, group_type: UdfGroupType, length: u16) -> Self {
        Self {
            oid,
            group_type,
            length,
            udf_list: Vec::new(),
            npu_handle: None,
        }
    }

    pub fn udf_count(&self) -> usize {
        self.udf_list.len()
    }
}

/// One byte-range extractor.
///
/// `hash_mask` is only meaningful in HASH groups and always has the group's
/// length; in GENERIC groups it stays empty.
#[derive(Debug, Clone)]
pub struct Udf {
    pub oid: Oid,
    pub group_oid: Oid,
    pub match_oid: Oid,
    pub base: UdfBase,
    pub offset: u16,
    pub hash_mask: Vec<u8>,
    pub npu_handle: Option<NpuHandle>,
}

impl Udf {
    pub fn new(oid: Oid, group_oid: Oid, match_oid: Oid) -> Self {
        Self {
            oid,
            group_oid,
            match_oid,
            base: UdfBase::default(),
            offset: 0,
            hash_mask: Vec::new(),
            npu_handle: None,
        }
    }
}
