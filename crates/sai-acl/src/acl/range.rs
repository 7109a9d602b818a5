//! ACL range object.

use sai_common::Oid;

use super::types::AclRangeType;
use crate::npu::NpuHandle;

/// A match range (L4 port span, VLAN span, packet length span).
///
/// Rules reference ranges through their RANGE_LIST filter; `ref_count`
/// tracks those references and delete refuses while it is non-zero.
#[derive(Debug, Clone)]
pub struct AclRange {
    pub oid: Oid,
    pub range_type: AclRangeType,
    pub min: u32,
    pub max: u32,
    pub ref_count: u32,
    pub npu_handle: Option<NpuHandle>,
}

impl AclRange {
    pub fn new(oid: Oid, range_type: AclRangeType, min: u32, max: u32) -> Self {
        Self {
            oid,
            range_type,
            min,
            max,
            ref_count: 0,
            npu_handle: None,
        }
    }
}
