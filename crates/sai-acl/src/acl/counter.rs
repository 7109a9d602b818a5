//! ACL counter object.

use sai_common::Oid;

use super::types::AclCounterType;
use crate::npu::NpuHandle;

/// An ACL counter, shared by the rules whose COUNTER action points at it.
///
/// `shared_count` tracks exactly how many rules reference this counter; the
/// attach/detach path maintains it and delete refuses while it is non-zero.
#[derive(Debug, Clone)]
pub struct AclCounter {
    pub oid: Oid,
    pub table_oid: Oid,
    pub counter_type: AclCounterType,
    pub shared_count: u32,
    pub npu_handle: Option<NpuHandle>,
}

impl AclCounter {
    pub fn new(oid: Oid, table_oid: Oid, counter_type: AclCounterType) -> Self {
        Self {
            oid,
            table_oid,
            counter_type,
            shared_count: 0,
            npu_handle: None,
        }
    }
}
