//! User-Defined Field subsystem.
//!
//! UDF groups collect byte-range extractors (UDFs); ACL tables bind GENERIC
//! groups into user-defined field qualifiers, while HASH groups feed the
//! hashing subsystem. The orchestrator owns the group/UDF registries and the
//! UDF-match pass-through.

mod attr;
mod orch;
mod types;

pub use attr::{
    UdfGroupSchema, UdfMatchSchema, UdfSchema, UDF_ATTR_BASE, UDF_ATTR_GROUP_ID,
    UDF_ATTR_HASH_MASK, UDF_ATTR_MATCH_ID, UDF_ATTR_OFFSET, UDF_GROUP_ATTR_LENGTH,
    UDF_GROUP_ATTR_TYPE, UDF_MATCH_ATTR_GRE_TYPE, UDF_MATCH_ATTR_L2_TYPE, UDF_MATCH_ATTR_L3_TYPE,
    UDF_MATCH_ATTR_PRIORITY,
};
pub use orch::UdfOrch;
pub use types::{Udf, UdfBase, UdfGroup, UdfGroupType};

use sai_common::{Oid, SaiResult};

use crate::npu::NpuHandle;

/// Accessors the ACL layer uses to resolve UDF groups while holding its own
/// lock. Implementations must not call back into ACL.
pub trait UdfLookup: Send + Sync {
    /// Hardware id of a live UDF group.
    fn group_hw_id(&self, group: Oid) -> SaiResult<NpuHandle>;
    /// Type of a live UDF group.
    fn group_type(&self, group: Oid) -> SaiResult<UdfGroupType>;
}
