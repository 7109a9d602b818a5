//! ACL subsystem: tables, rules, counters, ranges, table groups.
//!
//! The orchestrator owns every registry and drives the NPU and peer
//! managers. Rule modification is handled by a delta engine that reconciles
//! a candidate rule against the installed one and pushes the classified
//! change set to the NPU in a single operation.

mod attr;
mod counter;
mod filter;
mod group;
mod orch;
mod range;
mod rule;
mod table;
mod types;
mod update;

pub use attr::{
    entry_action_attr_range, entry_field_attr_range, entry_udf_field_attr_range,
    entry_udf_field_to_table_udf_group, table_field_attr_range, table_udf_group_attr_range,
    AclActionTag, AclField, CounterSchema, EntrySchema, RangeSchema, TableGroupMemberSchema,
    TableGroupSchema, TableSchema, ValueKind, COUNTER_ATTR_BYTES,
    COUNTER_ATTR_ENABLE_BYTE_COUNT, COUNTER_ATTR_ENABLE_PACKET_COUNT, COUNTER_ATTR_PACKETS,
    COUNTER_ATTR_TABLE_ID, ENTRY_ATTR_ADMIN_STATE, ENTRY_ATTR_PRIORITY, ENTRY_ATTR_TABLE_ID,
    ENTRY_FIELD_USER_DEFINED_MAX, ENTRY_FIELD_USER_DEFINED_MIN, RANGE_ATTR_LIMIT,
    RANGE_ATTR_TYPE, TABLE_ATTR_GROUP_ID, TABLE_ATTR_PRIORITY, TABLE_ATTR_SIZE,
    TABLE_ATTR_STAGE, TABLE_GROUP_ATTR_BIND_POINT_TYPE_LIST, TABLE_GROUP_ATTR_STAGE,
    TABLE_GROUP_ATTR_TYPE, TABLE_GROUP_MEMBER_ATTR_GROUP_ID, TABLE_GROUP_MEMBER_ATTR_PRIORITY,
    TABLE_GROUP_MEMBER_ATTR_TABLE_ID, TABLE_UDF_GROUP_MAX, TABLE_UDF_GROUP_MIN, UDF_SLOT_COUNT,
};
pub use counter::AclCounter;
pub use filter::{
    classify_action_change, classify_filter_change, AclAction, AclFilter, ChangeKind, RuleDelta,
};
pub use group::{AclTableGroup, AclTableGroupMember};
pub use orch::AclOrch;
pub use range::AclRange;
pub use rule::AclRule;
pub use table::{AclTable, RuleListEntry, UdfFieldBinding};
pub use types::{AclBindPointType, AclCounterType, AclGroupType, AclRangeType, AclStage};
pub use update::compute_rule_delta;
