//! ACL table groups and group members.

use sai_common::Oid;

use super::types::{AclBindPointType, AclGroupType, AclStage};

/// A table group: an ordered set of tables applied together at one stage.
#[derive(Debug, Clone)]
pub struct AclTableGroup {
    pub oid: Oid,
    pub stage: AclStage,
    pub group_type: AclGroupType,
    pub bind_point_types: Vec<AclBindPointType>,
    pub members: Vec<Oid>,
    pub ref_count: u32,
}

impl AclTableGroup {
    pub fn new(oid: Oid, stage: AclStage, group_type: AclGroupType) -> Self {
        Self {
            oid,
            stage,
            group_type,
            bind_point_types: Vec::new(),
            members: Vec::new(),
            ref_count: 0,
        }
    }
}

/// Membership of one table in one group.
///
/// Creating a member overwrites the target table's priority with the
/// member's priority.
#[derive(Debug, Clone)]
pub struct AclTableGroupMember {
    pub oid: Oid,
    pub group_oid: Oid,
    pub table_oid: Oid,
    pub priority: u32,
}
