//! ACL table object.

use sai_common::Oid;

use super::attr::AclField;
use super::types::AclStage;
use crate::npu::NpuHandle;

/// Binding of a user-defined field slot to a UDF group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdfFieldBinding {
    /// Per-table slot, `0..UDF_SLOT_COUNT`.
    pub slot: u8,
    pub group_oid: Oid,
    pub group_npu_id: u64,
}

/// Entry in a table's priority-ordered rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleListEntry {
    pub oid: Oid,
    pub priority: u32,
}

/// An ACL table.
///
/// `npu_handle` is present exactly when the table has been materialized in
/// hardware; tables without a fixed size or virtual group defer that until
/// the first rule or counter binds.
#[derive(Debug, Clone)]
pub struct AclTable {
    pub oid: Oid,
    pub stage: AclStage,
    pub priority: u32,
    /// 0 means dynamically sized.
    pub size: u32,
    pub group_oid: Option<Oid>,
    pub field_set: Vec<AclField>,
    pub udf_field_set: Vec<UdfFieldBinding>,
    rule_list: Vec<RuleListEntry>,
    pub rule_count: u32,
    pub counter_count: u32,
    pub npu_handle: Option<NpuHandle>,
    pub virtual_group: bool,
}

impl AclTable {
    pub fn new(oid: Oid, stage: AclStage, priority: u32) -> Self {
        Self {
            oid,
            stage,
            priority,
            size: 0,
            group_oid: None,
            field_set: Vec::new(),
            udf_field_set: Vec::new(),
            rule_list: Vec::new(),
            rule_count: 0,
            counter_count: 0,
            npu_handle: None,
            virtual_group: false,
        }
    }

    pub fn is_materialized(&self) -> bool {
        self.npu_handle.is_some()
    }

    /// Whether this table supports matching on `field`.
    pub fn supports_field(&self, field: AclField) -> bool {
        self.field_set.contains(&field)
    }

    /// The UDF-group binding for a user-defined field slot.
    pub fn udf_binding(&self, slot: u8) -> Option<&UdfFieldBinding> {
        self.udf_field_set.iter().find(|b| b.slot == slot)
    }

    /// Priority-ordered view of the rule list.
    pub fn rule_list(&self) -> &[RuleListEntry] {
        &self.rule_list
    }

    /// Links a rule into the priority-sorted list. The insert is stable:
    /// equal priorities keep insertion order.
    pub fn link_rule(&mut self, oid: Oid, priority: u32) {
        let pos = self
            .rule_list
            .partition_point(|entry| entry.priority <= priority);
        self.rule_list.insert(pos, RuleListEntry { oid, priority });
        self.rule_count += 1;
    }

    /// Unlinks a rule; returns false if it was not linked (a data-structure
    /// inconsistency the caller treats as fatal).
    pub fn unlink_rule(&mut self, oid: Oid) -> bool {
        match self.rule_list.iter().position(|entry| entry.oid == oid) {
            Some(pos) => {
                self.rule_list.remove(pos);
                self.rule_count -= 1;
                true
            }
            None => false,
        }
    }

    pub fn has_rule(&self, oid: Oid) -> bool {
        self.rule_list.iter().any(|entry| entry.oid == oid)
    }

    /// Moves a linked rule to the slot its new priority sorts at.
    pub fn reposition_rule(&mut self, oid: Oid, new_priority: u32) -> bool {
        if !self.unlink_rule(oid) {
            return false;
        }
        self.link_rule(oid, new_priority);
        true
    }
}
