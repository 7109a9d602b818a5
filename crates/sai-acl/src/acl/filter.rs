//! Rule filters, actions, and change classification.
//!
//! Filters and actions own their values outright, including nested object
//! lists and byte lists; dropping or overwriting an entry releases the old
//! lists. The delta engine compares a candidate entry against the installed
//! one and classifies the difference, which is what the rule-set protocol
//! hands to the NPU and later commits.

use sai_common::{MatchValue, Oid};

use super::attr::{AclActionTag, AclField};

/// One match entry of a rule.
///
/// For user-defined fields `data` and `mask` are byte lists of equal length
/// and the filter additionally carries the table-side UDF group binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclFilter {
    pub field: AclField,
    pub enable: bool,
    pub data: MatchValue,
    pub mask: MatchValue,
    /// UDF group the field reads through; null for regular fields.
    pub udf_group_oid: Oid,
    /// NPU handle of that UDF group.
    pub udf_group_npu_id: u64,
}

impl AclFilter {
    pub fn new(field: AclField, enable: bool, data: MatchValue, mask: MatchValue) -> Self {
        Self {
            field,
            enable,
            data,
            mask,
            udf_group_oid: Oid::NULL,
            udf_group_npu_id: 0,
        }
    }

    /// Overwrites this filter from a candidate, releasing any lists the old
    /// value owned. Data and mask move together so UDF byte lists stay in
    /// lockstep.
    pub fn assign_from(&mut self, candidate: &AclFilter) {
        self.enable = candidate.enable;
        if candidate.enable {
            self.data = candidate.data.clone();
            self.mask = candidate.mask.clone();
        } else {
            // Disable empties owned lists rather than keeping stale contents.
            self.data = MatchValue::None;
            self.mask = MatchValue::None;
        }
        self.udf_group_oid = candidate.udf_group_oid;
        self.udf_group_npu_id = candidate.udf_group_npu_id;
    }
}

/// One action entry of a rule. Actions carry no mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclAction {
    pub action: AclActionTag,
    pub enable: bool,
    pub parameter: MatchValue,
}

impl AclAction {
    pub fn new(action: AclActionTag, enable: bool, parameter: MatchValue) -> Self {
        Self {
            action,
            enable,
            parameter,
        }
    }

    pub fn assign_from(&mut self, candidate: &AclAction) {
        self.enable = candidate.enable;
        if candidate.enable {
            self.parameter = candidate.parameter.clone();
        } else {
            self.parameter = MatchValue::None;
        }
    }
}

/// Classification of a candidate entry against the installed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Candidate equals the installed entry.
    Unchanged,
    /// Match data, mask, or parameter differs.
    Value,
    /// Only the enable flag flipped.
    AdminState,
    /// No installed entry carries this tag.
    New,
}

/// Compares a candidate filter against the installed entry with the same
/// field tag. Byte lists compare length-first then contents, object lists
/// element-wise, scalars by value.
pub fn classify_filter_change(existing: &AclFilter, candidate: &AclFilter) -> ChangeKind {
    if existing.data != candidate.data || existing.mask != candidate.mask {
        ChangeKind::Value
    } else if existing.enable != candidate.enable {
        ChangeKind::AdminState
    } else {
        ChangeKind::Unchanged
    }
}

pub fn classify_action_change(existing: &AclAction, candidate: &AclAction) -> ChangeKind {
    if existing.parameter != candidate.parameter {
        ChangeKind::Value
    } else if existing.enable != candidate.enable {
        ChangeKind::AdminState
    } else {
        ChangeKind::Unchanged
    }
}

/// Per-entry delta of a candidate rule against the installed rule, as handed
/// to the NPU on rule-set.
#[derive(Debug, Clone, Default)]
pub struct RuleDelta {
    pub priority_change: Option<u32>,
    pub admin_state_change: Option<bool>,
    pub filters: Vec<(AclField, ChangeKind)>,
    pub actions: Vec<(AclActionTag, ChangeKind)>,
}

impl RuleDelta {
    /// True when nothing observable would change.
    pub fn is_noop(&self) -> bool {
        self.priority_change.is_none()
            && self.admin_state_change.is_none()
            && self
                .filters
                .iter()
                .all(|(_, c)| *c == ChangeKind::Unchanged)
            && self
                .actions
                .iter()
                .all(|(_, c)| *c == ChangeKind::Unchanged)
    }

    pub fn filter_change(&self, field: AclField) -> Option<ChangeKind> {
        self.filters.iter().find(|(f, _)| *f == field).map(|(_, c)| *c)
    }

    pub fn action_change(&self, action: AclActionTag) -> Option<ChangeKind> {
        self.actions
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, c)| *c)
    }
}
