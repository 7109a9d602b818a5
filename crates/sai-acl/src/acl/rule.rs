//! ACL rule object.

use sai_common::{MatchValue, Oid};

use super::attr::{AclActionTag, AclField};
use super::filter::{AclAction, AclFilter};
use crate::npu::NpuHandle;
use crate::peers::SampleDirection;

/// An ACL rule: a priority, a filter list, and an action list, linked into
/// exactly one table's rule list.
///
/// The counter/policer/samplepacket OIDs cache the peer bindings the rule
/// holds so that delete can unwind them without re-scanning the action list.
#[derive(Debug, Clone)]
pub struct AclRule {
    pub oid: Oid,
    pub priority: u32,
    pub table_oid: Oid,
    /// Administrative state; rules default to enabled.
    pub admin_state: bool,
    pub filters: Vec<AclFilter>,
    pub actions: Vec<AclAction>,
    pub counter_oid: Oid,
    pub policer_oid: Oid,
    pub sample_oid: [Oid; 2],
    pub npu_handle: Option<NpuHandle>,
}

impl AclRule {
    pub fn new(table_oid: Oid) -> Self {
        Self {
            oid: Oid::NULL,
            priority: 0,
            table_oid,
            admin_state: true,
            filters: Vec::new(),
            actions: Vec::new(),
            counter_oid: Oid::NULL,
            policer_oid: Oid::NULL,
            sample_oid: [Oid::NULL; 2],
            npu_handle: None,
        }
    }

    pub fn filter(&self, field: AclField) -> Option<&AclFilter> {
        self.filters.iter().find(|f| f.field == field)
    }

    pub fn filter_mut(&mut self, field: AclField) -> Option<&mut AclFilter> {
        self.filters.iter_mut().find(|f| f.field == field)
    }

    pub fn action(&self, tag: AclActionTag) -> Option<&AclAction> {
        self.actions.iter().find(|a| a.action == tag)
    }

    pub fn action_mut(&mut self, tag: AclActionTag) -> Option<&mut AclAction> {
        self.actions.iter_mut().find(|a| a.action == tag)
    }

    pub fn sample(&self, dir: SampleDirection) -> Oid {
        self.sample_oid[dir as usize]
    }

    pub fn has_any_sample(&self) -> bool {
        self.sample_oid.iter().any(|oid| !oid.is_null())
    }

    /// The port set an ingress samplepacket binding uses: the first port-list
    /// or single-port filter, if any. `None` means an all-ports binding.
    pub fn sample_port_set(&self) -> Option<Vec<Oid>> {
        for filter in &self.filters {
            if filter.field.is_port_list() {
                if let MatchValue::ObjectList(ports) = &filter.data {
                    return Some(ports.clone());
                }
            } else if filter.field.is_single_port() {
                if let MatchValue::Oid(port) = filter.data {
                    return Some(vec![port]);
                }
            }
        }
        None
    }

    /// OIDs of the ACL ranges this rule references.
    pub fn referenced_ranges(&self) -> Vec<Oid> {
        match self.filter(AclField::RangeList) {
            Some(filter) => match &filter.data {
                MatchValue::ObjectList(ranges) => ranges.clone(),
                _ => Vec::new(),
            },
            None => Vec::new(),
        }
    }
}
