//! Rule-set protocol: the delta engine.
//!
//! A set carries exactly one attribute. The engine builds a candidate rule
//! from it with the same populate path create uses, classifies the change
//! against the installed rule, pre-validates samplepacket rebinding, pushes
//! the whole thing to the NPU in one operation, and only then commits the
//! software state. A rejected push leaves the installed rule untouched.

use sai_common::{
    validate_attr_list, AttrOp, Attribute, ObjectType, Oid, SaiResult, SaiStatus,
};

use super::attr::{AclActionTag, AclField, EntrySchema, ENTRY_ATTR_ADMIN_STATE, ENTRY_ATTR_PRIORITY};
use super::filter::{classify_action_change, classify_filter_change, ChangeKind, RuleDelta};
use super::orch::AclOrch;
use super::rule::AclRule;
use crate::peers::SampleDirection;

/// Classifies every entry of a candidate rule against the installed rule.
pub fn compute_rule_delta(existing: &AclRule, candidate: &AclRule) -> RuleDelta {
    let mut delta = RuleDelta::default();
    if candidate.priority != existing.priority {
        delta.priority_change = Some(candidate.priority);
    }
    if candidate.admin_state != existing.admin_state {
        delta.admin_state_change = Some(candidate.admin_state);
    }
    for cf in &candidate.filters {
        let change = match existing.filter(cf.field) {
            Some(ef) => classify_filter_change(ef, cf),
            None => ChangeKind::New,
        };
        delta.filters.push((cf.field, change));
    }
    for ca in &candidate.actions {
        let change = match existing.action(ca.action) {
            Some(ea) => classify_action_change(ea, ca),
            None => ChangeKind::New,
        };
        delta.actions.push((ca.action, change));
    }
    delta
}

/// Folds a candidate into a copy of the installed rule: matched entries are
/// overwritten (old owned lists released), unmatched entries appended, and
/// the peer-binding caches refreshed.
fn merge_rule(existing: &AclRule, candidate: &AclRule) -> AclRule {
    let mut merged = existing.clone();
    merged.priority = candidate.priority;
    merged.admin_state = candidate.admin_state;
    for cf in &candidate.filters {
        match merged.filter_mut(cf.field) {
            Some(ef) => ef.assign_from(cf),
            None => merged.filters.push(cf.clone()),
        }
    }
    for ca in &candidate.actions {
        match merged.action_mut(ca.action) {
            Some(ea) => ea.assign_from(ca),
            None => merged.actions.push(ca.clone()),
        }
    }
    merged.counter_oid = candidate.counter_oid;
    merged.policer_oid = candidate.policer_oid;
    merged.sample_oid = candidate.sample_oid;
    merged
}

/// Whether an attribute can move a samplepacket port binding.
fn affects_sample_binding(attr_id: u32) -> bool {
    if let Some(field) = AclField::from_entry_attr(attr_id) {
        return field.is_port_list() || field.is_single_port();
    }
    matches!(
        AclActionTag::from_entry_attr(attr_id),
        Some(AclActionTag::IngressSamplePacket) | Some(AclActionTag::EgressSamplePacket)
    )
}

/// Per-direction binding view used by the rebinding protocol.
fn sample_binding(rule: &AclRule, dir: SampleDirection) -> (Oid, Option<Vec<Oid>>) {
    let sample = rule.sample(dir);
    let ports = match dir {
        SampleDirection::Ingress => rule.sample_port_set(),
        SampleDirection::Egress => None,
    };
    (sample, ports)
}

impl AclOrch {
    pub fn set_acl_rule(&mut self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclEntry) {
            return Err(SaiStatus::InvalidObjectType);
        }
        validate_attr_list(std::slice::from_ref(attr), AttrOp::Set, &EntrySchema)?;

        let existing = self
            .rules
            .get(oid)
            .ok_or(SaiStatus::InvalidObjectId)?
            .clone();
        let table_oid = existing.table_oid;

        // Candidate construction reuses the create-path populate, inheriting
        // everything the single attribute does not touch.
        let candidate = {
            let table = self.tables.get(table_oid).ok_or(SaiStatus::Failure)?;
            let mut candidate = AclRule::new(table_oid);
            candidate.oid = oid;
            candidate.priority = existing.priority;
            candidate.admin_state = existing.admin_state;
            candidate.counter_oid = existing.counter_oid;
            candidate.policer_oid = existing.policer_oid;
            candidate.sample_oid = existing.sample_oid;

            match attr.id {
                ENTRY_ATTR_PRIORITY => {
                    candidate.priority = attr
                        .value
                        .as_u32()
                        .ok_or(SaiStatus::InvalidAttrValue(0))?;
                }
                ENTRY_ATTR_ADMIN_STATE => {
                    candidate.admin_state = attr
                        .value
                        .as_bool()
                        .ok_or(SaiStatus::InvalidAttrValue(0))?;
                }
                id => {
                    if AclField::from_entry_attr(id).is_some() {
                        let value = attr
                            .value
                            .as_acl_field()
                            .ok_or(SaiStatus::InvalidAttrValue(0))?;
                        let filter = self.populate_filter(table, 0, id, value)?;
                        candidate.filters.push(filter);
                    } else if let Some(tag) = AclActionTag::from_entry_attr(id) {
                        let value = attr
                            .value
                            .as_acl_action()
                            .ok_or(SaiStatus::InvalidAttrValue(0))?;
                        let action = self.populate_action(0, id, value)?;
                        let target = if action.enable {
                            action.parameter.as_oid().unwrap_or(Oid::NULL)
                        } else {
                            Oid::NULL
                        };
                        match tag {
                            AclActionTag::Counter => candidate.counter_oid = target,
                            AclActionTag::SetPolicer => candidate.policer_oid = target,
                            AclActionTag::IngressSamplePacket => {
                                candidate.sample_oid[SampleDirection::Ingress as usize] = target;
                            }
                            AclActionTag::EgressSamplePacket => {
                                candidate.sample_oid[SampleDirection::Egress as usize] = target;
                            }
                            _ => {}
                        }
                        candidate.actions.push(action);
                    } else {
                        return Err(SaiStatus::UnknownAttribute(0));
                    }
                }
            }
            candidate
        };

        self.validate_rule_cross_refs(&candidate)?;

        let merged = merge_rule(&existing, &candidate);
        let delta = compute_rule_delta(&existing, &candidate);

        // Samplepacket rebinding is pre-validated before any hardware
        // change; a failed new binding restores the old one and aborts.
        let sample_affected = affects_sample_binding(attr.id);
        let mut rebound_dirs: Vec<SampleDirection> = Vec::new();
        if sample_affected {
            if let Err(status) = self.samplepacket_prevalidate(&existing, &merged, &mut rebound_dirs)
            {
                return Err(status);
            }
        }

        // One NPU operation sees the candidate, the delta, and the original;
        // if it rejects, nothing has been committed.
        let push = {
            let table = self.tables.get(table_oid).ok_or(SaiStatus::Failure)?;
            self.npu.set_acl_rule(table, &candidate, &delta, &existing)
        };
        if let Err(status) = push {
            if sample_affected {
                self.samplepacket_restore(&existing, &rebound_dirs);
            }
            return Err(status);
        }

        // Commit. Counter rebinding drives the NPU attach/detach protocol;
        // range references follow the merged filter contents.
        if existing.counter_oid != merged.counter_oid {
            if !existing.counter_oid.is_null() {
                self.detach_counter(&existing)?;
            }
            if !merged.counter_oid.is_null() {
                self.attach_counter(&merged)?;
            }
        }

        let range_list_touched = candidate
            .filters
            .iter()
            .any(|f| f.field == AclField::RangeList);
        if range_list_touched {
            self.release_range_refs(&existing);
            self.take_range_refs(&merged);
        }

        if let Some(new_priority) = delta.priority_change {
            let table = self.tables.get_mut(table_oid).ok_or(SaiStatus::Failure)?;
            if !table.reposition_rule(oid, new_priority) {
                return Err(SaiStatus::Failure);
            }
        }

        let old_policer = existing.policer_oid;
        let new_policer = merged.policer_oid;

        let stored = self.rules.get_mut(oid).ok_or(SaiStatus::Failure)?;
        *stored = merged.clone();

        // Policer rebinding is driven separately from the field/action
        // commit.
        if old_policer != new_policer {
            let table = self.tables.get(table_oid).ok_or(SaiStatus::Failure)?;
            self.npu
                .update_policer_acl_rule(table, &merged, old_policer, new_policer)?;
            if !old_policer.is_null() {
                self.peers.policer.detach_acl_rule(old_policer, oid)?;
            }
            if !new_policer.is_null() {
                self.peers.policer.attach_acl_rule(new_policer, oid)?;
            }
        }

        // Re-run the samplepacket update in commit mode.
        if sample_affected {
            self.samplepacket_commit(&merged, &rebound_dirs)?;
        }

        log::debug!("set ACL rule {} attribute {}", oid, attr.id);
        Ok(())
    }

    /// Step one of the rebinding protocol: drop the old port binding and
    /// check the new one would be accepted. Directions actually rebound are
    /// recorded so the caller can restore or commit them.
    fn samplepacket_prevalidate(
        &self,
        existing: &AclRule,
        merged: &AclRule,
        rebound_dirs: &mut Vec<SampleDirection>,
    ) -> SaiResult<()> {
        for dir in [SampleDirection::Ingress, SampleDirection::Egress] {
            let (old_sample, old_ports) = sample_binding(existing, dir);
            let (new_sample, new_ports) = sample_binding(merged, dir);
            if old_sample == new_sample && old_ports == new_ports {
                continue;
            }

            if !old_sample.is_null() {
                self.peers
                    .samplepacket
                    .remove_object(old_ports.as_deref(), old_sample, dir)?;
            }
            if !new_sample.is_null() {
                if let Err(status) = self.peers.samplepacket.validate_object(
                    new_ports.as_deref(),
                    new_sample,
                    dir,
                    true,
                    false,
                ) {
                    // Restore the binding we just dropped.
                    if !old_sample.is_null() {
                        let _ = self.peers.samplepacket.validate_object(
                            old_ports.as_deref(),
                            old_sample,
                            dir,
                            true,
                            true,
                        );
                    }
                    // Earlier directions were already rebound; put them back.
                    self.samplepacket_restore(existing, rebound_dirs);
                    return Err(status);
                }
            }
            rebound_dirs.push(dir);
        }
        Ok(())
    }

    /// Puts the original bindings back after a failed push.
    fn samplepacket_restore(&self, existing: &AclRule, rebound_dirs: &[SampleDirection]) {
        for dir in rebound_dirs {
            let (old_sample, old_ports) = sample_binding(existing, *dir);
            if !old_sample.is_null() {
                let _ = self.peers.samplepacket.validate_object(
                    old_ports.as_deref(),
                    old_sample,
                    *dir,
                    true,
                    true,
                );
            }
        }
    }

    /// Step two of the rebinding protocol, after the NPU accepted the rule.
    fn samplepacket_commit(
        &self,
        merged: &AclRule,
        rebound_dirs: &[SampleDirection],
    ) -> SaiResult<()> {
        for dir in rebound_dirs {
            let (new_sample, new_ports) = sample_binding(merged, *dir);
            if !new_sample.is_null() {
                self.peers.samplepacket.validate_object(
                    new_ports.as_deref(),
                    new_sample,
                    *dir,
                    false,
                    true,
                )?;
            }
        }
        Ok(())
    }
}
