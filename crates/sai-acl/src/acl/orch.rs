//! ACL orchestrator: registries and the create/delete/get protocols.
//!
//! Every entry point validates the caller's attribute list, resolves its
//! targets in the registries, enacts the change against the NPU and peer
//! managers, and either commits or unwinds. The rule-set protocol (the
//! delta engine) lives in the sibling `update` module.

use std::sync::Arc;

use sai_common::{
    validate_attr_list, AclActionValue, AclFieldValue, AttrOp, AttrValue, Attribute, MatchValue,
    ObjectType, Oid, SaiResult, SaiStatus,
};

use super::attr::{
    AclActionTag, AclField, CounterSchema, EntrySchema, RangeSchema, TableGroupMemberSchema,
    TableGroupSchema, TableSchema, ValueKind, COUNTER_ATTR_BYTES, COUNTER_ATTR_ENABLE_BYTE_COUNT,
    COUNTER_ATTR_ENABLE_PACKET_COUNT, COUNTER_ATTR_PACKETS, COUNTER_ATTR_TABLE_ID,
    ENTRY_ATTR_ADMIN_STATE, ENTRY_ATTR_PRIORITY, ENTRY_ATTR_TABLE_ID, RANGE_ATTR_LIMIT,
    RANGE_ATTR_TYPE, TABLE_ATTR_GROUP_ID, TABLE_ATTR_PRIORITY, TABLE_ATTR_SIZE, TABLE_ATTR_STAGE,
    TABLE_GROUP_ATTR_BIND_POINT_TYPE_LIST, TABLE_GROUP_ATTR_STAGE, TABLE_GROUP_ATTR_TYPE,
    TABLE_GROUP_MEMBER_ATTR_GROUP_ID, TABLE_GROUP_MEMBER_ATTR_PRIORITY,
    TABLE_GROUP_MEMBER_ATTR_TABLE_ID,
};
use super::counter::AclCounter;
use super::filter::{AclAction, AclFilter};
use super::group::{AclTableGroup, AclTableGroupMember};
use super::range::AclRange;
use super::rule::AclRule;
use super::table::{AclTable, UdfFieldBinding};
use super::types::{
    AclBindPointType, AclCounterType, AclGroupType, AclRangeType, AclStage,
};
use crate::idgen::IdAllocator;
use crate::npu::AclNpuApi;
use crate::peers::{PeerHooks, PolicerMode, SampleDirection};
use crate::registry::ObjectMap;
use crate::udf::{UdfGroupType, UdfLookup};

/// The ACL control-plane state. Entry points are serialized by the service
/// facade's mutex; within an operation execution is straight-line except
/// for calls out to the NPU and peer managers.
pub struct AclOrch {
    pub(super) npu: Arc<dyn AclNpuApi>,
    pub(super) peers: PeerHooks,
    pub(super) udf: Arc<dyn UdfLookup>,
    pub(super) tables: ObjectMap<AclTable>,
    pub(super) rules: ObjectMap<AclRule>,
    pub(super) counters: ObjectMap<AclCounter>,
    pub(super) ranges: ObjectMap<AclRange>,
    pub(super) groups: ObjectMap<AclTableGroup>,
    pub(super) members: ObjectMap<AclTableGroupMember>,
    pub(super) table_ids: IdAllocator,
    pub(super) rule_ids: IdAllocator,
    pub(super) counter_ids: IdAllocator,
    pub(super) range_ids: IdAllocator,
    pub(super) group_ids: IdAllocator,
    pub(super) member_ids: IdAllocator,
}

impl AclOrch {
    pub fn new(npu: Arc<dyn AclNpuApi>, peers: PeerHooks, udf: Arc<dyn UdfLookup>) -> Self {
        Self {
            npu,
            peers,
            udf,
            tables: ObjectMap::new(),
            rules: ObjectMap::new(),
            counters: ObjectMap::new(),
            ranges: ObjectMap::new(),
            groups: ObjectMap::new(),
            members: ObjectMap::new(),
            table_ids: IdAllocator::new(),
            rule_ids: IdAllocator::new(),
            counter_ids: IdAllocator::new(),
            range_ids: IdAllocator::new(),
            group_ids: IdAllocator::new(),
            member_ids: IdAllocator::new(),
        }
    }

    // Read-side accessors, used by the service facade and tests.

    pub fn table(&self, oid: Oid) -> Option<&AclTable> {
        self.tables.get(oid)
    }

    pub fn rule(&self, oid: Oid) -> Option<&AclRule> {
        self.rules.get(oid)
    }

    pub fn counter(&self, oid: Oid) -> Option<&AclCounter> {
        self.counters.get(oid)
    }

    pub fn range(&self, oid: Oid) -> Option<&AclRange> {
        self.ranges.get(oid)
    }

    pub fn group(&self, oid: Oid) -> Option<&AclTableGroup> {
        self.groups.get(oid)
    }

    pub fn group_member(&self, oid: Oid) -> Option<&AclTableGroupMember> {
        self.members.get(oid)
    }

    pub fn total_rule_count(&self) -> usize {
        self.rules.len()
    }

    // ============ ACL table ============

    pub fn create_acl_table(&mut self, attrs: &[Attribute]) -> SaiResult<Oid> {
        validate_attr_list(attrs, AttrOp::Create, &TableSchema)?;

        let mut stage = AclStage::default();
        let mut priority = 0u32;
        let mut size = 0u32;
        let mut group_oid = None;
        let mut priority_index = 0u32;
        let mut group_index = 0u32;
        let mut fields: Vec<AclField> = Vec::new();
        let mut udf_bindings: Vec<UdfFieldBinding> = Vec::new();

        for (index, attr) in attrs.iter().enumerate() {
            let idx = index as u32;
            match attr.id {
                TABLE_ATTR_STAGE => {
                    let raw = attr
                        .value
                        .as_s32()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    stage = AclStage::from_raw(raw).ok_or(SaiStatus::InvalidAttrValue(idx))?;
                }
                TABLE_ATTR_PRIORITY => {
                    priority = attr
                        .value
                        .as_u32()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    priority_index = idx;
                }
                TABLE_ATTR_SIZE => {
                    size = attr
                        .value
                        .as_u32()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                }
                TABLE_ATTR_GROUP_ID => {
                    let oid = attr
                        .value
                        .as_oid()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    if !oid.is_of_type(ObjectType::AclTableGroup) {
                        return Err(SaiStatus::InvalidAttrValue(idx));
                    }
                    group_oid = Some(oid);
                    group_index = idx;
                }
                id => {
                    let field = AclField::from_table_attr(id)
                        .ok_or(SaiStatus::UnknownAttribute(idx))?;
                    if let AclField::UserDefined(slot) = field {
                        let udf_group = attr
                            .value
                            .as_oid()
                            .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                        if !udf_group.is_of_type(ObjectType::UdfGroup) {
                            return Err(SaiStatus::InvalidAttrValue(idx));
                        }
                        // HASH groups feed the hashing subsystem, not ACL.
                        let group_type = self
                            .udf
                            .group_type(udf_group)
                            .map_err(|_| SaiStatus::InvalidAttrValue(idx))?;
                        if group_type != UdfGroupType::Generic {
                            log::error!(
                                "UDF group {} has type {}, only GENERIC is valid on a table",
                                udf_group,
                                group_type
                            );
                            return Err(SaiStatus::InvalidAttrValue(idx));
                        }
                        let hw_id = self
                            .udf
                            .group_hw_id(udf_group)
                            .map_err(|_| SaiStatus::InvalidAttrValue(idx))?;
                        udf_bindings.push(UdfFieldBinding {
                            slot,
                            group_oid: udf_group,
                            group_npu_id: hw_id,
                        });
                        fields.push(field);
                    } else {
                        let enabled = attr.value.as_bool().unwrap_or(true);
                        if enabled {
                            fields.push(field);
                        }
                    }
                }
            }
        }

        if fields.is_empty() {
            log::error!("table create carries no match fields");
            return Err(SaiStatus::MandatoryAttributeMissing);
        }

        // At most one live table per (priority, stage).
        if self
            .tables
            .values()
            .any(|t| t.priority == priority && t.stage == stage)
        {
            log::error!(
                "a table with priority {} already exists at stage {}",
                priority,
                stage
            );
            return Err(SaiStatus::InvalidAttrValue(priority_index));
        }

        if let Some(group) = group_oid {
            let group_node = self.groups.get(group).ok_or(SaiStatus::InvalidObjectId)?;
            if group_node.stage != stage {
                log::error!(
                    "group {} is at stage {}, table wants {}",
                    group,
                    group_node.stage,
                    stage
                );
                return Err(SaiStatus::InvalidAttrValue(group_index));
            }
        }

        self.npu.validate_acl_table_fields(stage, &fields)?;

        let index = {
            let tables = &self.tables;
            self.table_ids
                .next_id(|idx| tables.contains(Oid::new(ObjectType::AclTable, idx)))?
        };
        let oid = Oid::new(ObjectType::AclTable, index);

        let mut table = AclTable::new(oid, stage, priority);
        table.size = size;
        table.group_oid = group_oid;
        table.virtual_group = group_oid.is_some();
        table.field_set = fields;
        table.udf_field_set = udf_bindings;

        // Fixed-size tables and tables bound to a group are carved out of
        // hardware up front; everything else waits for the first rule or
        // counter.
        if table.size > 0 || table.virtual_group {
            let handle = self.npu.create_acl_table(&table)?;
            table.npu_handle = Some(handle);
        }

        if let Some(group) = group_oid {
            if let Some(group_node) = self.groups.get_mut(group) {
                group_node.ref_count += 1;
            }
        }

        log::info!(
            "created ACL table {} stage {} priority {}",
            oid,
            stage,
            priority
        );
        self.tables.insert(oid, table);
        Ok(oid)
    }

    pub fn delete_acl_table(&mut self, oid: Oid) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclTable) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let table = self.tables.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        if table.rule_count > 0 || table.counter_count > 0 {
            log::error!(
                "table {} still has {} rules and {} counters",
                oid,
                table.rule_count,
                table.counter_count
            );
            return Err(SaiStatus::ObjectInUse);
        }

        // Registry first; a hardware failure reinserts.
        let table = self.tables.remove(oid).ok_or(SaiStatus::InvalidObjectId)?;
        if table.is_materialized() {
            if let Err(status) = self.npu.delete_acl_table(&table) {
                self.tables.insert(oid, table);
                return Err(status);
            }
        }
        if let Some(group) = table.group_oid {
            if let Some(group_node) = self.groups.get_mut(group) {
                group_node.ref_count = group_node.ref_count.saturating_sub(1);
            }
        }
        log::info!("deleted ACL table {}", oid);
        Ok(())
    }

    /// Table attributes are create-only.
    pub fn set_acl_table(&mut self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclTable) {
            return Err(SaiStatus::InvalidObjectType);
        }
        if !self.tables.contains(oid) {
            return Err(SaiStatus::InvalidObjectId);
        }
        validate_attr_list(std::slice::from_ref(attr), AttrOp::Set, &TableSchema)?;
        Err(SaiStatus::NotSupported)
    }

    pub fn get_acl_table(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclTable) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let table = self.tables.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        validate_attr_list(attrs, AttrOp::Get, &TableSchema)?;

        for attr in attrs.iter_mut() {
            match attr.id {
                TABLE_ATTR_STAGE => attr.value = AttrValue::S32(table.stage.to_raw()),
                TABLE_ATTR_PRIORITY => attr.value = AttrValue::U32(table.priority),
                TABLE_ATTR_SIZE => attr.value = AttrValue::U32(table.size),
                TABLE_ATTR_GROUP_ID => {
                    attr.value = AttrValue::Oid(table.group_oid.unwrap_or(Oid::NULL))
                }
                id => {
                    if let Some(field) = AclField::from_table_attr(id) {
                        if let AclField::UserDefined(slot) = field {
                            let group = table
                                .udf_binding(slot)
                                .map(|b| b.group_oid)
                                .unwrap_or(Oid::NULL);
                            attr.value = AttrValue::Oid(group);
                        } else {
                            attr.value = AttrValue::Bool(table.supports_field(field));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    // ============ ACL rule: create / delete / get ============

    pub fn create_acl_rule(&mut self, attrs: &[Attribute]) -> SaiResult<Oid> {
        validate_attr_list(attrs, AttrOp::Create, &EntrySchema)?;

        let mut field_count = 0usize;
        let mut table_oid = Oid::NULL;
        for (index, attr) in attrs.iter().enumerate() {
            if AclField::from_entry_attr(attr.id).is_some() {
                field_count += 1;
            } else if attr.id == ENTRY_ATTR_TABLE_ID {
                table_oid = attr
                    .value
                    .as_oid()
                    .ok_or(SaiStatus::InvalidAttrValue(index as u32))?;
                if !table_oid.is_of_type(ObjectType::AclTable) {
                    return Err(SaiStatus::InvalidAttrValue(index as u32));
                }
            }
        }
        if field_count == 0 {
            log::error!("rule create carries no match fields");
            return Err(SaiStatus::MandatoryAttributeMissing);
        }

        let mut rule = {
            let table = self
                .tables
                .get(table_oid)
                .ok_or(SaiStatus::InvalidObjectId)?;
            self.populate_rule(table, attrs)?
        };

        self.validate_rule_cross_refs(&rule)?;

        let index = {
            let rules = &self.rules;
            self.rule_ids
                .next_id(|idx| rules.contains(Oid::new(ObjectType::AclEntry, idx)))?
        };
        rule.oid = Oid::new(ObjectType::AclEntry, index);

        // Deferred-materialization tables are realized by their first rule.
        self.materialize_table(table_oid)?;

        let handle = {
            let table = self.tables.get(table_oid).ok_or(SaiStatus::Failure)?;
            self.npu.create_acl_rule(table, &rule)?
        };
        rule.npu_handle = Some(handle);

        if rule.has_any_sample() {
            if let Err(status) = self.samplepacket_bind(&rule) {
                self.undo_rule_install(table_oid, &rule, false, false, false);
                return Err(status);
            }
        }

        if !rule.counter_oid.is_null() {
            if let Err(status) = self.attach_counter(&rule) {
                self.undo_rule_install(table_oid, &rule, true, false, false);
                return Err(status);
            }
        }

        if !rule.policer_oid.is_null() {
            if let Err(status) = self.attach_policer(&rule) {
                self.undo_rule_install(table_oid, &rule, true, true, false);
                return Err(status);
            }
        }

        self.take_range_refs(&rule);
        let table = self.tables.get_mut(table_oid).ok_or(SaiStatus::Failure)?;
        table.link_rule(rule.oid, rule.priority);
        let oid = rule.oid;
        log::info!("created ACL rule {} in table {}", oid, table_oid);
        self.rules.insert(oid, rule);
        Ok(oid)
    }

    pub fn delete_acl_rule(&mut self, oid: Oid) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclEntry) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let rule = self.rules.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        let table_oid = rule.table_oid;
        let table = self
            .tables
            .get(table_oid)
            .ok_or(SaiStatus::InvalidObjectId)?;
        // The rule must be linked into its table's rule list; anything else
        // is a data-structure inconsistency, not a recoverable state.
        if !table.has_rule(oid) {
            log::error!("rule {} missing from table {} rule list", oid, table_oid);
            return Err(SaiStatus::Failure);
        }

        let rule = rule.clone();
        let mut sample_removed = false;
        let mut counter_detached = false;
        let mut policer_detached = false;
        let status = loop {
            if rule.has_any_sample() {
                if let Err(status) = self.samplepacket_unbind_checked(&rule) {
                    break Err(status);
                }
                sample_removed = true;
            }
            if !rule.counter_oid.is_null() {
                if let Err(status) = self.detach_counter(&rule) {
                    break Err(status);
                }
                counter_detached = true;
            }
            if !rule.policer_oid.is_null() {
                if let Err(status) = self.detach_policer(&rule) {
                    break Err(status);
                }
                policer_detached = true;
            }
            let table = self.tables.get(table_oid).ok_or(SaiStatus::Failure)?;
            if let Err(status) = self.npu.delete_acl_rule(table, &rule) {
                break Err(status);
            }
            break Ok(());
        };

        if let Err(status) = status {
            // Restore what was undone so the rule survives unchanged.
            if sample_removed {
                let _ = self.samplepacket_bind(&rule);
            }
            if counter_detached {
                let _ = self.attach_counter(&rule);
            }
            if policer_detached {
                let _ = self.attach_policer(&rule);
            }
            return Err(status);
        }

        self.release_range_refs(&rule);
        let table = self.tables.get_mut(table_oid).ok_or(SaiStatus::Failure)?;
        if !table.unlink_rule(oid) {
            return Err(SaiStatus::Failure);
        }
        self.rules.remove(oid);
        log::info!("deleted ACL rule {} from table {}", oid, table_oid);
        Ok(())
    }

    pub fn get_acl_rule(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclEntry) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let rule = self.rules.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        let table = self
            .tables
            .get(rule.table_oid)
            .ok_or(SaiStatus::Failure)?;
        validate_attr_list(attrs, AttrOp::Get, &EntrySchema)?;

        for attr in attrs.iter_mut() {
            match attr.id {
                ENTRY_ATTR_TABLE_ID => attr.value = AttrValue::Oid(rule.table_oid),
                ENTRY_ATTR_PRIORITY => attr.value = AttrValue::U32(rule.priority),
                ENTRY_ATTR_ADMIN_STATE => attr.value = AttrValue::Bool(rule.admin_state),
                id => {
                    if let Some(mut field) = AclField::from_entry_attr(id) {
                        // Reads follow the same aliasing as writes.
                        if field == AclField::OutPort && table.stage == AclStage::Ingress {
                            field = AclField::DstPort;
                        }
                        let filter = rule.filter(field).ok_or(SaiStatus::ItemNotFound)?;
                        attr.value = AttrValue::AclField(AclFieldValue {
                            enable: filter.enable,
                            data: filter.data.clone(),
                            mask: filter.mask.clone(),
                        });
                    } else if let Some(tag) = AclActionTag::from_entry_attr(id) {
                        let action = rule.action(tag).ok_or(SaiStatus::ItemNotFound)?;
                        attr.value = AttrValue::AclAction(AclActionValue {
                            enable: action.enable,
                            parameter: action.parameter.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // ============ ACL counter ============

    pub fn create_acl_counter(&mut self, attrs: &[Attribute]) -> SaiResult<Oid> {
        validate_attr_list(attrs, AttrOp::Create, &CounterSchema)?;

        let mut table_oid = Oid::NULL;
        let mut packet_count = false;
        let mut byte_count = false;
        let mut byte_attr_seen = false;
        let mut byte_attr_index = 0u32;

        for (index, attr) in attrs.iter().enumerate() {
            let idx = index as u32;
            match attr.id {
                COUNTER_ATTR_TABLE_ID => {
                    table_oid = attr
                        .value
                        .as_oid()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    if !table_oid.is_of_type(ObjectType::AclTable) {
                        return Err(SaiStatus::InvalidAttrValue(idx));
                    }
                }
                COUNTER_ATTR_ENABLE_PACKET_COUNT => {
                    packet_count = attr
                        .value
                        .as_bool()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                }
                COUNTER_ATTR_ENABLE_BYTE_COUNT => {
                    byte_attr_seen = true;
                    byte_attr_index = idx;
                    byte_count = attr
                        .value
                        .as_bool()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                }
                _ => {}
            }
        }

        let counter_type = if packet_count && byte_count {
            AclCounterType::BytesPackets
        } else if packet_count {
            AclCounterType::Packets
        } else {
            // An explicit "no byte count" with nothing else enabled leaves
            // the counter without a type.
            if byte_attr_seen && !byte_count {
                return Err(SaiStatus::InvalidAttrValue(byte_attr_index));
            }
            AclCounterType::Bytes
        };

        if !self.tables.contains(table_oid) {
            return Err(SaiStatus::InvalidObjectId);
        }

        // Counters are NPU objects; the owning table must exist in hardware
        // before the first one is carved out.
        self.materialize_table(table_oid)?;

        let index = {
            let counters = &self.counters;
            self.counter_ids
                .next_id(|idx| counters.contains(Oid::new(ObjectType::AclCounter, idx)))?
        };
        let oid = Oid::new(ObjectType::AclCounter, index);

        let mut cntr = AclCounter::new(oid, table_oid, counter_type);
        let handle = {
            let table = self.tables.get(table_oid).ok_or(SaiStatus::Failure)?;
            self.npu.create_acl_cntr(table, &cntr)?
        };
        cntr.npu_handle = Some(handle);

        let table = self.tables.get_mut(table_oid).ok_or(SaiStatus::Failure)?;
        table.counter_count += 1;
        self.counters.insert(oid, cntr);
        log::info!("created ACL counter {} type {} on table {}", oid, counter_type, table_oid);
        Ok(oid)
    }

    pub fn delete_acl_counter(&mut self, oid: Oid) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclCounter) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let cntr = self.counters.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        if cntr.shared_count > 0 {
            log::error!(
                "counter {} still referenced by {} rules",
                oid,
                cntr.shared_count
            );
            return Err(SaiStatus::ObjectInUse);
        }

        let cntr = self
            .counters
            .remove(oid)
            .ok_or(SaiStatus::InvalidObjectId)?;
        if let Err(status) = self.npu.delete_acl_cntr(&cntr) {
            self.counters.insert(oid, cntr);
            return Err(status);
        }
        if let Some(table) = self.tables.get_mut(cntr.table_oid) {
            table.counter_count = table.counter_count.saturating_sub(1);
        }
        log::info!("deleted ACL counter {}", oid);
        Ok(())
    }

    pub fn set_acl_counter(&mut self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclCounter) {
            return Err(SaiStatus::InvalidObjectType);
        }
        validate_attr_list(std::slice::from_ref(attr), AttrOp::Set, &CounterSchema)?;
        let cntr = self.counters.get(oid).ok_or(SaiStatus::InvalidObjectId)?;

        let value = attr.value.as_u64().ok_or(SaiStatus::InvalidAttrValue(0))?;
        match attr.id {
            COUNTER_ATTR_PACKETS => {
                if !cntr.counter_type.counts_packets() {
                    return Err(SaiStatus::InvalidAttribute(0));
                }
                self.npu.set_acl_cntr(cntr, Some(value), None)
            }
            COUNTER_ATTR_BYTES => {
                if !cntr.counter_type.counts_bytes() {
                    return Err(SaiStatus::InvalidAttribute(0));
                }
                self.npu.set_acl_cntr(cntr, None, Some(value))
            }
            _ => Err(SaiStatus::AttrNotSupported(0)),
        }
    }

    pub fn get_acl_counter(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclCounter) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let cntr = self.counters.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        validate_attr_list(attrs, AttrOp::Get, &CounterSchema)?;

        // Count reads fetch from hardware once; the NPU returns packets
        // first for dual counters.
        let wants_counts = attrs
            .iter()
            .any(|a| a.id == COUNTER_ATTR_PACKETS || a.id == COUNTER_ATTR_BYTES);
        let mut values = vec![0u64; cntr.counter_type.value_count()];
        if wants_counts {
            self.npu.get_acl_cntr(cntr, &mut values)?;
        }

        for (index, attr) in attrs.iter_mut().enumerate() {
            let idx = index as u32;
            match attr.id {
                COUNTER_ATTR_TABLE_ID => attr.value = AttrValue::Oid(cntr.table_oid),
                COUNTER_ATTR_ENABLE_PACKET_COUNT => {
                    attr.value = AttrValue::Bool(cntr.counter_type.counts_packets())
                }
                COUNTER_ATTR_ENABLE_BYTE_COUNT => {
                    attr.value = AttrValue::Bool(cntr.counter_type.counts_bytes())
                }
                COUNTER_ATTR_PACKETS => {
                    if !cntr.counter_type.counts_packets() {
                        return Err(SaiStatus::InvalidAttribute(idx));
                    }
                    attr.value = AttrValue::U64(values[0]);
                }
                COUNTER_ATTR_BYTES => {
                    if !cntr.counter_type.counts_bytes() {
                        return Err(SaiStatus::InvalidAttribute(idx));
                    }
                    let slot = match cntr.counter_type {
                        AclCounterType::BytesPackets => 1,
                        _ => 0,
                    };
                    attr.value = AttrValue::U64(values[slot]);
                }
                _ => {}
            }
        }
        Ok(())
    }

    // ============ ACL range ============

    pub fn create_acl_range(&mut self, attrs: &[Attribute]) -> SaiResult<Oid> {
        validate_attr_list(attrs, AttrOp::Create, &RangeSchema)?;

        let mut range_type = None;
        let mut limit = None;
        for (index, attr) in attrs.iter().enumerate() {
            let idx = index as u32;
            match attr.id {
                RANGE_ATTR_TYPE => {
                    let raw = attr
                        .value
                        .as_s32()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    range_type = Some(
                        AclRangeType::from_raw(raw).ok_or(SaiStatus::InvalidAttrValue(idx))?,
                    );
                }
                RANGE_ATTR_LIMIT => {
                    let (min, max) = attr
                        .value
                        .as_u32_range()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    if min > max {
                        return Err(SaiStatus::InvalidAttrValue(idx));
                    }
                    limit = Some((min, max));
                }
                _ => {}
            }
        }
        let range_type = range_type.ok_or(SaiStatus::MandatoryAttributeMissing)?;
        let (min, max) = limit.ok_or(SaiStatus::MandatoryAttributeMissing)?;

        let index = {
            let ranges = &self.ranges;
            self.range_ids
                .next_id(|idx| ranges.contains(Oid::new(ObjectType::AclRange, idx)))?
        };
        let oid = Oid::new(ObjectType::AclRange, index);

        let mut range = AclRange::new(oid, range_type, min, max);
        let handle = self.npu.create_acl_range(&range)?;
        range.npu_handle = Some(handle);
        self.ranges.insert(oid, range);
        log::info!("created ACL range {} {} [{}, {}]", oid, range_type, min, max);
        Ok(oid)
    }

    pub fn delete_acl_range(&mut self, oid: Oid) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclRange) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let range = self.ranges.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        if range.ref_count > 0 {
            return Err(SaiStatus::ObjectInUse);
        }

        let range = self.ranges.remove(oid).ok_or(SaiStatus::InvalidObjectId)?;
        if let Err(status) = self.npu.delete_acl_range(&range) {
            self.ranges.insert(oid, range);
            return Err(status);
        }
        Ok(())
    }

    pub fn set_acl_range(&mut self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclRange) {
            return Err(SaiStatus::InvalidObjectType);
        }
        validate_attr_list(std::slice::from_ref(attr), AttrOp::Set, &RangeSchema)?;
        let range = self.ranges.get(oid).ok_or(SaiStatus::InvalidObjectId)?;

        // Snapshot, push, commit; the stored range never holds a limit the
        // hardware rejected.
        let (min, max) = attr.value.as_u32_range().ok_or(SaiStatus::InvalidAttrValue(0))?;
        if min > max {
            return Err(SaiStatus::InvalidAttrValue(0));
        }
        let mut snapshot = range.clone();
        snapshot.min = min;
        snapshot.max = max;
        self.npu.set_acl_range(&snapshot)?;

        let range = self.ranges.get_mut(oid).ok_or(SaiStatus::Failure)?;
        *range = snapshot;
        Ok(())
    }

    pub fn get_acl_range(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclRange) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let range = self.ranges.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        validate_attr_list(attrs, AttrOp::Get, &RangeSchema)?;

        for attr in attrs.iter_mut() {
            match attr.id {
                RANGE_ATTR_TYPE => attr.value = AttrValue::S32(range.range_type.to_raw()),
                RANGE_ATTR_LIMIT => {
                    attr.value = AttrValue::U32Range {
                        min: range.min,
                        max: range.max,
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    // ============ ACL table group ============

    pub fn create_acl_table_group(&mut self, attrs: &[Attribute]) -> SaiResult<Oid> {
        validate_attr_list(attrs, AttrOp::Create, &TableGroupSchema)?;

        let mut stage = AclStage::default();
        let mut group_type = AclGroupType::default();
        let mut bind_points = Vec::new();
        for (index, attr) in attrs.iter().enumerate() {
            let idx = index as u32;
            match attr.id {
                TABLE_GROUP_ATTR_STAGE => {
                    let raw = attr
                        .value
                        .as_s32()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    stage = AclStage::from_raw(raw).ok_or(SaiStatus::InvalidAttrValue(idx))?;
                }
                TABLE_GROUP_ATTR_TYPE => {
                    let raw = attr
                        .value
                        .as_s32()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    group_type =
                        AclGroupType::from_raw(raw).ok_or(SaiStatus::InvalidAttrValue(idx))?;
                }
                TABLE_GROUP_ATTR_BIND_POINT_TYPE_LIST => {
                    let raw_list = attr
                        .value
                        .as_s32_list()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    for raw in raw_list {
                        bind_points.push(
                            AclBindPointType::from_raw(*raw)
                                .ok_or(SaiStatus::InvalidAttrValue(idx))?,
                        );
                    }
                }
                _ => {}
            }
        }

        let index = {
            let groups = &self.groups;
            self.group_ids
                .next_id(|idx| groups.contains(Oid::new(ObjectType::AclTableGroup, idx)))?
        };
        let oid = Oid::new(ObjectType::AclTableGroup, index);

        let mut group = AclTableGroup::new(oid, stage, group_type);
        group.bind_point_types = bind_points;
        self.groups.insert(oid, group);
        log::info!("created ACL table group {} stage {}", oid, stage);
        Ok(oid)
    }

    pub fn delete_acl_table_group(&mut self, oid: Oid) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclTableGroup) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let group = self.groups.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        if !group.members.is_empty() || group.ref_count > 0 {
            return Err(SaiStatus::ObjectInUse);
        }
        self.groups.remove(oid);
        Ok(())
    }

    /// Table-group attributes are create-only.
    pub fn set_acl_table_group(&mut self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclTableGroup) {
            return Err(SaiStatus::InvalidObjectType);
        }
        if !self.groups.contains(oid) {
            return Err(SaiStatus::InvalidObjectId);
        }
        validate_attr_list(std::slice::from_ref(attr), AttrOp::Set, &TableGroupSchema)?;
        Err(SaiStatus::NotSupported)
    }

    pub fn get_acl_table_group(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclTableGroup) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let group = self.groups.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        validate_attr_list(attrs, AttrOp::Get, &TableGroupSchema)?;

        for attr in attrs.iter_mut() {
            match attr.id {
                TABLE_GROUP_ATTR_STAGE => attr.value = AttrValue::S32(group.stage.to_raw()),
                TABLE_GROUP_ATTR_TYPE => attr.value = AttrValue::S32(group.group_type.to_raw()),
                TABLE_GROUP_ATTR_BIND_POINT_TYPE_LIST => {
                    attr.value = AttrValue::S32List(
                        group.bind_point_types.iter().map(|b| b.to_raw()).collect(),
                    )
                }
                _ => {}
            }
        }
        Ok(())
    }

    // ============ ACL table group member ============

    pub fn create_acl_table_group_member(&mut self, attrs: &[Attribute]) -> SaiResult<Oid> {
        validate_attr_list(attrs, AttrOp::Create, &TableGroupMemberSchema)?;

        let mut group_oid = Oid::NULL;
        let mut table_oid = Oid::NULL;
        let mut priority = 0u32;
        for (index, attr) in attrs.iter().enumerate() {
            let idx = index as u32;
            match attr.id {
                TABLE_GROUP_MEMBER_ATTR_GROUP_ID => {
                    group_oid = attr
                        .value
                        .as_oid()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    if !group_oid.is_of_type(ObjectType::AclTableGroup) {
                        return Err(SaiStatus::InvalidAttrValue(idx));
                    }
                }
                TABLE_GROUP_MEMBER_ATTR_TABLE_ID => {
                    table_oid = attr
                        .value
                        .as_oid()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                    if !table_oid.is_of_type(ObjectType::AclTable) {
                        return Err(SaiStatus::InvalidAttrValue(idx));
                    }
                }
                TABLE_GROUP_MEMBER_ATTR_PRIORITY => {
                    priority = attr
                        .value
                        .as_u32()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                }
                _ => {}
            }
        }

        if !self.groups.contains(group_oid) || !self.tables.contains(table_oid) {
            return Err(SaiStatus::InvalidObjectId);
        }

        let index = {
            let members = &self.members;
            self.member_ids.next_id(|idx| {
                members.contains(Oid::new(ObjectType::AclTableGroupMember, idx))
            })?
        };
        let oid = Oid::new(ObjectType::AclTableGroupMember, index);

        // Membership carries the priority: the target table inherits it.
        let table = self.tables.get_mut(table_oid).ok_or(SaiStatus::Failure)?;
        table.priority = priority;

        let group = self.groups.get_mut(group_oid).ok_or(SaiStatus::Failure)?;
        group.members.push(oid);

        self.members.insert(
            oid,
            AclTableGroupMember {
                oid,
                group_oid,
                table_oid,
                priority,
            },
        );
        log::info!(
            "added table {} to group {} at priority {}",
            table_oid,
            group_oid,
            priority
        );
        Ok(oid)
    }

    pub fn delete_acl_table_group_member(&mut self, oid: Oid) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclTableGroupMember) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let member = self.members.remove(oid).ok_or(SaiStatus::InvalidObjectId)?;
        if let Some(group) = self.groups.get_mut(member.group_oid) {
            group.members.retain(|m| *m != oid);
        }
        Ok(())
    }

    /// Member attributes are create-only.
    pub fn set_acl_table_group_member(&mut self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclTableGroupMember) {
            return Err(SaiStatus::InvalidObjectType);
        }
        if !self.members.contains(oid) {
            return Err(SaiStatus::InvalidObjectId);
        }
        validate_attr_list(
            std::slice::from_ref(attr),
            AttrOp::Set,
            &TableGroupMemberSchema,
        )?;
        Err(SaiStatus::NotSupported)
    }

    pub fn get_acl_table_group_member(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::AclTableGroupMember) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let member = self.members.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        validate_attr_list(attrs, AttrOp::Get, &TableGroupMemberSchema)?;

        for attr in attrs.iter_mut() {
            match attr.id {
                TABLE_GROUP_MEMBER_ATTR_GROUP_ID => attr.value = AttrValue::Oid(member.group_oid),
                TABLE_GROUP_MEMBER_ATTR_TABLE_ID => attr.value = AttrValue::Oid(member.table_oid),
                TABLE_GROUP_MEMBER_ATTR_PRIORITY => attr.value = AttrValue::U32(member.priority),
                _ => {}
            }
        }
        Ok(())
    }

    // ============ Shared helpers ============

    /// Realizes a deferred table in hardware if it is not there yet.
    pub(super) fn materialize_table(&mut self, table_oid: Oid) -> SaiResult<()> {
        let needs_create = {
            let table = self
                .tables
                .get(table_oid)
                .ok_or(SaiStatus::InvalidObjectId)?;
            table.npu_handle.is_none()
        };
        if needs_create {
            let handle = {
                let table = self.tables.get(table_oid).ok_or(SaiStatus::Failure)?;
                self.npu.create_acl_table(table)?
            };
            let table = self.tables.get_mut(table_oid).ok_or(SaiStatus::Failure)?;
            table.npu_handle = Some(handle);
        }
        Ok(())
    }

    /// Builds a rule from an attribute list against its target table. Used
    /// by both create and the set-protocol candidate construction.
    pub(super) fn populate_rule(
        &self,
        table: &AclTable,
        attrs: &[Attribute],
    ) -> SaiResult<AclRule> {
        let mut rule = AclRule::new(table.oid);

        for (index, attr) in attrs.iter().enumerate() {
            let idx = index as u32;
            match attr.id {
                ENTRY_ATTR_TABLE_ID => {}
                ENTRY_ATTR_PRIORITY => {
                    rule.priority = attr
                        .value
                        .as_u32()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                }
                ENTRY_ATTR_ADMIN_STATE => {
                    rule.admin_state = attr
                        .value
                        .as_bool()
                        .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                }
                id => {
                    if AclField::from_entry_attr(id).is_some() {
                        let value = attr
                            .value
                            .as_acl_field()
                            .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                        let filter = self.populate_filter(table, index, id, value)?;
                        rule.filters.push(filter);
                    } else if let Some(tag) = AclActionTag::from_entry_attr(id) {
                        let value = attr
                            .value
                            .as_acl_action()
                            .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                        let action = self.populate_action(index, id, value)?;
                        if action.enable {
                            match tag {
                                AclActionTag::Counter => {
                                    rule.counter_oid =
                                        action.parameter.as_oid().unwrap_or(Oid::NULL);
                                }
                                AclActionTag::SetPolicer => {
                                    rule.policer_oid =
                                        action.parameter.as_oid().unwrap_or(Oid::NULL);
                                }
                                AclActionTag::IngressSamplePacket => {
                                    rule.sample_oid[SampleDirection::Ingress as usize] =
                                        action.parameter.as_oid().unwrap_or(Oid::NULL);
                                }
                                AclActionTag::EgressSamplePacket => {
                                    rule.sample_oid[SampleDirection::Egress as usize] =
                                        action.parameter.as_oid().unwrap_or(Oid::NULL);
                                }
                                _ => {}
                            }
                        }
                        rule.actions.push(action);
                    } else {
                        return Err(SaiStatus::UnknownAttribute(idx));
                    }
                }
            }
        }

        Ok(rule)
    }

    pub(super) fn populate_filter(
        &self,
        table: &AclTable,
        index: usize,
        attr_id: u32,
        value: &AclFieldValue,
    ) -> SaiResult<AclFilter> {
        let idx = index as u32;
        let requested = AclField::from_entry_attr(attr_id)
            .ok_or(SaiStatus::UnknownAttribute(idx))?;

        // An egress-port match has no meaning before forwarding resolves;
        // ingress tables store it as the resolved destination port.
        let field = if requested == AclField::OutPort && table.stage == AclStage::Ingress {
            AclField::DstPort
        } else {
            requested
        };

        if !table.supports_field(field) && !table.supports_field(requested) {
            log::error!("field {} not in the field set of table {}", field, table.oid);
            return Err(SaiStatus::InvalidAttribute(idx));
        }

        let mut filter = AclFilter::new(field, value.enable, value.data.clone(), value.mask.clone());

        if !value.enable {
            return Ok(filter);
        }

        if !value_matches_kind(&value.data, field.kind()) {
            return Err(SaiStatus::InvalidAttrValue(idx));
        }

        match field.kind() {
            ValueKind::Oid => {
                let oid = value.data.as_oid().ok_or(SaiStatus::InvalidAttrValue(idx))?;
                validate_port_object(field, oid)?;
            }
            ValueKind::ObjectList => {
                let list = value
                    .data
                    .as_object_list()
                    .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                for oid in list {
                    match field {
                        AclField::RangeList => {
                            if !oid.is_of_type(ObjectType::AclRange) {
                                return Err(SaiStatus::InvalidObjectType);
                            }
                        }
                        _ => {
                            if !oid.is_of_type(ObjectType::Port) {
                                return Err(SaiStatus::InvalidObjectType);
                            }
                        }
                    }
                }
            }
            ValueKind::ByteList => {
                let slot = match field {
                    AclField::UserDefined(slot) => slot,
                    _ => return Err(SaiStatus::Failure),
                };
                let binding = table.udf_binding(slot).ok_or_else(|| {
                    log::error!(
                        "user-defined field slot {} has no UDF group on table {}",
                        slot,
                        table.oid
                    );
                    SaiStatus::InvalidAttribute(idx)
                })?;
                let data = value
                    .data
                    .as_byte_list()
                    .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                let mask = value
                    .mask
                    .as_byte_list()
                    .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                // Data and mask move through the stack in lockstep.
                if data.len() != mask.len() {
                    return Err(SaiStatus::InvalidAttrValue(idx));
                }
                filter.udf_group_oid = binding.group_oid;
                filter.udf_group_npu_id = binding.group_npu_id;
            }
            _ => {}
        }

        Ok(filter)
    }

    pub(super) fn populate_action(
        &self,
        index: usize,
        attr_id: u32,
        value: &AclActionValue,
    ) -> SaiResult<AclAction> {
        let idx = index as u32;
        let tag =
            AclActionTag::from_entry_attr(attr_id).ok_or(SaiStatus::UnknownAttribute(idx))?;

        let action = AclAction::new(tag, value.enable, value.parameter.clone());
        if !value.enable {
            return Ok(action);
        }

        if !value_matches_kind(&value.parameter, tag.kind()) {
            return Err(SaiStatus::InvalidAttrValue(idx));
        }

        match tag.kind() {
            ValueKind::Oid => {
                let oid = value
                    .parameter
                    .as_oid()
                    .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                // An enabled object-valued action with a null target is
                // meaningless.
                if oid.is_null() {
                    return Err(SaiStatus::InvalidAttrValue(idx));
                }
                match tag {
                    AclActionTag::Counter => {
                        if !oid.is_of_type(ObjectType::AclCounter) {
                            return Err(SaiStatus::InvalidObjectType);
                        }
                    }
                    AclActionTag::SetPolicer => {
                        if !oid.is_of_type(ObjectType::Policer) {
                            return Err(SaiStatus::InvalidObjectType);
                        }
                        let mode = self
                            .peers
                            .policer
                            .policer_mode(oid)
                            .ok_or(SaiStatus::InvalidObjectId)?;
                        if !matches!(mode, PolicerMode::SrTcm | PolicerMode::TrTcm) {
                            log::error!("policer {} has mode {}, not usable from ACL", oid, mode);
                            return Err(SaiStatus::InvalidAttrValue(idx));
                        }
                    }
                    AclActionTag::IngressSamplePacket | AclActionTag::EgressSamplePacket => {
                        if !oid.is_of_type(ObjectType::SamplePacket) {
                            return Err(SaiStatus::InvalidObjectType);
                        }
                    }
                    AclActionTag::Redirect => {
                        let valid = oid.is_of_type(ObjectType::Port)
                            || oid.is_of_type(ObjectType::Lag)
                            || oid.is_of_type(ObjectType::NextHop)
                            || oid.is_of_type(ObjectType::NextHopGroup);
                        if !valid {
                            return Err(SaiStatus::InvalidObjectType);
                        }
                    }
                    _ => {}
                }
            }
            ValueKind::ObjectList => {
                let list = value
                    .parameter
                    .as_object_list()
                    .ok_or(SaiStatus::InvalidAttrValue(idx))?;
                match tag {
                    AclActionTag::MirrorIngress | AclActionTag::MirrorEgress => {
                        for oid in list {
                            if !oid.is_of_type(ObjectType::MirrorSession) {
                                return Err(SaiStatus::InvalidObjectType);
                            }
                            if !self.peers.mirror.session_exists(*oid) {
                                return Err(SaiStatus::InvalidAttrValue(idx));
                            }
                        }
                    }
                    AclActionTag::RedirectList => {
                        for oid in list {
                            let valid = oid.is_of_type(ObjectType::Port)
                                || oid.is_of_type(ObjectType::Lag)
                                || oid.is_of_type(ObjectType::NextHop)
                                || oid.is_of_type(ObjectType::NextHopGroup);
                            if !valid {
                                return Err(SaiStatus::InvalidObjectType);
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        Ok(action)
    }

    /// Cross-object referential checks that need the full registries.
    pub(super) fn validate_rule_cross_refs(&self, rule: &AclRule) -> SaiResult<()> {
        if !rule.counter_oid.is_null() {
            let cntr = self
                .counters
                .get(rule.counter_oid)
                .ok_or(SaiStatus::InvalidObjectId)?;
            if cntr.table_oid != rule.table_oid {
                log::error!(
                    "counter {} belongs to table {}, rule targets {}",
                    rule.counter_oid,
                    cntr.table_oid,
                    rule.table_oid
                );
                return Err(SaiStatus::InvalidAttrValue(0));
            }
        }
        for range in rule.referenced_ranges() {
            if !self.ranges.contains(range) {
                return Err(SaiStatus::InvalidObjectId);
            }
        }
        Ok(())
    }

    pub(super) fn attach_counter(&mut self, rule: &AclRule) -> SaiResult<()> {
        let cntr = self
            .counters
            .get(rule.counter_oid)
            .ok_or(SaiStatus::InvalidObjectId)?;
        self.npu.attach_cntr_to_acl_rule(rule, cntr)?;
        let cntr = self
            .counters
            .get_mut(rule.counter_oid)
            .ok_or(SaiStatus::Failure)?;
        cntr.shared_count += 1;
        Ok(())
    }

    pub(super) fn detach_counter(&mut self, rule: &AclRule) -> SaiResult<()> {
        let cntr = self
            .counters
            .get(rule.counter_oid)
            .ok_or(SaiStatus::InvalidObjectId)?;
        self.npu.detach_cntr_from_acl_rule(rule, cntr)?;
        let cntr = self
            .counters
            .get_mut(rule.counter_oid)
            .ok_or(SaiStatus::Failure)?;
        if cntr.shared_count == 0 {
            log::error!("counter {} share count underflow", rule.counter_oid);
            return Err(SaiStatus::Failure);
        }
        cntr.shared_count -= 1;
        Ok(())
    }

    pub(super) fn attach_policer(&self, rule: &AclRule) -> SaiResult<()> {
        self.peers.policer.attach_acl_rule(rule.policer_oid, rule.oid)
    }

    pub(super) fn detach_policer(&self, rule: &AclRule) -> SaiResult<()> {
        self.peers.policer.detach_acl_rule(rule.policer_oid, rule.oid)
    }

    /// Binds every samplepacket direction the rule carries.
    pub(super) fn samplepacket_bind(&self, rule: &AclRule) -> SaiResult<()> {
        for dir in [SampleDirection::Ingress, SampleDirection::Egress] {
            let sample = rule.sample(dir);
            if sample.is_null() {
                continue;
            }
            let ports = match dir {
                SampleDirection::Ingress => rule.sample_port_set(),
                SampleDirection::Egress => None,
            };
            if let Err(status) =
                self.peers
                    .samplepacket
                    .validate_object(ports.as_deref(), sample, dir, true, true)
            {
                // A failed second direction unwinds the first.
                self.samplepacket_unbind(rule);
                return Err(status);
            }
        }
        Ok(())
    }

    /// Best-effort removal of every samplepacket binding.
    pub(super) fn samplepacket_unbind(&self, rule: &AclRule) {
        let _ = self.samplepacket_unbind_checked(rule);
    }

    pub(super) fn samplepacket_unbind_checked(&self, rule: &AclRule) -> SaiResult<()> {
        for dir in [SampleDirection::Ingress, SampleDirection::Egress] {
            let sample = rule.sample(dir);
            if sample.is_null() {
                continue;
            }
            let ports = match dir {
                SampleDirection::Ingress => rule.sample_port_set(),
                SampleDirection::Egress => None,
            };
            self.peers
                .samplepacket
                .remove_object(ports.as_deref(), sample, dir)?;
        }
        Ok(())
    }

    pub(super) fn take_range_refs(&mut self, rule: &AclRule) {
        for range in rule.referenced_ranges() {
            if let Some(node) = self.ranges.get_mut(range) {
                node.ref_count += 1;
            }
        }
    }

    pub(super) fn release_range_refs(&mut self, rule: &AclRule) {
        for range in rule.referenced_ranges() {
            if let Some(node) = self.ranges.get_mut(range) {
                node.ref_count = node.ref_count.saturating_sub(1);
            }
        }
    }

    /// Reverse-order unwinding for a failed rule create. The table stays
    /// materialized.
    fn undo_rule_install(
        &mut self,
        table_oid: Oid,
        rule: &AclRule,
        sample_bound: bool,
        counter_attached: bool,
        policer_attached: bool,
    ) {
        if policer_attached {
            let _ = self.detach_policer(rule);
        }
        if counter_attached {
            let _ = self.detach_counter(rule);
        }
        if sample_bound {
            self.samplepacket_unbind(rule);
        }
        if let Some(table) = self.tables.get(table_oid) {
            let _ = self.npu.delete_acl_rule(table, rule);
        }
    }
}

/// Checks that a match value has the shape its field or action expects.
fn value_matches_kind(value: &MatchValue, kind: ValueKind) -> bool {
    matches!(
        (value, kind),
        (MatchValue::Bool(_), ValueKind::Bool)
            | (MatchValue::U8(_), ValueKind::U8)
            | (MatchValue::U16(_), ValueKind::U16)
            | (MatchValue::U32(_), ValueKind::U32)
            | (MatchValue::Enum(_), ValueKind::Enum)
            | (MatchValue::Mac(_), ValueKind::Mac)
            | (MatchValue::Ipv4(_), ValueKind::Ipv4)
            | (MatchValue::Ipv6(_), ValueKind::Ipv6)
            | (MatchValue::Oid(_), ValueKind::Oid)
            | (MatchValue::ObjectList(_), ValueKind::ObjectList)
            | (MatchValue::ByteList(_), ValueKind::ByteList)
    )
}

/// Port-typed filters accept ports; the source/destination resolved-port
/// filters accept LAGs as well.
fn validate_port_object(field: AclField, oid: Oid) -> SaiResult<()> {
    let valid = match field {
        AclField::InPort | AclField::OutPort => oid.is_of_type(ObjectType::Port),
        AclField::SrcPort | AclField::DstPort => {
            oid.is_of_type(ObjectType::Port) || oid.is_of_type(ObjectType::Lag)
        }
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(SaiStatus::InvalidObjectType)
    }
}
