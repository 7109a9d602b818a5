//! Shared test harness: a scriptable mock NPU and mock peer managers.
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use sai_acl::acl::{
    AclActionTag, AclCounter, AclCounterType, AclField, AclRange, AclRule, AclStage, AclTable,
    RuleDelta,
};
use sai_acl::npu::{AclNpuApi, NpuHandle, UdfNpuApi};
use sai_acl::peers::{
    MirrorAccess, PeerHooks, PolicerAccess, PolicerMode, SampleDirection, SamplePacketAccess,
};
use sai_acl::udf::{Udf, UdfGroup, UdfGroupType};
use sai_acl::{AclService, UdfService};
use sai_common::{
    AclActionValue, AclFieldValue, AttrValue, Attribute, MatchValue, ObjectType, Oid, SaiResult,
    SaiStatus,
};

// ============ Mock NPU ============

#[derive(Default)]
pub struct MockNpuState {
    next_handle: NpuHandle,
    pub tables: BTreeSet<NpuHandle>,
    pub rules: BTreeSet<NpuHandle>,
    pub counters: BTreeSet<NpuHandle>,
    pub ranges: BTreeSet<NpuHandle>,
    pub udf_groups: BTreeSet<NpuHandle>,
    pub udfs: BTreeSet<NpuHandle>,
    pub udf_matches: BTreeSet<Oid>,
    /// (rule oid, counter oid) pairs currently attached.
    pub attachments: BTreeSet<(Oid, Oid)>,
    pub set_rule_calls: u32,
    pub last_set_was_noop: Option<bool>,
    /// Counter handle -> (packets, bytes).
    pub counter_values: BTreeMap<NpuHandle, (u64, u64)>,
    fail_once: HashMap<&'static str, SaiStatus>,
}

pub struct MockNpu {
    pub state: Mutex<MockNpuState>,
}

impl MockNpu {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockNpuState::default()),
        })
    }

    /// Makes the next call to `op` fail once with `status`.
    pub fn fail_next(&self, op: &'static str, status: SaiStatus) {
        self.state.lock().unwrap().fail_once.insert(op, status);
    }

    pub fn set_counter_value(&self, handle: NpuHandle, packets: u64, bytes: u64) {
        self.state
            .lock()
            .unwrap()
            .counter_values
            .insert(handle, (packets, bytes));
    }

    pub fn snapshot<R>(&self, f: impl FnOnce(&MockNpuState) -> R) -> R {
        f(&self.state.lock().unwrap())
    }

    fn check(&self, op: &'static str) -> SaiResult<()> {
        if let Some(status) = self.state.lock().unwrap().fail_once.remove(op) {
            return Err(status);
        }
        Ok(())
    }

    fn alloc_handle(&self) -> NpuHandle {
        let mut state = self.state.lock().unwrap();
        state.next_handle += 1;
        state.next_handle
    }
}

impl AclNpuApi for MockNpu {
    fn create_acl_table(&self, _table: &AclTable) -> SaiResult<NpuHandle> {
        self.check("create_acl_table")?;
        let handle = self.alloc_handle();
        self.state.lock().unwrap().tables.insert(handle);
        Ok(handle)
    }

    fn delete_acl_table(&self, table: &AclTable) -> SaiResult<()> {
        self.check("delete_acl_table")?;
        if let Some(handle) = table.npu_handle {
            self.state.lock().unwrap().tables.remove(&handle);
        }
        Ok(())
    }

    fn validate_acl_table_fields(&self, _stage: AclStage, _fields: &[AclField]) -> SaiResult<()> {
        self.check("validate_acl_table_fields")
    }

    fn create_acl_rule(&self, _table: &AclTable, _rule: &AclRule) -> SaiResult<NpuHandle> {
        self.check("create_acl_rule")?;
        let handle = self.alloc_handle();
        self.state.lock().unwrap().rules.insert(handle);
        Ok(handle)
    }

    fn delete_acl_rule(&self, _table: &AclTable, rule: &AclRule) -> SaiResult<()> {
        self.check("delete_acl_rule")?;
        if let Some(handle) = rule.npu_handle {
            self.state.lock().unwrap().rules.remove(&handle);
        }
        Ok(())
    }

    fn set_acl_rule(
        &self,
        _table: &AclTable,
        _candidate: &AclRule,
        delta: &RuleDelta,
        _existing: &AclRule,
    ) -> SaiResult<()> {
        self.check("set_acl_rule")?;
        let mut state = self.state.lock().unwrap();
        state.set_rule_calls += 1;
        state.last_set_was_noop = Some(delta.is_noop());
        Ok(())
    }

    fn create_acl_cntr(&self, _table: &AclTable, _cntr: &AclCounter) -> SaiResult<NpuHandle> {
        self.check("create_acl_cntr")?;
        let handle = self.alloc_handle();
        self.state.lock().unwrap().counters.insert(handle);
        Ok(handle)
    }

    fn delete_acl_cntr(&self, cntr: &AclCounter) -> SaiResult<()> {
        self.check("delete_acl_cntr")?;
        if let Some(handle) = cntr.npu_handle {
            self.state.lock().unwrap().counters.remove(&handle);
        }
        Ok(())
    }

    fn set_acl_cntr(
        &self,
        cntr: &AclCounter,
        packets: Option<u64>,
        bytes: Option<u64>,
    ) -> SaiResult<()> {
        self.check("set_acl_cntr")?;
        let handle = cntr.npu_handle.unwrap_or(0);
        let mut state = self.state.lock().unwrap();
        let entry = state.counter_values.entry(handle).or_insert((0, 0));
        if let Some(p) = packets {
            entry.0 = p;
        }
        if let Some(b) = bytes {
            entry.1 = b;
        }
        Ok(())
    }

    fn get_acl_cntr(&self, cntr: &AclCounter, out: &mut [u64]) -> SaiResult<()> {
        self.check("get_acl_cntr")?;
        let handle = cntr.npu_handle.unwrap_or(0);
        let state = self.state.lock().unwrap();
        let (packets, bytes) = state.counter_values.get(&handle).copied().unwrap_or((0, 0));
        match cntr.counter_type {
            AclCounterType::BytesPackets => {
                out[0] = packets;
                out[1] = bytes;
            }
            AclCounterType::Packets => out[0] = packets,
            AclCounterType::Bytes => out[0] = bytes,
        }
        Ok(())
    }

    fn attach_cntr_to_acl_rule(&self, rule: &AclRule, cntr: &AclCounter) -> SaiResult<()> {
        self.check("attach_cntr_to_acl_rule")?;
        self.state
            .lock()
            .unwrap()
            .attachments
            .insert((rule.oid, cntr.oid));
        Ok(())
    }

    fn detach_cntr_from_acl_rule(&self, rule: &AclRule, cntr: &AclCounter) -> SaiResult<()> {
        self.check("detach_cntr_from_acl_rule")?;
        self.state
            .lock()
            .unwrap()
            .attachments
            .remove(&(rule.oid, cntr.oid));
        Ok(())
    }

    fn create_acl_range(&self, _range: &AclRange) -> SaiResult<NpuHandle> {
        self.check("create_acl_range")?;
        let handle = self.alloc_handle();
        self.state.lock().unwrap().ranges.insert(handle);
        Ok(handle)
    }

    fn delete_acl_range(&self, range: &AclRange) -> SaiResult<()> {
        self.check("delete_acl_range")?;
        if let Some(handle) = range.npu_handle {
            self.state.lock().unwrap().ranges.remove(&handle);
        }
        Ok(())
    }

    fn set_acl_range(&self, _range: &AclRange) -> SaiResult<()> {
        self.check("set_acl_range")
    }

    fn update_policer_acl_rule(
        &self,
        _table: &AclTable,
        _rule: &AclRule,
        _old_policer: Oid,
        _new_policer: Oid,
    ) -> SaiResult<()> {
        self.check("update_policer_acl_rule")
    }
}

impl UdfNpuApi for MockNpu {
    fn udf_group_create(&self, _group: &UdfGroup) -> SaiResult<NpuHandle> {
        self.check("udf_group_create")?;
        let handle = self.alloc_handle();
        self.state.lock().unwrap().udf_groups.insert(handle);
        Ok(handle)
    }

    fn udf_group_remove(&self, group: &UdfGroup) -> SaiResult<()> {
        self.check("udf_group_remove")?;
        if let Some(handle) = group.npu_handle {
            self.state.lock().unwrap().udf_groups.remove(&handle);
        }
        Ok(())
    }

    fn udf_group_hw_id_get(&self, group: &UdfGroup) -> SaiResult<NpuHandle> {
        group.npu_handle.ok_or(SaiStatus::ItemNotFound)
    }

    fn udf_create(&self, _group: &UdfGroup, _udf: &Udf) -> SaiResult<NpuHandle> {
        self.check("udf_create")?;
        let handle = self.alloc_handle();
        self.state.lock().unwrap().udfs.insert(handle);
        Ok(handle)
    }

    fn udf_remove(&self, _group: &UdfGroup, udf: &Udf) -> SaiResult<()> {
        self.check("udf_remove")?;
        if let Some(handle) = udf.npu_handle {
            self.state.lock().unwrap().udfs.remove(&handle);
        }
        Ok(())
    }

    fn udf_attribute_set(&self, _udf: &Udf, _attr: &Attribute) -> SaiResult<()> {
        self.check("udf_attribute_set")
    }

    fn udf_match_create(&self, match_oid: Oid, _attrs: &[Attribute]) -> SaiResult<()> {
        self.check("udf_match_create")?;
        self.state.lock().unwrap().udf_matches.insert(match_oid);
        Ok(())
    }

    fn udf_match_remove(&self, match_oid: Oid) -> SaiResult<()> {
        self.check("udf_match_remove")?;
        self.state.lock().unwrap().udf_matches.remove(&match_oid);
        Ok(())
    }

    fn udf_match_attribute_get(&self, _match_oid: Oid, _attrs: &mut [Attribute]) -> SaiResult<()> {
        self.check("udf_match_attribute_get")
    }
}

// ============ Mock peers ============

#[derive(Default)]
pub struct MockPolicerState {
    pub modes: BTreeMap<Oid, PolicerMode>,
    pub attached_rules: BTreeSet<(Oid, Oid)>,
    pub fail_attach: Option<SaiStatus>,
}

pub struct MockPolicer {
    pub state: Mutex<MockPolicerState>,
}

impl MockPolicer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockPolicerState::default()),
        })
    }

    pub fn add_policer(&self, oid: Oid, mode: PolicerMode) {
        self.state.lock().unwrap().modes.insert(oid, mode);
    }

    pub fn fail_next_attach(&self, status: SaiStatus) {
        self.state.lock().unwrap().fail_attach = Some(status);
    }

    pub fn attached(&self) -> BTreeSet<(Oid, Oid)> {
        self.state.lock().unwrap().attached_rules.clone()
    }
}

impl PolicerAccess for MockPolicer {
    fn policer_mode(&self, policer: Oid) -> Option<PolicerMode> {
        self.state.lock().unwrap().modes.get(&policer).copied()
    }

    fn attach_acl_rule(&self, policer: Oid, rule: Oid) -> SaiResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.fail_attach.take() {
            return Err(status);
        }
        state.attached_rules.insert((policer, rule));
        Ok(())
    }

    fn detach_acl_rule(&self, policer: Oid, rule: Oid) -> SaiResult<()> {
        self.state
            .lock()
            .unwrap()
            .attached_rules
            .remove(&(policer, rule));
        Ok(())
    }
}

type SampleBinding = (Oid, Option<Vec<Oid>>, usize);

#[derive(Default)]
pub struct MockSampleState {
    pub bindings: Vec<SampleBinding>,
    pub fail_validate: Option<SaiStatus>,
}

pub struct MockSample {
    pub state: Mutex<MockSampleState>,
}

impl MockSample {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockSampleState::default()),
        })
    }

    pub fn fail_next_validate(&self, status: SaiStatus) {
        self.state.lock().unwrap().fail_validate = Some(status);
    }

    pub fn bindings(&self) -> Vec<SampleBinding> {
        self.state.lock().unwrap().bindings.clone()
    }
}

impl SamplePacketAccess for MockSample {
    fn validate_object(
        &self,
        ports: Option<&[Oid]>,
        sample: Oid,
        direction: SampleDirection,
        _validate: bool,
        update: bool,
    ) -> SaiResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.fail_validate.take() {
            return Err(status);
        }
        if update {
            let binding = (sample, ports.map(|p| p.to_vec()), direction as usize);
            if !state.bindings.contains(&binding) {
                state.bindings.push(binding);
            }
        }
        Ok(())
    }

    fn remove_object(
        &self,
        ports: Option<&[Oid]>,
        sample: Oid,
        direction: SampleDirection,
    ) -> SaiResult<()> {
        let binding = (sample, ports.map(|p| p.to_vec()), direction as usize);
        self.state
            .lock()
            .unwrap()
            .bindings
            .retain(|b| *b != binding);
        Ok(())
    }
}

pub struct MockMirror {
    pub sessions: Mutex<BTreeSet<Oid>>,
}

impl MockMirror {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: Mutex::new(BTreeSet::new()),
        })
    }

    pub fn add_session(&self, oid: Oid) {
        self.sessions.lock().unwrap().insert(oid);
    }
}

impl MirrorAccess for MockMirror {
    fn session_exists(&self, session: Oid) -> bool {
        self.sessions.lock().unwrap().contains(&session)
    }
}

// ============ Harness ============

pub struct Harness {
    pub npu: Arc<MockNpu>,
    pub policer: Arc<MockPolicer>,
    pub sample: Arc<MockSample>,
    pub mirror: Arc<MockMirror>,
    pub udf: Arc<UdfService>,
    pub acl: AclService,
}

pub fn harness() -> Harness {
    let npu = MockNpu::new();
    let policer = MockPolicer::new();
    let sample = MockSample::new();
    let mirror = MockMirror::new();
    let udf = Arc::new(UdfService::new(npu.clone()));
    let peers = PeerHooks {
        policer: policer.clone(),
        samplepacket: sample.clone(),
        mirror: mirror.clone(),
    };
    let acl = AclService::new(npu.clone(), peers, udf.clone());
    Harness {
        npu,
        policer,
        sample,
        mirror,
        udf,
        acl,
    }
}

// ============ Attribute builders ============

pub fn attr(id: u32, value: AttrValue) -> Attribute {
    Attribute::new(id, value)
}

pub fn field_attr(field: AclField, data: MatchValue, mask: MatchValue) -> Attribute {
    Attribute::new(
        field.entry_attr(),
        AttrValue::AclField(AclFieldValue {
            enable: true,
            data,
            mask,
        }),
    )
}

pub fn action_attr(tag: AclActionTag, parameter: MatchValue) -> Attribute {
    Attribute::new(
        tag.entry_attr(),
        AttrValue::AclAction(AclActionValue {
            enable: true,
            parameter,
        }),
    )
}

pub fn disabled_action_attr(tag: AclActionTag) -> Attribute {
    Attribute::new(tag.entry_attr(), AttrValue::AclAction(AclActionValue::disabled()))
}

pub fn port(idx: u32) -> Oid {
    Oid::new(ObjectType::Port, idx)
}

/// Creates an ingress table with the given priority and fields.
pub fn create_table(h: &Harness, stage: AclStage, priority: u32, fields: &[AclField]) -> Oid {
    let mut attrs = vec![
        attr(sai_acl::acl::TABLE_ATTR_STAGE, AttrValue::S32(stage.to_raw())),
        attr(sai_acl::acl::TABLE_ATTR_PRIORITY, AttrValue::U32(priority)),
    ];
    for field in fields {
        attrs.push(attr(field.table_attr(), AttrValue::Bool(true)));
    }
    h.acl.create_acl_table(&attrs).expect("table create failed")
}

/// Creates a UDF group + match + UDF, returning (group, match, udf).
pub fn create_udf_chain(h: &Harness, group_type: UdfGroupType, length: u16) -> (Oid, Oid, Oid) {
    let group = h
        .udf
        .create_udf_group(&[
            attr(
                sai_acl::udf::UDF_GROUP_ATTR_TYPE,
                AttrValue::S32(group_type.to_raw()),
            ),
            attr(sai_acl::udf::UDF_GROUP_ATTR_LENGTH, AttrValue::U16(length)),
        ])
        .expect("udf group create failed");
    let udf_match = h
        .udf
        .create_udf_match(&[attr(
            sai_acl::udf::UDF_MATCH_ATTR_L2_TYPE,
            AttrValue::U16(0x0800),
        )])
        .expect("udf match create failed");
    let udf = h
        .udf
        .create_udf(&[
            attr(sai_acl::udf::UDF_ATTR_MATCH_ID, AttrValue::Oid(udf_match)),
            attr(sai_acl::udf::UDF_ATTR_GROUP_ID, AttrValue::Oid(group)),
            attr(sai_acl::udf::UDF_ATTR_BASE, AttrValue::S32(1)),
            attr(sai_acl::udf::UDF_ATTR_OFFSET, AttrValue::U16(4)),
        ])
        .expect("udf create failed");
    (group, udf_match, udf)
}
