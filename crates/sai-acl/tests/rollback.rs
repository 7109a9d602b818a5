//! Failure injection: every step of the rule-create transaction unwinds
//! without side effects, and registry-first deletes reinsert on NPU failure.

mod common;

use common::{action_attr, attr, create_table, field_attr, harness, port, Harness};
use pretty_assertions::assert_eq;
use sai_acl::acl::{
    AclActionTag, AclField, AclStage, COUNTER_ATTR_ENABLE_BYTE_COUNT,
    COUNTER_ATTR_ENABLE_PACKET_COUNT, COUNTER_ATTR_TABLE_ID, ENTRY_ATTR_TABLE_ID,
};
use sai_acl::peers::PolicerMode;
use sai_common::{AttrValue, MatchValue, ObjectType, Oid, SaiStatus};
use sai_types::Ipv4Address;

struct Fixture {
    h: Harness,
    table: Oid,
    counter: Oid,
    policer: Oid,
    sample: Oid,
}

fn fixture() -> Fixture {
    let h = harness();
    let table = create_table(
        &h,
        AclStage::Ingress,
        10,
        &[AclField::SrcIp, AclField::InPorts],
    );
    let counter = h
        .acl
        .create_acl_counter(&[
            attr(COUNTER_ATTR_TABLE_ID, AttrValue::Oid(table)),
            attr(COUNTER_ATTR_ENABLE_PACKET_COUNT, AttrValue::Bool(true)),
            attr(COUNTER_ATTR_ENABLE_BYTE_COUNT, AttrValue::Bool(true)),
        ])
        .unwrap();
    let policer = Oid::new(ObjectType::Policer, 1);
    h.policer.add_policer(policer, PolicerMode::SrTcm);
    let sample = Oid::new(ObjectType::SamplePacket, 1);
    Fixture {
        h,
        table,
        counter,
        policer,
        sample,
    }
}

impl Fixture {
    /// A create that exercises every linkage: sample + counter + policer.
    fn full_rule_attrs(&self) -> Vec<sai_common::Attribute> {
        vec![
            attr(ENTRY_ATTR_TABLE_ID, AttrValue::Oid(self.table)),
            field_attr(
                AclField::SrcIp,
                MatchValue::Ipv4(Ipv4Address::new(10, 0, 0, 1)),
                MatchValue::Ipv4(Ipv4Address::HOST_MASK),
            ),
            field_attr(
                AclField::InPorts,
                MatchValue::ObjectList(vec![port(1), port(2)]),
                MatchValue::None,
            ),
            action_attr(
                AclActionTag::IngressSamplePacket,
                MatchValue::Oid(self.sample),
            ),
            action_attr(AclActionTag::Counter, MatchValue::Oid(self.counter)),
            action_attr(AclActionTag::SetPolicer, MatchValue::Oid(self.policer)),
        ]
    }

    /// Nothing observable changed: the registries, share counts, peer links,
    /// and NPU rule state all match the pre-call picture.
    fn assert_no_side_effects(&self) {
        self.h.acl.with_state(|orch| {
            assert_eq!(orch.total_rule_count(), 0);
            assert_eq!(orch.table(self.table).unwrap().rule_count, 0);
            assert_eq!(orch.counter(self.counter).unwrap().shared_count, 0);
        });
        assert!(self.h.npu.snapshot(|s| s.rules.is_empty()));
        assert!(self.h.npu.snapshot(|s| s.attachments.is_empty()));
        assert!(self.h.sample.bindings().is_empty());
        assert!(self.h.policer.attached().is_empty());
    }
}

#[test]
fn rule_create_fails_at_hardware_install() {
    let f = fixture();
    f.h.npu.fail_next("create_acl_rule", SaiStatus::TableFull);
    assert_eq!(
        f.h.acl.create_acl_rule(&f.full_rule_attrs()),
        Err(SaiStatus::TableFull)
    );
    f.assert_no_side_effects();

    // The system stays usable afterwards.
    let rule = f.h.acl.create_acl_rule(&f.full_rule_attrs()).unwrap();
    f.h.acl.delete_acl_rule(rule).unwrap();
}

#[test]
fn rule_create_fails_at_sample_binding() {
    let f = fixture();
    f.h.sample.fail_next_validate(SaiStatus::InvalidParameter);
    assert_eq!(
        f.h.acl.create_acl_rule(&f.full_rule_attrs()),
        Err(SaiStatus::InvalidParameter)
    );
    f.assert_no_side_effects();
}

#[test]
fn rule_create_fails_at_counter_attach() {
    let f = fixture();
    f.h.npu
        .fail_next("attach_cntr_to_acl_rule", SaiStatus::Failure);
    assert_eq!(
        f.h.acl.create_acl_rule(&f.full_rule_attrs()),
        Err(SaiStatus::Failure)
    );
    f.assert_no_side_effects();
}

#[test]
fn rule_create_fails_at_policer_attach() {
    let f = fixture();
    f.h.policer
        .fail_next_attach(SaiStatus::InsufficientResources);
    assert_eq!(
        f.h.acl.create_acl_rule(&f.full_rule_attrs()),
        Err(SaiStatus::InsufficientResources)
    );
    f.assert_no_side_effects();
}

#[test]
fn table_stays_materialized_after_failed_rule() {
    let f = fixture();
    f.h.npu.fail_next("create_acl_rule", SaiStatus::TableFull);
    let _ = f.h.acl.create_acl_rule(&f.full_rule_attrs());

    // The table was realized before the rule failed and is not torn down.
    f.h.acl.with_state(|orch| {
        assert!(orch.table(f.table).unwrap().npu_handle.is_some());
    });
}

#[test]
fn rule_delete_fails_at_hardware_restores_links() {
    let f = fixture();
    let rule = f.h.acl.create_acl_rule(&f.full_rule_attrs()).unwrap();

    f.h.npu.fail_next("delete_acl_rule", SaiStatus::Failure);
    assert_eq!(f.h.acl.delete_acl_rule(rule), Err(SaiStatus::Failure));

    // The rule survives unchanged: still registered, all links restored.
    f.h.acl.with_state(|orch| {
        assert!(orch.rule(rule).is_some());
        assert_eq!(orch.table(f.table).unwrap().rule_count, 1);
        assert_eq!(orch.counter(f.counter).unwrap().shared_count, 1);
    });
    assert!(f
        .h
        .npu
        .snapshot(|s| s.attachments.contains(&(rule, f.counter))));
    assert!(!f.h.sample.bindings().is_empty());
    assert!(f.h.policer.attached().contains(&(f.policer, rule)));

    // And is deletable once the hardware cooperates.
    f.h.acl.delete_acl_rule(rule).unwrap();
    f.assert_no_side_effects();
}

#[test]
fn table_delete_reinserts_on_npu_failure() {
    let h = harness();
    let table = h
        .acl
        .create_acl_table(&[
            attr(
                sai_acl::acl::TABLE_ATTR_STAGE,
                AttrValue::S32(AclStage::Ingress.to_raw()),
            ),
            attr(sai_acl::acl::TABLE_ATTR_PRIORITY, AttrValue::U32(10)),
            attr(sai_acl::acl::TABLE_ATTR_SIZE, AttrValue::U32(64)),
            attr(AclField::SrcIp.table_attr(), AttrValue::Bool(true)),
        ])
        .unwrap();

    h.npu.fail_next("delete_acl_table", SaiStatus::Failure);
    assert_eq!(h.acl.delete_acl_table(table), Err(SaiStatus::Failure));
    h.acl.with_state(|orch| assert!(orch.table(table).is_some()));

    h.acl.delete_acl_table(table).unwrap();
    h.acl.with_state(|orch| assert!(orch.table(table).is_none()));
}

#[test]
fn counter_delete_reinserts_on_npu_failure() {
    let f = fixture();
    f.h.npu.fail_next("delete_acl_cntr", SaiStatus::Failure);
    assert_eq!(
        f.h.acl.delete_acl_counter(f.counter),
        Err(SaiStatus::Failure)
    );
    f.h.acl
        .with_state(|orch| assert!(orch.counter(f.counter).is_some()));

    f.h.acl.delete_acl_counter(f.counter).unwrap();
}

#[test]
fn failed_set_leaves_rule_unchanged() {
    let f = fixture();
    let rule = f.h.acl.create_acl_rule(&f.full_rule_attrs()).unwrap();

    f.h.npu.fail_next("set_acl_rule", SaiStatus::Failure);
    let result = f.h.acl.set_acl_rule_attribute(
        rule,
        &field_attr(
            AclField::SrcIp,
            MatchValue::Ipv4(Ipv4Address::new(10, 0, 0, 99)),
            MatchValue::Ipv4(Ipv4Address::HOST_MASK),
        ),
    );
    assert_eq!(result, Err(SaiStatus::Failure));

    f.h.acl.with_state(|orch| {
        let filter = orch.rule(rule).unwrap().filter(AclField::SrcIp).unwrap().clone();
        assert_eq!(
            filter.data,
            MatchValue::Ipv4(Ipv4Address::new(10, 0, 0, 1))
        );
    });
}
