//! Rule lifecycle: the counter scenario, priority ordering, the OUT_PORT
//! aliasing, the delta engine's idempotence, and set-protocol commits.

mod common;

use common::{action_attr, attr, create_table, field_attr, harness, port, Harness};
use pretty_assertions::assert_eq;
use sai_acl::acl::{
    AclActionTag, AclField, AclStage, COUNTER_ATTR_ENABLE_BYTE_COUNT,
    COUNTER_ATTR_ENABLE_PACKET_COUNT, COUNTER_ATTR_TABLE_ID, ENTRY_ATTR_ADMIN_STATE,
    ENTRY_ATTR_PRIORITY, ENTRY_ATTR_TABLE_ID,
};
use sai_acl::peers::PolicerMode;
use sai_common::{
    AclActionValue, AclFieldValue, AttrValue, MatchValue, ObjectType, Oid, SaiStatus,
};
use sai_types::Ipv4Address;

fn src_ip_rule_attrs(table: Oid, last_octet: u8) -> Vec<sai_common::Attribute> {
    vec![
        attr(ENTRY_ATTR_TABLE_ID, AttrValue::Oid(table)),
        field_attr(
            AclField::SrcIp,
            MatchValue::Ipv4(Ipv4Address::new(10, 0, 0, last_octet)),
            MatchValue::Ipv4(Ipv4Address::HOST_MASK),
        ),
    ]
}

fn make_counter(h: &Harness, table: Oid) -> Oid {
    h.acl
        .create_acl_counter(&[
            attr(COUNTER_ATTR_TABLE_ID, AttrValue::Oid(table)),
            attr(COUNTER_ATTR_ENABLE_PACKET_COUNT, AttrValue::Bool(true)),
            attr(COUNTER_ATTR_ENABLE_BYTE_COUNT, AttrValue::Bool(true)),
        ])
        .unwrap()
}

#[test]
fn counter_rule_lifecycle() {
    let h = harness();
    let table = create_table(
        &h,
        AclStage::Ingress,
        10,
        &[AclField::SrcIp, AclField::DstIp],
    );

    let counter = make_counter(&h, table);
    h.acl.with_state(|orch| {
        let c = orch.counter(counter).unwrap();
        assert_eq!(c.counter_type, sai_acl::acl::AclCounterType::BytesPackets);
        assert_eq!(c.shared_count, 0);
    });

    let mut attrs = src_ip_rule_attrs(table, 1);
    attrs.push(action_attr(AclActionTag::Counter, MatchValue::Oid(counter)));
    let rule = h.acl.create_acl_rule(&attrs).unwrap();

    h.acl.with_state(|orch| {
        assert_eq!(orch.counter(counter).unwrap().shared_count, 1);
        assert_eq!(orch.table(table).unwrap().rule_count, 1);
    });
    assert!(h
        .npu
        .snapshot(|s| s.attachments.contains(&(rule, counter))));

    h.acl.delete_acl_rule(rule).unwrap();
    h.acl.with_state(|orch| {
        assert_eq!(orch.counter(counter).unwrap().shared_count, 0);
        assert_eq!(orch.table(table).unwrap().rule_count, 0);
    });

    h.acl.delete_acl_counter(counter).unwrap();
    h.acl.delete_acl_table(table).unwrap();
}

#[test]
fn counter_delete_in_use() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp]);
    let counter = make_counter(&h, table);

    let mut attrs = src_ip_rule_attrs(table, 1);
    attrs.push(action_attr(AclActionTag::Counter, MatchValue::Oid(counter)));
    let rule = h.acl.create_acl_rule(&attrs).unwrap();

    assert_eq!(
        h.acl.delete_acl_counter(counter),
        Err(SaiStatus::ObjectInUse)
    );
    h.acl.delete_acl_rule(rule).unwrap();
    h.acl.delete_acl_counter(counter).unwrap();
}

#[test]
fn rule_list_stays_priority_sorted() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp]);

    let mut oids = Vec::new();
    for (i, priority) in [300u32, 100, 200, 100].iter().enumerate() {
        let mut attrs = src_ip_rule_attrs(table, i as u8 + 1);
        attrs.push(attr(ENTRY_ATTR_PRIORITY, AttrValue::U32(*priority)));
        oids.push(h.acl.create_acl_rule(&attrs).unwrap());
    }

    h.acl.with_state(|orch| {
        let t = orch.table(table).unwrap();
        let priorities: Vec<u32> = t.rule_list().iter().map(|e| e.priority).collect();
        assert_eq!(priorities, vec![100, 100, 200, 300]);
        // Ties keep insertion order.
        assert_eq!(t.rule_list()[0].oid, oids[1]);
        assert_eq!(t.rule_list()[1].oid, oids[3]);
        assert_eq!(t.rule_count as usize, t.rule_list().len());
        assert_eq!(orch.total_rule_count(), 4);
    });
}

#[test]
fn priority_set_repositions_rule() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp]);

    let mut first = src_ip_rule_attrs(table, 1);
    first.push(attr(ENTRY_ATTR_PRIORITY, AttrValue::U32(100)));
    let r1 = h.acl.create_acl_rule(&first).unwrap();

    let mut second = src_ip_rule_attrs(table, 2);
    second.push(attr(ENTRY_ATTR_PRIORITY, AttrValue::U32(80)));
    let r2 = h.acl.create_acl_rule(&second).unwrap();

    // Move r1 from 100 to 50; only its slot changes.
    h.acl
        .set_acl_rule_attribute(r1, &attr(ENTRY_ATTR_PRIORITY, AttrValue::U32(50)))
        .unwrap();

    h.acl.with_state(|orch| {
        let t = orch.table(table).unwrap();
        let order: Vec<Oid> = t.rule_list().iter().map(|e| e.oid).collect();
        assert_eq!(order, vec![r1, r2]);
        assert_eq!(orch.rule(r1).unwrap().priority, 50);
    });
}

#[test]
fn out_port_rewrites_to_dst_port_on_ingress() {
    let h = harness();
    let table = create_table(
        &h,
        AclStage::Ingress,
        10,
        &[AclField::SrcIp, AclField::DstPort],
    );

    let target = port(7);
    let rule = h
        .acl
        .create_acl_rule(&[
            attr(ENTRY_ATTR_TABLE_ID, AttrValue::Oid(table)),
            field_attr(AclField::OutPort, MatchValue::Oid(target), MatchValue::None),
        ])
        .unwrap();

    // Stored under the rewritten tag.
    h.acl.with_state(|orch| {
        let r = orch.rule(rule).unwrap();
        assert!(r.filter(AclField::DstPort).is_some());
        assert!(r.filter(AclField::OutPort).is_none());
    });

    // Readable under both tags.
    for read_field in [AclField::OutPort, AclField::DstPort] {
        let mut attrs = vec![attr(
            read_field.entry_attr(),
            AttrValue::AclField(AclFieldValue::disabled()),
        )];
        h.acl.get_acl_rule_attribute(rule, &mut attrs).unwrap();
        let value = attrs[0].value.as_acl_field().unwrap();
        assert!(value.enable);
        assert_eq!(value.data, MatchValue::Oid(target));
    }
}

#[test]
fn set_with_equal_value_is_noop() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp, AclField::Dscp]);

    let mut attrs = src_ip_rule_attrs(table, 1);
    attrs.push(attr(ENTRY_ATTR_PRIORITY, AttrValue::U32(100)));
    attrs.push(field_attr(
        AclField::Dscp,
        MatchValue::U8(12),
        MatchValue::U8(0x3f),
    ));
    let rule = h.acl.create_acl_rule(&attrs).unwrap();

    // Same priority: the push is the verification call only.
    h.acl
        .set_acl_rule_attribute(rule, &attr(ENTRY_ATTR_PRIORITY, AttrValue::U32(100)))
        .unwrap();
    assert_eq!(h.npu.snapshot(|s| s.last_set_was_noop), Some(true));

    // Same DSCP value.
    h.acl
        .set_acl_rule_attribute(
            rule,
            &field_attr(AclField::Dscp, MatchValue::U8(12), MatchValue::U8(0x3f)),
        )
        .unwrap();
    assert_eq!(h.npu.snapshot(|s| s.last_set_was_noop), Some(true));

    // Different value commits.
    h.acl
        .set_acl_rule_attribute(
            rule,
            &field_attr(AclField::Dscp, MatchValue::U8(20), MatchValue::U8(0x3f)),
        )
        .unwrap();
    assert_eq!(h.npu.snapshot(|s| s.last_set_was_noop), Some(false));
    h.acl.with_state(|orch| {
        let filter = orch.rule(rule).unwrap().filter(AclField::Dscp).unwrap().clone();
        assert_eq!(filter.data, MatchValue::U8(20));
    });
}

#[test]
fn set_appends_new_field() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp, AclField::Dscp]);
    let rule = h.acl.create_acl_rule(&src_ip_rule_attrs(table, 1)).unwrap();

    h.acl
        .set_acl_rule_attribute(
            rule,
            &field_attr(AclField::Dscp, MatchValue::U8(7), MatchValue::U8(0x3f)),
        )
        .unwrap();

    h.acl.with_state(|orch| {
        let r = orch.rule(rule).unwrap();
        assert_eq!(r.filters.len(), 2);
        assert_eq!(r.filter(AclField::Dscp).unwrap().data, MatchValue::U8(7));
    });
}

#[test]
fn admin_state_defaults_to_enabled() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp]);
    let rule = h.acl.create_acl_rule(&src_ip_rule_attrs(table, 1)).unwrap();

    h.acl
        .with_state(|orch| assert!(orch.rule(rule).unwrap().admin_state));

    h.acl
        .set_acl_rule_attribute(rule, &attr(ENTRY_ATTR_ADMIN_STATE, AttrValue::Bool(false)))
        .unwrap();
    h.acl
        .with_state(|orch| assert!(!orch.rule(rule).unwrap().admin_state));
}

#[test]
fn rule_without_fields_rejected() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp]);

    let result = h.acl.create_acl_rule(&[
        attr(ENTRY_ATTR_TABLE_ID, AttrValue::Oid(table)),
        attr(ENTRY_ATTR_PRIORITY, AttrValue::U32(5)),
    ]);
    assert_eq!(result, Err(SaiStatus::MandatoryAttributeMissing));
}

#[test]
fn rule_against_missing_table_rejected() {
    let h = harness();
    let ghost = Oid::new(ObjectType::AclTable, 999);
    let result = h.acl.create_acl_rule(&src_ip_rule_attrs(ghost, 1));
    assert_eq!(result, Err(SaiStatus::InvalidObjectId));
}

#[test]
fn enabled_action_with_null_target_rejected() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp]);

    let mut attrs = src_ip_rule_attrs(table, 1);
    attrs.push(sai_common::Attribute::new(
        AclActionTag::Counter.entry_attr(),
        AttrValue::AclAction(AclActionValue {
            enable: true,
            parameter: MatchValue::Oid(Oid::NULL),
        }),
    ));
    let result = h.acl.create_acl_rule(&attrs);
    assert_eq!(result, Err(SaiStatus::InvalidAttrValue(2)));
}

#[test]
fn storm_control_policer_rejected() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp]);
    let policer = Oid::new(ObjectType::Policer, 1);
    h.policer.add_policer(policer, PolicerMode::Storm);

    let mut attrs = src_ip_rule_attrs(table, 1);
    attrs.push(action_attr(
        AclActionTag::SetPolicer,
        MatchValue::Oid(policer),
    ));
    let result = h.acl.create_acl_rule(&attrs);
    assert_eq!(result, Err(SaiStatus::InvalidAttrValue(2)));
}

#[test]
fn policer_attach_and_swap() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp]);
    let p1 = Oid::new(ObjectType::Policer, 1);
    let p2 = Oid::new(ObjectType::Policer, 2);
    h.policer.add_policer(p1, PolicerMode::SrTcm);
    h.policer.add_policer(p2, PolicerMode::TrTcm);

    let mut attrs = src_ip_rule_attrs(table, 1);
    attrs.push(action_attr(AclActionTag::SetPolicer, MatchValue::Oid(p1)));
    let rule = h.acl.create_acl_rule(&attrs).unwrap();
    assert!(h.policer.attached().contains(&(p1, rule)));

    // Swapping the policer rebinds the rule.
    h.acl
        .set_acl_rule_attribute(rule, &action_attr(AclActionTag::SetPolicer, MatchValue::Oid(p2)))
        .unwrap();
    let attached = h.policer.attached();
    assert!(!attached.contains(&(p1, rule)));
    assert!(attached.contains(&(p2, rule)));
    h.acl
        .with_state(|orch| assert_eq!(orch.rule(rule).unwrap().policer_oid, p2));
}

#[test]
fn counter_swap_via_set() {
    let h = harness();
    let table = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp]);
    let c1 = make_counter(&h, table);
    let c2 = make_counter(&h, table);

    let mut attrs = src_ip_rule_attrs(table, 1);
    attrs.push(action_attr(AclActionTag::Counter, MatchValue::Oid(c1)));
    let rule = h.acl.create_acl_rule(&attrs).unwrap();

    h.acl
        .set_acl_rule_attribute(rule, &action_attr(AclActionTag::Counter, MatchValue::Oid(c2)))
        .unwrap();

    h.acl.with_state(|orch| {
        assert_eq!(orch.counter(c1).unwrap().shared_count, 0);
        assert_eq!(orch.counter(c2).unwrap().shared_count, 1);
        assert_eq!(orch.rule(rule).unwrap().counter_oid, c2);
    });
    assert!(h.npu.snapshot(|s| s.attachments.contains(&(rule, c2))));
    assert!(!h.npu.snapshot(|s| s.attachments.contains(&(rule, c1))));
}

#[test]
fn counter_from_other_table_rejected() {
    let h = harness();
    let t1 = create_table(&h, AclStage::Ingress, 10, &[AclField::SrcIp]);
    let t2 = create_table(&h, AclStage::Ingress, 20, &[AclField::SrcIp]);
    let counter = make_counter(&h, t2);

    let mut attrs = src_ip_rule_attrs(t1, 1);
    attrs.push(action_attr(AclActionTag::Counter, MatchValue::Oid(counter)));
    let result = h.acl.create_acl_rule(&attrs);
    assert_eq!(result, Err(SaiStatus::InvalidAttrValue(0)));
}
