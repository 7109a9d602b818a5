//! UDF orchestrator: group, UDF, and UDF-match lifecycle.

use std::collections::BTreeSet;
use std::sync::Arc;

use sai_common::{
    validate_attr_list, AttrOp, AttrValue, Attribute, ObjectType, Oid, SaiResult, SaiStatus,
};

use super::attr::{
    UdfGroupSchema, UdfMatchSchema, UdfSchema, UDF_ATTR_BASE, UDF_ATTR_GROUP_ID,
    UDF_ATTR_HASH_MASK, UDF_ATTR_MATCH_ID, UDF_ATTR_OFFSET, UDF_GROUP_ATTR_LENGTH,
    UDF_GROUP_ATTR_TYPE,
};
use super::types::{Udf, UdfBase, UdfGroup, UdfGroupType};
use super::UdfLookup;
use crate::idgen::IdAllocator;
use crate::npu::{NpuHandle, UdfNpuApi};
use crate::registry::ObjectMap;

/// The UDF control-plane state: registries, index allocators, and the NPU
/// backend. Entry points are serialized by the service facade's mutex.
pub struct UdfOrch {
    npu: Arc<dyn UdfNpuApi>,
    groups: ObjectMap<UdfGroup>,
    udfs: ObjectMap<Udf>,
    /// UDF-match storage is delegated to the NPU; only liveness is tracked.
    matches: BTreeSet<Oid>,
    group_ids: IdAllocator,
    udf_ids: IdAllocator,
    match_ids: IdAllocator,
}

impl UdfOrch {
    pub fn new(npu: Arc<dyn UdfNpuApi>) -> Self {
        Self {
            npu,
            groups: ObjectMap::new(),
            udfs: ObjectMap::new(),
            matches: BTreeSet::new(),
            group_ids: IdAllocator::new(),
            udf_ids: IdAllocator::new(),
            match_ids: IdAllocator::new(),
        }
    }

    pub fn group(&self, oid: Oid) -> Option<&UdfGroup> {
        self.groups.get(oid)
    }

    pub fn udf(&self, oid: Oid) -> Option<&Udf> {
        self.udfs.get(oid)
    }

    // ============ UDF group ============

    pub fn create_udf_group(&mut self, attrs: &[Attribute]) -> SaiResult<Oid> {
        validate_attr_list(attrs, AttrOp::Create, &UdfGroupSchema)?;

        let mut group_type = UdfGroupType::default();
        if let Some(index) = attrs.iter().position(|a| a.id == UDF_GROUP_ATTR_TYPE) {
            let raw = attrs[index]
                .value
                .as_s32()
                .ok_or(SaiStatus::InvalidAttrValue(index as u32))?;
            group_type = UdfGroupType::from_raw(raw)
                .ok_or(SaiStatus::InvalidAttrValue(index as u32))?;
        }

        let length_index = attrs
            .iter()
            .position(|a| a.id == UDF_GROUP_ATTR_LENGTH)
            .ok_or(SaiStatus::MandatoryAttributeMissing)?;
        let length = attrs[length_index]
            .value
            .as_u16()
            .ok_or(SaiStatus::InvalidAttrValue(length_index as u32))?;
        if length == 0 {
            log::error!("UDF group length must be non-zero");
            return Err(SaiStatus::InvalidAttrValue(length_index as u32));
        }

        let index = {
            let groups = &self.groups;
            self.group_ids
                .next_id(|idx| groups.contains(Oid::new(ObjectType::UdfGroup, idx)))?
        };
        let oid = Oid::new(ObjectType::UdfGroup, index);

        let mut group = UdfGroup::new(oid, group_type, length);
        let hw_id = self.npu.udf_group_create(&group)?;
        group.npu_handle = Some(hw_id);

        self.groups.insert(oid, group);
        log::info!("created UDF group {} type {} length {}", oid, group_type, length);
        Ok(oid)
    }

    pub fn remove_udf_group(&mut self, oid: Oid) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::UdfGroup) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let group = self.groups.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        if group.udf_count() > 0 {
            log::error!("UDF group {} still has {} UDFs", oid, group.udf_count());
            return Err(SaiStatus::ObjectInUse);
        }

        let group = self
            .groups
            .remove(oid)
            .ok_or(SaiStatus::InvalidObjectId)?;
        if let Err(status) = self.npu.udf_group_remove(&group) {
            self.groups.insert(oid, group);
            return Err(status);
        }
        log::info!("removed UDF group {}", oid);
        Ok(())
    }

    pub fn set_udf_group(&mut self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::UdfGroup) {
            return Err(SaiStatus::InvalidObjectType);
        }
        if !self.groups.contains(oid) {
            return Err(SaiStatus::InvalidObjectId);
        }
        // Both group attributes are create-only; the validator rejects them
        // with the indexed not-supported code.
        validate_attr_list(std::slice::from_ref(attr), AttrOp::Set, &UdfGroupSchema)?;
        Err(SaiStatus::NotSupported)
    }

    pub fn get_udf_group(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::UdfGroup) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let group = self.groups.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        validate_attr_list(attrs, AttrOp::Get, &UdfGroupSchema)?;

        for attr in attrs.iter_mut() {
            match attr.id {
                UDF_GROUP_ATTR_TYPE => attr.value = AttrValue::S32(group.group_type.to_raw()),
                UDF_GROUP_ATTR_LENGTH => attr.value = AttrValue::U16(group.length),
                _ => {}
            }
        }
        Ok(())
    }

    // ============ UDF ============

    pub fn create_udf(&mut self, attrs: &[Attribute]) -> SaiResult<Oid> {
        validate_attr_list(attrs, AttrOp::Create, &UdfSchema)?;

        let match_index = attrs
            .iter()
            .position(|a| a.id == UDF_ATTR_MATCH_ID)
            .ok_or(SaiStatus::MandatoryAttributeMissing)?;
        let match_oid = attrs[match_index]
            .value
            .as_oid()
            .ok_or(SaiStatus::InvalidAttrValue(match_index as u32))?;
        if !match_oid.is_of_type(ObjectType::UdfMatch) {
            return Err(SaiStatus::InvalidAttrValue(match_index as u32));
        }
        if !self.matches.contains(&match_oid) {
            return Err(SaiStatus::InvalidObjectId);
        }

        let group_index = attrs
            .iter()
            .position(|a| a.id == UDF_ATTR_GROUP_ID)
            .ok_or(SaiStatus::MandatoryAttributeMissing)?;
        let group_oid = attrs[group_index]
            .value
            .as_oid()
            .ok_or(SaiStatus::InvalidAttrValue(group_index as u32))?;
        if !group_oid.is_of_type(ObjectType::UdfGroup) {
            return Err(SaiStatus::InvalidAttrValue(group_index as u32));
        }
        let group = self
            .groups
            .get(group_oid)
            .ok_or(SaiStatus::InvalidObjectId)?;

        let offset_index = attrs
            .iter()
            .position(|a| a.id == UDF_ATTR_OFFSET)
            .ok_or(SaiStatus::MandatoryAttributeMissing)?;
        let offset = attrs[offset_index]
            .value
            .as_u16()
            .ok_or(SaiStatus::InvalidAttrValue(offset_index as u32))?;

        let mut base = UdfBase::default();
        if let Some(index) = attrs.iter().position(|a| a.id == UDF_ATTR_BASE) {
            let raw = attrs[index]
                .value
                .as_s32()
                .ok_or(SaiStatus::InvalidAttrValue(index as u32))?;
            base = UdfBase::from_raw(raw).ok_or(SaiStatus::InvalidAttrValue(index as u32))?;
        }

        let mut hash_mask = Vec::new();
        if let Some(index) = attrs.iter().position(|a| a.id == UDF_ATTR_HASH_MASK) {
            // Hash masks are a HASH-group concept.
            if group.group_type != UdfGroupType::Hash {
                log::error!(
                    "hash mask supplied for UDF in {} group {}",
                    group.group_type,
                    group_oid
                );
                return Err(SaiStatus::InvalidAttribute(index as u32));
            }
            let mask = attrs[index]
                .value
                .as_byte_list()
                .ok_or(SaiStatus::InvalidAttrValue(index as u32))?;
            if mask.len() != group.length as usize {
                log::error!(
                    "hash mask length {} does not match group length {}",
                    mask.len(),
                    group.length
                );
                return Err(SaiStatus::InvalidAttrValue(index as u32));
            }
            hash_mask = mask.to_vec();
        } else if group.group_type == UdfGroupType::Hash {
            hash_mask = vec![0xff; group.length as usize];
        }

        let index = {
            let udfs = &self.udfs;
            self.udf_ids
                .next_id(|idx| udfs.contains(Oid::new(ObjectType::Udf, idx)))?
        };
        let oid = Oid::new(ObjectType::Udf, index);

        let mut udf = Udf::new(oid, group_oid, match_oid);
        udf.base = base;
        udf.offset = offset;
        udf.hash_mask = hash_mask;

        let handle = self.npu.udf_create(group, &udf)?;
        udf.npu_handle = Some(handle);

        let group = self
            .groups
            .get_mut(group_oid)
            .ok_or(SaiStatus::Failure)?;
        group.udf_list.push(oid);
        self.udfs.insert(oid, udf);
        log::info!("created UDF {} in group {}", oid, group_oid);
        Ok(oid)
    }

    pub fn remove_udf(&mut self, oid: Oid) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::Udf) {
            return Err(SaiStatus::InvalidObjectType);
        }

        let group_oid = self
            .udfs
            .get(oid)
            .ok_or(SaiStatus::InvalidObjectId)?
            .group_oid;
        if !self.groups.contains(group_oid) {
            log::error!("UDF {} points at missing group {}", oid, group_oid);
            return Err(SaiStatus::Failure);
        }

        // Registry first, then the group link, then hardware; a hardware
        // failure relinks both.
        let udf = self.udfs.remove(oid).ok_or(SaiStatus::InvalidObjectId)?;
        if let Some(group) = self.groups.get_mut(group_oid) {
            group.udf_list.retain(|u| *u != oid);
        }

        let group = self.groups.get(group_oid).ok_or(SaiStatus::Failure)?;
        if let Err(status) = self.npu.udf_remove(group, &udf) {
            let group = self.groups.get_mut(group_oid).ok_or(SaiStatus::Failure)?;
            group.udf_list.push(oid);
            self.udfs.insert(oid, udf);
            return Err(status);
        }
        log::info!("removed UDF {} from group {}", oid, group_oid);
        Ok(())
    }

    pub fn set_udf(&mut self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::Udf) {
            return Err(SaiStatus::InvalidObjectType);
        }
        validate_attr_list(std::slice::from_ref(attr), AttrOp::Set, &UdfSchema)?;

        let udf = self.udfs.get(oid).ok_or(SaiStatus::InvalidObjectId)?;

        // Snapshot, mutate the snapshot, push, and only then commit; the
        // stored UDF is never half-mutated.
        let mut snapshot = udf.clone();
        match attr.id {
            UDF_ATTR_BASE => {
                let raw = attr.value.as_s32().ok_or(SaiStatus::InvalidAttrValue(0))?;
                snapshot.base =
                    UdfBase::from_raw(raw).ok_or(SaiStatus::InvalidAttrValue(0))?;
            }
            UDF_ATTR_HASH_MASK => {
                let group = self
                    .groups
                    .get(udf.group_oid)
                    .ok_or(SaiStatus::Failure)?;
                if group.group_type != UdfGroupType::Hash {
                    return Err(SaiStatus::InvalidAttribute(0));
                }
                let mask = attr
                    .value
                    .as_byte_list()
                    .ok_or(SaiStatus::InvalidAttrValue(0))?;
                if mask.len() != group.length as usize {
                    return Err(SaiStatus::InvalidAttrValue(0));
                }
                snapshot.hash_mask = mask.to_vec();
            }
            _ => return Err(SaiStatus::AttrNotSupported(0)),
        }

        self.npu.udf_attribute_set(&snapshot, attr)?;

        let udf = self.udfs.get_mut(oid).ok_or(SaiStatus::Failure)?;
        *udf = snapshot;
        Ok(())
    }

    pub fn get_udf(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::Udf) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let udf = self.udfs.get(oid).ok_or(SaiStatus::InvalidObjectId)?;
        validate_attr_list(attrs, AttrOp::Get, &UdfSchema)?;

        for attr in attrs.iter_mut() {
            match attr.id {
                UDF_ATTR_MATCH_ID => attr.value = AttrValue::Oid(udf.match_oid),
                UDF_ATTR_GROUP_ID => attr.value = AttrValue::Oid(udf.group_oid),
                UDF_ATTR_BASE => attr.value = AttrValue::S32(udf.base.to_raw()),
                UDF_ATTR_OFFSET => attr.value = AttrValue::U16(udf.offset),
                UDF_ATTR_HASH_MASK => attr.value = AttrValue::ByteList(udf.hash_mask.clone()),
                _ => {}
            }
        }
        Ok(())
    }

    // ============ UDF match ============

    pub fn create_udf_match(&mut self, attrs: &[Attribute]) -> SaiResult<Oid> {
        validate_attr_list(attrs, AttrOp::Create, &UdfMatchSchema)?;

        let index = {
            let matches = &self.matches;
            self.match_ids
                .next_id(|idx| matches.contains(&Oid::new(ObjectType::UdfMatch, idx)))?
        };
        let oid = Oid::new(ObjectType::UdfMatch, index);

        self.npu.udf_match_create(oid, attrs)?;
        self.matches.insert(oid);
        Ok(oid)
    }

    pub fn remove_udf_match(&mut self, oid: Oid) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::UdfMatch) {
            return Err(SaiStatus::InvalidObjectType);
        }
        if !self.matches.contains(&oid) {
            return Err(SaiStatus::InvalidObjectId);
        }
        if self.udfs.values().any(|u| u.match_oid == oid) {
            return Err(SaiStatus::ObjectInUse);
        }

        self.npu.udf_match_remove(oid)?;
        self.matches.remove(&oid);
        Ok(())
    }

    /// UDF matches carry no settable attributes.
    pub fn set_udf_match(&mut self, _oid: Oid, _attr: &Attribute) -> SaiResult<()> {
        Err(SaiStatus::NotSupported)
    }

    pub fn get_udf_match(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        if !oid.is_of_type(ObjectType::UdfMatch) {
            return Err(SaiStatus::InvalidObjectType);
        }
        if !self.matches.contains(&oid) {
            return Err(SaiStatus::InvalidObjectId);
        }
        validate_attr_list(attrs, AttrOp::Get, &UdfMatchSchema)?;
        self.npu.udf_match_attribute_get(oid, attrs)
    }
}

impl UdfLookup for UdfOrch {
    fn group_hw_id(&self, group: Oid) -> SaiResult<NpuHandle> {
        if !group.is_of_type(ObjectType::UdfGroup) {
            return Err(SaiStatus::InvalidObjectType);
        }
        let group = self.groups.get(group).ok_or(SaiStatus::InvalidObjectId)?;
        match group.npu_handle {
            Some(handle) => Ok(handle),
            None => self.npu.udf_group_hw_id_get(group),
        }
    }

    fn group_type(&self, group: Oid) -> SaiResult<UdfGroupType> {
        if !group.is_of_type(ObjectType::UdfGroup) {
            return Err(SaiStatus::InvalidObjectType);
        }
        self.groups
            .get(group)
            .map(|g| g.group_type)
            .ok_or(SaiStatus::InvalidObjectId)
    }
}
