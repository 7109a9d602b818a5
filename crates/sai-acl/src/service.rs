//! Entry-point facades.
//!
//! Each subsystem runs under one coarse mutex: every public entry point
//! acquires it on entry and releases it on every exit path, which the RAII
//! guard guarantees including across multi-step rollback. The ACL side
//! reaches UDF state only through the `UdfLookup` accessors, and UDF never
//! calls back into ACL, so the two locks never nest in a cycle.

use std::sync::{Arc, Mutex, MutexGuard};

use sai_common::{Attribute, Oid, SaiResult};

use crate::acl::AclOrch;
use crate::npu::{AclNpuApi, NpuHandle, UdfNpuApi};
use crate::peers::PeerHooks;
use crate::udf::{UdfGroupType, UdfLookup, UdfOrch};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned lock only means another entry point panicked; the
    // registries themselves are kept consistent by the rollback protocol.
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// The UDF subsystem behind its global lock.
pub struct UdfService {
    inner: Mutex<UdfOrch>,
}

impl UdfService {
    pub fn new(npu: Arc<dyn UdfNpuApi>) -> Self {
        Self {
            inner: Mutex::new(UdfOrch::new(npu)),
        }
    }

    pub fn create_udf_group(&self, attrs: &[Attribute]) -> SaiResult<Oid> {
        lock(&self.inner).create_udf_group(attrs)
    }

    pub fn remove_udf_group(&self, oid: Oid) -> SaiResult<()> {
        lock(&self.inner).remove_udf_group(oid)
    }

    pub fn set_udf_group_attribute(&self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        lock(&self.inner).set_udf_group(oid, attr)
    }

    pub fn get_udf_group_attribute(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        lock(&self.inner).get_udf_group(oid, attrs)
    }

    pub fn create_udf(&self, attrs: &[Attribute]) -> SaiResult<Oid> {
        lock(&self.inner).create_udf(attrs)
    }

    pub fn remove_udf(&self, oid: Oid) -> SaiResult<()> {
        lock(&self.inner).remove_udf(oid)
    }

    pub fn set_udf_attribute(&self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        lock(&self.inner).set_udf(oid, attr)
    }

    pub fn get_udf_attribute(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        lock(&self.inner).get_udf(oid, attrs)
    }

    pub fn create_udf_match(&self, attrs: &[Attribute]) -> SaiResult<Oid> {
        lock(&self.inner).create_udf_match(attrs)
    }

    pub fn remove_udf_match(&self, oid: Oid) -> SaiResult<()> {
        lock(&self.inner).remove_udf_match(oid)
    }

    pub fn set_udf_match_attribute(&self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        lock(&self.inner).set_udf_match(oid, attr)
    }

    pub fn get_udf_match_attribute(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        lock(&self.inner).get_udf_match(oid, attrs)
    }

    /// Runs a closure against the locked state; test hook.
    pub fn with_state<R>(&self, f: impl FnOnce(&UdfOrch) -> R) -> R {
        f(&lock(&self.inner))
    }
}

impl UdfLookup for UdfService {
    fn group_hw_id(&self, group: Oid) -> SaiResult<NpuHandle> {
        lock(&self.inner).group_hw_id(group)
    }

    fn group_type(&self, group: Oid) -> SaiResult<UdfGroupType> {
        lock(&self.inner).group_type(group)
    }
}

/// The ACL subsystem behind its global lock.
pub struct AclService {
    inner: Mutex<AclOrch>,
}

impl AclService {
    pub fn new(npu: Arc<dyn AclNpuApi>, peers: PeerHooks, udf: Arc<dyn UdfLookup>) -> Self {
        Self {
            inner: Mutex::new(AclOrch::new(npu, peers, udf)),
        }
    }

    pub fn create_acl_table(&self, attrs: &[Attribute]) -> SaiResult<Oid> {
        lock(&self.inner).create_acl_table(attrs)
    }

    pub fn delete_acl_table(&self, oid: Oid) -> SaiResult<()> {
        lock(&self.inner).delete_acl_table(oid)
    }

    pub fn set_acl_table_attribute(&self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        lock(&self.inner).set_acl_table(oid, attr)
    }

    pub fn get_acl_table_attribute(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        lock(&self.inner).get_acl_table(oid, attrs)
    }

    pub fn create_acl_rule(&self, attrs: &[Attribute]) -> SaiResult<Oid> {
        lock(&self.inner).create_acl_rule(attrs)
    }

    pub fn delete_acl_rule(&self, oid: Oid) -> SaiResult<()> {
        lock(&self.inner).delete_acl_rule(oid)
    }

    pub fn set_acl_rule_attribute(&self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        lock(&self.inner).set_acl_rule(oid, attr)
    }

    pub fn get_acl_rule_attribute(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        lock(&self.inner).get_acl_rule(oid, attrs)
    }

    pub fn create_acl_counter(&self, attrs: &[Attribute]) -> SaiResult<Oid> {
        lock(&self.inner).create_acl_counter(attrs)
    }

    pub fn delete_acl_counter(&self, oid: Oid) -> SaiResult<()> {
        lock(&self.inner).delete_acl_counter(oid)
    }

    pub fn set_acl_counter_attribute(&self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        lock(&self.inner).set_acl_counter(oid, attr)
    }

    pub fn get_acl_counter_attribute(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        lock(&self.inner).get_acl_counter(oid, attrs)
    }

    pub fn create_acl_range(&self, attrs: &[Attribute]) -> SaiResult<Oid> {
        lock(&self.inner).create_acl_range(attrs)
    }

    pub fn delete_acl_range(&self, oid: Oid) -> SaiResult<()> {
        lock(&self.inner).delete_acl_range(oid)
    }

    pub fn set_acl_range_attribute(&self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        lock(&self.inner).set_acl_range(oid, attr)
    }

    pub fn get_acl_range_attribute(&self, oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()> {
        lock(&self.inner).get_acl_range(oid, attrs)
    }

    pub fn create_acl_table_group(&self, attrs: &[Attribute]) -> SaiResult<Oid> {
        lock(&self.inner).create_acl_table_group(attrs)
    }

    pub fn delete_acl_table_group(&self, oid: Oid) -> SaiResult<()> {
        lock(&self.inner).delete_acl_table_group(oid)
    }

    pub fn set_acl_table_group_attribute(&self, oid: Oid, attr: &Attribute) -> SaiResult<()> {
        lock(&self.inner).set_acl_table_group(oid, attr)
    }

    pub fn get_acl_table_group_attribute(
        &self,
        oid: Oid,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        lock(&self.inner).get_acl_table_group(oid, attrs)
    }

    pub fn create_acl_table_group_member(&self, attrs: &[Attribute]) -> SaiResult<Oid> {
        lock(&self.inner).create_acl_table_group_member(attrs)
    }

    pub fn delete_acl_table_group_member(&self, oid: Oid) -> SaiResult<()> {
        lock(&self.inner).delete_acl_table_group_member(oid)
    }

    pub fn set_acl_table_group_member_attribute(
        &self,
        oid: Oid,
        attr: &Attribute,
    ) -> SaiResult<()> {
        lock(&self.inner).set_acl_table_group_member(oid, attr)
    }

    pub fn get_acl_table_group_member_attribute(
        &self,
        oid: Oid,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        lock(&self.inner).get_acl_table_group_member(oid, attrs)
    }

    /// Runs a closure against the locked state; test hook.
    pub fn with_state<R>(&self, f: impl FnOnce(&AclOrch) -> R) -> R {
        f(&lock(&self.inner))
    }
}
