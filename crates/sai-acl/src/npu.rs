//! NPU backend traits.
//!
//! The control plane drives the switching ASIC exclusively through these
//! traits; implementations live with the hardware support package. The
//! contract on every call: a failing NPU function leaves no visible state
//! change on the NPU side, so the core only ever rolls back effects it made
//! itself.

use sai_common::{Attribute, Oid, SaiResult};

use crate::acl::{AclCounter, AclField, AclRange, AclRule, AclStage, AclTable, RuleDelta};
use crate::udf::{Udf, UdfGroup};

/// Opaque handle to an NPU-side object.
pub type NpuHandle = u64;

/// Hardware operations for the ACL subsystem.
pub trait AclNpuApi: Send + Sync {
    /// Materializes a table, returning its hardware handle.
    fn create_acl_table(&self, table: &AclTable) -> SaiResult<NpuHandle>;
    fn delete_acl_table(&self, table: &AclTable) -> SaiResult<()>;
    /// Checks the field set against the qualifiers the stage supports.
    fn validate_acl_table_fields(&self, stage: AclStage, fields: &[AclField]) -> SaiResult<()>;

    fn create_acl_rule(&self, table: &AclTable, rule: &AclRule) -> SaiResult<NpuHandle>;
    fn delete_acl_rule(&self, table: &AclTable, rule: &AclRule) -> SaiResult<()>;
    /// Applies a rule modification in one shot. `candidate` is the rule as
    /// it should look, `delta` the per-entry classification, `existing` the
    /// installed rule. Rejection must leave the installed rule untouched.
    fn set_acl_rule(
        &self,
        table: &AclTable,
        candidate: &AclRule,
        delta: &RuleDelta,
        existing: &AclRule,
    ) -> SaiResult<()>;

    fn create_acl_cntr(&self, table: &AclTable, cntr: &AclCounter) -> SaiResult<NpuHandle>;
    fn delete_acl_cntr(&self, cntr: &AclCounter) -> SaiResult<()>;
    /// Writes one or both count values.
    fn set_acl_cntr(
        &self,
        cntr: &AclCounter,
        packets: Option<u64>,
        bytes: Option<u64>,
    ) -> SaiResult<()>;
    /// Reads `out.len()` count values (1 or 2 depending on counter type).
    fn get_acl_cntr(&self, cntr: &AclCounter, out: &mut [u64]) -> SaiResult<()>;
    fn attach_cntr_to_acl_rule(&self, rule: &AclRule, cntr: &AclCounter) -> SaiResult<()>;
    fn detach_cntr_from_acl_rule(&self, rule: &AclRule, cntr: &AclCounter) -> SaiResult<()>;

    fn create_acl_range(&self, range: &AclRange) -> SaiResult<NpuHandle>;
    fn delete_acl_range(&self, range: &AclRange) -> SaiResult<()>;
    fn set_acl_range(&self, range: &AclRange) -> SaiResult<()>;

    /// Swaps the policer a rule feeds.
    fn update_policer_acl_rule(
        &self,
        table: &AclTable,
        rule: &AclRule,
        old_policer: Oid,
        new_policer: Oid,
    ) -> SaiResult<()>;
}

/// Hardware operations for the UDF subsystem.
///
/// UDF-match storage is delegated entirely to the NPU layer; the core only
/// forwards attribute lists after OID/type validation.
pub trait UdfNpuApi: Send + Sync {
    /// Materializes a group, returning the hardware id ACL consumers embed
    /// in user-defined field qualifiers.
    fn udf_group_create(&self, group: &UdfGroup) -> SaiResult<NpuHandle>;
    fn udf_group_remove(&self, group: &UdfGroup) -> SaiResult<()>;
    fn udf_group_hw_id_get(&self, group: &UdfGroup) -> SaiResult<NpuHandle>;

    fn udf_create(&self, group: &UdfGroup, udf: &Udf) -> SaiResult<NpuHandle>;
    fn udf_remove(&self, group: &UdfGroup, udf: &Udf) -> SaiResult<()>;
    fn udf_attribute_set(&self, udf: &Udf, attr: &Attribute) -> SaiResult<()>;

    fn udf_match_create(&self, match_oid: Oid, attrs: &[Attribute]) -> SaiResult<()>;
    fn udf_match_remove(&self, match_oid: Oid) -> SaiResult<()>;
    fn udf_match_attribute_get(&self, match_oid: Oid, attrs: &mut [Attribute]) -> SaiResult<()>;
}
