//! ACL and UDF control-plane core.
//!
//! This crate maintains a transactional in-memory model of Access Control
//! Lists (tables, rules, counters, ranges, table groups, group members) and
//! User-Defined Fields (UDF groups, UDFs, UDF matches), and drives an NPU
//! backend so that software state and ASIC state stay in lockstep.
//!
//! Every create/set/delete is a multi-step transaction touching the software
//! database, the NPU driver, and peer-object managers (policer, samplepacket,
//! mirror). Each step is unwound in reverse order if a later step fails, so
//! from the caller's viewpoint every operation is atomic: on non-success
//! nothing observable changes.
//!
//! # Architecture
//!
//! ```text
//!  AclService / UdfService      (one coarse mutex per subsystem)
//!        │
//!        ▼
//!  AclOrch / UdfOrch            (registries, ID allocation, protocols)
//!        │
//!        ├──> AclNpuApi / UdfNpuApi     (hardware programming backend)
//!        ├──> PolicerAccess            (mode checks, per-rule linkage)
//!        ├──> SamplePacketAccess       (direction-aware port bindings)
//!        └──> MirrorAccess             (session existence)
//! ```
//!
//! # Key Components
//!
//! - [`acl::AclOrch`]: table/rule/counter/range/group managers and the
//!   rule-set delta engine
//! - [`udf::UdfOrch`]: UDF group/UDF/UDF-match lifecycle and the accessors
//!   the ACL layer consumes
//! - [`AclService`] / [`UdfService`]: mutex-guarded entry-point facades
//! - [`npu`]: the traits a hardware backend implements
//! - [`peers`]: the narrow peer-object interfaces

pub mod acl;
mod idgen;
pub mod npu;
pub mod peers;
mod registry;
mod service;
pub mod udf;

pub use idgen::IdAllocator;
pub use registry::ObjectMap;
pub use service::{AclService, UdfService};
