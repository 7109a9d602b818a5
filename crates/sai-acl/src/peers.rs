//! Narrow interfaces to peer object managers.
//!
//! The ACL core consults peers for existence and type checks and links rules
//! into their dependency bookkeeping. Peers must never call back into the
//! ACL or UDF subsystems: the per-subsystem mutex is held across these
//! calls.

use sai_common::{Oid, SaiResult};
use std::fmt;
use std::sync::Arc;

/// Metering mode of a policer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicerMode {
    SrTcm,
    TrTcm,
    Storm,
}

impl fmt::Display for PolicerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SrTcm => write!(f, "SR_TCM"),
            Self::TrTcm => write!(f, "TR_TCM"),
            Self::Storm => write!(f, "STORM_CONTROL"),
        }
    }
}

/// Direction a samplepacket binding applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum SampleDirection {
    Ingress = 0,
    Egress = 1,
}

impl SampleDirection {
    pub const COUNT: usize = 2;
}

/// Policer manager surface the rule paths use.
pub trait PolicerAccess: Send + Sync {
    /// Mode of a live policer; `None` when the OID is not a live policer.
    fn policer_mode(&self, policer: Oid) -> Option<PolicerMode>;
    /// Links a rule into the policer's per-rule list.
    fn attach_acl_rule(&self, policer: Oid, rule: Oid) -> SaiResult<()>;
    fn detach_acl_rule(&self, policer: Oid, rule: Oid) -> SaiResult<()>;
}

/// Samplepacket-session surface the rule paths use.
///
/// `ports` of `None` is an all-ports binding. The `validate`/`update` pair
/// mirrors the two-phase rule-set protocol: validate-only checks whether the
/// binding would be accepted, update commits it.
pub trait SamplePacketAccess: Send + Sync {
    fn validate_object(
        &self,
        ports: Option<&[Oid]>,
        sample: Oid,
        direction: SampleDirection,
        validate: bool,
        update: bool,
    ) -> SaiResult<()>;

    fn remove_object(
        &self,
        ports: Option<&[Oid]>,
        sample: Oid,
        direction: SampleDirection,
    ) -> SaiResult<()>;
}

/// Mirror-session surface the rule paths use.
pub trait MirrorAccess: Send + Sync {
    fn session_exists(&self, session: Oid) -> bool;
}

/// Bundle of peer hooks handed to the ACL orchestrator.
#[derive(Clone)]
pub struct PeerHooks {
    pub policer: Arc<dyn PolicerAccess>,
    pub samplepacket: Arc<dyn SamplePacketAccess>,
    pub mirror: Arc<dyn MirrorAccess>,
}

impl PeerHooks {
    /// Hooks that accept everything. Useful for targets without the peer
    /// subsystems and for tests that exercise other paths.
    pub fn permissive() -> Self {
        struct Permissive;

        impl PolicerAccess for Permissive {
            fn policer_mode(&self, _policer: Oid) -> Option<PolicerMode> {
                Some(PolicerMode::SrTcm)
            }
            fn attach_acl_rule(&self, _policer: Oid, _rule: Oid) -> SaiResult<()> {
                Ok(())
            }
            fn detach_acl_rule(&self, _policer: Oid, _rule: Oid) -> SaiResult<()> {
                Ok(())
            }
        }

        impl SamplePacketAccess for Permissive {
            fn validate_object(
                &self,
                _ports: Option<&[Oid]>,
                _sample: Oid,
                _direction: SampleDirection,
                _validate: bool,
                _update: bool,
            ) -> SaiResult<()> {
                Ok(())
            }
            fn remove_object(
                &self,
                _ports: Option<&[Oid]>,
                _sample: Oid,
                _direction: SampleDirection,
            ) -> SaiResult<()> {
                Ok(())
            }
        }

        impl MirrorAccess for Permissive {
            fn session_exists(&self, _session: Oid) -> bool {
                true
            }
        }

        let shared = Arc::new(Permissive);
        Self {
            policer: shared.clone(),
            samplepacket: shared.clone(),
            mirror: shared,
        }
    }
}

impl fmt::Debug for PeerHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerHooks").finish_non_exhaustive()
    }
}
