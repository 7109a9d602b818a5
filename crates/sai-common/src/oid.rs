//! Object identifier encoding.
//!
//! Every managed entity is addressed by a 64-bit opaque handle. Bits 0-31
//! carry the NPU-local index, bits 48-55 the object-type tag. The tag is
//! decodable from the raw value alone, so type checks never need a lock.

use std::fmt;

/// Object classes addressable through an [`Oid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectType {
    AclTable = 1,
    AclEntry = 2,
    AclCounter = 3,
    AclRange = 4,
    AclTableGroup = 5,
    AclTableGroupMember = 6,
    Udf = 7,
    UdfGroup = 8,
    UdfMatch = 9,
    Policer = 10,
    SamplePacket = 11,
    MirrorSession = 12,
    Port = 13,
    Lag = 14,
    Queue = 15,
    NextHop = 16,
    NextHopGroup = 17,
}

impl ObjectType {
    fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            1 => Self::AclTable,
            2 => Self::AclEntry,
            3 => Self::AclCounter,
            4 => Self::AclRange,
            5 => Self::AclTableGroup,
            6 => Self::AclTableGroupMember,
            7 => Self::Udf,
            8 => Self::UdfGroup,
            9 => Self::UdfMatch,
            10 => Self::Policer,
            11 => Self::SamplePacket,
            12 => Self::MirrorSession,
            13 => Self::Port,
            14 => Self::Lag,
            15 => Self::Queue,
            16 => Self::NextHop,
            17 => Self::NextHopGroup,
            _ => return None,
        })
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AclTable => "ACL_TABLE",
            Self::AclEntry => "ACL_ENTRY",
            Self::AclCounter => "ACL_COUNTER",
            Self::AclRange => "ACL_RANGE",
            Self::AclTableGroup => "ACL_TABLE_GROUP",
            Self::AclTableGroupMember => "ACL_TABLE_GROUP_MEMBER",
            Self::Udf => "UDF",
            Self::UdfGroup => "UDF_GROUP",
            Self::UdfMatch => "UDF_MATCH",
            Self::Policer => "POLICER",
            Self::SamplePacket => "SAMPLEPACKET",
            Self::MirrorSession => "MIRROR_SESSION",
            Self::Port => "PORT",
            Self::Lag => "LAG",
            Self::Queue => "QUEUE",
            Self::NextHop => "NEXT_HOP",
            Self::NextHopGroup => "NEXT_HOP_GROUP",
        };
        write!(f, "{}", s)
    }
}

const TYPE_SHIFT: u32 = 48;
const INDEX_MASK: u64 = 0xffff_ffff;

/// A 64-bit opaque object handle.
///
/// `Oid::NULL` (raw 0) never collides with a live handle because every live
/// handle carries a non-zero type tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Oid(u64);

impl Oid {
    /// The null object id.
    pub const NULL: Oid = Oid(0);

    /// Builds a handle for `ty` around an NPU-local index.
    pub const fn new(ty: ObjectType, index: u32) -> Self {
        Oid(((ty as u64) << TYPE_SHIFT) | index as u64)
    }

    /// Reconstructs a handle from its raw value, without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Oid(raw)
    }

    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Decodes the object-type tag. `None` for the null handle or an
    /// unknown tag.
    pub fn object_type(&self) -> Option<ObjectType> {
        ObjectType::from_tag((self.0 >> TYPE_SHIFT) as u8)
    }

    /// The NPU-local index in the object class's own space.
    pub const fn npu_index(&self) -> u32 {
        (self.0 & INDEX_MASK) as u32
    }

    /// Cheap type check against the embedded tag.
    pub fn is_of_type(&self, ty: ObjectType) -> bool {
        self.object_type() == Some(ty)
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object_type() {
            Some(ty) => write!(f, "{}(0x{:016x})", ty, self.0),
            None => write!(f, "Oid(0x{:016x})", self.0),
        }
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}
