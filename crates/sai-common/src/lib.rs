//! SAI plumbing shared by every object manager.
//!
//! This crate carries the pieces that are common to the whole SAI surface
//! rather than to any one object class:
//!
//! - [`Oid`]: the 64-bit opaque handle with an embedded object-type tag
//! - [`SaiStatus`]: status codes, including the list-indexed attribute errors
//! - [`Attribute`] / [`AttrValue`]: the raw (id, value) attribute surface and
//!   the schema-driven list validator

mod attr;
mod oid;
mod status;

pub use attr::{
    find_attr, validate_attr_list, AclActionValue, AclFieldValue, AttrFlags, AttrOp, AttrSchema,
    Attribute, AttrValue, MatchValue,
};
pub use oid::{ObjectType, Oid};
pub use status::{SaiResult, SaiStatus};
