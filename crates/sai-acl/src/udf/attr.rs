//! UDF attribute id spaces and schemas.

use sai_common::{AttrFlags, AttrSchema};

// UDF-group attribute ids.
pub const UDF_GROUP_ATTR_TYPE: u32 = 0x0000;
pub const UDF_GROUP_ATTR_LENGTH: u32 = 0x0001;

// UDF attribute ids.
pub const UDF_ATTR_MATCH_ID: u32 = 0x0000;
pub const UDF_ATTR_GROUP_ID: u32 = 0x0001;
pub const UDF_ATTR_BASE: u32 = 0x0002;
pub const UDF_ATTR_OFFSET: u32 = 0x0003;
pub const UDF_ATTR_HASH_MASK: u32 = 0x0004;

// UDF-match attribute ids.
pub const UDF_MATCH_ATTR_L2_TYPE: u32 = 0x0000;
pub const UDF_MATCH_ATTR_L3_TYPE: u32 = 0x0001;
pub const UDF_MATCH_ATTR_GRE_TYPE: u32 = 0x0002;
pub const UDF_MATCH_ATTR_PRIORITY: u32 = 0x0003;

/// Schema for UDF-group attributes.
pub struct UdfGroupSchema;

impl AttrSchema for UdfGroupSchema {
    fn flags(&self, id: u32) -> Option<AttrFlags> {
        match id {
            UDF_GROUP_ATTR_TYPE => Some(AttrFlags::CREATE_ONLY),
            UDF_GROUP_ATTR_LENGTH => Some(AttrFlags::CREATE_ONLY_MANDATORY),
            _ => None,
        }
    }

    fn mandatory_ids(&self) -> &'static [u32] {
        &[UDF_GROUP_ATTR_LENGTH]
    }
}

/// Schema for UDF attributes.
pub struct UdfSchema;

impl AttrSchema for UdfSchema {
    fn flags(&self, id: u32) -> Option<AttrFlags> {
        match id {
            UDF_ATTR_MATCH_ID | UDF_ATTR_GROUP_ID => Some(AttrFlags::CREATE_ONLY_MANDATORY),
            UDF_ATTR_OFFSET => Some(AttrFlags::CREATE_ONLY_MANDATORY),
            UDF_ATTR_BASE | UDF_ATTR_HASH_MASK => Some(AttrFlags::CREATE_AND_SET),
            _ => None,
        }
    }

    fn mandatory_ids(&self) -> &'static [u32] {
        &[UDF_ATTR_MATCH_ID, UDF_ATTR_GROUP_ID, UDF_ATTR_OFFSET]
    }
}

/// Schema for UDF-match attributes.
pub struct UdfMatchSchema;

impl AttrSchema for UdfMatchSchema {
    fn flags(&self, id: u32) -> Option<AttrFlags> {
        match id {
            UDF_MATCH_ATTR_L2_TYPE
            | UDF_MATCH_ATTR_L3_TYPE
            | UDF_MATCH_ATTR_GRE_TYPE
            | UDF_MATCH_ATTR_PRIORITY => Some(AttrFlags::CREATE_ONLY),
            _ => None,
        }
    }

    fn mandatory_ids(&self) -> &'static [u32] {
        &[]
    }
}
