//! MRT common header and entry-type enumeration.

mod bgp4mp;
mod table_dump_v2;

pub use bgp4mp::*;
pub use table_dump_v2::*;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// MRT entry type. Types 0 to 10 are deprecated; non-BGP protocol families
/// (OSPF/RIP/ISIS) are recognized but never produce decoder events.
///
/// <https://datatracker.ietf.org/doc/html/rfc6396#section-4>
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(non_camel_case_types)]
#[repr(u16)]
pub enum EntryType {
    // deprecated
    NULL = 0,
    START = 1,
    DIE = 2,
    I_AM_DEAD = 3,
    PEER_DOWN = 4,
    BGP = 5,
    RIP = 6,
    IDRP = 7,
    RIPNG = 8,
    BGP4PLUS = 9,
    BGP4PLUS_01 = 10,
    // active
    OSPFv2 = 11,
    TABLE_DUMP = 12,
    TABLE_DUMP_V2 = 13,
    BGP4MP = 16,
    BGP4MP_ET = 17,
    ISIS = 32,
    ISIS_ET = 33,
    OSPFv3 = 48,
    OSPFv3_ET = 49,
}

impl EntryType {
    /// Entry types this decoder has a record decoder for. Everything else
    /// is accepted and skipped (deprecated types, non-BGP protocol
    /// families) per the recognized type/subtype table.
    pub const fn is_decodable(&self) -> bool {
        matches!(
            self,
            EntryType::TABLE_DUMP
                | EntryType::TABLE_DUMP_V2
                | EntryType::BGP4MP
                | EntryType::BGP4MP_ET
        )
    }
}
