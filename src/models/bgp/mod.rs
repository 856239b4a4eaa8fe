//! BGP path attribute types shared between the attribute decoder and the RIB
//! entry data model.

use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// BGP path attribute type codes this decoder recognizes by number.
///
/// Every other type code (communities, aggregator, cluster list, tunnel
/// encapsulation, link-state, ...) is out of scope: those attributes are
/// never specially parsed, only preserved as [`OpaqueAttribute`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AttrType {
    Origin = 1,
    AsPath = 2,
    NextHop = 3,
    MultiExitDisc = 4,
    LocalPref = 5,
    MpReachNlri = 14,
    As4Path = 17,
}

/// An attribute not specially interpreted by the decoder, preserved verbatim
/// including its flags/type/length header, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpaqueAttribute {
    pub raw: Bytes,
}
