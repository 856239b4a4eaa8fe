//! MRT BGP4MP state-change and message event structs.
use crate::models::{Address, Asn};
use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// BGP finite-state-machine states, as carried on the wire.
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum BgpState {
    Idle = 1,
    Connect = 2,
    Active = 3,
    OpenSent = 4,
    OpenConfirm = 5,
    Established = 6,
}

/// BGP4MP subtypes. The AS4 variants carry source/dest AS numbers as `u32`
/// instead of `u16` and imply 4-byte-AS attribute parsing for any embedded
/// attributes; the ADDPATH variants are message-only.
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Bgp4MpType {
    StateChange = 0,
    Message = 1,
    /// Deprecated legacy RIB entry, parsed like v1 TABLE_DUMP but with an
    /// AFI-resolved address family (RFC 6396 Appendix B).
    Entry = 2,
    MessageAs4 = 4,
    StateChangeAs4 = 5,
    MessageLocal = 6,
    MessageAs4Local = 7,
    MessageAddpath = 8,
    MessageAs4Addpath = 9,
    MessageLocalAddpath = 10,
    MessageLocalAs4Addpath = 11,
}

impl Bgp4MpType {
    pub const fn is_as4(&self) -> bool {
        matches!(
            self,
            Bgp4MpType::MessageAs4
                | Bgp4MpType::StateChangeAs4
                | Bgp4MpType::MessageAs4Local
                | Bgp4MpType::MessageAs4Addpath
                | Bgp4MpType::MessageLocalAs4Addpath
        )
    }

    pub const fn is_addpath(&self) -> bool {
        matches!(
            self,
            Bgp4MpType::MessageAddpath
                | Bgp4MpType::MessageAs4Addpath
                | Bgp4MpType::MessageLocalAddpath
                | Bgp4MpType::MessageLocalAs4Addpath
        )
    }

    pub const fn is_state_change(&self) -> bool {
        matches!(self, Bgp4MpType::StateChange | Bgp4MpType::StateChangeAs4)
    }

    pub const fn is_entry(&self) -> bool {
        matches!(self, Bgp4MpType::Entry)
    }
}

/// A record timestamp, split into seconds and nanoseconds. For non-`_ET`
/// records `nsec` is always `0`; for `_ET` records it is the on-wire
/// microseconds field multiplied by 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    pub sec: u32,
    pub nsec: u32,
}

/// A BGP finite-state-machine transition captured from a BGP4MP state-change
/// record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpStateEvent {
    pub time: Timestamp,
    pub src_as: Asn,
    pub dst_as: Asn,
    pub src: Address,
    pub dst: Address,
    pub old_state: BgpState,
    pub new_state: BgpState,
}

/// A raw BGP protocol message captured from a BGP4MP message record. The
/// inner PDU is not parsed; `msg` is the verbatim remainder of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpMessageEvent {
    pub time: Timestamp,
    pub src_as: Asn,
    pub dst_as: Asn,
    pub src: Address,
    pub dst: Address,
    pub add_path: bool,
    pub msg: Bytes,
}
