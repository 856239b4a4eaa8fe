//! Streaming MRT/BGP4MP decoder: drives the byte reader, demultiplexes on
//! `(type, subtype)`, maintains the peer-index state machine, and invokes
//! caller-supplied sinks.

pub mod attributes;
pub mod cursor;
pub mod header;
pub mod records;

use crate::models::{
    Bgp4MpType, BgpMessageEvent, BgpStateEvent, EntryType, PeerContext, PeerEntry, PeerTable,
    RibRecord, TableDumpV2Type, Timestamp,
};
use crate::ParserError;
use std::io::Read;

/// The peer-index context the dispatcher carries across records (§4.6's
/// state machine): `None` until a peer table exists, `Synthetic` once a
/// legacy v1/BGP4MP_ENTRY record has been seen with no V2 peer-index table
/// in scope, `Indexed` once one has.
enum PeerState {
    None,
    Synthetic(PeerEntry),
    Indexed(PeerTable),
}

impl PeerState {
    fn as_context(&self) -> PeerContext<'_> {
        match self {
            PeerState::None => PeerContext::None,
            PeerState::Synthetic(p) => PeerContext::Synthetic(p),
            PeerState::Indexed(t) => PeerContext::Indexed(t),
        }
    }
}

type DumpSink<'a> = Box<dyn FnMut(&RibRecord, PeerContext<'_>) + 'a>;
type StateSink<'a> = Box<dyn FnMut(&BgpStateEvent) + 'a>;
type MessageSink<'a> = Box<dyn FnMut(&BgpMessageEvent) + 'a>;

/// A streaming MRT decoder wrapping any [`std::io::Read`]. Configure with
/// [`MrtDecoder::on_dump`]/[`MrtDecoder::on_state`]/[`MrtDecoder::on_message`]
/// before calling [`MrtDecoder::run`]; each is optional, mirroring the three
/// independently optional sink callbacks of the wire contract.
pub struct MrtDecoder<'a, R> {
    reader: R,
    peer_state: PeerState,
    on_dump: Option<DumpSink<'a>>,
    on_state: Option<StateSink<'a>>,
    on_message: Option<MessageSink<'a>>,
}

impl<'a, R: Read> MrtDecoder<'a, R> {
    pub fn new(reader: R) -> Self {
        MrtDecoder {
            reader,
            peer_state: PeerState::None,
            on_dump: None,
            on_state: None,
            on_message: None,
        }
    }

    pub fn on_dump(mut self, f: impl FnMut(&RibRecord, PeerContext<'_>) + 'a) -> Self {
        self.on_dump = Some(Box::new(f));
        self
    }

    pub fn on_state(mut self, f: impl FnMut(&BgpStateEvent) + 'a) -> Self {
        self.on_state = Some(Box::new(f));
        self
    }

    pub fn on_message(mut self, f: impl FnMut(&BgpMessageEvent) + 'a) -> Self {
        self.on_message = Some(Box::new(f));
        self
    }

    /// Drives the decode loop to completion. Returns on clean end-of-stream;
    /// propagates the first I/O error encountered (fatal per §7). Any other
    /// per-record decode failure — including a wire type code outside the
    /// closed [`EntryType`] enum — is logged and the record is dropped; the
    /// stream continues. The header reader always consumes the record's full
    /// declared length before this function ever sees the failure, so a
    /// dropped record never desynchronizes the stream.
    pub fn run(&mut self) -> Result<(), ParserError> {
        loop {
            let Some((raw, payload)) = header::read_record(&mut self.reader)? else {
                return Ok(());
            };

            let time = Timestamp {
                sec: raw.timestamp,
                nsec: raw.microsecond_timestamp.unwrap_or(0) * 1000,
            };

            let result = self.handle_record(raw.mrt_type, raw.entry_subtype, payload, time);
            if let Err(e) = result {
                log::warn!(
                    "dropping record (type={}, subtype={}): {e}",
                    raw.mrt_type,
                    raw.entry_subtype
                );
            }
        }
    }

    /// Resolves the raw wire type code to an [`EntryType`] and, if
    /// decodable, dispatches it. An unrecognized code and a recognized but
    /// undecoded one (deprecated types, non-BGP protocol families) both
    /// return cleanly rather than reaching [`Self::dispatch`]; the former as
    /// an `Err` the caller logs and drops, the latter as a silent `Ok(())`
    /// per the "accepted and skipped" contract.
    fn handle_record(
        &mut self,
        mrt_type: u16,
        subtype: u16,
        payload: bytes::Bytes,
        time: Timestamp,
    ) -> Result<(), ParserError> {
        let entry_type = EntryType::try_from(mrt_type)
            .map_err(|_| ParserError::UnsupportedMrtType { mrt_type, subtype })?;

        if !entry_type.is_decodable() {
            log::debug!("skipping unrecognized/deprecated entry type {:?}", entry_type);
            return Ok(());
        }

        self.dispatch(entry_type, subtype, payload, time)
    }

    fn dispatch(
        &mut self,
        entry_type: EntryType,
        subtype: u16,
        payload: bytes::Bytes,
        time: Timestamp,
    ) -> Result<(), ParserError> {
        match entry_type {
            EntryType::TABLE_DUMP => {
                let family = records::table_dump::family_for_subtype(subtype)?;
                let (record, peer) = records::table_dump::decode(payload, family)?;
                self.absorb_legacy_peer_and_dump(peer, &record);
            }
            EntryType::TABLE_DUMP_V2 => {
                if subtype == 1 {
                    let table = records::table_dump_v2::decode_peer_index(payload)?;
                    self.peer_state = PeerState::Indexed(table);
                } else {
                    let v2_subtype = TableDumpV2Type::try_from(subtype)?;
                    let record = records::table_dump_v2::decode_rib(payload, v2_subtype)?;
                    if let Some(sink) = &mut self.on_dump {
                        sink(&record, self.peer_state.as_context());
                    }
                }
            }
            EntryType::BGP4MP | EntryType::BGP4MP_ET => {
                let bgp4mp_type = Bgp4MpType::try_from(subtype)?;
                if bgp4mp_type.is_entry() {
                    let (record, peer) = records::bgp4mp::decode_entry(payload)?;
                    self.absorb_legacy_peer_and_dump(peer, &record);
                } else if bgp4mp_type.is_state_change() {
                    let event = records::bgp4mp::decode_state_change(payload, bgp4mp_type, time)?;
                    if let Some(sink) = &mut self.on_state {
                        sink(&event);
                    }
                } else {
                    let event = records::bgp4mp::decode_message(payload, bgp4mp_type, time)?;
                    if let Some(sink) = &mut self.on_message {
                        sink(&event);
                    }
                }
            }
            _ => unreachable!("is_decodable() already filtered to the four known families"),
        }
        Ok(())
    }

    /// Common tail for v1 TABLE_DUMP and legacy BGP4MP_ENTRY records: update
    /// (or create) the synthetic single-entry peer context without
    /// disturbing a V2 peer-index table already in scope, then invoke the
    /// dump sink.
    fn absorb_legacy_peer_and_dump(&mut self, peer: PeerEntry, record: &RibRecord) {
        let context_peer = match &mut self.peer_state {
            PeerState::None => {
                self.peer_state = PeerState::Synthetic(peer);
                match &self.peer_state {
                    PeerState::Synthetic(p) => p.clone(),
                    _ => unreachable!(),
                }
            }
            PeerState::Synthetic(existing) => {
                *existing = peer;
                existing.clone()
            }
            PeerState::Indexed(_) => peer,
        };
        if let Some(sink) = &mut self.on_dump {
            sink(record, PeerContext::Synthetic(&context_peer));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Asn};
    use std::cell::RefCell;
    use std::net::Ipv4Addr;

    fn table_dump_v1_record() -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&0u16.to_be_bytes());
        payload.extend_from_slice(&1u16.to_be_bytes());
        payload.extend_from_slice(&[10, 0, 0, 0]);
        payload.push(8);
        payload.push(1);
        payload.extend_from_slice(&0x6000_0000u32.to_be_bytes());
        payload.extend_from_slice(&[192, 0, 2, 1]);
        payload.extend_from_slice(&0xFDE8u16.to_be_bytes());
        payload.extend_from_slice(&0u16.to_be_bytes());

        let mut record = Vec::new();
        record.extend_from_slice(&0x6000_0000u32.to_be_bytes());
        record.extend_from_slice(&12u16.to_be_bytes()); // TABLE_DUMP
        record.extend_from_slice(&1u16.to_be_bytes()); // subtype = ipv4
        record.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        record.extend_from_slice(&payload);
        record
    }

    #[test]
    fn empty_stream_invokes_no_sinks() {
        let dumped = RefCell::new(0);
        let mut decoder = MrtDecoder::new(std::io::Cursor::new(Vec::<u8>::new()));
        decoder = decoder.on_dump(|_, _| *dumped.borrow_mut() += 1);
        decoder.run().unwrap();
        assert_eq!(*dumped.borrow(), 0);
    }

    #[test]
    fn table_dump_record_synthesizes_peer_and_dumps() {
        let data = table_dump_v1_record();
        let seen = RefCell::new(Vec::new());
        let mut decoder = MrtDecoder::new(std::io::Cursor::new(data));
        decoder = decoder.on_dump(|record, ctx| {
            let peer = match ctx {
                PeerContext::Synthetic(p) => p.clone(),
                _ => panic!("expected a synthetic peer context"),
            };
            seen.borrow_mut().push((record.seqnum, peer.addr, peer.asnum));
        });
        decoder.run().unwrap();
        drop(decoder);
        let seen = seen.into_inner();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, 1);
        assert_eq!(seen[0].1, Address::V4(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(seen[0].2, Asn::new_16bit(0xFDE8));
    }

    #[test]
    fn et_record_converts_microseconds_to_nanoseconds() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&500_000u32.to_be_bytes()); // microseconds
        payload.extend_from_slice(&65001u16.to_be_bytes());
        payload.extend_from_slice(&65002u16.to_be_bytes());
        payload.extend_from_slice(&0u16.to_be_bytes());
        payload.extend_from_slice(&1u16.to_be_bytes());
        payload.extend_from_slice(&[192, 0, 2, 10]);
        payload.extend_from_slice(&[192, 0, 2, 20]);
        payload.extend_from_slice(&[0xAA, 0xBB]);

        let mut record = Vec::new();
        record.extend_from_slice(&0u32.to_be_bytes());
        record.extend_from_slice(&17u16.to_be_bytes()); // BGP4MP_ET
        record.extend_from_slice(&1u16.to_be_bytes()); // subtype = message
        record.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        record.extend_from_slice(&payload);

        let seen_nsec = RefCell::new(None);
        let seen_msg = RefCell::new(Vec::new());
        let mut decoder = MrtDecoder::new(std::io::Cursor::new(record));
        decoder = decoder.on_message(|event| {
            *seen_nsec.borrow_mut() = Some(event.time.nsec);
            *seen_msg.borrow_mut() = event.msg.to_vec();
        });
        decoder.run().unwrap();
        drop(decoder);
        assert_eq!(seen_nsec.into_inner(), Some(500_000_000));
        assert_eq!(seen_msg.into_inner(), vec![0xAA, 0xBB]);
    }

    #[test]
    fn malformed_record_is_dropped_and_stream_continues() {
        let mut bad = Vec::new();
        bad.extend_from_slice(&0u32.to_be_bytes());
        bad.extend_from_slice(&12u16.to_be_bytes()); // TABLE_DUMP
        bad.extend_from_slice(&1u16.to_be_bytes());
        bad.extend_from_slice(&2u32.to_be_bytes()); // declares 2 bytes, far too short
        bad.extend_from_slice(&[0, 0]);

        let mut good = table_dump_v1_record();
        let mut data = bad;
        data.append(&mut good);

        let count = RefCell::new(0);
        let mut decoder = MrtDecoder::new(std::io::Cursor::new(data));
        decoder = decoder.on_dump(|_, _| *count.borrow_mut() += 1);
        decoder.run().unwrap();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn unrecognized_type_code_is_dropped_and_stream_continues() {
        let mut unknown = Vec::new();
        unknown.extend_from_slice(&0u32.to_be_bytes());
        unknown.extend_from_slice(&0xBEEFu16.to_be_bytes()); // not a valid EntryType
        unknown.extend_from_slice(&0u16.to_be_bytes());
        unknown.extend_from_slice(&4u32.to_be_bytes());
        unknown.extend_from_slice(&[1, 2, 3, 4]);

        let mut good = table_dump_v1_record();
        let mut data = unknown;
        data.append(&mut good);

        let count = RefCell::new(0);
        let mut decoder = MrtDecoder::new(std::io::Cursor::new(data));
        decoder = decoder.on_dump(|_, _| *count.borrow_mut() += 1);
        decoder.run().unwrap();
        assert_eq!(*count.borrow(), 1);
    }
}
