//! Legacy (v1) TABLE_DUMP record decoding.

use crate::models::{AddressFamily, Asn, PeerEntry, PeerTable, Prefix, RibEntry, RibRecord};
use crate::parser::attributes::decode_attributes;
use crate::parser::cursor::ReadExt;
use crate::ParserError;
use bytes::Bytes;

/// v1 TABLE_DUMP subtypes: the address family of the dumped prefix.
pub fn family_for_subtype(subtype: u16) -> Result<AddressFamily, ParserError> {
    match subtype {
        1 => Ok(AddressFamily::Inet),
        2 => Ok(AddressFamily::Inet6),
        other => Err(ParserError::ParseError(format!(
            "unrecognized TABLE_DUMP subtype {other}"
        ))),
    }
}

/// Decodes a single v1 TABLE_DUMP record. Always produces a RIB record with
/// exactly one entry; the caller is responsible for synthesizing a
/// single-entry peer table if none is already in scope.
pub fn decode(mut data: Bytes, family: AddressFamily) -> Result<(RibRecord, PeerEntry), ParserError> {
    let _view = data.read_u16()?;
    let seqnum = data.read_u16()? as u32;
    let addr = data.read_address(family)?;
    let prefixlen = data.read_u8()?;
    let _status = data.read_u8()?;
    let originated = data.read_u32()?;
    let peer_addr = data.read_address(family)?;
    let peer_as = Asn::new_16bit(data.read_u16()?);
    let attr_len = data.read_u16()? as usize;
    let attrs = data.read_n(attr_len)?;

    let peer = PeerEntry {
        bgp_id: 0,
        addr: peer_addr,
        asnum: peer_as,
    };

    let mut entry = RibEntry::empty(0);
    entry.originated = originated;
    decode_attributes(attrs, family, false, &mut entry)?;

    Ok((
        RibRecord {
            seqnum,
            prefix: Prefix::new(addr, prefixlen),
            add_path: false,
            entries: vec![entry],
        },
        peer,
    ))
}

/// Builds the synthetic single-entry peer table created on the first v1 (or
/// BGP4MP_ENTRY) record seen with no peer-index table already in scope.
pub fn synthesize_peer_table(peer: PeerEntry) -> PeerTable {
    PeerTable::synthetic(peer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;
    use std::net::Ipv4Addr;

    #[test]
    fn decodes_ipv4_table_dump_record() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes()); // view
        data.extend_from_slice(&1u16.to_be_bytes()); // seqnum
        data.extend_from_slice(&[10, 0, 0, 0]); // prefix addr
        data.push(8); // prefixlen
        data.push(1); // status
        data.extend_from_slice(&0x6000_0000u32.to_be_bytes()); // originated
        data.extend_from_slice(&[192, 0, 2, 1]); // peer addr
        data.extend_from_slice(&0xFDE8u16.to_be_bytes()); // peer as
        data.extend_from_slice(&0u16.to_be_bytes()); // attr_len

        let (record, peer) = decode(Bytes::from(data), AddressFamily::Inet).unwrap();
        assert_eq!(record.seqnum, 1);
        assert_eq!(record.prefix, Prefix::new(Address::V4(Ipv4Addr::new(10, 0, 0, 0)), 8));
        assert_eq!(record.entries.len(), 1);
        assert_eq!(record.entries[0].originated, 0x6000_0000);
        assert_eq!(peer.addr, Address::V4(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(peer.asnum, Asn::new_16bit(0xFDE8));
    }
}
