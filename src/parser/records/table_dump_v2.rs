//! TABLE_DUMP_V2 peer-index and RIB record decoding.

use crate::models::{
    AddressFamily, AsnLength, PeerEntry, PeerTable, PeerType, Prefix, RibEntry, RibRecord,
    TableDumpV2Type,
};
use crate::parser::attributes::decode_attributes;
use crate::parser::cursor::ReadExt;
use crate::ParserError;
use bytes::Bytes;

/// Decodes a TABLE_DUMP_V2 peer-index-table record (subtype 1). Always
/// replaces whatever peer table was previously in scope.
pub fn decode_peer_index(mut data: Bytes) -> Result<PeerTable, ParserError> {
    let collector_bgp_id = data.read_u32()?;
    let view_len = data.read_u16()? as usize;
    let view = data.read_n(view_len)?;
    let peer_count = data.read_u16()?;

    let mut peers = Vec::with_capacity(peer_count as usize);
    for _ in 0..peer_count {
        let flags = data.read_u8()?;
        let peer_type = PeerType::from_bits_truncate(flags);
        let bgp_id = data.read_u32()?;
        let family = if peer_type.contains(PeerType::ADDRESS_FAMILY_IPV6) {
            AddressFamily::Inet6
        } else {
            AddressFamily::Inet
        };
        let addr = data.read_address(family)?;
        let asnum = data.read_asn(AsnLength::from_is_four_byte(
            peer_type.contains(PeerType::AS_SIZE_32BIT),
        ))?;
        peers.push(PeerEntry {
            bgp_id,
            addr,
            asnum,
        });
    }

    Ok(PeerTable {
        collector_bgp_id,
        view,
        peers,
    })
}

/// The family-specific prefix block consumed before a RIB record's entry
/// list; see §4.5's per-subtype table.
fn read_rib_prefix(
    data: &mut Bytes,
    subtype: TableDumpV2Type,
) -> Result<(AddressFamily, Prefix), ParserError> {
    let family = if subtype.is_generic() {
        let afi = data.read_afi()?;
        let safi = data.read_safi()?;
        AddressFamily::resolve(afi, Some(safi)).ok_or_else(|| {
            ParserError::ParseError(format!("unrecognized afi/safi pair {afi:?}/{safi:?}"))
        })?
    } else {
        match subtype {
            TableDumpV2Type::RibIpv4Unicast
            | TableDumpV2Type::RibIpv4Multicast
            | TableDumpV2Type::RibIpv4UnicastAddPath
            | TableDumpV2Type::RibIpv4MulticastAddPath => AddressFamily::Inet,
            TableDumpV2Type::RibIpv6Unicast
            | TableDumpV2Type::RibIpv6Multicast
            | TableDumpV2Type::RibIpv6UnicastAddPath
            | TableDumpV2Type::RibIpv6MulticastAddPath => AddressFamily::Inet6,
            TableDumpV2Type::RibGeneric | TableDumpV2Type::RibGenericAddPath => {
                unreachable!("is_generic() already handled above")
            }
            TableDumpV2Type::PeerIndexTable => {
                return Err(ParserError::ParseError(
                    "peer-index subtype passed to RIB decoder".into(),
                ))
            }
        }
    };
    let prefix = data.read_nlri_prefix(family)?;
    Ok((family, prefix))
}

/// Decodes a TABLE_DUMP_V2 RIB record of any subtype. TABLE_DUMP_V2
/// attributes are always written in 4-byte-AS form on the wire regardless of
/// the peer's own AS-size flag, so `as4` is always `true` here.
pub fn decode_rib(mut data: Bytes, subtype: TableDumpV2Type) -> Result<RibRecord, ParserError> {
    let seqnum = data.read_u32()?;
    let (family, prefix) = read_rib_prefix(&mut data, subtype)?;
    let add_path = subtype.is_add_path();

    let entry_count = data.read_u16()?;
    let mut entries = Vec::with_capacity(entry_count as usize);
    for _ in 0..entry_count {
        let peer_idx = data.read_u16()?;
        let originated = data.read_u32()?;
        let path_id = if add_path { data.read_u32()? } else { 0 };
        let attr_len = data.read_u16()? as usize;
        let attrs = data.read_n(attr_len)?;

        let mut entry = RibEntry::empty(peer_idx);
        entry.originated = originated;
        entry.path_id = path_id;
        decode_attributes(attrs, family, true, &mut entry)?;
        entries.push(entry);
    }

    Ok(RibRecord {
        seqnum,
        prefix,
        add_path,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Asn};
    use std::net::Ipv4Addr;

    fn peer_index_bytes() -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&1u32.to_be_bytes()); // collector_bgp_id
        v.extend_from_slice(&0u16.to_be_bytes()); // view_len
        v.extend_from_slice(&2u16.to_be_bytes()); // peer_count
        // peer 0: ipv4, 2-byte asn
        v.push(0);
        v.extend_from_slice(&10u32.to_be_bytes());
        v.extend_from_slice(&[192, 0, 2, 1]);
        v.extend_from_slice(&64500u16.to_be_bytes());
        // peer 1: ipv4, 4-byte asn
        v.push(0b10);
        v.extend_from_slice(&11u32.to_be_bytes());
        v.extend_from_slice(&[192, 0, 2, 2]);
        v.extend_from_slice(&4_200_000_000u32.to_be_bytes());
        v
    }

    #[test]
    fn decodes_two_peer_index_table() {
        let table = decode_peer_index(Bytes::from(peer_index_bytes())).unwrap();
        assert_eq!(table.collector_bgp_id, 1);
        assert_eq!(table.peers.len(), 2);
        assert_eq!(table.peers[1].asnum, Asn::new_32bit(4_200_000_000));
    }

    #[test]
    fn decodes_ipv4_unicast_addpath_rib() {
        let mut data = Vec::new();
        data.extend_from_slice(&7u32.to_be_bytes()); // seqnum
        data.push(24); // prefixlen
        data.extend_from_slice(&[198, 51, 100]); // 3 bytes for /24
        data.extend_from_slice(&1u16.to_be_bytes()); // entry_count
        data.extend_from_slice(&1u16.to_be_bytes()); // peer_idx
        data.extend_from_slice(&0u32.to_be_bytes()); // originated
        data.extend_from_slice(&42u32.to_be_bytes()); // path_id
        let attrs: Vec<u8> = {
            let mut a = Vec::new();
            a.extend_from_slice(&[0x40, 1, 1, 0]); // ORIGIN = 0
            // AS_PATH, already in 4-byte-AS wire form: TABLE_DUMP_V2 always
            // writes attributes as4, so the decoder copies this verbatim.
            let seg = [2u8, 2, 0, 0, 0xFB, 0xF4, 0, 0, 0xFB, 0xF5];
            a.push(0x40);
            a.push(2);
            a.push(seg.len() as u8);
            a.extend_from_slice(&seg);
            a
        };
        data.extend_from_slice(&(attrs.len() as u16).to_be_bytes());
        data.extend_from_slice(&attrs);

        let record = decode_rib(Bytes::from(data), TableDumpV2Type::RibIpv4UnicastAddPath).unwrap();
        assert_eq!(record.seqnum, 7);
        assert_eq!(
            record.prefix,
            Prefix::new(Address::V4(Ipv4Addr::new(198, 51, 100, 0)), 24)
        );
        assert!(record.add_path);
        assert_eq!(record.entries[0].path_id, 42);
        assert_eq!(
            &record.entries[0].aspath[..],
            &[2, 2, 0, 0, 0xFB, 0xF4, 0, 0, 0xFB, 0xF5]
        );
    }
}
