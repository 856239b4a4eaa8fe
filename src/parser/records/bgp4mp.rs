//! BGP4MP state-change, message, and legacy-entry record decoding.

use crate::models::{
    AddressFamily, Asn, AsnLength, Bgp4MpType, BgpMessageEvent, BgpState, BgpStateEvent,
    PeerEntry, RibEntry, RibRecord, Timestamp,
};
use crate::parser::attributes::decode_attributes;
use crate::parser::cursor::ReadExt;
use crate::ParserError;
use bytes::Bytes;

fn family_from_afi(mut data: Bytes) -> Result<(Bytes, AddressFamily), ParserError> {
    let afi = data.read_afi()?;
    let family = AddressFamily::resolve(afi, None)
        .ok_or_else(|| ParserError::ParseError(format!("unrecognized afi {afi:?}")))?;
    Ok((data, family))
}

/// Decodes a BGP4MP(_ET) state-change record (subtype `StateChange` or
/// `StateChangeAs4`).
pub fn decode_state_change(
    mut data: Bytes,
    subtype: Bgp4MpType,
    time: Timestamp,
) -> Result<BgpStateEvent, ParserError> {
    let asn_len = AsnLength::from_is_four_byte(subtype.is_as4());
    let src_as = data.read_asn(asn_len)?;
    let dst_as = data.read_asn(asn_len)?;
    let _ifindex = data.read_u16()?;
    let (mut data, family) = family_from_afi(data)?;
    let src = data.read_address(family)?;
    let dst = data.read_address(family)?;
    let old_state = BgpState::try_from(data.read_u16()?)?;
    let new_state = BgpState::try_from(data.read_u16()?)?;

    Ok(BgpStateEvent {
        time,
        src_as,
        dst_as,
        src,
        dst,
        old_state,
        new_state,
    })
}

/// Decodes a BGP4MP(_ET) message record (any of the plain/LOCAL/ADDPATH
/// subtypes). The inner BGP PDU is never parsed; `msg` is the verbatim
/// remainder of the record.
pub fn decode_message(
    mut data: Bytes,
    subtype: Bgp4MpType,
    time: Timestamp,
) -> Result<BgpMessageEvent, ParserError> {
    let asn_len = AsnLength::from_is_four_byte(subtype.is_as4());
    let src_as = data.read_asn(asn_len)?;
    let dst_as = data.read_asn(asn_len)?;
    let _ifindex = data.read_u16()?;
    let (mut data, family) = family_from_afi(data)?;
    let src = data.read_address(family)?;
    let dst = data.read_address(family)?;

    Ok(BgpMessageEvent {
        time,
        src_as,
        dst_as,
        src,
        dst,
        add_path: subtype.is_addpath(),
        msg: data,
    })
}

/// Decodes a legacy BGP4MP_ENTRY record: a flattened single-entry RIB dump
/// carried directly on a BGP4MP(_ET) header, with a field layout distinct
/// from both v1 TABLE_DUMP and TABLE_DUMP_V2 — two separate AFI fields (one
/// for the peer's own address, one for the dumped route's family), a
/// declared nexthop length read ahead of the nexthop itself, and no view or
/// status fields carried into the decoded record.
pub fn decode_entry(mut data: Bytes) -> Result<(RibRecord, PeerEntry), ParserError> {
    let _src_as = data.read_u16()?;
    let dst_as = Asn::new_16bit(data.read_u16()?);
    let _ifindex = data.read_u16()?;

    let peer_afi = data.read_afi()?;
    let peer_family = AddressFamily::resolve(peer_afi, None)
        .ok_or_else(|| ParserError::ParseError(format!("unrecognized afi {peer_afi:?}")))?;
    let _src_addr = data.read_address(peer_family)?;
    let peer_addr = data.read_address(peer_family)?;

    let _view = data.read_u16()?;
    let _status = data.read_u16()?;
    let originated = data.read_u32()?;

    let afi = data.read_afi()?;
    let safi = data.read_safi()?;
    let family = AddressFamily::resolve(afi, Some(safi)).ok_or_else(|| {
        ParserError::ParseError(format!("unrecognized afi/safi pair {afi:?}/{safi:?}"))
    })?;

    let nhlen = data.read_u8()? as usize;
    let required = family.addr_size() + if family.is_vpn() { 8 } else { 0 };
    if nhlen < required {
        return Err(ParserError::TruncatedMsg(format!(
            "nexthop length {nhlen} shorter than {required} bytes required for {family:?}"
        )));
    }
    let nexthop = data.read_address(family)?;
    data.skip_n(nhlen - required)?;

    let prefix = data.read_nlri_prefix(family)?;

    let attr_len = data.read_u16()? as usize;
    let attrs = data.read_n(attr_len)?;

    let peer = PeerEntry {
        bgp_id: 0,
        addr: peer_addr,
        asnum: dst_as,
    };

    let mut entry = RibEntry::empty(0);
    entry.originated = originated;
    entry.nexthop = Some(nexthop);
    decode_attributes(attrs, family, false, &mut entry)?;

    Ok((
        RibRecord {
            seqnum: 0,
            prefix,
            add_path: false,
            entries: vec![entry],
        },
        peer,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Asn, Prefix};
    use std::net::Ipv4Addr;

    #[test]
    fn decodes_as4_state_change() {
        let mut data = Vec::new();
        data.extend_from_slice(&4_200_000_000u32.to_be_bytes()); // src_as
        data.extend_from_slice(&65000u32.to_be_bytes()); // dst_as
        data.extend_from_slice(&0u16.to_be_bytes()); // ifindex
        data.extend_from_slice(&1u16.to_be_bytes()); // afi = ipv4
        data.extend_from_slice(&[203, 0, 113, 1]); // src
        data.extend_from_slice(&[203, 0, 113, 2]); // dst
        data.extend_from_slice(&3u16.to_be_bytes()); // old_state = Active
        data.extend_from_slice(&4u16.to_be_bytes()); // new_state = OpenSent

        let event = decode_state_change(
            Bytes::from(data),
            Bgp4MpType::StateChangeAs4,
            Timestamp::default(),
        )
        .unwrap();
        assert_eq!(event.src_as, Asn::new_32bit(4_200_000_000));
        assert_eq!(event.dst_as, Asn::new_32bit(65000));
        assert_eq!(event.src, Address::V4(Ipv4Addr::new(203, 0, 113, 1)));
        assert_eq!(event.old_state, BgpState::Active);
        assert_eq!(event.new_state, BgpState::OpenSent);
    }

    #[test]
    fn decodes_legacy_entry_record() {
        let mut data = Vec::new();
        data.extend_from_slice(&65001u16.to_be_bytes()); // src_as
        data.extend_from_slice(&65002u16.to_be_bytes()); // dst_as -> peer asnum
        data.extend_from_slice(&0u16.to_be_bytes()); // ifindex
        data.extend_from_slice(&1u16.to_be_bytes()); // peer afi = ipv4
        data.extend_from_slice(&[192, 0, 2, 10]); // src addr (discarded)
        data.extend_from_slice(&[192, 0, 2, 20]); // dst addr -> peer addr
        data.extend_from_slice(&0u16.to_be_bytes()); // view
        data.extend_from_slice(&1u16.to_be_bytes()); // status
        data.extend_from_slice(&0x6000_0000u32.to_be_bytes()); // originated
        data.extend_from_slice(&1u16.to_be_bytes()); // afi = ipv4 (nlri/nexthop family)
        data.push(1); // safi = unicast
        data.push(4); // nhlen
        data.extend_from_slice(&[198, 51, 100, 1]); // nexthop
        data.push(24); // prefixlen
        data.extend_from_slice(&[203, 0, 113]); // prefix bytes for /24
        let attrs = [0x40u8, 1, 1, 0]; // ORIGIN = 0
        data.extend_from_slice(&(attrs.len() as u16).to_be_bytes());
        data.extend_from_slice(&attrs);

        let (record, peer) = decode_entry(Bytes::from(data)).unwrap();
        assert_eq!(
            record.prefix,
            Prefix::new(Address::V4(Ipv4Addr::new(203, 0, 113, 0)), 24)
        );
        assert_eq!(record.entries.len(), 1);
        assert_eq!(record.entries[0].originated, 0x6000_0000);
        assert_eq!(
            record.entries[0].nexthop,
            Some(Address::V4(Ipv4Addr::new(198, 51, 100, 1)))
        );
        assert_eq!(record.entries[0].origin, Some(0));
        assert_eq!(peer.addr, Address::V4(Ipv4Addr::new(192, 0, 2, 20)));
        assert_eq!(peer.asnum, Asn::new_16bit(65002));
    }

    #[test]
    fn decodes_message_event_preserving_raw_bytes() {
        let mut data = Vec::new();
        data.extend_from_slice(&65001u16.to_be_bytes());
        data.extend_from_slice(&65002u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&1u16.to_be_bytes());
        data.extend_from_slice(&[192, 0, 2, 10]);
        data.extend_from_slice(&[192, 0, 2, 20]);
        data.extend_from_slice(&[0xFF, 0xFF, 0x13]); // fake raw BGP message bytes

        let event = decode_message(
            Bytes::from(data),
            Bgp4MpType::Message,
            Timestamp::default(),
        )
        .unwrap();
        assert!(!event.add_path);
        assert_eq!(&event.msg[..], &[0xFF, 0xFF, 0x13]);
    }
}
