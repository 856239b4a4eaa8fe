//! BGP path-attribute TLV decoding: the seven attribute types this decoder
//! interprets, the legacy AS_PATH inflater, and the MP_REACH_NLRI ambiguity.

use crate::models::{Address, AddressFamily, AttrType, OpaqueAttribute, RibEntry};
use crate::parser::cursor::ReadExt;
use crate::ParserError;
use bytes::{Buf, Bytes};

/// Attribute count past which a record is rejected rather than accepted
/// with an ever-growing opaque attribute list (see §4.4's `nattrs` cap).
const MAX_ATTRS: usize = 255;

const FLAG_EXTLEN: u8 = 0b0001_0000;

/// Walks the path-attribute TLV blob `data`, populating `entry`'s
/// attribute-derived fields in place. `family` selects how MP_REACH_NLRI and
/// NEXT_HOP are interpreted; `as4` selects 2-byte vs. 4-byte AS_PATH/AS4_PATH
/// handling.
pub fn decode_attributes(
    mut data: Bytes,
    family: AddressFamily,
    as4: bool,
    entry: &mut RibEntry,
) -> Result<(), ParserError> {
    while data.has_remaining() {
        let flags = data.read_u8()?;
        let type_byte = data.read_u8()?;
        let attr_len = if flags & FLAG_EXTLEN != 0 {
            data.read_u16()? as usize
        } else {
            data.read_u8()? as usize
        };
        let header_len = if flags & FLAG_EXTLEN != 0 { 4 } else { 3 };
        let value = data.read_n(attr_len)?;

        match AttrType::try_from(type_byte) {
            Ok(AttrType::Origin) => {
                if value.len() != 1 {
                    return Err(ParserError::ParseError(format!(
                        "ORIGIN attribute length {} != 1",
                        value.len()
                    )));
                }
                entry.origin = Some(value[0]);
            }
            Ok(AttrType::AsPath) => {
                entry.aspath = if as4 {
                    value
                } else {
                    inflate_as_path(&value)?
                };
            }
            Ok(AttrType::NextHop) => {
                if value.len() != 4 {
                    return Err(ParserError::ParseError(format!(
                        "NEXT_HOP attribute length {} != 4",
                        value.len()
                    )));
                }
                if family == AddressFamily::Inet {
                    let octets: [u8; 4] = value[..].try_into().unwrap();
                    entry.nexthop = Some(Address::V4(octets.into()));
                }
                // Other families: MP_REACH is authoritative, NEXT_HOP is dropped.
            }
            Ok(AttrType::MultiExitDisc) => {
                if value.len() != 4 {
                    return Err(ParserError::ParseError(format!(
                        "MULTI_EXIT_DISC attribute length {} != 4",
                        value.len()
                    )));
                }
                entry.med = u32::from_be_bytes(value[..].try_into().unwrap());
            }
            Ok(AttrType::LocalPref) => {
                if value.len() != 4 {
                    return Err(ParserError::ParseError(format!(
                        "LOCAL_PREF attribute length {} != 4",
                        value.len()
                    )));
                }
                entry.local_pref = u32::from_be_bytes(value[..].try_into().unwrap());
            }
            Ok(AttrType::MpReachNlri) => {
                entry.nexthop = Some(decode_mp_reach_nexthop(&value, family)?);
            }
            Ok(AttrType::As4Path) => {
                if as4 {
                    push_opaque(entry, flags, type_byte, header_len, value)?;
                } else {
                    entry.aspath = value;
                }
            }
            Err(_) => {
                push_opaque(entry, flags, type_byte, header_len, value)?;
            }
        }
    }
    Ok(())
}

fn push_opaque(
    entry: &mut RibEntry,
    flags: u8,
    type_byte: u8,
    header_len: usize,
    value: Bytes,
) -> Result<(), ParserError> {
    if entry.attrs.len() >= MAX_ATTRS {
        return Err(ParserError::ParseError(format!(
            "attribute count exceeds {MAX_ATTRS}"
        )));
    }
    let mut raw = Vec::with_capacity(header_len + value.len());
    raw.push(flags);
    raw.push(type_byte);
    if header_len == 4 {
        raw.extend_from_slice(&(value.len() as u16).to_be_bytes());
    } else {
        raw.push(value.len() as u8);
    }
    raw.extend_from_slice(&value);
    entry.attrs.push(OpaqueAttribute {
        raw: Bytes::from(raw),
    });
    Ok(())
}

/// Resolves the MP_REACH_NLRI nexthop, handling the RFC-6396-abbreviated
/// vs. legacy-AFI/SAFI-prefixed ambiguity (§4.4). The body must carry at
/// least `family`'s required nexthop size; a shorter body is a hard error
/// and the whole record is dropped, matching `mrt_extract_attr`'s "goto
/// fail" on the same condition.
fn decode_mp_reach_nexthop(value: &[u8], family: AddressFamily) -> Result<Address, ParserError> {
    let attr_len = value.len();
    let body = if !value.is_empty() && value[0] as usize == attr_len.saturating_sub(1) {
        log::debug!("mp_reach_nlri: RFC 6396 abbreviated form detected");
        value
    } else {
        if attr_len < 3 {
            return Err(ParserError::TruncatedMsg(
                "MP_REACH_NLRI shorter than the legacy AFI/SAFI prefix".into(),
            ));
        }
        log::debug!("mp_reach_nlri: legacy AFI/SAFI-prefixed form detected");
        &value[3..]
    };

    if body.is_empty() {
        return Err(ParserError::TruncatedMsg(
            "MP_REACH_NLRI has no nexthop length byte".into(),
        ));
    }
    let nh_len = body[0] as usize;
    let rest = &body[1..];

    let skip = if family.is_vpn() { 8 } else { 0 };
    let size = family.addr_size();
    if rest.len() < skip + size || nh_len < skip + size {
        return Err(ParserError::TruncatedMsg(format!(
            "MP_REACH_NLRI nexthop too short for {family:?}: declared {nh_len}, needed {}",
            skip + size
        )));
    }
    let addr_bytes = &rest[skip..skip + size];
    let addr = match family {
        AddressFamily::Inet => Address::V4(<[u8; 4]>::try_from(addr_bytes).unwrap().into()),
        AddressFamily::Inet6 => Address::V6(<[u8; 16]>::try_from(addr_bytes).unwrap().into()),
        AddressFamily::VpnIpv4 => Address::VpnV4(<[u8; 4]>::try_from(addr_bytes).unwrap().into()),
        AddressFamily::VpnIpv6 => {
            Address::VpnV6(<[u8; 16]>::try_from(addr_bytes).unwrap().into())
        }
    };
    Ok(addr)
}

/// Inflates a legacy 2-byte-AS AS_PATH blob (segments of
/// `{seg_type: u8, seg_len: u8, asns: seg_len * u16}`) into its 4-byte-AS
/// wire form. Two passes: validate and size, then emit.
pub fn inflate_as_path(data: &[u8]) -> Result<Bytes, ParserError> {
    let mut pos = 0usize;
    let mut out_len = 0usize;
    while pos < data.len() {
        if pos + 2 > data.len() {
            return Err(ParserError::TruncatedMsg(
                "AS_PATH segment header truncated".into(),
            ));
        }
        let seg_len = data[pos + 1] as usize;
        let seg_bytes = 2 + 2 * seg_len;
        if pos + seg_bytes > data.len() {
            return Err(ParserError::TruncatedMsg(
                "AS_PATH segment overruns attribute".into(),
            ));
        }
        out_len += 2 + 4 * seg_len;
        pos += seg_bytes;
    }

    let mut out = Vec::with_capacity(out_len);
    pos = 0;
    while pos < data.len() {
        let seg_type = data[pos];
        let seg_len = data[pos + 1] as usize;
        out.push(seg_type);
        out.push(seg_len as u8);
        let mut asn_pos = pos + 2;
        for _ in 0..seg_len {
            let asn = u16::from_be_bytes([data[asn_pos], data[asn_pos + 1]]);
            out.extend_from_slice(&(asn as u32).to_be_bytes());
            asn_pos += 2;
        }
        pos = asn_pos;
    }
    Ok(Bytes::from(out))
}
