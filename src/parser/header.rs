//! MRT common header parsing.

use crate::ParserError;
use std::io::Read;
use zerocopy::byteorder::big_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Wire layout of the 12-byte common header, before any `_ET` microseconds
/// field (RFC 6396 section 2).
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct RawCommonHeader {
    timestamp: U32,
    mrt_type: U16,
    subtype: U16,
    length: U32,
}

const _: () = assert!(core::mem::size_of::<RawCommonHeader>() == 12);

const HEADER_LEN: usize = core::mem::size_of::<RawCommonHeader>();

// The three `_ET` wire type codes (RFC 6396 section 3), checked against the
// raw type field before it is resolved to an `EntryType`, so an unrecognized
// type can still be routed through the common `_ET`-unwrapping logic below.
const BGP4MP_ET: u16 = 17;
const ISIS_ET: u16 = 33;
const OSPFV3_ET: u16 = 49;

/// The common header's fields, before `mrt_type` has been checked against
/// the closed [`EntryType`](crate::models::EntryType) enum. Resolving that
/// enum can fail for wire type codes this decoder doesn't know about; that
/// failure must not prevent the record's payload from being consumed, so it
/// is left to the caller rather than attempted here.
pub struct RawHeader {
    pub timestamp: u32,
    pub microsecond_timestamp: Option<u32>,
    pub mrt_type: u16,
    pub entry_subtype: u16,
    pub length: u32,
}

/// Reads one [`RawHeader`] plus its declared-length payload from `reader`.
///
/// Returns `Ok(None)` on a clean end-of-stream (zero bytes read where a new
/// header was expected); any other short read is a [`ParserError::Io`].
/// `_ET` types are unwrapped here based on the raw type code alone: the
/// leading microseconds field is consumed and folded into
/// `microsecond_timestamp`, and `length` is adjusted to describe only the
/// logical payload that follows it. The payload is always fully read,
/// whether or not `mrt_type` turns out to name a recognized entry type.
pub fn read_record(
    reader: &mut impl Read,
) -> Result<Option<(RawHeader, bytes::Bytes)>, ParserError> {
    let mut header_buf = [0u8; HEADER_LEN];
    if !read_fully_or_eof(reader, &mut header_buf)? {
        return Ok(None);
    }

    let raw = RawCommonHeader::ref_from_bytes(&header_buf)
        .expect("header_buf is exactly sized for RawCommonHeader");
    let timestamp = raw.timestamp.get();
    let mrt_type = raw.mrt_type.get();
    let entry_subtype = raw.subtype.get();
    let mut length = raw.length.get();

    let is_et = matches!(mrt_type, BGP4MP_ET | ISIS_ET | OSPFV3_ET);

    let microsecond_timestamp = if is_et {
        if length < 4 {
            return Err(ParserError::TruncatedMsg(format!(
                "_ET record length {length} shorter than the microseconds field"
            )));
        }
        let mut micros_buf = [0u8; 4];
        read_exact(reader, &mut micros_buf)?;
        length -= 4;
        Some(u32::from_be_bytes(micros_buf))
    } else {
        None
    };

    let mut payload = vec![0u8; length as usize];
    read_exact(reader, &mut payload)?;

    Ok(Some((
        RawHeader {
            timestamp,
            microsecond_timestamp,
            mrt_type,
            entry_subtype,
            length,
        },
        bytes::Bytes::from(payload),
    )))
}

fn read_exact(reader: &mut impl Read, buf: &mut [u8]) -> Result<(), ParserError> {
    reader.read_exact(buf).map_err(ParserError::from)
}

/// Like `Read::read_exact`, but a zero-byte read before any byte has been
/// consumed is reported as a clean end-of-stream (`Ok(false)`) instead of an
/// `UnexpectedEof` error.
fn read_fully_or_eof(reader: &mut impl Read, buf: &mut [u8]) -> Result<bool, ParserError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(ParserError::TruncatedMsg(
                    "stream ended mid-header".into(),
                ))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ParserError::from(e)),
        }
    }
    Ok(true)
}
