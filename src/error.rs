/*!
error module defines the error types produced while decoding MRT records.
*/
use crate::models::{Afi, Bgp4MpType, BgpState, Safi, TableDumpV2Type};
use num_enum::TryFromPrimitiveError;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::{error::Error, fmt, io};

/// Errors produced by the decoder.
///
/// `Io` is process-fatal and terminates the decode loop (see the error
/// handling design notes). Every other variant is local to the record being
/// decoded: the record decoder returns it, the dispatcher drops the record,
/// and the stream continues.
#[derive(Debug)]
pub enum ParserError {
    /// I/O failure reading the underlying stream. Fatal.
    Io(io::Error),
    /// A declared length did not match the bytes actually available.
    TruncatedMsg(String),
    /// A field failed to decode for a reason other than truncation.
    ParseError(String),
    /// A record's (type, subtype) is recognized but not one this decoder
    /// implements. The dispatcher treats this as "skip silently", not a
    /// hard failure.
    UnsupportedMrtType { mrt_type: u16, subtype: u16 },
}

impl Error for ParserError {}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParserError::Io(e) => write!(f, "io error: {e}"),
            ParserError::TruncatedMsg(s) => write!(f, "truncated message: {s}"),
            ParserError::ParseError(s) => write!(f, "parse error: {s}"),
            ParserError::UnsupportedMrtType { mrt_type, subtype } => {
                write!(f, "unsupported MRT type {mrt_type}/{subtype}")
            }
        }
    }
}

impl From<io::Error> for ParserError {
    fn from(io_error: io::Error) -> Self {
        match io_error.kind() {
            ErrorKind::UnexpectedEof => {
                ParserError::TruncatedMsg("unexpected end of stream".into())
            }
            _ => ParserError::Io(io_error),
        }
    }
}

impl From<TryFromPrimitiveError<Bgp4MpType>> for ParserError {
    fn from(value: TryFromPrimitiveError<Bgp4MpType>) -> Self {
        ParserError::ParseError(format!("unrecognized bgp4mp subtype: {}", value.number))
    }
}

impl From<TryFromPrimitiveError<BgpState>> for ParserError {
    fn from(value: TryFromPrimitiveError<BgpState>) -> Self {
        ParserError::ParseError(format!("unrecognized bgp state: {}", value.number))
    }
}

impl From<TryFromPrimitiveError<TableDumpV2Type>> for ParserError {
    fn from(value: TryFromPrimitiveError<TableDumpV2Type>) -> Self {
        ParserError::ParseError(format!(
            "unrecognized table dump v2 subtype: {}",
            value.number
        ))
    }
}

impl From<TryFromPrimitiveError<Afi>> for ParserError {
    fn from(value: TryFromPrimitiveError<Afi>) -> Self {
        ParserError::ParseError(format!("unrecognized afi: {}", value.number))
    }
}

impl From<TryFromPrimitiveError<Safi>> for ParserError {
    fn from(value: TryFromPrimitiveError<Safi>) -> Self {
        ParserError::ParseError(format!("unrecognized safi: {}", value.number))
    }
}
