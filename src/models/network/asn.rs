use std::fmt::{Debug, Display, Formatter};

/// Whether an AS number occupies 2 or 4 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsnLength {
    Bits16,
    Bits32,
}

impl AsnLength {
    pub const fn from_is_four_byte(four_byte: bool) -> Self {
        if four_byte {
            AsnLength::Bits32
        } else {
            AsnLength::Bits16
        }
    }

    pub const fn is_four_byte(&self) -> bool {
        matches!(self, AsnLength::Bits32)
    }

    pub const fn byte_len(&self) -> usize {
        match self {
            AsnLength::Bits16 => 2,
            AsnLength::Bits32 => 4,
        }
    }
}

/// Autonomous System Number, always stored in its 4-byte-wide form.
///
/// A 2-byte wire value is zero-extended on construction, matching the
/// AS-path inflater's behavior for legacy segments and the peer entry's
/// `asnum` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Asn(pub u32);

impl Asn {
    pub const fn new_16bit(asn: u16) -> Self {
        Asn(asn as u32)
    }

    pub const fn new_32bit(asn: u32) -> Self {
        Asn(asn)
    }
}

impl From<u32> for Asn {
    fn from(value: u32) -> Self {
        Asn(value)
    }
}

impl From<Asn> for u32 {
    fn from(value: Asn) -> Self {
        value.0
    }
}

impl Display for Asn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
