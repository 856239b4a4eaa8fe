//! A bounded byte cursor: every read checks remaining length before
//! advancing. This replaces the pervasive manual
//! `if (len < N) fail; memcpy; b += N; len -= N;` pattern and localizes the
//! consume-exactly invariant every record decoder depends on.

use crate::models::{Address, AddressFamily, Afi, Asn, AsnLength, Prefix, Safi};
use crate::ParserError;
use bytes::{Buf, Bytes};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Extension trait providing checked reads over anything that implements
/// [`bytes::Buf`]. `bytes::Buf`'s own `get_*` methods are already
/// big-endian, but they panic on underrun; every method here instead
/// returns a [`ParserError::TruncatedMsg`].
pub trait ReadExt: Buf {
    fn has_remaining_n(&self, n: usize) -> Result<(), ParserError> {
        if self.remaining() < n {
            Err(ParserError::TruncatedMsg(format!(
                "needed {n} bytes, {} remaining",
                self.remaining()
            )))
        } else {
            Ok(())
        }
    }

    fn read_u8(&mut self) -> Result<u8, ParserError> {
        self.has_remaining_n(1)?;
        Ok(self.get_u8())
    }

    fn read_u16(&mut self) -> Result<u16, ParserError> {
        self.has_remaining_n(2)?;
        Ok(self.get_u16())
    }

    fn read_u32(&mut self) -> Result<u32, ParserError> {
        self.has_remaining_n(4)?;
        Ok(self.get_u32())
    }

    fn read_n(&mut self, n: usize) -> Result<Bytes, ParserError>
    where
        Self: Sized,
    {
        self.has_remaining_n(n)?;
        Ok(self.copy_to_bytes(n))
    }

    fn skip_n(&mut self, n: usize) -> Result<(), ParserError> {
        self.has_remaining_n(n)?;
        self.advance(n);
        Ok(())
    }

    fn read_ipv4(&mut self) -> Result<Ipv4Addr, ParserError> {
        self.has_remaining_n(4)?;
        Ok(Ipv4Addr::from(self.get_u32()))
    }

    fn read_ipv6(&mut self) -> Result<Ipv6Addr, ParserError> {
        self.has_remaining_n(16)?;
        Ok(Ipv6Addr::from(self.get_u128()))
    }

    fn read_afi(&mut self) -> Result<Afi, ParserError> {
        Ok(Afi::try_from(self.read_u16()?)?)
    }

    fn read_safi(&mut self) -> Result<Safi, ParserError> {
        Ok(Safi::try_from(self.read_u8()?)?)
    }

    /// ASN read per the wire width; always returned zero-extended to 32
    /// bits.
    fn read_asn(&mut self, length: AsnLength) -> Result<Asn, ParserError> {
        match length {
            AsnLength::Bits32 => Ok(Asn::new_32bit(self.read_u32()?)),
            AsnLength::Bits16 => Ok(Asn::new_16bit(self.read_u16()?)),
        }
    }

    /// Reads a fixed-size address for `family`, skipping the 8-byte
    /// route-distinguisher/label-stack prefix on VPN families (see
    /// [`crate::models::Address`] for why the RD itself isn't stored).
    fn read_address(&mut self, family: AddressFamily) -> Result<Address, ParserError> {
        if family.is_vpn() {
            self.skip_n(8)?;
        }
        match family {
            AddressFamily::Inet => Ok(Address::V4(self.read_ipv4()?)),
            AddressFamily::Inet6 => Ok(Address::V6(self.read_ipv6()?)),
            AddressFamily::VpnIpv4 => Ok(Address::VpnV4(self.read_ipv4()?)),
            AddressFamily::VpnIpv6 => Ok(Address::VpnV6(self.read_ipv6()?)),
        }
    }

    /// Reads one NLRI-encoded prefix for `family`: a 1-byte bit-length
    /// followed by `ceil(bits / 8)` address bytes, zero-padded up to the
    /// family's full address width when read. VPN families additionally
    /// consume the 8-byte route-distinguisher prefix first, matching
    /// `extract_addr`'s VPN handling rather than counting the RD towards
    /// `bits`.
    fn read_nlri_prefix(&mut self, family: AddressFamily) -> Result<Prefix, ParserError>
    where
        Self: Sized,
    {
        if family.is_vpn() {
            self.skip_n(8)?;
        }
        let bits = self.read_u8()?;
        let max_bits = (family.addr_size() * 8) as u8;
        if bits > max_bits {
            return Err(ParserError::ParseError(format!(
                "nlri prefix length {bits} exceeds {max_bits}-bit address"
            )));
        }
        let byte_len = bits.div_ceil(8) as usize;
        let raw = self.read_n(byte_len)?;
        let mut buf = [0u8; 16];
        buf[..byte_len].copy_from_slice(&raw);
        let addr = match family {
            AddressFamily::Inet => Address::V4(Ipv4Addr::new(buf[0], buf[1], buf[2], buf[3])),
            AddressFamily::VpnIpv4 => Address::VpnV4(Ipv4Addr::new(buf[0], buf[1], buf[2], buf[3])),
            AddressFamily::Inet6 => Address::V6(Ipv6Addr::from(buf)),
            AddressFamily::VpnIpv6 => Address::VpnV6(Ipv6Addr::from(buf)),
        };
        Ok(Prefix::new(addr, bits))
    }
}

impl<T: Buf> ReadExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn rejects_short_reads() {
        let mut buf = Bytes::from_static(&[1, 2]);
        assert!(buf.read_u32().is_err());
    }

    #[test]
    fn reads_vpn_address_skipping_rd() {
        let mut data = vec![0xffu8; 8];
        data.extend_from_slice(&[10, 0, 0, 1]);
        let mut buf = Bytes::from(data);
        let addr = buf.read_address(AddressFamily::VpnIpv4).unwrap();
        assert_eq!(addr, Address::VpnV4(Ipv4Addr::new(10, 0, 0, 1)));
        assert!(!buf.has_remaining());
    }

    #[test]
    fn reads_nlri_prefix_with_partial_last_byte() {
        // 10.0.0.0/8: bit length 8, one address byte.
        let mut buf = Bytes::from_static(&[8, 10]);
        let prefix = buf.read_nlri_prefix(AddressFamily::Inet).unwrap();
        assert_eq!(prefix.addr, Address::V4(Ipv4Addr::new(10, 0, 0, 0)));
        assert_eq!(prefix.prefixlen, 8);
        assert!(!buf.has_remaining());
    }

    #[test]
    fn rejects_nlri_prefix_longer_than_address() {
        let mut buf = Bytes::from_static(&[33, 0, 0, 0, 0]);
        assert!(buf.read_nlri_prefix(AddressFamily::Inet).is_err());
    }
}
