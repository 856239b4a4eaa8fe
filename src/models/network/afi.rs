use num_enum::{IntoPrimitive, TryFromPrimitive};

/// AFI -- Address Family Identifier
///
/// <https://www.iana.org/assignments/address-family-numbers/address-family-numbers.xhtml>
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Afi {
    Ipv4 = 1,
    Ipv6 = 2,
}

/// SAFI -- Subsequent Address Family Identifier.
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Safi {
    Unicast = 1,
    Multicast = 2,
    Vpn = 128,
}

/// Internal address-family tag the decoder actually dispatches on, resolved
/// from an `(afi, safi)` pair. `safi` may be absent (`None`) for callers that
/// have no SAFI byte on the wire, such as BGP4MP state/message records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressFamily {
    Inet,
    Inet6,
    VpnIpv4,
    VpnIpv6,
}

impl AddressFamily {
    /// Resolves the `(afi, safi)` pair per the AFI/SAFI resolver table.
    /// `safi = None` stands in for the `-1` sentinel used by callers with no
    /// SAFI byte on the wire.
    pub fn resolve(afi: Afi, safi: Option<Safi>) -> Option<AddressFamily> {
        match (afi, safi) {
            (Afi::Ipv4, None | Some(Safi::Unicast) | Some(Safi::Multicast)) => {
                Some(AddressFamily::Inet)
            }
            (Afi::Ipv4, Some(Safi::Vpn)) => Some(AddressFamily::VpnIpv4),
            (Afi::Ipv6, None | Some(Safi::Unicast) | Some(Safi::Multicast)) => {
                Some(AddressFamily::Inet6)
            }
            (Afi::Ipv6, Some(Safi::Vpn)) => Some(AddressFamily::VpnIpv6),
        }
    }

    /// Size in bytes of the fixed-size address payload for this family,
    /// not counting any VPN route-distinguisher prefix.
    pub const fn addr_size(&self) -> usize {
        match self {
            AddressFamily::Inet | AddressFamily::VpnIpv4 => 4,
            AddressFamily::Inet6 | AddressFamily::VpnIpv6 => 16,
        }
    }

    pub const fn is_vpn(&self) -> bool {
        matches!(self, AddressFamily::VpnIpv4 | AddressFamily::VpnIpv6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_inet_family() {
        assert_eq!(
            AddressFamily::resolve(Afi::Ipv4, None),
            Some(AddressFamily::Inet)
        );
        assert_eq!(
            AddressFamily::resolve(Afi::Ipv4, Some(Safi::Unicast)),
            Some(AddressFamily::Inet)
        );
        assert_eq!(
            AddressFamily::resolve(Afi::Ipv6, Some(Safi::Multicast)),
            Some(AddressFamily::Inet6)
        );
    }

    #[test]
    fn resolves_vpn_family() {
        assert_eq!(
            AddressFamily::resolve(Afi::Ipv4, Some(Safi::Vpn)),
            Some(AddressFamily::VpnIpv4)
        );
        assert_eq!(
            AddressFamily::resolve(Afi::Ipv6, Some(Safi::Vpn)),
            Some(AddressFamily::VpnIpv6)
        );
    }
}
