use std::fmt::{Debug, Display, Formatter};
use std::net::{Ipv4Addr, Ipv6Addr};

/// A decoded address, tagged by the family it came from.
///
/// The VPN variants carry only the IPv4/IPv6 payload: the 8-byte
/// route-distinguisher/label-stack prefix that precedes them on the wire is
/// read and discarded by the primitive decoders rather than stored here (see
/// the design notes on VPN route-distinguisher handling).
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Address {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
    VpnV4(Ipv4Addr),
    VpnV6(Ipv6Addr),
}

impl Address {
    pub const fn is_ipv6(&self) -> bool {
        matches!(self, Address::V6(_) | Address::VpnV6(_))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::V4(addr) => write!(f, "{addr}"),
            Address::V6(addr) => write!(f, "{addr}"),
            Address::VpnV4(addr) => write!(f, "vpn:{addr}"),
            Address::VpnV6(addr) => write!(f, "vpn:{addr}"),
        }
    }
}
