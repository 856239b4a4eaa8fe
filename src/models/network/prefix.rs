use crate::models::Address;
use std::fmt::{Debug, Display, Formatter};

/// A network prefix: an address plus the number of significant bits.
///
/// Wraps [`Address`] rather than a generic CIDR type so VPN-tagged prefixes
/// can be represented alongside plain v4/v6 ones.
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prefix {
    pub addr: Address,
    pub prefixlen: u8,
}

impl Prefix {
    pub const fn new(addr: Address, prefixlen: u8) -> Prefix {
        Prefix { addr, prefixlen }
    }
}

impl Debug for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefixlen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn displays_as_cidr() {
        let p = Prefix::new(Address::V4(Ipv4Addr::new(10, 0, 0, 0)), 8);
        assert_eq!(p.to_string(), "10.0.0.0/8");
    }
}
