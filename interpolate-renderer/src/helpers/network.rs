//! CIDR address arithmetic.
//!
//! Addresses are handled as `u128` bit patterns with an explicit width (32
//! for IPv4, 128 for IPv6) so block boundaries are computed, never guessed
//! from strings.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use minijinja::Error;

use super::{Helper, HelperKind};
use crate::error::HelperError;

/// A parsed network: base address with host bits cleared, plus prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    base: u128,
    prefix_len: u8,
    v6: bool,
}

impl Network {
    /// Parse `a.b.c.d/n` or `x:y::z/n`. Host bits in the address are masked
    /// off, so `10.0.0.7/24` is the network `10.0.0.0/24`.
    pub fn parse(input: &str) -> Result<Self, HelperError> {
        let invalid = |reason: &str| HelperError::InvalidCidr {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (addr, prefix) = input
            .split_once('/')
            .ok_or_else(|| invalid("missing prefix length"))?;
        let addr: IpAddr = addr.parse().map_err(|_| invalid("invalid address"))?;
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("invalid prefix length"));
        }
        let prefix_len: u8 = prefix
            .parse()
            .map_err(|_| invalid("invalid prefix length"))?;

        let (bits, v6) = match addr {
            IpAddr::V4(v4) => (u128::from(u32::from(v4)), false),
            IpAddr::V6(v6) => (u128::from(v6), true),
        };
        let network = Network {
            base: 0,
            prefix_len,
            v6,
        };
        if u32::from(prefix_len) > network.width() {
            return Err(invalid("prefix length exceeds address length"));
        }
        Ok(Network {
            base: bits & network.mask(),
            ..network
        })
    }

    fn width(&self) -> u32 {
        if self.v6 {
            128
        } else {
            32
        }
    }

    fn host_bits(&self) -> u32 {
        self.width() - u32::from(self.prefix_len)
    }

    /// All-ones over the host part of the address.
    fn host_mask(&self) -> u128 {
        match self.host_bits() {
            0 => 0,
            128 => u128::MAX,
            n => (1u128 << n) - 1,
        }
    }

    /// All-ones over the network part, confined to the address width.
    fn mask(&self) -> u128 {
        let width_mask = if self.v6 { u128::MAX } else { u128::from(u32::MAX) };
        width_mask & !self.host_mask()
    }

    fn addr(&self, bits: u128) -> IpAddr {
        if self.v6 {
            IpAddr::V6(Ipv6Addr::from(bits))
        } else {
            // Confined to 32 bits by `mask`/`host_mask`.
            IpAddr::V4(Ipv4Addr::from(bits as u32))
        }
    }

    /// Address `hostnum` positions into the block. Negative numbers count
    /// back from the end: `-1` is the last address of the block.
    pub fn host(&self, hostnum: i64) -> Result<IpAddr, HelperError> {
        let max = self.host_mask();
        let out_of_range = || HelperError::HostOutOfRange {
            prefix_len: self.prefix_len,
            host: hostnum,
        };

        let offset = if hostnum >= 0 {
            u128::from(hostnum.unsigned_abs())
        } else {
            let back = u128::from(hostnum.unsigned_abs()) - 1;
            if back > max {
                return Err(out_of_range());
            }
            max - back
        };
        if offset > max {
            return Err(out_of_range());
        }
        Ok(self.addr(self.base | offset))
    }

    /// Dotted-quad netmask; IPv4 only.
    pub fn netmask(&self) -> Result<Ipv4Addr, HelperError> {
        if self.v6 {
            return Err(HelperError::invalid(
                "cidrnetmask",
                "only IPv4 prefixes have a dotted netmask",
            ));
        }
        Ok(Ipv4Addr::from(self.mask() as u32))
    }

    /// The `netnum`-th subnet after extending the prefix by `newbits`.
    pub fn subnet(&self, newbits: i64, netnum: i64) -> Result<Network, HelperError> {
        let out_of_range = || HelperError::SubnetOutOfRange {
            network: self.to_string(),
            newbits,
            netnum,
        };

        if newbits < 0 || netnum < 0 {
            return Err(out_of_range());
        }
        let new_prefix = i64::from(self.prefix_len) + newbits;
        if new_prefix > i64::from(self.width()) {
            return Err(out_of_range());
        }
        // netnum is at most 2^63 - 1, so any newbits >= 63 fits it.
        if newbits < 63 && netnum >= (1i64 << newbits) {
            return Err(out_of_range());
        }

        let new_prefix = new_prefix as u8;
        let shift = self.width() - u32::from(new_prefix);
        let offset = (netnum as u128).checked_shl(shift).unwrap_or(0);
        Ok(Network {
            base: self.base | offset,
            prefix_len: new_prefix,
            v6: self.v6,
        })
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr(self.base), self.prefix_len)
    }
}

/// `cidrhost(prefix, hostnum)` as a plain Rust call.
pub fn cidrhost(prefix: &str, hostnum: i64) -> Result<IpAddr, HelperError> {
    Network::parse(prefix)?.host(hostnum)
}

// ---------------------------------------------------------------------------
// Template bindings
// ---------------------------------------------------------------------------

fn cidrhost_fn(prefix: String, hostnum: i64) -> Result<String, Error> {
    Ok(cidrhost(&prefix, hostnum)?.to_string())
}

fn cidrnetmask_fn(prefix: String) -> Result<String, Error> {
    Ok(Network::parse(&prefix)?.netmask()?.to_string())
}

fn cidrsubnet_fn(prefix: String, newbits: i64, netnum: i64) -> Result<String, Error> {
    Ok(Network::parse(&prefix)?.subnet(newbits, netnum)?.to_string())
}

pub(super) fn helpers() -> Vec<Helper> {
    vec![
        Helper::new(
            "cidrhost",
            HelperKind::Function,
            "cidrhost(prefix, hostnum): address of host number hostnum within prefix",
            |env, name| env.add_function(name, cidrhost_fn),
        ),
        Helper::new(
            "cidrnetmask",
            HelperKind::Function,
            "cidrnetmask(prefix): dotted netmask of an IPv4 prefix",
            |env, name| env.add_function(name, cidrnetmask_fn),
        ),
        Helper::new(
            "cidrsubnet",
            HelperKind::Function,
            "cidrsubnet(prefix, newbits, netnum): subnet netnum of prefix extended by newbits",
            |env, name| env.add_function(name, cidrsubnet_fn),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10.0.0.0/24", 5, "10.0.0.5")]
    #[case("10.0.0.0/24", 0, "10.0.0.0")]
    #[case("10.0.0.0/24", 255, "10.0.0.255")]
    #[case("10.0.0.0/24", -1, "10.0.0.255")]
    #[case("10.0.0.0/24", -256, "10.0.0.0")]
    #[case("10.0.0.7/24", 5, "10.0.0.5")]
    #[case("192.168.4.0/30", 3, "192.168.4.3")]
    #[case("10.1.2.3/32", 0, "10.1.2.3")]
    #[case("0.0.0.0/0", 16909060, "1.2.3.4")]
    #[case("fd00::/64", 5, "fd00::5")]
    #[case("fd00::/64", -1, "fd00::ffff:ffff:ffff:ffff")]
    #[case("::/0", 1, "::1")]
    fn host_addresses(#[case] prefix: &str, #[case] hostnum: i64, #[case] expected: &str) {
        assert_eq!(cidrhost(prefix, hostnum).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case("10.0.0.0/30", 4)]
    #[case("10.0.0.0/30", 100)]
    #[case("10.0.0.0/30", -5)]
    #[case("10.0.0.1/32", 1)]
    #[case("10.0.0.1/32", -2)]
    fn hosts_outside_the_block_are_range_errors(#[case] prefix: &str, #[case] hostnum: i64) {
        let err = cidrhost(prefix, hostnum).unwrap_err();
        assert!(err.is_range(), "got {err:?}");
    }

    #[test]
    fn range_error_message_names_prefix_and_host() {
        let err = cidrhost("10.0.0.0/30", 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "prefix of 30 does not accommodate a host numbered 4"
        );
    }

    #[rstest]
    #[case("10.0.0.0")]
    #[case("10.0.0.0/")]
    #[case("10.0.0.0/33")]
    #[case("10.0.0.0/-1")]
    #[case("10.0.0.256/24")]
    #[case("not-an-ip/8")]
    #[case("fd00::/129")]
    #[case("")]
    fn malformed_notation_is_invalid_cidr(#[case] prefix: &str) {
        let err = cidrhost(prefix, 1).unwrap_err();
        assert!(
            matches!(err, HelperError::InvalidCidr { .. }),
            "{prefix}: got {err:?}"
        );
    }

    #[test]
    fn netmask_of_ipv4_prefixes() {
        let mask = |p: &str| Network::parse(p).unwrap().netmask().unwrap().to_string();
        assert_eq!(mask("10.0.0.0/8"), "255.0.0.0");
        assert_eq!(mask("172.16.0.0/12"), "255.240.0.0");
        assert_eq!(mask("10.0.0.0/32"), "255.255.255.255");
        assert_eq!(mask("0.0.0.0/0"), "0.0.0.0");
        assert!(Network::parse("fd00::/64").unwrap().netmask().is_err());
    }

    #[rstest]
    #[case("10.0.0.0/16", 8, 2, "10.0.2.0/24")]
    #[case("10.0.0.0/16", 4, 15, "10.0.240.0/20")]
    #[case("10.0.0.0/8", 0, 0, "10.0.0.0/8")]
    #[case("fd00::/48", 16, 1, "fd00:0:0:1::/64")]
    fn subnets(
        #[case] prefix: &str,
        #[case] newbits: i64,
        #[case] netnum: i64,
        #[case] expected: &str,
    ) {
        let subnet = Network::parse(prefix).unwrap().subnet(newbits, netnum).unwrap();
        assert_eq!(subnet.to_string(), expected);
    }

    #[rstest]
    #[case("10.0.0.0/16", 8, 256)]
    #[case("10.0.0.0/30", 3, 0)]
    #[case("10.0.0.0/16", -1, 0)]
    #[case("10.0.0.0/16", 2, -1)]
    fn subnets_out_of_range(#[case] prefix: &str, #[case] newbits: i64, #[case] netnum: i64) {
        let err = Network::parse(prefix)
            .unwrap()
            .subnet(newbits, netnum)
            .unwrap_err();
        assert!(err.is_range(), "got {err:?}");
    }
}
