//! # Address list model
//!
//! Turns the lines of an address list into an ordered [`AddressSet`].
//!
//! Each line is one [`AddressSpec`]:
//! * A single IPv4 or IPv6 address (`203.0.113.7`, `2001:db8::1`).
//! * An inclusive IPv4 range (`203.0.113.1-203.0.113.40`).
//! * An IPv4 CIDR block (`203.0.113.0/28`), network and broadcast included.
//!
//! Ranges and blocks are kept as `u32` bounds and only expanded while
//! iterating, so a `/8` costs the same memory as a single address.

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::InputError;

/// One parsed line of an address list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSpec {
    Single(IpAddr),
    /// Inclusive bounds, `start <= end`.
    Range { start: Ipv4Addr, end: Ipv4Addr },
    Cidr { network: Ipv4Addr, prefix: u8 },
}

impl AddressSpec {
    /// Number of addresses this entry expands to.
    pub fn address_count(&self) -> u64 {
        match self.bounds() {
            Some((start, end)) => u64::from(end) - u64::from(start) + 1,
            None => 1,
        }
    }

    /// Numeric bounds for ranges and blocks; `None` for a single address.
    fn bounds(&self) -> Option<(u32, u32)> {
        match *self {
            AddressSpec::Single(_) => None,
            AddressSpec::Range { start, end } => Some((start.into(), end.into())),
            AddressSpec::Cidr { network, prefix } => {
                let start = u32::from(network);
                let host_bits = 32 - u32::from(prefix);
                let span = if host_bits == 32 {
                    u32::MAX
                } else {
                    (1u32 << host_bits) - 1
                };
                Some((start, start | span))
            }
        }
    }

    /// Addresses of this entry in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = IpAddr> + '_ {
        let single = match *self {
            AddressSpec::Single(addr) => Some(addr),
            _ => None,
        };
        let range = self
            .bounds()
            .map(|(start, end)| (start..=end).map(|ip| IpAddr::V4(Ipv4Addr::from(ip))));
        single.into_iter().chain(range.into_iter().flatten())
    }
}

impl FromStr for AddressSpec {
    type Err = String;

    /// Parses a single trimmed line. The error is a human readable reason;
    /// [`expand`] wraps it with the line number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((start, end)) = range_halves(s) {
            return parse_range(start, end);
        }
        if let Some((network, prefix)) = s.split_once('/') {
            return parse_cidr(network.trim(), prefix.trim());
        }
        s.parse::<IpAddr>()
            .map(AddressSpec::Single)
            .map_err(|e| format!("invalid address '{s}': {e}"))
    }
}

/// Splits `a-b` when both sides are made of digits and dots only, so host
/// names with dashes are reported as bad addresses rather than bad ranges.
fn range_halves(line: &str) -> Option<(&str, &str)> {
    let (start, end) = line.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());
    let dotted = |part: &str| part.chars().all(|c| c.is_ascii_digit() || c == '.');
    (dotted(start) && dotted(end) && (start.contains('.') || end.contains('.')))
        .then_some((start, end))
}

fn parse_range(start: &str, end: &str) -> Result<AddressSpec, String> {
    let start_addr = start
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("invalid start address '{start}': {e}"))?;
    let end_addr = end
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("invalid end address '{end}': {e}"))?;

    if u32::from(start_addr) > u32::from(end_addr) {
        return Err(format!("start {start_addr} is above end {end_addr}"));
    }

    Ok(AddressSpec::Range {
        start: start_addr,
        end: end_addr,
    })
}

fn parse_cidr(network: &str, prefix: &str) -> Result<AddressSpec, String> {
    let addr = network
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("invalid network address '{network}': {e}"))?;
    let prefix = prefix
        .parse::<u8>()
        .map_err(|e| format!("invalid prefix '{prefix}': {e}"))?;
    if prefix > 32 {
        return Err(format!("prefix /{prefix} is longer than 32 bits"));
    }

    // Host bits are masked off rather than rejected.
    let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
    let network = Ipv4Addr::from(u32::from(addr) & mask);

    Ok(AddressSpec::Cidr { network, prefix })
}

/// Ordered collection of address specs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSet {
    specs: Vec<AddressSpec>,
}

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, spec: AddressSpec) {
        self.specs.push(spec);
    }

    /// Total number of addresses, counting duplicates across lines.
    pub fn len(&self) -> u64 {
        self.specs.iter().map(AddressSpec::address_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Every address, in input order across specs and ascending within one.
    pub fn iter(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.specs.iter().flat_map(AddressSpec::iter)
    }
}

/// Parses every line of an address list.
///
/// Blank lines and lines starting with `#` are skipped. The first malformed
/// line aborts with an error naming its 1-based line number.
pub fn expand<I, S>(lines: I) -> Result<AddressSet, InputError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = AddressSet::new();

    for (idx, raw) in lines.into_iter().enumerate() {
        let line = raw.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let spec = line.parse::<AddressSpec>().map_err(|reason| {
            let line_no = idx + 1;
            let line = line.to_string();
            if range_halves(&line).is_some() {
                InputError::MalformedRange {
                    line_no,
                    line,
                    reason,
                }
            } else {
                InputError::MalformedAddress {
                    line_no,
                    line,
                    reason,
                }
            }
        })?;
        set.push(spec);
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cidr_masks_host_bits() {
        let spec: AddressSpec = "10.0.0.5/30".parse().unwrap();
        assert_eq!(
            spec,
            AddressSpec::Cidr {
                network: Ipv4Addr::new(10, 0, 0, 4),
                prefix: 30
            }
        );
    }

    #[test]
    fn zero_prefix_covers_whole_space() {
        let spec: AddressSpec = "0.0.0.0/0".parse().unwrap();
        assert_eq!(spec.address_count(), 1u64 << 32);
        assert_eq!(spec.iter().next(), Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED)));
    }

    #[test]
    fn host_prefix_is_one_address() {
        let spec: AddressSpec = "192.0.2.9/32".parse().unwrap();
        assert_eq!(spec.iter().collect::<Vec<_>>(), vec!["192.0.2.9".parse::<IpAddr>().unwrap()]);
    }

    #[test]
    fn range_tolerates_spaces_around_dash() {
        let spec: AddressSpec = "192.0.2.1 - 192.0.2.3".parse().unwrap();
        assert_eq!(spec.address_count(), 3);
    }

    #[test]
    fn ipv6_literal_is_accepted() {
        let spec: AddressSpec = "2001:db8::1".parse().unwrap();
        assert!(matches!(spec, AddressSpec::Single(IpAddr::V6(_))));
    }

    #[test]
    fn dashed_host_name_is_not_a_range() {
        assert_eq!(range_halves("not-an-ip.example"), None);
        assert_eq!(range_halves("10.0.0.1 - 10.0.0.300"), Some(("10.0.0.1", "10.0.0.300")));
        assert_eq!(range_halves("10.0.0.1-"), Some(("10.0.0.1", "")));
    }

    #[test]
    fn prefix_too_long_is_rejected() {
        assert!("10.0.0.0/33".parse::<AddressSpec>().is_err());
    }
}
