use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;
use url::{Host, Url};

/// Returned for every link that is rejected. Renders as a harmless same-page anchor.
pub const REJECTED_LINK: &str = "#";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid IPv4 CIDR block '{0}'")]
pub struct InvalidCidr(pub String);

/// Ipv4Block
///
/// An IPv4 network in CIDR form, e.g. `172.16.0.0/12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Block {
    network: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Block {
    pub const fn new(network: Ipv4Addr, prefix: u8) -> Self {
        Self { network, prefix }
    }

    fn mask(&self) -> u32 {
        match self.prefix {
            0 => 0,
            p => u32::MAX << (32 - u32::from(p.min(32))),
        }
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let mask = self.mask();
        u32::from(ip) & mask == u32::from(self.network) & mask
    }
}

impl std::str::FromStr for Ipv4Block {
    type Err = InvalidCidr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || InvalidCidr(s.to_string());
        let (addr, prefix) = s.split_once('/').ok_or_else(invalid)?;
        let network: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        if prefix > 32 {
            return Err(invalid());
        }
        Ok(Self { network, prefix })
    }
}

impl std::fmt::Display for Ipv4Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

/// PrivateNetworkPolicy
///
/// The set of IPv4 ranges a link may not point into. Defaults to the RFC 1918 blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateNetworkPolicy {
    blocks: Vec<Ipv4Block>,
}

impl Default for PrivateNetworkPolicy {
    fn default() -> Self {
        Self {
            blocks: vec![
                Ipv4Block::new(Ipv4Addr::new(10, 0, 0, 0), 8),
                Ipv4Block::new(Ipv4Addr::new(172, 16, 0, 0), 12),
                Ipv4Block::new(Ipv4Addr::new(192, 168, 0, 0), 16),
            ],
        }
    }
}

impl PrivateNetworkPolicy {
    pub fn new(blocks: Vec<Ipv4Block>) -> Self {
        Self { blocks }
    }

    /// Parses a comma-separated list such as `"10.0.0.0/8, 192.168.0.0/16"`.
    /// Empty entries are skipped; an empty list yields a policy with no ranges.
    pub fn parse(list: &str) -> Result<Self, InvalidCidr> {
        let blocks = list
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[Ipv4Block] {
        &self.blocks
    }

    pub fn is_private(&self, ip: Ipv4Addr) -> bool {
        self.blocks.iter().any(|b| b.contains(ip))
    }
}

impl std::fmt::Display for PrivateNetworkPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let blocks: Vec<String> = self.blocks.iter().map(ToString::to_string).collect();
        f.write_str(&blocks.join(","))
    }
}

/// LinkSterilizer
///
/// Screens operator-entered navigation links before they are persisted and rendered.
///
/// Rules, first match wins:
/// 1. blank input is rejected;
/// 2. anything that is not an absolute http(s) URL is accepted only as a root-relative
///    path: `/` itself, or `/x...` where `x` is neither `/` nor `\`;
/// 3. absolute URLs pointing at a loopback host or into a private IPv4 range are
///    rejected, all others are returned untouched.
///
/// Rejections yield `REJECTED_LINK`; the function never fails.
#[derive(Debug, Clone, Default)]
pub struct LinkSterilizer {
    policy: PrivateNetworkPolicy,
}

impl LinkSterilizer {
    pub fn new(policy: PrivateNetworkPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PrivateNetworkPolicy {
        &self.policy
    }

    pub fn sterilize(&self, raw_url: &str) -> String {
        if raw_url.trim().is_empty() {
            return REJECTED_LINK.to_string();
        }

        let Some(url) = parse_web_url(raw_url) else {
            if is_root_relative(raw_url) {
                return raw_url.to_string();
            }
            tracing::debug!("rejected link '{}': not a URL or root-relative path", raw_url);
            return REJECTED_LINK.to_string();
        };

        if let Some(reason) = self.unsafe_host(&url) {
            tracing::debug!("rejected link '{}': {}", raw_url, reason);
            return REJECTED_LINK.to_string();
        }

        raw_url.to_string()
    }

    fn unsafe_host(&self, url: &Url) -> Option<&'static str> {
        let ip = match url.host()? {
            Host::Domain(domain) => {
                if domain.trim_end_matches('.').eq_ignore_ascii_case("localhost") {
                    return Some("loopback host");
                }
                return None;
            }
            Host::Ipv4(v4) => IpAddr::V4(v4),
            // IPv4-mapped IPv6 addresses are judged as the IPv4 address they carry.
            Host::Ipv6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => IpAddr::V4(v4),
                None => IpAddr::V6(v6),
            },
        };

        if ip.is_loopback() {
            return Some("loopback address");
        }
        match ip {
            IpAddr::V4(v4) if self.policy.is_private(v4) => Some("private network address"),
            _ => None,
        }
    }
}

/// Sterilizes with the default RFC 1918 policy.
pub fn sterilize_link(raw_url: &str) -> String {
    LinkSterilizer::default().sterilize(raw_url)
}

// Only absolute http/https URLs count as URLs; `javascript:`, `data:` and friends do not.
fn parse_web_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

fn is_root_relative(raw: &str) -> bool {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some('/'), None) => true,
        (Some('/'), Some(second)) => second != '/' && second != '\\',
        _ => false,
    }
}
