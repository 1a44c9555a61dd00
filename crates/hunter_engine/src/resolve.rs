//! How a probe reaches the candidate address while presenting the domain.
//!
//! [`ResolutionStrategy::HostHeader`] puts the address in the URL and the
//! domain in the `Host` header. [`ResolutionStrategy::DnsOverride`] puts the
//! domain in the URL (so TLS sends the right server name) and installs an
//! [`OverrideMap`] as the client's DNS resolver.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use hunter_core::Scheme;
use hunter_logging::hunter_trace;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionStrategy {
    HostHeader,
    #[default]
    DnsOverride,
}

/// Ports used per scheme; defaults are the conventional 80 and 443.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ports {
    pub http: u16,
    pub https: u16,
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            http: 80,
            https: 443,
        }
    }
}

impl Ports {
    pub fn for_scheme(&self, scheme: Scheme) -> u16 {
        match scheme {
            Scheme::Http => self.http,
            Scheme::Https => self.https,
        }
    }
}

impl ResolutionStrategy {
    /// Request URL for one probe.
    pub fn target_url(
        self,
        scheme: Scheme,
        address: IpAddr,
        domain: &str,
        ports: &Ports,
    ) -> Result<Url, url::ParseError> {
        let host = match self {
            ResolutionStrategy::HostHeader => match address {
                IpAddr::V4(v4) => v4.to_string(),
                IpAddr::V6(v6) => format!("[{v6}]"),
            },
            ResolutionStrategy::DnsOverride => domain.to_string(),
        };

        let mut url = Url::parse(&format!("{scheme}://{host}/"))?;
        // `set_port` drops the port again when it is the scheme default.
        url.set_port(Some(ports.for_scheme(scheme)))
            .map_err(|()| url::ParseError::InvalidPort)?;
        Ok(url)
    }

    /// Whether the domain has to travel in an explicit `Host` header.
    pub fn sends_host_header(self) -> bool {
        self == ResolutionStrategy::HostHeader
    }
}

/// Outcome of looking a host name up through an [`OverrideMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Override(IpAddr),
    /// Not overridden: the system resolver decides.
    System,
}

/// Domain -> address pins for every probe of one candidate address.
///
/// Built once per address and shared read-only by all of its probes. As a
/// [`Resolve`] it answers pinned names itself and hands every other name to
/// the system resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideMap {
    address: IpAddr,
    entries: HashMap<String, IpAddr>,
}

impl OverrideMap {
    /// Pins every domain in `domains` to `address`.
    pub fn new(address: IpAddr, domains: &[Arc<str>]) -> Self {
        let entries = domains
            .iter()
            .map(|domain| (domain.to_ascii_lowercase(), address))
            .collect();
        Self { address, entries }
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn lookup(&self, host: &str) -> Resolution {
        match self.entries.get(&host.to_ascii_lowercase()) {
            Some(addr) => Resolution::Override(*addr),
            None => Resolution::System,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Resolve for OverrideMap {
    fn resolve(&self, name: Name) -> Resolving {
        match self.lookup(name.as_str()) {
            Resolution::Override(addr) => {
                hunter_trace!("{} pinned to {addr}", name.as_str());
                // Port 0 is replaced by the port of the request URL.
                let addrs: Addrs = Box::new(std::iter::once(SocketAddr::new(addr, 0)));
                Box::pin(std::future::ready(Ok::<_, BoxError>(addrs)))
            }
            Resolution::System => {
                let host = name.as_str().to_owned();
                Box::pin(async move {
                    let found: Vec<SocketAddr> =
                        tokio::net::lookup_host((host.as_str(), 0)).await?.collect();
                    let addrs: Addrs = Box::new(found.into_iter());
                    Ok::<_, BoxError>(addrs)
                })
            }
        }
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;
