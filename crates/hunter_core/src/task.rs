use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use crate::{AddressSet, InputError};

/// Title reported for a 200 response without a usable `<title>`.
pub const NO_TITLE: &str = "No title found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    /// Probe order for one (address, domain) pair.
    pub const ALL: [Scheme; 2] = [Scheme::Https, Scheme::Http];

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of work: contact `address` for `domain` over `scheme`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeTask {
    pub address: IpAddr,
    pub domain: Arc<str>,
    pub scheme: Scheme,
}

impl ProbeTask {
    pub fn new(address: IpAddr, domain: Arc<str>, scheme: Scheme) -> Self {
        Self {
            address,
            domain,
            scheme,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    ConnectionError,
    ResponseError,
    TimeoutError,
    InvalidAddressOrUrl,
    Other,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkErrorKind::ConnectionError => write!(f, "connection error"),
            NetworkErrorKind::ResponseError => write!(f, "response error"),
            NetworkErrorKind::TimeoutError => write!(f, "timeout"),
            NetworkErrorKind::InvalidAddressOrUrl => write!(f, "invalid address or url"),
            NetworkErrorKind::Other => write!(f, "general error"),
        }
    }
}

/// Classified result of one [`ProbeTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Any non-redirect HTTP response. Only status 200 carries a real title;
    /// other statuses have an empty title and never match.
    Success {
        status: u16,
        title: String,
        search_matched: bool,
    },
    Redirect {
        status: u16,
        location: Option<String>,
    },
    NetworkError {
        kind: NetworkErrorKind,
        message: String,
    },
    /// The run was stopped before this task reached the network.
    Cancelled,
}

impl ProbeOutcome {
    pub fn network_error(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        ProbeOutcome::NetworkError {
            kind,
            message: message.into(),
        }
    }

    /// A 200 response or a redirect: the address answered for the domain.
    pub fn is_finding(&self) -> bool {
        matches!(
            self,
            ProbeOutcome::Success { status: 200, .. } | ProbeOutcome::Redirect { .. }
        )
    }
}

/// A completed task together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub task: ProbeTask,
    pub outcome: ProbeOutcome,
}

/// Everything a run will probe: addresses × domains × schemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPlan {
    pub addresses: AddressSet,
    pub domains: Vec<Arc<str>>,
    pub schemes: Vec<Scheme>,
}

impl WorkPlan {
    pub fn new(addresses: AddressSet, domains: Vec<String>) -> Self {
        Self {
            addresses,
            domains: domains.into_iter().map(Arc::from).collect(),
            schemes: Scheme::ALL.to_vec(),
        }
    }

    /// Number of tasks; fixed for the lifetime of the run.
    pub fn total(&self) -> u64 {
        self.addresses.len() * self.domains.len() as u64 * self.schemes.len() as u64
    }

    /// Tasks for one address, domain-major then scheme.
    pub fn tasks_for(&self, address: IpAddr) -> impl Iterator<Item = ProbeTask> + '_ {
        self.domains.iter().flat_map(move |domain| {
            self.schemes
                .iter()
                .map(move |scheme| ProbeTask::new(address, domain.clone(), *scheme))
        })
    }

    /// Every task, address-major, then domain, then scheme.
    pub fn tasks(&self) -> impl Iterator<Item = ProbeTask> + '_ {
        self.addresses
            .iter()
            .flat_map(move |address| self.tasks_for(address))
    }
}

/// Splits the comma-separated domain argument.
pub fn parse_domain_list(raw: &str) -> Result<Vec<String>, InputError> {
    let domains: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if domains.is_empty() {
        return Err(InputError::NoDomains);
    }
    Ok(domains)
}
