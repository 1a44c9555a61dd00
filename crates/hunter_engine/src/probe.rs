use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use hunter_core::{
    title_matches, NetworkErrorKind, ProbeOutcome, ProbeTask, SearchText, NO_TITLE,
};
use hunter_logging::{hunter_debug, hunter_trace};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HOST, LOCATION,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::StatusCode;

use crate::decode::decode_body;
use crate::extract::{HtmlTitleExtractor, TitleExtractor};
use crate::resolve::{OverrideMap, Ports, ResolutionStrategy};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:88.0) Gecko/20100101 Firefox/88.0";

const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Applies to connecting and to the whole request, body included.
    pub timeout: Duration,
    pub strategy: ResolutionStrategy,
    pub user_agent: String,
    /// HTTP proxy for every request. System proxy variables are ignored.
    pub proxy: Option<String>,
    pub search: Option<SearchText>,
    /// Bodies are read up to this many bytes; the title is taken from the prefix.
    pub max_body_bytes: u64,
    pub ports: Ports,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            strategy: ResolutionStrategy::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            search: None,
            max_body_bytes: 5 * 1024 * 1024,
            ports: Ports::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeSetupError {
    #[error("invalid proxy url '{url}': {message}")]
    InvalidProxy { url: String, message: String },
    #[error("invalid header value for {name}: {message}")]
    InvalidHeader { name: &'static str, message: String },
    #[error("failed to build http client: {0}")]
    Client(String),
}

/// Opens one [`ProbeSession`] per candidate address.
pub trait Prober: Send + Sync {
    type Session: ProbeSession + 'static;

    /// Called once per address, before any of its tasks run. The session is
    /// shared by every task for that address and dropped after the last one.
    fn open_session(
        &self,
        address: IpAddr,
        domains: &[Arc<str>],
    ) -> Result<Arc<Self::Session>, ProbeSetupError>;
}

#[async_trait::async_trait]
pub trait ProbeSession: Send + Sync {
    /// Issues one request. Every failure is folded into the outcome.
    async fn probe(&self, task: &ProbeTask) -> ProbeOutcome;
}

#[derive(Debug, Clone)]
pub struct ReqwestProber {
    settings: Arc<ProbeSettings>,
    /// Host-header mode never touches DNS, so one client serves every address.
    shared_client: Option<reqwest::Client>,
}

impl ReqwestProber {
    pub fn new(settings: ProbeSettings) -> Result<Self, ProbeSetupError> {
        let shared_client = match settings.strategy {
            ResolutionStrategy::HostHeader => Some(build_client(&settings, None)?),
            ResolutionStrategy::DnsOverride => {
                // Surface a bad proxy before the first address is reached.
                build_proxy(&settings)?;
                None
            }
        };

        Ok(Self {
            settings: Arc::new(settings),
            shared_client,
        })
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }
}

impl Prober for ReqwestProber {
    type Session = ReqwestSession;

    fn open_session(
        &self,
        address: IpAddr,
        domains: &[Arc<str>],
    ) -> Result<Arc<ReqwestSession>, ProbeSetupError> {
        let (client, overrides) = match &self.shared_client {
            Some(client) => (client.clone(), None),
            None => {
                let overrides = Arc::new(OverrideMap::new(address, domains));
                let client = build_client(&self.settings, Some(&overrides))?;
                (client, Some(overrides))
            }
        };

        hunter_trace!(
            "session for {address}: {} override(s)",
            overrides.as_ref().map_or(0, |map| map.len())
        );

        Ok(Arc::new(ReqwestSession {
            client,
            settings: self.settings.clone(),
            overrides,
            extractor: HtmlTitleExtractor,
        }))
    }
}

/// Per-address probing scope: the client and, in DNS-override mode, its pins.
#[derive(Debug)]
pub struct ReqwestSession {
    client: reqwest::Client,
    settings: Arc<ProbeSettings>,
    overrides: Option<Arc<OverrideMap>>,
    extractor: HtmlTitleExtractor,
}

impl ReqwestSession {
    pub fn overrides(&self) -> Option<&OverrideMap> {
        self.overrides.as_deref()
    }

    async fn read_capped(&self, response: reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
        let cap = usize::try_from(self.settings.max_body_bytes).unwrap_or(usize::MAX);
        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let room = cap.saturating_sub(bytes.len());
            if chunk.len() >= room {
                bytes.extend_from_slice(&chunk[..room]);
                hunter_debug!("body truncated at {cap} bytes");
                break;
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ProbeSession for ReqwestSession {
    async fn probe(&self, task: &ProbeTask) -> ProbeOutcome {
        let strategy = self.settings.strategy;
        let url = match strategy.target_url(
            task.scheme,
            task.address,
            &task.domain,
            &self.settings.ports,
        ) {
            Ok(url) => url,
            Err(err) => {
                return ProbeOutcome::network_error(
                    NetworkErrorKind::InvalidAddressOrUrl,
                    format!("cannot build {} url for {}: {err}", task.scheme, task.domain),
                )
            }
        };

        let mut request = self.client.get(url.clone());
        if strategy.sends_host_header() {
            request = request.header(HOST, task.domain.as_ref());
        }

        hunter_debug!(
            "Sending request to {url} for {} via {}",
            task.domain,
            task.address
        );

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return classify_error(&err),
        };

        let status = response.status();
        hunter_debug!("Received response: status={} url={url}", status.as_u16());

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
            hunter_debug!("Redirect found: location={location:?}");
            return ProbeOutcome::Redirect {
                status: status.as_u16(),
                location,
            };
        }

        if status != StatusCode::OK {
            return ProbeOutcome::Success {
                status: status.as_u16(),
                title: String::new(),
                search_matched: false,
            };
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let bytes = match self.read_capped(response).await {
            Ok(bytes) => bytes,
            Err(err) => return classify_error(&err),
        };

        let decoded = decode_body(&bytes, content_type.as_deref());
        if decoded.lossy {
            hunter_debug!(
                "body of {url} is not valid {}, decoded lossily",
                decoded.encoding_label
            );
        }
        hunter_debug!("Response content: {}...", preview(&decoded.text));

        let title = self
            .extractor
            .title(&decoded.text)
            .unwrap_or_else(|| NO_TITLE.to_string());
        let search_matched = title_matches(self.settings.search.as_ref(), &title);

        ProbeOutcome::Success {
            status: status.as_u16(),
            title,
            search_matched,
        }
    }
}

fn build_client(
    settings: &ProbeSettings,
    overrides: Option<&Arc<OverrideMap>>,
) -> Result<reqwest::Client, ProbeSetupError> {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(settings.timeout)
        .timeout(settings.timeout)
        .redirect(reqwest::redirect::Policy::none())
        // The presented domain rarely matches the candidate's certificate.
        .danger_accept_invalid_certs(true)
        .default_headers(default_headers(&settings.user_agent)?);

    builder = match build_proxy(settings)? {
        Some(proxy) => builder.proxy(proxy),
        None => builder.no_proxy(),
    };

    if let Some(overrides) = overrides {
        builder = builder.dns_resolver(Arc::clone(overrides));
    }

    builder
        .build()
        .map_err(|err| ProbeSetupError::Client(error_chain(&err)))
}

fn build_proxy(settings: &ProbeSettings) -> Result<Option<reqwest::Proxy>, ProbeSetupError> {
    settings
        .proxy
        .as_deref()
        .map(|url| {
            reqwest::Proxy::all(url).map_err(|err| ProbeSetupError::InvalidProxy {
                url: url.to_string(),
                message: err.to_string(),
            })
        })
        .transpose()
}

fn default_headers(user_agent: &str) -> Result<HeaderMap, ProbeSetupError> {
    let mut headers = HeaderMap::new();
    let agent =
        HeaderValue::from_str(user_agent).map_err(|err| ProbeSetupError::InvalidHeader {
            name: "user-agent",
            message: err.to_string(),
        })?;
    headers.insert(USER_AGENT, agent);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    Ok(headers)
}

fn classify_error(err: &reqwest::Error) -> ProbeOutcome {
    let kind = if err.is_timeout() {
        NetworkErrorKind::TimeoutError
    } else if err.is_builder() {
        NetworkErrorKind::InvalidAddressOrUrl
    } else if err.is_connect() {
        NetworkErrorKind::ConnectionError
    } else if err.is_request() || err.is_body() || err.is_decode() || err.is_status() {
        NetworkErrorKind::ResponseError
    } else {
        NetworkErrorKind::Other
    };
    ProbeOutcome::network_error(kind, error_chain(err))
}

/// `Display` of the error followed by each of its sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
