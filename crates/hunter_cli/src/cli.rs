use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use hunter_core::SearchText;
use hunter_engine::{ProbeSettings, ResolutionStrategy};

/// How a probe reaches the candidate address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Request the domain and pin its DNS answer to the candidate (keeps SNI).
    #[default]
    DnsOverride,
    /// Request the bare address and send the domain in the Host header.
    HostHeader,
}

impl From<Mode> for ResolutionStrategy {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::DnsOverride => ResolutionStrategy::DnsOverride,
            Mode::HostHeader => ResolutionStrategy::HostHeader,
        }
    }
}

/// Find which candidate addresses answer for a domain hidden behind a proxy.
#[derive(Parser, Debug)]
#[command(name = "flarehunter", version, about, long_about = None)]
pub struct Cli {
    /// Comma-separated list of domains
    pub domains: String,

    /// File with one address, `start-end` range or CIDR block per line
    pub ip_list_file: PathBuf,

    /// 0: findings only, 1: also errors and unexpected statuses, 2: also connection errors
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub verbose: u8,

    /// Timeout for each request
    #[arg(long, value_name = "SECONDS", default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Text to look for in the page title
    #[arg(long)]
    pub search_text: Option<String>,

    /// Make the title search case sensitive
    #[arg(long)]
    pub case_sensitive: bool,

    /// Number of requests in flight at once
    #[arg(long, default_value_t = 5, value_parser = parse_threads)]
    pub threads: usize,

    /// Proxy URL for every request (e.g. http://localhost:8080)
    #[arg(long)]
    pub proxy: Option<String>,

    /// Log requests and responses
    #[arg(long)]
    pub debug: bool,

    #[arg(long, value_enum, default_value_t = Mode::DnsOverride)]
    pub mode: Mode,

    /// Also write the log to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn to_settings(&self) -> ProbeSettings {
        ProbeSettings {
            timeout: Duration::from_secs(self.timeout),
            strategy: self.mode.into(),
            proxy: self.proxy.clone(),
            search: self
                .search_text
                .as_ref()
                .map(|text| SearchText::new(text.as_str(), self.case_sensitive)),
            ..ProbeSettings::default()
        }
    }
}

fn parse_threads(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("flarehunter").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_match_the_classic_script() {
        let cli = parse(&["shop.example", "ips.txt"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.threads, 5);
        assert_eq!(cli.mode, Mode::DnsOverride);

        let settings = cli.to_settings();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.strategy, ResolutionStrategy::DnsOverride);
        assert!(settings.search.is_none());
        assert!(settings.proxy.is_none());
    }

    #[test]
    fn search_flags_flow_into_settings() {
        let cli = parse(&[
            "shop.example",
            "ips.txt",
            "--search-text",
            "Admin",
            "--case-sensitive",
            "--mode",
            "host-header",
            "--timeout",
            "9",
            "--proxy",
            "http://127.0.0.1:8080",
        ])
        .unwrap();

        let settings = cli.to_settings();
        assert_eq!(settings.search, Some(SearchText::new("Admin", true)));
        assert_eq!(settings.strategy, ResolutionStrategy::HostHeader);
        assert_eq!(settings.timeout, Duration::from_secs(9));
        assert_eq!(settings.proxy.as_deref(), Some("http://127.0.0.1:8080"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(parse(&["shop.example", "ips.txt", "--verbose", "3"]).is_err());
        assert!(parse(&["shop.example", "ips.txt", "--threads", "0"]).is_err());
        assert!(parse(&["shop.example", "ips.txt", "--timeout", "0"]).is_err());
        assert!(parse(&["shop.example"]).is_err());
    }
}
