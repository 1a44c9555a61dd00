//! Console output: one line per interesting report above a live progress bar.

use std::time::Duration;

use colored::{ColoredString, Colorize};
use hunter_core::{NetworkErrorKind, ProbeOutcome, ProbeReport, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{prefix} {percent:>3}%|{wide_bar}| {pos}/{len} [{elapsed_precise}<{eta_precise}, {per_sec}]";

/// How a console line is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// 200 response whose title matched the search text.
    Match,
    Finding,
    Redirect,
    Status,
    Timeout,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

impl Line {
    fn new(tone: Tone, text: String) -> Self {
        Self { tone, text }
    }

    pub fn paint(&self) -> ColoredString {
        let text = self.text.as_str();
        match self.tone {
            Tone::Match => text.black().on_green(),
            Tone::Finding => text.green(),
            Tone::Redirect => text.yellow(),
            Tone::Status => text.blue(),
            Tone::Timeout => text.cyan(),
            Tone::Error => text.red(),
        }
    }
}

/// Console line for one report, or `None` when `verbosity` hides it.
///
/// Findings are always shown. Verbosity 1 adds failed probes and unexpected
/// statuses; connection errors, by far the most common, need verbosity 2.
pub fn render(report: &ProbeReport, verbosity: u8) -> Option<Line> {
    let ip = report.task.address;
    let domain = &report.task.domain;

    match &report.outcome {
        ProbeOutcome::Success {
            status: 200,
            title,
            search_matched: true,
        } => Some(Line::new(
            Tone::Match,
            format!("Real IP for domain {domain} might be: {ip}. Title: {title} (text found)"),
        )),
        ProbeOutcome::Success {
            status: 200, title, ..
        } => Some(Line::new(
            Tone::Finding,
            format!("Real IP for domain {domain} might be: {ip}. Title: {title}"),
        )),
        ProbeOutcome::Success { status, .. } => (verbosity >= 1).then(|| {
            Line::new(
                Tone::Status,
                format!(
                    "[{ip}] {} request for {domain} answered with status {status}",
                    report.task.scheme
                ),
            )
        }),
        ProbeOutcome::Redirect { location, .. } => {
            let text = match location {
                Some(location) => format!(
                    "Redirect found, real IP for domain {domain} might be: {ip}. Location: {location}"
                ),
                None => format!("Redirect found, real IP for domain {domain} might be: {ip}"),
            };
            Some(Line::new(Tone::Redirect, text))
        }
        ProbeOutcome::NetworkError { kind, message } => {
            let (needed, line) = match kind {
                NetworkErrorKind::ConnectionError => (
                    2,
                    Line::new(
                        Tone::Error,
                        format!("[{ip}] Connection error for {domain}: {message}"),
                    ),
                ),
                NetworkErrorKind::ResponseError => (
                    1,
                    Line::new(
                        Tone::Error,
                        format!("[{ip}] Response error for {domain}: {message}"),
                    ),
                ),
                NetworkErrorKind::TimeoutError => (
                    1,
                    Line::new(Tone::Timeout, format!("[{ip}] Request to {domain} timed out.")),
                ),
                NetworkErrorKind::InvalidAddressOrUrl => (
                    1,
                    Line::new(Tone::Error, format!("[{ip}] Invalid URL for {domain}: {message}")),
                ),
                NetworkErrorKind::Other => (
                    1,
                    Line::new(
                        Tone::Error,
                        format!("[{ip}] General error occurred for {domain}: {message}"),
                    ),
                ),
            };
            (verbosity >= needed).then_some(line)
        }
        ProbeOutcome::Cancelled => None,
    }
}

pub fn summary_line(summary: &RunSummary) -> String {
    let mut line = format!(
        "{} of {} probes done: {} hit(s), {} redirect(s), {} other status(es), {} error(s)",
        summary.completed,
        summary.total,
        summary.hits,
        summary.redirects,
        summary.other_status,
        summary.errors(),
    );
    if summary.matches > 0 {
        line.push_str(&format!(", {} title match(es)", summary.matches));
    }
    if summary.cancelled > 0 {
        line.push_str(&format!(", {} cancelled", summary.cancelled));
    }
    line
}

/// Single consumer of the report stream.
pub struct ConsoleSink {
    bar: ProgressBar,
    verbosity: u8,
    summary: RunSummary,
}

impl ConsoleSink {
    pub fn new(total: u64, verbosity: u8) -> Self {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_prefix("Processing IPs and domains");
        bar.enable_steady_tick(Duration::from_millis(250));
        Self::with_bar(bar, total, verbosity)
    }

    pub fn with_bar(bar: ProgressBar, total: u64, verbosity: u8) -> Self {
        Self {
            bar,
            verbosity,
            summary: RunSummary::new(total),
        }
    }

    /// Lines printed through this handle do not tear the bar.
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    pub fn record(&mut self, report: &ProbeReport) {
        self.summary.record(&report.outcome);
        if let Some(line) = render(report, self.verbosity) {
            self.bar.println(line.paint().to_string());
        }
        self.bar.inc(1);
    }

    pub fn finish(self) -> RunSummary {
        self.bar.finish();
        self.summary
    }
}
