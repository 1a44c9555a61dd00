use crate::{NetworkErrorKind, ProbeOutcome};

/// Running tally of outcomes, used for the progress line and the final summary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total: u64,
    pub completed: u64,
    /// 200 responses.
    pub hits: u64,
    /// 200 responses whose title matched the search text.
    pub matches: u64,
    pub redirects: u64,
    /// Responses with any other status.
    pub other_status: u64,
    pub connection_errors: u64,
    pub timeouts: u64,
    pub other_errors: u64,
    pub cancelled: u64,
}

impl RunSummary {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &ProbeOutcome) {
        self.completed += 1;
        match outcome {
            ProbeOutcome::Success {
                status: 200,
                search_matched,
                ..
            } => {
                self.hits += 1;
                if *search_matched {
                    self.matches += 1;
                }
            }
            ProbeOutcome::Success { .. } => self.other_status += 1,
            ProbeOutcome::Redirect { .. } => self.redirects += 1,
            ProbeOutcome::NetworkError { kind, .. } => match kind {
                NetworkErrorKind::ConnectionError => self.connection_errors += 1,
                NetworkErrorKind::TimeoutError => self.timeouts += 1,
                NetworkErrorKind::ResponseError
                | NetworkErrorKind::InvalidAddressOrUrl
                | NetworkErrorKind::Other => self.other_errors += 1,
            },
            ProbeOutcome::Cancelled => self.cancelled += 1,
        }
    }

    pub fn errors(&self) -> u64 {
        self.connection_errors + self.timeouts + self.other_errors
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}
