use thiserror::Error;

/// Problems with the operator's input, detected before any probing starts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("line {line_no}: malformed address '{line}': {reason}")]
    MalformedAddress {
        line_no: usize,
        line: String,
        reason: String,
    },
    #[error("line {line_no}: malformed range '{line}': {reason}")]
    MalformedRange {
        line_no: usize,
        line: String,
        reason: String,
    },
    #[error("no domains given")]
    NoDomains,
}
