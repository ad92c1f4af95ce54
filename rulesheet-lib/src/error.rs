use crate::host::{HostError, SheetId};
use thiserror::Error;

/// Errors surfaced by the rule-management layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// The host lacks a mutation primitive. Reported once, then cached.
    #[error("Host cannot {0} rules")]
    MissingCapability(&'static str),

    /// A rule record no longer points at the rule it was located for.
    #[error("Stale rule record at {sheet:?}[{index}]: expected `{expected}`, found {found:?}")]
    StaleRecord {
        sheet: SheetId,
        index: usize,
        expected: String,
        found: Option<String>,
    },

    #[error("Host did not insert a rule for `{0}`")]
    InsertRejected(String),

    #[error("CSS error: {0}")]
    Css(String),
}

pub type Result<T> = std::result::Result<T, SheetError>;
