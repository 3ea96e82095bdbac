use std::fmt;

use ber_decoder::DecodeError;

use crate::decode_loop::{LoopReport, Stop};
use crate::error::UnexpectedFailure;

/// Every failure the loop can report falls in exactly one of two classes.
///
/// ```text
/// ┌──────────┬───────────────────────────────────┬──────────────────────┐
/// │ Variant  │ Cause                             │ Handling             │
/// ├──────────┼───────────────────────────────────┼──────────────────────┤
/// │ Expected │ input is not valid BER            │ swallowed            │
/// │ Other    │ anything else (reader failure)    │ propagated as panic  │
/// └──────────┴───────────────────────────────────┴──────────────────────┘
/// ```
///
/// Panics, aborts, sanitizer reports, and hangs never reach this type.
/// They are left for the fuzzing engine to catch.
#[derive(Debug)]
pub enum Failure {
    Expected(DecodeError),
    Other(UnexpectedFailure),
}

impl Failure {
    /// Sort a decode error. `consumed` is recorded on unexpected failures.
    #[must_use]
    pub fn from_decode(error: DecodeError, consumed: usize) -> Self {
        if error.is_domain_error() {
            Self::Expected(error)
        } else {
            Self::Other(UnexpectedFailure::StreamIo {
                consumed,
                source: error,
            })
        }
    }
}

/// Terminal state of an iteration that returned normally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminalState {
    Exhausted,
    CapReached,
    ExpectedError,
}

impl TerminalState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exhausted => "EXHAUSTED",
            Self::CapReached => "CAP_REACHED",
            Self::ExpectedError => "EXPECTED_ERROR",
        }
    }
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one iteration did, once classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IterationReport {
    pub state: TerminalState,
    pub materialized: usize,
    pub consumed: usize,
}

/// Decide whether a loop outcome is a normal return or a finding.
///
/// Domain errors are dropped here; nothing about them is logged or kept.
///
/// # Errors
///
/// [`UnexpectedFailure`] for any failure that is not a domain error.
pub fn classify(report: LoopReport) -> Result<IterationReport, UnexpectedFailure> {
    let LoopReport {
        stop,
        materialized,
        consumed,
    } = report;

    let state = match stop {
        Stop::Exhausted => TerminalState::Exhausted,
        Stop::CapReached => TerminalState::CapReached,
        Stop::Failed(error) => match Failure::from_decode(error, consumed) {
            Failure::Expected(_) => TerminalState::ExpectedError,
            Failure::Other(failure) => return Err(failure),
        },
    };

    Ok(IterationReport {
        state,
        materialized,
        consumed,
    })
}
