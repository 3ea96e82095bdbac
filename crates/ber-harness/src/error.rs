use ber_decoder::DecodeError;

/// A failure that is not the decoder's domain error.
///
/// Malformed input never produces one of these. When one does appear it
/// means the harness or its environment is broken, and the fuzz driver
/// turns it into a panic so the engine keeps the input.
#[derive(Debug, thiserror::Error)]
pub enum UnexpectedFailure {
    /// The input stream failed for a reason other than running out of
    /// bytes.
    #[error("input stream failed after {consumed} bytes")]
    StreamIo {
        consumed: usize,
        #[source]
        source: DecodeError,
    },
}

impl UnexpectedFailure {
    /// Bytes pulled from the input before the failure.
    #[must_use]
    pub fn consumed(&self) -> usize {
        match self {
            Self::StreamIo { consumed, .. } => *consumed,
        }
    }
}

/// Errors raised while reading harness configuration from the environment.
///
/// ```text
/// ┌────────────┬────────────────────────────────────────────────┐
/// │ Variant    │ Cause                                          │
/// ├────────────┼────────────────────────────────────────────────┤
/// │ Invalid    │ value is not an unsigned integer               │
/// │ Zero       │ value is 0 where a positive bound is required  │
/// │ LogFilter  │ BERFUZZ_LOG is not a valid tracing filter      │
/// └────────────┴────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not an unsigned integer")]
    Invalid { var: &'static str, value: String },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },

    #[error("invalid log filter {filter:?}: {reason}")]
    LogFilter { filter: String, reason: String },
}
