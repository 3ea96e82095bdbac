use ber_types::DEFAULT_MAX_DEPTH;

/// Default cap on buffered contents for a single top-level value (1 MiB).
pub const DEFAULT_MAX_CONTENT_LEN: usize = 1 << 20;

/// Resource bounds the streaming decoder enforces.
///
/// ```text
/// ┌─────────────────┬────────────────────────────────────────────────┐
/// │ Field           │ Bounds                                         │
/// ├─────────────────┼────────────────────────────────────────────────┤
/// │ max_content_len │ declared definite lengths, and the total bytes │
/// │                 │ buffered for one indefinite-length value       │
/// │ max_depth       │ nested indefinite encodings while streaming,   │
/// │                 │ and constructed nesting during materialization │
/// └─────────────────┴────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderLimits {
    pub max_content_len: usize,
    pub max_depth: usize,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            max_content_len: DEFAULT_MAX_CONTENT_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
