use ber_types::TypeError;
use ber_wire::WireError;

/// Errors that can occur while streaming BER values.
///
/// Every variant except `Io` means the same thing: the bytes are not a
/// valid BER encoding. That is the decoder's single domain error kind, and
/// callers that only care about "valid or not" can check
/// [`is_domain_error`](Self::is_domain_error) instead of matching.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── Truncated                ← input ended inside a value
///   ├── ContentTooLarge          ← declared/buffered size above the limit
///   ├── IndefinitePrimitive      ← 0x80 length on a primitive value
///   ├── UnexpectedEndOfContents  ← 00 00 at the top level
///   ├── NestingTooDeep           ← indefinite nesting above the limit
///   ├── Wire(WireError)          ← identifier/length octets malformed
///   ├── Type(TypeError)          ← contents break their type's rules
///   └── Io(std::io::Error)       ← the reader itself failed (not a domain error)
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input ended inside a value: mid-identifier, mid-length, or
    /// before all declared contents arrived.
    #[error("input truncated at offset {offset}")]
    Truncated { offset: usize },

    /// A value declares, or an indefinite value accumulates, more
    /// contents than the decoder is willing to buffer.
    #[error("value at offset {offset} declares {declared} content octets, limit is {limit}")]
    ContentTooLarge {
        declared: u64,
        limit: usize,
        offset: usize,
    },

    /// Indefinite length is only allowed on constructed encodings.
    #[error("indefinite length on primitive value at offset {offset}")]
    IndefinitePrimitive { offset: usize },

    /// An end-of-contents marker appeared outside any indefinite value.
    #[error("unexpected end-of-contents marker at offset {offset}")]
    UnexpectedEndOfContents { offset: usize },

    /// Indefinite-length values nest deeper than the configured limit.
    #[error("indefinite nesting exceeds depth limit {limit}")]
    NestingTooDeep { limit: usize },

    /// Identifier or length octets were malformed.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Contents failed validation during materialization.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// The underlying reader failed for a reason other than running out
    /// of input.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// `true` if this error means "the input is not valid BER".
    ///
    /// Only reader failures fall outside the domain; they say nothing about
    /// the bytes and everything about the environment.
    #[must_use]
    pub fn is_domain_error(&self) -> bool {
        !matches!(
            self,
            Self::Io(_)
                | Self::Wire(WireError::Io(_))
                | Self::Type(TypeError::Wire(WireError::Io(_)))
        )
    }
}
