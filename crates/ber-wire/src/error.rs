/// Errors raised while reading or writing BER identifier and length octets.
///
/// These are the lowest-level failures in the stack: they know nothing
/// about universal types or value semantics, only about how the octets
/// in front of a contents field are laid out.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Input ended before a complete identifier, length, or base-128
    /// value could be read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// A base-128 value (high tag number or OID arc) does not fit in 64 bits.
    #[error("base-128 value overflows 64 bits")]
    Base128Overflow,

    /// A base-128 value started with a 0x80 padding octet.
    #[error("base-128 value starts with a 0x80 padding octet")]
    NonMinimalBase128,

    /// The initial length octet was 0xFF, which X.690 reserves.
    #[error("length octet 0xFF is reserved")]
    ReservedLengthOctet,

    /// Long-form length announced more octets than fit in a `u64`.
    #[error("long-form length uses {octets} octets, at most 8 are supported")]
    LengthOverflow { octets: usize },

    /// A tag-0, zero-length header encoded in more than the two octets
    /// `00 00` that an end-of-contents marker must use.
    #[error("end-of-contents marker at offset {offset} is not exactly 00 00")]
    NonCanonicalEndOfContents { offset: usize },

    /// I/O error during write.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WireError {
    /// Shift a positional error so its offset is relative to an enclosing buffer.
    #[must_use]
    pub fn at_offset(self, base: usize) -> Self {
        match self {
            Self::UnexpectedEof { offset } => Self::UnexpectedEof {
                offset: base + offset,
            },
            Self::NonCanonicalEndOfContents { offset } => Self::NonCanonicalEndOfContents {
                offset: base + offset,
            },
            other => other,
        }
    }
}
