use ber_wire::WireError;

/// Errors raised while interpreting the contents of a BER value.
///
/// These are higher-level than [`WireError`]: the identifier and length
/// octets were readable, but the contents break a rule of the universal
/// type they claim to be, or a lazily-held constructed encoding turns out
/// to be malformed once it is walked.
///
/// # Error hierarchy
///
/// ```text
/// ┌─────────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                                  │
/// │   ├── scalar rules: BOOLEAN, INTEGER, NULL, BIT STRING  │
/// │   ├── OID arcs and character-string alphabets          │
/// │   ├── primitive/constructed form mismatches            │
/// │   ├── nested TLV structure: overruns, stray 00 00       │
/// │   ├── NestingTooDeep for depth-bounded walks            │
/// │   └── wraps WireError for identifier/length failures    │
/// └─────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
  /// BOOLEAN contents must be exactly one octet.
  #[error("BOOLEAN contents must be 1 octet, found {len}")]
  InvalidBoolean { len: usize },

  /// INTEGER and ENUMERATED need at least one contents octet.
  #[error("{type_name} contents are empty")]
  EmptyInteger { type_name: &'static str },

  /// NULL contents must be empty.
  #[error("NULL contents must be empty, found {len} octets")]
  NonEmptyNull { len: usize },

  /// BIT STRING unused-bits octet is missing or out of range.
  #[error("invalid BIT STRING: {reason}")]
  InvalidBitString { reason: &'static str },

  /// An object identifier arc is truncated, padded, or too large.
  #[error("invalid {type_name} at contents offset {offset}: {source}")]
  InvalidObjectIdentifier {
    type_name: &'static str,
    offset: usize,
    #[source]
    source: WireError,
  },

  /// OBJECT IDENTIFIER and RELATIVE-OID need at least one arc.
  #[error("{type_name} has no arcs")]
  EmptyObjectIdentifier { type_name: &'static str },

  /// A character string contains an octet outside its alphabet.
  #[error("{type_name} contains invalid octet {byte:#04X} at offset {offset}")]
  InvalidCharacter {
    type_name: &'static str,
    byte: u8,
    offset: usize,
  },

  /// UTF8String contents are not valid UTF-8.
  #[error("{type_name} is not valid UTF-8")]
  InvalidUtf8 { type_name: &'static str },

  /// BMPString / UniversalString contents are not a whole number of
  /// code units.
  #[error("{type_name} length {len} is not a multiple of {unit}")]
  InvalidStringLength {
    type_name: &'static str,
    len: usize,
    unit: usize,
  },

  /// BMPString / UniversalString decodes to an invalid code point.
  #[error("{type_name} contains an invalid code point")]
  InvalidCodePoint { type_name: &'static str },

  /// A type that X.690 only allows in primitive form was constructed.
  #[error("{type_name} must use the primitive encoding")]
  ConstructedScalar { type_name: &'static str },

  /// SEQUENCE or SET arrived in primitive form.
  #[error("{type_name} must use the constructed encoding")]
  PrimitiveCollection { type_name: &'static str },

  /// A segment of a constructed string carries a different tag.
  #[error("segment of constructed {type_name} has tag {found}")]
  MismatchedSegment { type_name: &'static str, found: u64 },

  /// Universal tag 0 used as a value rather than as the `00 00` marker.
  #[error("end-of-contents tag used as a value")]
  InvalidEndOfContents,

  /// An end-of-contents marker appeared where no indefinite encoding
  /// was open.
  #[error("unexpected end-of-contents marker at contents offset {offset}")]
  UnexpectedEndOfContents { offset: usize },

  /// An indefinite encoding ran out of contents before its `00 00`.
  #[error("missing end-of-contents marker at contents offset {offset}")]
  MissingEndOfContents { offset: usize },

  /// A nested TLV declares more contents than its parent holds.
  #[error("nested value at contents offset {offset} declares {declared} octets, {available} available")]
  ContentsOverrun {
    offset: usize,
    declared: u64,
    available: usize,
  },

  /// Indefinite length used on a primitive encoding.
  #[error("indefinite length on primitive value at contents offset {offset}")]
  IndefinitePrimitive { offset: usize },

  /// Constructed values nest deeper than the configured limit.
  #[error("nesting exceeds depth limit {limit}")]
  NestingTooDeep { limit: usize },

  /// An identifier or length inside the contents could not be read.
  #[error(transparent)]
  Wire(#[from] WireError),
}
