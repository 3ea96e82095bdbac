use crate::base128::{MAX_BASE128_BYTES, decode_base128, encode_base128};
use crate::error::WireError;

/// Bit 6 of the first identifier octet: set for constructed encodings.
pub const CONSTRUCTED_BIT: u8 = 0b0010_0000;

/// Low five bits of the first identifier octet when the tag number
/// continues in the following octets (high-tag-number form).
pub const HIGH_TAG_FORM: u8 = 0b0001_1111;

/// Largest identifier encoding: one leading octet plus a full base-128 tag.
pub const MAX_IDENTIFIER_BYTES: usize = 1 + MAX_BASE128_BYTES;

/// Tag class, taken from bits 8-7 of the first identifier octet.
///
/// ```text
/// ┌──────┬──────────────────┐
/// │ Bits │ Class            │
/// ├──────┼──────────────────┤
/// │ 00   │ Universal        │
/// │ 01   │ Application      │
/// │ 10   │ Context-specific │
/// │ 11   │ Private          │
/// └──────┴──────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Class {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl Class {
    /// Extract the class from a first identifier octet.
    #[must_use]
    pub fn from_octet(first: u8) -> Self {
        match first >> 6 {
            0 => Self::Universal,
            1 => Self::Application,
            2 => Self::ContextSpecific,
            _ => Self::Private,
        }
    }

    /// The class bits, already shifted into position 8-7.
    #[must_use]
    pub fn bits(self) -> u8 {
        match self {
            Self::Universal => 0b0000_0000,
            Self::Application => 0b0100_0000,
            Self::ContextSpecific => 0b1000_0000,
            Self::Private => 0b1100_0000,
        }
    }
}

/// BER identifier octets: tag class, primitive/constructed, tag number.
///
/// ```text
///   8 7   6   5 4 3 2 1
/// ┌─────┬───┬───────────┐   ┌───────────────────────┐
/// │class│P/C│ number<31 │   │ 1xxxxxxx ... 0xxxxxxx │ (only if low bits = 11111)
/// └─────┴───┴───────────┘   └───────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub class: Class,
    pub constructed: bool,
    pub tag_number: u64,
}

impl Identifier {
    /// The end-of-contents marker that closes an indefinite-length encoding.
    pub const END_OF_CONTENTS: Self = Self {
        class: Class::Universal,
        constructed: false,
        tag_number: 0,
    };

    #[must_use]
    pub fn new(class: Class, constructed: bool, tag_number: u64) -> Self {
        Self {
            class,
            constructed,
            tag_number,
        }
    }

    /// Shorthand for a universal-class identifier.
    #[must_use]
    pub fn universal(tag_number: u64, constructed: bool) -> Self {
        Self::new(Class::Universal, constructed, tag_number)
    }

    #[must_use]
    pub fn is_end_of_contents(&self) -> bool {
        *self == Self::END_OF_CONTENTS
    }

    /// Returns `true` if a first identifier octet announces
    /// high-tag-number form, i.e. more identifier octets follow.
    #[must_use]
    pub fn has_continuation(first: u8) -> bool {
        first & HIGH_TAG_FORM == HIGH_TAG_FORM
    }

    /// Read identifier octets from the front of `buf`.
    ///
    /// # Returns
    ///
    /// `(identifier, bytes_consumed)` on success.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if `buf` ends inside the identifier.
    /// - [`WireError::NonMinimalBase128`] / [`WireError::Base128Overflow`]
    ///   for malformed high tag numbers.
    pub fn read_from(buf: &[u8]) -> Result<(Self, usize), WireError> {
        let first = *buf.first().ok_or(WireError::UnexpectedEof { offset: 0 })?;
        let class = Class::from_octet(first);
        let constructed = first & CONSTRUCTED_BIT != 0;

        if !Self::has_continuation(first) {
            return Ok((
                Self::new(class, constructed, u64::from(first & HIGH_TAG_FORM)),
                1,
            ));
        }

        let (tag_number, n) = decode_base128(&buf[1..]).map_err(|e| e.at_offset(1))?;
        Ok((Self::new(class, constructed, tag_number), 1 + n))
    }

    /// Append the identifier octets to `out`.
    ///
    /// Tag numbers below 31 use the single-octet form; anything larger
    /// uses high-tag-number form.
    ///
    /// # Returns
    ///
    /// The number of bytes appended.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> usize {
        let mut first = self.class.bits();
        if self.constructed {
            first |= CONSTRUCTED_BIT;
        }

        if self.tag_number < u64::from(HIGH_TAG_FORM) {
            #[allow(clippy::cast_possible_truncation)]
            out.push(first | self.tag_number as u8);
            return 1;
        }

        out.push(first | HIGH_TAG_FORM);
        let mut buf = [0u8; MAX_BASE128_BYTES];
        let n = encode_base128(self.tag_number, &mut buf);
        out.extend_from_slice(&buf[..n]);
        1 + n
    }

    /// Write the identifier octets to the provided writer.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Io`] if the writer fails.
    pub fn write_to(&self, w: &mut impl std::io::Write) -> Result<usize, WireError> {
        let mut buf = Vec::with_capacity(MAX_IDENTIFIER_BYTES);
        let n = self.encode_into(&mut buf);
        w.write_all(&buf)?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(identifier: Identifier) -> Vec<u8> {
        let mut out = Vec::new();
        identifier.encode_into(&mut out);
        out
    }

    #[test]
    fn boolean_is_single_octet() {
        let (id, n) = Identifier::read_from(&[0x01]).unwrap();
        assert_eq!(id, Identifier::universal(1, false));
        assert_eq!(n, 1);
    }

    #[test]
    fn sequence_is_constructed() {
        let (id, _) = Identifier::read_from(&[0x30]).unwrap();
        assert_eq!(id.class, Class::Universal);
        assert!(id.constructed);
        assert_eq!(id.tag_number, 16);
    }

    #[test]
    fn context_and_private_classes() {
        let (ctx, _) = Identifier::read_from(&[0xA0]).unwrap();
        assert_eq!(ctx, Identifier::new(Class::ContextSpecific, true, 0));

        let (private, _) = Identifier::read_from(&[0xC5]).unwrap();
        assert_eq!(private, Identifier::new(Class::Private, false, 5));
    }

    #[test]
    fn high_tag_number_form() {
        // [APPLICATION 201], primitive
        let bytes = [0x5F, 0x81, 0x49];
        let (id, n) = Identifier::read_from(&bytes).unwrap();
        assert_eq!(id, Identifier::new(Class::Application, false, 201));
        assert_eq!(n, 3);
        assert_eq!(encode(id), bytes);
    }

    #[test]
    fn low_tag_numbers_encode_in_one_octet() {
        assert_eq!(encode(Identifier::universal(30, false)), vec![0x1E]);
        assert_eq!(encode(Identifier::universal(31, false)), vec![0x1F, 0x1F]);
    }

    #[test]
    fn end_of_contents_marker() {
        let (id, _) = Identifier::read_from(&[0x00]).unwrap();
        assert!(id.is_end_of_contents());
        // A constructed tag 0 is not the marker
        let (id, _) = Identifier::read_from(&[0x20]).unwrap();
        assert!(!id.is_end_of_contents());
    }

    #[test]
    fn empty_input() {
        assert!(matches!(
            Identifier::read_from(&[]),
            Err(WireError::UnexpectedEof { offset: 0 })
        ));
    }

    #[test]
    fn truncated_high_tag_reports_absolute_offset() {
        assert!(matches!(
            Identifier::read_from(&[0x1F, 0x81]),
            Err(WireError::UnexpectedEof { offset: 2 })
        ));
    }

    #[test]
    fn padded_high_tag_rejected() {
        assert!(matches!(
            Identifier::read_from(&[0x1F, 0x80, 0x01]),
            Err(WireError::NonMinimalBase128)
        ));
    }

    #[test]
    fn write_to_matches_encode_into() {
        let id = Identifier::new(Class::ContextSpecific, true, 1000);
        let mut written = Vec::new();
        let n = id.write_to(&mut written).unwrap();
        assert_eq!(n, written.len());
        assert_eq!(written, encode(id));
    }
}
