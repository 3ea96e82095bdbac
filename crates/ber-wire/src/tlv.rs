use crate::error::WireError;
use crate::identifier::Identifier;
use crate::length::Length;

/// The two octets that close an indefinite-length encoding.
pub const END_OF_CONTENTS: [u8; 2] = [0x00, 0x00];

/// Identifier and length octets, everything in front of a contents field.
///
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │ identifier  (1-11 bytes)                     │
/// │ length      (1-9 bytes, or 0x80 indefinite)  │
/// │ contents    [length bytes | until 00 00]     │
/// └──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TlvHeader {
    pub identifier: Identifier,
    pub length: Length,
}

impl TlvHeader {
    /// Read a TLV header from the front of `buf`.
    ///
    /// # Returns
    ///
    /// `(header, bytes_consumed)`; the contents start at `bytes_consumed`.
    ///
    /// # Errors
    ///
    /// - Any [`WireError`] from the identifier or length octets, with
    ///   offsets relative to the start of `buf`.
    /// - [`WireError::NonCanonicalEndOfContents`] for a tag-0, zero-length
    ///   header spelled with a high-tag-form identifier or a long-form length.
    pub fn read_from(buf: &[u8]) -> Result<(Self, usize), WireError> {
        let (identifier, n) = Identifier::read_from(buf)?;
        let (length, m) = Length::read_from(&buf[n..]).map_err(|e| e.at_offset(n))?;
        let header = Self { identifier, length };
        if header.is_end_of_contents() && n + m != END_OF_CONTENTS.len() {
            return Err(WireError::NonCanonicalEndOfContents { offset: 0 });
        }
        Ok((header, n + m))
    }

    /// `true` for the `00 00` marker closing an indefinite encoding.
    #[must_use]
    pub fn is_end_of_contents(&self) -> bool {
        self.identifier.is_end_of_contents() && self.length == Length::Definite(0)
    }
}

/// Append a definite-length TLV to `out`.
pub fn encode_tlv(identifier: Identifier, contents: &[u8], out: &mut Vec<u8>) {
    identifier.encode_into(out);
    Length::Definite(contents.len() as u64).encode_into(out);
    out.extend_from_slice(contents);
}

/// Append an indefinite-length TLV to `out`, closed by an end-of-contents
/// marker. `contents` must already be a run of complete TLVs.
pub fn encode_indefinite(identifier: Identifier, contents: &[u8], out: &mut Vec<u8>) {
    identifier.encode_into(out);
    Length::Indefinite.encode_into(out);
    out.extend_from_slice(contents);
    out.extend_from_slice(&END_OF_CONTENTS);
}
