use ber_wire::tlv::END_OF_CONTENTS;
use ber_wire::{Identifier, Length, TlvHeader};

use crate::error::TypeError;

/// A nested TLV inside constructed contents, not yet interpreted.
///
/// For indefinite-length encodings `contents` excludes the closing
/// `00 00` marker, so it has the same shape as a definite encoding's
/// contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawTlv<'a> {
    pub identifier: Identifier,
    pub contents: &'a [u8],
    pub indefinite: bool,
    /// Offset of the identifier octets within the parent's contents.
    pub offset: usize,
}

/// Cursor-based TLV reader for the contents of a constructed value.
///
/// Constructed values keep their contents as raw bytes until they are
/// materialized; this reader is what walks them. Each call to
/// [`next_tlv`](Self::next_tlv) reads one identifier + length, checks the
/// declared contents fit inside the parent, and advances past them.
///
/// Indefinite-length children are scanned to their matching
/// end-of-contents marker. The scan is bounded by `max_depth`, counted
/// from the depth this reader was created at.
///
/// ```text
///   let mut reader = ContentsReader::new(&value.contents, 1, max_depth);
///   while let Some(child) = reader.next_tlv()? {
///       // interpret child.identifier / child.contents
///   }
/// ```
pub struct ContentsReader<'a> {
    buf: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> ContentsReader<'a> {
    /// Create a reader over constructed contents sitting at `depth`.
    #[must_use]
    pub fn new(buf: &'a [u8], depth: usize, max_depth: usize) -> Self {
        Self {
            buf,
            pos: 0,
            depth,
            max_depth,
        }
    }

    /// Read the next nested TLV.
    ///
    /// Returns `Ok(Some(tlv))` for each child, `Ok(None)` once the
    /// contents are exhausted.
    ///
    /// # Errors
    ///
    /// - [`TypeError::Wire`] for unreadable identifier or length octets.
    /// - [`TypeError::UnexpectedEndOfContents`] for a stray `00 00`.
    /// - [`TypeError::ContentsOverrun`] if a child claims more bytes than
    ///   remain.
    /// - [`TypeError::IndefinitePrimitive`],
    ///   [`TypeError::MissingEndOfContents`], [`TypeError::NestingTooDeep`]
    ///   for malformed indefinite children.
    pub fn next_tlv(&mut self) -> Result<Option<RawTlv<'a>>, TypeError> {
        let offset = self.pos;
        let remaining = &self.buf[offset..];
        if remaining.is_empty() {
            return Ok(None);
        }

        let (header, header_len) =
            TlvHeader::read_from(remaining).map_err(|e| e.at_offset(offset))?;
        if header.is_end_of_contents() {
            return Err(TypeError::UnexpectedEndOfContents { offset });
        }

        let body = &remaining[header_len..];
        let body_offset = offset + header_len;

        let (contents, consumed, indefinite) = match header.length {
            Length::Definite(declared) => {
                let len = fit_length(declared, body.len(), offset)?;
                (&body[..len], len, false)
            }
            Length::Indefinite => {
                if !header.identifier.constructed {
                    return Err(TypeError::IndefinitePrimitive { offset });
                }
                let inner =
                    scan_indefinite(body, body_offset, self.depth + 1, self.max_depth)?;
                // Skip the closing 00 00 as well
                (&body[..inner], inner + END_OF_CONTENTS.len(), true)
            }
        };

        self.pos = body_offset + consumed;

        Ok(Some(RawTlv {
            identifier: header.identifier,
            contents,
            indefinite,
            offset,
        }))
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

fn fit_length(declared: u64, available: usize, offset: usize) -> Result<usize, TypeError> {
    usize::try_from(declared)
        .ok()
        .filter(|&len| len <= available)
        .ok_or(TypeError::ContentsOverrun {
            offset,
            declared,
            available,
        })
}

/// Find the end of an indefinite encoding's contents.
///
/// Returns the number of bytes before the closing end-of-contents marker.
/// `base` is the offset of `buf` within the outermost contents, used only
/// for error reporting.
fn scan_indefinite(
    buf: &[u8],
    base: usize,
    depth: usize,
    max_depth: usize,
) -> Result<usize, TypeError> {
    if depth > max_depth {
        return Err(TypeError::NestingTooDeep { limit: max_depth });
    }

    let mut pos = 0;
    loop {
        let remaining = &buf[pos..];
        if remaining.is_empty() {
            return Err(TypeError::MissingEndOfContents { offset: base + pos });
        }

        let (header, header_len) =
            TlvHeader::read_from(remaining).map_err(|e| e.at_offset(base + pos))?;
        if header.is_end_of_contents() {
            return Ok(pos);
        }

        let body = &remaining[header_len..];
        let consumed = match header.length {
            Length::Definite(declared) => fit_length(declared, body.len(), base + pos)?,
            Length::Indefinite => {
                if !header.identifier.constructed {
                    return Err(TypeError::IndefinitePrimitive { offset: base + pos });
                }
                scan_indefinite(body, base + pos + header_len, depth + 1, max_depth)?
                    + END_OF_CONTENTS.len()
            }
        };
        pos += header_len + consumed;
    }
}
