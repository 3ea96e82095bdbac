use std::io::{self, Read};
use std::iter::FusedIterator;

use ber_types::Value;
use ber_wire::identifier::MAX_IDENTIFIER_BYTES;
use ber_wire::length::MAX_LENGTH_OCTETS;
use ber_wire::tlv::END_OF_CONTENTS;
use ber_wire::{Identifier, Length, TlvHeader, WireError};

use crate::error::DecodeError;
use crate::limits::DecoderLimits;

/// Streaming BER decoder that yields top-level values one at a time
/// without reading ahead.
///
/// The decoder pulls identifier and length octets byte by byte, then
/// exactly the declared contents, so it never consumes more input than
/// the value it is about to yield. Backpressure is natural: nothing is
/// read until the caller asks for the next item, and a caller that stops
/// pulling leaves the rest of the input untouched.
///
/// Constructed contents are buffered but not walked; their children are
/// only validated when the [`Value`] is materialized.
///
/// ```text
///   next() ──▶ Some(Ok(Value))     one value decoded
///          ──▶ Some(Err(e))        malformed input, decoder is now done
///          ──▶ None                clean end of input
/// ```
///
/// # Example
///
/// ```rust
/// use ber_decoder::StreamingDecoder;
///
/// let input: &[u8] = &[0x01, 0x01, 0x00, 0x05, 0x00];
/// let texts: Vec<String> = StreamingDecoder::new(input)
///   .map(|value| value.unwrap().materialize().unwrap())
///   .collect();
/// assert_eq!(texts, ["BOOLEAN FALSE", "NULL"]);
/// ```
pub struct StreamingDecoder<R> {
  reader: R,
  limits: DecoderLimits,
  /// Bytes consumed from `reader` so far.
  offset: usize,
  state: StreamState,
}

/// Internal state machine for the streaming decoder.
///
/// ```text
///   ReadValues ──(end of input | error)──▶ Done
/// ```
///
/// Once `Done`, every call to `next` returns `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
  ReadValues,
  Done,
}

impl<R: Read> StreamingDecoder<R> {
  /// Create a decoder with [`DecoderLimits::default`].
  #[must_use]
  pub fn new(reader: R) -> Self {
    Self::with_limits(reader, DecoderLimits::default())
  }

  #[must_use]
  pub fn with_limits(reader: R, limits: DecoderLimits) -> Self {
    Self {
      reader,
      limits,
      offset: 0,
      state: StreamState::ReadValues,
    }
  }

  /// Number of bytes consumed from the reader so far.
  #[must_use]
  pub fn offset(&self) -> usize {
    self.offset
  }

  #[must_use]
  pub fn limits(&self) -> DecoderLimits {
    self.limits
  }

  /// Give back the reader, positioned just after the last consumed byte.
  pub fn into_inner(self) -> R {
    self.reader
  }

  /// Read one complete top-level value.
  ///
  /// Returns `Ok(None)` only when the input ends exactly on a value
  /// boundary.
  fn read_value(&mut self) -> Result<Option<Value>, DecodeError> {
    let start = self.offset;
    let Some(first) = self.read_octet()? else {
      return Ok(None);
    };

    let mut raw = Vec::with_capacity(4);
    let header = self.read_header(first, start, &mut raw)?;
    if header.is_end_of_contents() {
      return Err(DecodeError::UnexpectedEndOfContents { offset: start });
    }

    let identifier = header.identifier;
    match header.length {
      Length::Definite(declared) => {
        let mut contents = Vec::new();
        self.read_contents_into(declared, start, &mut contents)?;
        Ok(Some(Value::new(identifier, contents, false)))
      }
      Length::Indefinite => {
        if !identifier.constructed {
          return Err(DecodeError::IndefinitePrimitive { offset: start });
        }
        let mut contents = Vec::new();
        self.read_indefinite(1, &mut contents)?;
        Ok(Some(Value::new(identifier, contents, true)))
      }
    }
  }

  /// Read identifier and length octets, given the first identifier octet.
  ///
  /// The raw header bytes are appended to `raw` so indefinite contents
  /// can be copied through verbatim.
  fn read_header(
    &mut self,
    first: u8,
    start: usize,
    raw: &mut Vec<u8>,
  ) -> Result<TlvHeader, DecodeError> {
    let header_start = raw.len();
    raw.push(first);

    if Identifier::has_continuation(first) {
      loop {
        let byte = self.require_octet()?;
        raw.push(byte);
        // MSB clear means this is the last tag-number octet
        if byte & 0x80 == 0 {
          break;
        }
        if raw.len() - header_start >= MAX_IDENTIFIER_BYTES {
          return Err(DecodeError::Wire(WireError::Base128Overflow));
        }
      }
    }

    let length_first = self.require_octet()?;
    raw.push(length_first);
    let following = Length::following_octets(length_first);
    if following > MAX_LENGTH_OCTETS {
      return Err(DecodeError::Wire(WireError::LengthOverflow { octets: following }));
    }
    for _ in 0..following {
      let byte = self.require_octet()?;
      raw.push(byte);
    }

    let (header, _) =
      TlvHeader::read_from(&raw[header_start..]).map_err(|e| e.at_offset(start))?;
    Ok(header)
  }

  /// Stream the contents of an indefinite-length value into `out`, up to
  /// (not including) its closing end-of-contents marker.
  ///
  /// Nested values are copied through with their own headers, and nested
  /// indefinite values keep their `00 00` markers, so `out` can later be
  /// walked by a `ContentsReader`.
  fn read_indefinite(&mut self, depth: usize, out: &mut Vec<u8>) -> Result<(), DecodeError> {
    if depth > self.limits.max_depth {
      return Err(DecodeError::NestingTooDeep {
        limit: self.limits.max_depth,
      });
    }

    loop {
      let start = self.offset;
      let first = self.require_octet()?;
      let mark = out.len();
      let header = self.read_header(first, start, out)?;
      if header.is_end_of_contents() {
        out.truncate(mark);
        return Ok(());
      }
      self.check_budget(out.len(), start)?;

      match header.length {
        Length::Definite(declared) => self.read_contents_into(declared, start, out)?,
        Length::Indefinite => {
          if !header.identifier.constructed {
            return Err(DecodeError::IndefinitePrimitive { offset: start });
          }
          self.read_indefinite(depth + 1, out)?;
          out.extend_from_slice(&END_OF_CONTENTS);
          self.check_budget(out.len(), start)?;
        }
      }
    }
  }

  /// Append exactly `declared` content octets to `out`.
  ///
  /// The declared length is checked against what is left of the content
  /// budget before anything is read, and the buffer only grows as bytes
  /// actually arrive, so a short input with a huge declared length costs
  /// nothing.
  fn read_contents_into(
    &mut self,
    declared: u64,
    start: usize,
    out: &mut Vec<u8>,
  ) -> Result<(), DecodeError> {
    let limit = self.limits.max_content_len;
    let budget = limit.saturating_sub(out.len());
    let len = usize::try_from(declared)
      .ok()
      .filter(|&len| len <= budget)
      .ok_or(DecodeError::ContentTooLarge {
        declared,
        limit,
        offset: start,
      })?;

    let read = (&mut self.reader).take(len as u64).read_to_end(out)?;
    self.offset += read;
    if read < len {
      return Err(DecodeError::Truncated {
        offset: self.offset,
      });
    }
    Ok(())
  }

  fn check_budget(&self, buffered: usize, start: usize) -> Result<(), DecodeError> {
    if buffered > self.limits.max_content_len {
      return Err(DecodeError::ContentTooLarge {
        declared: buffered as u64,
        limit: self.limits.max_content_len,
        offset: start,
      });
    }
    Ok(())
  }

  /// Read a single octet; `Ok(None)` at end of input.
  fn read_octet(&mut self) -> Result<Option<u8>, DecodeError> {
    let mut byte = [0u8; 1];
    loop {
      match self.reader.read(&mut byte) {
        Ok(0) => return Ok(None),
        Ok(_) => {
          self.offset += 1;
          return Ok(Some(byte[0]));
        }
        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
        Err(e) => return Err(DecodeError::Io(e)),
      }
    }
  }

  /// Read a single octet that must be present.
  fn require_octet(&mut self) -> Result<u8, DecodeError> {
    self.read_octet()?.ok_or(DecodeError::Truncated {
      offset: self.offset,
    })
  }
}

impl<R: Read> Iterator for StreamingDecoder<R> {
  type Item = Result<Value, DecodeError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.state == StreamState::Done {
      return None;
    }

    match self.read_value() {
      Ok(Some(value)) => Some(Ok(value)),
      Ok(None) => {
        self.state = StreamState::Done;
        None
      }
      Err(e) => {
        self.state = StreamState::Done;
        Some(Err(e))
      }
    }
  }
}

impl<R: Read> FusedIterator for StreamingDecoder<R> {}
