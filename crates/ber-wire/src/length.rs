use crate::error::WireError;

/// Initial length octet announcing the indefinite form.
pub const INDEFINITE: u8 = 0x80;

/// Initial length octet reserved by X.690 for future extension.
pub const RESERVED: u8 = 0xFF;

/// Long-form lengths are capped at what fits in a `u64`.
pub const MAX_LENGTH_OCTETS: usize = 8;

/// BER length octets.
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────┐
/// │ Initial octet │ Meaning                                      │
/// ├───────────────┼──────────────────────────────────────────────┤
/// │ 0x00..=0x7F   │ short form, the octet is the length          │
/// │ 0x80          │ indefinite, contents end at 00 00            │
/// │ 0x81..=0xFE   │ long form, low 7 bits count length octets    │
/// │ 0xFF          │ reserved                                     │
/// └───────────────┴──────────────────────────────────────────────┘
/// ```
///
/// BER allows leading zero octets in the long form, so `0x82 0x00 0x05`
/// is a valid (if wasteful) way to say five.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Length {
    Definite(u64),
    Indefinite,
}

impl Length {
    /// Number of length octets that follow the initial octet.
    ///
    /// Zero for short form, indefinite form, and the reserved octet; the
    /// streaming decoder uses this to know how many more bytes to pull
    /// before handing the whole run to [`read_from`](Self::read_from).
    #[must_use]
    pub fn following_octets(first: u8) -> usize {
        match first {
            0x81..=0xFE => usize::from(first & 0x7F),
            _ => 0,
        }
    }

    /// Read length octets from the front of `buf`.
    ///
    /// # Returns
    ///
    /// `(length, bytes_consumed)` on success.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if `buf` ends inside the length.
    /// - [`WireError::ReservedLengthOctet`] for an initial `0xFF`.
    /// - [`WireError::LengthOverflow`] if more than 8 length octets follow.
    pub fn read_from(buf: &[u8]) -> Result<(Self, usize), WireError> {
        let first = *buf.first().ok_or(WireError::UnexpectedEof { offset: 0 })?;

        match first {
            0x00..=0x7F => Ok((Self::Definite(u64::from(first)), 1)),
            INDEFINITE => Ok((Self::Indefinite, 1)),
            RESERVED => Err(WireError::ReservedLengthOctet),
            _ => {
                let count = Self::following_octets(first);
                if count > MAX_LENGTH_OCTETS {
                    return Err(WireError::LengthOverflow { octets: count });
                }

                let octets = buf
                    .get(1..=count)
                    .ok_or(WireError::UnexpectedEof { offset: buf.len() })?;
                let value = octets
                    .iter()
                    .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));
                Ok((Self::Definite(value), 1 + count))
            }
        }
    }

    /// Append the length octets to `out`, using the shortest definite form.
    ///
    /// # Returns
    ///
    /// The number of bytes appended.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> usize {
        match *self {
            Self::Indefinite => {
                out.push(INDEFINITE);
                1
            }
            Self::Definite(len) if len < 0x80 => {
                #[allow(clippy::cast_possible_truncation)]
                out.push(len as u8);
                1
            }
            Self::Definite(len) => {
                let bytes = len.to_be_bytes();
                let skip = bytes.iter().take_while(|&&b| b == 0).count();
                let significant = &bytes[skip..];
                #[allow(clippy::cast_possible_truncation)]
                out.push(0x80 | significant.len() as u8);
                out.extend_from_slice(significant);
                1 + significant.len()
            }
        }
    }

    /// Write the length octets to the provided writer.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Io`] if the writer fails.
    pub fn write_to(&self, w: &mut impl std::io::Write) -> Result<usize, WireError> {
        let mut buf = Vec::with_capacity(1 + MAX_LENGTH_OCTETS);
        let n = self.encode_into(&mut buf);
        w.write_all(&buf)?;
        Ok(n)
    }
}
