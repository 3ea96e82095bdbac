use crate::error::WireError;

/// Maximum number of octets a `u64` base-128 value can occupy.
/// ceil(64 / 7) = 10 octets.
pub const MAX_BASE128_BYTES: usize = 10;

/// Encode a `u64` as a big-endian base-128 value into the provided buffer.
///
/// This is the form X.690 uses for high tag numbers and for object
/// identifier sub-identifiers: most significant group first, bit 8 set
/// on every octet except the last.
///
/// # Returns
///
/// The number of bytes written (1–10).
///
/// # Panics
///
/// Panics if `buf` is shorter than the required encoding length.
/// A 10-byte buffer is always sufficient for any `u64`.
///
/// # Wire format examples
///
/// | Value   | Encoded bytes        | Length |
/// |---------|----------------------|--------|
/// | 0       | `[0x00]`             | 1      |
/// | 127     | `[0x7F]`             | 1      |
/// | 128     | `[0x81, 0x00]`       | 2      |
/// | 113549  | `[0x86, 0xF7, 0x0D]` | 3      |
pub fn encode_base128(value: u64, buf: &mut [u8]) -> usize {
    let mut groups = 1;
    let mut rest = value >> 7;
    while rest > 0 {
        groups += 1;
        rest >>= 7;
    }
    assert!(buf.len() >= groups, "base-128 buffer too small");

    for (i, slot) in buf.iter_mut().take(groups).enumerate() {
        let shift = 7 * (groups - 1 - i);
        #[allow(clippy::cast_possible_truncation)]
        let mut byte = ((value >> shift) & 0x7F) as u8;
        if i + 1 < groups {
            byte |= 0x80;
        }
        *slot = byte;
    }
    groups
}

/// Decode a big-endian base-128 value from the provided byte slice.
///
/// # Returns
///
/// `(decoded_value, bytes_consumed)` on success.
///
/// # Errors
///
/// - [`WireError::NonMinimalBase128`] if the first octet is `0x80`.
/// - [`WireError::Base128Overflow`] if the value needs more than 64 bits.
/// - [`WireError::UnexpectedEof`] if the slice ends mid-value.
pub fn decode_base128(buf: &[u8]) -> Result<(u64, usize), WireError> {
    let mut result: u64 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i == 0 && byte == 0x80 {
            return Err(WireError::NonMinimalBase128);
        }

        // Shifting would push set bits off the top
        if result > (u64::MAX >> 7) {
            return Err(WireError::Base128Overflow);
        }
        result = (result << 7) | u64::from(byte & 0x7F);

        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    Err(WireError::UnexpectedEof { offset: buf.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = [0u8; MAX_BASE128_BYTES];
        let len = encode_base128(value, &mut buf);
        buf[..len].to_vec()
    }

    #[test]
    fn encode_zero() {
        assert_eq!(encode(0), vec![0x00]);
    }

    #[test]
    fn encode_127() {
        assert_eq!(encode(127), vec![0x7F]);
    }

    #[test]
    fn encode_128() {
        // Big-endian: the high group comes first
        assert_eq!(encode(128), vec![0x81, 0x00]);
    }

    #[test]
    fn encode_rsa_arc() {
        // 113549 from 1.2.840.113549
        assert_eq!(encode(113_549), vec![0x86, 0xF7, 0x0D]);
    }

    #[test]
    fn encode_u64_max() {
        assert_eq!(encode(u64::MAX).len(), MAX_BASE128_BYTES);
    }

    #[test]
    fn boundary_values_decode_to_themselves() {
        for value in [0, 1, 127, 128, 16_383, 16_384, u64::from(u32::MAX), u64::MAX] {
            let encoded = encode(value);
            let (decoded, consumed) = decode_base128(&encoded).unwrap();
            assert_eq!(decoded, value, "mismatch for {value}");
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn decode_stops_at_last_octet() {
        let (value, consumed) = decode_base128(&[0x86, 0xF7, 0x0D, 0x01]).unwrap();
        assert_eq!(value, 113_549);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn decode_empty_input() {
        assert!(matches!(
            decode_base128(&[]),
            Err(WireError::UnexpectedEof { offset: 0 })
        ));
    }

    #[test]
    fn decode_truncated() {
        assert!(matches!(
            decode_base128(&[0x81]),
            Err(WireError::UnexpectedEof { offset: 1 })
        ));
    }

    #[test]
    fn decode_rejects_padding() {
        assert!(matches!(
            decode_base128(&[0x80, 0x01]),
            Err(WireError::NonMinimalBase128)
        ));
    }

    #[test]
    fn decode_rejects_overflow() {
        // 11 groups of 7 bits cannot fit in a u64
        let mut buf = vec![0xFF; 10];
        buf.push(0x7F);
        assert!(matches!(
            decode_base128(&buf),
            Err(WireError::Base128Overflow)
        ));
    }
}
