use std::fmt::Write as _;

use ber_wire::base128::decode_base128;
use ber_wire::{Class, Identifier};

use crate::contents::ContentsReader;
use crate::error::TypeError;
use crate::tag::UniversalTag;

/// Integers up to this many octets are rendered in decimal via `i128`.
const MAX_DECIMAL_INTEGER_BYTES: usize = 16;

/// Render one TLV at `depth` to canonical text.
///
/// ```text
/// ┌─────────────────────────┬──────────────────────────────────────┐
/// │ Value                   │ Text                                 │
/// ├─────────────────────────┼──────────────────────────────────────┤
/// │ 01 01 00                │ BOOLEAN FALSE                        │
/// │ 02 01 FB                │ INTEGER -5                           │
/// │ 06 03 2A 86 48          │ OBJECT IDENTIFIER 1.2.840            │
/// │ 30 05 02 01 01 05 00    │ SEQUENCE { INTEGER 1, NULL }         │
/// │ A0 03 04 01 FF          │ [0] { OCTET STRING 'FF'H }           │
/// │ 0C 02 68 69             │ UTF8String "hi"                      │
/// └─────────────────────────┴──────────────────────────────────────┘
/// ```
pub(crate) fn render_tlv(
    identifier: Identifier,
    contents: &[u8],
    depth: usize,
    max_depth: usize,
    out: &mut String,
) -> Result<(), TypeError> {
    let label = match identifier.class {
        Class::Universal => {
            let tag = UniversalTag::from_number(identifier.tag_number);
            return render_universal(tag, identifier.constructed, contents, depth, max_depth, out);
        }
        Class::Application => format!("[APPLICATION {}]", identifier.tag_number),
        Class::ContextSpecific => format!("[{}]", identifier.tag_number),
        Class::Private => format!("[PRIVATE {}]", identifier.tag_number),
    };

    out.push_str(&label);
    out.push(' ');
    if identifier.constructed {
        render_children(contents, depth, max_depth, out)
    } else {
        push_hex(out, contents);
        Ok(())
    }
}

fn render_universal(
    tag: UniversalTag,
    constructed: bool,
    contents: &[u8],
    depth: usize,
    max_depth: usize,
    out: &mut String,
) -> Result<(), TypeError> {
    match tag {
        UniversalTag::EndOfContents => Err(TypeError::InvalidEndOfContents),

        UniversalTag::Sequence | UniversalTag::Set => {
            if !constructed {
                return Err(TypeError::PrimitiveCollection {
                    type_name: tag.name(),
                });
            }
            out.push_str(tag.name());
            out.push(' ');
            render_children(contents, depth, max_depth, out)
        }

        scalar if scalar.is_scalar() && constructed => Err(TypeError::ConstructedScalar {
            type_name: scalar.name(),
        }),

        string if string.is_string() && constructed => {
            let mut data = Vec::with_capacity(contents.len());
            let mut unused = 0u8;
            flatten_segments(string, contents, depth, max_depth, &mut data, &mut unused)?;
            if string == UniversalTag::BitString {
                data.insert(0, unused);
            }
            render_primitive(string, &data, out)
        }

        UniversalTag::External
        | UniversalTag::EmbeddedPdv
        | UniversalTag::CharacterString
        | UniversalTag::Unknown(_)
            if constructed =>
        {
            push_name(out, tag);
            out.push(' ');
            render_children(contents, depth, max_depth, out)
        }

        primitive => render_primitive(primitive, contents, out),
    }
}

fn render_primitive(tag: UniversalTag, contents: &[u8], out: &mut String) -> Result<(), TypeError> {
    let name = tag.name();
    match tag {
        UniversalTag::Boolean => {
            let [octet] = contents else {
                return Err(TypeError::InvalidBoolean {
                    len: contents.len(),
                });
            };
            out.push_str(if *octet == 0 { "BOOLEAN FALSE" } else { "BOOLEAN TRUE" });
        }

        UniversalTag::Integer | UniversalTag::Enumerated => {
            if contents.is_empty() {
                return Err(TypeError::EmptyInteger { type_name: name });
            }
            out.push_str(name);
            out.push(' ');
            push_integer(out, contents);
        }

        UniversalTag::Null => {
            if !contents.is_empty() {
                return Err(TypeError::NonEmptyNull {
                    len: contents.len(),
                });
            }
            out.push_str(name);
        }

        UniversalTag::BitString => {
            let (&unused, bits) = contents.split_first().ok_or(TypeError::InvalidBitString {
                reason: "missing unused-bits octet",
            })?;
            check_unused_bits(unused, bits)?;
            let bit_len = bits.len() * 8 - usize::from(unused);
            out.push_str(name);
            out.push(' ');
            push_hex(out, bits);
            let _ = write!(out, " ({bit_len} bits)");
        }

        UniversalTag::ObjectIdentifier | UniversalTag::RelativeOid => {
            let arcs = decode_arcs(tag, contents)?;
            out.push_str(name);
            out.push(' ');
            out.push_str(&arcs);
        }

        UniversalTag::Real if contents.is_empty() => out.push_str("REAL 0"),

        UniversalTag::Utf8String => {
            let text = std::str::from_utf8(contents)
                .map_err(|_| TypeError::InvalidUtf8 { type_name: name })?;
            push_quoted(out, name, text);
        }

        UniversalTag::NumericString => {
            check_alphabet(name, contents, |b| b.is_ascii_digit() || b == b' ')?;
            push_ascii(out, name, contents);
        }

        UniversalTag::PrintableString => {
            check_alphabet(name, contents, is_printable)?;
            push_ascii(out, name, contents);
        }

        UniversalTag::Ia5String => {
            check_alphabet(name, contents, |b| b.is_ascii())?;
            push_ascii(out, name, contents);
        }

        UniversalTag::VisibleString => {
            check_alphabet(name, contents, |b| (0x20..=0x7E).contains(&b))?;
            push_ascii(out, name, contents);
        }

        UniversalTag::UtcTime | UniversalTag::GeneralizedTime => {
            check_alphabet(name, contents, |b| {
                b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b',' | b'Z')
            })?;
            push_ascii(out, name, contents);
        }

        UniversalTag::BmpString => {
            let text = decode_bmp(contents)?;
            push_quoted(out, name, &text);
        }

        UniversalTag::UniversalString => {
            let text = decode_universal(contents)?;
            push_quoted(out, name, &text);
        }

        UniversalTag::Unknown(_) => {
            push_name(out, tag);
            out.push(' ');
            push_hex(out, contents);
        }

        _ => {
            out.push_str(name);
            out.push(' ');
            push_hex(out, contents);
        }
    }
    Ok(())
}

fn render_children(
    contents: &[u8],
    depth: usize,
    max_depth: usize,
    out: &mut String,
) -> Result<(), TypeError> {
    if depth >= max_depth {
        return Err(TypeError::NestingTooDeep { limit: max_depth });
    }

    let mut reader = ContentsReader::new(contents, depth + 1, max_depth);
    let mut empty = true;

    out.push('{');
    while let Some(child) = reader.next_tlv()? {
        out.push_str(if empty { " " } else { ", " });
        empty = false;
        render_tlv(child.identifier, child.contents, depth + 1, max_depth, out)?;
    }
    out.push_str(if empty { "}" } else { " }" });
    Ok(())
}

/// Concatenate the segments of a constructed string.
///
/// Every segment must carry the same universal tag as the outer value;
/// segments may themselves be constructed. For BIT STRING the
/// unused-bits octet of each segment is stripped, and only the final
/// segment may leave bits unused.
fn flatten_segments(
    tag: UniversalTag,
    contents: &[u8],
    depth: usize,
    max_depth: usize,
    data: &mut Vec<u8>,
    unused: &mut u8,
) -> Result<(), TypeError> {
    if depth >= max_depth {
        return Err(TypeError::NestingTooDeep { limit: max_depth });
    }

    let mut reader = ContentsReader::new(contents, depth + 1, max_depth);
    while let Some(segment) = reader.next_tlv()? {
        let id = segment.identifier;
        if id.class != Class::Universal || id.tag_number != tag.number() {
            return Err(TypeError::MismatchedSegment {
                type_name: tag.name(),
                found: id.tag_number,
            });
        }

        if id.constructed {
            flatten_segments(tag, segment.contents, depth + 1, max_depth, data, unused)?;
            continue;
        }

        if tag == UniversalTag::BitString {
            if *unused != 0 {
                return Err(TypeError::InvalidBitString {
                    reason: "unused bits in a segment that is not the last",
                });
            }
            let (&segment_unused, bits) =
                segment
                    .contents
                    .split_first()
                    .ok_or(TypeError::InvalidBitString {
                        reason: "segment is missing its unused-bits octet",
                    })?;
            check_unused_bits(segment_unused, bits)?;
            data.extend_from_slice(bits);
            *unused = segment_unused;
        } else {
            data.extend_from_slice(segment.contents);
        }
    }
    Ok(())
}

fn check_unused_bits(unused: u8, bits: &[u8]) -> Result<(), TypeError> {
    if unused > 7 {
        return Err(TypeError::InvalidBitString {
            reason: "unused-bits octet greater than 7",
        });
    }
    if bits.is_empty() && unused != 0 {
        return Err(TypeError::InvalidBitString {
            reason: "unused bits declared on an empty string",
        });
    }
    Ok(())
}

/// Two's-complement integer: decimal when it fits `i128`, hex otherwise.
fn push_integer(out: &mut String, contents: &[u8]) {
    if contents.len() > MAX_DECIMAL_INTEGER_BYTES {
        out.push_str("0x");
        out.push_str(&hex::encode_upper(contents));
        return;
    }

    let fill = if contents[0] & 0x80 == 0 { 0x00 } else { 0xFF };
    let mut bytes = [fill; MAX_DECIMAL_INTEGER_BYTES];
    bytes[MAX_DECIMAL_INTEGER_BYTES - contents.len()..].copy_from_slice(contents);
    let _ = write!(out, "{}", i128::from_be_bytes(bytes));
}

/// Decode OID / RELATIVE-OID sub-identifiers into dotted form.
///
/// For OBJECT IDENTIFIER the first sub-identifier packs the first two
/// arcs as `40 * a + b`, with `a` capped at 2.
fn decode_arcs(tag: UniversalTag, contents: &[u8]) -> Result<String, TypeError> {
    let type_name = tag.name();
    if contents.is_empty() {
        return Err(TypeError::EmptyObjectIdentifier { type_name });
    }

    let mut text = String::new();
    let mut pos = 0;
    while pos < contents.len() {
        let (arc, n) = decode_base128(&contents[pos..]).map_err(|source| {
            TypeError::InvalidObjectIdentifier {
                type_name,
                offset: pos,
                source,
            }
        })?;

        if pos == 0 && tag == UniversalTag::ObjectIdentifier {
            let (first, second) = match arc {
                0..=39 => (0, arc),
                40..=79 => (1, arc - 40),
                _ => (2, arc - 80),
            };
            let _ = write!(text, "{first}.{second}");
        } else {
            if !text.is_empty() {
                text.push('.');
            }
            let _ = write!(text, "{arc}");
        }
        pos += n;
    }
    Ok(text)
}

fn decode_bmp(contents: &[u8]) -> Result<String, TypeError> {
    let type_name = UniversalTag::BmpString.name();
    if contents.len() % 2 != 0 {
        return Err(TypeError::InvalidStringLength {
            type_name,
            len: contents.len(),
            unit: 2,
        });
    }
    let units = contents
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| TypeError::InvalidCodePoint { type_name })
}

fn decode_universal(contents: &[u8]) -> Result<String, TypeError> {
    let type_name = UniversalTag::UniversalString.name();
    if contents.len() % 4 != 0 {
        return Err(TypeError::InvalidStringLength {
            type_name,
            len: contents.len(),
            unit: 4,
        });
    }
    contents
        .chunks_exact(4)
        .map(|quad| {
            char::from_u32(u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]))
                .ok_or(TypeError::InvalidCodePoint { type_name })
        })
        .collect()
}

fn is_printable(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b' ' | b'\'' | b'(' | b')' | b'+' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?'
        )
}

fn check_alphabet(
    type_name: &'static str,
    contents: &[u8],
    allowed: impl Fn(u8) -> bool,
) -> Result<(), TypeError> {
    match contents.iter().position(|&b| !allowed(b)) {
        Some(offset) => Err(TypeError::InvalidCharacter {
            type_name,
            byte: contents[offset],
            offset,
        }),
        None => Ok(()),
    }
}

fn push_name(out: &mut String, tag: UniversalTag) {
    if let UniversalTag::Unknown(number) = tag {
        let _ = write!(out, "[UNIVERSAL {number}]");
    } else {
        out.push_str(tag.name());
    }
}

fn push_hex(out: &mut String, bytes: &[u8]) {
    out.push('\'');
    out.push_str(&hex::encode_upper(bytes));
    out.push_str("'H");
}

fn push_quoted(out: &mut String, name: &str, text: &str) {
    let _ = write!(out, "{name} {text:?}");
}

/// Alphabet already checked, so every octet is ASCII.
fn push_ascii(out: &mut String, name: &str, contents: &[u8]) {
    let text: String = contents.iter().map(|&b| char::from(b)).collect();
    push_quoted(out, name, &text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bytes: &[u8]) -> Result<String, TypeError> {
        let mut reader = ContentsReader::new(bytes, 0, 16);
        let tlv = reader.next_tlv()?.expect("one value");
        let mut out = String::new();
        render_tlv(tlv.identifier, tlv.contents, 0, 16, &mut out)?;
        Ok(out)
    }

    #[test]
    fn booleans() {
        assert_eq!(render(&[0x01, 0x01, 0x00]).unwrap(), "BOOLEAN FALSE");
        assert_eq!(render(&[0x01, 0x01, 0x01]).unwrap(), "BOOLEAN TRUE");
        assert!(matches!(
            render(&[0x01, 0x00]),
            Err(TypeError::InvalidBoolean { len: 0 })
        ));
    }

    #[test]
    fn integers() {
        assert_eq!(render(&[0x02, 0x01, 0xFB]).unwrap(), "INTEGER -5");
        assert_eq!(render(&[0x02, 0x02, 0x01, 0x00]).unwrap(), "INTEGER 256");
        assert_eq!(render(&[0x0A, 0x01, 0x03]).unwrap(), "ENUMERATED 3");
        assert!(matches!(
            render(&[0x02, 0x00]),
            Err(TypeError::EmptyInteger { .. })
        ));
    }

    #[test]
    fn huge_integer_renders_hex() {
        let mut bytes = vec![0x02, 0x11];
        bytes.extend(std::iter::repeat_n(0x7F, 17));
        let text = render(&bytes).unwrap();
        assert!(text.starts_with("INTEGER 0x7F7F"));
    }

    #[test]
    fn null_must_be_empty() {
        assert_eq!(render(&[0x05, 0x00]).unwrap(), "NULL");
        assert!(matches!(
            render(&[0x05, 0x01, 0x00]),
            Err(TypeError::NonEmptyNull { len: 1 })
        ));
    }

    #[test]
    fn bit_strings() {
        assert_eq!(
            render(&[0x03, 0x02, 0x04, 0xF0]).unwrap(),
            "BIT STRING 'F0'H (4 bits)"
        );
        assert!(render(&[0x03, 0x01, 0x08]).is_err());
        assert!(render(&[0x03, 0x01, 0x01]).is_err());
        assert!(render(&[0x03, 0x00]).is_err());
    }

    #[test]
    fn object_identifiers() {
        assert_eq!(
            render(&[0x06, 0x06, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D]).unwrap(),
            "OBJECT IDENTIFIER 1.2.840.113549"
        );
        assert_eq!(render(&[0x06, 0x01, 0x51]).unwrap(), "OBJECT IDENTIFIER 2.1");
        assert_eq!(render(&[0x0D, 0x02, 0x01, 0x02]).unwrap(), "RELATIVE-OID 1.2");
        assert!(matches!(
            render(&[0x06, 0x00]),
            Err(TypeError::EmptyObjectIdentifier { .. })
        ));
        assert!(matches!(
            render(&[0x06, 0x02, 0x2A, 0x86]),
            Err(TypeError::InvalidObjectIdentifier { offset: 1, .. })
        ));
    }

    #[test]
    fn strings() {
        assert_eq!(render(&[0x0C, 0x02, b'h', b'i']).unwrap(), "UTF8String \"hi\"");
        assert_eq!(render(&[0x13, 0x02, b'A', b'1']).unwrap(), "PrintableString \"A1\"");
        assert!(matches!(
            render(&[0x13, 0x01, b'*']),
            Err(TypeError::InvalidCharacter { byte: b'*', offset: 0, .. })
        ));
        assert!(matches!(
            render(&[0x0C, 0x01, 0xFF]),
            Err(TypeError::InvalidUtf8 { .. })
        ));
        assert_eq!(render(&[0x1E, 0x02, 0x00, b'A']).unwrap(), "BMPString \"A\"");
        assert!(matches!(
            render(&[0x1E, 0x01, 0x00]),
            Err(TypeError::InvalidStringLength { unit: 2, .. })
        ));
        assert!(matches!(
            render(&[0x1C, 0x04, 0x00, 0x11, 0x00, 0x00]),
            Err(TypeError::InvalidCodePoint { .. })
        ));
    }

    #[test]
    fn collections_and_tags() {
        assert_eq!(
            render(&[0x30, 0x05, 0x02, 0x01, 0x01, 0x05, 0x00]).unwrap(),
            "SEQUENCE { INTEGER 1, NULL }"
        );
        assert_eq!(render(&[0x31, 0x00]).unwrap(), "SET {}");
        assert_eq!(
            render(&[0xA0, 0x03, 0x04, 0x01, 0xFF]).unwrap(),
            "[0] { OCTET STRING 'FF'H }"
        );
        assert_eq!(render(&[0x41, 0x01, 0xAB]).unwrap(), "[APPLICATION 1] 'AB'H");
        assert_eq!(render(&[0x1F, 0x28, 0x00]).unwrap(), "[UNIVERSAL 40] ''H");
    }

    #[test]
    fn form_mismatches() {
        assert!(matches!(
            render(&[0x10, 0x00]),
            Err(TypeError::PrimitiveCollection { .. })
        ));
        assert!(matches!(
            render(&[0x21, 0x03, 0x01, 0x01, 0x00]),
            Err(TypeError::ConstructedScalar { .. })
        ));
    }

    #[test]
    fn constructed_octet_string_concatenates() {
        // OCTET STRING (constructed) { 'AB'H, 'CD'H }
        let bytes = [0x24, 0x08, 0x04, 0x01, 0xAB, 0x04, 0x01, 0xCD, 0x05, 0x00];
        let mut reader = ContentsReader::new(&bytes[..], 0, 16);
        let tlv = reader.next_tlv().unwrap().unwrap();
        let mut out = String::new();
        // The trailing NULL sits inside the declared contents, so it is a
        // mismatched segment.
        assert!(matches!(
            render_tlv(tlv.identifier, tlv.contents, 0, 16, &mut out),
            Err(TypeError::MismatchedSegment { found: 5, .. })
        ));

        let bytes = [0x24, 0x06, 0x04, 0x01, 0xAB, 0x04, 0x01, 0xCD];
        assert_eq!(render(&bytes).unwrap(), "OCTET STRING 'ABCD'H");
    }

    #[test]
    fn constructed_bit_string_keeps_last_unused_bits() {
        let bytes = [0x23, 0x08, 0x03, 0x02, 0x00, 0xFF, 0x03, 0x02, 0x04, 0xF0];
        assert_eq!(render(&bytes).unwrap(), "BIT STRING 'FFF0'H (12 bits)");

        let bad = [0x23, 0x08, 0x03, 0x02, 0x04, 0xF0, 0x03, 0x02, 0x00, 0xFF];
        assert!(matches!(
            render(&bad),
            Err(TypeError::InvalidBitString { .. })
        ));
    }

    #[test]
    fn end_of_contents_as_value() {
        assert!(matches!(
            render(&[0x00, 0x01, 0x00]),
            Err(TypeError::InvalidEndOfContents)
        ));
    }
}
