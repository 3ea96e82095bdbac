//! BER fixture builders shared by the integration tests, benches, and the
//! seed-corpus generator.
//!
//! Everything here returns complete encodings as `Vec<u8>`, so fixtures
//! compose by concatenation:
//!
//! ```rust
//! use ber_tests::{boolean, null, sequence};
//!
//! let bytes = sequence(&[boolean(true), null()]);
//! assert_eq!(bytes, [0x30, 0x05, 0x01, 0x01, 0xFF, 0x05, 0x00]);
//! ```

#![allow(clippy::missing_panics_doc)]

use ber_wire::base128::{MAX_BASE128_BYTES, encode_base128};
use ber_wire::tlv::{encode_indefinite, encode_tlv};
use ber_wire::{Class, Identifier};

// ── Primitives ────────────────────────────────────────────────────────────────

#[must_use]
pub fn tlv(identifier: Identifier, contents: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(contents.len() + 4);
    encode_tlv(identifier, contents, &mut out);
    out
}

#[must_use]
pub fn boolean(value: bool) -> Vec<u8> {
    tlv(Identifier::universal(1, false), &[if value { 0xFF } else { 0x00 }])
}

/// Minimal two's-complement INTEGER.
#[must_use]
pub fn integer(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    tlv(Identifier::universal(2, false), &bytes[start..])
}

#[must_use]
pub fn null() -> Vec<u8> {
    tlv(Identifier::universal(5, false), &[])
}

#[must_use]
pub fn octet_string(data: &[u8]) -> Vec<u8> {
    tlv(Identifier::universal(4, false), data)
}

#[must_use]
pub fn utf8_string(text: &str) -> Vec<u8> {
    tlv(Identifier::universal(12, false), text.as_bytes())
}

/// OBJECT IDENTIFIER from its arcs; needs at least two.
#[must_use]
pub fn object_identifier(arcs: &[u64]) -> Vec<u8> {
    assert!(arcs.len() >= 2, "an OID has at least two arcs");
    let mut contents = Vec::new();
    let mut buf = [0u8; MAX_BASE128_BYTES];
    let first = arcs[0] * 40 + arcs[1];
    for arc in std::iter::once(first).chain(arcs[2..].iter().copied()) {
        let n = encode_base128(arc, &mut buf);
        contents.extend_from_slice(&buf[..n]);
    }
    tlv(Identifier::universal(6, false), &contents)
}

// ── Constructed ───────────────────────────────────────────────────────────────

#[must_use]
pub fn sequence(children: &[Vec<u8>]) -> Vec<u8> {
    tlv(Identifier::universal(16, true), &children.concat())
}

#[must_use]
pub fn set(children: &[Vec<u8>]) -> Vec<u8> {
    tlv(Identifier::universal(17, true), &children.concat())
}

/// SEQUENCE in indefinite-length form, closed by `00 00`.
#[must_use]
pub fn indefinite_sequence(children: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    encode_indefinite(Identifier::universal(16, true), &children.concat(), &mut out);
    out
}

/// Constructed context-specific `[tag]` wrapping `children`.
#[must_use]
pub fn context(tag: u64, children: &[Vec<u8>]) -> Vec<u8> {
    tlv(
        Identifier::new(Class::ContextSpecific, true, tag),
        &children.concat(),
    )
}

// ── Shapes ────────────────────────────────────────────────────────────────────

/// `count` back-to-back NULLs, the cheapest possible top-level values.
#[must_use]
pub fn repeated_nulls(count: usize) -> Vec<u8> {
    null().repeat(count)
}

/// `depth` SEQUENCEs nested inside each other around one NULL.
#[must_use]
pub fn nested_sequences(depth: usize) -> Vec<u8> {
    (0..depth).fold(null(), |inner, _| sequence(&[inner]))
}

/// `depth` indefinite-length SEQUENCEs nested inside each other,
/// properly terminated.
#[must_use]
pub fn nested_indefinite(depth: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(depth * 4);
    for _ in 0..depth {
        out.extend_from_slice(&[0x30, 0x80]);
    }
    for _ in 0..depth {
        out.extend_from_slice(&[0x00, 0x00]);
    }
    out
}

/// Seed inputs for the `streaming_decode` fuzz target, by file name.
#[must_use]
pub fn seed_corpus() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("boolean_false", boolean(false)),
        ("integers", [integer(0), integer(-129), integer(i64::MAX)].concat()),
        ("rsa_oid", object_identifier(&[1, 2, 840, 113_549, 1, 1, 1])),
        (
            "record",
            sequence(&[
                integer(7),
                utf8_string("héllo"),
                context(0, &[octet_string(&[0xDE, 0xAD])]),
                set(&[]),
            ]),
        ),
        (
            "indefinite",
            indefinite_sequence(&[null(), indefinite_sequence(&[boolean(true)])]),
        ),
        ("nested", nested_sequences(8)),
        ("many_nulls", repeated_nulls(150)),
        ("truncated", vec![0x01, 0x01]),
    ]
}
