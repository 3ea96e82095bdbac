//! Materialization snapshots: encodings streamed through the bounded
//! decode loop and rendered to canonical text.
//!
//! Snapshots are inline, so a change in rendering shows up as a diff right
//! next to the fixture that produced it. Accept deliberate format changes
//! with `cargo insta review`.

use ber_decoder::DecoderLimits;
use ber_harness::{IterationCap, Stop, decode_bounded_with, wrap};
use ber_tests::{
    boolean, context, indefinite_sequence, integer, null, octet_string, seed_corpus, sequence,
    set, tlv, utf8_string,
};
use ber_wire::{Class, Identifier};
use insta::assert_snapshot;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Materialize every value in `data`, one per line, followed by the stop
/// reason.
fn render(data: &[u8]) -> String {
    let mut lines = Vec::new();
    let report = decode_bounded_with(
        wrap(data),
        IterationCap::DEFAULT,
        DecoderLimits::default(),
        |text| lines.push(text.to_string()),
    );
    lines.push(match report.stop {
        Stop::Exhausted => "-- exhausted".to_string(),
        Stop::CapReached => "-- cap reached".to_string(),
        Stop::Failed(e) => format!("-- failed: {e}"),
    });
    lines.join("\n")
}

fn seed(name: &str) -> Vec<u8> {
    seed_corpus()
        .into_iter()
        .find(|(n, _)| *n == name)
        .map(|(_, bytes)| bytes)
        .unwrap_or_else(|| panic!("no seed named {name}"))
}

// ── Seeds ─────────────────────────────────────────────────────────────────────

#[test]
fn seed_record() {
    assert_snapshot!(render(&seed("record")), @r#"
    SEQUENCE { INTEGER 7, UTF8String "héllo", [0] { OCTET STRING 'DEAD'H }, SET {} }
    -- exhausted
    "#);
}

#[test]
fn seed_integers() {
    assert_snapshot!(render(&seed("integers")), @r"
    INTEGER 0
    INTEGER -129
    INTEGER 9223372036854775807
    -- exhausted
    ");
}

#[test]
fn seed_rsa_oid() {
    assert_snapshot!(render(&seed("rsa_oid")), @r"
    OBJECT IDENTIFIER 1.2.840.113549.1.1.1
    -- exhausted
    ");
}

#[test]
fn seed_indefinite() {
    assert_snapshot!(render(&seed("indefinite")), @r"
    SEQUENCE { NULL, SEQUENCE { BOOLEAN TRUE } }
    -- exhausted
    ");
}

#[test]
fn seed_truncated() {
    assert_snapshot!(render(&seed("truncated")), @"-- failed: input truncated at offset 2");
}

// ── Individual types ──────────────────────────────────────────────────────────

#[test]
fn scalars() {
    let data = [
        boolean(false),
        boolean(true),
        integer(-5),
        null(),
        octet_string(&[0xCA, 0xFE]),
        vec![0x03, 0x02, 0x04, 0xF0],
        vec![0x0A, 0x01, 0x02],
    ]
    .concat();
    assert_snapshot!(render(&data), @r"
    BOOLEAN FALSE
    BOOLEAN TRUE
    INTEGER -5
    NULL
    OCTET STRING 'CAFE'H
    BIT STRING 'F0'H (4 bits)
    ENUMERATED 2
    -- exhausted
    ");
}

#[test]
fn character_strings() {
    let data = [
        utf8_string("hi"),
        tlv(Identifier::universal(19, false), b"Hi there"),
        tlv(Identifier::universal(22, false), b"a@b"),
        vec![0x1E, 0x04, 0x00, 0x68, 0x00, 0x69],
    ]
    .concat();
    assert_snapshot!(render(&data), @r#"
    UTF8String "hi"
    PrintableString "Hi there"
    IA5String "a@b"
    BMPString "hi"
    -- exhausted
    "#);
}

#[test]
fn tagged_values() {
    let data = [
        tlv(Identifier::new(Class::Application, false, 1), &[0xAB]),
        tlv(Identifier::new(Class::ContextSpecific, false, 1000), &[0x01]),
        tlv(Identifier::new(Class::Private, true, 3), &null()),
        context(2, &[]),
        tlv(Identifier::universal(40, false), &[]),
    ]
    .concat();
    assert_snapshot!(render(&data), @r"
    [APPLICATION 1] 'AB'H
    [1000] '01'H
    [PRIVATE 3] { NULL }
    [2] {}
    [UNIVERSAL 40] ''H
    -- exhausted
    ");
}

#[test]
fn constructed_strings_are_flattened() {
    // OCTET STRING (constructed, indefinite) { 'AA'H, 'BB'H }
    let data = [0x24, 0x80, 0x04, 0x01, 0xAA, 0x04, 0x01, 0xBB, 0x00, 0x00];
    assert_snapshot!(render(&data), @r"
    OCTET STRING 'AABB'H
    -- exhausted
    ");
}

#[test]
fn nested_collections() {
    let data = sequence(&[
        set(&[integer(1), integer(2)]),
        indefinite_sequence(&[context(0, &[boolean(false)])]),
    ]);
    assert_snapshot!(render(&data), @r"
    SEQUENCE { SET { INTEGER 1, INTEGER 2 }, SEQUENCE { [0] { BOOLEAN FALSE } } }
    -- exhausted
    ");
}

#[test]
fn lazy_child_error_surfaces_after_earlier_values() {
    // NULL, then SEQUENCE { BOOLEAN with two contents octets }
    let data = [null(), vec![0x30, 0x04, 0x01, 0x02, 0x00, 0x00]].concat();
    let text = render(&data);
    assert!(text.starts_with("NULL\n-- failed: "), "{text}");
}
