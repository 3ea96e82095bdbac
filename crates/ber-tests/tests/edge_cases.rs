//! Hostile-input edge cases for the decoder as seen through the harness.
//!
//! Each case is something a fuzzer finds within seconds and that must end
//! as an ordinary expected error, cheaply:
//!
//! - **Oversized lengths**: a declared length of gigabytes must be
//!   rejected before anything is allocated.
//! - **Deep nesting**: definite nesting is bounded at materialization,
//!   indefinite nesting while streaming.
//! - **Misplaced markers**: `00 00` at the top level, indefinite length on
//!   a primitive, an indefinite value that never closes.
//! - **Invalid contents**: values whose header is fine but whose contents
//!   break their type's rules.

use ber_decoder::{DecodeError, DecoderLimits, StreamingDecoder, TypeError};
use ber_harness::{Harness, HarnessConfig, IterationReport, TerminalState};
use ber_tests::{nested_indefinite, nested_sequences, null, octet_string};

fn run(data: &[u8]) -> IterationReport {
    Harness::default()
        .run(data)
        .unwrap_or_else(|e| panic!("unexpected failure: {e}"))
}

fn first_error(data: &[u8]) -> DecodeError {
    StreamingDecoder::new(data)
        .find_map(Result::err)
        .expect("decoder should report an error")
}

fn assert_expected(data: &[u8]) -> IterationReport {
    let report = run(data);
    assert_eq!(
        report.state,
        TerminalState::ExpectedError,
        "input {}",
        hex::encode(data)
    );
    report
}

// ── Oversized lengths ─────────────────────────────────────────────────────────

#[test]
fn gigabyte_declared_length_is_rejected_up_front() {
    let data = [0x04, 0x84, 0x40, 0x00, 0x00, 0x00, 0xAA];
    let report = assert_expected(&data);
    assert_eq!(report.consumed, 6, "contents are never read");
    assert!(matches!(
        first_error(&data),
        DecodeError::ContentTooLarge { declared: 0x4000_0000, .. }
    ));
}

#[test]
fn eight_octet_length_does_not_overflow() {
    let data = [0x04, 0x88, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
    assert_expected(&data);
}

#[test]
fn nine_length_octets_are_rejected() {
    let mut data = vec![0x04, 0x89];
    data.extend_from_slice(&[0x00; 9]);
    assert_expected(&data);
}

#[test]
fn content_limit_is_configurable() {
    let harness = Harness::new(HarnessConfig {
        limits: DecoderLimits {
            max_content_len: 4,
            ..DecoderLimits::default()
        },
        ..HarnessConfig::default()
    });

    let report = harness.run(&octet_string(&[1, 2, 3, 4])).unwrap();
    assert_eq!(report.state, TerminalState::Exhausted);

    let report = harness.run(&octet_string(&[1, 2, 3, 4, 5])).unwrap();
    assert_eq!(report.state, TerminalState::ExpectedError);
}

#[test]
fn reserved_length_octet() {
    assert!(matches!(
        first_error(&[0x04, 0xFF]),
        DecodeError::Wire(ber_wire::WireError::ReservedLengthOctet)
    ));
    assert_expected(&[0x04, 0xFF]);
}

// ── Deep nesting ──────────────────────────────────────────────────────────────

#[test]
fn moderate_definite_nesting_materializes() {
    let report = run(&nested_sequences(32));
    assert_eq!(report.state, TerminalState::Exhausted);
    assert_eq!(report.materialized, 1);
}

#[test]
fn deep_definite_nesting_fails_at_materialization() {
    let data = nested_sequences(200);
    // The decoder itself accepts the outer value...
    assert_eq!(StreamingDecoder::new(&data[..]).count(), 1);
    // ...but rendering it hits the depth bound.
    let report = assert_expected(&data);
    assert_eq!(report.materialized, 0);
}

#[test]
fn deep_indefinite_nesting_fails_while_streaming() {
    let data = nested_indefinite(10_000);
    let report = assert_expected(&data);
    assert!(
        report.consumed < 200,
        "decoder gave up after {} bytes",
        report.consumed
    );
    assert!(matches!(
        first_error(&data),
        DecodeError::NestingTooDeep { limit: 64 }
    ));
}

#[test]
fn unterminated_indefinite_nesting_is_truncated() {
    let data = [0x30, 0x80].repeat(8);
    assert!(matches!(
        first_error(&data),
        DecodeError::Truncated { .. }
    ));
}

// ── Misplaced markers ─────────────────────────────────────────────────────────

#[test]
fn top_level_end_of_contents() {
    let data = [null(), vec![0x00, 0x00]].concat();
    let report = assert_expected(&data);
    assert_eq!(report.materialized, 1);
    assert!(matches!(
        first_error(&data),
        DecodeError::UnexpectedEndOfContents { offset: 2 }
    ));
}

#[test]
fn indefinite_length_on_primitive() {
    assert!(matches!(
        first_error(&[0x04, 0x80, 0xAA, 0x00, 0x00]),
        DecodeError::IndefinitePrimitive { offset: 0 }
    ));
}

#[test]
fn non_canonical_marker_fails_wherever_it_sits() {
    let inner = [0x30, 0x80, 0x05, 0x00, 0x00, 0x81, 0x00];
    let wrapped = [&[0x30, 0x07][..], &inner].concat();
    let nested = [&[0x30, 0x80][..], &inner, &[0x00, 0x00]].concat();
    for data in [&inner[..], &wrapped[..], &nested[..], &[0x1F, 0x00, 0x00]] {
        let report = assert_expected(data);
        assert_eq!(report.materialized, 0);
    }
}

#[test]
fn universal_tag_zero_with_contents() {
    // Not an end-of-contents marker, but not a valid value either
    assert_expected(&[0x00, 0x01, 0x00]);
}

// ── Invalid contents ──────────────────────────────────────────────────────────

#[test]
fn contents_errors_are_expected() {
    for data in [
        &[0x01, 0x02, 0x00, 0x00][..],        // BOOLEAN, two octets
        &[0x21, 0x03, 0x01, 0x01, 0x00],      // constructed BOOLEAN
        &[0x05, 0x01, 0x00],                  // NULL with contents
        &[0x0C, 0x01, 0xFF],                  // UTF8String, bad UTF-8
        &[0x13, 0x01, b'@'],                  // PrintableString, '@'
        &[0x06, 0x01, 0x80],                  // OID, dangling continuation
        &[0x03, 0x01, 0x01],                  // BIT STRING, unused bits on nothing
        &[0x10, 0x00],                        // primitive SEQUENCE
        &[0x30, 0x03, 0x04, 0x05, 0xAA],      // child overruns parent
    ] {
        let report = assert_expected(data);
        assert_eq!(report.materialized, 0);
    }
}

#[test]
fn value_after_a_good_one_fails_on_its_own() {
    let data = [0x30, 0x03, 0x01, 0x01, 0x00, 0x05, 0x01, 0x00];
    // Outer SEQUENCE is well formed; the trailing NULL-with-contents is not
    let mut decoder = StreamingDecoder::new(&data[..]);
    let seq = decoder.next().unwrap().unwrap();
    assert_eq!(seq.materialize().unwrap(), "SEQUENCE { BOOLEAN FALSE }");
    let null_value = decoder.next().unwrap().unwrap();
    assert!(matches!(
        null_value.materialize(),
        Err(TypeError::NonEmptyNull { len: 1 })
    ));
}
