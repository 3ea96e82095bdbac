#![no_main]

use arbitrary::Arbitrary;
use ber_wire::{Class, Identifier};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzIdentifier {
    class: u8,
    constructed: bool,
    tag_number: u64,
}

// Fuzz target: Identifier write->read roundtrip.
//
// Any class, form, and u64 tag number must encode to octets that decode
// back to the same identifier, consuming exactly what was written.
fuzz_target!(|input: FuzzIdentifier| {
    let identifier = Identifier::new(
        Class::from_octet(input.class),
        input.constructed,
        input.tag_number,
    );

    let mut buf = Vec::new();
    let written = identifier.encode_into(&mut buf);
    assert_eq!(written, buf.len());

    let (parsed, consumed) = Identifier::read_from(&buf).unwrap();
    assert_eq!(parsed, identifier);
    assert_eq!(consumed, written);
});
