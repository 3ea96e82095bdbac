#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: Identifier::read_from on raw bytes.
//
// Catches bugs in:
// - low-tag vs high-tag form detection
// - base-128 tag numbers (overflow past u64, non-minimal 0x80 lead octet)
// - empty and truncated input
fuzz_target!(|data: &[u8]| {
    if let Ok((identifier, n)) = ber_wire::Identifier::read_from(data) {
        assert!(n >= 1 && n <= data.len());
        assert!(n <= ber_wire::identifier::MAX_IDENTIFIER_BYTES);
        if n == 1 {
            assert!(identifier.tag_number < 31);
        }
    }
});
