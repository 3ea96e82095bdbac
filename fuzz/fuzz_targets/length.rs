#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: Length::read_from on raw bytes.
//
// Catches bugs in:
// - short / long / indefinite form selection
// - the reserved 0xFF octet
// - long forms with more octets than fit a u64
// - long forms cut short by the end of input
fuzz_target!(|data: &[u8]| {
    if let Ok((_, n)) = ber_wire::Length::read_from(data) {
        assert_eq!(n, 1 + ber_wire::Length::following_octets(data[0]));
    }
});
