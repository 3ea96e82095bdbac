#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: the harness callback.
//
// Wraps the input as a stream, pulls up to the iteration cap of values
// from the streaming decoder, materializes each one, and swallows the
// decoder's domain errors. Anything the engine sees is a real finding:
// - panics in the decoder or in materialization
// - a reader failure surfacing as an unexpected failure
// - hangs (engine -timeout) and runaway allocation (engine -rss_limit_mb)
//
// Configuration comes from BERFUZZ_* environment variables, read once.
fuzz_target!(
    init: {
        if let Err(e) = ber_harness::setup() {
            panic!("invalid harness configuration: {e}");
        }
        // Warm-up input so some coverage is recorded before mutation starts
        ber_harness::run_iteration(b"initial");
    },
    |data: &[u8]| {
        ber_harness::run_iteration(data);
    }
);
