//! Seed corpus generator for the `streaming_decode` fuzz target.
//!
//! Writes one file per entry of [`ber_tests::seed_corpus`] into
//! `fuzz/corpus/streaming_decode/` at the workspace root. libFuzzer reads
//! the directory as its starting corpus and adds to it as it finds new
//! coverage.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_corpus -p ber-tests
//! cd fuzz && cargo +nightly fuzz run streaming_decode corpus/streaming_decode
//! ```

#![allow(clippy::pedantic)]

use std::path::{Path, PathBuf};

fn main() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let corpus_dir = manifest_dir.join("../../fuzz/corpus/streaming_decode");

    for (name, bytes) in ber_tests::seed_corpus() {
        write_file(&corpus_dir.join(name), &bytes);
    }

    println!("Seed corpus written to {}", corpus_dir.display());
}

fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all");
    }
    std::fs::write(path, data).expect("write_file");
    println!("  wrote {} ({} bytes)", path.display(), data.len());
}
