use std::hint::black_box;
use std::io::Read;

use ber_decoder::{DecodeError, DecoderLimits, StreamingDecoder};

use crate::config::IterationCap;

/// Why the loop stopped pulling values.
///
/// ```text
///   INIT ──▶ READING ──┬──▶ Exhausted    decoder returned None
///                      ├──▶ CapReached   counter hit the cap
///                      └──▶ Failed(e)    decode or materialization error
/// ```
#[derive(Debug)]
pub enum Stop {
    Exhausted,
    CapReached,
    /// Not yet classified; see [`classify`](crate::classify).
    Failed(DecodeError),
}

/// Outcome of one bounded decode run.
#[derive(Debug)]
pub struct LoopReport {
    pub stop: Stop,
    /// Values fully materialized before stopping.
    pub materialized: usize,
    /// Bytes the decoder had pulled from the stream when the loop stopped.
    pub consumed: usize,
}

/// Pull and materialize up to `cap` values from `stream`.
///
/// Materialized text is passed through [`black_box`] and dropped.
pub fn decode_bounded<R: Read>(stream: R, cap: IterationCap, limits: DecoderLimits) -> LoopReport {
    decode_bounded_with(stream, cap, limits, |text| {
        black_box(text);
    })
}

/// Like [`decode_bounded`], handing each materialized value to `on_value`.
///
/// Every value is rendered in full before it counts, which is what forces
/// the lazily-held children of constructed values to be validated. Once
/// the counter reaches `cap` the loop returns without asking the decoder
/// for anything more, so input past the last counted value is never read.
pub fn decode_bounded_with<R, F>(
    stream: R,
    cap: IterationCap,
    limits: DecoderLimits,
    mut on_value: F,
) -> LoopReport
where
    R: Read,
    F: FnMut(&str),
{
    let mut decoder = StreamingDecoder::with_limits(stream, limits);
    let mut materialized = 0;

    let stop = loop {
        let value = match decoder.next() {
            None => break Stop::Exhausted,
            Some(Err(e)) => break Stop::Failed(e),
            Some(Ok(value)) => value,
        };

        match value.materialize_with(limits.max_depth) {
            Ok(text) => on_value(&text),
            Err(e) => break Stop::Failed(e.into()),
        }

        materialized += 1;
        if materialized >= cap.get() {
            break Stop::CapReached;
        }
    };

    LoopReport {
        stop,
        materialized,
        consumed: decoder.offset(),
    }
}
