/// Implementation of `berfuzz decode`.
///
/// Streams one input through the same bounded loop the harness uses and
/// prints each materialized value on its own line, followed by the reason
/// the loop stopped.
///
/// ```text
/// $ printf '3006020101050030 80 0101ff 0000' > seq.hex
/// $ berfuzz decode --hex seq.hex
/// SEQUENCE { INTEGER 1, NULL }
/// SEQUENCE { BOOLEAN TRUE }
/// -- EXHAUSTED after 2 values (14 bytes)
/// ```
///
/// A malformed input is not a command failure: the loop stops, the
/// decoder's diagnostic is printed, and the command exits 0. Only I/O
/// problems and reader failures exit 1.
use std::fs;

use anyhow::{Context, Result};
use ber_decoder::DecodeError;
use ber_harness::{Failure, LoopReport, Stop, decode_bounded_with, wrap};

use crate::DecodeArgs;

/// Run the `berfuzz decode` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, `--hex` input is not valid
/// hex, or the decoder reports a non-domain failure.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let config = crate::harness_config(args.cap)?;
    let raw = fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;
    let data = if args.hex { parse_hex(&raw)? } else { raw };

    let report = decode_bounded_with(wrap(&data), config.iteration_cap, config.limits, |text| {
        println!("{text}");
    });

    println!("{}", stop_line(report, data.len())?);
    Ok(())
}

/// The closing `-- STATE ...` line for a finished loop.
///
/// Failures go through [`Failure::from_decode`], the same rule the fuzz
/// target applies; an unexpected one becomes the command's error.
fn stop_line(report: LoopReport, total: usize) -> Result<String> {
    let LoopReport {
        stop,
        materialized: values,
        consumed,
    } = report;
    let plural = if values == 1 { "" } else { "s" };
    let line = match stop {
        Stop::Exhausted => format!("-- EXHAUSTED after {values} value{plural} ({consumed} bytes)"),
        Stop::CapReached => format!(
            "-- CAP_REACHED after {values} value{plural} ({consumed} of {total} bytes read)"
        ),
        Stop::Failed(e) => match Failure::from_decode(e, consumed) {
            Failure::Expected(e) => {
                format!("-- EXPECTED_ERROR after {values} value{plural}: {}", diagnostic(&e))
            }
            Failure::Other(failure) => {
                return Err(anyhow::Error::new(failure).context("decoder failed"));
            }
        },
    };
    Ok(line)
}

/// Decode hex text, ignoring any ASCII whitespace.
fn parse_hex(text: &[u8]) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    hex::decode(&digits).context("invalid hex input")
}

// ── Error formatting ──────────────────────────────────────────────────────────

/// Human-readable diagnostic for a domain decode error.
///
/// ```text
/// ┌─────────────────────────┬────────────────────────────────────────────┐
/// │ DecodeError variant     │ Diagnostic                                 │
/// ├─────────────────────────┼────────────────────────────────────────────┤
/// │ Truncated               │ "truncated: input ends inside a value at …"│
/// │ ContentTooLarge         │ "oversized: …"                             │
/// │ Type                    │ "invalid contents: <inner error>"          │
/// │ everything else         │ "<error Display>"                          │
/// └─────────────────────────┴────────────────────────────────────────────┘
/// ```
fn diagnostic(e: &DecodeError) -> String {
    match e {
        DecodeError::Truncated { offset } => {
            format!("truncated: input ends inside a value at offset {offset}")
        }
        DecodeError::ContentTooLarge { .. } => format!("oversized: {e}"),
        DecodeError::Type(inner) => format!("invalid contents: {inner}"),
        other => other.to_string(),
    }
}
