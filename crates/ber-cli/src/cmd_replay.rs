/// Implementation of `berfuzz replay`.
///
/// Runs every input through [`Harness::run`], exactly as the fuzz target
/// would, and prints one line per input. Used to reproduce crash artifacts
/// and to sanity-check a corpus after a decoder change.
///
/// # Text output
///
/// ```text
/// EXHAUSTED          3 values       17 bytes  corpus/0a1b2c
/// EXPECTED_ERROR     0 values        2 bytes  corpus/3d4e5f
/// CAP_REACHED      100 values      200 bytes  corpus/nulls
/// ```
///
/// # JSON output (`--json`)
///
/// ```text
/// {"path":"corpus/0a1b2c","state":"EXHAUSTED","materialized":3,"consumed":17}
/// ```
///
/// An input that hits an unexpected failure is reported with state
/// `UNEXPECTED_FAILURE` and its error; the command then exits 1 after
/// processing the remaining inputs.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use ber_harness::{Harness, IterationReport, UnexpectedFailure};
use serde::Serialize;

use crate::ReplayArgs;

/// One replay result, as printed with `--json`.
#[derive(Serialize)]
struct ReplayLine {
    path: String,
    state: &'static str,
    materialized: usize,
    consumed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the `berfuzz replay` command.
///
/// # Errors
///
/// Returns an error if a path cannot be read, or if any input produced an
/// unexpected failure.
pub fn run(args: &ReplayArgs) -> Result<()> {
    let harness = Harness::new(crate::harness_config(args.cap)?);
    let inputs = collect_inputs(&args.paths)?;
    tracing::debug!(inputs = inputs.len(), "replaying");

    let mut failures = 0usize;
    for path in &inputs {
        let data = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;

        let result = harness.run(&data);
        if let Err(failure) = &result {
            failures += 1;
            tracing::warn!(path = %path.display(), "unexpected failure: {failure}");
        }
        let line = replay_line(path, result);

        if args.json {
            println!("{}", serde_json::to_string(&line)?);
        } else {
            print_line(&line);
        }
    }

    if failures > 0 {
        bail!(
            "{failures} of {} input{} hit an unexpected failure",
            inputs.len(),
            if inputs.len() == 1 { "" } else { "s" }
        );
    }
    Ok(())
}

fn replay_line(path: &Path, result: Result<IterationReport, UnexpectedFailure>) -> ReplayLine {
    let path = path.display().to_string();
    match result {
        Ok(report) => ReplayLine {
            path,
            state: report.state.as_str(),
            materialized: report.materialized,
            consumed: report.consumed,
            error: None,
        },
        Err(failure) => ReplayLine {
            path,
            state: "UNEXPECTED_FAILURE",
            materialized: 0,
            consumed: failure.consumed(),
            // {:#} prints the whole source chain
            error: Some(format!("{:#}", anyhow::Error::new(failure))),
        },
    }
}

fn print_line(line: &ReplayLine) {
    print!(
        "{:<15} {:>4} values {:>8} bytes  {}",
        line.state, line.materialized, line.consumed, line.path
    );
    match &line.error {
        Some(error) => println!("  ({error})"),
        None => println!(),
    }
}

// ── Input discovery ───────────────────────────────────────────────────────────

/// Expand the command-line paths into the list of files to replay.
///
/// Files are kept in the order given. Each directory contributes its
/// regular files, sorted by name; subdirectories are skipped.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            inputs.extend(dir_entries(path)?);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

fn dir_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("cannot list {}", dir.display()))?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
