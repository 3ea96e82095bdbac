/// `berfuzz`: replay fuzz inputs through the BER harness and inspect what
/// the streaming decoder makes of them.
///
/// # Command overview
///
/// ```text
/// berfuzz <COMMAND> [OPTIONS]
///
/// Commands:
///   replay    Run inputs through the harness and report each outcome
///   decode    Print every value materialized from one input
///   help      Print help information
///
/// Global options:
///   -v, --verbose    Log decoder and harness activity to stderr
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                             |
/// |------|-----------------------------------------------------|
/// | 0    | Success                                             |
/// | 1    | Error (I/O failure, bad arguments, unexpected failure) |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd_decode;
mod cmd_replay;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Replay and inspect inputs for the BER streaming-decoder fuzz harness.
#[derive(Parser)]
#[command(name = "berfuzz", version, about = "BER fuzz harness tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder and harness activity (debug level) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Run inputs through the harness, one outcome line per input.
    Replay(ReplayArgs),
    /// Print every value materialized from one input.
    Decode(DecodeArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `berfuzz replay`.
///
/// Each path is a file or a directory. Directories are expanded one level
/// (regular files only, sorted by name), which matches the flat layout of a
/// libFuzzer corpus or `artifacts/` directory.
///
/// ```text
/// ┌─────────┬──────────────────────────────────────────────────────────┐
/// │ Flag    │ Effect                                                   │
/// ├─────────┼──────────────────────────────────────────────────────────┤
/// │ --cap N │ Override the iteration cap (BERFUZZ_ITERATION_CAP, 100)  │
/// │ --json  │ One JSON object per line instead of the text table       │
/// └─────────┴──────────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct ReplayArgs {
    /// Input files or corpus directories.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Maximum values materialized per input.
    #[arg(long)]
    pub cap: Option<usize>,

    /// Emit JSON lines.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `berfuzz decode`.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Input file (raw bytes, or hex text with `--hex`).
    pub file: PathBuf,

    /// Treat the file as hex text; whitespace is ignored.
    #[arg(long)]
    pub hex: bool,

    /// Maximum values materialized.
    #[arg(long)]
    pub cap: Option<usize>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Replay(args) => cmd_replay::run(&args),
        Commands::Decode(args) => cmd_decode::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// `warn` by default, `debug` with `-v`. `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Harness configuration from the environment, with the CLI's `--cap`
/// applied on top.
fn harness_config(cap: Option<usize>) -> anyhow::Result<ber_harness::HarnessConfig> {
    let mut config = ber_harness::HarnessConfig::from_env()?;
    if let Some(cap) = cap {
        config.iteration_cap = ber_harness::IterationCap::new(cap)
            .ok_or_else(|| anyhow::anyhow!("--cap must be greater than zero"))?;
    }
    tracing::debug!(
        iteration_cap = config.iteration_cap.get(),
        max_content_len = config.limits.max_content_len,
        max_depth = config.limits.max_depth,
        "effective configuration"
    );
    Ok(config)
}
