use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::classifier::{IterationReport, classify};
use crate::config::HarnessConfig;
use crate::decode_loop::decode_bounded;
use crate::error::{ConfigError, UnexpectedFailure};
use crate::feeder::wrap;

static CONFIG: OnceLock<HarnessConfig> = OnceLock::new();

/// One-time process setup for the fuzz target.
///
/// On the first successful call this reads [`HarnessConfig::from_env`],
/// installs a `tracing` subscriber when `BERFUZZ_LOG` is set, and logs the
/// effective configuration. Later calls return the same configuration and
/// do nothing else.
///
/// # Errors
///
/// [`ConfigError`] if an environment variable is malformed. Nothing is
/// cached in that case, so the next call reads the environment again.
pub fn setup() -> Result<&'static HarnessConfig, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let config = HarnessConfig::from_env()?;
    let filter = config
        .log_filter
        .as_deref()
        .map(|directives| {
            EnvFilter::try_new(directives).map_err(|e| ConfigError::LogFilter {
                filter: directives.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()?;

    Ok(CONFIG.get_or_init(|| {
        if let Some(filter) = filter {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact()
                .try_init();
        }
        tracing::info!(
            iteration_cap = config.iteration_cap.get(),
            max_content_len = config.limits.max_content_len,
            max_depth = config.limits.max_depth,
            "harness configured"
        );
        config
    }))
}

/// Fuzz-engine callback: run one input and return normally unless it
/// exposed a real defect.
///
/// Accepts any byte sequence, empty included. Malformed input is the
/// expected case and is swallowed.
///
/// # Panics
///
/// - If the harness configuration in the environment is invalid.
/// - On any [`UnexpectedFailure`], with its description, so the engine
///   records the input as a finding.
pub fn run_iteration(data: &[u8]) {
    let config = match setup() {
        Ok(config) => config,
        Err(e) => panic!("invalid harness configuration: {e}"),
    };

    if let Err(failure) = run_with(config, data) {
        panic!("unexpected failure: {failure:?}");
    }
}

/// Non-panicking harness, for tests and replay tooling.
#[derive(Clone, Debug, Default)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run one input through the decode loop and classify the outcome.
    ///
    /// # Errors
    ///
    /// [`UnexpectedFailure`] if the run failed for any reason other than
    /// the input being invalid BER.
    pub fn run(&self, data: &[u8]) -> Result<IterationReport, UnexpectedFailure> {
        run_with(&self.config, data)
    }
}

fn run_with(config: &HarnessConfig, data: &[u8]) -> Result<IterationReport, UnexpectedFailure> {
    let report = decode_bounded(wrap(data), config.iteration_cap, config.limits);
    classify(report)
}
