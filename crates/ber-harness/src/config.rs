use std::fmt;
use std::num::NonZeroUsize;

use ber_decoder::DecoderLimits;

use crate::error::ConfigError;

pub const ENV_ITERATION_CAP: &str = "BERFUZZ_ITERATION_CAP";
pub const ENV_MAX_CONTENT_LEN: &str = "BERFUZZ_MAX_CONTENT_LEN";
pub const ENV_MAX_DEPTH: &str = "BERFUZZ_MAX_DEPTH";
pub const ENV_LOG: &str = "BERFUZZ_LOG";

/// Maximum number of values materialized per fuzz iteration.
///
/// Bounds the work one input can cause: a buffer of back-to-back minimal
/// values would otherwise make a single call arbitrarily long.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IterationCap(NonZeroUsize);

impl IterationCap {
    pub const DEFAULT: Self = match NonZeroUsize::new(100) {
        Some(cap) => Self(cap),
        None => unreachable!(),
    };

    /// `None` for a cap of zero.
    #[must_use]
    pub fn new(cap: usize) -> Option<Self> {
        NonZeroUsize::new(cap).map(Self)
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for IterationCap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for IterationCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Harness settings, fixed for the life of the process.
///
/// ```text
/// ┌───────────────┬──────────────────────────┬─────────────────────────────┐
/// │ Field         │ Variable                 │ Default                     │
/// ├───────────────┼──────────────────────────┼─────────────────────────────┤
/// │ iteration_cap │ BERFUZZ_ITERATION_CAP    │ 100                         │
/// │ limits        │ BERFUZZ_MAX_CONTENT_LEN  │ 1 MiB                       │
/// │               │ BERFUZZ_MAX_DEPTH        │ 64                          │
/// │ log_filter    │ BERFUZZ_LOG              │ unset, no subscriber        │
/// └───────────────┴──────────────────────────┴─────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HarnessConfig {
    pub iteration_cap: IterationCap,
    pub limits: DecoderLimits,
    /// `tracing` filter directive; `None` leaves logging off entirely.
    pub log_filter: Option<String>,
}

impl HarnessConfig {
    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// See [`from_lookup`](Self::from_lookup).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset (or empty) variables keep their defaults.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Invalid`] if a numeric variable does not parse.
    /// - [`ConfigError::Zero`] if a numeric variable is `0`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(cap) = positive(&lookup, ENV_ITERATION_CAP)? {
            config.iteration_cap = IterationCap(cap);
        }
        if let Some(len) = positive(&lookup, ENV_MAX_CONTENT_LEN)? {
            config.limits.max_content_len = len.get();
        }
        if let Some(depth) = positive(&lookup, ENV_MAX_DEPTH)? {
            config.limits.max_depth = depth.get();
        }
        config.log_filter = lookup(ENV_LOG).filter(|filter| !filter.trim().is_empty());

        Ok(config)
    }
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<NonZeroUsize>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: usize = raw.parse().map_err(|_| ConfigError::Invalid {
        var,
        value: raw.to_string(),
    })?;
    NonZeroUsize::new(value)
        .map(Some)
        .ok_or(ConfigError::Zero { var })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.iteration_cap.get(), 100);
        assert_eq!(config.limits, DecoderLimits::default());
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = HarnessConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = HarnessConfig::from_lookup(lookup(&[
            (ENV_ITERATION_CAP, "7"),
            (ENV_MAX_CONTENT_LEN, " 4096 "),
            (ENV_MAX_DEPTH, "16"),
            (ENV_LOG, "ber_harness=debug"),
        ]))
        .unwrap();

        assert_eq!(config.iteration_cap, IterationCap::new(7).unwrap());
        assert_eq!(config.limits.max_content_len, 4096);
        assert_eq!(config.limits.max_depth, 16);
        assert_eq!(config.log_filter.as_deref(), Some("ber_harness=debug"));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config =
            HarnessConfig::from_lookup(lookup(&[(ENV_ITERATION_CAP, ""), (ENV_LOG, "  ")]))
                .unwrap();
        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn rejects_garbage() {
        let err = HarnessConfig::from_lookup(lookup(&[(ENV_MAX_DEPTH, "deep")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: ENV_MAX_DEPTH,
                ..
            }
        ));
        assert_eq!(err.to_string(), "BERFUZZ_MAX_DEPTH=\"deep\" is not an unsigned integer");
    }

    #[test]
    fn rejects_zero_cap() {
        let err = HarnessConfig::from_lookup(lookup(&[(ENV_ITERATION_CAP, "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Zero {
                var: ENV_ITERATION_CAP
            }
        ));
    }

    #[test]
    fn cap_of_zero_is_not_constructible() {
        assert!(IterationCap::new(0).is_none());
        assert_eq!(IterationCap::new(1).unwrap().get(), 1);
        assert_eq!(IterationCap::default().to_string(), "100");
    }
}
