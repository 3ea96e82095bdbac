#![warn(clippy::pedantic)]

//! Fuzz harness for the streaming BER decoder.
//!
//! One fuzz iteration flows through four pieces:
//!
//! ```text
//!   engine ──▶ run_iteration(data)
//!                 │
//!                 ├─ feeder::wrap(data)            → InputStream
//!                 ├─ decode_loop::decode_bounded   → LoopReport
//!                 └─ classifier::classify          → IterationReport
//!                                                    or UnexpectedFailure (panic)
//! ```
//!
//! Malformed input is the normal case and is swallowed. Anything else is
//! handed back to the engine as a panic so the input gets recorded.

pub mod classifier;
pub mod config;
pub mod decode_loop;
pub mod driver;
pub mod error;
pub mod feeder;

pub use classifier::{Failure, IterationReport, TerminalState, classify};
pub use config::{HarnessConfig, IterationCap};
pub use decode_loop::{LoopReport, Stop, decode_bounded, decode_bounded_with};
pub use driver::{Harness, run_iteration, setup};
pub use error::{ConfigError, UnexpectedFailure};
pub use feeder::{InputStream, wrap};
