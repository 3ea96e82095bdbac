#![warn(clippy::pedantic)]

pub mod error;
pub mod limits;
pub mod streaming;

pub use ber_types::{TypeError, Value};
pub use error::DecodeError;
pub use limits::DecoderLimits;
pub use streaming::StreamingDecoder;
