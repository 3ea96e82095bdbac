#![warn(clippy::pedantic)]

pub mod contents;
pub mod error;
pub mod tag;
pub mod value;

mod render;

pub use contents::{ContentsReader, RawTlv};
pub use error::TypeError;
pub use tag::UniversalTag;
pub use value::{DEFAULT_MAX_DEPTH, Value};
