#![warn(clippy::pedantic)]

pub mod base128;
pub mod error;
pub mod identifier;
pub mod length;
pub mod tlv;

pub use error::WireError;
pub use identifier::{Class, Identifier};
pub use length::Length;
pub use tlv::TlvHeader;
