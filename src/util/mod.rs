//! Basic types: errors, result alias, identifier generation.

pub mod error;
pub mod ids;

pub use error::{Error, Result};
