//! Core library for the debferry package installer.

pub mod error;
pub mod install;

pub use error::{DebferryError, ErrorContext};

pub type DebferryResult<T> = std::result::Result<T, DebferryError>;
