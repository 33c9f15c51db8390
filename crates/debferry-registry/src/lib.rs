//! Repository synchronization and package resolution for debferry.
//!
//! This crate owns the path from remote repository metadata to a resolved
//! package: fetching heterogeneous listings (Debian control files in
//! plain, xz or gzip form, or custom pre-built listings), normalizing
//! them into [`package::PackageRecord`]s, persisting them as the local
//! index tree, and querying that tree with Debian version ordering.

pub mod control;
pub mod error;
pub mod index;
pub mod manifest;
pub mod package;
pub mod resolver;
pub mod sync;
pub mod version;

pub use error::{RegistryError, Result};
