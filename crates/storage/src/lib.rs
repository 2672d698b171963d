//! Storage types and utilities for the archive.
//!
//! - [`sanitize`] turns arbitrary user text into filename-safe strings.
//! - [`layout`] derives the canonical directories of the archive tree.
//! - [`backend`] performs the actual filesystem I/O behind the
//!   [`StorageBackend`] trait; every path handed to a backend is relative to
//!   its root and checked with [`validate_path`].

pub mod backend;
pub mod error;
pub mod layout;
mod models;
mod path;
pub mod sanitize;

pub use crate::backend::StorageBackend;
pub use crate::layout::Tenant;
pub use crate::models::FileInfo;
pub use crate::path::validate as validate_path;
use std::sync::Arc;

pub type BackendHandle = Arc<dyn StorageBackend + Send + Sync>;
