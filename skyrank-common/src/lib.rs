//! Common types and utilities shared across Skyrank crates.
//!
//! This crate defines the shared error type and observability helpers used
//! throughout the Skyrank workspace. It stays dependency-light so that every
//! crate, including the graph core, can depend on it.
//!
//! # Overview
//!
//! - [`SkyrankError`] and [`Result`]: Shared error handling
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`OutputFormat`]: How the binary renders rankings
//!
//! # Examples
//!
//! ```rust
//! use skyrank_common::SkyrankError;
//!
//! let err = SkyrankError::InvalidOption("batch_size must be at least 1".into());
//! assert_eq!(err.to_string(), "Invalid option: batch_size must be at least 1");
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Preferred output format for rendered rankings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Error types used across the Skyrank system.
///
/// Every variant is fatal for a ranking run: there is no partial result
/// once one of these has surfaced.
#[derive(thiserror::Error, Debug)]
pub enum SkyrankError {
    /// A remote call failed (transport error or non-success status).
    #[error("Remote error: {0}")]
    Remote(String),

    /// A remote document was missing a field we depend on.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// A ranking option was outside its accepted range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

/// Convenient alias for results that use [`SkyrankError`].
pub type Result<T> = std::result::Result<T, SkyrankError>;
