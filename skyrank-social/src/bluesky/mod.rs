//! Bluesky (AT Protocol) read-only integration.
//!
//! Submodules provide the XRPC client wrapper and the typed response models.
//! Accounts are keyed by DID; handles are carried only for display.
pub mod client;
pub mod types;

pub use client::BlueskyApi;
