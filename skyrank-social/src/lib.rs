//! Social network clients used by Skyrank.
//!
//! Currently only the Bluesky public AppView is implemented. It plugs into the
//! ranking core through [`skyrank_graph::FollowGraphSource`].
pub mod bluesky;
