//! The remote follow graph as seen by the ranking core.
use crate::model::{AccountRef, Profile};
use async_trait::async_trait;
use skyrank_common::Result;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Continuation token; `None` marks the last page.
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: None,
        }
    }
}

/// Read-only access to an account graph.
///
/// Implementations report non-success responses as
/// [`SkyrankError::Remote`](skyrank_common::SkyrankError::Remote) and
/// incomplete documents as
/// [`SkyrankError::Malformed`](skyrank_common::SkyrankError::Malformed).
#[async_trait]
pub trait FollowGraphSource: Send + Sync {
    /// One page of the accounts `actor` follows, at most `limit` items.
    async fn list_follows(
        &self,
        actor: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Page<AccountRef>>;

    /// Resolve a single account (identity or handle) to its profile.
    async fn get_profile(&self, actor: &str) -> Result<Profile>;

    /// Profiles for a bounded batch of identities.
    ///
    /// Unknown identities are omitted, so the result may be shorter than
    /// the request and is not guaranteed to follow request order.
    async fn get_profiles(&self, identities: &[String]) -> Result<Vec<Profile>>;
}
