//! Minimal wrapper around the Bluesky public AppView XRPC endpoints.
//!
//! Only unauthenticated, read-only lexicons are used: follow listings and
//! profile lookups. Pagination is driven by the caller through the `cursor`
//! returned with each follows page.
use crate::bluesky::types::{GetFollowsResponse, GetProfilesResponse, ProfileViewDetailed};
use async_trait::async_trait;
use skyrank_common::{Result, SkyrankError};
use skyrank_graph::options::{MAX_BATCH_SIZE, MAX_PAGE_SIZE};
use skyrank_graph::{AccountRef, FollowGraphSource, Page, Profile};
use skyrank_http::{HttpClient, HttpError, RequestOpts};
use std::time::Duration;

pub const PUBLIC_APPVIEW: &str = "https://public.api.bsky.app";

const GET_FOLLOWS: &str = "xrpc/app.bsky.graph.getFollows";
const GET_PROFILE: &str = "xrpc/app.bsky.actor.getProfile";
const GET_PROFILES: &str = "xrpc/app.bsky.actor.getProfiles";

#[derive(Clone)]
pub struct BlueskyApi {
    http: HttpClient,
}

impl BlueskyApi {
    /// Client for the public AppView.
    pub fn new() -> Result<Self> {
        Self::with_base(PUBLIC_APPVIEW)
    }

    /// Client for any AppView-compatible host (tests, mirrors).
    pub fn with_base(base: &str) -> Result<Self> {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let http = HttpClient::new(&base).map_err(http_to_skyrank)?;
        Ok(Self { http })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.http = self.http.with_timeout(dur);
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.http = self.http.with_retries(n);
        self
    }

    /// One page of `app.bsky.graph.getFollows`.
    pub async fn get_follows(
        &self,
        actor: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<GetFollowsResponse> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let mut opts = RequestOpts::default()
            .param("actor", actor)
            .param("limit", limit.to_string());
        if let Some(c) = cursor {
            opts = opts.param("cursor", c);
        }

        let resp: GetFollowsResponse = self
            .http
            .get_json(GET_FOLLOWS, opts)
            .await
            .map_err(http_to_skyrank)?;

        tracing::debug!(
            target: "social.bluesky",
            actor,
            returned = resp.follows.len(),
            has_cursor = resp.cursor.is_some(),
            "bluesky.get_follows.page"
        );
        Ok(resp)
    }

    /// `app.bsky.actor.getProfile` for a DID or handle.
    pub async fn get_profile(&self, actor: &str) -> Result<ProfileViewDetailed> {
        self.http
            .get_json(GET_PROFILE, RequestOpts::default().param("actor", actor))
            .await
            .map_err(http_to_skyrank)
    }

    /// `app.bsky.actor.getProfiles` for at most 25 actors.
    pub async fn get_profiles(&self, actors: &[String]) -> Result<Vec<ProfileViewDetailed>> {
        if actors.is_empty() {
            return Ok(Vec::new());
        }
        if actors.len() > MAX_BATCH_SIZE {
            return Err(SkyrankError::InvalidOption(format!(
                "getProfiles accepts at most {MAX_BATCH_SIZE} actors, got {}",
                actors.len()
            )));
        }

        let opts = actors
            .iter()
            .fold(RequestOpts::default(), |o, a| o.param("actors", a.as_str()));
        let resp: GetProfilesResponse = self
            .http
            .get_json(GET_PROFILES, opts)
            .await
            .map_err(http_to_skyrank)?;

        tracing::debug!(
            target: "social.bluesky",
            requested = actors.len(),
            returned = resp.profiles.len(),
            "bluesky.get_profiles.batch"
        );
        Ok(resp.profiles)
    }
}

#[async_trait]
impl FollowGraphSource for BlueskyApi {
    async fn list_follows(
        &self,
        actor: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Page<AccountRef>> {
        let resp = self.get_follows(actor, limit, cursor).await?;
        Ok(Page {
            items: resp.follows.into_iter().map(Into::into).collect(),
            cursor: resp.cursor,
        })
    }

    async fn get_profile(&self, actor: &str) -> Result<Profile> {
        Ok(BlueskyApi::get_profile(self, actor).await?.into())
    }

    async fn get_profiles(&self, identities: &[String]) -> Result<Vec<Profile>> {
        Ok(BlueskyApi::get_profiles(self, identities)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

fn http_to_skyrank(e: HttpError) -> SkyrankError {
    match e {
        HttpError::Decode(..) => SkyrankError::Malformed(e.to_string()),
        other => SkyrankError::Remote(other.to_string()),
    }
}
