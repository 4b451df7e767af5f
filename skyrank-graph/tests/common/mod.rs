#![allow(dead_code)]

use async_trait::async_trait;
use skyrank_common::{Result, SkyrankError};
use skyrank_graph::{
    AccountRef, FollowGraphSource, Page, Profile, ProgressEvent, ProgressObserver,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory follow graph with call recording.
#[derive(Default)]
pub struct FakeGraph {
    accounts: HashMap<String, (AccountRef, u64)>,
    follows: HashMap<String, Vec<AccountRef>>,
    fail_follows_for: HashSet<String>,
    omit_profiles: HashSet<String>,
    latency: HashMap<String, Duration>,
    pub follow_calls: Mutex<Vec<(String, Option<String>)>>,
    /// Identities of every profile batch, in request order.
    pub profile_batches: Mutex<Vec<Vec<String>>>,
    pub profile_calls: Mutex<usize>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account whose handle is `<id>.test`.
    pub fn account(mut self, id: &str, followers: u64) -> Self {
        let acct = AccountRef::new(id, format!("{id}.test"), Some(id.to_uppercase().as_str()));
        self.accounts.insert(id.to_string(), (acct, followers));
        self
    }

    /// `who` follows each of `targets`, in order. Unknown targets are registered
    /// with 1000 followers.
    pub fn follows(mut self, who: &str, targets: &[&str]) -> Self {
        for t in targets {
            if !self.accounts.contains_key(*t) {
                self = self.account(t, 1000);
            }
        }
        let list = targets
            .iter()
            .map(|t| self.accounts[*t].0.clone())
            .collect::<Vec<_>>();
        self.follows.entry(who.to_string()).or_default().extend(list);
        self
    }

    /// Like [`FakeGraph::follows`] but the edge carries a different handle.
    pub fn follows_as(mut self, who: &str, target: &str, handle: &str) -> Self {
        let acct = AccountRef::new(target, handle, None);
        self.follows.entry(who.to_string()).or_default().push(acct);
        self
    }

    pub fn failing_follows(mut self, id: &str) -> Self {
        self.fail_follows_for.insert(id.to_string());
        self
    }

    pub fn omitting_profile(mut self, id: &str) -> Self {
        self.omit_profiles.insert(id.to_string());
        self
    }

    /// Delay every follow listing of `id` by `ms` milliseconds.
    pub fn slow_follows(mut self, id: &str, ms: u64) -> Self {
        self.latency.insert(id.to_string(), Duration::from_millis(ms));
        self
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.profile_batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn remote_calls(&self) -> usize {
        self.follow_calls.lock().unwrap().len()
            + *self.profile_calls.lock().unwrap()
            + self.profile_batches.lock().unwrap().len()
    }
}

#[async_trait]
impl FollowGraphSource for FakeGraph {
    async fn list_follows(
        &self,
        actor: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Page<AccountRef>> {
        self.follow_calls
            .lock()
            .unwrap()
            .push((actor.to_string(), cursor.map(str::to_string)));
        if let Some(delay) = self.latency.get(actor) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_follows_for.contains(actor) {
            return Err(SkyrankError::Remote(format!("500 for {actor}")));
        }
        let all = self.follows.get(actor).cloned().unwrap_or_default();
        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + limit as usize).min(all.len());
        Ok(Page {
            items: all[start..end].to_vec(),
            cursor: (end < all.len()).then(|| end.to_string()),
        })
    }

    async fn get_profile(&self, actor: &str) -> Result<Profile> {
        *self.profile_calls.lock().unwrap() += 1;
        self.accounts
            .values()
            .find(|(a, _)| a.identity == actor || a.handle == actor)
            .map(|(a, f)| Profile {
                account: a.clone(),
                followers_count: *f,
            })
            .ok_or_else(|| SkyrankError::Remote(format!("profile not found: {actor}")))
    }

    async fn get_profiles(&self, identities: &[String]) -> Result<Vec<Profile>> {
        self.profile_batches.lock().unwrap().push(identities.to_vec());
        // Reverse so callers cannot rely on positional matching.
        Ok(identities
            .iter()
            .rev()
            .filter(|id| !self.omit_profiles.contains(*id))
            .filter_map(|id| self.accounts.get(id))
            .map(|(a, f)| Profile {
                account: a.clone(),
                followers_count: *f,
            })
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<ProgressEvent>>,
}

impl ProgressObserver for RecordingProgress {
    fn on_event(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl RecordingProgress {
    pub fn snapshot(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}
