use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A reference to an account as seen in a follow listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    /// Stable, globally unique account key.
    pub identity: String,
    /// Human-readable, mutable alias.
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl AccountRef {
    /// Build a reference, trimming the display name and dropping it when blank.
    ///
    /// ```
    /// use skyrank_graph::AccountRef;
    ///
    /// let a = AccountRef::new("did:plc:a", "a.example.com", Some("  Alice \n"));
    /// assert_eq!(a.display_name.as_deref(), Some("Alice"));
    ///
    /// let b = AccountRef::new("did:plc:b", "b.example.com", Some("   "));
    /// assert_eq!(b.display_name, None);
    /// ```
    pub fn new(
        identity: impl Into<String>,
        handle: impl Into<String>,
        display_name: Option<&str>,
    ) -> Self {
        Self {
            identity: identity.into(),
            handle: handle.into(),
            display_name: normalize_display_name(display_name),
        }
    }
}

pub fn normalize_display_name(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// An account plus the follower count reported by a profile lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub account: AccountRef,
    pub followers_count: u64,
}

/// The actor whose second-degree network is analysed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedProfile {
    pub account: AccountRef,
}

impl SeedProfile {
    pub fn identity(&self) -> &str {
        &self.account.identity
    }
}

/// Per-candidate statistics accumulated over a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyEntry {
    pub account: AccountRef,
    /// Number of distinct intermediate accounts following this candidate.
    pub count: u32,
    pub followers_count: Option<u64>,
    /// `count / followers_count`; `None` until enriched, and for zero followers.
    pub share: Option<f64>,
}

impl TallyEntry {
    fn first_sighting(account: AccountRef) -> Self {
        Self {
            account,
            count: 1,
            followers_count: None,
            share: None,
        }
    }

    pub fn identity(&self) -> &str {
        &self.account.identity
    }

    /// Record the candidate's total follower count and derive its share.
    ///
    /// ```
    /// use skyrank_graph::{AccountRef, Tally};
    ///
    /// let mut tally = Tally::new();
    /// let c = AccountRef::new("did:plc:c", "c.example.com", None);
    /// tally.record(&c);
    /// tally.record(&c);
    ///
    /// let mut entry = tally.into_entries().next().unwrap();
    /// entry.apply_followers(8);
    /// assert_eq!(entry.share, Some(0.25));
    ///
    /// entry.apply_followers(0);
    /// assert_eq!(entry.followers_count, Some(0));
    /// assert_eq!(entry.share, None);
    /// ```
    pub fn apply_followers(&mut self, followers_count: u64) {
        self.followers_count = Some(followers_count);
        self.share = if followers_count == 0 {
            None
        } else {
            Some(f64::from(self.count) / followers_count as f64)
        };
    }
}

/// Frequency tally keyed by candidate identity.
///
/// Counts only ever grow by increment; the first sighting of an identity
/// fixes its handle and display name.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: HashMap<String, TallyEntry>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more intermediate account following `candidate`.
    pub fn record(&mut self, candidate: &AccountRef) {
        if let Some(entry) = self.entries.get_mut(&candidate.identity) {
            entry.count += 1;
        } else {
            self.entries.insert(
                candidate.identity.clone(),
                TallyEntry::first_sighting(candidate.clone()),
            );
        }
    }

    pub fn get(&self, identity: &str) -> Option<&TallyEntry> {
        self.entries.get(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TallyEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> impl Iterator<Item = TallyEntry> {
        self.entries.into_values()
    }
}
