//! Coarse progress reporting for long-running stages.
//!
//! Progress is an observability hook only; nothing in the ranking depends on
//! whether or how events are consumed.

/// Emit [`ProgressEvent::AccountsProcessed`] after every this many intermediate accounts.
pub const ACCOUNTS_PROGRESS_EVERY: usize = 10;
/// Emit [`ProgressEvent::ProfilesLoaded`] after every this many profile batches.
pub const BATCHES_PROGRESS_EVERY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The actor's own follow-set is loaded; `total` intermediate accounts follow.
    FollowsLoaded { total: usize },
    AccountsProcessed { done: usize, total: usize },
    AggregationFinished { candidates: usize },
    /// Profile enrichment is about to fetch `total` profiles.
    ProfilesStarted { total: usize },
    ProfilesLoaded { done: usize, total: usize },
    EnrichmentFinished { enriched: usize },
}

pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: ProgressEvent);
}

/// Observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}
