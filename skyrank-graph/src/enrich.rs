//! Batched follower-count lookups for promising candidates.
use crate::model::TallyEntry;
use crate::progress::{ProgressEvent, ProgressObserver, BATCHES_PROGRESS_EVERY};
use crate::source::FollowGraphSource;
use skyrank_common::{Result, SkyrankError};
use std::collections::{HashMap, HashSet};

/// What an enrichment pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichOutcome {
    /// Entries that passed the local threshold.
    pub requested: usize,
    pub enriched: usize,
    pub batches: usize,
}

/// Populate `followers_count` and `share` for every entry whose count is at
/// least `local_threshold`.
///
/// Qualifying entries are requested in slice order, `batch_size` identities
/// per lookup. Profiles are matched back by identity, not position. A failed
/// lookup aborts the pass, and so does a batch that leaves any requested
/// identity without a profile.
pub async fn enrich<S>(
    source: &S,
    entries: &mut [TallyEntry],
    local_threshold: u32,
    batch_size: usize,
    progress: &dyn ProgressObserver,
) -> Result<EnrichOutcome>
where
    S: FollowGraphSource + ?Sized,
{
    let qualifying: Vec<String> = entries
        .iter()
        .filter(|e| e.count >= local_threshold)
        .map(|e| e.identity().to_string())
        .collect();
    let index: HashMap<String, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.identity().to_string(), i))
        .collect();

    let total = qualifying.len();
    progress.on_event(ProgressEvent::ProfilesStarted { total });
    tracing::info!(total, batch_size, local_threshold, "enrich.start");

    let mut outcome = EnrichOutcome {
        requested: total,
        ..Default::default()
    };

    for batch in qualifying.chunks(batch_size.max(1)) {
        let profiles = source.get_profiles(batch).await?;
        outcome.batches += 1;

        let wanted: HashSet<&str> = batch.iter().map(String::as_str).collect();
        let mut returned = HashSet::with_capacity(profiles.len());
        for profile in profiles {
            let identity = profile.account.identity.as_str();
            if !wanted.contains(identity) {
                tracing::debug!(identity, "enrich.unrequested_profile");
                continue;
            }
            if let Some(&at) = index.get(identity) {
                entries[at].apply_followers(profile.followers_count);
                if returned.insert(identity.to_string()) {
                    outcome.enriched += 1;
                }
            }
        }
        let missing: Vec<&str> = batch
            .iter()
            .filter(|id| !returned.contains(*id))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            tracing::error!(?missing, batch = outcome.batches, "enrich.profile_missing");
            return Err(SkyrankError::Malformed(format!(
                "profile lookup returned no profile for {}",
                missing.join(", ")
            )));
        }

        if outcome.batches % BATCHES_PROGRESS_EVERY == 0 {
            progress.on_event(ProgressEvent::ProfilesLoaded {
                done: (outcome.batches * batch_size).min(total),
                total,
            });
        }
    }

    progress.on_event(ProgressEvent::EnrichmentFinished {
        enriched: outcome.enriched,
    });
    tracing::info!(
        requested = outcome.requested,
        enriched = outcome.enriched,
        batches = outcome.batches,
        "enrich.done"
    );
    Ok(outcome)
}
