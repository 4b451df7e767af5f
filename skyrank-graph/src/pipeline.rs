//! End-to-end ranking run: aggregate → filter → enrich → rank.
use crate::aggregate::{aggregate, Aggregation};
use crate::enrich::enrich;
use crate::model::{SeedProfile, TallyEntry};
use crate::options::RankOptions;
use crate::progress::ProgressObserver;
use crate::rank::{filter_exclude_self_and_direct, rank_absolute, rank_relative, sort_by_count};
use crate::source::FollowGraphSource;
use serde::Serialize;
use skyrank_common::{Result, SkyrankError};

/// Counters describing a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub direct_follows: usize,
    /// Distinct candidates after removing the actor and direct follows.
    pub candidates: usize,
    pub enriched: usize,
    pub profile_batches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rankings {
    pub seed: SeedProfile,
    /// Most commonly followed by the actor's follows.
    pub absolute: Vec<TallyEntry>,
    /// Highest share of their own followers inside the actor's follows.
    pub relative: Vec<TallyEntry>,
    pub stats: RunStats,
}

/// Rank `actor`'s second-degree network.
///
/// Options are validated before any remote call. Every remote failure is
/// fatal; no partial rankings are produced.
pub async fn run<S>(
    source: &S,
    actor: &str,
    options: &RankOptions,
    progress: &dyn ProgressObserver,
) -> Result<Rankings>
where
    S: FollowGraphSource + ?Sized,
{
    options.validate()?;
    let actor = actor.trim();
    if actor.is_empty() {
        return Err(SkyrankError::InvalidOption("actor must not be empty".into()));
    }

    let aggregation = aggregate(source, actor, options, progress).await?;
    let direct = aggregation.direct_identities();
    let direct_follows = direct.len();
    let Aggregation { seed, tally, .. } = aggregation;

    let mut candidates = filter_exclude_self_and_direct(tally, seed.identity(), &direct);
    sort_by_count(&mut candidates);

    let absolute = rank_absolute(&candidates, options.number_to_show);
    tracing::info!(
        candidates = candidates.len(),
        shown = absolute.len(),
        "rank.absolute"
    );

    let outcome = enrich(
        source,
        &mut candidates,
        options.local_follower_threshold,
        options.batch_size,
        progress,
    )
    .await?;

    let relative = rank_relative(
        &candidates,
        options.global_follower_threshold,
        options.number_to_show,
    );
    tracing::info!(
        enriched = outcome.enriched,
        shown = relative.len(),
        global_threshold = options.global_follower_threshold,
        "rank.relative"
    );

    Ok(Rankings {
        stats: RunStats {
            direct_follows,
            candidates: candidates.len(),
            enriched: outcome.enriched,
            profile_batches: outcome.batches,
        },
        seed,
        absolute,
        relative,
    })
}
