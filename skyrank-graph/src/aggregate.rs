//! Builds the second-degree tally from the actor's follow-set.
//!
//! The actor's follows are the intermediate accounts. Each one's follow-set
//! is fetched in full and every account in it is counted once against that
//! intermediate. With `concurrency > 1` up to that many follow-sets are in
//! flight, but results are still merged one intermediate at a time in the
//! actor's follow order, so the tally matches a sequential run exactly.
use crate::model::{AccountRef, SeedProfile, Tally};
use crate::options::RankOptions;
use crate::paginate::fetch_all_follows;
use crate::progress::{ProgressEvent, ProgressObserver, ACCOUNTS_PROGRESS_EVERY};
use crate::source::FollowGraphSource;
use futures::stream::{self, StreamExt};
use skyrank_common::Result;
use std::collections::HashSet;

/// Everything the ranking stages need from the graph walk.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub seed: SeedProfile,
    /// The actor's direct follows, deduplicated, in server order.
    pub direct_follows: Vec<AccountRef>,
    pub tally: Tally,
}

impl Aggregation {
    pub fn direct_identities(&self) -> HashSet<String> {
        self.direct_follows
            .iter()
            .map(|a| a.identity.clone())
            .collect()
    }
}

/// Walk the actor's second-degree follow graph.
///
/// Any failed fetch aborts the whole aggregation; a partial tally is never
/// returned.
pub async fn aggregate<S>(
    source: &S,
    actor: &str,
    options: &RankOptions,
    progress: &dyn ProgressObserver,
) -> Result<Aggregation>
where
    S: FollowGraphSource + ?Sized,
{
    let seed = SeedProfile {
        account: source.get_profile(actor).await?.account,
    };
    tracing::info!(
        seed = %seed.identity(),
        handle = %seed.account.handle,
        "aggregate.seed_resolved"
    );

    let direct_follows = dedup_by_identity(
        fetch_all_follows(source, seed.identity(), options.page_size).await?,
    );
    let total = direct_follows.len();
    progress.on_event(ProgressEvent::FollowsLoaded { total });
    tracing::info!(total, "aggregate.direct_follows_loaded");

    let page_size = options.page_size;
    let mut fetched = stream::iter(direct_follows.iter())
        .map(|intermediate| async move {
            fetch_all_follows(source, &intermediate.identity, page_size).await
        })
        .buffered(options.concurrency);

    let mut tally = Tally::new();
    let mut done = 0usize;
    while let Some(follows) = fetched.next().await {
        merge_follow_set(&mut tally, &follows?);
        done += 1;
        if done % ACCOUNTS_PROGRESS_EVERY == 0 {
            progress.on_event(ProgressEvent::AccountsProcessed { done, total });
        }
    }
    drop(fetched);

    progress.on_event(ProgressEvent::AggregationFinished {
        candidates: tally.len(),
    });
    tracing::info!(
        intermediates = total,
        candidates = tally.len(),
        concurrency = options.concurrency,
        "aggregate.done"
    );

    Ok(Aggregation {
        seed,
        direct_follows,
        tally,
    })
}

/// Count each candidate at most once for one intermediate's follow-set.
fn merge_follow_set(tally: &mut Tally, follows: &[AccountRef]) {
    let mut seen = HashSet::with_capacity(follows.len());
    for candidate in follows {
        if seen.insert(candidate.identity.as_str()) {
            tally.record(candidate);
        }
    }
}

fn dedup_by_identity(accounts: Vec<AccountRef>) -> Vec<AccountRef> {
    let mut seen = HashSet::with_capacity(accounts.len());
    accounts
        .into_iter()
        .filter(|a| seen.insert(a.identity.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(id: &str) -> AccountRef {
        AccountRef::new(id, format!("{id}.example.com"), None)
    }

    #[test]
    fn duplicate_edges_from_one_intermediate_count_once() {
        let mut tally = Tally::new();
        merge_follow_set(&mut tally, &[acct("x"), acct("x"), acct("y")]);
        merge_follow_set(&mut tally, &[acct("x")]);
        assert_eq!(tally.get("x").unwrap().count, 2);
        assert_eq!(tally.get("y").unwrap().count, 1);
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let out = dedup_by_identity(vec![acct("b"), acct("a"), acct("b"), acct("c")]);
        let ids: Vec<_> = out.iter().map(|a| a.identity.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }
}
