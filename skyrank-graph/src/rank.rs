//! Filtering and the two ranking views.
//!
//! Ties on the primary metric are broken by identity ascending so repeated
//! runs over the same graph print the same order.
use crate::model::{Tally, TallyEntry};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Drop the actor and everyone the actor already follows.
pub fn filter_exclude_self_and_direct(
    tally: Tally,
    seed_identity: &str,
    direct_identities: &HashSet<String>,
) -> Vec<TallyEntry> {
    tally
        .into_entries()
        .filter(|e| e.identity() != seed_identity && !direct_identities.contains(e.identity()))
        .collect()
}

/// Sort in place by count descending, then identity.
pub fn sort_by_count(entries: &mut [TallyEntry]) {
    entries.sort_by(by_count);
}

/// Ranking view A: the `n` candidates with the highest counts.
pub fn rank_absolute(entries: &[TallyEntry], n: usize) -> Vec<TallyEntry> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(by_count);
    ranked.truncate(n);
    ranked
}

/// Ranking view B: the `n` enriched candidates with the highest share among
/// those with at least `global_threshold` followers.
///
/// Entries without a share (below the local threshold, or zero
/// followers) are left out.
pub fn rank_relative(entries: &[TallyEntry], global_threshold: u64, n: usize) -> Vec<TallyEntry> {
    let mut ranked: Vec<TallyEntry> = entries
        .iter()
        .filter(|e| e.share.is_some())
        .filter(|e| e.followers_count.is_some_and(|f| f >= global_threshold))
        .cloned()
        .collect();
    ranked.sort_by(by_share);
    ranked.truncate(n);
    ranked
}

fn by_count(a: &TallyEntry, b: &TallyEntry) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.identity().cmp(b.identity()))
}

fn by_share(a: &TallyEntry, b: &TallyEntry) -> Ordering {
    let (sa, sb) = (a.share.unwrap_or(0.0), b.share.unwrap_or(0.0));
    sb.total_cmp(&sa)
        .then_with(|| a.identity().cmp(b.identity()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountRef;

    fn entry(id: &str, count: u32, followers: Option<u64>) -> TallyEntry {
        let mut tally = Tally::new();
        let account = AccountRef::new(id, format!("{id}.example.com"), None);
        for _ in 0..count {
            tally.record(&account);
        }
        let mut e = tally.into_entries().next().unwrap();
        if let Some(f) = followers {
            e.apply_followers(f);
        }
        e
    }

    fn ids(entries: &[TallyEntry]) -> Vec<&str> {
        entries.iter().map(TallyEntry::identity).collect()
    }

    #[test]
    fn filter_removes_seed_and_direct_follows() {
        let mut tally = Tally::new();
        for id in ["seed", "d1", "d2", "c1", "c2"] {
            tally.record(&AccountRef::new(id, id, None));
        }
        let direct: HashSet<String> = ["d1", "d2"].into_iter().map(String::from).collect();
        let mut out = filter_exclude_self_and_direct(tally, "seed", &direct);
        sort_by_count(&mut out);
        assert_eq!(ids(&out), ["c1", "c2"]);
    }

    #[test]
    fn absolute_sorts_by_count_then_identity() {
        let entries = vec![
            entry("b", 3, None),
            entry("a", 3, None),
            entry("c", 7, None),
            entry("d", 1, None),
        ];
        assert_eq!(ids(&rank_absolute(&entries, 10)), ["c", "a", "b", "d"]);
        assert_eq!(ids(&rank_absolute(&entries, 2)), ["c", "a"]);
        assert!(rank_absolute(&entries, 0).is_empty());
    }

    #[test]
    fn relative_applies_global_threshold_and_sorts_by_share() {
        let entries = vec![
            entry("big", 10, Some(10_000)),  // 0.001
            entry("niche", 6, Some(600)),    // 0.01
            entry("small", 5, Some(100)),    // below threshold
            entry("mid", 8, Some(1_000)),    // 0.008
            entry("unenriched", 9, None),
        ];
        let ranked = rank_relative(&entries, 500, 30);
        assert_eq!(ids(&ranked), ["niche", "mid", "big"]);
        for e in &ranked {
            let expect = f64::from(e.count) / e.followers_count.unwrap() as f64;
            assert!((e.share.unwrap() - expect).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_follower_profiles_never_rank_relatively() {
        let entries = vec![entry("ghost", 4, Some(0)), entry("real", 4, Some(40))];
        assert_eq!(ids(&rank_relative(&entries, 0, 30)), ["real"]);
    }

    #[test]
    fn relative_ties_break_on_identity() {
        let entries = vec![entry("z", 1, Some(10)), entry("y", 2, Some(20))];
        assert_eq!(ids(&rank_relative(&entries, 0, 30)), ["y", "z"]);
    }
}
