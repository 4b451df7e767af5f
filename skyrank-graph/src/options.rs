use serde::{Deserialize, Serialize};
use skyrank_common::{Result, SkyrankError};

/// Largest page the follow listing accepts.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Largest batch the bulk profile lookup accepts.
pub const MAX_BATCH_SIZE: usize = 25;

/// Knobs for a single ranking run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankOptions {
    /// Entries shown per ranking; `0` yields empty rankings.
    pub number_to_show: usize,
    /// Minimum total followers for the relative ranking.
    pub global_follower_threshold: u64,
    /// Minimum tally count for a candidate to be enriched.
    pub local_follower_threshold: u32,
    pub page_size: u32,
    pub batch_size: usize,
    /// Follow-set fetches in flight at once; `1` is fully sequential.
    pub concurrency: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            number_to_show: 30,
            global_follower_threshold: 500,
            local_follower_threshold: 5,
            page_size: MAX_PAGE_SIZE,
            batch_size: MAX_BATCH_SIZE,
            concurrency: 1,
        }
    }
}

impl RankOptions {
    /// Reject options the remote service or the pipeline cannot honor.
    ///
    /// ```
    /// use skyrank_graph::RankOptions;
    ///
    /// assert!(RankOptions::default().validate().is_ok());
    ///
    /// let opts = RankOptions { batch_size: 26, ..Default::default() };
    /// assert!(opts.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(SkyrankError::InvalidOption(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if !(1..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(SkyrankError::InvalidOption(format!(
                "batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            )));
        }
        if self.concurrency == 0 {
            return Err(SkyrankError::InvalidOption(
                "concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let o = RankOptions::default();
        assert_eq!(o.number_to_show, 30);
        assert_eq!(o.global_follower_threshold, 500);
        assert_eq!(o.local_follower_threshold, 5);
        assert_eq!(o.batch_size, 25);
        assert_eq!(o.concurrency, 1);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        for opts in [
            RankOptions { page_size: 0, ..Default::default() },
            RankOptions { page_size: 101, ..Default::default() },
            RankOptions { batch_size: 0, ..Default::default() },
            RankOptions { concurrency: 0, ..Default::default() },
        ] {
            assert!(matches!(
                opts.validate(),
                Err(SkyrankError::InvalidOption(_))
            ));
        }
    }

    #[test]
    fn zero_display_count_is_valid() {
        let o = RankOptions { number_to_show: 0, local_follower_threshold: 0, ..Default::default() };
        assert!(o.validate().is_ok());
    }
}
