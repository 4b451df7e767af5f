use clap::{Parser, ValueEnum};
use skyrank_common::observability::LogFormat;
use skyrank_common::OutputFormat;
use skyrank_config::SkyrankConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Ranks accounts by their popularity among the accounts you follow.
#[derive(Debug, Parser)]
#[command(name = "skyrank", version, about)]
pub struct Cli {
    /// Your account DID or fully qualified handle, e.g. foobar.bsky.social
    pub actor: String,

    /// Number of results to show in each ranking [default: 30]
    #[arg(short = 'n', long = "number-to-show")]
    pub number_to_show: Option<usize>,

    /// Only show accounts in the relative ranking that are followed by at
    /// least this many accounts [default: 500]
    #[arg(short = 'l', long = "global-follower-threshold")]
    pub global_follower_threshold: Option<u64>,

    /// Only show accounts in the relative ranking that are followed by at
    /// least this many accounts that you follow [default: 5]
    #[arg(short = 'g', long = "local-follower-threshold")]
    pub local_follower_threshold: Option<u32>,

    /// Follow-set fetches in flight at once [default: 1]
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Profiles per bulk lookup, at most 25 [default: 25]
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Follows per listing page, at most 100 [default: 100]
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Retries for rate-limited or failed requests [default: 0]
    #[arg(long)]
    pub retries: Option<usize>,

    /// Per-request timeout in seconds [default: 15]
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// AppView base URL
    #[arg(long, env = "SKYRANK_BASE_URL")]
    pub base_url: Option<String>,

    /// Output format for the rankings
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Optional YAML/TOML/JSON configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Mirror log events to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Do not write the rolling log file
    #[arg(long)]
    pub no_log_file: bool,

    /// Emit log events as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Flags win over every configuration source.
    pub fn apply(&self, cfg: &mut SkyrankConfig) {
        if let Some(n) = self.number_to_show {
            cfg.ranking.number_to_show = n;
        }
        if let Some(t) = self.global_follower_threshold {
            cfg.ranking.global_follower_threshold = t;
        }
        if let Some(t) = self.local_follower_threshold {
            cfg.ranking.local_follower_threshold = t;
        }
        if let Some(c) = self.concurrency {
            cfg.fetch.concurrency = c;
        }
        if let Some(b) = self.batch_size {
            cfg.fetch.batch_size = b;
        }
        if let Some(p) = self.page_size {
            cfg.fetch.page_size = p;
        }
        if let Some(r) = self.retries {
            cfg.api.retries = r;
        }
        if let Some(t) = self.timeout_secs {
            cfg.api.timeout_secs = t;
        }
        if let Some(url) = &self.base_url {
            cfg.api.base_url = url.clone();
        }
        if let Some(f) = self.format {
            cfg.output.format = f.into();
        }
        if self.verbose {
            cfg.log.stderr = true;
        }
        if self.no_log_file {
            cfg.log.file = false;
        }
        if self.json_logs {
            cfg.log.format = LogFormat::Json;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_is_required() {
        assert!(Cli::try_parse_from(["skyrank"]).is_err());
    }

    #[test]
    fn non_integer_flags_are_rejected() {
        for args in [
            ["skyrank", "me.test", "-n", "lots"],
            ["skyrank", "me.test", "-l", "1.5"],
            ["skyrank", "me.test", "-g", "-3"],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{args:?} parsed");
        }
    }

    #[test]
    fn short_flags_follow_original_layout() {
        let cli =
            Cli::try_parse_from(["skyrank", "me.test", "-n", "0", "-l", "100", "-g", "2"]).unwrap();
        let mut cfg = SkyrankConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.ranking.number_to_show, 0);
        assert_eq!(cfg.ranking.global_follower_threshold, 100);
        assert_eq!(cfg.ranking.local_follower_threshold, 2);
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let cli = Cli::try_parse_from(["skyrank", "did:plc:abc"]).unwrap();
        let mut cfg = SkyrankConfig::default();
        cfg.ranking.number_to_show = 12;
        cfg.api.retries = 3;
        cli.apply(&mut cfg);
        assert_eq!(cfg.ranking.number_to_show, 12);
        assert_eq!(cfg.api.retries, 3);
        assert_eq!(cli.actor, "did:plc:abc");
    }

    #[test]
    fn output_and_logging_flags() {
        let cli = Cli::try_parse_from([
            "skyrank",
            "me.test",
            "--format",
            "json",
            "-v",
            "--no-log-file",
            "-j",
            "8",
        ])
        .unwrap();
        let mut cfg = SkyrankConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert!(cfg.log.stderr);
        assert!(!cfg.log.file);
        assert_eq!(cfg.fetch.concurrency, 8);
    }
}
