//! Loader for Skyrank configuration with YAML + environment overlays.
//!
//! Precedence, lowest first: built-in defaults, an optional YAML/TOML/JSON
//! file, then `SKYRANK__SECTION__KEY` environment variables. String values may
//! reference `${VAR}` and are expanded after merging. Command-line flags are
//! applied on top by the binary.
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use skyrank_common::observability::LogFormat;
use skyrank_common::OutputFormat;
use skyrank_graph::RankOptions;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
pub const ENV_PREFIX: &str = "SKYRANK";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyrankConfig {
    pub ranking: RankingConfig,
    pub fetch: FetchConfig,
    pub api: ApiConfig,
    pub log: LogSettings,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub number_to_show: usize,
    pub global_follower_threshold: u64,
    pub local_follower_threshold: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        let d = RankOptions::default();
        Self {
            number_to_show: d.number_to_show,
            global_follower_threshold: d.global_follower_threshold,
            local_follower_threshold: d.local_follower_threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub page_size: u32,
    pub batch_size: usize,
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let d = RankOptions::default();
        Self {
            page_size: d.page_size,
            batch_size: d.batch_size,
            concurrency: d.concurrency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Retries for 429/5xx/network failures; `0` disables retrying.
    pub retries: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://public.api.bsky.app".into(),
            timeout_secs: 15,
            retries: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub format: LogFormat,
    pub filter: String,
    pub dir: Option<PathBuf>,
    pub file: bool,
    pub stderr: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "info".into(),
            dir: None,
            file: true,
            stderr: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl SkyrankConfig {
    /// Ranking options for the core pipeline.
    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            number_to_show: self.ranking.number_to_show,
            global_follower_threshold: self.ranking.global_follower_threshold,
            local_follower_threshold: self.ranking.local_follower_threshold,
            page_size: self.fetch.page_size,
            batch_size: self.fetch.batch_size,
            concurrency: self.fetch.concurrency,
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (file + env overrides).
pub struct SkyrankConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    with_env: bool,
}

impl Default for SkyrankConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SkyrankConfigLoader {
    /// Defaults plus `SKYRANK__` env overrides.
    ///
    /// ```
    /// use skyrank_config::SkyrankConfigLoader;
    ///
    /// let cfg = SkyrankConfigLoader::new()
    ///     .without_env()
    ///     .with_yaml_str("ranking:\n  number_to_show: 10\n")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.ranking.number_to_show, 10);
    /// assert_eq!(cfg.ranking.global_follower_threshold, 500);
    /// assert_eq!(cfg.fetch.batch_size, 25);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            with_env: true,
        }
    }

    /// Skip the environment overlay.
    pub fn without_env(mut self) -> Self {
        self.with_env = false;
        self
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge the sources, expand `${VAR}` placeholders and deserialize.
    pub fn load(self) -> Result<SkyrankConfig, ConfigError> {
        let mut builder = self.builder;
        if self.with_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        }
        let cfg = builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
