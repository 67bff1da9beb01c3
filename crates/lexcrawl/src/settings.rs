//! Resolves the effective [`EngineConfig`] from defaults, an optional RON
//! config file and command-line flags, in increasing order of precedence.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use lexcrawl_core::parse_url_list;
use lexcrawl_engine::EngineConfig;
use lexcrawl_logging::crawl_info;
use ron::extensions::Extensions;
use serde::Deserialize;

use crate::cli::SettingsArgs;

/// Contents of a config file. Every field is optional.
///
/// ```ron
/// (
///     output_dir: "gazette",
///     delay_secs: 5.0,
///     retries: 1,
/// )
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub delay_secs: Option<f64>,
    pub timeout_secs: Option<f64>,
    pub connect_timeout_secs: Option<f64>,
    pub retries: Option<u32>,
    pub retry_backoff_secs: Option<f64>,
    pub max_bytes: Option<u64>,
    pub user_agent: Option<String>,
    pub min_content_chars: Option<usize>,
    pub near_equal_tolerance: Option<f64>,
    pub link_penalty: Option<f64>,
    pub source_label: Option<String>,
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    let config = parse_file_config(&content)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    crawl_info!("Loaded settings from {:?}", path);
    Ok(config)
}

fn parse_file_config(content: &str) -> Result<FileConfig> {
    let options = ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
    Ok(options.from_str(content)?)
}

/// Flags override the file, the file overrides the defaults.
pub fn resolve(args: &SettingsArgs, file: FileConfig) -> Result<EngineConfig> {
    let output_dir = args
        .output_dir
        .clone()
        .or(file.output_dir)
        .unwrap_or_else(|| EngineConfig::default().output_dir);
    let mut config = EngineConfig::default_with_output(output_dir);

    if let Some(secs) = args.delay_secs.or(file.delay_secs) {
        config.delay = seconds("delay", secs)?;
    }
    if let Some(secs) = args.timeout_secs.or(file.timeout_secs) {
        config.fetch.request_timeout = positive_seconds("timeout", secs)?;
    }
    if let Some(secs) = file.connect_timeout_secs {
        config.fetch.connect_timeout = positive_seconds("connect timeout", secs)?;
    }
    if let Some(secs) = file.retry_backoff_secs {
        config.fetch.retry_backoff = seconds("retry backoff", secs)?;
    }
    if let Some(retries) = args.retries.or(file.retries) {
        config.fetch.retries = retries;
    }
    if let Some(max_bytes) = file.max_bytes {
        ensure!(max_bytes > 0, "max_bytes must be greater than zero");
        config.fetch.max_bytes = max_bytes;
    }
    if let Some(user_agent) = args.user_agent.clone().or(file.user_agent) {
        config.fetch.user_agent = user_agent;
    }
    if let Some(min) = args.min_content_chars.or(file.min_content_chars) {
        config.extract.min_content_chars = min;
    }
    if let Some(tolerance) = file.near_equal_tolerance {
        config.extract.near_equal_tolerance = tolerance;
    }
    if let Some(penalty) = file.link_penalty {
        config.extract.link_penalty = penalty;
    }
    if let Some(label) = args.source_label.clone().or(file.source_label) {
        config.source_label = label;
    }

    config.validate()?;
    Ok(config)
}

/// Input file entries first, then positional URLs. Duplicates are kept.
pub fn collect_urls(positional: &[String], input: Option<&Path>) -> Result<Vec<String>> {
    let mut urls = match input {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("cannot read URL list {}", path.display()))?;
            parse_url_list(&raw)
        }
        None => Vec::new(),
    };
    urls.extend(
        positional
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string),
    );
    if urls.is_empty() {
        bail!("no URLs given; pass them as arguments or with --input");
    }
    Ok(urls)
}

fn seconds(name: &str, secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        bail!("{name} must be a non-negative number of seconds, got {secs}");
    }
    Duration::try_from_secs_f64(secs).with_context(|| format!("{name} out of range: {secs}"))
}

fn positive_seconds(name: &str, secs: f64) -> Result<Duration> {
    let duration = seconds(name, secs)?;
    ensure!(!duration.is_zero(), "{name} must be greater than zero");
    Ok(duration)
}
