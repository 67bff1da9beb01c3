use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{ExtractSettings, FetchError, FetchSettings, DEFAULT_SOURCE_LABEL};

/// Source of capture timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Everything a crawl needs, passed explicitly to the pipeline and orchestrator.
#[derive(Clone)]
pub struct EngineConfig {
    pub output_dir: PathBuf,
    /// Pause between two consecutive items of a batch.
    pub delay: Duration,
    pub fetch: FetchSettings,
    pub extract: ExtractSettings,
    pub source_label: String,
    pub clock: Clock,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            delay: DEFAULT_DELAY,
            fetch: FetchSettings::default(),
            extract: ExtractSettings::default(),
            source_label: DEFAULT_SOURCE_LABEL.to_string(),
            clock: system_clock(),
        }
    }

    /// Reject settings that would make every item fail or misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }
        if self.fetch.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        if self.source_label.trim().is_empty() {
            return Err(ConfigError::EmptySourceLabel);
        }
        let tolerance = self.extract.near_equal_tolerance;
        if !(0.0..1.0).contains(&tolerance) {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if !self.extract.link_penalty.is_finite() || self.extract.link_penalty < 0.0 {
            return Err(ConfigError::InvalidLinkPenalty(self.extract.link_penalty));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_with_output(PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("output_dir", &self.output_dir)
            .field("delay", &self.delay)
            .field("fetch", &self.fetch)
            .field("extract", &self.extract)
            .field("source_label", &self.source_label)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("output directory must not be empty")]
    EmptyOutputDir,
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("user agent must not be empty")]
    EmptyUserAgent,
    #[error("source label must not be empty")]
    EmptySourceLabel,
    #[error("near-equal tolerance must be in [0, 1), got {0}")]
    InvalidTolerance(f64),
    #[error("link penalty must be a non-negative number, got {0}")]
    InvalidLinkPenalty(f64),
    #[error("http client: {0}")]
    Client(#[from] FetchError),
}
