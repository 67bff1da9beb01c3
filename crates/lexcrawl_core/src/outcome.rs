use std::fmt;
use std::path::PathBuf;

/// Pipeline stage that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    Network,
    Extraction,
    Write,
}

impl FailureStage {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureStage::Network => "network",
            FailureStage::Extraction => "extraction",
            FailureStage::Write => "write",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success { path: PathBuf },
    Failure { stage: FailureStage, reason: String },
    /// Never processed because the batch was cancelled first.
    Skipped,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Success { path } => write!(f, "ok {}", path.display()),
            OutcomeStatus::Failure { stage, reason } => write!(f, "failed ({stage}): {reason}"),
            OutcomeStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result for one input URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    pub url: String,
    pub status: OutcomeStatus,
}

impl CrawlOutcome {
    pub fn success(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            status: OutcomeStatus::Success { path: path.into() },
        }
    }

    pub fn failure(url: impl Into<String>, stage: FailureStage, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: OutcomeStatus::Failure {
                stage,
                reason: reason.into(),
            },
        }
    }

    pub fn skipped(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: OutcomeStatus::Skipped,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failure { .. })
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match &self.status {
            OutcomeStatus::Success { path } => Some(path),
            _ => None,
        }
    }
}

/// Aggregate over a finished batch. Outcomes are in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub outcomes: Vec<CrawlOutcome>,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: Vec<CrawlOutcome>) -> Self {
        let mut report = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in &outcomes {
            match outcome.status {
                OutcomeStatus::Success { .. } => report.succeeded += 1,
                OutcomeStatus::Failure { .. } => report.failed += 1,
                OutcomeStatus::Skipped => report.skipped += 1,
            }
        }
        report.outcomes = outcomes;
        report
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} succeeded={} failed={} skipped={}",
            self.total, self.succeeded, self.failed, self.skipped
        )
    }
}
