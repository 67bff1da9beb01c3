//! Lexcrawl core: pure batch state machine and outcome types.
mod effect;
mod input;
mod msg;
mod outcome;
mod state;
mod update;

pub use effect::Effect;
pub use input::{is_absolute_http_url, parse_url_list};
pub use msg::Msg;
pub use outcome::{BatchReport, CrawlOutcome, FailureStage, OutcomeStatus};
pub use state::{BatchItem, BatchPhase, BatchState, ItemIndex, ItemState};
pub use update::update;
