use crate::{BatchReport, CrawlOutcome, Effect, OutcomeStatus};

/// Position of an item in the input sequence.
pub type ItemIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    InFlight,
    Done(OutcomeStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub url: String,
    pub state: ItemState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPhase {
    #[default]
    Idle,
    Processing,
    Waiting,
    Finished,
}

/// Sequential batch: at most one item in flight, items started in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchState {
    items: Vec<BatchItem>,
    phase: BatchPhase,
    cancel_requested: bool,
}

impl BatchState {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: urls
                .into_iter()
                .map(|url| BatchItem {
                    url: url.into(),
                    state: ItemState::Pending,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BatchPhase::Finished
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }

    pub fn in_flight(&self) -> Option<ItemIndex> {
        self.items
            .iter()
            .position(|item| item.state == ItemState::InFlight)
    }

    /// Report over all items. Items that never reached `Done` count as skipped.
    pub fn report(&self) -> BatchReport {
        let outcomes = self
            .items
            .iter()
            .map(|item| match &item.state {
                ItemState::Done(status) => CrawlOutcome {
                    url: item.url.clone(),
                    status: status.clone(),
                },
                ItemState::Pending | ItemState::InFlight => CrawlOutcome::skipped(&item.url),
            })
            .collect();
        BatchReport::from_outcomes(outcomes)
    }

    pub(crate) fn request_cancel(&mut self) {
        self.cancel_requested = true;
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.items
            .iter()
            .any(|item| item.state == ItemState::Pending)
    }

    pub(crate) fn start_next(&mut self) -> Vec<Effect> {
        let next = self
            .items
            .iter()
            .position(|item| item.state == ItemState::Pending);
        match next {
            Some(index) => {
                let item = &mut self.items[index];
                item.state = ItemState::InFlight;
                self.phase = BatchPhase::Processing;
                vec![Effect::Process {
                    index,
                    url: item.url.clone(),
                }]
            }
            None => self.finish(),
        }
    }

    /// Record the in-flight item's outcome. Returns false for a stale index.
    pub(crate) fn complete(&mut self, index: ItemIndex, status: OutcomeStatus) -> bool {
        match self.items.get_mut(index) {
            Some(item) if item.state == ItemState::InFlight => {
                item.state = ItemState::Done(status);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn enter_wait(&mut self) -> Vec<Effect> {
        self.phase = BatchPhase::Waiting;
        vec![Effect::Wait]
    }

    pub(crate) fn skip_pending(&mut self) {
        for item in &mut self.items {
            if item.state == ItemState::Pending {
                item.state = ItemState::Done(OutcomeStatus::Skipped);
            }
        }
    }

    pub(crate) fn finish(&mut self) -> Vec<Effect> {
        self.phase = BatchPhase::Finished;
        vec![Effect::Finished]
    }
}
