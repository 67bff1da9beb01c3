use crate::{ItemIndex, OutcomeStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin processing the batch.
    Start,
    /// The pipeline finished the in-flight item.
    ItemCompleted {
        index: ItemIndex,
        status: OutcomeStatus,
    },
    /// The inter-item delay has passed.
    DelayElapsed,
    /// Stop after the in-flight item; remaining items are skipped.
    CancelRequested,
}
