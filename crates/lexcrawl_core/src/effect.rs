use crate::ItemIndex;

/// Work the driver must perform after an `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the single-document pipeline for this item.
    Process { index: ItemIndex, url: String },
    /// Pause for the inter-item delay, then send `Msg::DelayElapsed`.
    Wait,
    /// Every item is done; the report is ready.
    Finished,
}
