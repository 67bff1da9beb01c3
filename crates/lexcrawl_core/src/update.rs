use crate::{BatchPhase, BatchState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: BatchState, msg: Msg) -> (BatchState, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => match state.phase() {
            BatchPhase::Idle => state.start_next(),
            _ => Vec::new(),
        },
        Msg::ItemCompleted { index, status } => {
            if !state.complete(index, status) {
                return (state, Vec::new());
            }
            if state.cancel_requested() {
                state.skip_pending();
                state.finish()
            } else if state.has_pending() {
                // No delay before the first item or after the last.
                state.enter_wait()
            } else {
                state.finish()
            }
        }
        Msg::DelayElapsed => match state.phase() {
            BatchPhase::Waiting => state.start_next(),
            _ => Vec::new(),
        },
        Msg::CancelRequested => {
            state.request_cancel();
            match state.phase() {
                // Never interrupt an in-flight item; it is wrapped up on completion.
                BatchPhase::Processing | BatchPhase::Finished => Vec::new(),
                BatchPhase::Idle | BatchPhase::Waiting => {
                    state.skip_pending();
                    state.finish()
                }
            }
        }
    };

    (state, effects)
}
