use tracing::debug;

use super::models::StepId;

/// Tracks the active step. Moves forward one step at a time through
/// [`advance`](Self::advance), or jumps anywhere through
/// [`select`](Self::select).
#[derive(Debug, Clone)]
pub struct StepController {
    current: StepId,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            current: StepId::Personal,
        }
    }
}

impl StepController {
    pub fn current(&self) -> StepId {
        self.current
    }

    /// Moves to the next step. Returns `false` and stays put on the last step.
    pub fn advance(&mut self) -> bool {
        match self.current.next() {
            Some(next) => {
                self.current = next;
                true
            }
            None => {
                debug!(step = %self.current, "advance ignored on last step");
                false
            }
        }
    }

    pub fn select(&mut self, step: StepId) {
        self.current = step;
    }
}
