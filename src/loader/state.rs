//! The forward-only loading state machine published to the page.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use serde::Serialize;

use crate::consts::{MESSAGE_PREPARING, PROGRESS_COMPLETE};

/// Loading phase. Ordering follows the session: `Initial < Critical < Secondary < Complete`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStage {
    #[default]
    Initial,
    Critical,
    Secondary,
    Complete,
}

/// Snapshot rendered by skeletons, spinners and progress bars.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub stage: LoadingStage,
    /// 0 to 100.
    pub progress: u8,
    pub message: String,
    pub is_loading: bool,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { stage: LoadingStage::Initial, progress: 0, message: MESSAGE_PREPARING.to_owned(), is_loading: true }
    }
}

impl LoadingState {
    /// Move to (`stage`, `progress`) with a new message.
    ///
    /// Refuses any step that would move the stage or progress backwards and
    /// returns whether the state changed.
    pub fn advance(&mut self, stage: LoadingStage, progress: u8, message: &str) -> bool {
        let progress = progress.min(PROGRESS_COMPLETE);
        if stage < self.stage || progress < self.progress {
            return false;
        }
        let changed = stage != self.stage || progress != self.progress || message != self.message;
        self.stage = stage;
        self.progress = progress;
        if message != self.message {
            self.message = message.to_owned();
        }
        changed
    }

    /// Clear `is_loading`. Only allowed once `Complete` has been reached.
    pub fn finish(&mut self) -> bool {
        if self.stage != LoadingStage::Complete || !self.is_loading {
            return false;
        }
        self.is_loading = false;
        true
    }
}
