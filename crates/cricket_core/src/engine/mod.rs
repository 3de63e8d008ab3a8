//! Ball-by-ball scoring engine.
//!
//! Every mutating call runs the validation gate first, snapshots the match for
//! undo, applies the processor, then checks over and innings boundaries. The
//! engine never keeps the match between calls.

pub mod batsmen;
pub mod command;
pub mod commentary;
pub mod completion;
pub mod delivery;
pub mod setup;
pub mod transition;
pub mod undo;
pub mod validation;
pub mod wicket;

#[cfg(test)]
mod scenario_tests;
#[cfg(test)]
pub(crate) mod test_support;

pub use batsmen::{eligible_new_batsmen, repair_current_batsmen, resolve_current_batsmen, Candidate};
pub use command::{CommandOutcome, ScoringCommand};
pub use completion::{calculate_awards, calculate_result, InningsTransition, MatchResult};
pub use delivery::DeliveryOutcome;
pub use transition::eligible_bowlers;
pub use undo::{ActionKind, ActionSnapshot, UndoManager, UndoOutcome};
pub use validation::{validate, Action};
pub use wicket::{Dismissal, WicketOutcome};

use crate::config::ScoringConfig;
use crate::models::Match;

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
    undo: UndoManager,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config, undo: UndoManager::default() }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo
    }

    /// Whether the innings in progress is inside the configured powerplay.
    pub fn is_powerplay(&self, m: &Match) -> bool {
        m.current_innings()
            .map_or(false, |i| i.is_powerplay(self.config.rules.powerplay_overs))
    }
}
