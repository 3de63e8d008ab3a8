//! One-step undo.
//!
//! Each scoring or wicket call that passes validation replaces the stored
//! snapshot with a full copy of the match taken before the first field changes.

use super::ScoringEngine;
use crate::error::{Result, UndoError};
use crate::models::{DismissalKind, ExtraKind, Match};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ActionKind {
    Delivery { runs: u32, extra: Option<ExtraKind> },
    Wicket { kind: DismissalKind },
}

#[derive(Debug, Clone)]
pub struct ActionSnapshot {
    pub action: ActionKind,
    pub previous: Box<Match>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UndoOutcome {
    Restored { action: ActionKind },
    NothingToUndo,
}

#[derive(Debug, Clone, Default)]
pub struct UndoManager {
    last: Option<ActionSnapshot>,
}

impl UndoManager {
    pub fn snapshot(&mut self, m: &Match, action: ActionKind) {
        self.last = Some(ActionSnapshot { action, previous: Box::new(m.clone()) });
    }

    pub fn can_undo(&self) -> bool {
        self.last.is_some()
    }

    pub fn peek(&self) -> Option<&ActionSnapshot> {
        self.last.as_ref()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Restore the snapshot into `m`.
    ///
    /// Refuses, keeping the snapshot, when `m` is not the match the snapshot
    /// was taken from or its innings has changed since.
    pub fn restore(&mut self, m: &mut Match) -> std::result::Result<UndoOutcome, UndoError> {
        let Some(snapshot) = self.last.as_ref() else {
            return Ok(UndoOutcome::NothingToUndo);
        };

        if snapshot.previous.id != m.id {
            return Err(UndoError::DifferentMatch {
                snapshot: snapshot.previous.id.clone(),
                current: m.id.clone(),
            });
        }
        if snapshot.previous.current_innings != m.current_innings {
            return Err(UndoError::AcrossInnings {
                snapshot: snapshot.previous.current_innings,
                current: m.current_innings,
            });
        }

        let Some(snapshot) = self.last.take() else {
            return Ok(UndoOutcome::NothingToUndo);
        };
        *m = *snapshot.previous;
        Ok(UndoOutcome::Restored { action: snapshot.action })
    }
}

impl ScoringEngine {
    pub fn undo(&mut self, m: &mut Match) -> Result<UndoOutcome> {
        match self.undo.restore(m) {
            Ok(UndoOutcome::NothingToUndo) => {
                log::debug!("Nothing to undo");
                Ok(UndoOutcome::NothingToUndo)
            }
            Ok(outcome) => {
                log::info!("Undid {:?}", outcome);
                Ok(outcome)
            }
            Err(e) => {
                log::warn!("Undo refused: {}", e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::live_match;
    use crate::engine::Dismissal;
    use crate::error::ScoringError;

    #[test]
    fn test_nothing_to_undo() {
        let mut engine = ScoringEngine::default();
        let mut m = live_match();
        assert_eq!(engine.undo(&mut m).unwrap(), UndoOutcome::NothingToUndo);
    }

    #[test]
    fn test_boundary_undo_restores_exact_state() {
        let mut engine = ScoringEngine::default();
        let mut m = live_match();
        engine.record_delivery(&mut m, 1, None).unwrap();
        let before = m.clone();

        engine.record_delivery(&mut m, 4, None).unwrap();
        assert_ne!(m, before);

        let outcome = engine.undo(&mut m).unwrap();
        assert_eq!(
            outcome,
            UndoOutcome::Restored { action: ActionKind::Delivery { runs: 4, extra: None } }
        );
        assert_eq!(m, before);
        assert!(!engine.can_undo());
        assert_eq!(engine.undo(&mut m).unwrap(), UndoOutcome::NothingToUndo);
    }

    #[test]
    fn test_rejected_action_keeps_previous_snapshot() {
        let mut engine = ScoringEngine::default();
        let mut m = live_match();
        let before = m.clone();
        engine.record_delivery(&mut m, 2, None).unwrap();
        assert!(engine.record_delivery(&mut m, 9, None).is_err());

        engine.undo(&mut m).unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn test_undo_across_innings_is_refused() {
        let mut engine = ScoringEngine::default();
        let mut m = crate::engine::test_support::live_match_with_sizes(2, 11);
        engine.record_wicket(&mut m, Dismissal::new(DismissalKind::Bowled)).unwrap();
        assert_eq!(m.current_innings, 2);

        let err = engine.undo(&mut m).unwrap_err();
        assert_eq!(err, ScoringError::Undo(UndoError::AcrossInnings { snapshot: 1, current: 2 }));
        assert!(engine.can_undo());
        assert_eq!(m.current_innings, 2);
    }

    #[test]
    fn test_undo_into_another_match_is_refused() {
        let mut engine = ScoringEngine::default();
        let mut scored = live_match();
        let mut other = live_match();
        engine.record_delivery(&mut scored, 4, None).unwrap();
        let untouched = other.clone();

        let err = engine.undo(&mut other).unwrap_err();
        assert!(matches!(err, ScoringError::Undo(UndoError::DifferentMatch { .. })));
        assert_eq!(other, untouched);

        // The snapshot still belongs to the scored match.
        assert!(engine.can_undo());
        engine.undo(&mut scored).unwrap();
        assert_eq!(crate::engine::test_support::innings1(&scored).score, 0);
    }
}
