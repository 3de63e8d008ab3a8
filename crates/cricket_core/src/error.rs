use crate::models::{DismissalKind, PlayerId, UnknownKind};
use std::fmt;
use thiserror::Error;

/// A precondition a scoring call failed. Recoverable by correcting the input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Match is already complete")]
    MatchComplete,

    #[error("Match is not live")]
    MatchNotLive,

    #[error("Match has already started")]
    MatchAlreadyStarted,

    #[error("No innings in progress")]
    NoInnings,

    #[error("Innings {number} is already complete")]
    InningsComplete { number: u8 },

    #[error("Second innings has not been set up")]
    AwaitingSecondInnings,

    #[error("First innings is still in progress")]
    FirstInningsInProgress,

    #[error("Second innings has already started")]
    SecondInningsStarted,

    #[error("Select a new bowler before the next ball")]
    NewBowlerRequired,

    #[error("Select a new batsman before the next ball")]
    NewBatsmanRequired,

    #[error("No batsman needs replacing")]
    NoVacancy,

    #[error("Runs must be between {min} and {max}, got {runs}")]
    RunsOutOfRange { runs: u32, min: u32, max: u32 },

    #[error("Select both batsmen before scoring")]
    BatsmenNotSelected,

    #[error("Select a bowler before scoring")]
    BowlerNotSelected,

    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),

    #[error("Run out needs the dismissed batsman")]
    RunOutBatsmanMissing,

    #[error("Player {0} is not at the crease")]
    BatsmanNotAtCrease(PlayerId),

    #[error("Cannot be {0} on a free hit")]
    FreeHitDismissal(DismissalKind),

    #[error("Cannot retire hurt when only one wicket remains")]
    RetiredHurtOnLastWicket,

    #[error("All {max} wickets have fallen")]
    WicketLimitReached { wickets: u32, max: u32 },

    #[error("Invalid team: {0}")]
    InvalidTeam(String),

    #[error("Overs must be between {min} and {max}, got {overs}")]
    OversOutOfRange { overs: u32, min: u32, max: u32 },

    #[error("{team} needs at least 2 eligible batsmen, found {available}")]
    NotEnoughBatsmen { team: String, available: usize },

    #[error("{team} has no eligible bowler")]
    NoEligibleBowler { team: String },

    #[error("Striker and non-striker must be different players")]
    SameBatsmanTwice,

    #[error("Player {id} is not in the playing XI of {team}")]
    PlayerNotInTeam { id: PlayerId, team: String },

    #[error("Player {id} cannot bat: {reason}")]
    BatsmanUnavailable { id: PlayerId, reason: &'static str },

    #[error("Player {0} bowled the previous over")]
    ConsecutiveOvers(PlayerId),
}

/// Outcome of the validation gate: empty means the action may proceed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(error: ValidationError) -> Self {
        Self { errors: vec![error] }
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(ScoringError::Rejected(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("ok");
        }
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl From<ValidationError> for ValidationReport {
    fn from(error: ValidationError) -> Self {
        Self::single(error)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UndoError {
    #[error("Cannot undo across innings (snapshot is from innings {snapshot}, match is in innings {current})")]
    AcrossInnings { snapshot: u8, current: u8 },

    #[error("Cannot undo into match {current} (snapshot belongs to match {snapshot})")]
    DifferentMatch { snapshot: String, current: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Action rejected: {0}")]
    Rejected(ValidationReport),

    /// Sequencing bug in the caller: an innings that must exist does not.
    #[error("Innings {number} is missing")]
    MissingInnings { number: u8 },

    #[error("Unknown player: {id}")]
    UnknownPlayer { id: PlayerId },

    #[error(transparent)]
    Undo(#[from] UndoError),
}

impl ScoringError {
    /// Whether re-prompting the user can fix the failure.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ScoringError::Rejected(_) => true,
            ScoringError::Undo(_) => true,
            ScoringError::MissingInnings { .. } => false,
            ScoringError::UnknownPlayer { .. } => false,
        }
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            ScoringError::Rejected(report) => &report.errors,
            _ => &[],
        }
    }
}

impl From<ValidationError> for ScoringError {
    fn from(error: ValidationError) -> Self {
        ScoringError::Rejected(ValidationReport::single(error))
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display_joins_messages() {
        let mut report = ValidationReport::new();
        report.push(ValidationError::BatsmenNotSelected);
        report.push(ValidationError::RunsOutOfRange { runs: 7, min: 0, max: 6 });
        insta::assert_snapshot!(
            report.to_string(),
            @"Select both batsmen before scoring; Runs must be between 0 and 6, got 7"
        );
    }

    #[test]
    fn test_empty_report_is_ok() {
        let report = ValidationReport::new();
        assert!(report.is_ok());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_recoverability() {
        let rejected: ScoringError = ValidationError::MatchNotLive.into();
        assert!(rejected.is_recoverable());
        assert_eq!(rejected.validation_errors(), &[ValidationError::MatchNotLive]);
        assert!(!ScoringError::MissingInnings { number: 2 }.is_recoverable());
    }
}
