use super::completion::MatchResult;
use super::delivery::DeliveryOutcome;
use super::undo::UndoOutcome;
use super::wicket::{Dismissal, WicketOutcome};
use super::ScoringEngine;
use crate::error::Result;
use crate::models::{DismissalKind, ExtraKind, Match, PlayerId};
use serde::{Deserialize, Serialize};

/// Every call a scoring surface can make, in a serializable form so command
/// scripts can be replayed against a stored match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScoringCommand {
    StartMatch {
        striker: PlayerId,
        #[serde(rename = "nonStriker")]
        non_striker: PlayerId,
        bowler: PlayerId,
    },
    Delivery {
        runs: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extra: Option<ExtraKind>,
    },
    Wicket {
        kind: DismissalKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        batsman: Option<PlayerId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fielder: Option<PlayerId>,
    },
    Undo,
    NewBatsman {
        batsman: PlayerId,
    },
    NewBowler {
        bowler: PlayerId,
    },
    StartSecondInnings {
        striker: PlayerId,
        #[serde(rename = "nonStriker")]
        non_striker: PlayerId,
        bowler: PlayerId,
    },
    EndMatchEarly,
    RotateStrike,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "camelCase")]
pub enum CommandOutcome {
    MatchStarted,
    Delivery(DeliveryOutcome),
    Wicket(WicketOutcome),
    Undo(UndoOutcome),
    BatsmanAssigned,
    BowlerAssigned,
    SecondInningsStarted,
    MatchEnded(MatchResult),
    StrikeRotated,
}

impl ScoringEngine {
    /// Dispatch a command to the matching engine call.
    pub fn apply(&mut self, m: &mut Match, command: ScoringCommand) -> Result<CommandOutcome> {
        log::debug!("Applying {:?}", command);
        let outcome = match command {
            ScoringCommand::StartMatch { striker, non_striker, bowler } => {
                self.start_match(m, &striker, &non_striker, &bowler)?;
                CommandOutcome::MatchStarted
            }
            ScoringCommand::Delivery { runs, extra } => {
                CommandOutcome::Delivery(self.record_delivery(m, runs, extra)?)
            }
            ScoringCommand::Wicket { kind, batsman, fielder } => {
                let dismissal = Dismissal { kind, batsman, fielder };
                CommandOutcome::Wicket(self.record_wicket(m, dismissal)?)
            }
            ScoringCommand::Undo => CommandOutcome::Undo(self.undo(m)?),
            ScoringCommand::NewBatsman { batsman } => {
                self.assign_new_batsman(m, &batsman)?;
                CommandOutcome::BatsmanAssigned
            }
            ScoringCommand::NewBowler { bowler } => {
                self.assign_new_bowler(m, &bowler)?;
                CommandOutcome::BowlerAssigned
            }
            ScoringCommand::StartSecondInnings { striker, non_striker, bowler } => {
                self.start_second_innings(m, &striker, &non_striker, &bowler)?;
                CommandOutcome::SecondInningsStarted
            }
            ScoringCommand::EndMatchEarly => CommandOutcome::MatchEnded(self.end_match_early(m)?),
            ScoringCommand::RotateStrike => {
                self.rotate_strike(m)?;
                CommandOutcome::StrikeRotated
            }
        };
        Ok(outcome)
    }
}
