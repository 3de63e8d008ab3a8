//! Over boundaries and bowler changes.

use super::validation::require_innings_in_progress;
use super::ScoringEngine;
use crate::error::{Result, ScoringError, ValidationError};
use crate::models::{Innings, Match, Player};

/// Close the over after its sixth counted ball.
///
/// The strike swaps for the new over regardless of the runs taken, and the
/// bowler is released so the caller must pick the next one.
pub(crate) fn complete_over(innings: &mut Innings) {
    innings.overs += 1;
    innings.balls = 0;
    innings.current_batsmen.swap();

    if let Some(over) = innings.over_history.last_mut() {
        over.is_complete = true;
    }

    innings.last_over_bowler = innings.current_bowler.take();
    innings.needs_new_bowler = true;

    log::debug!(
        "Over {} complete at {}, last bowler {:?}",
        innings.overs,
        innings.score_line(),
        innings.last_over_bowler
    );
}

/// Bowlers who may take the next over: everyone in the fielding XI except the
/// bowler of the over just finished and the bowler being replaced.
pub fn eligible_bowlers(m: &Match) -> Vec<&Player> {
    let Some(innings) = m.current_innings() else {
        return Vec::new();
    };
    let excluded = [innings.last_over_bowler.as_deref(), innings.current_bowler.as_deref()];
    m.bowling_team()
        .playing_xi
        .iter()
        .filter(|p| !excluded.contains(&Some(p.id.as_str())))
        .collect()
}

impl ScoringEngine {
    /// Put `bowler` on, either for a new over or as a mid-over replacement.
    pub fn assign_new_bowler(&mut self, m: &mut Match, bowler: &str) -> Result<()> {
        require_innings_in_progress(m)?;

        let team = m.bowling_team();
        if !team.contains(bowler) {
            return Err(ValidationError::PlayerNotInTeam {
                id: bowler.to_string(),
                team: team.name.clone(),
            }
            .into());
        }

        let number = m.current_innings;
        let innings = m.current_innings_mut().ok_or(ScoringError::MissingInnings { number })?;
        if innings.last_over_bowler.as_deref() == Some(bowler) {
            return Err(ValidationError::ConsecutiveOvers(bowler.to_string()).into());
        }

        innings.current_bowler = Some(bowler.to_string());
        innings.needs_new_bowler = false;
        if let Some(over) = innings.over_history.last_mut() {
            if !over.is_complete && over.deliveries.is_empty() {
                over.bowler = Some(bowler.to_string());
            }
        }

        log::info!("{} to bowl over {} of innings {}", bowler, innings.overs + 1, number);
        Ok(())
    }

    /// Swap striker and non-striker on the caller's request. Not undoable.
    pub fn rotate_strike(&mut self, m: &mut Match) -> Result<()> {
        require_innings_in_progress(m)?;
        let number = m.current_innings;
        let innings = m.current_innings_mut().ok_or(ScoringError::MissingInnings { number })?;
        innings.current_batsmen.swap();
        log::debug!("Strike rotated, {:?} now facing", innings.current_batsmen.striker);
        Ok(())
    }
}
