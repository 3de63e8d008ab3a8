//! The single gate every scoring mutation passes through.

use super::wicket::Dismissal;
use crate::config::ScoringConfig;
use crate::error::{ValidationError, ValidationReport};
use crate::models::rules::max_wickets;
use crate::models::{ExtraKind, Match};

/// A scoring action awaiting approval.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    Delivery { runs: u32, extra: Option<ExtraKind> },
    Wicket(&'a Dismissal),
}

/// Check `action` against the match without touching it.
///
/// Match and innings state are checked first and stop the gate on failure;
/// the per-action checks after that are all reported together.
pub fn validate(m: &Match, action: &Action<'_>, config: &ScoringConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    if m.is_complete {
        report.push(ValidationError::MatchComplete);
        return report;
    }
    if !m.is_live {
        report.push(ValidationError::MatchNotLive);
        return report;
    }
    if m.awaiting_second_innings() {
        report.push(ValidationError::AwaitingSecondInnings);
        return report;
    }
    let Some(innings) = m.current_innings() else {
        report.push(ValidationError::NoInnings);
        return report;
    };
    if innings.is_complete {
        report.push(ValidationError::InningsComplete { number: innings.number });
        return report;
    }

    if innings.needs_new_bowler {
        report.push(ValidationError::NewBowlerRequired);
    }
    if innings.needs_new_batsman {
        report.push(ValidationError::NewBatsmanRequired);
    }

    if let Action::Delivery { runs, extra } = action {
        let (min, max) = match extra {
            None => (0, config.limits.max_runs_per_ball),
            Some(_) => (1, config.limits.max_extra_runs),
        };
        if *runs < min || *runs > max {
            report.push(ValidationError::RunsOutOfRange { runs: *runs, min, max });
        }
    }

    if !innings.current_batsmen.both_assigned() {
        report.push(ValidationError::BatsmenNotSelected);
    }

    // Loaded documents can name players outside the XIs.
    let batting = m.batting_team();
    for id in innings.current_batsmen.ids().filter(|id| !batting.contains(id)) {
        report.push(ValidationError::PlayerNotInTeam { id: id.clone(), team: batting.name.clone() });
    }
    let bowling = m.bowling_team();
    if let Some(id) = innings.current_bowler.as_ref().filter(|id| !bowling.contains(id)) {
        report.push(ValidationError::PlayerNotInTeam { id: id.clone(), team: bowling.name.clone() });
    }

    let needs_bowler = match action {
        Action::Delivery { .. } => true,
        Action::Wicket(d) => d.kind.requires_bowler(),
    };
    if needs_bowler && innings.current_bowler.is_none() && !innings.needs_new_bowler {
        report.push(ValidationError::BowlerNotSelected);
    }

    if let Action::Wicket(d) = action {
        if d.kind.requires_explicit_batsman() && d.batsman.is_none() {
            report.push(ValidationError::RunOutBatsmanMissing);
        }

        let named = if d.kind.requires_explicit_batsman() || d.kind.is_retirement() {
            d.batsman.as_deref()
        } else {
            None
        };
        if let Some(id) = named {
            if !innings.current_batsmen.contains(id) {
                report.push(ValidationError::BatsmanNotAtCrease(id.to_string()));
            }
        }

        if let (Some(_), Some(fielder)) = (d.kind.fielding_credit(), d.fielder.as_deref()) {
            let bowling = m.bowling_team();
            if !bowling.contains(fielder) {
                report.push(ValidationError::PlayerNotInTeam {
                    id: fielder.to_string(),
                    team: bowling.name.clone(),
                });
            }
        }

        if config.rules.strict_free_hit && innings.free_hit && !d.kind.allowed_on_free_hit() {
            report.push(ValidationError::FreeHitDismissal(d.kind));
        }

        let max = max_wickets(m.batting_team().size());
        if innings.wickets >= max {
            report.push(ValidationError::WicketLimitReached { wickets: innings.wickets, max });
        } else if d.kind.is_retirement()
            && config.rules.block_retired_hurt_on_last_wicket
            && innings.wickets + 1 >= max
        {
            report.push(ValidationError::RetiredHurtOnLastWicket);
        }
    }

    if !report.is_ok() {
        log::debug!("Validation rejected {:?}: {}", action, report);
    }
    report
}

/// Match and innings state checks shared by the selection calls.
pub(crate) fn require_innings_in_progress(m: &Match) -> Result<(), ValidationError> {
    if m.is_complete {
        return Err(ValidationError::MatchComplete);
    }
    if !m.is_live {
        return Err(ValidationError::MatchNotLive);
    }
    if m.awaiting_second_innings() {
        return Err(ValidationError::AwaitingSecondInnings);
    }
    match m.current_innings() {
        None => Err(ValidationError::NoInnings),
        Some(innings) if innings.is_complete => {
            Err(ValidationError::InningsComplete { number: innings.number })
        }
        Some(_) => Ok(()),
    }
}
