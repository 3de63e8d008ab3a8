//! Delivery processor: applies runs and extras to the innings in progress.

use super::commentary;
use super::completion::InningsTransition;
use super::transition::complete_over;
use super::undo::ActionKind;
use super::validation::{validate, Action};
use super::ScoringEngine;
use crate::error::{Result, ScoringError, ValidationError};
use crate::models::rules::{self, BALLS_PER_OVER};
use crate::models::{Ball, ExtraKind, Match};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    pub runs: u32,
    pub extra: Option<ExtraKind>,
    pub ball_counted: bool,
    pub strike_rotated: bool,
    pub over_completed: bool,
    /// Free-hit state for the next ball.
    pub free_hit: bool,
    pub transition: Option<InningsTransition>,
}

impl ScoringEngine {
    /// Score one delivery. `runs` for an extra already includes any penalty run.
    pub fn record_delivery(
        &mut self,
        m: &mut Match,
        runs: u32,
        extra: Option<ExtraKind>,
    ) -> Result<DeliveryOutcome> {
        validate(m, &Action::Delivery { runs, extra }, &self.config).into_result()?;
        self.undo.snapshot(m, ActionKind::Delivery { runs, extra });

        let mut outcome = apply_delivery(m, runs, extra)?;
        outcome.transition = self.check_completion(m)?;
        Ok(outcome)
    }
}

fn is_odd(runs: u32) -> bool {
    runs % 2 == 1
}

pub(crate) fn apply_delivery(m: &mut Match, runs: u32, extra: Option<ExtraKind>) -> Result<DeliveryOutcome> {
    let number = m.current_innings;
    let total_overs = m.total_overs;
    let (innings, batting, bowling) =
        m.current_parts_mut().ok_or(ScoringError::MissingInnings { number })?;

    let striker_id = innings
        .current_batsmen
        .striker
        .clone()
        .ok_or(ScoringError::Rejected(ValidationError::BatsmenNotSelected.into()))?;
    let bowler_id = innings.current_bowler.clone();

    let counted = extra.map_or(true, |kind| kind.is_counted());
    let extras = extra.map_or(0, |kind| kind.extras_for(runs));

    let striker = batting
        .player_mut(&striker_id)
        .ok_or_else(|| ScoringError::UnknownPlayer { id: striker_id.clone() })?;

    innings.score += runs;
    innings.extras += extras;
    match extra {
        None => striker.batting_stats.credit(runs, true),
        Some(kind) => {
            let bat_runs = kind.batsman_runs(runs);
            if kind.faces_ball() || bat_runs > 0 {
                striker.batting_stats.credit(bat_runs, kind.faces_ball());
            }
        }
    }
    let batsman_name = striker.name.clone();

    let mut bowler_name = String::from("Bowler");
    if let Some(bowler) = bowler_id.as_deref().and_then(|id| bowling.player_mut(id)) {
        let stats = &mut bowler.bowling_stats;
        if let Some(kind) = extra {
            if kind.is_wide() {
                stats.wides += 1;
            }
            if kind.is_no_ball() {
                stats.no_balls += 1;
            }
        }
        if counted {
            stats.add_ball();
        }
        stats.concede(extra.map_or(runs, |kind| kind.bowler_conceded(runs)));
        bowler_name = bowler.name.clone();
    }

    if let Some(p) = innings.current_partnership_mut() {
        p.runs += runs;
        if counted {
            p.balls += 1;
        }
    }

    let symbol = match extra {
        None => runs.to_string(),
        Some(kind) => format!("{}{}", runs, kind.symbol()),
    };
    let over = innings.current_over_mut();
    over.runs += runs;
    over.extras += extras;
    over.deliveries.push(symbol);

    if counted {
        innings.balls += 1;
    }

    let rotates = match extra {
        None => is_odd(runs),
        Some(kind) => kind.rotation_runs(runs).map_or(false, is_odd),
    };
    if rotates {
        innings.current_batsmen.swap();
    }

    if counted {
        innings.free_hit = false;
    }
    if extra.map_or(false, |kind| kind.sets_free_hit()) {
        innings.free_hit = true;
    }

    let over_index = innings.overs;
    let ball_number = innings.balls;

    let mut text = commentary::delivery_text(&bowler_name, &batsman_name, runs, extra);
    if let Some(needed) = innings.runs_needed() {
        let left = rules::balls_remaining(total_overs, innings.overs, innings.balls);
        if let Some(suffix) = commentary::chase_suffix(needed, left) {
            text.push_str(&suffix);
        }
    }

    innings.ball_history.push(Ball {
        id: Uuid::new_v4().to_string(),
        over: over_index,
        ball_number,
        bowler: bowler_id,
        batsman: Some(striker_id),
        runs,
        is_extra: extra.is_some(),
        extra_type: extra,
        is_wicket: false,
        dismissal_type: None,
        dismissed_player: None,
        is_counted: counted,
        commentary: text.clone(),
        timestamp: Utc::now(),
    });
    commentary::push(innings, over_index, ball_number, text, runs, false, extra.is_some());

    let over_completed = counted && innings.balls == BALLS_PER_OVER;
    if over_completed {
        complete_over(innings);
    }

    log::debug!(
        "Innings {}: {} {:?} -> {} (free hit {})",
        number,
        runs,
        extra,
        innings.score_line(),
        innings.free_hit
    );

    Ok(DeliveryOutcome {
        runs,
        extra,
        ball_counted: counted,
        strike_rotated: rotates,
        over_completed,
        free_hit: innings.free_hit,
        transition: None,
    })
}
