//! Laws of the limited-overs game that the engine depends on.
//!
//! Pure helpers only: nothing in here touches a [`Match`](super::Match).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const BALLS_PER_OVER: u32 = 6;
pub const BOUNDARY_FOUR: u32 = 4;
pub const BOUNDARY_SIX: u32 = 6;
pub const STANDARD_TEAM_SIZE: usize = 11;

pub const T20_OVERS: u32 = 20;
pub const ODI_OVERS: u32 = 50;
pub const MIN_OVERS: u32 = 1;
pub const MAX_OVERS: u32 = 50;

pub const T20_POWERPLAY_OVERS: u32 = 6;
pub const ODI_POWERPLAY_OVERS: u32 = 10;

/// Wickets that end an innings for a playing XI of `team_size`.
///
/// Always at least one, so a two-player side is all out after a single wicket.
pub fn max_wickets(team_size: usize) -> u32 {
    (team_size.saturating_sub(1)).max(1) as u32
}

pub fn strike_rate(runs: u32, balls_faced: u32) -> f64 {
    if balls_faced == 0 {
        return 0.0;
    }
    runs as f64 / balls_faced as f64 * 100.0
}

/// Fractional overs bowled, e.g. 3 overs and 2 balls is 3.333.
pub fn overs_as_decimal(overs: u32, balls: u32) -> f64 {
    overs as f64 + balls as f64 / BALLS_PER_OVER as f64
}

pub fn economy_rate(runs: u32, overs: u32, balls: u32) -> f64 {
    let total = overs_as_decimal(overs, balls);
    if total > 0.0 {
        runs as f64 / total
    } else {
        0.0
    }
}

pub fn run_rate(runs: u32, overs: u32, balls: u32) -> f64 {
    economy_rate(runs, overs, balls)
}

/// Runs per over needed to reach `target` from `score` with `balls_left` to come.
pub fn required_run_rate(target: u32, score: u32, balls_left: u32) -> f64 {
    let runs_needed = target.saturating_sub(score);
    if balls_left == 0 {
        return 0.0;
    }
    runs_needed as f64 / (balls_left as f64 / BALLS_PER_OVER as f64)
}

/// Scorebook notation for overs, `o.b`.
pub fn format_overs(overs: u32, balls: u32) -> String {
    format!("{}.{}", overs, balls)
}

pub fn balls_remaining(total_overs: u32, overs: u32, balls: u32) -> u32 {
    (total_overs * BALLS_PER_OVER).saturating_sub(overs * BALLS_PER_OVER + balls)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum MatchPhase {
    Powerplay,
    Middle,
    Death,
}

/// Phase of the innings by share of overs used: first 30% powerplay, last 20% death.
pub fn match_phase(overs: u32, total_overs: u32) -> MatchPhase {
    if total_overs == 0 {
        return MatchPhase::Powerplay;
    }
    let pct = overs as f64 / total_overs as f64 * 100.0;
    if pct <= 30.0 {
        MatchPhase::Powerplay
    } else if pct <= 80.0 {
        MatchPhase::Middle
    } else {
        MatchPhase::Death
    }
}

pub fn is_powerplay_active(overs: u32, powerplay_overs: u32) -> bool {
    overs < powerplay_overs
}
