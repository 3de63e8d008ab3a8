//! Innings and match completion, the result line and the awards.

use super::ScoringEngine;
use crate::config::{AwardsConfig, ScoringConfig};
use crate::error::{Result, ScoringError, ValidationError};
use crate::models::rules::{format_overs, max_wickets};
use crate::models::{
    AwardEntry, Awards, CompletionReason, Innings, Margin, Match, MatchOutcome, Player, TeamSide,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InningsTransition {
    /// First innings over; the caller must set up the chase.
    #[serde(rename_all = "camelCase")]
    InningsComplete { number: u8, reason: CompletionReason, target: u32 },
    #[serde(rename_all = "camelCase")]
    MatchComplete { reason: CompletionReason, result: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub winner: Option<String>,
    pub result: String,
    pub outcome: MatchOutcome,
}

const ENDED_EARLY_SUFFIX: &str = " (match ended early)";

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Why the innings is over, if it is. `target` is the chase target, if any.
pub fn completion_reason(
    innings: &Innings,
    target: Option<u32>,
    team_size: usize,
    total_overs: u32,
) -> Option<CompletionReason> {
    if let Some(target) = target {
        if innings.number == 2 && innings.score >= target {
            return Some(CompletionReason::TargetReached);
        }
    }
    if innings.wickets >= max_wickets(team_size) {
        return Some(CompletionReason::AllOut);
    }
    if innings.overs >= total_overs {
        return Some(CompletionReason::OversComplete);
    }
    None
}

/// Winner and result line from the two innings as they stand.
pub fn calculate_result(m: &Match) -> MatchResult {
    result_from_scores(m, false)
}

fn result_from_scores(m: &Match, ended_early: bool) -> MatchResult {
    let (Some(first), Some(second)) = (m.innings.first.as_ref(), m.innings.second.as_ref()) else {
        return no_result("Match abandoned before the second innings");
    };

    let first_side = m.batting_first_side();
    let second_side = first_side.other();
    let suffix = if ended_early { ENDED_EARLY_SUFFIX } else { "" };

    if second.score > first.score {
        let team_size = m.side(second_side).size() as u32;
        let margin = team_size.saturating_sub(second.wickets);
        won(m, second_side, Margin::Wickets(margin), plural(margin, "wicket"), suffix, ended_early)
    } else if first.score > second.score {
        let margin = first.score - second.score;
        won(m, first_side, Margin::Runs(margin), plural(margin, "run"), suffix, ended_early)
    } else {
        MatchResult {
            winner: None,
            result: format!("Match Tied{}", suffix),
            outcome: MatchOutcome::Tied { ended_early },
        }
    }
}

fn won(m: &Match, side: TeamSide, margin: Margin, by: String, suffix: &str, ended_early: bool) -> MatchResult {
    let name = m.team_name(side).to_string();
    MatchResult {
        result: format!("{} won by {}{}", name, by, suffix),
        winner: Some(name),
        outcome: MatchOutcome::Won { side, margin, ended_early },
    }
}

fn no_result(reason: &str) -> MatchResult {
    MatchResult { winner: None, result: reason.to_string(), outcome: MatchOutcome::NoResult }
}

fn entry(player: &Player, team: &str, figures: String) -> AwardEntry {
    AwardEntry {
        player_id: player.id.clone(),
        name: player.name.clone(),
        team: team.to_string(),
        figures,
    }
}

fn impact_points(player: &Player, weights: &AwardsConfig) -> u32 {
    player.batting_stats.runs
        + player.bowling_stats.wickets * weights.wicket_weight
        + player.fielding_stats.catches * weights.catch_weight
        + player.fielding_stats.run_outs * weights.run_out_weight
}

/// Best batsman, best bowler and man of the match across both XIs.
///
/// Ties that survive the tie-breakers go to the player listed first.
pub fn calculate_awards(m: &Match, weights: &AwardsConfig) -> Awards {
    let players: Vec<(&Player, &str)> = [&m.team1, &m.team2]
        .into_iter()
        .flat_map(|t| t.playing_xi.iter().map(move |p| (p, t.name.as_str())))
        .collect();

    let mut best_bat: Option<(&Player, &str)> = None;
    let mut best_bowl: Option<(&Player, &str)> = None;
    let mut best_impact: Option<(&Player, &str, u32)> = None;

    for &(p, team) in &players {
        let bat = &p.batting_stats;
        if bat.runs > 0 {
            let better = match best_bat {
                None => true,
                Some((b, _)) => {
                    let cur = &b.batting_stats;
                    bat.runs > cur.runs || (bat.runs == cur.runs && bat.strike_rate > cur.strike_rate)
                }
            };
            if better {
                best_bat = Some((p, team));
            }
        }

        let bowl = &p.bowling_stats;
        if bowl.wickets > 0 || bowl.has_bowled() {
            let better = match best_bowl {
                None => true,
                Some((b, _)) => {
                    let cur = &b.bowling_stats;
                    if bowl.wickets != cur.wickets {
                        bowl.wickets > cur.wickets
                    } else {
                        match (bowl.has_bowled(), cur.has_bowled()) {
                            (true, false) => true,
                            (false, _) => false,
                            (true, true) => bowl.economy_rate < cur.economy_rate,
                        }
                    }
                }
            };
            if better {
                best_bowl = Some((p, team));
            }
        }

        let points = impact_points(p, weights);
        if points > 0 && best_impact.map_or(true, |(_, _, best)| points > best) {
            best_impact = Some((p, team, points));
        }
    }

    Awards {
        best_batsman: best_bat.map(|(p, team)| {
            let s = &p.batting_stats;
            entry(p, team, format!("{} ({})", s.runs, s.balls_faced))
        }),
        best_bowler: best_bowl.map(|(p, team)| {
            let s = &p.bowling_stats;
            entry(p, team, format!("{}/{} ({} ov)", s.wickets, s.runs, format_overs(s.overs, s.balls)))
        }),
        man_of_the_match: best_impact
            .map(|(p, team, points)| entry(p, team, format!("{} pts", points))),
    }
}

fn finish_match(m: &mut Match, result: &MatchResult, config: &ScoringConfig) {
    m.is_complete = true;
    m.is_live = false;
    m.winner = result.winner.clone();
    m.result = Some(result.result.clone());
    m.outcome = Some(result.outcome);
    m.awards = Some(calculate_awards(m, &config.awards));
    log::info!("Match {} complete: {}", m.id, result.result);
}

impl ScoringEngine {
    /// Close the innings if a limit was hit, moving to the chase or ending the match.
    pub(crate) fn check_completion(&mut self, m: &mut Match) -> Result<Option<InningsTransition>> {
        let number = m.current_innings;
        let team_size = m.batting_team().size();
        let total_overs = m.total_overs;
        let target = m.target();
        let innings = m.current_innings_mut().ok_or(ScoringError::MissingInnings { number })?;

        // Chases loaded without a stored target take it from the first innings.
        if number == 2 && innings.target.is_none() {
            innings.target = target;
        }
        let Some(reason) = completion_reason(innings, target, team_size, total_overs) else {
            return Ok(None);
        };
        innings.mark_complete(reason);
        log::info!("Innings {} complete ({:?}) at {}", number, reason, innings.score_line());

        if number == 1 {
            let target = innings.score + 1;
            m.current_innings = 2;
            return Ok(Some(InningsTransition::InningsComplete { number, reason, target }));
        }

        let result = calculate_result(m);
        finish_match(m, &result, &self.config);
        Ok(Some(InningsTransition::MatchComplete { reason, result: result.result }))
    }

    /// Force the match to end now, scoring the result from whatever stands.
    ///
    /// Ending during the first innings gives no result. The undo snapshot is
    /// dropped so the ended match cannot be reopened.
    pub fn end_match_early(&mut self, m: &mut Match) -> Result<MatchResult> {
        if m.is_complete {
            return Err(ValidationError::MatchComplete.into());
        }

        if let Some(innings) = m.current_innings_mut() {
            if !innings.is_complete {
                innings.mark_complete(CompletionReason::Abandoned);
            }
        }

        let result = if m.current_innings < 2 {
            no_result("Match abandoned/interrupted during first innings")
        } else {
            result_from_scores(m, true)
        };

        finish_match(m, &result, &self.config);
        self.undo.clear();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::live_match;
    use crate::models::{CurrentBatsmen, Innings};

    fn with_scores(first: (u32, u32), second: (u32, u32)) -> Match {
        let mut m = live_match();
        let f = m.innings.first.as_mut().unwrap();
        f.score = first.0;
        f.wickets = first.1;
        let mut s = Innings::new(2, "b".into(), "a".into(), Some(first.0 + 1));
        s.score = second.0;
        s.wickets = second.1;
        m.innings.second = Some(s);
        m.current_innings = 2;
        m
    }

    #[test]
    fn test_chasing_side_wins_by_wickets() {
        let m = with_scores((80, 10), (81, 3));
        let result = calculate_result(&m);
        assert_eq!(result.winner.as_deref(), Some("Bravo"));
        assert_eq!(result.result, "Bravo won by 8 wickets");
        assert_eq!(
            result.outcome,
            MatchOutcome::Won { side: TeamSide::Team2, margin: Margin::Wickets(8), ended_early: false }
        );
    }

    #[test]
    fn test_defending_side_wins_by_runs() {
        let m = with_scores((150, 7), (149, 9));
        assert_eq!(calculate_result(&m).result, "Alpha won by 1 run");
    }

    #[test]
    fn test_tie() {
        let result = calculate_result(&with_scores((120, 5), (120, 10)));
        assert_eq!(result.result, "Match Tied");
        assert!(result.winner.is_none());
    }

    #[test]
    fn test_completion_reason_order() {
        let mut innings = Innings::new(2, "b".into(), "a".into(), Some(100));
        innings.score = 100;
        innings.wickets = 10;
        assert_eq!(completion_reason(&innings, innings.target, 11, 20), Some(CompletionReason::TargetReached));

        innings.score = 50;
        assert_eq!(completion_reason(&innings, innings.target, 11, 20), Some(CompletionReason::AllOut));

        innings.wickets = 3;
        innings.overs = 20;
        assert_eq!(completion_reason(&innings, innings.target, 11, 20), Some(CompletionReason::OversComplete));

        innings.overs = 19;
        assert_eq!(completion_reason(&innings, innings.target, 11, 20), None);
    }

    #[test]
    fn test_chase_without_stored_target_ends_on_first_innings_score() {
        let mut engine = ScoringEngine::default();
        let mut m = with_scores((10, 10), (0, 0));
        {
            let chase = m.innings.second.as_mut().unwrap();
            chase.target = None;
            chase.current_batsmen = CurrentBatsmen::new("b0", "b1");
            chase.current_bowler = Some("a0".into());
        }
        let json = serde_json::to_string(&m).unwrap();
        assert!(!json.contains("\"target\""));
        let mut m: Match = serde_json::from_str(&json).unwrap();

        engine.record_delivery(&mut m, 6, None).unwrap();
        assert!(!m.is_complete);
        engine.record_delivery(&mut m, 6, None).unwrap();

        let chase = m.innings.second.as_ref().unwrap();
        assert_eq!(chase.target, Some(11));
        assert_eq!(chase.completion_reason, Some(CompletionReason::TargetReached));
        assert!(m.is_complete);
        assert_eq!(m.result.as_deref(), Some("Bravo won by 11 wickets"));
    }

    #[test]
    fn test_end_early_in_first_innings_is_no_result() {
        let mut engine = ScoringEngine::default();
        let mut m = live_match();
        engine.record_delivery(&mut m, 4, None).unwrap();

        let result = engine.end_match_early(&mut m).unwrap();
        assert_eq!(result.outcome, MatchOutcome::NoResult);
        assert_eq!(m.result.as_deref(), Some("Match abandoned/interrupted during first innings"));
        assert!(m.is_complete && !m.is_live);
        assert!(!engine.can_undo());
        assert_eq!(
            m.innings.first.as_ref().unwrap().completion_reason,
            Some(CompletionReason::Abandoned)
        );

        let err = engine.end_match_early(&mut m).unwrap_err();
        assert_eq!(err.validation_errors(), &[ValidationError::MatchComplete]);
    }

    #[test]
    fn test_end_early_in_chase_uses_scores() {
        let mut engine = ScoringEngine::default();
        let mut m = with_scores((150, 7), (90, 2));
        let result = engine.end_match_early(&mut m).unwrap();
        assert_eq!(result.result, "Alpha won by 60 runs (match ended early)");
        assert!(m.awards.is_some());
    }

    #[test]
    fn test_awards_tie_breakers() {
        let mut m = live_match();
        {
            let a = &mut m.team1;
            let p0 = a.player_mut("a0").unwrap();
            p0.batting_stats.runs = 40;
            p0.batting_stats.balls_faced = 30;
            p0.batting_stats.strike_rate = 133.3;
            let p1 = a.player_mut("a1").unwrap();
            p1.batting_stats.runs = 40;
            p1.batting_stats.balls_faced = 20;
            p1.batting_stats.strike_rate = 200.0;
        }
        {
            let b = &mut m.team2;
            let b0 = b.player_mut("b0").unwrap();
            b0.bowling_stats.wickets = 2;
            b0.bowling_stats.overs = 4;
            b0.bowling_stats.runs = 32;
            b0.bowling_stats.refresh_economy();
            let b1 = b.player_mut("b1").unwrap();
            b1.bowling_stats.wickets = 2;
            b1.bowling_stats.overs = 4;
            b1.bowling_stats.runs = 20;
            b1.bowling_stats.refresh_economy();
            let b2 = b.player_mut("b2").unwrap();
            b2.bowling_stats.wickets = 1;
            b2.fielding_stats.catches = 2;
            b2.fielding_stats.run_outs = 1;
        }

        let awards = calculate_awards(&m, &AwardsConfig::default());
        assert_eq!(awards.best_batsman.unwrap().player_id, "a1");
        let best_bowler = awards.best_bowler.unwrap();
        assert_eq!(best_bowler.player_id, "b1");
        assert_eq!(best_bowler.figures, "2/20 (4.0 ov)");
        // batsmen and bowlers sit on 40, b2 has 20 + 2 * 10 + 15
        let mom = awards.man_of_the_match.unwrap();
        assert_eq!(mom.player_id, "b2");
        assert_eq!(mom.figures, "55 pts");
    }

    #[test]
    fn test_zero_ball_bowler_ranks_last() {
        let mut m = live_match();
        let b = &mut m.team2;
        b.player_mut("b0").unwrap().bowling_stats.wickets = 1;
        let b1 = b.player_mut("b1").unwrap();
        b1.bowling_stats.wickets = 1;
        b1.bowling_stats.balls = 3;
        b1.bowling_stats.runs = 30;
        b1.bowling_stats.refresh_economy();

        let awards = calculate_awards(&m, &AwardsConfig::default());
        assert_eq!(awards.best_bowler.unwrap().player_id, "b1");
    }
}
