//! Whole-match runs through the public engine calls.

use super::test_support::{batting, bowling, fresh_match, innings1, innings2, live_match, live_match_with_sizes};
use super::{eligible_bowlers, eligible_new_batsmen, Dismissal, InningsTransition, ScoringEngine};
use crate::models::rules::max_wickets;
use crate::models::{CompletionReason, DismissalKind, ExtraKind, Margin, Match, MatchOutcome, TeamSide};
use proptest::prelude::*;

/// Fill any open bowler or batsman slot with the first eligible player.
fn fill_vacancies(engine: &mut ScoringEngine, m: &mut Match) {
    let Some(innings) = m.current_innings() else { return };
    if innings.is_complete {
        return;
    }
    if innings.needs_new_bowler {
        let next = eligible_bowlers(m)[0].id.clone();
        engine.assign_new_bowler(m, &next).unwrap();
    }
    if m.current_innings().map_or(false, |i| i.needs_new_batsman) {
        let next = eligible_new_batsmen(m)[0].id.clone();
        engine.assign_new_batsman(m, &next).unwrap();
    }
}

fn ball(engine: &mut ScoringEngine, m: &mut Match, runs: u32) -> Option<InningsTransition> {
    fill_vacancies(engine, m);
    engine.record_delivery(m, runs, None).unwrap().transition
}

fn bowled(engine: &mut ScoringEngine, m: &mut Match) -> Option<InningsTransition> {
    fill_vacancies(engine, m);
    engine.record_wicket(m, Dismissal::new(DismissalKind::Bowled)).unwrap().transition
}

/// First innings of 80 all out in 15.4 overs.
fn bowl_out_for_80(engine: &mut ScoringEngine, m: &mut Match) -> Option<InningsTransition> {
    let wickets = [9, 18, 27, 36, 45, 54, 63, 72, 81, 93];
    let mut runs_left = 80;
    let mut last = None;
    for i in 0..94 {
        last = if wickets.contains(&i) {
            bowled(engine, m)
        } else {
            let runs = if runs_left > 0 { 1 } else { 0 };
            runs_left -= runs;
            ball(engine, m, runs)
        };
    }
    last
}

#[test]
fn test_scenario_first_innings_all_out() {
    let mut engine = ScoringEngine::default();
    let mut m = live_match();
    let transition = bowl_out_for_80(&mut engine, &mut m);

    assert_eq!(
        transition,
        Some(InningsTransition::InningsComplete {
            number: 1,
            reason: CompletionReason::AllOut,
            target: 81,
        })
    );
    let first = innings1(&m);
    assert_eq!(first.score_line(), "80/10 (15.4)");
    assert_eq!(first.completion_reason, Some(CompletionReason::AllOut));
    assert!(!first.needs_new_batsman);
    assert_eq!(m.current_innings, 2);
    assert_eq!(m.target(), Some(81));
    assert!(!m.is_complete);

    let err = engine.record_delivery(&mut m, 1, None).unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn test_scenario_chase_won_by_wickets() {
    let mut engine = ScoringEngine::default();
    let mut m = live_match();
    bowl_out_for_80(&mut engine, &mut m);
    engine.start_second_innings(&mut m, "b0", "b1", "a10").unwrap();

    let wickets = [10, 30, 50];
    let mut last = None;
    for i in 0..85 {
        last = if wickets.contains(&i) {
            bowled(&mut engine, &mut m)
        } else {
            ball(&mut engine, &mut m, if i == 0 { 0 } else { 1 })
        };
        if i < 84 {
            assert!(last.is_none(), "chase ended early at ball {}", i);
        }
    }

    assert_eq!(
        last,
        Some(InningsTransition::MatchComplete {
            reason: CompletionReason::TargetReached,
            result: "Bravo won by 8 wickets".to_string(),
        })
    );
    assert_eq!(innings2(&m).score_line(), "81/3 (14.1)");
    assert!(m.is_complete);
    assert!(!m.is_live);
    assert_eq!(m.winner.as_deref(), Some("Bravo"));
    assert_eq!(
        m.outcome,
        Some(MatchOutcome::Won { side: TeamSide::Team2, margin: Margin::Wickets(8), ended_early: false })
    );
    assert!(m.awards.is_some());
}

#[test]
fn test_scenario_no_ball_with_two_run() {
    let mut engine = ScoringEngine::default();
    let mut m = live_match();
    let outcome = engine.record_delivery(&mut m, 3, Some(ExtraKind::NoBall)).unwrap();

    assert!(!outcome.ball_counted);
    assert!(outcome.free_hit);
    let innings = innings1(&m);
    assert_eq!((innings.score, innings.extras, innings.balls), (3, 1, 0));
    assert!(innings.free_hit);

    let striker = batting(&m, "a0");
    assert_eq!((striker.runs, striker.balls_faced), (2, 1));
    assert_eq!(bowling(&m, "b0").no_balls, 1);
    assert_eq!(bowling(&m, "b0").runs, 3);
    assert_eq!(innings.current_batsmen.striker.as_deref(), Some("a0"));
}

#[test]
fn test_scenario_retired_hurt_striker() {
    let mut engine = ScoringEngine::default();
    let mut m = live_match();
    let outcome = engine.record_wicket(&mut m, Dismissal::new(DismissalKind::RetiredHurt)).unwrap();
    assert!(outcome.needs_new_batsman);

    let stats = batting(&m, "a0");
    assert!(!stats.is_out);
    assert!(stats.is_retired_hurt);
    assert_eq!(innings1(&m).wickets, 1);

    let err = engine.record_delivery(&mut m, 1, None).unwrap_err();
    assert!(!err.validation_errors().is_empty());

    engine.assign_new_batsman(&mut m, "a2").unwrap();
    engine.record_wicket(&mut m, Dismissal::new(DismissalKind::Lbw)).unwrap();
    assert!(eligible_new_batsmen(&m).iter().any(|c| c.id == "a0" && c.retired_hurt));
}

#[test]
fn test_target_reached_mid_over() {
    let mut engine = ScoringEngine::default();
    let mut m = live_match();
    {
        let first = m.innings.first.as_mut().unwrap();
        first.score = 150;
        first.wickets = 7;
        first.overs = 19;
        first.balls = 5;
    }
    let outcome = engine.record_delivery(&mut m, 0, None).unwrap();
    assert!(matches!(
        outcome.transition,
        Some(InningsTransition::InningsComplete { reason: CompletionReason::OversComplete, target: 151, .. })
    ));
    assert!(m.awaiting_second_innings());

    engine.start_second_innings(&mut m, "b0", "b1", "a10").unwrap();
    {
        let chase = m.innings.second.as_mut().unwrap();
        chase.score = 148;
        chase.wickets = 4;
        chase.overs = 18;
        chase.balls = 2;
    }
    let outcome = engine.record_delivery(&mut m, 6, None).unwrap();
    assert!(!outcome.over_completed);
    let chase = innings2(&m);
    assert_eq!(chase.score, 154);
    assert_eq!(chase.completion_reason, Some(CompletionReason::TargetReached));
    assert_eq!(m.result.as_deref(), Some("Bravo won by 7 wickets"));
}

#[test]
fn test_seven_player_side_wicket_limit() {
    let mut engine = ScoringEngine::default();
    let mut m = live_match_with_sizes(7, 11);
    assert_eq!(max_wickets(7), 6);

    let mut transition = None;
    for _ in 0..6 {
        transition = bowled(&mut engine, &mut m);
    }
    assert!(matches!(
        transition,
        Some(InningsTransition::InningsComplete { reason: CompletionReason::AllOut, .. })
    ));
    assert_eq!(innings1(&m).wickets, 6);
    assert!(engine.record_wicket(&mut m, Dismissal::new(DismissalKind::Bowled)).is_err());
}

#[test]
fn test_over_boundary_needs_new_bowler() {
    let mut engine = ScoringEngine::default();
    let mut m = live_match();
    for _ in 0..6 {
        engine.record_delivery(&mut m, 0, None).unwrap();
    }
    let innings = innings1(&m);
    assert!(innings.needs_new_bowler);
    assert_eq!((innings.overs, innings.balls), (1, 0));
    assert_eq!(innings.current_batsmen.striker.as_deref(), Some("a1"));
    assert!(innings.over_history[0].is_maiden());

    assert!(engine.record_delivery(&mut m, 1, None).is_err());
    assert!(engine.assign_new_bowler(&mut m, "b0").is_err());
    engine.assign_new_bowler(&mut m, "b1").unwrap();
    engine.record_delivery(&mut m, 1, None).unwrap();
}

#[test]
fn test_undo_after_first_match_ball() {
    let mut engine = ScoringEngine::default();
    let mut m = fresh_match(11, 11, 20);
    engine.start_match(&mut m, "a0", "a1", "b0").unwrap();
    let before = m.clone();
    engine.record_delivery(&mut m, 6, None).unwrap();
    engine.undo(&mut m).unwrap();
    assert_eq!(m, before);
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Runs(u32),
    Extra(ExtraKind, u32),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0u32..=6).prop_map(Step::Runs),
        1 => (1u32..=5).prop_map(|r| Step::Extra(ExtraKind::Wide, r)),
        1 => (1u32..=5).prop_map(|r| Step::Extra(ExtraKind::NoBall, r)),
        1 => (1u32..=4).prop_map(|r| Step::Extra(ExtraKind::Bye, r)),
        1 => (1u32..=4).prop_map(|r| Step::Extra(ExtraKind::LegBye, r)),
    ]
}

proptest! {
    #[test]
    fn prop_only_counted_deliveries_advance_the_over(steps in prop::collection::vec(step(), 1..60)) {
        let mut engine = ScoringEngine::default();
        let mut m = live_match();
        let mut counted = 0;
        let mut total = 0;

        for s in steps {
            fill_vacancies(&mut engine, &mut m);
            let before = innings1(&m).legal_balls();
            let outcome = match s {
                Step::Runs(r) => engine.record_delivery(&mut m, r, None),
                Step::Extra(kind, r) => engine.record_delivery(&mut m, r, Some(kind)),
            }
            .unwrap();
            let after = innings1(&m).legal_balls();

            match s {
                Step::Runs(r) => total += r,
                Step::Extra(kind, r) => {
                    total += r;
                    if kind.is_wide() || kind.is_no_ball() {
                        prop_assert_eq!(before, after);
                    }
                }
            }
            if outcome.ball_counted {
                counted += 1;
                prop_assert_eq!(after, before + 1);
            }
            prop_assert!(innings1(&m).balls < 6);
        }

        prop_assert_eq!(innings1(&m).legal_balls(), counted);
        prop_assert_eq!(innings1(&m).score, total);
    }

    #[test]
    fn prop_strike_follows_odd_runs_and_over_end(runs in prop::collection::vec(0u32..=6, 1..40)) {
        let mut engine = ScoringEngine::default();
        let mut m = live_match();

        for r in runs {
            fill_vacancies(&mut engine, &mut m);
            let striker = innings1(&m).current_batsmen.striker.clone();
            let outcome = engine.record_delivery(&mut m, r, None).unwrap();
            let swapped = innings1(&m).current_batsmen.striker != striker;
            prop_assert_eq!(swapped, (r % 2 == 1) != outcome.over_completed);
        }
    }

    #[test]
    fn prop_wickets_never_exceed_side_limit(size in 2usize..=11, extra_wickets in 0usize..4) {
        let mut engine = ScoringEngine::default();
        let mut m = live_match_with_sizes(size, 11);
        let limit = max_wickets(size);

        for _ in 0..(limit as usize + extra_wickets) {
            fill_vacancies(&mut engine, &mut m);
            let _ = engine.record_wicket(&mut m, Dismissal::new(DismissalKind::Caught).with_fielder("b3"));
        }
        prop_assert_eq!(innings1(&m).wickets, limit);
        prop_assert!(innings1(&m).is_complete);
    }
}
