//! Who is at the crease, and who may come in next.

use super::commentary;
use super::validation::require_innings_in_progress;
use super::ScoringEngine;
use crate::error::{Result, ScoringError, ValidationError};
use crate::models::{CurrentBatsmen, Innings, Match, PlayerId, Team};
use serde::Serialize;

/// A batsman the caller may send in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: PlayerId,
    pub name: String,
    /// Returning after retiring hurt.
    pub retired_hurt: bool,
}

fn usable_slot(id: Option<&PlayerId>, innings: &Innings, roster: &Team) -> Option<PlayerId> {
    let id = id?;
    let player = roster.player(id)?;
    let vacating = innings.pending_vacancy.as_ref() == Some(id);
    if player.batting_stats.is_out && !vacating {
        return None;
    }
    Some(id.clone())
}

/// Resolve the striker and non-striker for `innings`.
///
/// Fallback order, applied per empty slot:
/// 1. the explicit slot id, if it names a player in `roster` who is not out
///    (the batsman whose slot awaits a replacement is kept);
/// 2. the most recent batsmen in the ball history who are still not out;
/// 3. the batsmen of the latest partnership who are still not out.
pub fn resolve_current_batsmen(innings: &Innings, roster: &Team) -> CurrentBatsmen {
    let mut striker = usable_slot(innings.current_batsmen.striker.as_ref(), innings, roster);
    let mut non_striker = usable_slot(innings.current_batsmen.non_striker.as_ref(), innings, roster);

    if striker.is_some() && non_striker.is_some() {
        return CurrentBatsmen { striker, non_striker };
    }

    let recent = innings
        .ball_history
        .iter()
        .rev()
        .filter_map(|b| b.batsman.as_ref());
    let partners = innings.partnerships.last().into_iter().flat_map(|p| p.batsmen.iter());

    for id in recent.chain(partners) {
        if striker.is_some() && non_striker.is_some() {
            break;
        }
        if striker.as_ref() == Some(id) || non_striker.as_ref() == Some(id) {
            continue;
        }
        let Some(player) = roster.player(id) else { continue };
        if !player.batting_stats.is_available() || player.batting_stats.is_retired_hurt {
            continue;
        }
        if striker.is_none() {
            striker = Some(id.clone());
        } else {
            non_striker = Some(id.clone());
        }
    }

    CurrentBatsmen { striker, non_striker }
}

/// Fix a stored match whose current batsmen are flagged out.
///
/// Clears the stale out flag on any batsman at the crease (other than one
/// awaiting replacement) and fills empty slots from
/// [`resolve_current_batsmen`]. Returns the number of repairs made.
pub fn repair_current_batsmen(m: &mut Match) -> usize {
    if m.is_complete {
        return 0;
    }
    let Some((innings, batting, _)) = m.current_parts_mut() else {
        return 0;
    };
    if innings.is_complete {
        return 0;
    }

    let mut repairs = 0;
    let at_crease: Vec<PlayerId> = innings.current_batsmen.ids().cloned().collect();
    for id in at_crease {
        if innings.pending_vacancy.as_ref() == Some(&id) {
            continue;
        }
        if let Some(player) = batting.player_mut(&id) {
            if player.batting_stats.is_out {
                log::warn!("Batsman {} at the crease was flagged out; clearing", id);
                player.batting_stats.is_out = false;
                player.batting_stats.dismissal_type = None;
                player.batting_stats.dismissed_by = None;
                repairs += 1;
            }
        }
    }

    if !innings.current_batsmen.both_assigned() && !innings.needs_new_batsman {
        let resolved = resolve_current_batsmen(innings, batting);
        if resolved != innings.current_batsmen {
            log::warn!(
                "Recovered current batsmen {:?} -> {:?}",
                innings.current_batsmen,
                resolved
            );
            innings.current_batsmen = resolved;
            repairs += 1;
        }
    }

    repairs
}

/// Players of the batting side who may fill the open slot.
pub fn eligible_new_batsmen(m: &Match) -> Vec<Candidate> {
    let Some(innings) = m.current_innings() else {
        return Vec::new();
    };
    m.batting_team()
        .playing_xi
        .iter()
        .filter(|p| !innings.current_batsmen.contains(&p.id))
        .filter(|p| innings.pending_vacancy.as_ref() != Some(&p.id))
        .filter(|p| p.batting_stats.is_available())
        .map(|p| Candidate {
            id: p.id.clone(),
            name: p.name.clone(),
            retired_hurt: p.batting_stats.is_retired_hurt,
        })
        .collect()
}

impl ScoringEngine {
    /// Send `batsman` in to the slot left by the last wicket or retirement.
    pub fn assign_new_batsman(&mut self, m: &mut Match, batsman: &str) -> Result<()> {
        require_innings_in_progress(m)?;
        let number = m.current_innings;
        let (innings, batting, _) =
            m.current_parts_mut().ok_or(ScoringError::MissingInnings { number })?;

        if !innings.needs_new_batsman {
            return Err(ValidationError::NoVacancy.into());
        }
        let team = batting.name.clone();
        let Some(player) = batting.player_mut(batsman) else {
            return Err(ValidationError::PlayerNotInTeam { id: batsman.to_string(), team }.into());
        };

        let vacancy = innings.pending_vacancy.clone();
        let unavailable = if vacancy.as_deref() == Some(batsman) {
            Some("just left the crease")
        } else if innings.current_batsmen.contains(batsman) {
            Some("already batting")
        } else if !player.batting_stats.is_available() {
            Some("already dismissed")
        } else {
            None
        };
        if let Some(reason) = unavailable {
            return Err(ValidationError::BatsmanUnavailable { id: batsman.to_string(), reason }.into());
        }

        let resuming = player.batting_stats.is_retired_hurt;
        player.batting_stats.is_retired_hurt = false;
        let name = player.name.clone();

        let slots = &mut innings.current_batsmen;
        let incoming = Some(batsman.to_string());
        if vacancy.is_some() && slots.non_striker == vacancy {
            slots.non_striker = incoming;
        } else {
            slots.striker = incoming;
        }

        innings.needs_new_batsman = false;
        innings.pending_vacancy = None;
        innings.open_partnership();

        let (over, ball) = (innings.overs, innings.balls);
        commentary::push(innings, over, ball, commentary::new_batsman_text(&name, resuming), 0, false, false);
        log::info!("{} in at innings {} ({})", batsman, number, innings.score_line());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{batting, innings1, live_match};
    use crate::engine::Dismissal;
    use crate::models::DismissalKind;

    #[test]
    fn test_replacement_takes_vacated_slot() {
        let mut engine = ScoringEngine::default();
        let mut m = live_match();
        let d = Dismissal::new(DismissalKind::RunOut).with_batsman("a1");
        engine.record_wicket(&mut m, d).unwrap();
        engine.assign_new_batsman(&mut m, "a2").unwrap();

        let innings = innings1(&m);
        assert_eq!(innings.current_batsmen, CurrentBatsmen::new("a0", "a2"));
        assert!(!innings.needs_new_batsman);
        assert_eq!(innings.partnerships.len(), 2);
        assert!(!innings.partnerships[0].is_unbroken);
        assert!(innings.partnerships[1].is_unbroken);
    }

    #[test]
    fn test_dismissed_players_cannot_return() {
        let mut engine = ScoringEngine::default();
        let mut m = live_match();
        engine.record_wicket(&mut m, Dismissal::new(DismissalKind::Bowled)).unwrap();

        let err = engine.assign_new_batsman(&mut m, "a0").unwrap_err();
        assert!(matches!(
            err.validation_errors(),
            [ValidationError::BatsmanUnavailable { reason: "just left the crease", .. }]
        ));
        let err = engine.assign_new_batsman(&mut m, "a1").unwrap_err();
        assert!(matches!(
            err.validation_errors(),
            [ValidationError::BatsmanUnavailable { reason: "already batting", .. }]
        ));
        assert!(eligible_new_batsmen(&m).iter().all(|c| c.id != "a0" && c.id != "a1"));

        engine.assign_new_batsman(&mut m, "a2").unwrap();
        let err = engine.assign_new_batsman(&mut m, "a3").unwrap_err();
        assert_eq!(err.validation_errors(), &[ValidationError::NoVacancy]);
    }

    #[test]
    fn test_retired_batsman_can_resume() {
        let mut engine = ScoringEngine::default();
        let mut m = live_match();
        engine.record_wicket(&mut m, Dismissal::new(DismissalKind::RetiredHurt)).unwrap();
        engine.assign_new_batsman(&mut m, "a2").unwrap();
        engine.record_wicket(&mut m, Dismissal::new(DismissalKind::Bowled)).unwrap();

        let candidates = eligible_new_batsmen(&m);
        let returning = candidates.iter().find(|c| c.id == "a0").unwrap();
        assert!(returning.retired_hurt);

        engine.assign_new_batsman(&mut m, "a0").unwrap();
        let stats = batting(&m, "a0");
        assert!(!stats.is_retired_hurt);
        assert!(!stats.is_out);
        assert!(innings1(&m).commentary.last().unwrap().text.ends_with("resumes their innings"));
    }

    #[test]
    fn test_repair_clears_stale_out_flag() {
        let mut m = live_match();
        m.team1.player_mut("a1").unwrap().batting_stats.is_out = true;
        assert_eq!(repair_current_batsmen(&mut m), 1);
        assert!(!batting(&m, "a1").is_out);
        assert_eq!(repair_current_batsmen(&mut m), 0);
    }

    #[test]
    fn test_resolve_falls_back_to_recent_balls() {
        let mut engine = ScoringEngine::default();
        let mut m = live_match();
        engine.record_delivery(&mut m, 1, None).unwrap();
        engine.record_delivery(&mut m, 0, None).unwrap();

        let innings = m.innings.first.as_mut().unwrap();
        innings.current_batsmen = CurrentBatsmen::default();
        let resolved = resolve_current_batsmen(innings, &m.team1);
        assert_eq!(resolved, CurrentBatsmen::new("a1", "a0"));
    }

    #[test]
    fn test_resolve_skips_dismissed_explicit_slot() {
        let mut m = live_match();
        m.team1.player_mut("a0").unwrap().batting_stats.is_out = true;
        let resolved = resolve_current_batsmen(innings1(&m), &m.team1);
        assert_eq!(resolved.striker, None);
        assert_eq!(resolved.non_striker.as_deref(), Some("a1"));
    }
}
