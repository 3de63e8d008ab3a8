//! Opening an innings: the toss-to-live step and the innings break.

use super::ScoringEngine;
use crate::error::{Result, ScoringError, ValidationError, ValidationReport};
use crate::models::rules::{MAX_OVERS, MIN_OVERS};
use crate::models::{Innings, Match, Team, TeamSide};

fn check_openers(report: &mut ValidationReport, team: &Team, striker: &str, non_striker: &str) {
    let available = team.playing_xi.iter().filter(|p| p.batting_stats.is_available()).count();
    if available < 2 {
        report.push(ValidationError::NotEnoughBatsmen { team: team.name.clone(), available });
    }
    if striker == non_striker {
        report.push(ValidationError::SameBatsmanTwice);
    }
    for id in [striker, non_striker] {
        match team.player(id) {
            None => report.push(ValidationError::PlayerNotInTeam {
                id: id.to_string(),
                team: team.name.clone(),
            }),
            Some(p) if !p.batting_stats.is_available() => {
                report.push(ValidationError::BatsmanUnavailable {
                    id: id.to_string(),
                    reason: "already dismissed",
                })
            }
            Some(_) => {}
        }
    }
}

fn check_opening_bowler(report: &mut ValidationReport, team: &Team, bowler: &str) {
    if team.playing_xi.is_empty() {
        report.push(ValidationError::NoEligibleBowler { team: team.name.clone() });
    } else if !team.contains(bowler) {
        report.push(ValidationError::PlayerNotInTeam {
            id: bowler.to_string(),
            team: team.name.clone(),
        });
    }
}

fn open_innings(innings: &mut Innings, striker: &str, non_striker: &str, bowler: &str) {
    innings.current_batsmen.striker = Some(striker.to_string());
    innings.current_batsmen.non_striker = Some(non_striker.to_string());
    innings.current_bowler = Some(bowler.to_string());
    innings.open_partnership();
}

impl ScoringEngine {
    /// Name the openers and opening bowler and make the match live.
    pub fn start_match(
        &mut self,
        m: &mut Match,
        striker: &str,
        non_striker: &str,
        bowler: &str,
    ) -> Result<()> {
        if m.is_complete {
            return Err(ValidationError::MatchComplete.into());
        }
        let bowled = m.innings.first.as_ref().map_or(false, |i| !i.ball_history.is_empty());
        if m.is_live || m.current_innings != 1 || bowled {
            return Err(ValidationError::MatchAlreadyStarted.into());
        }

        let mut report = ValidationReport::new();
        for team in [&m.team1, &m.team2] {
            if let Err(reason) = team.validate() {
                report.push(ValidationError::InvalidTeam(reason));
            }
        }
        if !(MIN_OVERS..=MAX_OVERS).contains(&m.total_overs) {
            report.push(ValidationError::OversOutOfRange {
                overs: m.total_overs,
                min: MIN_OVERS,
                max: MAX_OVERS,
            });
        }

        let batting_side = m.batting_side_for(1);
        check_openers(&mut report, m.side(batting_side), striker, non_striker);
        check_opening_bowler(&mut report, m.side(batting_side.other()), bowler);
        report.into_result()?;

        let batting_id = m.side(batting_side).id.clone();
        let bowling_id = m.side(batting_side.other()).id.clone();
        if m.batting_first.is_none() {
            m.batting_first = Some(TeamSide::Team1);
        }
        let innings = m
            .innings
            .first
            .get_or_insert_with(|| Innings::new(1, batting_id, bowling_id, None));
        open_innings(innings, striker, non_striker, bowler);

        m.is_live = true;
        self.undo.clear();
        log::info!(
            "Match {} live: {} v {}, {} overs, {} batting first",
            m.id,
            m.team1.name,
            m.team2.name,
            m.total_overs,
            m.team_name(batting_side)
        );
        Ok(())
    }

    /// Open the chase once the first innings has ended.
    pub fn start_second_innings(
        &mut self,
        m: &mut Match,
        striker: &str,
        non_striker: &str,
        bowler: &str,
    ) -> Result<()> {
        if m.is_complete {
            return Err(ValidationError::MatchComplete.into());
        }
        if m.current_innings < 2 {
            return Err(ValidationError::FirstInningsInProgress.into());
        }
        if m.innings.second.is_some() {
            return Err(ValidationError::SecondInningsStarted.into());
        }

        let first = m.innings.first.as_ref().ok_or(ScoringError::MissingInnings { number: 1 })?;
        if !first.is_complete {
            return Err(ValidationError::FirstInningsInProgress.into());
        }
        let target = first.score + 1;

        let mut report = ValidationReport::new();
        let batting_side = m.batting_side_for(2);
        check_openers(&mut report, m.side(batting_side), striker, non_striker);
        check_opening_bowler(&mut report, m.side(batting_side.other()), bowler);
        report.into_result()?;

        let mut innings = Innings::new(
            2,
            m.side(batting_side).id.clone(),
            m.side(batting_side.other()).id.clone(),
            Some(target),
        );
        open_innings(&mut innings, striker, non_striker, bowler);
        m.innings.second = Some(innings);
        m.is_live = true;

        log::info!("Second innings under way: {} need {} to win", m.team_name(batting_side), target);
        Ok(())
    }
}
