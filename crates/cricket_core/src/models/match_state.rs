use super::ids::{MatchId, PlayerId};
use super::innings::Innings;
use super::rules::{self, MatchPhase, ODI_OVERS, T20_OVERS};
use super::team::Team;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TeamSide {
    Team1,
    Team2,
}

impl TeamSide {
    pub fn other(self) -> Self {
        match self {
            TeamSide::Team1 => TeamSide::Team2,
            TeamSide::Team2 => TeamSide::Team1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TossDecision {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Toss {
    pub winner: TeamSide,
    pub decision: TossDecision,
}

impl Toss {
    pub fn batting_first(&self) -> TeamSide {
        match self.decision {
            TossDecision::Bat => self.winner,
            TossDecision::Bowl => self.winner.other(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub enum MatchType {
    T20,
    ODI,
    Test,
    Custom,
}

impl MatchType {
    pub fn for_overs(total_overs: u32) -> Self {
        match total_overs {
            T20_OVERS => MatchType::T20,
            ODI_OVERS => MatchType::ODI,
            _ => MatchType::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
}

/// Structured result, alongside the free-text `result` line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MatchOutcome {
    Won {
        side: TeamSide,
        margin: Margin,
        #[serde(default, rename = "endedEarly")]
        ended_early: bool,
    },
    Tied {
        #[serde(default, rename = "endedEarly")]
        ended_early: bool,
    },
    NoResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwardEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub team: String,
    /// Short figures line, e.g. `54 (32)` or `3/21`.
    pub figures: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Awards {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_batsman: Option<AwardEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_bowler: Option<AwardEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub man_of_the_match: Option<AwardEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
pub struct InningsPair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Innings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<Innings>,
}

/// The persisted match document.
///
/// The engine reads and mutates it in place; the caller owns it and decides
/// when to hand it to a [`MatchStore`](crate::save::MatchStore).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub team1: Team,
    pub team2: Team,
    pub total_overs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toss_winner: Option<TeamSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toss_decision: Option<TossDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batting_first: Option<TeamSide>,
    pub current_innings: u8,
    #[serde(default)]
    pub innings: InningsPair,
    pub is_live: bool,
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<MatchOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awards: Option<Awards>,
    pub match_type: MatchType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub umpires: Vec<String>,
}

impl Match {
    /// Create a match at toss completion. The first innings exists with no
    /// openers; [`ScoringEngine::start_match`](crate::engine::ScoringEngine::start_match)
    /// makes it live.
    pub fn new(team1: Team, team2: Team, total_overs: u32, toss: Toss) -> Self {
        let batting_first = toss.batting_first();
        let mut m = Self {
            id: Uuid::new_v4().to_string(),
            team1,
            team2,
            total_overs,
            toss_winner: Some(toss.winner),
            toss_decision: Some(toss.decision),
            batting_first: Some(batting_first),
            current_innings: 1,
            innings: InningsPair::default(),
            is_live: false,
            is_complete: false,
            winner: None,
            result: None,
            outcome: None,
            awards: None,
            match_type: MatchType::for_overs(total_overs),
            venue: None,
            date: Utc::now(),
            umpires: Vec::new(),
        };
        let first = Innings::new(
            1,
            m.side(batting_first).id.clone(),
            m.side(batting_first.other()).id.clone(),
            None,
        );
        m.innings.first = Some(first);
        m
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    pub fn with_match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    pub fn side(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Team1 => &self.team1,
            TeamSide::Team2 => &self.team2,
        }
    }


    pub fn batting_first_side(&self) -> TeamSide {
        self.batting_first.unwrap_or(TeamSide::Team1)
    }

    /// Side batting in innings `number` (1 or 2).
    pub fn batting_side_for(&self, number: u8) -> TeamSide {
        if number <= 1 {
            self.batting_first_side()
        } else {
            self.batting_first_side().other()
        }
    }

    pub fn batting_side(&self) -> TeamSide {
        self.batting_side_for(self.current_innings)
    }

    pub fn bowling_side(&self) -> TeamSide {
        self.batting_side().other()
    }

    pub fn innings(&self, number: u8) -> Option<&Innings> {
        match number {
            1 => self.innings.first.as_ref(),
            2 => self.innings.second.as_ref(),
            _ => None,
        }
    }

    pub fn current_innings(&self) -> Option<&Innings> {
        self.innings(self.current_innings)
    }

    pub fn current_innings_mut(&mut self) -> Option<&mut Innings> {
        match self.current_innings {
            1 => self.innings.first.as_mut(),
            2 => self.innings.second.as_mut(),
            _ => None,
        }
    }

    pub fn batting_team(&self) -> &Team {
        self.side(self.batting_side())
    }

    pub fn bowling_team(&self) -> &Team {
        self.side(self.bowling_side())
    }

    /// Split borrow of the innings in progress with its batting and bowling
    /// teams, for processors that update all three at once.
    pub fn current_parts_mut(&mut self) -> Option<(&mut Innings, &mut Team, &mut Team)> {
        let batting = self.batting_side();
        let Match { team1, team2, innings, current_innings, .. } = self;
        let slot = match *current_innings {
            1 => innings.first.as_mut(),
            2 => innings.second.as_mut(),
            _ => None,
        }?;
        let (bat, bowl) = match batting {
            TeamSide::Team1 => (team1, team2),
            TeamSide::Team2 => (team2, team1),
        };
        Some((slot, bat, bowl))
    }

    /// First-innings score plus one, once the chase is on.
    pub fn target(&self) -> Option<u32> {
        if self.current_innings < 2 {
            return None;
        }
        self.innings
            .second
            .as_ref()
            .and_then(|i| i.target)
            .or_else(|| self.innings.first.as_ref().map(|i| i.score + 1))
    }

    pub fn required_run_rate(&self) -> Option<f64> {
        let target = self.target()?;
        let chase = self.innings.second.as_ref()?;
        let left = rules::balls_remaining(self.total_overs, chase.overs, chase.balls);
        Some(rules::required_run_rate(target, chase.score, left))
    }

    /// Phase of the innings in progress.
    pub fn phase(&self) -> Option<MatchPhase> {
        self.current_innings()
            .filter(|i| !i.is_complete)
            .map(|i| i.phase(self.total_overs))
    }

    pub fn balls_remaining(&self) -> Option<u32> {
        self.current_innings()
            .map(|i| rules::balls_remaining(self.total_overs, i.overs, i.balls))
    }

    /// First innings is over and the caller has yet to name the chasing openers.
    pub fn awaiting_second_innings(&self) -> bool {
        !self.is_complete && self.current_innings == 2 && self.innings.second.is_none()
    }

    pub fn team_name(&self, side: TeamSide) -> &str {
        &self.side(side).name
    }

    /// Name of the player with `id` in either playing XI.
    pub fn player_name(&self, id: &str) -> Option<&str> {
        self.team1.player_name(id).or_else(|| self.team2.player_name(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompletionReason, Player, PlayerRole};

    fn team(id: &str, n: usize) -> Team {
        let players = (0..n)
            .map(|i| Player::new(format!("{}{}", id, i), format!("{} {}", id, i), PlayerRole::AllRounder))
            .collect();
        Team::new(id, id.to_uppercase(), players)
    }

    #[test]
    fn test_toss_decides_batting_first() {
        let toss = Toss { winner: TeamSide::Team2, decision: TossDecision::Bowl };
        let m = Match::new(team("a", 11), team("b", 11), 20, toss);
        assert_eq!(m.batting_first, Some(TeamSide::Team1));
        assert_eq!(m.batting_side_for(2), TeamSide::Team2);
        assert_eq!(m.match_type, MatchType::T20);

        let first = m.innings.first.as_ref().unwrap();
        assert_eq!(first.batting_team, "a");
        assert_eq!(first.bowling_team, "b");
        assert!(!m.is_live);
    }

    #[test]
    fn test_target_follows_first_innings() {
        let toss = Toss { winner: TeamSide::Team1, decision: TossDecision::Bat };
        let mut m = Match::new(team("a", 11), team("b", 11), 20, toss);
        m.innings.first.as_mut().unwrap().score = 150;
        assert_eq!(m.target(), None);
        m.current_innings = 2;
        assert_eq!(m.target(), Some(151));
        assert!(m.awaiting_second_innings());
    }

    #[test]
    fn test_phase_tracks_innings_in_progress() {
        let toss = Toss { winner: TeamSide::Team1, decision: TossDecision::Bat };
        let mut m = Match::new(team("a", 11), team("b", 11), 50, toss);
        assert_eq!(m.phase(), Some(MatchPhase::Powerplay));

        m.innings.first.as_mut().unwrap().overs = 30;
        assert_eq!(m.phase(), Some(MatchPhase::Middle));

        m.innings.first.as_mut().unwrap().mark_complete(CompletionReason::OversComplete);
        assert_eq!(m.phase(), None);
    }

    #[test]
    fn test_current_parts_mut_splits_teams() {
        let toss = Toss { winner: TeamSide::Team2, decision: TossDecision::Bat };
        let mut m = Match::new(team("a", 3), team("b", 3), 5, toss);
        let (innings, batting, bowling) = m.current_parts_mut().unwrap();
        assert_eq!(innings.batting_team, batting.id);
        assert_eq!(batting.id, "b");
        assert_eq!(bowling.id, "a");
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = MatchOutcome::Won {
            side: TeamSide::Team2,
            margin: Margin::Wickets(8),
            ended_early: false,
        };
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json["type"], "won");
        assert_eq!(json["side"], "team2");
        assert_eq!(json["margin"]["kind"], "wickets");
        assert_eq!(json["margin"]["value"], 8);
    }
}
