use super::events::{DismissalKind, FieldingCredit};
use super::ids::{opt_id, PlayerId};
use super::rules::{self, BALLS_PER_OVER, BOUNDARY_FOUR, BOUNDARY_SIX};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Capability tag. A wicketkeeper still bats, an allrounder still bowls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlayerRole {
    Batsman,
    Bowler,
    #[serde(rename = "allrounder")]
    AllRounder,
    #[serde(rename = "wicketkeeper")]
    WicketKeeper,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BattingStats {
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub is_out: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissal_type: Option<DismissalKind>,
    #[serde(default, with = "opt_id", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub dismissed_by: Option<PlayerId>,
    #[serde(default)]
    pub is_retired_hurt: bool,
}

impl BattingStats {
    /// Credit bat runs and (optionally) a ball faced, counting boundaries.
    pub fn credit(&mut self, runs: u32, faced: bool) {
        self.runs += runs;
        if faced {
            self.balls_faced += 1;
        }
        if runs == BOUNDARY_FOUR {
            self.fours += 1;
        } else if runs == BOUNDARY_SIX {
            self.sixes += 1;
        }
        self.strike_rate = rules::strike_rate(self.runs, self.balls_faced);
    }

    pub fn face_ball(&mut self) {
        self.credit(0, true);
    }

    /// Mark a genuine dismissal.
    pub fn dismiss(&mut self, kind: DismissalKind, by: Option<PlayerId>) {
        self.is_out = true;
        self.is_retired_hurt = false;
        self.dismissal_type = Some(kind);
        self.dismissed_by = by;
    }

    /// Leave the crease injured: not out, may resume later.
    pub fn retire_hurt(&mut self) {
        self.is_out = false;
        self.is_retired_hurt = true;
        self.dismissal_type = None;
        self.dismissed_by = None;
    }

    /// Whether the player may walk out to bat (again).
    pub fn is_available(&self) -> bool {
        if self.is_retired_hurt {
            return true;
        }
        !self.is_out && self.dismissal_type.is_none()
    }

    pub fn status(&self) -> String {
        if self.is_retired_hurt {
            "retired hurt".to_string()
        } else if let Some(kind) = self.dismissal_type.filter(|_| self.is_out) {
            kind.label().to_string()
        } else {
            "not out".to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BowlingStats {
    pub overs: u32,
    pub balls: u32,
    pub runs: u32,
    pub wickets: u32,
    pub economy_rate: f64,
    pub wides: u32,
    pub no_balls: u32,
}

impl BowlingStats {
    /// Add one counted ball, rolling six into a completed over.
    pub fn add_ball(&mut self) {
        self.balls += 1;
        if self.balls >= BALLS_PER_OVER {
            self.overs += self.balls / BALLS_PER_OVER;
            self.balls %= BALLS_PER_OVER;
        }
        self.refresh_economy();
    }

    pub fn concede(&mut self, runs: u32) {
        self.runs += runs;
        self.refresh_economy();
    }

    pub fn refresh_economy(&mut self) {
        self.economy_rate = rules::economy_rate(self.runs, self.overs, self.balls);
    }

    pub fn legal_balls(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls
    }

    pub fn has_bowled(&self) -> bool {
        self.legal_balls() > 0
    }

    pub fn figures(&self) -> String {
        format!(
            "{}-{}-{} ({:.2})",
            rules::format_overs(self.overs, self.balls),
            self.runs,
            self.wickets,
            self.economy_rate
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldingStats {
    pub catches: u32,
    pub run_outs: u32,
    pub stumpings: u32,
}

impl FieldingStats {
    pub fn credit(&mut self, credit: FieldingCredit) {
        match credit {
            FieldingCredit::Catch => self.catches += 1,
            FieldingCredit::RunOut => self.run_outs += 1,
            FieldingCredit::Stumping => self.stumpings += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: PlayerRole,
    #[serde(default)]
    pub batting_stats: BattingStats,
    #[serde(default)]
    pub bowling_stats: BowlingStats,
    #[serde(default)]
    pub fielding_stats: FieldingStats,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, role: PlayerRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            batting_stats: BattingStats::default(),
            bowling_stats: BowlingStats::default(),
            fielding_stats: FieldingStats::default(),
        }
    }

    /// Clear match figures so the same roster entry can start a new match.
    pub fn reset_match_stats(&mut self) {
        self.batting_stats = BattingStats::default();
        self.bowling_stats = BowlingStats::default();
        self.fielding_stats = FieldingStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_tracks_boundaries_and_strike_rate() {
        let mut stats = BattingStats::default();
        stats.credit(4, true);
        stats.credit(6, true);
        stats.credit(1, true);
        assert_eq!(stats.runs, 11);
        assert_eq!(stats.balls_faced, 3);
        assert_eq!(stats.fours, 1);
        assert_eq!(stats.sixes, 1);
        assert!((stats.strike_rate - 366.666).abs() < 0.01);
    }

    #[test]
    fn test_bowler_balls_roll_into_overs() {
        let mut stats = BowlingStats::default();
        stats.concede(12);
        for _ in 0..7 {
            stats.add_ball();
        }
        assert_eq!(stats.overs, 1);
        assert_eq!(stats.balls, 1);
        assert_eq!(stats.legal_balls(), 7);
        let expected = 12.0 / (1.0 + 1.0 / 6.0);
        assert!((stats.economy_rate - expected).abs() < 1e-9);
    }

    #[test]
    fn test_retired_hurt_is_available_dismissed_is_not() {
        let mut stats = BattingStats::default();
        stats.retire_hurt();
        assert!(!stats.is_out);
        assert!(stats.is_available());
        assert_eq!(stats.status(), "retired hurt");

        stats.dismiss(DismissalKind::Caught, Some("b1".to_string()));
        assert!(stats.is_out);
        assert!(!stats.is_retired_hurt);
        assert!(!stats.is_available());
        assert_eq!(stats.status(), "caught");
    }

    #[test]
    fn test_player_json_uses_camel_case() {
        let player = Player::new("p1", "Asha", PlayerRole::AllRounder);
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["role"], "allrounder");
        assert_eq!(json["battingStats"]["ballsFaced"], 0);
        assert_eq!(json["fieldingStats"]["runOuts"], 0);
    }
}
