use super::events::{DismissalKind, ExtraKind};
use super::ids::{opt_id, PlayerId, TeamId};
use super::rules::{self, MatchPhase, BALLS_PER_OVER};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum CompletionReason {
    AllOut,
    OversComplete,
    TargetReached,
    /// Ended by the caller before any natural limit was hit.
    Abandoned,
}

/// The two batsmen at the crease. Either slot may be empty while the caller
/// is picking openers or a replacement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBatsmen {
    #[serde(default, with = "opt_id")]
    #[schemars(with = "Option<String>")]
    pub striker: Option<PlayerId>,
    #[serde(default, with = "opt_id")]
    #[schemars(with = "Option<String>")]
    pub non_striker: Option<PlayerId>,
}

impl CurrentBatsmen {
    pub fn new(striker: impl Into<PlayerId>, non_striker: impl Into<PlayerId>) -> Self {
        Self { striker: Some(striker.into()), non_striker: Some(non_striker.into()) }
    }

    pub fn both_assigned(&self) -> bool {
        self.striker.is_some() && self.non_striker.is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.striker.as_deref() == Some(id) || self.non_striker.as_deref() == Some(id)
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }

    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.striker.iter().chain(self.non_striker.iter())
    }
}

/// One delivery (or non-delivery event such as a retirement) as logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ball {
    pub id: String,
    /// Zero-based over the ball belongs to.
    pub over: u32,
    /// Position within the over after this ball, 0 for uncounted deliveries
    /// bowled before the first legal ball.
    pub ball_number: u32,
    #[serde(default, with = "opt_id")]
    #[schemars(with = "Option<String>")]
    pub bowler: Option<PlayerId>,
    #[serde(default, with = "opt_id")]
    #[schemars(with = "Option<String>")]
    pub batsman: Option<PlayerId>,
    pub runs: u32,
    pub is_extra: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_type: Option<ExtraKind>,
    pub is_wicket: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissal_type: Option<DismissalKind>,
    #[serde(default, with = "opt_id", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub dismissed_player: Option<PlayerId>,
    pub is_counted: bool,
    pub commentary: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Over {
    /// One-based over number.
    pub number: u32,
    #[serde(default, with = "opt_id")]
    #[schemars(with = "Option<String>")]
    pub bowler: Option<PlayerId>,
    pub runs: u32,
    pub wickets: u32,
    pub extras: u32,
    /// Scorebook symbols in bowling order: `0`, `4`, `W`, `1wd`, `3nb`.
    pub deliveries: Vec<String>,
    pub is_complete: bool,
}

impl Over {
    pub fn new(number: u32, bowler: Option<PlayerId>) -> Self {
        Self { number, bowler, ..Default::default() }
    }

    pub fn is_maiden(&self) -> bool {
        self.is_complete && self.runs == 0
    }

    pub fn summary(&self) -> String {
        self.deliveries.join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryEntry {
    pub over: u32,
    pub ball: u32,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub runs: u32,
    pub is_wicket: bool,
    pub is_extra: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Partnership {
    pub batsmen: [PlayerId; 2],
    pub runs: u32,
    pub balls: u32,
    pub start_over: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_over: Option<u32>,
    pub is_unbroken: bool,
}

impl Partnership {
    pub fn new(first: PlayerId, second: PlayerId, start_over: u32) -> Self {
        Self {
            batsmen: [first, second],
            runs: 0,
            balls: 0,
            start_over,
            end_over: None,
            is_unbroken: true,
        }
    }

    pub fn involves(&self, id: &str) -> bool {
        self.batsmen.iter().any(|b| b == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Innings {
    pub number: u8,
    pub batting_team: TeamId,
    pub bowling_team: TeamId,
    pub score: u32,
    pub wickets: u32,
    pub overs: u32,
    /// Counted balls in the over in progress, always below six.
    pub balls: u32,
    pub extras: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_reason: Option<CompletionReason>,
    #[serde(default)]
    pub current_batsmen: CurrentBatsmen,
    #[serde(default, with = "opt_id")]
    #[schemars(with = "Option<String>")]
    pub current_bowler: Option<PlayerId>,
    /// Bowler of the last completed over; barred from the next one.
    #[serde(default, with = "opt_id")]
    #[schemars(with = "Option<String>")]
    pub last_over_bowler: Option<PlayerId>,
    #[serde(default)]
    pub free_hit: bool,
    #[serde(default)]
    pub needs_new_bowler: bool,
    #[serde(default)]
    pub needs_new_batsman: bool,
    /// Id of the batsman whose slot awaits a replacement.
    #[serde(default, with = "opt_id", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub pending_vacancy: Option<PlayerId>,
    #[serde(default)]
    pub over_history: Vec<Over>,
    #[serde(default)]
    pub ball_history: Vec<Ball>,
    #[serde(default)]
    pub commentary: Vec<CommentaryEntry>,
    #[serde(default)]
    pub partnerships: Vec<Partnership>,
}

impl Innings {
    pub fn new(number: u8, batting_team: TeamId, bowling_team: TeamId, target: Option<u32>) -> Self {
        Self {
            number,
            batting_team,
            bowling_team,
            score: 0,
            wickets: 0,
            overs: 0,
            balls: 0,
            extras: 0,
            target,
            is_complete: false,
            completion_reason: None,
            current_batsmen: CurrentBatsmen::default(),
            current_bowler: None,
            last_over_bowler: None,
            free_hit: false,
            needs_new_bowler: false,
            needs_new_batsman: false,
            pending_vacancy: None,
            over_history: Vec::new(),
            ball_history: Vec::new(),
            commentary: Vec::new(),
            partnerships: Vec::new(),
        }
    }

    pub fn legal_balls(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls
    }

    pub fn overs_display(&self) -> String {
        rules::format_overs(self.overs, self.balls)
    }

    pub fn run_rate(&self) -> f64 {
        rules::run_rate(self.score, self.overs, self.balls)
    }

    pub fn phase(&self, total_overs: u32) -> MatchPhase {
        rules::match_phase(self.overs, total_overs)
    }

    /// Fielding restrictions apply while fewer than `powerplay_overs` are complete.
    pub fn is_powerplay(&self, powerplay_overs: u32) -> bool {
        !self.is_complete && rules::is_powerplay_active(self.overs, powerplay_overs)
    }

    pub fn runs_needed(&self) -> Option<u32> {
        self.target.map(|t| t.saturating_sub(self.score))
    }

    /// `"81/3 (14.1)"`
    pub fn score_line(&self) -> String {
        format!("{}/{} ({})", self.score, self.wickets, self.overs_display())
    }

    pub fn mark_complete(&mut self, reason: CompletionReason) {
        self.is_complete = true;
        self.completion_reason = Some(reason);
        self.needs_new_batsman = false;
        self.needs_new_bowler = false;
        self.pending_vacancy = None;
    }

    /// The over in progress, opening a new one when the last is finished.
    pub fn current_over_mut(&mut self) -> &mut Over {
        let needs_new = self.over_history.last().map_or(true, |o| o.is_complete);
        if needs_new {
            let over = Over::new(self.overs + 1, self.current_bowler.clone());
            self.over_history.push(over);
        }
        let last = self.over_history.len() - 1;
        &mut self.over_history[last]
    }

    pub fn current_partnership_mut(&mut self) -> Option<&mut Partnership> {
        self.partnerships.last_mut().filter(|p| p.end_over.is_none())
    }

    pub fn current_partnership(&self) -> Option<&Partnership> {
        self.partnerships.last().filter(|p| p.end_over.is_none())
    }

    /// Start a stand between the two batsmen now at the crease.
    pub fn open_partnership(&mut self) {
        if let (Some(a), Some(b)) =
            (self.current_batsmen.striker.clone(), self.current_batsmen.non_striker.clone())
        {
            let start = self.overs;
            self.partnerships.push(Partnership::new(a, b, start));
        }
    }

    pub fn close_partnership(&mut self) {
        let end = self.overs;
        if let Some(p) = self.current_partnership_mut() {
            p.end_over = Some(end);
            p.is_unbroken = false;
        }
    }
}
