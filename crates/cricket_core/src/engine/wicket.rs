//! Wicket processor: dismissals and retirements.

use super::commentary;
use super::completion::InningsTransition;
use super::transition::complete_over;
use super::undo::ActionKind;
use super::validation::{validate, Action};
use super::ScoringEngine;
use crate::error::{Result, ScoringError, ValidationError};
use crate::models::rules::{max_wickets, BALLS_PER_OVER};
use crate::models::{Ball, DismissalKind, Match, PlayerId};
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dismissal as reported by the scorer.
///
/// `batsman` is required for a run out and optional for a retirement (the
/// striker retires by default); every other kind dismisses the striker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Dismissal {
    pub kind: DismissalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batsman: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fielder: Option<PlayerId>,
}

impl Dismissal {
    pub fn new(kind: DismissalKind) -> Self {
        Self { kind, batsman: None, fielder: None }
    }

    pub fn with_batsman(mut self, id: impl Into<PlayerId>) -> Self {
        self.batsman = Some(id.into());
        self
    }

    pub fn with_fielder(mut self, id: impl Into<PlayerId>) -> Self {
        self.fielder = Some(id.into());
        self
    }

    /// Build from the string tag a UI sends, e.g. `"runOut"`.
    pub fn parse(kind: &str, batsman: Option<&str>) -> std::result::Result<Self, ValidationError> {
        let kind = kind.parse::<DismissalKind>()?;
        Ok(Self { kind, batsman: batsman.map(str::to_string), fielder: None })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WicketOutcome {
    pub kind: DismissalKind,
    pub dismissed: PlayerId,
    pub ball_counted: bool,
    pub over_completed: bool,
    /// The caller must pick a replacement before the next ball.
    pub needs_new_batsman: bool,
    pub transition: Option<InningsTransition>,
}

impl ScoringEngine {
    pub fn record_wicket(&mut self, m: &mut Match, dismissal: Dismissal) -> Result<WicketOutcome> {
        validate(m, &Action::Wicket(&dismissal), &self.config).into_result()?;
        self.undo.snapshot(m, ActionKind::Wicket { kind: dismissal.kind });

        let mut outcome = apply_wicket(m, &dismissal)?;
        outcome.transition = self.check_completion(m)?;
        if outcome.transition.is_some() {
            outcome.needs_new_batsman = false;
        }
        Ok(outcome)
    }

    /// String-tagged entry point; an unknown kind is a validation failure.
    pub fn record_wicket_named(
        &mut self,
        m: &mut Match,
        kind: &str,
        batsman: Option<&str>,
    ) -> Result<WicketOutcome> {
        let dismissal = Dismissal::parse(kind, batsman)?;
        self.record_wicket(m, dismissal)
    }
}

pub(crate) fn apply_wicket(m: &mut Match, d: &Dismissal) -> Result<WicketOutcome> {
    let number = m.current_innings;
    let (innings, batting, bowling) =
        m.current_parts_mut().ok_or(ScoringError::MissingInnings { number })?;

    let striker = innings
        .current_batsmen
        .striker
        .clone()
        .ok_or(ScoringError::Rejected(ValidationError::BatsmenNotSelected.into()))?;
    let out_id = match d.kind {
        DismissalKind::RunOut => d
            .batsman
            .clone()
            .ok_or(ScoringError::Rejected(ValidationError::RunOutBatsmanMissing.into()))?,
        DismissalKind::RetiredHurt => d.batsman.clone().unwrap_or_else(|| striker.clone()),
        _ => striker.clone(),
    };
    let bowler_id = innings.current_bowler.clone();

    let counted = !(d.kind == DismissalKind::RunOut && innings.free_hit);

    let bowler_name = bowler_id
        .as_deref()
        .and_then(|id| bowling.player(id))
        .map(|p| p.name.clone());
    let fielder_name = d
        .fielder
        .as_deref()
        .and_then(|id| bowling.player(id))
        .map(|p| p.name.clone());

    let out = batting
        .player_mut(&out_id)
        .ok_or_else(|| ScoringError::UnknownPlayer { id: out_id.clone() })?;
    if counted && out_id == striker && d.kind.involves_delivery() {
        out.batting_stats.face_ball();
    }
    if d.kind.is_retirement() {
        out.batting_stats.retire_hurt();
    } else {
        let credited_to = if d.kind.credits_bowler() { bowler_id.clone() } else { d.fielder.clone() };
        out.batting_stats.dismiss(d.kind, credited_to);
    }
    let out_name = out.name.clone();

    if let Some(bowler) = bowler_id.as_deref().and_then(|id| bowling.player_mut(id)) {
        let stats = &mut bowler.bowling_stats;
        if d.kind.credits_bowler() {
            stats.wickets += 1;
        }
        if d.kind != DismissalKind::RunOut && counted {
            stats.add_ball();
        }
    }

    if let (Some(credit), Some(fielder)) =
        (d.kind.fielding_credit(), d.fielder.as_deref().and_then(|id| bowling.player_mut(id)))
    {
        fielder.fielding_stats.credit(credit);
    }

    innings.wickets += 1;

    if let Some(p) = innings.current_partnership_mut() {
        if counted {
            p.balls += 1;
        }
    }
    innings.close_partnership();

    let over = innings.current_over_mut();
    over.wickets += 1;
    over.deliveries.push(if d.kind.is_retirement() { "RH".to_string() } else { "W".to_string() });

    if counted {
        innings.balls += 1;
        innings.free_hit = false;
    }

    let over_index = innings.overs;
    let ball_number = innings.balls;
    let text = commentary::wicket_text(bowler_name.as_deref(), &out_name, d.kind, fielder_name.as_deref());

    innings.ball_history.push(Ball {
        id: Uuid::new_v4().to_string(),
        over: over_index,
        ball_number,
        bowler: bowler_id,
        batsman: Some(striker),
        runs: 0,
        is_extra: false,
        extra_type: None,
        is_wicket: true,
        dismissal_type: Some(d.kind),
        dismissed_player: Some(out_id.clone()),
        is_counted: counted,
        commentary: text.clone(),
        timestamp: Utc::now(),
    });
    commentary::push(innings, over_index, ball_number, text, 0, true, false);

    let over_completed = counted && innings.balls == BALLS_PER_OVER;
    if over_completed {
        complete_over(innings);
    }

    let needs_new_batsman = innings.wickets < max_wickets(batting.size());
    if needs_new_batsman {
        innings.needs_new_batsman = true;
        innings.pending_vacancy = Some(out_id.clone());
    }

    log::info!(
        "Innings {}: {} {} at {}",
        number,
        out_id,
        d.kind.label(),
        innings.score_line()
    );

    Ok(WicketOutcome {
        kind: d.kind,
        dismissed: out_id,
        ball_counted: counted,
        over_completed,
        needs_new_batsman,
        transition: None,
    })
}
