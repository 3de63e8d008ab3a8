use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of extra awarded on a delivery.
///
/// The run value passed alongside an extra already includes the penalty run
/// where one applies (a no-ball with two run off the bat is recorded as 3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum ExtraKind {
    #[serde(rename = "wide")]
    Wide,
    #[serde(rename = "noball")]
    NoBall,
    #[serde(rename = "bye")]
    Bye,
    #[serde(rename = "legbye")]
    LegBye,
    /// Penalty runs awarded to the batting side outside of a delivery.
    #[serde(rename = "penalty")]
    Penalty,
    #[serde(rename = "noball-bye")]
    NoBallBye,
    #[serde(rename = "noball-legbye")]
    NoBallLegBye,
}

impl ExtraKind {
    /// Whether the delivery counts toward the six balls of the over.
    pub fn is_counted(&self) -> bool {
        matches!(self, ExtraKind::Bye | ExtraKind::LegBye)
    }

    pub fn is_no_ball(&self) -> bool {
        matches!(self, ExtraKind::NoBall | ExtraKind::NoBallBye | ExtraKind::NoBallLegBye)
    }

    pub fn is_wide(&self) -> bool {
        matches!(self, ExtraKind::Wide)
    }

    /// No-ball variants grant a free hit on the next counted ball.
    pub fn sets_free_hit(&self) -> bool {
        self.is_no_ball()
    }

    /// Whether the striker is charged with a ball faced.
    pub fn faces_ball(&self) -> bool {
        match self {
            ExtraKind::NoBall
            | ExtraKind::NoBallBye
            | ExtraKind::NoBallLegBye
            | ExtraKind::Bye
            | ExtraKind::LegBye => true,
            ExtraKind::Wide | ExtraKind::Penalty => false,
        }
    }

    /// Runs credited to the striker's bat.
    pub fn batsman_runs(&self, runs: u32) -> u32 {
        match self {
            ExtraKind::NoBall => runs.saturating_sub(1),
            _ => 0,
        }
    }

    /// Runs that decide strike rotation. `None` means the strike never rotates.
    pub fn rotation_runs(&self, runs: u32) -> Option<u32> {
        match self {
            ExtraKind::NoBall | ExtraKind::NoBallBye | ExtraKind::NoBallLegBye => {
                Some(runs.saturating_sub(1))
            }
            ExtraKind::Bye | ExtraKind::LegBye => Some(runs),
            ExtraKind::Wide | ExtraKind::Penalty => None,
        }
    }

    /// Runs charged against the bowler's figures.
    pub fn bowler_conceded(&self, runs: u32) -> u32 {
        match self {
            ExtraKind::Wide | ExtraKind::NoBall => runs,
            ExtraKind::NoBallBye | ExtraKind::NoBallLegBye => runs.min(1),
            ExtraKind::Bye | ExtraKind::LegBye | ExtraKind::Penalty => 0,
        }
    }

    /// Runs booked under the innings' extras column.
    pub fn extras_for(&self, runs: u32) -> u32 {
        match self {
            ExtraKind::NoBall => runs.min(1),
            _ => runs,
        }
    }

    /// Short scorebook suffix used in over summaries (`1wd`, `3nb`).
    pub fn symbol(&self) -> &'static str {
        match self {
            ExtraKind::Wide => "wd",
            ExtraKind::NoBall => "nb",
            ExtraKind::Bye => "b",
            ExtraKind::LegBye => "lb",
            ExtraKind::Penalty => "pen",
            ExtraKind::NoBallBye => "nb+b",
            ExtraKind::NoBallLegBye => "nb+lb",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtraKind::Wide => "wide",
            ExtraKind::NoBall => "noball",
            ExtraKind::Bye => "bye",
            ExtraKind::LegBye => "legbye",
            ExtraKind::Penalty => "penalty",
            ExtraKind::NoBallBye => "noball-bye",
            ExtraKind::NoBallLegBye => "noball-legbye",
        }
    }
}

impl fmt::Display for ExtraKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a batsman left the crease.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "camelCase")]
pub enum DismissalKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    #[serde(rename = "obstructingField")]
    ObstructingTheField,
    HandledBall,
    TimedOut,
    /// Not a dismissal: the batsman leaves injured and may resume later.
    RetiredHurt,
}

/// Fielding column credited for a dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldingCredit {
    Catch,
    RunOut,
    Stumping,
}

impl DismissalKind {
    /// Kinds that count in the bowler's wicket column.
    pub fn credits_bowler(&self) -> bool {
        matches!(
            self,
            DismissalKind::Bowled
                | DismissalKind::Caught
                | DismissalKind::Lbw
                | DismissalKind::Stumped
                | DismissalKind::HitWicket
        )
    }

    /// A bowler must be assigned for every kind the bowler is credited with.
    pub fn requires_bowler(&self) -> bool {
        self.credits_bowler()
    }

    pub fn requires_explicit_batsman(&self) -> bool {
        matches!(self, DismissalKind::RunOut)
    }

    pub fn is_retirement(&self) -> bool {
        matches!(self, DismissalKind::RetiredHurt)
    }

    /// Kinds that can still happen on a free hit.
    pub fn allowed_on_free_hit(&self) -> bool {
        matches!(
            self,
            DismissalKind::RunOut
                | DismissalKind::ObstructingTheField
                | DismissalKind::HandledBall
                | DismissalKind::TimedOut
                | DismissalKind::RetiredHurt
        )
    }

    /// Whether the dismissed batsman was facing a delivery when it happened.
    pub fn involves_delivery(&self) -> bool {
        !matches!(self, DismissalKind::RetiredHurt | DismissalKind::TimedOut)
    }

    pub fn fielding_credit(&self) -> Option<FieldingCredit> {
        match self {
            DismissalKind::Caught => Some(FieldingCredit::Catch),
            DismissalKind::RunOut => Some(FieldingCredit::RunOut),
            DismissalKind::Stumped => Some(FieldingCredit::Stumping),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DismissalKind::Bowled => "bowled",
            DismissalKind::Caught => "caught",
            DismissalKind::Lbw => "lbw",
            DismissalKind::RunOut => "runOut",
            DismissalKind::Stumped => "stumped",
            DismissalKind::HitWicket => "hitWicket",
            DismissalKind::ObstructingTheField => "obstructingField",
            DismissalKind::HandledBall => "handledBall",
            DismissalKind::TimedOut => "timedOut",
            DismissalKind::RetiredHurt => "retiredHurt",
        }
    }

    /// Human readable label for commentary and scorecards.
    pub fn label(&self) -> &'static str {
        match self {
            DismissalKind::Bowled => "bowled",
            DismissalKind::Caught => "caught",
            DismissalKind::Lbw => "lbw",
            DismissalKind::RunOut => "run out",
            DismissalKind::Stumped => "stumped",
            DismissalKind::HitWicket => "hit wicket",
            DismissalKind::ObstructingTheField => "obstructing the field",
            DismissalKind::HandledBall => "handled the ball",
            DismissalKind::TimedOut => "timed out",
            DismissalKind::RetiredHurt => "retired hurt",
        }
    }
}

impl fmt::Display for DismissalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string tag names no known extra or dismissal kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {category}: {value}")]
pub struct UnknownKind {
    pub category: &'static str,
    pub value: String,
}

impl FromStr for ExtraKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "wide" | "wd" => ExtraKind::Wide,
            "noball" | "no-ball" | "nb" => ExtraKind::NoBall,
            "bye" | "b" => ExtraKind::Bye,
            "legbye" | "leg-bye" | "lb" => ExtraKind::LegBye,
            "penalty" | "pen" => ExtraKind::Penalty,
            "noball-bye" => ExtraKind::NoBallBye,
            "noball-legbye" => ExtraKind::NoBallLegBye,
            _ => {
                return Err(UnknownKind { category: "extra type", value: s.to_string() });
            }
        };
        Ok(kind)
    }
}

impl FromStr for DismissalKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        let kind = match normalized.as_str() {
            "bowled" => DismissalKind::Bowled,
            "caught" => DismissalKind::Caught,
            "lbw" => DismissalKind::Lbw,
            "runout" => DismissalKind::RunOut,
            "stumped" => DismissalKind::Stumped,
            "hitwicket" => DismissalKind::HitWicket,
            "obstructingfield" | "obstructingthefield" => DismissalKind::ObstructingTheField,
            "handledball" | "handledtheball" => DismissalKind::HandledBall,
            "timedout" => DismissalKind::TimedOut,
            "retiredhurt" => DismissalKind::RetiredHurt,
            _ => {
                return Err(UnknownKind { category: "dismissal type", value: s.to_string() });
            }
        };
        Ok(kind)
    }
}
