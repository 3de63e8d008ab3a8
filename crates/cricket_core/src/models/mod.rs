pub mod events;
pub mod ids;
pub mod innings;
pub mod match_state;
pub mod player;
pub mod rules;
pub mod team;

pub use events::{DismissalKind, ExtraKind, FieldingCredit, UnknownKind};
pub use ids::{MatchId, PlayerId, TeamId};
pub use innings::{Ball, CommentaryEntry, CompletionReason, CurrentBatsmen, Innings, Over, Partnership};
pub use match_state::{
    AwardEntry, Awards, InningsPair, Margin, Match, MatchOutcome, MatchType, TeamSide, Toss,
    TossDecision,
};
pub use player::{BattingStats, BowlingStats, FieldingStats, Player, PlayerRole};
pub use rules::MatchPhase;
pub use team::Team;
