//! # cricket_core - Ball-by-Ball Limited-Overs Scoring Engine
//!
//! Turns raw delivery outcomes (runs, extras, dismissals) into match state,
//! decides when overs, innings and the match end, and computes the result and
//! awards.
//!
//! ## Features
//! - Validation gate that reports every failed precondition at once
//! - One-step undo from a full pre-action snapshot
//! - Serde JSON document for the whole match, with a published schema
//! - File and in-memory match stores

// Commentary and ball records take many small positional fields
#![allow(clippy::too_many_arguments)]
// Match snapshots are boxed at the undo seam only
#![allow(clippy::large_enum_variant)]

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;

pub use config::{ConfigError, ScoringConfig};
pub use engine::{
    calculate_awards, calculate_result, eligible_bowlers, eligible_new_batsmen,
    repair_current_batsmen, resolve_current_batsmen, CommandOutcome, DeliveryOutcome, Dismissal,
    InningsTransition, MatchResult, ScoringCommand, ScoringEngine, UndoOutcome, WicketOutcome,
};
pub use error::{Result, ScoringError, UndoError, ValidationError, ValidationReport};
pub use models::{
    DismissalKind, ExtraKind, Innings, Match, MatchOutcome, MatchType, Player, PlayerRole, Team,
    TeamSide, Toss, TossDecision,
};
pub use save::{JsonFileStore, MatchStore, MemoryStore, SaveError};

/// Library version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
