use crate::models::{CommentaryEntry, DismissalKind, ExtraKind, Innings};
use chrono::Utc;

fn runs_phrase(runs: u32) -> String {
    match runs {
        0 => "no run".to_string(),
        1 => "1 run".to_string(),
        n => format!("{} runs", n),
    }
}

pub fn delivery_text(bowler: &str, batsman: &str, runs: u32, extra: Option<ExtraKind>) -> String {
    let call = match extra {
        None => match runs {
            4 => "FOUR!".to_string(),
            6 => "SIX!".to_string(),
            n => runs_phrase(n),
        },
        Some(ExtraKind::Wide) => format!("wide, {}", runs_phrase(runs)),
        Some(ExtraKind::NoBall) => {
            let bat = ExtraKind::NoBall.batsman_runs(runs);
            if bat > 0 {
                format!("no ball, {} off the bat. Free hit next ball", runs_phrase(bat))
            } else {
                "no ball. Free hit next ball".to_string()
            }
        }
        Some(ExtraKind::Bye) => format!("byes, {}", runs_phrase(runs)),
        Some(ExtraKind::LegBye) => format!("leg byes, {}", runs_phrase(runs)),
        Some(ExtraKind::Penalty) => format!("{} penalty runs awarded", runs),
        Some(kind @ (ExtraKind::NoBallBye | ExtraKind::NoBallLegBye)) => {
            let label = if kind == ExtraKind::NoBallBye { "byes" } else { "leg byes" };
            format!("no ball and {}, {}. Free hit next ball", label, runs_phrase(runs))
        }
    };
    format!("{} to {}, {}", bowler, batsman, call)
}

pub fn wicket_text(
    bowler: Option<&str>,
    batsman: &str,
    kind: DismissalKind,
    fielder: Option<&str>,
) -> String {
    if kind.is_retirement() {
        return format!("{} retired hurt", batsman);
    }
    let how = match (kind, fielder) {
        (DismissalKind::Caught, Some(f)) => format!("caught by {}", f),
        (DismissalKind::RunOut, Some(f)) => format!("run out ({})", f),
        (DismissalKind::Stumped, Some(f)) => format!("stumped by {}", f),
        _ => kind.label().to_string(),
    };
    match bowler {
        Some(b) => format!("{} to {}, OUT! {}", b, batsman, how),
        None => format!("{} OUT! {}", batsman, how),
    }
}

/// `" 12 needed from 30 balls."` while a chase is still open.
pub fn chase_suffix(runs_needed: u32, balls_left: u32) -> Option<String> {
    if runs_needed == 0 || balls_left == 0 {
        return None;
    }
    let balls = if balls_left == 1 { "ball" } else { "balls" };
    Some(format!(" {} needed from {} {}.", runs_needed, balls_left, balls))
}

pub fn new_batsman_text(batsman: &str, resuming: bool) -> String {
    if resuming {
        format!("{} resumes their innings", batsman)
    } else {
        format!("{} comes to the crease", batsman)
    }
}

pub(crate) fn push(innings: &mut Innings, over: u32, ball: u32, text: String, runs: u32, is_wicket: bool, is_extra: bool) {
    innings.commentary.push(CommentaryEntry {
        over,
        ball,
        timestamp: Utc::now(),
        text,
        runs,
        is_wicket,
        is_extra,
    });
}
