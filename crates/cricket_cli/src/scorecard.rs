use cricket_core::models::rules::format_overs;
use cricket_core::models::MatchPhase;
use cricket_core::{Innings, Match, ScoringConfig, Team};
use std::fmt::Write;

/// One line per match for `list`.
pub fn summary_line(m: &Match) -> String {
    let status = if let Some(result) = &m.result {
        result.clone()
    } else if m.is_live {
        m.current_innings()
            .map(|i| format!("live, innings {} at {}", i.number, i.score_line()))
            .unwrap_or_else(|| "live".to_string())
    } else {
        "not started".to_string()
    };
    format!(
        "{}  {}  {} v {} ({} ov)  {}",
        m.id,
        m.date.format("%Y-%m-%d"),
        m.team1.name,
        m.team2.name,
        m.total_overs,
        status
    )
}

fn team_for<'a>(m: &'a Match, id: &str) -> &'a Team {
    if m.team2.id == id {
        &m.team2
    } else {
        &m.team1
    }
}

fn phase_label(phase: MatchPhase) -> &'static str {
    match phase {
        MatchPhase::Powerplay => "early overs",
        MatchPhase::Middle => "middle overs",
        MatchPhase::Death => "death overs",
    }
}

fn render_innings(out: &mut String, m: &Match, innings: &Innings, config: &ScoringConfig) {
    let batting = team_for(m, &innings.batting_team);
    let bowling = team_for(m, &innings.bowling_team);

    let _ = writeln!(out, "\n{} innings: {}", batting.name, innings.score_line());
    if let Some(target) = innings.target {
        let _ = writeln!(out, "  target {}", target);
    }
    if !innings.is_complete {
        let powerplay = if innings.is_powerplay(config.rules.powerplay_overs) {
            format!(", powerplay ({} ov)", config.rules.powerplay_overs)
        } else {
            String::new()
        };
        let _ = writeln!(out, "  {}{}", phase_label(innings.phase(m.total_overs)), powerplay);
    }

    for p in &batting.playing_xi {
        let s = &p.batting_stats;
        if s.balls_faced == 0 && !s.is_out && !s.is_retired_hurt && !innings.current_batsmen.contains(&p.id) {
            continue;
        }
        let _ = writeln!(
            out,
            "  {:<24} {:<16} {:>4} ({}) 4s:{} 6s:{} SR {:.1}",
            p.name,
            s.status(),
            s.runs,
            s.balls_faced,
            s.fours,
            s.sixes,
            s.strike_rate
        );
    }
    let _ = writeln!(out, "  Extras {}  Run rate {:.2}", innings.extras, innings.run_rate());

    for p in bowling.playing_xi.iter().filter(|p| p.bowling_stats.has_bowled()) {
        let _ = writeln!(out, "  {:<24} {}", p.name, p.bowling_stats.figures());
    }

    if let Some(over) = innings.over_history.last() {
        let _ = writeln!(out, "  Over {}: {}", over.number, over.summary());
    }
}

/// Plain-text scorecard of both innings, the result and the awards.
pub fn render(m: &Match, config: &ScoringConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} v {}, {} overs{}",
        m.team1.name,
        m.team2.name,
        m.total_overs,
        m.venue.as_deref().map(|v| format!(" at {}", v)).unwrap_or_default()
    );

    for innings in [m.innings.first.as_ref(), m.innings.second.as_ref()].into_iter().flatten() {
        render_innings(&mut out, m, innings, config);
    }

    let chase = m.current_innings().filter(|i| i.number == 2 && !i.is_complete);
    if let (Some(needed), Some(balls)) = (chase.and_then(|i| i.runs_needed()), m.balls_remaining()) {
        let _ = writeln!(
            out,
            "\nNeed {} from {} balls ({} overs left)",
            needed,
            balls,
            format_overs(balls / 6, balls % 6)
        );
    }

    if let Some(result) = &m.result {
        let _ = writeln!(out, "\n{}", result);
    }
    if let Some(awards) = &m.awards {
        for (label, entry) in [
            ("Best batsman", &awards.best_batsman),
            ("Best bowler", &awards.best_bowler),
            ("Player of the match", &awards.man_of_the_match),
        ] {
            if let Some(entry) = entry {
                let _ = writeln!(out, "{}: {} ({}) {}", label, entry.name, entry.team, entry.figures);
            }
        }
    }
    out
}
