use super::ids::{opt_id, PlayerId, TeamId};
use super::Player;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A side in a match.
///
/// `playing_xi` carries the match figures; `full_roster` is the wider squad the
/// XI was picked from and is never scored against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub full_roster: Vec<Player>,
    #[serde(rename = "playingXI")]
    pub playing_xi: Vec<Player>,
    #[serde(default, with = "opt_id", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub captain: Option<PlayerId>,
    #[serde(default, with = "opt_id", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub wicket_keeper: Option<PlayerId>,
}

impl Team {
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>, playing_xi: Vec<Player>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            full_roster: Vec::new(),
            playing_xi,
            captain: None,
            wicket_keeper: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("Team {} has no name", self.id));
        }

        if self.playing_xi.is_empty() {
            return Err(format!("{} has an empty playing XI", self.name));
        }

        let mut seen = HashSet::new();
        for player in &self.playing_xi {
            if player.id.trim().is_empty() {
                return Err(format!("{} has a player without an id", self.name));
            }
            if !seen.insert(player.id.as_str()) {
                return Err(format!("{} lists player {} twice", self.name, player.id));
            }
        }

        for (role, id) in [("captain", &self.captain), ("wicket keeper", &self.wicket_keeper)] {
            if let Some(id) = id {
                if !seen.contains(id.as_str()) {
                    return Err(format!("{} {} is not in the playing XI", self.name, role));
                }
            }
        }

        Ok(())
    }

    pub fn size(&self) -> usize {
        self.playing_xi.len()
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.playing_xi.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.playing_xi.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.player(id).is_some()
    }

    pub fn player_name(&self, id: &str) -> Option<&str> {
        self.player(id).map(|p| p.name.as_str())
    }

    pub fn reset_match_stats(&mut self) {
        for player in &mut self.playing_xi {
            player.reset_match_stats();
        }
    }
}
