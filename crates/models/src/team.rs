use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TournamentError};

pub const MIN_TEAM_RATING: u8 = 1;
pub const MAX_TEAM_RATING: u8 = 100;
pub const MAX_PLAYER_RATING: u8 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DF")]
    Defender,
    #[serde(rename = "MD")]
    Midfielder,
    #[serde(rename = "AT")]
    Attacker,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MD",
            Position::Attacker => "AT",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub position: Position,
    pub ratings: HashMap<Position, u8>,
    #[serde(default)]
    pub is_captain: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, position: Position, rating: u8) -> Self {
        Self {
            name: name.into(),
            position,
            ratings: HashMap::from([(position, rating)]),
            is_captain: false,
        }
    }

    pub fn with_rating(mut self, position: Position, rating: u8) -> Self {
        self.ratings.insert(position, rating);
        self
    }

    pub fn as_captain(mut self) -> Self {
        self.is_captain = true;
        self
    }

    /// Rating for the player's assigned position.
    pub fn position_rating(&self) -> Option<u8> {
        self.ratings.get(&self.position).copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub country: String,
    pub manager: String,
    #[serde(rename = "teamRating")]
    pub rating: u8,
    pub players: Vec<Player>,
    #[serde(default = "Utc::now")]
    pub registered_at: DateTime<Utc>,
}

impl Team {
    pub fn new(country: impl Into<String>, manager: impl Into<String>, rating: u8, players: Vec<Player>) -> Self {
        Self {
            country: country.into(),
            manager: manager.into(),
            rating,
            players,
            registered_at: Utc::now(),
        }
    }

    pub fn captain(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_captain)
    }

    pub fn summary(&self) -> TeamSummary {
        TeamSummary {
            country: self.country.clone(),
            manager: self.manager.clone(),
            rating: self.rating,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.country.trim().is_empty() {
            return Err(TournamentError::InvalidTeam("country must not be empty".to_string()));
        }
        if self.manager.trim().is_empty() {
            return Err(TournamentError::InvalidTeam(format!("{}: manager must not be empty", self.country)));
        }
        if !(MIN_TEAM_RATING..=MAX_TEAM_RATING).contains(&self.rating) {
            return Err(TournamentError::InvalidTeam(format!(
                "{}: rating {} outside {}..={}",
                self.country, self.rating, MIN_TEAM_RATING, MAX_TEAM_RATING
            )));
        }
        if self.players.is_empty() {
            return Err(TournamentError::InvalidTeam(format!("{}: roster is empty", self.country)));
        }

        for player in &self.players {
            match player.position_rating() {
                None => {
                    return Err(TournamentError::InvalidTeam(format!(
                        "{}: player {} has no rating for position {}",
                        self.country, player.name, player.position
                    )))
                }
                Some(_) if player.ratings.values().any(|r| *r > MAX_PLAYER_RATING) => {
                    return Err(TournamentError::InvalidTeam(format!(
                        "{}: player {} has a rating above {}",
                        self.country, player.name, MAX_PLAYER_RATING
                    )))
                }
                Some(_) => {}
            }
        }

        let captains = self.players.iter().filter(|p| p.is_captain).count();
        if captains > 1 {
            return Err(TournamentError::InvalidTeam(format!(
                "{}: {} captains named, at most one allowed",
                self.country, captains
            )));
        }

        Ok(())
    }
}

/// The part of a team copied into a match slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub country: String,
    pub manager: String,
    #[serde(rename = "teamRating")]
    pub rating: u8,
}
