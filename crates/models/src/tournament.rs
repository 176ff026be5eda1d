use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TournamentError;
use crate::fixture::{Match, Round};

/// Teams required to start; the bracket shape is fixed.
pub const BRACKET_SIZE: usize = 8;
pub const TOTAL_MATCHES: usize = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::NotStarted => "not_started",
            TournamentStatus::InProgress => "in_progress",
            TournamentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TournamentStatus {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(TournamentStatus::NotStarted),
            "in_progress" => Ok(TournamentStatus::InProgress),
            "completed" => Ok(TournamentStatus::Completed),
            other => Err(TournamentError::Config(format!("unknown tournament status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TournamentState {
    pub status: TournamentStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub champion: Option<String>,
}

impl TournamentState {
    pub fn not_started() -> Self {
        Self::default()
    }

    pub fn started(at: DateTime<Utc>) -> Self {
        Self {
            status: TournamentStatus::InProgress,
            started_at: Some(at),
            champion: None,
        }
    }

    pub fn crowned(mut self, champion: impl Into<String>) -> Self {
        self.status = TournamentStatus::Completed;
        self.champion = Some(champion.into());
        self
    }
}

/// Matches grouped by round, each round ordered by match number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BracketView {
    pub quarter_finals: Vec<Match>,
    pub semi_finals: Vec<Match>,
    #[serde(rename = "final")]
    pub final_match: Option<Match>,
}

impl BracketView {
    pub fn from_matches(matches: Vec<Match>) -> Self {
        let mut view = Self::default();
        for fixture in matches {
            match fixture.round {
                Round::QuarterFinal => view.quarter_finals.push(fixture),
                Round::SemiFinal => view.semi_finals.push(fixture),
                Round::Final => view.final_match = Some(fixture),
            }
        }
        view.quarter_finals.sort_by_key(|m| m.number);
        view.semi_finals.sort_by_key(|m| m.number);
        view
    }

    pub fn completed_count(&self) -> usize {
        self.quarter_finals
            .iter()
            .chain(self.semi_finals.iter())
            .chain(self.final_match.iter())
            .filter(|m| m.is_completed())
            .count()
    }

    pub fn champion(&self) -> Option<&str> {
        self.final_match
            .as_ref()
            .and_then(Match::winner)
            .map(|w| w.team.country.as_str())
    }
}
