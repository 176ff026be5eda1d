use thiserror::Error;

use crate::fixture::MatchStatus;

#[derive(Error, Debug)]
pub enum TournamentError {
    #[error("Need exactly {expected} teams to start, found {found}")]
    InvalidTeamCount { expected: usize, found: usize },

    #[error("Tournament already started: {existing} matches exist")]
    AlreadyStarted { existing: usize },

    #[error("Match {code} is not ready to be played (status: {status})")]
    MatchNotReady { code: String, status: MatchStatus },

    #[error("Dependency unavailable: {reason}")]
    DependencyUnavailable { reason: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid team: {0}")]
    InvalidTeam(String),

    #[error("Team already registered: {country}")]
    DuplicateTeam { country: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TournamentError {
    pub fn match_not_found(code: impl Into<String>) -> Self {
        Self::NotFound { kind: "Match", id: code.into() }
    }

    pub fn team_not_found(country: impl Into<String>) -> Self {
        Self::NotFound { kind: "Team", id: country.into() }
    }

    /// Stable short name, used for metric labels and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTeamCount { .. } => "invalid_team_count",
            Self::AlreadyStarted { .. } => "already_started",
            Self::MatchNotReady { .. } => "match_not_ready",
            Self::DependencyUnavailable { .. } => "dependency_unavailable",
            Self::NotFound { .. } => "not_found",
            Self::InvalidTeam(_) => "invalid_team",
            Self::DuplicateTeam { .. } => "duplicate_team",
            Self::Database(_) => "database",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, TournamentError>;
