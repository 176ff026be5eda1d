use chrono::{DateTime, Utc};
use knockout_models::{Match, MatchResult, Player, Slot, Team, TournamentError, TournamentState};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamRecord {
    pub country: String,
    pub manager: String,
    pub rating: i16,
    pub players: Json<Vec<Player>>,
    pub registered_at: DateTime<Utc>,
}

impl TryFrom<TeamRecord> for Team {
    type Error = TournamentError;

    fn try_from(record: TeamRecord) -> Result<Self, Self::Error> {
        let rating = u8::try_from(record.rating).map_err(|_| TournamentError::DependencyUnavailable {
            reason: format!("team {} has an unreadable rating {}", record.country, record.rating),
        })?;
        Ok(Team {
            country: record.country,
            manager: record.manager,
            rating,
            players: record.players.0,
            registered_at: record.registered_at,
        })
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MatchRecord {
    pub code: String,
    pub round: String,
    pub number: i16,
    pub team1: Json<Slot>,
    pub team2: Json<Slot>,
    pub status: String,
    pub result: Option<Json<MatchResult>>,
    pub depends_on: Vec<String>,
    pub feeds: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<MatchRecord> for Match {
    type Error = TournamentError;

    fn try_from(record: MatchRecord) -> Result<Self, Self::Error> {
        let number = u8::try_from(record.number).map_err(|_| TournamentError::DependencyUnavailable {
            reason: format!("match {} has an unreadable number {}", record.code, record.number),
        })?;
        Ok(Match {
            round: record.round.parse()?,
            status: record.status.parse()?,
            code: record.code,
            number,
            team1: record.team1.0,
            team2: record.team2.0,
            result: record.result.map(|r| r.0),
            depends_on: record.depends_on,
            feeds: record.feeds,
            created_at: record.created_at,
            completed_at: record.completed_at,
        })
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub champion: Option<String>,
}

impl TryFrom<TournamentRecord> for TournamentState {
    type Error = TournamentError;

    fn try_from(record: TournamentRecord) -> Result<Self, Self::Error> {
        Ok(TournamentState {
            status: record.status.parse()?,
            started_at: record.started_at,
            champion: record.champion,
        })
    }
}
