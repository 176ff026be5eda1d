use async_trait::async_trait;
use knockout_models::{
    Match, MatchStatus, Result, Slot, Team, TournamentError, TournamentState, TournamentStatus,
};
use std::collections::HashSet;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

use crate::repository::{
    MatchStore, ResolutionCommit, ResolutionOutcome, TeamDirectory, TournamentStatusStore,
};
use crate::schema::{MatchRecord, TeamRecord, TournamentRecord};

const MATCH_COLUMNS: &str =
    "code, round, number, team1, team2, status, result, depends_on, feeds, created_at, completed_at";

/// PostgreSQL-backed store. Multi-row writes run inside one transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lock_match(tx: &mut Transaction<'_, Postgres>, code: &str) -> Result<Option<Match>> {
        let record = sqlx::query_as::<_, MatchRecord>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE code = $1 FOR UPDATE"
        ))
        .bind(code)
        .fetch_optional(&mut **tx)
        .await?;
        record.map(Match::try_from).transpose()
    }

    async fn write_match(tx: &mut Transaction<'_, Postgres>, fixture: &Match) -> Result<()> {
        sqlx::query(
            "UPDATE matches SET team1 = $2, team2 = $3, status = $4, result = $5, completed_at = $6 \
             WHERE code = $1",
        )
        .bind(&fixture.code)
        .bind(Json(&fixture.team1))
        .bind(Json(&fixture.team2))
        .bind(fixture.status.as_str())
        .bind(fixture.result.as_ref().map(Json))
        .bind(fixture.completed_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn write_status(tx: &mut Transaction<'_, Postgres>, state: &TournamentState) -> Result<()> {
        sqlx::query(
            "INSERT INTO tournament (id, status, started_at, champion) VALUES (1, $1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET status = EXCLUDED.status, started_at = EXCLUDED.started_at, champion = EXCLUDED.champion",
        )
        .bind(state.status.as_str())
        .bind(state.started_at)
        .bind(&state.champion)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn lock_matches(tx: &mut Transaction<'_, Postgres>, mode: &str) -> Result<usize> {
        sqlx::query(&format!("LOCK TABLE matches IN {mode} MODE"))
            .execute(&mut **tx)
            .await?;
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM matches")
            .fetch_one(&mut **tx)
            .await?;
        Ok(usize::try_from(existing).unwrap_or_default())
    }
}

#[async_trait]
impl TeamDirectory for PgStore {
    async fn get_team(&self, country: &str) -> Result<Option<Team>> {
        let record = sqlx::query_as::<_, TeamRecord>(
            "SELECT country, manager, rating, players, registered_at FROM teams WHERE country = $1",
        )
        .bind(country)
        .fetch_optional(&self.pool)
        .await?;
        record.map(Team::try_from).transpose()
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let records = sqlx::query_as::<_, TeamRecord>(
            "SELECT country, manager, rating, players, registered_at FROM teams ORDER BY registered_at, country",
        )
        .fetch_all(&self.pool)
        .await?;
        records.into_iter().map(Team::try_from).collect()
    }

    async fn count_teams(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn register_team(&self, team: &Team) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        // SHARE conflicts with the SHARE ROW EXCLUSIVE lock taken by create_bracket.
        let existing = Self::lock_matches(&mut tx, "SHARE").await?;
        if existing > 0 {
            return Err(TournamentError::AlreadyStarted { existing });
        }

        let inserted = sqlx::query(
            "INSERT INTO teams (country, manager, rating, players, registered_at) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (country) DO NOTHING",
        )
        .bind(&team.country)
        .bind(&team.manager)
        .bind(i16::from(team.rating))
        .bind(Json(&team.players))
        .bind(team.registered_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(TournamentError::DuplicateTeam {
                country: team.country.clone(),
            });
        }
        tx.commit().await?;
        info!("Registered team {}", team.country);
        Ok(())
    }
}

#[async_trait]
impl MatchStore for PgStore {
    async fn list_matches(&self) -> Result<Vec<Match>> {
        let records = sqlx::query_as::<_, MatchRecord>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches ORDER BY code"
        ))
        .fetch_all(&self.pool)
        .await?;
        records.into_iter().map(Match::try_from).collect()
    }

    async fn get_match(&self, code: &str) -> Result<Option<Match>> {
        let record = sqlx::query_as::<_, MatchRecord>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        record.map(Match::try_from).transpose()
    }

    async fn create_bracket(&self, matches: &[Match], state: &TournamentState) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let existing = Self::lock_matches(&mut tx, "SHARE ROW EXCLUSIVE").await?;
        if existing > 0 {
            return Err(TournamentError::AlreadyStarted { existing });
        }

        let registered: Vec<String> = sqlx::query_scalar("SELECT country FROM teams")
            .fetch_all(&mut *tx)
            .await?;
        let seeded: HashSet<&str> = matches
            .iter()
            .flat_map(|m| [&m.team1, &m.team2])
            .filter_map(Slot::team)
            .map(|t| t.country.as_str())
            .collect();
        if registered.len() != seeded.len() || !registered.iter().all(|c| seeded.contains(c.as_str())) {
            return Err(TournamentError::InvalidTeamCount {
                expected: seeded.len(),
                found: registered.len(),
            });
        }

        for fixture in matches {
            sqlx::query(
                "INSERT INTO matches (code, round, number, team1, team2, status, result, depends_on, feeds, created_at, completed_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            )
            .bind(&fixture.code)
            .bind(fixture.round.as_str())
            .bind(i16::from(fixture.number))
            .bind(Json(&fixture.team1))
            .bind(Json(&fixture.team2))
            .bind(fixture.status.as_str())
            .bind(fixture.result.as_ref().map(Json))
            .bind(&fixture.depends_on)
            .bind(&fixture.feeds)
            .bind(fixture.created_at)
            .bind(fixture.completed_at)
            .execute(&mut *tx)
            .await?;
        }
        Self::write_status(&mut tx, state).await?;

        tx.commit().await?;
        debug!("Stored {} matches", matches.len());
        Ok(())
    }

    async fn reset(&self) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM matches")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        Self::write_status(&mut tx, &TournamentState::not_started()).await?;
        tx.commit().await?;
        Ok(usize::try_from(removed).unwrap_or_default())
    }

    async fn apply_resolution(&self, commit: &ResolutionCommit) -> Result<ResolutionOutcome> {
        let mut tx = self.pool.begin().await?;

        let mut resolved = Self::lock_match(&mut tx, &commit.code)
            .await?
            .ok_or_else(|| TournamentError::match_not_found(&commit.code))?;
        resolved.complete(commit.result.clone(), commit.completed_at)?;

        let downstream = match &commit.advance {
            Some(advance) => {
                let mut next = Self::lock_match(&mut tx, &advance.downstream)
                    .await?
                    .ok_or_else(|| TournamentError::DependencyUnavailable {
                        reason: format!("downstream match {} is missing", advance.downstream),
                    })?;
                next.fill_from(&commit.code, advance.team.clone())?;
                Some(next)
            }
            None => None,
        };

        // Row locks above serialize competing commits; the status guard is a second line.
        let updated = sqlx::query(
            "UPDATE matches SET status = $2, result = $3, completed_at = $4 WHERE code = $1 AND status = $5",
        )
        .bind(&resolved.code)
        .bind(MatchStatus::Completed.as_str())
        .bind(resolved.result.as_ref().map(Json))
        .bind(resolved.completed_at)
        .bind(MatchStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(TournamentError::MatchNotReady {
                code: resolved.code.clone(),
                status: MatchStatus::Completed,
            });
        }

        if let Some(next) = &downstream {
            Self::write_match(&mut tx, next).await?;
        }
        if let Some(champion) = &commit.crown {
            sqlx::query("UPDATE tournament SET status = $1, champion = $2 WHERE id = 1")
                .bind(TournamentStatus::Completed.as_str())
                .bind(champion)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(ResolutionOutcome { resolved, downstream })
    }
}

#[async_trait]
impl TournamentStatusStore for PgStore {
    async fn get_status(&self) -> Result<TournamentState> {
        let record = sqlx::query_as::<_, TournamentRecord>(
            "SELECT status, started_at, champion FROM tournament WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        match record {
            Some(record) => TournamentState::try_from(record),
            None => Ok(TournamentState::not_started()),
        }
    }
}
