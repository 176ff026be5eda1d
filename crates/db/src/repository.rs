use async_trait::async_trait;
use chrono::{DateTime, Utc};
use knockout_models::{Match, MatchResult, Result, Team, TeamSummary, TournamentState};

/// Registered teams, keyed by country.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn get_team(&self, country: &str) -> Result<Option<Team>>;
    async fn list_teams(&self) -> Result<Vec<Team>>;
    async fn count_teams(&self) -> Result<usize>;
    /// Fails with `DuplicateTeam` if the country is already registered and
    /// with `AlreadyStarted` once any match exists; the check and the insert
    /// are one step.
    async fn register_team(&self, team: &Team) -> Result<()>;
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn list_matches(&self) -> Result<Vec<Match>>;
    async fn get_match(&self, code: &str) -> Result<Option<Match>>;
    /// Inserts the whole bracket and writes `state` as one unit.
    ///
    /// Fails with `AlreadyStarted` if any match exists, and with
    /// `InvalidTeamCount` if the directory no longer holds exactly the
    /// teams seeded into the bracket.
    async fn create_bracket(&self, matches: &[Match], state: &TournamentState) -> Result<()>;
    /// Removes every match and returns the status record to `not_started` as
    /// one unit. Returns the number of matches removed.
    async fn reset(&self) -> Result<usize>;
    /// Commits a resolved match, its propagation and an optional crowning as one unit.
    ///
    /// The source match must still be `pending` when the write happens; otherwise
    /// nothing is written and `MatchNotReady` is returned.
    async fn apply_resolution(&self, commit: &ResolutionCommit) -> Result<ResolutionOutcome>;
}

#[async_trait]
pub trait TournamentStatusStore: Send + Sync {
    /// Status is only written alongside the match set it describes, through
    /// `MatchStore`.
    async fn get_status(&self) -> Result<TournamentState>;
}

/// Everything the tournament service needs from storage.
pub trait TournamentStore: TeamDirectory + MatchStore + TournamentStatusStore {}

impl<T> TournamentStore for T where T: TeamDirectory + MatchStore + TournamentStatusStore {}

#[derive(Debug, Clone)]
pub struct ResolutionCommit {
    pub code: String,
    pub result: MatchResult,
    pub completed_at: DateTime<Utc>,
    pub advance: Option<Advance>,
    /// Champion to record when this result decides the tournament.
    pub crown: Option<String>,
}

/// Winner moving into the downstream match.
#[derive(Debug, Clone)]
pub struct Advance {
    pub downstream: String,
    pub team: TeamSummary,
}

#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub resolved: Match,
    pub downstream: Option<Match>,
}

impl ResolutionOutcome {
    /// True when the downstream match became playable with this commit.
    pub fn unlocked_downstream(&self) -> bool {
        self.downstream.as_ref().is_some_and(Match::is_ready)
    }
}
