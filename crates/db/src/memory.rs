use async_trait::async_trait;
use dashmap::DashMap;
use knockout_models::{Match, Result, Slot, Team, TournamentError, TournamentState};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::repository::{
    MatchStore, ResolutionCommit, ResolutionOutcome, TeamDirectory, TournamentStatusStore,
};

/// Process-local store. Every match write goes through one lock, which makes
/// bracket creation, reset and resolution commits atomic. Writers that also
/// touch the status record take the match lock first.
#[derive(Default)]
pub struct InMemoryStore {
    teams: DashMap<String, Team>,
    matches: RwLock<BTreeMap<String, Match>>,
    status: RwLock<TournamentState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_teams(teams: impl IntoIterator<Item = Team>) -> Self {
        let store = Self::new();
        for team in teams {
            store.teams.insert(team.country.clone(), team);
        }
        store
    }

    /// Drops a team from the directory, returning it if present.
    pub fn remove_team(&self, country: &str) -> Option<Team> {
        self.teams.remove(country).map(|(_, team)| team)
    }
}

#[async_trait]
impl TeamDirectory for InMemoryStore {
    async fn get_team(&self, country: &str) -> Result<Option<Team>> {
        Ok(self.teams.get(country).map(|entry| entry.value().clone()))
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let mut teams: Vec<Team> = self.teams.iter().map(|entry| entry.value().clone()).collect();
        teams.sort_by(|a, b| a.registered_at.cmp(&b.registered_at).then_with(|| a.country.cmp(&b.country)));
        Ok(teams)
    }

    async fn count_teams(&self) -> Result<usize> {
        Ok(self.teams.len())
    }

    async fn register_team(&self, team: &Team) -> Result<()> {
        // Held across the insert so a concurrent draw sees either no team or this one.
        let matches = self.matches.read();
        if !matches.is_empty() {
            return Err(TournamentError::AlreadyStarted { existing: matches.len() });
        }
        match self.teams.entry(team.country.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(TournamentError::DuplicateTeam {
                country: team.country.clone(),
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(team.clone());
                Ok(())
            }
        }
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn list_matches(&self) -> Result<Vec<Match>> {
        Ok(self.matches.read().values().cloned().collect())
    }

    async fn get_match(&self, code: &str) -> Result<Option<Match>> {
        Ok(self.matches.read().get(code).cloned())
    }

    async fn create_bracket(&self, matches: &[Match], state: &TournamentState) -> Result<()> {
        let mut stored = self.matches.write();
        if !stored.is_empty() {
            return Err(TournamentError::AlreadyStarted { existing: stored.len() });
        }

        let seeded: HashSet<&str> = matches
            .iter()
            .flat_map(|m| [&m.team1, &m.team2])
            .filter_map(Slot::team)
            .map(|t| t.country.as_str())
            .collect();
        if self.teams.len() != seeded.len() || !seeded.iter().all(|c| self.teams.contains_key(*c)) {
            return Err(TournamentError::InvalidTeamCount {
                expected: seeded.len(),
                found: self.teams.len(),
            });
        }

        let mut status = self.status.write();
        for fixture in matches {
            stored.insert(fixture.code.clone(), fixture.clone());
        }
        *status = state.clone();
        debug!("Stored {} matches", matches.len());
        Ok(())
    }

    async fn reset(&self) -> Result<usize> {
        let mut stored = self.matches.write();
        let mut status = self.status.write();
        let removed = stored.len();
        stored.clear();
        *status = TournamentState::not_started();
        Ok(removed)
    }

    async fn apply_resolution(&self, commit: &ResolutionCommit) -> Result<ResolutionOutcome> {
        let mut stored = self.matches.write();

        // Stage both writes on copies so a failure leaves the map untouched.
        let mut resolved = stored
            .get(&commit.code)
            .cloned()
            .ok_or_else(|| TournamentError::match_not_found(&commit.code))?;
        resolved.complete(commit.result.clone(), commit.completed_at)?;

        let downstream = match &commit.advance {
            Some(advance) => {
                let mut next = stored.get(&advance.downstream).cloned().ok_or_else(|| {
                    TournamentError::DependencyUnavailable {
                        reason: format!("downstream match {} is missing", advance.downstream),
                    }
                })?;
                next.fill_from(&commit.code, advance.team.clone())?;
                Some(next)
            }
            None => None,
        };

        stored.insert(resolved.code.clone(), resolved.clone());
        if let Some(next) = &downstream {
            stored.insert(next.code.clone(), next.clone());
        }
        if let Some(champion) = &commit.crown {
            let mut status = self.status.write();
            *status = status.clone().crowned(champion.clone());
        }

        Ok(ResolutionOutcome { resolved, downstream })
    }
}

#[async_trait]
impl TournamentStatusStore for InMemoryStore {
    async fn get_status(&self) -> Result<TournamentState> {
        Ok(self.status.read().clone())
    }
}
