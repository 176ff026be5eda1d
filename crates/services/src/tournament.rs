// Tournament lifecycle: start, resolve, reset and the read models around them

use chrono::Utc;
use knockout_db::{Advance, ResolutionCommit, TournamentStore};
use knockout_models::{
    BracketView, Match, MatchStatus, Result, Team, TeamStats, TopScorer, TournamentError,
    TournamentState, TournamentStatus,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::bracket::BracketBuilder;
use crate::metrics::TournamentMetrics;
use crate::simulator::{MatchSimulator, SimulationConfig};

pub struct TournamentService<S> {
    store: Arc<S>,
    simulator: MatchSimulator,
    metrics: Arc<TournamentMetrics>,
}

impl<S: TournamentStore> TournamentService<S> {
    pub fn new(store: Arc<S>, simulation: SimulationConfig) -> anyhow::Result<Self> {
        let simulator = MatchSimulator::new(simulation)?;
        let metrics = Arc::new(TournamentMetrics::new()?);
        Ok(Self::with_metrics(store, simulator, metrics))
    }

    pub fn with_metrics(store: Arc<S>, simulator: MatchSimulator, metrics: Arc<TournamentMetrics>) -> Self {
        Self { store, simulator, metrics }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn metrics(&self) -> &TournamentMetrics {
        &self.metrics
    }

    /// Adds a team to the directory. Closed once a bracket exists.
    pub async fn register_team(&self, team: Team) -> Result<Team> {
        team.validate()?;
        self.store.register_team(&team).await?;
        info!("📝 Registered {} ({} players)", team.country, team.players.len());
        Ok(team)
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        self.store.list_teams().await
    }

    pub async fn count_teams(&self) -> Result<usize> {
        self.store.count_teams().await
    }

    /// Draws the bracket from the registered teams and persists all seven matches.
    pub async fn start_tournament(&self) -> Result<Vec<Match>> {
        let existing = self.store.list_matches().await?;
        if !existing.is_empty() {
            return Err(TournamentError::AlreadyStarted { existing: existing.len() });
        }

        let teams = self.store.list_teams().await?;
        let matches = {
            let mut rng = rand::thread_rng();
            BracketBuilder::build(&teams, &mut rng)?
        };

        // The store re-checks emptiness and the team list under its own lock,
        // so a racing start or registration fails here.
        self.store
            .create_bracket(&matches, &TournamentState::started(Utc::now()))
            .await?;
        self.metrics.record_start();

        for fixture in matches.iter().filter(|m| m.is_ready()) {
            debug!("{}: {} vs {}", fixture.code, fixture.team1.label(), fixture.team2.label());
        }
        info!("🏆 Tournament started with {} teams, {} matches", teams.len(), matches.len());
        Ok(matches)
    }

    /// Clears every match and returns to `not_started`. Safe to call repeatedly.
    pub async fn reset_tournament(&self) -> Result<usize> {
        let removed = self.store.reset().await?;
        self.metrics.record_reset();
        info!("🔄 Tournament reset, {} matches removed", removed);
        Ok(removed)
    }

    /// Plays a pending match and advances its winner.
    pub async fn resolve_match(&self, code: &str) -> Result<Match> {
        let timer = self.metrics.start_resolution_timer();
        match self.try_resolve(code).await {
            Ok(resolved) => {
                timer.observe_duration();
                Ok(resolved)
            }
            Err(e) => {
                timer.stop_and_discard();
                self.metrics.record_failure(e.kind());
                warn!("Resolving {} failed: {}", code, e);
                Err(e)
            }
        }
    }

    async fn try_resolve(&self, code: &str) -> Result<Match> {
        let fixture = self
            .store
            .get_match(code)
            .await?
            .ok_or_else(|| TournamentError::match_not_found(code))?;
        if fixture.status != MatchStatus::Pending {
            return Err(TournamentError::MatchNotReady {
                code: fixture.code.clone(),
                status: fixture.status,
            });
        }

        let (slot1, slot2) = fixture.teams().ok_or_else(|| TournamentError::DependencyUnavailable {
            reason: format!("{} is pending without both teams", fixture.code),
        })?;
        let team1 = self.lookup_team(&slot1.country).await?;
        let team2 = self.lookup_team(&slot2.country).await?;

        let result = {
            let mut rng = rand::thread_rng();
            self.simulator.simulate(&team1, &team2, &mut rng)?
        };
        let winner = result.winner.clone();
        let goals = result.score.team1 + result.score.team2;

        let commit = ResolutionCommit {
            code: fixture.code.clone(),
            result,
            completed_at: Utc::now(),
            advance: fixture.feeds.as_ref().map(|downstream| Advance {
                downstream: downstream.clone(),
                team: winner.team.clone(),
            }),
            crown: fixture.feeds.is_none().then(|| winner.team.country.clone()),
        };
        let outcome = self.store.apply_resolution(&commit).await?;

        self.metrics.record_resolution(fixture.round, winner.won_by, goals);
        info!(
            "⚽ {} {} {}-{} {} ({} advances)",
            fixture.code,
            team1.country,
            commit.result.score.team1,
            commit.result.score.team2,
            team2.country,
            winner.team.country
        );
        if outcome.unlocked_downstream() {
            if let Some(next) = &outcome.downstream {
                info!("🔓 {} is ready: {} vs {}", next.code, next.team1.label(), next.team2.label());
            }
        }

        if let Some(champion) = &commit.crown {
            info!("🏆 {} are champions", champion);
        }

        Ok(outcome.resolved)
    }

    /// A team referenced by the bracket must still be in the directory.
    async fn lookup_team(&self, country: &str) -> Result<Team> {
        self.store
            .get_team(country)
            .await?
            .ok_or_else(|| TournamentError::DependencyUnavailable {
                reason: format!("team {country} is no longer registered"),
            })
    }

    pub async fn get_match(&self, code: &str) -> Result<Match> {
        self.store
            .get_match(code)
            .await?
            .ok_or_else(|| TournamentError::match_not_found(code))
    }

    /// All matches ordered by round, then match number.
    pub async fn list_matches(&self) -> Result<Vec<Match>> {
        let mut matches = self.store.list_matches().await?;
        matches.sort_by_key(|m| (m.round, m.number));
        Ok(matches)
    }

    pub async fn bracket(&self) -> Result<BracketView> {
        Ok(BracketView::from_matches(self.store.list_matches().await?))
    }

    pub async fn status(&self) -> Result<TournamentState> {
        self.store.get_status().await
    }

    pub async fn champion(&self) -> Result<Option<String>> {
        let state = self.store.get_status().await?;
        Ok(match state.status {
            TournamentStatus::Completed => state.champion,
            _ => None,
        })
    }

    pub async fn top_scorers(&self, limit: Option<usize>) -> Result<Vec<TopScorer>> {
        let matches = self.store.list_matches().await?;
        let mut scorers = knockout_models::top_scorers(&matches);
        if let Some(limit) = limit {
            scorers.truncate(limit);
        }
        Ok(scorers)
    }

    pub async fn team_stats(&self, country: &str) -> Result<TeamStats> {
        if self.store.get_team(country).await?.is_none() {
            return Err(TournamentError::team_not_found(country));
        }
        let matches = self.store.list_matches().await?;
        Ok(knockout_models::team_stats(country, &matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{FINAL, QUARTER_FINALS, SEMI_FINALS};
    use crate::demo::demo_teams;
    use async_trait::async_trait;
    use knockout_db::{InMemoryStore, MatchStore, ResolutionOutcome, TeamDirectory, TournamentStatusStore};
    use knockout_models::{Player, Position, WonBy};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn service() -> TournamentService<InMemoryStore> {
        let store = Arc::new(InMemoryStore::with_teams(demo_teams()));
        TournamentService::new(store, SimulationConfig::default()).unwrap()
    }

    async fn play_all(service: &TournamentService<InMemoryStore>) {
        for code in QUARTER_FINALS.iter().chain(SEMI_FINALS.iter()).chain([FINAL].iter()) {
            service.resolve_match(code).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_full_tournament_crowns_champion() {
        let service = service();
        let matches = service.start_tournament().await.unwrap();
        assert_eq!(matches.len(), 7);
        assert_eq!(service.status().await.unwrap().status, TournamentStatus::InProgress);

        play_all(&service).await;

        let bracket = service.bracket().await.unwrap();
        assert_eq!(bracket.completed_count(), 7);
        let champion = bracket.champion().unwrap().to_string();

        let state = service.status().await.unwrap();
        assert_eq!(state.status, TournamentStatus::Completed);
        assert_eq!(state.champion.as_deref(), Some(champion.as_str()));
        assert_eq!(service.champion().await.unwrap(), Some(champion.clone()));

        // The champion won both earlier rounds as well.
        let final_match = bracket.final_match.unwrap();
        assert!(final_match.involves(&champion));
        for fixture in service.list_matches().await.unwrap() {
            let result = fixture.result.as_ref().unwrap();
            let (t1, t2) = fixture.teams().unwrap();
            assert!(result.is_consistent(&t1.country, &t2.country));
        }

        let snapshot = service.metrics().snapshot();
        assert_eq!(snapshot.matches_resolved, 7);
        assert_eq!(snapshot.tournaments_started, 1);
    }

    #[tokio::test]
    async fn test_semi_final_unlocks_after_both_feeders() {
        let service = service();
        service.start_tournament().await.unwrap();

        service.resolve_match("QF1").await.unwrap();
        let sf1 = service.get_match("SF1").await.unwrap();
        assert_eq!(sf1.status, MatchStatus::Locked);
        assert_eq!(sf1.resolved_slots(), 1);

        let err = service.resolve_match("SF1").await.unwrap_err();
        assert!(matches!(err, TournamentError::MatchNotReady { status: MatchStatus::Locked, .. }));

        let qf2 = service.resolve_match("QF2").await.unwrap();
        let sf1 = service.get_match("SF1").await.unwrap();
        assert_eq!(sf1.status, MatchStatus::Pending);
        assert_eq!(sf1.team2.team().unwrap(), &qf2.winner().unwrap().team);
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let service = service();
        service.start_tournament().await.unwrap();
        let err = service.start_tournament().await.unwrap_err();
        assert!(matches!(err, TournamentError::AlreadyStarted { existing: 7 }));
    }

    #[tokio::test]
    async fn test_start_requires_eight_teams() {
        let mut teams = demo_teams();
        teams.pop();
        let store = Arc::new(InMemoryStore::with_teams(teams));
        let service = TournamentService::new(store, SimulationConfig::default()).unwrap();

        let err = service.start_tournament().await.unwrap_err();
        assert!(matches!(err, TournamentError::InvalidTeamCount { expected: 8, found: 7 }));
        assert!(service.list_matches().await.unwrap().is_empty());
        assert_eq!(service.status().await.unwrap().status, TournamentStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let service = service();
        service.start_tournament().await.unwrap();
        service.resolve_match("QF1").await.unwrap();

        assert_eq!(service.reset_tournament().await.unwrap(), 7);
        assert_eq!(service.reset_tournament().await.unwrap(), 0);
        assert!(service.list_matches().await.unwrap().is_empty());
        assert_eq!(service.status().await.unwrap(), TournamentState::not_started());

        // Teams survive a reset, so a fresh bracket can be drawn.
        assert_eq!(service.count_teams().await.unwrap(), 8);
        assert_eq!(service.start_tournament().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_second_resolution_leaves_result_untouched() {
        let service = service();
        service.start_tournament().await.unwrap();
        let first = service.resolve_match("QF3").await.unwrap();

        let err = service.resolve_match("QF3").await.unwrap_err();
        assert!(matches!(err, TournamentError::MatchNotReady { status: MatchStatus::Completed, .. }));
        assert_eq!(service.get_match("QF3").await.unwrap().result, first.result);
        assert_eq!(service.metrics().snapshot().resolution_failures, 1);
    }

    #[tokio::test]
    async fn test_unknown_match_not_found() {
        let service = service();
        service.start_tournament().await.unwrap();
        let err = service.resolve_match("QF9").await.unwrap_err();
        assert!(matches!(err, TournamentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_team_is_dependency_failure() {
        let service = service();
        let matches = service.start_tournament().await.unwrap();
        let (team1, _) = matches[0].teams().unwrap();
        service.store().remove_team(&team1.country);

        let err = service.resolve_match(&matches[0].code).await.unwrap_err();
        assert!(matches!(err, TournamentError::DependencyUnavailable { .. }));

        let untouched = service.get_match(&matches[0].code).await.unwrap();
        assert_eq!(untouched.status, MatchStatus::Pending);
        assert!(untouched.result.is_none());
        assert_eq!(service.get_match("SF1").await.unwrap().resolved_slots(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolutions_commit_once() {
        let service = Arc::new(service());
        service.start_tournament().await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.resolve_match("QF2").await })
            })
            .collect();

        let mut successes = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(resolved) => successes.push(resolved),
                Err(e) => assert!(matches!(e, TournamentError::MatchNotReady { .. })),
            }
        }
        assert_eq!(successes.len(), 1);

        let stored = service.get_match("QF2").await.unwrap();
        assert_eq!(stored.result, successes[0].result);
        let sf1 = service.get_match("SF1").await.unwrap();
        assert_eq!(sf1.team2.team(), Some(&successes[0].winner().unwrap().team));
    }

    #[tokio::test]
    async fn test_stronger_side_wins_most_quarter_finals() {
        let mut teams = demo_teams();
        for team in teams.iter_mut() {
            team.rating = 40;
        }
        teams[0].rating = 90;
        let favourite = teams[0].country.clone();
        let store = Arc::new(InMemoryStore::with_teams(teams));
        let service = TournamentService::new(store, SimulationConfig::default()).unwrap();

        let trials = 40;
        let mut wins = 0;
        for _ in 0..trials {
            let matches = service.start_tournament().await.unwrap();
            let fixture = matches.iter().find(|m| m.involves(&favourite)).unwrap();
            let (t1, t2) = fixture.teams().unwrap();
            assert_eq!(t1.rating.max(t2.rating), 90);
            assert_eq!(t1.rating.min(t2.rating), 40);

            let resolved = service.resolve_match(&fixture.code).await.unwrap();
            let winner = resolved.winner().unwrap();
            assert!(resolved.involves(&winner.team.country));
            assert_eq!(winner.won_by == WonBy::Penalties, resolved.result.as_ref().unwrap().score.is_tie());
            if winner.team.country == favourite {
                wins += 1;
            }
            service.reset_tournament().await.unwrap();
        }
        assert!(wins * 2 > trials, "favourite won {wins} of {trials}");
    }

    #[tokio::test]
    async fn test_registration_rules() {
        let store = Arc::new(InMemoryStore::new());
        let service = TournamentService::new(store, SimulationConfig::default()).unwrap();
        let roster = || vec![Player::new("Naby Keita", Position::Midfielder, 77)];

        service.register_team(Team::new("Guinea", "Kaba Diawara", 70, roster())).await.unwrap();
        let err = service
            .register_team(Team::new("Guinea", "Kaba Diawara", 70, roster()))
            .await
            .unwrap_err();
        assert!(matches!(err, TournamentError::DuplicateTeam { .. }));

        let err = service.register_team(Team::new("Benin", "Gernot Rohr", 0, roster())).await.unwrap_err();
        assert!(matches!(err, TournamentError::InvalidTeam(_)));

        for team in demo_teams().into_iter().take(7) {
            service.register_team(team).await.unwrap();
        }
        service.start_tournament().await.unwrap();
        let err = service.register_team(Team::new("Mali", "Tom Saintfiet", 72, roster())).await.unwrap_err();
        assert!(matches!(err, TournamentError::AlreadyStarted { .. }));
    }

    #[tokio::test]
    async fn test_scorers_and_team_stats() {
        let service = service();
        service.start_tournament().await.unwrap();
        play_all(&service).await;

        let matches = service.store().list_matches().await.unwrap();
        let total_goals: u32 = matches.iter().filter_map(|m| m.result.as_ref()).map(|r| r.score.team1 + r.score.team2).sum();
        let scorers = service.top_scorers(None).await.unwrap();
        assert_eq!(scorers.iter().map(|s| s.goals).sum::<u32>(), total_goals);
        assert!(scorers.windows(2).all(|w| w[0].goals >= w[1].goals));
        assert!(service.top_scorers(Some(3)).await.unwrap().len() <= 3);

        let champion = service.champion().await.unwrap().unwrap();
        let stats = service.team_stats(&champion).await.unwrap();
        assert_eq!(stats.played, 3);
        assert_eq!(stats.won, 3);
        assert_eq!(stats.lost, 0);

        let err = service.team_stats("Atlantis").await.unwrap_err();
        assert!(matches!(err, TournamentError::NotFound { .. }));
    }

    /// In-memory store that sleeps before every call so concurrent operations
    /// interleave, and can be told to refuse resolution commits.
    struct DelayedStore {
        inner: InMemoryStore,
        delay: Duration,
        refuse_commits: AtomicBool,
    }

    impl DelayedStore {
        fn new(delay_ms: u64) -> Self {
            Self {
                inner: InMemoryStore::with_teams(demo_teams()),
                delay: Duration::from_millis(delay_ms),
                refuse_commits: AtomicBool::new(false),
            }
        }

        async fn pause(&self) {
            tokio::time::sleep(self.delay).await;
        }

        /// Match count and status read without an interleaved status change.
        async fn consistent_view(&self) -> Option<(usize, TournamentStatus)> {
            let before = self.inner.get_status().await.unwrap();
            let count = self.inner.list_matches().await.unwrap().len();
            let after = self.inner.get_status().await.unwrap();
            (before == after).then_some((count, after.status))
        }
    }

    #[async_trait]
    impl TeamDirectory for DelayedStore {
        async fn get_team(&self, country: &str) -> Result<Option<Team>> {
            self.pause().await;
            self.inner.get_team(country).await
        }

        async fn list_teams(&self) -> Result<Vec<Team>> {
            self.pause().await;
            self.inner.list_teams().await
        }

        async fn count_teams(&self) -> Result<usize> {
            self.pause().await;
            self.inner.count_teams().await
        }

        async fn register_team(&self, team: &Team) -> Result<()> {
            self.pause().await;
            self.inner.register_team(team).await
        }
    }

    #[async_trait]
    impl MatchStore for DelayedStore {
        async fn list_matches(&self) -> Result<Vec<Match>> {
            self.pause().await;
            self.inner.list_matches().await
        }

        async fn get_match(&self, code: &str) -> Result<Option<Match>> {
            self.pause().await;
            self.inner.get_match(code).await
        }

        async fn create_bracket(&self, matches: &[Match], state: &TournamentState) -> Result<()> {
            self.pause().await;
            self.inner.create_bracket(matches, state).await
        }

        async fn reset(&self) -> Result<usize> {
            self.pause().await;
            self.inner.reset().await
        }

        async fn apply_resolution(&self, commit: &ResolutionCommit) -> Result<ResolutionOutcome> {
            self.pause().await;
            if self.refuse_commits.load(Ordering::SeqCst) {
                return Err(TournamentError::DependencyUnavailable {
                    reason: "storage offline".to_string(),
                });
            }
            self.inner.apply_resolution(commit).await
        }
    }

    #[async_trait]
    impl TournamentStatusStore for DelayedStore {
        async fn get_status(&self) -> Result<TournamentState> {
            self.pause().await;
            self.inner.get_status().await
        }
    }

    fn delayed_service(delay_ms: u64) -> Arc<TournamentService<DelayedStore>> {
        let store = Arc::new(DelayedStore::new(delay_ms));
        Arc::new(TournamentService::new(store, SimulationConfig::default()).unwrap())
    }

    fn assert_coherent(count: usize, status: TournamentStatus) {
        let coherent = matches!(
            (count, status),
            (0, TournamentStatus::NotStarted) | (7, TournamentStatus::InProgress | TournamentStatus::Completed)
        );
        assert!(coherent, "observed {count} matches with status {status}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_start_and_reset_never_expose_partial_state() {
        let service = delayed_service(20);

        let starting = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.start_tournament().await })
        };
        while !starting.is_finished() {
            if let Some((count, status)) = service.store().consistent_view().await {
                assert_coherent(count, status);
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        starting.await.unwrap().unwrap();

        let resetting = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.reset_tournament().await })
        };
        while !resetting.is_finished() {
            if let Some((count, status)) = service.store().consistent_view().await {
                assert_coherent(count, status);
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(resetting.await.unwrap().unwrap(), 7);
        assert_eq!(service.store().consistent_view().await, Some((0, TournamentStatus::NotStarted)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reset_racing_final_leaves_no_champion() {
        // Reset lands before the final's commit (5ms) and after it (150ms).
        for reset_after_ms in [5, 150] {
            let service = delayed_service(20);
            service.start_tournament().await.unwrap();
            for code in QUARTER_FINALS.iter().chain(SEMI_FINALS.iter()) {
                service.resolve_match(code).await.unwrap();
            }

            let resolving = {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.resolve_match(FINAL).await })
            };
            tokio::time::sleep(Duration::from_millis(reset_after_ms)).await;
            service.reset_tournament().await.unwrap();

            if let Err(e) = resolving.await.unwrap() {
                assert!(matches!(e, TournamentError::NotFound { .. }), "unexpected {e}");
            }
            let state = service.store().inner.get_status().await.unwrap();
            assert_eq!(state, TournamentState::not_started(), "reset after {reset_after_ms}ms");
            assert!(service.store().inner.list_matches().await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_refused_final_commit_changes_nothing() {
        let service = delayed_service(0);
        service.start_tournament().await.unwrap();
        for code in QUARTER_FINALS.iter().chain(SEMI_FINALS.iter()) {
            service.resolve_match(code).await.unwrap();
        }

        service.store().refuse_commits.store(true, Ordering::SeqCst);
        let err = service.resolve_match(FINAL).await.unwrap_err();
        assert!(matches!(err, TournamentError::DependencyUnavailable { .. }));
        assert_eq!(service.get_match(FINAL).await.unwrap().status, MatchStatus::Pending);
        let state = service.status().await.unwrap();
        assert_eq!(state.status, TournamentStatus::InProgress);
        assert!(state.champion.is_none());

        // Nothing half-committed, so a retry succeeds.
        service.store().refuse_commits.store(false, Ordering::SeqCst);
        let resolved = service.resolve_match(FINAL).await.unwrap();
        let state = service.status().await.unwrap();
        assert_eq!(state.status, TournamentStatus::Completed);
        assert_eq!(state.champion.as_deref(), Some(resolved.winner().unwrap().team.country.as_str()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_registration_racing_start_keeps_directory_and_bracket_aligned() {
        let service = delayed_service(20);
        let starting = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.start_tournament().await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        let late = Team::new("Mali", "Tom Saintfiet", 72, vec![Player::new("Yves Bissouma", Position::Midfielder, 80)]);
        let registered = service.register_team(late).await;
        let started = starting.await.unwrap();

        let matches = service.store().inner.list_matches().await.unwrap();
        let teams = service.store().inner.count_teams().await.unwrap();
        match (started, registered) {
            (Ok(_), Err(e)) => {
                assert!(matches!(e, TournamentError::AlreadyStarted { .. }));
                assert_eq!((matches.len(), teams), (7, 8));
            }
            (Err(e), Ok(_)) => {
                assert!(matches!(e, TournamentError::InvalidTeamCount { expected: 8, found: 9 }));
                assert_eq!((matches.len(), teams), (0, 9));
                assert_eq!(service.store().inner.get_status().await.unwrap(), TournamentState::not_started());
            }
            (started, registered) => panic!("start {started:?} and registration {registered:?} both settled the same way"),
        }
    }
}
