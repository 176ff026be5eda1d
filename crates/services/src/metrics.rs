use anyhow::Result;
use chrono::{DateTime, Utc};
use knockout_models::{Round, WonBy};
use prometheus::core::Collector;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub tournaments_started: u64,
    pub tournament_resets: u64,
    pub matches_resolved: u64,
    pub goals_scored: u64,
    pub resolution_failures: u64,
}

/// Prometheus counters for tournament activity. Each collector owns its own
/// registry so several services can live in one process (tests do this).
pub struct TournamentMetrics {
    start_time: Instant,
    registry: Registry,
    tournaments_started: IntCounter,
    tournament_resets: IntCounter,
    matches_resolved: IntCounterVec,
    goals_scored: IntCounter,
    resolution_failures: IntCounterVec,
    resolution_seconds: Histogram,
}

impl TournamentMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new_custom(Some("knockout".to_string()), None)?;

        let tournaments_started = IntCounter::new("tournaments_started_total", "Brackets generated")?;
        let tournament_resets = IntCounter::new("tournament_resets_total", "Tournament resets")?;
        let matches_resolved = IntCounterVec::new(
            Opts::new("matches_resolved_total", "Matches resolved"),
            &["round", "won_by"],
        )?;
        let goals_scored = IntCounter::new("goals_scored_total", "Goals scored in regulation")?;
        let resolution_failures = IntCounterVec::new(
            Opts::new("resolution_failures_total", "Failed match resolutions"),
            &["kind"],
        )?;
        let resolution_seconds = Histogram::with_opts(HistogramOpts::new(
            "resolution_duration_seconds",
            "Time to resolve and commit one match",
        ))?;

        registry.register(Box::new(tournaments_started.clone()))?;
        registry.register(Box::new(tournament_resets.clone()))?;
        registry.register(Box::new(matches_resolved.clone()))?;
        registry.register(Box::new(goals_scored.clone()))?;
        registry.register(Box::new(resolution_failures.clone()))?;
        registry.register(Box::new(resolution_seconds.clone()))?;

        Ok(Self {
            start_time: Instant::now(),
            registry,
            tournaments_started,
            tournament_resets,
            matches_resolved,
            goals_scored,
            resolution_failures,
            resolution_seconds,
        })
    }

    pub fn record_start(&self) {
        self.tournaments_started.inc();
    }

    pub fn record_reset(&self) {
        self.tournament_resets.inc();
    }

    pub fn record_resolution(&self, round: Round, won_by: WonBy, goals: u32) {
        let won_by = match won_by {
            WonBy::Normal => "normal",
            WonBy::Penalties => "penalties",
        };
        self.matches_resolved.with_label_values(&[round.as_str(), won_by]).inc();
        self.goals_scored.inc_by(u64::from(goals));
    }

    pub fn record_failure(&self, kind: &str) {
        self.resolution_failures.with_label_values(&[kind]).inc();
    }

    pub fn start_resolution_timer(&self) -> prometheus::HistogramTimer {
        self.resolution_seconds.start_timer()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let sum_vec = |vec: &IntCounterVec| -> u64 {
            vec.collect()
                .iter()
                .flat_map(|family| family.get_metric())
                .map(|metric| metric.get_counter().get_value() as u64)
                .sum()
        };

        MetricsSnapshot {
            timestamp: Utc::now(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            tournaments_started: self.tournaments_started.get(),
            tournament_resets: self.tournament_resets.get(),
            matches_resolved: sum_vec(&self.matches_resolved),
            goals_scored: self.goals_scored.get(),
            resolution_failures: sum_vec(&self.resolution_failures),
        }
    }

    /// Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_snapshot() {
        let metrics = TournamentMetrics::new().unwrap();
        metrics.record_start();
        metrics.record_resolution(Round::QuarterFinal, WonBy::Normal, 3);
        metrics.record_resolution(Round::QuarterFinal, WonBy::Penalties, 2);
        metrics.record_resolution(Round::Final, WonBy::Normal, 1);
        metrics.record_failure("match_not_ready");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.tournaments_started, 1);
        assert_eq!(snapshot.matches_resolved, 3);
        assert_eq!(snapshot.goals_scored, 6);
        assert_eq!(snapshot.resolution_failures, 1);
    }

    #[test]
    fn test_render_exposition() {
        let metrics = TournamentMetrics::new().unwrap();
        metrics.record_resolution(Round::SemiFinal, WonBy::Normal, 2);
        let text = metrics.render().unwrap();
        assert!(text.contains("knockout_matches_resolved_total"));
        assert!(text.contains("round=\"Semi-Final\""));
    }

    #[test]
    fn test_independent_registries() {
        let first = TournamentMetrics::new().unwrap();
        let second = TournamentMetrics::new().unwrap();
        first.record_start();
        assert_eq!(second.snapshot().tournaments_started, 0);
    }
}
