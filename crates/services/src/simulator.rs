use knockout_models::{
    GoalEvent, MatchResult, PenaltyKick, PenaltyShootout, Player, Result, Score, ShootoutKicks,
    Team, TournamentError, Winner, WonBy,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Scales `random + strength` into a goal count.
    pub goal_multiplier: f64,
    pub max_minute: u8,
    pub shootout_kicks: u8,
    /// Probability that a logged shootout kick is scored.
    pub kick_conversion: f64,
    /// Upper bound of the per-team shootout tally drawn to pick the winner.
    pub max_shootout_goals: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            goal_multiplier: 3.0,
            max_minute: 90,
            shootout_kicks: 5,
            kick_conversion: 0.7,
            max_shootout_goals: 5,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.goal_multiplier.is_finite() || self.goal_multiplier < 0.0 {
            return Err(TournamentError::Config(format!(
                "goal_multiplier must be a non-negative number, got {}",
                self.goal_multiplier
            )));
        }
        if self.max_minute == 0 {
            return Err(TournamentError::Config("max_minute must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.kick_conversion) {
            return Err(TournamentError::Config(format!(
                "kick_conversion must be within 0..=1, got {}",
                self.kick_conversion
            )));
        }
        Ok(())
    }
}

/// Rating-weighted match outcomes. Holds no random state; every call draws
/// from the generator it is handed.
#[derive(Debug, Clone)]
pub struct MatchSimulator {
    config: SimulationConfig,
}

impl MatchSimulator {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Share of the combined rating held by `rating`.
    pub fn strength(rating: u8, opponent: u8) -> f64 {
        let total = f64::from(rating) + f64::from(opponent);
        if total == 0.0 {
            0.5
        } else {
            f64::from(rating) / total
        }
    }

    /// `round(max(0, (U(0,1) + weight) * multiplier))`, uncapped.
    pub fn draw_goals<R: Rng + ?Sized>(&self, weight: f64, rng: &mut R) -> u32 {
        let raw = (rng.gen::<f64>() + weight) * self.config.goal_multiplier;
        raw.max(0.0).round() as u32
    }

    pub fn simulate<R: Rng + ?Sized>(&self, team1: &Team, team2: &Team, rng: &mut R) -> Result<MatchResult> {
        for team in [team1, team2] {
            if team.players.is_empty() {
                return Err(TournamentError::DependencyUnavailable {
                    reason: format!("team {} has no roster", team.country),
                });
            }
        }

        let goals1 = self.draw_goals(Self::strength(team1.rating, team2.rating), rng);
        let goals2 = self.draw_goals(Self::strength(team2.rating, team1.rating), rng);
        let score = Score::new(goals1, goals2);

        let mut goal_scorers = self.goal_events(team1, goals1, rng);
        goal_scorers.extend(self.goal_events(team2, goals2, rng));
        goal_scorers.sort_by_key(|goal| goal.minute);

        let (winner, penalty_shootout) = self.decide(score, team1, team2, rng);

        Ok(MatchResult {
            score,
            goal_scorers,
            winner,
            penalty_shootout,
        })
    }

    fn goal_events<R: Rng + ?Sized>(&self, team: &Team, goals: u32, rng: &mut R) -> Vec<GoalEvent> {
        (0..goals)
            .map(|_| GoalEvent {
                player: pick_player(&team.players, rng),
                team: team.country.clone(),
                minute: rng.gen_range(1..=self.config.max_minute),
            })
            .collect()
    }

    /// Winner for a regulation score; ties go to a shootout.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        score: Score,
        team1: &Team,
        team2: &Team,
        rng: &mut R,
    ) -> (Winner, Option<PenaltyShootout>) {
        if score.team1 > score.team2 {
            return (Winner { team: team1.summary(), won_by: WonBy::Normal }, None);
        }
        if score.team2 > score.team1 {
            return (Winner { team: team2.summary(), won_by: WonBy::Normal }, None);
        }

        let (winner, shootout) = self.shootout(team1, team2, rng);
        (winner, Some(shootout))
    }

    /// Tallies decide the winner, team 1 taking equal tallies. The kick log
    /// is drawn separately and does not have to add up to the tallies.
    pub fn shootout<R: Rng + ?Sized>(&self, team1: &Team, team2: &Team, rng: &mut R) -> (Winner, PenaltyShootout) {
        let tally1 = rng.gen_range(0..=self.config.max_shootout_goals);
        let tally2 = rng.gen_range(0..=self.config.max_shootout_goals);
        let winning_team = if tally1 >= tally2 { team1 } else { team2 };

        let shootout = PenaltyShootout {
            score: Score::new(tally1, tally2),
            penalties: ShootoutKicks {
                team1: self.kick_log(team1, rng),
                team2: self.kick_log(team2, rng),
            },
            rounds: self.config.shootout_kicks,
        };

        (Winner { team: winning_team.summary(), won_by: WonBy::Penalties }, shootout)
    }

    fn kick_log<R: Rng + ?Sized>(&self, team: &Team, rng: &mut R) -> Vec<PenaltyKick> {
        (0..self.config.shootout_kicks)
            .map(|_| PenaltyKick {
                player: pick_player(&team.players, rng),
                scored: rng.gen_bool(self.config.kick_conversion),
                sudden_death: false,
            })
            .collect()
    }
}

fn pick_player<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> String {
    players
        .choose(rng)
        .map_or_else(|| "Unknown".to_string(), |p| p.name.clone())
}
