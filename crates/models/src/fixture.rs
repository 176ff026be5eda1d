use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TournamentError;
use crate::team::TeamSummary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Round {
    #[serde(rename = "Quarter-Final")]
    QuarterFinal,
    #[serde(rename = "Semi-Final")]
    SemiFinal,
    #[serde(rename = "Final")]
    Final,
}

impl Round {
    pub fn as_str(&self) -> &'static str {
        match self {
            Round::QuarterFinal => "Quarter-Final",
            Round::SemiFinal => "Semi-Final",
            Round::Final => "Final",
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Round {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Quarter-Final" => Ok(Round::QuarterFinal),
            "Semi-Final" => Ok(Round::SemiFinal),
            "Final" => Ok(Round::Final),
            other => Err(TournamentError::Config(format!("unknown round: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Locked,
    Pending,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Locked => "locked",
            MatchStatus::Pending => "pending",
            MatchStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "locked" => Ok(MatchStatus::Locked),
            "pending" => Ok(MatchStatus::Pending),
            "completed" => Ok(MatchStatus::Completed),
            other => Err(TournamentError::Config(format!("unknown match status: {other}"))),
        }
    }
}

/// A participant position: either a known team or a placeholder awaiting an upstream winner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Slot {
    Team(TeamSummary),
    Placeholder { placeholder: String },
}

impl Slot {
    pub fn placeholder(label: impl Into<String>) -> Self {
        Slot::Placeholder { placeholder: label.into() }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Slot::Team(_))
    }

    pub fn team(&self) -> Option<&TeamSummary> {
        match self {
            Slot::Team(team) => Some(team),
            Slot::Placeholder { .. } => None,
        }
    }

    /// Country for resolved slots, the placeholder label otherwise.
    pub fn label(&self) -> &str {
        match self {
            Slot::Team(team) => &team.country,
            Slot::Placeholder { placeholder } => placeholder,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SlotSide {
    Team1,
    Team2,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Score {
    pub team1: u32,
    pub team2: u32,
}

impl Score {
    pub fn new(team1: u32, team2: u32) -> Self {
        Self { team1, team2 }
    }

    pub fn is_tie(&self) -> bool {
        self.team1 == self.team2
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalEvent {
    pub player: String,
    pub team: String,
    pub minute: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WonBy {
    Normal,
    Penalties,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    #[serde(flatten)]
    pub team: TeamSummary,
    pub won_by: WonBy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyKick {
    pub player: String,
    pub scored: bool,
    #[serde(default)]
    pub sudden_death: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ShootoutKicks {
    pub team1: Vec<PenaltyKick>,
    pub team2: Vec<PenaltyKick>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PenaltyShootout {
    pub score: Score,
    pub penalties: ShootoutKicks,
    pub rounds: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub score: Score,
    pub goal_scorers: Vec<GoalEvent>,
    pub winner: Winner,
    pub penalty_shootout: Option<PenaltyShootout>,
}

impl MatchResult {
    pub fn goals_for(&self, country: &str) -> usize {
        self.goal_scorers.iter().filter(|g| g.team == country).count()
    }

    /// Goal events agree with the score, and a shootout exists exactly when the score is tied.
    pub fn is_consistent(&self, team1: &str, team2: &str) -> bool {
        let goals_match = self.goals_for(team1) == self.score.team1 as usize
            && self.goals_for(team2) == self.score.team2 as usize
            && self.goal_scorers.len() == (self.score.team1 + self.score.team2) as usize;
        let sorted = self.goal_scorers.windows(2).all(|w| w[0].minute <= w[1].minute);
        let shootout_matches = self.score.is_tie() == self.penalty_shootout.is_some();
        let won_by_matches = match self.winner.won_by {
            WonBy::Normal => !self.score.is_tie(),
            WonBy::Penalties => self.score.is_tie(),
        };
        goals_match && sorted && shootout_matches && won_by_matches
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(rename = "matchId")]
    pub code: String,
    pub round: Round,
    #[serde(rename = "matchNumber")]
    pub number: u8,
    pub team1: Slot,
    pub team2: Slot,
    pub status: MatchStatus,
    #[serde(flatten)]
    pub result: Option<MatchResult>,
    pub depends_on: Vec<String>,
    pub feeds: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Match {
    /// A match with both teams known; starts `pending`.
    pub fn seeded(code: impl Into<String>, round: Round, number: u8, team1: TeamSummary, team2: TeamSummary) -> Self {
        Self::with_slots(code.into(), round, number, Slot::Team(team1), Slot::Team(team2), Vec::new())
    }

    /// A match fed by two upstream matches; starts `locked`.
    pub fn awaiting(code: impl Into<String>, round: Round, number: u8, upstream1: &str, upstream2: &str) -> Self {
        Self::with_slots(
            code.into(),
            round,
            number,
            Slot::placeholder(format!("Winner {upstream1}")),
            Slot::placeholder(format!("Winner {upstream2}")),
            vec![upstream1.to_string(), upstream2.to_string()],
        )
    }

    fn with_slots(code: String, round: Round, number: u8, team1: Slot, team2: Slot, depends_on: Vec<String>) -> Self {
        let mut fixture = Self {
            code,
            round,
            number,
            team1,
            team2,
            status: MatchStatus::Locked,
            result: None,
            depends_on,
            feeds: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        fixture.status = fixture.derived_status();
        fixture
    }

    pub fn feeding(mut self, downstream: impl Into<String>) -> Self {
        self.feeds = Some(downstream.into());
        self
    }

    pub fn resolved_slots(&self) -> usize {
        [&self.team1, &self.team2].iter().filter(|s| s.is_resolved()).count()
    }

    /// Status implied by slots and result.
    pub fn derived_status(&self) -> MatchStatus {
        if self.result.is_some() {
            MatchStatus::Completed
        } else if self.resolved_slots() == 2 {
            MatchStatus::Pending
        } else {
            MatchStatus::Locked
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == MatchStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn teams(&self) -> Option<(&TeamSummary, &TeamSummary)> {
        Some((self.team1.team()?, self.team2.team()?))
    }

    pub fn involves(&self, country: &str) -> bool {
        [&self.team1, &self.team2]
            .iter()
            .any(|slot| slot.team().is_some_and(|t| t.country == country))
    }

    pub fn winner(&self) -> Option<&Winner> {
        self.result.as_ref().map(|r| &r.winner)
    }

    /// Slot fed by the given upstream match, if any.
    pub fn side_fed_by(&self, upstream: &str) -> Option<SlotSide> {
        match self.depends_on.iter().position(|code| code == upstream) {
            Some(0) => Some(SlotSide::Team1),
            Some(1) => Some(SlotSide::Team2),
            _ => None,
        }
    }

    /// Fill the slot fed by `upstream` and unlock once both slots are known.
    ///
    /// Returns `true` when this call moved the match from `locked` to `pending`.
    /// A slot that already holds a team is never overwritten.
    pub fn fill_from(&mut self, upstream: &str, team: TeamSummary) -> Result<bool, TournamentError> {
        let side = self.side_fed_by(upstream).ok_or_else(|| TournamentError::DependencyUnavailable {
            reason: format!("{} does not depend on {}", self.code, upstream),
        })?;
        let slot = match side {
            SlotSide::Team1 => &mut self.team1,
            SlotSide::Team2 => &mut self.team2,
        };
        if slot.is_resolved() {
            return Ok(false);
        }
        *slot = Slot::Team(team);

        let was_locked = self.status == MatchStatus::Locked;
        self.status = self.derived_status();
        Ok(was_locked && self.status == MatchStatus::Pending)
    }

    /// Record the result; refuses anything but a `pending` match.
    pub fn complete(&mut self, result: MatchResult, at: DateTime<Utc>) -> Result<(), TournamentError> {
        if self.status != MatchStatus::Pending {
            return Err(TournamentError::MatchNotReady {
                code: self.code.clone(),
                status: self.status,
            });
        }
        self.result = Some(result);
        self.completed_at = Some(at);
        self.status = MatchStatus::Completed;
        Ok(())
    }
}
