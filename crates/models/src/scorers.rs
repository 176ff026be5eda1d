use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::fixture::Match;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopScorer {
    pub player: String,
    pub team: String,
    pub goals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerGoals {
    pub player: String,
    pub goals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub country: String,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub goal_difference: i64,
    pub top_scorers: Vec<PlayerGoals>,
}

const TEAM_TOP_SCORERS: usize = 5;

/// Rank every scorer across completed matches, most goals first.
pub fn top_scorers(matches: &[Match]) -> Vec<TopScorer> {
    let mut counts: HashMap<(&str, &str), u32> = HashMap::new();
    for result in matches.iter().filter_map(|m| m.result.as_ref()) {
        for goal in &result.goal_scorers {
            *counts.entry((goal.player.as_str(), goal.team.as_str())).or_default() += 1;
        }
    }

    let mut scorers: Vec<TopScorer> = counts
        .into_iter()
        .map(|((player, team), goals)| TopScorer {
            player: player.to_string(),
            team: team.to_string(),
            goals,
        })
        .collect();
    scorers.sort_by(|a, b| {
        b.goals
            .cmp(&a.goals)
            .then_with(|| a.player.cmp(&b.player))
            .then_with(|| a.team.cmp(&b.team))
    });
    scorers
}

/// Record and scorers for one team over its completed matches.
pub fn team_stats(country: &str, matches: &[Match]) -> TeamStats {
    let mut stats = TeamStats {
        country: country.to_string(),
        ..TeamStats::default()
    };
    let mut scorers: HashMap<&str, u32> = HashMap::new();

    for fixture in matches.iter().filter(|m| m.involves(country)) {
        let Some(result) = fixture.result.as_ref() else {
            continue;
        };
        stats.played += 1;
        if result.winner.team.country == country {
            stats.won += 1;
        } else {
            stats.lost += 1;
        }

        let is_team1 = fixture.team1.team().is_some_and(|t| t.country == country);
        let (scored, conceded) = if is_team1 {
            (result.score.team1, result.score.team2)
        } else {
            (result.score.team2, result.score.team1)
        };
        stats.goals_scored += scored;
        stats.goals_conceded += conceded;

        for goal in result.goal_scorers.iter().filter(|g| g.team == country) {
            *scorers.entry(goal.player.as_str()).or_default() += 1;
        }
    }

    stats.goal_difference = i64::from(stats.goals_scored) - i64::from(stats.goals_conceded);

    let mut top: Vec<PlayerGoals> = scorers
        .into_iter()
        .map(|(player, goals)| PlayerGoals { player: player.to_string(), goals })
        .collect();
    top.sort_by(|a, b| b.goals.cmp(&a.goals).then_with(|| a.player.cmp(&b.player)));
    top.truncate(TEAM_TOP_SCORERS);
    stats.top_scorers = top;

    stats
}
