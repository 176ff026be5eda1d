use knockout_models::{Match, Result, Round, Team, TournamentError, BRACKET_SIZE};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

pub const QUARTER_FINALS: [&str; 4] = ["QF1", "QF2", "QF3", "QF4"];
pub const SEMI_FINALS: [&str; 2] = ["SF1", "SF2"];
pub const FINAL: &str = "FINAL";

/// Builds the fixed 8-team, 3-round knockout graph.
pub struct BracketBuilder;

impl BracketBuilder {
    /// Shuffles the teams and wires QF1..QF4 into SF1/SF2 into the final.
    pub fn build<R: Rng + ?Sized>(teams: &[Team], rng: &mut R) -> Result<Vec<Match>> {
        if teams.len() != BRACKET_SIZE {
            return Err(TournamentError::InvalidTeamCount {
                expected: BRACKET_SIZE,
                found: teams.len(),
            });
        }
        let distinct: HashSet<&str> = teams.iter().map(|t| t.country.as_str()).collect();
        if distinct.len() != BRACKET_SIZE {
            return Err(TournamentError::InvalidTeamCount {
                expected: BRACKET_SIZE,
                found: distinct.len(),
            });
        }

        let mut drawn: Vec<&Team> = teams.iter().collect();
        drawn.shuffle(rng);

        let mut matches = Vec::with_capacity(knockout_models::TOTAL_MATCHES);
        for (index, (code, pair)) in QUARTER_FINALS.iter().zip(drawn.chunks_exact(2)).enumerate() {
            let semi = SEMI_FINALS[index / 2];
            matches.push(
                Match::seeded(*code, Round::QuarterFinal, match_number(index), pair[0].summary(), pair[1].summary())
                    .feeding(semi),
            );
        }

        for (index, (semi, feeders)) in SEMI_FINALS.iter().zip(QUARTER_FINALS.chunks_exact(2)).enumerate() {
            matches.push(
                Match::awaiting(*semi, Round::SemiFinal, match_number(index), feeders[0], feeders[1]).feeding(FINAL),
            );
        }

        matches.push(Match::awaiting(FINAL, Round::Final, 1, SEMI_FINALS[0], SEMI_FINALS[1]));
        Ok(matches)
    }
}

fn match_number(index: usize) -> u8 {
    u8::try_from(index + 1).unwrap_or(u8::MAX)
}
