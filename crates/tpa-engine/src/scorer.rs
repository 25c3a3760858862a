//! Scorer: compares a bracket's picks against decided (or projected)
//! results and turns matches into points.

use std::collections::HashMap;

use serde::Serialize;

use tpa_core::matchup::{Matchup, Round};
use tpa_core::state::TournamentState;
use tpa_core::submission::Bracket;
use tpa_core::team::{Region, RegionOrFinalFour};

/// Per-round and per-region breakdown of a bracket's earned score.
#[derive(Debug, Clone, Default)]
pub struct ScoreDetail {
    pub round_scores: HashMap<u8, u32>,
    pub region_scores: HashMap<RegionOrFinalFour, u32>,
}

impl ScoreDetail {
    pub fn total(&self) -> u32 {
        self.round_scores.values().sum()
    }
}

/// The region a matchup's points are attributed to. Uses the matchup's own
/// `region` field when present; for rounds 1-4 with a missing region (an
/// incompletely-seeded fixture) this falls back to the seed-band convention
/// documented on [`Region::from_seed_band`], the last resort the tournament
/// data model leaves available once the matchup's own region field is
/// exhausted.
pub fn region_of(matchup: &Matchup) -> RegionOrFinalFour {
    if !matchup.round.uses_region_bucket() {
        return RegionOrFinalFour::FinalFour;
    }
    match matchup.region {
        Some(r) => RegionOrFinalFour::Region(r),
        None => {
            let seed = matchup
                .winner_seed
                .or(matchup.team_a_seed)
                .or(matchup.team_b_seed)
                .unwrap_or(1);
            RegionOrFinalFour::Region(Region::from_seed_band(seed as u16))
        }
    }
}

/// Scores `bracket` against every decided matchup in `state`, broken down by
/// round and region.
pub fn score_detailed(bracket: &Bracket, state: &TournamentState) -> ScoreDetail {
    let mut detail = ScoreDetail::default();
    for round in (Round::FIRST.0..=Round::CHAMPIONSHIP.0).map(Round) {
        for matchup in state.graph.round(round) {
            let (Some(winner), Some(winner_seed)) = (&matchup.winner, matchup.winner_seed) else {
                continue;
            };
            let Some(pick) = bracket.pick_for(matchup.id) else {
                continue;
            };
            if pick.winner == *winner && pick.winner_seed == winner_seed {
                let weight = state.scoring_config.weight(round);
                *detail.round_scores.entry(round.0).or_insert(0) += weight;
                *detail.region_scores.entry(region_of(matchup)).or_insert(0) += weight;
            }
        }
    }
    detail
}

/// `bracket`'s total score against `state`, summed across every round.
pub fn score_bracket(bracket: &Bracket, state: &TournamentState) -> u32 {
    score_detailed(bracket, state).total()
}

/// Identical to [`score_bracket`], computed from scratch against a
/// hypothetical state built by overlaying one enumerated outcome. Does not
/// read or write `bracket.score` -- that field only ever reflects the
/// bracket's score against real, decided results.
pub fn score_projected(bracket: &Bracket, projected_state: &TournamentState) -> u32 {
    score_bracket(bracket, projected_state)
}

/// Upper bound on `bracket`'s final score: points already earned plus the
/// weight of every still-undecided pick whose predicted winner has not been
/// eliminated.
pub fn possible_score(bracket: &Bracket, state: &TournamentState) -> u32 {
    let mut total = score_bracket(bracket, state);
    for round in (Round::FIRST.0..=Round::CHAMPIONSHIP.0).map(Round) {
        for matchup in state.graph.round(round) {
            if matchup.winner.is_some() {
                continue;
            }
            let Some(pick) = bracket.pick_for(matchup.id) else {
                continue;
            };
            let still_alive = state
                .teams
                .get(&pick.winner)
                .map(|status| !status.eliminated)
                .unwrap_or(false);
            if still_alive {
                total += state.scoring_config.weight(round);
            }
        }
    }
    total
}

/// One bracket whose stored score no longer matches what it would score
/// against `state`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChange {
    pub bracket_id: String,
    pub participant_name: String,
    pub old_score: u32,
    pub new_score: u32,
}

/// Recomputes every bracket's score against `state` and returns only the
/// brackets whose stored `score` differs from the freshly-computed one --
/// the caller is expected to persist the new scores onto its own copies.
pub fn recalculate_all_scores(state: &TournamentState, brackets: &[Bracket]) -> Vec<ScoreChange> {
    brackets
        .iter()
        .filter_map(|bracket| {
            let new_score = score_bracket(bracket, state);
            if new_score == bracket.score {
                None
            } else {
                Some(ScoreChange {
                    bracket_id: bracket.id.clone(),
                    participant_name: bracket.participant_name.clone(),
                    old_score: bracket.score,
                    new_score,
                })
            }
        })
        .collect()
}
