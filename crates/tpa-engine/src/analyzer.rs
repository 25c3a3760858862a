//! Outcome Analyzer: scores every bracket against every enumerated outcome
//! and aggregates the per-bracket results with Olympic tie semantics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use tpa_core::matchup::MatchupId;
use tpa_core::state::TournamentState;
use tpa_core::submission::Bracket;

use crate::outcome::Outcome;
use crate::scorer::score_projected;

/// Per-bracket aggregate across every outcome in the enumeration.
#[derive(Debug, Clone)]
pub struct BracketAccumulator {
    pub min_score: u32,
    pub max_score: u32,
    score_sum: u64,
    pub wins: u64,
    pub place_counts: [u64; 3],
    pub min_place: usize,
    pub max_place: usize,
    outcomes_seen: u64,
}

impl BracketAccumulator {
    fn new() -> Self {
        Self {
            min_score: u32::MAX,
            max_score: 0,
            score_sum: 0,
            wins: 0,
            place_counts: [0; 3],
            min_place: usize::MAX,
            max_place: 0,
            outcomes_seen: 0,
        }
    }

    fn record(&mut self, score: u32, place: usize) {
        self.min_score = self.min_score.min(score);
        self.max_score = self.max_score.max(score);
        self.score_sum += score as u64;
        self.outcomes_seen += 1;
        if place == 1 {
            self.wins += 1;
        }
        if place <= 3 {
            self.place_counts[place - 1] += 1;
        }
        self.min_place = self.min_place.min(place);
        self.max_place = self.max_place.max(place);
    }

    fn merge(mut self, other: Self) -> Self {
        self.min_score = self.min_score.min(other.min_score);
        self.max_score = self.max_score.max(other.max_score);
        self.score_sum += other.score_sum;
        self.wins += other.wins;
        for i in 0..3 {
            self.place_counts[i] += other.place_counts[i];
        }
        self.min_place = self.min_place.min(other.min_place);
        self.max_place = self.max_place.max(other.max_place);
        self.outcomes_seen += other.outcomes_seen;
        self
    }

    pub fn avg_score(&self) -> f64 {
        if self.outcomes_seen == 0 {
            0.0
        } else {
            self.score_sum as f64 / self.outcomes_seen as f64
        }
    }

    pub fn win_percentage(&self) -> f64 {
        percentage(self.wins, self.outcomes_seen)
    }

    pub fn place_percentage(&self, place: usize) -> f64 {
        percentage(self.place_counts[place - 1], self.outcomes_seen)
    }

    pub fn podium_percentage(&self) -> f64 {
        let podium: u64 = self.place_counts.iter().sum();
        percentage(podium, self.outcomes_seen)
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Outcomes grouped by their champion (or, separately, by their unordered
/// championship finalist pair), used by [`crate::statistics`] for the
/// per-team conditional path analysis and championship-matchup scenarios.
#[derive(Debug, Clone, Default)]
pub struct OutcomeGroup {
    pub outcome_count: u64,
    /// bracket id -> number of outcomes in this group where that bracket
    /// finished in the podium (place 1-3).
    pub podium_counts: HashMap<String, u64>,
    /// bracket id -> sum of finishing place across this group's outcomes,
    /// for computing an average finishing position.
    place_sums: HashMap<String, u64>,
}

impl OutcomeGroup {
    fn record(&mut self, bracket_id: &str, place: usize) {
        self.outcome_count += 1;
        if place <= 3 {
            *self.podium_counts.entry(bracket_id.to_string()).or_insert(0) += 1;
        }
        *self.place_sums.entry(bracket_id.to_string()).or_insert(0) += place as u64;
    }

    fn merge(mut self, other: Self) -> Self {
        self.outcome_count += other.outcome_count;
        for (id, count) in other.podium_counts {
            *self.podium_counts.entry(id).or_insert(0) += count;
        }
        for (id, sum) in other.place_sums {
            *self.place_sums.entry(id).or_insert(0) += sum;
        }
        self
    }

    pub fn podium_percentage(&self, bracket_id: &str) -> f64 {
        percentage(
            self.podium_counts.get(bracket_id).copied().unwrap_or(0),
            self.outcome_count,
        )
    }

    pub fn avg_place(&self, bracket_id: &str) -> Option<f64> {
        let sum = *self.place_sums.get(bracket_id)?;
        Some(sum as f64 / self.outcome_count as f64)
    }
}

/// The full result of scoring every bracket against every enumerated
/// outcome: per-bracket aggregates plus the champion/finalist groupings
/// statistics needs for conditional analyses.
pub struct AnalyzerResult {
    pub total_outcomes: usize,
    pub processed_outcomes: usize,
    pub cancelled: bool,
    pub bracket_stats: HashMap<String, BracketAccumulator>,
    /// champion name -> group of outcomes that champion won.
    pub by_champion: HashMap<String, OutcomeGroup>,
    /// sorted `"TeamA|TeamB"` finalist pair -> group of outcomes with that
    /// exact championship matchup, further split by which of the two won.
    pub by_finalist_pair: HashMap<String, HashMap<String, OutcomeGroup>>,
}

struct OutcomeProcessed {
    champion: Option<String>,
    finalists: Option<(String, String)>,
    placements: Vec<(String, u32, usize)>,
}

/// Builds the hypothetical tournament state implied by `outcome`: every
/// committed winner and every projected future matchup overlaid onto a
/// clone of `state`. `state` itself is never mutated.
pub fn project_state(state: &TournamentState, outcome: &Outcome) -> TournamentState {
    let mut projected = state.clone();
    for (id, projection) in &outcome.projected_matchups {
        if let Some(matchup) = projected.graph.get_mut(*id) {
            if matchup.team_a.is_none() {
                matchup.team_a = projection.team_a.clone();
                matchup.team_a_seed = projection.team_a_seed;
            }
            if matchup.team_b.is_none() {
                matchup.team_b = projection.team_b.clone();
                matchup.team_b_seed = projection.team_b_seed;
            }
        }
    }
    for (id, winner) in &outcome.matchup_results {
        if let Some(matchup) = projected.graph.get_mut(*id) {
            matchup.winner = Some(winner.winner.clone());
            matchup.winner_seed = Some(winner.winner_seed);
        }
    }
    projected
}

/// Ranks `scores` with Olympic tie semantics: brackets tied for the top
/// score all receive position 1, and the next distinct score group starts
/// at `1 + (size of the tied group)`, never at 2.
pub fn rank_with_olympic_ties(mut scores: Vec<(String, u32)>) -> Vec<(String, u32, usize)> {
    scores.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut ranked = Vec::with_capacity(scores.len());
    let mut i = 0;
    while i < scores.len() {
        let mut j = i;
        while j < scores.len() && scores[j].1 == scores[i].1 {
            j += 1;
        }
        let place = i + 1;
        for (id, score) in &scores[i..j] {
            ranked.push((id.clone(), *score, place));
        }
        i = j;
    }
    ranked
}

fn finalist_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}|{b}")
    } else {
        format!("{b}|{a}")
    }
}

fn process_outcome(
    state: &TournamentState,
    brackets: &[Bracket],
    outcome: &Outcome,
    championship_id: MatchupId,
) -> OutcomeProcessed {
    let projected = project_state(state, outcome);
    let scores: Vec<(String, u32)> = brackets
        .iter()
        .map(|b| (b.id.clone(), score_projected(b, &projected)))
        .collect();
    let placements = rank_with_olympic_ties(scores);

    let champion = outcome
        .matchup_results
        .get(&championship_id)
        .map(|w| w.winner.clone());

    let finalists = projected.graph.get(championship_id).and_then(|m| {
        match (&m.team_a, &m.team_b) {
            (Some(a), Some(b)) => Some((a.clone(), b.clone())),
            _ => None,
        }
    });

    OutcomeProcessed {
        champion,
        finalists,
        placements,
    }
}

/// Scores every bracket against every outcome and reduces the results into
/// per-bracket aggregates and champion/finalist groupings.
///
/// `cancel`, when provided, is polled between outcome batches; if it ever
/// reads `true` the outcomes not yet processed are dropped and the result
/// is returned with `cancelled = true` and `processed_outcomes` short of
/// `total_outcomes`.
pub fn analyze_outcomes(
    state: &TournamentState,
    brackets: &[Bracket],
    outcomes: &[Outcome],
    championship_id: MatchupId,
    cancel: Option<&AtomicBool>,
) -> AnalyzerResult {
    let total_outcomes = outcomes.len();

    let processed: Vec<OutcomeProcessed> = outcomes
        .par_iter()
        .map(|outcome| {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                None
            } else {
                Some(process_outcome(state, brackets, outcome, championship_id))
            }
        })
        .while_some()
        .collect();

    let processed_outcomes = processed.len();
    let cancelled = processed_outcomes < total_outcomes;

    let (bracket_stats, by_champion, by_finalist_pair) = processed
        .into_par_iter()
        .fold(
            || {
                (
                    HashMap::<String, BracketAccumulator>::new(),
                    HashMap::<String, OutcomeGroup>::new(),
                    HashMap::<String, HashMap<String, OutcomeGroup>>::new(),
                )
            },
            |(mut bracket_stats, mut by_champion, mut by_finalist_pair), outcome| {
                for (id, score, place) in &outcome.placements {
                    bracket_stats
                        .entry(id.clone())
                        .or_insert_with(BracketAccumulator::new)
                        .record(*score, *place);
                }

                if let Some(champion) = &outcome.champion {
                    let group = by_champion.entry(champion.clone()).or_default();
                    for (id, _, place) in &outcome.placements {
                        group.record(id, *place);
                    }
                }

                if let (Some((a, b)), Some(champion)) = (&outcome.finalists, &outcome.champion) {
                    let pair_key = finalist_key(a, b);
                    let by_winner = by_finalist_pair.entry(pair_key).or_default();
                    let group = by_winner.entry(champion.clone()).or_default();
                    for (id, _, place) in &outcome.placements {
                        group.record(id, *place);
                    }
                }

                (bracket_stats, by_champion, by_finalist_pair)
            },
        )
        .reduce(
            || {
                (
                    HashMap::new(),
                    HashMap::new(),
                    HashMap::<String, HashMap<String, OutcomeGroup>>::new(),
                )
            },
            |mut a, b| {
                for (id, acc) in b.0 {
                    a.0.entry(id)
                        .and_modify(|existing| {
                            *existing = existing.clone().merge(acc.clone());
                        })
                        .or_insert(acc);
                }
                for (champion, group) in b.1 {
                    a.1.entry(champion)
                        .and_modify(|existing| *existing = existing.clone().merge(group.clone()))
                        .or_insert(group);
                }
                for (pair, winners) in b.2 {
                    let entry = a.2.entry(pair).or_default();
                    for (winner, group) in winners {
                        entry
                            .entry(winner)
                            .and_modify(|existing| *existing = existing.clone().merge(group.clone()))
                            .or_insert(group);
                    }
                }
                a
            },
        );

    AnalyzerResult {
        total_outcomes,
        processed_outcomes,
        cancelled,
        bracket_stats,
        by_champion,
        by_finalist_pair,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap as StdHashMap, HashSet};

    use tpa_core::matchup::{Matchup, MatchupId, Round};
    use tpa_core::state::ScoringConfig;
    use tpa_core::submission::MatchupPick;
    use tpa_core::team::Region;
    use tpa_core::{BracketGraph, TeamStatus};

    use super::*;

    fn champ_matchup() -> Matchup {
        Matchup {
            id: MatchupId(63),
            round: Round::CHAMPIONSHIP,
            region: None,
            team_a: Some("Duke".into()),
            team_a_seed: Some(1),
            team_b: Some("Houston".into()),
            team_b_seed: Some(1),
            winner: None,
            winner_seed: None,
            next_matchup_id: None,
            position: 0,
            score: None,
        }
    }

    fn bracket(id: &str, name: &str, pick: &str, seed: u8) -> Bracket {
        let mut picks = StdHashMap::new();
        picks.insert(
            MatchupId(63),
            MatchupPick {
                matchup_id: MatchupId(63),
                round: Round::CHAMPIONSHIP,
                winner: pick.to_string(),
                winner_seed: seed,
            },
        );
        Bracket {
            id: id.to_string(),
            participant_name: name.to_string(),
            entry_number: 1,
            user_email: format!("{name}@example.com"),
            picks,
            is_locked: true,
            score: 100,
            edit_token: "tok".into(),
        }
    }

    fn state() -> TournamentState {
        let mut teams = StdHashMap::new();
        teams.insert("Duke".to_string(), TeamStatus::alive(1));
        teams.insert("Houston".to_string(), TeamStatus::alive(1));
        TournamentState {
            year: 2026,
            graph: BracketGraph::new(vec![champ_matchup()]),
            teams,
            completed_rounds: HashSet::new(),
            scoring_config: ScoringConfig::default(),
            last_updated: "2026-03-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_olympic_tie_groups_share_position() {
        let scores = vec![
            ("a".to_string(), 10),
            ("b".to_string(), 10),
            ("c".to_string(), 8),
        ];
        let ranked = rank_with_olympic_ties(scores);
        let places: StdHashMap<_, _> = ranked.into_iter().map(|(id, _, p)| (id, p)).collect();
        assert_eq!(places["a"], 1);
        assert_eq!(places["b"], 1);
        assert_eq!(places["c"], 3);
    }

    #[test]
    fn test_two_team_residual_scores_duke_win_and_houston_win() {
        let state = state();
        let outcomes = crate::enumerator::enumerate(&state).unwrap();
        assert_eq!(outcomes.len(), 2);

        let brackets = vec![bracket("b1", "Ada", "Duke", 1), bracket("b2", "Grace", "Houston", 1)];
        let result = analyze_outcomes(&state, &brackets, &outcomes, MatchupId(63), None);

        assert_eq!(result.total_outcomes, 2);
        assert!(!result.cancelled);

        let b1 = &result.bracket_stats["b1"];
        assert_eq!(b1.min_score, 0);
        assert_eq!(b1.max_score, 32);
        assert_eq!(b1.win_percentage(), 50.0);
    }

    #[test]
    fn test_champion_groups_cover_each_active_team() {
        let state = state();
        let outcomes = crate::enumerator::enumerate(&state).unwrap();
        let brackets = vec![bracket("b1", "Ada", "Duke", 1)];
        let result = analyze_outcomes(&state, &brackets, &outcomes, MatchupId(63), None);

        assert!(result.by_champion.contains_key("Duke"));
        assert!(result.by_champion.contains_key("Houston"));
        assert_eq!(result.by_champion["Duke"].outcome_count, 1);
    }
}
