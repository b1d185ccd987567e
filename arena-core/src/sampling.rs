/// Opponent selection strategies.
///
/// Two strategies behind one entry point:
///   - Diversity-weighted (pairing history available): weighted sampling
///     without replacement, down-weighting candidates by how often they have
///     already been matched against the current selection.
///   - Rating-stratified (no history): uniform picks spread across the
///     rating-ordered pool so a brand-new environment still gets opponents
///     from the whole skill distribution.
///
/// The random source is injected so callers can seed it and assert exact
/// selection distributions.
use std::ops::Range;

use rand::Rng;

use crate::constants::WEIGHT_EPSILON;
use crate::history::PairingHistoryIndex;
use crate::types::{Candidate, CandidateWeight, SelectionRequest};

/// Select opponents for an evaluation round.
///
/// Candidates whose identifier is excluded or seeded never enter the pool.
/// `target_count == 0` yields an empty result; a pool no larger than
/// `target_count` is returned whole without sampling (order not meaningful).
/// With `history = Some(_)` the diversity-weighted strategy runs, otherwise
/// the rating-stratified one.
///
/// `observer`, when set, receives the per-candidate weights of the remaining
/// pool before each diversity-mode pick.
pub fn select_opponents<R: Rng>(
    request: &SelectionRequest,
    history: Option<&PairingHistoryIndex>,
    rng: &mut R,
    observer: Option<&mut dyn FnMut(&[CandidateWeight])>,
) -> Vec<Candidate> {
    let eligible: Vec<&Candidate> = request
        .candidates
        .iter()
        .filter(|c| {
            !request.excluded.contains(&c.identifier)
                && !request.seed_identifiers.iter().any(|s| *s == c.identifier)
        })
        .collect();

    if request.target_count == 0 {
        return Vec::new();
    }
    if eligible.len() <= request.target_count {
        return eligible.into_iter().cloned().collect();
    }

    match history {
        Some(index) => diversity_weighted(
            &eligible,
            request.target_count,
            &request.seed_identifiers,
            index,
            rng,
            observer,
        ),
        None => rating_stratified(&eligible, request.target_count, rng),
    }
}

/// Weighted sampling without replacement: at each step a candidate's weight
/// is 1 / (1 + total co-occurrences with everything selected so far,
/// seeds included), and the pick probability is weight / sum of weights.
fn diversity_weighted(
    pool: &[&Candidate],
    target_count: usize,
    seeds: &[String],
    history: &PairingHistoryIndex,
    rng: &mut impl Rng,
    mut observer: Option<&mut dyn FnMut(&[CandidateWeight])>,
) -> Vec<Candidate> {
    let mut remaining: Vec<&Candidate> = pool.to_vec();
    let mut selected_identifiers: Vec<String> = seeds.to_vec();
    let mut selected: Vec<Candidate> = Vec::with_capacity(target_count);

    while selected.len() < target_count && !remaining.is_empty() {
        // Denominator is always >= 1, so weights stay in (0, 1].
        let weights: Vec<f64> = remaining
            .iter()
            .map(|c| {
                let exposure: u64 = selected_identifiers
                    .iter()
                    .map(|s| history.count(&c.identifier, s))
                    .sum();
                1.0 / (1.0 + exposure as f64)
            })
            .collect();

        if let Some(hook) = observer.as_mut() {
            let snapshot: Vec<CandidateWeight> = remaining
                .iter()
                .zip(&weights)
                .map(|(c, &weight)| CandidateWeight {
                    identifier: c.identifier.clone(),
                    weight,
                })
                .collect();
            hook(&snapshot);
        }

        let total_weight: f64 = weights.iter().sum();
        let pick = weighted_random_select(&weights, total_weight, rng);
        let candidate = remaining.remove(pick);
        selected_identifiers.push(candidate.identifier.clone());
        selected.push(candidate.clone());
    }

    selected
}

/// Stratified sampling over the rating-ordered pool: one uniform pick from
/// the top third, one from the bottom third, then the middle until the target
/// is reached, then whatever is left. On tiny pools the segments may overlap;
/// the picked mask keeps every identifier unique.
fn rating_stratified(
    pool: &[&Candidate],
    target_count: usize,
    rng: &mut impl Rng,
) -> Vec<Candidate> {
    let pool_size = pool.len();
    let segment_size = (pool_size / 3).max(1);

    let mut picked = vec![false; pool_size];
    let mut selected: Vec<Candidate> = Vec::with_capacity(target_count);

    if let Some(i) = pick_uniform(0..segment_size, &picked, rng) {
        picked[i] = true;
        selected.push(pool[i].clone());
    }

    if selected.len() < target_count {
        if let Some(i) = pick_uniform(pool_size - segment_size..pool_size, &picked, rng) {
            picked[i] = true;
            selected.push(pool[i].clone());
        }
    }

    while selected.len() < target_count {
        match pick_uniform(segment_size..pool_size - segment_size, &picked, rng) {
            Some(i) => {
                picked[i] = true;
                selected.push(pool[i].clone());
            }
            None => break,
        }
    }

    // Small pools: the segments alone cannot fill the target.
    while selected.len() < target_count {
        match pick_uniform(0..pool_size, &picked, rng) {
            Some(i) => {
                picked[i] = true;
                selected.push(pool[i].clone());
            }
            None => break,
        }
    }

    selected
}

/// Uniform pick of a not-yet-picked index within `range`.
/// An empty or exhausted range yields None.
fn pick_uniform(range: Range<usize>, picked: &[bool], rng: &mut impl Rng) -> Option<usize> {
    let open: Vec<usize> = range.filter(|&i| !picked[i]).collect();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.random_range(0..open.len())])
}

fn weighted_random_select(weights: &[f64], total_weight: f64, rng: &mut impl Rng) -> usize {
    let mut r = rng.random::<f64>() * total_weight;
    for (j, &w) in weights.iter().enumerate() {
        r -= w;
        if r < WEIGHT_EPSILON {
            return j;
        }
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn make_pool(identifiers: &[&str]) -> Vec<Candidate> {
        // Ratings descend with position, matching the provider contract.
        identifiers
            .iter()
            .enumerate()
            .map(|(i, id)| Candidate {
                identifier: id.to_string(),
                rating: 100.0 - i as f64,
                environment: "franka_pick_cube".to_string(),
            })
            .collect()
    }

    fn ids(selection: &[Candidate]) -> Vec<String> {
        selection.iter().map(|c| c.identifier.clone()).collect()
    }

    #[test]
    fn test_target_zero_returns_empty() {
        let request = SelectionRequest::new(make_pool(&["a", "b", "c"]), 0);
        let mut rng = StdRng::seed_from_u64(1);
        let history = PairingHistoryIndex::new();

        assert!(select_opponents(&request, Some(&history), &mut rng, None).is_empty());
        assert!(select_opponents(&request, None, &mut rng, None).is_empty());
    }

    #[test]
    fn test_target_at_least_pool_returns_entire_pool() {
        let request = SelectionRequest::new(make_pool(&["a", "b", "c", "d", "e"]), 5);
        let mut rng = StdRng::seed_from_u64(2);

        let result = select_opponents(&request, None, &mut rng, None);
        let got: HashSet<String> = ids(&result).into_iter().collect();
        let want: HashSet<String> =
            ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn test_empty_pool_returns_empty() {
        let request = SelectionRequest::new(Vec::new(), 3);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(select_opponents(&request, None, &mut rng, None).is_empty());
    }

    #[test]
    fn test_excluded_never_selected() {
        let mut request = SelectionRequest::new(make_pool(&["a", "b", "c", "d", "e", "f"]), 3);
        request.excluded = ["b".to_string(), "e".to_string()].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..200 {
            let result = select_opponents(&request, None, &mut rng, None);
            for c in &result {
                assert!(!request.excluded.contains(&c.identifier));
            }
            // 4 eligible candidates, target 3.
            assert_eq!(result.len(), 3);
        }
    }

    #[test]
    fn test_seeds_never_selected_but_shape_pool() {
        let mut request = SelectionRequest::new(make_pool(&["a", "b", "c", "d"]), 2);
        request.seed_identifiers = vec!["a".to_string()];
        let history = PairingHistoryIndex::new();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..200 {
            let result = select_opponents(&request, Some(&history), &mut rng, None);
            assert_eq!(result.len(), 2);
            for c in &result {
                assert_ne!(c.identifier, "a");
            }
        }
    }

    #[test]
    fn test_no_duplicates_and_size_bound() {
        let request = SelectionRequest::new(
            make_pool(&["a", "b", "c", "d", "e", "f", "g", "h"]),
            5,
        );
        let mut history = PairingHistoryIndex::new();
        history.record("a", "b", 4);
        history.record("c", "d", 2);
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..200 {
            let result = select_opponents(&request, Some(&history), &mut rng, None);
            assert_eq!(result.len(), 5);
            let unique: HashSet<String> = ids(&result).into_iter().collect();
            assert_eq!(unique.len(), 5);
        }
    }

    #[test]
    fn test_stratified_covers_top_and_bottom_thirds() {
        // Pool of 6, target 2: segment_size = 2, so the pick must contain
        // exactly one of the first two and one of the last two.
        let request = SelectionRequest::new(make_pool(&["a", "b", "c", "d", "e", "f"]), 2);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..300 {
            let result = select_opponents(&request, None, &mut rng, None);
            assert_eq!(result.len(), 2);
            let got = ids(&result);
            assert!(got[0] == "a" || got[0] == "b", "first pick from top: {got:?}");
            assert!(got[1] == "e" || got[1] == "f", "second pick from bottom: {got:?}");
        }
    }

    #[test]
    fn test_stratified_fills_from_middle_then_anywhere() {
        // Pool of 7, target 5: top pick, bottom pick, middle has 3 — exactly
        // enough, nothing left over for the free-for-all fill.
        let request = SelectionRequest::new(make_pool(&["a", "b", "c", "d", "e", "f", "g"]), 5);
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..100 {
            let result = select_opponents(&request, None, &mut rng, None);
            assert_eq!(result.len(), 5);
            let got: HashSet<String> = ids(&result).into_iter().collect();
            assert_eq!(got.len(), 5);
            // Middle segment (c, d, e) is fully consumed.
            for id in ["c", "d", "e"] {
                assert!(got.contains(id), "middle candidate {id} missing: {got:?}");
            }
        }
    }

    #[test]
    fn test_stratified_tiny_pool_overlapping_segments() {
        // Pool of 2, target 1... would short-circuit; use pool 4 target 3 so
        // sampling actually runs with overlapping-ish segments.
        let request = SelectionRequest::new(make_pool(&["a", "b", "c", "d"]), 3);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..100 {
            let result = select_opponents(&request, None, &mut rng, None);
            assert_eq!(result.len(), 3);
            let got: HashSet<String> = ids(&result).into_iter().collect();
            assert_eq!(got.len(), 3);
        }
    }

    #[test]
    fn test_diversity_weight_law() {
        // Pool [A, B, C], count(A, B) = 5, seed A, one pick.
        // weight(B) = 1/6, weight(C) = 1, so P(C) = 1 / (1 + 1/6) = 6/7.
        let mut request = SelectionRequest::new(make_pool(&["a", "b", "c"]), 1);
        request.seed_identifiers = vec!["a".to_string()];
        let mut history = PairingHistoryIndex::new();
        history.record("a", "b", 5);

        let mut rng = StdRng::seed_from_u64(10);
        let trials = 20_000;
        let mut picked_c = 0usize;
        for _ in 0..trials {
            let result = select_opponents(&request, Some(&history), &mut rng, None);
            assert_eq!(result.len(), 1);
            if result[0].identifier == "c" {
                picked_c += 1;
            }
        }

        let observed = picked_c as f64 / trials as f64;
        let expected = 6.0 / 7.0;
        // Binomial std-dev at n=20k is ~0.0025; 0.02 is an 8-sigma band.
        assert!(
            (observed - expected).abs() < 0.02,
            "P(pick C) = {observed:.4}, expected {expected:.4}"
        );
    }

    #[test]
    fn test_diversity_weighting_updates_after_each_pick() {
        // Saturated pairs on both the seed and a pool candidate: invariants
        // must hold across full 3-pick runs either way.
        let mut request = SelectionRequest::new(make_pool(&["b", "c", "d", "e", "f"]), 3);
        request.seed_identifiers = vec!["a".to_string()];
        let mut history = PairingHistoryIndex::new();
        history.record("a", "b", 10);
        history.record("d", "c", 10);

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let result = select_opponents(&request, Some(&history), &mut rng, None);
            assert_eq!(result.len(), 3);
            let unique: HashSet<String> = ids(&result).into_iter().collect();
            assert_eq!(unique.len(), 3);
            assert!(!unique.contains("a"));
        }
    }

    #[test]
    fn test_observer_reports_weights_before_each_pick() {
        let mut request = SelectionRequest::new(make_pool(&["a", "b", "c"]), 1);
        request.seed_identifiers = vec!["a".to_string()];
        let mut history = PairingHistoryIndex::new();
        history.record("a", "b", 5);

        let mut snapshots: Vec<Vec<CandidateWeight>> = Vec::new();
        let mut hook = |weights: &[CandidateWeight]| snapshots.push(weights.to_vec());

        let mut rng = StdRng::seed_from_u64(12);
        let result = select_opponents(&request, Some(&history), &mut rng, Some(&mut hook));
        assert_eq!(result.len(), 1);

        assert_eq!(snapshots.len(), 1);
        let first = &snapshots[0];
        assert_eq!(first.len(), 2);
        let weight_of = |id: &str| {
            first
                .iter()
                .find(|w| w.identifier == id)
                .map(|w| w.weight)
                .unwrap()
        };
        assert!((weight_of("b") - 1.0 / 6.0).abs() < 1e-12);
        assert!((weight_of("c") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_when_no_exposure() {
        // With no recorded exposure every weight is 1 and the draw is uniform.
        let request = SelectionRequest::new(make_pool(&["a", "b", "c", "d"]), 1);
        let history = PairingHistoryIndex::new();

        let mut rng = StdRng::seed_from_u64(13);
        let trials = 20_000;
        let mut counts = std::collections::HashMap::new();
        for _ in 0..trials {
            let result = select_opponents(&request, Some(&history), &mut rng, None);
            *counts.entry(result[0].identifier.clone()).or_insert(0usize) += 1;
        }

        for id in ["a", "b", "c", "d"] {
            let freq = counts[id] as f64 / trials as f64;
            assert!((freq - 0.25).abs() < 0.02, "P({id}) = {freq:.4}");
        }
    }
}
