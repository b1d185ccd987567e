/// Recommendation facade: fetch, short-circuit, sample.
///
/// All IO happens here, up front; the sampling engine only ever sees plain
/// in-memory values. The engine never learns about environments — candidates
/// arrive already filtered by the backend.
use arena_core::{
    select_opponents, Candidate, CandidateWeight, PairingHistoryIndex, SelectionRequest,
};

use crate::client::ArenaClient;

/// Recommend opponents for the next evaluation round in `environment`.
///
/// `seed_identifiers` (typically the policy under evaluation) shape the
/// diversity weighting but are never returned; `excluded` artifacts are
/// dropped outright. When the pool is no bigger than `num_opponents` the
/// whole pool comes back without any sampling. When no pairing history
/// exists yet, selection falls back to rating-stratified sampling.
pub async fn recommend_opponents(
    client: &ArenaClient,
    environment: &str,
    num_opponents: usize,
    seed_identifiers: &[String],
    excluded: &[String],
    verbose: bool,
) -> Result<Vec<Candidate>, String> {
    // The backend filters exclusions and seeds out of the pool for us.
    let mut server_excluded: Vec<String> = excluded.to_vec();
    server_excluded.extend(seed_identifiers.iter().cloned());

    let records = client
        .candidate_policies(environment, &server_excluded)
        .await?;
    let pool: Vec<Candidate> = records
        .into_iter()
        .map(|r| Candidate {
            identifier: r.wandb_artifact,
            rating: r.rating,
            environment: environment.to_string(),
        })
        .collect();

    if verbose {
        eprintln!("Candidate pool: {} policies in {environment}", pool.len());
    }

    // Nothing to sample from — skip the pairing-history fetch entirely.
    if pool.len() <= num_opponents {
        return Ok(pool);
    }

    let counts = client.pair_counts(environment).await?;
    let history = PairingHistoryIndex::from_counts(&counts);

    if verbose {
        if history.is_empty() {
            eprintln!("No pairing history yet; using rating-stratified sampling");
        } else {
            eprintln!(
                "Pairing history: {} records; using diversity-weighted sampling",
                counts.len()
            );
        }
    }

    let mut request = SelectionRequest::new(pool, num_opponents);
    request.excluded = excluded.iter().cloned().collect();
    request.seed_identifiers = seed_identifiers.to_vec();

    let mut print_weights = |weights: &[CandidateWeight]| {
        eprintln!("  pick weights:");
        for w in weights {
            eprintln!("    {:<60} {:.4}", w.identifier, w.weight);
        }
    };
    let observer: Option<&mut dyn FnMut(&[CandidateWeight])> = if verbose {
        Some(&mut print_weights)
    } else {
        None
    };

    let mut rng = rand::rng();
    let history_ref = if history.is_empty() { None } else { Some(&history) };
    Ok(select_opponents(&request, history_ref, &mut rng, observer))
}
