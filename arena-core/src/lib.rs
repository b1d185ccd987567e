/// arena-core: Pure-computation opponent recommendation engine.
///
/// Candidate pool + pairing history → a diverse, well-balanced opponent
/// selection. No IO, no HTTP, no filesystem — just sampling. The client
/// crate fetches everything up front and passes plain in-memory values in.
///
/// Two strategies: diversity-weighted sampling when pairing history is
/// available, rating-stratified sampling when it is not. The random source
/// is injected so tests can seed it and assert exact distributions.
///
/// # Quick start
///
/// ```rust
/// use arena_core::{select_opponents, Candidate, PairingHistoryIndex, SelectionRequest};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let candidates = vec![
///     Candidate { identifier: "pi0-ckpt-75k:v0".into(), rating: 1.8, environment: "franka_pick_cube".into() },
///     Candidate { identifier: "dp-ckpt-25k:v1".into(), rating: 1.1, environment: "franka_pick_cube".into() },
///     Candidate { identifier: "dp-bc-v2:v3".into(), rating: 0.4, environment: "franka_pick_cube".into() },
/// ];
///
/// let mut history = PairingHistoryIndex::new();
/// history.record("pi0-ckpt-75k:v0", "dp-ckpt-25k:v1", 4);
///
/// let mut request = SelectionRequest::new(candidates, 2);
/// request.seed_identifiers = vec!["pi0-ckpt-75k:v0".into()];
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let opponents = select_opponents(&request, Some(&history), &mut rng, None);
/// assert_eq!(opponents.len(), 2);
/// ```

pub mod constants;
pub mod history;
pub mod sampling;
pub mod types;

// Re-export primary public API at crate root.
pub use constants::DEFAULT_NUM_OPPONENTS;
pub use history::PairingHistoryIndex;
pub use sampling::select_opponents;
pub use types::{Candidate, CandidateWeight, PairCount, SelectionRequest};
