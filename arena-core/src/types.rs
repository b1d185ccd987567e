use std::collections::HashSet;

/// A policy eligible to be recommended as an opponent.
///
/// Constructed fresh per recommendation request from the candidate pool
/// provider; immutable within a request. `rating` is only used for
/// ordering/stratification — the engine never mutates it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Stable identifier, unique within a request (e.g. a W&B artifact path).
    pub identifier: String,
    /// Skill rating from past matches.
    pub rating: f64,
    /// Environment this policy was evaluated in.
    pub environment: String,
}

/// One bulk pairing-history record from the backend: the number of past
/// evaluation rounds in which `a` and `b` appeared together.
///
/// The backend may record counts in either direction (or split a pair across
/// both); `PairingHistoryIndex` accumulates them direction-agnostically.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairCount {
    pub a: String,
    pub b: String,
    pub count: i64,
}

/// Inputs to one opponent selection.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionRequest {
    /// Candidate pool, sorted descending by rating.
    pub candidates: Vec<Candidate>,
    /// Number of opponents to pick.
    pub target_count: usize,
    /// Identifiers that must never appear in the output.
    pub excluded: HashSet<String>,
    /// Identifiers treated as already selected for weighting purposes
    /// (e.g. the policy under evaluation). Never appear in the output.
    pub seed_identifiers: Vec<String>,
}

impl SelectionRequest {
    /// A request with no exclusions and no seeds.
    pub fn new(candidates: Vec<Candidate>, target_count: usize) -> Self {
        SelectionRequest {
            candidates,
            target_count,
            excluded: HashSet::new(),
            seed_identifiers: Vec::new(),
        }
    }
}

/// Per-candidate weight snapshot reported to the observer hook before each
/// diversity-mode pick.
#[derive(Debug, Clone)]
pub struct CandidateWeight {
    pub identifier: String,
    pub weight: f64,
}
