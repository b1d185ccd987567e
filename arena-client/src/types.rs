/// Wire types for the Policy Arena backend.
///
/// Inputs mirror what `evalSessions:submit` expects; optional fields are
/// omitted from the JSON rather than sent as null.
use serde::{Deserialize, Serialize};

/// A policy taking part in an eval session. Auto-registered server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyInput {
    pub name: String,
    pub wandb_artifact: String,
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wandb_run_url: Option<String>,
}

/// One policy's result within a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResultInput {
    pub wandb_artifact: String,
    pub success: bool,
    pub episode_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_frames: Option<u32>,
}

/// One head-to-head round: every participating policy's result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundInput {
    pub round_index: u32,
    pub results: Vec<RoundResultInput>,
}

/// A full eval session, as read from a `submit` session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSessionInput {
    pub dataset_repo: String,
    pub policies: Vec<PolicyInput>,
    pub rounds: Vec<RoundInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One opponent candidate as returned by `policies:candidates` —
/// already filtered by environment and exclusions, sorted descending
/// by rating.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateRecord {
    pub wandb_artifact: String,
    pub rating: f64,
}

/// A leaderboard row from `policies:leaderboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub wandb_artifact: String,
    pub environment: String,
    pub rating: f64,
    pub num_rounds: u32,
}

/// A registered dataset from `datasets:list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub repo_id: String,
    pub name: String,
    pub task: String,
    pub source_type: String,
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wandb_artifact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_file_parses() {
        let raw = r#"{
            "dataset_repo": "ankile/blind-eval-pick-cube-2026-02-14",
            "policies": [
                {
                    "name": "dp-dagger-pick-cube-v3-with-auto",
                    "wandb_artifact": "self-improving/franka-pick-cube/ckpt_20000:v0",
                    "environment": "franka_pick_cube"
                }
            ],
            "rounds": [
                {
                    "round_index": 0,
                    "results": [
                        {
                            "wandb_artifact": "self-improving/franka-pick-cube/ckpt_20000:v0",
                            "success": true,
                            "episode_index": 1,
                            "num_frames": 312
                        }
                    ]
                }
            ]
        }"#;

        let session: EvalSessionInput = serde_json::from_str(raw).unwrap();
        assert_eq!(session.rounds.len(), 1);
        assert_eq!(session.rounds[0].results[0].num_frames, Some(312));
        assert!(session.notes.is_none());

        // Optional fields stay out of the serialized form entirely.
        let out = serde_json::to_string(&session).unwrap();
        assert!(!out.contains("notes"));
        assert!(!out.contains("wandb_run_url"));
    }
}
