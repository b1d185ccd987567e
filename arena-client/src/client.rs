/// HTTP client for the Policy Arena backend.
///
/// The backend exposes named query/mutation functions behind a Convex-style
/// HTTP API: `POST {deployment}/api/query` and `POST {deployment}/api/mutation`
/// with a `{path, args, format}` body and a `{status, value | errorMessage}`
/// envelope in the response.
///
/// Returns Err only on HTTP/network failures or backend-reported errors;
/// retry policy belongs to the caller.
use arena_core::PairCount;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::types::{CandidateRecord, DatasetRecord, EvalSessionInput, LeaderboardEntry};

pub struct ArenaClient {
    http: Client,
    deployment_url: String,
}

#[derive(Debug, Deserialize)]
struct FunctionResponse {
    status: String,
    value: Option<serde_json::Value>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

impl ArenaClient {
    pub fn new(deployment_url: impl Into<String>) -> Self {
        ArenaClient {
            http: Client::new(),
            deployment_url: deployment_url.into(),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
        args: serde_json::Value,
    ) -> Result<T, String> {
        let url = format!("{}/api/{endpoint}", self.deployment_url.trim_end_matches('/'));
        let body = json!({ "path": path, "args": args, "format": "json" });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(format!(
                "Arena backend returned {status}: {}",
                &text[..text.len().min(200)]
            ));
        }

        let data: FunctionResponse = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse backend response JSON: {e}"))?;

        if data.status != "success" {
            return Err(data
                .error_message
                .unwrap_or_else(|| format!("{path} failed with no error message")));
        }

        serde_json::from_value(data.value.unwrap_or(serde_json::Value::Null))
            .map_err(|e| format!("Unexpected response shape from {path}: {e}"))
    }

    async fn query<T: DeserializeOwned>(
        &self,
        path: &str,
        args: serde_json::Value,
    ) -> Result<T, String> {
        self.call("query", path, args).await
    }

    async fn mutation<T: DeserializeOwned>(
        &self,
        path: &str,
        args: serde_json::Value,
    ) -> Result<T, String> {
        self.call("mutation", path, args).await
    }

    /// Opponent candidates for an environment, sorted descending by rating,
    /// with `excluded` artifacts already removed server-side.
    pub async fn candidate_policies(
        &self,
        environment: &str,
        excluded: &[String],
    ) -> Result<Vec<CandidateRecord>, String> {
        self.query(
            "policies:candidates",
            json!({ "environment": environment, "excluded": excluded }),
        )
        .await
    }

    /// Bulk pairing counts for an environment. Entries may be keyed in either
    /// direction; `PairingHistoryIndex::from_counts` handles that.
    pub async fn pair_counts(&self, environment: &str) -> Result<Vec<PairCount>, String> {
        self.query("evalSessions:pairCounts", json!({ "environment": environment }))
            .await
    }

    /// Submit evaluation results. Policies are auto-registered.
    /// Returns the new session id.
    pub async fn submit_eval_session(&self, session: &EvalSessionInput) -> Result<String, String> {
        let args = serde_json::to_value(session)
            .map_err(|e| format!("Failed to serialize session: {e}"))?;
        self.mutation("evalSessions:submit", args).await
    }

    /// Current leaderboard across all policies.
    pub async fn get_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, String> {
        self.query("policies:leaderboard", json!({})).await
    }

    /// Registered datasets, optionally filtered by task and source types.
    pub async fn list_datasets(
        &self,
        task: Option<&str>,
        source_types: Option<&[String]>,
    ) -> Result<Vec<DatasetRecord>, String> {
        let mut args = serde_json::Map::new();
        if let Some(task) = task {
            args.insert("task".to_string(), json!(task));
        }
        if let Some(sources) = source_types {
            args.insert("source_types".to_string(), json!(sources));
        }
        self.query("datasets:list", serde_json::Value::Object(args))
            .await
    }
}
