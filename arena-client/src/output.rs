/// Output formatting: terminal tables and JSON.
use arena_core::Candidate;
use serde::Serialize;

use crate::types::{DatasetRecord, LeaderboardEntry};

#[derive(Serialize)]
struct JsonOpponent {
    wandb_artifact: String,
    rating: f64,
    environment: String,
}

/// Print recommended opponents as a formatted terminal table.
pub fn print_opponents_table(opponents: &[Candidate]) {
    if opponents.is_empty() {
        println!("No eligible opponents.");
        return;
    }

    let artifact_width = opponents
        .iter()
        .map(|c| c.identifier.len())
        .max()
        .unwrap_or(8)
        .max(8); // at least "Artifact"

    println!(" # | {:<artifact_width$} |  Rating", "Artifact");
    println!("---|-{}-|--------", "-".repeat(artifact_width));

    for (i, c) in opponents.iter().enumerate() {
        println!("{:>2} | {:<artifact_width$} | {:>7.3}", i + 1, c.identifier, c.rating);
    }

    println!("\n{} opponents recommended", opponents.len());
}

/// Print recommended opponents as JSON.
pub fn print_opponents_json(opponents: &[Candidate]) {
    let rows: Vec<JsonOpponent> = opponents
        .iter()
        .map(|c| JsonOpponent {
            wandb_artifact: c.identifier.clone(),
            rating: c.rating,
            environment: c.environment.clone(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows).unwrap());
}

/// Print the leaderboard as a formatted terminal table.
pub fn print_leaderboard_table(entries: &[LeaderboardEntry]) {
    if entries.is_empty() {
        println!("No policies on the leaderboard yet.");
        return;
    }

    let name_width = entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(6)
        .max(6); // at least "Policy"

    println!(" # | {:<name_width$} |  Rating | Rounds | Environment", "Policy");
    println!("---|-{}-|---------|--------|------------", "-".repeat(name_width));

    for (i, e) in entries.iter().enumerate() {
        println!(
            "{:>2} | {:<name_width$} | {:>7.3} | {:>6} | {}",
            i + 1, e.name, e.rating, e.num_rounds, e.environment,
        );
    }
}

/// Print the leaderboard as JSON.
pub fn print_leaderboard_json(entries: &[LeaderboardEntry]) {
    println!("{}", serde_json::to_string_pretty(entries).unwrap());
}

/// Print dataset repo ids, one per line (pipe-friendly).
pub fn print_dataset_repos(datasets: &[DatasetRecord]) {
    for d in datasets {
        println!("{}", d.repo_id);
    }
}

/// Print datasets as JSON.
pub fn print_datasets_json(datasets: &[DatasetRecord]) {
    println!("{}", serde_json::to_string_pretty(datasets).unwrap());
}
