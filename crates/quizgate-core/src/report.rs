//! Attempt summaries with JSON persistence.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::AttemptRecord;
use crate::scoring::passed;

/// Aggregate view over a set of attempt records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptSummary {
    /// When the summary was computed.
    pub created_at: DateTime<Utc>,
    /// Pass mark used for `pass_rate`.
    pub pass_threshold: u8,
    pub total_attempts: usize,
    pub distinct_users: usize,
    /// Mean score over all attempts (0.0 when there are none).
    pub average_score: f64,
    /// Fraction of attempts at or above the pass mark.
    pub pass_rate: f64,
    /// Per-assessment statistics, ordered by title.
    pub per_assessment: Vec<AssessmentStats>,
}

/// Statistics for a single assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentStats {
    pub assessment_id: String,
    pub assessment_title: String,
    pub attempts: usize,
    pub average_score: f64,
    pub best_score: u8,
    pub passed: usize,
}

impl AttemptSummary {
    /// Summarize `records` against a pass mark.
    pub fn compute(records: &[AttemptRecord], pass_threshold: u8) -> Self {
        let total = records.len();
        let users: HashSet<&str> = records.iter().map(|r| r.user_id.as_str()).collect();
        let passes = records
            .iter()
            .filter(|r| passed(r.score, pass_threshold))
            .count();

        // Records carry a denormalized title, so group by (title, id) to
        // keep assessments that share a title apart.
        let mut grouped: BTreeMap<(String, String), Vec<&AttemptRecord>> = BTreeMap::new();
        for r in records {
            grouped
                .entry((r.assessment_title.clone(), r.assessment_id.clone()))
                .or_default()
                .push(r);
        }

        let per_assessment = grouped
            .into_iter()
            .map(|((title, id), group)| AssessmentStats {
                assessment_id: id,
                assessment_title: title,
                attempts: group.len(),
                average_score: mean(group.iter().map(|r| r.score)),
                best_score: group.iter().map(|r| r.score).max().unwrap_or(0),
                passed: group
                    .iter()
                    .filter(|r| passed(r.score, pass_threshold))
                    .count(),
            })
            .collect();

        Self {
            created_at: Utc::now(),
            pass_threshold,
            total_attempts: total,
            distinct_users: users.len(),
            average_score: mean(records.iter().map(|r| r.score)),
            pass_rate: if total == 0 {
                0.0
            } else {
                passes as f64 / total as f64
            },
            per_assessment,
        }
    }

    /// Save the summary as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize summary")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        Ok(())
    }

    /// Load a summary from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read summary from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse summary JSON")
    }
}

fn mean(scores: impl Iterator<Item = u8>) -> f64 {
    let (sum, n) = scores.fold((0u64, 0u64), |(s, n), x| (s + u64::from(x), n + 1));
    if n == 0 {
        0.0
    } else {
        sum as f64 / n as f64
    }
}
