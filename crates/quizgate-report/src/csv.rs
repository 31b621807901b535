//! CSV export.
//!
//! Every cell is wrapped in double quotes with embedded quotes doubled, and
//! rows are joined with `\n`.

use std::path::Path;

use anyhow::{Context, Result};

use quizgate_core::model::{AttemptRecord, User};

/// Quote one cell.
fn cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn render(rows: impl IntoIterator<Item = Vec<String>>) -> String {
    rows.into_iter()
        .map(|row| row.iter().map(|c| cell(c)).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Users as `Name,Email,Role,Active,CreatedAt`.
pub fn users_csv(users: &[User]) -> String {
    let header = ["Name", "Email", "Role", "Active", "CreatedAt"]
        .map(String::from)
        .to_vec();
    let rows = users.iter().map(|u| {
        vec![
            u.name.clone(),
            u.email.clone(),
            u.role.to_string(),
            if u.active { "Yes" } else { "No" }.to_string(),
            u.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ]
    });
    render(std::iter::once(header).chain(rows))
}

/// Attempts as `Assessment,User,Score,TakenAt`, in store order.
pub fn attempts_csv(records: &[AttemptRecord]) -> String {
    let header = ["Assessment", "User", "Score", "TakenAt"]
        .map(String::from)
        .to_vec();
    let rows = records.iter().map(|r| {
        vec![
            r.assessment_title.clone(),
            r.user_name.clone(),
            r.score.to_string(),
            r.taken_at.to_rfc3339(),
        ]
    });
    render(std::iter::once(header).chain(rows))
}

/// Write CSV text to a file, creating parent directories.
pub fn write_csv(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write CSV to {}", path.display()))?;
    Ok(())
}
