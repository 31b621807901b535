//! The `quizgate list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Color, Table};

use quizgate_core::catalog::AttemptStatus;

pub fn execute(
    user: String,
    password: String,
    assessments: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let env = super::open_session(config.as_deref(), assessments, |_| Ok(()))?;
    let user = env.directory.sign_in(&user, &password)?;
    let entries = env.flow().catalog().entries_for(&user)?;

    if entries.is_empty() {
        println!("No assessments yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Questions", "Status", "Score", "Action"]);

    for entry in &entries {
        let status = match entry.status {
            AttemptStatus::Completed => Cell::new(entry.status).fg(Color::Green),
            AttemptStatus::Pending => Cell::new(entry.status).fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&entry.assessment_id),
            Cell::new(&entry.title),
            Cell::new(entry.question_count),
            status,
            Cell::new(entry.score.map(|s| format!("{s}%")).unwrap_or_else(|| "-".into())),
            Cell::new(entry.action),
        ]);
    }

    println!("Assessments for {} ({})", user.name, user.role);
    println!("{table}");
    Ok(())
}
