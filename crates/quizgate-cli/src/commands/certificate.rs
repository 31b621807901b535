//! The `quizgate certificate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use quizgate_core::model::Role;
use quizgate_report::certificate::Certificate;

pub fn execute(
    email: String,
    course: Option<String>,
    issued_on: Option<String>,
    output: PathBuf,
    config: Option<PathBuf>,
) -> Result<()> {
    let issued_on = match issued_on {
        Some(date) => NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("invalid --issued-on date: {date}"))?,
        None => chrono::Utc::now().date_naive(),
    };

    let env = super::open_session(config.as_deref(), None, |_| Ok(()))?;
    let Some(student) = env.directory.find_by_email(email.trim())? else {
        anyhow::bail!("User not found: {email}");
    };
    if student.role != Role::Student {
        anyhow::bail!(
            "certificates are issued to students only ({} is {})",
            student.email,
            student.role
        );
    }

    let certificate = Certificate::new(&student.name, course, issued_on);
    certificate.write(&output)?;
    tracing::info!(user = %student.id, "certificate issued");
    println!(
        "Certificate for {} written to {}",
        student.name,
        output.display()
    );
    Ok(())
}
