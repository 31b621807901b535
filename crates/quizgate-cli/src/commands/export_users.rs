//! The `quizgate export-users` command.

use std::path::PathBuf;

use anyhow::Result;

use quizgate_report::csv::{users_csv, write_csv};

pub fn execute(output: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let env = super::open_session(config.as_deref(), None, |_| Ok(()))?;
    let csv = users_csv(&env.directory.users()?);

    match output {
        Some(path) => {
            write_csv(&csv, &path)?;
            println!("Exported {}", path.display());
        }
        None => println!("{csv}"),
    }
    Ok(())
}
