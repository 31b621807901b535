//! The `quizgate validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizgate_core::parser::{load_assessments, validate_all};

pub fn execute(path: PathBuf) -> Result<()> {
    let definitions = load_assessments(&path)?;

    for definition in &definitions {
        println!(
            "Assessment: {} [{}] ({} questions)",
            definition.title,
            definition.id,
            definition.question_count()
        );
    }

    let warnings = validate_all(&definitions);
    for w in &warnings {
        let location = match w.question {
            Some(n) => format!("[{} q{n}]", w.assessment_id),
            None => format!("[{}]", w.assessment_id),
        };
        println!("  {location} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All assessments valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
