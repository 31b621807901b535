//! TOML assessment definition parser.
//!
//! Loads assessments from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{AssessmentDefinition, Question};

/// Intermediate TOML structure for parsing assessment files.
#[derive(Debug, Deserialize)]
struct TomlAssessmentFile {
    assessment: TomlAssessmentHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlAssessmentHeader {
    id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    text: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct: usize,
}

/// Parse a single TOML file into an `AssessmentDefinition`.
pub fn parse_assessment(path: &Path) -> Result<AssessmentDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read assessment file: {}", path.display()))?;

    parse_assessment_str(&content, path)
}

/// Parse a TOML string into an `AssessmentDefinition` (useful for testing).
pub fn parse_assessment_str(content: &str, source_path: &Path) -> Result<AssessmentDefinition> {
    let parsed: TomlAssessmentFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            Question::new(q.text, q.options, q.correct).with_context(|| {
                format!("question {} in {}", i + 1, source_path.display())
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AssessmentDefinition::new(
        parsed.assessment.id,
        parsed.assessment.title,
        questions,
    ))
}

/// Recursively load all `.toml` assessment files from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_assessment_directory(dir: &Path) -> Result<Vec<AssessmentDefinition>> {
    let mut assessments = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            assessments.extend(load_assessment_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_assessment(&path) {
                Ok(assessment) => assessments.push(assessment),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(assessments)
}

/// Load a single file or a whole directory.
pub fn load_assessments(path: &Path) -> Result<Vec<AssessmentDefinition>> {
    if path.is_dir() {
        load_assessment_directory(path)
    } else {
        Ok(vec![parse_assessment(path)?])
    }
}

/// A warning from assessment validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The assessment ID.
    pub assessment_id: String,
    /// One-based question number (if applicable).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate an assessment for issues that parse cleanly but look wrong.
pub fn validate_definition(definition: &AssessmentDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let warn = |question: Option<usize>, message: String| ValidationWarning {
        assessment_id: definition.id.clone(),
        question,
        message,
    };

    if definition.title.trim().is_empty() {
        warnings.push(warn(None, "title is empty".into()));
    }

    if definition.questions.is_empty() {
        warnings.push(warn(
            None,
            "assessment has no questions and will finish immediately with 0%".into(),
        ));
    }

    for (i, q) in definition.questions.iter().enumerate() {
        let number = Some(i + 1);
        if q.text().trim().is_empty() {
            warnings.push(warn(number, "question text is empty".into()));
        }
        if q.options().len() == 1 {
            warnings.push(warn(number, "question has a single option".into()));
        }
        let mut seen = HashSet::new();
        for option in q.options() {
            if !seen.insert(option.trim()) {
                warnings.push(warn(number, format!("duplicate option: {option}")));
            }
        }
    }

    warnings
}

/// Validate a set of assessments, including ID collisions between them.
pub fn validate_all(definitions: &[AssessmentDefinition]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();
    for definition in definitions {
        if !seen_ids.insert(definition.id.as_str()) {
            warnings.push(ValidationWarning {
                assessment_id: definition.id.clone(),
                question: None,
                message: format!("duplicate assessment ID: {}", definition.id),
            });
        }
        warnings.extend(validate_definition(definition));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[assessment]
id = "ux-basics"
title = "UX Basics Quiz"

[[questions]]
text = "2+2=?"
options = ["3", "4", "5"]
correct = 1

[[questions]]
text = "Which of these is a wireframing tool?"
options = ["Figma", "Postgres"]
"#;

    #[test]
    fn parse_valid_toml() {
        let a = parse_assessment_str(VALID_TOML, &PathBuf::from("ux.toml")).unwrap();
        assert_eq!(a.id, "ux-basics");
        assert_eq!(a.title, "UX Basics Quiz");
        assert_eq!(a.question_count(), 2);
        assert_eq!(a.questions[0].correct(), 1);
        // `correct` defaults to the first option.
        assert_eq!(a.questions[1].correct(), 0);
        assert!(validate_definition(&a).is_empty());
    }

    #[test]
    fn parse_rejects_out_of_range_correct() {
        let toml = r#"
[assessment]
id = "bad"
title = "Bad"

[[questions]]
text = "pick"
options = ["a", "b"]
correct = 2
"#;
        let err = parse_assessment_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("question 1"), "got: {msg}");
        assert!(msg.contains("only 2 options"), "got: {msg}");
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_assessment_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_flags_suspicious_questions() {
        let toml = r#"
[assessment]
id = "odd"
title = "Odd"

[[questions]]
text = ""
options = ["yes"]

[[questions]]
text = "Twice?"
options = ["a", "a "]
"#;
        let a = parse_assessment_str(toml, &PathBuf::from("odd.toml")).unwrap();
        let warnings = validate_definition(&a);
        assert!(warnings.iter().any(|w| w.message.contains("text is empty")));
        assert!(warnings.iter().any(|w| w.message.contains("single option")));
        assert!(warnings
            .iter()
            .any(|w| w.question == Some(2) && w.message.contains("duplicate option")));
    }

    #[test]
    fn validate_empty_and_duplicate_ids() {
        let empty = AssessmentDefinition::new("same", "Empty", vec![]);
        let warnings = validate_all(&[empty.clone(), empty]);
        assert!(warnings.iter().any(|w| w.message.contains("no questions")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("duplicate assessment ID")));
    }

    #[test]
    fn load_directory_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ux.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "[assessment]\nid = 1").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let all = load_assessment_directory(dir.path()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "ux-basics");

        let single = load_assessments(&dir.path().join("ux.toml")).unwrap();
        assert_eq!(single.len(), 1);
    }
}
