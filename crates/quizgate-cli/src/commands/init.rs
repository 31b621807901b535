//! The `quizgate init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizgate.toml").exists() {
        println!("quizgate.toml already exists, skipping.");
    } else {
        std::fs::write("quizgate.toml", SAMPLE_CONFIG)?;
        println!("Created quizgate.toml");
    }

    std::fs::create_dir_all("assessments")?;
    let example_path = std::path::Path::new("assessments/example.toml");
    if example_path.exists() {
        println!("assessments/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ASSESSMENT)?;
        println!("Created assessments/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizgate.toml to add accounts");
    println!("  2. Run: quizgate validate --assessments assessments");
    println!("  3. Run: quizgate take --assessment example --user student@lms.com --password student --steps \"select:1,next,select:0,next\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizgate configuration

# How answers given after going back are scored: "cumulative" or "last-answer"
scoring_mode = "cumulative"
pass_threshold = 50
permission_timeout_ms = 30000
assessment_paths = ["assessments"]

# String values may reference environment variables, e.g. "${QUIZGATE_ADMIN_PASSWORD}"
[[users]]
name = "Administrator"
email = "admin@lms.com"
password = "admin"
role = "admin"

[[users]]
name = "Student One"
email = "student@lms.com"
password = "student"
role = "student"

[[assessments]]
id = "a_uxbasics"
title = "UX Basics Quiz"

[[assessments.questions]]
text = "2+2=?"
options = ["3", "4", "5"]
correct = 1
"#;

const EXAMPLE_ASSESSMENT: &str = r#"[assessment]
id = "example"
title = "Example Assessment"

[[questions]]
text = "Which HTML element holds the page title shown in the browser tab?"
options = ["<header>", "<title>", "<h1>"]
correct = 1

[[questions]]
text = "Which CSS property changes text color?"
options = ["color", "font-color", "text-style"]
correct = 0
"#;
