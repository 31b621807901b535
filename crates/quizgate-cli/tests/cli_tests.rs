//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizgate() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizgate").unwrap();
    cmd.env_remove("QUIZGATE_SCORING_MODE");
    cmd
}

fn take(assessment: &str, steps: &str) -> Command {
    let mut cmd = quizgate();
    cmd.args([
        "take",
        "--assessment",
        assessment,
        "--user",
        "student@lms.com",
        "--password",
        "student",
        "--steps",
        steps,
    ]);
    cmd
}

#[test]
fn validate_single_file() {
    quizgate()
        .arg("validate")
        .arg("--assessments")
        .arg("../../assessments/ux-fundamentals.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("UX Fundamentals"))
        .stdout(predicate::str::contains("3 questions"))
        .stdout(predicate::str::contains("All assessments valid"));
}

#[test]
fn validate_directory() {
    quizgate()
        .arg("validate")
        .arg("--assessments")
        .arg("../../assessments")
        .assert()
        .success()
        .stdout(predicate::str::contains("UX Fundamentals"))
        .stdout(predicate::str::contains("Frontend Basics"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "[assessment]\nid = \"empty\"\ntitle = \"Empty\"\n").unwrap();

    quizgate()
        .arg("validate")
        .arg("--assessments")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no questions"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    quizgate()
        .arg("validate")
        .arg("--assessments")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizgate()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizgate.toml"))
        .stdout(predicate::str::contains("Created assessments/example.toml"));

    assert!(dir.path().join("quizgate.toml").exists());
    assert!(dir.path().join("assessments/example.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizgate().current_dir(dir.path()).arg("init").assert().success();

    quizgate()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_then_take_example() {
    let dir = TempDir::new().unwrap();
    quizgate().current_dir(dir.path()).arg("init").assert().success();

    take("example", "select:1,next,select:0,next")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 2 of 2"))
        .stdout(predicate::str::contains("Score: 100%"));
}

#[test]
fn take_default_quiz_correct() {
    take("UX Basics Quiz", "select:1,next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 1: 2+2=?"))
        .stdout(predicate::str::contains("Score: 100% (passed"))
        .stderr(predicate::str::contains("Finished"));
}

#[test]
fn take_default_quiz_wrong() {
    take("a_uxbasics", "select:0,next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0% (not passed"));
}

#[test]
fn take_json_output() {
    take("a_uxbasics", "select:1,next")
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"assessmentTitle\": \"UX Basics Quiz\""))
        .stdout(predicate::str::contains("\"score\": 100"))
        .stdout(predicate::str::contains("\"takenAt\""));
}

#[test]
fn take_csv_output() {
    take("a_uxbasics", "select:1,next")
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            r#""Assessment","User","Score","TakenAt""#,
        ))
        .stdout(predicate::str::contains(r#""UX Basics Quiz","Student One","100""#));
}

#[test]
fn take_rejects_unknown_format() {
    take("a_uxbasics", "select:1,next")
        .args(["--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn next_without_selection_is_prompted() {
    take("a_uxbasics", "next,select:1,next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Select an answer"))
        .stdout(predicate::str::contains("Score: 100%"));
}

#[test]
fn revisit_counts_twice_by_default() {
    take("ux-fundamentals", "select:0,next,prev,select:0,next,select:0,next,select:0,next")
        .args(["--assessments", "../../assessments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 67%"));
}

#[test]
fn revisit_with_last_answer_scoring() {
    take("ux-fundamentals", "select:0,next,prev,select:0,next,select:0,next,select:0,next")
        .args(["--assessments", "../../assessments", "--scoring", "last-answer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 33%"));
}

#[test]
fn take_with_denied_camera() {
    take("a_uxbasics", "select:1,next")
        .arg("--deny-camera")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Camera permission required to start assessment",
        ))
        .stderr(predicate::str::contains("Error: cannot start"));
}

#[test]
fn take_unknown_assessment() {
    take("History", "next")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Assessment not found"));
}

#[test]
fn take_with_wrong_password() {
    quizgate()
        .args([
            "take",
            "--assessment",
            "a_uxbasics",
            "--user",
            "student@lms.com",
            "--password",
            "nope",
            "--steps",
            "select:1,next",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));
}

#[test]
fn take_abort_records_nothing() {
    take("a_uxbasics", "select:1,abort")
        .assert()
        .success()
        .stdout(predicate::str::contains("no attempt recorded"))
        .stderr(predicate::str::contains("Assessment closed"));
}

#[test]
fn take_unfinished_script_fails() {
    take("ux-fundamentals", "select:0,next")
        .args(["--assessments", "../../assessments"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no attempt recorded"));
}

#[test]
fn take_bad_step_is_an_error() {
    take("a_uxbasics", "select:1,jump")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown step: jump"));
}

#[test]
fn take_writes_html_report() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.html");

    take("a_uxbasics", "select:1,next")
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written"));

    let html = std::fs::read_to_string(&report).unwrap();
    assert!(html.contains("<html"));
    assert!(html.contains("UX Basics Quiz"));
}

#[test]
fn list_for_student() {
    quizgate()
        .args(["list", "--user", "student@lms.com", "--password", "student"])
        .args(["--assessments", "../../assessments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UX Basics Quiz"))
        .stdout(predicate::str::contains("Frontend Basics"))
        .stdout(predicate::str::contains("Pending"))
        .stdout(predicate::str::contains("Start"));
}

#[test]
fn list_for_admin_offers_delete() {
    quizgate()
        .args(["list", "--user", "admin@lms.com", "--password", "admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Delete"));
}

#[test]
fn certificate_for_student() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("cert.html");

    quizgate()
        .args(["certificate", "--user", "student@lms.com", "--course", "Intro to UX"])
        .args(["--issued-on", "2024-06-30"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Certificate for Student One"));

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains("Certificate of Completion"));
    assert!(html.contains("Intro to UX"));
    assert!(html.contains("Issued on 2024-06-30"));
}

#[test]
fn certificate_rejects_bad_date() {
    quizgate()
        .args(["certificate", "--user", "student@lms.com", "--issued-on", "30/06/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --issued-on date"));
}

#[test]
fn certificate_refused_for_admin() {
    let dir = TempDir::new().unwrap();
    quizgate()
        .args(["certificate", "--user", "admin@lms.com"])
        .arg("--output")
        .arg(dir.path().join("cert.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("students only"));
}

#[test]
fn export_users_to_stdout() {
    quizgate()
        .arg("export-users")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""Name","Email","Role","Active","CreatedAt""#,
        ))
        .stdout(predicate::str::contains(r#""Administrator","admin@lms.com","admin","Yes""#));
}

#[test]
fn config_file_is_honoured() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    std::fs::write(
        &config,
        r#"
pass_threshold = 90

[[users]]
name = "Instructor"
email = "instructor@lms.com"
password = "pw"
role = "admin"
"#,
    )
    .unwrap();

    quizgate()
        .arg("export-users")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("instructor@lms.com"))
        .stdout(predicate::str::contains("student@lms.com").not());
}

#[test]
fn help_output() {
    quizgate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Proctored assessment runner"));
}

#[test]
fn version_output() {
    quizgate()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizgate"));
}
