//! The `quizgate take` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgate_backends::CameraBehavior;
use quizgate_core::engine::ActiveAttempt;
use quizgate_core::model::AttemptRecord;
use quizgate_core::report::AttemptSummary;
use quizgate_core::runner::{parse_steps, Progress, Step};
use quizgate_core::scoring::passed;
use quizgate_core::traits::CaptureDevice;
use quizgate_report::csv::attempts_csv;
use quizgate_report::html::write_html_report;

pub struct TakeArgs {
    pub assessment: String,
    pub user: String,
    pub password: String,
    pub steps: String,
    pub deny_camera: bool,
    pub assessments: Option<PathBuf>,
    pub scoring: Option<String>,
    pub format: String,
    pub report: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: TakeArgs) -> Result<()> {
    if !matches!(args.format.as_str(), "text" | "json" | "csv") {
        anyhow::bail!("unknown format '{}', expected text, json or csv", args.format);
    }
    let steps = parse_steps(&args.steps).map_err(|e| anyhow::anyhow!(e))?;

    let env = super::open_session(args.config.as_deref(), args.assessments, |config| {
        if args.deny_camera {
            config.camera = CameraBehavior::Deny;
        }
        if let Some(mode) = &args.scoring {
            config.scoring_mode = mode.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        Ok(())
    })?;

    let user = env.directory.sign_in(&args.user, &args.password)?;
    let assessment_id = env
        .catalog
        .resolve(&args.assessment)?
        .map(|d| d.id)
        .unwrap_or_else(|| args.assessment.clone());

    let flow = env.flow();
    let mut attempt = flow
        .start(&assessment_id)
        .await
        .with_context(|| format!("cannot start '{}'", args.assessment))?;

    let text = args.format == "text";
    if text {
        println!(
            "{} taking \"{}\" ({} questions, proctored by {})",
            user.name,
            attempt.runner().definition().title,
            attempt.runner().definition().question_count(),
            env.camera.name(),
        );
    }

    // An assessment without questions is already recorded by `start`.
    let record = match attempt.record().cloned() {
        Some(record) => Some(record),
        None => run_steps(&mut attempt, &steps, text)?,
    };
    let threshold = flow.config().pass_threshold;

    let Some(record) = record else {
        if attempt.is_aborted() {
            if text {
                println!("Assessment closed, no attempt recorded.");
            }
            return Ok(());
        }
        drop(attempt);
        anyhow::bail!(
            "steps ended before the last question was answered; no attempt recorded"
        );
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&record)?),
        "csv" => println!("{}", attempts_csv(&env.attempts().all()?)),
        _ => print_record(&record, threshold),
    }

    if let Some(path) = args.report {
        let records = env.attempts().all()?;
        let summary = AttemptSummary::compute(&records, threshold);
        write_html_report(&summary, &records, &path)?;
        if text {
            println!("Report written to {}", path.display());
        }
    }

    Ok(())
}

/// Apply `steps` one at a time, echoing each question the first time it is
/// shown. Validation rejections are reported and skipped.
fn run_steps(
    attempt: &mut ActiveAttempt,
    steps: &[Step],
    echo: bool,
) -> Result<Option<AttemptRecord>> {
    let mut shown: Option<usize> = None;
    for &step in steps {
        if echo {
            if let Some(view) = attempt.view() {
                if shown != Some(view.index) {
                    println!("\n{}: {}", view.progress_label(), view.text);
                    for (i, option) in view.options.iter().enumerate() {
                        println!("  [{i}] {option}");
                    }
                    shown = Some(view.index);
                }
            }
        }

        match attempt.apply(step) {
            Ok(Some(Progress::Finished(record))) => return Ok(Some(record)),
            Ok(_) => {
                if echo {
                    println!("  > {step}");
                }
            }
            Err(e) if e.is_recoverable() => {
                if echo {
                    println!("  ! {e}");
                }
            }
            Err(e) => return Err(e.into()),
        }
        if attempt.is_aborted() {
            break;
        }
    }
    Ok(None)
}

fn print_record(record: &AttemptRecord, threshold: u8) {
    let verdict = if passed(record.score, threshold) {
        "passed"
    } else {
        "not passed"
    };
    println!();
    println!("Finished: {}", record.assessment_title);
    println!("Score: {}% ({verdict}, pass mark {threshold}%)", record.score);
    println!("Attempt {} saved for {}", record.id, record.user_name);
}
