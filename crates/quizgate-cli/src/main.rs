//! quizgate CLI: run proctored assessments against in-memory backends.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizgate", version, about = "Proctored assessment runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an assessment with a scripted sequence of answers
    Take {
        /// Assessment id or title
        #[arg(long)]
        assessment: String,

        /// Email of the account to sign in as
        #[arg(long)]
        user: String,

        /// Account password
        #[arg(long)]
        password: String,

        /// Comma-separated steps, e.g. "select:1,next,prev,next"
        #[arg(long)]
        steps: String,

        /// Simulate the user dismissing the camera prompt
        #[arg(long)]
        deny_camera: bool,

        /// Extra assessment file or directory to load
        #[arg(long)]
        assessments: Option<PathBuf>,

        /// Scoring of revisited questions: cumulative, last-answer
        #[arg(long)]
        scoring: Option<String>,

        /// Output format: text, json, csv
        #[arg(long, default_value = "text")]
        format: String,

        /// Also write an HTML attempts report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the assessments visible to a user
    List {
        /// Email of the account to sign in as
        #[arg(long)]
        user: String,

        /// Account password
        #[arg(long)]
        password: String,

        /// Extra assessment file or directory to load
        #[arg(long)]
        assessments: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate assessment TOML files
    Validate {
        /// Path to assessment file or directory
        #[arg(long)]
        assessments: PathBuf,
    },

    /// Generate a certificate of completion for a student
    Certificate {
        /// Email of the student
        #[arg(long)]
        user: String,

        /// Course title to print on the certificate
        #[arg(long)]
        course: Option<String>,

        /// Issue date as YYYY-MM-DD (default: today)
        #[arg(long)]
        issued_on: Option<String>,

        /// Output HTML file
        #[arg(long, default_value = "certificate.html")]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Export the user directory as CSV
    ExportUsers {
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example assessment
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizgate=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            assessment,
            user,
            password,
            steps,
            deny_camera,
            assessments,
            scoring,
            format,
            report,
            config,
        } => {
            commands::take::execute(commands::take::TakeArgs {
                assessment,
                user,
                password,
                steps,
                deny_camera,
                assessments,
                scoring,
                format,
                report,
                config,
            })
            .await
        }
        Commands::List {
            user,
            password,
            assessments,
            config,
        } => commands::list::execute(user, password, assessments, config),
        Commands::Validate { assessments } => commands::validate::execute(assessments),
        Commands::Certificate {
            user,
            course,
            issued_on,
            output,
            config,
        } => commands::certificate::execute(user, course, issued_on, output, config),
        Commands::ExportUsers { output, config } => commands::export_users::execute(output, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
