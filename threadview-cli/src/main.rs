use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use threadview_core::{
    ClaudeRoot, ThreadviewError, find_latest_transcript, output_dir_from_env, render_transcript,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_FILTER: &str = "threadview=info,threadview_core=info";

#[derive(Debug, Parser)]
#[command(
    name = "threadview",
    version,
    about = "Render a Claude Code conversation transcript as a browsable HTML page"
)]
struct Cli {
    /// Transcript file (.jsonl). When given alone it is taken as the output
    /// directory and the transcript is found from the current project.
    first: Option<PathBuf>,

    /// Output directory for index.html
    second: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> threadview_core::Result<()> {
    let (input, output_dir) = match (cli.first, cli.second) {
        (Some(input), Some(output_dir)) => (input, output_dir),
        (explicit_output, _) => {
            let root = ClaudeRoot::from_env_or_home()?;
            let cwd = env::current_dir().map_err(ThreadviewError::CurrentDirectory)?;
            let input = find_latest_transcript(&root, &cwd)?;
            (input, output_dir_from_env(explicit_output))
        }
    };

    let summary = render_transcript(&input, &output_dir)?;
    tracing::debug!(
        session_id = %summary.session_id,
        turns = summary.turns,
        skipped_lines = summary.stats.skipped,
        "rendered conversation"
    );
    println!("{}", summary.output_path.display());

    Ok(())
}
