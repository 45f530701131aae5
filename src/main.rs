//! cohortscope: assign a survey respondent to a cluster and describe the people in it
//!
//! Loads the artifacts once, then runs one interaction per set of answers:
//! collect answers, predict the cluster, print the report and write charts.

use anyhow::{Context, Result};
use clap::Parser;
use cohortscope::input::{AnswerSource, FixedAnswers, PromptCollector};
use cohortscope::{viz, Args, ArtifactStore, DashboardContext, SurveyResponse};
use colored::Colorize;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match args.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let start_time = Instant::now();
    let store = ArtifactStore::new(args.artifact_paths());
    let context = DashboardContext::initialize(&store).context("failed to load survey artifacts")?;
    info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "artifacts loaded");

    let mut source: Box<dyn AnswerSource> = match args.fixed_answers() {
        Some(response) => Box::new(FixedAnswers::new(response)),
        None => Box::new(PromptCollector::new(args.lang)),
    };

    let mut previous = SurveyResponse::default();
    while let Some(response) = source.next_response(&previous)? {
        previous = response;

        if let Err(e) = run_interaction(&args, &context, &response) {
            if !source.is_interactive() || !e.is_interaction_failure() {
                return Err(e.into());
            }
            error!(error = %e, "interaction failed");
            eprintln!("{} {e}", "error:".red().bold());
        }
    }

    Ok(())
}

/// Report on one set of answers
fn run_interaction(
    args: &Args,
    context: &DashboardContext<'_>,
    response: &SurveyResponse,
) -> cohortscope::Result<()> {
    let report = context.interact(response)?;
    viz::print_report(&report, args.lang);

    if !args.no_charts {
        let written = viz::render_charts(&report, args.lang, &args.output_dir)?;
        println!();
        for path in written {
            println!("✓ {}", path.display());
        }
    }

    Ok(())
}
