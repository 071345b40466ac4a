use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use strategist_common::{format_trend_table, Audience, Config, Goal, PlanRequest, Tone};
use strategist_engine::{CompetitorOutcome, Notice, NoticeLevel, PlanOutcome, Strategist};

#[derive(Parser)]
#[command(name = "strategist", about = "Trend-driven content planning assistant")]
struct Cli {
    /// Print the result as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch related trending queries for a topic and generate a 3-day content plan
    Plan {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        audience: Option<Audience>,
        #[arg(long)]
        goal: Option<Goal>,
        #[arg(long)]
        tone: Option<Tone>,
    },
    /// Scrape a competitor blog's headlines and generate a content gap analysis
    Analyze {
        #[arg(long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("strategist=info".parse()?))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.log_redacted();

    let strategist = Strategist::from_config(&config)?;

    match cli.command {
        Command::Plan {
            topic,
            audience,
            goal,
            tone,
        } => {
            let outcome = strategist
                .run_plan(PlanRequest {
                    topic,
                    audience,
                    goal,
                    tone,
                })
                .await;
            Ok(print_plan(&outcome, cli.json))
        }
        Command::Analyze { url } => {
            let outcome = strategist.run_competitor(&url).await;
            Ok(print_competitor(&outcome, cli.json))
        }
    }
}

fn print_plan(outcome: &PlanOutcome, json: bool) -> ExitCode {
    if let PlanOutcome::Ready(report) = outcome {
        if json {
            println!("{}", serde_json::to_string_pretty(report).unwrap_or_default());
        } else {
            println!("Trending related queries for \"{}\":\n", report.topic);
            println!("{}", format_trend_table(&report.trends));
            println!("{}", report.strategy);
        }
        info!("Plan delivered");
        return ExitCode::SUCCESS;
    }
    print_notice(outcome.notice(), json)
}

fn print_competitor(outcome: &CompetitorOutcome, json: bool) -> ExitCode {
    if let CompetitorOutcome::Ready(report) = outcome {
        if json {
            println!("{}", serde_json::to_string_pretty(report).unwrap_or_default());
        } else {
            println!("Competitor headlines from {}:\n", report.url);
            for headline in &report.headlines {
                println!("- {headline}");
            }
            println!("\n{}", report.analysis);
        }
        info!("Competitor analysis delivered");
        return ExitCode::SUCCESS;
    }
    print_notice(outcome.notice(), json)
}

/// Warnings exit 0, errors exit 1.
fn print_notice(notice: Option<Notice>, json: bool) -> ExitCode {
    let Some(notice) = notice else {
        return ExitCode::SUCCESS;
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&notice).unwrap_or_default());
    } else {
        let marker = match notice.level {
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        eprintln!("{marker}: {}", notice.message);
    }
    match notice.level {
        NoticeLevel::Warning => ExitCode::SUCCESS,
        NoticeLevel::Error => ExitCode::FAILURE,
    }
}
