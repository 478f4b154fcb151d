// src/main.rs
// =============================================================================
// Entry point of the wiki-excavator CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr)
// 3. Dispatch to the subcommand handler
// 4. Exit with a proper code (0 = success, 1 = build interrupted, 2 = error)
//
// The build itself, rendering and saving are independent pieces; this file
// is the only place that composes them.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{BuildArgs, Cli, Commands};
use wiki_excavator::builder::{BuildReport, GraphBuilder, StopSignal, Termination};
use wiki_excavator::config::{BuildConfig, FetchConfig};
use wiki_excavator::export::{self, GraphSummary};
use wiki_excavator::source::{PageSource, StaticSource, WikiSource, WikiSourceConfig};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = graph built (or inspected)
//   Ok(1) = build interrupted, partial graph kept
//   Err   = anything that prevented a result
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build(args) => handle_build(args).await,
        Commands::Inspect { file, json } => handle_inspect(file, json),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wiki_excavator={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Everything printed for a finished build
#[derive(Debug, Serialize)]
struct BuildOutcome {
    termination: Termination,
    expanded: usize,
    unavailable: Vec<String>,
    excluded_languages: Vec<String>,
    summary: GraphSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    figure: Option<PathBuf>,
}

async fn handle_build(args: BuildArgs) -> Result<i32> {
    let timeout = Duration::from_secs(args.timeout_secs);
    let config = BuildConfig::new(
        args.seeds.clone(),
        args.removal_chance,
        args.inversion_chance,
        args.max_pages,
    )?
    .with_seed_policy(args.seed_policy.into())
    .with_rng_seed(args.rng_seed)
    .with_fetch(FetchConfig {
        concurrency: args.concurrency,
        timeout,
    })?;

    if !args.json {
        let seeds: Vec<_> = config
            .seeds()
            .iter()
            .map(|s| format!("{}:{}", s.lang, s.title))
            .collect();
        println!("⛏️  Excavating up to {} page(s) from {}", config.max_pages(), seeds.join(", "));
    }

    // Ctrl-C stops the crawl but keeps what was gathered
    let stop = StopSignal::new();
    let signal = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, finishing with the pages gathered so far");
            signal.raise();
        }
    });

    let report = match &args.fixture {
        Some(path) => {
            let source = StaticSource::from_json_file(path)
                .with_context(|| format!("loading fixture {}", path.display()))?;
            info!(pages = source.len(), "using fixture");
            excavate(config.clone(), source, &stop).await?
        }
        None => {
            let source = WikiSource::new(WikiSourceConfig {
                api_template: args.api.clone(),
                user_agent: args.user_agent.clone(),
                request_timeout: timeout,
                politeness: Duration::from_millis(args.politeness_ms),
            })?;
            excavate(config.clone(), source, &stop).await?
        }
    };

    let figure = if args.draw {
        let path = export::figure_path(&args.out_dir, &config);
        export::write_dot(&report.graph, &path)?;
        Some(path)
    } else {
        None
    };

    let saved = if args.save {
        let path = export::graph_path(&args.out_dir, &config);
        export::save_json(&report.graph, &path)?;
        Some(path)
    } else {
        None
    };

    let outcome = BuildOutcome {
        termination: report.termination,
        expanded: report.expanded,
        unavailable: report.unavailable.iter().map(|e| e.to_string()).collect(),
        excluded_languages: report.excluded_languages.clone(),
        summary: GraphSummary::of(&report.graph),
        saved,
        figure,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    match report.termination {
        Termination::Stopped => Ok(1),
        Termination::Exhausted | Termination::CapReached => Ok(0),
    }
}

async fn excavate<S: PageSource>(
    config: BuildConfig,
    source: S,
    stop: &StopSignal,
) -> Result<BuildReport> {
    let builder = GraphBuilder::new(config, source);
    let report = builder
        .build(stop)
        .await
        .with_context(|| format!("building graph from {} seed(s)", builder.config().seeds().len()))?;
    Ok(report)
}

fn handle_inspect(file: PathBuf, json: bool) -> Result<i32> {
    let graph = export::load_json(&file).with_context(|| format!("loading {}", file.display()))?;
    let summary = GraphSummary::of(&graph);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("📄 {}", file.display());
        print_summary(&summary);
    }
    Ok(0)
}

fn print_outcome(outcome: &BuildOutcome) {
    println!();
    print_summary(&outcome.summary);

    println!();
    println!("📊 Build:");
    println!("   🏁 Finished: {}", describe_termination(outcome.termination));
    println!("   🔎 Expanded: {}", outcome.expanded);
    println!("   ⚠️  Unavailable: {}", outcome.unavailable.len());
    for reason in &outcome.unavailable {
        println!("      - {}", reason);
    }
    if !outcome.excluded_languages.is_empty() {
        println!("   🚫 Excluded languages: {}", outcome.excluded_languages.join(", "));
    }
    if let Some(path) = &outcome.figure {
        println!("   🖼️  Figure: {}", path.display());
    }
    if let Some(path) = &outcome.saved {
        println!("   💾 Saved: {}", path.display());
    }
}

// Prints per-language counts as a table
fn print_summary(summary: &GraphSummary) {
    println!("{:<12} {:>8} {:>12} {:>14}", "LANGUAGE", "PAGES", "LINK EDGES", "TRANSLATIONS");
    println!("{}", "=".repeat(49));

    for lang in &summary.languages {
        println!(
            "{:<12} {:>8} {:>12} {:>14}",
            lang.lang, lang.pages, lang.link_edges, lang.translation_edges
        );
    }

    println!("{}", "-".repeat(49));
    println!(
        "{:<12} {:>8} {:>12} {:>14}",
        "TOTAL", summary.pages, summary.link_edges, summary.translation_edges
    );
}

fn describe_termination(termination: Termination) -> &'static str {
    match termination {
        Termination::Exhausted => "no pages left to explore",
        Termination::CapReached => "page cap reached",
        Termination::Stopped => "interrupted",
    }
}
