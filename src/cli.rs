// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Subcommands:
// - build: excavate a graph from one seed page per language
// - inspect: reload a saved graph and summarize it
//
// The raw arguments here are converted into a validated BuildConfig in
// main.rs; nothing else in the crate reads them.
// =============================================================================

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use wiki_excavator::config::{Seed, SeedPolicy};
use wiki_excavator::source::{DEFAULT_API_TEMPLATE, DEFAULT_USER_AGENT};

#[derive(Parser, Debug)]
#[command(
    name = "wiki-excavator",
    version,
    about = "Excavates a multilingual graph of Wikipedia articles",
    long_about = "wiki-excavator starts from one article per language and explores outward, \
                  linking articles of the same language (red edges) and translations of the \
                  same subject across languages (blue edges)."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a graph from seed pages
    ///
    /// Example: wiki-excavator build --seed en=Cat --seed fr=Chat --max-pages 50 --save
    Build(BuildArgs),

    /// Summarize a previously saved graph
    ///
    /// Example: wiki-excavator inspect "Excavated Graphs/Cat_50_samples_graph.json"
    Inspect {
        /// Path to a graph saved with `build --save`
        file: PathBuf,

        /// Output the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Starting page as LANG=TITLE; repeat once per language
    ///
    /// The order of the seeds is the order languages are served in.
    #[arg(long = "seed", value_name = "LANG=TITLE", required = true)]
    pub seeds: Vec<Seed>,

    /// Probability that a discovered link is discarded
    #[arg(long, default_value_t = 0.8)]
    pub removal_chance: f64,

    /// Probability that a translation edge is flipped
    #[arg(long, default_value_t = 0.1)]
    pub inversion_chance: f64,

    /// Hard cap on the number of pages across all languages
    #[arg(long, default_value_t = 100)]
    pub max_pages: usize,

    /// Seed for the random generator, for replayable builds
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// What to do when a seed page can't be fetched
    #[arg(long, value_enum, default_value_t = SeedPolicyArg::Skip)]
    pub seed_policy: SeedPolicyArg,

    /// Number of pages fetched at once
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Deadline for fetching one page, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Delay after every API request, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub politeness_ms: u64,

    /// MediaWiki API endpoint; {lang} is replaced by the language code
    #[arg(long, env = "WIKI_EXCAVATOR_API", default_value = DEFAULT_API_TEMPLATE)]
    pub api: String,

    /// User-Agent sent with every request
    #[arg(long, env = "WIKI_EXCAVATOR_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Read pages from a JSON fixture instead of the live API
    #[arg(long, value_name = "FILE")]
    pub fixture: Option<PathBuf>,

    /// Render the graph as a Graphviz DOT file under <out-dir>/Figures
    #[arg(long)]
    pub draw: bool,

    /// Save the graph as JSON under <out-dir>/Excavated Graphs
    #[arg(long)]
    pub save: bool,

    /// Root directory for --draw and --save output
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Output the build report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedPolicyArg {
    /// Leave that language out and build with the others
    Skip,
    /// Fail the whole build
    Abort,
}

impl From<SeedPolicyArg> for SeedPolicy {
    fn from(arg: SeedPolicyArg) -> Self {
        match arg {
            SeedPolicyArg::Skip => SeedPolicy::SkipLanguage,
            SeedPolicyArg::Abort => SeedPolicy::Abort,
        }
    }
}
