//! Framed Listening CLI
//!
//! Embeds music-evoked thought transcripts and tests whether their
//! similarity follows the clip, the verbal context, or the genre.
//!
//! # Commands
//!
//! - `analyze`: full analysis, text report plus CSV/JSON outputs
//! - `classify`: pairwise condition table only
//! - `vocab`: TF-IDF vocabulary summary
//! - `compare-tfidf`: TF-IDF settings comparison
//!
//! Exit code 0 on success, 1 on error.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use framed_listening_core::config::LoggingConfig;
use framed_listening_core::AppConfig;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

use commands::CliContext;

/// Framed Listening - clip, context and genre effects on thought similarity
#[derive(Parser)]
#[command(name = "framed-listening")]
#[command(version)]
#[command(about = "Similarity analysis of music-evoked thoughts across clips, contexts and genres")]
#[command(propagate_version = true)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file ([analysis], [output], [logging] and the
    /// embedding sections)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed documents, run every comparison and write the results
    Analyze(commands::analyze::AnalyzeArgs),
    /// Write the labeled document-pair table as CSV
    Classify(commands::classify::ClassifyArgs),
    /// Summarize the fitted TF-IDF vocabulary
    Vocab(commands::vocab::VocabArgs),
    /// Compare vocabulary size and sparsity across TF-IDF settings
    CompareTfidf(commands::compare_tfidf::CompareTfidfArgs),
}

fn main() {
    let cli = Cli::parse();

    let (app, config_error) = match AppConfig::load(cli.config.as_deref()) {
        Ok(app) => (app, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    init_logging(cli.verbose, &app.logging);

    if let Some(e) = config_error {
        let code = commands::fail("load configuration", &anyhow::Error::new(e));
        std::process::exit(code);
    }

    let ctx = CliContext {
        app,
        config_path: cli.config,
    };

    let exit_code = match cli.command {
        Commands::Analyze(args) => commands::analyze::handle_analyze(&ctx, args),
        Commands::Classify(args) => commands::classify::handle_classify(&ctx, args),
        Commands::Vocab(args) => commands::vocab::handle_vocab(&ctx, args),
        Commands::CompareTfidf(args) => commands::compare_tfidf::handle_compare_tfidf(&ctx, args),
    };

    std::process::exit(exit_code);
}

/// Filter precedence: `RUST_LOG`, then `--verbose`, then `logging.level`.
fn init_logging(verbose: bool, logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(logging.level.to_lowercase())
        }
    });

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    if logging.format == "compact" {
        builder.compact().init();
    } else {
        builder.init();
    }
}
