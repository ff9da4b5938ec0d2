//! `analyze`: embed, classify, run every comparison and export.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use framed_listening_core::config::OutputConfig;
use framed_listening_core::export::{write_all, ExportOptions};
use framed_listening_core::report::render_text;
use framed_listening_core::AnalysisPipeline;
use framed_listening_embeddings::EmbeddingBackend;
use tracing::info;

use super::{embed_and_classify, fail, load_documents, CliContext, InputArgs};

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory (defaults to `output.dir`)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// File name prefix (defaults to the backend's prefix: TFIDF, W2V, BERT)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Do not print the text report
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the JSON report instead of the text report
    #[arg(long)]
    pub json: bool,
}

pub fn handle_analyze(ctx: &CliContext, args: AnalyzeArgs) -> i32 {
    match run(ctx, &args) {
        Ok(written) => {
            info!(
                target: "framed_listening_cli",
                files = written.len(),
                "Analysis completed"
            );
            0
        }
        Err(e) => fail("analyze", &e),
    }
}

/// Prefix precedence: `--prefix`, then a non-default `output.prefix`, then
/// the backend's own prefix.
fn resolve_prefix(explicit: Option<&str>, output: &OutputConfig, backend: EmbeddingBackend) -> String {
    match explicit {
        Some(prefix) => prefix.to_string(),
        None if output.prefix != OutputConfig::default().prefix => output.prefix.clone(),
        None => backend.output_prefix().to_string(),
    }
}

fn run(ctx: &CliContext, args: &AnalyzeArgs) -> Result<Vec<PathBuf>> {
    let documents = load_documents(&args.input.documents)?;
    let embedding = ctx.embedding_config(args.input.backend)?;
    let embedded = embed_and_classify(&documents, &embedding)?;

    let report = AnalysisPipeline::new(embedded.backend.as_str(), ctx.app.analysis.clone())
        .run(&embedded.table)
        .context("running analyses")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing report")?
        );
    } else if !args.quiet {
        println!(
            "Embedded {} documents with {} ({} unmatched items, {} unique; sparsity {:.3})\n",
            embedded.corpus.len(),
            embedded.backend,
            embedded.corpus.unmatched.len(),
            embedded.corpus.unique_unmatched(),
            embedded.corpus.sparsity
        );
        print!("{}", render_text(&report));
    }

    let dir = args.output_dir.clone().unwrap_or_else(|| ctx.app.output.dir.clone());
    let prefix = resolve_prefix(args.prefix.as_deref(), &ctx.app.output, embedded.backend);
    let options = ExportOptions {
        csv: ctx.app.output.write_csv,
        json: ctx.app.output.write_json,
    };
    let written = write_all(&report, &embedded.table, &dir, &prefix, options)
        .with_context(|| format!("writing results to {}", dir.display()))?;

    if !args.quiet && !args.json {
        println!("\nWrote {} files to {}", written.len(), dir.display());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::write_corpus;

    fn args(documents: PathBuf, output_dir: PathBuf) -> AnalyzeArgs {
        AnalyzeArgs {
            input: InputArgs {
                documents,
                backend: Some(EmbeddingBackend::Tfidf),
            },
            output_dir: Some(output_dir),
            prefix: None,
            quiet: true,
            json: false,
        }
    }

    #[test]
    fn test_analyze_writes_prefixed_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        let args = args(write_corpus(dir.path()), out.clone());

        let written = run(&CliContext::default(), &args).unwrap();
        assert!(!written.is_empty());
        assert!(out.join("TFIDF_pairs.csv").exists());
        assert!(out.join("TFIDF_analysis_report.json").exists());
        assert!(written.iter().all(|p| p.starts_with(&out)));
    }

    #[test]
    fn test_analyze_respects_output_switches() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("json-only");
        let mut ctx = CliContext::default();
        ctx.app.output.write_csv = false;
        let mut args = args(write_corpus(dir.path()), out.clone());
        args.prefix = Some("RUN1".into());

        let written = run(&ctx, &args).unwrap();
        assert_eq!(written, vec![out.join("RUN1_analysis_report.json")]);
    }

    #[test]
    fn test_handle_analyze_exit_code_on_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path().join("missing.jsonl"), dir.path().join("out"));
        assert_eq!(handle_analyze(&CliContext::default(), args), 1);
    }

    #[test]
    fn test_resolve_prefix() {
        let default = OutputConfig::default();
        assert_eq!(resolve_prefix(None, &default, EmbeddingBackend::Bert), "BERT");
        assert_eq!(resolve_prefix(Some("X"), &default, EmbeddingBackend::Bert), "X");
        let custom = OutputConfig {
            prefix: "STUDY2".into(),
            ..OutputConfig::default()
        };
        assert_eq!(resolve_prefix(None, &custom, EmbeddingBackend::Word2vec), "STUDY2");
    }
}
