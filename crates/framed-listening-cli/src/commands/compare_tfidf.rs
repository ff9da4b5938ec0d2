//! `compare-tfidf`: vocabulary size and sparsity across TF-IDF settings.

use anyhow::{Context, Result};
use clap::Args;
use framed_listening_embeddings::tfidf::{
    compare_settings, default_settings_grid, SettingComparison,
};

use super::{fail, load_documents, CliContext};

#[derive(Args, Debug, Clone)]
pub struct CompareTfidfArgs {
    /// Documents JSONL file
    #[arg(short, long)]
    pub documents: std::path::PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle_compare_tfidf(ctx: &CliContext, args: CompareTfidfArgs) -> i32 {
    match run(ctx, &args) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => fail("compare-tfidf", &e),
    }
}

fn run(ctx: &CliContext, args: &CompareTfidfArgs) -> Result<String> {
    let documents = load_documents(&args.documents)?;
    let config = ctx.embedding_config(None)?;
    let results = compare_settings(&documents.texts(), &config.tfidf, &default_settings_grid())
        .context("comparing TF-IDF settings")?;

    if args.json {
        serde_json::to_string_pretty(&results).context("serializing comparison")
    } else {
        Ok(format_comparison(&results))
    }
}

fn format_comparison(results: &[SettingComparison]) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>12} {:>7} {:>10} {:>9} {:>12}",
        "max_features", "ngrams", "vocab_size", "sparsity", "mean_nonzero"
    );
    for r in results {
        let mean = r
            .mean_nonzero
            .map(|m| format!("{:.4}", m))
            .unwrap_or_else(|| "n/a".to_string());
        let _ = writeln!(
            out,
            "{:>12} {:>7} {:>10} {:>9.4} {:>12}",
            r.setting.max_features,
            format!("{}-{}", r.setting.ngram_min, r.setting.ngram_max),
            r.vocab_size,
            r.sparsity,
            mean
        );
    }
    out.trim_end().to_string()
}
