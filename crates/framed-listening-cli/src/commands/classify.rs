//! `classify`: write the labeled pair table only.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use framed_listening_core::export::pairs_table;
use tracing::info;

use super::{embed_and_classify, fail, load_documents, CliContext, InputArgs};

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Destination CSV file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Do not print per-condition counts
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn handle_classify(ctx: &CliContext, args: ClassifyArgs) -> i32 {
    match run(ctx, &args) {
        Ok(()) => 0,
        Err(e) => fail("classify", &e),
    }
}

fn run(ctx: &CliContext, args: &ClassifyArgs) -> Result<()> {
    let documents = load_documents(&args.input.documents)?;
    let embedding = ctx.embedding_config(args.input.backend)?;
    let embedded = embed_and_classify(&documents, &embedding)?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    pairs_table(&embedded.table)
        .write(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        target: "framed_listening_cli",
        path = %args.output.display(),
        pairs = embedded.table.len(),
        "Pair table written"
    );

    if !args.quiet {
        println!("{} pairs from {} documents", embedded.table.len(), documents.len());
        for (condition, count) in embedded.table.condition_counts() {
            println!("  {:<32} {}", condition.as_str(), count);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::write_corpus;

    #[test]
    fn test_classify_writes_one_row_per_pair() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("pairs.csv");
        let args = ClassifyArgs {
            input: InputArgs {
                documents: write_corpus(dir.path()),
                backend: None,
            },
            output: output.clone(),
            quiet: true,
        };

        run(&CliContext::default(), &args).unwrap();
        let csv = std::fs::read_to_string(&output).unwrap();
        // header plus 12 * 11 / 2 pairs
        assert_eq!(csv.lines().count(), 1 + 66);
    }
}
