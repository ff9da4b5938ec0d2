//! `vocab`: fit TF-IDF on the documents and summarize its vocabulary.

use anyhow::{Context, Result};
use clap::Args;
use framed_listening_embeddings::{TfidfVectorizer, VocabularyInfo};

use super::{fail, load_documents, CliContext};

#[derive(Args, Debug, Clone)]
pub struct VocabArgs {
    /// Documents JSONL file
    #[arg(short, long)]
    pub documents: std::path::PathBuf,

    /// Terms listed at each end of the IDF ranking
    #[arg(short = 'n', long, default_value = "20")]
    pub top_terms: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle_vocab(ctx: &CliContext, args: VocabArgs) -> i32 {
    match run(ctx, &args) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => fail("vocab", &e),
    }
}

fn run(ctx: &CliContext, args: &VocabArgs) -> Result<String> {
    let documents = load_documents(&args.documents)?;
    let config = ctx.embedding_config(None)?;
    let vectorizer = TfidfVectorizer::fit(config.tfidf, &documents.texts())
        .context("fitting TF-IDF vocabulary")?;

    let mut info = vectorizer.vocabulary_info();
    info.most_common_terms.truncate(args.top_terms);
    let keep_from = info.rarest_terms.len().saturating_sub(args.top_terms);
    info.rarest_terms.drain(..keep_from);

    if args.json {
        serde_json::to_string_pretty(&info).context("serializing vocabulary info")
    } else {
        Ok(format_vocabulary(&info))
    }
}

fn format_vocabulary(info: &VocabularyInfo) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    let _ = writeln!(out, "TF-IDF Vocabulary");
    let _ = writeln!(out, "=================");
    let _ = writeln!(out, "Size:     {}", info.vocab_size);
    let _ = writeln!(
        out,
        "IDF:      min {:.3}, max {:.3}, mean {:.3}",
        info.min_idf, info.max_idf, info.mean_idf
    );
    let _ = writeln!(out, "Most common: {}", info.most_common_terms.join(", "));
    let _ = write!(out, "Rarest:      {}", info.rarest_terms.join(", "));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::write_corpus;

    #[test]
    fn test_vocab_limits_listed_terms() {
        let dir = tempfile::tempdir().unwrap();
        let args = VocabArgs {
            documents: write_corpus(dir.path()),
            top_terms: 3,
            json: true,
        };
        let output = run(&CliContext::default(), &args).unwrap();
        let info: VocabularyInfo = serde_json::from_str(&output).unwrap();
        assert!(info.vocab_size > 3);
        assert_eq!(info.most_common_terms.len(), 3);
        assert_eq!(info.rarest_terms.len(), 3);
    }

    #[test]
    fn test_vocab_text_output() {
        let dir = tempfile::tempdir().unwrap();
        let args = VocabArgs {
            documents: write_corpus(dir.path()),
            top_terms: 5,
            json: false,
        };
        let output = run(&CliContext::default(), &args).unwrap();
        assert!(output.starts_with("TF-IDF Vocabulary"));
        assert!(output.contains("Most common:"));
    }
}
