//! Transcript documents and their metadata labels.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{error, info};

use crate::error::{CoreError, CoreResult};
use crate::types::LevelFactor;

/// One transcript unit with its experimental metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(alias = "ClipContext_pair")]
    pub id: String,
    #[serde(alias = "clip_name")]
    pub clip: String,
    #[serde(alias = "context_word")]
    pub context: String,
    #[serde(alias = "genre_code")]
    pub genre: String,
    pub text: String,
}

impl Document {
    pub fn labels(&self) -> DocumentLabels {
        DocumentLabels {
            clip: self.clip.clone(),
            context: self.context.clone(),
            genre: self.genre.clone(),
        }
    }
}

/// Metadata labels of a document, detached from its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentLabels {
    pub clip: String,
    pub context: String,
    pub genre: String,
}

impl DocumentLabels {
    pub fn new(
        clip: impl Into<String>,
        context: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            clip: clip.into(),
            context: context.into(),
            genre: genre.into(),
        }
    }

    /// Label of this document for a level factor.
    pub fn level(&self, factor: LevelFactor) -> &str {
        match factor {
            LevelFactor::Context => &self.context,
            LevelFactor::Genre => &self.genre,
        }
    }
}

/// Validated, ordered collection of documents.
///
/// A document's index in the set is its row in the similarity matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    /// Build a set, rejecting empty labels, duplicate ids and an empty list.
    pub fn new(documents: Vec<Document>) -> CoreResult<Self> {
        Self::from_numbered(
            documents
                .into_iter()
                .enumerate()
                .map(|(index, doc)| (index + 1, doc))
                .collect(),
        )
    }

    /// Parse JSONL: one document object per non-blank line.
    ///
    /// Errors name the 1-based line of the input.
    pub fn from_jsonl_str(input: &str) -> CoreResult<Self> {
        let mut entries = Vec::new();
        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let doc: Document = serde_json::from_str(trimmed)
                .map_err(|e| CoreError::document_load(line_no, e.to_string()))?;
            entries.push((line_no, doc));
        }
        Self::from_numbered(entries)
    }

    /// Shared validation. Each document carries the position reported in errors.
    fn from_numbered(entries: Vec<(usize, Document)>) -> CoreResult<Self> {
        if entries.is_empty() {
            return Err(CoreError::validation("documents", "no documents supplied"));
        }
        let mut seen = HashSet::with_capacity(entries.len());
        for (position, doc) in &entries {
            check_document(doc).map_err(|message| CoreError::document_load(*position, message))?;
            if !seen.insert(doc.id.as_str()) {
                return Err(CoreError::document_load(
                    *position,
                    format!("duplicate document id '{}'", doc.id),
                ));
            }
        }
        Ok(Self {
            documents: entries.into_iter().map(|(_, doc)| doc).collect(),
        })
    }

    /// Load a JSONL document file.
    pub fn from_jsonl_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match Self::from_jsonl_str(&content) {
            Ok(set) => {
                info!(
                    target: "framed_listening_core",
                    path = %path.display(),
                    documents = set.len(),
                    "Loaded documents"
                );
                Ok(set)
            }
            Err(e) => {
                error!(
                    target: "framed_listening_core",
                    path = %path.display(),
                    error = %e,
                    "Failed to load documents"
                );
                Err(e)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.text.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<DocumentLabels> {
        self.documents.iter().map(Document::labels).collect()
    }
}

fn check_document(doc: &Document) -> Result<(), String> {
    for (field, value) in [
        ("id", &doc.id),
        ("clip", &doc.clip),
        ("context", &doc.context),
        ("genre", &doc.genre),
    ] {
        if value.trim().is_empty() {
            return Err(format!("empty {} for document '{}'", field, doc.id));
        }
    }
    Ok(())
}
