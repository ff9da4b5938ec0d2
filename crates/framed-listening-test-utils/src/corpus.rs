//! Synthetic corpora with planted clip, context and genre effects.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use framed_listening_core::{Document, DocumentLabels, DocumentSet, SimilarityMatrix};

// ============================================================================
// Configuration
// ============================================================================

/// Shape of a synthetic corpus and the effects planted in its similarities.
#[derive(Debug, Clone)]
pub struct SyntheticCorpusConfig {
    pub genres: Vec<String>,
    pub contexts: Vec<String>,
    pub clips_per_genre: usize,
    /// Baseline similarity of unrelated documents.
    pub base_similarity: f64,
    pub clip_effect: f64,
    pub context_effect: f64,
    pub genre_effect: f64,
    /// Half-width of the uniform noise added to every pair.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SyntheticCorpusConfig {
    fn default() -> Self {
        Self {
            genres: vec!["J".into(), "R".into(), "C".into()],
            contexts: vec!["calm".into(), "party".into(), "sad".into(), "road".into()],
            clips_per_genre: 3,
            base_similarity: 0.15,
            clip_effect: 0.35,
            context_effect: 0.15,
            genre_effect: 0.05,
            noise: 0.05,
            seed: 42,
        }
    }
}

// ============================================================================
// Corpus
// ============================================================================

/// Documents plus a similarity matrix over them.
#[derive(Debug, Clone)]
pub struct SyntheticCorpus {
    pub documents: DocumentSet,
    pub matrix: SimilarityMatrix,
}

impl SyntheticCorpus {
    pub fn labels(&self) -> Vec<DocumentLabels> {
        self.documents.labels()
    }
}

/// Generates corpora where every clip is heard once in every context.
pub struct SyntheticCorpusGenerator {
    config: SyntheticCorpusConfig,
    rng: ChaCha8Rng,
}

const FILLER: [&str; 12] = [
    "remember", "feeling", "thinking", "about", "moment", "images", "somewhere", "someone",
    "colours", "memory", "picture", "imagined",
];

impl SyntheticCorpusGenerator {
    pub fn new(config: SyntheticCorpusConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn generate(&mut self) -> SyntheticCorpus {
        let genres = self.config.genres.clone();
        let contexts = self.config.contexts.clone();
        let mut documents = Vec::new();
        for genre in &genres {
            for clip_index in 0..self.config.clips_per_genre {
                let clip = format!("{}{}", genre, clip_index + 1);
                for context in &contexts {
                    let text = self.generate_text(&clip, context, genre);
                    documents.push(Document {
                        id: format!("{}_{}", clip, context),
                        clip: clip.clone(),
                        context: context.clone(),
                        genre: genre.clone(),
                        text,
                    });
                }
            }
        }

        let labels: Vec<DocumentLabels> = documents.iter().map(Document::labels).collect();
        let matrix = self.generate_matrix(&labels);
        let documents = DocumentSet::new(documents).expect("generated documents are valid");
        SyntheticCorpus { documents, matrix }
    }

    /// Text sharing words with documents of the same clip, context and genre.
    fn generate_text(&mut self, clip: &str, context: &str, genre: &str) -> String {
        let mut words = vec![
            format!("scene{}", clip.to_lowercase()),
            format!("scene{}", clip.to_lowercase()),
            format!("mood{}", context),
            format!("style{}", genre.to_lowercase()),
        ];
        for _ in 0..6 {
            let idx = self.rng.gen_range(0..FILLER.len());
            words.push(FILLER[idx].to_string());
        }
        words.shuffle(&mut self.rng);
        words.join(" ")
    }

    fn generate_matrix(&mut self, labels: &[DocumentLabels]) -> SimilarityMatrix {
        let n = labels.len();
        let mut rows = vec![vec![0.0; n]; n];
        for i in 0..n {
            rows[i][i] = 1.0;
            for j in (i + 1)..n {
                let (a, b) = (&labels[i], &labels[j]);
                let mut sim = self.config.base_similarity;
                if a.clip == b.clip {
                    sim += self.config.clip_effect;
                }
                if a.context == b.context {
                    sim += self.config.context_effect;
                }
                if a.genre == b.genre {
                    sim += self.config.genre_effect;
                }
                if self.config.noise > 0.0 {
                    sim += self.rng.gen_range(-self.config.noise..self.config.noise);
                }
                let sim = sim.clamp(-1.0, 1.0);
                rows[i][j] = sim;
                rows[j][i] = sim;
            }
        }
        SimilarityMatrix::from_rows(rows).expect("generated matrix is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_corpus() {
        let a = SyntheticCorpusGenerator::new(SyntheticCorpusConfig::default()).generate();
        let b = SyntheticCorpusGenerator::new(SyntheticCorpusConfig::default()).generate();
        assert_eq!(a.matrix, b.matrix);
        assert_eq!(a.documents, b.documents);
    }

    #[test]
    fn test_shape() {
        let corpus = SyntheticCorpusGenerator::new(SyntheticCorpusConfig::default()).generate();
        // 3 genres x 3 clips x 4 contexts
        assert_eq!(corpus.documents.len(), 36);
        assert_eq!(corpus.matrix.len(), 36);
    }
}
