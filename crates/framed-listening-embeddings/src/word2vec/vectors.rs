//! Pretrained word vectors in word2vec text, GloVe or word2vec binary format.
//!
//! Text format: an optional `count dim` header line, then one line per word
//! with `dim` floats. Binary format: a `count dim` header line, then for each
//! word its UTF-8 bytes, a space and `dim` little-endian f32 values.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{error, info};

use crate::error::{EmbeddingError, EmbeddingResult};

const BACKEND: &str = "word2vec";

/// Word-to-vector lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedVectors {
    dimension: usize,
    index: HashMap<String, usize>,
    data: Vec<f32>,
}

impl KeyedVectors {
    /// Build from `(word, vector)` entries. A repeated word keeps its first vector.
    pub fn from_entries<I>(dimension: usize, entries: I) -> EmbeddingResult<Self>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidInput("vector dimension must be > 0".into()));
        }
        let mut vectors = Self {
            dimension,
            index: HashMap::new(),
            data: Vec::new(),
        };
        for (word, vector) in entries {
            vectors.insert(word, &vector)?;
        }
        Ok(vectors)
    }

    fn insert(&mut self, word: String, vector: &[f32]) -> EmbeddingResult<()> {
        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if !self.index.contains_key(&word) {
            self.index.insert(word, self.index.len());
            self.data.extend_from_slice(vector);
        }
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Case-sensitive lookup.
    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.index
            .get(word)
            .map(|&row| &self.data[row * self.dimension..(row + 1) * self.dimension])
    }

    /// Load a vectors file, choosing the binary reader when `binary` is set.
    pub fn load(path: &Path, binary: bool) -> EmbeddingResult<Self> {
        let result = File::open(path)
            .map_err(|e| EmbeddingError::model_load(BACKEND, format!("{}: {}", path.display(), e)))
            .and_then(|file| {
                let reader = BufReader::new(file);
                if binary {
                    Self::read_binary(reader)
                } else {
                    Self::read_text(reader)
                }
            });

        match &result {
            Ok(vectors) => info!(
                target: "framed_listening_embeddings",
                path = %path.display(),
                words = vectors.len(),
                dimension = vectors.dimension(),
                "Loaded word vectors"
            ),
            Err(e) => error!(
                target: "framed_listening_embeddings",
                path = %path.display(),
                error = %e,
                "Failed to load word vectors"
            ),
        }
        result
    }

    /// Parse the text format. The header line is optional.
    pub fn read_text<R: BufRead>(reader: R) -> EmbeddingResult<Self> {
        let mut dimension: Option<usize> = None;
        let mut vectors: Option<Self> = None;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| {
                EmbeddingError::model_load(BACKEND, format!("line {}: {}", line_no, e))
            })?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            if line_no == 1 && fields.len() == 2 {
                if let (Ok(_), Ok(dim)) = (fields[0].parse::<usize>(), fields[1].parse::<usize>()) {
                    dimension = Some(dim);
                    continue;
                }
            }

            if fields.len() < 2 {
                return Err(EmbeddingError::model_load(
                    BACKEND,
                    format!("line {}: no vector values", line_no),
                ));
            }
            let dim = *dimension.get_or_insert(fields.len() - 1);
            if fields.len() != dim + 1 {
                return Err(EmbeddingError::model_load(
                    BACKEND,
                    format!(
                        "line {}: expected {} values, found {}",
                        line_no,
                        dim,
                        fields.len() - 1
                    ),
                ));
            }
            let vector = fields[1..]
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| {
                    EmbeddingError::model_load(BACKEND, format!("line {}: {}", line_no, e))
                })?;

            if vectors.is_none() {
                vectors = Some(Self::from_entries(dim, std::iter::empty())?);
            }
            if let Some(table) = vectors.as_mut() {
                table.insert(fields[0].to_string(), &vector)?;
            }
        }

        vectors
            .filter(|v| !v.is_empty())
            .ok_or_else(|| EmbeddingError::model_load(BACKEND, "no word vectors found"))
    }

    /// Parse the binary format.
    pub fn read_binary<R: BufRead>(mut reader: R) -> EmbeddingResult<Self> {
        let mut header = String::new();
        reader
            .read_line(&mut header)
            .map_err(|e| EmbeddingError::model_load(BACKEND, format!("header: {}", e)))?;
        let mut parts = header.split_whitespace().map(str::parse::<usize>);
        let (count, dimension) = match (parts.next(), parts.next()) {
            (Some(Ok(count)), Some(Ok(dim))) => (count, dim),
            _ => {
                return Err(EmbeddingError::model_load(
                    BACKEND,
                    format!("invalid binary header '{}'", header.trim()),
                ))
            }
        };

        let mut vectors = Self::from_entries(dimension, std::iter::empty())?;
        let mut buffer = vec![0u8; dimension * 4];
        for entry in 0..count {
            let mut word = Vec::new();
            reader.read_until(b' ', &mut word).map_err(|e| {
                EmbeddingError::model_load(BACKEND, format!("word {}: {}", entry, e))
            })?;
            if word.last() != Some(&b' ') {
                return Err(EmbeddingError::model_load(
                    BACKEND,
                    format!("truncated file: expected {} words, read {}", count, entry),
                ));
            }
            word.pop();
            let start = word.iter().position(|b| *b != b'\n').unwrap_or(word.len());
            let word = String::from_utf8_lossy(&word[start..]).into_owned();

            reader.read_exact(&mut buffer).map_err(|e| {
                EmbeddingError::model_load(BACKEND, format!("vector for '{}': {}", word, e))
            })?;
            let vector: Vec<f32> = buffer
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            vectors.insert(word, &vector)?;
        }

        if vectors.is_empty() {
            return Err(EmbeddingError::model_load(BACKEND, "no word vectors found"));
        }
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn binary_file(words: &[(&str, [f32; 2])]) -> Vec<u8> {
        let mut bytes = format!("{} 2\n", words.len()).into_bytes();
        for (word, vector) in words {
            bytes.extend_from_slice(word.as_bytes());
            bytes.push(b' ');
            for v in vector {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
            bytes.push(b'\n');
        }
        bytes
    }

    #[test]
    fn test_text_with_header() {
        let input = "2 3\nsea 0.1 0.2 0.3\nSky 1 0 -1\n";
        let v = KeyedVectors::read_text(Cursor::new(input)).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v.dimension(), 3);
        assert_eq!(v.get("Sky"), Some(&[1.0, 0.0, -1.0][..]));
        assert_eq!(v.get("sky"), None);
    }

    #[test]
    fn test_glove_without_header() {
        let input = "sea 0.5 0.5\nsky 0.25 0.75\n";
        let v = KeyedVectors::read_text(Cursor::new(input)).unwrap();
        assert_eq!(v.dimension(), 2);
        assert_eq!(v.get("sea"), Some(&[0.5, 0.5][..]));
    }

    #[test]
    fn test_ragged_line_names_line_number() {
        let input = "sea 0.5 0.5\nsky 0.25\n";
        let err = KeyedVectors::read_text(Cursor::new(input)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("word2vec"));
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn test_binary_round_trip() {
        let bytes = binary_file(&[("sea", [0.5, -0.5]), ("sky", [1.0, 2.0])]);
        let v = KeyedVectors::read_binary(Cursor::new(bytes)).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v.get("sky"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_binary_truncated() {
        let mut bytes = binary_file(&[("sea", [0.5, -0.5])]);
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            KeyedVectors::read_binary(Cursor::new(bytes)),
            Err(EmbeddingError::ModelLoadError { .. })
        ));
    }

    #[test]
    fn test_text_invalid_utf8_is_model_load_error() {
        let input = vec![b's', b'e', b'a', b' ', 0xff, 0xfe, b'\n'];
        let err = KeyedVectors::read_text(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelLoadError { ref backend, .. } if backend == "word2vec"));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_word_without_values_names_line_number() {
        let err = KeyedVectors::read_text(Cursor::new("sea\nsky 1 2\n")).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelLoadError { .. }));
        let msg = err.to_string();
        assert!(msg.contains("line 1"));
        assert!(msg.contains("no vector values"));
    }

    #[test]
    fn test_binary_invalid_utf8_header() {
        let bytes = vec![0xff, 0xfe, b' ', b'2', b'\n'];
        let err = KeyedVectors::read_binary(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelLoadError { ref backend, .. } if backend == "word2vec"));
        assert!(err.to_string().contains("header"));
    }

    #[test]
    fn test_binary_truncated_mid_word() {
        let mut bytes = binary_file(&[("sea", [0.5, -0.5]), ("sky", [1.0, 2.0])]);
        let cut = bytes.len() - 10;
        bytes.truncate(cut);
        let err = KeyedVectors::read_binary(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelLoadError { .. }));
        assert!(err.to_string().contains("expected 2 words, read 1"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = KeyedVectors::load(Path::new("/nonexistent/vectors.txt"), false).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelLoadError { ref backend, .. } if backend == "word2vec"));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"sea 1 0\n").unwrap();
        let v = KeyedVectors::load(file.path(), false).unwrap();
        assert_eq!(v.len(), 1);
    }
}
