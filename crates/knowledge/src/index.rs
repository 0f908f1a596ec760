//! Pre-built semantic index over the knowledge corpus.
//!
//! The artifact is JSONL: one `{source_id, text, embedding}` record per
//! line, produced by an external build step. Loading is all-or-nothing —
//! a missing, unreadable, or dimensionally inconsistent artifact fails
//! initialization and the whole pipeline stays unavailable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use mw_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Records & passages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One line of the index artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexRecord {
    source_id: String,
    text: String,
    embedding: Vec<f32>,
}

/// A retrieved chunk of the knowledge corpus. Ephemeral — produced per
/// query, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Passage {
    pub text: String,
    pub source_id: String,
    pub similarity_score: f32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Vector math
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cosine similarity between two vectors.
///
/// Returns a value in `[-1.0, 1.0]`. Returns `0.0` if either vector has
/// zero magnitude (avoiding division by zero).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        tracing::warn!(
            len_a = a.len(),
            len_b = b.len(),
            "cosine_similarity: mismatched vector lengths, returning 0.0"
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Index
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The loaded index. Read-only after construction; safely shared across
/// sessions behind an `Arc`.
#[derive(Debug)]
pub struct KnowledgeIndex {
    records: Vec<IndexRecord>,
    dim: usize,
}

impl KnowledgeIndex {
    /// Load the artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Knowledge(format!("reading index artifact {}: {e}", path.display()))
        })?;

        let mut records: Vec<IndexRecord> = Vec::new();
        let mut dim = 0usize;
        for (line_no, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: IndexRecord = serde_json::from_str(line).map_err(|e| {
                Error::Knowledge(format!(
                    "malformed index record at {}:{}: {e}",
                    path.display(),
                    line_no + 1
                ))
            })?;
            if record.embedding.is_empty() {
                return Err(Error::Knowledge(format!(
                    "empty embedding at {}:{}",
                    path.display(),
                    line_no + 1
                )));
            }
            if dim == 0 {
                dim = record.embedding.len();
            } else if record.embedding.len() != dim {
                return Err(Error::Knowledge(format!(
                    "inconsistent embedding dimension at {}:{} (expected {dim}, got {})",
                    path.display(),
                    line_no + 1,
                    record.embedding.len()
                )));
            }
            records.push(record);
        }

        if records.is_empty() {
            return Err(Error::Knowledge(format!(
                "index artifact {} contains no records",
                path.display()
            )));
        }

        tracing::info!(
            passages = records.len(),
            dim,
            path = %path.display(),
            "knowledge index loaded"
        );

        Ok(Self { records, dim })
    }

    /// Embedding dimension of the loaded index.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of passages in the index.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Top-`k` passages ranked by descending cosine similarity.
    ///
    /// Deterministic for a fixed index and query vector: ties keep the
    /// artifact's record order (stable sort).
    pub fn query(&self, vector: &[f32], k: usize) -> Vec<Passage> {
        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (i, cosine_similarity(vector, &r.embedding)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(k)
            .map(|(i, score)| {
                let r = &self.records[i];
                Passage {
                    text: r.text.clone(),
                    source_id: r.source_id.clone(),
                    similarity_score: score,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_index() -> KnowledgeIndex {
        KnowledgeIndex {
            records: vec![
                IndexRecord {
                    source_id: "sleep-01".into(),
                    text: "sleep hygiene basics".into(),
                    embedding: vec![1.0, 0.0, 0.0],
                },
                IndexRecord {
                    source_id: "anxiety-02".into(),
                    text: "grounding techniques for anxiety".into(),
                    embedding: vec![0.0, 1.0, 0.0],
                },
                IndexRecord {
                    source_id: "headache-03".into(),
                    text: "tension headache self-care".into(),
                    embedding: vec![0.7, 0.7, 0.0],
                },
            ],
            dim: 3,
        }
    }

    #[test]
    fn cosine_identical_vectors_is_one() {
        let v = vec![0.5, 0.5, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_zero_magnitude_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_mismatched_lengths_is_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn query_ranks_by_descending_similarity() {
        let index = test_index();
        let hits = index.query(&[1.0, 0.0, 0.0], 3);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].source_id, "sleep-01");
        assert!(hits[0].similarity_score >= hits[1].similarity_score);
        assert!(hits[1].similarity_score >= hits[2].similarity_score);
    }

    #[test]
    fn query_respects_k_bound() {
        let index = test_index();
        assert_eq!(index.query(&[1.0, 0.0, 0.0], 2).len(), 2);
        // k larger than the index returns everything, never panics.
        assert_eq!(index.query(&[1.0, 0.0, 0.0], 10).len(), 3);
    }

    #[test]
    fn query_is_deterministic() {
        let index = test_index();
        let a: Vec<String> = index
            .query(&[0.3, 0.9, 0.1], 3)
            .into_iter()
            .map(|p| p.source_id)
            .collect();
        let b: Vec<String> = index
            .query(&[0.3, 0.9, 0.1], 3)
            .into_iter()
            .map(|p| p.source_id)
            .collect();
        assert_eq!(a, b);
    }
}
