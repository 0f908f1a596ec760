//! Couples the embedder to the index: embed the query text, search top-k.

use std::sync::Arc;

use mw_domain::error::{Error, Result};
use mw_providers::{EmbeddingsRequest, LlmProvider};

use crate::index::{KnowledgeIndex, Passage};

/// Per-query retrieval over the loaded index.
///
/// The index and the embedder handle are both read-only and shared
/// across sessions; a retriever is cheap to clone.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<KnowledgeIndex>,
    embedder: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl Retriever {
    pub fn new(index: Arc<KnowledgeIndex>, embedder: Arc<dyn LlmProvider>, top_k: usize) -> Self {
        Self {
            index,
            embedder,
            top_k,
        }
    }

    /// Number of passages in the underlying index.
    pub fn passage_count(&self) -> usize {
        self.index.len()
    }

    /// Embed `text` and return the top-k passages.
    ///
    /// A failed or dimensionally wrong embedding is an error for the
    /// calling turn, not for the pipeline.
    pub async fn retrieve(&self, text: &str) -> Result<Vec<Passage>> {
        let resp = self
            .embedder
            .embeddings(EmbeddingsRequest {
                input: vec![text.to_string()],
                model: None,
            })
            .await?;

        let vector = resp
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Knowledge("embedder returned no vector".into()))?;

        if vector.len() != self.index.dim() {
            return Err(Error::Knowledge(format!(
                "query embedding dimension {} does not match index dimension {}",
                vector.len(),
                self.index.dim()
            )));
        }

        Ok(self.index.query(&vector, self.top_k))
    }
}
