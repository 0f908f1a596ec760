//! The knowledge store: a static semantic index over the mental-health
//! corpus, plus the retriever that couples it to an embedder.
//!
//! The index is built offline and loaded once at process start; there is
//! no write path here.

pub mod index;
pub mod retriever;

pub use index::{KnowledgeIndex, Passage};
pub use retriever::Retriever;
