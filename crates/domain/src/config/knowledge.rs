use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Knowledge store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Pre-built JSONL index artifact: one `{source_id, text, embedding}`
    /// record per line. Built by an external step; read-only here.
    #[serde(default = "d_index_path")]
    pub index_path: PathBuf,
    /// Number of passages retrieved per query.
    #[serde(default = "d_top_k")]
    pub top_k: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            index_path: d_index_path(),
            top_k: d_top_k(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_index_path() -> PathBuf {
    PathBuf::from("data/knowledge/index.jsonl")
}
fn d_top_k() -> usize {
    3
}
