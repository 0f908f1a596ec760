use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Sessions idle for longer than this are torn down (memory + lock).
    /// `0` disables idle expiry.
    #[serde(default = "d_idle_timeout")]
    pub idle_timeout_minutes: u32,
    /// Interval of the background expiry sweep.
    #[serde(default = "d_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: d_idle_timeout(),
            sweep_interval_secs: d_sweep_interval(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_idle_timeout() -> u32 {
    60
}
fn d_sweep_interval() -> u64 {
    300
}
