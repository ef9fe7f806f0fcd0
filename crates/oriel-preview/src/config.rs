//! Preview configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the shared surface and preview activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Base address of the embedded live-coding tool.
    pub tool_base_url: String,

    /// Edge length of the square surface viewport, in logical units.
    pub surface_edge: u32,

    /// Fraction of a placeholder that must be visible to activate.
    pub visibility_threshold: f64,

    /// Delay between claiming the surface and redirecting it, giving the
    /// embedded tool's own init sequence time to settle.
    pub settle_delay_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            tool_base_url: "https://hydra.ojack.xyz/".to_string(),
            surface_edge: 512,
            visibility_threshold: 0.5,
            settle_delay_ms: 60,
        }
    }
}
