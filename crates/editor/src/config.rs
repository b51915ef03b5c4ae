#![forbid(unsafe_code)]

use nb_bridge::DEFAULT_CALL_TIMEOUT;
use std::time::Duration;

/// Area in which new nodes are dropped, starting at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub width: f64,
    pub height: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// Upper bound for a single bridge call before it is reported as failed.
    pub call_timeout: Duration,
    pub placement: Placement,
    /// Fixed seed for node placement; `None` draws from OS entropy.
    pub placement_seed: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            placement: Placement::default(),
            placement_seed: None,
        }
    }
}
