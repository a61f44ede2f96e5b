//! Subdivision limits.

use serde::{Deserialize, Serialize};

/// Limits that drive quadtree subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Deepest level a node may be subdivided to (the root is level 0).
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Leaf capacity before it subdivides. Leaves at `max_depth` may exceed it.
    #[serde(default = "default_max_child_count")]
    pub max_child_count: usize,
}

impl TreeConfig {
    pub const DEFAULT_MAX_DEPTH: u32 = 4;
    pub const DEFAULT_MAX_CHILD_COUNT: usize = 4;
    /// Deepest `max_depth` accepted from configuration. Straddling objects
    /// fan out to up to four times as many leaves per level.
    pub const DEPTH_LIMIT: u32 = 16;

    pub fn new(max_depth: u32, max_child_count: usize) -> Self {
        Self {
            max_depth,
            max_child_count,
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_child_count: default_max_child_count(),
        }
    }
}

fn default_max_depth() -> u32 {
    TreeConfig::DEFAULT_MAX_DEPTH
}
fn default_max_child_count() -> usize {
    TreeConfig::DEFAULT_MAX_CHILD_COUNT
}
