//! Media resolution service wire types and stale-response tracking.

use serde::{Deserialize, Serialize};

use crate::hand::Hand;

#[derive(Clone, Debug, Serialize)]
pub struct ResolveRequest<'a> {
    pub url: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ResolveResponse {
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Per-hand monotonic request generations. A superseding request bumps the
/// generation, so a slow earlier response can no longer clobber a faster
/// later one; stale responses are simply discarded.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResolveTracker {
    generations: [u64; 2],
}

impl ResolveTracker {
    pub fn begin(&mut self, hand: Hand) -> u64 {
        self.generations[hand.index()] += 1;
        self.generations[hand.index()]
    }

    #[inline]
    pub fn is_current(&self, hand: Hand, generation: u64) -> bool {
        self.generations[hand.index()] == generation
    }
}
