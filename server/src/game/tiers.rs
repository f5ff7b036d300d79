//! Tier → balancing score lookup.

use std::collections::HashMap;

use super::types::UNRANKED;

/// Score for any tier the table does not list, `UNRANKED` included.
pub const FALLBACK_SCORE: i32 = 50;

const DEFAULT_SCORES: [(&str, i32); 8] = [
    ("IRON", 100),
    ("BRONZE", 200),
    ("SILVER", 300),
    ("GOLD", 400),
    ("PLATINUM", 500),
    ("EMERALD", 600),
    ("DIAMOND", 700),
    ("MASTER", 800),
];

/// Immutable tier table. Built once at start-up and handed to the balancer.
#[derive(Debug, Clone)]
pub struct TierTable {
    scores: HashMap<String, i32>,
    fallback: i32,
}

impl TierTable {
    /// Build a table from `(tier, score)` pairs. Tier names are matched
    /// case-insensitively.
    pub fn new<I, S>(entries: I, fallback: i32) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: AsRef<str>,
    {
        let scores = entries
            .into_iter()
            .map(|(tier, score)| (tier.as_ref().to_ascii_uppercase(), score))
            .collect();
        Self { scores, fallback }
    }

    /// Score of a tier. `None` is read as `UNRANKED`.
    pub fn score(&self, tier: Option<&str>) -> i32 {
        let tier = tier.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(UNRANKED);
        self.scores
            .get(&tier.to_ascii_uppercase())
            .copied()
            .unwrap_or(self.fallback)
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::new(DEFAULT_SCORES, FALLBACK_SCORE)
    }
}
