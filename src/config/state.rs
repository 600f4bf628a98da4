use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted bookkeeping (state.toml)
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    /// Stored invoice count per order reference
    #[serde(default)]
    pub invoice_counts: BTreeMap<String, usize>,
}

impl State {
    /// Store `count` for `order`. Returns true if the stored value changed.
    pub fn sync_count(&mut self, order: &str, count: usize) -> bool {
        match self.invoice_counts.get(order) {
            Some(&stored) if stored == count => false,
            _ => {
                self.invoice_counts.insert(order.to_string(), count);
                true
            }
        }
    }

    pub fn is_stale(&self, order: &str, live_count: usize) -> bool {
        self.invoice_counts.get(order) != Some(&live_count)
    }

    /// Drop stored counts for orders not in `known`. Returns how many were dropped.
    pub fn retain_orders<'a, I>(&mut self, known: I) -> usize
    where
        I: IntoIterator<Item = &'a String>,
    {
        let known: Vec<&String> = known.into_iter().collect();
        let before = self.invoice_counts.len();
        self.invoice_counts.retain(|order, _| known.contains(&order));
        before - self.invoice_counts.len()
    }
}
