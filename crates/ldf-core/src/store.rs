//! Per-pool parameter overrides written by pool owners.

use std::collections::BTreeMap;

use crate::types::{ParamsWord, PoolId};

/// Storage for override params words, keyed by pool.
/// Entries are overwritten, never removed.
pub trait OverrideStore {
    fn get(&self, pool: &PoolId) -> Option<ParamsWord>;

    fn set(&mut self, pool: PoolId, params: ParamsWord);
}

/// In-process override store
#[derive(Debug, Clone, Default)]
pub struct InMemoryOverrideStore {
    entries: BTreeMap<PoolId, ParamsWord>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OverrideStore for InMemoryOverrideStore {
    fn get(&self, pool: &PoolId) -> Option<ParamsWord> {
        self.entries.get(pool).copied()
    }

    fn set(&mut self, pool: PoolId, params: ParamsWord) {
        self.entries.insert(pool, params);
    }
}
