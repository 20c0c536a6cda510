use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The addresses associated with one crawl depth.
///
/// Records are built by accumulating addresses and then sealed; once a record has been pushed
/// into a [`VisitedIndex`] it is only ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthRecord {
    pub depth: usize,
    pub addresses: Vec<String>,
}

impl DepthRecord {
    pub fn new(depth: usize, addresses: Vec<String>) -> Self {
        Self { depth, addresses }
    }

    pub fn empty(depth: usize) -> Self {
        Self::new(depth, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }
}

/// Every finalized [`DepthRecord`] so far, in depth order.
///
/// Workers receive this behind an `Arc` and can only query it; the crawler appends to it
/// between rounds.
#[derive(Debug, Clone, Default)]
pub struct VisitedIndex {
    records: Vec<DepthRecord>,
    seen: HashSet<String>,
}

impl VisitedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if any finalized record holds `key` (a `host + path` string).
    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn records(&self) -> &[DepthRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn push(&mut self, record: DepthRecord) {
        self.seen.extend(record.addresses.iter().cloned());
        self.records.push(record);
    }

    pub fn into_records(self) -> Vec<DepthRecord> {
        self.records
    }
}

impl FromIterator<DepthRecord> for VisitedIndex {
    fn from_iter<I: IntoIterator<Item = DepthRecord>>(iter: I) -> Self {
        let mut index = VisitedIndex::new();
        for record in iter {
            index.push(record);
        }
        index
    }
}

/// What one worker produced during a round. Owned by the worker until it is joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerResult {
    /// `host + path` of every address the worker attempted.
    pub visited: Vec<String>,
    /// Raw candidate links not already present in the [`VisitedIndex`].
    pub discovered: Vec<String>,
}
