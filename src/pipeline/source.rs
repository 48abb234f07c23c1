//! Source sequence
//!
//! Ordered, immutable-once-built sequence of items handed to the producer.
//! Entries may be absent; the producer skips those with a warning.

use std::sync::Arc;

use crate::error::{PipelineError, PipelineResult};

/// Ordered source of items for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSequence {
    entries: Arc<[Option<i64>]>,
}

impl SourceSequence {
    /// `[1, 2, ..., count]`
    pub fn from_count(count: usize) -> PipelineResult<Self> {
        let upper = i64::try_from(count)
            .map_err(|_| PipelineError::configuration(format!("Item count {} is too large", count)))?;
        Ok(Self {
            entries: (1..=upper).map(Some).collect(),
        })
    }

    /// Copy of a caller-supplied ordered list
    pub fn from_items(items: &[i64]) -> Self {
        Self {
            entries: items.iter().copied().map(Some).collect(),
        }
    }

    /// Caller-supplied entries, some of which may be absent
    pub fn from_entries(entries: Vec<Option<i64>>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Every entry, absent ones included
    pub fn entries(&self) -> &[Option<i64>] {
        &self.entries
    }

    /// Shared handle to the entries, for handing to the producer thread
    pub(crate) fn shared_entries(&self) -> Arc<[Option<i64>]> {
        Arc::clone(&self.entries)
    }

    /// Independent copy of the present items, in order
    pub fn present(&self) -> Vec<i64> {
        self.entries.iter().flatten().copied().collect()
    }

    /// Number of present items; what a lossless run transfers
    pub fn present_len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Number of absent entries
    pub fn absent_len(&self) -> usize {
        self.entries.len() - self.present_len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SourceSequence {
    fn default() -> Self {
        Self::from_entries(Vec::new())
    }
}
