//! Data cleaning module.
//!
//! This module provides the two structural cleaning steps:
//! - Dropping columns whose missing ratio exceeds a threshold ([`ColumnPruner`])
//! - Removing duplicate rows ([`Deduplicator`])

mod deduplicator;
mod pruner;

pub use deduplicator::{DedupOutcome, Deduplicator};
pub use pruner::{ColumnPruner, PruneOutcome};
