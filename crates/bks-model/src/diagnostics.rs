//! Row accounting for a pipeline run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rejection::{RejectReason, RejectedRow};
use crate::source::SourceKind;
use crate::state::PipelineState;

/// Per-source counters.
///
/// `accepted` counts rows that reached the source's final output: the
/// canonical book/user set, or the joined dataset for orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDiagnostics {
    pub source: SourceKind,
    pub rows_read: usize,
    pub normalized: usize,
    pub validated: usize,
    pub unique: usize,
    pub coerced: usize,
    pub accepted: usize,
    pub rejected: BTreeMap<RejectReason, usize>,
}

impl SourceDiagnostics {
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            rows_read: 0,
            normalized: 0,
            validated: 0,
            unique: 0,
            coerced: 0,
            accepted: 0,
            rejected: BTreeMap::new(),
        }
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn rejected_for(&self, reason: RejectReason) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }

    /// `rows_read == accepted + rejected`.
    pub fn is_balanced(&self) -> bool {
        self.rows_read == self.accepted + self.rejected_total()
    }
}

/// Structured summary of a run, returned even when the run fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub books: SourceDiagnostics,
    pub users: SourceDiagnostics,
    pub orders: SourceDiagnostics,
    /// Rows in the canonical dataset.
    pub final_rows: usize,
    /// Last state reached.
    pub state: PipelineState,
    /// Stages that finished, in order.
    pub completed_stages: Vec<PipelineState>,
    pub rejected_rows: Vec<RejectedRow>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            books: SourceDiagnostics::new(SourceKind::Books),
            users: SourceDiagnostics::new(SourceKind::Users),
            orders: SourceDiagnostics::new(SourceKind::Orders),
            final_rows: 0,
            state: PipelineState::Idle,
            completed_stages: Vec::new(),
            rejected_rows: Vec::new(),
        }
    }
}

impl Diagnostics {
    pub fn source(&self, kind: SourceKind) -> &SourceDiagnostics {
        match kind {
            SourceKind::Books => &self.books,
            SourceKind::Users => &self.users,
            SourceKind::Orders => &self.orders,
        }
    }

    pub fn source_mut(&mut self, kind: SourceKind) -> &mut SourceDiagnostics {
        match kind {
            SourceKind::Books => &mut self.books,
            SourceKind::Users => &mut self.users,
            SourceKind::Orders => &mut self.orders,
        }
    }

    pub fn sources(&self) -> [&SourceDiagnostics; 3] {
        [&self.books, &self.users, &self.orders]
    }

    pub fn record_rejection(&mut self, row: RejectedRow) {
        *self
            .source_mut(row.source)
            .rejected
            .entry(row.reason)
            .or_insert(0) += 1;
        self.rejected_rows.push(row);
    }

    pub fn rows_read(&self) -> usize {
        self.sources().iter().map(|s| s.rows_read).sum()
    }

    pub fn rejected_total(&self) -> usize {
        self.sources().iter().map(|s| s.rejected_total()).sum()
    }

    /// Rejections summed across sources.
    pub fn rejected_by_reason(&self) -> BTreeMap<RejectReason, usize> {
        let mut totals = BTreeMap::new();
        for source in self.sources() {
            for (reason, count) in &source.rejected {
                *totals.entry(*reason).or_insert(0) += count;
            }
        }
        totals
    }

    pub fn has_rejections(&self) -> bool {
        self.rejected_total() > 0
    }

    /// Every source balances and the orders stream accounts for the dataset.
    pub fn is_balanced(&self) -> bool {
        self.sources().iter().all(|s| s.is_balanced()) && self.orders.accepted == self.final_rows
    }

    pub fn mark_completed(&mut self, stage: PipelineState) {
        self.completed_stages.push(stage);
    }
}
