use crate::config::RunDescriptor;
use crate::error::PostError;

// What one successful run produced besides its statistics files
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub run: RunDescriptor,
    pub cells: Vec<u64>,
    pub dof_flow: (i64, i64),
    pub dof_transport: (i64, i64),
    pub nan_rows: usize,
}

#[derive(Debug)]
pub struct RunFailure {
    pub run: RunDescriptor,
    pub error: PostError,
}

/// Per-run counters of one (method, grid) group, one row per run in run
/// order.
#[derive(Debug, Default)]
pub struct GroupCounts {
    pub cells: Vec<Vec<u64>>,
    pub dof_flow: Vec<Vec<i64>>,
    pub dof_transport: Vec<Vec<i64>>,
    pub failed: bool,
}

impl GroupCounts {
    pub fn add(&mut self, summary: &RunSummary) {
        self.cells.push(summary.cells.clone());
        self.dof_flow
            .push(vec![summary.dof_flow.0, summary.dof_flow.1]);
        self.dof_transport
            .push(vec![summary.dof_transport.0, summary.dof_transport.1]);
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<RunSummary>,
    pub failed: Vec<RunFailure>,
}

impl BatchReport {
    pub fn nan_rows(&self) -> usize {
        self.completed.iter().map(|s| s.nan_rows).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
