//! Result types reported by executors

/// Outcome of a single executed statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementResult {
    /// Rows changed by the statement (always zero for DDL)
    pub affected_rows: u64,
}

impl StatementResult {
    pub fn new(affected_rows: u64) -> Self {
        Self { affected_rows }
    }
}
