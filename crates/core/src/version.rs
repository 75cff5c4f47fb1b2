//! Optimistic concurrency expectations for versioned records and streams.

use crate::error::{InventoryError, InventoryResult};

/// Expected version of a record or movement stream at write time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (first write, or idempotent maintenance paths).
    Any,
    /// Require the record/stream to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> InventoryResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(InventoryError::conflict(format!(
                "version check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
