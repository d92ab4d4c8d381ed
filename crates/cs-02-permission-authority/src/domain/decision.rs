use serde::{Deserialize, Serialize};

/// Answer of the permission authority for a `(caller, subject)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionDecision {
    /// Zero means the query itself succeeded.
    pub error_code: u64,
    /// Permission level granted to the subject.
    pub level: u64,
}

impl PermissionDecision {
    /// Successful answer granting `level`.
    pub fn granted(level: u64) -> Self {
        Self {
            error_code: 0,
            level,
        }
    }

    /// Answer carrying a non-zero error code.
    pub fn failed(error_code: u64) -> Self {
        Self {
            error_code,
            level: 0,
        }
    }
}
