use serde::Serialize;

/// Breakdown returned by the stats operation.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UserStats {
    pub total_users: usize,
    /// Records whose email belongs to the fixed seed set.
    pub default_users: usize,
    pub registered_users: usize,
}
