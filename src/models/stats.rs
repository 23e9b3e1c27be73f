use serde::{Deserialize, Serialize};

/// System-wide aggregate counts (spec §4.6). Invariants: `open_tasks +
/// in_progress_tasks + completed_tasks == total_tasks`, and
/// `ready_tasks + blocked_tasks <= open_tasks + in_progress_tasks`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_plans: i64,
    pub completed_plans: i64,
    pub total_tasks: i64,
    pub open_tasks: i64,
    pub in_progress_tasks: i64,
    pub completed_tasks: i64,
    pub ready_tasks: i64,
    pub blocked_tasks: i64,
}
