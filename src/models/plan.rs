use serde::{Deserialize, Serialize};

/// A named grouping of tasks (spec §3). Status is *derived* from its
/// tasks, not stored — see `PlanStatus::derive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub task_counter: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub execution_started_at: Option<i64>,
    pub completed_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Open,
    InProgress,
    Completed,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Derive plan status from its task counts (spec §4.2):
    /// `completed` iff the plan has >=1 task and all are completed;
    /// `in_progress` iff any task is in_progress, or some but not all are
    /// completed; `open` otherwise.
    pub fn derive(total: i64, in_progress: i64, completed: i64) -> Self {
        if total > 0 && completed == total {
            Self::Completed
        } else if in_progress > 0 || (completed > 0 && completed < total) {
            Self::InProgress
        } else {
            Self::Open
        }
    }
}

/// A plan plus its aggregated task counts (the `getPlanSummary` shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub plan: Plan,
    pub status: PlanStatus,
    pub total_tasks: i64,
    pub open_tasks: i64,
    pub in_progress_tasks: i64,
    pub completed_tasks: i64,
}
