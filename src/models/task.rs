use serde::{Deserialize, Serialize};

/// Three-state task lifecycle (spec §3, §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A unit of work within a plan (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub plan_id: i64,
    pub plan_task_number: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
}

/// A task joined with its owning plan's slug, used wherever a human-facing
/// canonical identifier is needed (spec §4.3 `getTask`, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithPlan {
    pub task: Task,
    pub plan_slug: String,
}

impl TaskWithPlan {
    /// The canonical `slug:NNN` identifier (spec §4.5), zero-padded to at
    /// least 3 digits.
    pub fn canonical_id(&self) -> String {
        format!("{}:{:03}", self.plan_slug, self.task.plan_task_number)
    }
}
