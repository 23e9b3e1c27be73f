use serde::{Deserialize, Serialize};

/// A directed edge "task A is blocked by task B" (spec §3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dependency {
    pub task_id: i64,
    pub blocks_on_id: i64,
}

/// One entry of a `getBlockers`/`getDependents` result: a related task at
/// a given shortest-path depth (spec §4.4.4, §4.4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedTask {
    pub task_id: i64,
    pub depth: i64,
}

/// One entry of a `getBlockedTasks` result: a task paired with its direct
/// (non-transitive) blocker count (spec §4.4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedTask {
    pub task_id: i64,
    pub blocker_count: i64,
}
