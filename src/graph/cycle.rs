use std::collections::{HashSet, VecDeque};

use rusqlite::{params, Connection};

use crate::error::Result;

/// Would inserting the edge `(proposed_task, proposed_blocker)` — "task
/// is blocked by blocker" — create a cycle? Per spec §4.4.3 this is
/// answered by asking whether `proposed_task` is reachable from
/// `proposed_blocker` over the *existing* edges, following the
/// dependency direction (`task_id -> blocks_on_id`). A self-edge always
/// counts as a cycle.
///
/// BFS visits each node at most once, bounding the search to the size of
/// the existing graph regardless of how many paths connect two nodes.
pub fn would_create_cycle(conn: &Connection, proposed_task: i64, proposed_blocker: i64) -> Result<bool> {
    if proposed_task == proposed_blocker {
        return Ok(true);
    }

    let mut stmt = conn.prepare("SELECT blocks_on_id FROM dependencies WHERE task_id = ?1")?;
    let mut visited: HashSet<i64> = HashSet::new();
    let mut queue: VecDeque<i64> = VecDeque::new();
    queue.push_back(proposed_blocker);
    visited.insert(proposed_blocker);

    while let Some(node) = queue.pop_front() {
        if node == proposed_task {
            return Ok(true);
        }
        let next: Vec<i64> = stmt
            .query_map(params![node], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for n in next {
            if visited.insert(n) {
                queue.push_back(n);
            }
        }
    }
    Ok(false)
}
