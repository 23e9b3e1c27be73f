use std::collections::{HashSet, VecDeque};

use rusqlite::{params, Connection, Row};

use crate::error::Result;
use crate::models::{BlockedTask, RelatedTask, Task, TaskStatus, TaskWithPlan};

enum Direction {
    /// Follow `task_id -> blocks_on_id`: what does this task depend on.
    Blockers,
    /// Follow `blocks_on_id -> task_id`: what depends on this task.
    Dependents,
}

/// Transitive blockers of `task_id`, nearest first (spec §4.4.4). Each
/// node is visited once via BFS, so the reported depth is the shortest
/// path.
pub fn get_blockers(conn: &Connection, task_id: i64) -> Result<Vec<RelatedTask>> {
    bfs_related(conn, task_id, Direction::Blockers)
}

/// Transitive dependents of `task_id`, nearest first (spec §4.4.5).
pub fn get_dependents(conn: &Connection, task_id: i64) -> Result<Vec<RelatedTask>> {
    bfs_related(conn, task_id, Direction::Dependents)
}

fn bfs_related(conn: &Connection, start: i64, dir: Direction) -> Result<Vec<RelatedTask>> {
    let sql = match dir {
        Direction::Blockers => "SELECT blocks_on_id FROM dependencies WHERE task_id = ?1",
        Direction::Dependents => "SELECT task_id FROM dependencies WHERE blocks_on_id = ?1",
    };
    let mut stmt = conn.prepare(sql)?;

    let mut visited: HashSet<i64> = HashSet::new();
    let mut queue: VecDeque<(i64, i64)> = VecDeque::new();
    let mut out = Vec::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((node, depth)) = queue.pop_front() {
        let neighbors: Vec<i64> = stmt
            .query_map(params![node], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for n in neighbors {
            if visited.insert(n) {
                out.push(RelatedTask {
                    task_id: n,
                    depth: depth + 1,
                });
                queue.push_back((n, depth + 1));
            }
        }
    }

    out.sort_by(|a, b| a.depth.cmp(&b.depth).then(a.task_id.cmp(&b.task_id)));
    Ok(out)
}

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let status: String = row.get(5)?;
    Ok(Task {
        id: row.get(0)?,
        plan_id: row.get(1)?,
        plan_task_number: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        status: TaskStatus::from_str(&status).unwrap_or(TaskStatus::Open),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        started_at: row.get(8)?,
        completed_at: row.get(9)?,
    })
}

const TASK_COLUMNS: &str = "tasks.id, tasks.plan_id, tasks.plan_task_number, tasks.title, tasks.description, tasks.status, tasks.created_at, tasks.updated_at, tasks.started_at, tasks.completed_at";

/// Open tasks with no outstanding (non-completed) direct blocker,
/// ordered by `(plan_id, plan_task_number)` ascending (spec §4.4.6).
/// `limit` of `0` means unbounded.
pub fn get_ready_tasks(conn: &Connection, limit: i64) -> Result<Vec<TaskWithPlan>> {
    let sql_limit = if limit <= 0 { -1 } else { limit };
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS}, plans.slug FROM tasks
         JOIN plans ON plans.id = tasks.plan_id
         WHERE tasks.status = 'open'
           AND NOT EXISTS (
               SELECT 1 FROM dependencies d
               JOIN tasks blocker ON blocker.id = d.blocks_on_id
               WHERE d.task_id = tasks.id AND blocker.status != 'completed'
           )
         ORDER BY tasks.plan_id ASC, tasks.plan_task_number ASC
         LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![sql_limit], |row| {
        let task = row_to_task(row)?;
        let plan_slug: String = row.get(10)?;
        Ok(TaskWithPlan { task, plan_slug })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Open or in-progress tasks with at least one outstanding direct
/// blocker, each paired with that outstanding-blocker count, ordered by
/// count descending then task id ascending (spec §4.4.7).
pub fn get_blocked_tasks(conn: &Connection) -> Result<Vec<BlockedTask>> {
    let mut stmt = conn.prepare(
        "SELECT tasks.id, COUNT(*) FROM tasks
         JOIN dependencies d ON d.task_id = tasks.id
         JOIN tasks blocker ON blocker.id = d.blocks_on_id AND blocker.status != 'completed'
         WHERE tasks.status IN ('open', 'in_progress')
         GROUP BY tasks.id
         ORDER BY COUNT(*) DESC, tasks.id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(BlockedTask {
            task_id: row.get(0)?,
            blocker_count: row.get(1)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection;
    use crate::store::{plan, task};

    fn setup() -> Connection {
        connection::open_in_memory().unwrap()
    }

    #[test]
    fn diamond_dependents_report_shortest_depth() {
        let conn = setup();
        plan::create_plan(&conn, "p", "P", "", None).unwrap();
        let a = task::create_task(&conn, "p", "a", "").unwrap().task.id;
        let b = task::create_task(&conn, "p", "b", "").unwrap().task.id;
        let c = task::create_task(&conn, "p", "c", "").unwrap().task.id;
        let d = task::create_task(&conn, "p", "d", "").unwrap().task.id;

        // d depends on b and c; b and c each depend on a.
        super::super::dependency::add_dependency(&conn, b, a).unwrap();
        super::super::dependency::add_dependency(&conn, c, a).unwrap();
        super::super::dependency::add_dependency(&conn, d, b).unwrap();
        super::super::dependency::add_dependency(&conn, d, c).unwrap();

        let dependents = get_dependents(&conn, a).unwrap();
        let depths: std::collections::HashMap<i64, i64> =
            dependents.iter().map(|r| (r.task_id, r.depth)).collect();
        assert_eq!(depths[&b], 1);
        assert_eq!(depths[&c], 1);
        assert_eq!(depths[&d], 2);
        assert_eq!(dependents.len(), 3);
    }

    #[test]
    fn ready_tasks_flip_when_blocker_completes() {
        let conn = setup();
        plan::create_plan(&conn, "p", "P", "", None).unwrap();
        let a = task::create_task(&conn, "p", "a", "").unwrap().task.id;
        let b = task::create_task(&conn, "p", "b", "").unwrap().task.id;
        super::super::dependency::add_dependency(&conn, b, a).unwrap();

        let ready = get_ready_tasks(&conn, 0).unwrap();
        assert_eq!(ready.iter().map(|t| t.task.id).collect::<Vec<_>>(), vec![a]);

        task::complete_task(&conn, a).unwrap();
        let ready = get_ready_tasks(&conn, 0).unwrap();
        assert_eq!(ready.iter().map(|t| t.task.id).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn blocked_tasks_ordered_by_outstanding_count_then_id() {
        let conn = setup();
        plan::create_plan(&conn, "p", "P", "", None).unwrap();
        let a = task::create_task(&conn, "p", "a", "").unwrap().task.id;
        let b = task::create_task(&conn, "p", "b", "").unwrap().task.id;
        let target1 = task::create_task(&conn, "p", "t1", "").unwrap().task.id;
        let target2 = task::create_task(&conn, "p", "t2", "").unwrap().task.id;

        super::super::dependency::add_dependency(&conn, target1, a).unwrap();
        super::super::dependency::add_dependency(&conn, target2, a).unwrap();
        super::super::dependency::add_dependency(&conn, target2, b).unwrap();

        let blocked = get_blocked_tasks(&conn).unwrap();
        assert_eq!(blocked[0].task_id, target2);
        assert_eq!(blocked[0].blocker_count, 2);
        assert_eq!(blocked[1].task_id, target1);
        assert_eq!(blocked[1].blocker_count, 1);
    }
}
