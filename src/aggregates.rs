use rusqlite::Connection;

use crate::error::Result;
use crate::graph;
use crate::models::SystemStats;

/// System-wide counts across every plan and task (spec §4.6).
pub fn get_system_stats(conn: &Connection) -> Result<SystemStats> {
    let (total_plans, completed_plans): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(
             EXISTS (SELECT 1 FROM tasks WHERE tasks.plan_id = plans.id)
             AND NOT EXISTS (
                 SELECT 1 FROM tasks WHERE tasks.plan_id = plans.id AND tasks.status != 'completed'
             )
         ), 0) FROM plans",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let (total_tasks, open_tasks, in_progress_tasks, completed_tasks): (i64, i64, i64, i64) = conn
        .query_row(
            "SELECT
                COUNT(*),
                COALESCE(SUM(status = 'open'), 0),
                COALESCE(SUM(status = 'in_progress'), 0),
                COALESCE(SUM(status = 'completed'), 0)
             FROM tasks",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

    let ready_tasks = graph::get_ready_tasks(conn, 0)?.len() as i64;
    let blocked_tasks = graph::get_blocked_tasks(conn)?.len() as i64;

    Ok(SystemStats {
        total_plans,
        completed_plans,
        total_tasks,
        open_tasks,
        in_progress_tasks,
        completed_tasks,
        ready_tasks,
        blocked_tasks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection;
    use crate::store::{plan, task};

    #[test]
    fn counts_match_a_small_fixture() {
        let conn = connection::open_in_memory().unwrap();
        plan::create_plan(&conn, "p", "P", "", None).unwrap();
        let a = task::create_task(&conn, "p", "a", "").unwrap().task.id;
        let b = task::create_task(&conn, "p", "b", "").unwrap().task.id;
        graph::add_dependency(&conn, b, a).unwrap();
        task::start_task(&conn, a).unwrap();

        let stats = get_system_stats(&conn).unwrap();
        assert_eq!(stats.total_plans, 1);
        assert_eq!(stats.completed_plans, 0);
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.open_tasks, 1);
        assert_eq!(stats.in_progress_tasks, 1);
        assert_eq!(stats.completed_tasks, 0);
        assert_eq!(stats.ready_tasks, 0);
        assert_eq!(stats.blocked_tasks, 1);
    }
}
