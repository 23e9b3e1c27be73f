use rusqlite::Connection;

use crate::error::Result;
use crate::models::{HealthEntry, HealthReport};

/// Integrity sweep over the whole store (spec §4.7). Everything in
/// `errors` should be unreachable if the engine's own invariants hold;
/// finding one here means a write path has a bug, not that the caller
/// did something wrong.
pub fn health_check(conn: &Connection) -> Result<HealthReport> {
    let mut report = HealthReport::default();

    check_orphan_edges(conn, &mut report)?;
    check_cycles(conn, &mut report)?;
    check_completed_without_timestamp(conn, &mut report)?;
    check_zero_task_plans(conn, &mut report)?;
    check_empty_descriptions(conn, &mut report)?;

    Ok(report)
}

fn check_orphan_edges(conn: &Connection, report: &mut HealthReport) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT d.task_id, d.blocks_on_id FROM dependencies d
         LEFT JOIN tasks t1 ON t1.id = d.task_id
         LEFT JOIN tasks t2 ON t2.id = d.blocks_on_id
         WHERE t1.id IS NULL OR t2.id IS NULL",
    )?;
    let rows: Vec<(i64, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<_>>()?;
    for (task_id, blocks_on_id) in rows {
        report.errors.push(
            HealthEntry::new("orphan_edge", "Dependency edge references a missing task")
                .with_detail(format!("{task_id} -> {blocks_on_id}")),
        );
    }
    Ok(())
}

/// Cycles should be impossible given `graph::dependency::add_dependency`
/// always pre-checks before insert; this walks the graph independently
/// of that code path so a write-path bug doesn't go unnoticed.
fn check_cycles(conn: &Connection, report: &mut HealthReport) -> Result<()> {
    let mut stmt = conn.prepare("SELECT DISTINCT task_id FROM dependencies")?;
    let nodes: Vec<i64> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;

    for node in nodes {
        if reachable_from_self(conn, node)? {
            report
                .errors
                .push(HealthEntry::new("cycle", "Dependency graph contains a cycle"));
            break;
        }
    }
    Ok(())
}

fn reachable_from_self(conn: &Connection, start: i64) -> Result<bool> {
    use std::collections::{HashSet, VecDeque};
    let mut stmt = conn.prepare("SELECT blocks_on_id FROM dependencies WHERE task_id = ?1")?;
    let mut visited: HashSet<i64> = HashSet::new();
    let mut queue: VecDeque<i64> = VecDeque::new();
    let next: Vec<i64> = stmt
        .query_map(rusqlite::params![start], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;
    for n in next {
        queue.push_back(n);
        visited.insert(n);
    }
    while let Some(node) = queue.pop_front() {
        if node == start {
            return Ok(true);
        }
        let next: Vec<i64> = stmt
            .query_map(rusqlite::params![node], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        for n in next {
            if visited.insert(n) {
                queue.push_back(n);
            }
        }
    }
    Ok(false)
}

fn check_completed_without_timestamp(conn: &Connection, report: &mut HealthReport) -> Result<()> {
    let mut stmt =
        conn.prepare("SELECT id FROM tasks WHERE status = 'completed' AND completed_at IS NULL")?;
    let ids: Vec<i64> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;
    for id in ids {
        report.errors.push(
            HealthEntry::new(
                "completed_without_timestamp",
                "Task is completed but has no completed_at",
            )
            .with_detail(id.to_string()),
        );
    }
    Ok(())
}

fn check_zero_task_plans(conn: &Connection, report: &mut HealthReport) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT slug FROM plans WHERE id NOT IN (SELECT DISTINCT plan_id FROM tasks)",
    )?;
    let slugs: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;
    for slug in slugs {
        report.warnings.push(
            HealthEntry::new("empty_plan", "Plan has no tasks").with_detail(slug),
        );
    }
    Ok(())
}

fn check_empty_descriptions(conn: &Connection, report: &mut HealthReport) -> Result<()> {
    let mut stmt = conn.prepare("SELECT id FROM tasks WHERE description = ''")?;
    let ids: Vec<i64> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;
    for id in ids {
        report.warnings.push(
            HealthEntry::new("empty_description", "Task has an empty description")
                .with_detail(id.to_string()),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection;
    use crate::store::{plan, task};

    #[test]
    fn clean_store_is_healthy() {
        let conn = connection::open_in_memory().unwrap();
        plan::create_plan(&conn, "p", "P", "", None).unwrap();
        task::create_task(&conn, "p", "a", "something").unwrap();
        let report = health_check(&conn).unwrap();
        assert!(report.is_healthy());
    }

    #[test]
    fn empty_plan_and_empty_description_are_warnings_not_errors() {
        let conn = connection::open_in_memory().unwrap();
        plan::create_plan(&conn, "p", "P", "", None).unwrap();
        plan::create_plan(&conn, "q", "Q", "", None).unwrap();
        task::create_task(&conn, "p", "a", "").unwrap();
        let report = health_check(&conn).unwrap();
        assert!(report.is_healthy());
        assert!(report.warnings.iter().any(|w| w.check == "empty_plan"));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.check == "empty_description"));
    }
}
