use rusqlite::{params, Connection};

use crate::db::executor::Executor;
use crate::error::{EngineError, Result};
use crate::graph::cycle;
use crate::models::Dependency;
use crate::store::task;
use crate::time;

/// Adds the edge "`task_id` is blocked by `blocks_on_id`" (spec §4.4.1).
/// Rejects self-edges, unknown endpoints, and anything that would close a
/// cycle, all before the row is inserted.
pub fn add_dependency(conn: &Connection, task_id: i64, blocks_on_id: i64) -> Result<Dependency> {
    if task_id == blocks_on_id {
        return Err(EngineError::invalid_input(
            "A task cannot depend on itself",
        ));
    }
    task::get_task(conn, task_id)?.ok_or_else(|| EngineError::task_not_found(task_id))?;
    task::get_task(conn, blocks_on_id)?.ok_or_else(|| EngineError::task_not_found(blocks_on_id))?;

    if cycle::would_create_cycle(conn, task_id, blocks_on_id)? {
        return Err(EngineError::cycle_detected());
    }

    let exec = Executor::new(conn);
    exec.exec(
        "INSERT INTO dependencies (task_id, blocks_on_id, created_at) VALUES (?1, ?2, ?3)",
        params![task_id, blocks_on_id, time::now()],
    )?;
    Ok(Dependency {
        task_id,
        blocks_on_id,
    })
}

/// Removes the exact edge `(task_id, blocks_on_id)`. Fails `InvalidData`
/// if it does not exist (spec §4.4.2).
pub fn remove_dependency(conn: &Connection, task_id: i64, blocks_on_id: i64) -> Result<()> {
    let exec = Executor::new(conn);
    let changed = exec.exec(
        "DELETE FROM dependencies WHERE task_id = ?1 AND blocks_on_id = ?2",
        params![task_id, blocks_on_id],
    )?;
    if changed == 0 {
        return Err(EngineError::invalid_data(format!(
            "No dependency from task {task_id} on task {blocks_on_id}"
        )));
    }
    Ok(())
}
