use rusqlite::Connection;

use crate::error::Result;

/// Applies the schema (spec §6). Idempotent: every statement is
/// `CREATE ... IF NOT EXISTS`, so calling this on an already-migrated
/// connection is a no-op. There is no migration-across-versions story;
/// schema evolution is out of scope (spec §1 Non-goals).
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            task_counter INTEGER NOT NULL DEFAULT 0 CHECK (task_counter >= 0),
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            execution_started_at INTEGER,
            completed_at INTEGER
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            plan_id INTEGER NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
            plan_task_number INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'open'
                CHECK (status IN ('open', 'in_progress', 'completed')),
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            started_at INTEGER,
            completed_at INTEGER,
            UNIQUE (plan_id, plan_task_number)
        );

        CREATE TABLE IF NOT EXISTS dependencies (
            task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            blocks_on_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            created_at INTEGER NOT NULL,
            PRIMARY KEY (task_id, blocks_on_id),
            CHECK (task_id != blocks_on_id)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_plan ON tasks(plan_id, plan_task_number);
        CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
        CREATE INDEX IF NOT EXISTS idx_deps_task ON dependencies(task_id);
        CREATE INDEX IF NOT EXISTS idx_deps_blocks_on ON dependencies(blocks_on_id);
        ",
    )?;
    Ok(())
}
