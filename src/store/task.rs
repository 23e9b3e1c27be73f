use rusqlite::{params, Connection, Row};

use crate::db::executor::Executor;
use crate::error::{EngineError, Result};
use crate::models::{Task, TaskStatus, TaskWithPlan};
use crate::store::plan;
use crate::time;
use crate::validation;

const TASK_COLUMNS: &str = "tasks.id, tasks.plan_id, tasks.plan_task_number, tasks.title, tasks.description, tasks.status, tasks.created_at, tasks.updated_at, tasks.started_at, tasks.completed_at";

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

fn row_to_task_with_plan(row: &Row) -> rusqlite::Result<TaskWithPlan> {
    let task = row_to_task(row)?;
    let plan_slug: String = row.get(10)?;
    Ok(TaskWithPlan { task, plan_slug })
}

/// Creates a task in one transaction: resolves slug -> plan_id, allocates
/// `plan_task_number = task_counter + 1`, and bumps the counter (spec
/// §4.3). Fails `InvalidData` if the plan is missing.
pub fn create_task(
    conn: &Connection,
    plan_slug: &str,
    title: &str,
    description: &str,
) -> Result<TaskWithPlan> {
    validation::validate_title(title)?;
    validation::validate_description(description)?;

    let exec = Executor::new(conn);
    let task_id = exec.transaction(|| {
        let plan_id = plan::get_plan_id_from_slug(conn, plan_slug)?;
        let counter: i64 = exec
            .query_one(
                "SELECT task_counter FROM plans WHERE id = ?1",
                params![plan_id],
                |row| row.get(0),
            )?
            .ok_or_else(|| EngineError::plan_not_found(plan_slug))?;
        let next_number = counter + 1;
        let now = time::now();

        exec.exec(
            "INSERT INTO tasks (plan_id, plan_task_number, title, description, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 'open', ?5, ?5)",
            params![plan_id, next_number, title, description, now],
        )?;
        let task_id = conn.last_insert_rowid();

        exec.exec(
            "UPDATE plans SET task_counter = ?1, updated_at = ?2 WHERE id = ?3",
            params![next_number, now, plan_id],
        )?;
        Ok(task_id)
    })?;

    get_task(conn, task_id)?.ok_or_else(|| EngineError::task_not_found(task_id))
}

/// Returns the task joined with its owning plan's slug; `None` if unknown
/// (spec §4.3).
pub fn get_task(conn: &Connection, task_id: i64) -> Result<Option<TaskWithPlan>> {
    let exec = Executor::new(conn);
    exec.query_one(
        &format!(
            "SELECT {TASK_COLUMNS}, plans.slug FROM tasks
             JOIN plans ON plans.id = tasks.plan_id
             WHERE tasks.id = ?1"
        ),
        params![task_id],
        row_to_task_with_plan,
    )
}

/// Returns the task id for a plan slug + `plan_task_number`; `None` if
/// unknown (spec §4.3).
pub fn get_task_by_plan_and_number(conn: &Connection, slug: &str, n: i64) -> Result<Option<i64>> {
    let exec = Executor::new(conn);
    exec.query_one(
        "SELECT tasks.id FROM tasks
         JOIN plans ON plans.id = tasks.plan_id
         WHERE plans.slug = ?1 AND tasks.plan_task_number = ?2",
        params![slug, n],
        |row| row.get(0),
    )
}

/// Lists tasks ordered by (plan_id, plan_task_number) ascending. Status
/// and plan-slug filters are independent and both honoured (spec §4.3).
pub fn list_tasks(
    conn: &Connection,
    status: Option<TaskStatus>,
    slug: Option<&str>,
) -> Result<Vec<TaskWithPlan>> {
    let exec = Executor::new(conn);
    let mut sql = format!(
        "SELECT {TASK_COLUMNS}, plans.slug FROM tasks JOIN plans ON plans.id = tasks.plan_id WHERE 1=1"
    );
    if status.is_some() {
        sql.push_str(" AND tasks.status = ?1");
    }
    if slug.is_some() {
        sql.push_str(if status.is_some() {
            " AND plans.slug = ?2"
        } else {
            " AND plans.slug = ?1"
        });
    }
    sql.push_str(" ORDER BY tasks.plan_id ASC, tasks.plan_task_number ASC");

    match (status, slug) {
        (Some(s), Some(slug)) => {
            exec.query_all(&sql, params![s.as_str(), slug], row_to_task_with_plan)
        }
        (Some(s), None) => exec.query_all(&sql, params![s.as_str()], row_to_task_with_plan),
        (None, Some(slug)) => exec.query_all(&sql, params![slug], row_to_task_with_plan),
        (None, None) => exec.query_all(&sql, [], row_to_task_with_plan),
    }
}

/// Partial update with state-machine semantics (spec §4.3 table). Any
/// transition updates `updated_at`. Fails `InvalidData` if the task does
/// not exist.
pub fn update_task(
    conn: &Connection,
    task_id: i64,
    title: Option<&str>,
    description: Option<&str>,
    status: Option<TaskStatus>,
) -> Result<Task> {
    if let Some(t) = title {
        validation::validate_title(t)?;
    }
    if let Some(d) = description {
        validation::validate_description(d)?;
    }

    let current = get_task(conn, task_id)?
        .ok_or_else(|| EngineError::task_not_found(task_id))?
        .task;
    let new_title = title.unwrap_or(&current.title);
    let new_description = description.unwrap_or(&current.description);
    let new_status = status.unwrap_or(current.status);
    let now = time::now();

    let (started_at, completed_at) = if new_status == current.status {
        (current.started_at, current.completed_at)
    } else {
        next_timestamps(&current, new_status, now)
    };

    let exec = Executor::new(conn);
    let changed = exec.exec(
        "UPDATE tasks SET title = ?1, description = ?2, status = ?3,
             started_at = ?4, completed_at = ?5, updated_at = ?6
         WHERE id = ?7",
        params![
            new_title,
            new_description,
            new_status.as_str(),
            started_at,
            completed_at,
            now,
            task_id
        ],
    )?;
    if changed == 0 {
        return Err(EngineError::task_not_found(task_id));
    }
    Ok(get_task(conn, task_id)?.expect("just updated").task)
}

/// `open`/`in_progress` -> `in_progress` (spec §4.3 convenience wrapper).
pub fn start_task(conn: &Connection, task_id: i64) -> Result<Task> {
    update_task(conn, task_id, None, None, Some(TaskStatus::InProgress))
}

/// -> `completed` (spec §4.3 convenience wrapper).
pub fn complete_task(conn: &Connection, task_id: i64) -> Result<Task> {
    update_task(conn, task_id, None, None, Some(TaskStatus::Completed))
}

/// -> `open` (spec §4.3 convenience wrapper; "reopening").
pub fn reopen_task(conn: &Connection, task_id: i64) -> Result<Task> {
    update_task(conn, task_id, None, None, Some(TaskStatus::Open))
}

/// Computes `(started_at, completed_at)` for a transition into
/// `new_status`, implementing the state-machine table of spec §4.3 / I5:
/// `in_progress` always carries a non-null `started_at`; `completed`
/// always carries a non-null `completed_at`; reopening clears
/// `completed_at`. `started_at` is kept sticky across reopen (one of the
/// two interpretations spec §9 leaves open — see DESIGN.md).
fn next_timestamps(current: &Task, new_status: TaskStatus, now: i64) -> (Option<i64>, Option<i64>) {
    match new_status {
        TaskStatus::Open => (current.started_at, None),
        TaskStatus::InProgress => (Some(current.started_at.unwrap_or(now)), None),
        TaskStatus::Completed => (
            Some(current.started_at.unwrap_or(now)),
            Some(now),
        ),
    }
}

/// Deletes a task. Refuses `InvalidData` if any other task depends on it
/// (spec §4.3); otherwise the FK cascade (I3) removes edges incident to
/// the task in both directions along with the row itself.
pub fn delete_task(conn: &Connection, task_id: i64) -> Result<()> {
    get_task(conn, task_id)?.ok_or_else(|| EngineError::task_not_found(task_id))?;

    let exec = Executor::new(conn);
    let dependent_count: i64 = exec
        .query_one(
            "SELECT COUNT(*) FROM dependencies WHERE blocks_on_id = ?1",
            params![task_id],
            |row| row.get(0),
        )?
        .unwrap_or(0);
    if dependent_count > 0 {
        return Err(EngineError::invalid_data(format!(
            "Task {task_id} has {dependent_count} dependent task(s); remove those dependencies first"
        )));
    }

    let changed = exec.exec("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
    if changed == 0 {
        return Err(EngineError::task_not_found(task_id));
    }
    Ok(())
}
