use rusqlite::{params, Connection, Row};

use crate::db::executor::Executor;
use crate::error::{EngineError, Result};
use crate::models::{Plan, PlanStatus, PlanSummary};
use crate::time;
use crate::validation;

fn row_to_plan(row: &Row) -> rusqlite::Result<Plan> {
    Ok(Plan {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        task_counter: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        execution_started_at: row.get(7)?,
        completed_at: row.get(8)?,
    })
}

const PLAN_COLUMNS: &str = "id, slug, title, description, task_counter, created_at, updated_at, execution_started_at, completed_at";

/// Creates a plan (spec §4.2). Fails `StepFailed` via the unique
/// constraint on a duplicate slug.
pub fn create_plan(
    conn: &Connection,
    slug: &str,
    title: &str,
    description: &str,
    execution_started_at: Option<i64>,
) -> Result<Plan> {
    validation::validate_slug(slug)?;
    validation::validate_title(title)?;
    validation::validate_description(description)?;

    let exec = Executor::new(conn);
    let now = time::now();
    exec.exec(
        "INSERT INTO plans (slug, title, description, task_counter, created_at, updated_at, execution_started_at)
         VALUES (?1, ?2, ?3, 0, ?4, ?4, ?5)",
        params![slug, title, description, now, execution_started_at],
    )?;
    get_plan_by_slug_raw(conn, slug)?.ok_or_else(|| EngineError::plan_not_found(slug))
}

/// Returns the plan plus aggregated task counts; `None` if the slug is
/// unknown (spec §4.2).
pub fn get_plan_summary(conn: &Connection, slug: &str) -> Result<Option<PlanSummary>> {
    let Some(plan) = get_plan_by_slug_raw(conn, slug)? else {
        return Ok(None);
    };
    Ok(Some(summarize(conn, plan)?))
}

/// Returns the surrogate plan id for a slug; fails `InvalidData` if
/// unknown (spec §4.2).
pub fn get_plan_id_from_slug(conn: &Connection, slug: &str) -> Result<i64> {
    get_plan_by_slug_raw(conn, slug)?
        .map(|p| p.id)
        .ok_or_else(|| EngineError::plan_not_found(slug))
}

/// Returns every plan with aggregates, ordered by id ascending (spec §4.2).
pub fn list_plans(conn: &Connection) -> Result<Vec<PlanSummary>> {
    let exec = Executor::new(conn);
    let plans = exec.query_all(
        &format!("SELECT {PLAN_COLUMNS} FROM plans ORDER BY id ASC"),
        (),
        row_to_plan,
    )?;
    plans.into_iter().map(|p| summarize(conn, p)).collect()
}

/// Partial update of title/description; fails `InvalidData` if the plan
/// is missing (spec §4.2).
pub fn update_plan(
    conn: &Connection,
    slug: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Plan> {
    if let Some(t) = title {
        validation::validate_title(t)?;
    }
    if let Some(d) = description {
        validation::validate_description(d)?;
    }

    let plan = get_plan_by_slug_raw(conn, slug)?.ok_or_else(|| EngineError::plan_not_found(slug))?;
    let new_title = title.unwrap_or(&plan.title);
    let new_description = description.unwrap_or(&plan.description);

    let exec = Executor::new(conn);
    let changed = exec.exec(
        "UPDATE plans SET title = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
        params![new_title, new_description, time::now(), plan.id],
    )?;
    if changed == 0 {
        return Err(EngineError::plan_not_found(slug));
    }
    get_plan_by_slug_raw(conn, slug)?.ok_or_else(|| EngineError::plan_not_found(slug))
}

/// Deletes a plan; cascades to its tasks and incident dependency edges
/// (I2). Returns the number of tasks removed. Fails `InvalidData` if the
/// plan is missing (spec §4.2).
pub fn delete_plan(conn: &Connection, slug: &str) -> Result<i64> {
    let plan = get_plan_by_slug_raw(conn, slug)?.ok_or_else(|| EngineError::plan_not_found(slug))?;
    let exec = Executor::new(conn);
    exec.transaction(|| {
        let task_count: i64 = exec
            .query_one(
                "SELECT COUNT(*) FROM tasks WHERE plan_id = ?1",
                params![plan.id],
                |row| row.get(0),
            )?
            .unwrap_or(0);
        let changed = exec.exec("DELETE FROM plans WHERE id = ?1", params![plan.id])?;
        if changed == 0 {
            return Err(EngineError::plan_not_found(slug));
        }
        Ok(task_count)
    })
}

pub(crate) fn get_plan_by_id(conn: &Connection, id: i64) -> Result<Plan> {
    let exec = Executor::new(conn);
    exec.query_one(
        &format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = ?1"),
        params![id],
        row_to_plan,
    )?
    .ok_or_else(|| EngineError::invalid_data(format!("Plan not found: {id}")))
}

fn get_plan_by_slug_raw(conn: &Connection, slug: &str) -> Result<Option<Plan>> {
    let exec = Executor::new(conn);
    exec.query_one(
        &format!("SELECT {PLAN_COLUMNS} FROM plans WHERE slug = ?1"),
        params![slug],
        row_to_plan,
    )
}

fn summarize(conn: &Connection, plan: Plan) -> Result<PlanSummary> {
    let exec = Executor::new(conn);
    let (total, open, in_progress, completed): (i64, i64, i64, i64) = exec
        .query_one(
            "SELECT
                COUNT(*),
                COALESCE(SUM(status = 'open'), 0),
                COALESCE(SUM(status = 'in_progress'), 0),
                COALESCE(SUM(status = 'completed'), 0)
             FROM tasks WHERE plan_id = ?1",
            params![plan.id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?
        .unwrap_or((0, 0, 0, 0));

    let status = PlanStatus::derive(total, in_progress, completed);
    Ok(PlanSummary {
        plan,
        status,
        total_tasks: total,
        open_tasks: open,
        in_progress_tasks: in_progress,
        completed_tasks: completed,
    })
}
