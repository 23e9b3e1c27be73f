use rusqlite::{Connection, Params, Row};

use crate::error::{EngineError, Result};

/// Typed façade over the storage substrate (spec §4.1).
///
/// Every repo module goes through this instead of calling `rusqlite`
/// directly, so the `PrepareFailed`/`BindFailed`/`StepFailed` split stays
/// in one place instead of being re-derived at every call site the way
/// teacher's `db::*_repo` modules did with a single blanket
/// `From<rusqlite::Error>`.
pub struct Executor<'c> {
    conn: &'c Connection,
}

impl<'c> Executor<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Run a statement with no result rows. Returns the affected-row count
    /// for callers that need it (UPDATE/DELETE).
    pub fn exec<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| EngineError::prepare_failed(e.to_string()))?;
        stmt.execute(params).map_err(classify_exec)
    }

    /// Run a query expected to return zero or one row.
    pub fn query_one<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        mut row_shape: impl FnMut(&Row) -> rusqlite::Result<T>,
    ) -> Result<Option<T>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| EngineError::prepare_failed(e.to_string()))?;
        let mut rows = stmt.query(params).map_err(classify_exec)?;
        match rows.next().map_err(classify_exec)? {
            Some(row) => Ok(Some(
                row_shape(row).map_err(|e| EngineError::step_failed(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    /// Run a query, returning every row mapped into the requested shape.
    pub fn query_all<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        row_shape: impl FnMut(&Row) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| EngineError::prepare_failed(e.to_string()))?;
        let rows = stmt.query_map(params, row_shape).map_err(classify_exec)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| EngineError::step_failed(e.to_string()))?);
        }
        Ok(out)
    }

    pub fn begin_transaction(&self) -> Result<()> {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| EngineError::step_failed(e.to_string()))
    }

    pub fn commit(&self) -> Result<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| EngineError::step_failed(e.to_string()))
    }

    pub fn rollback(&self) -> Result<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| EngineError::step_failed(e.to_string()))
    }

    /// Run `f` inside a transaction: commit on success, roll back on any
    /// error before the error propagates. Any operation that mutates more
    /// than one row across more than one table goes through this (spec §5).
    pub fn transaction<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.begin_transaction()?;
        match f() {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(e) => {
                let _ = self.rollback();
                Err(e)
            }
        }
    }
}

fn classify_exec(e: rusqlite::Error) -> EngineError {
    match e {
        rusqlite::Error::ToSqlConversionFailure(_)
        | rusqlite::Error::InvalidParameterName(_)
        | rusqlite::Error::InvalidParameterCount(_, _) => EngineError::bind_failed(e.to_string()),
        _ => EngineError::step_failed(e.to_string()),
    }
}
