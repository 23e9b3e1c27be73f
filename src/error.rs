use thiserror::Error;

/// The closed error taxonomy surfaced by the engine (spec §7).
///
/// Storage-substrate failures are classified into
/// `PrepareFailed`/`BindFailed`/`StepFailed` by `db::executor` before they
/// escape the façade; nothing outside this set is ever returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    InvalidTaskId,
    InvalidCharacter,
    InvalidKebabCase,
    InvalidData,
    CycleDetected,
    PrepareFailed,
    BindFailed,
    StepFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidTaskId => "INVALID_TASK_ID",
            Self::InvalidCharacter => "INVALID_CHARACTER",
            Self::InvalidKebabCase => "INVALID_KEBAB_CASE",
            Self::InvalidData => "INVALID_DATA",
            Self::CycleDetected => "CYCLE_DETECTED",
            Self::PrepareFailed => "PREPARE_FAILED",
            Self::BindFailed => "BIND_FAILED",
            Self::StepFailed => "STEP_FAILED",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EngineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn invalid_task_id(reference: &str) -> Self {
        Self::new(
            ErrorKind::InvalidTaskId,
            format!("Not a valid task identifier: '{reference}'"),
        )
    }

    pub fn invalid_character(reference: &str) -> Self {
        Self::new(
            ErrorKind::InvalidCharacter,
            format!("Task identifier contains a non-digit numeric part: '{reference}'"),
        )
    }

    pub fn invalid_kebab_case(slug: &str) -> Self {
        Self::new(
            ErrorKind::InvalidKebabCase,
            format!("Slug must be lowercase kebab-case, 1-100 characters: '{slug}'"),
        )
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidData, message)
    }

    pub fn plan_not_found(slug: &str) -> Self {
        Self::invalid_data(format!("Plan not found: {slug}"))
    }

    pub fn task_not_found(reference: impl std::fmt::Display) -> Self {
        Self::invalid_data(format!("Task not found: {reference}"))
    }

    pub fn cycle_detected() -> Self {
        Self::new(ErrorKind::CycleDetected, "Dependency cycle detected")
    }

    pub fn prepare_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PrepareFailed, message)
    }

    pub fn bind_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BindFailed, message)
    }

    pub fn step_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StepFailed, message)
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::ToSqlConversionFailure(_)
            | rusqlite::Error::InvalidParameterName(_)
            | rusqlite::Error::InvalidParameterCount(_, _)
            | rusqlite::Error::InvalidColumnType(_, _, _) => Self::bind_failed(e.to_string()),
            rusqlite::Error::SqlInputError { .. } => Self::prepare_failed(e.to_string()),
            _ => Self::step_failed(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
