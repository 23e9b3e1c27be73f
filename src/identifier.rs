use crate::error::{EngineError, Result};

/// A parsed task identifier, accepting the three forms of spec §4.5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
    /// A bare or zero-padded decimal integer — the surrogate `task_id`.
    Id(i64),
    /// `slug:number` — resolved via `getTaskByPlanAndNumber`.
    Slug { slug: String, number: i64 },
}

/// Parses the three user-facing task identifier forms (spec §4.5):
/// a bare decimal integer, a zero-padded decimal integer, or `slug:number`.
///
/// Resolving a `Slug` variant to a concrete task id is the caller's job
/// (`store::task::get_by_plan_and_number`); this function only handles
/// syntax.
pub fn parse_flexible(input: &str) -> Result<TaskRef> {
    if input.is_empty() {
        return Err(EngineError::invalid_task_id(input));
    }

    let colon_count = input.matches(':').count();
    if colon_count > 1 {
        return Err(EngineError::invalid_task_id(input));
    }

    if colon_count == 0 {
        return parse_plain_integer(input).map(TaskRef::Id);
    }

    let (slug, number_part) = input.split_once(':').expect("colon_count == 1");
    if slug.is_empty() || number_part.is_empty() {
        return Err(EngineError::invalid_task_id(input));
    }
    let number = parse_plain_integer(number_part)?;
    Ok(TaskRef::Slug {
        slug: slug.to_string(),
        number,
    })
}

fn parse_plain_integer(s: &str) -> Result<i64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return if s.chars().any(|c| !c.is_ascii_digit()) {
            Err(EngineError::invalid_character(s))
        } else {
            Err(EngineError::invalid_task_id(s))
        };
    }
    s.parse::<i64>()
        .map_err(|_| EngineError::invalid_task_id(s))
}

/// The canonical human form `slug:NNN`, zero-padded to at least 3 digits
/// (spec §4.5).
pub fn canonical(slug: &str, plan_task_number: i64) -> String {
    format!("{slug}:{plan_task_number:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_integer() {
        assert_eq!(parse_flexible("42").unwrap(), TaskRef::Id(42));
    }

    #[test]
    fn zero_padded_integer() {
        assert_eq!(parse_flexible("007").unwrap(), TaskRef::Id(7));
    }

    #[test]
    fn slug_form() {
        assert_eq!(
            parse_flexible("auth:001").unwrap(),
            TaskRef::Slug {
                slug: "auth".into(),
                number: 1
            }
        );
        assert_eq!(
            parse_flexible("auth:42").unwrap(),
            TaskRef::Slug {
                slug: "auth".into(),
                number: 42
            }
        );
    }

    #[test]
    fn structurally_invalid() {
        assert!(parse_flexible("").is_err());
        assert!(parse_flexible(":001").is_err());
        assert!(parse_flexible("auth:").is_err());
        assert!(parse_flexible("auth:1:2").is_err());
    }

    #[test]
    fn non_digit_numeric_part() {
        let err = parse_flexible("auth:abc").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::InvalidCharacter);
        let err = parse_flexible("12a").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::InvalidCharacter);
    }

    #[test]
    fn canonical_roundtrip_form() {
        assert_eq!(canonical("auth", 1), "auth:001");
        assert_eq!(canonical("auth", 42), "auth:042");
        assert_eq!(canonical("auth", 1234), "auth:1234");
    }
}
