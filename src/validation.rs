use crate::error::{EngineError, Result};

/// Lowercase kebab-case, 1-100 characters (spec §3): `^[a-z0-9][a-z0-9-]*[a-z0-9]$`,
/// or a single `[a-z0-9]` character.
pub fn validate_slug(slug: &str) -> Result<()> {
    if is_kebab_case(slug) && slug.len() <= 100 {
        Ok(())
    } else {
        Err(EngineError::invalid_kebab_case(slug))
    }
}

fn is_kebab_case(slug: &str) -> bool {
    if slug.is_empty() {
        return false;
    }
    let chars: Vec<char> = slug.chars().collect();
    if chars.len() == 1 {
        return chars[0].is_ascii_lowercase() || chars[0].is_ascii_digit();
    }
    let is_edge = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    is_edge(chars[0])
        && is_edge(*chars.last().unwrap())
        && chars.iter().all(|&c| is_edge(c) || c == '-')
}

/// Title length 1-500 characters (spec §3).
pub fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() || title.chars().count() > 500 {
        return Err(EngineError::invalid_input(
            "Title must be 1-500 characters",
        ));
    }
    Ok(())
}

/// Description length 0-5000 characters (spec §3); empty is allowed.
pub fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > 5000 {
        return Err(EngineError::invalid_input(
            "Description must be at most 5000 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_boundaries() {
        assert!(validate_slug("a").is_ok());
        assert!(validate_slug(&"a".repeat(100)).is_ok());
        assert!(validate_slug(&"a".repeat(101)).is_err());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Auth").is_err());
        assert!(validate_slug("auth_service").is_err());
        assert!(validate_slug("-auth").is_err());
        assert!(validate_slug("auth-").is_err());
        assert!(validate_slug("auth-service-1").is_ok());
    }

    #[test]
    fn title_boundaries() {
        assert!(validate_title("a").is_ok());
        assert!(validate_title(&"a".repeat(500)).is_ok());
        assert!(validate_title(&"a".repeat(501)).is_err());
        assert!(validate_title("").is_err());
    }

    #[test]
    fn description_boundaries() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"a".repeat(5000)).is_ok());
        assert!(validate_description(&"a".repeat(5001)).is_err());
    }
}
