//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Validate an id coming from a client and return it in canonical form.
pub(crate) fn parse_id(value: &str, label: &str) -> ResultEngine<String> {
    Uuid::parse_str(value.trim())
        .map(|id| id.to_string())
        .map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Trim usernames, drop empty ones and keep the first occurrence of each.
pub(crate) fn unique_usernames<'a, I>(usernames: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    usernames
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_canonicalizes() {
        let id = Uuid::new_v4();
        let raw = format!(" {} ", id.to_string().to_uppercase());
        assert_eq!(parse_id(&raw, "group").unwrap(), id.to_string());
        assert_eq!(
            parse_id("nope", "group").unwrap_err(),
            EngineError::InvalidId("invalid group id".to_string())
        );
    }

    #[test]
    fn unique_usernames_keeps_order() {
        let names = unique_usernames(["bob", " alice", "bob", "", "carol", "alice "]);
        assert_eq!(names, vec!["bob", "alice", "carol"]);
    }
}
