//! Scope strings travel as a single space-separated string in the OAuth2
//! records but are persisted as a list.

/// Split a scope string on single spaces.
///
/// An empty string yields an empty list. Consecutive spaces produce empty
/// elements so that [`join_scope`] restores the exact input.
pub fn split_scope(scope: &str) -> Vec<String> {
    if scope.is_empty() {
        return Vec::new();
    }
    scope.split(' ').map(|s| s.to_string()).collect()
}

pub fn join_scope(scopes: &[String]) -> String {
    scopes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_single_spaces() {
        assert_eq!(split_scope("read write"), vec!["read", "write"]);
        assert_eq!(split_scope("read"), vec!["read"]);
    }

    #[test]
    fn empty_scope_is_empty_list() {
        assert!(split_scope("").is_empty());
        assert_eq!(join_scope(&[]), "");
    }

    #[test]
    fn irregular_spacing_survives_roundtrip() {
        for input in ["a  b", " a", "a ", " "] {
            assert_eq!(join_scope(&split_scope(input)), input);
        }
    }
}
