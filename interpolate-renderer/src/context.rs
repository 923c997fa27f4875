//! Reference resolution against a [`VariableSet`].
//!
//! The engine asks this module, before evaluation, whether each variable
//! path a template reads (`name` or `name.field.sub`) exists in the
//! variable set.

use serde_json::Value;

use interpolate_core::VariableSet;

/// Names the engine itself provides inside templates; never variable lookups.
pub(crate) const ENGINE_NAMES: &[&str] = &[
    "loop",
    "self",
    "super",
    "caller",
    "varargs",
    "kwargs",
    "range",
    "dict",
    "debug",
    "namespace",
];

/// Leading identifier of a dotted path.
pub(crate) fn root(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

/// Walk a dotted `path` through `vars`.
///
/// Returns the longest prefix that does not exist, or `None` when the path
/// resolves. A walk that reaches a non-mapping value stops there and counts
/// as resolved: list indexing and attribute access on scalars are left to
/// the engine.
pub(crate) fn unresolved(vars: &VariableSet, path: &str) -> Option<String> {
    let mut segments = path.split('.');
    let root = segments.next()?;
    let mut current = match vars.get(root) {
        Some(value) => value,
        None => return Some(root.to_string()),
    };

    let mut walked = root.to_string();
    for segment in segments {
        walked.push('.');
        walked.push_str(segment);
        match current {
            Value::Object(map) => match map.get(segment) {
                Some(next) => current = next,
                None => return Some(walked),
            },
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars() -> VariableSet {
        [
            ("db".to_string(), json!({"host": "db.internal", "port": 5432, "opts": {"ssl": true}})),
            ("zones".to_string(), json!(["a", "b"])),
            ("name".to_string(), json!("api")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn top_level_names() {
        assert_eq!(unresolved(&vars(), "db"), None);
        assert_eq!(unresolved(&vars(), "missing"), Some("missing".to_string()));
    }

    #[test]
    fn nested_mapping_paths() {
        assert_eq!(unresolved(&vars(), "db.host"), None);
        assert_eq!(unresolved(&vars(), "db.opts.ssl"), None);
        assert_eq!(unresolved(&vars(), "db.user"), Some("db.user".to_string()));
        assert_eq!(
            unresolved(&vars(), "db.opts.tls.version"),
            Some("db.opts.tls".to_string())
        );
    }

    #[test]
    fn non_mapping_values_stop_the_walk() {
        assert_eq!(unresolved(&vars(), "zones.first"), None);
        assert_eq!(unresolved(&vars(), "name.len"), None);
    }

    #[test]
    fn root_of_dotted_path() {
        assert_eq!(root("db.host"), "db");
        assert_eq!(root("name"), "name");
    }
}
