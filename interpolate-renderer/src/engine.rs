//! MiniJinja rendering engine with strict variable resolution.
//!
//! # Resolution contract
//!
//! | Template reads                           | Outcome                          |
//! |------------------------------------------|----------------------------------|
//! | `{{ name }}`, `name` defined             | value rendered                   |
//! | `{{ name }}`, `name` undefined           | `RenderError::UndefinedVariable` |
//! | `{% if name %}`, `name` undefined        | `RenderError::UndefinedVariable` |
//! | `{{ map.key }}`, `key` not in `map`      | `RenderError::UndefinedVariable` (`map.key`) |
//! | `{{ item.key }}` on a loop item          | `RenderError::UndefinedVariable` (`item.key`) |
//! | `{% if name is defined %}`               | `false`, no error                |
//! | undefined name in a branch not taken     | no error                         |
//! | `{{ nosuchfn() }}`                       | `RenderError::Syntax`            |
//!
//! Only references that are evaluated can fail; MiniJinja's strict undefined
//! mode raises on each of them. The failing name is recovered from the
//! error's source span and the template's undeclared variable paths.

use minijinja::{Environment, ErrorKind, UndefinedBehavior};

use interpolate_core::VariableSet;

use crate::context::{self, ENGINE_NAMES};
use crate::error::{HelperError, RenderError};
use crate::helpers::HelperLibrary;

// ---------------------------------------------------------------------------
// ParsedTemplate
// ---------------------------------------------------------------------------

/// A compiled template plus the path it was read from.
pub struct ParsedTemplate<'a> {
    path: String,
    source: &'a str,
    inner: minijinja::Template<'a, 'a>,
}

impl ParsedTemplate<'_> {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Top-level and dotted variable paths the template reads without
    /// defining them itself, sorted.
    pub fn referenced_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.inner.undeclared_variables(true).into_iter().collect();
        paths.sort();
        paths
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Engine owning one MiniJinja environment and the helper catalog installed
/// on it. Build one per invocation; nothing is shared between engines.
pub struct TemplateEngine {
    env: Environment<'static>,
    helpers: HelperLibrary,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`] with `helpers` installed.
    pub fn new(helpers: HelperLibrary) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        helpers.install(&mut env);
        TemplateEngine { env, helpers }
    }

    /// Parse `source`; `path` names the template in errors.
    pub fn parse<'a>(&'a self, path: &str, source: &'a str) -> Result<ParsedTemplate<'a>, RenderError> {
        let inner = self
            .env
            .template_from_str(source)
            .map_err(|e| RenderError::Syntax {
                path: path.to_string(),
                source: e,
            })?;
        Ok(ParsedTemplate {
            path: path.to_string(),
            source,
            inner,
        })
    }

    /// Render `template` against `vars`. Rendering stops at the first
    /// evaluated reference that does not resolve.
    pub fn render(&self, template: &ParsedTemplate<'_>, vars: &VariableSet) -> Result<Vec<u8>, RenderError> {
        let rendered = template
            .inner
            .render(vars)
            .map_err(|e| self.classify(template, vars, e))?;
        tracing::debug!("rendered '{}' ({} bytes)", template.path(), rendered.len());
        Ok(rendered.into_bytes())
    }

    /// Parse and render in one step.
    pub fn render_str(&self, path: &str, source: &str, vars: &VariableSet) -> Result<Vec<u8>, RenderError> {
        let template = self.parse(path, source)?;
        self.render(&template, vars)
    }

    fn is_global(&self, name: &str) -> bool {
        ENGINE_NAMES.contains(&name) || self.helpers.function_names().any(|f| f == name)
    }

    /// Referenced paths that do not resolve in `vars`, longest first.
    fn unresolved_paths(&self, template: &ParsedTemplate<'_>, vars: &VariableSet) -> Vec<String> {
        let mut missing: Vec<String> = template
            .referenced_paths()
            .into_iter()
            .filter(|path| !self.is_global(context::root(path)))
            .filter_map(|path| context::unresolved(vars, &path))
            .collect();
        missing.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        missing.dedup();
        missing
    }

    fn classify(&self, template: &ParsedTemplate<'_>, vars: &VariableSet, err: minijinja::Error) -> RenderError {
        let path = template.path().to_string();
        if let Some(helper) = helper_error(&err) {
            return RenderError::Helper {
                path,
                source: helper.clone(),
            };
        }
        match err.kind() {
            ErrorKind::UndefinedError => {
                let name = self.undefined_name(template, vars, &err);
                RenderError::UndefinedVariable { path, name }
            }
            ErrorKind::SyntaxError
            | ErrorKind::UnknownFilter
            | ErrorKind::UnknownTest
            | ErrorKind::UnknownFunction => RenderError::Syntax { path, source: err },
            _ => RenderError::Evaluation { path, source: err },
        }
    }

    /// Name of the undefined value behind `err`.
    ///
    /// Prefers an unresolved variable path inside the failing expression,
    /// then the expression text itself, then an unresolved path on the
    /// failing line.
    fn undefined_name(&self, template: &ParsedTemplate<'_>, vars: &VariableSet, err: &minijinja::Error) -> String {
        let missing = self.unresolved_paths(template, vars);

        let span = err
            .range()
            .and_then(|range| template.source.get(range))
            .map(expression_text)
            .filter(|text| !text.is_empty());
        if let Some(span) = span {
            return missing
                .into_iter()
                .find(|path| contains_path(span, path))
                .unwrap_or_else(|| span.to_string());
        }

        let line = err
            .line()
            .and_then(|n| template.source.lines().nth(n.saturating_sub(1)));
        if let Some(line) = line {
            if let Some(found) = missing.iter().find(|path| contains_path(line, path)) {
                return found.clone();
            }
            if let [only] = output_paths(line).as_slice() {
                return only.to_string();
            }
        }

        match (err.detail(), err.line()) {
            (Some(detail), _) => detail.to_string(),
            (None, Some(line)) => format!("<undefined value on line {line}>"),
            (None, None) => "<undefined value>".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

fn helper_error(err: &minijinja::Error) -> Option<&HelperError> {
    let mut current = std::error::Error::source(err);
    while let Some(cause) = current {
        if let Some(helper) = cause.downcast_ref::<HelperError>() {
            return Some(helper);
        }
        current = cause.source();
    }
    None
}

/// Strip tag delimiters and keywords from a source span.
fn expression_text(span: &str) -> &str {
    let mut text = span.trim();
    for (open, close) in [("{{", "}}"), ("{%", "%}")] {
        text = text.strip_prefix(open).unwrap_or(text);
        text = text.strip_suffix(close).unwrap_or(text);
    }
    let text = text.trim_matches(|c: char| c == '-' || c == '+' || c.is_whitespace());
    for keyword in ["if ", "elif ", "for "] {
        if let Some(rest) = text.strip_prefix(keyword) {
            return rest.trim();
        }
    }
    text
}

/// Plain variable paths printed on `line` (`{{ a.b }}`, not `{{ f(x) }}`).
fn output_paths(line: &str) -> Vec<&str> {
    line.split("{{")
        .skip(1)
        .filter_map(|rest| rest.split_once("}}"))
        .map(|(expr, _)| expr.trim_matches(|c: char| c == '-' || c == '+' || c.is_whitespace()))
        .filter(|expr| {
            !expr.is_empty() && expr.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.')
        })
        .collect()
}

/// `path` occurs in `text` as a whole identifier path (`db` does not match
/// inside `db2` or `mydb`).
fn contains_path(text: &str, path: &str) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    text.match_indices(path).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + path.len()..].chars().next();
        !before.is_some_and(|c| is_ident(c) || c == '.') && !after.is_some_and(is_ident)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: serde_json::Value) -> VariableSet {
        serde_json::from_value(value).expect("variable set")
    }

    fn engine() -> TemplateEngine {
        TemplateEngine::new(HelperLibrary::standard())
    }

    fn render(source: &str, value: serde_json::Value) -> Result<String, RenderError> {
        engine()
            .render_str("test.tpl", source, &vars(value))
            .map(|b| String::from_utf8(b).expect("utf-8"))
    }

    #[test]
    fn renders_variables_and_keeps_trailing_newline() {
        let out = render("name: {{ name }}\n", json!({"name": "api"})).unwrap();
        assert_eq!(out, "name: api\n");
    }

    #[test]
    fn undefined_in_output_names_the_variable() {
        let err = render("{{ missing }}", json!({})).unwrap_err();
        match err {
            RenderError::UndefinedVariable { path, name } => {
                assert_eq!(path, "test.tpl");
                assert_eq!(name, "missing");
            }
            other => panic!("expected UndefinedVariable, got {other:?}"),
        }
    }

    #[test]
    fn undefined_in_condition_is_not_falsy() {
        let err = render("{% if flag %}on{% endif %}", json!({})).unwrap_err();
        assert!(matches!(err, RenderError::UndefinedVariable { ref name, .. } if name == "flag"));
    }

    #[test]
    fn undefined_mapping_key_names_the_path() {
        let err = render("{{ db.user }}", json!({"db": {"host": "h"}})).unwrap_err();
        assert!(matches!(err, RenderError::UndefinedVariable { ref name, .. } if name == "db.user"));
    }

    #[test]
    fn undefined_field_on_loop_item_names_the_expression() {
        let err = render(
            "{% for s in services %}{{ s.port }}{% endfor %}",
            json!({"services": [{"name": "a"}]}),
        )
        .unwrap_err();
        match err {
            RenderError::UndefinedVariable { name, .. } => assert_eq!(name, "s.port"),
            other => panic!("expected UndefinedVariable, got {other:?}"),
        }
    }

    #[test]
    fn untaken_branch_may_reference_missing_variables() {
        let out = render("{% if tls %}{{ cert }}{% endif %}ok", json!({"tls": false})).unwrap();
        assert_eq!(out, "ok");
    }

    #[test]
    fn taken_branch_still_fails_on_missing_variables() {
        let err = render("{% if tls %}{{ cert }}{% endif %}ok", json!({"tls": true})).unwrap_err();
        assert!(matches!(err, RenderError::UndefinedVariable { ref name, .. } if name == "cert"));
    }

    #[test]
    fn is_defined_guards_do_not_fail() {
        let source = "{% if cert is defined %}{{ cert }}{% else %}none{% endif %}";
        assert_eq!(render(source, json!({})).unwrap(), "none");
        assert_eq!(render(source, json!({"cert": "pem"})).unwrap(), "pem");
    }

    #[test]
    fn name_is_picked_from_the_failing_expression() {
        let err = render("{{ db }} {{ db2 }}", json!({"db": "x"})).unwrap_err();
        assert!(matches!(err, RenderError::UndefinedVariable { ref name, .. } if name == "db2"));
    }

    #[test]
    fn template_locals_and_loop_variables_are_not_references() {
        let out = render(
            "{% set sep = ',' %}{% for z in zones %}{{ z }}{% if not loop.last %}{{ sep }}{% endif %}{% endfor %}",
            json!({"zones": ["a", "b"]}),
        )
        .unwrap();
        assert_eq!(out, "a,b");
    }

    #[test]
    fn helper_functions_are_not_variables() {
        let out = render("{{ cidrhost(net, 5) }}", json!({"net": "10.0.0.0/24"})).unwrap();
        assert_eq!(out, "10.0.0.5");
    }

    #[test]
    fn helper_failure_wraps_the_helper_error() {
        let err = render("{{ cidrhost('10.0.0.0/30', 4) }}", json!({})).unwrap_err();
        match err {
            RenderError::Helper { source, .. } => assert!(source.is_range()),
            other => panic!("expected Helper, got {other:?}"),
        }

        let err = render("{{ cidrhost('10.0.0.0', 1) }}", json!({})).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Helper { source: HelperError::InvalidCidr { .. }, .. }
        ));
    }

    #[test]
    fn malformed_template_is_a_syntax_error_with_path() {
        let err = render("{% if %}", json!({})).unwrap_err();
        assert!(matches!(err, RenderError::Syntax { .. }));
        assert!(err.to_string().contains("test.tpl"));
    }

    #[test]
    fn unknown_function_is_a_syntax_error() {
        let err = render("{{ nosuchfn(1) }}", json!({})).unwrap_err();
        assert!(matches!(err, RenderError::Syntax { .. }), "got {err:?}");
        assert!(err.to_string().contains("nosuchfn"));
    }

    #[test]
    fn empty_catalog_has_no_cidrhost() {
        let engine = TemplateEngine::new(HelperLibrary::empty());
        let err = engine
            .render_str("t", "{{ cidrhost('10.0.0.0/24', 1) }}", &VariableSet::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::Syntax { .. }));
    }

    #[test]
    fn expression_text_strips_delimiters() {
        assert_eq!(expression_text("{{ s.port }}"), "s.port");
        assert_eq!(expression_text("{%- if flag -%}"), "flag");
        assert_eq!(expression_text("db.user"), "db.user");
    }

    #[test]
    fn output_paths_skips_calls_and_filters() {
        assert_eq!(output_paths("- {{ s.port }} {{ f(x) }} {{ a | upper }}"), vec!["s.port"]);
    }

    #[test]
    fn contains_path_matches_whole_identifiers() {
        assert!(contains_path("db.user | upper", "db.user"));
        assert!(!contains_path("db2", "db"));
        assert!(!contains_path("mydb", "db"));
        assert!(!contains_path("x.db", "db"));
    }

    #[test]
    fn referenced_paths_lists_dotted_reads() {
        let engine = engine();
        let template = engine
            .parse("t", "{{ a }}{{ b.c }}{% set d = 1 %}{{ d }}")
            .unwrap();
        let paths = template.referenced_paths();
        assert!(paths.contains(&"a".to_string()));
        assert!(paths.contains(&"b.c".to_string()));
        assert!(!paths.iter().any(|p| p == "d"));
    }
}
