//! Helper catalog — the functions and filters available to templates.
//!
//! A [`HelperLibrary`] is a plain value built per engine; installing it
//! registers each entry on one MiniJinja environment and nowhere else.
//!
//! | Group        | Entries |
//! |--------------|---------|
//! | network      | `cidrhost`, `cidrnetmask`, `cidrsubnet` |
//! | text         | `snakecase`, `camelcase`, `kebabcase`, `quote`, `squote`, `trim_prefix`, `trim_suffix`, `nindent`, `repeat` |
//! | encoding     | `b64enc`, `b64dec`, `sha256sum`, `to_json`, `to_yaml` |
//! | defaults     | `coalesce`, `ternary`, `required` |
//! | collections  | `list`, `keys`, `values`, `has_key`, `merge`, `pick`, `omit`, `compact`, `concat` |
//!
//! MiniJinja's built-in filters (`upper`, `default`, `join`, ...) stay
//! available alongside these.

pub mod collections;
pub mod defaults;
pub mod encoding;
pub mod network;
pub mod text;

use std::fmt;

use minijinja::Environment;

/// Whether a helper is called as `name(args)` or piped as `value | name(args)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperKind {
    Function,
    Filter,
}

impl fmt::Display for HelperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelperKind::Function => f.write_str("function"),
            HelperKind::Filter => f.write_str("filter"),
        }
    }
}

/// Registration hook for one helper.
pub type InstallFn = fn(&mut Environment<'static>, &'static str);

/// One named entry of the catalog.
#[derive(Clone, Copy)]
pub struct Helper {
    name: &'static str,
    kind: HelperKind,
    summary: &'static str,
    install: InstallFn,
}

impl Helper {
    pub fn new(
        name: &'static str,
        kind: HelperKind,
        summary: &'static str,
        install: InstallFn,
    ) -> Self {
        Self {
            name,
            kind,
            summary,
            install,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> HelperKind {
        self.kind
    }

    pub fn summary(&self) -> &'static str {
        self.summary
    }
}

impl fmt::Debug for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Helper")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// An instance-local catalog of helpers.
#[derive(Debug, Clone, Default)]
pub struct HelperLibrary {
    helpers: Vec<Helper>,
}

impl HelperLibrary {
    /// A catalog with no helpers; MiniJinja built-ins only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The full catalog.
    pub fn standard() -> Self {
        let mut library = Self::empty();
        for helper in network::helpers()
            .into_iter()
            .chain(text::helpers())
            .chain(encoding::helpers())
            .chain(defaults::helpers())
            .chain(collections::helpers())
        {
            library = library.with(helper);
        }
        library
    }

    /// Add `helper`, replacing any entry of the same name and kind.
    pub fn with(mut self, helper: Helper) -> Self {
        self.helpers
            .retain(|h| !(h.name == helper.name && h.kind == helper.kind));
        self.helpers.push(helper);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Helper> {
        self.helpers.iter().find(|h| h.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Helper> {
        self.helpers.iter()
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    /// Names callable as functions; these are globals, not variables.
    pub fn function_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.helpers
            .iter()
            .filter(|h| h.kind == HelperKind::Function)
            .map(|h| h.name)
    }

    pub(crate) fn install(&self, env: &mut Environment<'static>) {
        for helper in &self.helpers {
            (helper.install)(env, helper.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_network_helpers() {
        let library = HelperLibrary::standard();
        let cidrhost = library.get("cidrhost").expect("cidrhost registered");
        assert_eq!(cidrhost.kind(), HelperKind::Function);
        assert!(library.function_names().any(|n| n == "cidrsubnet"));
    }

    #[test]
    fn catalog_names_are_unique_per_kind() {
        let library = HelperLibrary::standard();
        let mut seen = std::collections::HashSet::new();
        for helper in library.iter() {
            assert!(
                seen.insert((helper.name(), helper.kind())),
                "duplicate helper {}",
                helper.name()
            );
        }
    }

    #[test]
    fn with_replaces_same_name() {
        let replacement = Helper::new("cidrhost", HelperKind::Function, "custom", |env, name| {
            env.add_function(name, |_: String, _: i64| "fixed".to_string())
        });
        let library = HelperLibrary::standard().with(replacement);
        assert_eq!(library.get("cidrhost").map(Helper::summary), Some("custom"));
        assert_eq!(
            library.iter().filter(|h| h.name() == "cidrhost").count(),
            1
        );
    }

    #[test]
    fn empty_catalog_installs_nothing() {
        let library = HelperLibrary::empty();
        assert!(library.is_empty());
        assert_eq!(library.function_names().count(), 0);
    }
}
