//! String helpers: case conversion, quoting, prefix/suffix trimming and
//! indentation.

use minijinja::Value;

use super::{Helper, HelperKind};

/// Split an identifier into words on non-alphanumerics and case changes
/// (`HTTPServer` → `HTTP`, `Server`; `user_id` → `user`, `id`).
fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

pub fn snakecase(value: String) -> String {
    words(&value)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn kebabcase(value: String) -> String {
    words(&value)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// `http_server` → `HttpServer`.
pub fn camelcase(value: String) -> String {
    words(&value)
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn escape_double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Wrap in double quotes, escaping as a YAML/JSON double-quoted scalar.
pub fn quote(value: Value) -> String {
    match value.as_str() {
        Some(s) => escape_double_quoted(s),
        None => escape_double_quoted(&value.to_string()),
    }
}

/// Wrap in single quotes (no escaping).
pub fn squote(value: Value) -> String {
    format!("'{value}'")
}

pub fn trim_prefix(value: String, prefix: String) -> String {
    match value.strip_prefix(prefix.as_str()) {
        Some(rest) => rest.to_string(),
        None => value,
    }
}

pub fn trim_suffix(value: String, suffix: String) -> String {
    match value.strip_suffix(suffix.as_str()) {
        Some(rest) => rest.to_string(),
        None => value,
    }
}

/// Newline, then every line of `value` indented by `width` spaces.
pub fn nindent(value: String, width: usize) -> String {
    let pad = " ".repeat(width);
    format!("\n{pad}{}", value.replace('\n', &format!("\n{pad}")))
}

pub fn repeat(value: String, count: usize) -> String {
    value.repeat(count)
}

pub(super) fn helpers() -> Vec<Helper> {
    vec![
        Helper::new(
            "snakecase",
            HelperKind::Filter,
            "HttpServer | snakecase → http_server",
            |env, name| env.add_filter(name, snakecase),
        ),
        Helper::new(
            "camelcase",
            HelperKind::Filter,
            "http_server | camelcase → HttpServer",
            |env, name| env.add_filter(name, camelcase),
        ),
        Helper::new(
            "kebabcase",
            HelperKind::Filter,
            "HttpServer | kebabcase → http-server",
            |env, name| env.add_filter(name, kebabcase),
        ),
        Helper::new(
            "quote",
            HelperKind::Filter,
            "value | quote: wrap in escaped double quotes",
            |env, name| env.add_filter(name, quote),
        ),
        Helper::new(
            "squote",
            HelperKind::Filter,
            "value | squote: wrap in single quotes",
            |env, name| env.add_filter(name, squote),
        ),
        Helper::new(
            "trim_prefix",
            HelperKind::Filter,
            "value | trim_prefix(prefix): drop a leading prefix if present",
            |env, name| env.add_filter(name, trim_prefix),
        ),
        Helper::new(
            "trim_suffix",
            HelperKind::Filter,
            "value | trim_suffix(suffix): drop a trailing suffix if present",
            |env, name| env.add_filter(name, trim_suffix),
        ),
        Helper::new(
            "nindent",
            HelperKind::Filter,
            "value | nindent(width): newline, then indent every line",
            |env, name| env.add_filter(name, nindent),
        ),
        Helper::new(
            "repeat",
            HelperKind::Filter,
            "value | repeat(count): value repeated count times",
            |env, name| env.add_filter(name, repeat),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("HttpServer", "http_server")]
    #[case("HTTPServer", "http_server")]
    #[case("userID", "user_id")]
    #[case("already_snake", "already_snake")]
    #[case("kebab-case name", "kebab_case_name")]
    #[case("", "")]
    fn snake(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(snakecase(input.to_string()), expected);
    }

    #[test]
    fn camel_and_kebab() {
        assert_eq!(camelcase("http_server".into()), "HttpServer");
        assert_eq!(camelcase("API gateway".into()), "ApiGateway");
        assert_eq!(kebabcase("HttpServer".into()), "http-server");
    }

    #[test]
    fn quoting_escapes_embedded_quotes() {
        assert_eq!(quote(Value::from("say \"hi\"")), r#""say \"hi\"""#);
        assert_eq!(quote(Value::from(42)), r#""42""#);
        assert_eq!(squote(Value::from("x")), "'x'");
    }

    #[test]
    fn trimming_only_touches_matching_ends() {
        assert_eq!(trim_prefix("v1.2.3".into(), "v".into()), "1.2.3");
        assert_eq!(trim_prefix("1.2.3".into(), "v".into()), "1.2.3");
        assert_eq!(trim_suffix("app.yaml".into(), ".yaml".into()), "app");
    }

    #[test]
    fn nindent_prefixes_newline_and_indents_all_lines() {
        assert_eq!(nindent("a: 1\nb: 2".into(), 2), "\n  a: 1\n  b: 2");
    }
}
