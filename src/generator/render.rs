//! Template text and placeholder substitution.
//!
//! Placeholders are `{name}` tokens for a fixed set of names. Any other brace
//! (Rust blocks, format strings) passes through untouched.

pub const MAIN_SIMPLE: &str = include_str!("../../templates/main_simple.rs.tmpl");
pub const MAIN_MODE_DISPATCH: &str = include_str!("../../templates/main_batch.rs.tmpl");
pub const STAGES: &str = include_str!("../../templates/stages.rs.tmpl");
pub const RUNNER: &str = include_str!("../../templates/runner.rs.tmpl");
pub const CARGO_TOML: &str = include_str!("../../templates/Cargo.toml.tmpl");
pub const CONFIG_YAML: &str = include_str!("../../templates/config.yaml.tmpl");

/// Every placeholder name the templates may contain.
pub const PLACEHOLDERS: [&str; 5] = [
    "project_name",
    "crate_name",
    "runner_file",
    "runner_class",
    "surround_dep",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while",
    // reserved for future use
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
];

/// Substitute `{key}` tokens in one pass; substituted text is never re-scanned.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let hit = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Known placeholders still present in `rendered`.
pub fn unresolved_placeholders(rendered: &str) -> Vec<&'static str> {
    PLACEHOLDERS
        .iter()
        .copied()
        .filter(|name| rendered.contains(&format!("{{{name}}}")))
        .collect()
}

/// True for a non-keyword Rust identifier.
pub fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic());
    starts_ok
        && value != "_"
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !RUST_KEYWORDS.contains(&value)
}
