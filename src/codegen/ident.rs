use std::collections::HashSet;

use heck::{ToSnakeCase, ToUpperCamelCase};

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where",
    "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
];

// cannot be raw identifiers
const RESERVED_PLAIN: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Make `raw` a usable identifier.
fn escape(raw: String, fallback: &str) -> String {
    let ident = if raw.is_empty() { fallback.to_string() } else { raw };
    if RESERVED_PLAIN.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if RUST_KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}

pub fn type_ident(name: &str) -> String {
    escape(name.to_upper_camel_case(), "Element")
}

pub fn field_ident(name: &str) -> String {
    escape(name.to_snake_case(), "field")
}

/// Hands out identifiers unique within one scope, suffixing `_2`, `_3`, ...
#[derive(Debug, Default)]
pub struct Scope {
    taken: HashSet<String>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, ident: &str) {
        self.taken.insert(ident.to_string());
    }

    pub fn claim(&mut self, ident: String) -> String {
        if self.taken.insert(ident.clone()) {
            return ident;
        }
        // suffixed keywords are no longer keywords
        let base = ident.strip_prefix("r#").unwrap_or(&ident).to_string();
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_mapping() {
        assert_eq!(type_ident("catalog-item"), "CatalogItem");
        assert_eq!(type_ident("node1"), "Node1");
        assert_eq!(field_ident("nodeName"), "node_name");
        assert_eq!(field_ident("att1"), "att1");
    }

    #[test]
    fn keywords_are_escaped() {
        assert_eq!(field_ident("type"), "r#type");
        assert_eq!(field_ident("self"), "self_");
        assert_eq!(type_ident("self"), "Self_");
        assert_eq!(field_ident("---"), "field");
    }

    #[test]
    fn scope_disambiguates() {
        let mut scope = Scope::new();
        scope.reserve("text");
        assert_eq!(scope.claim("text".into()), "text_2");
        assert_eq!(scope.claim("a".into()), "a");
        assert_eq!(scope.claim("a".into()), "a_2");
        assert_eq!(scope.claim("r#type".into()), "r#type");
        assert_eq!(scope.claim("r#type".into()), "type_2");
    }
}
