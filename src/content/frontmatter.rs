//! Front-matter parsing and lenient attribute coercion

use serde_yaml::{Mapping, Value};

/// Attribute block at the top of a content file
///
/// Attributes are kept as raw YAML values and coerced field by field, so a
/// single badly typed attribute never invalidates the rest of the block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    attributes: Mapping,
}

impl FrontMatter {
    /// Split a file into its attributes and body
    ///
    /// The body is always returned. The attributes are `Err` with a reason when
    /// a delimited block exists but is not valid YAML/JSON; in that case the
    /// whole file is treated as body.
    pub fn parse(content: &str) -> (Result<Self, String>, &str) {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if let Some((block, body)) = split_yaml(content) {
            return match parse_yaml_block(block) {
                Ok(Some(fm)) => (Ok(fm), body),
                // A `---` fenced paragraph of prose, not an attribute block
                Ok(None) => (Ok(FrontMatter::default()), content),
                Err(e) => (Err(e), content),
            };
        }

        if let Some((block, body)) = split_json(content) {
            return match parse_json_block(block) {
                Ok(fm) => (Ok(fm), body),
                Err(e) => (Err(e), content),
            };
        }

        (Ok(FrontMatter::default()), content)
    }

    /// Whether the attribute is present and not null
    #[cfg(test)]
    pub fn has(&self, key: &str) -> bool {
        !matches!(self.get(key), None | Some(Value::Null))
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// String attribute; scalars are stringified, empty strings count as absent
    pub fn string(&self, key: &str) -> Result<Option<String>, String> {
        let value = match self.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(v) => v,
        };
        let s = scalar_to_string(value)
            .ok_or_else(|| format!("expected a string, found {}", type_name(value)))?;
        Ok(if s.is_empty() { None } else { Some(s) })
    }

    /// Tag list; a single scalar becomes a one-element list
    pub fn tags(&self, key: &str) -> Result<Option<Vec<String>>, String> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    scalar_to_string(item).ok_or_else(|| {
                        format!("expected a list of strings, found {}", type_name(item))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(value) => scalar_to_string(value)
                .map(|s| Some(vec![s]))
                .ok_or_else(|| format!("expected a list of strings, found {}", type_name(value))),
        }
    }

    /// Non-negative integer attribute; numeric strings are accepted
    pub fn unsigned(&self, key: &str) -> Result<Option<u64>, String> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| format!("expected a non-negative integer, found {}", n)),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| format!("expected a non-negative integer, found {:?}", s)),
            Some(value) => Err(format!(
                "expected a non-negative integer, found {}",
                type_name(value)
            )),
        }
    }
}

/// Locate a `---` fenced block; returns (block, body)
fn split_yaml(content: &str) -> Option<(&str, &str)> {
    let first_line_end = content.find('\n')?;
    if content[..first_line_end].trim_end() != "---" {
        return None;
    }

    let rest = &content[first_line_end + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let block = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Some((block, body));
        }
        offset += line.len();
    }

    // No closing fence, not front matter
    None
}

/// Locate a `;;;` fenced or bare `{...}` JSON block; returns (block, body)
fn split_json(content: &str) -> Option<(&str, &str)> {
    if let Some(rest) = content.strip_prefix(";;;") {
        let end_pos = rest.find(";;;")?;
        let block = &rest[..end_pos];
        let body = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
        return Some((block, body));
    }

    if content.starts_with('{') {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let body = content[i + 1..].trim_start_matches(['\n', '\r']);
                        return Some((&content[..i + 1], body));
                    }
                }
                _ => {}
            }
        }
    }

    None
}

fn parse_yaml_block(block: &str) -> Result<Option<FrontMatter>, String> {
    if block.trim().is_empty() {
        return Ok(Some(FrontMatter::default()));
    }

    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(attributes)) => Ok(Some(FrontMatter { attributes })),
        Ok(Value::Null) => Ok(Some(FrontMatter::default())),
        Ok(_) => Ok(None),
        Err(e) => Err(format!("invalid YAML front-matter: {}", e)),
    }
}

fn parse_json_block(block: &str) -> Result<FrontMatter, String> {
    let block = block.trim();
    // `;;;` blocks may omit the outer braces
    let wrapped;
    let json = if block.starts_with('{') {
        block
    } else {
        wrapped = format!("{{{}}}", block);
        &wrapped
    };

    match serde_json::from_str::<Value>(json) {
        Ok(Value::Mapping(attributes)) => Ok(FrontMatter { attributes }),
        Ok(other) => Err(format!(
            "JSON front-matter must be an object, found {}",
            type_name(&other)
        )),
        Err(e) => Err(format!("invalid JSON front-matter: {}", e)),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
tags:
  - rust
  - ml
views: 42
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content);
        let fm = fm.unwrap();
        assert_eq!(fm.string("title").unwrap(), Some("Hello World".to_string()));
        assert_eq!(fm.string("date").unwrap(), Some("2024-01-15".to_string()));
        assert_eq!(
            fm.tags("tags").unwrap(),
            Some(vec!["rust".to_string(), "ml".to_string()])
        );
        assert_eq!(fm.unsigned("views").unwrap(), Some(42));
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Test {Post}", "tags": ["a", "b"]}

This is content.
"#;

        let (fm, body) = FrontMatter::parse(content);
        let fm = fm.unwrap();
        assert_eq!(fm.string("title").unwrap(), Some("Test {Post}".to_string()));
        assert_eq!(
            fm.tags("tags").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(body, "This is content.\n");
    }

    #[test]
    fn test_parse_semicolon_json_frontmatter() {
        let content = ";;;\n\"title\": \"Fenced\"\n;;;\nBody";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.unwrap().string("title").unwrap(), Some("Fenced".to_string()));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = FrontMatter::parse("# Just markdown\n");
        assert_eq!(fm.unwrap(), FrontMatter::default());
        assert_eq!(body, "# Just markdown\n");
    }

    #[test]
    fn test_unclosed_fence_is_body() {
        let content = "---\ntitle: Oops\n\nNo closing fence";
        let (fm, body) = FrontMatter::parse(content);
        assert!(!fm.unwrap().has("title"));
        assert_eq!(body, content);
    }

    #[test]
    fn test_prose_between_rules_is_body() {
        let content = "---\nJust a thought between two rules\n---\nMore text";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.unwrap(), FrontMatter::default());
        assert!(body.contains("Just a thought"));
    }

    #[test]
    fn test_invalid_yaml_reports_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.unwrap_err().contains("invalid YAML"));
        assert_eq!(body, content);
    }

    #[test]
    fn test_single_string_tags() {
        let (fm, _) = FrontMatter::parse("---\ntags: Notes\n---\n");
        assert_eq!(fm.unwrap().tags("tags").unwrap(), Some(vec!["Notes".to_string()]));
    }

    #[test]
    fn test_tags_keep_case_and_order() {
        let (fm, _) = FrontMatter::parse("---\ntags: [ML, ml, 2024]\n---\n");
        assert_eq!(
            fm.unwrap().tags("tags").unwrap(),
            Some(vec!["ML".to_string(), "ml".to_string(), "2024".to_string()])
        );
    }

    #[test]
    fn test_bad_types_are_errors() {
        let (fm, _) = FrontMatter::parse(
            "---\ntitle: {nested: true}\ntags: [[a]]\nviews: -3\nreadingTime: lots\n---\n",
        );
        let fm = fm.unwrap();
        assert!(fm.string("title").is_err());
        assert!(fm.tags("tags").is_err());
        assert!(fm.unsigned("views").is_err());
        assert!(fm.unsigned("readingTime").is_err());
    }

    #[test]
    fn test_null_and_empty_are_absent() {
        let (fm, _) = FrontMatter::parse("---\ntitle: \"\"\ntags:\nviews: ~\n---\n");
        let fm = fm.unwrap();
        assert_eq!(fm.string("title").unwrap(), None);
        assert_eq!(fm.tags("tags").unwrap(), None);
        assert_eq!(fm.unsigned("views").unwrap(), None);
        assert!(!fm.has("views"));
    }

    #[test]
    fn test_numeric_string_counts() {
        let (fm, _) = FrontMatter::parse("---\nviews: \"17\"\n---\n");
        assert_eq!(fm.unwrap().unsigned("views").unwrap(), Some(17));
    }
}
