use serde_yaml::{Mapping, Value};

use crate::error::SkillError;

/// Fixed manifest filename at the root of every package directory.
pub const MANIFEST_FILE: &str = "SKILL.md";

/// Decoded YAML frontmatter of a manifest.
///
/// Arbitrary nested metadata is preserved; the typed accessors only
/// cover the keys the validator cares about.
#[derive(Clone, Debug)]
pub struct Header {
    mapping: Mapping,
}

impl Header {
    #[must_use]
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.mapping.get(Value::from(key))
    }

    /// The `name` field, if present as a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    /// The `description` field, if present as a string.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.get("description").and_then(Value::as_str)
    }

    /// String representation of the optional `compatibility` field.
    ///
    /// Strings are returned verbatim; structured values are
    /// re-serialized as YAML and trimmed.
    #[must_use]
    pub fn compatibility(&self) -> Option<String> {
        match self.get("compatibility")? {
            Value::String(s) => Some(s.clone()),
            other => Some(
                serde_yaml::to_string(other)
                    .unwrap_or_default()
                    .trim_end()
                    .to_string(),
            ),
        }
    }
}

/// Extract and decode the YAML frontmatter block of a manifest.
///
/// The document must begin with a `---` sentinel line and contain a
/// matching closing sentinel later. Returns the decoded header plus
/// the byte offset where the body begins.
///
/// # Errors
///
/// Returns [`SkillError::MalformedHeader`] when the opening sentinel
/// is absent, the closing sentinel is never found, the block is not
/// valid YAML, or the decoded value is not a mapping.
pub fn parse_frontmatter(content: &str) -> Result<(Header, usize), SkillError> {
    if !content.starts_with("---") {
        return Err(SkillError::MalformedHeader(
            "SKILL.md must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let Some((yaml_end, body_start)) = find_closing_sentinel(rest) else {
        return Err(SkillError::MalformedHeader(
            "SKILL.md frontmatter must be closed with ---".into(),
        ));
    };

    let value: Value = serde_yaml::from_str(&rest[..yaml_end])
        .map_err(|e| SkillError::MalformedHeader(format!("invalid YAML in frontmatter: {e}")))?;
    let Value::Mapping(mapping) = value else {
        return Err(SkillError::MalformedHeader(
            "frontmatter must be a YAML mapping".into(),
        ));
    };

    Ok((Header { mapping }, 3 + body_start))
}

/// Find a `---` line terminating the frontmatter, ignoring trailing
/// whitespace on the sentinel line. Returns byte offsets into `rest`
/// for the end of the YAML block and the start of the body.
fn find_closing_sentinel(rest: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(pos) = rest[from..].find("\n---") {
        let at = from + pos;
        let line_rest = &rest[at + 4..];
        let (line, body_start) = match line_rest.find('\n') {
            Some(nl) => (&line_rest[..nl], at + 4 + nl + 1),
            None => (line_rest, rest.len()),
        };
        if line.trim().is_empty() {
            return Some((at, body_start));
        }
        from = at + 1;
    }
    None
}
