use std::sync::LazyLock;

use regex::Regex;

use crate::manifest::Header;
use crate::report::Finding;

pub const MAX_NAME_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 1024;
pub const MIN_DESCRIPTION_LEN: usize = 50;
pub const MAX_COMPATIBILITY_LEN: usize = 500;

/// Lowercase-alphanumeric segments joined by single hyphens.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

/// Phrases hinting that a description explains WHEN to use the skill.
const WHEN_INDICATORS: &[&str] = &[
    "use when",
    "use for",
    "when the user",
    "when you need",
    "triggers when",
];

/// True when `name` satisfies the identifier grammar.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Apply every per-field rule to the decoded header.
///
/// Findings are appended in field order (name, description,
/// compatibility); no check depends on another's outcome.
#[must_use]
pub fn validate_fields(header: &Header, directory_name: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    validate_name(
        header.name().unwrap_or_default(),
        directory_name,
        &mut findings,
    );
    validate_description(header.description().unwrap_or_default(), &mut findings);
    if let Some(compat) = header.compatibility() {
        let len = compat.chars().count();
        if len > MAX_COMPATIBILITY_LEN {
            findings.push(Finding::error(format!(
                "compatibility must be {MAX_COMPATIBILITY_LEN} characters or less (got {len})"
            )));
        }
    }
    findings
}

fn validate_name(name: &str, directory_name: &str, findings: &mut Vec<Finding>) {
    if name.is_empty() {
        findings.push(Finding::error("name field is required"));
        return;
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        findings.push(Finding::error(format!(
            "name must be {MAX_NAME_LEN} characters or less (got {len})"
        )));
    }

    if !is_valid_name(name) {
        findings.push(Finding::error(
            "name must be lowercase letters, numbers, and hyphens only. \
             Cannot start/end with hyphen or have consecutive hyphens.",
        ));
    }

    if name != directory_name {
        findings.push(Finding::error(format!(
            "name '{name}' must match directory name '{directory_name}'"
        )));
    }
}

fn validate_description(description: &str, findings: &mut Vec<Finding>) {
    if description.is_empty() {
        findings.push(Finding::error("description field is required"));
        return;
    }

    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        findings.push(Finding::error(format!(
            "description must be {MAX_DESCRIPTION_LEN} characters or less (got {len})"
        )));
    }

    let lower = description.to_lowercase();

    if len < MIN_DESCRIPTION_LEN {
        findings.push(Finding::warning(
            "description is very short. Include both WHAT the skill does and WHEN to use it.",
        ));
    }

    if lower.contains("todo") {
        findings.push(Finding::error("description contains TODO placeholder"));
    }

    if !WHEN_INDICATORS.iter().any(|i| lower.contains(i)) {
        findings.push(Finding::warning(
            "description should explain WHEN to use the skill (e.g., 'Use when...')",
        ));
    }
}
