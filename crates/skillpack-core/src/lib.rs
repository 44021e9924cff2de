//! SKILL.md frontmatter parsing, validation rules, and `.skill` packaging.

use std::path::Path;

pub mod archive;
pub mod error;
pub mod fields;
pub mod manifest;
pub mod report;
pub mod scaffold;
pub mod structure;

pub use archive::package_skill;
pub use error::SkillError;
pub use report::{Finding, Severity, ValidationReport};
pub use scaffold::init_skill;

/// Advisory limit on total manifest length.
pub const MAX_MANIFEST_LINES: usize = 500;

/// Run every validation pass over a package directory.
///
/// Header and field findings come first, tree findings after, each in
/// its own discovery order. A malformed header suppresses field checks
/// only; the tree validator always runs.
#[must_use]
pub fn validate_skill(skill_dir: &Path) -> ValidationReport {
    if !skill_dir.exists() {
        return ValidationReport::new(vec![Finding::error(format!(
            "skill path does not exist: {}",
            skill_dir.display()
        ))]);
    }
    if !skill_dir.is_dir() {
        return ValidationReport::new(vec![Finding::error(format!(
            "skill path must be a directory: {}",
            skill_dir.display()
        ))]);
    }

    let directory_name = skill_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut findings = validate_manifest(skill_dir, &directory_name);
    findings.extend(structure::validate_structure(skill_dir));
    ValidationReport::new(findings)
}

/// Header, field, and document-level checks for SKILL.md.
fn validate_manifest(skill_dir: &Path, directory_name: &str) -> Vec<Finding> {
    let manifest_path = skill_dir.join(manifest::MANIFEST_FILE);
    let content = match std::fs::read_to_string(&manifest_path) {
        Ok(content) => content,
        // A missing manifest is the tree validator's single finding.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => return vec![Finding::error(format!("failed to read SKILL.md: {e}"))],
    };

    let mut findings = Vec::new();
    match manifest::parse_frontmatter(&content) {
        Ok((header, _)) => findings.extend(fields::validate_fields(&header, directory_name)),
        Err(SkillError::MalformedHeader(message)) => findings.push(Finding::error(message)),
        Err(e) => findings.push(Finding::error(e.to_string())),
    }

    let line_count = content.lines().count();
    if line_count > MAX_MANIFEST_LINES {
        findings.push(Finding::warning(format!(
            "SKILL.md should be under {MAX_MANIFEST_LINES} lines (got {line_count}). \
             Consider moving content to references/"
        )));
    }

    if content.contains("<!-- TODO") || content.contains("# TODO") {
        findings.push(Finding::warning(
            "SKILL.md contains TODO placeholders that should be filled in",
        ));
    }

    findings
}
