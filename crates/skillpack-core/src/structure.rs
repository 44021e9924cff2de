use std::path::Path;

use crate::manifest::MANIFEST_FILE;
use crate::report::Finding;

/// Recognized resource subdirectories of a package directory.
pub const RESOURCE_DIRS: &[&str] = &["scripts", "references", "assets"];

/// Root filenames whose content belongs in SKILL.md or references/.
pub const DISALLOWED_FILES: &[&str] = &[
    "README.md",
    "CHANGELOG.md",
    "INSTALLATION_GUIDE.md",
    "QUICK_REFERENCE.md",
];

/// Inspect the package directory tree, independent of header content.
///
/// A missing manifest gates everything: it is reported as the single
/// finding and no other tree check runs.
#[must_use]
pub fn validate_structure(skill_dir: &Path) -> Vec<Finding> {
    if !skill_dir.join(MANIFEST_FILE).is_file() {
        return vec![Finding::error("SKILL.md file is required")];
    }

    let mut findings = Vec::new();

    for filename in DISALLOWED_FILES {
        if skill_dir.join(filename).exists() {
            findings.push(Finding::error(format!(
                "'{filename}' should not be included in a skill. \
                 All documentation should be in SKILL.md or references/"
            )));
        }
    }

    for dirname in RESOURCE_DIRS {
        let path = skill_dir.join(dirname);
        if path.exists() && !path.is_dir() {
            findings.push(Finding::error(format!(
                "'{dirname}' must be a directory, not a file"
            )));
        }
    }

    findings.extend(script_permission_warnings(&skill_dir.join("scripts")));

    findings
}

/// Warn for each `scripts/*.py` file without an executable bit.
#[cfg(unix)]
fn script_permission_warnings(scripts_dir: &Path) -> Vec<Finding> {
    use std::os::unix::fs::PermissionsExt;

    let mut findings = Vec::new();
    let Ok(entries) = std::fs::read_dir(scripts_dir) else {
        return findings;
    };

    let mut paths: Vec<_> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if !path.is_file() || path.extension().is_none_or(|e| e != "py") {
            continue;
        }
        let Ok(meta) = std::fs::metadata(&path) else {
            continue;
        };
        if meta.permissions().mode() & 0o111 == 0 {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
            findings.push(Finding::warning(format!(
                "script '{}' is not executable. Run: chmod +x {}",
                name.unwrap_or_default(),
                path.display()
            )));
        }
    }

    findings
}

// Permission bits are not meaningful elsewhere.
#[cfg(not(unix))]
fn script_permission_warnings(_scripts_dir: &Path) -> Vec<Finding> {
    Vec::new()
}
