use std::path::{Path, PathBuf};

use crate::error::SkillError;
use crate::fields::{MAX_NAME_LEN, is_valid_name};
use crate::manifest::MANIFEST_FILE;

/// Resource subdirectories a scaffolded skill can start with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Scripts,
    References,
    Assets,
}

impl std::str::FromStr for Resource {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scripts" => Ok(Self::Scripts),
            "references" => Ok(Self::References),
            "assets" => Ok(Self::Assets),
            other => Err(SkillError::UnknownResource(other.to_string())),
        }
    }
}

const REFERENCE_TEMPLATE: &str = "# Reference

## Overview

<!-- TODO: Add detailed reference content here -->
";

/// Create a new skill directory under `parent` with a templated
/// manifest and the requested resource subdirectories.
///
/// The generated manifest deliberately contains TODO placeholders, so
/// a freshly scaffolded skill fails validation until filled in.
///
/// # Errors
///
/// Returns [`SkillError::InvalidName`] if `name` violates the
/// identifier grammar or length bound, [`SkillError::AlreadyExists`]
/// if the target directory is present, or [`SkillError::Io`] on
/// filesystem failures.
pub fn init_skill(
    name: &str,
    parent: &Path,
    resources: &[Resource],
) -> Result<PathBuf, SkillError> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(SkillError::InvalidName(format!(
            "name must be {MAX_NAME_LEN} characters or less"
        )));
    }
    if !is_valid_name(name) {
        return Err(SkillError::InvalidName(format!(
            "'{name}' must be lowercase letters, numbers, and hyphens only"
        )));
    }

    let skill_dir = parent.join(name);
    if skill_dir.exists() {
        return Err(SkillError::AlreadyExists(skill_dir));
    }
    std::fs::create_dir_all(&skill_dir)?;

    std::fs::write(skill_dir.join(MANIFEST_FILE), skill_md_template(name, resources))?;
    tracing::info!(skill = name, dir = %skill_dir.display(), "scaffolded skill");

    if resources.contains(&Resource::Scripts) {
        let scripts = skill_dir.join("scripts");
        std::fs::create_dir(&scripts)?;
        let script = scripts.join("example.py");
        std::fs::write(&script, script_template(name))?;
        make_executable(&script)?;
    }

    if resources.contains(&Resource::References) {
        let refs = skill_dir.join("references");
        std::fs::create_dir(&refs)?;
        std::fs::write(refs.join("REFERENCE.md"), REFERENCE_TEMPLATE)?;
    }

    if resources.contains(&Resource::Assets) {
        let assets = skill_dir.join("assets");
        std::fs::create_dir(&assets)?;
        std::fs::write(assets.join(".gitkeep"), "")?;
    }

    Ok(skill_dir)
}

fn skill_md_template(name: &str, resources: &[Resource]) -> String {
    let references_section = if resources.contains(&Resource::References) {
        "\n## References\n\nFor detailed information, see:\n\
         - [REFERENCE.md](references/REFERENCE.md) - Detailed technical reference\n"
    } else {
        ""
    };
    let scripts_section = if resources.contains(&Resource::Scripts) {
        "\n## Scripts\n\nAvailable utility scripts:\n\
         - `scripts/example.py` - Example script (TODO: replace or remove)\n"
    } else {
        ""
    };

    format!(
        "---\n\
         name: {name}\n\
         description: TODO - Describe what this skill does AND when to use it. \
         Include keywords that help agents identify relevant tasks. (Max 1024 characters)\n\
         metadata:\n\
         \x20 author: TODO\n\
         \x20 version: \"1.0\"\n\
         ---\n\n\
         # {title}\n\n\
         ## Problem Statement\n\n\
         <!-- TODO: What problem does this skill solve? (2-3 sentences) -->\n\n\
         ## When to Use\n\n\
         - <!-- TODO: Specific scenario where this skill applies -->\n\
         - Keywords: <!-- TODO: terms someone might search for -->\n\n\
         ## Implementation Guide\n\n\
         <!-- TODO: Step-by-step instructions -->\n\
         {references_section}{scripts_section}\n\
         ## Common Pitfalls\n\n\
         1. **<!-- TODO -->**: Description and how to avoid it\n",
        title = title_case(name),
    )
}

fn script_template(name: &str) -> String {
    format!(
        "#!/usr/bin/env python3\n\
         \"\"\"Example script for the {name} skill.\n\n\
         TODO: Replace this with actual script functionality or delete if not needed.\n\
         \"\"\"\n\n\
         import sys\n\n\n\
         def main() -> None:\n\
         \x20   print(f\"Processing: {{sys.argv[1:]}}\")\n\n\n\
         if __name__ == \"__main__\":\n\
         \x20   main()\n"
    )
}

/// `code-pattern-extraction` -> `Code Pattern Extraction`.
fn title_case(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_skill;

    #[test]
    fn scaffolds_manifest_and_resources() {
        let dir = tempfile::tempdir().unwrap();
        let skill_dir = init_skill(
            "oauth-injection",
            dir.path(),
            &[Resource::Scripts, Resource::References, Resource::Assets],
        )
        .unwrap();

        assert!(skill_dir.join("SKILL.md").is_file());
        assert!(skill_dir.join("scripts/example.py").is_file());
        assert!(skill_dir.join("references/REFERENCE.md").is_file());
        assert!(skill_dir.join("assets/.gitkeep").is_file());

        let manifest = std::fs::read_to_string(skill_dir.join("SKILL.md")).unwrap();
        assert!(manifest.starts_with("---\nname: oauth-injection\n"));
        assert!(manifest.contains("# Oauth Injection"));
    }

    #[test]
    fn scaffolded_skill_fails_validation_until_filled_in() {
        let dir = tempfile::tempdir().unwrap();
        let skill_dir = init_skill("fresh-skill", dir.path(), &[]).unwrap();

        let report = validate_skill(&skill_dir);
        assert!(!report.passes());
        assert!(
            report
                .errors()
                .any(|f| f.message.contains("TODO placeholder"))
        );
    }

    #[test]
    fn invalid_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_skill("Bad_Name", dir.path(), &[]).unwrap_err();
        assert!(matches!(err, SkillError::InvalidName(_)));
        assert!(!dir.path().join("Bad_Name").exists());
    }

    #[test]
    fn existing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        init_skill("my-skill", dir.path(), &[]).unwrap();
        let err = init_skill("my-skill", dir.path(), &[]).unwrap_err();
        assert!(matches!(err, SkillError::AlreadyExists(_)));
    }

    #[cfg(unix)]
    #[test]
    fn example_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let skill_dir = init_skill("my-skill", dir.path(), &[Resource::Scripts]).unwrap();
        let mode = std::fs::metadata(skill_dir.join("scripts/example.py"))
            .unwrap()
            .permissions()
            .mode();
        assert_ne!(mode & 0o111, 0);
    }

    #[test]
    fn resource_parsing() {
        assert_eq!("scripts".parse::<Resource>().unwrap(), Resource::Scripts);
        assert!("docs".parse::<Resource>().is_err());
    }
}
