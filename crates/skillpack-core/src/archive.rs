use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::SkillError;

/// Extension of the packaged output file.
pub const ARCHIVE_EXTENSION: &str = "skill";

// Exclusion policy for transient entries. Heuristic, not part of the
// manifest specification; kept in one place so it can be re-derived.
const HIDDEN_PREFIX: char = '.';
const CACHE_DIR_NAME: &str = "__pycache__";

fn excluded_name(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with(HIDDEN_PREFIX) || name == CACHE_DIR_NAME
}

/// Package a validated skill directory into `<name>.skill`.
///
/// Walks the directory in deterministic name order and writes every
/// regular file into a deflate-compressed zip, excluding entries with
/// a hidden or cache path segment below the package directory. Member
/// paths are relative to the package directory's parent, so the
/// package name is the archive's top-level folder. An existing archive
/// of the same name is overwritten silently.
///
/// The caller is responsible for checking that validation passed;
/// packaging does not re-validate.
///
/// # Errors
///
/// Returns [`SkillError::Io`] if a source file cannot be read or the
/// output cannot be written, and [`SkillError::Zip`] on container
/// errors. Partial output is left in place on failure.
pub fn package_skill(skill_dir: &Path, output_dir: &Path) -> Result<PathBuf, SkillError> {
    let skill_name = skill_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| SkillError::InvalidName("package directory has no name".into()))?;

    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join(format!("{skill_name}.{ARCHIVE_EXTENSION}"));

    let mut writer = ZipWriter::new(File::create(&output_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let walker = WalkDir::new(skill_dir)
        .sort_by_file_name()
        .into_iter()
        // The package directory itself may live under a hidden parent
        // (tempdirs do); the exclusion applies only below it.
        .filter_entry(|e| e.depth() == 0 || !excluded_name(e.file_name()));

    let mut included = 0usize;
    for entry in walker {
        let entry = entry.map_err(|e| SkillError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(skill_dir) else {
            continue;
        };
        let member = member_path(&skill_name, rel);
        writer.start_file(member.as_str(), options)?;
        let mut source = File::open(entry.path())?;
        io::copy(&mut source, &mut writer)?;
        tracing::debug!(member = %member, "archived");
        included += 1;
    }

    writer.finish()?;
    tracing::info!(archive = %output_path.display(), files = included, "skill packaged");

    Ok(output_path)
}

/// `/`-separated archive member path rooted at the package name.
fn member_path(skill_name: &str, rel: &Path) -> String {
    let mut member = skill_name.to_string();
    for component in rel.components() {
        member.push('/');
        member.push_str(&component.as_os_str().to_string_lossy());
    }
    member
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_skill(dir: &Path) -> PathBuf {
        let skill = dir.join("my-skill");
        std::fs::create_dir(&skill).unwrap();
        std::fs::write(skill.join("SKILL.md"), "---\nname: my-skill\n---\nbody\n").unwrap();
        skill
    }

    fn member_names(archive_path: &Path) -> Vec<String> {
        let file = File::open(archive_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn members_are_rooted_at_the_package_name() {
        let dir = tempfile::tempdir().unwrap();
        let skill = make_skill(dir.path());
        let scripts = skill.join("scripts");
        std::fs::create_dir(&scripts).unwrap();
        std::fs::write(scripts.join("run.py"), "print('hi')\n").unwrap();

        let out = package_skill(&skill, &dir.path().join("dist")).unwrap();
        assert_eq!(out.file_name().unwrap(), "my-skill.skill");

        let names = member_names(&out);
        assert_eq!(names, ["my-skill/SKILL.md", "my-skill/scripts/run.py"]);
    }

    #[test]
    fn hidden_and_cache_entries_are_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let skill = make_skill(dir.path());
        std::fs::write(skill.join(".hidden"), "secret").unwrap();
        let cache = skill.join("scripts").join("__pycache__");
        std::fs::create_dir_all(&cache).unwrap();
        std::fs::write(cache.join("run.cpython-312.pyc"), [0u8; 8]).unwrap();
        std::fs::write(skill.join("scripts").join("run.py"), "print('hi')\n").unwrap();
        let hidden_dir = skill.join(".git");
        std::fs::create_dir(&hidden_dir).unwrap();
        std::fs::write(hidden_dir.join("HEAD"), "ref").unwrap();

        let out = package_skill(&skill, &dir.path().join("dist")).unwrap();
        let names = member_names(&out);
        assert_eq!(names, ["my-skill/SKILL.md", "my-skill/scripts/run.py"]);
    }

    #[test]
    fn round_trip_preserves_content() {
        let dir = tempfile::tempdir().unwrap();
        let skill = make_skill(dir.path());
        let refs = skill.join("references");
        std::fs::create_dir(&refs).unwrap();
        std::fs::write(refs.join("guide.md"), "# Guide\ndetails\n").unwrap();

        let out = package_skill(&skill, &dir.path().join("dist")).unwrap();

        let extract_root = dir.path().join("extracted");
        let mut archive = zip::ZipArchive::new(File::open(&out).unwrap()).unwrap();
        archive.extract(&extract_root).unwrap();

        let original = std::fs::read(refs.join("guide.md")).unwrap();
        let extracted =
            std::fs::read(extract_root.join("my-skill/references/guide.md")).unwrap();
        assert_eq!(original, extracted);

        let manifest = std::fs::read(skill.join("SKILL.md")).unwrap();
        let extracted_manifest =
            std::fs::read(extract_root.join("my-skill/SKILL.md")).unwrap();
        assert_eq!(manifest, extracted_manifest);
    }

    #[test]
    fn repackaging_overwrites_silently() {
        let dir = tempfile::tempdir().unwrap();
        let skill = make_skill(dir.path());
        let dist = dir.path().join("dist");

        let first = package_skill(&skill, &dist).unwrap();
        std::fs::write(skill.join("extra.md"), "more\n").unwrap();
        let second = package_skill(&skill, &dist).unwrap();

        assert_eq!(first, second);
        let names = member_names(&second);
        assert_eq!(names, ["my-skill/SKILL.md", "my-skill/extra.md"]);
    }

    #[test]
    fn output_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let skill = make_skill(dir.path());
        let nested = dir.path().join("a").join("b").join("dist");

        let out = package_skill(&skill, &nested).unwrap();
        assert!(out.exists());
        assert!(out.starts_with(&nested));
    }
}
