#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed frontmatter: {0}")]
    MalformedHeader(String),

    #[error("invalid skill name: {0}")]
    InvalidName(String),

    #[error("skill directory already exists: {}", .0.display())]
    AlreadyExists(std::path::PathBuf),

    #[error("unknown resource directory: {0} (expected scripts, references, or assets)")]
    UnknownResource(String),
}
