use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use skillpack_core::scaffold::Resource;
use skillpack_core::{init_skill, package_skill, validate_skill};

/// Validate and package agent skill directories.
#[derive(Parser, Debug)]
#[command(name = "skillpack")]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a skill directory and package it into a .skill archive.
    Package {
        /// Path to the skill directory.
        skill_path: PathBuf,

        /// Output directory for the .skill file.
        #[arg(default_value = ".")]
        output_dir: PathBuf,

        /// Only validate, don't package.
        #[arg(long)]
        validate_only: bool,
    },

    /// Initialize a new skill directory with proper structure.
    Init {
        /// Name of the skill (lowercase letters, numbers, hyphens).
        name: String,

        /// Parent directory for the new skill.
        #[arg(long, value_name = "DIR")]
        path: PathBuf,

        /// Resource directories to create.
        #[arg(long, value_delimiter = ',', value_name = "scripts,references,assets")]
        resources: Vec<Resource>,
    },
}

fn main() -> ExitCode {
    init_subscriber();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Package {
            skill_path,
            output_dir,
            validate_only,
        } => package(&skill_path, &output_dir, validate_only),
        Command::Init {
            name,
            path,
            resources,
        } => init(&name, &path, &resources),
    }
    .map(|ok| if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn package(skill_path: &Path, output_dir: &Path, validate_only: bool) -> anyhow::Result<bool> {
    // Resolve so the directory-name binding sees the real name even
    // when invoked as `skillpack package .`.
    let skill_path = skill_path
        .canonicalize()
        .unwrap_or_else(|_| skill_path.to_path_buf());

    println!("Validating skill: {}", skill_path.display());

    let report = validate_skill(&skill_path);
    for finding in report.warnings() {
        println!("warning: {}", finding.message);
    }
    for finding in report.errors() {
        println!("error: {}", finding.message);
    }

    let error_count = report.errors().count();
    let warning_count = report.warnings().count();

    if error_count > 0 {
        println!("\nvalidation failed with {error_count} error(s)");
        if warning_count > 0 {
            println!("(plus {warning_count} warning(s))");
        }
        return Ok(false);
    }

    if warning_count > 0 {
        println!("\nvalidation passed with {warning_count} warning(s)");
    } else {
        println!("\nvalidation passed");
    }

    if validate_only {
        return Ok(true);
    }

    let archive = package_skill(&skill_path, output_dir).context("packaging failed")?;
    let size = std::fs::metadata(&archive)?.len();
    println!("created: {} ({size} bytes)", archive.display());

    Ok(true)
}

fn init(name: &str, path: &Path, resources: &[Resource]) -> anyhow::Result<bool> {
    let skill_dir = init_skill(name, path, resources)?;
    println!("created: {}", skill_dir.display());
    println!("\nNext steps:");
    println!(
        "  1. Fill in the TODO sections of {}/SKILL.md",
        skill_dir.display()
    );
    println!(
        "  2. Run `skillpack package {}` when ready",
        skill_dir.display()
    );
    Ok(true)
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
