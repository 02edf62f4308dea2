use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "till maintainer tasks")]
struct Cli {
    #[command(subcommand)]
    command: Option<CommandName>,
}

#[derive(Debug, Default, Subcommand)]
enum CommandName {
    /// Rewrite till-core/default_config.toml from `till config generate`.
    #[default]
    UpdateDefaultConfig,
    /// Fail if default_config.toml is out of date with the Rust defaults.
    CheckDefaultConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        CommandName::UpdateDefaultConfig => update_default_config(),
        CommandName::CheckDefaultConfig => check_default_config(),
    }
}

fn default_config_path(root: &std::path::Path) -> PathBuf {
    root.join("crates").join("till-core").join("default_config.toml")
}

/// Runs `till config generate` with a throwaway TILL_HOME so neither the
/// user's config nor their log directory is touched.
fn generate_config() -> Result<Vec<u8>> {
    let root = project_root()?;
    let home = tempfile::tempdir().context("create temp dir for TILL_HOME")?;

    let output = Command::new("cargo")
        .current_dir(&root)
        .env("TILL_HOME", home.path())
        .args(["run", "-q", "-p", "till-cli", "--", "config", "generate"])
        .output()
        .context("run `cargo run -p till-cli -- config generate`")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("config generate failed: {stderr}");
    }
    Ok(output.stdout)
}

fn update_default_config() -> Result<()> {
    let dest = default_config_path(&project_root()?);
    let generated = generate_config()?;

    fs::write(&dest, &generated)
        .with_context(|| format!("write config to {}", dest.display()))?;

    println!("Updated {}", dest.display());
    Ok(())
}

fn check_default_config() -> Result<()> {
    let dest = default_config_path(&project_root()?);
    let generated = generate_config()?;
    let current = fs::read(&dest).with_context(|| format!("read {}", dest.display()))?;

    if current != generated {
        bail!(
            "{} is stale; run `cargo run -p xtask`",
            dest.display()
        );
    }
    println!("{} is up to date", dest.display());
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir
        .ancestors()
        .nth(2)
        .context("locate workspace root from CARGO_MANIFEST_DIR")?;
    Ok(root.to_path_buf())
}
