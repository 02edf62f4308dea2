//! Config command handlers.

use anyhow::{Context, Result};
use till_core::config::{self, Config};

pub fn path() {
    let path = config::paths::config_path();
    println!("{}", path.display());
    if !path.exists() {
        eprintln!("Not created yet; `till config init` writes the defaults there.");
    }
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

/// Prints the defaults merged into the commented template.
pub fn generate() -> Result<()> {
    print!("{}", Config::generate()?);
    Ok(())
}
