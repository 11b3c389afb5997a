use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::request::RequestFile;

/// Run the init command
pub fn run(config_path: &Path, request_path: Option<&Path>, force: bool) -> Result<()> {
    if Config::exists(config_path) && !force {
        bail!(
            "Config already exists at {}\nUse another --config path, or --force to overwrite.",
            config_path.display()
        );
    }

    Config::default().save(config_path)?;
    info!("Config initialized at {}", config_path.display());
    println!("Config saved to: {}", config_path.display());

    if let Some(request_path) = request_path {
        if request_path.exists() && !force {
            bail!("Request file already exists at {}", request_path.display());
        }
        RequestFile::example().save(request_path)?;
        println!("Example request saved to: {}", request_path.display());
        println!("\nNext steps:");
        println!("  1. Edit {} with your project costs", request_path.display());
        println!("  2. Run 'ecsa-calc calculate {}'", request_path.display());
    }

    Ok(())
}
