use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use nebula_core::config::SessionConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save the default SessionConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let toml_str = SessionConfig::default().to_toml_string()?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}

/// Read a session config file, or the defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    SessionConfig::from_toml_str(&contents)
        .with_context(|| format!("Invalid session config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_without_path() {
        assert_eq!(load(None).unwrap(), SessionConfig::default());
    }

    #[test]
    fn test_written_default_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        run(&ConfigArgs {
            output: Some(path.clone()),
        })
        .unwrap();
        assert_eq!(load(Some(&path)).unwrap(), SessionConfig::default());
    }

    #[test]
    fn test_missing_file_mentions_path() {
        let err = load(Some(Path::new("/nonexistent/session.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/session.toml"));
    }
}
