use std::{env, io, path::PathBuf};

use anyhow::{Context, Result};

/// Resolves the application state directory, creating it if needed.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = base_state_dir()?.join("codepulse");

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

#[cfg(windows)]
fn base_state_dir() -> Result<PathBuf> {
    let appdata = env::var("APPDATA").context("APPDATA should be present on Windows")?;
    Ok(PathBuf::from(appdata))
}

#[cfg(not(windows))]
fn base_state_dir() -> Result<PathBuf> {
    if let Ok(state) = env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(state));
    }
    let home = env::var("HOME").context("Found neither XDG_STATE_HOME nor HOME")?;
    Ok(PathBuf::from(home).join(".local/state"))
}
