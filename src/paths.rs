use anyhow::{Result, bail};
use std::{env, path::PathBuf};

#[derive(Clone)]
pub struct Paths {
    pub config: PathBuf,
}

/// `$XDG_CONFIG_HOME/ghup`, falling back to `~/.config/ghup`.
pub fn ghup_home() -> Result<PathBuf> {
    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join("ghup"));
    }
    match env::var_os("HOME").filter(|v| !v.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join(".config").join("ghup")),
        None => bail!("neither XDG_CONFIG_HOME nor HOME is set"),
    }
}

pub fn paths() -> Result<Paths> {
    let home = ghup_home()?;
    Ok(Paths {
        config: home.join("config.toml"),
    })
}
