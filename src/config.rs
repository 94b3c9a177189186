use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SchoolbookConfig {
    /// Path of the records file
    pub data: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("schoolbook.toml")
}

pub fn default_data_path_in(base: &Path) -> PathBuf {
    base.join("schoolbook.txt")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SchoolbookConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SchoolbookConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &SchoolbookConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Resolve the records file: explicit flag, then config, then default.
pub fn resolve_data_path(flag: Option<PathBuf>, config: Option<&SchoolbookConfig>) -> PathBuf {
    flag.or_else(|| config.and_then(|c| c.data.as_ref()).map(PathBuf::from))
        .unwrap_or_else(|| default_data_path_in(Path::new(".")))
}

pub fn ensure_data_dir(data_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = data_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
