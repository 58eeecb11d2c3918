use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: Server,
    #[serde(default)]
    pub root: Root,
    #[serde(default)]
    pub limits: Limits,
}

/// Overrides the install directory as the resource root.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Root {
    #[serde(default)]
    pub root_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub bind_addr: String,
    pub port: u16,
    #[serde(default = "default_base_path")]
    pub base_path: String,
}
fn default_base_path() -> String { "/assets".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct Limits {
    #[serde(default = "default_max_resource_kb")]
    pub max_resource_kb: usize,
}
fn default_max_resource_kb() -> usize { 16 * 1024 }

impl Default for Limits {
    fn default() -> Self { Self { max_resource_kb: default_max_resource_kb() } }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(dir) = &self.root.root_dir {
            if !dir.is_dir() {
                anyhow::bail!("root_dir does not exist or is not a directory: {}", dir.display());
            }
        }
        if !self.server.base_path.starts_with('/') { anyhow::bail!("base_path must start with '/'"); }
        if self.limits.max_resource_kb == 0 { anyhow::bail!("max_resource_kb must be > 0"); }
        Ok(())
    }
}
