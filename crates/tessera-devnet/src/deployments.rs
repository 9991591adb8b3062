//! Deployment registry.
//!
//! Component addresses (and other named values such as a proposal id) are
//! recorded per network in `<dir>/<network>-addresses.json`, so later
//! steps can find what earlier ones deployed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::DevnetConfig;

/// Named values recorded for one network.
pub type Deployments = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct DeploymentRegistry {
    dir: PathBuf,
    network: String,
}

impl DeploymentRegistry {
    pub fn new(dir: impl Into<PathBuf>, network: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            network: network.into(),
        }
    }

    pub fn from_config(config: &DevnetConfig) -> Self {
        Self::new(config.deployments_dir.clone(), config.network.clone())
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// Path of this network's deployments file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}-addresses.json", self.network))
    }

    /// Everything recorded so far; empty if nothing was saved yet.
    pub fn load(&self) -> anyhow::Result<Deployments> {
        let path = self.path();
        if !path.exists() {
            return Ok(Deployments::new());
        }
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read deployments '{}': {}", path.display(), e))?;
        let deployments = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse deployments '{}': {}", path.display(), e))?;
        Ok(deployments)
    }

    /// Record `value` under `name`, replacing any previous value.
    pub fn save_deployment(&self, name: &str, value: &str) -> anyhow::Result<()> {
        let mut deployments = self.load()?;
        deployments.insert(name.to_string(), value.to_string());
        self.write(&deployments)?;
        tracing::debug!("Saved deployment {} = {} for {}", name, value, self.network);
        Ok(())
    }

    pub fn get_deployment(&self, name: &str) -> anyhow::Result<String> {
        match self.load()?.remove(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => anyhow::bail!(
                "Deployment \"{}\" not found for network \"{}\". Run the corresponding deploy step first.",
                name,
                self.network
            ),
        }
    }

    /// Remove this network's deployments file, if any.
    pub fn clear_deployments(&self) -> anyhow::Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to remove '{}': {}", path.display(), e))?;
        }
        Ok(())
    }

    fn write(&self, deployments: &Deployments) -> anyhow::Result<()> {
        ensure_dir(&self.dir)?;
        let contents = serde_json::to_string_pretty(deployments)?;
        let path = self.path();
        std::fs::write(&path, contents)
            .map_err(|e| anyhow::anyhow!("Failed to write deployments '{}': {}", path.display(), e))?;
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .map_err(|e| anyhow::anyhow!("Failed to create '{}': {}", dir.display(), e))?;
    }
    Ok(())
}
