//! Devnet configuration.
//!
//! Handles loading and validation of the devnet configuration from
//! TOML files.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tessera_governance::{GovernorSettings, TimelockSettings};

/// Devnet configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevnetConfig {
    /// Network name, used for the deployments file
    pub network: String,
    /// Directory holding `<network>-addresses.json`
    pub deployments_dir: PathBuf,
    /// Number of funded-by-seed signers
    pub accounts: usize,
    /// Genesis block timestamp (seconds)
    pub genesis_timestamp: u64,
    /// Seconds between consecutive blocks
    pub block_time: u64,
    pub token: TokenConfig,
    pub governor: GovernorSettings,
    pub timelock: TimelockSettings,
    pub airdrop: AirdropConfig,
    pub logging: LoggingConfig,
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self {
            network: "localhost".to_string(),
            deployments_dir: PathBuf::from("./deployments"),
            accounts: 10,
            genesis_timestamp: 1_700_000_000,
            block_time: 1,
            token: TokenConfig::default(),
            governor: GovernorSettings::default(),
            timelock: TimelockSettings::default(),
            airdrop: AirdropConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DevnetConfig {
    /// Load configuration from file.
    /// Path is validated to prevent directory traversal.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        reject_traversal(path)?;

        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: DevnetConfig = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file.
    /// Path is validated to prevent directory traversal.
    pub fn to_file(&self, path: &Path) -> anyhow::Result<()> {
        reject_traversal(path)?;

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|e| anyhow::anyhow!("Failed to write config file '{}': {}", path.display(), e))?;
        Ok(())
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.network.is_empty()
            || !self
                .network
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!("Invalid network name '{}'", self.network);
        }
        reject_traversal(&self.deployments_dir)?;

        if self.block_time == 0 {
            anyhow::bail!("Block time cannot be 0");
        }
        // Signer 0 deploys, airdrop recipients are signers 1..
        if self.accounts < self.airdrop.allocations.len() + 1 {
            anyhow::bail!(
                "{} accounts cannot cover the deployer and {} airdrop recipients",
                self.accounts,
                self.airdrop.allocations.len()
            );
        }

        let airdropped: u64 = self.airdrop.allocations.iter().sum();
        if airdropped > self.token.initial_supply {
            anyhow::bail!(
                "Airdrop of {} tokens exceeds the initial supply of {}",
                airdropped,
                self.token.initial_supply
            );
        }

        self.governor
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid governor settings: {}", e))?;
        Ok(())
    }

    /// Whether this config targets a local development network.
    pub fn is_local_network(&self) -> bool {
        matches!(self.network.as_str(), "localhost" | "devnet")
    }
}

fn reject_traversal(path: &Path) -> anyhow::Result<()> {
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        anyhow::bail!("Invalid path '{}': directory traversal detected", path.display());
    }
    Ok(())
}

/// Governance token parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    /// Whole tokens minted to the deployer
    pub initial_supply: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "GovernanceToken".to_string(),
            symbol: "GT".to_string(),
            initial_supply: 1_000_000,
        }
    }
}

/// Airdrop allocations in whole tokens, assigned to signers 1, 2, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirdropConfig {
    pub allocations: Vec<u64>,
}

impl Default for AirdropConfig {
    fn default() -> Self {
        Self {
            allocations: vec![450_000, 450_000],
        }
    }
}

impl AirdropConfig {
    /// No allocations: the airdrop is deployed empty and unfunded.
    pub fn disabled() -> Self {
        Self {
            allocations: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive
    pub level: String,
    /// JSON output instead of pretty
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
