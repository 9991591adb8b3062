//! Governor and timelock parameters.

use serde::{Deserialize, Serialize};
use tessera_types::Amount;

use crate::error::GovernorError;

/// Quorum numerators are percentages.
pub const QUORUM_DENOMINATOR: u64 = 100;

/// Voting parameters. Delay and period are measured in blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorSettings {
    pub name: String,
    /// Blocks between proposal creation and the vote snapshot
    pub voting_delay: u64,
    /// Blocks the vote stays open
    pub voting_period: u64,
    /// Percent of the snapshot supply needed for quorum
    pub quorum_numerator: u64,
    /// Votes a proposer needs
    #[serde(with = "tessera_types::amount_string")]
    pub proposal_threshold: Amount,
}

impl Default for GovernorSettings {
    fn default() -> Self {
        Self {
            name: "GovernorContract".to_string(),
            voting_delay: 1,
            voting_period: 5,
            quorum_numerator: 4,
            proposal_threshold: 0,
        }
    }
}

impl GovernorSettings {
    pub fn validate(&self) -> Result<(), GovernorError> {
        if self.quorum_numerator > QUORUM_DENOMINATOR {
            return Err(GovernorError::InvalidSettings(format!(
                "quorum numerator {} exceeds {}",
                self.quorum_numerator, QUORUM_DENOMINATOR
            )));
        }
        if self.voting_period == 0 {
            return Err(GovernorError::InvalidSettings(
                "voting period must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Timelock parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelockSettings {
    /// Minimum delay in seconds
    pub min_delay: u64,
}

impl Default for TimelockSettings {
    fn default() -> Self {
        Self { min_delay: 3_600 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GovernorSettings::default();
        assert_eq!(settings.voting_delay, 1);
        assert_eq!(settings.voting_period, 5);
        assert_eq!(settings.quorum_numerator, 4);
        assert!(settings.validate().is_ok());
        assert_eq!(TimelockSettings::default().min_delay, 3_600);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = GovernorSettings {
            quorum_numerator: 101,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        settings.quorum_numerator = 4;
        settings.voting_period = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_json_threshold_is_string() {
        let settings = GovernorSettings {
            proposal_threshold: 10u128.pow(24),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"1000000000000000000000000\""));

        let back: GovernorSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
