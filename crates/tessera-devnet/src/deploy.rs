//! Full-system deployment.
//!
//! Order: token (supply to the deployer, who delegates to itself),
//! timelock, governor, timelock roles, value box, airdrop. Component
//! addresses are derived from the deployer and a running nonce.

use tessera_airdrop::{AirdropError, AirdropTree, MerkleAirdrop};
use tessera_crypto::{hash_with_domain, Keypair};
use tessera_governance::{Governor, Role, Targets, Timelock};
use tessera_token::{TokenError, VotingPowerLedger};
use tessera_types::{tokens, Address, Amount, BlockContext};

use crate::config::DevnetConfig;
use crate::devnet::Devnet;
use crate::error::DevnetError;
use crate::value_box::ValueBox;

const SIGNER_DOMAIN: &str = "tessera/devnet/signer";

/// Deterministic keypair for signer `index`.
pub fn signer_keypair(index: usize) -> Keypair {
    let seed = hash_with_domain(&(index as u64).to_be_bytes(), SIGNER_DOMAIN);
    Keypair::from_seed(seed.as_bytes())
}

/// Derives component addresses from the deployer's nonce.
struct AddressAllocator {
    deployer: Address,
    nonce: u64,
}

impl AddressAllocator {
    fn next(&mut self) -> Address {
        let address = Address::created_by(&self.deployer, self.nonce);
        self.nonce += 1;
        address
    }
}

impl Devnet {
    /// Deploy and wire every component, then mine the genesis block.
    ///
    /// Signer 0 deploys. Airdrop allocations go to signers 1, 2, ... in
    /// config order and are funded from the deployer's balance.
    pub fn deploy(config: &DevnetConfig) -> Result<Self, DevnetError> {
        let signers: Vec<Keypair> = (0..config.accounts.max(1)).map(signer_keypair).collect();
        let deployer = signers
            .first()
            .map(Keypair::address)
            .ok_or(DevnetError::UnknownAccount(0))?;
        let ctx = BlockContext::new(0, config.genesis_timestamp);
        let mut addresses = AddressAllocator { deployer, nonce: 0 };

        let mut token = VotingPowerLedger::with_initial_supply(
            &ctx,
            config.token.name.clone(),
            config.token.symbol.clone(),
            addresses.next(),
            deployer,
            tokens(Amount::from(config.token.initial_supply)),
        )?;
        token.delegate(&ctx, deployer, deployer)?;

        let mut timelock = Timelock::new(
            addresses.next(),
            config.timelock.min_delay,
            &[],
            &[],
            Some(deployer),
        );
        let governor = Governor::new(
            addresses.next(),
            config.governor.clone(),
            token.address(),
            timelock.address(),
        )?;

        timelock.grant_role(deployer, Role::Proposer, governor.address())?;
        timelock.grant_role(deployer, Role::Canceller, governor.address())?;
        timelock.grant_role(deployer, Role::Executor, Address::ZERO)?;
        timelock.revoke_role(deployer, Role::Admin, deployer)?;

        let box_address = addresses.next();
        let mut targets = Targets::new();
        targets.deploy(box_address, ValueBox::new(timelock.address()));

        let allocations = config
            .airdrop
            .allocations
            .iter()
            .enumerate()
            .map(|(i, whole)| {
                let recipient = signers
                    .get(i + 1)
                    .map(Keypair::address)
                    .ok_or(DevnetError::UnknownAccount(i + 1))?;
                Ok((recipient, tokens(Amount::from(*whole))))
            })
            .collect::<Result<Vec<(Address, Amount)>, DevnetError>>()?;
        let airdrop_tree = AirdropTree::from_allocations(&allocations)?;
        let airdrop = MerkleAirdrop::new(addresses.next(), token.address(), airdrop_tree.root());
        let funding = airdrop_tree
            .total()
            .ok_or(AirdropError::Token(TokenError::Overflow))?;
        if funding > 0 {
            token.transfer(&ctx, deployer, airdrop.address(), funding)?;
        }

        tracing::info!(
            "Deployed {} on {}: token {}, timelock {}, governor {}, box {}, airdrop {} ({} recipients)",
            config.token.symbol,
            config.network,
            token.address(),
            timelock.address(),
            governor.address(),
            box_address,
            airdrop.address(),
            airdrop_tree.len()
        );

        let mut devnet = Devnet {
            network: config.network.clone(),
            ctx,
            block_time: config.block_time,
            signers,
            token,
            timelock,
            governor,
            targets,
            box_address,
            airdrop,
            airdrop_tree,
        };
        let genesis_logs = devnet.drain_logs();
        tracing::debug!("Genesis emitted {} events", genesis_logs.len());
        devnet.mine_blocks(1);
        Ok(devnet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AirdropConfig;

    #[test]
    fn test_signers_are_deterministic() {
        assert_eq!(signer_keypair(3).address(), signer_keypair(3).address());
        assert_ne!(signer_keypair(0).address(), signer_keypair(1).address());
    }

    #[test]
    fn test_roles_after_deploy() {
        let devnet = Devnet::deploy(&DevnetConfig::default()).unwrap();
        let deployer = devnet.deployer().unwrap();
        let timelock = devnet.timelock();
        let governor = devnet.governor().address();

        assert!(timelock.has_role(Role::Proposer, &governor));
        assert!(timelock.has_role(Role::Canceller, &governor));
        assert!(timelock.has_role(Role::Executor, &Address::ZERO));
        assert!(timelock.has_role(Role::Admin, &timelock.address()));
        assert!(!timelock.has_role(Role::Admin, &deployer));
        assert!(!timelock.has_role(Role::Proposer, &deployer));
    }

    #[test]
    fn test_balances_after_deploy() {
        let devnet = Devnet::deploy(&DevnetConfig::default()).unwrap();
        let deployer = devnet.deployer().unwrap();
        let token = devnet.token();

        assert_eq!(token.total_supply(), tokens(1_000_000));
        assert_eq!(token.balance_of(&deployer), tokens(100_000));
        assert_eq!(token.balance_of(&devnet.airdrop().address()), tokens(900_000));
        // Airdropped tokens are not delegated
        assert_eq!(token.votes(&deployer), tokens(100_000));
        assert_eq!(devnet.block_number(), 1);
    }

    #[test]
    fn test_box_owned_by_timelock() {
        let devnet = Devnet::deploy(&DevnetConfig::default()).unwrap();
        let value_box = devnet.targets().get::<ValueBox>(&devnet.box_address()).unwrap();
        assert_eq!(value_box.owner(), devnet.timelock().address());
        assert_eq!(devnet.box_value().unwrap(), 0);
    }

    #[test]
    fn test_disabled_airdrop_is_unfunded() {
        let config = DevnetConfig {
            airdrop: AirdropConfig::disabled(),
            ..DevnetConfig::default()
        };
        let devnet = Devnet::deploy(&config).unwrap();
        let deployer = devnet.deployer().unwrap();

        assert!(devnet.airdrop_tree().is_empty());
        assert_eq!(devnet.token().balance_of(&deployer), tokens(1_000_000));
        assert_eq!(devnet.airdrop().remaining(devnet.token()), 0);
    }

    #[test]
    fn test_too_few_signers_for_airdrop() {
        let config = DevnetConfig {
            accounts: 2,
            ..DevnetConfig::default()
        };
        assert_eq!(
            Devnet::deploy(&config).unwrap_err(),
            DevnetError::UnknownAccount(2)
        );
    }

    #[test]
    fn test_addresses_distinct() {
        let devnet = Devnet::deploy(&DevnetConfig::default()).unwrap();
        let mut addresses = vec![
            devnet.token().address(),
            devnet.timelock().address(),
            devnet.governor().address(),
            devnet.box_address(),
            devnet.airdrop().address(),
        ];
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), 5);
    }

    #[test]
    fn test_unknown_proposal() {
        let devnet = Devnet::deploy(&DevnetConfig::default()).unwrap();
        let err = devnet.state(&tessera_types::Hash::compute(b"nothing")).unwrap_err();
        assert!(matches!(
            err,
            DevnetError::Governor(tessera_governance::GovernorError::NonexistentProposal(_))
        ));
    }
}
