//! Signed approvals.
//!
//! An owner signs a `Permit` off-ledger; anyone may submit it. The nonce in
//! the message must equal the owner's current nonce, so every permit is
//! usable exactly once.

use borsh::{BorshDeserialize, BorshSerialize};
use tessera_crypto::{Keypair, PublicKey, Signature};
use tessera_types::{Address, Amount, Timepoint};

const PERMIT_DOMAIN: &[u8] = b"tessera/permit/v1";

/// Approval message signed by the owner.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Permit {
    /// Token the approval is valid for
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
    pub value: Amount,
    pub nonce: u64,
    /// Last block timestamp at which the permit may be used
    pub deadline: Timepoint,
}

impl Permit {
    /// Bytes covered by the signature: the domain tag followed by the
    /// borsh layout of the permit (fixed-width little-endian fields).
    pub fn signing_message(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(PERMIT_DOMAIN.len() + 92);
        message.extend_from_slice(PERMIT_DOMAIN);
        message.extend_from_slice(self.token.as_bytes());
        message.extend_from_slice(self.owner.as_bytes());
        message.extend_from_slice(self.spender.as_bytes());
        message.extend_from_slice(&self.value.to_le_bytes());
        message.extend_from_slice(&self.nonce.to_le_bytes());
        message.extend_from_slice(&self.deadline.to_le_bytes());
        message
    }

    pub fn sign(self, keypair: &Keypair) -> SignedPermit {
        let signature = keypair.sign(&self.signing_message());
        SignedPermit {
            permit: self,
            public_key: keypair.public_key(),
            signature,
        }
    }
}

/// A permit together with the owner's key and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPermit {
    pub permit: Permit,
    pub public_key: PublicKey,
    pub signature: Signature,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permit(nonce: u64) -> Permit {
        Permit {
            token: Address::from_bytes([1u8; 20]),
            owner: Address::from_bytes([2u8; 20]),
            spender: Address::from_bytes([3u8; 20]),
            value: 100,
            nonce,
            deadline: 1_000,
        }
    }

    #[test]
    fn test_signing_message_is_domain_separated() {
        let msg = permit(0).signing_message();
        assert!(msg.starts_with(PERMIT_DOMAIN));
        assert_ne!(msg, permit(1).signing_message());
    }

    #[test]
    fn test_signing_message_matches_borsh_layout() {
        let p = permit(3);
        let msg = p.signing_message();
        assert_eq!(&msg[PERMIT_DOMAIN.len()..], borsh::to_vec(&p).unwrap().as_slice());
    }

    #[test]
    fn test_sign_attaches_key() {
        let keypair = Keypair::from_seed(&[5u8; 32]);
        let signed = permit(0).sign(&keypair);
        assert_eq!(signed.public_key, keypair.public_key());
        assert!(tessera_crypto::verify(
            &signed.public_key,
            &signed.permit.signing_message(),
            &signed.signature
        )
        .is_ok());
    }
}
