use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_NOTARIES;
use crate::error::MoorError;
use crate::primitives::*;

/// The notary set and signature threshold governing one chain category.
///
/// Immutable once selected for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct CrosschainAuthority {
    /// Notary public keys, at most [`MAX_NOTARIES`].
    #[serde(with = "crate::primitives::serde_pubkey_vec")]
    pub notaries: Vec<NotaryPubkey>,
    /// Minimum number of distinct notary signers required.
    pub required_signatures: u8,
}

impl CrosschainAuthority {
    /// Build an authority set, rejecting malformed tables.
    ///
    /// Malformed here means: empty, over the notary cap, duplicate keys,
    /// or a threshold of zero or above the set size. These are startup
    /// configuration failures, not runtime conditions.
    pub fn new(
        notaries: Vec<NotaryPubkey>,
        required_signatures: u8,
    ) -> Result<Self, MoorError> {
        if notaries.is_empty() {
            return Err(MoorError::InvalidAuthority {
                reason: "empty notary set".to_string(),
            });
        }
        if notaries.len() > MAX_NOTARIES {
            return Err(MoorError::InvalidAuthority {
                reason: format!("{} notaries exceeds cap {}", notaries.len(), MAX_NOTARIES),
            });
        }
        for (i, key) in notaries.iter().enumerate() {
            if notaries[..i].contains(key) {
                return Err(MoorError::InvalidAuthority {
                    reason: format!("duplicate notary key at index {}", i),
                });
            }
        }
        if required_signatures == 0 || required_signatures as usize > notaries.len() {
            return Err(MoorError::InvalidAuthority {
                reason: format!(
                    "threshold {} outside 1..={}",
                    required_signatures,
                    notaries.len()
                ),
            });
        }
        Ok(Self {
            notaries,
            required_signatures,
        })
    }

    /// Whether `key` is a member of this authority set.
    pub fn contains(&self, key: &NotaryPubkey) -> bool {
        self.notaries.contains(key)
    }
}

/// Chain category selecting which authority set governs a symbol.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum AuthorityCategory {
    /// The root-chain (Komodo) notaries — the default for all symbols.
    Root,
    /// Chains with the TXSCL symbol prefix.
    Txscl,
    /// Chains in the STAKED family.
    Staked,
}

/// Signer information extracted from a transaction by the node's validation
/// layer. This core consumes recovered signer keys; it never reads script.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct SignedTxInfo {
    /// Txid of the transaction.
    pub txid: Txid,
    /// Public keys that signed the transaction.
    #[serde(with = "crate::primitives::serde_pubkey_vec")]
    pub signers: Vec<NotaryPubkey>,
}

/// One notary transaction endorsing a burn, as extracted by the node.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct NotaryApproval {
    /// Txid of the endorsing notary transaction.
    pub txid: Txid,
    /// The notary key that signed it.
    #[serde(with = "crate::primitives::serde_pubkey")]
    pub signer: NotaryPubkey,
    /// The burn txid the transaction endorses.
    pub approved_txid: Txid,
}
