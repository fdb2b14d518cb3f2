use std::collections::HashSet;

use moor_types::authority::{AuthorityCategory, CrosschainAuthority, SignedTxInfo};

/// The three authority sets in force, selected per chain symbol.
///
/// Each set is validated by [`CrosschainAuthority::new`] before it gets
/// here, so a constructed table is always internally consistent. Sets are
/// immutable once selected for a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityTable {
    root: CrosschainAuthority,
    txscl: CrosschainAuthority,
    staked: CrosschainAuthority,
}

impl AuthorityTable {
    pub fn new(
        root: CrosschainAuthority,
        txscl: CrosschainAuthority,
        staked: CrosschainAuthority,
    ) -> Self {
        Self { root, txscl, staked }
    }

    /// The authority set governing `symbol`.
    pub fn authority_for(&self, symbol: &str) -> &CrosschainAuthority {
        match category_for(symbol) {
            AuthorityCategory::Root => &self.root,
            AuthorityCategory::Txscl => &self.txscl,
            AuthorityCategory::Staked => &self.staked,
        }
    }
}

/// Dispatch a chain symbol to its authority category.
///
/// `TXSCL`-prefixed symbols and the STAKED chain family get their own
/// notary sets; everything else answers to the root-chain notaries.
pub fn category_for(symbol: &str) -> AuthorityCategory {
    if symbol.starts_with("TXSCL") {
        AuthorityCategory::Txscl
    } else if symbol.starts_with("STAKED") {
        AuthorityCategory::Staked
    } else {
        AuthorityCategory::Root
    }
}

/// Whether `tx` carries signatures from enough distinct authority members.
///
/// Duplicate signers count once; keys outside the set count never. A
/// shortfall is a plain `false` — transaction validation treats it as
/// "reject", not as an error.
pub fn check_tx_authority(tx: &SignedTxInfo, authority: &CrosschainAuthority) -> bool {
    let mut seen = HashSet::new();
    for key in &tx.signers {
        if authority.contains(key) {
            seen.insert(*key);
        }
    }
    seen.len() >= authority.required_signatures as usize
}
