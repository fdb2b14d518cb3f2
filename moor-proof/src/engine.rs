use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use moor_crypto::merkle::{branch_for, merkle_root, MerkleBranch};
use moor_state::error::StateError;
use moor_state::registry::StateRegistry;
use moor_types::authority::NotaryApproval;
use moor_types::constants::ROOT_SYMBOL;
use moor_types::primitives::*;

use crate::authority::AuthorityTable;
use crate::error::ProofError;

/// A MoMoM root over the MoM values of one chain category.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct ProofRoot {
    /// Merkle root over `moms`.
    pub root: Hash,
    /// Contributing MoM values, in the deterministic combination order.
    pub moms: Vec<Hash>,
    /// Txid of the root-chain notarization anchoring this root: the
    /// destination txid of the highest contributing entry.
    pub anchor_txid: Txid,
}

/// A transaction proof re-rooted at the target chain via the MoMoM.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct ExtendedProof {
    /// Chain the proof is now rooted at.
    pub target_symbol: ChainSymbol,
    /// Spliced branch from the transaction up to `root`.
    pub branch: MerkleBranch,
    /// The MoMoM root the branch commits to.
    pub root: Hash,
    /// Txid of the anchoring root-chain notarization.
    pub anchor_txid: Txid,
}

/// One chain's contribution to a MoMoM computation.
#[derive(Debug, Clone)]
struct Contribution {
    height: Height,
    symbol: ChainSymbol,
    mom: Hash,
    dest_txid: Txid,
}

/// Cross-chain proof engine.
///
/// Pure reads over the registry: any number of engine calls may run
/// concurrently with the per-chain writers. Scans are bounded by the
/// notarization scan window, so read locks are held only briefly.
pub struct ProofEngine<'a> {
    registry: &'a StateRegistry,
    authorities: AuthorityTable,
}

impl<'a> ProofEngine<'a> {
    pub fn new(registry: &'a StateRegistry, authorities: AuthorityTable) -> Self {
        Self {
            registry,
            authorities,
        }
    }

    /// Compute the MoMoM root for `category` from notarizations recorded at
    /// or below `upper_height_bound` on the root chain.
    ///
    /// Each participating chain contributes its most recent MoM-bearing
    /// notarization under the bound. Contributions are ordered ascending by
    /// recording height, ties broken by symbol, making the root
    /// deterministic for a fixed registry snapshot regardless of call order.
    pub fn compute_proof_root(
        &self,
        category: CategoryId,
        upper_height_bound: Height,
    ) -> Result<ProofRoot, ProofError> {
        let contributions = self.contributions(category, upper_height_bound)?;
        let last = contributions
            .last()
            .ok_or(ProofError::NoNotarizationFound {
                category,
                bound: upper_height_bound,
            })?;
        let anchor_txid = last.dest_txid;
        let moms: Vec<Hash> = contributions.iter().map(|c| c.mom).collect();
        let root = merkle_root(&moms);
        tracing::debug!(
            category,
            bound = upper_height_bound,
            chains = moms.len(),
            root = %hex::encode(&root[..8]),
            "computed proof root"
        );
        Ok(ProofRoot {
            root,
            moms,
            anchor_txid,
        })
    }

    /// Verify a transaction proof from the current chain and re-root it at
    /// `target_symbol` via the MoMoM for `category`.
    ///
    /// `asset_proof` must walk `txid` up to the current chain's most recent
    /// notarized MoM; `offset` adjusts the proof's leaf index to the leaf
    /// position within that MoM. On success the returned proof's branch
    /// evaluates from `txid` to a MoMoM root anchored on the target chain.
    pub fn verify_cross_chain_proof(
        &self,
        txid: &Txid,
        asset_proof: &MerkleBranch,
        target_symbol: &str,
        category: CategoryId,
        offset: u32,
    ) -> Result<ExtendedProof, ProofError> {
        let source = self.registry.current()?;
        let (mom, mom_depth, link_height) = {
            let state = source.read().map_err(poisoned)?;
            let bound = state
                .latest_notarization()
                .map(|e| e.height)
                .ok_or(ProofError::ChainUnlinked)?;
            let entry = state
                .latest_mom_notarization(bound)
                .ok_or(ProofError::ChainUnlinked)?;
            match (entry.mom, entry.mom_depth) {
                (Some(mom), Some(depth)) => (mom, depth, entry.height),
                _ => return Err(ProofError::ChainUnlinked),
            }
        };

        // The offset-adjusted leaf position must fall inside the MoM span.
        let leaf_index = asset_proof.leaf_index as u64 + offset as u64;
        if leaf_index >= mom_depth as u64 {
            return Err(ProofError::ChainUnlinked);
        }

        let evaluated = asset_proof.eval(*txid);
        if evaluated != mom {
            tracing::debug!(
                expected = %hex::encode(&mom[..8]),
                computed = %hex::encode(&evaluated[..8]),
                "asset proof does not reach the notarized MoM"
            );
            return Err(ProofError::ProofMismatch);
        }

        // Recompute the MoMoM as of the linking notarization and splice the
        // MoM-to-root branch onto the asset proof.
        let contributions = self.contributions(category, link_height)?;
        let moms: Vec<Hash> = contributions.iter().map(|c| c.mom).collect();
        let position = moms
            .iter()
            .position(|m| *m == mom)
            .ok_or(ProofError::ChainUnlinked)?;
        let upper = branch_for(&moms, position).ok_or(ProofError::ChainUnlinked)?;
        let root = merkle_root(&moms);
        let anchor_txid = contributions
            .last()
            .map(|c| c.dest_txid)
            .ok_or(ProofError::ChainUnlinked)?;

        Ok(ExtendedProof {
            target_symbol: target_symbol.to_string(),
            branch: MerkleBranch::extend(asset_proof, &upper),
            root,
            anchor_txid,
        })
    }

    /// Recompute the MoMoM anchored by the root-chain notarization with
    /// `notarized_hash == notarization_hash` and compare against `momom`.
    ///
    /// A verification verdict, not a query: unknown hashes, missing
    /// contributions, and lock failures all answer `false`.
    pub fn check_momom(&self, notarization_hash: &Hash, momom: &Hash) -> bool {
        let Ok(root_handle) = self.registry.root() else {
            return false;
        };
        let bound = {
            let Ok(state) = root_handle.read() else {
                return false;
            };
            state
                .notarizations()
                .iter()
                .rev()
                .find(|e| e.notarized_hash == *notarization_hash)
                .map(|e| e.height)
        };
        let Some(bound) = bound else {
            return false;
        };
        let category = {
            let Ok(current) = self.registry.current() else {
                return false;
            };
            let Ok(state) = current.read() else {
                return false;
            };
            state.category()
        };
        match self.compute_proof_root(category, bound) {
            Ok(proof_root) => proof_root.root == *momom,
            Err(_) => false,
        }
    }

    /// Fallback check when MoMoM verification is unavailable or fails:
    /// count distinct authority members endorsing `burn_txid`.
    ///
    /// Duplicate signers and non-members never raise the count.
    pub fn check_notaries_approval(
        &self,
        burn_txid: &Txid,
        approvals: &[NotaryApproval],
    ) -> bool {
        let authority = self.authorities.authority_for(self.registry.current_symbol());
        let mut seen = std::collections::HashSet::new();
        for approval in approvals {
            if approval.approved_txid == *burn_txid && authority.contains(&approval.signer) {
                seen.insert(approval.signer);
            }
        }
        seen.len() >= authority.required_signatures as usize
    }

    /// The authority table in force.
    pub fn authorities(&self) -> &AuthorityTable {
        &self.authorities
    }

    fn contributions(
        &self,
        category: CategoryId,
        bound: Height,
    ) -> Result<Vec<Contribution>, ProofError> {
        let mut contributions = Vec::new();
        for (symbol, handle) in self.registry.by_category(category)? {
            if symbol == ROOT_SYMBOL {
                continue;
            }
            let state = handle.read().map_err(poisoned)?;
            if let Some(entry) = state.latest_mom_notarization(bound) {
                if let Some(mom) = entry.mom {
                    contributions.push(Contribution {
                        height: entry.height,
                        symbol: symbol.clone(),
                        mom,
                        dest_txid: entry.dest_txid,
                    });
                }
            }
        }
        contributions.sort_by(|a, b| a.height.cmp(&b.height).then_with(|| a.symbol.cmp(&b.symbol)));
        Ok(contributions)
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> ProofError {
    ProofError::State(StateError::LockPoisoned {
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::AuthorityTable;
    use moor_crypto::hash::blake3_hash;
    use moor_types::authority::CrosschainAuthority;
    use moor_types::event::{Event, EventBody, Notarized};

    fn notarized_event(height: Height, mom: Option<Hash>, dest_txid: Txid) -> Event {
        Event {
            height,
            body: EventBody::Notarized(Notarized {
                notarized_height: height.saturating_sub(1),
                notarized_hash: blake3_hash(&height.to_le_bytes()),
                dest_txid,
                mom,
                mom_depth: mom.map(|_| 8),
            }),
        }
    }

    fn table() -> AuthorityTable {
        let set = |n: u8, required| {
            CrosschainAuthority::new((0..n).map(|i| [i; 33]).collect(), required).unwrap()
        };
        AuthorityTable::new(set(4, 2), set(3, 2), set(2, 1))
    }

    /// A registry with two category-2 chains, each holding one MoM-bearing
    /// notarization built from real leaf sets.
    fn fixture() -> (StateRegistry, Vec<Hash>, Vec<Hash>) {
        let registry = StateRegistry::new("TOKEL", 2, 8).unwrap();

        let tokel_leaves: Vec<Hash> = (0u8..8).map(|i| blake3_hash(&[b'a', i])).collect();
        let morty_leaves: Vec<Hash> = (0u8..4).map(|i| blake3_hash(&[b'b', i])).collect();

        {
            let handle = registry.get_or_create("TOKEL", 2).unwrap();
            let mut state = handle.write().unwrap();
            state.apply(&notarized_event(10, Some(merkle_root(&tokel_leaves)), [0x10; 32]));
        }
        {
            let handle = registry.get_or_create("MORTY", 2).unwrap();
            let mut state = handle.write().unwrap();
            state.apply(&notarized_event(20, Some(merkle_root(&morty_leaves)), [0x20; 32]));
        }

        (registry, tokel_leaves, morty_leaves)
    }

    #[test]
    fn test_compute_proof_root_deterministic() {
        let (registry, _, _) = fixture();
        let engine = ProofEngine::new(&registry, table());

        let first = engine.compute_proof_root(2, 100).unwrap();
        let second = engine.compute_proof_root(2, 100).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.moms.len(), 2);
        // Highest contributing entry (MORTY at height 20) anchors the root.
        assert_eq!(first.anchor_txid, [0x20; 32]);
    }

    #[test]
    fn test_compute_proof_root_respects_bound() {
        let (registry, _, _) = fixture();
        let engine = ProofEngine::new(&registry, table());

        // Below MORTY's entry only TOKEL contributes.
        let below = engine.compute_proof_root(2, 15).unwrap();
        assert_eq!(below.moms.len(), 1);
        assert_eq!(below.anchor_txid, [0x10; 32]);

        // Below everything: no notarization at all.
        assert_eq!(
            engine.compute_proof_root(2, 5),
            Err(ProofError::NoNotarizationFound {
                category: 2,
                bound: 5,
            })
        );
    }

    #[test]
    fn test_compute_proof_root_ignores_other_categories() {
        let (registry, _, _) = fixture();
        {
            let handle = registry.get_or_create("AXO", 3).unwrap();
            let mut state = handle.write().unwrap();
            state.apply(&notarized_event(30, Some([0xCC; 32]), [0x30; 32]));
        }
        let engine = ProofEngine::new(&registry, table());
        let root2 = engine.compute_proof_root(2, 100).unwrap();
        assert_eq!(root2.moms.len(), 2);
        let root3 = engine.compute_proof_root(3, 100).unwrap();
        assert_eq!(root3.moms, vec![[0xCC; 32]]);
    }

    #[test]
    fn test_verify_cross_chain_proof_splices_to_momom() {
        let (registry, tokel_leaves, _) = fixture();
        let engine = ProofEngine::new(&registry, table());

        // Prove leaf 3 of the current chain's MoM, then re-root at KMD.
        let txid = tokel_leaves[3];
        let asset_proof = branch_for(&tokel_leaves, 3).unwrap();
        let extended = engine
            .verify_cross_chain_proof(&txid, &asset_proof, ROOT_SYMBOL, 2, 0)
            .unwrap();

        let expected_root = engine.compute_proof_root(2, 10).unwrap();
        assert_eq!(extended.root, expected_root.root);
        assert_eq!(extended.branch.eval(txid), extended.root);
        assert_eq!(extended.target_symbol, ROOT_SYMBOL);
    }

    #[test]
    fn test_verify_cross_chain_proof_rejects_wrong_leaf() {
        let (registry, tokel_leaves, _) = fixture();
        let engine = ProofEngine::new(&registry, table());

        let asset_proof = branch_for(&tokel_leaves, 3).unwrap();
        // Right branch, wrong transaction.
        let wrong_txid = blake3_hash(b"not in the tree");
        assert_eq!(
            engine.verify_cross_chain_proof(&wrong_txid, &asset_proof, ROOT_SYMBOL, 2, 0),
            Err(ProofError::ProofMismatch)
        );
    }

    #[test]
    fn test_verify_cross_chain_proof_offset_outside_depth() {
        let (registry, tokel_leaves, _) = fixture();
        let engine = ProofEngine::new(&registry, table());

        let txid = tokel_leaves[3];
        let asset_proof = branch_for(&tokel_leaves, 3).unwrap();
        // mom_depth is 8; an offset pushing the leaf past it cannot link.
        assert_eq!(
            engine.verify_cross_chain_proof(&txid, &asset_proof, ROOT_SYMBOL, 2, 5),
            Err(ProofError::ChainUnlinked)
        );
    }

    #[test]
    fn test_verify_cross_chain_proof_unlinked_without_notarization() {
        let registry = StateRegistry::new("TOKEL", 2, 8).unwrap();
        let engine = ProofEngine::new(&registry, table());
        let proof = MerkleBranch {
            leaf_index: 0,
            siblings: vec![],
        };
        assert_eq!(
            engine.verify_cross_chain_proof(&[0; 32], &proof, ROOT_SYMBOL, 2, 0),
            Err(ProofError::ChainUnlinked)
        );
    }

    #[test]
    fn test_check_momom_round_trips_with_compute() {
        let (registry, _, _) = fixture();
        // Record on the root chain the notarization that anchors height 20.
        let kmd_hash = blake3_hash(b"kmd block");
        {
            let handle = registry.root().unwrap();
            let mut state = handle.write().unwrap();
            state.apply(&Event {
                height: 20,
                body: EventBody::Notarized(Notarized {
                    notarized_height: 19,
                    notarized_hash: kmd_hash,
                    dest_txid: [0x77; 32],
                    mom: None,
                    mom_depth: None,
                }),
            });
        }
        let engine = ProofEngine::new(&registry, table());

        let expected = engine.compute_proof_root(2, 20).unwrap();
        assert!(engine.check_momom(&kmd_hash, &expected.root));
        // Wrong root value fails; unknown notarization hash fails.
        assert!(!engine.check_momom(&kmd_hash, &[0xFF; 32]));
        assert!(!engine.check_momom(&blake3_hash(b"unknown"), &expected.root));
    }

    #[test]
    fn test_check_notaries_approval_distinct_threshold() {
        let (registry, _, _) = fixture();
        let engine = ProofEngine::new(&registry, table());
        let burn = [0xBB; 32];
        let approval = |signer: u8, approved: Txid| NotaryApproval {
            txid: blake3_hash(&[signer]),
            signer: [signer; 33],
            approved_txid: approved,
        };

        // TOKEL answers to the root authority: 4 notaries, threshold 2.
        assert!(engine.check_notaries_approval(&burn, &[approval(0, burn), approval(1, burn)]));
        // The same notary endorsing twice is one signer.
        assert!(!engine.check_notaries_approval(&burn, &[approval(0, burn), approval(0, burn)]));
        // Endorsements of some other txid do not count.
        assert!(
            !engine.check_notaries_approval(&burn, &[approval(0, burn), approval(1, [9; 32])])
        );
        // Non-members do not count.
        assert!(
            !engine.check_notaries_approval(&burn, &[approval(0, burn), approval(99, burn)])
        );
    }
}
