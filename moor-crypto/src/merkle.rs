use borsh::{BorshDeserialize, BorshSerialize};
use moor_types::primitives::Hash;
use serde::{Deserialize, Serialize};

use crate::hash::blake3_hash_multi;

/// The zero hash, used as the root of an empty tree.
pub const EMPTY_HASH: Hash = [0u8; 32];

/// A Merkle branch: the sibling path from one leaf up to the root.
///
/// `leaf_index` selects the leaf position; its bits, low bit first, decide
/// on which side each sibling sits. Branches compose with [`MerkleBranch::extend`]
/// so a leaf→subroot path and a subroot→root path splice into one proof.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct MerkleBranch {
    /// Position of the proven leaf in the bottom level.
    pub leaf_index: u32,
    /// Sibling hashes from the leaf level up to just below the root.
    pub siblings: Vec<Hash>,
}

impl MerkleBranch {
    /// Number of tree levels this branch climbs.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Walk the branch from `leaf` to the root it commits to.
    pub fn eval(&self, leaf: Hash) -> Hash {
        let mut acc = leaf;
        let mut index = self.leaf_index;
        for sibling in &self.siblings {
            acc = if index & 1 == 1 {
                hash_nodes(sibling, &acc)
            } else {
                hash_nodes(&acc, sibling)
            };
            index >>= 1;
        }
        acc
    }

    /// Splice a leaf→subroot branch with a subroot→root branch.
    ///
    /// The result evaluates as `upper.eval(lower.eval(leaf))`: first through
    /// the lower tree, then through the tree whose leaf is the lower root.
    pub fn extend(lower: &MerkleBranch, upper: &MerkleBranch) -> MerkleBranch {
        let mut siblings = Vec::with_capacity(lower.siblings.len() + upper.siblings.len());
        siblings.extend_from_slice(&lower.siblings);
        siblings.extend_from_slice(&upper.siblings);
        MerkleBranch {
            leaf_index: lower.leaf_index | (upper.leaf_index << lower.depth()),
            siblings,
        }
    }
}

/// Compute the Merkle root over a slice of 32-byte leaves.
///
/// An odd level pairs its trailing node with itself, the rule used by the
/// bitcoin-derived chains these roots anchor into. A single leaf is its own
/// root; an empty slice yields [`EMPTY_HASH`].
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return EMPTY_HASH;
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

/// Build the branch proving `index` within `leaves`, or `None` when the
/// index is out of range.
pub fn branch_for(leaves: &[Hash], index: usize) -> Option<MerkleBranch> {
    if index >= leaves.len() {
        return None;
    }
    let mut siblings = Vec::new();
    let mut level = leaves.to_vec();
    let mut idx = index;
    while level.len() > 1 {
        let sibling_idx = idx ^ 1;
        // The trailing node of an odd level is its own sibling.
        let sibling = if sibling_idx < level.len() {
            level[sibling_idx]
        } else {
            level[idx]
        };
        siblings.push(sibling);
        level = next_level(&level);
        idx >>= 1;
    }
    Some(MerkleBranch {
        leaf_index: index as u32,
        siblings,
    })
}

fn next_level(level: &[Hash]) -> Vec<Hash> {
    let mut next = Vec::with_capacity(level.len().div_ceil(2));
    for pair in level.chunks(2) {
        let right = if pair.len() == 2 { &pair[1] } else { &pair[0] };
        next.push(hash_nodes(&pair[0], right));
    }
    next
}

fn hash_nodes(left: &Hash, right: &Hash) -> Hash {
    blake3_hash_multi(&[left, right])
}
