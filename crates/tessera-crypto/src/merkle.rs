//! Sorted-pair Merkle trees.
//!
//! Leaves are sorted before building, parents are `hash_sorted_pair` of
//! their children and an unpaired node is carried up unchanged. A proof is
//! the list of sibling hashes from leaf to root.

use crate::hash::hash_sorted_pair;
use tessera_types::Hash;

/// Binary Merkle tree over sorted leaves.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// levels[0] are the sorted leaves, the last level holds the root
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Build a tree from leaf hashes. Input order does not affect the root.
    pub fn from_leaves(leaves: &[Hash]) -> Self {
        if leaves.is_empty() {
            return Self { levels: vec![] };
        }

        let mut current: Vec<Hash> = leaves.to_vec();
        current.sort();

        let mut levels = Vec::new();
        while current.len() > 1 {
            let next: Vec<Hash> = current
                .chunks(2)
                .map(|pair| match pair.get(1) {
                    Some(right) => hash_sorted_pair(&pair[0], right),
                    None => pair[0],
                })
                .collect();
            levels.push(current);
            current = next;
        }
        levels.push(current);

        Self { levels }
    }

    /// Get the root hash. `Hash::ZERO` for an empty tree.
    pub fn root(&self) -> Hash {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(Hash::ZERO)
    }

    /// Sibling path for `leaf`, or `None` if the leaf is not in the tree.
    pub fn proof(&self, leaf: &Hash) -> Option<Vec<Hash>> {
        let leaves = self.levels.first()?;
        let mut index = leaves.binary_search(leaf).ok()?;

        let mut siblings = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = index ^ 1;
            if let Some(node) = level.get(sibling) {
                siblings.push(*node);
            }
            index /= 2;
        }

        Some(siblings)
    }

    /// Number of leaves
    pub fn len(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Leaves in tree order
    pub fn leaves(&self) -> &[Hash] {
        self.levels.first().map_or(&[], Vec::as_slice)
    }
}

/// Fold a proof onto a leaf, producing the implied root.
pub fn process_proof(proof: &[Hash], leaf: &Hash) -> Hash {
    proof
        .iter()
        .fold(*leaf, |computed, sibling| hash_sorted_pair(&computed, sibling))
}

/// Check that `leaf` is a member of the tree with the given root.
pub fn verify_proof(proof: &[Hash], root: &Hash, leaf: &Hash) -> bool {
    &process_proof(proof, leaf) == root
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn leaves(n: usize) -> Vec<Hash> {
        (0..n)
            .map(|i| Hash::compute(format!("leaf{}", i).as_bytes()))
            .collect()
    }

    #[test]
    fn test_merkle_tree_empty() {
        let tree = MerkleTree::from_leaves(&[]);
        assert_eq!(tree.root(), Hash::ZERO);
        assert!(tree.is_empty());
        assert!(tree.proof(&Hash::compute(b"x")).is_none());
    }

    #[test]
    fn test_merkle_tree_single_leaf() {
        let leaf = Hash::compute(b"single");
        let tree = MerkleTree::from_leaves(&[leaf]);

        assert_eq!(tree.root(), leaf);
        assert_eq!(tree.proof(&leaf).unwrap(), Vec::<Hash>::new());
        assert!(verify_proof(&[], &tree.root(), &leaf));
    }

    #[test]
    fn test_merkle_tree_two_leaves() {
        let l = leaves(2);
        let tree = MerkleTree::from_leaves(&l);
        assert_eq!(tree.root(), hash_sorted_pair(&l[0], &l[1]));
    }

    #[test]
    fn test_root_independent_of_input_order() {
        let mut l = leaves(5);
        let root = MerkleTree::from_leaves(&l).root();
        l.reverse();
        assert_eq!(MerkleTree::from_leaves(&l).root(), root);
    }

    #[test]
    fn test_proof_for_every_leaf() {
        for n in 1..10 {
            let l = leaves(n);
            let tree = MerkleTree::from_leaves(&l);
            for leaf in &l {
                let proof = tree.proof(leaf).unwrap();
                assert!(verify_proof(&proof, &tree.root(), leaf), "n={}", n);
            }
        }
    }

    #[test]
    fn test_proof_rejects_other_leaf_and_root() {
        let l = leaves(4);
        let tree = MerkleTree::from_leaves(&l);
        let proof = tree.proof(&l[0]).unwrap();

        assert!(!verify_proof(&proof, &tree.root(), &l[1]));
        assert!(!verify_proof(&proof, &Hash::compute(b"wrong"), &l[0]));
    }

    #[test]
    fn test_unknown_leaf_has_no_proof() {
        let tree = MerkleTree::from_leaves(&leaves(4));
        assert!(tree.proof(&Hash::compute(b"outsider")).is_none());
    }

    proptest! {
        #[test]
        fn prop_tampered_proof_fails(n in 2usize..32, pick in 0usize..32, flip in 0usize..32) {
            let l = leaves(n);
            let tree = MerkleTree::from_leaves(&l);
            let leaf = l[pick % n];
            let mut proof = tree.proof(&leaf).unwrap();
            prop_assume!(!proof.is_empty());

            let i = flip % proof.len();
            let mut bytes = *proof[i].as_bytes();
            bytes[0] ^= 0xff;
            proof[i] = Hash::from_bytes(bytes);

            prop_assert!(!verify_proof(&proof, &tree.root(), &leaf));
        }
    }
}
