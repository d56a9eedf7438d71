use bitcoin::hashes::Hash;
use bitcoin::{Block, TxMerkleNode};

use crate::hashes::{hash_pair, txid};

/// Computes the merkle root of a list of txids, all in internal byte order.
///
/// Odd levels pair their last node with itself, so a single leaf is its own root.
/// An empty list yields the all-zero hash.
pub fn generate_root(mut level: Vec<[u8; 32]>) -> [u8; 32] {
    if level.is_empty() {
        return [0u8; 32];
    }
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| hash_pair(pair[0], *pair.get(1).unwrap_or(&pair[0])))
            .collect();
    }
    level[0]
}

pub fn block_merkle_root(block: &Block) -> TxMerkleNode {
    let txids = block.txdata.iter().map(txid).collect();
    TxMerkleNode::from_byte_array(generate_root(txids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::calculate_double_sha256;

    fn sample_txids(count: usize) -> Vec<[u8; 32]> {
        (0..count)
            .map(|i| calculate_double_sha256(&(i as u32).to_le_bytes()))
            .collect()
    }

    #[test]
    fn test_single_leaf_is_root() {
        let leaves = sample_txids(1);
        assert_eq!(generate_root(leaves.clone()), leaves[0]);
    }

    #[test]
    fn test_empty_root_is_zero() {
        assert_eq!(generate_root(vec![]), [0u8; 32]);
    }

    #[test]
    fn test_odd_level_duplicates_last() {
        let leaves = sample_txids(3);
        let left = hash_pair(leaves[0], leaves[1]);
        let right = hash_pair(leaves[2], leaves[2]);
        assert_eq!(generate_root(leaves), hash_pair(left, right));
    }

    #[test]
    fn test_matches_bitcoin_merkle_root() {
        let leaves = sample_txids(7);
        let expected = bitcoin::merkle_tree::calculate_root(
            leaves.iter().map(|leaf| TxMerkleNode::from_byte_array(*leaf)),
        )
        .unwrap();
        assert_eq!(generate_root(leaves), expected.to_byte_array());
    }
}
