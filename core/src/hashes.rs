// Hash primitives used to identify blocks and transactions

use bitcoin::block::Header;
use bitcoin::consensus::encode::serialize;
use bitcoin::hashes::Hash;
use bitcoin::{BlockHash, Transaction};

use sha2::{Digest, Sha256};

use crate::x11::x11;

pub fn calculate_double_sha256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::default();
    hasher.update(input);
    let result = hasher.finalize_reset();
    hasher.update(result);
    hasher.finalize().into()
}

/// Utility function to hash two merkle nodes together
pub fn hash_pair(left: [u8; 32], right: [u8; 32]) -> [u8; 32] {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(&left);
    preimage[32..].copy_from_slice(&right);
    calculate_double_sha256(&preimage)
}

/// Returns the transaction id in internal (little-endian) byte order.
///
/// Only the legacy serialization is hashed: version, inputs, outputs and lock time.
/// Witness data never contributes to the txid.
pub fn txid(tx: &Transaction) -> [u8; 32] {
    let mut tx_bytes = serialize(&tx.version);
    tx_bytes.extend(serialize(&tx.input));
    tx_bytes.extend(serialize(&tx.output));
    tx_bytes.extend(serialize(&tx.lock_time));
    calculate_double_sha256(&tx_bytes)
}

/// X11 over the 80 byte serialized header. Transaction ids and merkle nodes
/// stay on double SHA256.
pub fn block_hash(header: &Header) -> BlockHash {
    BlockHash::from_byte_array(x11(&serialize(header)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_double_sha256_empty_input() {
        assert_eq!(
            calculate_double_sha256(&[]),
            hex!("5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456")
        );
    }

    #[test]
    fn test_txid_matches_bitcoin() {
        let tx: Transaction = bitcoin::consensus::deserialize(&hex::decode("01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff2404ffff001d01041c506f6c69732c2066726f6d2070656f706c6520746f2070656f706c65ffffffff0100ca9a3b00000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000").unwrap()).unwrap();
        let mut id = txid(&tx);
        assert_eq!(id, tx.compute_txid().to_byte_array());
        id.reverse();
        assert_eq!(
            hex::encode(id),
            "e98ff986f1218c5d9534463f2395d1f8357d2691b211d9c2f0b920aac7c3a095"
        );
    }

    #[test]
    fn test_block_hash_is_x11() {
        let header: Header = bitcoin::consensus::deserialize(&hex!("01000000000000000000000000000000000000000000000000000000000000000000000095a0c3c7aa20b9f0c2d911b291267d35f8d195233f4634955d8c21f186f98fe950506b5d62723200f0ff0f1e")).unwrap();
        assert_eq!(
            block_hash(&header).to_string(),
            "00000621bb6857cd02430c2566fefae6b274483defb0c18dff7ca8cd26861579"
        );
        assert_ne!(block_hash(&header), header.block_hash());
    }

    #[test]
    fn test_hash_pair_is_order_sensitive() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_ne!(hash_pair(a, b), hash_pair(b, a));
        let mut concatenated = a.to_vec();
        concatenated.extend_from_slice(&b);
        assert_eq!(hash_pair(a, b), calculate_double_sha256(&concatenated));
    }
}
