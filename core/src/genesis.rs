// Genesis block construction
// ==========================
//
// Every network anchors its history in a genesis block whose single coinbase
// transaction carries a timestamp message. A devnet additionally chains a second
// genesis on top of the base one, tagged with the devnet name and mined at the
// base genesis difficulty.

use bitcoin::absolute::LockTime;
use bitcoin::block::{Header, Version as BlockVersion};
use bitcoin::hashes::Hash;
use bitcoin::opcodes::all::{OP_CHECKSIG, OP_RETURN};
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::transaction::Version;
use bitcoin::{
    Amount, Block, BlockHash, CompactTarget, OutPoint, ScriptBuf, Sequence, Transaction, TxIn,
    TxMerkleNode, TxOut, Witness,
};
use tracing::{debug, error, info};

use crate::error::ChainParamsError;
use crate::hashes::block_hash;
use crate::merkle::block_merkle_root;
use crate::pow::{decode_compact, hash_meets_target};

/// Message committed to by the coinbase of every base genesis block.
pub const GENESIS_TIMESTAMP: &str = "Polis, from people to people";

/// Uncompressed public key paid by the base genesis coinbase. Nobody holds the
/// private key, so the output is never spent.
pub const GENESIS_OUTPUT_PUBKEY: &str = "04678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5f";

/// Compact bits of the original Bitcoin genesis, pushed as the first coinbase item.
const GENESIS_COINBASE_BITS: i64 = 486604799;

/// Header version of a devnet genesis block.
const DEVNET_GENESIS_VERSION: i32 = 4;

fn push_bytes(data: &[u8]) -> Result<PushBytesBuf, ChainParamsError> {
    PushBytesBuf::try_from(data.to_vec()).map_err(|e| ChainParamsError::ScriptPush(e.to_string()))
}

/// `<pubkey> OP_CHECKSIG` paying the genesis public key.
pub fn genesis_output_script() -> Result<ScriptBuf, ChainParamsError> {
    let pubkey = hex::decode(GENESIS_OUTPUT_PUBKEY)
        .map_err(|_| ChainParamsError::InvalidHex(GENESIS_OUTPUT_PUBKEY.to_string()))?;
    Ok(Builder::new()
        .push_slice(push_bytes(&pubkey)?)
        .push_opcode(OP_CHECKSIG)
        .into_script())
}

fn coinbase_transaction(
    script_sig: ScriptBuf,
    script_pubkey: ScriptBuf,
    reward: Amount,
) -> Transaction {
    Transaction {
        version: Version::ONE,
        lock_time: LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig,
            sequence: Sequence::MAX,
            witness: Witness::default(),
        }],
        output: vec![TxOut {
            value: reward,
            script_pubkey,
        }],
    }
}

fn assemble_block(
    coinbase: Transaction,
    prev_blockhash: BlockHash,
    time: u32,
    nonce: u32,
    bits: u32,
    version: i32,
) -> Block {
    let mut block = Block {
        header: Header {
            version: BlockVersion::from_consensus(version),
            prev_blockhash,
            merkle_root: TxMerkleNode::all_zeros(),
            time,
            bits: CompactTarget::from_consensus(bits),
            nonce,
        },
        txdata: vec![coinbase],
    };
    block.header.merkle_root = block_merkle_root(&block);
    block
}

/// Builds a base genesis block: no predecessor, one coinbase committing to
/// `timestamp` and paying `reward` to `output_script`.
pub fn create_genesis_block(
    timestamp: &str,
    output_script: ScriptBuf,
    time: u32,
    nonce: u32,
    bits: u32,
    version: i32,
    reward: Amount,
) -> Result<Block, ChainParamsError> {
    // The 4 is pushed as a one byte data push, not as OP_4.
    let script_sig = Builder::new()
        .push_int(GENESIS_COINBASE_BITS)
        .push_slice(push_bytes(&[4])?)
        .push_slice(push_bytes(timestamp.as_bytes())?)
        .into_script();
    let coinbase = coinbase_transaction(script_sig, output_script, reward);
    Ok(assemble_block(
        coinbase,
        BlockHash::all_zeros(),
        time,
        nonce,
        bits,
        version,
    ))
}

/// Base genesis block with the network-wide timestamp and output script.
pub fn create_base_genesis_block(
    time: u32,
    nonce: u32,
    bits: u32,
    version: i32,
    reward: Amount,
) -> Result<Block, ChainParamsError> {
    create_genesis_block(
        GENESIS_TIMESTAMP,
        genesis_output_script()?,
        time,
        nonce,
        bits,
        version,
        reward,
    )
}

/// Builds a devnet genesis block on top of `prev_block_hash`. The coinbase carries
/// height 1 and the devnet name, and its output is an unspendable `OP_RETURN`.
pub fn create_devnet_genesis_block(
    prev_block_hash: BlockHash,
    devnet_name: &str,
    time: u32,
    nonce: u32,
    bits: u32,
    reward: Amount,
) -> Result<Block, ChainParamsError> {
    if devnet_name.is_empty() {
        return Err(ChainParamsError::EmptyDevnetName);
    }

    let script_sig = Builder::new()
        .push_int(1)
        .push_slice(push_bytes(devnet_name.as_bytes())?)
        .into_script();
    let script_pubkey = Builder::new().push_opcode(OP_RETURN).into_script();
    let coinbase = coinbase_transaction(script_sig, script_pubkey, reward);
    Ok(assemble_block(
        coinbase,
        prev_block_hash,
        time,
        nonce,
        bits,
        DEVNET_GENESIS_VERSION,
    ))
}

/// Searches the devnet genesis chained on `base_genesis`.
///
/// The candidate is stamped one second after the base genesis and uses its bits.
/// Nonces are tried in ascending order from zero, so the result only depends on
/// the inputs.
pub fn mine_devnet_genesis(
    base_genesis: &Block,
    devnet_name: &str,
    reward: Amount,
) -> Result<Block, ChainParamsError> {
    let bits = base_genesis.header.bits.to_consensus();
    let target = decode_compact(bits)?;
    let mut block = create_devnet_genesis_block(
        block_hash(&base_genesis.header),
        devnet_name,
        base_genesis.header.time + 1,
        0,
        bits,
        reward,
    )?;

    debug!(
        "Mining devnet genesis for {} with target bits {:#010x}",
        devnet_name, bits
    );
    for nonce in 0..=u32::MAX {
        block.header.nonce = nonce;
        let hash = block_hash(&block.header);
        if hash_meets_target(&hash, &target) {
            info!(
                "Found devnet genesis for {}: nonce {}, hash {}",
                devnet_name, nonce, hash
            );
            return Ok(block);
        }
    }

    error!(
        "Exhausted the nonce space mining devnet genesis for {}",
        devnet_name
    );
    Err(ChainParamsError::DevnetMiningExhausted(devnet_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::COIN;
    use num_bigint::BigUint;
    use std::str::FromStr;

    fn regtest_like_genesis(bits: u32) -> Block {
        create_base_genesis_block(1513831322, 0, bits, 1, Amount::from_sat(50 * COIN)).unwrap()
    }

    #[test]
    fn test_base_genesis_coinbase_layout() {
        let reward = Amount::from_sat(10 * COIN);
        let genesis = create_base_genesis_block(1567314000, 3306082, 0x1e0ffff0, 1, reward).unwrap();
        assert_eq!(
            hex::encode(bitcoin::consensus::serialize(&genesis.txdata[0])),
            "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff2404ffff001d01041c506f6c69732c2066726f6d2070656f706c6520746f2070656f706c65ffffffff0100ca9a3b00000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000"
        );
        assert_eq!(genesis.header.prev_blockhash, BlockHash::all_zeros());
        assert_eq!(
            genesis.header.merkle_root.to_string(),
            "e98ff986f1218c5d9534463f2395d1f8357d2691b211d9c2f0b920aac7c3a095"
        );
    }

    #[test]
    fn test_header_hash_is_x11_and_merkle_is_sha256d() {
        let genesis = regtest_like_genesis(0x1e0ffff0);
        let header = bitcoin::consensus::serialize(&genesis.header);
        assert_eq!(
            block_hash(&genesis.header).to_byte_array(),
            crate::x11::x11(&header)
        );
        assert_ne!(block_hash(&genesis.header), genesis.block_hash());
        assert_eq!(Some(genesis.header.merkle_root), genesis.compute_merkle_root());
    }

    #[test]
    fn test_builder_is_deterministic() {
        let first = regtest_like_genesis(0x1e0ffff0);
        let second = regtest_like_genesis(0x1e0ffff0);
        assert_eq!(first, second);
        assert_eq!(block_hash(&first.header), block_hash(&second.header));
    }

    #[test]
    fn test_devnet_genesis_layout() {
        let base = regtest_like_genesis(0x207fffff);
        let prev = block_hash(&base.header);
        let reward = Amount::from_sat(50 * COIN);
        let devnet =
            create_devnet_genesis_block(prev, "devnet", 1513831323, 0, 0x207fffff, reward).unwrap();
        assert_eq!(devnet.header.prev_blockhash, prev);
        assert_eq!(devnet.header.version, BlockVersion::from_consensus(4));
        let coinbase = &devnet.txdata[0];
        assert_eq!(coinbase.input[0].script_sig.as_bytes()[0], 0x51);
        assert_eq!(&coinbase.input[0].script_sig.as_bytes()[2..], b"devnet");
        assert!(coinbase.output[0].script_pubkey.is_op_return());
    }

    #[test]
    fn test_empty_devnet_name_rejected() {
        let result = create_devnet_genesis_block(
            BlockHash::all_zeros(),
            "",
            0,
            0,
            0x207fffff,
            Amount::from_sat(50 * COIN),
        );
        assert_eq!(result, Err(ChainParamsError::EmptyDevnetName));
    }

    #[test]
    fn test_mined_devnet_genesis_meets_target() {
        let base = regtest_like_genesis(0x1f0fffff);
        assert_eq!(
            block_hash(&base.header).to_string(),
            "6ddb31fece6cbec57dcd467c9ddcede595a0f8b740101029993d0034f3ce16c9"
        );
        let reward = Amount::from_sat(50 * COIN);
        let devnet = mine_devnet_genesis(&base, "devnet-hard", reward).unwrap();
        let hash = block_hash(&devnet.header);
        let target = decode_compact(0x1f0fffff).unwrap();
        assert!(BigUint::from_bytes_le(hash.as_byte_array()) <= target);
        assert_eq!(devnet.header.nonce, 2442);
        assert_eq!(devnet.header.time, base.header.time + 1);
        assert_eq!(
            hash,
            BlockHash::from_str("000f0b77e50249371c2f30e488396d8949544b5e9a8e6de00d1ad0bf5ef28b5b")
                .unwrap()
        );
    }

    #[test]
    fn test_devnet_mining_is_deterministic() {
        let base = regtest_like_genesis(0x1f0fffff);
        let reward = Amount::from_sat(50 * COIN);
        let first = mine_devnet_genesis(&base, "devnet-hard", reward).unwrap();
        let second = mine_devnet_genesis(&base, "devnet-hard", reward).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.header.nonce, second.header.nonce);
    }

    #[test]
    fn test_devnet_name_changes_result() {
        let base = regtest_like_genesis(0x207fffff);
        let reward = Amount::from_sat(50 * COIN);
        let plain = mine_devnet_genesis(&base, "devnet", reward).unwrap();
        let named = mine_devnet_genesis(&base, "devnet-foo", reward).unwrap();
        assert_ne!(block_hash(&plain.header), block_hash(&named.header));
    }

    #[test]
    fn test_mining_rejects_invalid_bits() {
        let base = regtest_like_genesis(0x04923456);
        assert!(matches!(
            mine_devnet_genesis(&base, "devnet", Amount::from_sat(50 * COIN)),
            Err(ChainParamsError::Compact(_))
        ));
    }
}
