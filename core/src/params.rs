// Network Parameters
// ==================
//
// This module defines the parameter set a node runs under for each network (main,
// test, dev and regtest). A parameter set is built once, checked against its pinned
// genesis values and then only read.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bitcoin::hashes::Hash;
use bitcoin::{Block, BlockHash};
use num_bigint::BigUint;
use serde::Serialize;

use crate::deployment::{Deployment, DeploymentPos};
use crate::error::ChainParamsError;

/// Identifies one of the supported networks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Network {
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "test")]
    Testnet,
    #[serde(rename = "dev")]
    Devnet,
    #[serde(rename = "regtest")]
    Regtest,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Main,
        Network::Testnet,
        Network::Devnet,
        Network::Regtest,
    ];

    /// The identifier used on the command line and in lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Testnet => "test",
            Network::Devnet => "dev",
            Network::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ChainParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.as_str() == s)
            .ok_or_else(|| ChainParamsError::UnknownChain(s.to_string()))
    }
}

/// Consensus rules for one network.
///
/// The chain starts out proof-of-work and switches to proof-of-stake after
/// `last_pow_block`, so both regimes carry their own timing parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConsensusParams {
    pub hash_genesis_block: BlockHash,
    /// Second genesis mined on top of the base genesis, devnet only.
    pub hash_devnet_genesis_block: Option<BlockHash>,

    pub subsidy_halving_interval: u32,
    pub masternode_payments_start_block: u32,
    pub masternode_payments_increase_block: Option<u32>,
    pub masternode_payments_increase_period: Option<u32>,
    pub instant_send_confirmations_required: u32,
    pub instant_send_keep_lock: u32,
    pub budget_payments_start_block: u32,
    pub budget_payments_cycle_blocks: u32,
    pub budget_payments_window_blocks: u32,
    pub superblock_start_block: u32,
    pub superblock_start_hash: Option<BlockHash>,
    pub superblock_cycle: u32,
    pub governance_min_quorum: u32,
    pub governance_filter_elements: u32,
    pub masternode_minimum_confirmations: u32,

    /// Block height and hash at which BIP34 became active
    pub bip34_height: u32,
    pub bip34_hash: Option<BlockHash>,
    /// Block height at which BIP65 became active
    pub bip65_height: u32,
    /// Block height at which BIP66 became active
    pub bip66_height: u32,
    /// Block height at which DIP0001 becomes active
    pub dip0001_height: u32,
    pub max_block_spacing_fix_deployment_height: u32,

    /// Highest allowed proof-of-work target, big-endian.
    pub pow_limit: [u8; 32],
    pub pow_target_timespan: i64,
    pub pow_target_spacing: i64,
    pub pow_allow_min_difficulty_blocks: bool,
    pub pow_no_retargeting: bool,
    pub pow_kgw_height: u32,
    pub pow_dgw_height: u32,

    pub pos_target_spacing: i64,
    pub pos_target_timespan: i64,
    pub stake_min_age: i64,
    /// Minimum stake age once `stake_min_age_switch_time` has passed.
    pub stake_min_age_2: Option<i64>,
    pub stake_min_age_switch_time: i64,
    pub stake_max_age: i64,
    pub last_pow_block: u32,
    pub ws_target_diff: Option<u32>,
    pub pos_diff_adjust_range: Option<u32>,

    /// Minimum signalling blocks in a window for a deployment to lock in,
    /// unless the deployment sets its own threshold.
    pub rule_change_activation_threshold: u32,
    pub miner_confirmation_window: u32,
    pub deployments: Vec<Deployment>,

    /// The best chain should have at least this much work, big-endian.
    pub minimum_chain_work: [u8; 32],
    /// Signatures in ancestors of this block are assumed valid.
    pub default_assume_valid: BlockHash,
}

impl ConsensusParams {
    pub fn pow_limit_target(&self) -> BigUint {
        BigUint::from_bytes_be(&self.pow_limit)
    }

    pub fn deployment(&self, pos: DeploymentPos) -> Option<&Deployment> {
        self.deployments.iter().find(|d| d.pos == pos)
    }

    pub fn deployment_for_bit(&self, bit: u8) -> Option<&Deployment> {
        self.deployments.iter().find(|d| d.bit == bit)
    }

    pub(crate) fn deployment_for_bit_mut(&mut self, bit: u8) -> Option<&mut Deployment> {
        self.deployments.iter_mut().find(|d| d.bit == bit)
    }

    /// Blocks between two proof-of-work difficulty adjustments.
    pub fn difficulty_adjustment_interval(&self) -> i64 {
        self.pow_target_timespan / self.pow_target_spacing
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Base58Type {
    PubkeyAddress,
    ScriptAddress,
    SecretKey,
    ExtPublicKey,
    ExtSecretKey,
}

/// Version bytes prepended to base58 encoded keys and addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Base58Prefixes {
    pub pubkey_address: [u8; 1],
    pub script_address: [u8; 1],
    pub secret_key: [u8; 1],
    pub ext_public_key: [u8; 4],
    pub ext_secret_key: [u8; 4],
}

impl Base58Prefixes {
    pub fn prefix(&self, kind: Base58Type) -> &[u8] {
        match kind {
            Base58Type::PubkeyAddress => &self.pubkey_address,
            Base58Type::ScriptAddress => &self.script_address,
            Base58Type::SecretKey => &self.secret_key,
            Base58Type::ExtPublicKey => &self.ext_public_key,
            Base58Type::ExtSecretKey => &self.ext_secret_key,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DnsSeed {
    pub name: String,
    pub host: String,
}

impl DnsSeed {
    pub fn new(name: &str, host: &str) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
        }
    }
}

/// A fixed seed address, IPv4 addresses stored IPv6-mapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SeedSpec {
    pub addr: [u8; 16],
    pub port: u16,
}

/// Pinned block hashes keyed by height.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CheckpointData {
    pub checkpoints: BTreeMap<u32, BlockHash>,
}

impl CheckpointData {
    pub fn last_checkpoint(&self) -> Option<(u32, BlockHash)> {
        self.checkpoints
            .iter()
            .next_back()
            .map(|(height, hash)| (*height, *hash))
    }
}

impl<const N: usize> From<[(u32, BlockHash); N]> for CheckpointData {
    fn from(entries: [(u32, BlockHash); N]) -> Self {
        Self {
            checkpoints: BTreeMap::from(entries),
        }
    }
}

/// Transaction statistics at the last checkpoint, used to estimate sync progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ChainTxData {
    /// UNIX timestamp of the last checkpoint block
    pub time: i64,
    /// Total number of transactions between genesis and the last checkpoint
    pub tx_count: u64,
    /// Estimated number of transactions per day after the checkpoint
    pub tx_rate: f64,
}

/// Everything a node needs to know about the network it runs on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChainParams {
    pub network: Network,
    pub consensus: ConsensusParams,
    pub message_start: [u8; 4],
    pub alert_pub_key: Vec<u8>,
    pub default_port: u16,
    pub prune_after_height: u64,
    pub dns_seeds: Vec<DnsSeed>,
    pub fixed_seeds: Vec<SeedSpec>,
    pub base58_prefixes: Base58Prefixes,
    pub ext_coin_type: u32,
    pub mining_requires_peers: bool,
    pub default_consistency_checks: bool,
    pub require_standard: bool,
    pub mine_blocks_on_demand: bool,
    pub allow_multiple_addresses_from_group: bool,
    pub allow_multiple_ports: bool,
    pub pool_max_transactions: u32,
    pub fulfilled_request_expire_time: i64,
    pub spork_address: String,
    pub checkpoints: CheckpointData,
    pub chain_tx_data: ChainTxData,
    pub genesis: Block,
    pub devnet_genesis: Option<Block>,
}

impl ChainParams {
    pub fn network_id(&self) -> &'static str {
        self.network.as_str()
    }

    pub fn genesis_block(&self) -> &Block {
        &self.genesis
    }

    pub fn devnet_genesis_block(&self) -> Option<&Block> {
        self.devnet_genesis.as_ref()
    }

    pub fn base58_prefix(&self, kind: Base58Type) -> &[u8] {
        self.base58_prefixes.prefix(kind)
    }
}

/// Parses a 256-bit number written big-endian in hex, with or without a `0x`
/// prefix. Short literals are zero-extended, so `"0x"` is zero.
pub(crate) fn be_bytes_from_hex(input: &str) -> Result<[u8; 32], ChainParamsError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() > 64 {
        return Err(ChainParamsError::InvalidHex(input.to_string()));
    }

    let padded = format!("{:0>64}", digits);
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(&padded, &mut bytes)
        .map_err(|_| ChainParamsError::InvalidHex(input.to_string()))?;
    Ok(bytes)
}

/// Parses a hash written in display order.
pub fn hash_from_hex(input: &str) -> Result<BlockHash, ChainParamsError> {
    let mut bytes = be_bytes_from_hex(input)?;
    bytes.reverse();
    Ok(BlockHash::from_byte_array(bytes))
}
