// Per-network parameter sets
// ==========================
//
// One constructor per network. Each builds its genesis block, compares the result
// against the pinned hash and merkle root, and fills in the remaining rule set.

use bitcoin::hashes::Hash;
use bitcoin::{Amount, Block, BlockHash};
use tracing::{debug, info};

use crate::constants::{COIN, MAIN_GENESIS_REWARD, STAKE_MIN_AGE_SWITCH_TIME, TEST_GENESIS_REWARD};
use crate::deployment::{validate_deployments, Deployment, DeploymentPos};
use crate::error::ChainParamsError;
use crate::genesis::{create_base_genesis_block, mine_devnet_genesis};
use crate::hashes::block_hash;
use crate::params::{
    be_bytes_from_hex, hash_from_hex, Base58Prefixes, ChainParams, ChainTxData, CheckpointData,
    ConsensusParams, DnsSeed, Network,
};

const MAIN_GENESIS_HASH: &str =
    "0x00000621bb6857cd02430c2566fefae6b274483defb0c18dff7ca8cd26861579";
const TESTNET_GENESIS_HASH: &str =
    "0x00000f1f32f44b16d3532e542e70b33d9e3d8a0f8e9008e81f4f597f5857d43f";
const DEVNET_GENESIS_HASH: &str =
    "0xaa583c87a18e73481c1528302981b02c281cb19c4f6d8ba007b2e13dd1645aed";
const REGTEST_GENESIS_HASH: &str =
    "0x00000f3b4ec57f851b3706c056eda3120875896c9970495ae2efd49b46472a05";

// Checkpoint 0 of each table is a fixed literal, not the genesis hash computed
// above. Devnet and regtest share theirs.
const MAIN_CHECKPOINT_0: &str =
    "0x000009701eb781a8113b1af1d814e2f060f6408a2c990db291bc5108a1345c1e";
const INHERITED_CHECKPOINT_0: &str =
    "0x000008ca1832a4baf228eb1553c03d3a2c8e02399550dd6ea8d65cec3ef23d2e";

/// Merkle root of the genesis coinbase paying 10 coins.
const MAIN_GENESIS_MERKLE_ROOT: &str =
    "0xe98ff986f1218c5d9534463f2395d1f8357d2691b211d9c2f0b920aac7c3a095";
/// Merkle root of the genesis coinbase paying 50 coins.
const TEST_GENESIS_MERKLE_ROOT: &str =
    "0x5dc9bcf5d1e4802dad0045a88849e3ad97d07a5b8aaee1114ed5ae03b98c4bfc";

const MAIN_POW_LIMIT: &str = "00000fffff000000000000000000000000000000000000000000000000000000";
const TEST_POW_LIMIT: &str = "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

const BITCOIN_EXT_PUBLIC_KEY: [u8; 4] = [0x04, 0x35, 0x87, 0xcf];
const BITCOIN_EXT_SECRET_KEY: [u8; 4] = [0x04, 0x35, 0x83, 0x94];

const TESTNET_ALERT_PUB_KEY: &str = "04517d8a699cb43d3938d7b24faaff7cda448ca4ea267723ba614784de661949bf632d6304316b244646dea079735b9a6fc4af804efb4752075b9fe2245e14e412";

fn coins(amount: u64) -> Amount {
    Amount::from_sat(amount * COIN)
}

fn decode_hex(input: &str) -> Result<Vec<u8>, ChainParamsError> {
    hex::decode(input).map_err(|_| ChainParamsError::InvalidHex(input.to_string()))
}

/// Compares a freshly built genesis block against its pinned hash and merkle root
/// and returns the hash.
pub(crate) fn check_genesis(
    network: Network,
    genesis: &Block,
    expected_hash: &str,
    expected_merkle_root: &str,
) -> Result<BlockHash, ChainParamsError> {
    let hash = block_hash(&genesis.header);
    let merkle_root = genesis.header.merkle_root;
    debug!("{} genesis merkle root: {}", network, merkle_root);
    debug!("{} genesis block: {}", network, hash);

    let expected = hash_from_hex(expected_hash)?;
    if hash != expected {
        return Err(ChainParamsError::GenesisMismatch {
            network,
            field: "hash",
            expected: expected.to_string(),
            actual: hash.to_string(),
        });
    }
    let expected_root = hash_from_hex(expected_merkle_root)?.to_byte_array();
    if merkle_root.to_byte_array() != expected_root {
        let mut display = expected_root;
        display.reverse();
        return Err(ChainParamsError::GenesisMismatch {
            network,
            field: "merkle root",
            expected: hex::encode(display),
            actual: merkle_root.to_string(),
        });
    }
    Ok(hash)
}

/// The four deployments in position order. Test dummy and CSV vote over the
/// network-wide window, DIP0001 and BIP147 over their own.
fn deployments(
    times: [(i64, i64); 4],
    window: u32,
    threshold: u32,
    versionbits_window: u32,
    versionbits_threshold: u32,
) -> Result<Vec<Deployment>, ChainParamsError> {
    let [dummy, csv, dip0001, bip147] = times;
    let deployments = vec![
        Deployment::new(DeploymentPos::TestDummy, 28, dummy.0, dummy.1, window, threshold),
        Deployment::new(DeploymentPos::Csv, 0, csv.0, csv.1, window, threshold),
        Deployment::new(
            DeploymentPos::Dip0001,
            1,
            dip0001.0,
            dip0001.1,
            versionbits_window,
            versionbits_threshold,
        ),
        Deployment::new(
            DeploymentPos::Bip147,
            2,
            bip147.0,
            bip147.1,
            versionbits_window,
            versionbits_threshold,
        ),
    ];
    validate_deployments(&deployments)?;
    Ok(deployments)
}

pub fn main_params() -> Result<ChainParams, ChainParamsError> {
    let network = Network::Main;
    let genesis = create_base_genesis_block(
        1567314000,
        3306082,
        0x1e0ffff0,
        1,
        coins(MAIN_GENESIS_REWARD),
    )?;
    let hash_genesis_block =
        check_genesis(network, &genesis, MAIN_GENESIS_HASH, MAIN_GENESIS_MERKLE_ROOT)?;

    let consensus = ConsensusParams {
        hash_genesis_block,
        hash_devnet_genesis_block: None,
        // Actual number of blocks per calendar year with DGW v3 is ~200700
        subsidy_halving_interval: 262800,
        masternode_payments_start_block: 15,
        masternode_payments_increase_block: None,
        masternode_payments_increase_period: None,
        instant_send_confirmations_required: 6,
        instant_send_keep_lock: 24,
        budget_payments_start_block: 32800,
        budget_payments_cycle_blocks: 16616,
        budget_payments_window_blocks: 100,
        superblock_start_block: 66464,
        superblock_start_hash: Some(hash_from_hex(
            "0000000000000a7d13390bb29ac6d4466afb16358aeb3cd0656215392ed2468d",
        )?),
        superblock_cycle: 16616,
        governance_min_quorum: 10,
        governance_filter_elements: 20000,
        masternode_minimum_confirmations: 15,
        bip34_height: 951,
        bip34_hash: Some(hash_from_hex(
            "0x000001f35e70f7c5705f64c6c5cc3dea9449e74d5b5c7cf74dad1bcca14a8012",
        )?),
        bip65_height: 84672,
        bip66_height: 245817,
        dip0001_height: 12096,
        max_block_spacing_fix_deployment_height: 381587,
        pow_limit: be_bytes_from_hex(MAIN_POW_LIMIT)?,
        pow_target_timespan: 24 * 60 * 60,
        pow_target_spacing: 60,
        pow_allow_min_difficulty_blocks: false,
        pow_no_retargeting: false,
        pow_kgw_height: 551,
        pow_dgw_height: 551,
        pos_target_spacing: 60,
        pos_target_timespan: 40 * 60,
        stake_min_age: 2 * 60,
        stake_min_age_2: Some(60 * 60),
        stake_min_age_switch_time: STAKE_MIN_AGE_SWITCH_TIME,
        stake_max_age: 24 * 60 * 60,
        last_pow_block: 1000,
        ws_target_diff: Some(0x1e0ffff0),
        pos_diff_adjust_range: Some(5),
        rule_change_activation_threshold: 1916, // 95% of 2016
        miner_confirmation_window: 2016,
        deployments: deployments(
            [
                (1199145601, 1230767999), // Jan 1st 2008 to Dec 31st 2008
                (1486252800, 1517788800), // Feb 5th 2017 to Feb 5th 2018
                (1508025600, 1539561600), // Oct 15th 2017 to Oct 15th 2018
                (1524477600, 1556013600), // Apr 23rd 2018 to Apr 23rd 2019
            ],
            2016,
            1916,
            4032,
            3226, // 80% of 4032
        )?,
        minimum_chain_work: be_bytes_from_hex("0x0")?,
        default_assume_valid: hash_from_hex(
            "0x00000000000002115266e3f36778feb4fe9488fccabcd004e13c13ab46ddfaeb",
        )?,
    };

    info!("Built {} parameters, genesis {}", network, hash_genesis_block);
    Ok(ChainParams {
        network,
        consensus,
        message_start: [0xbf, 0x0c, 0x6b, 0xbd],
        alert_pub_key: decode_hex("040f75a949d4536e16b53ff978b877583806892f7535c44030c4f589effd49836213224590108598004b8846adec0825b787cb64c56e3beacbcb7716877e4322e2")?,
        default_port: 13376,
        prune_after_height: 100000,
        dns_seeds: vec![
            DnsSeed::new("dnsseed.mnpcoin.pro", "dnsseed.mnpcoin.pro"),
            DnsSeed::new("dnsseed.masternodes.pro", "dnsseed.masternodes.pro"),
        ],
        fixed_seeds: vec![],
        base58_prefixes: Base58Prefixes {
            pubkey_address: [50], // addresses start with 'M'
            script_address: [53], // script addresses start with 'N'
            secret_key: [55],     // private keys start with 'P'
            ext_public_key: [0x03, 0xe2, 0x5d, 0x7e],
            ext_secret_key: [0x03, 0xe2, 0x59, 0x45],
        },
        ext_coin_type: 1997,
        mining_requires_peers: true,
        default_consistency_checks: false,
        require_standard: true,
        mine_blocks_on_demand: false,
        allow_multiple_addresses_from_group: false,
        allow_multiple_ports: false,
        pool_max_transactions: 3,
        fulfilled_request_expire_time: 60 * 60,
        spork_address: "PAvya6xSBRb755Uhe2aXBFsjuyi68hTP8u".to_string(),
        checkpoints: CheckpointData::from([(0, hash_from_hex(MAIN_CHECKPOINT_0)?)]),
        chain_tx_data: ChainTxData {
            time: 1561487163,
            tx_count: 900795,
            tx_rate: 0.1,
        },
        genesis,
        devnet_genesis: None,
    })
}

pub fn testnet_params() -> Result<ChainParams, ChainParamsError> {
    let network = Network::Testnet;
    let genesis = create_base_genesis_block(
        1567400400,
        606187,
        0x1e0ffff0,
        1,
        coins(MAIN_GENESIS_REWARD),
    )?;
    let hash_genesis_block =
        check_genesis(network, &genesis, TESTNET_GENESIS_HASH, MAIN_GENESIS_MERKLE_ROOT)?;

    let consensus = ConsensusParams {
        hash_genesis_block,
        hash_devnet_genesis_block: None,
        subsidy_halving_interval: 1569325056,
        masternode_payments_start_block: 15,
        masternode_payments_increase_block: Some(1569325056),
        masternode_payments_increase_period: Some(1569325056),
        instant_send_confirmations_required: 2,
        instant_send_keep_lock: 6,
        budget_payments_start_block: 46,
        budget_payments_cycle_blocks: 24,
        budget_payments_window_blocks: 10,
        superblock_start_block: 3050,
        superblock_start_hash: None,
        superblock_cycle: 24,
        governance_min_quorum: 1,
        governance_filter_elements: 500,
        masternode_minimum_confirmations: 1,
        bip34_height: 76,
        bip34_hash: Some(hash_from_hex(
            "0x000008ebb1db2598e897d17275285767717c6acfeac4c73def49fbea1ddcbcb6",
        )?),
        bip65_height: 2431,
        bip66_height: 2075,
        dip0001_height: 5500,
        max_block_spacing_fix_deployment_height: 700,
        pow_limit: be_bytes_from_hex(MAIN_POW_LIMIT)?,
        pow_target_timespan: 24 * 60 * 60,
        pow_target_spacing: 60,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: false,
        // A KGW height at or above the DGW height means KGW is never used
        pow_kgw_height: 4001,
        pow_dgw_height: 4001,
        pos_target_spacing: 60,
        pos_target_timespan: 40 * 60,
        stake_min_age: 60,
        stake_min_age_2: Some(60 * 60),
        stake_min_age_switch_time: STAKE_MIN_AGE_SWITCH_TIME,
        stake_max_age: 24 * 60 * 60,
        last_pow_block: 650,
        ws_target_diff: Some(0x1e0dfff0),
        pos_diff_adjust_range: Some(1),
        rule_change_activation_threshold: 1512, // 75% for testchains
        miner_confirmation_window: 2016,
        deployments: deployments(
            [
                (1199145601, 1230767999),
                (1506556800, 1538092800),
                (1505692800, 1537228800),
                (1517792400, 1549328400),
            ],
            2016,
            1512,
            100,
            50,
        )?,
        minimum_chain_work: be_bytes_from_hex("0x")?,
        default_assume_valid: hash_from_hex("0x")?,
    };

    info!("Built {} parameters, genesis {}", network, hash_genesis_block);
    Ok(ChainParams {
        network,
        consensus,
        message_start: [0xce, 0xe2, 0xca, 0xff],
        alert_pub_key: decode_hex(TESTNET_ALERT_PUB_KEY)?,
        default_port: 21430,
        prune_after_height: 1000,
        dns_seeds: vec![DnsSeed::new("207.148.13.160", "207.148.13.160")],
        fixed_seeds: vec![],
        base58_prefixes: Base58Prefixes {
            pubkey_address: [88],  // addresses start with 'w'
            script_address: [112], // script addresses start with '7'
            secret_key: [127],     // private keys start with 'q'
            ext_public_key: BITCOIN_EXT_PUBLIC_KEY,
            ext_secret_key: BITCOIN_EXT_SECRET_KEY,
        },
        ext_coin_type: 1,
        mining_requires_peers: true,
        default_consistency_checks: false,
        require_standard: false,
        mine_blocks_on_demand: false,
        allow_multiple_addresses_from_group: false,
        allow_multiple_ports: false,
        pool_max_transactions: 3,
        fulfilled_request_expire_time: 5 * 60,
        spork_address: "yMCScEFCuhFGQL8aBS8UPXnKriFtjMVWra".to_string(),
        checkpoints: CheckpointData::from([(0, hash_from_hex("0x")?)]),
        chain_tx_data: ChainTxData::default(),
        genesis,
        devnet_genesis: None,
    })
}

/// Devnet parameters. Building them mines the devnet genesis, which makes this
/// the only constructor with a noticeable cost.
pub fn devnet_params(devnet_name: &str) -> Result<ChainParams, ChainParamsError> {
    let network = Network::Devnet;
    let genesis = create_base_genesis_block(
        1417713337,
        1096447,
        0x207fffff,
        1,
        coins(TEST_GENESIS_REWARD),
    )?;
    let hash_genesis_block =
        check_genesis(network, &genesis, DEVNET_GENESIS_HASH, TEST_GENESIS_MERKLE_ROOT)?;

    let devnet_genesis = mine_devnet_genesis(&genesis, devnet_name, coins(TEST_GENESIS_REWARD))?;
    let hash_devnet_genesis_block = block_hash(&devnet_genesis.header);

    let consensus = ConsensusParams {
        hash_genesis_block,
        hash_devnet_genesis_block: Some(hash_devnet_genesis_block),
        subsidy_halving_interval: 210240,
        masternode_payments_start_block: 4010,
        masternode_payments_increase_block: Some(4030),
        masternode_payments_increase_period: Some(10),
        instant_send_confirmations_required: 2,
        instant_send_keep_lock: 6,
        budget_payments_start_block: 4100,
        budget_payments_cycle_blocks: 50,
        budget_payments_window_blocks: 10,
        superblock_start_block: 4200,
        superblock_start_hash: None,
        superblock_cycle: 24,
        governance_min_quorum: 1,
        governance_filter_elements: 500,
        masternode_minimum_confirmations: 1,
        bip34_height: 1,
        bip34_hash: None,
        bip65_height: 1,
        bip66_height: 1,
        dip0001_height: 2,
        max_block_spacing_fix_deployment_height: 700,
        pow_limit: be_bytes_from_hex(TEST_POW_LIMIT)?,
        pow_target_timespan: 24 * 60 * 60,
        pow_target_spacing: 150,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: false,
        pow_kgw_height: 4001,
        pow_dgw_height: 4001,
        pos_target_spacing: 2 * 60,
        pos_target_timespan: 40 * 60,
        stake_min_age: 60 * 60,
        stake_min_age_2: None,
        stake_min_age_switch_time: STAKE_MIN_AGE_SWITCH_TIME,
        stake_max_age: 24 * 60 * 60,
        last_pow_block: 180675,
        ws_target_diff: None,
        pos_diff_adjust_range: None,
        rule_change_activation_threshold: 1512,
        miner_confirmation_window: 2016,
        deployments: deployments(
            [
                (1199145601, 1230767999),
                (1506556800, 1538092800),
                (1505692800, 1537228800),
                (1517792400, 1549328400),
            ],
            2016,
            1512,
            100,
            50,
        )?,
        minimum_chain_work: be_bytes_from_hex("0x")?,
        default_assume_valid: hash_from_hex("0x")?,
    };

    info!(
        "Built {} parameters for {}, devnet genesis {}",
        network, devnet_name, hash_devnet_genesis_block
    );
    Ok(ChainParams {
        network,
        consensus,
        message_start: [0xe2, 0xca, 0xff, 0xce],
        alert_pub_key: decode_hex(TESTNET_ALERT_PUB_KEY)?,
        default_port: 19999,
        prune_after_height: 1000,
        dns_seeds: vec![],
        fixed_seeds: vec![],
        base58_prefixes: Base58Prefixes {
            pubkey_address: [140], // addresses start with 'y'
            script_address: [19],  // script addresses start with '8' or '9'
            secret_key: [239],     // private keys start with '9' or 'c'
            ext_public_key: BITCOIN_EXT_PUBLIC_KEY,
            ext_secret_key: BITCOIN_EXT_SECRET_KEY,
        },
        ext_coin_type: 1,
        mining_requires_peers: true,
        default_consistency_checks: false,
        require_standard: false,
        mine_blocks_on_demand: false,
        allow_multiple_addresses_from_group: true,
        allow_multiple_ports: true,
        pool_max_transactions: 3,
        fulfilled_request_expire_time: 5 * 60,
        spork_address: "yjPtiKh2uwk3bDutTEA2q9mCtXyiZRWn55".to_string(),
        checkpoints: CheckpointData::from([
            (0, hash_from_hex(INHERITED_CHECKPOINT_0)?),
            (1, hash_devnet_genesis_block),
        ]),
        chain_tx_data: ChainTxData {
            time: i64::from(devnet_genesis.header.time),
            // Only the two genesis coinbases exist when a devnet starts
            tx_count: 2,
            tx_rate: 0.01,
        },
        genesis,
        devnet_genesis: Some(devnet_genesis),
    })
}

pub fn regtest_params() -> Result<ChainParams, ChainParamsError> {
    let network = Network::Regtest;
    let genesis = create_base_genesis_block(
        1513831322,
        887612,
        0x1e0ffff0,
        1,
        coins(TEST_GENESIS_REWARD),
    )?;
    let hash_genesis_block =
        check_genesis(network, &genesis, REGTEST_GENESIS_HASH, TEST_GENESIS_MERKLE_ROOT)?;

    let consensus = ConsensusParams {
        hash_genesis_block,
        hash_devnet_genesis_block: None,
        subsidy_halving_interval: 150,
        masternode_payments_start_block: 240,
        masternode_payments_increase_block: Some(350),
        masternode_payments_increase_period: Some(10),
        instant_send_confirmations_required: 2,
        instant_send_keep_lock: 6,
        budget_payments_start_block: 25,
        budget_payments_cycle_blocks: 50,
        budget_payments_window_blocks: 10,
        superblock_start_block: 1500,
        superblock_start_hash: None,
        superblock_cycle: 10,
        governance_min_quorum: 1,
        governance_filter_elements: 100,
        masternode_minimum_confirmations: 1,
        // Far in the future so version 1 blocks are not rejected in tests
        bip34_height: 100000000,
        bip34_hash: None,
        bip65_height: 1351,
        bip66_height: 1251,
        dip0001_height: 2000,
        max_block_spacing_fix_deployment_height: 700,
        pow_limit: be_bytes_from_hex(TEST_POW_LIMIT)?,
        pow_target_timespan: 24 * 60 * 60,
        pow_target_spacing: 120,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: true,
        pow_kgw_height: 15200,
        pow_dgw_height: 34140,
        pos_target_spacing: 30,
        pos_target_timespan: 40 * 60,
        stake_min_age: 60,
        stake_min_age_2: None,
        stake_min_age_switch_time: STAKE_MIN_AGE_SWITCH_TIME,
        stake_max_age: 24 * 60 * 60,
        last_pow_block: 25,
        ws_target_diff: Some(0x1e0ffff0),
        pos_diff_adjust_range: None,
        rule_change_activation_threshold: 108, // 75% for testchains
        miner_confirmation_window: 144,
        deployments: deployments(
            [
                (0, 999999999999),
                (0, 999999999999),
                (0, 999999999999),
                (0, 999999999999),
            ],
            144,
            108,
            144,
            108,
        )?,
        minimum_chain_work: be_bytes_from_hex("0x00")?,
        default_assume_valid: hash_from_hex("0x00")?,
    };

    info!("Built {} parameters, genesis {}", network, hash_genesis_block);
    Ok(ChainParams {
        network,
        consensus,
        message_start: [0xfc, 0xc1, 0xb7, 0xdc],
        alert_pub_key: vec![],
        default_port: 19994,
        prune_after_height: 1000,
        dns_seeds: vec![],
        fixed_seeds: vec![],
        base58_prefixes: Base58Prefixes {
            pubkey_address: [140],
            script_address: [19],
            secret_key: [239],
            ext_public_key: BITCOIN_EXT_PUBLIC_KEY,
            ext_secret_key: BITCOIN_EXT_SECRET_KEY,
        },
        ext_coin_type: 1,
        mining_requires_peers: false,
        default_consistency_checks: true,
        require_standard: false,
        mine_blocks_on_demand: true,
        allow_multiple_addresses_from_group: true,
        allow_multiple_ports: true,
        pool_max_transactions: 3,
        fulfilled_request_expire_time: 5 * 60,
        // privKey: cP4EKFyJsHT39LDqgdcB43Y3YXjNyjb5Fuas1GQSeAtjnZWmZEQK
        spork_address: "yj949n1UH6fDhw6HtVE5VMj2iSTaSWBMcW".to_string(),
        checkpoints: CheckpointData::from([(0, hash_from_hex(INHERITED_CHECKPOINT_0)?)]),
        chain_tx_data: ChainTxData::default(),
        genesis,
        devnet_genesis: None,
    })
}

impl ChainParams {
    /// Builds the parameter set of a network. Devnet needs the devnet name, which
    /// only matters for that network.
    pub fn for_network(network: Network, devnet_name: &str) -> Result<Self, ChainParamsError> {
        match network {
            Network::Main => main_params(),
            Network::Testnet => testnet_params(),
            Network::Devnet => devnet_params(devnet_name),
            Network::Regtest => regtest_params(),
        }
    }
}
