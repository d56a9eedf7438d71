//! Error types for chain parameter construction and lookup

use thiserror::Error;

use crate::deployment::DeploymentPos;
use crate::params::Network;
use crate::pow::CompactError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainParamsError {
    #[error("Unknown chain {0}.")]
    UnknownChain(String),

    #[error("{network}: genesis {field} mismatch, expected {expected}, computed {actual}")]
    GenesisMismatch {
        network: Network,
        field: &'static str,
        expected: String,
        actual: String,
    },

    #[error("invalid {pos} deployment: {reason}")]
    InvalidDeployment { pos: DeploymentPos, reason: String },

    #[error("version bit {bit} is claimed by both {first} and {second}")]
    DuplicateDeploymentBit {
        bit: u8,
        first: DeploymentPos,
        second: DeploymentPos,
    },

    #[error("{network} has no deployment on version bit {bit}")]
    UnknownDeployment { network: Network, bit: u8 },

    #[error("deployment parameters may only be overridden on regtest, not {0}")]
    OverrideNotPermitted(Network),

    #[error("invalid deployment override {0:?}, expected deployment:start:timeout")]
    InvalidOverride(String),

    #[error("could not find devnet genesis block for {0}")]
    DevnetMiningExhausted(String),

    #[error("devnet name must not be empty")]
    EmptyDevnetName,

    #[error("invalid 256-bit hex literal {0:?}")]
    InvalidHex(String),

    #[error("coinbase script push rejected: {0}")]
    ScriptPush(String),

    #[error(transparent)]
    Compact(#[from] CompactError),
}
