//! Network parameters for a proof-of-work then proof-of-stake chain.
//!
//! Every supported network (main, test, dev and regtest) has one [`ChainParams`]
//! value holding its consensus rules and its genesis block. The genesis blocks are
//! rebuilt on startup and checked against pinned hashes. Devnet additionally mines a
//! second genesis block named after the devnet.
//!
//! Most callers go through [`ChainRegistry`], or through the process-wide
//! [`select_params`] and [`params`] once the node has decided which network to run.

pub mod constants;
pub mod deployment;
pub mod error;
pub mod genesis;
pub mod hashes;
pub mod merkle;
pub mod networks;
pub mod params;
pub mod pow;
pub mod registry;
pub mod x11;

pub use deployment::{Deployment, DeploymentOverride, DeploymentPos};
pub use error::ChainParamsError;
pub use params::{Base58Type, ChainParams, ConsensusParams, Network};
pub use registry::{
    install, params, params_for, registry, select_params, ChainRegistry, RegistryOptions,
};
