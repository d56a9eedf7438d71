use anyhow::{anyhow, bail, Context, Result};
use chainparams_core::{
    deployment::Deployment, ChainParams, ChainRegistry, DeploymentOverride, Network,
    RegistryOptions,
};
use serde::Serialize;
use tracing::info;

/// Network flags as they appear on a node's command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainFlags {
    pub chain: Option<String>,
    pub testnet: bool,
    pub regtest: bool,
    pub devnet: Option<String>,
}

impl ChainFlags {
    /// Picks the network: at most one of `--testnet`, `--regtest` and `--devnet`
    /// may be given, and `--chain` must agree with it. Without any flag the node
    /// runs on main.
    pub fn resolve(&self) -> Result<Network> {
        let mut flagged = Vec::new();
        if self.testnet {
            flagged.push(Network::Testnet);
        }
        if self.regtest {
            flagged.push(Network::Regtest);
        }
        if self.devnet.is_some() {
            flagged.push(Network::Devnet);
        }
        if flagged.len() > 1 {
            bail!("Invalid combination of --regtest, --testnet and --devnet");
        }

        let named = self
            .chain
            .as_deref()
            .map(str::parse::<Network>)
            .transpose()?;
        match (named, flagged.first().copied()) {
            (Some(named), Some(flag)) if named != flag => Err(anyhow!(
                "--chain {} conflicts with the --{} flag",
                named,
                flag_name(flag)
            )),
            (Some(network), _) | (None, Some(network)) => Ok(network),
            (None, None) => Ok(Network::Main),
        }
    }

    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            devnet_name: self.devnet.clone(),
        }
    }
}

fn flag_name(network: Network) -> &'static str {
    match network {
        Network::Main => "main",
        Network::Testnet => "testnet",
        Network::Devnet => "devnet",
        Network::Regtest => "regtest",
    }
}

/// Builds the registry for `network` and applies the `--vbparams` overrides, which
/// are only accepted on regtest.
pub fn build_registry(
    network: Network,
    options: RegistryOptions,
    vbparams: &[String],
) -> Result<ChainRegistry> {
    if !vbparams.is_empty() && network != Network::Regtest {
        bail!("Version bits parameters may only be overridden on regtest");
    }

    let mut registry = ChainRegistry::try_new(options).context("building chain parameters")?;
    for text in vbparams {
        let update: DeploymentOverride = text.parse()?;
        registry
            .apply_override(&update)
            .with_context(|| format!("applying --vbparams {}", text))?;
        info!(
            "Setting version bits activation parameters for bit {} to start={}, timeout={}",
            update.bit, update.start_time, update.timeout
        );
    }
    Ok(registry)
}

/// The parts of a parameter set an operator usually wants to see.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParamsSummary {
    pub network: Network,
    pub devnet_name: Option<String>,
    pub genesis_hash: String,
    pub genesis_merkle_root: String,
    pub devnet_genesis_hash: Option<String>,
    pub message_start: String,
    pub default_port: u16,
    pub pow_limit: String,
    pub last_pow_block: u32,
    pub last_checkpoint: Option<u32>,
    pub deployments: Vec<Deployment>,
}

impl ParamsSummary {
    pub fn new(params: &ChainParams, options: &RegistryOptions) -> Self {
        Self {
            network: params.network,
            devnet_name: (params.network == Network::Devnet).then(|| options.devnet_name()),
            genesis_hash: params.consensus.hash_genesis_block.to_string(),
            genesis_merkle_root: params.genesis.header.merkle_root.to_string(),
            devnet_genesis_hash: params
                .consensus
                .hash_devnet_genesis_block
                .map(|hash| hash.to_string()),
            message_start: hex::encode(params.message_start),
            default_port: params.default_port,
            pow_limit: hex::encode(params.consensus.pow_limit),
            last_pow_block: params.consensus.last_pow_block,
            last_checkpoint: params
                .checkpoints
                .last_checkpoint()
                .map(|(height, _)| height),
            deployments: params.consensus.deployments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(testnet: bool, regtest: bool, devnet: Option<&str>) -> ChainFlags {
        ChainFlags {
            chain: None,
            testnet,
            regtest,
            devnet: devnet.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_single_flags() {
        assert_eq!(ChainFlags::default().resolve().unwrap(), Network::Main);
        assert_eq!(flags(true, false, None).resolve().unwrap(), Network::Testnet);
        assert_eq!(flags(false, true, None).resolve().unwrap(), Network::Regtest);
        assert_eq!(flags(false, false, Some("")).resolve().unwrap(), Network::Devnet);
    }

    #[test]
    fn test_resolve_rejects_combinations() {
        assert!(flags(true, true, None).resolve().is_err());
        assert!(flags(true, false, Some("foo")).resolve().is_err());
        assert!(flags(false, true, Some("foo")).resolve().is_err());
    }

    #[test]
    fn test_resolve_with_chain_name() {
        let mut chain = ChainFlags {
            chain: Some("test".to_string()),
            ..ChainFlags::default()
        };
        assert_eq!(chain.resolve().unwrap(), Network::Testnet);

        chain.testnet = true;
        assert_eq!(chain.resolve().unwrap(), Network::Testnet);

        chain.testnet = false;
        chain.regtest = true;
        assert!(chain.resolve().is_err());

        let bogus = ChainFlags {
            chain: Some("bogus".to_string()),
            ..ChainFlags::default()
        };
        assert!(bogus.resolve().unwrap_err().to_string().contains("bogus"));
    }

    #[test]
    fn test_devnet_flag_names_devnet() {
        let options = flags(false, false, Some("foo")).registry_options();
        assert_eq!(options.devnet_name(), "devnet-foo");
        assert_eq!(flags(false, false, None).registry_options().devnet_name(), "devnet");
    }

    #[test]
    fn test_vbparams_only_on_regtest() {
        let vbparams = vec!["dip0001:0:500".to_string()];
        assert!(build_registry(Network::Main, RegistryOptions::default(), &vbparams).is_err());

        let registry =
            build_registry(Network::Regtest, RegistryOptions::default(), &vbparams).unwrap();
        let dip0001 = registry
            .get("regtest")
            .unwrap()
            .consensus
            .deployment_for_bit(1)
            .unwrap();
        assert_eq!((dip0001.start_time, dip0001.timeout), (0, 500));

        let malformed = vec!["dip0001:0".to_string()];
        assert!(build_registry(Network::Regtest, RegistryOptions::default(), &malformed).is_err());
    }

    #[test]
    fn test_summary_of_regtest() {
        let registry = ChainRegistry::default();
        let params = registry.select("regtest");
        let summary = ParamsSummary::new(params, registry.options());
        assert_eq!(
            summary.genesis_hash,
            "00000f3b4ec57f851b3706c056eda3120875896c9970495ae2efd49b46472a05"
        );
        assert_eq!(summary.message_start, "fcc1b7dc");
        assert_eq!(summary.devnet_name, None);
        assert_eq!(summary.last_checkpoint, Some(0));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["network"], "regtest");
        assert_eq!(json["deployments"][1]["pos"], "csv");
    }
}
