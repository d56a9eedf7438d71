// Network parameter registry
// ==========================
//
// Holds the parameter sets of every network and remembers which one the process
// runs on. Main, test and regtest are built up front; devnet is built on first
// selection because it has to mine its second genesis block.

use std::sync::OnceLock;

use tracing::{error, info};

use crate::constants::DEFAULT_DEVNET_NAME;
use crate::deployment::DeploymentOverride;
use crate::error::ChainParamsError;
use crate::networks::{devnet_params, main_params, regtest_params, testnet_params};
use crate::params::{ChainParams, Network};

/// Logs and aborts. Used for conditions that mean the node is misconfigured or the
/// parameter tables are corrupt. Unit tests unwind instead so `should_panic` can
/// observe the message.
fn fatal(message: String) -> ! {
    if cfg!(test) {
        error!("{}", message);
        panic!("{}", message)
    }
    abort_process(&message)
}

fn abort_process(message: &str) -> ! {
    error!("{}", message);
    std::process::abort()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Operator chosen devnet suffix, as given to `--devnet`.
    pub devnet_name: Option<String>,
}

impl RegistryOptions {
    pub fn with_devnet_name(name: impl Into<String>) -> Self {
        Self {
            devnet_name: Some(name.into()),
        }
    }

    /// Full devnet name: `devnet-<suffix>`, or plain `devnet` without a suffix.
    pub fn devnet_name(&self) -> String {
        match self.devnet_name.as_deref() {
            Some(suffix) if !suffix.is_empty() => format!("{}-{}", DEFAULT_DEVNET_NAME, suffix),
            _ => DEFAULT_DEVNET_NAME.to_string(),
        }
    }
}

pub struct ChainRegistry {
    options: RegistryOptions,
    main: ChainParams,
    testnet: ChainParams,
    regtest: ChainParams,
    devnet: OnceLock<ChainParams>,
    current: OnceLock<Network>,
}

impl ChainRegistry {
    /// Builds main, test and regtest, aborting if any of them fails its genesis check.
    pub fn new(options: RegistryOptions) -> Self {
        Self::try_new(options)
            .unwrap_or_else(|e| fatal(format!("Failed to build chain parameters: {}", e)))
    }

    pub fn try_new(options: RegistryOptions) -> Result<Self, ChainParamsError> {
        Ok(Self {
            options,
            main: main_params()?,
            testnet: testnet_params()?,
            regtest: regtest_params()?,
            devnet: OnceLock::new(),
            current: OnceLock::new(),
        })
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// The network chosen by `select`, if any.
    pub fn selected(&self) -> Option<Network> {
        self.current.get().copied()
    }

    pub fn is_devnet_ready(&self) -> bool {
        self.devnet.get().is_some()
    }

    /// Builds the devnet parameters once. Concurrent callers wait for the first one.
    fn devnet(&self) -> &ChainParams {
        self.devnet.get_or_init(|| {
            let name = self.options.devnet_name();
            info!("Building devnet parameters for {}", name);
            devnet_params(&name)
                .unwrap_or_else(|e| fatal(format!("Failed to build {} parameters: {}", name, e)))
        })
    }

    fn built(&self, network: Network) -> &ChainParams {
        match network {
            Network::Main => &self.main,
            Network::Testnet => &self.testnet,
            Network::Regtest => &self.regtest,
            Network::Devnet => self.devnet.get().unwrap_or_else(|| {
                fatal("Devnet parameters requested before devnet was selected".to_string())
            }),
        }
    }

    /// Makes `name` the network this process runs on.
    ///
    /// Selection happens once. Selecting the same network again returns the same
    /// parameters; selecting a different one aborts, as does an unknown name.
    pub fn select(&self, name: &str) -> &ChainParams {
        let network = name
            .parse::<Network>()
            .unwrap_or_else(|e| fatal(e.to_string()));
        // Refuse a conflicting selection before any devnet mining starts.
        if let Some(selected) = self.selected() {
            if selected != network {
                already_selected(network, selected);
            }
        }
        if network == Network::Devnet {
            self.devnet();
        }

        let selected = *self.current.get_or_init(|| {
            info!("Selected {} network", network);
            network
        });
        if selected != network {
            already_selected(network, selected);
        }
        self.built(network)
    }

    /// Looks up a network's parameters without touching the selection.
    pub fn get(&self, name: &str) -> Result<&ChainParams, ChainParamsError> {
        let network = name.parse::<Network>()?;
        Ok(self.built(network))
    }

    /// Parameters of the selected network. Aborts when nothing was selected.
    pub fn current(&self) -> &ChainParams {
        let network = self
            .selected()
            .unwrap_or_else(|| fatal("No network selected".to_string()));
        self.built(network)
    }

    /// Replaces start time and timeout of the deployment on `bit`.
    ///
    /// Only regtest accepts overrides. The updated descriptor is validated before it
    /// is stored, so a rejected override leaves the parameters untouched.
    pub fn override_deployment(
        &mut self,
        network: Network,
        bit: u8,
        start_time: i64,
        timeout: i64,
    ) -> Result<(), ChainParamsError> {
        if network != Network::Regtest {
            return Err(ChainParamsError::OverrideNotPermitted(network));
        }

        let deployment = self
            .regtest
            .consensus
            .deployment_for_bit_mut(bit)
            .ok_or(ChainParamsError::UnknownDeployment { network, bit })?;
        let mut updated = deployment.clone();
        updated.start_time = start_time;
        updated.timeout = timeout;
        updated.validate()?;
        *deployment = updated;

        info!(
            "Regtest deployment {} on bit {} now starts at {} and times out at {}",
            deployment.pos, bit, start_time, timeout
        );
        Ok(())
    }

    pub fn apply_override(&mut self, update: &DeploymentOverride) -> Result<(), ChainParamsError> {
        self.override_deployment(
            Network::Regtest,
            update.bit,
            update.start_time,
            update.timeout,
        )
    }
}

fn already_selected(network: Network, selected: Network) -> ! {
    fatal(format!(
        "Cannot select {} network, {} is already selected",
        network, selected
    ))
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new(RegistryOptions::default())
    }
}

static REGISTRY: OnceLock<ChainRegistry> = OnceLock::new();

/// Publishes `registry` as the process-wide registry. Hands it back if one is
/// already installed.
pub fn install(registry: ChainRegistry) -> Result<(), ChainRegistry> {
    REGISTRY.set(registry)
}

/// The process-wide registry, built with default options on first use.
pub fn registry() -> &'static ChainRegistry {
    REGISTRY.get_or_init(ChainRegistry::default)
}

pub fn select_params(name: &str) -> &'static ChainParams {
    registry().select(name)
}

/// Parameters of the selected network.
pub fn params() -> &'static ChainParams {
    REGISTRY
        .get()
        .unwrap_or_else(|| fatal("No network selected".to_string()))
        .current()
}

pub fn params_for(name: &str) -> Result<&'static ChainParams, ChainParamsError> {
    registry().get(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment::DeploymentPos;

    #[test]
    fn test_select_main_then_current() {
        let registry = ChainRegistry::default();
        let selected = registry.select("main");
        assert_eq!(selected.network_id(), "main");
        assert_eq!(registry.current().network_id(), "main");
        assert!(std::ptr::eq(selected, registry.current()));
        assert_eq!(registry.selected(), Some(Network::Main));
    }

    #[test]
    fn test_repeated_get_is_equal() {
        let registry = ChainRegistry::default();
        let first = registry.get("main").unwrap().clone();
        let second = registry.get("main").unwrap();
        assert_eq!(&first, second);
        assert_eq!(registry.selected(), None);
    }

    #[test]
    fn test_get_unknown_network() {
        let registry = ChainRegistry::default();
        let err = registry.get("bogus").unwrap_err();
        assert_eq!(err, ChainParamsError::UnknownChain("bogus".to_string()));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    #[should_panic(expected = "Unknown chain bogus.")]
    fn test_select_unknown_network_aborts() {
        ChainRegistry::default().select("bogus");
    }

    #[test]
    #[should_panic(expected = "No network selected")]
    fn test_current_before_select_aborts() {
        ChainRegistry::default().current();
    }

    #[test]
    #[should_panic(expected = "before devnet was selected")]
    fn test_get_devnet_before_select_aborts() {
        let _ = ChainRegistry::default().get("dev");
    }

    #[test]
    fn test_reselecting_same_network() {
        let registry = ChainRegistry::default();
        let first = registry.select("regtest") as *const ChainParams;
        let second = registry.select("regtest") as *const ChainParams;
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "already selected")]
    fn test_selecting_another_network_aborts() {
        let registry = ChainRegistry::default();
        registry.select("main");
        registry.select("test");
    }

    #[test]
    fn test_conflicting_devnet_selection_skips_mining() {
        let registry = ChainRegistry::default();
        registry.select("main");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            registry.select("dev");
        }));
        assert!(result.is_err());
        assert!(!registry.is_devnet_ready());
        assert_eq!(registry.selected(), Some(Network::Main));
    }

    const ABORT_CHILD_ENV: &str = "CHAINPARAMS_ABORT_CHILD";

    // Re-runs this test in a child process, which takes the real abort path.
    #[test]
    fn test_fatal_aborts_process() {
        if std::env::var_os(ABORT_CHILD_ENV).is_some() {
            abort_process("aborting from child");
        }

        let status = std::process::Command::new(std::env::current_exe().unwrap())
            .args(["registry::tests::test_fatal_aborts_process", "--exact", "--nocapture"])
            .env(ABORT_CHILD_ENV, "1")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .unwrap();
        assert!(!status.success());
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            assert_eq!(status.signal(), Some(6));
        }
    }

    #[test]
    fn test_devnet_built_on_select() {
        let registry = ChainRegistry::default();
        assert!(!registry.is_devnet_ready());
        let dev = registry.select("dev");
        assert!(registry.is_devnet_ready());
        assert_eq!(
            dev.consensus.hash_devnet_genesis_block.unwrap().to_string(),
            "4baebf66450936bb79085ab4ac78fc748b20dbba5921b33cdb0f7a16b161d728"
        );
        assert_eq!(registry.get("dev").unwrap(), dev);
    }

    #[test]
    fn test_devnet_name_from_options() {
        assert_eq!(RegistryOptions::default().devnet_name(), "devnet");
        assert_eq!(RegistryOptions::with_devnet_name("").devnet_name(), "devnet");
        assert_eq!(
            RegistryOptions::with_devnet_name("foo").devnet_name(),
            "devnet-foo"
        );

        let registry = ChainRegistry::new(RegistryOptions::with_devnet_name("foo"));
        let dev = registry.select("dev");
        assert_eq!(
            dev.consensus.hash_devnet_genesis_block.unwrap().to_string(),
            "5e38341732fda9bb4a91f5c25c475af54259c749e3cc6a04a6871e653d90f1be"
        );
    }

    #[test]
    fn test_concurrent_devnet_selection() {
        let registry = &ChainRegistry::default();
        let addresses: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(move || registry.select("dev") as *const ChainParams as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(registry.current().network, Network::Devnet);
    }

    #[test]
    fn test_regtest_override_is_isolated() {
        let mut registry = ChainRegistry::default();
        registry.select("dev");
        let before: Vec<ChainParams> = ["main", "test", "dev"]
            .iter()
            .map(|name| registry.get(name).unwrap().clone())
            .collect();

        registry
            .override_deployment(Network::Regtest, 1, 0, 500)
            .unwrap();

        let regtest = registry.get("regtest").unwrap();
        let deployment = regtest.consensus.deployment_for_bit(1).unwrap();
        assert_eq!(deployment.pos, DeploymentPos::Dip0001);
        assert_eq!((deployment.start_time, deployment.timeout), (0, 500));
        for (name, params) in ["main", "test", "dev"].iter().zip(&before) {
            assert_eq!(registry.get(name).unwrap(), params);
        }
    }

    #[test]
    fn test_override_rejected_outside_regtest() {
        let mut registry = ChainRegistry::default();
        assert_eq!(
            registry.override_deployment(Network::Main, 1, 0, 500),
            Err(ChainParamsError::OverrideNotPermitted(Network::Main))
        );
        assert_eq!(
            registry.override_deployment(Network::Regtest, 5, 0, 500),
            Err(ChainParamsError::UnknownDeployment {
                network: Network::Regtest,
                bit: 5
            })
        );

        let before = registry.get("regtest").unwrap().clone();
        assert!(registry
            .override_deployment(Network::Regtest, 0, 500, 100)
            .is_err());
        assert_eq!(registry.get("regtest").unwrap(), &before);
    }

    #[test]
    fn test_apply_parsed_override() {
        let mut registry = ChainRegistry::default();
        let update: DeploymentOverride = "csv:100:200".parse().unwrap();
        registry.apply_override(&update).unwrap();
        let csv = registry
            .get("regtest")
            .unwrap()
            .consensus
            .deployment(DeploymentPos::Csv)
            .unwrap();
        assert_eq!((csv.start_time, csv.timeout), (100, 200));
    }

    // The only test touching the process-wide registry.
    #[test]
    fn test_global_registry() {
        let mut registry = ChainRegistry::default();
        registry
            .override_deployment(Network::Regtest, 2, 0, 1000)
            .unwrap();
        assert!(install(registry).is_ok());
        assert!(install(ChainRegistry::default()).is_err());

        let selected = select_params("regtest");
        assert!(std::ptr::eq(selected, params()));
        assert_eq!(params().network, Network::Regtest);
        assert_eq!(
            params().consensus.deployment_for_bit(2).unwrap().timeout,
            1000
        );
        assert_eq!(params_for("main").unwrap().network, Network::Main);
        assert!(params_for("bogus").is_err());
    }
}
