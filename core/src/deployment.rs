// Soft-fork deployment descriptors
// ================================
//
// Each deployment is signalled on one version bit and carries the window in which
// it may be voted in. The activation state machine that consumes these descriptors
// lives outside this crate; here they are plain configuration.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ChainParamsError;

/// Start time sentinel: the deployment is active from genesis.
pub const ALWAYS_ACTIVE: i64 = -1;

/// Start time sentinel: the deployment can never activate.
pub const NEVER_ACTIVE: i64 = -2;

/// Timeout sentinel: the deployment never times out.
pub const NO_TIMEOUT: i64 = i64::MAX;

/// Highest version bit a deployment may signal on.
pub const MAX_VERSION_BIT: u8 = 28;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentPos {
    TestDummy,
    /// BIP68, BIP112 and BIP113
    Csv,
    Dip0001,
    Bip147,
}

impl DeploymentPos {
    pub const ALL: [DeploymentPos; 4] = [
        DeploymentPos::TestDummy,
        DeploymentPos::Csv,
        DeploymentPos::Dip0001,
        DeploymentPos::Bip147,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DeploymentPos::TestDummy => "testdummy",
            DeploymentPos::Csv => "csv",
            DeploymentPos::Dip0001 => "dip0001",
            DeploymentPos::Bip147 => "bip147",
        }
    }

    /// Version bit the deployment signals on across all networks.
    pub fn default_bit(&self) -> u8 {
        match self {
            DeploymentPos::TestDummy => 28,
            DeploymentPos::Csv => 0,
            DeploymentPos::Dip0001 => 1,
            DeploymentPos::Bip147 => 2,
        }
    }
}

impl fmt::Display for DeploymentPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeploymentPos {
    type Err = ChainParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeploymentPos::ALL
            .into_iter()
            .find(|pos| pos.name() == s)
            .ok_or_else(|| ChainParamsError::InvalidOverride(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Deployment {
    pub pos: DeploymentPos,
    /// Version bit used to signal support, 0 through 28.
    pub bit: u8,
    /// Median time past from which signalling counts, or one of the start sentinels.
    pub start_time: i64,
    /// Median time past after which the deployment fails if not locked in.
    pub timeout: i64,
    /// Number of blocks in one voting window.
    pub window_size: u32,
    /// Signalling blocks within a window required to lock in.
    pub threshold: u32,
}

impl Deployment {
    pub fn new(
        pos: DeploymentPos,
        bit: u8,
        start_time: i64,
        timeout: i64,
        window_size: u32,
        threshold: u32,
    ) -> Self {
        Self {
            pos,
            bit,
            start_time,
            timeout,
            window_size,
            threshold,
        }
    }

    fn has_finite_start(&self) -> bool {
        self.start_time != ALWAYS_ACTIVE && self.start_time != NEVER_ACTIVE
    }

    pub fn validate(&self) -> Result<(), ChainParamsError> {
        let invalid = |reason: String| ChainParamsError::InvalidDeployment {
            pos: self.pos,
            reason,
        };

        if self.bit > MAX_VERSION_BIT {
            return Err(invalid(format!(
                "bit {} is above {}",
                self.bit, MAX_VERSION_BIT
            )));
        }
        if self.has_finite_start() && self.start_time < 0 {
            return Err(invalid(format!("start time {} is negative", self.start_time)));
        }
        if self.has_finite_start() && self.timeout != NO_TIMEOUT && self.start_time >= self.timeout
        {
            return Err(invalid(format!(
                "start time {} is not before timeout {}",
                self.start_time, self.timeout
            )));
        }
        if self.window_size == 0 {
            return Err(invalid("window size is zero".to_string()));
        }
        if self.threshold > self.window_size {
            return Err(invalid(format!(
                "threshold {} exceeds window size {}",
                self.threshold, self.window_size
            )));
        }
        Ok(())
    }
}

/// Checks every descriptor and that no version bit is claimed twice.
pub fn validate_deployments(deployments: &[Deployment]) -> Result<(), ChainParamsError> {
    for (i, deployment) in deployments.iter().enumerate() {
        deployment.validate()?;
        if let Some(other) = deployments[..i].iter().find(|d| d.bit == deployment.bit) {
            return Err(ChainParamsError::DuplicateDeploymentBit {
                bit: deployment.bit,
                first: other.pos,
                second: deployment.pos,
            });
        }
    }
    Ok(())
}

/// A regtest override of one deployment's start time and timeout.
///
/// The text form is `deployment:start:timeout`, where the deployment is either its
/// name (`csv`, `dip0001`, ...) or its version bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeploymentOverride {
    pub bit: u8,
    pub start_time: i64,
    pub timeout: i64,
}

impl DeploymentOverride {
    fn bit_for(name: &str) -> Option<u8> {
        match name.parse::<u8>() {
            Ok(bit) => Some(bit),
            Err(_) => name.parse::<DeploymentPos>().ok().map(|pos| pos.default_bit()),
        }
    }
}

impl FromStr for DeploymentOverride {
    type Err = ChainParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChainParamsError::InvalidOverride(s.to_string());
        let mut parts = s.split(':');
        let (Some(name), Some(start), Some(timeout), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self {
            bit: Self::bit_for(name).ok_or_else(invalid)?,
            start_time: start.parse().map_err(|_| invalid())?,
            timeout: timeout.parse().map_err(|_| invalid())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(start_time: i64, timeout: i64) -> Deployment {
        Deployment::new(DeploymentPos::Csv, 0, start_time, timeout, 2016, 1916)
    }

    #[test]
    fn test_valid_deployment() {
        assert!(csv(1486252800, 1517788800).validate().is_ok());
        assert!(csv(ALWAYS_ACTIVE, NO_TIMEOUT).validate().is_ok());
        assert!(csv(NEVER_ACTIVE, 0).validate().is_ok());
        assert!(csv(0, NO_TIMEOUT).validate().is_ok());
    }

    #[test]
    fn test_start_must_precede_timeout() {
        let err = csv(500, 500).validate().unwrap_err();
        assert!(matches!(
            err,
            ChainParamsError::InvalidDeployment {
                pos: DeploymentPos::Csv,
                ..
            }
        ));
        assert!(csv(600, 500).validate().is_err());
    }

    #[test]
    fn test_bit_and_threshold_bounds() {
        let mut deployment = csv(0, 10);
        deployment.bit = 29;
        assert!(deployment.validate().is_err());

        let mut deployment = csv(0, 10);
        deployment.threshold = 2017;
        assert!(deployment.validate().is_err());

        let mut deployment = csv(0, 10);
        deployment.window_size = 0;
        deployment.threshold = 0;
        assert!(deployment.validate().is_err());
    }

    #[test]
    fn test_duplicate_bit_rejected() {
        let deployments = vec![
            csv(0, 10),
            Deployment::new(DeploymentPos::Dip0001, 0, 0, 10, 100, 50),
        ];
        assert_eq!(
            validate_deployments(&deployments),
            Err(ChainParamsError::DuplicateDeploymentBit {
                bit: 0,
                first: DeploymentPos::Csv,
                second: DeploymentPos::Dip0001,
            })
        );
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            "dip0001:0:500".parse::<DeploymentOverride>().unwrap(),
            DeploymentOverride {
                bit: 1,
                start_time: 0,
                timeout: 500
            }
        );
        assert_eq!(
            "28:-1:9223372036854775807"
                .parse::<DeploymentOverride>()
                .unwrap(),
            DeploymentOverride {
                bit: 28,
                start_time: ALWAYS_ACTIVE,
                timeout: NO_TIMEOUT
            }
        );
        assert!("segwit:0:1".parse::<DeploymentOverride>().is_err());
        assert!("csv:0".parse::<DeploymentOverride>().is_err());
        assert!("csv:0:1:2".parse::<DeploymentOverride>().is_err());
        assert!("csv:zero:1".parse::<DeploymentOverride>().is_err());
    }
}
