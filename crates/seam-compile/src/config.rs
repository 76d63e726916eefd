//! Compiler configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `SEAM_` prefix)
//!
//! Precedence (highest to lowest): environment, file, defaults.
//!
//! ```yaml
//! device:
//!   topology: grid
//!   num_qubits: 6
//!   rows: 2
//!   cols: 3
//! routing:
//!   max_swaps: 32
//! ```
//!
//! Without a `device` section the configuration builds a [`VirtualCompiler`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compiler::DeviceCompiler;
use crate::compilers::{RoutingCompiler, RoutingOptions, VirtualCompiler};
use crate::coupling::CouplingMap;
use crate::error::CompileResult;

/// Complete compiler configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Target device; absent for device-free compilation.
    #[serde(default)]
    pub device: Option<DeviceConfig>,

    /// Routing settings, ignored without a device.
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Connectivity families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Linear,
    Ring,
    Star,
    Full,
    Grid,
    Custom,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topology::Linear => "linear",
            Topology::Ring => "ring",
            Topology::Star => "star",
            Topology::Full => "full",
            Topology::Grid => "grid",
            Topology::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl FromStr for Topology {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Topology::Linear),
            "ring" => Ok(Topology::Ring),
            "star" => Ok(Topology::Star),
            "full" => Ok(Topology::Full),
            "grid" => Ok(Topology::Grid),
            "custom" => Ok(Topology::Custom),
            other => Err(ConfigError::Invalid(format!("Unknown topology: {other}"))),
        }
    }
}

/// Target device description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Connectivity family.
    #[serde(default = "default_topology")]
    pub topology: Topology,

    /// Number of physical qubits.
    #[serde(default = "default_num_qubits")]
    pub num_qubits: u32,

    /// Grid rows (grid only).
    #[serde(default)]
    pub rows: u32,

    /// Grid columns (grid only).
    #[serde(default)]
    pub cols: u32,

    /// Coupled pairs (custom only).
    #[serde(default)]
    pub edges: Vec<(u32, u32)>,
}

/// Routing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Swap budget per compile, unlimited when absent.
    #[serde(default)]
    pub max_swaps: Option<usize>,

    /// Store identity routings as absent.
    #[serde(default = "default_true")]
    pub elide_identity_route: bool,
}

fn default_topology() -> Topology {
    Topology::Linear
}

fn default_num_qubits() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            topology: default_topology(),
            num_qubits: default_num_qubits(),
            rows: 0,
            cols: 0,
            edges: vec![],
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig {
            max_swaps: None,
            elide_identity_route: default_true(),
        }
    }
}

impl From<&RoutingConfig> for RoutingOptions {
    fn from(config: &RoutingConfig) -> Self {
        RoutingOptions {
            max_swaps: config.max_swaps,
            elide_identity_route: config.elide_identity_route,
        }
    }
}

impl DeviceConfig {
    /// The coupling map this device describes.
    pub fn coupling_map(&self) -> CompileResult<CouplingMap> {
        Ok(match self.topology {
            Topology::Linear => CouplingMap::linear(self.num_qubits),
            Topology::Ring => CouplingMap::ring(self.num_qubits),
            Topology::Star => CouplingMap::star(self.num_qubits),
            Topology::Full => CouplingMap::full(self.num_qubits),
            Topology::Grid => CouplingMap::grid(self.rows, self.cols)?,
            Topology::Custom => CouplingMap::from_edges(self.num_qubits, &self.edges)?,
        })
    }
}

impl CompilerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default().merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SEAM_*` variables from the process environment.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`.
    ///
    /// Setting `SEAM_TOPOLOGY` or `SEAM_NUM_QUBITS` creates a device section
    /// if there is none.
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("SEAM_TOPOLOGY") {
            self.device.get_or_insert_with(DeviceConfig::default).topology = v.parse()?;
        }
        if let Some(v) = lookup("SEAM_NUM_QUBITS") {
            let n = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("SEAM_NUM_QUBITS is not a number: {v}")))?;
            self.device.get_or_insert_with(DeviceConfig::default).num_qubits = n;
        }
        if let Some(v) = lookup("SEAM_MAX_SWAPS") {
            let n = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("SEAM_MAX_SWAPS is not a number: {v}")))?;
            self.routing.max_swaps = Some(n);
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(device) = &self.device else {
            return Ok(());
        };

        match device.topology {
            Topology::Grid => {
                if device.rows == 0 || device.cols == 0 {
                    return Err(ConfigError::Invalid(
                        "grid topology needs non-zero rows and cols".to_string(),
                    ));
                }
                if device.rows.checked_mul(device.cols) != Some(device.num_qubits) {
                    return Err(ConfigError::Invalid(format!(
                        "grid {}x{} does not have {} qubits",
                        device.rows, device.cols, device.num_qubits
                    )));
                }
            }
            Topology::Custom => {
                if let Some(&(a, b)) = device
                    .edges
                    .iter()
                    .find(|&&(a, b)| a == b || a >= device.num_qubits || b >= device.num_qubits)
                {
                    return Err(ConfigError::Invalid(format!(
                        "edge ({a}, {b}) is not valid on {} qubits",
                        device.num_qubits
                    )));
                }
            }
            _ => {
                if !device.edges.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "edges are only allowed with the custom topology, not {}",
                        device.topology
                    )));
                }
            }
        }

        if device.num_qubits == 0 {
            return Err(ConfigError::Invalid(
                "num_qubits must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Instantiate the configured compiler.
    pub fn build(&self) -> CompileResult<Box<dyn DeviceCompiler>> {
        match &self.device {
            None => Ok(Box::new(VirtualCompiler)),
            Some(device) => Ok(Box::new(RoutingCompiler::with_options(
                device.coupling_map()?,
                RoutingOptions::from(&self.routing),
            ))),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error("Validation error: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: FxHashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert!(config.device.is_none());
        assert_eq!(config.routing.max_swaps, None);
        assert!(config.routing.elide_identity_route);
        assert!(config.validate().is_ok());
        assert_eq!(config.build().unwrap().name(), "virtual");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
device:
  topology: grid
  num_qubits: 6
  rows: 2
  cols: 3
routing:
  max_swaps: 32
"#;
        let config = CompilerConfig::from_yaml_str(yaml).unwrap();
        let device = config.device.as_ref().unwrap();
        assert_eq!(device.topology, Topology::Grid);
        assert_eq!(config.routing.max_swaps, Some(32));
        assert!(config.routing.elide_identity_route);
        assert_eq!(device.coupling_map().unwrap().edges().len(), 7);
        assert_eq!(config.build().unwrap().name(), "routing");
    }

    #[test]
    fn test_device_defaults() {
        let config = CompilerConfig::from_yaml_str("device: {}\n").unwrap();
        let device = config.device.unwrap();
        assert_eq!(device.topology, Topology::Linear);
        assert_eq!(device.num_qubits, 5);
    }

    #[test]
    fn test_custom_edges() {
        let yaml = r#"
device:
  topology: custom
  num_qubits: 3
  edges: [[0, 1], [1, 2]]
"#;
        let config = CompilerConfig::from_yaml_str(yaml).unwrap();
        let map = config.device.unwrap().coupling_map().unwrap();
        assert!(map.is_connected(1, 2));
        assert!(!map.is_connected(0, 2));
    }

    #[test]
    fn test_validation_failures() {
        let bad_grid = "device:\n  topology: grid\n  num_qubits: 5\n  rows: 2\n  cols: 3\n";
        assert!(matches!(
            CompilerConfig::from_yaml_str(bad_grid),
            Err(ConfigError::Invalid(_))
        ));

        let overflowing_grid =
            "device:\n  topology: grid\n  num_qubits: 65536\n  rows: 65536\n  cols: 65537\n";
        assert!(matches!(
            CompilerConfig::from_yaml_str(overflowing_grid),
            Err(ConfigError::Invalid(_))
        ));

        let bad_edge = "device:\n  topology: custom\n  num_qubits: 2\n  edges: [[0, 2]]\n";
        assert!(matches!(
            CompilerConfig::from_yaml_str(bad_edge),
            Err(ConfigError::Invalid(_))
        ));

        let stray_edges = "device:\n  topology: ring\n  edges: [[0, 1]]\n";
        assert!(CompilerConfig::from_yaml_str(stray_edges).is_err());

        let empty = "device:\n  num_qubits: 0\n";
        assert!(CompilerConfig::from_yaml_str(empty).is_err());

        assert!(matches!(
            CompilerConfig::from_yaml_str("device:\n  topology: torus\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = CompilerConfig::default()
            .merge_vars(vars(&[
                ("SEAM_TOPOLOGY", "Ring"),
                ("SEAM_NUM_QUBITS", "8"),
                ("SEAM_MAX_SWAPS", "4"),
            ]))
            .unwrap();
        let device = config.device.as_ref().unwrap();
        assert_eq!(device.topology, Topology::Ring);
        assert_eq!(device.num_qubits, 8);
        assert_eq!(config.routing.max_swaps, Some(4));
        assert!(config.validate().is_ok());

        let untouched = CompilerConfig::default().merge_vars(vars(&[])).unwrap();
        assert_eq!(untouched, CompilerConfig::default());

        assert!(matches!(
            CompilerConfig::default().merge_vars(vars(&[("SEAM_NUM_QUBITS", "many")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(CompilerConfig::default()
            .merge_vars(vars(&[("SEAM_TOPOLOGY", "hypercube")]))
            .is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CompilerConfig::from_file("/nonexistent/seam.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
