use super::{steady_float, steady_token, GenomeConfig};
use crate::attributes::{AttributeConfig, AttributeSpec, BoolAttribute, FloatAttribute};
use crate::config::{ConfigBundle, ConfigParameter, ConfigValues};
use crate::errors::{AttributeError, ConfigError};
use crate::{rng, ConnectionKey, NodeKey};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

pub const WEIGHT: FloatAttribute = FloatAttribute::new("weight");
pub const ENABLED: BoolAttribute = BoolAttribute::new("enabled");

/// Attribute configurations for connection genes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGeneConfig {
    pub weight: AttributeConfig,
    pub enabled: AttributeConfig,
}

impl ConnectionGeneConfig {
    /// Returns a configuration under which connections never
    /// change: weights are always 0 and connections always enabled.
    pub fn zero() -> ConnectionGeneConfig {
        ConnectionGeneConfig {
            weight: steady_float(),
            enabled: steady_token("true"),
        }
    }

    /// The declarations of every connection attribute item.
    pub fn config_params() -> Result<Vec<ConfigParameter>, ConfigError> {
        let mut params = WEIGHT.config_params()?;
        params.extend(ENABLED.config_params()?);
        Ok(params)
    }

    pub(super) fn from_values(values: &ConfigValues) -> ConnectionGeneConfig {
        ConnectionGeneConfig {
            weight: WEIGHT.extract_config(values),
            enabled: ENABLED.extract_config(values),
        }
    }

    pub(super) fn write_config(&self, bundle: &mut ConfigBundle) {
        WEIGHT.write_config(&self.weight, bundle);
        ENABLED.write_config(&self.enabled, bundle);
    }

    pub fn validate(&self) -> Result<(), AttributeError> {
        WEIGHT.validate(&self.weight)?;
        ENABLED.validate(&self.enabled)
    }
}

/// A connection gene, keyed by the ordered
/// pair of nodes it connects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGene {
    key: ConnectionKey,
    pub weight: f64,
    pub enabled: bool,
}

impl ConnectionGene {
    /// Returns a connection gene with freshly initialized attributes.
    ///
    /// # Errors
    /// Returns an error if an attribute cannot be initialized
    /// under `config`.
    pub fn new<R: Rng + ?Sized>(
        key: ConnectionKey,
        config: &ConnectionGeneConfig,
        rng: &mut R,
    ) -> Result<ConnectionGene, AttributeError> {
        let mut connection = ConnectionGene::with_attributes(key, 0.0, false);
        connection.init_attributes(config, rng)?;
        Ok(connection)
    }

    /// Returns a connection gene with the given attributes.
    ///
    /// # Examples
    /// ```
    /// use neatgen::genomics::ConnectionGene;
    ///
    /// let connection = ConnectionGene::with_attributes((-1, 0), 0.5, true);
    /// assert_eq!(connection.input(), -1);
    /// assert_eq!(connection.output(), 0);
    /// assert_eq!(connection.to_string(), "[-1->0, 0.500]");
    /// ```
    pub fn with_attributes(key: ConnectionKey, weight: f64, enabled: bool) -> ConnectionGene {
        ConnectionGene {
            key,
            weight,
            enabled,
        }
    }

    pub fn key(&self) -> ConnectionKey {
        self.key
    }

    /// Returns the key of the node the connection leaves.
    pub fn input(&self) -> NodeKey {
        self.key.0
    }

    /// Returns the key of the node the connection enters.
    pub fn output(&self) -> NodeKey {
        self.key.1
    }

    /// Draws every attribute from its initial distribution.
    pub fn init_attributes<R: Rng + ?Sized>(
        &mut self,
        config: &ConnectionGeneConfig,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        self.weight = WEIGHT.init(&config.weight, rng)?;
        self.enabled = ENABLED.init(&config.enabled, rng)?;
        Ok(())
    }

    /// Mutates every attribute in place.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        config: &ConnectionGeneConfig,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        self.weight = WEIGHT.mutate(&self.weight, &config.weight, rng)?;
        self.enabled = ENABLED.mutate(&self.enabled, &config.enabled, rng)?;
        Ok(())
    }

    /// Weight difference plus one if exactly one side is enabled,
    /// scaled by the compatibility weight coefficient.
    pub fn distance(&self, other: &ConnectionGene, config: &GenomeConfig) -> f64 {
        let mut d = (self.weight - other.weight).abs();
        if self.enabled != other.enabled {
            d += 1.0;
        }
        d * config.params().compatibility_weight_coefficient
    }

    /// Returns a connection with either parent's weight,
    /// enabled only if both parents are.
    ///
    /// # Panics
    /// This function panics if the genes' keys differ.
    pub fn crossover<R: Rng + ?Sized>(&self, other: &ConnectionGene, rng: &mut R) -> ConnectionGene {
        assert_eq!(self.key, other.key, "attempted crossover of distinct connection genes");
        ConnectionGene {
            key: self.key,
            weight: if rng::coin(rng) { self.weight } else { other.weight },
            enabled: self.enabled && other.enabled,
        }
    }
}

/// Disabled connections are shown in parentheses.
impl fmt::Display for ConnectionGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}->{}, {:.3}]{}",
            if self.enabled { "" } else { "(" },
            self.key.0,
            self.key.1,
            self.weight,
            if self.enabled { "" } else { ")" },
        )
    }
}
