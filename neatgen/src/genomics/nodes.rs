use super::{steady_float, steady_token, GenomeConfig};
use crate::attributes::{AttributeConfig, AttributeSpec, FloatAttribute, StringAttribute};
use crate::config::{ConfigBundle, ConfigParameter, ConfigValues};
use crate::errors::{AttributeError, ConfigError};
use crate::{rng, NodeKey};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

pub const BIAS: FloatAttribute = FloatAttribute::new("bias");
pub const RESPONSE: FloatAttribute = FloatAttribute::new("response");
pub const ACTIVATION: StringAttribute =
    StringAttribute::with_defaults("activation", &[("options", "sigmoid")]);
pub const AGGREGATION: StringAttribute =
    StringAttribute::with_defaults("aggregation", &[("options", "sum")]);

/// Attribute configurations for node genes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeGeneConfig {
    pub bias: AttributeConfig,
    pub response: AttributeConfig,
    pub activation: AttributeConfig,
    pub aggregation: AttributeConfig,
}

impl NodeGeneConfig {
    /// Returns a configuration under which nodes never change:
    /// biases and responses are always 0, activations always
    /// `sigmoid` and aggregations always `sum`.
    pub fn zero() -> NodeGeneConfig {
        NodeGeneConfig {
            bias: steady_float(),
            response: steady_float(),
            activation: steady_token("sigmoid"),
            aggregation: steady_token("sum"),
        }
    }

    /// The declarations of every node attribute item.
    pub fn config_params() -> Result<Vec<ConfigParameter>, ConfigError> {
        let mut params = BIAS.config_params()?;
        params.extend(RESPONSE.config_params()?);
        params.extend(ACTIVATION.config_params()?);
        params.extend(AGGREGATION.config_params()?);
        Ok(params)
    }

    pub(super) fn from_values(values: &ConfigValues) -> NodeGeneConfig {
        NodeGeneConfig {
            bias: BIAS.extract_config(values),
            response: RESPONSE.extract_config(values),
            activation: ACTIVATION.extract_config(values),
            aggregation: AGGREGATION.extract_config(values),
        }
    }

    pub(super) fn write_config(&self, bundle: &mut ConfigBundle) {
        BIAS.write_config(&self.bias, bundle);
        RESPONSE.write_config(&self.response, bundle);
        ACTIVATION.write_config(&self.activation, bundle);
        AGGREGATION.write_config(&self.aggregation, bundle);
    }

    pub fn validate(&self) -> Result<(), AttributeError> {
        BIAS.validate(&self.bias)?;
        RESPONSE.validate(&self.response)?;
        ACTIVATION.validate(&self.activation)?;
        AGGREGATION.validate(&self.aggregation)
    }
}

/// A node gene: the bias, response, activation and
/// aggregation of one hidden or output node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeGene {
    key: NodeKey,
    pub bias: f64,
    pub response: f64,
    pub activation: String,
    pub aggregation: String,
}

impl NodeGene {
    /// Returns a node gene with freshly initialized attributes.
    ///
    /// # Errors
    /// Returns an error if an attribute cannot be initialized
    /// under `config`.
    pub fn new<R: Rng + ?Sized>(
        key: NodeKey,
        config: &NodeGeneConfig,
        rng: &mut R,
    ) -> Result<NodeGene, AttributeError> {
        let mut node = NodeGene::with_attributes(key, 0.0, 0.0, "", "");
        node.init_attributes(config, rng)?;
        Ok(node)
    }

    /// Returns a node gene with the given attributes.
    ///
    /// # Examples
    /// ```
    /// use neatgen::genomics::NodeGene;
    ///
    /// let node = NodeGene::with_attributes(3, 0.5, 1.0, "tanh", "sum");
    /// assert_eq!(node.key(), 3);
    /// assert_eq!(node.activation, "tanh");
    /// ```
    pub fn with_attributes(
        key: NodeKey,
        bias: f64,
        response: f64,
        activation: impl Into<String>,
        aggregation: impl Into<String>,
    ) -> NodeGene {
        NodeGene {
            key,
            bias,
            response,
            activation: activation.into(),
            aggregation: aggregation.into(),
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// Draws every attribute from its initial distribution.
    pub fn init_attributes<R: Rng + ?Sized>(
        &mut self,
        config: &NodeGeneConfig,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        self.bias = BIAS.init(&config.bias, rng)?;
        self.response = RESPONSE.init(&config.response, rng)?;
        self.activation = ACTIVATION.init(&config.activation, rng)?;
        self.aggregation = AGGREGATION.init(&config.aggregation, rng)?;
        Ok(())
    }

    /// Mutates every attribute in place.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        config: &NodeGeneConfig,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        self.bias = BIAS.mutate(&self.bias, &config.bias, rng)?;
        self.response = RESPONSE.mutate(&self.response, &config.response, rng)?;
        self.activation = ACTIVATION.mutate(&self.activation, &config.activation, rng)?;
        self.aggregation = AGGREGATION.mutate(&self.aggregation, &config.aggregation, rng)?;
        Ok(())
    }

    /// Attribute divergence between two versions of a node,
    /// scaled by the compatibility weight coefficient.
    pub fn distance(&self, other: &NodeGene, config: &GenomeConfig) -> f64 {
        let mut d = (self.bias - other.bias).abs() + (self.response - other.response).abs();
        if self.activation != other.activation {
            d += 1.0;
        }
        if self.aggregation != other.aggregation {
            d += 1.0;
        }
        d * config.params().compatibility_weight_coefficient
    }

    /// Returns a node whose every attribute is
    /// inherited from either parent at random.
    ///
    /// # Panics
    /// This function panics if the genes' keys differ.
    pub fn crossover<R: Rng + ?Sized>(&self, other: &NodeGene, rng: &mut R) -> NodeGene {
        assert_eq!(self.key, other.key, "attempted crossover of distinct node genes");
        let pick = |r: &mut R| if rng::coin(r) { self } else { other };
        NodeGene {
            key: self.key,
            bias: pick(rng).bias,
            response: pick(rng).response,
            activation: pick(rng).activation.clone(),
            aggregation: pick(rng).aggregation.clone(),
        }
    }
}

impl fmt::Display for NodeGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[bias {:.3}, response {:.3}, {}, {}]",
            self.key, self.bias, self.response, self.activation, self.aggregation
        )
    }
}
