use super::{ConnectionGeneConfig, NodeGene, NodeGeneConfig};
use crate::config::{interpret_all, ConfigBundle, ConfigParameter, ConfigValue, ConfigValues, ValueType};
use crate::diagnostics::Diagnostics;
use crate::errors::{Error, GenomeConfigError};
use crate::NodeKey;

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The connectivity of freshly configured genomes.
///
/// The bare `fs_neat`, `full` and `partial` descriptors
/// parse to the variants that ignore hidden nodes
/// ([`FsNeatNoHidden`], [`FullNoDirect`], [`PartialNoDirect`]).
///
/// [`FsNeatNoHidden`]: InitialConnection::FsNeatNoHidden
/// [`FullNoDirect`]: InitialConnection::FullNoDirect
/// [`PartialNoDirect`]: InitialConnection::PartialNoDirect
///
/// # Examples
/// ```
/// use neatgen::genomics::InitialConnection;
///
/// assert_eq!("full".parse(), Ok(InitialConnection::FullNoDirect));
/// assert_eq!("partial_direct 0.5".parse(), Ok(InitialConnection::PartialDirect(0.5)));
/// assert!("partial_direct".parse::<InitialConnection>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InitialConnection {
    /// No connections.
    Unconnected,
    /// One randomly chosen input connected to every output.
    FsNeatNoHidden,
    /// One randomly chosen input connected to every hidden and output node.
    FsNeatHidden,
    /// Inputs to hidden nodes, hidden nodes to outputs. Inputs
    /// connect to outputs directly only if there are no hidden nodes.
    FullNoDirect,
    /// As [`FullNoDirect`](InitialConnection::FullNoDirect),
    /// plus inputs to outputs always.
    FullDirect,
    /// A random fraction of the [`FullNoDirect`](InitialConnection::FullNoDirect) connections.
    PartialNoDirect(f64),
    /// A random fraction of the [`FullDirect`](InitialConnection::FullDirect) connections.
    PartialDirect(f64),
}

impl InitialConnection {
    /// Returns the warning due for `descriptor` given
    /// the hidden node count, if it is ambiguous.
    fn ambiguity(descriptor: &str, num_hidden: usize) -> Option<String> {
        if num_hidden == 0 {
            return None;
        }
        let mut tokens = descriptor.split_whitespace();
        match (tokens.next()?, tokens.next()) {
            ("fs_neat", _) => Some(
                "initial_connection = fs_neat will not connect to hidden nodes; \
                 if this is desired, set initial_connection = fs_neat_nohidden; \
                 if not, set initial_connection = fs_neat_hidden"
                    .to_string(),
            ),
            ("full", _) => Some(
                "initial_connection = full with hidden nodes will not do direct input-output connections; \
                 if this is desired, set initial_connection = full_nodirect; \
                 if not, set initial_connection = full_direct"
                    .to_string(),
            ),
            ("partial", fraction) => {
                let fraction = fraction.unwrap_or_default();
                Some(format!(
                    "initial_connection = partial {0} with hidden nodes will not do direct input-output connections; \
                     if this is desired, set initial_connection = partial_nodirect {0}; \
                     if not, set initial_connection = partial_direct {0}",
                    fraction
                ))
            }
            _ => None,
        }
    }
}

impl FromStr for InitialConnection {
    type Err = GenomeConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let argument = tokens.next();
        if tokens.next().is_some() {
            return Err(GenomeConfigError::UnknownInitialConnection(s.to_owned()));
        }

        if name.contains("partial") {
            let fraction: f64 = argument
                .and_then(|a| a.parse().ok())
                .ok_or_else(|| GenomeConfigError::MissingConnectionFraction(s.to_owned()))?;
            if !(0.0..=1.0).contains(&fraction) {
                return Err(GenomeConfigError::ConnectionFractionRange(fraction));
            }
            return match name {
                "partial" | "partial_nodirect" => Ok(Self::PartialNoDirect(fraction)),
                "partial_direct" => Ok(Self::PartialDirect(fraction)),
                _ => Err(GenomeConfigError::UnknownInitialConnection(s.to_owned())),
            };
        }

        match (name, argument) {
            ("unconnected", None) => Ok(Self::Unconnected),
            ("fs_neat" | "fs_neat_nohidden", None) => Ok(Self::FsNeatNoHidden),
            ("fs_neat_hidden", None) => Ok(Self::FsNeatHidden),
            ("full" | "full_nodirect", None) => Ok(Self::FullNoDirect),
            ("full_direct", None) => Ok(Self::FullDirect),
            _ => Err(GenomeConfigError::UnknownInitialConnection(s.to_owned())),
        }
    }
}

impl fmt::Display for InitialConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconnected => f.write_str("unconnected"),
            Self::FsNeatNoHidden => f.write_str("fs_neat_nohidden"),
            Self::FsNeatHidden => f.write_str("fs_neat_hidden"),
            Self::FullNoDirect => f.write_str("full_nodirect"),
            Self::FullDirect => f.write_str("full_direct"),
            Self::PartialNoDirect(fraction) => write!(f, "partial_nodirect {}", fraction),
            Self::PartialDirect(fraction) => write!(f, "partial_direct {}", fraction),
        }
    }
}

/// Whether structural mutations try harder to have an effect:
/// adding a node to a genome without connections adds a
/// connection instead, and adding an existing connection
/// re-enables it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationSurer {
    Enabled,
    Disabled,
    /// Follow [`GenomeParams::single_structural_mutation`].
    Default,
}

impl FromStr for MutationSurer {
    type Err = GenomeConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(Self::Enabled),
            "0" | "no" | "false" | "off" => Ok(Self::Disabled),
            "default" => Ok(Self::Default),
            _ => Err(GenomeConfigError::InvalidSurer(s.to_owned())),
        }
    }
}

impl fmt::Display for MutationSurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enabled => "true",
            Self::Disabled => "false",
            Self::Default => "default",
        })
    }
}

/// Structural run parameters for genome generation
/// and inter-genome operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenomeParams {
    /// Number of inputs in a genome.
    pub num_inputs: usize,
    /// Number of outputs in a genome.
    pub num_outputs: usize,
    /// Number of hidden nodes in a freshly configured genome.
    pub num_hidden: usize,
    /// Whether connections that would form a cycle are rejected.
    /// Recurrent genomes also start with self-connections under
    /// the full and partial connectivity policies.
    pub feed_forward: bool,
    /// Weight of disjoint genes in compatibility distance.
    pub compatibility_disjoint_coefficient: f64,
    /// Weight of matched-gene attribute differences in compatibility distance.
    pub compatibility_weight_coefficient: f64,
    /// Chance of a connection addition mutation.
    pub conn_add_prob: f64,
    /// Chance of a connection deletion mutation.
    pub conn_delete_prob: f64,
    /// Chance of a node addition mutation.
    pub node_add_prob: f64,
    /// Chance of a node deletion mutation.
    pub node_delete_prob: f64,
    /// Limits each mutation round to at most one structural change.
    pub single_structural_mutation: bool,
    pub structural_mutation_surer: MutationSurer,
    pub initial_connection: InitialConnection,
}

impl GenomeParams {
    /// Returns a "zero-valued" parameter set.
    /// All values are 0, false, or unconnected, and
    /// the surer follows the single mutation flag.
    pub const fn zero() -> GenomeParams {
        GenomeParams {
            num_inputs: 0,
            num_outputs: 0,
            num_hidden: 0,
            feed_forward: false,
            compatibility_disjoint_coefficient: 0.0,
            compatibility_weight_coefficient: 0.0,
            conn_add_prob: 0.0,
            conn_delete_prob: 0.0,
            node_add_prob: 0.0,
            node_delete_prob: 0.0,
            single_structural_mutation: false,
            structural_mutation_surer: MutationSurer::Default,
            initial_connection: InitialConnection::Unconnected,
        }
    }

    /// The declarations of every structural item.
    pub fn config_params() -> Vec<ConfigParameter> {
        use ValueType::*;
        vec![
            ConfigParameter::new("num_inputs", Int),
            ConfigParameter::new("num_outputs", Int),
            ConfigParameter::new("num_hidden", Int),
            ConfigParameter::new("feed_forward", Bool),
            ConfigParameter::new("compatibility_disjoint_coefficient", Float),
            ConfigParameter::new("compatibility_weight_coefficient", Float),
            ConfigParameter::new("conn_add_prob", Float),
            ConfigParameter::new("conn_delete_prob", Float),
            ConfigParameter::new("node_add_prob", Float),
            ConfigParameter::new("node_delete_prob", Float),
            ConfigParameter::with_default("single_structural_mutation", Bool, ConfigValue::Bool(false)),
            ConfigParameter::with_default(
                "structural_mutation_surer",
                Str,
                ConfigValue::Str("default".to_string()),
            ),
            ConfigParameter::with_default(
                "initial_connection",
                Str,
                ConfigValue::Str("unconnected".to_string()),
            ),
        ]
    }

    fn from_values(values: &ConfigValues) -> Result<GenomeParams, Error> {
        Ok(GenomeParams {
            num_inputs: values.count("num_inputs")?,
            num_outputs: values.count("num_outputs")?,
            num_hidden: values.count("num_hidden")?,
            feed_forward: values.bool("feed_forward")?,
            compatibility_disjoint_coefficient: values.float("compatibility_disjoint_coefficient")?,
            compatibility_weight_coefficient: values.float("compatibility_weight_coefficient")?,
            conn_add_prob: values.float("conn_add_prob")?,
            conn_delete_prob: values.float("conn_delete_prob")?,
            node_add_prob: values.float("node_add_prob")?,
            node_delete_prob: values.float("node_delete_prob")?,
            single_structural_mutation: values.bool("single_structural_mutation")?,
            structural_mutation_surer: values.str("structural_mutation_surer")?.parse()?,
            initial_connection: values.str("initial_connection")?.parse()?,
        })
    }

    fn to_values(&self) -> Vec<(&'static str, ConfigValue)> {
        use ConfigValue::*;
        vec![
            ("num_inputs", Int(self.num_inputs as i64)),
            ("num_outputs", Int(self.num_outputs as i64)),
            ("num_hidden", Int(self.num_hidden as i64)),
            ("feed_forward", Bool(self.feed_forward)),
            ("compatibility_disjoint_coefficient", Float(self.compatibility_disjoint_coefficient)),
            ("compatibility_weight_coefficient", Float(self.compatibility_weight_coefficient)),
            ("conn_add_prob", Float(self.conn_add_prob)),
            ("conn_delete_prob", Float(self.conn_delete_prob)),
            ("node_add_prob", Float(self.node_add_prob)),
            ("node_delete_prob", Float(self.node_delete_prob)),
            ("single_structural_mutation", Bool(self.single_structural_mutation)),
            ("structural_mutation_surer", Str(self.structural_mutation_surer.to_string())),
            ("initial_connection", Str(self.initial_connection.to_string())),
        ]
    }
}

/// Validated genome configuration: structural parameters,
/// per-gene-kind attribute configurations, the input and
/// output key layout, and the node key allocator.
///
/// # Examples
/// ```
/// use neatgen::config::ConfigBundle;
/// use neatgen::genomics::GenomeConfig;
///
/// let bundle: ConfigBundle = [
///     ("num_inputs", "2"),
///     ("num_outputs", "1"),
///     ("num_hidden", "0"),
///     ("feed_forward", "True"),
///     ("compatibility_disjoint_coefficient", "1.0"),
///     ("compatibility_weight_coefficient", "0.5"),
///     ("conn_add_prob", "0.5"),
///     ("conn_delete_prob", "0.5"),
///     ("node_add_prob", "0.2"),
///     ("node_delete_prob", "0.2"),
///     ("bias_init_mean", "0.0"),
///     ("bias_init_stdev", "1.0"),
///     ("bias_replace_rate", "0.1"),
///     ("bias_mutate_rate", "0.7"),
///     ("bias_mutate_power", "0.5"),
///     ("bias_max_value", "30.0"),
///     ("bias_min_value", "-30.0"),
///     ("response_init_mean", "1.0"),
///     ("response_init_stdev", "0.0"),
///     ("response_replace_rate", "0.0"),
///     ("response_mutate_rate", "0.0"),
///     ("response_mutate_power", "0.0"),
///     ("response_max_value", "30.0"),
///     ("response_min_value", "-30.0"),
///     ("activation_default", "sigmoid"),
///     ("activation_mutate_rate", "0.0"),
///     ("aggregation_default", "sum"),
///     ("aggregation_mutate_rate", "0.0"),
///     ("weight_init_mean", "0.0"),
///     ("weight_init_stdev", "1.0"),
///     ("weight_replace_rate", "0.1"),
///     ("weight_mutate_rate", "0.8"),
///     ("weight_mutate_power", "0.5"),
///     ("weight_max_value", "30"),
///     ("weight_min_value", "-30"),
///     ("enabled_default", "True"),
///     ("enabled_mutate_rate", "0.01"),
/// ]
/// .into_iter()
/// .collect();
///
/// let mut warnings: Vec<String> = vec![];
/// let config = GenomeConfig::from_bundle(&bundle, &mut warnings).unwrap();
///
/// assert_eq!(config.input_keys(), &[-1, -2]);
/// assert_eq!(config.output_keys(), &[0]);
/// // Items left out fell back to their defaults.
/// assert!(!warnings.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenomeConfig {
    params: GenomeParams,
    node: NodeGeneConfig,
    connection: ConnectionGeneConfig,
    input_keys: Vec<NodeKey>,
    output_keys: Vec<NodeKey>,
    next_node_key: NodeKey,
}

impl GenomeConfig {
    /// Builds a configuration from typed parts.
    ///
    /// # Errors
    /// Returns an error if any attribute configuration is inconsistent.
    pub fn new(
        params: GenomeParams,
        node: NodeGeneConfig,
        connection: ConnectionGeneConfig,
    ) -> Result<GenomeConfig, Error> {
        node.validate()?;
        connection.validate()?;
        let input_keys = (1..=params.num_inputs as NodeKey).map(|k| -k).collect();
        let output_keys: Vec<NodeKey> = (0..params.num_outputs as NodeKey).collect();
        Ok(GenomeConfig {
            next_node_key: params.num_outputs as NodeKey,
            params,
            node,
            connection,
            input_keys,
            output_keys,
        })
    }

    /// Interprets every structural and attribute item in `bundle`.
    /// Ambiguous initial connectivity descriptors are reported
    /// to `diagnostics`, as are substituted defaults.
    ///
    /// # Errors
    /// Returns an error if an item is malformed, required but
    /// absent, or unknown, or if the result fails validation.
    pub fn from_bundle(
        bundle: &ConfigBundle,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<GenomeConfig, Error> {
        let mut params = GenomeParams::config_params();
        params.extend(NodeGeneConfig::config_params()?);
        params.extend(ConnectionGeneConfig::config_params()?);
        let values = interpret_all(&params, bundle, diagnostics)?;

        let genome = GenomeParams::from_values(&values)?;
        if let Some(warning) =
            InitialConnection::ambiguity(values.str("initial_connection")?, genome.num_hidden)
        {
            diagnostics.warn(&warning);
        }

        GenomeConfig::new(
            genome,
            NodeGeneConfig::from_values(&values),
            ConnectionGeneConfig::from_values(&values),
        )
    }

    /// Renders every item back to configuration text.
    pub fn to_bundle(&self) -> ConfigBundle {
        let mut bundle = ConfigBundle::new();
        for (name, value) in self.params.to_values() {
            bundle.insert(name, value.to_string());
        }
        self.node.write_config(&mut bundle);
        self.connection.write_config(&mut bundle);
        bundle
    }

    pub fn params(&self) -> &GenomeParams {
        &self.params
    }

    pub fn node_config(&self) -> &NodeGeneConfig {
        &self.node
    }

    pub fn connection_config(&self) -> &ConnectionGeneConfig {
        &self.connection
    }

    /// Input keys, `-1` down to `-num_inputs`.
    pub fn input_keys(&self) -> &[NodeKey] {
        &self.input_keys
    }

    /// Output keys, `0` up to `num_outputs - 1`.
    pub fn output_keys(&self) -> &[NodeKey] {
        &self.output_keys
    }

    pub fn is_input(&self, key: NodeKey) -> bool {
        self.input_keys.contains(&key)
    }

    pub fn is_output(&self, key: NodeKey) -> bool {
        self.output_keys.contains(&key)
    }

    /// Whether structural mutations should fall back or re-enable.
    pub fn is_surer(&self) -> bool {
        match self.params.structural_mutation_surer {
            MutationSurer::Enabled => true,
            MutationSurer::Disabled => false,
            MutationSurer::Default => self.params.single_structural_mutation,
        }
    }

    /// Reserves and returns a node key unused in `nodes`. The
    /// allocator only ever advances, so keys are not handed
    /// out twice even if they are never inserted.
    ///
    /// # Examples
    /// ```
    /// use neatgen::genomics::{ConnectionGeneConfig, GenomeConfig, GenomeParams, NodeGene, NodeGeneConfig};
    /// use std::collections::BTreeMap;
    ///
    /// let params = GenomeParams { num_inputs: 2, num_outputs: 1, ..GenomeParams::zero() };
    /// let mut config = GenomeConfig::new(params, NodeGeneConfig::zero(), ConnectionGeneConfig::zero()).unwrap();
    ///
    /// let mut nodes = BTreeMap::new();
    /// nodes.insert(0, NodeGene::with_attributes(0, 0.0, 1.0, "sigmoid", "sum"));
    /// nodes.insert(7, NodeGene::with_attributes(7, 0.0, 1.0, "sigmoid", "sum"));
    ///
    /// assert_eq!(config.get_new_node_key(&nodes), 8);
    /// assert_eq!(config.get_new_node_key(&nodes), 9);
    /// ```
    pub fn get_new_node_key(&mut self, nodes: &BTreeMap<NodeKey, NodeGene>) -> NodeKey {
        if let Some(&max) = nodes.keys().next_back() {
            self.next_node_key = self.next_node_key.max(max + 1);
        }
        while nodes.contains_key(&self.next_node_key) {
            self.next_node_key += 1;
        }
        let key = self.next_node_key;
        self.next_node_key += 1;
        key
    }
}
