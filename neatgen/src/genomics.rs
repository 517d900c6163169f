//! Genomes are the focus of evolution in NEAT.
//! They are a collection of node and connection genes that
//! encode a network topology. Genomes can be progressively
//! mutated, thus adding complexity and functionality, and
//! recombined with each other through crossover.

mod config;
mod connections;
mod genes;
pub mod graphs;
mod nodes;

pub use config::{GenomeConfig, GenomeParams, InitialConnection, MutationSurer};
pub use connections::{ConnectionGene, ConnectionGeneConfig, ENABLED, WEIGHT};
pub use genes::{Gene, GeneKey};
pub use nodes::{NodeGene, NodeGeneConfig, ACTIVATION, AGGREGATION, BIAS, RESPONSE};

use crate::attributes::AttributeConfig;
use crate::errors::AttributeError;
use crate::{rng, ConnectionKey, GenomeKey, NodeKey};

use rand::prelude::{IteratorRandom, Rng, SliceRandom};
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::fmt;

/// A float attribute configuration that always yields 0.
fn steady_float() -> AttributeConfig {
    AttributeConfig {
        init_type: "gaussian".to_string(),
        ..AttributeConfig::zero()
    }
}

/// A token attribute configuration that always yields `token`.
fn steady_token(token: &str) -> AttributeConfig {
    AttributeConfig {
        default: token.to_string(),
        options: vec![token.to_string()],
        ..AttributeConfig::zero()
    }
}

/// A mutable collection of node and connection genes.
///
/// Gene maps are ordered by key, so random choices among
/// genes are reproducible for a given generator state.
/// Supports Serde for convenient genome saving and loading.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Genome {
    key: GenomeKey,
    nodes: BTreeMap<NodeKey, NodeGene>,
    #[serde(with = "connection_list")]
    connections: BTreeMap<ConnectionKey, ConnectionGene>,
    fitness: Option<f64>,
}

impl Genome {
    /// Returns an empty genome with no fitness.
    pub fn new(key: GenomeKey) -> Genome {
        Genome {
            key,
            nodes: BTreeMap::new(),
            connections: BTreeMap::new(),
            fitness: None,
        }
    }

    /// Populates the genome with one node per output, the
    /// configured number of hidden nodes, and the initial
    /// connections of the configured policy.
    ///
    /// # Errors
    /// Returns an error if a gene's attributes cannot be initialized.
    ///
    /// # Examples
    /// ```
    /// use neatgen::genomics::{ConnectionGeneConfig, Genome, GenomeConfig, GenomeParams, InitialConnection, NodeGeneConfig};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let params = GenomeParams {
    ///     num_inputs: 3,
    ///     num_outputs: 2,
    ///     num_hidden: 1,
    ///     feed_forward: true,
    ///     initial_connection: InitialConnection::FullDirect,
    ///     ..GenomeParams::zero()
    /// };
    /// let mut config = GenomeConfig::new(params, NodeGeneConfig::zero(), ConnectionGeneConfig::zero()).unwrap();
    ///
    /// let mut genome = Genome::new(0);
    /// genome.configure_new(&mut config, &mut StdRng::seed_from_u64(0)).unwrap();
    ///
    /// // 2 outputs + 1 hidden node.
    /// assert_eq!(genome.nodes().len(), 2 + 1);
    /// // Inputs to hidden, hidden to outputs, inputs to outputs.
    /// assert_eq!(genome.connections().len(), 3 + 2 + 3 * 2);
    /// ```
    pub fn configure_new<R: Rng + ?Sized>(
        &mut self,
        config: &mut GenomeConfig,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        for key in config.output_keys().to_vec() {
            let node = NodeGene::new(key, config.node_config(), rng)?;
            self.nodes.insert(key, node);
        }

        for _ in 0..config.params().num_hidden {
            let key = config.get_new_node_key(&self.nodes);
            let node = NodeGene::new(key, config.node_config(), rng)?;
            self.nodes.insert(key, node);
        }

        match config.params().initial_connection {
            InitialConnection::Unconnected => Ok(()),
            InitialConnection::FsNeatNoHidden => self.connect_fs_neat(config, false, rng),
            InitialConnection::FsNeatHidden => self.connect_fs_neat(config, true, rng),
            InitialConnection::FullNoDirect => self.connect_full(config, false, rng),
            InitialConnection::FullDirect => self.connect_full(config, true, rng),
            InitialConnection::PartialNoDirect(fraction) => {
                self.connect_partial(config, false, fraction, rng)
            }
            InitialConnection::PartialDirect(fraction) => {
                self.connect_partial(config, true, fraction, rng)
            }
        }
    }

    /// Connects a single randomly chosen input to every
    /// output, and to every hidden node if `hidden` is set.
    fn connect_fs_neat<R: Rng + ?Sized>(
        &mut self,
        config: &GenomeConfig,
        hidden: bool,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        let input = match config.input_keys().choose(rng) {
            Some(&input) => input,
            None => return Ok(()),
        };
        let targets: Vec<NodeKey> = if hidden {
            self.nodes.keys().copied().collect()
        } else {
            config.output_keys().to_vec()
        };
        for output in targets {
            self.insert_new_connection(config, (input, output), rng)?;
        }
        Ok(())
    }

    fn connect_full<R: Rng + ?Sized>(
        &mut self,
        config: &GenomeConfig,
        direct: bool,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        for key in self.full_connections(config, direct) {
            self.insert_new_connection(config, key, rng)?;
        }
        Ok(())
    }

    fn connect_partial<R: Rng + ?Sized>(
        &mut self,
        config: &GenomeConfig,
        direct: bool,
        fraction: f64,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        let mut keys = self.full_connections(config, direct);
        keys.shuffle(rng);
        let count = (keys.len() as f64 * fraction).round_ties_even() as usize;
        for key in keys.into_iter().take(count) {
            self.insert_new_connection(config, key, rng)?;
        }
        Ok(())
    }

    /// Inputs to hidden nodes and hidden nodes to outputs, plus
    /// inputs to outputs if `direct` or there are no hidden nodes.
    /// Recurrent genomes also get a self-connection on every node.
    fn full_connections(&self, config: &GenomeConfig, direct: bool) -> Vec<ConnectionKey> {
        let (outputs, hidden): (Vec<NodeKey>, Vec<NodeKey>) =
            self.nodes.keys().copied().partition(|&k| config.is_output(k));

        let mut keys = vec![];
        if !hidden.is_empty() {
            for &input in config.input_keys() {
                keys.extend(hidden.iter().map(|&h| (input, h)));
            }
            for &h in &hidden {
                keys.extend(outputs.iter().map(|&output| (h, output)));
            }
        }
        if direct || hidden.is_empty() {
            for &input in config.input_keys() {
                keys.extend(outputs.iter().map(|&output| (input, output)));
            }
        }
        if !config.params().feed_forward {
            keys.extend(self.nodes.keys().map(|&k| (k, k)));
        }
        keys
    }

    fn insert_new_connection<R: Rng + ?Sized>(
        &mut self,
        config: &GenomeConfig,
        key: ConnectionKey,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        let connection = ConnectionGene::new(key, config.connection_config(), rng)?;
        self.connections.insert(key, connection);
        Ok(())
    }

    /// Adds an initialized connection from `input` to `output`
    /// with the given weight and enabled state, replacing any
    /// connection between the same nodes.
    ///
    /// # Panics
    /// This function panics if `output` is an input key.
    pub fn add_connection<R: Rng + ?Sized>(
        &mut self,
        config: &GenomeConfig,
        input: NodeKey,
        output: NodeKey,
        weight: f64,
        enabled: bool,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        if config.is_input(output) {
            panic!("attempted to add connection into input {} in {}", output, self);
        }
        let mut connection = ConnectionGene::new((input, output), config.connection_config(), rng)?;
        connection.weight = weight;
        connection.enabled = enabled;
        self.connections.insert(connection.key(), connection);
        Ok(())
    }

    /// Returns a fresh genome holding the union of both parents'
    /// genes. Genes present in both are crossed over, the fitter
    /// parent's version first; others are copied.
    ///
    /// # Examples
    /// ```
    /// use neatgen::genomics::{ConnectionGene, Gene, Genome, NodeGene};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut a = Genome::new(1);
    /// a.insert_gene(NodeGene::with_attributes(0, 0.0, 1.0, "sigmoid", "sum").into());
    /// a.insert_gene(ConnectionGene::with_attributes((-1, 0), 1.0, true).into());
    /// a.set_fitness(2.0);
    ///
    /// let mut b = a.clone();
    /// b.insert_gene(NodeGene::with_attributes(1, 0.0, 1.0, "sigmoid", "sum").into());
    /// b.insert_gene(ConnectionGene::with_attributes((-2, 0), 1.0, false).into());
    /// b.set_fitness(1.0);
    ///
    /// let child = Genome::crossover(2, &a, &b, &mut StdRng::seed_from_u64(0));
    /// assert_eq!(child.key(), 2);
    /// assert_eq!(child.fitness(), None);
    /// assert_eq!(child.nodes().len(), 2);
    /// assert_eq!(child.connections().len(), 2);
    /// ```
    pub fn crossover<R: Rng + ?Sized>(
        key: GenomeKey,
        first: &Genome,
        second: &Genome,
        rng: &mut R,
    ) -> Genome {
        let (fitter, other) = if first.fitness > second.fitness {
            (first, second)
        } else {
            (second, first)
        };

        let connections = Self::inherit(&fitter.connections, &other.connections, |a, b| {
            a.crossover(b, rng)
        });
        let nodes = Self::inherit(&fitter.nodes, &other.nodes, |a, b| a.crossover(b, rng));

        Genome {
            key,
            nodes,
            connections,
            fitness: None,
        }
    }

    fn inherit<K: Ord + Copy, G: Clone>(
        fitter: &BTreeMap<K, G>,
        other: &BTreeMap<K, G>,
        mut cross: impl FnMut(&G, &G) -> G,
    ) -> BTreeMap<K, G> {
        let mut genes: BTreeMap<K, G> = fitter
            .iter()
            .map(|(&k, a)| match other.get(&k) {
                Some(b) => (k, cross(a, b)),
                None => (k, a.clone()),
            })
            .collect();
        for (&k, b) in other {
            genes.entry(k).or_insert_with(|| b.clone());
        }
        genes
    }

    /// Runs one round of mutation: structural changes first,
    /// then every connection gene and every node gene mutates
    /// its attributes.
    ///
    /// With [`single_structural_mutation`] set, a single draw
    /// selects at most one of adding a node, deleting a node,
    /// adding a connection or deleting a connection. Otherwise,
    /// each is tried independently.
    ///
    /// [`single_structural_mutation`]: GenomeParams::single_structural_mutation
    ///
    /// # Errors
    /// Returns an error if a gene's attributes cannot be
    /// initialized or mutated.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        config: &mut GenomeConfig,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        let params = config.params();
        let (node_add, node_delete) = (params.node_add_prob, params.node_delete_prob);
        let (conn_add, conn_delete) = (params.conn_add_prob, params.conn_delete_prob);

        if params.single_structural_mutation {
            let div = (node_add + node_delete + conn_add + conn_delete).max(1.0);
            let r = rng::unit(rng);
            if r < node_add / div {
                self.mutate_add_node(config, rng)?;
            } else if r < (node_add + node_delete) / div {
                self.mutate_delete_node(config, rng);
            } else if r < (node_add + node_delete + conn_add) / div {
                self.mutate_add_connection(config, rng)?;
            } else if r < (node_add + node_delete + conn_add + conn_delete) / div {
                self.mutate_delete_connection(rng);
            }
        } else {
            if rng::unit(rng) < node_add {
                self.mutate_add_node(config, rng)?;
            }
            if rng::unit(rng) < node_delete {
                self.mutate_delete_node(config, rng);
            }
            if rng::unit(rng) < conn_add {
                self.mutate_add_connection(config, rng)?;
            }
            if rng::unit(rng) < conn_delete {
                self.mutate_delete_connection(rng);
            }
        }

        for connection in self.connections.values_mut() {
            connection.mutate(config.connection_config(), rng)?;
        }
        for node in self.nodes.values_mut() {
            node.mutate(config.node_config(), rng)?;
        }
        Ok(())
    }

    /// Induces a _node addition mutation_: a random connection
    /// is disabled and split by a new node. The connection into
    /// the new node has weight 1; the one out of it keeps the
    /// split connection's weight.
    ///
    /// Returns the new node's key, or `None` if the genome has
    /// no connections. In that case, a connection addition is
    /// attempted instead if structural mutations are [surer].
    ///
    /// [surer]: GenomeConfig::is_surer
    ///
    /// # Errors
    /// Returns an error if a new gene's attributes cannot be initialized.
    pub fn mutate_add_node<R: Rng + ?Sized>(
        &mut self,
        config: &mut GenomeConfig,
        rng: &mut R,
    ) -> Result<Option<NodeKey>, AttributeError> {
        if self.connections.is_empty() {
            if config.is_surer() {
                self.mutate_add_connection(config, rng)?;
            } else {
                log::debug!("node addition skipped in genome {}: no connections", self.key);
            }
            return Ok(None);
        }

        let split = match self.connections.values_mut().choose(rng) {
            Some(split) => split,
            None => return Ok(None),
        };
        split.enabled = false;
        let ((input, output), weight) = (split.key(), split.weight);

        let key = config.get_new_node_key(&self.nodes);
        let node = NodeGene::new(key, config.node_config(), rng)?;
        self.nodes.insert(key, node);

        self.add_connection(config, input, key, 1.0, true, rng)?;
        self.add_connection(config, key, output, weight, true, rng)?;
        Ok(Some(key))
    }

    /// Induces a _connection addition mutation_ between a random
    /// node or input and a random node. Connections between two
    /// outputs, and in feed-forward genomes connections closing a
    /// cycle, are rejected. Drawing an existing connection
    /// re-enables it if structural mutations are [surer].
    ///
    /// Returns the key of the added or re-enabled connection.
    ///
    /// [surer]: GenomeConfig::is_surer
    ///
    /// # Errors
    /// Returns an error if the new gene's attributes cannot be initialized.
    pub fn mutate_add_connection<R: Rng + ?Sized>(
        &mut self,
        config: &GenomeConfig,
        rng: &mut R,
    ) -> Result<Option<ConnectionKey>, AttributeError> {
        let output = match self.nodes.keys().choose(rng) {
            Some(&output) => output,
            None => return Ok(None),
        };
        let candidates: Vec<NodeKey> = self
            .nodes
            .keys()
            .chain(config.input_keys())
            .copied()
            .collect();
        let input = match candidates.choose(rng) {
            Some(&input) => input,
            None => return Ok(None),
        };
        let key = (input, output);

        if let Some(existing) = self.connections.get_mut(&key) {
            if config.is_surer() {
                existing.enabled = true;
                return Ok(Some(key));
            }
            return Ok(None);
        }

        if config.is_output(input) && config.is_output(output) {
            log::debug!("connection {:?} rejected in genome {}: output to output", key, self.key);
            return Ok(None);
        }

        if config.params().feed_forward {
            let existing: Vec<ConnectionKey> = self.connections.keys().copied().collect();
            if graphs::creates_cycle(&existing, key) {
                log::debug!("connection {:?} rejected in genome {}: creates a cycle", key, self.key);
                return Ok(None);
            }
        }

        self.insert_new_connection(config, key, rng)?;
        Ok(Some(key))
    }

    /// Induces a _node deletion mutation_: a random non-output
    /// node is removed along with every connection touching it.
    /// Returns the removed node's key, if there was one to remove.
    pub fn mutate_delete_node<R: Rng + ?Sized>(
        &mut self,
        config: &GenomeConfig,
        rng: &mut R,
    ) -> Option<NodeKey> {
        let candidates: Vec<NodeKey> = self
            .nodes
            .keys()
            .copied()
            .filter(|&k| !config.is_output(k))
            .collect();
        let key = *candidates.choose(rng)?;

        self.connections.retain(|&(a, b), _| a != key && b != key);
        self.nodes.remove(&key);
        Some(key)
    }

    /// Induces a _connection deletion mutation_, returning
    /// the removed connection, if there was one to remove.
    pub fn mutate_delete_connection<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<ConnectionGene> {
        let key = *self.connections.keys().choose(rng)?;
        self.connections.remove(&key)
    }

    /// Returns the genetic distance between two genomes.
    ///
    /// For each gene kind, matched genes contribute their
    /// attribute distance and unmatched genes the disjoint
    /// coefficient, normalized by the larger gene count.
    ///
    /// # Examples
    /// ```
    /// use neatgen::genomics::{ConnectionGeneConfig, Genome, GenomeConfig, GenomeParams, InitialConnection, NodeGeneConfig};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let params = GenomeParams {
    ///     num_inputs: 2,
    ///     num_outputs: 1,
    ///     compatibility_disjoint_coefficient: 1.0,
    ///     compatibility_weight_coefficient: 0.5,
    ///     initial_connection: InitialConnection::FullDirect,
    ///     ..GenomeParams::zero()
    /// };
    /// let mut config = GenomeConfig::new(params, NodeGeneConfig::zero(), ConnectionGeneConfig::zero()).unwrap();
    /// let mut rng = StdRng::seed_from_u64(0);
    ///
    /// let mut genome = Genome::new(0);
    /// genome.configure_new(&mut config, &mut rng).unwrap();
    /// assert_eq!(genome.distance(&genome.clone(), &config), 0.0);
    ///
    /// let empty = Genome::new(1);
    /// assert_eq!(genome.distance(&empty, &config), empty.distance(&genome, &config));
    /// ```
    pub fn distance(&self, other: &Genome, config: &GenomeConfig) -> f64 {
        let disjoint_coefficient = config.params().compatibility_disjoint_coefficient;
        Self::kind_distance(&self.nodes, &other.nodes, disjoint_coefficient, |a, b| {
            a.distance(b, config)
        }) + Self::kind_distance(
            &self.connections,
            &other.connections,
            disjoint_coefficient,
            |a, b| a.distance(b, config),
        )
    }

    fn kind_distance<K: Ord, G>(
        first: &BTreeMap<K, G>,
        second: &BTreeMap<K, G>,
        disjoint_coefficient: f64,
        distance: impl Fn(&G, &G) -> f64,
    ) -> f64 {
        if first.is_empty() && second.is_empty() {
            return 0.0;
        }

        let mut matched = 0.0;
        let mut disjoint = second.keys().filter(|&k| !first.contains_key(k)).count();
        for (k, a) in first {
            match second.get(k) {
                Some(b) => matched += distance(a, b),
                None => disjoint += 1,
            }
        }
        let larger = first.len().max(second.len()) as f64;
        (matched + disjoint_coefficient * disjoint as f64) / larger
    }

    /// Returns a copy of the genome without the genes that
    /// cannot affect its outputs. Outputs are always kept; other
    /// nodes are kept if they lie on an enabled path from an input
    /// to an output. Connections are kept if both endpoints are
    /// inputs or kept nodes.
    pub fn get_pruned_copy(&self, config: &GenomeConfig) -> Genome {
        let enabled: Vec<ConnectionKey> = self
            .connections
            .values()
            .filter(|c| c.enabled)
            .map(ConnectionGene::key)
            .collect();
        let required =
            graphs::required_for_output(config.input_keys(), config.output_keys(), &enabled);
        let reachable = graphs::reachable_from(config.input_keys(), &enabled);

        let nodes: BTreeMap<NodeKey, NodeGene> = self
            .nodes
            .iter()
            .filter(|&(&k, _)| {
                config.is_output(k) || (required.contains(&k) && reachable.contains(&k))
            })
            .map(|(&k, n)| (k, n.clone()))
            .collect();
        let pinned = |k: NodeKey| config.is_input(k) || nodes.contains_key(&k);
        let connections = self
            .connections
            .iter()
            .filter(|&(&(a, b), _)| pinned(a) && pinned(b))
            .map(|(&k, c)| (k, c.clone()))
            .collect();

        Genome {
            key: self.key,
            nodes,
            connections,
            fitness: self.fitness,
        }
    }

    /// Returns the number of nodes and of enabled connections.
    pub fn size(&self) -> (usize, usize) {
        let enabled = self.connections.values().filter(|c| c.enabled).count();
        (self.nodes.len(), enabled)
    }

    /// Inserts a gene, returning the gene it replaced, if any.
    pub fn insert_gene(&mut self, gene: Gene) -> Option<Gene> {
        match gene {
            Gene::Node(node) => self.nodes.insert(node.key(), node).map(Gene::Node),
            Gene::Connection(connection) => self
                .connections
                .insert(connection.key(), connection)
                .map(Gene::Connection),
        }
    }

    /// Removes a gene, returning it if it was present.
    pub fn remove_gene(&mut self, key: GeneKey) -> Option<Gene> {
        match key {
            GeneKey::Node(k) => self.nodes.remove(&k).map(Gene::Node),
            GeneKey::Connection(k) => self.connections.remove(&k).map(Gene::Connection),
        }
    }

    pub fn key(&self) -> GenomeKey {
        self.key
    }

    /// Returns the genome's fitness, if it has been evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn nodes(&self) -> &BTreeMap<NodeKey, NodeGene> {
        &self.nodes
    }

    pub fn connections(&self) -> &BTreeMap<ConnectionKey, ConnectionGene> {
        &self.connections
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut NodeGene> {
        self.nodes.get_mut(&key)
    }

    pub fn connection_mut(&mut self, key: ConnectionKey) -> Option<&mut ConnectionGene> {
        self.connections.get_mut(&key)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Key: {}", self.key)?;
        match self.fitness {
            Some(fitness) => writeln!(f, "Fitness: {}", fitness)?,
            None => writeln!(f, "Fitness: none")?,
        }
        write!(f, "Nodes:")?;
        for node in self.nodes.values() {
            write!(f, "\n\t{}", node)?;
        }
        write!(f, "\nConnections:")?;
        for connection in self.connections.values() {
            write!(f, "\n\t{}", connection)?;
        }
        Ok(())
    }
}

/// Connection keys are pairs, which many formats cannot use
/// as map keys. Connections are stored as a list instead.
mod connection_list {
    use super::ConnectionGene;
    use crate::ConnectionKey;

    use serde::{Deserialize, Deserializer, Serializer};

    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        connections: &BTreeMap<ConnectionKey, ConnectionGene>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(connections.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<ConnectionKey, ConnectionGene>, D::Error> {
        let connections = Vec::<ConnectionGene>::deserialize(deserializer)?;
        Ok(connections.into_iter().map(|c| (c.key(), c)).collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::ConfigBundle;
    use rand::{rngs::StdRng, SeedableRng};

    /// A complete genome item bundle: 2 inputs, 1 output,
    /// no hidden nodes, feed-forward.
    pub(crate) fn bundle(initial_connection: &str) -> ConfigBundle {
        [
            ("num_inputs", "2"),
            ("num_outputs", "1"),
            ("num_hidden", "0"),
            ("feed_forward", "True"),
            ("compatibility_disjoint_coefficient", "1.0"),
            ("compatibility_weight_coefficient", "0.5"),
            ("conn_add_prob", "0.5"),
            ("conn_delete_prob", "0.5"),
            ("node_add_prob", "0.2"),
            ("node_delete_prob", "0.2"),
            ("single_structural_mutation", "False"),
            ("structural_mutation_surer", "default"),
            ("initial_connection", initial_connection),
            ("bias_init_mean", "0.0"),
            ("bias_init_stdev", "1.0"),
            ("bias_init_type", "gaussian"),
            ("bias_replace_rate", "0.1"),
            ("bias_mutate_rate", "0.7"),
            ("bias_mutate_power", "0.5"),
            ("bias_max_value", "30.0"),
            ("bias_min_value", "-30.0"),
            ("response_init_mean", "1.0"),
            ("response_init_stdev", "0.0"),
            ("response_init_type", "gaussian"),
            ("response_replace_rate", "0.0"),
            ("response_mutate_rate", "0.0"),
            ("response_mutate_power", "0.0"),
            ("response_max_value", "30.0"),
            ("response_min_value", "-30.0"),
            ("activation_default", "random"),
            ("activation_options", "sigmoid tanh"),
            ("activation_mutate_rate", "0.1"),
            ("aggregation_default", "sum"),
            ("aggregation_options", "sum"),
            ("aggregation_mutate_rate", "0.0"),
            ("weight_init_mean", "0.0"),
            ("weight_init_stdev", "1.0"),
            ("weight_init_type", "gaussian"),
            ("weight_replace_rate", "0.1"),
            ("weight_mutate_rate", "0.8"),
            ("weight_mutate_power", "0.5"),
            ("weight_max_value", "30"),
            ("weight_min_value", "-30"),
            ("enabled_default", "True"),
            ("enabled_mutate_rate", "0.01"),
            ("enabled_rate_to_true_add", "0.0"),
            ("enabled_rate_to_false_add", "0.0"),
        ]
        .into_iter()
        .collect()
    }

    /// The [`bundle`] configuration with the given layout.
    pub(crate) fn genome_config(
        num_inputs: usize,
        num_outputs: usize,
        num_hidden: usize,
        initial_connection: InitialConnection,
    ) -> GenomeConfig {
        let base = GenomeConfig::from_bundle(&bundle("unconnected"), &mut Vec::<String>::new()).unwrap();
        let params = GenomeParams {
            num_inputs,
            num_outputs,
            num_hidden,
            initial_connection,
            ..base.params().clone()
        };
        GenomeConfig::new(params, base.node_config().clone(), base.connection_config().clone()).unwrap()
    }

    fn with_params(config: &GenomeConfig, edit: impl FnOnce(&mut GenomeParams)) -> GenomeConfig {
        let mut params = config.params().clone();
        edit(&mut params);
        GenomeConfig::new(params, config.node_config().clone(), config.connection_config().clone()).unwrap()
    }

    fn configured(config: &mut GenomeConfig, seed: u64) -> Genome {
        let mut genome = Genome::new(seed);
        genome
            .configure_new(config, &mut StdRng::seed_from_u64(seed))
            .unwrap();
        genome
    }

    fn node(key: NodeKey) -> Gene {
        NodeGene::with_attributes(key, 0.0, 1.0, "sigmoid", "sum").into()
    }

    fn connection(input: NodeKey, output: NodeKey, weight: f64) -> Gene {
        ConnectionGene::with_attributes((input, output), weight, true).into()
    }

    fn node_keys(genome: &Genome) -> Vec<NodeKey> {
        genome.nodes().keys().copied().collect()
    }

    fn connection_keys(genome: &Genome) -> Vec<ConnectionKey> {
        genome.connections().keys().copied().collect()
    }

    #[test]
    fn fs_neat_single_output() {
        let mut config = genome_config(2, 1, 0, InitialConnection::FsNeatNoHidden);
        for seed in 0..10 {
            let genome = configured(&mut config, seed);
            assert_eq!(node_keys(&genome), vec![0]);
            let keys = connection_keys(&genome);
            assert_eq!(keys.len(), 1);
            assert!(keys[0] == (-1, 0) || keys[0] == (-2, 0));
        }
    }

    #[test]
    fn fs_neat_hidden_uses_one_input() {
        let mut config = genome_config(2, 1, 2, InitialConnection::FsNeatHidden);
        let genome = configured(&mut config, 3);
        assert_eq!(node_keys(&genome), vec![0, 1, 2]);
        let keys = connection_keys(&genome);
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().all(|&(i, _)| i == keys[0].0 && i < 0));
    }

    #[test]
    fn initial_connection_counts() {
        use InitialConnection::*;
        for (policy, hidden, nodes, connections) in [
            (Unconnected, 2, 3, 0),
            (FullNoDirect, 0, 1, 2),
            (FullDirect, 0, 1, 2),
            (FullNoDirect, 2, 3, 2 * 2 + 2),
            (FullDirect, 2, 3, 2 * 2 + 2 + 2),
            (PartialDirect(0.5), 2, 3, 4),
            (PartialNoDirect(0.0), 2, 3, 0),
            (PartialNoDirect(1.0), 2, 3, 6),
        ] {
            let mut config = genome_config(2, 1, hidden, policy);
            let genome = configured(&mut config, 0);
            assert_eq!(genome.nodes().len(), nodes, "{}", policy);
            assert_eq!(genome.connections().len(), connections, "{}", policy);
        }
    }

    #[test]
    fn unconnected_hidden_keys_follow_outputs() {
        let mut config = genome_config(2, 1, 2, InitialConnection::Unconnected);
        let genome = configured(&mut config, 0);
        assert_eq!(node_keys(&genome), vec![0, 1, 2]);
    }

    #[test]
    fn recurrent_full_adds_self_connections() {
        let base = genome_config(2, 1, 2, InitialConnection::FullNoDirect);
        let mut config = with_params(&base, |p| p.feed_forward = false);
        let genome = configured(&mut config, 0);
        assert_eq!(genome.connections().len(), 6 + 3);
        for k in [0, 1, 2] {
            assert!(genome.connections().contains_key(&(k, k)));
        }
    }

    #[test]
    fn add_node_splits_connection() {
        let mut config = genome_config(2, 1, 0, InitialConnection::Unconnected);
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = Genome::new(0);
        genome.insert_gene(node(0));
        genome.insert_gene(connection(-1, 0, 0.75));

        let new = genome.mutate_add_node(&mut config, &mut rng).unwrap().unwrap();
        assert_ne!(new, 0);
        assert_eq!(node_keys(&genome), vec![0, new]);
        assert_eq!(genome.connections().len(), 3);

        let split = &genome.connections()[&(-1, 0)];
        assert!(!split.enabled);
        assert_eq!(split.weight, 0.75);
        let into = &genome.connections()[&(-1, new)];
        assert!(into.enabled);
        assert_eq!(into.weight, 1.0);
        let out_of = &genome.connections()[&(new, 0)];
        assert!(out_of.enabled);
        assert_eq!(out_of.weight, 0.75);
    }

    #[test]
    fn add_node_without_connections() {
        let mut config = genome_config(2, 1, 0, InitialConnection::Unconnected);
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = Genome::new(0);
        genome.insert_gene(node(0));
        let before = genome.clone();
        assert_eq!(genome.mutate_add_node(&mut config, &mut rng), Ok(None));
        assert_eq!(genome, before);

        let mut surer = with_params(&config, |p| p.structural_mutation_surer = MutationSurer::Enabled);
        for _ in 0..50 {
            assert_eq!(genome.mutate_add_node(&mut surer, &mut rng), Ok(None));
            if !genome.connections().is_empty() {
                break;
            }
        }
        assert_eq!(genome.nodes().len(), 1);
        assert_eq!(genome.connections().len(), 1);
    }

    #[test]
    fn add_connection_respects_constraints() {
        let config = genome_config(1, 2, 0, InitialConnection::Unconnected);
        let mut rng = StdRng::seed_from_u64(6);
        let mut genome = Genome::new(0);
        genome.insert_gene(node(0));
        genome.insert_gene(node(1));
        for _ in 0..100 {
            genome.mutate_add_connection(&config, &mut rng).unwrap();
        }
        // Only input to output connections are possible.
        assert_eq!(connection_keys(&genome), vec![(-1, 0), (-1, 1)]);
    }

    #[test]
    fn add_connection_avoids_cycles() {
        let config = genome_config(1, 1, 0, InitialConnection::Unconnected);
        let mut rng = StdRng::seed_from_u64(6);
        let mut genome = Genome::new(0);
        for key in [0, 1, 2] {
            genome.insert_gene(node(key));
        }
        for _ in 0..200 {
            genome.mutate_add_connection(&config, &mut rng).unwrap();
        }
        let keys = connection_keys(&genome);
        assert!(!keys.is_empty());
        for &key in &keys {
            let others: Vec<ConnectionKey> = keys.iter().copied().filter(|&k| k != key).collect();
            assert!(!graphs::creates_cycle(&others, key), "{:?}", key);
        }
    }

    #[test]
    fn surer_add_connection_reenables() {
        let base = genome_config(1, 1, 0, InitialConnection::Unconnected);
        let mut rng = StdRng::seed_from_u64(2);
        let mut genome = Genome::new(0);
        genome.insert_gene(node(0));
        genome.insert_gene(ConnectionGene::with_attributes((-1, 0), 0.5, false).into());

        // Without the surer, the disabled connection stays disabled.
        for _ in 0..50 {
            genome.mutate_add_connection(&base, &mut rng).unwrap();
        }
        assert!(!genome.connections()[&(-1, 0)].enabled);

        let surer = with_params(&base, |p| p.structural_mutation_surer = MutationSurer::Enabled);
        let mut reenabled = false;
        for _ in 0..50 {
            if genome.mutate_add_connection(&surer, &mut rng).unwrap() == Some((-1, 0)) {
                reenabled = true;
                break;
            }
        }
        assert!(reenabled);
        assert!(genome.connections()[&(-1, 0)].enabled);
        assert_eq!(genome.connections()[&(-1, 0)].weight, 0.5);
    }

    #[test]
    fn delete_node_removes_touching_connections() {
        let config = genome_config(2, 1, 0, InitialConnection::Unconnected);
        let mut rng = StdRng::seed_from_u64(1);
        let mut genome = Genome::new(0);
        genome.insert_gene(node(0));
        genome.insert_gene(node(1));
        genome.insert_gene(connection(-1, 1, 1.0));
        genome.insert_gene(connection(1, 0, 1.0));
        genome.insert_gene(connection(-2, 0, 1.0));

        assert_eq!(genome.mutate_delete_node(&config, &mut rng), Some(1));
        assert_eq!(node_keys(&genome), vec![0]);
        assert_eq!(connection_keys(&genome), vec![(-2, 0)]);

        // Outputs are never deleted.
        assert_eq!(genome.mutate_delete_node(&config, &mut rng), None);
        assert_eq!(node_keys(&genome), vec![0]);
    }

    #[test]
    fn delete_connection() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut genome = Genome::new(0);
        assert_eq!(genome.mutate_delete_connection(&mut rng), None);
        genome.insert_gene(connection(-1, 0, 1.0));
        genome.insert_gene(connection(-2, 0, 1.0));
        let removed = genome.mutate_delete_connection(&mut rng).unwrap();
        assert_eq!(genome.connections().len(), 1);
        assert!(!genome.connections().contains_key(&removed.key()));
    }

    #[test]
    fn new_node_keys_skip_used_keys() {
        let mut config = genome_config(2, 1, 0, InitialConnection::Unconnected);
        let mut genome = Genome::new(0);
        genome.insert_gene(node(0));
        genome.insert_gene(node(5));
        let first = config.get_new_node_key(genome.nodes());
        let second = config.get_new_node_key(genome.nodes());
        assert_eq!((first, second), (6, 7));
    }

    #[test]
    fn distance_normalizes_per_kind() {
        let config = genome_config(2, 1, 0, InitialConnection::Unconnected);
        let mut a = Genome::new(0);
        a.insert_gene(node(0));
        a.insert_gene(connection(-1, 0, 1.0));

        let mut b = Genome::new(1);
        b.insert_gene(NodeGene::with_attributes(0, 1.0, 1.0, "sigmoid", "sum").into());
        b.insert_gene(node(1));
        b.insert_gene(connection(-1, 0, 0.5));
        b.insert_gene(connection(-1, 1, 1.0));
        b.insert_gene(connection(1, 0, 1.0));

        // Nodes: (0.5 + 1) / 2. Connections: (0.25 + 2) / 3.
        assert_eq!(a.distance(&b, &config), 0.75 + 0.75);
        assert_eq!(b.distance(&a, &config), a.distance(&b, &config));
        assert_eq!(a.distance(&a, &config), 0.0);
        assert_eq!(Genome::new(2).distance(&Genome::new(3), &config), 0.0);
    }

    #[test]
    fn distance_is_symmetric_for_mutated_genomes() {
        let mut config = genome_config(2, 1, 1, InitialConnection::FullDirect);
        let mut rng = StdRng::seed_from_u64(10);
        let mut a = configured(&mut config, 10);
        let mut b = a.clone();
        for _ in 0..10 {
            a.mutate(&mut config, &mut rng).unwrap();
            b.mutate(&mut config, &mut rng).unwrap();
        }
        assert_eq!(a.distance(&b, &config), b.distance(&a, &config));
        assert_eq!(a.distance(&a.clone(), &config), 0.0);
    }

    #[test]
    fn crossover_takes_union() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut a = Genome::new(0);
        a.insert_gene(node(0));
        a.insert_gene(node(1));
        a.insert_gene(connection(-1, 1, 1.0));
        a.set_fitness(1.0);

        let mut b = Genome::new(1);
        b.insert_gene(NodeGene::with_attributes(0, 2.0, 1.0, "tanh", "sum").into());
        b.insert_gene(node(2));
        b.insert_gene(ConnectionGene::with_attributes((-1, 1), 3.0, false).into());
        b.insert_gene(connection(2, 0, 1.0));
        b.set_fitness(3.0);

        let child = Genome::crossover(7, &a, &b, &mut rng);
        assert_eq!(child.key(), 7);
        assert_eq!(child.fitness(), None);
        assert_eq!(node_keys(&child), vec![0, 1, 2]);
        assert_eq!(connection_keys(&child), vec![(-1, 1), (2, 0)]);

        let shared = &child.connections()[&(-1, 1)];
        assert!(!shared.enabled);
        assert!(shared.weight == 1.0 || shared.weight == 3.0);
        let node = &child.nodes()[&0];
        assert!(node.bias == 0.0 || node.bias == 2.0);
        assert_eq!(child.nodes()[&1], a.nodes()[&1]);
        assert_eq!(child.nodes()[&2], b.nodes()[&2]);
    }

    #[test]
    fn mutation_is_reproducible() {
        let mut config_a = genome_config(2, 1, 1, InitialConnection::FullDirect);
        let mut config_b = config_a.clone();
        let mut a = configured(&mut config_a, 4);
        let mut b = configured(&mut config_b, 4);
        let (mut rng_a, mut rng_b) = (StdRng::seed_from_u64(99), StdRng::seed_from_u64(99));
        for _ in 0..20 {
            a.mutate(&mut config_a, &mut rng_a).unwrap();
            b.mutate(&mut config_b, &mut rng_b).unwrap();
        }
        assert_eq!(a, b);
        assert!(a.connections().values().all(|c| (-30.0..=30.0).contains(&c.weight)));
        assert!(a.nodes().values().all(|n| (-30.0..=30.0).contains(&n.bias)));
    }

    #[test]
    fn single_structural_mutation_without_chances() {
        let base = genome_config(2, 1, 1, InitialConnection::FullDirect);
        let mut config = with_params(&base, |p| {
            p.single_structural_mutation = true;
            p.node_add_prob = 0.0;
            p.node_delete_prob = 0.0;
            p.conn_add_prob = 0.0;
            p.conn_delete_prob = 0.0;
        });
        let mut rng = StdRng::seed_from_u64(5);
        let mut genome = configured(&mut config, 5);
        let (nodes, connections) = (node_keys(&genome), connection_keys(&genome));
        for _ in 0..20 {
            genome.mutate(&mut config, &mut rng).unwrap();
        }
        assert_eq!(node_keys(&genome), nodes);
        assert_eq!(connection_keys(&genome), connections);
    }

    #[test]
    fn single_structural_mutation_changes_one_thing() {
        let base = genome_config(2, 1, 1, InitialConnection::FullDirect);
        let mut config = with_params(&base, |p| {
            p.single_structural_mutation = true;
            p.node_add_prob = 1.0;
            p.node_delete_prob = 1.0;
            p.conn_add_prob = 1.0;
            p.conn_delete_prob = 1.0;
        });
        let mut rng = StdRng::seed_from_u64(5);
        let mut genome = configured(&mut config, 5);
        for _ in 0..20 {
            let (nodes, connections) = (genome.nodes().len(), genome.connections().len());
            genome.mutate(&mut config, &mut rng).unwrap();
            let node_change = genome.nodes().len() as i64 - nodes as i64;
            let connection_change = genome.connections().len() as i64 - connections as i64;
            match node_change {
                1 => assert_eq!(connection_change, 2),
                -1 => assert!(connection_change <= 0),
                0 => assert!(connection_change.abs() <= 1),
                _ => panic!("{} nodes changed", node_change),
            }
        }
    }

    #[test]
    fn pruning_drops_dead_ends() {
        let config = genome_config(2, 1, 0, InitialConnection::Unconnected);
        let mut genome = Genome::new(4);
        genome.set_fitness(1.5);
        for key in [0, 1, 2, 3, 4] {
            genome.insert_gene(node(key));
        }
        // -1 -> 1 -> 0 is live.
        genome.insert_gene(connection(-1, 1, 1.0));
        genome.insert_gene(connection(1, 0, 1.0));
        // 2 leads nowhere.
        genome.insert_gene(connection(-2, 2, 1.0));
        // 3 is fed by nothing.
        genome.insert_gene(connection(3, 0, 1.0));
        // 4 only lies on a disabled path.
        genome.insert_gene(connection(-2, 4, 1.0));
        genome.insert_gene(ConnectionGene::with_attributes((4, 0), 1.0, false).into());

        let pruned = genome.get_pruned_copy(&config);
        assert_eq!(pruned.key(), 4);
        assert_eq!(pruned.fitness(), Some(1.5));
        assert_eq!(node_keys(&pruned), vec![0, 1]);
        assert_eq!(connection_keys(&pruned), vec![(-1, 1), (1, 0)]);
        // The original is untouched.
        assert_eq!(genome.nodes().len(), 5);
    }

    #[test]
    fn pruning_keeps_unconnected_outputs() {
        let config = genome_config(2, 2, 0, InitialConnection::Unconnected);
        let mut genome = Genome::new(0);
        genome.insert_gene(node(0));
        genome.insert_gene(node(1));
        genome.insert_gene(connection(-1, 0, 1.0));
        let pruned = genome.get_pruned_copy(&config);
        assert_eq!(node_keys(&pruned), vec![0, 1]);
        assert_eq!(connection_keys(&pruned), vec![(-1, 0)]);
    }

    #[test]
    fn gene_export_surface() {
        let mut genome = Genome::new(0);
        assert_eq!(genome.insert_gene(connection(-1, 0, 1.0)), None);
        assert_eq!(
            genome.insert_gene(connection(-1, 0, 2.0)),
            Some(connection(-1, 0, 1.0))
        );
        genome.connection_mut((-1, 0)).unwrap().enabled = false;
        assert_eq!(genome.size(), (0, 0));

        genome.insert_gene(node(0));
        genome.node_mut(0).unwrap().bias = 0.5;
        assert_eq!(genome.nodes()[&0].bias, 0.5);
        assert_eq!(genome.remove_gene(GeneKey::Node(0)).map(|g| g.key()), Some(GeneKey::Node(0)));
        assert_eq!(genome.remove_gene(GeneKey::Node(0)), None);
        assert!(genome.remove_gene(GeneKey::Connection((-1, 0))).is_some());
        assert!(genome.connections().is_empty());
    }

    #[test]
    fn serde_round_trip() {
        let mut config = genome_config(2, 1, 1, InitialConnection::FullDirect);
        let mut genome = configured(&mut config, 21);
        genome.set_fitness(0.5);
        let json = serde_json::to_string(&genome).unwrap();
        let back: Genome = serde_json::from_str(&json).unwrap();
        assert_eq!(node_keys(&back), node_keys(&genome));
        assert_eq!(connection_keys(&back), connection_keys(&genome));
        assert_eq!(back.to_string(), genome.to_string());
    }

    #[test]
    #[should_panic]
    fn connection_into_input() {
        let config = genome_config(2, 1, 0, InitialConnection::Unconnected);
        let mut genome = Genome::new(0);
        let _ = genome.add_connection(&config, 0, -1, 1.0, true, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn display() {
        let mut genome = Genome::new(3);
        genome.insert_gene(node(0));
        genome.insert_gene(ConnectionGene::with_attributes((-1, 0), 0.5, false).into());
        assert_eq!(
            genome.to_string(),
            "Key: 3\nFitness: none\nNodes:\n\t0[bias 0.000, response 1.000, sigmoid, sum]\nConnections:\n\t([-1->0, 0.500])"
        );
    }
}
