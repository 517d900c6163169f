use super::{ConnectionGene, GenomeConfig, NodeGene};
use crate::errors::{AttributeError, GeneKindMismatch};
use crate::{ConnectionKey, NodeKey};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Either kind of gene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Gene {
    Node(NodeGene),
    Connection(ConnectionGene),
}

/// The key of either kind of gene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeneKey {
    Node(NodeKey),
    Connection(ConnectionKey),
}

impl Gene {
    pub fn key(&self) -> GeneKey {
        match self {
            Gene::Node(n) => GeneKey::Node(n.key()),
            Gene::Connection(c) => GeneKey::Connection(c.key()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Gene::Node(_) => "node",
            Gene::Connection(_) => "connection",
        }
    }

    /// Crosses two genes of the same kind.
    ///
    /// # Panics
    /// This function panics if the genes are of different
    /// kinds or have different keys.
    ///
    /// # Examples
    /// ```
    /// use neatgen::genomics::{ConnectionGene, Gene};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let a = Gene::from(ConnectionGene::with_attributes((-1, 0), 1.0, true));
    /// let b = Gene::from(ConnectionGene::with_attributes((-1, 0), 2.0, false));
    ///
    /// let child = a.crossover(&b, &mut StdRng::seed_from_u64(0));
    /// assert_eq!(child.key(), a.key());
    /// ```
    pub fn crossover<R: Rng + ?Sized>(&self, other: &Gene, rng: &mut R) -> Gene {
        match (self, other) {
            (Gene::Node(a), Gene::Node(b)) => Gene::Node(a.crossover(b, rng)),
            (Gene::Connection(a), Gene::Connection(b)) => Gene::Connection(a.crossover(b, rng)),
            (a, b) => panic!("{}", GeneKindMismatch(a.kind(), b.kind())),
        }
    }

    /// # Panics
    /// This function panics if the genes are of different kinds.
    pub fn distance(&self, other: &Gene, config: &GenomeConfig) -> f64 {
        match (self, other) {
            (Gene::Node(a), Gene::Node(b)) => a.distance(b, config),
            (Gene::Connection(a), Gene::Connection(b)) => a.distance(b, config),
            (a, b) => panic!("{}", GeneKindMismatch(a.kind(), b.kind())),
        }
    }

    pub fn init_attributes<R: Rng + ?Sized>(
        &mut self,
        config: &GenomeConfig,
        rng: &mut R,
    ) -> Result<(), AttributeError> {
        match self {
            Gene::Node(n) => n.init_attributes(config.node_config(), rng),
            Gene::Connection(c) => c.init_attributes(config.connection_config(), rng),
        }
    }

    pub fn mutate<R: Rng + ?Sized>(&mut self, config: &GenomeConfig, rng: &mut R) -> Result<(), AttributeError> {
        match self {
            Gene::Node(n) => n.mutate(config.node_config(), rng),
            Gene::Connection(c) => c.mutate(config.connection_config(), rng),
        }
    }
}

impl From<NodeGene> for Gene {
    fn from(node: NodeGene) -> Self {
        Gene::Node(node)
    }
}

impl From<ConnectionGene> for Gene {
    fn from(connection: ConnectionGene) -> Self {
        Gene::Connection(connection)
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gene::Node(n) => fmt::Display::fmt(n, f),
            Gene::Connection(c) => fmt::Display::fmt(c, f),
        }
    }
}
