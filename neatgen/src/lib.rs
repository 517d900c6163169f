//! Genome encoding for NeuroEvolution of Augmenting Topologies,
//! following the 2002 paper: <http://nn.cs.utexas.edu/keyword?stanley:ec02>
//!
//! A [`Genome`] is a set of node genes and connection genes,
//! each carrying attributes (bias, response, activation and
//! aggregation for nodes; weight and enabled state for
//! connections) whose initialization and mutation are driven
//! entirely by configuration. Genomes can be built from any
//! of several initial connectivity policies, mutated structurally
//! and parametrically, recombined, compared by genetic distance
//! and pruned of genes that cannot affect their outputs.
//!
//! Configuration is read from flat name/value bundles, typically
//! one section of an INI-like file. Substituted defaults and
//! questionable settings are reported through a [`Diagnostics`]
//! sink rather than printed.
//!
//! [`Diagnostics`]: diagnostics::Diagnostics
//!
//! # Example usage
//! ```
//! use neatgen::genomics::{ConnectionGeneConfig, GenomeParams, InitialConnection, NodeGeneConfig};
//! use neatgen::{Genome, GenomeConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let params = GenomeParams {
//!     num_inputs: 2,
//!     num_outputs: 1,
//!     num_hidden: 1,
//!     feed_forward: true,
//!     compatibility_disjoint_coefficient: 1.0,
//!     compatibility_weight_coefficient: 0.5,
//!     conn_add_prob: 0.5,
//!     node_add_prob: 0.2,
//!     initial_connection: InitialConnection::FullNoDirect,
//!     ..GenomeParams::zero()
//! };
//! let mut config =
//!     GenomeConfig::new(params, NodeGeneConfig::zero(), ConnectionGeneConfig::zero()).unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let mut a = Genome::new(0);
//! a.configure_new(&mut config, &mut rng).unwrap();
//! let mut b = a.clone();
//! for _ in 0..10 {
//!     b.mutate(&mut config, &mut rng).unwrap();
//! }
//! a.set_fitness(1.0);
//! b.set_fitness(2.0);
//!
//! let child = Genome::crossover(2, &a, &b, &mut rng);
//! assert!(child.distance(&a, &config) >= 0.0);
//!
//! let pruned = child.get_pruned_copy(&config);
//! assert!(pruned.nodes().len() <= child.nodes().len());
//! println!("{}", serde_json::to_string(&pruned).unwrap());
//! ```

pub mod attributes;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod genomics;
mod rng;

pub use errors::Error;
pub use genomics::{Genome, GenomeConfig};

/// Identifies a node gene. Inputs are negative,
/// outputs start at 0, hidden nodes follow the outputs.
pub type NodeKey = i64;
/// Identifies a connection gene by the
/// nodes it leaves and enters.
pub type ConnectionKey = (NodeKey, NodeKey);
pub type GenomeKey = u64;
