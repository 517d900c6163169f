use crate::config::ValueType;

/// An error type indicating a configuration item
/// could not be produced with its declared type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The stored text cannot be coerced to the declared type.
    #[error("config item '{name}' with value '{value}' is not a valid {expected}")]
    TypeMismatch {
        name: String,
        value: String,
        expected: ValueType,
    },
    /// The sectioned source has no such item.
    #[error("config item '{name}' not found in section '{section}'")]
    Missing { section: String, name: String },
    /// The bundle has no such item and the parameter has no default.
    #[error("missing configuration item: {0}")]
    MissingRequired(String),
    /// The bundle holds items no parameter claims.
    #[error("unknown configuration item(s): {}", .0.join(", "))]
    UnknownItems(Vec<String>),
}

/// An error type indicating an attribute's configuration
/// is inconsistent, or a value could not be drawn from it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttributeError {
    /// The maximum bound is lesser than the minimum bound.
    #[error("invalid bounds for {name}: max {max} < min {min}")]
    Bounds { name: String, min: f64, max: f64 },
    /// The float initialization distribution is not recognized.
    #[error("unknown init_type '{init_type}' for {name}")]
    UnknownInitType { name: String, init_type: String },
    /// The default token is not recognized, or is not
    /// one of the allowed options.
    #[error("invalid default value '{default}' for {name}")]
    InvalidDefault { name: String, default: String },
    /// A random draw was required but no options are configured.
    #[error("no options provided for {0}")]
    EmptyOptionSet(String),
}

/// An error type indicating the structural
/// genome configuration is invalid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenomeConfigError {
    /// The initial connection descriptor names no known policy.
    #[error("unknown initial_connection '{0}'")]
    UnknownInitialConnection(String),
    /// A partial policy was given without a fraction,
    /// or with one that is not a number.
    #[error("initial_connection '{0}' requires a connection fraction")]
    MissingConnectionFraction(String),
    /// The partial connection fraction is outside [0.0, 1.0].
    #[error("partial connection fraction {0} must be between 0.0 and 1.0")]
    ConnectionFractionRange(f64),
    /// The structural mutation surer token is not recognized.
    #[error("invalid structural_mutation_surer '{0}'")]
    InvalidSurer(String),
}

/// An error type indicating crossover or distance was
/// attempted between genes of different kinds.
///
/// This is a contract violation; it is only ever
/// reported through a panic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("mismatched gene kinds: {0} and {1}")]
pub struct GeneKindMismatch(pub &'static str, pub &'static str);

/// Any error surfaced by the genome core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
    #[error(transparent)]
    GenomeConfig(#[from] GenomeConfigError),
}
