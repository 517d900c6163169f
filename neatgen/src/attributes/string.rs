use super::{AttributeConfig, AttributeSpec, ConfigItem};
use crate::config::ValueType;
use crate::errors::AttributeError;
use crate::rng;

use rand::seq::SliceRandom;
use rand::Rng;

/// An attribute taking one of a configured set of names,
/// such as an activation function.
///
/// # Examples
/// ```
/// use neatgen::attributes::{AttributeConfig, AttributeSpec, StringAttribute};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let activation = StringAttribute::new("activation");
/// let config = AttributeConfig {
///     default: "random".to_string(),
///     options: vec!["sigmoid".to_string(), "tanh".to_string()],
///     ..AttributeConfig::zero()
/// };
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let value = activation.init(&config, &mut rng).unwrap();
/// assert!(config.options.contains(&value));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StringAttribute {
    name: &'static str,
    overrides: &'static [(&'static str, &'static str)],
}

impl StringAttribute {
    pub const fn new(name: &'static str) -> StringAttribute {
        StringAttribute::with_defaults(name, &[])
    }

    pub const fn with_defaults(
        name: &'static str,
        overrides: &'static [(&'static str, &'static str)],
    ) -> StringAttribute {
        StringAttribute { name, overrides }
    }

    fn is_random(default: &str) -> bool {
        matches!(default.to_lowercase().as_str(), "none" | "random")
    }

    fn choose<R: Rng + ?Sized>(&self, config: &AttributeConfig, rng: &mut R) -> Result<String, AttributeError> {
        config
            .options
            .choose(rng)
            .cloned()
            .ok_or_else(|| AttributeError::EmptyOptionSet(self.name.to_owned()))
    }
}

impl AttributeSpec for StringAttribute {
    type Value = String;

    const ITEMS: &'static [ConfigItem] = &[
        ("default", ValueType::Str, Some("random")),
        ("options", ValueType::StrList, None),
        ("mutate_rate", ValueType::Float, None),
    ];

    fn name(&self) -> &'static str {
        self.name
    }

    fn overrides(&self) -> &'static [(&'static str, &'static str)] {
        self.overrides
    }

    fn init<R: Rng + ?Sized>(&self, config: &AttributeConfig, rng: &mut R) -> Result<String, AttributeError> {
        if StringAttribute::is_random(&config.default) {
            self.choose(config, rng)
        } else {
            Ok(config.default.clone())
        }
    }

    fn mutate<R: Rng + ?Sized>(
        &self,
        value: &String,
        config: &AttributeConfig,
        rng: &mut R,
    ) -> Result<String, AttributeError> {
        if config.mutate_rate > 0.0 && rng::unit(rng) < config.mutate_rate {
            self.choose(config, rng)
        } else {
            Ok(value.clone())
        }
    }

    fn validate(&self, config: &AttributeConfig) -> Result<(), AttributeError> {
        if StringAttribute::is_random(&config.default) || config.options.contains(&config.default) {
            Ok(())
        } else {
            Err(AttributeError::InvalidDefault {
                name: self.name.to_owned(),
                default: config.default.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const ACTIVATION: StringAttribute = StringAttribute::new("activation");

    fn config(default: &str, options: &[&str], mutate_rate: f64) -> AttributeConfig {
        AttributeConfig {
            default: default.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            mutate_rate,
            ..AttributeConfig::zero()
        }
    }

    #[test]
    fn fixed_default_is_verbatim() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = config("tanh", &["sigmoid", "tanh"], 0.0);
        assert!(ACTIVATION.validate(&config).is_ok());
        assert_eq!(ACTIVATION.init(&config, &mut rng), Ok("tanh".to_string()));
    }

    #[test]
    fn random_default_needs_options() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = config("None", &[], 0.5);
        assert!(ACTIVATION.validate(&config).is_ok());
        assert_eq!(
            ACTIVATION.init(&config, &mut rng),
            Err(AttributeError::EmptyOptionSet("activation".into()))
        );
    }

    #[test]
    fn default_outside_options_fails() {
        let config = config("relu", &["sigmoid", "tanh"], 0.0);
        assert_eq!(
            ACTIVATION.validate(&config),
            Err(AttributeError::InvalidDefault {
                name: "activation".into(),
                default: "relu".into()
            })
        );
    }

    #[test]
    fn mutation_picks_from_options() {
        let mut rng = StdRng::seed_from_u64(2);
        let still = config("sigmoid", &["sigmoid", "tanh"], 0.0);
        assert_eq!(
            ACTIVATION.mutate(&"gauss".to_string(), &still, &mut rng),
            Ok("gauss".to_string())
        );
        let always = config("sigmoid", &["tanh"], 1.0);
        assert_eq!(
            ACTIVATION.mutate(&"sigmoid".to_string(), &always, &mut rng),
            Ok("tanh".to_string())
        );
    }
}
