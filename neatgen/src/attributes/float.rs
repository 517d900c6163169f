use super::{AttributeConfig, AttributeSpec, ConfigItem};
use crate::config::ValueType;
use crate::errors::AttributeError;
use crate::rng;

use rand::Rng;

/// A real-valued attribute, such as a bias or a weight.
///
/// # Examples
/// ```
/// use neatgen::attributes::{AttributeConfig, AttributeSpec, FloatAttribute};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let bias = FloatAttribute::new("bias");
/// let config = AttributeConfig {
///     init_mean: 0.0,
///     init_stdev: 1.0,
///     init_type: "gaussian".to_string(),
///     mutate_rate: 0.7,
///     mutate_power: 0.5,
///     replace_rate: 0.1,
///     min_value: -30.0,
///     max_value: 30.0,
///     ..AttributeConfig::zero()
/// };
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let value = bias.init(&config, &mut rng).unwrap();
/// let mutated = bias.mutate(&value, &config, &mut rng).unwrap();
/// assert!((-30.0..=30.0).contains(&mutated));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloatAttribute {
    name: &'static str,
    overrides: &'static [(&'static str, &'static str)],
}

impl FloatAttribute {
    pub const fn new(name: &'static str) -> FloatAttribute {
        FloatAttribute::with_defaults(name, &[])
    }

    /// Creates an attribute whose listed items
    /// default to the given text.
    pub const fn with_defaults(
        name: &'static str,
        overrides: &'static [(&'static str, &'static str)],
    ) -> FloatAttribute {
        FloatAttribute { name, overrides }
    }

    fn clamp(value: f64, config: &AttributeConfig) -> f64 {
        value.max(config.min_value).min(config.max_value)
    }
}

impl AttributeSpec for FloatAttribute {
    type Value = f64;

    const ITEMS: &'static [ConfigItem] = &[
        ("init_mean", ValueType::Float, None),
        ("init_stdev", ValueType::Float, None),
        ("init_type", ValueType::Str, Some("gaussian")),
        ("replace_rate", ValueType::Float, None),
        ("mutate_rate", ValueType::Float, None),
        ("mutate_power", ValueType::Float, None),
        ("max_value", ValueType::Float, None),
        ("min_value", ValueType::Float, None),
    ];

    fn name(&self) -> &'static str {
        self.name
    }

    fn overrides(&self) -> &'static [(&'static str, &'static str)] {
        self.overrides
    }

    /// Gaussian draws are clamped to the bounds. Uniform draws
    /// cover two deviations either side of the mean, cut to
    /// the bounds.
    fn init<R: Rng + ?Sized>(&self, config: &AttributeConfig, rng: &mut R) -> Result<f64, AttributeError> {
        let init_type = config.init_type.to_lowercase();
        if init_type.contains("gauss") || init_type.contains("normal") {
            let value = rng::gaussian(rng, config.init_mean, config.init_stdev);
            Ok(FloatAttribute::clamp(value, config))
        } else if init_type.contains("uniform") {
            let low = config.min_value.max(config.init_mean - 2.0 * config.init_stdev);
            let high = config.max_value.min(config.init_mean + 2.0 * config.init_stdev);
            let value = low + rng::unit(rng) * (high - low);
            Ok(FloatAttribute::clamp(value, config))
        } else {
            Err(AttributeError::UnknownInitType {
                name: self.name.to_owned(),
                init_type: config.init_type.clone(),
            })
        }
    }

    fn mutate<R: Rng + ?Sized>(
        &self,
        value: &f64,
        config: &AttributeConfig,
        rng: &mut R,
    ) -> Result<f64, AttributeError> {
        let r = rng::unit(rng);
        if r < config.mutate_rate {
            let delta = rng::gaussian(rng, 0.0, config.mutate_power);
            Ok(FloatAttribute::clamp(value + delta, config))
        } else if r < config.mutate_rate + config.replace_rate {
            self.init(config, rng)
        } else {
            Ok(*value)
        }
    }

    fn validate(&self, config: &AttributeConfig) -> Result<(), AttributeError> {
        if config.max_value < config.min_value {
            return Err(AttributeError::Bounds {
                name: self.name.to_owned(),
                min: config.min_value,
                max: config.max_value,
            });
        }
        Ok(())
    }
}
