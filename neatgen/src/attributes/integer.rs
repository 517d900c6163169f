use super::{AttributeConfig, AttributeSpec, ConfigItem};
use crate::config::ValueType;
use crate::errors::AttributeError;
use crate::rng;

use rand::Rng;

/// An integer-valued attribute. Initial values are uniform
/// over the bounds; perturbations are rounded gaussian steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegerAttribute {
    name: &'static str,
    overrides: &'static [(&'static str, &'static str)],
}

impl IntegerAttribute {
    pub const fn new(name: &'static str) -> IntegerAttribute {
        IntegerAttribute::with_defaults(name, &[])
    }

    pub const fn with_defaults(
        name: &'static str,
        overrides: &'static [(&'static str, &'static str)],
    ) -> IntegerAttribute {
        IntegerAttribute { name, overrides }
    }

    fn bounds(&self, config: &AttributeConfig) -> Result<(i64, i64), AttributeError> {
        let (min, max) = (config.min_value.round(), config.max_value.round());
        if max < min {
            return Err(AttributeError::Bounds {
                name: self.name.to_owned(),
                min,
                max,
            });
        }
        Ok((min as i64, max as i64))
    }
}

impl AttributeSpec for IntegerAttribute {
    type Value = i64;

    const ITEMS: &'static [ConfigItem] = &[
        ("replace_rate", ValueType::Float, None),
        ("mutate_rate", ValueType::Float, None),
        ("mutate_power", ValueType::Float, None),
        ("max_value", ValueType::Int, None),
        ("min_value", ValueType::Int, None),
    ];

    fn name(&self) -> &'static str {
        self.name
    }

    fn overrides(&self) -> &'static [(&'static str, &'static str)] {
        self.overrides
    }

    fn init<R: Rng + ?Sized>(&self, config: &AttributeConfig, rng: &mut R) -> Result<i64, AttributeError> {
        let (min, max) = self.bounds(config)?;
        Ok(rng.gen_range(min..=max))
    }

    fn mutate<R: Rng + ?Sized>(
        &self,
        value: &i64,
        config: &AttributeConfig,
        rng: &mut R,
    ) -> Result<i64, AttributeError> {
        let r = rng::unit(rng);
        if r < config.mutate_rate {
            let (min, max) = self.bounds(config)?;
            let delta = rng::gaussian(rng, 0.0, config.mutate_power).round() as i64;
            Ok(value.saturating_add(delta).clamp(min, max))
        } else if r < config.mutate_rate + config.replace_rate {
            self.init(config, rng)
        } else {
            Ok(*value)
        }
    }

    fn validate(&self, config: &AttributeConfig) -> Result<(), AttributeError> {
        self.bounds(config).map(|_| ())
    }
}
