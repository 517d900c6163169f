use super::{AttributeConfig, AttributeSpec, ConfigItem};
use crate::config::ValueType;
use crate::errors::AttributeError;
use crate::rng;

use rand::Rng;

/// A boolean attribute, such as whether a connection is enabled.
///
/// The `default` item is one of `1`/`on`/`yes`/`true`,
/// `0`/`off`/`no`/`false`, or `random`/`none` for a coin flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoolAttribute {
    name: &'static str,
    overrides: &'static [(&'static str, &'static str)],
}

impl BoolAttribute {
    pub const fn new(name: &'static str) -> BoolAttribute {
        BoolAttribute::with_defaults(name, &[])
    }

    pub const fn with_defaults(
        name: &'static str,
        overrides: &'static [(&'static str, &'static str)],
    ) -> BoolAttribute {
        BoolAttribute { name, overrides }
    }

    /// `None` stands for a random initial value.
    fn parse_default(&self, config: &AttributeConfig) -> Result<Option<bool>, AttributeError> {
        match config.default.trim().to_lowercase().as_str() {
            "1" | "on" | "yes" | "true" => Ok(Some(true)),
            "0" | "off" | "no" | "false" => Ok(Some(false)),
            "random" | "none" => Ok(None),
            _ => Err(AttributeError::InvalidDefault {
                name: self.name.to_owned(),
                default: config.default.clone(),
            }),
        }
    }
}

impl AttributeSpec for BoolAttribute {
    type Value = bool;

    const ITEMS: &'static [ConfigItem] = &[
        ("default", ValueType::Str, None),
        ("mutate_rate", ValueType::Float, None),
        ("rate_to_true_add", ValueType::Float, Some("0.0")),
        ("rate_to_false_add", ValueType::Float, Some("0.0")),
    ];

    fn name(&self) -> &'static str {
        self.name
    }

    fn overrides(&self) -> &'static [(&'static str, &'static str)] {
        self.overrides
    }

    fn init<R: Rng + ?Sized>(&self, config: &AttributeConfig, rng: &mut R) -> Result<bool, AttributeError> {
        Ok(match self.parse_default(config)? {
            Some(value) => value,
            None => rng::coin(rng),
        })
    }

    /// The mutation chance is raised by `rate_to_false_add`
    /// for true values and `rate_to_true_add` for false ones.
    /// A mutated value is redrawn, so it may not change.
    fn mutate<R: Rng + ?Sized>(
        &self,
        value: &bool,
        config: &AttributeConfig,
        rng: &mut R,
    ) -> Result<bool, AttributeError> {
        let r = rng::unit(rng);
        let add = if *value {
            config.rate_to_false_add
        } else {
            config.rate_to_true_add
        };
        if r < config.mutate_rate + add {
            Ok(rng::coin(rng))
        } else {
            Ok(*value)
        }
    }

    fn validate(&self, config: &AttributeConfig) -> Result<(), AttributeError> {
        self.parse_default(config).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const ENABLED: BoolAttribute = BoolAttribute::new("enabled");

    fn with_default(default: &str) -> AttributeConfig {
        AttributeConfig {
            default: default.to_string(),
            ..AttributeConfig::zero()
        }
    }

    #[test]
    fn recognized_defaults_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        for token in ["1", "on", "Yes", "TRUE"] {
            let config = with_default(token);
            assert!(ENABLED.validate(&config).is_ok());
            assert_eq!(ENABLED.init(&config, &mut rng), Ok(true));
        }
        for token in ["0", "Off", "no", "false"] {
            let config = with_default(token);
            assert!(ENABLED.validate(&config).is_ok());
            assert_eq!(ENABLED.init(&config, &mut rng), Ok(false));
        }
    }

    #[test]
    fn random_default_flips_coins() {
        let mut rng = StdRng::seed_from_u64(1);
        for token in ["random", "None"] {
            let config = with_default(token);
            assert!(ENABLED.validate(&config).is_ok());
            let trues = (0..200)
                .filter(|_| ENABLED.init(&config, &mut rng).unwrap())
                .count();
            assert!(trues > 0 && trues < 200);
        }
    }

    #[test]
    fn garbage_default_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = with_default("garbage");
        let expected = Err(AttributeError::InvalidDefault {
            name: "enabled".into(),
            default: "garbage".into(),
        });
        assert_eq!(ENABLED.validate(&config), expected);
        assert_eq!(ENABLED.init(&config, &mut rng), expected.map(|()| false));
    }

    #[test]
    fn rate_adds_depend_on_current_value() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = AttributeConfig {
            rate_to_true_add: 1.0,
            ..with_default("false")
        };
        // True values have no mutation chance at all.
        for _ in 0..100 {
            assert_eq!(ENABLED.mutate(&true, &config, &mut rng), Ok(true));
        }
        // False values always redraw.
        let flipped = (0..200)
            .filter(|_| ENABLED.mutate(&false, &config, &mut rng).unwrap())
            .count();
        assert!(flipped > 0 && flipped < 200);
    }
}
