//! Named, typed mutation policies for gene fields.
//!
//! Each attribute reads its parameters from configuration items
//! named `"{attribute}_{item}"`, e.g. `bias_mutate_rate`.

mod boolean;
mod config;
mod float;
mod integer;
mod string;

pub use boolean::BoolAttribute;
pub use config::AttributeConfig;
pub use float::FloatAttribute;
pub use integer::IntegerAttribute;
pub use string::StringAttribute;

use crate::config::{ConfigBundle, ConfigParameter, ConfigValues, ValueType};
use crate::diagnostics::Diagnostics;
use crate::errors::{AttributeError, ConfigError};

use rand::Rng;

/// A configuration item an attribute kind reads:
/// item suffix, declared type and default text.
pub type ConfigItem = (&'static str, ValueType, Option<&'static str>);

/// Initialization, mutation and validation
/// policy for one kind of gene field.
pub trait AttributeSpec {
    /// The type of the field this attribute governs.
    type Value;

    /// The items this kind of attribute is configured by.
    const ITEMS: &'static [ConfigItem];

    /// The attribute's name, prefixed to all of its config items.
    fn name(&self) -> &'static str;

    /// Per-attribute replacements for item defaults,
    /// as `(item, default text)` pairs.
    fn overrides(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    fn config_item_name(&self, item: &str) -> String {
        format!("{}_{}", self.name(), item)
    }

    /// Returns the full parameter declarations for this attribute.
    ///
    /// # Errors
    /// Returns [`ConfigError::TypeMismatch`] if an
    /// overriding default does not have its item's type.
    fn config_params(&self) -> Result<Vec<ConfigParameter>, ConfigError> {
        Self::ITEMS
            .iter()
            .map(|&(item, value_type, default)| {
                let name = self.config_item_name(item);
                let default = self
                    .overrides()
                    .iter()
                    .find(|(overridden, _)| *overridden == item)
                    .map(|&(_, text)| text)
                    .or(default);
                Ok(match default {
                    Some(text) => {
                        let value = value_type.coerce(&name, text)?;
                        ConfigParameter::with_default(name, value_type, value)
                    }
                    None => ConfigParameter::new(name, value_type),
                })
            })
            .collect()
    }

    /// Interprets this attribute's items from `bundle`.
    /// Items belonging to other attributes are ignored.
    ///
    /// # Errors
    /// Returns any error raised interpreting one of the items.
    fn read_config(
        &self,
        bundle: &ConfigBundle,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<AttributeConfig, ConfigError> {
        let mut values = ConfigValues::default();
        for param in self.config_params()? {
            let value = param.interpret(bundle, diagnostics)?;
            values.insert(param.name, value);
        }
        Ok(self.extract_config(&values))
    }

    /// Collects this attribute's items from already interpreted values.
    fn extract_config(&self, values: &ConfigValues) -> AttributeConfig {
        let mut config = AttributeConfig::zero();
        for &(item, ..) in Self::ITEMS {
            if let Some(value) = values.get(&self.config_item_name(item)) {
                config.assign(item, value);
            }
        }
        config
    }

    /// Writes this attribute's items from `config` as text.
    fn write_config(&self, config: &AttributeConfig, bundle: &mut ConfigBundle) {
        for &(item, value_type, _) in Self::ITEMS {
            if let Some(value) = config.value(item, value_type) {
                bundle.insert(self.config_item_name(item), value.to_string());
            }
        }
    }

    /// Draws an initial value.
    fn init<R: Rng + ?Sized>(
        &self,
        config: &AttributeConfig,
        rng: &mut R,
    ) -> Result<Self::Value, AttributeError>;

    /// Returns `value`, possibly changed.
    fn mutate<R: Rng + ?Sized>(
        &self,
        value: &Self::Value,
        config: &AttributeConfig,
        rng: &mut R,
    ) -> Result<Self::Value, AttributeError>;

    /// Checks `config` is consistent for this attribute.
    fn validate(&self, config: &AttributeConfig) -> Result<(), AttributeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigValue;

    const AGGREGATION: StringAttribute = StringAttribute::with_defaults("aggregation", &[("options", "sum")]);

    #[test]
    fn item_names_are_prefixed() {
        let names: Vec<String> = FloatAttribute::new("bias")
            .config_params()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "bias_init_mean",
                "bias_init_stdev",
                "bias_init_type",
                "bias_replace_rate",
                "bias_mutate_rate",
                "bias_mutate_power",
                "bias_max_value",
                "bias_min_value",
            ]
        );
    }

    #[test]
    fn overrides_replace_defaults() {
        let params = AGGREGATION.config_params().unwrap();
        let options = params.iter().find(|p| p.name == "aggregation_options").unwrap();
        assert_eq!(options.default, Some(ConfigValue::StrList(vec!["sum".into()])));
        let default = params.iter().find(|p| p.name == "aggregation_default").unwrap();
        assert_eq!(default.default, Some(ConfigValue::Str("random".into())));
    }

    #[test]
    fn read_config_ignores_foreign_items() {
        let bundle: ConfigBundle = [
            ("enabled_default", "True"),
            ("enabled_mutate_rate", "0.01"),
            ("weight_mutate_rate", "0.8"),
        ]
        .into_iter()
        .collect();
        let mut warnings: Vec<String> = vec![];
        let config = BoolAttribute::new("enabled")
            .read_config(&bundle, &mut warnings)
            .unwrap();
        assert_eq!(config.default, "True");
        assert_eq!(config.mutate_rate, 0.01);
        assert_eq!(config.rate_to_true_add, 0.0);
        // Both rate adds fell back to their defaults.
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn read_config_requires_items_without_defaults() {
        let bundle: ConfigBundle = [("enabled_default", "True")].into_iter().collect();
        assert_eq!(
            BoolAttribute::new("enabled").read_config(&bundle, &mut Vec::<String>::new()),
            Err(ConfigError::MissingRequired("enabled_mutate_rate".into()))
        );
    }
}
