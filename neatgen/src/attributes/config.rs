use crate::config::{ConfigValue, ValueType};

use serde::{Deserialize, Serialize};

/// The flat set of parameters governing one attribute.
///
/// Every attribute kind reads only the fields relevant
/// to it; the rest keep their zero values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeConfig {
    /// Mean of the initial value distribution.
    pub init_mean: f64,
    /// Standard deviation of the initial value distribution.
    pub init_stdev: f64,
    /// Initial distribution: `gaussian`/`normal` or `uniform`.
    pub init_type: String,
    /// Chance of the value being replaced by a fresh initial value.
    pub replace_rate: f64,
    /// Chance of the value being perturbed (numeric kinds)
    /// or redrawn (boolean and string kinds).
    pub mutate_rate: f64,
    /// Standard deviation of the perturbation.
    pub mutate_power: f64,
    pub max_value: f64,
    pub min_value: f64,
    /// Initial value token for boolean and string kinds.
    pub default: String,
    /// Extra mutation chance for booleans currently false.
    pub rate_to_true_add: f64,
    /// Extra mutation chance for booleans currently true.
    pub rate_to_false_add: f64,
    /// Allowed values for string kinds.
    pub options: Vec<String>,
}

impl AttributeConfig {
    /// Returns a "zero-valued" configuration.
    /// All values are 0 or empty.
    pub const fn zero() -> AttributeConfig {
        AttributeConfig {
            init_mean: 0.0,
            init_stdev: 0.0,
            init_type: String::new(),
            replace_rate: 0.0,
            mutate_rate: 0.0,
            mutate_power: 0.0,
            max_value: 0.0,
            min_value: 0.0,
            default: String::new(),
            rate_to_true_add: 0.0,
            rate_to_false_add: 0.0,
            options: vec![],
        }
    }

    /// Sets the field named by `item` from an interpreted value.
    /// Unrecognized items and values of an unusable type
    /// leave the configuration unchanged and return `false`.
    ///
    /// # Examples
    /// ```
    /// use neatgen::attributes::AttributeConfig;
    /// use neatgen::config::ConfigValue;
    ///
    /// let mut config = AttributeConfig::zero();
    /// assert!(config.assign("max_value", &ConfigValue::Int(30)));
    /// assert!(!config.assign("colour", &ConfigValue::Int(3)));
    /// assert_eq!(config.max_value, 30.0);
    /// ```
    pub fn assign(&mut self, item: &str, value: &ConfigValue) -> bool {
        let number = match item {
            "init_mean" => &mut self.init_mean,
            "init_stdev" => &mut self.init_stdev,
            "replace_rate" => &mut self.replace_rate,
            "mutate_rate" => &mut self.mutate_rate,
            "mutate_power" => &mut self.mutate_power,
            "max_value" => &mut self.max_value,
            "min_value" => &mut self.min_value,
            "rate_to_true_add" => &mut self.rate_to_true_add,
            "rate_to_false_add" => &mut self.rate_to_false_add,
            "init_type" | "default" => {
                let text = match value {
                    ConfigValue::StrList(_) => return false,
                    other => other.to_string(),
                };
                if item == "init_type" {
                    self.init_type = text;
                } else {
                    self.default = text;
                }
                return true;
            }
            "options" => {
                return match value {
                    ConfigValue::StrList(list) => {
                        self.options = list.clone();
                        true
                    }
                    ConfigValue::Str(s) => {
                        self.options = s.split_whitespace().map(str::to_owned).collect();
                        true
                    }
                    _ => false,
                };
            }
            _ => return false,
        };
        match value.as_float() {
            Some(x) => {
                *number = x;
                true
            }
            None => false,
        }
    }

    /// Returns the field named by `item` as a value of `value_type`.
    /// Numeric fields declared as integers are rounded.
    pub fn value(&self, item: &str, value_type: ValueType) -> Option<ConfigValue> {
        let number = match item {
            "init_mean" => self.init_mean,
            "init_stdev" => self.init_stdev,
            "replace_rate" => self.replace_rate,
            "mutate_rate" => self.mutate_rate,
            "mutate_power" => self.mutate_power,
            "max_value" => self.max_value,
            "min_value" => self.min_value,
            "rate_to_true_add" => self.rate_to_true_add,
            "rate_to_false_add" => self.rate_to_false_add,
            "init_type" => return Some(ConfigValue::Str(self.init_type.clone())),
            "default" => return Some(ConfigValue::Str(self.default.clone())),
            "options" => return Some(ConfigValue::StrList(self.options.clone())),
            _ => return None,
        };
        Some(match value_type {
            ValueType::Int => ConfigValue::Int(number.round() as i64),
            _ => ConfigValue::Float(number),
        })
    }
}

impl Default for AttributeConfig {
    fn default() -> Self {
        AttributeConfig::zero()
    }
}
