use super::{ConfigBundle, ConfigSource, ConfigValue, ValueType};
use crate::diagnostics::Diagnostics;
use crate::errors::ConfigError;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

/// A declared configuration item.
///
/// # Examples
/// ```
/// use neatgen::config::{ConfigBundle, ConfigParameter, ConfigValue, ValueType};
///
/// let param = ConfigParameter::with_default("feed_forward", ValueType::Bool, ConfigValue::Bool(true));
/// let mut warnings: Vec<String> = vec![];
///
/// // Absent items fall back to the default, with a warning.
/// let value = param.interpret(&ConfigBundle::new(), &mut warnings).unwrap();
/// assert_eq!(value, ConfigValue::Bool(true));
/// assert_eq!(warnings.len(), 1);
///
/// let bundle: ConfigBundle = [("feed_forward", "false")].into_iter().collect();
/// let value = param.interpret(&bundle, &mut warnings).unwrap();
/// assert_eq!(param.format(&value), "False");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigParameter {
    pub name: String,
    pub value_type: ValueType,
    pub default: Option<ConfigValue>,
}

impl ConfigParameter {
    /// Declares a required item.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> ConfigParameter {
        ConfigParameter {
            name: name.into(),
            value_type,
            default: None,
        }
    }

    /// Declares an item that falls back to `default` when absent.
    pub fn with_default(
        name: impl Into<String>,
        value_type: ValueType,
        default: ConfigValue,
    ) -> ConfigParameter {
        ConfigParameter {
            name: name.into(),
            value_type,
            default: Some(default),
        }
    }

    /// Reads this item from `section` of a sectioned source.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] if the item is absent,
    /// or [`ConfigError::TypeMismatch`] if its text does not
    /// have the declared type.
    pub fn parse<S: ConfigSource + ?Sized>(
        &self,
        section: &str,
        source: &S,
    ) -> Result<ConfigValue, ConfigError> {
        let name = self.name.as_str();
        Ok(match self.value_type {
            ValueType::Int => ConfigValue::Int(source.get_int(section, name)?),
            ValueType::Bool => ConfigValue::Bool(source.get_bool(section, name)?),
            ValueType::Float => ConfigValue::Float(source.get_float(section, name)?),
            ValueType::Str => ConfigValue::Str(source.get_str(section, name)?),
            ValueType::StrList => ConfigValue::StrList(source.get_list(section, name)?),
        })
    }

    /// Like [`parse`], but substitutes the default, if any,
    /// for a missing or malformed item.
    ///
    /// # Errors
    /// Returns the parse error if there is no default.
    ///
    /// [`parse`]: ConfigParameter::parse
    pub fn parse_or_default<S: ConfigSource + ?Sized>(
        &self,
        section: &str,
        source: &S,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<ConfigValue, ConfigError> {
        match (self.parse(section, source), &self.default) {
            (Ok(value), _) => Ok(value),
            (Err(e), Some(default)) => {
                diagnostics.warn(&format!(
                    "{}; using default {} for '{}'",
                    e, default, self.name
                ));
                Ok(default.clone())
            }
            (Err(e), None) => Err(e),
        }
    }

    /// Reads this item from an in-memory bundle.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingRequired`] if the item is absent
    /// and has no default, or [`ConfigError::TypeMismatch`] if its
    /// text does not have the declared type.
    pub fn interpret(
        &self,
        bundle: &ConfigBundle,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<ConfigValue, ConfigError> {
        match (bundle.get(&self.name), &self.default) {
            (Some(text), _) => self.value_type.coerce(&self.name, text),
            (None, Some(default)) => {
                diagnostics.warn(&format!("Using default {} for '{}'", default, self.name));
                Ok(default.clone())
            }
            (None, None) => Err(ConfigError::MissingRequired(self.name.clone())),
        }
    }

    /// Renders `value` as configuration text.
    pub fn format(&self, value: &ConfigValue) -> String {
        value.to_string()
    }
}

impl fmt::Display for ConfigParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigParameter({:?}, {:?}", self.name, self.value_type.to_string())?;
        if let Some(default) = &self.default {
            write!(f, ", {:?}", default.to_string())?;
        }
        f.write_str(")")
    }
}

/// Interpreted values, keyed by item name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigValues {
    values: HashMap<String, ConfigValue, RandomState>,
}

impl ConfigValues {
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ConfigValue) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: ValueType,
        extract: impl FnOnce(&'a ConfigValue) -> Option<T>,
    ) -> Result<T, ConfigError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ConfigError::MissingRequired(name.to_owned()))?;
        extract(value).ok_or_else(|| ConfigError::TypeMismatch {
            name: name.to_owned(),
            value: value.to_string(),
            expected,
        })
    }

    pub fn int(&self, name: &str) -> Result<i64, ConfigError> {
        self.typed(name, ValueType::Int, ConfigValue::as_int)
    }

    /// Integers are accepted and widened.
    pub fn float(&self, name: &str) -> Result<f64, ConfigError> {
        self.typed(name, ValueType::Float, ConfigValue::as_float)
    }

    pub fn bool(&self, name: &str) -> Result<bool, ConfigError> {
        self.typed(name, ValueType::Bool, ConfigValue::as_bool)
    }

    pub fn str(&self, name: &str) -> Result<&str, ConfigError> {
        self.typed(name, ValueType::Str, ConfigValue::as_str)
    }

    pub fn list(&self, name: &str) -> Result<&[String], ConfigError> {
        self.typed(name, ValueType::StrList, ConfigValue::as_list)
    }

    /// A non-negative integer item.
    pub fn count(&self, name: &str) -> Result<usize, ConfigError> {
        self.typed(name, ValueType::Int, |v| {
            v.as_int().and_then(|i| usize::try_from(i).ok())
        })
    }
}

/// Interprets every parameter in `params` from `bundle`.
///
/// # Errors
/// Returns [`ConfigError::UnknownItems`] if the bundle
/// holds items none of the parameters declare, or the
/// first error raised by [`ConfigParameter::interpret`].
pub fn interpret_all(
    params: &[ConfigParameter],
    bundle: &ConfigBundle,
    diagnostics: &mut dyn Diagnostics,
) -> Result<ConfigValues, ConfigError> {
    let mut unknown: Vec<String> = bundle
        .names()
        .filter(|name| !params.iter().any(|p| p.name == *name))
        .map(str::to_owned)
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        return Err(ConfigError::UnknownItems(unknown));
    }

    let mut values = ConfigValues::default();
    for param in params {
        values.insert(param.name.clone(), param.interpret(bundle, diagnostics)?);
    }
    Ok(values)
}
