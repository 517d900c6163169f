use super::ValueType;
use crate::errors::ConfigError;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::hash::BuildHasher;

/// An in-memory mapping from item names to their raw text.
///
/// # Examples
/// ```
/// use neatgen::config::ConfigBundle;
///
/// let bundle: ConfigBundle = [("num_inputs", "2"), ("num_outputs", "1")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(bundle.get("num_inputs"), Some("2"));
/// assert_eq!(bundle.get("num_hidden"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigBundle {
    items: HashMap<String, String, RandomState>,
}

impl ConfigBundle {
    /// Returns an empty bundle.
    pub fn new() -> ConfigBundle {
        ConfigBundle::default()
    }

    /// Sets an item's text, returning the previous text if any.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.items.insert(name.into(), text.into())
    }

    /// Removes an item, returning its text if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.items.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.items.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Returns an iterator over the item names.
    ///
    /// # Notes
    /// No ordering is guaranteed.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ConfigBundle {
            items: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A sectioned store from which typed items can be fetched.
///
/// Implementors only provide raw lookup; the typed getters
/// share coercion rules and error reporting.
pub trait ConfigSource {
    /// Returns the raw text of `name` in `section`, if present.
    fn raw(&self, section: &str, name: &str) -> Option<&str>;

    /// # Errors
    /// Returns [`ConfigError::Missing`] if the item is absent.
    fn get_str(&self, section: &str, name: &str) -> Result<String, ConfigError> {
        require(self.raw(section, name), section, name).map(str::to_owned)
    }

    /// # Errors
    /// Returns [`ConfigError::Missing`] if the item is absent, or
    /// [`ConfigError::TypeMismatch`] if it is not an integer.
    fn get_int(&self, section: &str, name: &str) -> Result<i64, ConfigError> {
        let text = require(self.raw(section, name), section, name)?;
        text.trim()
            .parse()
            .map_err(|_| mismatch(name, text, ValueType::Int))
    }

    /// # Errors
    /// Returns [`ConfigError::Missing`] if the item is absent, or
    /// [`ConfigError::TypeMismatch`] if it is not a float.
    fn get_float(&self, section: &str, name: &str) -> Result<f64, ConfigError> {
        let text = require(self.raw(section, name), section, name)?;
        text.trim()
            .parse()
            .map_err(|_| mismatch(name, text, ValueType::Float))
    }

    /// Accepts `1`, `yes`, `true`, `on` and `0`, `no`, `false`, `off`,
    /// in any casing.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] if the item is absent, or
    /// [`ConfigError::TypeMismatch`] for any other token.
    fn get_bool(&self, section: &str, name: &str) -> Result<bool, ConfigError> {
        let text = require(self.raw(section, name), section, name)?;
        match text.trim().to_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            _ => Err(mismatch(name, text, ValueType::Bool)),
        }
    }

    /// # Errors
    /// Returns [`ConfigError::Missing`] if the item is absent.
    fn get_list(&self, section: &str, name: &str) -> Result<Vec<String>, ConfigError> {
        let text = require(self.raw(section, name), section, name)?;
        Ok(text.split_whitespace().map(str::to_owned).collect())
    }
}

/// Sections keyed by name, each holding a bundle of items.
impl<S: BuildHasher> ConfigSource for HashMap<String, ConfigBundle, S> {
    fn raw(&self, section: &str, name: &str) -> Option<&str> {
        self.get(section)?.get(name)
    }
}

fn require<'a>(text: Option<&'a str>, section: &str, name: &str) -> Result<&'a str, ConfigError> {
    text.ok_or_else(|| ConfigError::Missing {
        section: section.to_owned(),
        name: name.to_owned(),
    })
}

fn mismatch(name: &str, text: &str, expected: ValueType) -> ConfigError {
    ConfigError::TypeMismatch {
        name: name.to_owned(),
        value: text.to_owned(),
        expected,
    }
}
