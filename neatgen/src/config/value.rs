use crate::errors::ConfigError;

use serde::{Deserialize, Serialize};

use std::fmt;

/// The declared type of a configuration item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Int,
    Bool,
    Float,
    Str,
    /// Whitespace-delimited list of strings.
    StrList,
}

impl ValueType {
    /// Coerces raw text into a value of this type.
    ///
    /// Booleans only accept `true` or `false`, in any casing.
    ///
    /// # Errors
    /// Returns [`ConfigError::TypeMismatch`] if the text
    /// does not represent a value of this type.
    ///
    /// # Examples
    /// ```
    /// use neatgen::config::{ConfigValue, ValueType};
    ///
    /// assert_eq!(ValueType::Int.coerce("pop_size", " 150 ").unwrap(), ConfigValue::Int(150));
    /// assert_eq!(ValueType::Bool.coerce("feed_forward", "True").unwrap(), ConfigValue::Bool(true));
    /// assert!(ValueType::Bool.coerce("feed_forward", "yes").is_err());
    /// ```
    pub fn coerce(self, name: &str, text: &str) -> Result<ConfigValue, ConfigError> {
        let mismatch = || ConfigError::TypeMismatch {
            name: name.to_owned(),
            value: text.to_owned(),
            expected: self,
        };
        match self {
            Self::Int => text.trim().parse().map(ConfigValue::Int).map_err(|_| mismatch()),
            Self::Float => text
                .trim()
                .parse()
                .map(ConfigValue::Float)
                .map_err(|_| mismatch()),
            Self::Bool => match text.trim().to_lowercase().as_str() {
                "true" => Ok(ConfigValue::Bool(true)),
                "false" => Ok(ConfigValue::Bool(false)),
                _ => Err(mismatch()),
            },
            Self::Str => Ok(ConfigValue::Str(text.to_owned())),
            Self::StrList => Ok(ConfigValue::StrList(
                text.split_whitespace().map(str::to_owned).collect(),
            )),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Str => "str",
            Self::StrList => "list",
        })
    }
}

/// A configuration value of one of the supported types.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConfigValue {
    Int(i64),
    Bool(bool),
    Float(f64),
    Str(String),
    StrList(Vec<String>),
}

impl ConfigValue {
    /// Returns the type of the contained value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Int(_) => ValueType::Int,
            Self::Bool(_) => ValueType::Bool,
            Self::Float(_) => ValueType::Float,
            Self::Str(_) => ValueType::Str,
            Self::StrList(_) => ValueType::StrList,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::StrList(l) => Some(l),
            _ => None,
        }
    }
}

/// Canonical text form: booleans as `True`/`False`, lists
/// joined by single spaces, and integral floats keep a
/// trailing `.0`.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{:.1}", x)
            }
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => f.write_str(s),
            Self::StrList(l) => f.write_str(&l.join(" ")),
        }
    }
}
