//! Typed configuration items.
//!
//! A [`ConfigParameter`] declares an item's name, type and
//! optional default. Values are produced either from a sectioned
//! [`ConfigSource`] or from an in-memory [`ConfigBundle`], and can
//! be formatted back to the text they were read from.

mod parameter;
mod source;
mod value;

pub use parameter::{interpret_all, ConfigParameter, ConfigValues};
pub use source::{ConfigBundle, ConfigSource};
pub use value::{ConfigValue, ValueType};
