//! Sinks for non-fatal warnings raised while interpreting
//! configuration, such as substituting a default for a
//! missing item.

/// Receives warnings. Implementors decide where they go.
pub trait Diagnostics {
    /// Records a warning message.
    fn warn(&mut self, message: &str);
}

/// Forwards warnings to the [`log`] facade at `warn` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&mut self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Collects warnings in order, e.g. for inspection in tests.
///
/// # Examples
/// ```
/// use neatgen::diagnostics::Diagnostics;
///
/// let mut warnings: Vec<String> = vec![];
/// warnings.warn("something odd");
/// assert_eq!(warnings, vec!["something odd".to_string()]);
/// ```
impl Diagnostics for Vec<String> {
    fn warn(&mut self, message: &str) {
        self.push(message.to_owned());
    }
}
