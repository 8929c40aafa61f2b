//! Configuration of a DS2000 session.

/// Protocol settings of a session.
///
/// The defaults work for all DS2000 instruments. Use the `with_*` methods to adjust them.
///
/// ```
/// use rigol_ds2000::ProtocolConfig;
///
/// let config = ProtocolConfig::default().with_max_error_drain(4);
/// assert_eq!(config.max_error_drain(), 4);
/// assert_eq!(config.terminator(), "\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    max_error_drain: usize,
    terminator: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_error_drain: 16,
            terminator: "\n".to_string(),
        }
    }
}

impl ProtocolConfig {
    /// Maximum number of error queue reads after a command before giving up with
    /// [`crate::Ds2000Error::QueueOverflow`]. Always at least one.
    pub fn max_error_drain(&self) -> usize {
        self.max_error_drain
    }

    /// Line terminator that is set on the interface when the session is created.
    pub fn terminator(&self) -> &str {
        &self.terminator
    }

    /// Set the maximum number of error queue reads per command. A value of zero is raised to one,
    /// as at least one read is needed to confirm a command.
    pub fn with_max_error_drain(mut self, max_error_drain: usize) -> Self {
        self.max_error_drain = max_error_drain.max(1);
        self
    }

    /// Set the line terminator.
    pub fn with_terminator(mut self, terminator: &str) -> Self {
        self.terminator = terminator.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(16, 16)]
    fn test_max_error_drain_at_least_one(#[case] requested: usize, #[case] exp: usize) {
        let config = ProtocolConfig::default().with_max_error_drain(requested);
        assert_eq!(config.max_error_drain(), exp);
    }
}
