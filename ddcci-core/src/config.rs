//! Engine configuration

/// Diagnostic verbosity of the protocol engine.
///
/// Gates what the engine emits through the `log` facade on top of the
/// caller's global log-level filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Operational messages only.
    #[default]
    Normal,
    /// Also log decoded payload data.
    Data,
    /// Also log every encoded frame as a hex dump.
    Frames,
}

/// Configuration handed to the protocol engine at construction.
///
/// Replaces process-wide mutable state: each channel carries its own copy.
#[derive(Debug, Clone, Default)]
pub struct DdcConfig {
    pub verbosity: Verbosity,
}

impl DdcConfig {
    /// Create a configuration with the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels_are_ordered() {
        assert!(Verbosity::Normal < Verbosity::Data);
        assert!(Verbosity::Data < Verbosity::Frames);
    }

    #[test]
    fn default_config_is_quiet() {
        let config = DdcConfig::default();
        assert_eq!(config.verbosity, Verbosity::Normal);
    }
}
