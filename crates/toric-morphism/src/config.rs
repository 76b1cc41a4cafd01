//! Construction options for morphisms.

use toric_geometry::FanConfig;

/// Controls validation when building fan morphisms and toric morphisms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MorphismConfig {
    /// Verify fan compatibility and polynomial homogeneity.
    pub check: bool,
    /// Options for the fans built along the way (image fans, fibers, orbits).
    pub fan: FanConfig,
}

impl Default for MorphismConfig {
    fn default() -> Self {
        Self {
            check: true,
            fan: FanConfig::default(),
        }
    }
}

impl MorphismConfig {
    /// Skips all validation, for inputs known to be consistent.
    #[must_use]
    pub fn unchecked() -> Self {
        Self {
            check: false,
            fan: FanConfig::unchecked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_checks() {
        let config = MorphismConfig::default();
        assert!(config.check);
        assert!(config.fan.check);
        assert!(!MorphismConfig::unchecked().fan.check);
    }
}
