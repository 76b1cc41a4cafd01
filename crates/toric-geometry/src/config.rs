//! Construction settings for fans.

/// Configuration for fan construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FanConfig {
    /// Verify that generating cones meet along common faces.
    pub check: bool,
    /// Minimum number of cone pairs before the check runs in parallel.
    pub parallel_threshold: usize,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            check: true,
            parallel_threshold: 64,
        }
    }
}

impl FanConfig {
    /// Settings for fans known to be valid by construction.
    #[must_use]
    pub fn unchecked() -> Self {
        Self {
            check: false,
            ..Self::default()
        }
    }
}
