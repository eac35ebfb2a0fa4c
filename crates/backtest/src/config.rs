use std::fmt;

/// Backtest parameters, passed explicitly into every entry point
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BacktestConfig {
    /// Bars on each side a swing must dominate
    pub swing_lookback: usize,
    /// Confluence / Agreement closeness, % of swing range
    pub confluence_tolerance_pct: f64,
    /// Close beyond a support level by more than this % of the level = broken
    pub pierce_tolerance_pct: f64,
    /// Candles after the focus used to test levels
    pub test_window: usize,
    /// Leading candles of the test window searched for point C
    pub point_c_window: usize,
    /// Most recent reactions used for Fibnodes
    pub max_reactions: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidLookback,
    InvalidTolerance { name: &'static str, value: f64 },
    InvalidWindow { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLookback => write!(f, "swing_lookback must be >= 1"),
            Self::InvalidTolerance { name, value } => {
                write!(f, "{} must be a finite value >= 0, got {}", name, value)
            }
            Self::InvalidWindow { name } => write!(f, "{} must be >= 1", name),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            swing_lookback: 5,
            confluence_tolerance_pct: 0.5,
            pierce_tolerance_pct: 0.3,
            test_window: 50,
            point_c_window: 20,
            max_reactions: 5,
        }
    }
}

impl BacktestConfig {
    pub fn new(
        swing_lookback: usize,
        confluence_tolerance_pct: f64,
        pierce_tolerance_pct: f64,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            swing_lookback,
            confluence_tolerance_pct,
            pierce_tolerance_pct,
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.swing_lookback == 0 {
            return Err(ConfigError::InvalidLookback);
        }

        for (name, value) in [
            ("confluence_tolerance_pct", self.confluence_tolerance_pct),
            ("pierce_tolerance_pct", self.pierce_tolerance_pct),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTolerance { name, value });
            }
        }

        if self.test_window == 0 {
            return Err(ConfigError::InvalidWindow {
                name: "test_window",
            });
        }
        if self.max_reactions == 0 {
            return Err(ConfigError::InvalidWindow {
                name: "max_reactions",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = BacktestConfig::default();
        assert_eq!(cfg.swing_lookback, 5);
        assert_eq!(cfg.test_window, 50);
        assert_eq!(cfg.point_c_window, 20);
        assert_eq!(cfg.max_reactions, 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_lookback_is_rejected() {
        assert_eq!(
            BacktestConfig::new(0, 0.5, 0.3),
            Err(ConfigError::InvalidLookback)
        );
    }

    #[test]
    fn negative_or_nan_tolerance_is_rejected() {
        assert!(matches!(
            BacktestConfig::new(5, -0.1, 0.3),
            Err(ConfigError::InvalidTolerance {
                name: "confluence_tolerance_pct",
                ..
            })
        ));
        assert!(matches!(
            BacktestConfig::new(5, 0.5, f64::NAN),
            Err(ConfigError::InvalidTolerance {
                name: "pierce_tolerance_pct",
                ..
            })
        ));
    }

    #[test]
    fn empty_test_window_is_rejected() {
        let cfg = BacktestConfig {
            test_window: 0,
            ..BacktestConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidWindow {
                name: "test_window"
            })
        );
    }
}
