//! YAML Configuration for the analytics engine
//!
//! Loads pricer defaults, the sensitivity curve shape and screening
//! parameters. Every field has a default, so an empty document is valid.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{BlackScholes, CurveSpec, OptionType, PriceSensitivity, PricerConfig};
use crate::screening::ScreeningConfig;
use crate::strategies::StrategyEngine;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Risk-free rate and dividend yield defaults
    #[serde(default)]
    pub pricer: PricerConfig,
    /// Range and resolution of price sensitivity curves
    #[serde(default)]
    pub sensitivity: CurveSpec,
    /// Option chain screening parameters
    #[serde(default)]
    pub screening: ScreeningConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = if yaml.trim().is_empty() {
            EngineConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    pub fn pricer(&self) -> BlackScholes {
        BlackScholes::new(self.pricer)
    }

    pub fn strategy_engine(&self) -> StrategyEngine {
        StrategyEngine::new(self.pricer())
    }

    /// Sensitivity curve using the configured range and step count
    pub fn sensitivity_curve(
        &self,
        option_type: OptionType,
        spot: f64,
        strike: f64,
        time_to_expiry_years: f64,
        volatility: f64,
    ) -> PriceSensitivity {
        self.pricer().price_sensitivity(
            option_type,
            spot,
            strike,
            time_to_expiry_years,
            volatility,
            self.sensitivity.range_fraction,
            self.sensitivity.steps,
        )
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.pricer.risk_free_rate.is_finite() {
            return Err(ConfigError::Validation(format!(
                "risk_free_rate must be finite, got {}",
                self.pricer.risk_free_rate
            )));
        }
        if !self.pricer.dividend_yield.is_finite() {
            return Err(ConfigError::Validation(format!(
                "dividend_yield must be finite, got {}",
                self.pricer.dividend_yield
            )));
        }

        self.sensitivity
            .validate()
            .map_err(|e| ConfigError::Validation(format!("sensitivity {}", e)))?;

        if !(self.screening.contract_multiplier > 0.0) {
            return Err(ConfigError::Validation(format!(
                "contract_multiplier must be positive, got {}",
                self.screening.contract_multiplier
            )));
        }
        if !(self.screening.atm_band >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "atm_band must not be negative, got {}",
                self.screening.atm_band
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.pricer.risk_free_rate, 0.03);
        assert_eq!(config.pricer.dividend_yield, 0.0);
        assert_eq!(config.sensitivity, CurveSpec::new(0.2, 40));
        assert_eq!(config.screening.contract_multiplier, 100.0);
    }

    #[test]
    fn test_empty_and_partial_documents() {
        assert_eq!(EngineConfig::from_yaml_str("").unwrap(), EngineConfig::default());

        let config = EngineConfig::from_yaml_str("pricer:\n  risk_free_rate: 0.045\n").unwrap();
        assert_eq!(config.pricer.risk_free_rate, 0.045);
        assert_eq!(config.pricer.dividend_yield, 0.0);
        assert_eq!(config.screening, ScreeningConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let err = EngineConfig::from_yaml_str("sensitivity:\n  range_fraction: 1.5\n  steps: 40\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = EngineConfig::from_yaml_str("sensitivity:\n  range_fraction: 0.2\n  steps: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = EngineConfig::from_yaml_str("screening:\n  contract_multiplier: 0\n").unwrap_err();
        assert!(err.to_string().starts_with("Validation error"));

        let err = EngineConfig::from_yaml_str("pricer:\n  risk_free_rate: high\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");

        let mut config = EngineConfig::default();
        config.pricer.dividend_yield = 0.015;
        config.sensitivity = CurveSpec::new(0.25, 20);
        config.save_to_file(&path).unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.pricer().config().dividend_yield, 0.015);
    }

    #[test]
    fn test_configured_sensitivity_curve() {
        let config = EngineConfig::from_yaml_str("sensitivity:\n  range_fraction: 0.5\n  steps: 10\n").unwrap();
        let points: Vec<_> = config.sensitivity_curve(OptionType::Put, 100.0, 100.0, 0.5, 0.2).collect();
        assert_eq!(points.len(), 11);
        assert!((points[0].underlying_price - 50.0).abs() < 1e-12);
        assert_eq!(points[10].underlying_price, 150.0);
    }

    #[test]
    fn test_engine_uses_configured_rate() {
        let config = EngineConfig::from_yaml_str("pricer:\n  risk_free_rate: 0.08\n").unwrap();
        let engine = config.strategy_engine();
        assert_eq!(engine.pricer().config().risk_free_rate, 0.08);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/engine.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
