//! # Engine Configuration
//!
//! TOML-backed settings: the spot density floor, the trusted caller set and
//! the sanitize table used for change detection.

use std::fs;
use std::path::Path;

use fixed::types::U64F64;
use serde::{Deserialize, Serialize};

use crate::codec::SanitizeTable;
use crate::constants::Q64;
use crate::errors::{LdfError, LdfResult};
use crate::guard::TrustedCallers;

/// Engine configuration loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Minimum liquidity density at the spot tick a new shape must keep,
    /// as a decimal fraction of total liquidity (e.g. "0.001")
    #[serde(default = "default_min_spot_density")]
    pub min_spot_density: String,

    /// Identities allowed to query the engine
    pub trusted: TrustedCallers,

    /// Shape-relevant byte ranges per family, used for change detection
    #[serde(default)]
    pub sanitize: SanitizeTable,
}

fn default_min_spot_density() -> String {
    "0.001".to_string()
}

impl EngineConfig {
    /// Config with the default floor and sanitize table
    pub fn new(trusted: TrustedCallers) -> Self {
        Self {
            min_spot_density: default_min_spot_density(),
            trusted,
            sanitize: SanitizeTable::default(),
        }
    }

    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> LdfResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            LdfError::ConfigIo(format!("{}: {}", path.as_ref().display(), e))
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> LdfResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(|e| {
            LdfError::ConfigIo(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> LdfResult<()> {
        self.min_spot_density_x64()?;
        self.sanitize.validate()?;
        Ok(())
    }

    /// Density floor in X64, parsed from the decimal string
    pub fn min_spot_density_x64(&self) -> LdfResult<u128> {
        let floor = U64F64::from_str(self.min_spot_density.trim()).map_err(|e| {
            LdfError::invalid_config("min_spot_density", &format!("{}: {}", self.min_spot_density, e))
        })?;
        let floor_x64 = floor.to_bits();
        if floor_x64 == 0 || floor_x64 > Q64 {
            return Err(LdfError::invalid_config(
                "min_spot_density",
                &format!("{} must be in (0, 1]", self.min_spot_density),
            ));
        }
        Ok(floor_x64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_MIN_SPOT_DENSITY_X64;
    use crate::types::Principal;

    fn trusted() -> TrustedCallers {
        TrustedCallers {
            hub: Principal::new([1u8; 32]),
            quoter: Principal::new([2u8; 32]),
            instance: Principal::new([3u8; 32]),
        }
    }

    #[test]
    fn test_default_floor() {
        let config = EngineConfig::new(trusted());
        let floor = config.min_spot_density_x64().unwrap();
        assert!(floor.abs_diff(DEFAULT_MIN_SPOT_DENSITY_X64) <= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_floor_bounds() {
        let mut config = EngineConfig::new(trusted());
        config.min_spot_density = "1".to_string();
        assert_eq!(config.min_spot_density_x64().unwrap(), Q64);

        config.min_spot_density = "0".to_string();
        assert!(config.validate().is_err());

        config.min_spot_density = "1.5".to_string();
        assert!(config.validate().is_err());

        config.min_spot_density = "ten percent".to_string();
        assert!(matches!(config.validate(), Err(LdfError::InvalidConfig(_))));
    }

    #[test]
    fn test_toml_shape() {
        let hub = Principal::new([1u8; 32]);
        let content = format!(
            r#"
min_spot_density = "0.25"

[trusted]
hub = "{hub}"
quoter = "{quoter}"
instance = "{instance}"

[sanitize]
uniform = [[1, 7]]
geometric_with_carpet = [[1, 10]]
double_geometric_with_carpet = [[1, 28]]
"#,
            hub = hub,
            quoter = Principal::new([2u8; 32]),
            instance = Principal::new([3u8; 32]),
        );
        let config: EngineConfig = toml::from_str(&content).unwrap();
        assert_eq!(config.trusted, trusted());
        assert_eq!(config.min_spot_density_x64().unwrap(), Q64 / 4);
        assert_eq!(config.sanitize.geometric_with_carpet, vec![[1, 10]]);
    }
}
