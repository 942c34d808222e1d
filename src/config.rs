//! Router configuration loaded from TOML
//!
//! ```toml
//! search_threads = 4
//!
//! [routing_defaults]
//! walk_speed = 1.2
//! num_itineraries = 2
//!
//! [[updaters]]
//! type = "car-park"
//! config_ref = "parkapi"
//! frequency_sec = 60
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use ferroute_core::Error;
use ferroute_core::prelude::RoutingRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Size of the search worker pool, all cores when unset
    pub search_threads: Option<usize>,
    /// Options every request starts from
    pub routing_defaults: RoutingRequest,
    pub updaters: Vec<UpdaterConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdaterType {
    CarPark,
    BikeRental,
    Roadworks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    #[serde(rename = "type")]
    pub kind: UpdaterType,
    pub config_ref: String,
    /// Polling period; missing or zero runs the feed once
    #[serde(default)]
    pub frequency_sec: Option<u64>,
    /// Rental type by network name, for bike rental feeds
    #[serde(default)]
    pub network_types: Vec<NetworkTypeConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkTypeConfig {
    pub network: String,
    #[serde(rename = "type")]
    pub rental_type: String,
}

impl UpdaterConfig {
    pub fn polling_period(&self) -> Option<Duration> {
        self.frequency_sec
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

impl RouterConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Updater entry for `config_ref`, which must be of the given type
    pub fn updater(&self, config_ref: &str, kind: UpdaterType) -> Result<&UpdaterConfig, Error> {
        let updater = self
            .updaters
            .iter()
            .find(|u| u.config_ref == config_ref)
            .ok_or_else(|| Error::Config(format!("no updater configured as '{config_ref}'")))?;
        if updater.kind != kind {
            return Err(Error::Config(format!(
                "updater '{config_ref}' is configured as {:?}, not {kind:?}",
                updater.kind
            )));
        }
        Ok(updater)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.search_threads == Some(0) {
            return Err(Error::Config("search_threads must be at least 1".into()));
        }
        for (i, updater) in self.updaters.iter().enumerate() {
            if self.updaters[..i]
                .iter()
                .any(|u| u.config_ref == updater.config_ref)
            {
                return Err(Error::Config(format!(
                    "updater '{}' configured twice",
                    updater.config_ref
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ferroute_core::prelude::{DominanceFunction, OptimizeType};

    use super::*;

    const CONFIG: &str = r#"
search_threads = 2

[routing_defaults]
walk_speed = 1.2
optimize = "SAFE"
dominance = "MINIMUM_WEIGHT"

[[updaters]]
type = "car-park"
config_ref = "parkapi"
frequency_sec = 60

[[updaters]]
type = "bike-rental"
config_ref = "bikes"
network_types = [{ network = "regiorad", type = "free-floating" }]
"#;

    #[test]
    fn parses_full_config() {
        let config = RouterConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.search_threads, Some(2));
        assert!((config.routing_defaults.walk_speed - 1.2).abs() < 1e-9);
        assert_eq!(config.routing_defaults.optimize, OptimizeType::Safe);
        assert_eq!(
            config.routing_defaults.dominance,
            DominanceFunction::MinimumWeight
        );
        // untouched options keep their defaults
        assert_eq!(config.routing_defaults.num_itineraries, 3);

        let parkapi = config.updater("parkapi", UpdaterType::CarPark).unwrap();
        assert_eq!(parkapi.polling_period(), Some(Duration::from_secs(60)));
        let bikes = config.updater("bikes", UpdaterType::BikeRental).unwrap();
        assert_eq!(bikes.polling_period(), None);
        assert_eq!(bikes.network_types[0].rental_type, "free-floating");
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(
            RouterConfig::from_toml_str("").unwrap(),
            RouterConfig::default()
        );
    }

    #[test]
    fn rejects_bad_configs() {
        let unknown_type = r#"
[[updaters]]
type = "weather"
config_ref = "dwd"
"#;
        assert!(matches!(
            RouterConfig::from_toml_str(unknown_type),
            Err(Error::Config(_))
        ));

        let twice = r#"
[[updaters]]
type = "roadworks"
config_ref = "a"

[[updaters]]
type = "car-park"
config_ref = "a"
"#;
        assert!(matches!(
            RouterConfig::from_toml_str(twice),
            Err(Error::Config(_))
        ));

        assert!(matches!(
            RouterConfig::from_toml_str("search_threads = 0"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn updater_lookup_checks_the_type() {
        let config = RouterConfig::from_toml_str(CONFIG).unwrap();
        assert!(config.updater("parkapi", UpdaterType::Roadworks).is_err());
        assert!(config.updater("missing", UpdaterType::CarPark).is_err());
    }
}
