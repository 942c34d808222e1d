//! Bike rental stations and network rental types

use std::collections::BTreeSet;

use hashbrown::HashMap;
use log::warn;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Network assigned to stations whose feed does not name one
pub const DEFAULT_NETWORK: &str = "default";

/// Set of rental network names
pub type NetworkSet = BTreeSet<String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BikeRentalStation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub bikes_available: u32,
    #[serde(default)]
    pub spaces_available: u32,
    #[serde(default)]
    pub networks: NetworkSet,
}

impl BikeRentalStation {
    pub fn new(id: impl Into<String>, x: f64, y: f64, networks: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            x,
            y,
            bikes_available: 0,
            spaces_available: 0,
            networks: networks.iter().map(|n| (*n).to_string()).collect(),
        }
    }
}

impl PartialEq for BikeRentalStation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Where a rented bike may be returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RentalType {
    /// Bikes can only be dropped off at designated docks or areas
    #[default]
    StationBased,
    /// Bikes can be dropped off anywhere
    FreeFloating,
    /// Bikes can be dropped off anywhere, but the rental does not end there
    /// and extra charges may be levied
    StationBasedWithTemporaryDropOff,
}

impl RentalType {
    const ALL: [RentalType; 3] = [
        Self::StationBased,
        Self::FreeFloating,
        Self::StationBasedWithTemporaryDropOff,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::StationBased => "station-based",
            Self::FreeFloating => "free-floating",
            Self::StationBasedWithTemporaryDropOff => "station-based-with-temporary-drop-off",
        }
    }

    /// Parses a rental type name, ignoring case and surrounding whitespace
    pub fn parse(name: &str) -> Option<Self> {
        let cleaned = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.name() == cleaned)
    }

    /// Like [`RentalType::parse`], falling back to [`RentalType::StationBased`]
    pub fn parse_or_default(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!("Unknown rental type '{name}', assuming {}", Self::default().name());
            Self::default()
        })
    }

    fn allows_free_floating_drop_off(self) -> bool {
        matches!(
            self,
            Self::FreeFloating | Self::StationBasedWithTemporaryDropOff
        )
    }
}

/// Registry of rental stations, their vertices and network rental types
#[derive(Debug, Clone, Default)]
pub struct BikeRentalStationService {
    stations: HashMap<String, BikeRentalStation>,
    vertices: HashMap<String, NodeIndex>,
    network_rental_types: HashMap<String, RentalType>,
}

impl BikeRentalStationService {
    pub fn add_station(&mut self, station: BikeRentalStation) {
        self.stations.insert(station.id.clone(), station);
    }

    pub fn remove_station(&mut self, id: &str) -> Option<NodeIndex> {
        self.stations.remove(id);
        self.vertices.remove(id)
    }

    pub fn station(&self, id: &str) -> Option<&BikeRentalStation> {
        self.stations.get(id)
    }

    pub fn stations(&self) -> impl Iterator<Item = &BikeRentalStation> {
        self.stations.values()
    }

    pub fn vertex(&self, id: &str) -> Option<NodeIndex> {
        self.vertices.get(id).copied()
    }

    pub(crate) fn set_vertex(&mut self, id: &str, vertex: NodeIndex) {
        self.vertices.insert(id.to_string(), vertex);
    }

    pub fn set_network_type(&mut self, network: impl Into<String>, rental_type: RentalType) {
        self.network_rental_types.insert(network.into(), rental_type);
    }

    pub fn network_type(&self, network: &str) -> RentalType {
        self.network_rental_types
            .get(network)
            .copied()
            .unwrap_or_default()
    }

    /// Whether any of the networks lets a bike be left outside a station
    pub fn networks_allow_free_floating_drop_off(&self, networks: &NetworkSet) -> bool {
        networks
            .iter()
            .any(|n| self.network_type(n).allows_free_floating_drop_off())
    }

    /// Whether leaving a bike outside a station should come with a warning
    pub fn should_add_free_floating_alert(&self, networks: &NetworkSet) -> bool {
        networks.iter().any(|n| {
            self.network_rental_types.get(n.as_str())
                == Some(&RentalType::StationBasedWithTemporaryDropOff)
        })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn networks(names: &[&str]) -> NetworkSet {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn parses_rental_types() {
        assert_eq!(
            RentalType::parse("  Free-Floating "),
            Some(RentalType::FreeFloating)
        );
        assert_eq!(
            RentalType::parse("station-based-with-temporary-drop-off"),
            Some(RentalType::StationBasedWithTemporaryDropOff)
        );
        assert_eq!(RentalType::parse("teleport"), None);
        assert_eq!(
            RentalType::parse_or_default("teleport"),
            RentalType::StationBased
        );
    }

    #[test]
    fn unknown_networks_are_station_based() {
        let service = BikeRentalStationService::default();
        assert_eq!(service.network_type("nextbike"), RentalType::StationBased);
        assert!(!service.networks_allow_free_floating_drop_off(&networks(&["nextbike"])));
    }

    #[test]
    fn free_floating_drop_off_and_alerts() {
        let mut service = BikeRentalStationService::default();
        service.set_network_type("flinkster", RentalType::FreeFloating);
        service.set_network_type("regiorad", RentalType::StationBasedWithTemporaryDropOff);

        assert!(service.networks_allow_free_floating_drop_off(&networks(&["flinkster"])));
        assert!(!service.should_add_free_floating_alert(&networks(&["flinkster"])));

        assert!(service.networks_allow_free_floating_drop_off(&networks(&["regiorad"])));
        assert!(service.should_add_free_floating_alert(&networks(&["regiorad", "other"])));
    }
}
