//! Bike rental stations from a rental feed

use std::time::Duration;

use geo::Point;
use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};

use super::link_to_streets;
use super::manager::{GraphWriter, GraphWriterRunnable};
use super::polling::PollingGraphUpdater;
use crate::Error;
use crate::model::services::bike_rental::DEFAULT_NETWORK;
use crate::model::services::{BikeRentalStation, RentalType};
use crate::model::{EdgeKind, Graph, Vertex, VertexKind};

pub trait BikeRentalDataSource: Send + 'static {
    /// Fetches fresh data; returns whether there is anything new
    fn update(&mut self) -> bool;

    /// Complete list of current stations
    fn stations(&self) -> Vec<BikeRentalStation>;
}

pub struct BikeRentalUpdater<S> {
    config_ref: String,
    period: Option<Duration>,
    source: S,
    network_types: HashMap<String, RentalType>,
}

impl<S: BikeRentalDataSource> BikeRentalUpdater<S> {
    pub fn new(config_ref: impl Into<String>, period: Option<Duration>, source: S) -> Self {
        Self {
            config_ref: config_ref.into(),
            period,
            source,
            network_types: HashMap::new(),
        }
    }

    /// Declares how bikes of `network` may be returned
    #[must_use]
    pub fn with_network_type(
        mut self,
        network: impl Into<String>,
        rental_type: RentalType,
    ) -> Self {
        self.network_types.insert(network.into(), rental_type);
        self
    }
}

impl<S: BikeRentalDataSource> PollingGraphUpdater for BikeRentalUpdater<S> {
    fn config_ref(&self) -> &str {
        &self.config_ref
    }

    fn polling_period(&self) -> Option<Duration> {
        self.period
    }

    fn setup_unit(&self) -> Box<dyn GraphWriterRunnable> {
        let network_types = self.network_types.clone();
        Box::new(move |graph: &mut Graph| {
            let service = graph.services_mut().bike_rental_mut();
            for (network, rental_type) in network_types {
                service.set_network_type(network, rental_type);
            }
        })
    }

    fn run_polling(&mut self, writer: &GraphWriter) -> Result<(), Error> {
        if !self.source.update() {
            debug!("No new bike rental data for {}", self.config_ref);
            return Ok(());
        }
        let stations = self.source.stations();
        writer.execute(move |graph: &mut Graph| apply_stations(graph, stations))
    }

    fn teardown_unit(&self) -> Box<dyn GraphWriterRunnable> {
        Box::new(remove_stations)
    }
}

/// Adds, updates and removes rental station vertices to match a complete
/// station list
pub fn apply_stations(graph: &mut Graph, stations: Vec<BikeRentalStation>) {
    let stale: Vec<String> = {
        let current: HashSet<&str> = stations.iter().map(|s| s.id.as_str()).collect();
        graph
            .services()
            .bike_rental()
            .map(|service| {
                service
                    .stations()
                    .filter(|s| !current.contains(s.id.as_str()))
                    .map(|s| s.id.clone())
                    .collect()
            })
            .unwrap_or_default()
    };

    for id in &stale {
        if let Some(vertex) = graph.services_mut().bike_rental_mut().remove_station(id) {
            graph.remove_vertex(vertex);
        }
    }

    let mut added = 0usize;
    for mut station in stations {
        if station.networks.is_empty() {
            warn!(
                "Bike rental station {} has no network, assigning '{DEFAULT_NETWORK}'",
                station.id
            );
            station.networks.insert(DEFAULT_NETWORK.to_string());
        }
        let known = graph
            .services()
            .bike_rental()
            .and_then(|service| service.vertex(&station.id))
            .is_some_and(|vertex| graph.vertex(vertex).is_some());

        if !known {
            let vertex = graph.add_vertex(Vertex::new(
                station.name.clone(),
                Point::new(station.x, station.y),
                VertexKind::BikeRentalStation {
                    station_id: station.id.clone(),
                },
            ));
            let loops = graph
                .add_edge(vertex, vertex, EdgeKind::RentBike)
                .and_then(|_| graph.add_edge(vertex, vertex, EdgeKind::DropOffBike));
            if let Err(e) = loops {
                warn!("Could not add rental edges for station {}: {e}", station.id);
            }
            if !link_to_streets(graph, vertex) {
                warn!(
                    "Bike rental station {} at {:.6}, {:.6} not near any streets; \
                     it will not be usable",
                    station.id, station.y, station.x
                );
            }
            graph
                .services_mut()
                .bike_rental_mut()
                .set_vertex(&station.id, vertex);
            added += 1;
        }
        graph.services_mut().bike_rental_mut().add_station(station);
    }

    info!(
        "Bike rental stations updated: {added} added, {} removed",
        stale.len()
    );
}

/// Removes every rental station vertex and the rental service
pub fn remove_stations(graph: &mut Graph) {
    let Some(service) = graph.services_mut().remove_bike_rental() else {
        return;
    };
    for station in service.stations() {
        if let Some(vertex) = service.vertex(&station.id) {
            graph.remove_vertex(vertex);
        }
    }
    debug!("Removed {} bike rental stations", service.len());
}
