//! Park-and-ride areas from a car park feed

use std::time::Duration;

use geo::Point;
use hashbrown::HashSet;
use log::{debug, info, warn};

use super::link_to_streets;
use super::manager::{GraphWriter, GraphWriterRunnable};
use super::polling::PollingGraphUpdater;
use crate::Error;
use crate::model::services::CarPark;
use crate::model::{EdgeKind, Graph, Vertex, VertexKind};

/// Source of car park records, e.g. a parsed HTTP feed
pub trait CarParkDataSource: Send + 'static {
    /// Fetches fresh data; returns whether there is anything new
    fn update(&mut self) -> bool;

    /// Complete list of current car parks
    fn car_parks(&self) -> Vec<CarPark>;
}

pub struct CarParkUpdater<S> {
    config_ref: String,
    period: Option<Duration>,
    source: S,
}

impl<S: CarParkDataSource> CarParkUpdater<S> {
    pub fn new(config_ref: impl Into<String>, period: Option<Duration>, source: S) -> Self {
        Self {
            config_ref: config_ref.into(),
            period,
            source,
        }
    }
}

impl<S: CarParkDataSource> PollingGraphUpdater for CarParkUpdater<S> {
    fn config_ref(&self) -> &str {
        &self.config_ref
    }

    fn polling_period(&self) -> Option<Duration> {
        self.period
    }

    fn setup_unit(&self) -> Box<dyn GraphWriterRunnable> {
        Box::new(|graph: &mut Graph| {
            graph.services_mut().car_parks_mut();
        })
    }

    fn run_polling(&mut self, writer: &GraphWriter) -> Result<(), Error> {
        if !self.source.update() {
            debug!("No new car park data for {}", self.config_ref);
            return Ok(());
        }
        let car_parks = self.source.car_parks();
        writer.execute(move |graph: &mut Graph| apply_car_parks(graph, car_parks))
    }

    fn teardown_unit(&self) -> Box<dyn GraphWriterRunnable> {
        Box::new(remove_car_parks)
    }
}

/// Brings the graph in line with a complete car park list: new car parks get
/// a linked park-and-ride vertex, known ones are updated and car parks
/// missing from the list are removed with their vertex.
pub fn apply_car_parks(graph: &mut Graph, car_parks: Vec<CarPark>) {
    let stale: Vec<String> = {
        let current: HashSet<&str> = car_parks.iter().map(|p| p.id.as_str()).collect();
        graph
            .services()
            .car_parks()
            .map(|service| {
                service
                    .car_parks()
                    .filter(|p| !current.contains(p.id.as_str()))
                    .map(|p| p.id.clone())
                    .collect()
            })
            .unwrap_or_default()
    };

    for id in &stale {
        if let Some(vertex) = graph.services_mut().car_parks_mut().remove_car_park(id) {
            graph.remove_vertex(vertex);
        }
    }

    let mut added = 0usize;
    for car_park in car_parks {
        let known = graph
            .services()
            .car_parks()
            .and_then(|service| service.vertex(&car_park.id))
            .is_some_and(|vertex| graph.vertex(vertex).is_some());

        if !known {
            let vertex = graph.add_vertex(Vertex::new(
                car_park.name.clone(),
                Point::new(car_park.x, car_park.y),
                VertexKind::ParkAndRide {
                    car_park_id: car_park.id.clone(),
                },
            ));
            if let Err(e) = graph.add_edge(vertex, vertex, EdgeKind::ParkAndRide) {
                warn!("Could not add park and ride edge for {car_park}: {e}");
            }
            if !link_to_streets(graph, vertex) {
                warn!("{car_park} not near any streets; it will not be usable");
            }
            graph
                .services_mut()
                .car_parks_mut()
                .set_vertex(&car_park.id, vertex);
            added += 1;
        }
        graph.services_mut().car_parks_mut().add_car_park(car_park);
    }

    info!(
        "Car parks updated: {added} added, {} removed, {} total",
        stale.len(),
        graph.services().car_parks().map_or(0, |s| s.len())
    );
}

/// Removes every park-and-ride vertex and the car park service
pub fn remove_car_parks(graph: &mut Graph) {
    let Some(service) = graph.services_mut().remove_car_parks() else {
        return;
    };
    for car_park in service.car_parks() {
        if let Some(vertex) = service.vertex(&car_park.id) {
            graph.remove_vertex(vertex);
        }
    }
    debug!("Removed {} car parks", service.len());
}
