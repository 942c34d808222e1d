//! Street closures from a roadworks feed

use std::time::Duration;

use geo::Rect;
use log::{debug, info};

use super::manager::{GraphWriter, GraphWriterRunnable};
use super::polling::PollingGraphUpdater;
use crate::Error;
use crate::model::Graph;
use crate::model::services::RoadworksSource;

pub trait RoadworksDataSource: Send + 'static {
    /// Fetches fresh data; returns whether there is anything new
    fn update(&mut self) -> bool;

    /// OSM ways that are closed
    fn blocked_way_ids(&self) -> Vec<i64>;

    /// Closed areas; every street touching one is blocked
    fn blocked_areas(&self) -> Vec<Rect<f64>> {
        Vec::new()
    }
}

pub struct RoadworksUpdater<S> {
    config_ref: String,
    period: Option<Duration>,
    source: S,
}

impl<S: RoadworksDataSource> RoadworksUpdater<S> {
    pub fn new(config_ref: impl Into<String>, period: Option<Duration>, source: S) -> Self {
        Self {
            config_ref: config_ref.into(),
            period,
            source,
        }
    }
}

impl<S: RoadworksDataSource> PollingGraphUpdater for RoadworksUpdater<S> {
    fn config_ref(&self) -> &str {
        &self.config_ref
    }

    fn polling_period(&self) -> Option<Duration> {
        self.period
    }

    fn setup_unit(&self) -> Box<dyn GraphWriterRunnable> {
        Box::new(|graph: &mut Graph| {
            graph.services_mut().set_roadworks(RoadworksSource::new());
        })
    }

    fn run_polling(&mut self, writer: &GraphWriter) -> Result<(), Error> {
        if !self.source.update() {
            debug!("No new roadworks for {}", self.config_ref);
            return Ok(());
        }
        let way_ids = self.source.blocked_way_ids();
        let areas = self.source.blocked_areas();
        writer.execute(move |graph: &mut Graph| apply_roadworks(graph, &way_ids, &areas))
    }

    fn teardown_unit(&self) -> Box<dyn GraphWriterRunnable> {
        Box::new(|graph: &mut Graph| {
            graph.services_mut().remove_roadworks();
        })
    }
}

/// Replaces the graph's roadworks with the given closures
pub fn apply_roadworks(graph: &mut Graph, way_ids: &[i64], areas: &[Rect<f64>]) {
    let mut source = RoadworksSource::from_way_ids(way_ids.iter().copied());
    for area in areas {
        for vertex in graph.street_vertices_in(*area) {
            let edges: Vec<_> = graph
                .outgoing(vertex)
                .chain(graph.incoming(vertex))
                .filter(|edge| edge.weight().as_street().is_some())
                .map(|edge| edge.weight().id())
                .collect();
            source.block_edges(edges);
        }
    }
    info!(
        "Roadworks updated: {} ways and {} area closures",
        way_ids.len(),
        areas.len()
    );
    graph.services_mut().set_roadworks(source);
}
