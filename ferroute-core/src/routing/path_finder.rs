//! Entry points that turn a request into paths

use itertools::Itertools;
use log::debug;

use super::astar;
use super::context::RoutingContext;
use super::path::GraphPath;
use super::request::RoutingRequest;
use super::visitor::{CountingTraverseVisitor, TraverseVisitor};
use crate::Error;
use crate::updater::GraphHandle;

pub trait PathFinder: Send + Sync {
    fn find_paths(&self, request: &RoutingRequest) -> Result<Vec<GraphPath>, Error>;
}

/// Single search against the latest published graph
#[derive(Debug, Clone)]
pub struct GraphPathFinder {
    graph: GraphHandle,
}

impl GraphPathFinder {
    pub fn new(graph: GraphHandle) -> Self {
        Self { graph }
    }

    /// Searches with a caller supplied visitor
    pub fn find_paths_with_visitor<V: TraverseVisitor>(
        &self,
        request: RoutingRequest,
        visitor: &mut V,
    ) -> Result<Vec<GraphPath>, Error> {
        let ctx = RoutingContext::new(request, self.graph.snapshot())?;
        astar::search(&ctx, visitor)
    }
}

impl PathFinder for GraphPathFinder {
    fn find_paths(&self, request: &RoutingRequest) -> Result<Vec<GraphPath>, Error> {
        let mut visitor = CountingTraverseVisitor::default();
        let result = self.find_paths_with_visitor(request.clone(), &mut visitor);
        debug!("Search done: {visitor}");
        result
    }
}

/// Park-and-ride aware path finder.
///
/// A park-and-ride request is searched twice at the same time: as given,
/// and as a car-only trip. Park-and-ride paths that drive at least half as
/// far as the car-only trip are replaced by the car-only paths.
#[derive(Debug, Clone)]
pub struct ComparingGraphPathFinder {
    inner: GraphPathFinder,
}

impl ComparingGraphPathFinder {
    pub fn new(graph: GraphHandle) -> Self {
        Self {
            inner: GraphPathFinder::new(graph),
        }
    }

    /// One sub-search; not finding a path yields an empty list
    fn lane(&self, name: &str, request: &RoutingRequest) -> Result<Vec<GraphPath>, Error> {
        match self.inner.find_paths(request) {
            Ok(paths) => Ok(paths),
            Err(Error::PathNotFound) => {
                debug!("Could not find {name} trips");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

impl PathFinder for ComparingGraphPathFinder {
    fn find_paths(&self, request: &RoutingRequest) -> Result<Vec<GraphPath>, Error> {
        if !request.park_and_ride {
            return self.inner.find_paths(request);
        }
        debug!("Detected a park and ride request, also searching car-only trips");

        let park_and_ride_request = request.clone();
        let car_only_request = request.car_only();
        let (park_and_ride, car_only) = rayon::join(
            || self.lane("park and ride", &park_and_ride_request),
            || self.lane("car-only", &car_only_request),
        );

        let results = filter_out(park_and_ride?, car_only?);
        if results.is_empty() {
            return Err(Error::PathNotFound);
        }
        Ok(results)
    }
}

/// Drops park-and-ride paths that drive at least half the car-only distance.
///
/// If any path was dropped, the remaining ones are followed by the car-only
/// paths; otherwise the park-and-ride paths are returned unchanged.
pub fn filter_out(park_and_ride: Vec<GraphPath>, car_only: Vec<GraphPath>) -> Vec<GraphPath> {
    let Some(fastest_car) = car_only.first() else {
        return park_and_ride;
    };
    let half = fastest_car.street_meters / 2.0;
    let fast_ones: Vec<GraphPath> = park_and_ride
        .iter()
        .filter(|path| path.street_meters < half)
        .cloned()
        .collect();
    debug!(
        "{} park and ride trips drive less than half of the car-only distance {:.0} m: {}",
        fast_ones.len(),
        fastest_car.street_meters,
        fast_ones
            .iter()
            .map(|path| format!("{:.0} m", path.street_meters))
            .join(", ")
    );

    if fast_ones.len() < park_and_ride.len() {
        fast_ones.into_iter().chain(car_only).collect()
    } else {
        park_and_ride
    }
}
