//! Trip request options

use chrono::NaiveDateTime;
use geo::Point;
use log::warn;
use serde::{Deserialize, Serialize};

use super::dominance::DominanceFunction;
use crate::Error;
use crate::model::{TraverseMode, TraverseModeSet};
use crate::model::services::NetworkSet;

/// Geographic location of a trip end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

impl Location {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<Point<f64>> for Location {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.x(), point.y())
    }
}

/// How cycling edges are weighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizeType {
    #[default]
    Quick,
    Safe,
    Triangle,
    Greenways,
}

/// Time, safety and slope weights of a [`OptimizeType::Triangle`] search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleFactors {
    pub time: f64,
    pub safety: f64,
    pub slope: f64,
}

impl Default for TriangleFactors {
    fn default() -> Self {
        Self {
            time: 1.0 / 3.0,
            safety: 1.0 / 3.0,
            slope: 1.0 / 3.0,
        }
    }
}

impl TriangleFactors {
    const TOLERANCE: f64 = 0.00001;

    pub fn new(time: f64, safety: f64, slope: f64) -> Self {
        Self { time, safety, slope }
    }

    pub fn is_normalized(&self) -> bool {
        (self.time + self.safety + self.slope - 1.0).abs() <= Self::TOLERANCE
    }

    /// Scales the factors so that they sum up to one.
    ///
    /// Negative factors count as zero; an all-zero triple falls back to the
    /// default of equal weights.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.is_normalized() {
            return self;
        }
        let (time, safety, slope) = (self.time.max(0.0), self.safety.max(0.0), self.slope.max(0.0));
        let total = time + safety + slope;
        let normalized = if total > 0.0 {
            Self::new(time / total, safety / total, slope / total)
        } else {
            Self::default()
        };
        warn!(
            "Triangle factors {:.3}/{:.3}/{:.3} do not sum up to 1, using {:.3}/{:.3}/{:.3}",
            self.time, self.safety, self.slope, normalized.time, normalized.safety, normalized.slope
        );
        normalized
    }
}

/// Strategy for the remaining-weight estimate of the best-first search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemainingWeightHeuristic {
    /// Plain Dijkstra
    Trivial,
    /// Straight-line distance at the fastest speed the request allows
    #[default]
    Euclidean,
}

/// Options of a single trip search.
///
/// Cheap to clone: the comparing search hands every sub-search its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingRequest {
    pub from: Option<Location>,
    pub to: Option<Location>,
    pub modes: TraverseModeSet,
    pub date_time: Option<NaiveDateTime>,
    /// Drive to a park-and-ride area and continue on foot or by transit
    pub park_and_ride: bool,
    /// Cycle to a bike park and continue on foot or by transit
    pub bike_and_ride: bool,
    pub allow_bike_rental: bool,
    /// Rental networks the traveller may use, empty means all
    pub allowed_bike_rental_networks: NetworkSet,
    pub optimize: OptimizeType,
    pub triangle: TriangleFactors,
    /// Metres per second
    pub walk_speed: f64,
    /// Metres per second
    pub bike_speed: f64,
    pub walk_reluctance: f64,
    pub drive_on_right: bool,
    pub num_itineraries: usize,
    /// Skip park-and-ride areas that report no free spaces
    pub use_car_park_availability_information: bool,
    pub dominance: DominanceFunction,
    pub heuristic: RemainingWeightHeuristic,
    pub max_search_steps: usize,
}

impl Default for RoutingRequest {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            modes: TraverseModeSet::pedestrian(),
            date_time: None,
            park_and_ride: false,
            bike_and_ride: false,
            allow_bike_rental: false,
            allowed_bike_rental_networks: NetworkSet::new(),
            optimize: OptimizeType::default(),
            triangle: TriangleFactors::default(),
            walk_speed: 1.33,
            bike_speed: 5.0,
            walk_reluctance: 2.0,
            drive_on_right: true,
            num_itineraries: 3,
            use_car_park_availability_information: false,
            dominance: DominanceFunction::default(),
            heuristic: RemainingWeightHeuristic::default(),
            max_search_steps: 1_000_000,
        }
    }
}

impl RoutingRequest {
    pub fn new(from: impl Into<Location>, to: impl Into<Location>, modes: TraverseModeSet) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            modes,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_park_and_ride(mut self) -> Self {
        self.park_and_ride = true;
        self.modes = self.modes.with(TraverseMode::Car).with(TraverseMode::Walk);
        self
    }

    /// Car-only copy of this request, as used by the comparing search
    #[must_use]
    pub fn car_only(&self) -> Self {
        let mut clone = self.clone();
        clone.park_and_ride = false;
        clone.modes = TraverseModeSet::from(TraverseMode::Car);
        clone
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.from.is_none() || self.to.is_none() {
            return Err(Error::InvalidRequest(
                "origin and destination are required".into(),
            ));
        }
        if self.modes.is_empty() {
            return Err(Error::InvalidRequest("no traverse mode allowed".into()));
        }
        if self.walk_speed <= 0.0 || self.bike_speed <= 0.0 {
            return Err(Error::InvalidRequest(format!(
                "speeds must be positive (walk {}, bike {})",
                self.walk_speed, self.bike_speed
            )));
        }
        if self.num_itineraries == 0 {
            return Err(Error::InvalidRequest(
                "at least one itinerary must be requested".into(),
            ));
        }
        Ok(())
    }
}
