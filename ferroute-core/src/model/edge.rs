//! Edge types of the multimodal graph

use std::fmt;

use serde::{Deserialize, Serialize};

use super::mode::TraverseModeSet;

/// Default car speed: 40 km/h in metres per second
pub const DEFAULT_CAR_SPEED: f32 = 11.2;

/// Synthetic edge identifier.
///
/// Unlike petgraph edge indices, which may be reused once an edge is
/// removed, ids are never reused and stay stable across graph snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge#{}", self.0)
    }
}

/// Street segment between two intersections
#[derive(Debug, Clone)]
pub struct StreetEdge {
    /// OSM way the segment belongs to
    pub way_id: i64,
    pub length_m: f64,
    pub permission: TraverseModeSet,
    /// Car speed in metres per second
    pub car_speed: f32,
    /// Multiplier applied to cycling cost, 1.0 is neutral
    pub bicycle_safety_factor: f32,
    /// Bearing at the start of the segment, degrees clockwise from north
    pub in_angle: i32,
    /// Bearing at the end of the segment
    pub out_angle: i32,
}

impl StreetEdge {
    pub fn new(way_id: i64, length_m: f64, permission: TraverseModeSet) -> Self {
        Self {
            way_id,
            length_m,
            permission,
            car_speed: DEFAULT_CAR_SPEED,
            bicycle_safety_factor: 1.0,
            in_angle: 0,
            out_angle: 0,
        }
    }

    #[must_use]
    pub fn with_car_speed(mut self, car_speed: f32) -> Self {
        self.car_speed = car_speed;
        self
    }

    #[must_use]
    pub fn with_bicycle_safety(mut self, factor: f32) -> Self {
        self.bicycle_safety_factor = factor;
        self
    }

    #[must_use]
    pub fn with_angles(mut self, in_angle: i32, out_angle: i32) -> Self {
        self.in_angle = in_angle;
        self.out_angle = out_angle;
        self
    }
}

#[derive(Debug, Clone)]
pub enum EdgeKind {
    Street(StreetEdge),
    /// Connects a stop, car park, bike station or bike park to the streets
    Link { length_m: f64 },
    /// Loop on a park-and-ride vertex: leave the car
    ParkAndRide,
    /// Loop on a rental station vertex: pick up a bike
    RentBike,
    /// Loop on a rental station vertex: return the bike
    DropOffBike,
    /// Loop on a bike park vertex: leave the own bike
    BikePark,
    TransitBoard { wait_seconds: f64 },
    TransitHop { duration_seconds: f64, length_m: f64 },
    TransitAlight,
    /// Walking transfer between two stops derived from geometry only
    SimpleTransfer { distance_m: f64 },
    /// Guaranteed transfer between two stops
    TimedTransfer,
}

/// Coarse classification of edges used by the dominance rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeClass {
    Street,
    SimpleTransfer,
    TimedTransfer,
    TransitBoard,
    Other,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) id: EdgeId,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn class(&self) -> EdgeClass {
        match self.kind {
            EdgeKind::Street(_) => EdgeClass::Street,
            EdgeKind::SimpleTransfer { .. } => EdgeClass::SimpleTransfer,
            EdgeKind::TimedTransfer => EdgeClass::TimedTransfer,
            EdgeKind::TransitBoard { .. } => EdgeClass::TransitBoard,
            _ => EdgeClass::Other,
        }
    }

    pub fn as_street(&self) -> Option<&StreetEdge> {
        match &self.kind {
            EdgeKind::Street(street) => Some(street),
            _ => None,
        }
    }

    /// Ground distance covered by the edge in metres
    pub fn distance_m(&self) -> f64 {
        match &self.kind {
            EdgeKind::Street(street) => street.length_m,
            EdgeKind::Link { length_m } | EdgeKind::TransitHop { length_m, .. } => *length_m,
            EdgeKind::SimpleTransfer { distance_m } => *distance_m,
            _ => 0.0,
        }
    }
}
