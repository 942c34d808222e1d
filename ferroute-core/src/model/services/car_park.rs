//! Car parks for park-and-ride

use std::fmt;
use std::hash::{Hash, Hasher};

use hashbrown::HashMap;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Car park record as delivered by a car park feed.
///
/// Identity is the `id` only: two records with the same id describe the
/// same car park at different points in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarPark {
    /// Unique id, prefixed by the source if there are several sources
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Longitude
    pub x: f64,
    /// Latitude
    pub y: f64,
    #[serde(default = "unknown_capacity")]
    pub spaces_available: u32,
    #[serde(default = "unknown_capacity")]
    pub max_capacity: u32,
    /// Whether `spaces_available` is live data or a rough estimate
    #[serde(default = "default_real_time")]
    pub real_time_data: bool,
}

fn unknown_capacity() -> u32 {
    u32::MAX
}

fn default_real_time() -> bool {
    true
}

impl CarPark {
    pub fn new(id: impl Into<String>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x,
            y,
            spaces_available: unknown_capacity(),
            max_capacity: unknown_capacity(),
            real_time_data: true,
        }
    }

    #[must_use]
    pub fn with_capacity(mut self, max_capacity: u32, spaces_available: u32) -> Self {
        self.max_capacity = max_capacity;
        self.spaces_available = spaces_available;
        self
    }

    pub fn is_full(&self) -> bool {
        self.spaces_available == 0
    }

    pub fn has_few_spaces_available(&self) -> bool {
        few_spaces_available(self.spaces_available, self.max_capacity)
    }
}

/// Whether a car park is close to full.
///
/// Very small car parks count as nearly full with a single free space, large
/// ones (over 200 spaces) with fewer than 20. Everything in between uses a
/// ten percent cutoff.
#[allow(clippy::cast_precision_loss)]
pub fn few_spaces_available(spaces_available: u32, max_capacity: u32) -> bool {
    if max_capacity < 10 {
        spaces_available <= 1
    } else if max_capacity > 200 {
        spaces_available < 20
    } else {
        spaces_available as f32 / max_capacity as f32 <= 0.1
    }
}

impl PartialEq for CarPark {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CarPark {}

impl Hash for CarPark {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for CarPark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Car park {} at {:.6}, {:.6}", self.name, self.y, self.x)
    }
}

/// Registry of known car parks and the graph vertices created for them
#[derive(Debug, Clone, Default)]
pub struct CarParkService {
    car_parks: HashMap<String, CarPark>,
    vertices: HashMap<String, NodeIndex>,
}

impl CarParkService {
    /// Adds or replaces a car park
    pub fn add_car_park(&mut self, car_park: CarPark) {
        self.car_parks.insert(car_park.id.clone(), car_park);
    }

    /// Removes a car park and forgets its vertex, returning the vertex
    pub fn remove_car_park(&mut self, id: &str) -> Option<NodeIndex> {
        self.car_parks.remove(id);
        self.vertices.remove(id)
    }

    pub fn car_park(&self, id: &str) -> Option<&CarPark> {
        self.car_parks.get(id)
    }

    pub fn car_parks(&self) -> impl Iterator<Item = &CarPark> {
        self.car_parks.values()
    }

    pub fn vertex(&self, id: &str) -> Option<NodeIndex> {
        self.vertices.get(id).copied()
    }

    pub(crate) fn set_vertex(&mut self, id: &str, vertex: NodeIndex) {
        self.vertices.insert(id.to_string(), vertex);
    }

    pub fn len(&self) -> usize {
        self.car_parks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.car_parks.is_empty()
    }
}
