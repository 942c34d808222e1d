use geo::Point;

/// What a vertex represents in the multimodal network
#[derive(Debug, Clone, PartialEq)]
pub enum VertexKind {
    /// Street intersection (or any street node)
    Intersection {
        traffic_light: bool,
        /// Explicitly marked as free-flowing, e.g. a highway interchange
        free_flowing: bool,
    },
    /// Transit stop reachable from the street network
    TransitStop,
    /// On-board position of a transit pattern at a stop
    TransitOnboard,
    /// Park-and-ride area backed by a car park record
    ParkAndRide { car_park_id: String },
    BikeRentalStation { station_id: String },
    BikePark,
}

/// Graph node
#[derive(Debug, Clone)]
pub struct Vertex {
    pub label: String,
    /// Note: x = longitude, y = latitude
    pub coordinate: Point<f64>,
    pub kind: VertexKind,
}

impl Vertex {
    pub fn new(label: impl Into<String>, coordinate: Point<f64>, kind: VertexKind) -> Self {
        Self {
            label: label.into(),
            coordinate,
            kind,
        }
    }

    /// Plain street intersection without traffic light
    pub fn intersection(label: impl Into<String>, coordinate: Point<f64>) -> Self {
        Self::new(
            label,
            coordinate,
            VertexKind::Intersection {
                traffic_light: false,
                free_flowing: false,
            },
        )
    }

    #[must_use]
    pub fn with_traffic_light(mut self) -> Self {
        if let VertexKind::Intersection { traffic_light, .. } = &mut self.kind {
            *traffic_light = true;
        }
        self
    }

    #[must_use]
    pub fn free_flowing(mut self) -> Self {
        if let VertexKind::Intersection { free_flowing, .. } = &mut self.kind {
            *free_flowing = true;
        }
        self
    }

    pub fn is_street(&self) -> bool {
        matches!(self.kind, VertexKind::Intersection { .. })
    }

    pub fn has_traffic_light(&self) -> bool {
        matches!(
            self.kind,
            VertexKind::Intersection {
                traffic_light: true,
                ..
            }
        )
    }
}
