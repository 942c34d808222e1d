//! The shared multimodal graph

use geo::{Bearing, Distance, Haversine, Point, Rect};
use hashbrown::HashMap;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, EdgeReference, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use super::edge::{DEFAULT_CAR_SPEED, Edge, EdgeId, EdgeKind, StreetEdge};
use super::mode::TraverseModeSet;
use super::services::GraphServices;
use super::turn_restriction::TurnRestriction;
use super::vertex::{Vertex, VertexKind};
use crate::Error;

/// Street vertex position stored in the spatial index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Extremes of edge attributes over every edge ever added, used to keep the
/// remaining weight estimate a lower bound
#[derive(Debug, Clone, Copy)]
struct EdgeBounds {
    max_car_speed: f32,
    max_transit_speed: f64,
    min_bicycle_safety: f32,
}

impl Default for EdgeBounds {
    fn default() -> Self {
        Self {
            max_car_speed: DEFAULT_CAR_SPEED,
            max_transit_speed: 0.0,
            min_bicycle_safety: 1.0,
        }
    }
}

impl EdgeBounds {
    fn include(&mut self, edge: &Edge) {
        match &edge.kind {
            EdgeKind::Street(street) => {
                if street.permission.car() {
                    self.max_car_speed = self.max_car_speed.max(street.car_speed);
                }
                if street.permission.bicycle() {
                    self.min_bicycle_safety =
                        self.min_bicycle_safety.min(street.bicycle_safety_factor);
                }
            }
            EdgeKind::TransitHop {
                duration_seconds, ..
            } if *duration_seconds > 0.0 => {
                self.max_transit_speed = self
                    .max_transit_speed
                    .max(edge.distance_m() / duration_seconds);
            }
            _ => {}
        }
    }
}

/// Vertices, edges, turn restrictions and real-time services.
///
/// Searches only ever see a `Graph` behind an `Arc` and therefore cannot
/// mutate it; all structural edits go through graph writer units
/// (see [`crate::updater`]).
#[derive(Debug, Clone, Default)]
pub struct Graph {
    network: StableDiGraph<Vertex, Edge>,
    turn_restrictions: HashMap<EdgeIndex, Vec<TurnRestriction>>,
    street_index: RTree<IndexedPoint>,
    services: GraphServices,
    version: u64,
    next_edge_id: u64,
    bounds: EdgeBounds,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> NodeIndex {
        let coord = [vertex.coordinate.x(), vertex.coordinate.y()];
        let is_street = vertex.is_street();
        let index = self.network.add_node(vertex);
        if is_street {
            self.street_index.insert(IndexedPoint::new(coord, index));
        }
        index
    }

    /// Removes a vertex together with its edges and any turn restriction
    /// that mentions one of those edges.
    pub fn remove_vertex(&mut self, index: NodeIndex) -> Option<Vertex> {
        let incident: Vec<EdgeIndex> = self
            .network
            .edges_directed(index, Direction::Outgoing)
            .chain(self.network.edges_directed(index, Direction::Incoming))
            .map(|e| e.id())
            .collect();

        for edge in &incident {
            self.turn_restrictions.remove(edge);
        }
        self.turn_restrictions.retain(|_, restrictions| {
            restrictions.retain(|r| !incident.contains(&r.to));
            !restrictions.is_empty()
        });

        let vertex = self.network.remove_node(index)?;
        if vertex.is_street() {
            let coord = [vertex.coordinate.x(), vertex.coordinate.y()];
            self.street_index.remove(&IndexedPoint::new(coord, index));
        }
        Some(vertex)
    }

    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        kind: EdgeKind,
    ) -> Result<EdgeIndex, Error> {
        if !self.network.contains_node(from) || !self.network.contains_node(to) {
            return Err(Error::InvalidNodeIndex);
        }
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        let edge = Edge { id, kind };
        self.bounds.include(&edge);
        Ok(self.network.add_edge(from, to, edge))
    }

    /// Adds a straight street segment, deriving its length and bearings from
    /// the endpoint coordinates
    pub fn add_street_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        way_id: i64,
        permission: TraverseModeSet,
    ) -> Result<EdgeIndex, Error> {
        let street = self.straight_street_edge(from, to, way_id, permission)?;
        self.add_edge(from, to, EdgeKind::Street(street))
    }

    /// Builds (without adding) a straight street segment between two vertices
    #[allow(clippy::cast_possible_truncation)]
    pub fn straight_street_edge(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        way_id: i64,
        permission: TraverseModeSet,
    ) -> Result<StreetEdge, Error> {
        let a = self.vertex(from).ok_or(Error::InvalidNodeIndex)?.coordinate;
        let b = self.vertex(to).ok_or(Error::InvalidNodeIndex)?.coordinate;
        let bearing = Haversine.bearing(a, b).rem_euclid(360.0).round() as i32;
        Ok(StreetEdge::new(way_id, Haversine.distance(a, b), permission)
            .with_angles(bearing, bearing))
    }

    /// Attaches a turn restriction to its incoming edge.
    ///
    /// Both edges must exist, be street edges, and meet at one vertex.
    pub fn add_turn_restriction(&mut self, restriction: TurnRestriction) -> Result<(), Error> {
        let (_, via) = self
            .network
            .edge_endpoints(restriction.from)
            .ok_or(Error::InvalidData("turn restriction from unknown edge".into()))?;
        let (to_start, _) = self
            .network
            .edge_endpoints(restriction.to)
            .ok_or(Error::InvalidData("turn restriction to unknown edge".into()))?;

        let both_streets = [restriction.from, restriction.to]
            .iter()
            .all(|e| self.edge(*e).is_some_and(|edge| edge.as_street().is_some()));
        if via != to_start || !both_streets {
            return Err(Error::InvalidData(format!(
                "bad turn restriction {:?} -> {:?}",
                restriction.from, restriction.to
            )));
        }

        self.turn_restrictions
            .entry(restriction.from)
            .or_default()
            .push(restriction);
        Ok(())
    }

    /// Turn restrictions that apply when arriving over `edge`
    pub fn turn_restrictions(&self, edge: EdgeIndex) -> &[TurnRestriction] {
        self.turn_restrictions
            .get(&edge)
            .map_or(&[], Vec::as_slice)
    }

    pub fn vertex(&self, index: NodeIndex) -> Option<&Vertex> {
        self.network.node_weight(index)
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&Edge> {
        self.network.edge_weight(index)
    }

    pub fn edge_endpoints(&self, index: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.network.edge_endpoints(index)
    }

    pub fn outgoing(&self, index: NodeIndex) -> impl Iterator<Item = EdgeReference<'_, Edge>> {
        self.network.edges_directed(index, Direction::Outgoing)
    }

    pub fn incoming(&self, index: NodeIndex) -> impl Iterator<Item = EdgeReference<'_, Edge>> {
        self.network.edges_directed(index, Direction::Incoming)
    }

    /// Whether crossing this vertex costs nothing: either explicitly
    /// free-flowing, or a plain pass-through node without a light.
    pub fn is_inferred_free_flowing(&self, index: NodeIndex) -> bool {
        let Some(vertex) = self.vertex(index) else {
            return false;
        };
        match vertex.kind {
            VertexKind::Intersection {
                traffic_light,
                free_flowing,
            } => {
                free_flowing
                    || (!traffic_light
                        && self.incoming(index).count() == 1
                        && self.outgoing(index).count() == 1)
            }
            _ => false,
        }
    }

    pub fn nearest_street_vertex(&self, point: Point<f64>) -> Option<NodeIndex> {
        self.street_index
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|p| p.data)
    }

    /// Street vertices inside a bounding box
    pub fn street_vertices_in(&self, area: Rect<f64>) -> Vec<NodeIndex> {
        let envelope = AABB::from_corners(
            [area.min().x, area.min().y],
            [area.max().x, area.max().y],
        );
        self.street_index
            .locate_in_envelope(&envelope)
            .map(|p| p.data)
            .collect()
    }

    pub fn services(&self) -> &GraphServices {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut GraphServices {
        &mut self.services
    }

    /// Number of writer units applied to this graph
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Highest car speed of any street open to cars, in m/s
    pub fn max_car_speed(&self) -> f64 {
        f64::from(self.bounds.max_car_speed)
    }

    /// Highest average speed of any transit hop, in m/s
    pub fn max_transit_speed(&self) -> f64 {
        self.bounds.max_transit_speed
    }

    /// Lowest bicycle safety factor of any street open to bicycles, at most 1
    pub fn min_bicycle_safety(&self) -> f64 {
        f64::from(self.bounds.min_bicycle_safety)
    }

    pub fn vertex_count(&self) -> usize {
        self.network.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.network.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mode::TraverseMode;
    use crate::model::turn_restriction::TurnRestrictionKind;

    #[test]
    fn street_edge_geometry_from_coordinates() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(Vertex::intersection("a", Point::new(8.86, 48.59)));
        let b = graph.add_vertex(Vertex::intersection("b", Point::new(8.86, 48.60)));
        let e = graph
            .add_street_edge(a, b, 1, TraverseModeSet::all_street())
            .unwrap();

        let street = graph.edge(e).and_then(Edge::as_street).unwrap();
        // 0.01 degree of latitude is roughly 1.1 km
        assert!((street.length_m - 1112.0).abs() < 5.0);
        assert_eq!(street.in_angle, 0);
    }

    #[test]
    fn removing_vertex_cleans_index_and_restrictions() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(Vertex::intersection("a", Point::new(0.0, 0.0)));
        let b = graph.add_vertex(Vertex::intersection("b", Point::new(0.001, 0.0)));
        let c = graph.add_vertex(Vertex::intersection("c", Point::new(0.002, 0.0)));
        let ab = graph
            .add_street_edge(a, b, 1, TraverseModeSet::all_street())
            .unwrap();
        let bc = graph
            .add_street_edge(b, c, 2, TraverseModeSet::all_street())
            .unwrap();
        graph
            .add_turn_restriction(TurnRestriction::new(
                TurnRestrictionKind::NoTurn,
                ab,
                bc,
                TraverseModeSet::from(TraverseMode::Car),
            ))
            .unwrap();
        assert_eq!(graph.turn_restrictions(ab).len(), 1);

        graph.remove_vertex(c);
        assert!(graph.turn_restrictions(ab).is_empty());
        assert_eq!(graph.nearest_street_vertex(Point::new(0.0021, 0.0)), Some(b));
    }

    #[test]
    fn rejects_disconnected_turn_restriction() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(Vertex::intersection("a", Point::new(0.0, 0.0)));
        let b = graph.add_vertex(Vertex::intersection("b", Point::new(0.001, 0.0)));
        let c = graph.add_vertex(Vertex::intersection("c", Point::new(0.002, 0.0)));
        let ab = graph
            .add_street_edge(a, b, 1, TraverseModeSet::all_street())
            .unwrap();
        let ca = graph
            .add_street_edge(c, a, 2, TraverseModeSet::all_street())
            .unwrap();
        let result = graph.add_turn_restriction(TurnRestriction::new(
            TurnRestrictionKind::NoTurn,
            ab,
            ca,
            TraverseModeSet::all_street(),
        ));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn tracks_edge_extremes() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(Vertex::intersection("a", Point::new(0.0, 0.0)));
        let b = graph.add_vertex(Vertex::intersection("b", Point::new(0.01, 0.0)));
        assert!((graph.max_car_speed() - f64::from(DEFAULT_CAR_SPEED)).abs() < 1e-6);
        assert!((graph.min_bicycle_safety() - 1.0).abs() < 1e-9);

        let all = TraverseModeSet::all_street();
        let motorway = graph
            .straight_street_edge(a, b, 1, TraverseModeSet::from(TraverseMode::Car))
            .unwrap()
            .with_car_speed(36.0)
            .with_bicycle_safety(0.01);
        graph.add_edge(a, b, EdgeKind::Street(motorway)).unwrap();
        let cycleway = graph
            .straight_street_edge(b, a, 2, all)
            .unwrap()
            .with_bicycle_safety(0.4);
        graph.add_edge(b, a, EdgeKind::Street(cycleway)).unwrap();
        graph
            .add_edge(
                a,
                b,
                EdgeKind::TransitHop {
                    duration_seconds: 100.0,
                    length_m: 5000.0,
                },
            )
            .unwrap();

        assert!((graph.max_car_speed() - 36.0).abs() < 1e-6);
        // the motorway is closed to bicycles
        assert!((graph.min_bicycle_safety() - 0.4).abs() < 1e-6);
        assert!((graph.max_transit_speed() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn pass_through_nodes_are_free_flowing() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(Vertex::intersection("a", Point::new(0.0, 0.0)));
        let b = graph.add_vertex(Vertex::intersection("b", Point::new(0.001, 0.0)));
        let lit = graph.add_vertex(
            Vertex::intersection("lit", Point::new(0.002, 0.0)).with_traffic_light(),
        );
        let c = graph.add_vertex(Vertex::intersection("c", Point::new(0.003, 0.0)));
        let stop = graph.add_vertex(Vertex::new(
            "stop",
            Point::new(0.0, 0.0),
            VertexKind::TransitStop,
        ));
        let all = TraverseModeSet::all_street();
        graph.add_street_edge(a, b, 1, all).unwrap();
        graph.add_street_edge(b, lit, 1, all).unwrap();
        graph.add_street_edge(lit, c, 1, all).unwrap();

        assert!(graph.is_inferred_free_flowing(b));
        assert!(!graph.is_inferred_free_flowing(lit));
        assert!(!graph.is_inferred_free_flowing(a));
        assert!(!graph.is_inferred_free_flowing(stop));
    }
}
