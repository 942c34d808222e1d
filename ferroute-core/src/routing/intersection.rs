//! Expected delay of crossing an intersection

use petgraph::stable_graph::NodeIndex;

use crate::model::Graph;
use crate::model::edge::StreetEdge;
use crate::model::mode::TraverseMode;

/// Car speed (m/s) above which both roads of a turn are assumed to be
/// connected without any delay
const FREE_FLOW_CAR_SPEED: f32 = 25.0;

const RIGHT_AT_LIGHT_SECS: f64 = 15.0;
const LEFT_AT_LIGHT_SECS: f64 = 15.0;
const STRAIGHT_AT_LIGHT_SECS: f64 = 15.0;
const RIGHT_NO_LIGHT_SECS: f64 = 8.0;
const LEFT_NO_LIGHT_SECS: f64 = 8.0;
const STRAIGHT_NO_LIGHT_SECS: f64 = 5.0;

/// Penalty multiplier of a right turn by bicycle. Left turns cost three times
/// as much.
const SAFE_BICYCLE_TURN_MODIFIER: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Straight,
    Right,
    Left,
}

#[derive(Debug, Clone, Copy)]
pub struct IntersectionTraversalCostModel {
    drive_on_right: bool,
}

impl IntersectionTraversalCostModel {
    pub fn new(drive_on_right: bool) -> Self {
        Self { drive_on_right }
    }

    /// Seconds spent crossing `vertex` from `from` onto `to`
    pub fn traversal_cost(
        &self,
        graph: &Graph,
        vertex: NodeIndex,
        from: &StreetEdge,
        to: &StreetEdge,
        mode: TraverseMode,
        to_speed: f64,
    ) -> f64 {
        if graph.is_inferred_free_flowing(vertex) {
            return 0.0;
        }
        let traffic_light = graph.vertex(vertex).is_some_and(|v| v.has_traffic_light());

        if mode.is_driving() {
            self.driving_cost(traffic_light, from, to)
        } else if mode.is_cycling() {
            let base = non_driving_cost(from, to, to_speed);
            match self.turn_direction(from, to) {
                TurnDirection::Right => base * SAFE_BICYCLE_TURN_MODIFIER,
                TurnDirection::Left => base * SAFE_BICYCLE_TURN_MODIFIER * 3.0,
                TurnDirection::Straight => base,
            }
        } else {
            non_driving_cost(from, to, to_speed)
        }
    }

    fn driving_cost(&self, traffic_light: bool, from: &StreetEdge, to: &StreetEdge) -> f64 {
        let direction = self.turn_direction(from, to);
        if traffic_light {
            return match direction {
                TurnDirection::Right => RIGHT_AT_LIGHT_SECS,
                TurnDirection::Left => LEFT_AT_LIGHT_SECS,
                TurnDirection::Straight => STRAIGHT_AT_LIGHT_SECS,
            };
        }
        if from.car_speed > FREE_FLOW_CAR_SPEED && to.car_speed > FREE_FLOW_CAR_SPEED {
            return 0.0;
        }
        match direction {
            TurnDirection::Right => RIGHT_NO_LIGHT_SECS,
            TurnDirection::Left => LEFT_NO_LIGHT_SECS,
            TurnDirection::Straight => STRAIGHT_NO_LIGHT_SECS,
        }
    }

    /// Clockwise turn angle in `[0, 360)`, mirrored for left-hand traffic
    pub fn turn_angle(&self, from: &StreetEdge, to: &StreetEdge) -> i32 {
        let angle = (to.in_angle - from.out_angle).rem_euclid(360);
        if self.drive_on_right {
            angle
        } else {
            360 - angle
        }
    }

    pub fn turn_direction(&self, from: &StreetEdge, to: &StreetEdge) -> TurnDirection {
        match self.turn_angle(from, to) {
            45..135 => TurnDirection::Right,
            225..315 => TurnDirection::Left,
            _ => TurnDirection::Straight,
        }
    }
}

/// Base delay of a non-driving turn, growing with the turn angle and
/// shrinking with the speed on the outgoing edge
fn non_driving_cost(from: &StreetEdge, to: &StreetEdge, to_speed: f64) -> f64 {
    let mut turn = (to.out_angle - from.in_angle).abs();
    if turn > 180 {
        turn = 360 - turn;
    }
    f64::from(turn) / 20.0 / to_speed
}
