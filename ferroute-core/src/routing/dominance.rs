//! Dominance between search states.
//!
//! A state dominates another when it makes it redundant for path finding.
//! Before costs are compared at all, both states must be *comparable*:
//! they must share a plane and must not sit on either side of a transfer
//! or turn restriction whose future differs.

use serde::{Deserialize, Serialize};

use super::context::RoutingContext;
use super::state::{State, StateArena};
use crate::model::edge::EdgeClass;
use crate::model::mode::TraverseMode;

/// Slack of the Pareto comparison
pub const PARETO_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DominanceFunction {
    MinimumWeight,
    EarliestArrival,
    /// Only meaningful for walk-only searches
    LeastWalk,
    /// Time and weight, each with [`PARETO_EPSILON`] slack. Near-identical
    /// states dominate each other so that state sets stay small.
    #[default]
    Pareto,
}

impl DominanceFunction {
    /// Whether `a` is at least as good as `b` and the two are comparable.
    ///
    /// `arena` must hold the parents of both states.
    pub fn better_or_equal_and_comparable(
        self,
        ctx: &RoutingContext,
        arena: &StateArena,
        a: &State,
        b: &State,
    ) -> bool {
        // Never compare states on different sides of boarding
        if a.plane.ever_boarded != b.plane.ever_boarded {
            return false;
        }

        // A state that just walked a simple transfer may not have arrived
        // at the same time as one that did not
        if a.arrived_via(EdgeClass::SimpleTransfer) != b.arrived_via(EdgeClass::SimpleTransfer) {
            return false;
        }

        if a.arrived_via(EdgeClass::TimedTransfer) || b.arrived_via(EdgeClass::TimedTransfer) {
            return false;
        }

        if a.arrived_via(EdgeClass::TransitBoard)
            && b.arrived_via(EdgeClass::TransitBoard)
            && arena
                .parent(a)
                .is_some_and(|parent| parent.arrived_via(EdgeClass::TimedTransfer))
        {
            return true;
        }

        if a.plane.bike_rental != b.plane.bike_rental {
            return false;
        }

        if a.plane.car_parked != b.plane.car_parked {
            return false;
        }

        if a.plane.bike_parked != b.plane.bike_parked {
            return false;
        }

        // Different incoming street edges lead to different futures when a
        // turn restriction hangs off the edge, and vehicles may need to loop
        // close to the trip ends
        if let Some(back_edge) = a.back_edge {
            if back_edge.class == EdgeClass::Street && a.back_edge != b.back_edge {
                let restricted = !ctx.graph().turn_restrictions(back_edge.index).is_empty();
                let looping_vehicle = a.back_mode != Some(TraverseMode::Walk)
                    && ctx.is_close_to_start_or_end(a.vertex);
                if restricted || looping_vehicle {
                    return false;
                }
            }
        }

        self.better_or_equal(a, b)
    }

    /// Cost comparison of the strategy, without any comparability check
    pub fn better_or_equal(self, a: &State, b: &State) -> bool {
        match self {
            Self::MinimumWeight => a.weight <= b.weight,
            Self::EarliestArrival => a.elapsed_time <= b.elapsed_time,
            Self::LeastWalk => a.walk_distance <= b.walk_distance,
            Self::Pareto => {
                a.elapsed_time <= b.elapsed_time + PARETO_EPSILON
                    && a.weight <= b.weight + PARETO_EPSILON
            }
        }
    }
}
