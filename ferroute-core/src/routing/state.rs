//! Search states and the per-search state arena

use std::ops::Index;
use std::sync::Arc;

use petgraph::stable_graph::{EdgeIndex, NodeIndex};

use super::request::RoutingRequest;
use crate::model::edge::EdgeClass;
use crate::model::mode::TraverseMode;
use crate::model::services::NetworkSet;

/// Index of a state in its [`StateArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Edge a state arrived over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackEdge {
    pub index: EdgeIndex,
    pub class: EdgeClass,
}

/// The comparability tag of a state.
///
/// States on different planes describe different situations (a parked car,
/// a rented bike, having been on board a vehicle) and never dominate each
/// other, whatever their costs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plane {
    pub ever_boarded: bool,
    /// Networks the rented bike may be returned to, `None` if not renting
    pub bike_rental: Option<Arc<NetworkSet>>,
    pub car_parked: bool,
    pub bike_parked: bool,
}

impl Plane {
    pub fn is_bike_renting(&self) -> bool {
        self.bike_rental.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub vertex: NodeIndex,
    pub weight: f64,
    /// Seconds since the search started
    pub elapsed_time: f64,
    /// Metres walked so far
    pub walk_distance: f64,
    pub back_state: Option<StateId>,
    pub back_edge: Option<BackEdge>,
    pub back_mode: Option<TraverseMode>,
    pub plane: Plane,
}

impl State {
    pub fn initial(vertex: NodeIndex) -> Self {
        Self {
            vertex,
            weight: 0.0,
            elapsed_time: 0.0,
            walk_distance: 0.0,
            back_state: None,
            back_edge: None,
            back_mode: None,
            plane: Plane::default(),
        }
    }

    /// Starts a successor of this state at `vertex`, arrived over `edge`.
    ///
    /// Costs are copied from the parent and incremented by the caller.
    pub fn successor(&self, parent: StateId, edge: BackEdge, vertex: NodeIndex) -> Self {
        Self {
            vertex,
            back_state: Some(parent),
            back_edge: Some(edge),
            back_mode: self.back_mode,
            plane: self.plane.clone(),
            ..*self
        }
    }

    pub fn arrived_via(&self, class: EdgeClass) -> bool {
        self.back_edge.is_some_and(|edge| edge.class == class)
    }

    /// Mode used for the next street edge
    pub fn non_transit_mode(&self, request: &RoutingRequest) -> TraverseMode {
        let modes = request.modes;
        if self.plane.is_bike_renting() {
            TraverseMode::Bicycle
        } else if modes.car() && !self.plane.car_parked {
            TraverseMode::Car
        } else if modes.bicycle() && !request.allow_bike_rental && !self.plane.bike_parked {
            TraverseMode::Bicycle
        } else {
            TraverseMode::Walk
        }
    }
}

/// Growable store of every state created by one search.
///
/// Parents are referenced by [`StateId`], so a path is rebuilt by following
/// indices back to the origin.
#[derive(Debug, Default)]
pub struct StateArena {
    states: Vec<State>,
}

impl StateArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: State) -> StateId {
        self.states.push(state);
        StateId(self.states.len() - 1)
    }

    pub fn get(&self, id: StateId) -> Option<&State> {
        self.states.get(id.0)
    }

    /// Parent of a state, if it has one
    pub fn parent(&self, state: &State) -> Option<&State> {
        state.back_state.and_then(|id| self.get(id))
    }

    /// States from the origin up to and including `id`
    pub fn path_to(&self, id: StateId) -> Vec<StateId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(state_id) = current {
            path.push(state_id);
            current = self.get(state_id).and_then(|s| s.back_state);
        }
        path.reverse();
        path
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Index<StateId> for StateArena {
    type Output = State;

    fn index(&self, id: StateId) -> &State {
        &self.states[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mode::TraverseModeSet;

    #[test]
    fn path_follows_parents() {
        let mut arena = StateArena::new();
        let origin = arena.push(State::initial(NodeIndex::new(0)));
        let edge = BackEdge {
            index: EdgeIndex::new(0),
            class: EdgeClass::Street,
        };
        let second = arena.push(arena[origin].successor(origin, edge, NodeIndex::new(1)));
        let third = arena.push(arena[second].successor(second, edge, NodeIndex::new(2)));

        assert_eq!(arena.path_to(third), vec![origin, second, third]);
        assert_eq!(arena.parent(&arena[third]).map(|s| s.vertex), Some(NodeIndex::new(1)));
    }

    #[test]
    fn mode_follows_plane() {
        let request = RoutingRequest {
            modes: TraverseModeSet::new(&[TraverseMode::Car, TraverseMode::Walk]),
            park_and_ride: true,
            ..RoutingRequest::default()
        };
        let mut state = State::initial(NodeIndex::new(0));
        assert_eq!(state.non_transit_mode(&request), TraverseMode::Car);
        state.plane.car_parked = true;
        assert_eq!(state.non_transit_mode(&request), TraverseMode::Walk);

        let renting = RoutingRequest {
            allow_bike_rental: true,
            modes: TraverseModeSet::new(&[TraverseMode::Bicycle, TraverseMode::Walk]),
            ..RoutingRequest::default()
        };
        let mut state = State::initial(NodeIndex::new(0));
        assert_eq!(state.non_transit_mode(&renting), TraverseMode::Walk);
        state.plane.bike_rental = Some(Arc::new(NetworkSet::new()));
        assert_eq!(state.non_transit_mode(&renting), TraverseMode::Bicycle);
    }
}
