use petgraph::stable_graph::EdgeIndex;

use super::mode::{TraverseMode, TraverseModeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRestrictionKind {
    /// The `to` edge must not be taken after `from`
    NoTurn,
    /// The `to` edge is the only edge that may be taken after `from`
    OnlyTurn,
}

/// Rule attached to the incoming (`from`) street edge of an intersection
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRestriction {
    pub kind: TurnRestrictionKind,
    pub from: EdgeIndex,
    pub to: EdgeIndex,
    pub modes: TraverseModeSet,
}

impl TurnRestriction {
    pub fn new(
        kind: TurnRestrictionKind,
        from: EdgeIndex,
        to: EdgeIndex,
        modes: TraverseModeSet,
    ) -> Self {
        Self {
            kind,
            from,
            to,
            modes,
        }
    }

    /// Whether turning onto `next` is forbidden by this restriction for `mode`
    pub fn forbids(&self, next: EdgeIndex, mode: TraverseMode) -> bool {
        if !self.modes.contains(mode) {
            return false;
        }
        match self.kind {
            TurnRestrictionKind::NoTurn => next == self.to,
            TurnRestrictionKind::OnlyTurn => next != self.to,
        }
    }
}
