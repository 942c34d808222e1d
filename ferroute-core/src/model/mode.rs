//! Travel modes and mode sets

use serde::{Deserialize, Serialize};

/// Mode used to traverse a single edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraverseMode {
    Walk,
    Bicycle,
    Car,
    Transit,
}

impl TraverseMode {
    const ALL: [TraverseMode; 4] = [Self::Walk, Self::Bicycle, Self::Car, Self::Transit];

    pub fn is_driving(self) -> bool {
        self == Self::Car
    }

    pub fn is_cycling(self) -> bool {
        self == Self::Bicycle
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Compact set of [`TraverseMode`]s.
///
/// Used both for the modes a request allows and for the permissions of a
/// street edge. Serialized as a list of mode names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<TraverseMode>", into = "Vec<TraverseMode>")]
pub struct TraverseModeSet(u8);

impl TraverseModeSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn new(modes: &[TraverseMode]) -> Self {
        modes.iter().copied().collect()
    }

    /// Walking, cycling and driving: the usual permission of an open street.
    pub fn all_street() -> Self {
        Self::new(&[TraverseMode::Walk, TraverseMode::Bicycle, TraverseMode::Car])
    }

    pub fn pedestrian() -> Self {
        Self::new(&[TraverseMode::Walk])
    }

    pub fn contains(self, mode: TraverseMode) -> bool {
        self.0 & mode.bit() != 0
    }

    #[must_use]
    pub fn with(self, mode: TraverseMode) -> Self {
        Self(self.0 | mode.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn walk(self) -> bool {
        self.contains(TraverseMode::Walk)
    }

    pub fn bicycle(self) -> bool {
        self.contains(TraverseMode::Bicycle)
    }

    pub fn car(self) -> bool {
        self.contains(TraverseMode::Car)
    }

    pub fn transit(self) -> bool {
        self.contains(TraverseMode::Transit)
    }

    pub fn iter(self) -> impl Iterator<Item = TraverseMode> {
        TraverseMode::ALL
            .into_iter()
            .filter(move |mode| self.contains(*mode))
    }
}

impl FromIterator<TraverseMode> for TraverseModeSet {
    fn from_iter<I: IntoIterator<Item = TraverseMode>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, mode| set.with(mode))
    }
}

impl From<Vec<TraverseMode>> for TraverseModeSet {
    fn from(modes: Vec<TraverseMode>) -> Self {
        modes.into_iter().collect()
    }
}

impl From<TraverseModeSet> for Vec<TraverseMode> {
    fn from(set: TraverseModeSet) -> Self {
        set.iter().collect()
    }
}

impl From<TraverseMode> for TraverseModeSet {
    fn from(mode: TraverseMode) -> Self {
        Self::empty().with(mode)
    }
}
