//! Building kinds.
//!
//! Three building families share stock and price curves; mines are
//! further split by the material they produce.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::resource::ResourceKind;

/// Family of buildings. Stock (`RemainingToBuild`) and price are per family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildingFamily {
    /// Each Factory draws one extra card at end of turn.
    Factory,
    /// Each Burrow grants one extra card activation per turn.
    Burrow,
    /// Each Mine claims one unit of its material from Supply at turn start.
    Mine,
}

impl BuildingFamily {
    pub const ALL: [BuildingFamily; 3] =
        [BuildingFamily::Factory, BuildingFamily::Burrow, BuildingFamily::Mine];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            BuildingFamily::Factory => 0,
            BuildingFamily::Burrow => 1,
            BuildingFamily::Mine => 2,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BuildingFamily::Factory => "Factory",
            BuildingFamily::Burrow => "Burrow",
            BuildingFamily::Mine => "Mine",
        }
    }
}

impl std::fmt::Display for BuildingFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing a building name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown building '{0}'")]
pub struct ParseBuildingError(pub String);

impl FromStr for BuildingFamily {
    type Err = ParseBuildingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildingFamily::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseBuildingError(s.to_string()))
    }
}

/// A concrete building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Factory,
    Burrow,
    /// Mines only produce layered materials, never gold.
    Mine(ResourceKind),
}

impl BuildingKind {
    /// Every buildable kind.
    pub const ALL: [BuildingKind; 5] = [
        BuildingKind::Factory,
        BuildingKind::Burrow,
        BuildingKind::Mine(ResourceKind::Grass),
        BuildingKind::Mine(ResourceKind::Dirt),
        BuildingKind::Mine(ResourceKind::Stone),
    ];

    #[must_use]
    pub const fn family(self) -> BuildingFamily {
        match self {
            BuildingKind::Factory => BuildingFamily::Factory,
            BuildingKind::Burrow => BuildingFamily::Burrow,
            BuildingKind::Mine(_) => BuildingFamily::Mine,
        }
    }

    /// Card suit used to pay for this building.
    #[must_use]
    pub const fn suit(self) -> ResourceKind {
        match self {
            BuildingKind::Factory => ResourceKind::Stone,
            BuildingKind::Burrow => ResourceKind::Dirt,
            BuildingKind::Mine(kind) => kind,
        }
    }

    /// Gold mines do not exist.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self, BuildingKind::Mine(ResourceKind::Gold))
    }

    /// Slot in per-kind arrays (see [`BuildingKind::ALL`]).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            BuildingKind::Factory => 0,
            BuildingKind::Burrow => 1,
            BuildingKind::Mine(kind) => 2 + kind.index(),
        }
    }
}

impl std::fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildingKind::Mine(kind) => write!(f, "{kind} Mine"),
            other => f.write_str(other.family().name()),
        }
    }
}
