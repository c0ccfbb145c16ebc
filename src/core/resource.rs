//! Resource kinds and per-kind counters.
//!
//! The four materials double as card suits. Board tiles are layered
//! Grass → Dirt → Stone, with Gold hidden inside some stone layers.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// A tile material, also used as a card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Grass,
    Dirt,
    Stone,
    Gold,
}

impl ResourceKind {
    /// All kinds in ledger order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Grass,
        ResourceKind::Dirt,
        ResourceKind::Stone,
        ResourceKind::Gold,
    ];

    /// Kinds that make up the physical board layers (no gold).
    pub const LAYERED: [ResourceKind; 3] =
        [ResourceKind::Grass, ResourceKind::Dirt, ResourceKind::Stone];

    /// Index into per-kind arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            ResourceKind::Grass => 0,
            ResourceKind::Dirt => 1,
            ResourceKind::Stone => 2,
            ResourceKind::Gold => 3,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ResourceKind::Grass => "Grass",
            ResourceKind::Dirt => "Dirt",
            ResourceKind::Stone => "Stone",
            ResourceKind::Gold => "Gold",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing a resource name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource kind '{0}'")]
pub struct ParseResourceError(pub String);

impl FromStr for ResourceKind {
    type Err = ParseResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseResourceError(s.to_string()))
    }
}

/// One counter per resource kind.
///
/// ```
/// use dig_engine::core::{ResourceKind, ResourceMap};
///
/// let cost = ResourceMap::from_pairs(&[(ResourceKind::Grass, 2)]);
/// let mut refined = ResourceMap::from_pairs(&[(ResourceKind::Grass, 3)]);
///
/// assert!(refined.covers(&cost));
/// refined.subtract(&cost);
/// assert_eq!(refined[ResourceKind::Grass], 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceMap {
    counts: [u32; 4],
}

impl ResourceMap {
    /// All counters at zero.
    #[must_use]
    pub const fn empty() -> Self {
        Self { counts: [0; 4] }
    }

    /// Build from (kind, amount) pairs. Repeated kinds accumulate.
    #[must_use]
    pub fn from_pairs(pairs: &[(ResourceKind, u32)]) -> Self {
        let mut map = Self::empty();
        for &(kind, amount) in pairs {
            map[kind] += amount;
        }
        map
    }

    /// Same amount of every kind.
    #[must_use]
    pub const fn uniform(amount: u32) -> Self {
        Self { counts: [amount; 4] }
    }

    /// Sum over all kinds.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// True if every counter is at least the matching counter in `other`.
    #[must_use]
    pub fn covers(&self, other: &ResourceMap) -> bool {
        ResourceKind::ALL.iter().all(|&k| self[k] >= other[k])
    }

    /// Add every counter of `other`.
    pub fn add(&mut self, other: &ResourceMap) {
        for kind in ResourceKind::ALL {
            self[kind] += other[kind];
        }
    }

    /// Subtract every counter of `other`.
    ///
    /// Panics if any counter would go negative; callers check `covers` first.
    pub fn subtract(&mut self, other: &ResourceMap) {
        assert!(
            self.covers(other),
            "resource counter would go negative: {self:?} - {other:?}"
        );
        for kind in ResourceKind::ALL {
            self[kind] -= other[kind];
        }
    }

    /// Move everything out, leaving zeros behind.
    pub fn take_all(&mut self) -> ResourceMap {
        std::mem::take(self)
    }

    /// Iterate over (kind, count) pairs, including zeros.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        ResourceKind::ALL.into_iter().map(move |k| (k, self[k]))
    }

    /// Iterate over kinds with a non-zero count.
    pub fn nonzero(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.iter().filter(|&(_, n)| n > 0)
    }
}

impl Index<ResourceKind> for ResourceMap {
    type Output = u32;

    fn index(&self, kind: ResourceKind) -> &Self::Output {
        &self.counts[kind.index()]
    }
}

impl IndexMut<ResourceKind> for ResourceMap {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut Self::Output {
        &mut self.counts[kind.index()]
    }
}

impl std::fmt::Display for ResourceMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .nonzero()
            .map(|(kind, n)| format!("{kind}:{n}"))
            .collect();
        if parts.is_empty() {
            f.write_str("{}")
        } else {
            write!(f, "{{{}}}", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("grass".parse::<ResourceKind>(), Ok(ResourceKind::Grass));
        assert_eq!("GOLD".parse::<ResourceKind>(), Ok(ResourceKind::Gold));
        assert!("Mud".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_from_pairs_accumulates() {
        let map = ResourceMap::from_pairs(&[
            (ResourceKind::Dirt, 1),
            (ResourceKind::Dirt, 2),
            (ResourceKind::Stone, 1),
        ]);

        assert_eq!(map[ResourceKind::Dirt], 3);
        assert_eq!(map[ResourceKind::Stone], 1);
        assert_eq!(map.total(), 4);
    }

    #[test]
    fn test_covers() {
        let have = ResourceMap::from_pairs(&[(ResourceKind::Grass, 2), (ResourceKind::Gold, 1)]);

        assert!(have.covers(&ResourceMap::from_pairs(&[(ResourceKind::Grass, 2)])));
        assert!(!have.covers(&ResourceMap::from_pairs(&[(ResourceKind::Grass, 3)])));
        assert!(have.covers(&ResourceMap::empty()));
    }

    #[test]
    #[should_panic(expected = "would go negative")]
    fn test_subtract_underflow_panics() {
        let mut have = ResourceMap::from_pairs(&[(ResourceKind::Grass, 1)]);
        have.subtract(&ResourceMap::from_pairs(&[(ResourceKind::Grass, 2)]));
    }

    #[test]
    fn test_take_all() {
        let mut map = ResourceMap::uniform(2);
        let taken = map.take_all();

        assert_eq!(taken.total(), 8);
        assert!(map.is_empty());
    }

    #[test]
    fn test_display() {
        let map = ResourceMap::from_pairs(&[(ResourceKind::Grass, 2), (ResourceKind::Stone, 1)]);
        assert_eq!(map.to_string(), "{Grass:2, Stone:1}");
        assert_eq!(ResourceMap::empty().to_string(), "{}");
    }
}
