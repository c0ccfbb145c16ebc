//! Board topology and nearest-ring adjacency.
//!
//! Adjacency is derived from cell positions rather than a hardcoded grid:
//! the board's lattice spacing is the smallest positive distance between
//! any two cells, and two cells are adjacent when their distance equals
//! that spacing within a relative tolerance. Using one board-wide spacing
//! (instead of a per-cell nearest distance) keeps the relation symmetric
//! on irregular boards.
//!
//! ```
//! use dig_engine::board::{BoardLayout, BoardTopology, CellId};
//!
//! let topology = BoardTopology::from_layout(&BoardLayout::Rect { width: 3, height: 3 });
//! // Centre cell of a 3×3 grid has four orthogonal neighbours.
//! assert_eq!(topology.adjacent_cells(CellId(4)).len(), 4);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Relative tolerance used when grouping distances.
pub const DISTANCE_EPSILON: f32 = 1e-3;

/// Board cell index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u16);

impl CellId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({})", self.0)
    }
}

/// Shape of the board to generate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoardLayout {
    /// Rectangular grid with unit spacing, row-major ids.
    Rect { width: u16, height: u16 },
    /// Hexagon of hex cells with unit centre spacing.
    Hex { radius: u16 },
    /// Arbitrary positions.
    Custom(Vec<(f32, f32)>),
}

impl BoardLayout {
    /// Generate cell centre positions.
    #[must_use]
    pub fn positions(&self) -> Vec<(f32, f32)> {
        match self {
            BoardLayout::Rect { width, height } => (0..*height)
                .flat_map(|y| (0..*width).map(move |x| (f32::from(x), f32::from(y))))
                .collect(),
            BoardLayout::Hex { radius } => {
                let r = i32::from(*radius);
                let sqrt3 = 3f32.sqrt();
                let mut out = Vec::new();
                for q in -r..=r {
                    for s in (-r).max(-q - r)..=r.min(-q + r) {
                        // Axial (q, s) to pixel with unit neighbour distance.
                        let x = q as f32 + s as f32 / 2.0;
                        let y = s as f32 * sqrt3 / 2.0;
                        out.push((x, y));
                    }
                }
                out
            }
            BoardLayout::Custom(points) => points.clone(),
        }
    }
}

/// Cell positions plus the precomputed adjacency relation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardTopology {
    positions: Vec<(f32, f32)>,
    spacing: f32,
    neighbors: Vec<SmallVec<[CellId; 6]>>,
}

impl BoardTopology {
    /// Build the topology for a layout.
    #[must_use]
    pub fn from_layout(layout: &BoardLayout) -> Self {
        Self::from_positions(layout.positions())
    }

    /// Build the topology for explicit positions.
    ///
    /// Panics on more cells than `CellId` can address.
    #[must_use]
    pub fn from_positions(positions: Vec<(f32, f32)>) -> Self {
        assert!(positions.len() <= usize::from(u16::MAX), "board too large");

        let spacing = lattice_spacing(&positions);
        let neighbors = (0..positions.len())
            .map(|i| {
                positions
                    .iter()
                    .enumerate()
                    .filter(|&(j, &p)| j != i && approx_eq(distance(positions[i], p), spacing))
                    .map(|(j, _)| CellId(j as u16))
                    .collect()
            })
            .collect();

        Self {
            positions,
            spacing,
            neighbors,
        }
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over all cell ids.
    pub fn cells(&self) -> impl Iterator<Item = CellId> {
        (0..self.positions.len() as u16).map(CellId)
    }

    /// Check that a cell exists.
    #[must_use]
    pub fn contains(&self, cell: CellId) -> bool {
        cell.index() < self.positions.len()
    }

    /// Position of a cell.
    #[must_use]
    pub fn position(&self, cell: CellId) -> (f32, f32) {
        self.positions[cell.index()]
    }

    /// Lattice spacing (0.0 for boards with fewer than two distinct cells).
    #[must_use]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Cells in the nearest ring around `cell`.
    #[must_use]
    pub fn adjacent_cells(&self, cell: CellId) -> &[CellId] {
        self.neighbors.get(cell.index()).map_or(&[], |n| n.as_slice())
    }

    #[must_use]
    pub fn are_adjacent(&self, a: CellId, b: CellId) -> bool {
        self.adjacent_cells(a).contains(&b)
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= DISTANCE_EPSILON * b.abs().max(1.0)
}

/// Smallest distance between two cells that are not on top of each other.
fn lattice_spacing(positions: &[(f32, f32)]) -> f32 {
    let mut best = f32::INFINITY;
    for (i, &a) in positions.iter().enumerate() {
        for &b in &positions[i + 1..] {
            let d = distance(a, b);
            if d > DISTANCE_EPSILON && d < best {
                best = d;
            }
        }
    }
    if best.is_finite() {
        best
    } else {
        0.0
    }
}
