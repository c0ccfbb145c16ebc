//! Resource and building economy.
//!
//! - `ResourceLedger`: per-player Collected/Refined piles and the shared
//!   Supply. Spent units always return to Supply.
//! - `BuildingLedger`: per-player stock, price curve and built counts.
//!
//! Neither ledger knows about the board; callers move units between the
//! board and the ledger explicitly so every unit stays accounted for.

mod buildings;
mod ledger;

pub use buildings::{BuildRecord, BuildingLedger, PlayerBuildings};
pub use ledger::{ResourceLedger, StealSource};
