//! # dig-engine
//!
//! Rules engine for a two-player board game of digging layered terrain,
//! refining what you dig, and spending cards to build and to interfere
//! with the opponent.
//!
//! ## Design Principles
//!
//! 1. **Authoritative**: The engine owns the match. Front-ends submit
//!    actions and selections and render what comes back; they never
//!    mutate state directly.
//!
//! 2. **Atomic Inputs**: A rejected action or selection leaves the match
//!    exactly as it was. Accepted inputs report what changed as a list of
//!    `MatchEvent`s.
//!
//! 3. **Deterministic**: Every random draw goes through one seeded
//!    `GameRng`. The same seed and the same inputs give the same match.
//!
//! ## Architecture
//!
//! - **Explicit pending input**: Payments and multi-step card effects are
//!   stored on the state as data (`Pending`) and resumed by selections.
//!
//! - **Snapshots**: `MatchState` serializes with bincode, so a match can be
//!   saved and restored mid-turn.
//!
//! ## Modules
//!
//! - `core`: Players, resources, buildings, actions, events, errors, state
//! - `board`: Cell topology, layered tiles, pawns and buildings on the map
//! - `economy`: Resource ledger and building prices
//! - `cards`: Card definitions, registry and the standard card list
//! - `zones`: Decks, hands and card instance locations
//! - `effects`: Card effect descriptions and the step-by-step interpreter
//! - `rules`: Turn flow, the `Match` controller and legal action listing

pub mod board;
pub mod cards;
pub mod core;
pub mod economy;
pub mod effects;
pub mod rules;
pub mod zones;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    ActionKind, ActionRecord, ActionResult, Awaiting, BuildingFamily, BuildingKind, ConfigError,
    GameRng, MatchConfig, MatchEvent, MatchState, Outcome, PlayerId, PlayerMap, Rejection,
    ResourceKind, ResourceMap, Selection,
};

pub use crate::board::{Board, BoardLayout, CellId, Layer, PawnId};

pub use crate::economy::{BuildingLedger, ResourceLedger};

pub use crate::cards::{CardDefinition, CardId, CardRegistry, CardRequirement, DeckKind};

pub use crate::zones::{CardUid, CardZones};

pub use crate::effects::{EffectLibrary, EffectProcedure, EffectSpec};

pub use crate::rules::{GameResult, Match, MatchView, Phase, Rulebook};
