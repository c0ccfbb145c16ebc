//! Core engine types: players, resources, buildings, RNG, configuration,
//! actions, events, rejections and the full match state.
//!
//! Everything else in the crate is built from these. Tunable numbers live
//! in `MatchConfig` rather than in the rules code.

pub mod action;
pub mod building;
pub mod config;
pub mod error;
pub mod event;
pub mod player;
pub mod resource;
pub mod rng;
pub mod state;

pub use action::{
    ActionKind, ActionRecord, ActionResult, Awaiting, CellPurpose, Outcome, RecordedInput,
    Selection,
};
pub use building::{BuildingFamily, BuildingKind, ParseBuildingError};
pub use config::{ConfigError, MatchConfig};
pub use error::Rejection;
pub use event::MatchEvent;
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use resource::{ParseResourceError, ResourceKind, ResourceMap};
pub use rng::{GameRng, GameRngState};
pub use state::{MatchState, Payment, PaymentPurpose, Pending, SnapshotError};
