//! Turn rules and the match controller.
//!
//! - `TurnState`/`Phase`: who may act and with what
//! - `Rulebook`: the card set in play
//! - `Match`: applies actions and selections, enforces the win condition
//! - `MatchView`: what one player is allowed to see

pub mod engine;
pub mod legal;
pub mod rulebook;
pub mod turn;
pub mod view;

pub use engine::{GameResult, Match};
pub use rulebook::{Rulebook, RulebookError};
pub use turn::{Phase, TurnState};
pub use view::{MatchView, PlayerView, TileView};
