//! Where cards are: decks, hands, persistent slots and the discard pile.
//!
//! ## Key Types
//!
//! - `CardUid`: One physical card copy
//! - `CardDeck`: Universal and gold draw piles plus the discard pile
//! - `Hand`: Fixed hand slots and persistent slots for one player
//! - `CardZones`: Owns all copies and keeps their locations consistent

pub mod deck;
pub mod hand;
pub mod manager;

pub use deck::{CardDeck, Draw};
pub use hand::{Hand, PersistentCard};
pub use manager::{CardInstance, CardLocation, CardUid, CardZones, DrawOutcome};
