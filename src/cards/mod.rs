//! Card system: definitions, registry, the standard card set and the
//! card-value payment rule.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data (suit, cost, effect name)
//! - `CardRegistry`: Card definition lookup
//! - `DeckList`: How many copies of each card go into which deck
//! - `CardRequirement`: A payment in cards, checked by the value rule
//!
//! Individual copies are tracked by `zones::CardUid`.

pub mod definition;
pub mod library;
pub mod registry;
pub mod selection;

pub use definition::{CardDefinition, CardId};
pub use library::{standard_cards, DeckKind, DeckList};
pub use registry::CardRegistry;
pub use selection::{CardRequirement, SuitRequirement};
