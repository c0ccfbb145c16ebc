//! Card effects: what activated cards do.
//!
//! - `EffectSpec`: Effect templates, parameterised per card
//! - `EffectLibrary`: Effect lookup by name
//! - `EffectProcedure`: A running effect, suspended while it waits for
//!   a selection
//! - `targeting`: Legal targets for each kind of step
//!
//! ## Design Philosophy
//!
//! There is one state machine per template, not one per card. Cards
//! differ only in the numbers and filters of their `EffectSpec`.

mod effect;
mod procedure;
pub mod targeting;

pub use effect::{EffectLibrary, EffectSpec, FamilyChoice, MaterialChoice, Passive, PlaceSource};
pub use procedure::{EffectContext, EffectProcedure};
