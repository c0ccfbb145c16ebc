//! Rejection taxonomy.
//!
//! Every rejected action or selection leaves match state untouched and
//! carries a human-readable reason (its `Display`). None of these are
//! fatal; invariant violations inside the engine panic instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::building::BuildingFamily;
use super::resource::ResourceMap;
use crate::zones::CardUid;

/// Why an action or selection was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// Action attempted outside its phase, or by the wrong player.
    #[error("{action} is not allowed now: {reason}")]
    IllegalPhaseOrPlayer { action: String, reason: String },

    /// Card cost or transfer shortfall.
    #[error("insufficient resources: need {needed}, have {available}")]
    InsufficientResources {
        needed: ResourceMap,
        available: ResourceMap,
    },

    /// Building stock for the family is exhausted.
    #[error("no {0} left to build")]
    NoneRemaining(BuildingFamily),

    /// Card selection value does not match exactly. Keep selecting.
    #[error("selected cards are worth {selected}, exactly {required} required")]
    InvalidSelectionValue { selected: u32, required: u32 },

    /// No open hand or persistent slot.
    #[error("no open {0} slot")]
    SlotUnavailable(String),

    /// The chosen cell, card, or option is not a legal target.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// A procedure is already waiting for input.
    #[error("another procedure is waiting for input")]
    ProcedureInFlight,

    /// A selection arrived but nothing is waiting for one.
    #[error("nothing is waiting for a selection")]
    NothingPending,

    /// The match has ended.
    #[error("the match is over")]
    MatchOver,

    /// Card is unknown or not where the action needs it.
    #[error("{0} is not available")]
    UnknownCard(CardUid),
}

impl Rejection {
    pub(crate) fn illegal(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Rejection::IllegalPhaseOrPlayer {
            action: action.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn target(reason: impl Into<String>) -> Self {
        Rejection::InvalidTarget(reason.into())
    }

    /// Reason string for display.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
