//! Effect definitions.
//!
//! Every card runs one effect, looked up by name in an [`EffectLibrary`].
//! Effects are data: a handful of templates, each parameterised by
//! counts and filters, cover the whole card set.
//!
//! ## Templates
//!
//! - `Place`: put units back on the board (from Supply or Collected)
//! - `Dig`: dig cells next to the player's pawns
//! - `Damage`: roll damage against opposing buildings
//! - `Steal`: take units from the opponent, Collected first
//! - `Claim`: take units from the Supply
//! - `Flip`: reveal hidden stone cells
//! - `MovePawn`: extra pawn steps
//! - `Persistent`: occupy a persistent slot with a passive
//! - `Immediate`: score and draws, no input needed

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{BuildingFamily, ResourceKind};

/// Which material a Place effect uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialChoice {
    Fixed(ResourceKind),
    /// The player picks one material when the effect starts.
    Chosen,
}

/// Where placed units come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceSource {
    Supply,
    /// The acting player's own Collected pile.
    Collected,
}

/// Which buildings a Damage effect may hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FamilyChoice {
    Any,
    Fixed(BuildingFamily),
    Chosen,
}

/// Abilities of persistent cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Passive {
    /// +1 score for each gold found by a Flip effect.
    DiscerningEye,
    /// Next building costs one card, then this card is discarded.
    MasterBuilder,
    /// Cancels the next disaster aimed at the owner, then is discarded.
    Safeguard,
    /// One extra Then-phase action per round.
    Foreman,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectSpec {
    /// Score `reward` only if all `count` units were placed.
    Place {
        material: MaterialChoice,
        count: u32,
        source: PlaceSource,
        reward: u32,
    },
    /// `material` filters by layer; a gold-bearing stone counts as Stone.
    Dig {
        material: Option<ResourceKind>,
        count: u32,
    },
    Damage { family: FamilyChoice, budget: u32 },
    Steal {
        kind: Option<ResourceKind>,
        budget: u32,
    },
    Claim { budget: u32 },
    Flip { count: u32 },
    MovePawn { steps: u32 },
    Persistent(Passive),
    Immediate {
        score: u32,
        draw: u32,
        gold_draw: u32,
    },
}

impl EffectSpec {
    #[must_use]
    pub fn passive(&self) -> Option<Passive> {
        match self {
            EffectSpec::Persistent(p) => Some(*p),
            _ => None,
        }
    }
}

/// Named effects.
///
/// ## Example
///
/// ```
/// use dig_engine::effects::{EffectLibrary, EffectSpec};
///
/// let mut library = EffectLibrary::new();
/// library.register("windfall", EffectSpec::Immediate { score: 1, draw: 0, gold_draw: 0 });
/// assert!(library.get("windfall").is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct EffectLibrary {
    effects: FxHashMap<String, EffectSpec>,
}

impl EffectLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an effect. Panics if the name is taken.
    pub fn register(&mut self, name: impl Into<String>, spec: EffectSpec) {
        let name = name.into();
        if self.effects.contains_key(&name) {
            panic!("Effect {name:?} already registered");
        }
        self.effects.insert(name, spec);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EffectSpec> {
        self.effects.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Effects of the standard card set.
    #[must_use]
    pub fn standard() -> Self {
        use EffectSpec::*;
        use ResourceKind::{Dirt, Gold, Grass, Stone};

        let place = |material, count, source, reward| Place { material, count, source, reward };
        let immediate = |score, draw, gold_draw| Immediate { score, draw, gold_draw };

        let mut lib = Self::new();
        lib.register("seed_scatter", place(MaterialChoice::Fixed(Grass), 2, PlaceSource::Supply, 1));
        lib.register("overgrowth", place(MaterialChoice::Fixed(Grass), 3, PlaceSource::Supply, 2));
        lib.register("topsoil", place(MaterialChoice::Fixed(Dirt), 2, PlaceSource::Supply, 1));
        lib.register("landfill", place(MaterialChoice::Chosen, 3, PlaceSource::Collected, 2));
        lib.register("bedrock_mending", place(MaterialChoice::Fixed(Stone), 2, PlaceSource::Supply, 1));

        lib.register("shovel_crew", Dig { material: Some(Grass), count: 2 });
        lib.register("excavation", Dig { material: None, count: 2 });
        lib.register("deep_dig", Dig { material: Some(Stone), count: 2 });
        lib.register("trenching", Dig { material: Some(Dirt), count: 3 });
        lib.register("golden_shovel", Dig { material: None, count: 3 });

        lib.register("rockslide", Damage { family: FamilyChoice::Any, budget: 2 });
        lib.register("sabotage", Damage { family: FamilyChoice::Chosen, budget: 2 });
        lib.register("flood", Damage { family: FamilyChoice::Fixed(BuildingFamily::Mine), budget: 3 });
        lib.register("termites", Damage { family: FamilyChoice::Fixed(BuildingFamily::Burrow), budget: 2 });

        lib.register("pilfer", Steal { kind: None, budget: 2 });
        lib.register("raid", Steal { kind: None, budget: 3 });
        lib.register("gold_heist", Steal { kind: Some(Gold), budget: 1 });

        lib.register("forage", Claim { budget: 2 });
        lib.register("quarry_cart", Claim { budget: 3 });

        lib.register("survey", Flip { count: 3 });
        lib.register("prospecting", Flip { count: 2 });
        lib.register("treasure_map", Flip { count: 4 });

        lib.register("trailblazer", MovePawn { steps: 2 });
        lib.register("tunnel_run", MovePawn { steps: 3 });

        lib.register("discerning_eye", Persistent(Passive::DiscerningEye));
        lib.register("master_builder", Persistent(Passive::MasterBuilder));
        lib.register("safeguard", Persistent(Passive::Safeguard));
        lib.register("foreman", Persistent(Passive::Foreman));

        lib.register("harvest_festival", immediate(1, 1, 0));
        lib.register("scrounge", immediate(0, 2, 0));
        lib.register("transmutation", immediate(1, 0, 0));
        lib.register("midas_touch", immediate(2, 0, 0));
        lib.register("gilded_vault", immediate(2, 0, 1));
        lib
    }
}
