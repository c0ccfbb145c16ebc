//! Deterministic random number generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Serializable**: O(1) state capture and restore, so a saved match
//!   continues with exactly the draws and die rolls it would have made
//! - **Context streams**: Independent sequences for different purposes
//!   (board setup does not perturb deck draws)
//!
//! ```
//! use dig_engine::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.roll_die(4), b.roll_die(4));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::Hasher;

/// Deterministic RNG owned by the match authority.
///
/// Uses ChaCha8 for speed while keeping a compact, restorable state.
/// Serializes as its [`GameRngState`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "GameRngState", from = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed
    /// on any toolchain: the seed and the context bytes go straight into
    /// `FxHasher`, whose output is fixed for a given word size and
    /// endianness.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write_u64(self.seed);
        hasher.write(context.as_bytes());
        Self::new(hasher.finish())
    }

    /// Uniform index into a non-empty collection of `len` items.
    pub fn pick_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick from an empty collection");
        self.inner.gen_range(0..len)
    }

    /// Roll a die with `sides` faces, returning 1..=sides.
    pub fn roll_die(&mut self, sides: u32) -> u32 {
        assert!(sides > 0, "a die needs at least one side");
        self.inner.gen_range(1..=sides)
    }

    /// Choose `amount` distinct elements, uniformly. Used for gold
    /// placement at board setup.
    pub fn sample<T: Copy>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        items
            .choose_multiple(&mut self.inner, amount)
            .copied()
            .collect()
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        GameRng::from_state(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        let draws = |rng: &mut GameRng| (0..50).map(|_| rng.pick_index(33)).collect::<Vec<_>>();

        assert_eq!(draws(&mut a), draws(&mut b));
        assert_ne!(draws(&mut GameRng::new(1)), draws(&mut GameRng::new(2)));
    }

    #[test]
    fn test_context_streams_differ() {
        let rng = GameRng::new(42);
        let mut board = rng.for_context("board");
        let mut deck = rng.for_context("deck");

        let cells: Vec<u16> = (0..49).collect();
        assert_ne!(board.sample(&cells, 12), deck.sample(&cells, 12));
    }

    #[test]
    #[cfg(all(target_pointer_width = "64", target_endian = "little"))]
    fn test_context_seed_is_pinned() {
        // Saved matches depend on this value staying put.
        let board = GameRng::new(42).for_context("board");
        assert_eq!(board.state().seed, 0xe8ec_c74b_87a2_3a64);
        assert_eq!(board.state().word_pos, 0);
    }

    #[test]
    fn test_roll_die_bounds() {
        let mut rng = GameRng::new(9);
        for _ in 0..200 {
            let roll = rng.roll_die(4);
            assert!((1..=4).contains(&roll));
        }
    }

    #[test]
    fn test_sample_is_distinct() {
        let mut rng = GameRng::new(3);
        let items: Vec<u32> = (0..49).collect();

        let mut picked = rng.sample(&items, 12);
        picked.sort_unstable();
        picked.dedup();

        assert_eq!(picked.len(), 12);
    }

    #[test]
    fn test_state_restore() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            rng.pick_index(20);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.roll_die(4)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.roll_die(4)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_rng_serde_uses_state() {
        let mut rng = GameRng::new(11);
        rng.roll_die(20);

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: GameRng = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.state(), rng.state());
        assert_eq!(restored.roll_die(20), rng.roll_die(20));
    }
}
