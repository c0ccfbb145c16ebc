//! Python bindings for the dig-engine rules engine.
//!
//! A thin transport: every method forwards to `Match` and reports
//! `(accepted, reason)`. No rules live here.
//!
//! # Quick Start
//!
//! ```python
//! import dig_engine
//!
//! game = dig_engine.Match(seed=42)
//! ok, reason = game.start_turn(1)
//! ok, reason = game.to_then(1)
//! ok, reason = game.dig(1, 10)
//! state = game.save()
//! ```

use pyo3::prelude::*;

mod py_match;

pub use py_match::*;

/// dig_engine: rules engine for the tile digging card game.
#[pymodule]
fn dig_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMatch>()?;
    Ok(())
}
