//! Match bindings.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::board::{CellId, PawnId};
use crate::core::{
    ActionKind, ActionResult, BuildingFamily, BuildingKind, MatchConfig, PlayerId, ResourceKind,
    Selection,
};
use crate::rules::{GameResult, Match};
use crate::zones::CardUid;

/// Players are numbered 1 and 2 on the Python side.
fn player(number: u8) -> PyResult<PlayerId> {
    number
        .checked_sub(1)
        .and_then(|i| PlayerId::from_index(usize::from(i)))
        .ok_or_else(|| PyValueError::new_err(format!("no player {number}")))
}

fn resource(name: &str) -> PyResult<ResourceKind> {
    name.parse()
        .map_err(|e: crate::core::ParseResourceError| PyValueError::new_err(e.to_string()))
}

fn report(result: ActionResult) -> (bool, String) {
    match result.rejection() {
        Some(reason) => (false, reason.reason()),
        None => (true, String::new()),
    }
}

/// Python wrapper for Match.
#[pyclass(name = "Match")]
pub struct PyMatch(pub Match);

impl PyMatch {
    fn act(&mut self, number: u8, action: ActionKind) -> PyResult<(bool, String)> {
        let player = player(number)?;
        let phase = self.0.phase();
        Ok(report(self.0.submit_action(player, phase, action)))
    }

    fn select(&mut self, number: u8, selection: Selection) -> PyResult<(bool, String)> {
        let player = player(number)?;
        Ok(report(self.0.submit_selection(player, selection)))
    }
}

#[pymethods]
impl PyMatch {
    #[new]
    #[pyo3(signature = (seed, starting_player = 1))]
    fn new(seed: u64, starting_player: u8) -> PyResult<Self> {
        let starting = player(starting_player)?;
        Match::start(starting, MatchConfig::default(), seed)
            .map(Self)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    // === Actions ===

    fn start_turn(&mut self, player: u8) -> PyResult<(bool, String)> {
        self.act(player, ActionKind::StartTurn)
    }

    fn to_then(&mut self, player: u8) -> PyResult<(bool, String)> {
        self.act(player, ActionKind::ToThen)
    }

    fn to_finally(&mut self, player: u8) -> PyResult<(bool, String)> {
        self.act(player, ActionKind::ToFinally)
    }

    fn end_turn(&mut self, player: u8) -> PyResult<(bool, String)> {
        self.act(player, ActionKind::EndTurn)
    }

    fn back(&mut self, player: u8) -> PyResult<(bool, String)> {
        self.act(player, ActionKind::Back)
    }

    fn retrieve(&mut self, player: u8) -> PyResult<(bool, String)> {
        self.act(player, ActionKind::Retrieve)
    }

    fn move_pawn(&mut self, player: u8, pawn: u16, to: u16) -> PyResult<(bool, String)> {
        self.act(
            player,
            ActionKind::MovePawn {
                pawn: PawnId(pawn),
                to: CellId(to),
            },
        )
    }

    #[pyo3(signature = (player, cell, reveal_gold = true))]
    fn dig(&mut self, player: u8, cell: u16, reveal_gold: bool) -> PyResult<(bool, String)> {
        self.act(
            player,
            ActionKind::Dig {
                cell: CellId(cell),
                reveal_gold,
            },
        )
    }

    /// `family` is "factory", "burrow" or "mine"; mines also need `material`.
    #[pyo3(signature = (player, family, cell, material = None))]
    fn build(
        &mut self,
        player: u8,
        family: &str,
        cell: u16,
        material: Option<&str>,
    ) -> PyResult<(bool, String)> {
        let family: BuildingFamily = family
            .parse()
            .map_err(|e: crate::core::ParseBuildingError| PyValueError::new_err(e.to_string()))?;
        let kind = match (family, material) {
            (BuildingFamily::Factory, _) => BuildingKind::Factory,
            (BuildingFamily::Burrow, _) => BuildingKind::Burrow,
            (BuildingFamily::Mine, Some(m)) => BuildingKind::Mine(resource(m)?),
            (BuildingFamily::Mine, None) => {
                return Err(PyValueError::new_err("a mine needs a material"));
            }
        };
        self.act(player, ActionKind::Build { kind, cell: CellId(cell) })
    }

    fn activate_card(&mut self, player: u8, card: u32) -> PyResult<(bool, String)> {
        self.act(player, ActionKind::ActivateCard { card: CardUid(card) })
    }

    // === Selections ===

    fn select_cards(&mut self, player: u8, cards: Vec<u32>) -> PyResult<(bool, String)> {
        let cards: Vec<CardUid> = cards.into_iter().map(CardUid).collect();
        self.select(player, Selection::cards(&cards))
    }

    fn select_cell(&mut self, player: u8, cell: u16) -> PyResult<(bool, String)> {
        self.select(player, Selection::Cell(CellId(cell)))
    }

    fn select_resource(&mut self, player: u8, kind: &str) -> PyResult<(bool, String)> {
        let kind = resource(kind)?;
        self.select(player, Selection::Resource(kind))
    }

    fn select_family(&mut self, player: u8, family: &str) -> PyResult<(bool, String)> {
        let family = family
            .parse()
            .map_err(|e: crate::core::ParseBuildingError| PyValueError::new_err(e.to_string()))?;
        self.select(player, Selection::Family(family))
    }

    fn select_pawn_step(&mut self, player: u8, pawn: u16, to: u16) -> PyResult<(bool, String)> {
        self.select(
            player,
            Selection::PawnStep {
                pawn: PawnId(pawn),
                to: CellId(to),
            },
        )
    }

    fn reveal_gold(&mut self, player: u8, reveal: bool) -> PyResult<(bool, String)> {
        self.select(player, Selection::RevealGold(reveal))
    }

    fn finish(&mut self, player: u8) -> PyResult<(bool, String)> {
        self.select(player, Selection::Finish)
    }

    // === Queries ===

    #[getter]
    fn phase(&self) -> String {
        self.0.phase().to_string()
    }

    #[getter]
    fn current_player(&self) -> u8 {
        self.0.current_player().index() as u8 + 1
    }

    #[getter]
    fn round(&self) -> u32 {
        self.0.round()
    }

    fn score(&self, player: u8) -> PyResult<u32> {
        Ok(self.0.score(self::player(player)?))
    }

    fn is_over(&self) -> bool {
        self.0.result().is_some()
    }

    /// Winning player number, or None while running.
    fn winner(&self) -> Option<u8> {
        match self.0.result()? {
            GameResult::Winner(p) => Some(p.index() as u8 + 1),
        }
    }

    fn hand(&self, player: u8) -> PyResult<Vec<u32>> {
        let player = self::player(player)?;
        Ok(self.0.state().zones.hand(player).cards().map(|c| c.0).collect())
    }

    fn save<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = self
            .0
            .save()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyBytes::new_bound(py, &bytes))
    }

    #[staticmethod]
    fn restore(bytes: &[u8]) -> PyResult<Self> {
        Match::restore(bytes)
            .map(Self)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "Match(round={}, player={}, phase={})",
            self.0.round(),
            self.current_player(),
            self.0.phase()
        )
    }
}
