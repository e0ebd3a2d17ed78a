use alloc::string::String;
use alloc::vec::Vec;
use ndarray::Array2;
use rand::Rng;
use rand::RngExt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Discrete stage of the match loop.
///
/// Valid transitions:
/// - Idle -> RoundStart (start)
/// - RoundStart -> Countdown -> Playing -> RoundResult
/// - RoundResult -> RoundStart (next round) or GameEnd
/// - any in-game phase -> GameEnd (forfeit)
/// - GameEnd -> Idle (reset)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Idle,
    RoundStart,
    Countdown,
    Playing,
    RoundResult,
    GameEnd,
}

impl GamePhase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Inside a round, between its intro and its result.
    pub const fn in_round(self) -> bool {
        matches!(
            self,
            Self::RoundStart | Self::Countdown | Self::Playing | Self::RoundResult
        )
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::GameEnd)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundWinner {
    Player,
    Computer,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameWinner {
    Player,
    Computer,
    Tie,
}

/// Outcome of a click or timeout intent aimed at the highlighted cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Stale intent: wrong cell, or the highlight already resolved.
    Ignored,
    /// The player clicked the highlighted cell in time.
    PlayerPoint,
    /// The reaction countdown ran out.
    ComputerPoint,
}

impl ResolveOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// One match from start to finish, owned by a single controller and mutated
/// only through the intent methods below. Stale intents (late timer firings,
/// clicks on the wrong cell) degrade to no-ops rather than errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    settings: GameSettings,
    mask: ShapeMask,
    cells: Array2<CellStatus>,
    phase: GamePhase,
    player_score: u8,
    computer_score: u8,
    current_round: u8,
    current_highlight: Option<CellId>,
    highlight_started_at: Option<TimeMs>,
    last_round_winner: Option<RoundWinner>,
    is_playing: bool,
    did_forfeit: bool,
    config_open: bool,
}

impl GameSession {
    pub fn new(settings: GameSettings) -> Self {
        let settings = settings.clamped();
        let mask = generate_shape_mask(settings.grid_size, settings.shape);
        let cells = Self::fresh_cells(settings.grid_size);
        Self {
            settings,
            mask,
            cells,
            phase: GamePhase::default(),
            player_score: 0,
            computer_score: 0,
            current_round: 0,
            current_highlight: None,
            highlight_started_at: None,
            last_round_winner: None,
            is_playing: false,
            did_forfeit: false,
            config_open: false,
        }
    }

    fn fresh_cells(grid_size: Coord) -> Array2<CellStatus> {
        Array2::default([grid_size as usize, grid_size as usize])
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn grid_size(&self) -> Coord {
        self.settings.grid_size
    }

    pub fn total_cells(&self) -> CellCount {
        self.settings.total_cells()
    }

    pub fn shape_mask(&self) -> &ShapeMask {
        &self.mask
    }

    /// Status of the cell at `id`. Panics if `id` is outside the board.
    pub fn cell_at(&self, id: CellId) -> CellStatus {
        self.cells[self.nd(id)]
    }

    pub fn player_score(&self) -> u8 {
        self.player_score
    }

    pub fn computer_score(&self) -> u8 {
        self.computer_score
    }

    pub fn current_round(&self) -> u8 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u8 {
        self.settings.total_rounds
    }

    pub fn rounds_to_win(&self) -> u8 {
        self.settings.rounds_to_win()
    }

    pub fn time_limit(&self) -> TimeMs {
        self.settings.time_limit
    }

    pub fn current_highlight(&self) -> Option<CellId> {
        self.current_highlight
    }

    pub fn highlight_started_at(&self) -> Option<TimeMs> {
        self.highlight_started_at
    }

    /// Absolute instant the armed highlight times out, if one is armed.
    pub fn highlight_deadline(&self) -> Option<TimeMs> {
        let started = self.highlight_started_at?;
        self.current_highlight?;
        Some(started + self.settings.time_limit)
    }

    pub fn is_highlight_expired(&self, now: TimeMs) -> bool {
        self.highlight_deadline().is_some_and(|deadline| now >= deadline)
    }

    pub fn last_round_winner(&self) -> Option<RoundWinner> {
        self.last_round_winner
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn did_forfeit(&self) -> bool {
        self.did_forfeit
    }

    pub fn is_config_open(&self) -> bool {
        self.config_open
    }

    pub fn player_name(&self) -> &str {
        &self.settings.player_name
    }

    /// Cells still in play this round: under the shape mask and unresolved.
    pub fn eligible_cells(&self) -> Vec<CellId> {
        (0..self.total_cells())
            .filter(|&id| self.mask.is_active(id) && self.cell_at(id).is_default())
            .collect()
    }

    /// Either side has collected enough points to clinch the match.
    pub fn is_match_decided(&self) -> bool {
        let to_win = self.rounds_to_win();
        self.player_score >= to_win || self.computer_score >= to_win
    }

    /// Winner derived from the scores, never stored. A forfeited match
    /// always reads as a computer win, whatever the score was.
    pub fn game_winner(&self) -> GameWinner {
        if self.did_forfeit {
            return GameWinner::Computer;
        }
        if self.player_score > self.computer_score {
            GameWinner::Player
        } else if self.computer_score > self.player_score {
            GameWinner::Computer
        } else {
            GameWinner::Tie
        }
    }

    pub fn start_game(&mut self) {
        self.is_playing = true;
        self.config_open = false;
        self.player_score = 0;
        self.computer_score = 0;
        self.current_round = 1;
        self.cells = Self::fresh_cells(self.settings.grid_size);
        self.current_highlight = None;
        self.last_round_winner = None;
        self.did_forfeit = false;
        self.phase = GamePhase::RoundStart;
        log::debug!(
            "game started: {} rounds on a {}x{} board",
            self.settings.total_rounds,
            self.settings.grid_size,
            self.settings.grid_size,
        );
    }

    /// Round intro done, the countdown takes over. Stray calls from a timer
    /// that outlived its round are ignored.
    pub fn advance_to_countdown(&mut self) {
        if matches!(self.phase, GamePhase::RoundStart) {
            self.phase = GamePhase::Countdown;
        } else {
            log::trace!("advance_to_countdown ignored in {:?}", self.phase);
        }
    }

    /// Countdown finished: enter Playing and arm a highlight. `selected`
    /// forces the target (replays, tests); `None` draws uniformly from the
    /// eligible pool. Returns the highlighted cell.
    ///
    /// With no eligible cell left the round cannot be played out, so it
    /// resolves on the spot as a computer point instead of stalling with
    /// nothing highlighted.
    pub fn advance_to_playing<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        selected: Option<CellId>,
        now: TimeMs,
    ) -> Result<Option<CellId>> {
        if !matches!(self.phase, GamePhase::Countdown) {
            log::trace!("advance_to_playing ignored in {:?}", self.phase);
            return Ok(None);
        }

        let target = match selected {
            Some(id) => Some(self.validate_cell(id)?),
            None => self.pick_highlight_target(rng),
        };

        self.phase = GamePhase::Playing;
        match target {
            Some(id) => {
                self.highlight_cell(id, now)?;
                Ok(Some(id))
            }
            None => {
                log::warn!(
                    "round {}: no eligible cells under the shape mask, round goes to the computer",
                    self.current_round
                );
                self.award_round(RoundWinner::Computer);
                Ok(None)
            }
        }
    }

    /// Uniform draw over the eligible pool, `None` when the pool is empty.
    pub fn pick_highlight_target<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<CellId> {
        let pool = self.eligible_cells();
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.random_range(0..pool.len())])
    }

    /// Lights up `id` and records the start instant. Any previous highlight
    /// is demoted first, so at most one cell is ever highlighted.
    pub fn highlight_cell(&mut self, id: CellId, now: TimeMs) -> Result<()> {
        let id = self.validate_cell(id)?;
        if let Some(prev) = self.current_highlight.take() {
            // normally unreachable, a highlight resolves before the next one
            if self.cell_at(prev).is_highlighted() {
                log::trace!("demoting stale highlight at {}", prev);
                let nd = self.nd(prev);
                self.cells[nd] = CellStatus::Default;
            }
        }
        let nd = self.nd(id);
        self.cells[nd] = CellStatus::Highlighted;
        self.current_highlight = Some(id);
        self.highlight_started_at = Some(now);
        Ok(())
    }

    /// Player clicked cell `id`. Scores only while Playing and only against
    /// the highlighted cell; anything else is a stale click and is ignored.
    pub fn cell_clicked(&mut self, id: CellId) -> Result<ResolveOutcome> {
        let id = self.validate_cell(id)?;
        if !matches!(self.phase, GamePhase::Playing) || self.current_highlight != Some(id) {
            return Ok(ResolveOutcome::Ignored);
        }
        let nd = self.nd(id);
        self.cells[nd] = CellStatus::Correct;
        self.award_round(RoundWinner::Player);
        Ok(ResolveOutcome::PlayerPoint)
    }

    /// The reaction countdown for cell `id` expired. Guarded on the cell
    /// still being the outstanding highlight, which makes a timer firing
    /// that lost the race against a click a no-op.
    pub fn cell_timeout(&mut self, id: CellId) -> Result<ResolveOutcome> {
        let id = self.validate_cell(id)?;
        if self.current_highlight != Some(id) {
            return Ok(ResolveOutcome::Ignored);
        }
        let nd = self.nd(id);
        self.cells[nd] = CellStatus::Wrong;
        self.award_round(RoundWinner::Computer);
        Ok(ResolveOutcome::ComputerPoint)
    }

    /// Advances to the next round's intro. Returns whether a round was
    /// actually started; at the final round this is a guarded no-op and the
    /// caller is expected to end the game instead.
    pub fn next_round(&mut self) -> bool {
        if self.current_round >= self.settings.total_rounds {
            log::trace!("next_round ignored, already at the final round");
            return false;
        }
        self.current_round += 1;
        self.phase = GamePhase::RoundStart;
        self.last_round_winner = None;
        self.clear_highlight();
        // resolved cells keep their marks until the next full reset
        for status in self.cells.iter_mut() {
            if status.is_highlighted() {
                *status = CellStatus::Default;
            }
        }
        log::debug!("round {} of {}", self.current_round, self.settings.total_rounds);
        true
    }

    pub fn end_game(&mut self) {
        self.is_playing = false;
        self.clear_highlight();
        self.phase = GamePhase::GameEnd;
        log::debug!(
            "game over {}:{}, winner: {:?}",
            self.player_score,
            self.computer_score,
            self.game_winner(),
        );
    }

    /// Player quit mid-game. Only meaningful while a game is running.
    pub fn forfeit_game(&mut self) {
        if !self.is_playing {
            log::trace!("forfeit ignored, no game in progress");
            return;
        }
        self.is_playing = false;
        self.did_forfeit = true;
        self.clear_highlight();
        self.phase = GamePhase::GameEnd;
        log::debug!(
            "player forfeited at {}:{}",
            self.player_score,
            self.computer_score,
        );
    }

    pub fn reset_game(&mut self) {
        self.cells = Self::fresh_cells(self.settings.grid_size);
        self.player_score = 0;
        self.computer_score = 0;
        self.is_playing = false;
        self.config_open = false;
        self.current_highlight = None;
        self.highlight_started_at = None;
        self.phase = GamePhase::Idle;
        self.last_round_winner = None;
        self.current_round = 0;
        self.did_forfeit = false;
    }

    pub fn open_config(&mut self) {
        self.config_open = true;
    }

    pub fn close_config(&mut self) {
        self.config_open = false;
    }

    /// Changes the board dimension and reinitializes the cells, dropping any
    /// in-progress statuses. Callers gate this to non-playing phases.
    pub fn set_grid_size(&mut self, grid_size: Coord) {
        let clamped = grid_size.clamp(GRID_SIZE_MIN, GRID_SIZE_MAX);
        if clamped != grid_size {
            log::warn!("grid size {} out of range, clamped to {}", grid_size, clamped);
        }
        self.settings.grid_size = clamped;
        self.mask = generate_shape_mask(clamped, self.settings.shape);
        self.cells = Self::fresh_cells(clamped);
        self.current_highlight = None;
    }

    pub fn set_shape_type(&mut self, shape: ShapeKind) {
        self.settings.shape = shape;
        self.mask = generate_shape_mask(self.settings.grid_size, shape);
    }

    pub fn set_time_limit(&mut self, time_limit: TimeMs) {
        let clamped = time_limit.clamp(TIME_LIMIT_MIN_MS, TIME_LIMIT_MAX_MS);
        if clamped != time_limit {
            log::warn!("time limit {}ms out of range, clamped to {}ms", time_limit, clamped);
        }
        self.settings.time_limit = clamped;
    }

    pub fn set_total_rounds(&mut self, total_rounds: u8) {
        let clamped = total_rounds.clamp(TOTAL_ROUNDS_MIN, TOTAL_ROUNDS_MAX);
        if clamped != total_rounds {
            log::warn!("total rounds {} out of range, clamped to {}", total_rounds, clamped);
        }
        self.settings.total_rounds = clamped;
    }

    pub fn set_zoom_level(&mut self, zoom: ZoomLevel) {
        self.settings.zoom = zoom;
    }

    pub fn set_cell_color(&mut self, key: CellColorKey, value: String) {
        self.settings.cell_colors.set(key, value);
    }

    pub fn set_player_name(&mut self, name: String) {
        self.settings.player_name = name;
    }

    /// Books the round for `winner` and moves to the result phase. The
    /// resolved cell keeps the status the caller just gave it.
    fn award_round(&mut self, winner: RoundWinner) {
        match winner {
            RoundWinner::Player => self.player_score += 1,
            RoundWinner::Computer => self.computer_score += 1,
        }
        self.clear_highlight();
        self.last_round_winner = Some(winner);
        self.phase = GamePhase::RoundResult;
        log::debug!(
            "round {} to {:?}, score {}:{}",
            self.current_round,
            winner,
            self.player_score,
            self.computer_score,
        );
    }

    fn clear_highlight(&mut self) {
        if let Some(id) = self.current_highlight.take() {
            if self.cell_at(id).is_highlighted() {
                let nd = self.nd(id);
                self.cells[nd] = CellStatus::Default;
            }
        }
    }

    fn validate_cell(&self, id: CellId) -> Result<CellId> {
        if id < self.total_cells() {
            Ok(id)
        } else {
            Err(GameError::InvalidCell)
        }
    }

    fn nd(&self, id: CellId) -> [usize; 2] {
        id_to_coords(id, self.settings.grid_size).to_nd_index()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}
