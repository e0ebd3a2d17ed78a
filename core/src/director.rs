use alloc::string::String;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything the surrounding shell can ask of the game core. User input and
/// timer firings both arrive through here, so a whole match is replayable
/// from an intent log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    StartGame,
    /// The round intro closed, the countdown takes over.
    AdvanceToCountdown,
    /// The countdown finished. `None` draws the highlight target from the
    /// director's RNG, `Some` forces it.
    AdvanceToPlaying(Option<CellId>),
    CellClicked(CellId),
    CellTimeout(CellId),
    /// The round-result display delay elapsed; routes to the next round or
    /// to the end of the game.
    RoundResultElapsed,
    NextRound,
    EndGame,
    ForfeitGame,
    ResetGame,
    OpenConfig,
    CloseConfig,
    SetGridSize(Coord),
    SetShapeType(ShapeKind),
    SetTimeLimit(TimeMs),
    SetTotalRounds(u8),
    SetZoomLevel(ZoomLevel),
    SetCellColor(CellColorKey, String),
    SetPlayerName(String),
}

/// Timers the shell arms on the core's behalf. The core never schedules
/// anything itself; it hands one of these back and consumes the matching
/// intent when the shell reports the timer fired. A firing that arrives
/// after the state moved on lands in a guard and becomes a no-op, so
/// cancellation failures are harmless.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Fire `Intent::AdvanceToCountdown` on expiry.
    RoundIntro,
    /// Reaction countdown; fire `Intent::CellTimeout(cell)` on expiry.
    Reaction { cell: CellId },
    /// Fire `Intent::RoundResultElapsed` on expiry.
    RoundResult,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRequest {
    pub kind: TimerKind,
    pub delay: TimeMs,
}

impl TimerRequest {
    const fn round_intro() -> Self {
        Self {
            kind: TimerKind::RoundIntro,
            delay: ROUND_INTRO_DELAY_MS,
        }
    }

    const fn round_result() -> Self {
        Self {
            kind: TimerKind::RoundResult,
            delay: ROUND_RESULT_DELAY_MS,
        }
    }

    const fn reaction(cell: CellId, time_limit: TimeMs) -> Self {
        Self {
            kind: TimerKind::Reaction { cell },
            delay: time_limit,
        }
    }
}

/// Owns the session plus the RNG and performs the phase routing a UI shell
/// would otherwise hand-roll: the majority-win check every time a round
/// resolves, and the end-versus-next-round decision after the result delay.
#[derive(Clone, Debug)]
pub struct GameDirector {
    session: GameSession,
    rng: SmallRng,
}

impl GameDirector {
    pub fn new(settings: GameSettings, seed: u64) -> Self {
        Self {
            session: GameSession::new(settings),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn into_session(self) -> GameSession {
        self.session
    }

    /// Applies one intent at shell time `now` (milliseconds) and returns the
    /// timer the shell must arm next, if any.
    pub fn apply(&mut self, intent: Intent, now: TimeMs) -> Result<Option<TimerRequest>> {
        use Intent::*;

        Ok(match intent {
            StartGame => {
                self.session.start_game();
                Some(TimerRequest::round_intro())
            }
            AdvanceToCountdown => {
                self.session.advance_to_countdown();
                None
            }
            AdvanceToPlaying(selected) => {
                match self.session.advance_to_playing(&mut self.rng, selected, now)? {
                    Some(cell) => Some(TimerRequest::reaction(cell, self.session.time_limit())),
                    // empty pool resolved the round on the spot, or the
                    // intent was stale; settle_round_result sorts it out
                    None => self.settle_round_result(),
                }
            }
            CellClicked(id) => {
                if self.session.cell_clicked(id)?.has_update() {
                    self.settle_round_result()
                } else {
                    None
                }
            }
            CellTimeout(id) => {
                if self.session.cell_timeout(id)?.has_update() {
                    self.settle_round_result()
                } else {
                    None
                }
            }
            RoundResultElapsed => {
                if matches!(self.session.phase(), GamePhase::RoundResult) {
                    self.advance_after_result()
                } else {
                    log::trace!("round result delay fired outside RoundResult, ignored");
                    None
                }
            }
            NextRound => {
                if self.session.next_round() {
                    Some(TimerRequest::round_intro())
                } else {
                    None
                }
            }
            EndGame => {
                self.session.end_game();
                None
            }
            ForfeitGame => {
                self.session.forfeit_game();
                None
            }
            ResetGame => {
                self.session.reset_game();
                None
            }
            OpenConfig => {
                self.session.open_config();
                None
            }
            CloseConfig => {
                self.session.close_config();
                None
            }
            SetGridSize(grid_size) => {
                self.session.set_grid_size(grid_size);
                None
            }
            SetShapeType(shape) => {
                self.session.set_shape_type(shape);
                None
            }
            SetTimeLimit(time_limit) => {
                self.session.set_time_limit(time_limit);
                None
            }
            SetTotalRounds(total_rounds) => {
                self.session.set_total_rounds(total_rounds);
                None
            }
            SetZoomLevel(zoom) => {
                self.session.set_zoom_level(zoom);
                None
            }
            SetCellColor(key, value) => {
                self.session.set_cell_color(key, value);
                None
            }
            SetPlayerName(name) => {
                self.session.set_player_name(name);
                None
            }
        })
    }

    /// Runs whenever the phase may just have become RoundResult: a clinched
    /// match ends immediately, otherwise the result stays up for its delay.
    fn settle_round_result(&mut self) -> Option<TimerRequest> {
        if !matches!(self.session.phase(), GamePhase::RoundResult) {
            return None;
        }
        if self.session.is_match_decided() {
            log::debug!(
                "match decided early at {}:{}",
                self.session.player_score(),
                self.session.computer_score(),
            );
            self.session.end_game();
            None
        } else {
            Some(TimerRequest::round_result())
        }
    }

    fn advance_after_result(&mut self) -> Option<TimerRequest> {
        if self.session.current_round() >= self.session.total_rounds() {
            self.session.end_game();
            None
        } else if self.session.next_round() {
            Some(TimerRequest::round_intro())
        } else {
            None
        }
    }
}

impl Default for GameDirector {
    fn default() -> Self {
        Self::new(GameSettings::default(), 0)
    }
}
