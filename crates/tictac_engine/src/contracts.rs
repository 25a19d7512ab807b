//! Preconditions and postconditions for state transitions.
//!
//! A failed precondition is not an error: the transition becomes a no-op.
//! The [`Rejection`] only exists so the reason can be logged or asserted on.

use super::intent::Placement;
use super::position::Position;
use super::state::{Actor, GameState, Mode, Phase};
use super::types::{Mark, Square};
use tracing::{instrument, warn};

/// Why an intent was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// No game is on the board.
    #[display("No game in progress")]
    NotPlaying,
    /// The game is already won or drawn.
    #[display("Game is already over")]
    GameOver,
    /// The target square already holds a mark.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),
    /// The actor does not own the current turn.
    #[display("It's not the {}'s turn", _0)]
    NotYourTurn(Actor),
    /// Configuration can only change during setup.
    #[display("Configuration is locked once play starts")]
    Locked,
}

/// A contract defines preconditions and postconditions for a transition.
///
/// - Precondition: must hold before the action is applied
/// - Postcondition: must hold between the state before and after
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), Rejection>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> bool;
}

// ─────────────────────────────────────────────────────────────
//  Placement preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: a game is being played and has not ended.
pub struct GameLive;

impl GameLive {
    /// Checks the phase and outcome.
    pub fn check(game: &GameState) -> Result<(), Rejection> {
        if game.phase() != Phase::Playing {
            Err(Rejection::NotPlaying)
        } else if game.is_terminal() {
            Err(Rejection::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the square at the placement's position must be empty.
pub struct SquareIsEmpty;

impl SquareIsEmpty {
    /// Checks the target square.
    pub fn check(placement: &Placement, game: &GameState) -> Result<(), Rejection> {
        if game.board().is_empty(placement.position) {
            Ok(())
        } else {
            Err(Rejection::SquareOccupied(placement.position))
        }
    }
}

/// Precondition: the actor owns the active mark.
///
/// Against the computer each side may only place its own mark; between two
/// humans whoever clicks places the active mark.
pub struct ActorsTurn;

impl ActorsTurn {
    /// Checks turn ownership.
    pub fn check(placement: &Placement, game: &GameState) -> Result<(), Rejection> {
        let owned = match (game.mode(), placement.actor) {
            (Mode::HumanVsHuman, _) => true,
            (Mode::HumanVsComputer, Actor::Human) => game.active_mark() == game.human_mark(),
            (Mode::HumanVsComputer, Actor::Computer) => {
                game.active_mark() == game.computer_mark()
            }
        };
        if owned {
            Ok(())
        } else {
            Err(Rejection::NotYourTurn(placement.actor))
        }
    }
}

/// Composite precondition for a placement, checked in the documented order.
pub struct LegalPlacement;

impl LegalPlacement {
    /// Validates all preconditions for a placement.
    #[instrument(skip(game))]
    pub fn check(placement: &Placement, game: &GameState) -> Result<(), Rejection> {
        GameLive::check(game)?;
        SquareIsEmpty::check(placement, game)?;
        ActorsTurn::check(placement, game)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Configuration precondition
// ─────────────────────────────────────────────────────────────

/// Precondition: mode and marks can only change during setup.
pub struct SetupOnly;

impl SetupOnly {
    /// Checks the phase.
    pub fn check(game: &GameState) -> Result<(), Rejection> {
        if game.phase() == Phase::Setup {
            Ok(())
        } else {
            Err(Rejection::Locked)
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Placement contract (pre + post)
// ─────────────────────────────────────────────────────────────

/// Contract for placements.
///
/// Postconditions:
/// - every square occupied before is unchanged
/// - exactly one more square is occupied, holding the mark that was active
/// - the active mark flips unless the game just ended
/// - mode, marks and phase are untouched
pub struct PlaceContract;

impl Contract<GameState, Placement> for PlaceContract {
    fn pre(game: &GameState, placement: &Placement) -> Result<(), Rejection> {
        LegalPlacement::check(placement, game)
    }

    fn post(before: &GameState, after: &GameState) -> bool {
        let pairs = || before.board().squares().iter().zip(after.board().squares());
        let monotonic = pairs().all(|(b, a)| *b == Square::Empty || b == a);
        let placed: Vec<Square> = pairs()
            .filter(|(b, a)| **b == Square::Empty && **a != Square::Empty)
            .map(|(_, a)| *a)
            .collect();
        let placed_active = placed == [Square::Occupied(before.active_mark())];
        let balanced = MarkBalance::holds(after);
        let turn_ok = if after.is_terminal() {
            after.active_mark() == before.active_mark()
        } else {
            after.active_mark() == before.active_mark().opposite()
        };
        let config_ok = before.mode() == after.mode()
            && before.human_mark() == after.human_mark()
            && before.phase() == after.phase();

        let valid = monotonic && placed_active && balanced && turn_ok && config_ok;
        if !valid {
            warn!(
                monotonic,
                placed_active,
                balanced,
                turn_ok,
                config_ok,
                "Placement postcondition violated"
            );
        }
        valid
    }
}

/// Invariant: X always moves first, so X has the same count as O or one more.
pub struct MarkBalance;

impl MarkBalance {
    /// Checks the mark counts on the board.
    pub fn holds(game: &GameState) -> bool {
        let count = |mark: Mark| {
            game.board()
                .squares()
                .iter()
                .filter(|s| **s == Square::Occupied(mark))
                .count()
        };
        let (x, o) = (count(Mark::X), count(Mark::O));
        x == o || x == o + 1
    }
}
