//! Game state and its transitions.
//!
//! Every transition consumes a [`GameState`] and returns the next one.
//! Intents that break a precondition hand back the input state untouched,
//! so callers never have to handle a failure path for a stale or illegal
//! click.

use super::contracts::{Contract, MarkBalance, PlaceContract, SetupOnly};
use super::error::EngineError;
use super::intent::Placement;
use super::position::Position;
use super::rules::{self, LINES, Line};
use super::types::{Board, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display)]
pub enum Phase {
    /// Choosing mode and marks; the board is empty.
    #[default]
    Setup,
    /// A game is on the board (possibly finished).
    Playing,
}

/// Who the second seat belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display)]
pub enum Mode {
    /// Two people share the keyboard.
    #[default]
    #[display("Human vs Human")]
    HumanVsHuman,
    /// One person plays a random-move computer.
    #[display("Human vs Computer")]
    HumanVsComputer,
}

impl Mode {
    /// Maps the setup toggle onto a mode.
    pub fn from_vs_computer(vs_computer: bool) -> Self {
        if vs_computer {
            Mode::HumanVsComputer
        } else {
            Mode::HumanVsHuman
        }
    }
}

/// The party issuing a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Actor {
    /// A person at the keyboard.
    Human,
    /// The scheduled random-move player.
    Computer,
}

/// Classification of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves can still be made.
    #[default]
    InProgress,
    /// `mark` completed `line`.
    Won {
        /// Winning mark.
        mark: Mark,
        /// The completed line.
        line: Line,
    },
    /// Board full, no line.
    Draw,
}

impl Outcome {
    /// Returns true once the game has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Won { mark, .. } => Some(*mark),
            _ => None,
        }
    }

    /// Returns the winning line if there is one.
    pub fn line(&self) -> Option<Line> {
        match self {
            Outcome::Won { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "In progress"),
            Outcome::Won { mark, .. } => write!(f, "{} wins", mark),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Complete game state.
///
/// The computer's mark is never stored: it is always the opposite of the
/// human's, so the two cannot drift apart.
///
/// Deserialization rejects states no sequence of legal moves can reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameStateRecord")]
pub struct GameState {
    board: Board,
    active_mark: Mark,
    outcome: Outcome,
    mode: Mode,
    human_mark: Mark,
    phase: Phase,
}

impl GameState {
    /// Creates a session in setup: empty board, human vs human, human plays X.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            active_mark: Mark::X,
            outcome: Outcome::InProgress,
            mode: Mode::HumanVsHuman,
            human_mark: Mark::X,
            phase: Phase::Setup,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Setup transitions
    // ─────────────────────────────────────────────────────────────

    /// Chooses between human and computer opponents. Setup only.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn configure_mode(mut self, vs_computer: bool) -> Self {
        if let Err(reason) = SetupOnly::check(&self) {
            debug!(%reason, "Ignoring mode change");
            return self;
        }
        self.mode = Mode::from_vs_computer(vs_computer);
        debug!(mode = %self.mode, "Mode configured");
        self
    }

    /// Chooses the human's mark; the computer takes the other. Setup only.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn configure_human_mark(mut self, mark: Mark) -> Self {
        if let Err(reason) = SetupOnly::check(&self) {
            debug!(%reason, "Ignoring mark change");
            return self;
        }
        self.human_mark = mark;
        debug!(human = %mark, computer = %self.computer_mark(), "Marks configured");
        self
    }

    /// Freezes configuration and begins a game on a cleared board.
    ///
    /// Calling it again mid-game starts over.
    #[instrument(skip(self), fields(mode = %self.mode, human = %self.human_mark))]
    pub fn start_game(self) -> Self {
        info!("Starting game");
        Self {
            phase: Phase::Playing,
            ..self.cleared()
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Play
    // ─────────────────────────────────────────────────────────────

    /// Places the active mark at `position` on behalf of `actor`.
    ///
    /// Returns the state unchanged if the game is not being played, is
    /// already over, the square is taken, or it is not `actor`'s turn.
    #[instrument(skip(self), fields(active = %self.active_mark))]
    pub fn place_mark(self, actor: Actor, position: Position) -> Self {
        let placement = Placement::new(actor, position);
        if let Err(reason) = PlaceContract::pre(&self, &placement) {
            debug!(%reason, "Ignoring placement");
            return self;
        }

        let before = self.clone();
        let mut game = self;
        game.board.set(position, Square::Occupied(game.active_mark));
        game.outcome = rules::evaluate(&game.board);

        match game.outcome {
            Outcome::InProgress => game.active_mark = game.active_mark.opposite(),
            Outcome::Won { mark, line } => {
                info!(%mark, ?line, board = %game.board.display(), "Game won")
            }
            Outcome::Draw => info!(board = %game.board.display(), "Game drawn"),
        }

        debug_assert!(
            PlaceContract::post(&before, &game),
            "placement broke a board invariant"
        );
        game
    }

    /// Clears the board for a rematch, staying in play.
    ///
    /// Does nothing during setup, where the board is already empty.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn reset_board(self) -> Self {
        if self.phase != Phase::Playing {
            debug!("Ignoring reset outside of play");
            return self;
        }
        info!("Resetting board");
        self.cleared()
    }

    /// Abandons the board and goes back to setup. Mode and marks are kept.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn return_to_setup(self) -> Self {
        info!("Returning to setup");
        Self {
            phase: Phase::Setup,
            ..self.cleared()
        }
    }

    fn cleared(self) -> Self {
        Self {
            board: Board::new(),
            active_mark: Mark::X,
            outcome: Outcome::InProgress,
            ..self
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark whose turn it is.
    pub fn active_mark(&self) -> Mark {
        self.active_mark
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// The completed line, present iff the game was won.
    pub fn winning_line(&self) -> Option<Line> {
        self.outcome.line()
    }

    /// Returns the mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the human's mark.
    pub fn human_mark(&self) -> Mark {
        self.human_mark
    }

    /// Returns the computer's mark.
    pub fn computer_mark(&self) -> Mark {
        self.human_mark.opposite()
    }

    /// Returns the phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once the game has been won or drawn.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Who should move next, or `None` when no move can be made.
    #[instrument(skip(self))]
    pub fn current_turn_owner(&self) -> Option<Actor> {
        if self.phase != Phase::Playing || self.is_terminal() {
            return None;
        }
        match self.mode {
            Mode::HumanVsComputer if self.active_mark == self.computer_mark() => {
                Some(Actor::Computer)
            }
            _ => Some(Actor::Human),
        }
    }

    /// True while the automated actor owns the turn.
    pub fn is_computer_turn(&self) -> bool {
        self.current_turn_owner() == Some(Actor::Computer)
    }

    /// Unoccupied positions, ordered by index.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::empty_on(&self.board)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Unchecked serialized form of [`GameState`].
#[derive(Deserialize)]
struct GameStateRecord {
    board: Board,
    active_mark: Mark,
    outcome: Outcome,
    mode: Mode,
    human_mark: Mark,
    phase: Phase,
}

impl TryFrom<GameStateRecord> for GameState {
    type Error = EngineError;

    fn try_from(record: GameStateRecord) -> Result<Self, Self::Error> {
        let game = Self {
            board: record.board,
            active_mark: record.active_mark,
            outcome: record.outcome,
            mode: record.mode,
            human_mark: record.human_mark,
            phase: record.phase,
        };
        game.check_reachable()?;
        Ok(game)
    }
}

impl GameState {
    /// Checks the invariants every transition preserves.
    #[instrument(skip(self))]
    fn check_reachable(&self) -> Result<(), EngineError> {
        let invalid = |reason: &'static str| -> Result<(), EngineError> {
            debug!(reason, "Rejecting game state");
            Err(EngineError::InvalidState(reason))
        };

        if !MarkBalance::holds(self) {
            return invalid("mark counts are unbalanced");
        }
        if self.phase == Phase::Setup && self.board.occupied() > 0 {
            return invalid("board must be empty during setup");
        }
        if self.outcome != rules::evaluate(&self.board) {
            return invalid("outcome does not match the board");
        }

        let squares = self.board.squares();
        let count = |mark| squares.iter().filter(|s| **s == Square::Occupied(mark)).count();
        let last_mover = if count(Mark::X) > count(Mark::O) {
            Mark::X
        } else {
            Mark::O
        };
        let expected_active = if self.is_terminal() {
            last_mover
        } else {
            last_mover.opposite()
        };
        if self.active_mark != expected_active {
            return invalid("active mark does not match the move count");
        }

        if let Some(winner) = self.outcome.winner() {
            let loser = winner.opposite();
            let loser_has_line = LINES
                .iter()
                .any(|line| line.iter().all(|pos| self.board.get(*pos) == Square::Occupied(loser)));
            if winner != last_mover || loser_has_line {
                return invalid("game continued after it was won");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::LINES;

    fn playing() -> GameState {
        GameState::new().start_game()
    }

    fn play(game: GameState, indices: &[usize]) -> GameState {
        indices.iter().fold(game, |g, &i| {
            g.place_mark(Actor::Human, Position::from_index(i).unwrap())
        })
    }

    #[test]
    fn test_new_is_setup_with_empty_board() {
        let game = GameState::new();
        assert_eq!(game.phase(), Phase::Setup);
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert_eq!(game.current_turn_owner(), None);
    }

    #[test]
    fn test_placement_ignored_during_setup() {
        let game = GameState::new();
        let after = game.clone().place_mark(Actor::Human, Position::Center);
        assert_eq!(after, game);
    }

    #[test]
    fn test_configure_mode_and_mark_in_setup() {
        let game = GameState::new()
            .configure_mode(true)
            .configure_human_mark(Mark::O);
        assert_eq!(game.mode(), Mode::HumanVsComputer);
        assert_eq!(game.human_mark(), Mark::O);
        assert_eq!(game.computer_mark(), Mark::X);
    }

    #[test]
    fn test_configuration_locked_while_playing() {
        let game = playing();
        let after = game.clone().configure_mode(true).configure_human_mark(Mark::O);
        assert_eq!(after, game);
    }

    #[test]
    fn test_move_alternates_turn() {
        let game = play(playing(), &[4]);
        assert_eq!(game.board().get(Position::Center), Square::Occupied(Mark::X));
        assert_eq!(game.active_mark(), Mark::O);
    }

    #[test]
    fn test_occupied_square_rejected() {
        let game = play(playing(), &[4]);
        let after = play(game.clone(), &[4]);
        assert_eq!(after, game);
    }

    #[test]
    fn test_win_keeps_active_mark() {
        let game = play(playing(), &[0, 4, 1, 5, 2]);
        assert_eq!(game.outcome(), Outcome::Won { mark: Mark::X, line: LINES[0] });
        assert_eq!(game.active_mark(), Mark::X);
        assert_eq!(game.current_turn_owner(), None);
    }

    #[test]
    fn test_start_game_mid_game_clears_board() {
        let game = play(playing(), &[0, 4]).start_game();
        assert_eq!(game.board().occupied(), 0);
        assert_eq!(game.active_mark(), Mark::X);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_reset_board_stays_playing() {
        let game = play(playing(), &[0, 4, 1, 5, 2]).reset_board();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert_eq!(game.winning_line(), None);
        assert_eq!(game.board().occupied(), 0);
    }

    #[test]
    fn test_reset_board_ignored_in_setup() {
        let game = GameState::new().configure_mode(true);
        assert_eq!(game.clone().reset_board(), game);
    }

    #[test]
    fn test_return_to_setup_keeps_configuration() {
        let game = GameState::new()
            .configure_mode(true)
            .configure_human_mark(Mark::O)
            .start_game()
            .return_to_setup();
        assert_eq!(game.phase(), Phase::Setup);
        assert_eq!(game.mode(), Mode::HumanVsComputer);
        assert_eq!(game.human_mark(), Mark::O);
        assert_eq!(game.board().occupied(), 0);
    }

    #[test]
    fn test_turn_owner_in_vs_computer() {
        let game = GameState::new().configure_mode(true).start_game();
        assert_eq!(game.current_turn_owner(), Some(Actor::Human));
        let game = game.place_mark(Actor::Human, Position::Center);
        assert_eq!(game.current_turn_owner(), Some(Actor::Computer));
        assert!(game.is_computer_turn());
    }

    fn tampered(
        game: &GameState,
        edit: impl FnOnce(&mut serde_json::Value),
    ) -> Result<GameState, serde_json::Error> {
        let mut value = serde_json::to_value(game).unwrap();
        edit(&mut value);
        serde_json::from_value(value)
    }

    #[test]
    fn test_deserialize_accepts_reachable_states() {
        let game = playing()
            .place_mark(Actor::Human, Position::Center)
            .place_mark(Actor::Human, Position::TopLeft);
        let json = serde_json::to_string(&game).unwrap();
        assert_eq!(serde_json::from_str::<GameState>(&json).unwrap(), game);

        let won = [0, 4, 1, 5, 2]
            .into_iter()
            .fold(playing(), |g, i| g.place_mark(Actor::Human, Position::ALL[i]));
        assert_eq!(tampered(&won, |_| {}).unwrap(), won);
    }

    #[test]
    fn test_deserialize_rejects_occupied_board_in_setup() {
        let game = playing().place_mark(Actor::Human, Position::Center);
        let err = tampered(&game, |v| v["phase"] = serde_json::json!("Setup")).unwrap_err();
        assert!(err.to_string().contains("board must be empty during setup"));
    }

    #[test]
    fn test_deserialize_rejects_unbalanced_marks() {
        let err = tampered(&playing(), |v| {
            for i in [0, 1, 3, 5] {
                v["board"]["squares"][i] = serde_json::json!({ "Occupied": "X" });
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("mark counts are unbalanced"));
    }

    #[test]
    fn test_deserialize_rejects_unsupported_outcome() {
        let err = tampered(&playing(), |v| {
            v["outcome"] = serde_json::json!({
                "Won": { "mark": "O", "line": ["BottomLeft", "BottomCenter", "BottomRight"] }
            });
        })
        .unwrap_err();
        assert!(err.to_string().contains("outcome does not match the board"));
    }

    #[test]
    fn test_deserialize_rejects_wrong_active_mark() {
        let err = tampered(&playing(), |v| v["active_mark"] = serde_json::json!("O")).unwrap_err();
        assert!(err.to_string().contains("active mark does not match"));
    }

    #[test]
    fn test_deserialize_rejects_play_after_win() {
        // X completes the top row, then O keeps playing.
        let won = [0, 4, 1, 5, 2]
            .into_iter()
            .fold(playing(), |g, i| g.place_mark(Actor::Human, Position::ALL[i]));
        let err = tampered(&won, |v| {
            v["board"]["squares"][8] = serde_json::json!({ "Occupied": "O" });
            v["active_mark"] = serde_json::json!("O");
        })
        .unwrap_err();
        assert!(err.to_string().contains("game continued after it was won"));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Draw.to_string(), "Draw");
        assert_eq!(
            Outcome::Won { mark: Mark::O, line: LINES[3] }.to_string(),
            "O wins"
        );
    }
}
