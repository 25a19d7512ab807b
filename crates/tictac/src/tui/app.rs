//! Application state and key handling.

use crate::config::Settings;
use crate::scoreboard::Scoreboard;
use crossterm::event::KeyCode;
use tictac_engine::{
    Actor, GameView, Intent, LegalPlacement, Mode, MovePicker, Outcome, Phase, Placement,
    Position, Scheduler, Session, Ticket,
};
use tracing::{debug, instrument};

use super::input::{digit_position, move_cursor};

/// Main application state.
///
/// Owns the game session and the bits of UI state the engine does not care
/// about: the board cursor, a one-shot notice, and the scoreboard.
pub struct App<S: Scheduler, P: MovePicker> {
    session: Session<S, P>,
    cursor: Position,
    scoreboard: Scoreboard,
    notice: Option<String>,
    should_quit: bool,
}

impl<S, P> std::fmt::Debug for App<S, P>
where
    S: Scheduler + std::fmt::Debug,
    S::Handle: std::fmt::Debug,
    P: MovePicker + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session)
            .field("cursor", &self.cursor)
            .field("scoreboard", &self.scoreboard)
            .field("notice", &self.notice)
            .field("should_quit", &self.should_quit)
            .finish()
    }
}

impl<S: Scheduler, P: MovePicker> App<S, P> {
    /// Creates the application, seeding setup choices from `settings`.
    #[instrument(skip(session))]
    pub fn new(session: Session<S, P>, settings: &Settings) -> Self {
        let mut app = Self {
            session,
            cursor: Position::Center,
            scoreboard: Scoreboard::new(),
            notice: None,
            should_quit: false,
        };
        app.dispatch(Intent::ConfigureMode {
            vs_computer: *settings.vs_computer(),
        });
        app.dispatch(Intent::ConfigureHumanMark(*settings.human_mark()));
        app
    }

    /// Handles a key press.
    #[instrument(skip(self))]
    pub fn handle_key(&mut self, key: KeyCode) {
        self.notice = None;

        if matches!(key, KeyCode::Char('q') | KeyCode::Esc) {
            debug!("Quit requested");
            self.should_quit = true;
            return;
        }

        match self.session.state().phase() {
            Phase::Setup => self.handle_setup_key(key),
            Phase::Playing => self.handle_play_key(key),
        }
    }

    fn handle_setup_key(&mut self, key: KeyCode) {
        let state = self.session.state();
        match key {
            KeyCode::Char('m') => {
                let vs_computer = state.mode() == Mode::HumanVsHuman;
                self.dispatch(Intent::ConfigureMode { vs_computer });
            }
            KeyCode::Char('x') => {
                let mark = state.human_mark().opposite();
                self.dispatch(Intent::ConfigureHumanMark(mark));
            }
            KeyCode::Enter => {
                self.cursor = Position::Center;
                self.dispatch(Intent::StartGame);
            }
            _ => {}
        }
    }

    fn handle_play_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, key);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.place(self.cursor),
            KeyCode::Char('r') => {
                self.dispatch(Intent::ResetBoard);
            }
            KeyCode::Char('s') => {
                self.dispatch(Intent::ReturnToSetup);
            }
            other => {
                if let Some(position) = digit_position(other) {
                    self.cursor = position;
                    self.place(position);
                }
            }
        }
    }

    fn place(&mut self, position: Position) {
        let placement = Placement::new(Actor::Human, position);
        if let Err(reason) = LegalPlacement::check(&placement, self.session.state()) {
            debug!(%reason, "Placement refused");
            self.notice = Some(reason.to_string());
            return;
        }
        self.dispatch(Intent::PlaceMark(placement));
    }

    /// Feeds a due computer-move ticket back into the session.
    #[instrument(skip(self))]
    pub fn on_ticket(&mut self, ticket: Ticket) {
        let was_over = self.session.state().is_terminal();
        if self.session.fire(ticket) {
            self.notice = None;
            self.record_if_finished(was_over);
        }
    }

    fn dispatch(&mut self, intent: Intent) -> bool {
        let was_over = self.session.state().is_terminal();
        let changed = self.session.dispatch(intent);
        if changed {
            self.record_if_finished(was_over);
        }
        changed
    }

    fn record_if_finished(&mut self, was_over: bool) {
        let outcome = self.session.state().outcome();
        if !was_over && outcome.is_terminal() {
            self.scoreboard.record(outcome);
        }
    }

    /// Projection of the current game.
    pub fn view(&self) -> GameView {
        self.session.view()
    }

    /// Board cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Results so far.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// True once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the session.
    pub fn session(&self) -> &Session<S, P> {
        &self.session
    }

    /// One-line status for the current frame.
    pub fn status(&self) -> String {
        if let Some(notice) = &self.notice {
            return notice.clone();
        }

        let view = self.view();
        if view.phase == Phase::Setup {
            return "Press Enter to start".to_string();
        }

        let vs_computer = view.mode == Mode::HumanVsComputer;
        match view.outcome {
            Outcome::Won { mark, .. } if vs_computer && mark == view.human_mark => {
                "You win! R: rematch | S: setup".to_string()
            }
            Outcome::Won { .. } if vs_computer => "Computer wins! R: rematch | S: setup".to_string(),
            Outcome::Won { mark, .. } => format!("{} wins! R: rematch | S: setup", mark),
            Outcome::Draw => "Draw! R: rematch | S: setup".to_string(),
            Outcome::InProgress if view.computer_thinking => {
                format!("Computer ({}) is thinking...", view.computer_mark)
            }
            Outcome::InProgress if vs_computer => format!("Your move ({})", view.active_mark),
            Outcome::InProgress => format!("Player {} to move", view.active_mark),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tictac_engine::{COMPUTER_DELAY, ManualScheduler, Mark, ScriptedPicker, Square};

    type TestApp = App<ManualScheduler, ScriptedPicker>;

    fn app(vs_computer: bool, human: Mark) -> TestApp {
        let session = Session::new(ManualScheduler::new(), ScriptedPicker::default(), COMPUTER_DELAY);
        let settings = Settings::new(vs_computer, human, COMPUTER_DELAY, None);
        App::new(session, &settings)
    }

    fn keys(app: &mut TestApp, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key);
        }
    }

    fn think(app: &mut TestApp) {
        let due = app.session.scheduler_mut().advance(Duration::from_millis(350));
        for ticket in due {
            app.on_ticket(ticket);
        }
    }

    #[test]
    fn test_settings_seed_setup() {
        let app = app(true, Mark::O);
        let view = app.view();
        assert_eq!(view.phase, Phase::Setup);
        assert_eq!(view.mode, Mode::HumanVsComputer);
        assert_eq!(view.human_mark, Mark::O);
    }

    #[test]
    fn test_setup_toggles() {
        let mut app = app(false, Mark::X);
        keys(&mut app, &[KeyCode::Char('m'), KeyCode::Char('x')]);
        assert_eq!(app.view().mode, Mode::HumanVsComputer);
        assert_eq!(app.view().human_mark, Mark::O);
        keys(&mut app, &[KeyCode::Char('m')]);
        assert_eq!(app.view().mode, Mode::HumanVsHuman);
    }

    #[test]
    fn test_toggles_ignored_while_playing() {
        let mut app = app(false, Mark::X);
        keys(&mut app, &[KeyCode::Enter, KeyCode::Char('m'), KeyCode::Char('x')]);
        assert_eq!(app.view().mode, Mode::HumanVsHuman);
        assert_eq!(app.view().human_mark, Mark::X);
    }

    #[test]
    fn test_cursor_and_enter_place() {
        let mut app = app(false, Mark::X);
        keys(&mut app, &[KeyCode::Enter, KeyCode::Up, KeyCode::Left, KeyCode::Enter]);
        assert_eq!(app.view().cells[0], Some(Mark::X));
        assert_eq!(app.status(), "Player O to move");
    }

    #[test]
    fn test_occupied_square_shows_notice() {
        let mut app = app(false, Mark::X);
        keys(&mut app, &[KeyCode::Enter, KeyCode::Char('5'), KeyCode::Char('5')]);
        assert_eq!(app.status(), "Square Center is already occupied");
        keys(&mut app, &[KeyCode::Left]);
        assert_eq!(app.status(), "Player O to move");
    }

    #[test]
    fn test_win_recorded_once() {
        let mut app = app(false, Mark::X);
        keys(
            &mut app,
            &[
                KeyCode::Enter,
                KeyCode::Char('1'),
                KeyCode::Char('5'),
                KeyCode::Char('2'),
                KeyCode::Char('6'),
                KeyCode::Char('3'),
            ],
        );
        assert_eq!(app.view().winning_line, Some([0, 1, 2]));
        assert_eq!(*app.scoreboard().x_wins(), 1);
        assert_eq!(app.status(), "X wins! R: rematch | S: setup");

        keys(&mut app, &[KeyCode::Char('9')]);
        assert_eq!(app.status(), "Game is already over");
        assert_eq!(app.scoreboard().games(), 1);

        keys(&mut app, &[KeyCode::Char('r')]);
        assert_eq!(app.view().cells, [None; 9]);
        assert_eq!(app.scoreboard().games(), 1);
    }

    #[test]
    fn test_computer_turn_blocks_keys() {
        let mut app = app(true, Mark::O);
        keys(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.status(), "Computer (X) is thinking...");

        keys(&mut app, &[KeyCode::Char('5')]);
        assert_eq!(app.status(), "It's not the Human's turn");
        assert_eq!(app.view().cells, [None; 9]);

        think(&mut app);
        assert_eq!(app.session().state().board().get(Position::TopLeft), Square::Occupied(Mark::X));
        assert_eq!(app.status(), "Your move (O)");
    }

    #[test]
    fn test_computer_win_recorded() {
        // Human O always takes the last free square, computer X the first.
        let mut app = app(true, Mark::O);
        keys(&mut app, &[KeyCode::Enter]);
        while !app.view().outcome.is_terminal() {
            if app.view().computer_thinking {
                think(&mut app);
            } else {
                let last = app.session().state().empty_positions().last().copied();
                if let Some(pos) = last {
                    app.handle_key(KeyCode::Char(char::from_digit(pos.to_index() as u32 + 1, 10).unwrap()));
                }
            }
        }
        assert_eq!(app.scoreboard().games(), 1);
    }

    #[test]
    fn test_return_to_setup_then_quit() {
        let mut app = app(false, Mark::X);
        keys(&mut app, &[KeyCode::Enter, KeyCode::Char('5'), KeyCode::Char('s')]);
        assert_eq!(app.view().phase, Phase::Setup);
        assert_eq!(app.status(), "Press Enter to start");
        assert!(!app.should_quit());
        keys(&mut app, &[KeyCode::Char('q')]);
        assert!(app.should_quit());
    }
}
