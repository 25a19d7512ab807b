//! Tic-tac-toe engine - pure state machine with a scheduled computer opponent
//!
//! # Architecture
//!
//! - **State**: [`GameState`] is an owned value; every transition consumes it
//!   and returns the next one. Illegal intents return the input unchanged.
//! - **Rules**: win and draw detection over a [`Board`].
//! - **Session**: [`Session`] wraps the state with a [`Scheduler`] and a
//!   [`MovePicker`] so the computer moves after a short thinking delay.
//! - **View**: [`GameView`] is the read-only projection a front end renders.
//!
//! # Example
//!
//! ```
//! use tictac_engine::{Actor, GameState, Mark, Outcome, Position};
//!
//! let game = GameState::new()
//!     .start_game()
//!     .place_mark(Actor::Human, Position::TopLeft)
//!     .place_mark(Actor::Human, Position::Center)
//!     .place_mark(Actor::Human, Position::TopCenter)
//!     .place_mark(Actor::Human, Position::MiddleRight)
//!     .place_mark(Actor::Human, Position::TopRight);
//!
//! assert_eq!(game.outcome().winner(), Some(Mark::X));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod contracts;
mod error;
mod intent;
mod picker;
mod position;
pub mod rules;
mod schedule;
mod session;
mod state;
mod types;
mod view;

pub use contracts::{
    ActorsTurn, Contract, GameLive, LegalPlacement, MarkBalance, PlaceContract, Rejection,
    SetupOnly, SquareIsEmpty,
};
pub use error::EngineError;
pub use intent::{Intent, Placement};
pub use picker::{MovePicker, RandomPicker, ScriptedPicker};
pub use position::Position;
pub use rules::{LINES, Line};
pub use schedule::{COMPUTER_DELAY, ManualHandle, ManualScheduler, Scheduler, Ticket, TokioScheduler};
pub use session::Session;
pub use state::{Actor, GameState, Mode, Outcome, Phase};
pub use types::{Board, Mark, Square};
pub use view::GameView;
