//! Property tests over arbitrary intent sequences.

use proptest::prelude::*;
use tictac_engine::{Actor, GameState, Intent, Mark, Phase, Position, Square};

fn actor() -> impl Strategy<Value = Actor> {
    prop_oneof![Just(Actor::Human), Just(Actor::Computer)]
}

fn mark() -> impl Strategy<Value = Mark> {
    prop_oneof![Just(Mark::X), Just(Mark::O)]
}

fn position() -> impl Strategy<Value = Position> {
    (0usize..9).prop_map(|i| Position::ALL[i])
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        8 => (actor(), position()).prop_map(|(a, p)| Intent::place(a, p)),
        1 => any::<bool>().prop_map(|vs_computer| Intent::ConfigureMode { vs_computer }),
        1 => mark().prop_map(Intent::ConfigureHumanMark),
        1 => Just(Intent::StartGame),
        1 => Just(Intent::ResetBoard),
        1 => Just(Intent::ReturnToSetup),
    ]
}

fn configured(vs_computer: bool, human: Mark) -> GameState {
    GameState::new()
        .configure_mode(vs_computer)
        .configure_human_mark(human)
        .start_game()
}

proptest! {
    #[test]
    fn placements_never_overwrite(
        vs_computer in any::<bool>(),
        human in mark(),
        moves in prop::collection::vec((actor(), position()), 0..40),
    ) {
        let mut game = configured(vs_computer, human);
        for (actor, pos) in moves {
            let before = game.clone();
            game = game.place_mark(actor, pos);

            prop_assert!(game.board().occupied() <= 9);
            for p in Position::ALL {
                if before.board().get(p) != Square::Empty {
                    prop_assert_eq!(game.board().get(p), before.board().get(p));
                }
            }

            if game == before {
                prop_assert_eq!(game.active_mark(), before.active_mark());
            } else {
                prop_assert_eq!(game.board().occupied(), before.board().occupied() + 1);
                prop_assert_eq!(game.board().get(pos), Square::Occupied(before.active_mark()));
                if game.is_terminal() {
                    prop_assert_eq!(game.active_mark(), before.active_mark());
                } else {
                    prop_assert_eq!(game.active_mark(), before.active_mark().opposite());
                }
            }
        }
    }

    #[test]
    fn terminal_games_are_frozen(
        moves in prop::collection::vec(position(), 0..40),
        extra in prop::collection::vec((actor(), position()), 1..10),
    ) {
        let mut game = configured(false, Mark::X);
        for pos in moves {
            game = game.place_mark(Actor::Human, pos);
        }
        if game.is_terminal() {
            let frozen = extra
                .into_iter()
                .fold(game.clone(), |g, (a, p)| g.place_mark(a, p));
            prop_assert_eq!(frozen, game);
        }
    }

    #[test]
    fn intents_preserve_invariants(intents in prop::collection::vec(intent(), 0..60)) {
        let mut game = GameState::new();
        for intent in intents {
            let before = game.clone();
            game = game.apply(intent);

            prop_assert_eq!(game.computer_mark(), game.human_mark().opposite());
            prop_assert_eq!(game.winning_line().is_some(), game.outcome().winner().is_some());
            if game.phase() == Phase::Setup {
                prop_assert_eq!(game.board().occupied(), 0);
                prop_assert!(!game.is_terminal());
            }
            if before.phase() == Phase::Playing {
                prop_assert_eq!(game.mode(), before.mode());
                prop_assert_eq!(game.human_mark(), before.human_mark());
            }
        }
    }
}
