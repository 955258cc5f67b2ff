//! Invariants that must hold for any seed and any input sequence

use proptest::prelude::*;

use space_warriors::sim::GameStatus;
use space_warriors::{Catalog, Command, Game, NullScoreStore, Tuning};

/// Busier than the shipped balance so short runs see plenty of contacts
fn busy_game(seed: u64) -> Game {
    let mut catalog = Catalog::default();
    for zone in &mut catalog.zones {
        zone.enemy_spawn_rate *= 8.0;
    }
    let tuning = Tuning {
        bonus_chance: 0.05,
        ..Tuning::default()
    };
    let loadout = catalog.default_loadout(0).unwrap();
    let mut game = Game::new(catalog, tuning, seed, Box::new(NullScoreStore)).unwrap();
    game.start_game(loadout).unwrap();
    game
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => Just(Command::Shoot),
        2 => Just(Command::MoveLeft),
        2 => Just(Command::MoveRight),
        1 => (0.0f32..800.0).prop_map(Command::MoveTo),
        1 => Just(Command::TogglePause),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn health_never_increases_and_dead_enemies_are_gone(
        seed in any::<u64>(),
        commands in prop::collection::vec(command(), 100..400),
    ) {
        let mut game = busy_game(seed);
        let mut health = game.snapshot().player.health;

        for cmd in commands {
            game.apply(cmd).unwrap();
            let state = game.advance();
            prop_assert!(state.player.health <= health);
            prop_assert!(state.enemies.iter().all(|e| e.health > 0));
            health = state.player.health;
            if state.status == GameStatus::GameOver {
                prop_assert_eq!(health, 0);
                break;
            }
        }
    }

    #[test]
    fn zone_tracks_score_and_never_regresses(
        seed in any::<u64>(),
        ticks in 200usize..800,
    ) {
        let mut game = busy_game(seed);
        let mut score = 0;
        let mut zone = game.snapshot().zone.id;

        for _ in 0..ticks {
            game.shoot();
            let state = game.advance();
            prop_assert!(state.score >= score);
            prop_assert!(state.zone.required_score <= state.score);
            prop_assert!(state.zone.id >= zone);
            score = state.score;
            zone = state.zone.id;
        }
    }

    #[test]
    fn double_toggle_pause_is_identity(
        seed in any::<u64>(),
        warmup in 0usize..300,
    ) {
        let mut game = busy_game(seed);
        for _ in 0..warmup {
            game.shoot();
            game.advance();
        }
        let before = game.snapshot();
        game.toggle_pause();
        game.toggle_pause();
        let after = game.snapshot();
        prop_assert_eq!(after.status, before.status);
        prop_assert_eq!(after.time_ticks, before.time_ticks);
        prop_assert_eq!(after.score, before.score);
    }

    #[test]
    fn same_seed_same_run(
        seed in any::<u64>(),
        commands in prop::collection::vec(command(), 50..200),
    ) {
        let mut a = busy_game(seed);
        let mut b = busy_game(seed);
        for cmd in commands {
            a.apply(cmd.clone()).unwrap();
            b.apply(cmd).unwrap();
            a.advance();
            b.advance();
        }
        let (a, b) = (a.snapshot(), b.snapshot());
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(&a.enemies, &b.enemies);
        prop_assert_eq!(&a.player, &b.player);
    }
}
