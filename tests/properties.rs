use std::collections::VecDeque;

use arcade_hub::sim::breakout::{self, Breakout, BreakoutEvent, BreakoutWorld, PaddleIntent};
use arcade_hub::sim::flappy::{FLAP_VELOCITY, FLOOR_Y, GRAVITY, Flap, Flappy, FlappyWorld};
use arcade_hub::sim::minesweeper::BoardSpec;
use arcade_hub::sim::pong::{FIELD_WIDTH, PADDLE_HEIGHT, Pong, PongIntent, PongWorld, WINNING_SCORE};
use arcade_hub::sim::snake::{Snake, SnakeWorld};
use arcade_hub::sim::{BoardStatus, Cell, Coord, Direction, Minesweeper, Simulation, Verdict};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn paddle_intent() -> impl Strategy<Value = Option<PaddleIntent>> {
    prop_oneof![
        Just(None),
        Just(Some(PaddleIntent::Left)),
        Just(Some(PaddleIntent::Right)),
        (-200.0f32..800.0).prop_map(|x| Some(PaddleIntent::PointerX(x))),
    ]
}

fn pong_intent() -> impl Strategy<Value = Option<PongIntent>> {
    prop_oneof![
        Just(None),
        Just(Some(PongIntent::Up)),
        Just(Some(PongIntent::Down)),
        (-500.0f32..900.0).prop_map(|y| Some(PongIntent::PointerY(y))),
    ]
}

proptest! {
    #[test]
    fn flappy_gravity_and_flap(
        bird_y in 50.0f32..300.0,
        velocity in -8.0f32..8.0,
        flap in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut world = FlappyWorld { bird_y, velocity, ..FlappyWorld::default() };
        let intent = flap.then_some(Flap);
        let step = Flappy::step(&mut world, intent, &mut Pcg32::seed_from_u64(seed));

        let expected = if flap { FLAP_VELOCITY } else { velocity + GRAVITY };
        prop_assert_eq!(world.velocity, expected);
        prop_assert_eq!(world.bird_y, bird_y + expected);
        prop_assert_eq!(step.verdict, None);
    }

    #[test]
    fn flappy_ends_iff_bird_leaves_field(
        bird_y in 0.0f32..=380.0,
        velocity in -30.0f32..30.0,
    ) {
        let mut world = FlappyWorld { bird_y, velocity, ..FlappyWorld::default() };
        let next = bird_y + velocity + GRAVITY;
        let step = Flappy::step(&mut world, None, &mut Pcg32::seed_from_u64(0));

        // With no pipes near the bird, only the field bounds can end the game
        let outside = !(0.0..=FLOOR_Y).contains(&next);
        prop_assert_eq!(step.verdict == Some(Verdict::Lost), outside);
        if outside {
            prop_assert_eq!(world.bird_y, bird_y);
        }
    }

    #[test]
    fn snake_grows_once_per_food(eats in 1usize..=9) {
        let mut world = SnakeWorld { direction: Some(Direction::Right), ..SnakeWorld::default() };
        let mut rng = Pcg32::seed_from_u64(eats as u64);
        for _ in 0..eats {
            world.food = world.head().offset(Direction::Right);
            let step = Snake::step(&mut world, None, &mut rng);
            prop_assert_eq!(step.verdict, None);
        }
        prop_assert_eq!(world.len(), 1 + eats);
        prop_assert_eq!(world.score, 10 * eats as u32);
    }

    #[test]
    fn snake_never_reverses(turns in prop::collection::vec(direction(), 1..60)) {
        let mut world = SnakeWorld {
            body: VecDeque::from([Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]),
            direction: Some(Direction::Right),
            ..SnakeWorld::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);

        for turn in turns {
            let before = world.direction.expect("moving");
            let head = world.head();
            let step = Snake::step(&mut world, Some(turn), &mut rng);
            let after = world.direction.expect("moving");

            prop_assert!(after == before || after.is_orthogonal_to(before));
            if step.verdict.is_some() {
                break;
            }
            prop_assert_eq!(world.head(), head.offset(after));
        }
    }

    #[test]
    fn pong_paddles_stay_clamped_and_scores_need_exit(
        intents in prop::collection::vec(pong_intent(), 1..400),
        seed in any::<u64>(),
    ) {
        let mut world = PongWorld::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        Pong::on_start(&mut world, &mut rng);

        for intent in intents {
            let exit_x = world.ball.pos.x + world.ball.vel.x;
            let scores = world.player_score + world.computer_score;
            let step = Pong::step(&mut world, intent, &mut rng);

            for paddle in [world.player_y, world.computer_y] {
                prop_assert!((0.0..=400.0 - PADDLE_HEIGHT).contains(&paddle));
            }
            let scored = world.player_score + world.computer_score != scores;
            prop_assert_eq!(scored, !(0.0..=FIELD_WIDTH).contains(&exit_x));
            let decided = world.player_score >= WINNING_SCORE || world.computer_score >= WINNING_SCORE;
            prop_assert_eq!(step.verdict.is_some(), decided);
            if decided {
                break;
            }
        }
    }

    #[test]
    fn breakout_dx_flips_only_on_contact(
        intents in prop::collection::vec(paddle_intent(), 1..1500),
    ) {
        let mut world = BreakoutWorld::default();
        let mut rng = Pcg32::seed_from_u64(0);

        for intent in intents {
            let dx = world.ball.vel.x;
            let next_x = world.ball.pos.x + dx;
            let destroyed: Vec<bool> = world.bricks.iter().map(|b| b.destroyed).collect();
            let step = Breakout::step(&mut world, intent, &mut rng);

            prop_assert_ne!(world.ball.vel.x, 0.0);
            if world.ball.vel.x.signum() != dx.signum() {
                let contact = step.events.iter().any(|event| matches!(
                    event,
                    BreakoutEvent::WallBounce
                        | BreakoutEvent::PaddleHit { .. }
                        | BreakoutEvent::LifeLost { .. }
                ));
                prop_assert!(contact, "dx flipped without contact: {:?}", step.events);
            }
            // Reaching a side wall always turns the ball back unless the paddle redirected it
            let redirected = step.events.iter().any(|event| matches!(
                event,
                BreakoutEvent::PaddleHit { .. } | BreakoutEvent::LifeLost { .. }
            ));
            if !redirected && dx < 0.0 && next_x <= 0.0 {
                prop_assert!(world.ball.vel.x > 0.0, "left wall kept dx {}", world.ball.vel.x);
            }
            if !redirected && dx > 0.0 && next_x >= breakout::FIELD_WIDTH - breakout::BALL_SIZE {
                prop_assert!(world.ball.vel.x < 0.0, "right wall kept dx {}", world.ball.vel.x);
            }
            for (was, brick) in destroyed.iter().zip(&world.bricks) {
                prop_assert!(!was || brick.destroyed, "brick revived");
            }
            match step.verdict {
                Some(Verdict::Won) => prop_assert_eq!(world.bricks_left(), 0),
                Some(Verdict::Lost) => prop_assert_eq!(world.lives, 0),
                None => prop_assert!(world.bricks_left() > 0 && world.lives > 0),
            }
            if step.verdict.is_some() {
                break;
            }
        }
    }

    #[test]
    fn minesweeper_first_reveal_safe_and_flood_maximal(
        seed in any::<u64>(),
        row in 0usize..9,
        col in 0usize..9,
    ) {
        let spec = BoardSpec::new(9, 9, 10);
        let mut board = Minesweeper::new(spec, seed);
        let start = Coord::new(row, col);
        board.reveal(start);
        prop_assert!(!board.tile(start).mine);
        prop_assert_ne!(board.status(), BoardStatus::Lost);

        // Every revealed zero has all of its neighbors revealed
        for r in 0..spec.rows() {
            for c in 0..spec.cols() {
                let at = Coord::new(r, c);
                let tile = board.tile(at);
                if tile.revealed && tile.neighbors == 0 {
                    for n in spec.neighbors(at) {
                        prop_assert!(board.tile(n).revealed, "{:?} next to open {:?}", n, at);
                    }
                }
            }
        }
    }

    #[test]
    fn minesweeper_won_iff_all_safe_revealed(
        seed in any::<u64>(),
        clicks in prop::collection::vec((0usize..5, 0usize..5), 1..40),
    ) {
        let spec = BoardSpec::new(5, 5, 4);
        let mut board = Minesweeper::new(spec, seed);
        for (row, col) in clicks {
            board.reveal(Coord::new(row, col));
            let all_clear = board.revealed_safe() == spec.safe_cells();
            match board.status() {
                BoardStatus::Won => prop_assert!(all_clear),
                BoardStatus::Playing => prop_assert!(!all_clear),
                BoardStatus::Lost => break,
            }
        }
    }
}
