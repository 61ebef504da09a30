//! Arcade Hub headless demo
//!
//! Usage: `arcade-hub [game-id] [seconds]`
//!
//! Runs the chosen simulation (or all five) with a simple autopilot, feeding
//! the fixed-tick scheduler simulated 16ms frames. Events are logged at debug
//! level (`RUST_LOG=debug`); the final snapshot is printed as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::Duration;

    use arcade_hub::sim::breakout::{self, Breakout};
    use arcade_hub::sim::flappy::{self, Flappy};
    use arcade_hub::sim::pong::{self, Pong};
    use arcade_hub::sim::snake::{self, Snake};
    use arcade_hub::sim::{
        BoardStatus, Cell, Coord, Direction, GameInstance, Minesweeper, RawInput, Reveal,
        Simulation,
    };
    use arcade_hub::{ArcadeError, GameId, Settings};

    /// Simulated display refresh
    const FRAME: Duration = Duration::from_millis(16);
    const DEFAULT_SECONDS: u64 = 30;

    /// Picks the input a player would send given what is on screen
    trait Autopilot: Simulation {
        fn pilot(world: &Self::World) -> Option<RawInput>;
    }

    impl Autopilot for Breakout {
        fn pilot(world: &breakout::BreakoutWorld) -> Option<RawInput> {
            Some(RawInput::PointerMove {
                x: world.ball.pos.x + breakout::BALL_SIZE / 2.0,
                y: breakout::PADDLE_Y,
            })
        }
    }

    impl Autopilot for Pong {
        fn pilot(world: &pong::PongWorld) -> Option<RawInput> {
            Some(RawInput::PointerMove {
                x: 0.0,
                y: world.ball.pos.y + pong::BALL_SIZE / 2.0,
            })
        }
    }

    impl Autopilot for Flappy {
        fn pilot(world: &flappy::FlappyWorld) -> Option<RawInput> {
            // Aim for the middle of the next gap the bird has not cleared
            let target = world
                .pipes
                .iter()
                .find(|pipe| pipe.trailing_edge() >= flappy::BIRD_X)
                .map(|pipe| pipe.gap_top + flappy::PIPE_GAP / 2.0)
                .unwrap_or(flappy::BIRD_START_Y);
            let bird_center = world.bird_y + flappy::BIRD_SIZE / 2.0;
            (bird_center > target + 10.0 && world.velocity > 0.0).then_some(RawInput::Space)
        }
    }

    impl Autopilot for Snake {
        fn pilot(world: &snake::SnakeWorld) -> Option<RawInput> {
            let head = world.head();
            let distance = |cell: Cell| (cell.x - world.food.x).abs() + (cell.y - world.food.y).abs();
            let best = [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
                .into_iter()
                .filter(|dir| Snake::admits(world, dir) || world.direction == Some(*dir))
                .filter(|dir| {
                    let next = head.offset(*dir);
                    next.in_grid() && !world.occupies(next)
                })
                .min_by_key(|dir| distance(head.offset(*dir)))?;

            if world.direction == Some(best) {
                return None;
            }
            Some(match best {
                Direction::Up => RawInput::ArrowUp,
                Direction::Down => RawInput::ArrowDown,
                Direction::Left => RawInput::ArrowLeft,
                Direction::Right => RawInput::ArrowRight,
            })
        }
    }

    pub fn run(mut args: impl Iterator<Item = String>) -> Result<(), ArcadeError> {
        let settings = Settings::from_env()?;

        let games = match args.next() {
            Some(arg) => {
                let id: GameId = arg.parse()?;
                if !id.is_simulated() {
                    return Err(ArcadeError::NotSimulated(id));
                }
                vec![id]
            }
            None => GameId::SIMULATED.to_vec(),
        };
        let seconds = match args.next() {
            Some(arg) => arg
                .trim()
                .parse::<u64>()
                .map_err(|_| ArcadeError::InvalidSetting {
                    key: "seconds",
                    value: arg.clone(),
                })?,
            None => DEFAULT_SECONDS,
        };

        for id in games {
            if let Some(help) = id.instructions(settings.language) {
                log::info!("{id}: {help}");
            }
            match id {
                GameId::Breakout => play::<Breakout>(&settings, seconds)?,
                GameId::Pong => play::<Pong>(&settings, seconds)?,
                GameId::FlappyBird => play::<Flappy>(&settings, seconds)?,
                GameId::Snake => play::<Snake>(&settings, seconds)?,
                GameId::Minesweeper => sweep(&settings)?,
                other => return Err(ArcadeError::NotSimulated(other)),
            }
        }
        Ok(())
    }

    fn play<S: Autopilot>(settings: &Settings, seconds: u64) -> Result<(), ArcadeError> {
        let mut game = GameInstance::<S>::new(settings.game_seed());
        let Some(ticker) = game.start() else {
            log::warn!("{} did not start", S::ID);
            return Ok(());
        };
        let mut ticker = ticker.with_max_substeps(settings.max_substeps);

        for _ in 0..frame_count(seconds) {
            if let Some(input) = S::pilot(game.world()) {
                game.handle(&input);
            }
            ticker.advance(FRAME, &mut game);
            for event in game.drain_events() {
                log::debug!("{}: {:?}", S::ID, event);
            }
            if ticker.is_cancelled() {
                break;
            }
        }
        ticker.cancel();

        let status = game
            .status()
            .label()
            .map(|label| label.text(settings.language))
            .unwrap_or_default();
        log::info!(
            "{} stopped after {} ticks: {} {:?}",
            S::ID,
            game.ticks(),
            status,
            game.hud()
        );
        println!("{}", game.to_json()?);
        Ok(())
    }

    /// Simulated frames in `seconds`, saturating for absurd requests
    fn frame_count(seconds: u64) -> u64 {
        seconds.saturating_mul(1000) / FRAME.as_millis() as u64
    }

    /// Reveal tiles in reading order until the board is decided
    fn sweep(settings: &Settings) -> Result<(), ArcadeError> {
        let spec = settings.difficulty.board();
        let mut board = Minesweeper::new(spec, settings.game_seed());

        'scan: for row in 0..spec.rows() {
            for col in 0..spec.cols() {
                match board.reveal(Coord::new(row, col)) {
                    Reveal::Opened(count) => {
                        log::debug!("minesweeper: ({row}, {col}) opened {count}")
                    }
                    Reveal::Detonated => break 'scan,
                    Reveal::Ignored => {}
                }
                if board.status() != BoardStatus::Playing {
                    break 'scan;
                }
            }
        }

        log::info!(
            "minesweeper stopped: {} ({} of {} safe tiles)",
            board.status().label().text(settings.language),
            board.revealed_safe(),
            spec.safe_cells()
        );
        println!("{}", board.to_json()?);
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Arcade Hub (headless) starting...");

    match headless::run(std::env::args().skip(1)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("arcade-hub: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a web shell; there is no wasm binary
}
