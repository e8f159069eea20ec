//! Orbit Dash entry point
//!
//! Native builds run a headless demo: a bot plays at a fixed 60 Hz clock and
//! every run is logged. The browser build is driven from JS through
//! `orbit_dash::platform::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = native::run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};

    use orbit_dash::sim::{FrameInput, GameEvent, GameState, Mode, is_perfect_tap};
    use orbit_dash::{
        FileProfileStore, GameSession, LogShareSink, MemoryProfileStore, ProfileStore, Tuning,
        angle_distance,
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Every Nth tap the bot deliberately fires far from the gate
    const FUMBLE_EVERY: u32 = 9;

    const USAGE: &str = "usage: orbit-dash [--frames N] [--seed N] [--tuning PATH] [--save]";

    struct Options {
        frames: u64,
        seed: u64,
        tuning: Option<String>,
        /// Commit runs to the on-disk profile
        save: bool,
    }

    fn parse_args() -> Result<Options> {
        let mut opts = Options {
            frames: 60 * 60 * 3,
            seed: 42,
            tuning: None,
            save: false,
        };

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--frames" => {
                    opts.frames = args
                        .next()
                        .context("--frames needs a value")?
                        .parse()
                        .context("--frames must be a number")?;
                }
                "--seed" => {
                    opts.seed = args
                        .next()
                        .context("--seed needs a value")?
                        .parse()
                        .context("--seed must be a number")?;
                }
                "--tuning" => opts.tuning = Some(args.next().context("--tuning needs a path")?),
                "--save" => opts.save = true,
                "-h" | "--help" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                other => anyhow::bail!("unknown argument {other:?}\n{USAGE}"),
            }
        }
        Ok(opts)
    }

    /// Taps on perfect alignment, with the occasional deliberate miss
    #[derive(Default)]
    struct Bot {
        taps: u32,
        fumble_next: bool,
    }

    impl Bot {
        fn input(&mut self, state: &GameState, now_ms: f64) -> FrameInput {
            let mut input = FrameInput::at(now_ms);
            input.activate_shield = state.shield_available && !state.shield_armed;
            input.activate_auto_play = state.auto_play_in_inventory && !state.auto_play_active;

            if state.mode != Mode::Orbit || state.auto_play_active {
                return input;
            }

            let tap = if self.fumble_next {
                angle_distance(state.angle, state.gate_angle) > 1.5
            } else {
                is_perfect_tap(state.angle, state.gate_angle, state.tuning.perfect_threshold)
            };

            if tap {
                input.tap = true;
                self.taps += 1;
                self.fumble_next = self.taps.is_multiple_of(FUMBLE_EVERY);
            }
            input
        }
    }

    pub fn run() -> Result<()> {
        let opts = parse_args()?;
        let tuning = match &opts.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::from_env(),
        };

        let store: Box<dyn ProfileStore> = if opts.save {
            let store = FileProfileStore::default_location()
                .context("could not determine a data directory for the profile")?;
            log::info!("Saving profile to {:?}", store.path());
            Box::new(store)
        } else {
            Box::new(MemoryProfileStore::new())
        };

        log::info!("Orbit Dash (headless) starting: {} frames, seed {}", opts.frames, opts.seed);

        let mut session = GameSession::new(tuning, opts.seed, store);
        let mut bot = Bot::default();
        let mut runs = 0u32;

        for frame in 0..opts.frames {
            let now_ms = frame as f64 * FRAME_MS;
            let input = bot.input(session.state(), now_ms);
            let game_over = session
                .frame(&input)
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }));

            if !game_over {
                continue;
            }

            if session.continue_run() {
                continue;
            }

            runs += 1;
            let state = session.state();
            log::info!(
                "Run {}: score={} rings={} coins={}",
                runs,
                session.display_score(),
                state.rings_completed,
                state.coins
            );
            session.share(&mut LogShareSink);
            session.restart();
        }

        session.leave();
        let profile = session.profile();
        log::info!(
            "Finished after {} runs: best={} banked coins={}",
            runs,
            profile.best_score,
            profile.total_coins
        );
        Ok(())
    }
}
