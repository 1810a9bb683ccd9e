use clap::Parser;
use escape_duck::persistence::{self, FileStore, KeyValueStore};
use escape_duck::{
    CliRenderer, Config, Direction, Game, GameState, Input, KeyRepeat, MoveAnimation, Renderer,
    Result,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Reach the exit before the duck reaches you")]
struct Args {
    /// TOML file overriding the default tuning
    #[arg(long, default_value = "escape-duck.toml")]
    config: PathBuf,

    /// Seed for level generation; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding saved progress
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Delete saved progress before starting
    #[arg(long)]
    reset: bool,
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Runs one turn and persists progress when the level ended.
fn take_turn(
    game: &mut Game,
    store: &mut dyn KeyValueStore,
    direction: Direction,
    config: &Config,
) -> Option<MoveAnimation> {
    let report = game.apply_command(direction)?;
    if report.ends_level() {
        if let Err(e) = persistence::save_progress(store, game.progress()) {
            tracing::warn!(error = %e, "failed to save progress");
        }
    }
    Some(MoveAnimation::new(&report, config.animation_steps))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut config = Config::load(&args.config)?;
    if let Some(dir) = args.save_dir {
        config.save_dir = dir;
    }

    let mut store = FileStore::open(&config.save_dir)?;
    if args.reset {
        persistence::delete_progress(&mut store)?;
    }
    let progress = persistence::load_progress(&store);

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(&config, progress, rng);
    let mut keys = KeyRepeat::new(config.repeat_delay(), config.repeat_interval());
    let mut animation: Option<MoveAnimation> = None;
    let mut last_frame = Instant::now();

    let mut renderer = CliRenderer::new();
    renderer.init()?;

    loop {
        let now = Instant::now();
        let busy = animation.as_ref().is_some_and(MoveAnimation::is_busy);

        // Poll for input
        if let Some(input) = renderer.poll_input()? {
            match (game.state, input) {
                (_, Input::Quit) => break,
                (_, Input::Release(direction)) => keys.release(direction),
                (GameState::Idle, Input::Confirm) => game.start()?,
                (GameState::Idle, Input::DeleteData) => {
                    persistence::delete_progress(&mut store)?;
                    game.reset_progress();
                }
                (GameState::Running, Input::Direction(direction)) => {
                    if let Some(direction) = keys.press(direction, now) {
                        // Input arriving mid-animation is dropped.
                        if !busy {
                            animation = take_turn(&mut game, &mut store, direction, &config);
                        }
                    }
                }
                (GameState::Won | GameState::Lost, _) => {
                    keys.release_all();
                    if busy {
                        // A key during the final move skips to its end first.
                        if let Some(anim) = animation.as_mut() {
                            anim.finish();
                        }
                    } else {
                        animation = None;
                        game.acknowledge()?;
                    }
                }
                _ => {}
            }
        }

        if game.state == GameState::Running && !busy {
            if let Some(direction) = keys.poll(now) {
                animation = take_turn(&mut game, &mut store, direction, &config);
            }
        }

        if last_frame.elapsed() >= config.animation_frame() {
            if let Some(anim) = animation.as_mut() {
                anim.advance();
            }
            last_frame = Instant::now();
        }

        let mut snapshot = game.snapshot();
        if let Some(anim) = animation.as_ref().filter(|anim| anim.is_busy()) {
            let (player, pursuer) = anim.cells();
            snapshot.player = player;
            snapshot.pursuer = pursuer;
        }

        // Let renderer decide when to actually render
        // (it manages its own frame rate internally)
        renderer.render(&snapshot)?;
    }

    renderer.cleanup()?;
    if let Err(e) = persistence::save_progress(&mut store, game.progress()) {
        tracing::warn!(error = %e, "failed to save progress on exit");
    }
    Ok(())
}
