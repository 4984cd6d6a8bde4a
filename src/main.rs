//! Roadside Racer entry point
//!
//! Plays in a window by default. `--demo` instead runs a headless session
//! driven by the autopilot at the configured frame rate. Either way the last
//! frame can be saved as a QOI screenshot.
//!
//! Usage: roadside-racer [--demo] [--seed N] [--seconds S] [--restarts N]
//!        [--config PATH] [--assets DIR] [--screenshot PATH] [--unpaced]

use std::error::Error;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use fps_clock::FpsClock;
use roadside_racer::assets::SpriteSet;
use roadside_racer::audio::AudioManager;
use roadside_racer::input::Autopilot;
use roadside_racer::renderer::{Frame, PixelBuffer, Renderer};
use roadside_racer::{Config, Flow, Session};

/// Command line options
#[derive(Debug)]
struct Options {
    /// Headless autopilot instead of a window
    demo: bool,
    seed: Option<u64>,
    /// Demo length
    seconds: f64,
    restarts: u32,
    config: Option<PathBuf>,
    assets: Option<PathBuf>,
    screenshot: Option<PathBuf>,
    /// Run as fast as possible instead of in real time
    unpaced: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            demo: false,
            seed: None,
            seconds: 30.0,
            restarts: 2,
            config: None,
            assets: None,
            screenshot: None,
            unpaced: false,
        }
    }
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut opts = Options::default();
        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| format!("missing value for {}", name))
            };
            match arg.as_str() {
                "--demo" => opts.demo = true,
                "--seed" => {
                    let v = value("--seed")?;
                    opts.seed = Some(v.parse().map_err(|_| format!("invalid seed: {}", v))?);
                }
                "--seconds" => {
                    let v = value("--seconds")?;
                    opts.seconds = v.parse().map_err(|_| format!("invalid seconds: {}", v))?;
                }
                "--restarts" => {
                    let v = value("--restarts")?;
                    opts.restarts = v.parse().map_err(|_| format!("invalid restarts: {}", v))?;
                }
                "--config" => opts.config = Some(value("--config")?.into()),
                "--assets" => opts.assets = Some(value("--assets")?.into()),
                "--screenshot" => opts.screenshot = Some(value("--screenshot")?.into()),
                "--unpaced" => opts.unpaced = true,
                other => return Err(format!("unknown argument: {}", other)),
            }
        }
        Ok(opts)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Roadside Racer (native) starting...");

    let opts = Options::parse(std::env::args().skip(1))?;
    let config = match &opts.config {
        Some(path) => Config::load(path),
        None => Config::default(),
    };
    let seed = opts.seed.unwrap_or_else(clock_seed);

    let sprites = SpriteSet::load(opts.assets.as_deref(), &config);
    let mut renderer = Renderer::new(sprites, &config);
    let mut canvas = Renderer::canvas(&config);
    let mut session = Session::new(config, seed, AudioManager::new(), 0.0);

    if opts.demo {
        run_demo(&opts, &mut session, &mut renderer, &mut canvas);
    } else {
        run_window(&mut session, &mut renderer, &mut canvas)?;
    }

    let state = session.state();
    log::info!(
        "Finished: seed {} runs {} score {} speed {}{}",
        seed,
        session.runs(),
        state.score,
        state.speed_display(),
        if state.game_over { " (game over)" } else { "" }
    );

    if let Some(path) = &opts.screenshot {
        canvas.save_qoi(path)?;
    }

    Ok(())
}

/// Autopilot loop, logging the HUD once a second
fn run_demo(
    opts: &Options,
    session: &mut Session<AudioManager>,
    renderer: &mut Renderer,
    canvas: &mut PixelBuffer,
) {
    let frame_rate = session.config().frame_rate();
    let dt = session.config().tick_seconds();
    let max_ticks = (opts.seconds / dt).ceil() as u64;
    let mut pilot = Autopilot::new(opts.restarts);
    let mut clock = FpsClock::new(frame_rate);

    for n in 0..max_ticks {
        // Simulated clock keeps runs reproducible whatever the pacing
        let now = n as f64 * dt;
        let input = pilot.next_input(session.state(), session.config());
        if session.step(&input, now) == Flow::Quit {
            break;
        }

        let frame = Frame::capture(session.state(), session.config());
        renderer.draw(&frame, canvas);

        if n % frame_rate as u64 == 0 {
            log::info!("{}", frame.hud.lines().join(" | "));
        }
        if !opts.unpaced {
            clock.tick();
        }
    }
}

#[cfg(feature = "window")]
fn run_window(
    session: &mut Session<AudioManager>,
    renderer: &mut Renderer,
    canvas: &mut PixelBuffer,
) -> Result<(), Box<dyn Error>> {
    roadside_racer::window::run(session, renderer, canvas)?;
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run_window(
    _session: &mut Session<AudioManager>,
    _renderer: &mut Renderer,
    _canvas: &mut PixelBuffer,
) -> Result<(), Box<dyn Error>> {
    Err("built without the `window` feature; run with --demo".into())
}
