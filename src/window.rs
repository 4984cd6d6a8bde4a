//! Windowed play
//!
//! Presents the canvas in a minifb window and drives the session from the
//! keyboard: arrows steer, R restarts, Q or Escape quits, M mutes.

use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::audio::AudioSink;
use crate::game::{Flow, Session};
use crate::input::KeyState;
use crate::renderer::{Frame, PixelBuffer, Renderer};

pub const TITLE: &str = "Roadside Racer";

/// Open a window sized to the canvas, capped at the configured frame rate
pub fn open(canvas: &PixelBuffer, frame_rate: u32) -> Result<Window, minifb::Error> {
    let mut win = Window::new(
        TITLE,
        canvas.width() as usize,
        canvas.height() as usize,
        WindowOptions {
            scale: minifb::Scale::X1,
            resize: false,
            ..WindowOptions::default()
        },
    )?;
    win.limit_update_rate(Some(Duration::from_micros(
        1_000_000 / frame_rate.max(1) as u64,
    )));
    Ok(win)
}

/// Current keyboard state
pub fn read_keys(win: &Window) -> KeyState {
    KeyState {
        left: win.is_key_down(Key::Left),
        right: win.is_key_down(Key::Right),
        restart: win.is_key_pressed(Key::R, KeyRepeat::No),
        quit: win.is_key_pressed(Key::Q, KeyRepeat::No) || win.is_key_down(Key::Escape),
        mute: win.is_key_pressed(Key::M, KeyRepeat::No),
    }
}

/// Play until the window closes or a quit key is pressed. Returns the number
/// of ticks run.
pub fn run<A: AudioSink>(
    session: &mut Session<A>,
    renderer: &mut Renderer,
    canvas: &mut PixelBuffer,
) -> Result<u64, minifb::Error> {
    let frame_rate = session.config().frame_rate();
    let dt = session.config().tick_seconds();
    let mut win = open(canvas, frame_rate)?;
    let mut buffer = Vec::with_capacity(canvas.pixels().len());
    let (width, height) = (canvas.width() as usize, canvas.height() as usize);

    log::info!("Window open ({}x{} at {} fps)", width, height, frame_rate);

    let mut ticks = 0;
    while win.is_open() {
        // Same simulated clock as headless runs
        let now = ticks as f64 * dt;
        let input = read_keys(&win).to_input();
        if session.step(&input, now) == Flow::Quit {
            break;
        }
        ticks += 1;

        renderer.draw(&Frame::capture(session.state(), session.config()), canvas);
        canvas.to_argb(&mut buffer);
        win.update_with_buffer(&buffer, width, height)?;
    }

    if !win.is_open() {
        log::info!("Window closed after {} ticks", ticks);
    }
    Ok(ticks)
}
