//! Software rendering module
//!
//! Draws a captured `Frame` onto a `PixelBuffer`:
//! - grass background and the gray road
//! - white lane markers down the middle
//! - sprites back to front, rotated about their centers
//! - the HUD on top

pub mod canvas;
pub mod frame;
pub mod rotation;
pub mod text;

pub use canvas::{Pixel, PixelBuffer, RenderError, colors};
pub use frame::{DrawSprite, Frame, Hud};
pub use rotation::RotationCache;

use crate::assets::SpriteSet;
use crate::config::Config;

const HUD_SCALE: i32 = 3;
const GAME_OVER_SCALE: i32 = 8;
const PROMPT_SCALE: i32 = 5;

pub struct Renderer {
    sprites: SpriteSet,
    cache: RotationCache,
    marker_width: f32,
    marker_height: f32,
}

impl Renderer {
    pub fn new(sprites: SpriteSet, config: &Config) -> Self {
        Self {
            sprites,
            cache: RotationCache::new(),
            marker_width: config.marker_width,
            marker_height: config.marker_height,
        }
    }

    /// Number of rotated sprites built so far
    pub fn cached_rotations(&self) -> usize {
        self.cache.len()
    }

    /// A canvas sized for the viewport
    pub fn canvas(config: &Config) -> PixelBuffer {
        PixelBuffer::filled(config.width as u32, config.height as u32, colors::GRASS)
    }

    pub fn draw(&mut self, frame: &Frame, canvas: &mut PixelBuffer) {
        let width = canvas.width() as f32;
        let height = canvas.height() as f32;

        canvas.fill(colors::GRASS);
        canvas.fill_rect(
            frame.road_x as i32,
            0,
            frame.road_width as i32,
            canvas.height() as i32,
            colors::ROAD,
        );

        // Lane markers
        let marker_x = (width / 2.0 - self.marker_width / 2.0) as i32;
        let mut y = frame.marker_offset;
        while y < height {
            canvas.fill_rect(
                marker_x,
                y as i32,
                self.marker_width as i32,
                self.marker_height as i32,
                colors::WHITE,
            );
            y += self.marker_height * 2.0;
        }

        for sprite in &frame.sprites {
            let base = self.sprites.get(sprite.kind);
            let image = self.cache.rotated(sprite.kind, base, sprite.angle);
            let center = sprite.center();
            let x = (center.x - image.width() as f32 / 2.0).round() as i32;
            let y = (center.y - image.height() as f32 / 2.0).round() as i32;
            canvas.blit(image, x, y);
        }

        draw_hud(&frame.hud, canvas);
    }
}

/// Score and speed top-left; the game-over banner and prompt centered
fn draw_hud(hud: &Hud, canvas: &mut PixelBuffer) {
    let lines = hud.lines();
    for (i, line) in lines.iter().take(2).enumerate() {
        canvas.draw_text(line, 10, 10 + 40 * i as i32, HUD_SCALE, colors::WHITE);
    }

    if hud.game_over {
        let height = canvas.height() as i32;
        canvas.draw_text_centered(Hud::GAME_OVER, height / 5 - 50, GAME_OVER_SCALE, colors::RED);
        canvas.draw_text_centered(Hud::PROMPT, height / 2 + 50, PROMPT_SCALE, colors::RED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    fn setup() -> (Config, GameState, Renderer, PixelBuffer) {
        let config = Config::default();
        let mut state = GameState::new(11, &config, 0.0);
        state.environment.clear();
        let renderer = Renderer::new(SpriteSet::placeholders(&config), &config);
        let canvas = Renderer::canvas(&config);
        (config, state, renderer, canvas)
    }

    #[test]
    fn test_background_and_road() {
        let (config, state, mut renderer, mut canvas) = setup();
        renderer.draw(&Frame::capture(&state, &config), &mut canvas);

        assert_eq!(canvas.get(10, 10), Some(colors::GRASS));
        assert_eq!(canvas.get(790, 590), Some(colors::GRASS));
        assert_eq!(canvas.get(230, 10), Some(colors::ROAD));
        // Marker at the top-center while stopped
        assert_eq!(canvas.get(400, 10), Some(colors::WHITE));
        assert_eq!(canvas.get(400, 60), Some(colors::ROAD));
    }

    #[test]
    fn test_player_drawn_last() {
        let (config, mut state, mut renderer, mut canvas) = setup();
        // Opponent parked on top of the player
        state
            .opponents
            .push(crate::sim::Car::opponent(state.player.pos, 0.0, &config));
        renderer.draw(&Frame::capture(&state, &config), &mut canvas);
        assert_eq!(canvas.get(400, 500), Some(colors::RED));
    }

    #[test]
    fn test_leaning_player_uses_cache() {
        let (config, mut state, mut renderer, mut canvas) = setup();
        state.player.angle = 15.0;
        renderer.draw(&Frame::capture(&state, &config), &mut canvas);
        renderer.draw(&Frame::capture(&state, &config), &mut canvas);
        assert_eq!(renderer.cached_rotations(), 1);
        // Still centered on the car
        assert_eq!(canvas.get(400, 500), Some(colors::RED));
    }

    fn count_in(
        canvas: &PixelBuffer,
        color: Pixel,
        xs: std::ops::Range<i32>,
        ys: std::ops::Range<i32>,
    ) -> usize {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.get(x, y) == Some(color))
            .count()
    }

    #[test]
    fn test_hud_score_and_speed() {
        let (config, mut state, mut renderer, mut canvas) = setup();
        state.score = 1200;
        renderer.draw(&Frame::capture(&state, &config), &mut canvas);

        // Score line, then speed line below it, both on the grass
        assert!(count_in(&canvas, colors::WHITE, 0..200, 10..31) > 0);
        assert!(count_in(&canvas, colors::WHITE, 0..200, 50..71) > 0);
        assert_eq!(count_in(&canvas, colors::WHITE, 0..200, 31..50), 0);
    }

    #[test]
    fn test_hud_game_over_banner() {
        let (config, mut state, mut renderer, mut canvas) = setup();
        renderer.draw(&Frame::capture(&state, &config), &mut canvas);
        assert_eq!(count_in(&canvas, colors::RED, 0..800, 70..126), 0);
        assert_eq!(count_in(&canvas, colors::RED, 0..800, 350..385), 0);

        state.game_over = true;
        renderer.draw(&Frame::capture(&state, &config), &mut canvas);
        assert!(count_in(&canvas, colors::RED, 0..800, 70..126) > 0);
        assert!(count_in(&canvas, colors::RED, 0..800, 350..385) > 0);
        // Banner is centered: 424 px wide on an 800 px canvas
        assert_eq!(count_in(&canvas, colors::RED, 0..188, 70..126), 0);
        assert_eq!(count_in(&canvas, colors::RED, 612..800, 70..126), 0);
        assert!(count_in(&canvas, colors::RED, 188..236, 70..126) > 0);
        assert!(count_in(&canvas, colors::RED, 564..612, 70..126) > 0);
    }
}
