//! Frame capture
//!
//! A `Frame` is everything needed to draw one tick, copied out of the game
//! state so drawing never borrows the simulation.

use glam::Vec2;

use crate::assets::SpriteKind;
use crate::config::Config;
use crate::sim::{GameState, Rect};

/// One sprite placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawSprite {
    pub kind: SpriteKind,
    /// Top-left of the entity's box
    pub pos: Vec2,
    pub size: Vec2,
    /// Heading in degrees (counter-clockwise)
    pub angle: f32,
}

impl DrawSprite {
    /// Rotated sprites are drawn centered on this point
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Heads-up display contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub speed: u32,
    pub game_over: bool,
}

impl Hud {
    pub const GAME_OVER: &'static str = "GAME OVER";
    pub const PROMPT: &'static str = "R-Restart/Q-Quit";

    /// Text lines in display order
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Score: {}", self.score),
            format!("Speed: {}", self.speed),
        ];
        if self.game_over {
            lines.push(Self::GAME_OVER.to_string());
            lines.push(Self::PROMPT.to_string());
        }
        lines
    }
}

/// Draw list for one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub road_x: f32,
    pub road_width: f32,
    /// Vertical offset of the first lane marker
    pub marker_offset: f32,
    /// Back to front: scenery, opponents, player
    pub sprites: Vec<DrawSprite>,
    pub hud: Hud,
}

impl Frame {
    pub fn capture(state: &GameState, config: &Config) -> Self {
        let viewport = Rect::new(0.0, 0.0, config.width, config.height);
        let visible = |pos: Vec2, size: Vec2| viewport.overlaps(&Rect::from_pos_size(pos, size));

        let mut sprites = Vec::with_capacity(state.environment.len() + state.opponents.len() + 1);

        sprites.extend(
            state
                .environment
                .iter()
                .filter(|obj| visible(obj.pos, obj.size))
                .map(|obj| DrawSprite {
                    kind: SpriteKind::for_object(obj.kind),
                    pos: obj.pos,
                    size: obj.size,
                    angle: 0.0,
                }),
        );

        sprites.extend(
            state
                .opponents
                .iter()
                .filter(|car| visible(car.pos, car.size))
                .map(|car| DrawSprite {
                    kind: SpriteKind::OpponentCar,
                    pos: car.pos,
                    size: car.size,
                    angle: car.angle,
                }),
        );

        sprites.push(DrawSprite {
            kind: SpriteKind::PlayerCar,
            pos: state.player.pos,
            size: state.player.size,
            angle: state.player.angle,
        });

        Self {
            road_x: config.road_x(),
            road_width: config.road_width,
            marker_offset: (state.player.speed * 10.0) % (config.marker_height * 2.0),
            sprites,
            hud: Hud {
                score: state.score,
                speed: state.speed_display(),
                game_over: state.game_over,
            },
        }
    }
}
