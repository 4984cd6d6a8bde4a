//! Cars and roadside/in-road scenery

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::config::Config;
use crate::consts::{HEADING_SMOOTHING, TURN_ANGLE};

/// Discrete steering intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steering {
    #[default]
    None,
    Left,
    Right,
}

impl Steering {
    /// Whether the player is actively steering (and therefore accelerating)
    pub fn is_active(self) -> bool {
        !matches!(self, Steering::None)
    }
}

/// A car - the player or an oncoming opponent
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    /// Top-left of the bounding box
    pub pos: Vec2,
    pub size: Vec2,
    /// Current heading in degrees (player only; opponents never rotate)
    pub angle: f32,
    /// Heading the player is easing toward
    pub target_angle: f32,
    /// Scalar speed in pixels per tick, within `[0, max_speed]`
    pub speed: f32,
    pub max_speed: f32,
    pub is_player: bool,
}

impl Car {
    /// The player car at its starting position, stationary
    pub fn player(config: &Config) -> Self {
        Self {
            pos: config.player_start(),
            size: config.car_size(),
            angle: 0.0,
            target_angle: 0.0,
            speed: 0.0,
            max_speed: config.max_speed,
            is_player: true,
        }
    }

    /// An opponent descending at a constant `speed`
    pub fn opponent(pos: Vec2, speed: f32, config: &Config) -> Self {
        Self {
            pos,
            size: config.car_size(),
            angle: 0.0,
            target_angle: 0.0,
            speed,
            max_speed: speed,
            is_player: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Apply one tick of player control.
    ///
    /// Steering moves the car sideways in proportion to its current speed and
    /// accelerates it; letting go coasts down at the (slower) deceleration
    /// rate. The heading eases toward ±15° so the sprite leans into turns.
    pub fn update_player(&mut self, steering: Steering, config: &Config) {
        let lateral = self.speed * config.turn_speed;
        match steering {
            Steering::Left => {
                self.target_angle = TURN_ANGLE;
                self.pos.x -= lateral;
            }
            Steering::Right => {
                self.target_angle = -TURN_ANGLE;
                self.pos.x += lateral;
            }
            Steering::None => self.target_angle = 0.0,
        }

        self.angle += (self.target_angle - self.angle) * HEADING_SMOOTHING;

        let (min_x, max_x) = config.player_x_bounds();
        self.pos.x = self.pos.x.min(max_x).max(min_x);

        self.speed = if steering.is_active() {
            (self.speed + config.acceleration).min(self.max_speed)
        } else {
            (self.speed - config.deceleration).max(0.0)
        };
    }

    /// Move an opponent straight down by its speed.
    ///
    /// Returns true once the car has left the bottom of the viewport; the
    /// caller is responsible for removing it.
    pub fn advance(&mut self, viewport_height: f32) -> bool {
        self.pos.y += self.speed;
        self.pos.y > viewport_height
    }
}

/// Scenery/obstacle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Decorative, beside the road
    Tree,
    /// Decorative, beside the road
    Flag,
    /// In-road bonus target (+score)
    Barrier,
    /// In-road hazard (ends the run)
    Person,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Tree,
        ObjectKind::Flag,
        ObjectKind::Barrier,
        ObjectKind::Person,
    ];

    /// Trees and flags share the roadside and must not overlap each other
    pub fn is_side_group(self) -> bool {
        matches!(self, ObjectKind::Tree | ObjectKind::Flag)
    }

    pub fn size(self, config: &Config) -> Vec2 {
        match self {
            ObjectKind::Tree => config.tree_size,
            ObjectKind::Flag => config.flag_size,
            ObjectKind::Barrier => config.barrier_size,
            ObjectKind::Person => config.person_size,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Tree => "tree",
            ObjectKind::Flag => "flag",
            ObjectKind::Barrier => "barrier",
            ObjectKind::Person => "person",
        }
    }
}

/// A scenery object that scrolls with the road and is recycled in place
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentObject {
    pub kind: ObjectKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl EnvironmentObject {
    pub fn new(kind: ObjectKind, pos: Vec2, config: &Config) -> Self {
        Self {
            kind,
            pos,
            size: kind.size(config),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}
