//! Sprite loading
//!
//! Sprites are QOI images read from an asset directory and scaled to the
//! size the simulation uses for each entity. A missing or unreadable file
//! never stops the game: a flat-colored placeholder is drawn instead.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use qoi::{Decoder, Header};

use crate::config::Config;
use crate::renderer::canvas::{PixelBuffer, colors};
use crate::sim::ObjectKind;

pub type Sprite = PixelBuffer;

/// Every image the renderer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    PlayerCar,
    OpponentCar,
    Tree,
    Flag,
    Barrier,
    Person,
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 6] = [
        SpriteKind::PlayerCar,
        SpriteKind::OpponentCar,
        SpriteKind::Tree,
        SpriteKind::Flag,
        SpriteKind::Barrier,
        SpriteKind::Person,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            SpriteKind::PlayerCar => "car.qoi",
            SpriteKind::OpponentCar => "car1.qoi",
            SpriteKind::Tree => "tree.qoi",
            SpriteKind::Flag => "flag.qoi",
            SpriteKind::Barrier => "barrier.qoi",
            SpriteKind::Person => "person.qoi",
        }
    }

    pub fn for_object(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Tree => SpriteKind::Tree,
            ObjectKind::Flag => SpriteKind::Flag,
            ObjectKind::Barrier => SpriteKind::Barrier,
            ObjectKind::Person => SpriteKind::Person,
        }
    }

    /// Drawn size in pixels
    pub fn size(&self, config: &Config) -> Vec2 {
        match self {
            SpriteKind::PlayerCar | SpriteKind::OpponentCar => config.car_size(),
            SpriteKind::Tree => ObjectKind::Tree.size(config),
            SpriteKind::Flag => ObjectKind::Flag.size(config),
            SpriteKind::Barrier => ObjectKind::Barrier.size(config),
            SpriteKind::Person => ObjectKind::Person.size(config),
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Failure reading a sprite file
#[derive(Debug)]
pub enum AssetError {
    Io(std::io::Error),
    Decode(qoi::Error),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(e) => write!(f, "{}", e),
            AssetError::Decode(e) => write!(f, "invalid QOI image: {}", e),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::Io(e)
    }
}

impl From<qoi::Error> for AssetError {
    fn from(e: qoi::Error) -> Self {
        AssetError::Decode(e)
    }
}

/// Decode a QOI image into an RGBA sprite at its native size
pub fn decode_sprite(bytes: &[u8]) -> Result<Sprite, AssetError> {
    let mut decoder = Decoder::new(bytes).map(|d| d.with_channels(qoi::Channels::Rgba))?;
    let &Header { width, height, .. } = decoder.header();
    let data = decoder.decode_to_vec()?;
    // Length is guaranteed by the RGBA channel request
    Ok(Sprite::from_rgba(width, height, &data).unwrap_or_else(|| Sprite::new(width, height)))
}

fn read_sprite(path: &Path, width: u32, height: u32) -> Result<Sprite, AssetError> {
    let bytes = std::fs::read(path)?;
    Ok(decode_sprite(&bytes)?.scaled(width, height))
}

/// Flat-colored stand-in used when no image is available
pub fn placeholder(kind: SpriteKind, width: u32, height: u32) -> Sprite {
    let (w, h) = (width as i32, height as i32);
    let (wf, hf) = (width as f32, height as f32);

    match kind {
        SpriteKind::PlayerCar => Sprite::filled(width, height, colors::RED),
        SpriteKind::OpponentCar => Sprite::filled(width, height, colors::BLUE),
        SpriteKind::Tree => {
            let mut s = Sprite::new(width, height);
            s.fill_rect(w / 3, h / 2, w / 3, h / 2, colors::BROWN);
            s.fill_triangle(
                [
                    Vec2::new(0.0, hf / 2.0),
                    Vec2::new(wf, hf / 2.0),
                    Vec2::new(wf / 2.0, 0.0),
                ],
                colors::GRASS,
            );
            s
        }
        SpriteKind::Flag => {
            let mut s = Sprite::new(width, height);
            s.fill_rect(w / 2 - 2, 0, 4, h, colors::BROWN);
            s.fill_triangle(
                [
                    Vec2::new(wf / 2.0, 10.0),
                    Vec2::new(wf, 25.0),
                    Vec2::new(wf / 2.0, 40.0),
                ],
                colors::RED,
            );
            s
        }
        SpriteKind::Barrier => {
            let mut s = Sprite::filled(width, height, colors::YELLOW);
            s.stroke_rect(0, 0, w, h, 2, colors::BLACK);
            s
        }
        SpriteKind::Person => {
            let mut s = Sprite::new(width, height);
            s.fill_ellipse(0, 0, w, w, colors::SKIN);
            s.fill_rect(w / 4, w, w / 2, h - w, colors::BLUE);
            s
        }
    }
}

/// Load one sprite from `dir`, falling back to a placeholder
pub fn load_sprite(dir: Option<&Path>, kind: SpriteKind, size: Vec2) -> Sprite {
    let (width, height) = (size.x.max(1.0) as u32, size.y.max(1.0) as u32);

    let sprite = match dir {
        Some(dir) => {
            let path = dir.join(kind.file_name());
            match read_sprite(&path, width, height) {
                Ok(sprite) => {
                    log::debug!("Loaded {}", path.display());
                    sprite
                }
                Err(e) => {
                    log::warn!(
                        "Failed to load image {}: {} - using placeholder",
                        path.display(),
                        e
                    );
                    placeholder(kind, width, height)
                }
            }
        }
        None => placeholder(kind, width, height),
    };

    // Oncoming traffic faces down the road
    if kind == SpriteKind::OpponentCar {
        sprite.flipped()
    } else {
        sprite
    }
}

/// All sprites, loaded once at startup
#[derive(Debug, Clone)]
pub struct SpriteSet {
    sprites: Vec<Sprite>,
}

impl SpriteSet {
    pub fn load(dir: Option<&Path>, config: &Config) -> Self {
        let sprites = SpriteKind::ALL
            .iter()
            .map(|kind| load_sprite(dir, *kind, kind.size(config)))
            .collect();
        Self { sprites }
    }

    /// Placeholders only
    pub fn placeholders(config: &Config) -> Self {
        Self::load(None, config)
    }

    pub fn get(&self, kind: SpriteKind) -> &Sprite {
        &self.sprites[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::canvas::Pixel;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("roadside-racer-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_placeholders_match_entity_sizes() {
        let config = Config::default();
        let set = SpriteSet::placeholders(&config);
        for kind in SpriteKind::ALL {
            let size = kind.size(&config);
            let sprite = set.get(kind);
            assert_eq!(sprite.width(), size.x as u32, "{:?}", kind);
            assert_eq!(sprite.height(), size.y as u32, "{:?}", kind);
        }
    }

    #[test]
    fn test_placeholder_shapes() {
        let tree = placeholder(SpriteKind::Tree, 80, 80);
        assert_eq!(tree.get(40, 70), Some(colors::BROWN));
        assert_eq!(tree.get(40, 30), Some(colors::GRASS));
        assert_eq!(tree.get(2, 2), Some(Pixel::TRANSPARENT));

        let barrier = placeholder(SpriteKind::Barrier, 80, 50);
        assert_eq!(barrier.get(0, 0), Some(colors::BLACK));
        assert_eq!(barrier.get(40, 25), Some(colors::YELLOW));

        let person = placeholder(SpriteKind::Person, 30, 90);
        assert_eq!(person.get(15, 15), Some(colors::SKIN));
        assert_eq!(person.get(15, 60), Some(colors::BLUE));
    }

    #[test]
    fn test_player_and_opponent_colors_differ() {
        let config = Config::default();
        let set = SpriteSet::placeholders(&config);
        assert_eq!(set.get(SpriteKind::PlayerCar).get(0, 0), Some(colors::RED));
        assert_eq!(set.get(SpriteKind::OpponentCar).get(0, 0), Some(colors::BLUE));
    }

    #[test]
    fn test_for_object() {
        for kind in ObjectKind::ALL {
            assert_eq!(SpriteKind::for_object(kind).file_name(), format!("{}.qoi", kind.as_str()));
        }
    }

    #[test]
    fn test_missing_directory_falls_back() {
        let dir = std::env::temp_dir().join("roadside-racer-does-not-exist");
        let sprite = load_sprite(Some(&dir), SpriteKind::Barrier, Vec2::new(80.0, 50.0));
        assert_eq!(sprite, placeholder(SpriteKind::Barrier, 80, 50));
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = temp_dir("corrupt");
        std::fs::write(dir.join("flag.qoi"), b"not an image").unwrap();
        let sprite = load_sprite(Some(&dir), SpriteKind::Flag, Vec2::new(40.0, 80.0));
        assert_eq!(sprite, placeholder(SpriteKind::Flag, 40, 80));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_loads_and_scales_qoi() {
        let dir = temp_dir("load");
        let source = Sprite::filled(4, 8, colors::WHITE);
        std::fs::write(dir.join("tree.qoi"), source.encode_qoi().unwrap()).unwrap();

        let sprite = load_sprite(Some(&dir), SpriteKind::Tree, Vec2::new(80.0, 80.0));
        assert_eq!((sprite.width(), sprite.height()), (80, 80));
        assert!(sprite.pixels().iter().all(|p| *p == colors::WHITE));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_opponent_is_turned_around() {
        let dir = temp_dir("opponent");
        let mut source = Sprite::new(40, 100);
        source.fill_rect(0, 0, 40, 10, colors::YELLOW);
        std::fs::write(dir.join("car1.qoi"), source.encode_qoi().unwrap()).unwrap();

        let sprite = load_sprite(Some(&dir), SpriteKind::OpponentCar, Vec2::new(40.0, 100.0));
        // Headlights moved from the top to the bottom
        assert_eq!(sprite.get(20, 95), Some(colors::YELLOW));
        assert_eq!(sprite.get(20, 5), Some(Pixel::TRANSPARENT));
        std::fs::remove_dir_all(&dir).ok();
    }
}
