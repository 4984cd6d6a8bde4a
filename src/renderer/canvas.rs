//! Software pixel buffers
//!
//! Used both for sprites and for the frame being composed. Pixels are plain
//! RGBA bytes so a buffer can be handed to an image encoder or a window
//! surface without conversion.

use std::fmt;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One RGBA pixel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Composite `self` over `dst`
    #[inline]
    pub fn over(self, dst: Pixel) -> Pixel {
        match self.a {
            0 => dst,
            255 => self,
            a => {
                let a = a as u16;
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((s as u16 * a + d as u16 * inv) / 255) as u8;
                Pixel {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: (a + dst.a as u16 * inv / 255) as u8,
                }
            }
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Pixel;

    pub const BLACK: Pixel = Pixel::rgb(0, 0, 0);
    pub const WHITE: Pixel = Pixel::rgb(255, 255, 255);
    pub const GRASS: Pixel = Pixel::rgb(70, 248, 160);
    pub const ROAD: Pixel = Pixel::rgb(210, 210, 210);
    pub const RED: Pixel = Pixel::rgb(255, 0, 0);
    pub const BLUE: Pixel = Pixel::rgb(0, 0, 255);
    pub const YELLOW: Pixel = Pixel::rgb(255, 255, 0);
    pub const BROWN: Pixel = Pixel::rgb(139, 69, 19);
    pub const SKIN: Pixel = Pixel::rgb(200, 150, 150);
}

/// Failure writing a frame out
#[derive(Debug)]
pub enum RenderError {
    Io(std::io::Error),
    Encode(qoi::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "failed to write image: {}", e),
            RenderError::Encode(e) => write!(f, "failed to encode image: {}", e),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

impl From<qoi::Error> for RenderError {
    fn from(e: qoi::Error) -> Self {
        RenderError::Encode(e)
    }
}

/// A width x height grid of RGBA pixels (row-major, top-left origin)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// Fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Pixel::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wrap raw RGBA bytes (4 per pixel); None if the length doesn't match
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: bytemuck::cast_slice::<u8, Pixel>(bytes).to_vec(),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Pixel> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite a pixel (clipped)
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Pixel) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn fill(&mut self, color: Pixel) {
        self.pixels.fill(color);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Pixel) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set(px, py, color);
            }
        }
    }

    /// Rectangle outline `thickness` pixels wide, drawn inside the bounds
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: Pixel) {
        let t = thickness.min(w / 2).min(h / 2).max(1);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + h - t, w, t, color);
        self.fill_rect(x, y, t, h, color);
        self.fill_rect(x + w - t, y, t, h, color);
    }

    /// Filled triangle (pixel centers inside or on the edges)
    pub fn fill_triangle(&mut self, points: [Vec2; 3], color: Pixel) {
        let [a, b, c] = points;
        let area = edge(a, b, c);
        if area == 0.0 {
            return;
        }

        let min = a.min(b).min(c).floor();
        let max = a.max(b).max(c).ceil();
        for py in min.y as i32..max.y as i32 {
            for px in min.x as i32..max.x as i32 {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let w0 = edge(b, c, p) / area;
                let w1 = edge(c, a, p) / area;
                let w2 = edge(a, b, p) / area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.set(px, py, color);
                }
            }
        }
    }

    /// Filled ellipse inscribed in the given rectangle
    pub fn fill_ellipse(&mut self, x: i32, y: i32, w: i32, h: i32, color: Pixel) {
        if w <= 0 || h <= 0 {
            return;
        }
        let rx = w as f32 / 2.0;
        let ry = h as f32 / 2.0;
        for py in y..y + h {
            for px in x..x + w {
                let dx = (px as f32 + 0.5 - x as f32 - rx) / rx;
                let dy = (py as f32 + 0.5 - y as f32 - ry) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.set(px, py, color);
                }
            }
        }
    }

    /// Nearest-neighbour resize
    pub fn scaled(&self, width: u32, height: u32) -> PixelBuffer {
        let mut out = PixelBuffer::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height.max(1) as u64) as i32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width.max(1) as u64) as i32;
                if let Some(p) = self.get(sx, sy) {
                    out.set(x as i32, y as i32, p);
                }
            }
        }
        out
    }

    /// Upside-down copy (rotated by 180 degrees)
    pub fn flipped(&self) -> PixelBuffer {
        let mut pixels = self.pixels.clone();
        pixels.reverse();
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Copy rotated counter-clockwise by `degrees`, grown to fit the
    /// rotated bounds. Uncovered pixels are transparent.
    pub fn rotated(&self, degrees: f32) -> PixelBuffer {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let w = self.width as f32;
        let h = self.height as f32;
        // Small slack so exact quarter turns don't gain a pixel
        let out_w = ((w * cos.abs() + h * sin.abs()) - 1e-3).ceil().max(1.0) as u32;
        let out_h = ((w * sin.abs() + h * cos.abs()) - 1e-3).ceil().max(1.0) as u32;

        let mut out = PixelBuffer::new(out_w, out_h);
        let src_center = Vec2::new(w / 2.0, h / 2.0);
        let dst_center = Vec2::new(out_w as f32 / 2.0, out_h as f32 / 2.0);

        for y in 0..out_h {
            for x in 0..out_w {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - dst_center;
                // Inverse rotation back into source space (y grows downward)
                let s = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + src_center;
                if let Some(p) = self.get(s.x.floor() as i32, s.y.floor() as i32) {
                    out.set(x as i32, y as i32, p);
                }
            }
        }
        out
    }

    /// Composite `src` onto this buffer with its top-left at (x, y)
    pub fn blit(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        for sy in 0..src.height as i32 {
            let dy = y + sy;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width as i32 {
                let dx = x + sx;
                if let (Some(di), Some(si)) = (self.index(dx, dy), src.index(sx, sy)) {
                    self.pixels[di] = src.pixels[si].over(self.pixels[di]);
                }
            }
        }
    }

    /// Pack into 0RGB words for a window framebuffer, reusing `out`
    pub fn to_argb(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(
            self.pixels
                .iter()
                .map(|p| (p.r as u32) << 16 | (p.g as u32) << 8 | p.b as u32),
        );
    }

    /// Encode as a QOI image
    pub fn encode_qoi(&self) -> Result<Vec<u8>, RenderError> {
        Ok(qoi::encode_to_vec(self.as_bytes(), self.width, self.height)?)
    }

    /// Write as a QOI image file
    pub fn save_qoi(&self, path: &Path) -> Result<(), RenderError> {
        let bytes = self.encode_qoi()?;
        std::fs::write(path, bytes)?;
        log::info!(
            "Saved {}x{} frame to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }
}

/// Twice the signed area of triangle (a, b, p)
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
