//! Album art generator
//!
//! Paints an 800x800 canvas in three layers:
//! 1. a vertical gradient through the mood's three-color palette
//! 2. a genre-specific pattern in palette colors with random geometry
//! 3. the genre name, upper-cased, centered near the bottom edge with a
//!    drop shadow
//!
//! Drawing primitives are local and clip to the canvas.

use image::{ImageFormat, Rgb, RgbImage};
use museai_common::{Customization, Error, Genre, Mood, Result};
use rand::Rng;
use std::io::Cursor;

use crate::artifacts::{ArtifactKind, ArtifactStamp, ArtifactStore};
use crate::glyphs;
use crate::pick;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 800;

const CAPTION_SCALE: u32 = 6;
const CAPTION_MARGIN: u32 = 50;
const SHADOW_OFFSET: u32 = 3;
const SHADOW: Rgb<u8> = Rgb([0, 0, 0]);
const CAPTION: Rgb<u8> = Rgb([255, 255, 255]);

const GRID_CELL: u32 = 50;
const WAVE_BAND: u32 = 50;
const WAVE_STEP: u32 = 20;
const WAVE_THICKNESS: i64 = 3;

/// Three-color palette for a mood, top of the gradient first
pub fn palette(mood: Mood) -> [Rgb<u8>; 3] {
    match mood {
        Mood::Happy => [Rgb([255, 223, 0]), Rgb([255, 140, 0]), Rgb([255, 69, 0])],
        Mood::Sad => [Rgb([70, 130, 180]), Rgb([25, 25, 112]), Rgb([72, 61, 139])],
        Mood::Energetic => [Rgb([255, 0, 0]), Rgb([255, 165, 0]), Rgb([255, 255, 0])],
        Mood::Calm => [Rgb([173, 216, 230]), Rgb([176, 224, 230]), Rgb([135, 206, 235])],
        Mood::Romantic => [Rgb([255, 182, 193]), Rgb([255, 105, 180]), Rgb([219, 112, 147])],
        Mood::Dark => [Rgb([0, 0, 0]), Rgb([50, 50, 50]), Rgb([100, 100, 100])],
        Mood::Uplifting => [Rgb([255, 215, 0]), Rgb([255, 255, 255]), Rgb([255, 228, 181])],
    }
}

/// Overlay drawn on top of the gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// 20 circles, radius 20-100
    Circles,
    /// 15 filled triangles with random vertices
    Angular,
    /// Horizontal jagged lines every 50 px
    Waves,
    /// 50 px cells, each filled with probability 1/2
    Grid,
    /// 15 circles, radius 30-80
    Scattered,
}

impl Pattern {
    pub fn for_genre(genre: Genre) -> Self {
        match genre {
            Genre::Pop => Pattern::Circles,
            Genre::Rock => Pattern::Angular,
            Genre::Jazz | Genre::Blues => Pattern::Waves,
            Genre::Electronic => Pattern::Grid,
            Genre::Classical | Genre::HipHop | Genre::Country => Pattern::Scattered,
        }
    }
}

/// Paint album art for the customization
pub fn paint<R: Rng + ?Sized>(customization: &Customization, rng: &mut R) -> RgbImage {
    let colors = palette(customization.mood);
    let mut canvas = RgbImage::new(WIDTH, HEIGHT);

    fill_gradient(&mut canvas, &colors);
    draw_pattern(
        &mut canvas,
        Pattern::for_genre(customization.genre),
        &colors,
        rng,
    );
    draw_caption(&mut canvas, &customization.genre.as_str().to_uppercase());

    canvas
}

/// Encode as PNG
pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| Error::Encode(format!("PNG encoding failed: {}", e)))?;
    Ok(buf)
}

/// Paint, encode and store album art; returns the artifact reference
pub fn generate<R: Rng + ?Sized>(
    customization: &Customization,
    rng: &mut R,
    store: &ArtifactStore,
    stamp: &ArtifactStamp,
) -> Result<String> {
    let bytes = encode_png(&paint(customization, rng))?;
    store.save(ArtifactKind::Image, customization.genre, stamp, &bytes)
}

// ========================================
// Layers
// ========================================

fn fill_gradient(canvas: &mut RgbImage, colors: &[Rgb<u8>]) {
    let height = canvas.height();
    let segments = colors.len().saturating_sub(1).max(1) as f32;
    for y in 0..height {
        let t = y as f32 / (height.max(2) - 1) as f32 * segments;
        let index = (t.floor() as usize).min(colors.len() - 1);
        let next = (index + 1).min(colors.len() - 1);
        let color = lerp(colors[index], colors[next], t - index as f32);
        for x in 0..canvas.width() {
            canvas.put_pixel(x, y, color);
        }
    }
}

fn lerp(a: Rgb<u8>, b: Rgb<u8>, t: f32) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |i: usize| (a.0[i] as f32 + (b.0[i] as f32 - a.0[i] as f32) * t).round() as u8;
    Rgb([mix(0), mix(1), mix(2)])
}

fn draw_pattern<R: Rng + ?Sized>(
    canvas: &mut RgbImage,
    pattern: Pattern,
    colors: &[Rgb<u8>],
    rng: &mut R,
) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    match pattern {
        Pattern::Circles | Pattern::Scattered => {
            let (count, radii) = if pattern == Pattern::Circles {
                (20, 20..=100)
            } else {
                (15, 30..=80)
            };
            for _ in 0..count {
                let cx = rng.gen_range(0..=w);
                let cy = rng.gen_range(0..=h);
                let r = rng.gen_range(radii.clone());
                fill_circle(canvas, cx, cy, r, *pick(rng, colors));
            }
        }
        Pattern::Angular => {
            for _ in 0..15 {
                let mut vertex = || (rng.gen_range(0..=w), rng.gen_range(0..=h));
                let tri = [vertex(), vertex(), vertex()];
                fill_triangle(canvas, tri, *pick(rng, colors));
            }
        }
        Pattern::Waves => {
            for band in (0..h).step_by(WAVE_BAND as usize) {
                let points: Vec<(i64, i64)> = (0..w)
                    .step_by(WAVE_STEP as usize)
                    .map(|x| (x, band + 25 + rng.gen_range(0..=25)))
                    .collect();
                let color = *pick(rng, colors);
                for pair in points.windows(2) {
                    draw_line(canvas, pair[0], pair[1], WAVE_THICKNESS, color);
                }
            }
        }
        Pattern::Grid => {
            for x in (0..w).step_by(GRID_CELL as usize) {
                for y in (0..h).step_by(GRID_CELL as usize) {
                    if rng.gen_bool(0.5) {
                        let color = *pick(rng, colors);
                        fill_rect(canvas, x, y, GRID_CELL as i64, GRID_CELL as i64, color);
                    }
                }
            }
        }
    }
}

fn draw_caption(canvas: &mut RgbImage, text: &str) {
    let text_w = glyphs::text_width(text, CAPTION_SCALE);
    let text_h = glyphs::text_height(CAPTION_SCALE);
    let x = canvas.width().saturating_sub(text_w) / 2;
    let y = canvas.height().saturating_sub(text_h + CAPTION_MARGIN);

    for (offset, color) in [(SHADOW_OFFSET, SHADOW), (0, CAPTION)] {
        for (bx, by) in glyphs::lit_blocks(text, CAPTION_SCALE) {
            fill_rect(
                canvas,
                (x + offset + bx) as i64,
                (y + offset + by) as i64,
                CAPTION_SCALE as i64,
                CAPTION_SCALE as i64,
                color,
            );
        }
    }
}

// ========================================
// Primitives
// ========================================

fn put_clipped(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < canvas.width() as i64 && y < canvas.height() as i64 {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

fn fill_rect(canvas: &mut RgbImage, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(canvas.width() as i64);
    let y1 = (y + h).min(canvas.height() as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}

fn fill_circle(canvas: &mut RgbImage, cx: i64, cy: i64, r: i64, color: Rgb<u8>) {
    let r2 = r * r;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r2 {
                put_clipped(canvas, cx + dx, cy + dy, color);
            }
        }
    }
}

fn fill_triangle(canvas: &mut RgbImage, tri: [(i64, i64); 3], color: Rgb<u8>) {
    let edge = |a: (i64, i64), b: (i64, i64), p: (i64, i64)| {
        (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
    };
    let [a, b, c] = tri;
    if edge(a, b, c) == 0 {
        return;
    }

    let min_x = a.0.min(b.0).min(c.0).max(0);
    let max_x = a.0.max(b.0).max(c.0).min(canvas.width() as i64 - 1);
    let min_y = a.1.min(b.1).min(c.1).max(0);
    let max_y = a.1.max(b.1).max(c.1).min(canvas.height() as i64 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = (x, y);
            let (e0, e1, e2) = (edge(a, b, p), edge(b, c, p), edge(c, a, p));
            let inside = (e0 >= 0 && e1 >= 0 && e2 >= 0) || (e0 <= 0 && e1 <= 0 && e2 <= 0);
            if inside {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Bresenham line stamped with a square brush of side `thickness`
fn draw_line(
    canvas: &mut RgbImage,
    from: (i64, i64),
    to: (i64, i64),
    thickness: i64,
    color: Rgb<u8>,
) {
    let half = thickness / 2;
    let (mut x, mut y) = from;
    let dx = (to.0 - from.0).abs();
    let dy = -(to.1 - from.1).abs();
    let sx = if from.0 < to.0 { 1 } else { -1 };
    let sy = if from.1 < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        fill_rect(canvas, x - half, y - half, thickness, thickness, color);
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
