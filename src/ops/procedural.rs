// ============================================================================
// PROCEDURAL PAINT FUNCTIONS: pure per-pixel math for the region fill modes
// ============================================================================
//
// Every function here maps a canvas coordinate to a value in [0, 1] or a
// single bit. They hold no state, so fill order never changes the result;
// noise-driven variants are deterministic for a given seed.
//
//   - Patterns: small repeating tiles, or hashed noise
//   - Gradients: linear, radial, angular, diamond (thresholded or dithered)
//   - Fractals: Mandelbrot, Julia, Sierpinski, dragon, plasma, pseudo-Perlin
//   - Textures: brick, wood, fabric, organic (optionally rotated)
// ============================================================================

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// Integer hash for deterministic noise.
#[inline]
pub fn hash_u32(mut x: u32) -> u32 {
    x = x.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

/// Hash a lattice point to [0, 1).
#[inline]
pub fn hash_f32(x: i32, y: i32, seed: u32) -> f32 {
    let h = hash_u32(
        (x as u32)
            .wrapping_mul(374761393)
            .wrapping_add((y as u32).wrapping_mul(668265263))
            .wrapping_add(seed),
    );
    (h & 0x00FF_FFFF) as f32 / 16_777_216.0
}

/// Classic hashed-sine value in [0, 1).
#[inline]
fn sine_hash(x: f32, y: f32) -> f32 {
    let v = (x * 12.9898 + y * 78.233).sin() * 43758.547;
    v - v.floor()
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 4×4 ordered-dither matrix.
const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Ordered-dither threshold for (x, y), in (0, 1).
#[inline]
pub fn bayer_threshold(x: i32, y: i32) -> f32 {
    let b = BAYER_4X4[y.rem_euclid(4) as usize][x.rem_euclid(4) as usize];
    (b as f32 + 0.5) / 16.0
}

fn canvas_center() -> (f32, f32) {
    (CANVAS_WIDTH as f32 * 0.5, CANVAS_HEIGHT as f32 * 0.5)
}

fn canvas_corners() -> [(f32, f32); 4] {
    let (w, h) = ((CANVAS_WIDTH - 1) as f32, (CANVAS_HEIGHT - 1) as f32);
    [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)]
}

// ============================================================================
// PATTERNS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternKind {
    #[default]
    Dots,
    HorizontalLines,
    VerticalLines,
    DiagonalLines,
    Checkerboard,
    Crosshatch,
    Grid,
    /// Hashed noise; `density` is the share of set pixels.
    Noise,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternOptions {
    pub kind: PatternKind,
    /// Each tile cell covers `scale × scale` pixels.
    pub scale: u32,
    pub density: f32,
    pub seed: u32,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            kind: PatternKind::Dots,
            scale: 1,
            density: 0.5,
            seed: 0,
        }
    }
}

const TILE_DOTS: [&[u8]; 4] = [b"1000", b"0000", b"0010", b"0000"];
const TILE_HLINES: [&[u8]; 2] = [b"1", b"0"];
const TILE_VLINES: [&[u8]; 1] = [b"10"];
const TILE_DIAGONAL: [&[u8]; 4] = [b"1000", b"0100", b"0010", b"0001"];
const TILE_CHECKER: [&[u8]; 2] = [b"10", b"01"];
const TILE_CROSSHATCH: [&[u8]; 4] = [b"1001", b"0110", b"0110", b"1001"];
const TILE_GRID: [&[u8]; 4] = [b"1111", b"1000", b"1000", b"1000"];

fn tile(kind: PatternKind) -> &'static [&'static [u8]] {
    match kind {
        PatternKind::Dots => &TILE_DOTS,
        PatternKind::HorizontalLines => &TILE_HLINES,
        PatternKind::VerticalLines => &TILE_VLINES,
        PatternKind::DiagonalLines => &TILE_DIAGONAL,
        PatternKind::Checkerboard => &TILE_CHECKER,
        PatternKind::Crosshatch => &TILE_CROSSHATCH,
        PatternKind::Grid | PatternKind::Noise => &TILE_GRID,
    }
}

/// Pattern bit at (x, y): the tile cell (⌊x/scale⌋ mod w, ⌊y/scale⌋ mod h).
pub fn pattern_bit(x: i32, y: i32, opts: &PatternOptions) -> bool {
    let s = opts.scale.max(1) as i32;
    let (cx, cy) = (x.div_euclid(s), y.div_euclid(s));
    if opts.kind == PatternKind::Noise {
        return hash_f32(cx, cy, opts.seed) < opts.density.clamp(0.0, 1.0);
    }
    let rows = tile(opts.kind);
    let row = rows[cy.rem_euclid(rows.len() as i32) as usize];
    row[cx.rem_euclid(row.len() as i32) as usize] == b'1'
}

// ============================================================================
// GRADIENTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Angular,
    Diamond,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientOptions {
    pub kind: GradientKind,
    /// Direction of linear gradients / zero line of angular ones, degrees.
    pub angle: f32,
    /// Ordered dithering instead of a hard 0.5 threshold.
    pub dither: bool,
}

impl Default for GradientOptions {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            angle: 0.0,
            dither: false,
        }
    }
}

/// Gradient position of (x, y) relative to the fill seed, in [0, 1].
pub fn gradient_value(x: i32, y: i32, seed_x: i32, seed_y: i32, opts: &GradientOptions) -> f32 {
    let (fx, fy) = (x as f32, y as f32);
    let (sx, sy) = (seed_x as f32, seed_y as f32);
    let t = match opts.kind {
        GradientKind::Linear => {
            let (dy, dx) = opts.angle.to_radians().sin_cos();
            let proj = |px: f32, py: f32| px * dx + py * dy;
            let (mut lo, mut hi) = (f32::MAX, f32::MIN);
            for (cx, cy) in canvas_corners() {
                let p = proj(cx, cy);
                lo = lo.min(p);
                hi = hi.max(p);
            }
            if hi > lo { (proj(fx, fy) - lo) / (hi - lo) } else { 0.0 }
        }
        GradientKind::Radial => {
            let max = canvas_corners()
                .iter()
                .map(|&(cx, cy)| ((cx - sx).powi(2) + (cy - sy).powi(2)).sqrt())
                .fold(0.0f32, f32::max);
            let d = ((fx - sx).powi(2) + (fy - sy).powi(2)).sqrt();
            if max > 0.0 { d / max } else { 0.0 }
        }
        GradientKind::Angular => {
            let a = (fy - sy).atan2(fx - sx) - opts.angle.to_radians();
            (a / TAU).rem_euclid(1.0)
        }
        GradientKind::Diamond => {
            let max = canvas_corners()
                .iter()
                .map(|&(cx, cy)| (cx - sx).abs() + (cy - sy).abs())
                .fold(0.0f32, f32::max);
            let d = (fx - sx).abs() + (fy - sy).abs();
            if max > 0.0 { d / max } else { 0.0 }
        }
    };
    t.clamp(0.0, 1.0)
}

/// Two-colour gradient bit at (x, y).
pub fn gradient_bit(x: i32, y: i32, seed_x: i32, seed_y: i32, opts: &GradientOptions) -> bool {
    let t = gradient_value(x, y, seed_x, seed_y, opts);
    if opts.dither {
        t > bayer_threshold(x, y)
    } else {
        t >= 0.5
    }
}

// ============================================================================
// FRACTALS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalKind {
    #[default]
    Mandelbrot,
    Julia,
    Sierpinski,
    Dragon,
    Plasma,
    Perlin,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalOptions {
    pub kind: FractalKind,
    pub max_iterations: u32,
    /// Magnification of the complex-plane view.
    pub zoom: f32,
    /// Plane point under the canvas center; `None` picks a per-kind default.
    pub center: Option<(f32, f32)>,
    /// Julia constant.
    pub julia_c: (f32, f32),
    /// Feature size in pixels for the lattice and wave kinds.
    pub scale: f32,
    pub seed: u32,
}

impl Default for FractalOptions {
    fn default() -> Self {
        Self {
            kind: FractalKind::Mandelbrot,
            max_iterations: 32,
            zoom: 1.0,
            center: None,
            julia_c: (-0.7, 0.27015),
            scale: 8.0,
            seed: 0,
        }
    }
}

/// Pixels per plane unit at zoom 1: the canvas height spans 2.5 units.
const PLANE_SPAN: f32 = 2.5;
/// Escape-time iterations are clamped to 1..=this.
pub const MAX_FRACTAL_ITERATIONS: u32 = 1024;

/// Canvas → complex plane.
pub fn to_plane(x: i32, y: i32, opts: &FractalOptions) -> (f32, f32) {
    let (ccx, ccy) = opts.center.unwrap_or(match opts.kind {
        FractalKind::Mandelbrot => (-0.5, 0.0),
        _ => (0.0, 0.0),
    });
    let ppu = CANVAS_HEIGHT as f32 / PLANE_SPAN * opts.zoom.max(1e-6);
    let (hw, hh) = canvas_center();
    (ccx + (x as f32 - hw) / ppu, ccy + (y as f32 - hh) / ppu)
}

/// Iterations before |z| exceeds 2, capped at `max_iter`.
pub fn escape_time(mut zr: f32, mut zi: f32, cr: f32, ci: f32, max_iter: u32) -> u32 {
    for i in 0..max_iter {
        let (zr2, zi2) = (zr * zr, zi * zi);
        if zr2 + zi2 > 4.0 {
            return i;
        }
        zi = 2.0 * zr * zi + ci;
        zr = zr2 - zi2 + cr;
    }
    max_iter
}

/// Paper-folding sequence bit (the turn direction of the dragon curve).
#[inline]
fn paperfold(n: u32) -> bool {
    n != 0 && ((n & n.wrapping_neg()) << 1) & n != 0
}

fn value_noise(x: f32, y: f32) -> f32 {
    let (x0, y0) = (x.floor(), y.floor());
    let (tx, ty) = (smoothstep(x - x0), smoothstep(y - y0));
    let a = sine_hash(x0, y0);
    let b = sine_hash(x0 + 1.0, y0);
    let c = sine_hash(x0, y0 + 1.0);
    let d = sine_hash(x0 + 1.0, y0 + 1.0);
    let top = a + (b - a) * tx;
    let bottom = c + (d - c) * tx;
    top + (bottom - top) * ty
}

/// Fractal intensity at (x, y), in [0, 1].
pub fn fractal_value(x: i32, y: i32, opts: &FractalOptions) -> f32 {
    let max_iter = opts.max_iterations.clamp(1, MAX_FRACTAL_ITERATIONS);
    let scale = opts.scale.max(1.0);
    let v = match opts.kind {
        FractalKind::Mandelbrot => {
            let (cr, ci) = to_plane(x, y, opts);
            escape_time(0.0, 0.0, cr, ci, max_iter) as f32 / max_iter as f32
        }
        FractalKind::Julia => {
            let (zr, zi) = to_plane(x, y, opts);
            let (cr, ci) = opts.julia_c;
            escape_time(zr, zi, cr, ci, max_iter) as f32 / max_iter as f32
        }
        FractalKind::Sierpinski => {
            let s = scale as i32;
            let (ux, uy) = (x.div_euclid(s) as u32, y.div_euclid(s) as u32);
            if ux & uy == 0 { 1.0 } else { 0.0 }
        }
        FractalKind::Dragon => {
            let s = scale as i32;
            let (ux, uy) = (x.div_euclid(s) as u32, y.div_euclid(s) as u32);
            if paperfold(ux.wrapping_add(1)) ^ paperfold(uy.wrapping_add(1)) { 1.0 } else { 0.0 }
        }
        FractalKind::Plasma => {
            let f = 1.0 / scale;
            let phase = (opts.seed % 628) as f32 * 0.01;
            let (fx, fy) = (x as f32, y as f32);
            let s = (fx * f + phase).sin()
                + (fy * f).sin()
                + ((fx + fy) * f * 0.5).sin()
                + ((fx * fx + fy * fy).sqrt() * f + phase).sin();
            (s / 4.0 + 1.0) * 0.5
        }
        FractalKind::Perlin => {
            let offset = (opts.seed % 10_007) as f32 * 17.0;
            let (mut sum, mut amp, mut norm, mut freq) = (0.0, 1.0, 0.0, 1.0 / scale);
            for _ in 0..3 {
                sum += amp * value_noise(x as f32 * freq + offset, y as f32 * freq + offset);
                norm += amp;
                amp *= 0.5;
                freq *= 2.0;
            }
            sum / norm
        }
    };
    v.clamp(0.0, 1.0)
}

// ============================================================================
// TEXTURES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureKind {
    #[default]
    Brick,
    Wood,
    Fabric,
    Organic,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureOptions {
    pub kind: TextureKind,
    pub scale: u32,
    /// Rotation around the canvas center, degrees.
    pub rotation: f32,
    pub seed: u32,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            kind: TextureKind::Brick,
            scale: 1,
            rotation: 0.0,
            seed: 0,
        }
    }
}

/// Rotate (x, y) by −`degrees` around the canvas center so the texture
/// appears rotated by +`degrees`.
fn unrotate(x: i32, y: i32, degrees: f32) -> (f32, f32) {
    let (fx, fy) = (x as f32, y as f32);
    if degrees == 0.0 {
        return (fx, fy);
    }
    let (cx, cy) = canvas_center();
    let (sin_r, cos_r) = (-degrees.to_radians()).sin_cos();
    let (dx, dy) = (fx - cx, fy - cy);
    (cx + dx * cos_r - dy * sin_r, cy + dx * sin_r + dy * cos_r)
}

/// Texture bit at (x, y).
pub fn texture_bit(x: i32, y: i32, opts: &TextureOptions) -> bool {
    let s = opts.scale.max(1) as f32;
    let (tx, ty) = unrotate(x, y, opts.rotation);
    let phase = (opts.seed % 628) as f32 * 0.01;
    match opts.kind {
        TextureKind::Brick => {
            let (bw, bh) = (8.0 * s, 4.0 * s);
            let row = (ty / bh).floor();
            let offset = if (row as i64).rem_euclid(2) == 1 { bw * 0.5 } else { 0.0 };
            ty.rem_euclid(bh) < 1.0 || (tx + offset).rem_euclid(bw) < 1.0
        }
        TextureKind::Wood => {
            let displaced = ty + (tx * 0.15 / s + phase).sin() * 2.5 * s;
            let ring = (displaced / (3.0 * s)).rem_euclid(1.0);
            ring < 0.35
        }
        TextureKind::Fabric => {
            let cell = 4.0 * s;
            let (cx, cy) = ((tx / cell).floor() as i64, (ty / cell).floor() as i64);
            let thread = |v: f32| ((v / s).floor() as i64).rem_euclid(2) == 0;
            if (cx + cy).rem_euclid(2) == 0 { thread(ty) } else { thread(tx) }
        }
        TextureKind::Organic => {
            let f = 0.25 / s;
            let v = (tx * f + phase).sin() * (ty * f * 1.3).cos()
                + 0.5 * ((tx + ty) * f * 0.7 + phase).sin()
                + 0.3 * ((tx * tx + ty * ty).sqrt() * f * 1.7).sin();
            v > 0.0
        }
    }
}
