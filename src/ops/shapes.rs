use std::collections::HashSet;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use serde::{Deserialize, Serialize};

use super::bounds::{Bounds, Point, ShapeKind, standardize};
use super::polygon_fill::{filled_parts, generate_filled_shape};
use super::raster::{self, Pixel};
use crate::canvas::{PaintMode, PixelWrite};
use crate::error::Result;

// ============================================================================
// TUNING CONSTANTS
// ============================================================================

/// Fewest samples taken along any parametric curve.
pub const MIN_CURVE_STEPS: usize = 24;
/// Most samples taken along any parametric curve: enough for a full circle
/// of radius `MAX_COORD` at `STEPS_PER_PIXEL`.
pub const MAX_CURVE_STEPS: usize = 80_000;
/// Samples per pixel of estimated curve length.
const STEPS_PER_PIXEL: f32 = 1.5;
/// Coordinates or sizes beyond this are rejected before rasterizing.
pub const MAX_COORD: f32 = 8192.0;

const ARROW_HEAD_LEN_RATIO: f32 = 0.3;
const ARROW_HEAD_HALF_WIDTH_RATIO: f32 = 0.2;
const ARROW_SHAFT_HALF_WIDTH_RATIO: f32 = 0.06;
const ARROW_HEAD_MIN_LEN: f32 = 4.0;
const ARROW_HEAD_MIN_HALF_WIDTH: f32 = 3.0;
const ARROW_SHAFT_MIN_HALF_WIDTH: f32 = 1.0;

const LIGHTNING_HALF_WIDTH_RATIO: f32 = 0.15;
const LIGHTNING_MIN_HALF_WIDTH: f32 = 3.0;

const GEAR_ROOT_RATIO: f32 = 0.75;
const FLOWER_CORE_RATIO: f32 = 0.35;
const HEART_HEIGHT_RATIO: f32 = 0.9;
const CROSS_ARM_RATIO: f32 = 0.33;
const KITE_HALF_WIDTH_RATIO: f32 = 0.6;
const KITE_CROSSBAR_RATIO: f32 = 0.3;
const TRAPEZOID_INSET_RATIO: f32 = 0.2;
const PARALLELOGRAM_SKEW_RATIO: f32 = 0.25;
const HOUSE_WALL_RATIO: f32 = 0.6;

// ============================================================================
// OPTIONS
// ============================================================================

/// Crescent tuning. The three ratios are empirical; they are exposed so a
/// host can restyle the moon without touching the geometry code.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonOptions {
    /// Offset of the carving circle's center, as a fraction of the radius.
    pub offset_ratio: f32,
    /// How much smaller the carving circle is than the moon.
    pub shrink_ratio: f32,
    /// Horn-tip tolerance: crescents whose tips would be thinner than this
    /// fraction of the radius degrade to a full disc outline.
    pub tip_epsilon: f32,
}

impl Default for MoonOptions {
    fn default() -> Self {
        Self {
            offset_ratio: 0.7,
            shrink_ratio: 0.1,
            tip_epsilon: 0.02,
        }
    }
}

/// Per-call shape options. Fields a shape does not use are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeOptions {
    /// Outline thickness in pixels (≥ 1).
    pub stroke_width: u32,
    pub paint: PaintMode,
    /// Side count for `ngon`.
    pub sides: u32,
    /// Star points.
    pub points: u32,
    /// Star inner radius as a fraction of the outer radius.
    pub inner_radius_ratio: f32,
    /// Flower petals.
    pub petals: u32,
    /// Gear teeth.
    pub teeth: u32,
    /// Spiral turns.
    pub turns: f32,
    /// Arc/sector start angle in degrees, clockwise from +x.
    pub start_angle: f32,
    /// Arc/sector sweep in degrees; negative sweeps run the other way.
    pub sweep_angle: f32,
    pub moon: MoonOptions,
}

impl ShapeOptions {
    /// True when every float option is a real number.
    pub fn is_finite(&self) -> bool {
        [
            self.inner_radius_ratio,
            self.turns,
            self.start_angle,
            self.sweep_angle,
            self.moon.offset_ratio,
            self.moon.shrink_ratio,
            self.moon.tip_epsilon,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            stroke_width: 1,
            paint: PaintMode::Ink,
            sides: 6,
            points: 5,
            inner_radius_ratio: 0.4,
            petals: 6,
            teeth: 8,
            turns: 3.0,
            start_angle: 0.0,
            sweep_angle: 180.0,
            moon: MoonOptions::default(),
        }
    }
}

/// How a shape is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeFillMode {
    #[default]
    Outline,
    Filled,
    /// Interior in the opposite value, outline in the paint value.
    Both,
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Raw geometry of one shape before rasterization.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Geometry {
    /// Closed integer vertex list; edges are rasterized with Bresenham.
    Polygon(Vec<Pixel>),
    /// Already-sampled pixel path (parametric curves, lines).
    Path { points: Vec<Pixel>, closed: bool },
}

impl Geometry {
    pub(crate) fn outline(&self) -> Vec<Pixel> {
        match self {
            Geometry::Polygon(vertices) => raster::polyline(vertices),
            Geometry::Path { points, .. } => points.clone(),
        }
    }
}

fn coords_ok(vals: &[f32]) -> bool {
    vals.iter().all(|v| v.abs() <= MAX_COORD)
}

/// Guard against gestures so large that rasterizing them would stall a
/// live preview.
fn bounds_in_range(bounds: &Bounds) -> bool {
    match *bounds {
        Bounds::RadialCenter {
            center_x,
            center_y,
            radius,
            radius_x,
            radius_y,
        } => coords_ok(&[center_x, center_y, radius, radius_x, radius_y]),
        Bounds::CornerDrag {
            left,
            right,
            top,
            bottom,
        } => coords_ok(&[left, right, top, bottom]),
        Bounds::BaseUp {
            base_x,
            base_y,
            half_width,
            height,
        } => coords_ok(&[base_x, base_y, half_width, height]),
        Bounds::Directional {
            start_x,
            start_y,
            end_x,
            end_y,
            ..
        } => coords_ok(&[start_x, start_y, end_x, end_y]),
        Bounds::FixedDirectional {
            start_x,
            start_y,
            magnitude,
            ..
        } => coords_ok(&[start_x, start_y, magnitude]),
        Bounds::CenterSymmetric {
            center_x,
            center_y,
            size,
        } => coords_ok(&[center_x, center_y, size]),
        Bounds::PolygonRegular {
            center_x,
            center_y,
            circumradius,
            ..
        } => coords_ok(&[center_x, center_y, circumradius]),
    }
}

/// Build geometry for `kind`. `Ok(None)` means "draw nothing": invalid or
/// out-of-range bounds, non-finite options, or bounds of another shape
/// category.
pub(crate) fn build_geometry(
    kind: ShapeKind,
    bounds: &Bounds,
    options: &ShapeOptions,
) -> Result<Option<Geometry>> {
    let category = kind.category()?;
    if bounds.category() != category {
        log_warn!(
            "shape {} expects {:?} bounds, got {:?}",
            kind,
            category,
            bounds.category()
        );
        return Ok(None);
    }
    if !bounds.is_valid() || !bounds_in_range(bounds) {
        return Ok(None);
    }
    if !options.is_finite() {
        log_warn!("shape {} ignored: non-finite options", kind);
        return Ok(None);
    }

    let geometry = match *bounds {
        Bounds::RadialCenter {
            center_x: cx,
            center_y: cy,
            radius: r,
            radius_x,
            radius_y,
        } => radial_geometry(kind, cx, cy, r, radius_x, radius_y, options),
        Bounds::CornerDrag {
            left,
            right,
            top,
            bottom,
        } => Geometry::Polygon(closed(&corner_vertices(kind, left, right, top, bottom))),
        Bounds::BaseUp {
            base_x,
            base_y,
            half_width,
            height,
        } => Geometry::Polygon(closed(&base_up_vertices(
            kind, base_x, base_y, half_width, height,
        ))),
        Bounds::Directional {
            start_x,
            start_y,
            end_x,
            end_y,
            magnitude,
            unit_x,
            unit_y,
            ..
        } => match kind {
            ShapeKind::Line => Geometry::Path {
                points: raster::line(
                    raster::round_point(start_x, start_y),
                    raster::round_point(end_x, end_y),
                ),
                closed: false,
            },
            ShapeKind::Lightning => Geometry::Polygon(closed(&lightning_vertices(
                start_x, start_y, unit_x, unit_y, magnitude,
            ))),
            _ => Geometry::Polygon(closed(&arrow_vertices(
                start_x, start_y, unit_x, unit_y, magnitude,
            ))),
        },
        Bounds::FixedDirectional {
            start_x,
            start_y,
            magnitude,
            direction,
        } => {
            let (ux, uy) = direction.unit();
            Geometry::Polygon(closed(&arrow_vertices(start_x, start_y, ux, uy, magnitude)))
        }
        Bounds::CenterSymmetric {
            center_x,
            center_y,
            size,
        } => center_symmetric_geometry(kind, center_x, center_y, size),
        Bounds::PolygonRegular {
            center_x,
            center_y,
            circumradius,
            sides,
        } => Geometry::Polygon(closed(&regular_polygon(
            center_x,
            center_y,
            circumradius,
            sides,
            -FRAC_PI_2,
        ))),
    };
    Ok(Some(geometry))
}

fn closed(vertices: &[(f32, f32)]) -> Vec<Pixel> {
    raster::close(raster::round_vertices(vertices))
}

// ---- Polygon vertex builders ----------------------------------------------

/// Regular n-gon: vertex_i = center + r·(cos, sin)(start + i·2π/n).
pub fn regular_polygon(cx: f32, cy: f32, r: f32, sides: u32, start: f32) -> Vec<(f32, f32)> {
    let n = sides.max(3);
    let step = TAU / n as f32;
    (0..n)
        .map(|i| {
            let a = start + i as f32 * step;
            (cx + r * a.cos(), cy + r * a.sin())
        })
        .collect()
}

/// Star with `points` tips, alternating outer radius and `r * ratio`.
pub fn star_vertices(cx: f32, cy: f32, r: f32, points: u32, ratio: f32) -> Vec<(f32, f32)> {
    let n = points.clamp(3, 64);
    let inner = r * ratio.clamp(0.0, 1.0);
    let step = PI / n as f32;
    (0..2 * n)
        .map(|i| {
            let a = -FRAC_PI_2 + i as f32 * step;
            let rad = if i % 2 == 0 { r } else { inner };
            (cx + rad * a.cos(), cy + rad * a.sin())
        })
        .collect()
}

fn gear_vertices(cx: f32, cy: f32, r: f32, teeth: u32) -> Vec<(f32, f32)> {
    let n = teeth.clamp(3, 64);
    let root = r * GEAR_ROOT_RATIO;
    let step = TAU / n as f32;
    let mut out = Vec::with_capacity(n as usize * 4);
    for i in 0..n {
        let a = -FRAC_PI_2 + i as f32 * step;
        for (frac, rad) in [(0.0, root), (0.25, r), (0.5, r), (0.75, root)] {
            let t = a + frac * step;
            out.push((cx + rad * t.cos(), cy + rad * t.sin()));
        }
    }
    out
}

fn corner_vertices(kind: ShapeKind, l: f32, r: f32, t: f32, b: f32) -> Vec<(f32, f32)> {
    let w = r - l;
    match kind {
        ShapeKind::Bowtie => vec![(l, t), (r, b), (r, t), (l, b)],
        ShapeKind::Trapezoid => {
            let inset = w * TRAPEZOID_INSET_RATIO;
            vec![(l + inset, t), (r - inset, t), (r, b), (l, b)]
        }
        ShapeKind::Parallelogram => {
            let skew = w * PARALLELOGRAM_SKEW_RATIO;
            vec![(l + skew, t), (r, t), (r - skew, b), (l, b)]
        }
        _ => vec![(l, t), (r, t), (r, b), (l, b)],
    }
}

fn base_up_vertices(kind: ShapeKind, bx: f32, by: f32, hw: f32, h: f32) -> Vec<(f32, f32)> {
    match kind {
        ShapeKind::House => {
            let wall = h * HOUSE_WALL_RATIO;
            vec![
                (bx - hw, by),
                (bx + hw, by),
                (bx + hw, by - wall),
                (bx, by - h),
                (bx - hw, by - wall),
            ]
        }
        _ => vec![(bx - hw, by), (bx + hw, by), (bx, by - h)],
    }
}

/// Head + shaft polygon pointing along (ux, uy). Dimensions scale with the
/// drag length but never drop below fixed pixel floors, so a short flick
/// still reads as an arrow.
pub fn arrow_vertices(sx: f32, sy: f32, ux: f32, uy: f32, magnitude: f32) -> Vec<(f32, f32)> {
    if magnitude <= 0.0 {
        return vec![(sx, sy)];
    }
    let (px, py) = (-uy, ux);
    let head_len = (magnitude * ARROW_HEAD_LEN_RATIO)
        .max(ARROW_HEAD_MIN_LEN)
        .min(magnitude);
    let head_hw = (magnitude * ARROW_HEAD_HALF_WIDTH_RATIO).max(ARROW_HEAD_MIN_HALF_WIDTH);
    let shaft_hw = (magnitude * ARROW_SHAFT_HALF_WIDTH_RATIO).max(ARROW_SHAFT_MIN_HALF_WIDTH);

    let tip = (sx + ux * magnitude, sy + uy * magnitude);
    let neck = magnitude - head_len;
    let along = |d: f32, side: f32| (sx + ux * d + px * side, sy + uy * d + py * side);
    vec![
        along(0.0, shaft_hw),
        along(neck, shaft_hw),
        along(neck, head_hw),
        tip,
        along(neck, -head_hw),
        along(neck, -shaft_hw),
        along(0.0, -shaft_hw),
    ]
}

/// Zig-zag bolt from the start point to the tip at `magnitude`.
fn lightning_vertices(sx: f32, sy: f32, ux: f32, uy: f32, magnitude: f32) -> Vec<(f32, f32)> {
    if magnitude <= 0.0 {
        return vec![(sx, sy)];
    }
    let (px, py) = (-uy, ux);
    let w = (magnitude * LIGHTNING_HALF_WIDTH_RATIO).max(LIGHTNING_MIN_HALF_WIDTH);
    let at = |t: f32, s: f32| {
        let d = t * magnitude;
        let side = s * w;
        (sx + ux * d + px * side, sy + uy * d + py * side)
    };
    vec![
        at(0.0, 0.0),
        at(0.55, 0.6),
        at(0.45, 0.1),
        at(1.0, 0.0),
        at(0.45, -0.6),
        at(0.55, -0.1),
    ]
}

fn cross_vertices(cx: f32, cy: f32, s: f32, rotation: f32) -> Vec<(f32, f32)> {
    let a = s * CROSS_ARM_RATIO;
    let local = [
        (-a, -s),
        (a, -s),
        (a, -a),
        (s, -a),
        (s, a),
        (a, a),
        (a, s),
        (-a, s),
        (-a, a),
        (-s, a),
        (-s, -a),
        (-a, -a),
    ];
    let (sin_r, cos_r) = rotation.sin_cos();
    local
        .iter()
        .map(|&(x, y)| (cx + x * cos_r - y * sin_r, cy + x * sin_r + y * cos_r))
        .collect()
}

fn center_symmetric_geometry(kind: ShapeKind, cx: f32, cy: f32, s: f32) -> Geometry {
    match kind {
        ShapeKind::Heart => {
            let sy = s * HEART_HEIGHT_RATIO;
            Geometry::Path {
                points: sample_closed(|t| {
                    let x = t.sin().powi(3);
                    let y = (13.0 * t.cos()
                        - 5.0 * (2.0 * t).cos()
                        - 2.0 * (3.0 * t).cos()
                        - (4.0 * t).cos())
                        / 16.0;
                    (cx + s * x, cy - sy * y)
                }),
                closed: true,
            }
        }
        ShapeKind::Plus => Geometry::Polygon(closed(&cross_vertices(cx, cy, s, 0.0))),
        ShapeKind::X => Geometry::Polygon(closed(&cross_vertices(cx, cy, s, FRAC_PI_4))),
        ShapeKind::Hourglass => Geometry::Polygon(closed(&[
            (cx - s, cy - s),
            (cx + s, cy - s),
            (cx - s, cy + s),
            (cx + s, cy + s),
        ])),
        _ => {
            let hw = s * KITE_HALF_WIDTH_RATIO;
            let bar = cy - s * KITE_CROSSBAR_RATIO;
            Geometry::Polygon(closed(&[
                (cx, cy - s),
                (cx + hw, bar),
                (cx, cy + s),
                (cx - hw, bar),
            ]))
        }
    }
}

// ---- Parametric curves ------------------------------------------------------

/// Length of a curve measured over a coarse polyline.
fn estimate_length<F: Fn(f32) -> (f32, f32)>(f: &F, t0: f32, t1: f32) -> f32 {
    const COARSE: usize = 64;
    let mut len = 0.0;
    let mut prev = f(t0);
    for i in 1..=COARSE {
        let p = f(t0 + (t1 - t0) * i as f32 / COARSE as f32);
        len += ((p.0 - prev.0).powi(2) + (p.1 - prev.1).powi(2)).sqrt();
        prev = p;
    }
    len
}

/// Sample `f` over [t0, t1] with a step count proportional to its length,
/// rounding to pixels. Samples that land more than one pixel apart are
/// joined with Bresenham segments, so the path is always 8-connected.
fn sample_curve<F: Fn(f32) -> (f32, f32)>(f: F, t0: f32, t1: f32) -> Vec<Pixel> {
    let length = estimate_length(&f, t0, t1);
    let steps = ((length * STEPS_PER_PIXEL).ceil() as usize)
        .clamp(MIN_CURVE_STEPS, MAX_CURVE_STEPS);
    let pts = (0..=steps)
        .map(|i| {
            let (x, y) = f(t0 + (t1 - t0) * i as f32 / steps as f32);
            raster::round_point(x, y)
        })
        .collect();
    raster::polyline(&raster::dedup_consecutive(pts))
}

fn sample_closed<F: Fn(f32) -> (f32, f32)>(f: F) -> Vec<Pixel> {
    sample_curve(f, 0.0, TAU)
}

fn radial_geometry(
    kind: ShapeKind,
    cx: f32,
    cy: f32,
    r: f32,
    rx: f32,
    ry: f32,
    options: &ShapeOptions,
) -> Geometry {
    match kind {
        ShapeKind::Circle => Geometry::Path {
            points: sample_closed(|t| (cx + r * t.cos(), cy + r * t.sin())),
            closed: true,
        },
        ShapeKind::Ellipse => Geometry::Path {
            points: sample_closed(|t| (cx + rx * t.cos(), cy + ry * t.sin())),
            closed: true,
        },
        ShapeKind::Arc => {
            let (a0, a1) = arc_range(options);
            Geometry::Path {
                points: sample_curve(|t| (cx + r * t.cos(), cy + r * t.sin()), a0, a1),
                closed: false,
            }
        }
        ShapeKind::Sector => {
            let (a0, a1) = arc_range(options);
            let center = raster::round_point(cx, cy);
            let mut vertices = vec![center];
            vertices.extend(sample_curve(|t| (cx + r * t.cos(), cy + r * t.sin()), a0, a1));
            vertices.push(center);
            Geometry::Polygon(raster::dedup_consecutive(vertices))
        }
        ShapeKind::Spiral => {
            let turns = options.turns.clamp(0.1, 50.0);
            let t_max = TAU * turns;
            Geometry::Path {
                points: sample_curve(
                    |t| {
                        let rad = r * t / t_max;
                        (cx + rad * t.cos(), cy + rad * t.sin())
                    },
                    0.0,
                    t_max,
                ),
                closed: false,
            }
        }
        ShapeKind::Star => Geometry::Polygon(closed(&star_vertices(
            cx,
            cy,
            r,
            options.points,
            options.inner_radius_ratio,
        ))),
        ShapeKind::Flower => {
            let k = options.petals.clamp(2, 64) as f32;
            Geometry::Path {
                points: sample_closed(|t| {
                    let petal = (k * t * 0.5).cos().abs();
                    let rad = r * (FLOWER_CORE_RATIO + (1.0 - FLOWER_CORE_RATIO) * petal);
                    (cx + rad * t.cos(), cy + rad * t.sin())
                }),
                closed: true,
            }
        }
        ShapeKind::Gear => Geometry::Polygon(closed(&gear_vertices(cx, cy, r, options.teeth))),
        ShapeKind::Moon => Geometry::Path {
            points: moon_points(cx, cy, r, &options.moon),
            closed: true,
        },
        _ => Geometry::Polygon(closed(&[
            (cx, cy - r),
            (cx + r, cy),
            (cx, cy + r),
            (cx - r, cy),
        ])),
    }
}

fn arc_range(options: &ShapeOptions) -> (f32, f32) {
    let a0 = options.start_angle.to_radians();
    let sweep = options.sweep_angle.clamp(-360.0, 360.0).to_radians();
    (a0, a0 + sweep)
}

/// Crescent: the outer circle's far arc joined to the carving circle's arc
/// between their two intersection points.
fn moon_points(cx: f32, cy: f32, r: f32, moon: &MoonOptions) -> Vec<Pixel> {
    let circle = || sample_closed(|t| (cx + r * t.cos(), cy + r * t.sin()));
    let d = r * moon.offset_ratio;
    let rc = r * (1.0 - moon.shrink_ratio);
    if d <= 0.0 || rc <= 0.0 {
        return circle();
    }
    // Intersection of |p| = r and |p - (d, 0)| = rc.
    let ix = (d * d + r * r - rc * rc) / (2.0 * d);
    let iy2 = r * r - ix * ix;
    let min_tip = moon.tip_epsilon * r;
    if iy2 <= min_tip * min_tip {
        return circle();
    }
    let iy = iy2.sqrt();
    let phi = iy.atan2(ix);
    let psi = iy.atan2(ix - d);

    let mut pts = sample_curve(|t| (cx + r * t.cos(), cy + r * t.sin()), phi, TAU - phi);
    let inner = sample_curve(
        |t| (cx + d + rc * t.cos(), cy + rc * t.sin()),
        TAU - psi,
        psi,
    );
    pts.extend(inner);
    if let Some(&first) = pts.first() {
        pts.push(first);
    }
    // The two arcs meet at rounded intersection points; join any gap.
    raster::polyline(&raster::dedup_consecutive(pts))
}

// ============================================================================
// PUBLIC ENTRY POINTS
// ============================================================================

/// Closed, integer-rounded vertex list for polygon-vertex shapes
/// (first == last). `None` for curves, lines and unusable bounds.
pub fn polygon_vertices(
    kind: ShapeKind,
    bounds: &Bounds,
    options: &ShapeOptions,
) -> Result<Option<Vec<Pixel>>> {
    Ok(match build_geometry(kind, bounds, options)? {
        Some(Geometry::Polygon(v)) => Some(v),
        _ => None,
    })
}

/// Ordered, unclipped outline pixels (before stroke expansion).
pub fn outline_pixels(
    kind: ShapeKind,
    bounds: &Bounds,
    options: &ShapeOptions,
) -> Result<Vec<Pixel>> {
    Ok(build_geometry(kind, bounds, options)?
        .map(|g| g.outline())
        .unwrap_or_default())
}

/// Stroke, clip and dedup the outline of already-built geometry.
pub(crate) fn stroke_outline(geometry: &Geometry, options: &ShapeOptions) -> Vec<PixelWrite> {
    raster::finalize(&geometry.outline(), options.stroke_width, options.paint.value())
}

/// Rasterize the outline of `kind` inside `bounds`.
///
/// Output is ordered along the outline, clipped to the canvas and free of
/// duplicates. Unusable bounds produce an empty list.
pub fn generate_shape(
    kind: ShapeKind,
    bounds: &Bounds,
    options: &ShapeOptions,
) -> Result<Vec<PixelWrite>> {
    Ok(build_geometry(kind, bounds, options)?
        .map(|g| stroke_outline(&g, options))
        .unwrap_or_default())
}

/// Paint a shape in the requested fill mode.
pub fn render_shape(
    kind: ShapeKind,
    bounds: &Bounds,
    options: &ShapeOptions,
    fill_mode: ShapeFillMode,
) -> Result<Vec<PixelWrite>> {
    match fill_mode {
        ShapeFillMode::Outline => generate_shape(kind, bounds, options),
        ShapeFillMode::Filled => generate_filled_shape(kind, bounds, options),
        ShapeFillMode::Both => {
            let Some((interior, outline)) = filled_parts(kind, bounds, options)? else {
                return Ok(Vec::new());
            };
            let mut taken: HashSet<Pixel> = outline.iter().map(|w| (w.x, w.y)).collect();
            let interior_value = options.paint.inverse().value();
            let mut out: Vec<PixelWrite> = interior
                .into_iter()
                .filter(|&p| taken.insert(p))
                .map(|(x, y)| PixelWrite::new(x, y, interior_value))
                .collect();
            out.extend(outline);
            Ok(out)
        }
    }
}

/// Standardize a drag gesture and paint it in one call.
pub fn shape_from_gesture(
    kind: ShapeKind,
    anchor: Point,
    drag: Point,
    options: &ShapeOptions,
    fill_mode: ShapeFillMode,
) -> Result<Vec<PixelWrite>> {
    match standardize(kind, anchor, drag, options)? {
        Some(bounds) => render_shape(kind, &bounds, options, fill_mode),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CANVAS_HEIGHT;

    fn opts() -> ShapeOptions {
        ShapeOptions::default()
    }

    fn set(writes: &[PixelWrite]) -> HashSet<(i32, i32)> {
        writes.iter().map(|w| (w.x, w.y)).collect()
    }

    fn dist(p: Pixel, cx: i32, cy: i32) -> f32 {
        (((p.0 - cx).pow(2) + (p.1 - cy).pow(2)) as f32).sqrt()
    }

    #[test]
    fn test_radial_shapes_with_zero_radius_are_single_points() {
        let radial = [
            ShapeKind::Circle,
            ShapeKind::Ellipse,
            ShapeKind::Arc,
            ShapeKind::Sector,
            ShapeKind::Spiral,
            ShapeKind::Star,
            ShapeKind::Flower,
            ShapeKind::Gear,
            ShapeKind::Moon,
            ShapeKind::Diamond,
        ];
        for kind in radial {
            let writes = shape_from_gesture(
                kind,
                Point::new(40.0, 40.0),
                Point::new(40.0, 40.0),
                &opts(),
                ShapeFillMode::Outline,
            )
            .unwrap();
            assert!(writes.len() <= 1, "{kind} produced {} points", writes.len());
        }
    }

    #[test]
    fn test_polygon_vertex_lists_are_closed() {
        let base_up = Bounds::BaseUp {
            base_x: 50.0,
            base_y: 100.0,
            half_width: 20.0,
            height: 40.0,
        };
        let symmetric = Bounds::CenterSymmetric {
            center_x: 80.0,
            center_y: 80.0,
            size: 20.0,
        };
        let cases = [
            (ShapeKind::Star, Bounds::circle(100.0, 90.0, 30.0)),
            (ShapeKind::Gear, Bounds::circle(100.0, 90.0, 30.0)),
            (ShapeKind::Diamond, Bounds::circle(100.0, 90.0, 30.0)),
            (ShapeKind::Sector, Bounds::circle(100.0, 90.0, 30.0)),
            (ShapeKind::Rectangle, Bounds::from_corners(5.0, 5.0, 60.0, 30.0)),
            (ShapeKind::Bowtie, Bounds::from_corners(5.0, 5.0, 60.0, 30.0)),
            (ShapeKind::Trapezoid, Bounds::from_corners(5.0, 5.0, 60.0, 30.0)),
            (ShapeKind::Parallelogram, Bounds::from_corners(5.0, 5.0, 60.0, 30.0)),
            (ShapeKind::House, base_up),
            (ShapeKind::Triangle, base_up),
            (ShapeKind::Plus, symmetric),
            (ShapeKind::X, symmetric),
            (ShapeKind::Kite, symmetric),
            (ShapeKind::Hourglass, symmetric),
            (
                ShapeKind::Octagon,
                Bounds::PolygonRegular {
                    center_x: 80.0,
                    center_y: 80.0,
                    circumradius: 25.0,
                    sides: 8,
                },
            ),
        ];
        for (kind, bounds) in cases {
            let v = polygon_vertices(kind, &bounds, &opts()).unwrap().unwrap();
            assert!(v.len() >= 4, "{kind} has too few vertices");
            assert_eq!(v.first(), v.last(), "{kind} is not closed");
        }
    }

    #[test]
    fn test_star_alternates_outer_and_inner_radius() {
        let v = polygon_vertices(ShapeKind::Star, &Bounds::circle(128.0, 96.0, 40.0), &opts())
            .unwrap()
            .unwrap();
        assert_eq!(v.len(), 11);
        for (i, p) in v[..10].iter().enumerate() {
            let expected = if i % 2 == 0 { 40.0 } else { 16.0 };
            assert!((dist(*p, 128, 96) - expected).abs() <= 1.0, "vertex {i} at {p:?}");
        }
    }

    #[test]
    fn test_circle_outline_stays_on_radius() {
        let writes = generate_shape(
            ShapeKind::Circle,
            &Bounds::circle(128.0, 96.0, 30.0),
            &opts(),
        )
        .unwrap();
        assert!(writes.len() > 100);
        for w in &writes {
            assert!((dist((w.x, w.y), 128, 96) - 30.0).abs() <= 1.0);
            assert_eq!(w.value, 1);
        }
    }

    #[test]
    fn test_outline_is_clipped_not_clamped() {
        let writes = generate_shape(
            ShapeKind::Circle,
            &Bounds::circle(0.0, 0.0, 20.0),
            &opts(),
        )
        .unwrap();
        assert!(!writes.is_empty());
        for w in &writes {
            assert!(w.x >= 0 && w.y >= 0);
            // Clamping would pile points onto the axes.
            assert!((dist((w.x, w.y), 0, 0) - 20.0).abs() <= 1.0);
        }
    }

    #[test]
    fn test_wide_stroke_covers_thin_stroke() {
        let bounds = Bounds::from_corners(20.0, 20.0, 60.0, 50.0);
        let thin = set(&generate_shape(ShapeKind::Rectangle, &bounds, &opts()).unwrap());
        let mut wide_opts = opts();
        wide_opts.stroke_width = 3;
        let wide = generate_shape(ShapeKind::Rectangle, &bounds, &wide_opts).unwrap();
        let wide_set = set(&wide);
        assert_eq!(wide.len(), wide_set.len(), "duplicates in wide stroke");
        assert!(thin.is_subset(&wide_set));
        assert!(wide_set.contains(&(19, 19)));
        assert!(wide_set.contains(&(21, 21)));
    }

    #[test]
    fn test_paper_mode_writes_zero() {
        let mut o = opts();
        o.paint = PaintMode::Paper;
        let writes = generate_shape(
            ShapeKind::Line,
            &line_bounds(0.0, 0.0, 10.0, 0.0),
            &o,
        )
        .unwrap();
        assert_eq!(writes.len(), 11);
        assert!(writes.iter().all(|w| w.value == 0));
    }

    fn line_bounds(x0: f32, y0: f32, x1: f32, y1: f32) -> Bounds {
        standardize(ShapeKind::Line, Point::new(x0, y0), Point::new(x1, y1), &opts())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_short_arrow_keeps_visible_head() {
        let bounds = standardize(
            ShapeKind::Arrow,
            Point::new(50.0, 50.0),
            Point::new(53.0, 50.0),
            &opts(),
        )
        .unwrap()
        .unwrap();
        let writes = generate_shape(ShapeKind::Arrow, &bounds, &opts()).unwrap();
        let ys: HashSet<i32> = writes.iter().map(|w| w.y).collect();
        // Head half-width floor of 3px spans at least 7 rows.
        assert!(ys.len() >= 7);
    }

    #[test]
    fn test_fixed_arrows_point_their_own_way() {
        let up = standardize(
            ShapeKind::ArrowUp,
            Point::new(100.0, 100.0),
            Point::new(130.0, 100.0),
            &opts(),
        )
        .unwrap()
        .unwrap();
        let writes = generate_shape(ShapeKind::ArrowUp, &up, &opts()).unwrap();
        let min_y = writes.iter().map(|w| w.y).min().unwrap();
        let max_x = writes.iter().map(|w| w.x).max().unwrap();
        assert_eq!(min_y, 70);
        assert!(max_x < 110);
    }

    #[test]
    fn test_mismatched_bounds_draw_nothing() {
        let writes = generate_shape(
            ShapeKind::Circle,
            &Bounds::from_corners(0.0, 0.0, 9.0, 9.0),
            &opts(),
        )
        .unwrap();
        assert!(writes.is_empty());
    }

    #[test]
    fn test_huge_gesture_is_rejected() {
        let writes = generate_shape(
            ShapeKind::Circle,
            &Bounds::circle(10.0, 10.0, 1.0e7),
            &opts(),
        )
        .unwrap();
        assert!(writes.is_empty());
    }

    #[test]
    fn test_moon_is_narrower_than_full_disc() {
        let b = Bounds::circle(128.0, 96.0, 40.0);
        let moon = generate_shape(ShapeKind::Moon, &b, &opts()).unwrap();
        let max_x = moon.iter().map(|w| w.x).max().unwrap();
        assert!(max_x < 168);
        assert!(moon.iter().any(|w| w.x == 88));
    }

    #[test]
    fn test_spiral_starts_at_center_and_reaches_radius() {
        let writes = generate_shape(
            ShapeKind::Spiral,
            &Bounds::circle(128.0, 96.0, 30.0),
            &opts(),
        )
        .unwrap();
        assert_eq!((writes[0].x, writes[0].y), (128, 96));
        let last = writes.last().unwrap();
        assert!((dist((last.x, last.y), 128, 96) - 30.0).abs() <= 1.0);
    }

    #[test]
    fn test_huge_circle_outline_stays_connected() {
        // Only a sliver near x = 60 lands on the canvas.
        let r = 6000.0;
        let b = Bounds::circle(60.0 + r, 96.0, r);
        let pixels = set(&generate_shape(ShapeKind::Circle, &b, &opts()).unwrap());
        let rows: HashSet<i32> = pixels.iter().map(|p| p.1).collect();
        assert_eq!(rows.len(), CANVAS_HEIGHT);
        for &(x, y) in &pixels {
            let touching = (-1..=1)
                .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
                .filter(|&d| d != (0, 0))
                .any(|(dx, dy)| pixels.contains(&(x + dx, y + dy)));
            assert!(touching, "isolated pixel at ({x}, {y})");
        }
    }

    #[test]
    fn test_sampled_curves_are_eight_connected() {
        let b = Bounds::circle(128.0, 96.0, 50.0);
        for kind in [ShapeKind::Arc, ShapeKind::Spiral, ShapeKind::Flower, ShapeKind::Moon] {
            let path = outline_pixels(kind, &b, &opts()).unwrap();
            for pair in path.windows(2) {
                let (dx, dy) = (pair[1].0 - pair[0].0, pair[1].1 - pair[0].1);
                assert!(dx.abs() <= 1 && dy.abs() <= 1, "{kind}: gap {pair:?}");
            }
        }
    }

    #[test]
    fn test_non_finite_options_draw_nothing() {
        let b = Bounds::circle(100.0, 90.0, 30.0);
        let with = |edit: fn(&mut ShapeOptions)| {
            let mut o = opts();
            edit(&mut o);
            o
        };
        let cases = [
            (ShapeKind::Arc, with(|o| o.sweep_angle = f32::NAN)),
            (ShapeKind::Sector, with(|o| o.start_angle = f32::INFINITY)),
            (ShapeKind::Star, with(|o| o.inner_radius_ratio = f32::NAN)),
            (ShapeKind::Spiral, with(|o| o.turns = f32::NEG_INFINITY)),
            (ShapeKind::Moon, with(|o| o.moon.offset_ratio = f32::NAN)),
        ];
        for (kind, o) in cases {
            assert!(!o.is_finite());
            for mode in [ShapeFillMode::Outline, ShapeFillMode::Filled, ShapeFillMode::Both] {
                let writes = render_shape(kind, &b, &o, mode).unwrap();
                assert!(writes.is_empty(), "{kind} ({mode:?}) drew {writes:?}");
            }
            assert!(polygon_vertices(kind, &b, &o).unwrap().is_none());
        }
        assert!(opts().is_finite());
    }

    #[test]
    fn test_both_mode_paints_interior_with_inverse_value() {
        let b = Bounds::from_corners(10.0, 10.0, 50.0, 40.0);
        let writes = render_shape(ShapeKind::Rectangle, &b, &opts(), ShapeFillMode::Both).unwrap();
        assert_eq!(writes.len(), set(&writes).len(), "duplicate coordinates");
        assert_eq!(writes.len(), 41 * 31);

        let value_at = |writes: &[PixelWrite], x: i32, y: i32| {
            writes.iter().find(|w| (w.x, w.y) == (x, y)).map(|w| w.value)
        };
        for (x, y) in [(10, 10), (50, 40), (30, 10), (10, 25), (50, 25), (30, 40)] {
            assert_eq!(value_at(&writes, x, y), Some(1), "outline ({x}, {y})");
        }
        for (x, y) in [(30, 25), (11, 11), (49, 39)] {
            assert_eq!(value_at(&writes, x, y), Some(0), "interior ({x}, {y})");
        }
        let ink = writes.iter().filter(|w| w.value == 1).count();
        assert_eq!(ink, 2 * 41 + 2 * 29);

        let mut paper = opts();
        paper.paint = PaintMode::Paper;
        let flipped = render_shape(ShapeKind::Rectangle, &b, &paper, ShapeFillMode::Both).unwrap();
        assert_eq!(value_at(&flipped, 30, 25), Some(1));
        assert_eq!(value_at(&flipped, 10, 10), Some(0));
    }
}
