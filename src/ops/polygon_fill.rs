//! Interior fill for closed shapes.
//!
//! Each fillable shape kind is routed to one of three strategies:
//! an analytic inequality (rectangles, circles, ellipses), an exact
//! even-odd span fill over the shape's vertex list, or a scanline pass
//! over the rasterized outline. The outline itself is always
//! part of the result.

use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;

use super::bounds::{Bounds, ShapeKind};
use super::raster::{self, Pixel};
use super::shapes::{Geometry, ShapeOptions, build_geometry, stroke_outline};
use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH, PixelWrite};
use crate::error::Result;

/// How a shape's interior is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillStrategy {
    Analytic,
    PointInPolygon,
    Scanline,
    /// Open shapes: filling returns the outline only.
    NotFillable,
}

/// Strategy used for `kind`.
pub fn fill_strategy(kind: ShapeKind) -> FillStrategy {
    match kind {
        ShapeKind::Rectangle | ShapeKind::Square | ShapeKind::Circle | ShapeKind::Ellipse => {
            FillStrategy::Analytic
        }
        ShapeKind::Pentagon
        | ShapeKind::Hexagon
        | ShapeKind::Octagon
        | ShapeKind::Ngon
        | ShapeKind::Star
        | ShapeKind::House
        | ShapeKind::Heart
        | ShapeKind::Flower
        | ShapeKind::Gear
        | ShapeKind::Arrow
        | ShapeKind::ArrowUp
        | ShapeKind::ArrowRight
        | ShapeKind::ArrowDown
        | ShapeKind::ArrowLeft
        | ShapeKind::Plus
        | ShapeKind::X => FillStrategy::PointInPolygon,
        ShapeKind::Line | ShapeKind::Arc | ShapeKind::Spiral => FillStrategy::NotFillable,
        ShapeKind::Sector
        | ShapeKind::Moon
        | ShapeKind::Diamond
        | ShapeKind::Bowtie
        | ShapeKind::Trapezoid
        | ShapeKind::Parallelogram
        | ShapeKind::Triangle
        | ShapeKind::Lightning
        | ShapeKind::Hourglass
        | ShapeKind::Kite => FillStrategy::Scanline,
    }
}

pub fn is_fillable(kind: ShapeKind) -> bool {
    fill_strategy(kind) != FillStrategy::NotFillable
}

/// Inclusive pixel rectangle clipped to the canvas, or `None` when it
/// misses the canvas entirely.
fn clip_box(x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(i32, i32, i32, i32)> {
    let x0 = (x0.floor() as i32).max(0);
    let y0 = (y0.floor() as i32).max(0);
    let x1 = (x1.ceil() as i32).min(CANVAS_WIDTH as i32 - 1);
    let y1 = (y1.ceil() as i32).min(CANVAS_HEIGHT as i32 - 1);
    (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
}

/// Evaluate `inside` for every pixel of a clipped box, one row per task,
/// returning pixels in row-major order.
fn scan_box<F>(bbox: Option<(i32, i32, i32, i32)>, inside: F) -> Vec<Pixel>
where
    F: Fn(i32, i32) -> bool + Sync,
{
    let Some((x0, y0, x1, y1)) = bbox else {
        return Vec::new();
    };
    (y0..=y1)
        .into_par_iter()
        .map(|y| {
            (x0..=x1)
                .filter(|&x| inside(x, y))
                .map(|x| (x, y))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

// ---- Analytic ---------------------------------------------------------------

fn analytic_interior(kind: ShapeKind, bounds: &Bounds) -> Vec<Pixel> {
    match *bounds {
        Bounds::CornerDrag {
            left,
            right,
            top,
            bottom,
        } => {
            let (l, t) = raster::round_point(left, top);
            let (r, b) = raster::round_point(right, bottom);
            let mut out = Vec::new();
            for y in t.max(0)..=b.min(CANVAS_HEIGHT as i32 - 1) {
                for x in l.max(0)..=r.min(CANVAS_WIDTH as i32 - 1) {
                    out.push((x, y));
                }
            }
            out
        }
        Bounds::RadialCenter {
            center_x,
            center_y,
            radius,
            radius_x,
            radius_y,
        } => {
            if kind == ShapeKind::Ellipse {
                ellipse_interior(center_x, center_y, radius_x, radius_y)
            } else {
                let (cx, cy) = raster::round_point(center_x, center_y);
                let r2 = radius * radius;
                let bbox = clip_box(
                    cx as f32 - radius,
                    cy as f32 - radius,
                    cx as f32 + radius,
                    cy as f32 + radius,
                );
                scan_box(bbox, |x, y| {
                    let dx = (x - cx) as f32;
                    let dy = (y - cy) as f32;
                    dx * dx + dy * dy <= r2
                })
            }
        }
        _ => Vec::new(),
    }
}

fn ellipse_interior(center_x: f32, center_y: f32, rx: f32, ry: f32) -> Vec<Pixel> {
    // A flat ellipse has no interior beyond its outline.
    if rx <= 0.0 || ry <= 0.0 {
        return Vec::new();
    }
    let (cx, cy) = raster::round_point(center_x, center_y);
    let bbox = clip_box(cx as f32 - rx, cy as f32 - ry, cx as f32 + rx, cy as f32 + ry);
    let (a2, b2) = (rx * rx, ry * ry);
    scan_box(bbox, |x, y| {
        let dx = (x - cx) as f32;
        let dy = (y - cy) as f32;
        dx * dx / a2 + dy * dy / b2 <= 1.0
    })
}

// ---- Point in polygon -------------------------------------------------------

/// Odd-even ray casting: count edges crossed by a ray toward +x.
pub fn point_in_polygon(x: f32, y: f32, vertices: &[(f32, f32)]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = vertices[i];
        let (xj, yj) = vertices[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Even-odd interior of a closed vertex list, one row per task.
///
/// Each row gathers the x where edges cross the pixel-center line, using
/// the same half-open rule and arithmetic as [`point_in_polygon`], then
/// fills between successive pairs. The result is identical to testing
/// every pixel of the bounding box, at one pass over the edges per row.
fn polygon_interior(vertices: &[Pixel]) -> Vec<Pixel> {
    let poly: Vec<(f32, f32)> = vertices.iter().map(|&(x, y)| (x as f32, y as f32)).collect();
    let n = poly.len();
    if n < 3 {
        return Vec::new();
    }
    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for &(x, y) in &poly {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    let Some((x0, y0, x1, y1)) = clip_box(min_x, min_y, max_x, max_y) else {
        return Vec::new();
    };

    // (previous vertex, vertex) pairs, as walked by `point_in_polygon`.
    // Horizontal edges never cross a row and edges outside the clipped
    // rows never matter.
    let edges: Vec<((f32, f32), (f32, f32))> = (0..n)
        .map(|i| (poly[(i + n - 1) % n], poly[i]))
        .filter(|&((_, yj), (_, yi))| {
            yj != yi && yj.min(yi) <= y1 as f32 && yj.max(yi) > y0 as f32
        })
        .collect();

    (y0..=y1)
        .into_par_iter()
        .map(|y| {
            let yf = y as f32;
            let mut crossings: Vec<f32> = edges
                .iter()
                .filter(|&&((_, yj), (_, yi))| (yi > yf) != (yj > yf))
                .map(|&((xj, yj), (xi, yi))| (xj - xi) * (yf - yi) / (yj - yi) + xi)
                .collect();
            crossings.sort_unstable_by(f32::total_cmp);

            // Inside exactly when an odd number of crossings lie at or
            // left of x, i.e. c[2k] <= x < c[2k + 1].
            let mut row = Vec::new();
            for pair in crossings.chunks_exact(2) {
                let from = (pair[0].ceil() as i32).max(x0);
                let to = (pair[1].ceil() as i32 - 1).min(x1);
                row.extend((from..=to).map(|x| (x, y)));
            }
            row
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

// ---- Scanline -----------------------------------------------------------------

/// Maximal runs of consecutive x in a sorted, de-duplicated row.
fn runs(xs: &[i32]) -> Vec<(i32, i32)> {
    let mut out: Vec<(i32, i32)> = Vec::new();
    for &x in xs {
        match out.last_mut() {
            Some((_, end)) if *end + 1 == x => *end = x,
            _ => out.push((x, x)),
        }
    }
    out
}

fn push_span(out: &mut Vec<Pixel>, y: i32, from: i32, to: i32) {
    let from = from.max(0);
    let to = to.min(CANVAS_WIDTH as i32 - 1);
    out.extend((from..=to).map(|x| (x, y)));
}

/// Scanline fill over raw outline pixels.
///
/// Each row of the outline is split into runs of adjacent pixels. A run
/// toggles inside/outside when an odd number of separate outline strands
/// leave it upward (touch the row above within one pixel of the run), so
/// a horizontal edge or a vertex apex counts as a tangent and a steep or
/// shallow edge counts once. Runs are always filled; gaps between runs
/// are filled while inside.
///
/// This is still an approximation: where two strands leave the same pixel
/// or run within one pixel of each other (acute corners such as the
/// bowtie's, sharp spikes) they merge into a single run and can toggle
/// wrongly, filling or dropping part of that row.
pub fn scanline_interior(outline: &[Pixel]) -> Vec<Pixel> {
    let mut rows: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
    for &(x, y) in outline {
        rows.entry(y).or_default().push(x);
    }
    for xs in rows.values_mut() {
        xs.sort_unstable();
        xs.dedup();
    }

    let mut out = Vec::new();
    for (&y, xs) in rows.range(0..CANVAS_HEIGHT as i32) {
        let above = rows.get(&(y - 1)).map(Vec::as_slice).unwrap_or(&[]);
        let mut inside = false;
        let mut last = 0;
        for (start, end) in runs(xs) {
            push_span(&mut out, y, if inside { last + 1 } else { start }, end);
            let lo = above.partition_point(|&x| x < start - 1);
            let hi = above.partition_point(|&x| x <= end + 1);
            if runs(&above[lo..hi]).len() % 2 == 1 {
                inside = !inside;
            }
            last = end;
        }
    }
    out
}

// ---- Entry point --------------------------------------------------------------

/// Interior pixels and stroked outline writes of one shape, from a single
/// geometry build. `None` when the shape draws nothing; non-fillable kinds
/// have an empty interior.
pub(crate) fn filled_parts(
    kind: ShapeKind,
    bounds: &Bounds,
    options: &ShapeOptions,
) -> Result<Option<(Vec<Pixel>, Vec<PixelWrite>)>> {
    let Some(geometry) = build_geometry(kind, bounds, options)? else {
        return Ok(None);
    };
    let outline = stroke_outline(&geometry, options);

    let interior = match fill_strategy(kind) {
        FillStrategy::NotFillable => Vec::new(),
        FillStrategy::Analytic => analytic_interior(kind, bounds),
        FillStrategy::PointInPolygon => match &geometry {
            Geometry::Polygon(vertices) => polygon_interior(vertices),
            Geometry::Path {
                points,
                closed: true,
            } => polygon_interior(&raster::close(points.clone())),
            Geometry::Path { .. } => Vec::new(),
        },
        FillStrategy::Scanline => scanline_interior(&geometry.outline()),
    };
    Ok(Some((interior, outline)))
}

/// Fill the interior of `kind` inside `bounds`, outline included.
///
/// Interior pixels come first in row-major order, followed by outline
/// pixels not already covered. Non-fillable kinds return their outline.
pub fn generate_filled_shape(
    kind: ShapeKind,
    bounds: &Bounds,
    options: &ShapeOptions,
) -> Result<Vec<PixelWrite>> {
    let Some((interior, outline)) = filled_parts(kind, bounds, options)? else {
        return Ok(Vec::new());
    };

    let value = options.paint.value();
    let mut seen: HashSet<Pixel> = HashSet::with_capacity(interior.len() + outline.len());
    let mut out = Vec::with_capacity(interior.len() + outline.len());
    for p in interior {
        if seen.insert(p) {
            out.push(PixelWrite::new(p.0, p.1, value));
        }
    }
    for w in outline {
        if seen.insert((w.x, w.y)) {
            out.push(w);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::bounds::{Point, standardize};
    use crate::ops::shapes::{generate_shape, outline_pixels};

    fn opts() -> ShapeOptions {
        ShapeOptions::default()
    }

    fn set(writes: &[PixelWrite]) -> HashSet<Pixel> {
        writes.iter().map(|w| (w.x, w.y)).collect()
    }

    #[test]
    fn test_rectangle_fill_is_exact() {
        let b = Bounds::from_corners(10.0, 10.0, 50.0, 40.0);
        let filled = generate_filled_shape(ShapeKind::Rectangle, &b, &opts()).unwrap();
        assert_eq!(filled.len(), 41 * 31);
        let outline = set(&generate_shape(ShapeKind::Rectangle, &b, &opts()).unwrap());
        assert!(outline.is_subset(&set(&filled)));
    }

    #[test]
    fn test_circle_fill_respects_radius() {
        let b = Bounds::circle(128.0, 96.0, 10.0);
        let filled = set(&generate_filled_shape(ShapeKind::Circle, &b, &opts()).unwrap());
        assert!(filled.contains(&(128, 96)));
        assert!(filled.contains(&(138, 96)));
        assert!(!filled.contains(&(136, 104)));
        // πr² ≈ 314; lattice count plus outline stays close.
        assert!(filled.len() > 300 && filled.len() < 400, "{}", filled.len());
    }

    #[test]
    fn test_zero_radius_circle_fill_is_one_point() {
        let filled = generate_filled_shape(
            ShapeKind::Circle,
            &Bounds::circle(5.0, 5.0, 0.0),
            &opts(),
        )
        .unwrap();
        assert_eq!(filled, vec![PixelWrite::new(5, 5, 1)]);
    }

    #[test]
    fn test_flat_ellipse_fill_is_its_outline() {
        let b = Bounds::RadialCenter {
            center_x: 50.0,
            center_y: 50.0,
            radius: 10.0,
            radius_x: 10.0,
            radius_y: 0.0,
        };
        let filled = generate_filled_shape(ShapeKind::Ellipse, &b, &opts()).unwrap();
        assert!(filled.iter().all(|w| w.y == 50));
        assert_eq!(filled.len(), 21);
    }

    #[test]
    fn test_point_in_polygon_concave_star() {
        let b = Bounds::circle(128.0, 96.0, 40.0);
        let filled = set(&generate_filled_shape(ShapeKind::Star, &b, &opts()).unwrap());
        assert!(filled.contains(&(128, 96)));
        // Notch between the top tip and the upper-right tip lies outside.
        assert!(!filled.contains(&(145, 65)));
    }

    #[test]
    fn test_point_in_polygon_square() {
        let sq = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        assert!(point_in_polygon(5.0, 5.0, &sq));
        assert!(!point_in_polygon(15.0, 5.0, &sq));
        assert!(!point_in_polygon(5.0, -1.0, &sq));
        assert!(!point_in_polygon(0.0, 0.0, &sq[..2]));
    }

    #[test]
    fn test_heart_fill_contains_center() {
        let b = standardize(
            ShapeKind::Heart,
            Point::new(128.0, 96.0),
            Point::new(158.0, 96.0),
            &opts(),
        )
        .unwrap()
        .unwrap();
        let filled = set(&generate_filled_shape(ShapeKind::Heart, &b, &opts()).unwrap());
        assert!(filled.contains(&(128, 96)));
        assert!(filled.len() > 1000);
    }

    #[test]
    fn test_scanline_triangle_covers_interior() {
        let b = Bounds::BaseUp {
            base_x: 100.0,
            base_y: 120.0,
            half_width: 20.0,
            height: 40.0,
        };
        let filled = set(&generate_filled_shape(ShapeKind::Triangle, &b, &opts()).unwrap());
        assert!(filled.contains(&(100, 100)));
        assert!(filled.contains(&(100, 119)));
        assert!(!filled.contains(&(85, 90)));
    }

    #[test]
    fn test_scanline_apex_and_base_do_not_toggle() {
        let outline = raster::polyline(&[(10, 0), (20, 10), (0, 10), (10, 0)]);
        let interior = scanline_interior(&outline);
        // Row y spans 10 - y ..= 10 + y.
        assert_eq!(interior.len(), 121);
        let row5: Vec<i32> = interior.iter().filter(|p| p.1 == 5).map(|p| p.0).collect();
        assert_eq!(row5, (5..=15).collect::<Vec<_>>());
    }

    fn assert_rows_solid(kind: ShapeKind, pixels: &HashSet<Pixel>) {
        let mut rows: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
        for &(x, y) in pixels {
            rows.entry(y).or_default().push(x);
        }
        let first = *rows.keys().next().unwrap();
        let last = *rows.keys().next_back().unwrap();
        assert_eq!(rows.len() as i32, last - first + 1, "{kind}: empty rows");
        for (y, xs) in rows {
            let lo = *xs.iter().min().unwrap();
            let hi = *xs.iter().max().unwrap();
            assert_eq!((hi - lo + 1) as usize, xs.len(), "{kind}: gap in row {y}");
        }
    }

    #[test]
    fn test_convex_scanline_shapes_fill_every_row() {
        let corners = Bounds::from_corners(20.0, 20.0, 100.0, 60.0);
        let cases = [
            (ShapeKind::Sector, Bounds::circle(128.0, 60.0, 40.0)),
            (ShapeKind::Diamond, Bounds::circle(128.0, 96.0, 40.0)),
            (ShapeKind::Parallelogram, corners),
            (ShapeKind::Trapezoid, corners),
            (
                ShapeKind::Kite,
                Bounds::CenterSymmetric {
                    center_x: 128.0,
                    center_y: 96.0,
                    size: 40.0,
                },
            ),
            (
                ShapeKind::Triangle,
                Bounds::BaseUp {
                    base_x: 100.0,
                    base_y: 120.0,
                    half_width: 20.0,
                    height: 40.0,
                },
            ),
        ];
        for (kind, b) in cases {
            assert_eq!(fill_strategy(kind), FillStrategy::Scanline);
            let filled = set(&generate_filled_shape(kind, &b, &opts()).unwrap());
            assert_rows_solid(kind, &filled);
        }
    }

    #[test]
    fn test_moon_scanline_agrees_with_even_odd_fill() {
        let outline = outline_pixels(ShapeKind::Moon, &Bounds::circle(128.0, 96.0, 40.0), &opts())
            .unwrap();
        let edge: HashSet<Pixel> = outline.iter().copied().collect();
        let scan: HashSet<Pixel> = scanline_interior(&outline)
            .into_iter()
            .chain(edge.iter().copied())
            .collect();
        let even_odd: HashSet<Pixel> = polygon_interior(&raster::close(outline))
            .into_iter()
            .collect();
        let missing = even_odd.difference(&scan).count();
        let extra = scan.difference(&even_odd).filter(|p| !edge.contains(p)).count();
        assert!(missing <= 8, "{missing} interior pixels dropped");
        assert!(extra <= 8, "{extra} exterior pixels filled");
        assert!(even_odd.len() > 1000);
    }

    #[test]
    fn test_span_fill_matches_point_in_polygon() {
        let cases = [
            (ShapeKind::Star, Bounds::circle(120.0, 90.0, 70.0)),
            (ShapeKind::Flower, Bounds::circle(120.0, 90.0, 70.0)),
            (ShapeKind::Gear, Bounds::circle(20.0, 170.0, 60.0)),
            (
                ShapeKind::Heart,
                Bounds::CenterSymmetric {
                    center_x: 120.0,
                    center_y: 90.0,
                    size: 60.0,
                },
            ),
        ];
        for (kind, b) in cases {
            let vertices = match build_geometry(kind, &b, &opts()).unwrap().unwrap() {
                Geometry::Polygon(v) => v,
                Geometry::Path { points, .. } => raster::close(points),
            };
            let poly: Vec<(f32, f32)> = vertices
                .iter()
                .map(|&(x, y)| (x as f32, y as f32))
                .collect();
            let spans: HashSet<Pixel> = polygon_interior(&vertices).into_iter().collect();
            for y in 0..CANVAS_HEIGHT as i32 {
                for x in 0..CANVAS_WIDTH as i32 {
                    let expected = point_in_polygon(x as f32, y as f32, &poly);
                    assert_eq!(spans.contains(&(x, y)), expected, "{kind} at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_huge_heart_fill_covers_canvas() {
        let b = Bounds::CenterSymmetric {
            center_x: 128.0,
            center_y: 96.0,
            size: 1000.0,
        };
        let filled = generate_filled_shape(ShapeKind::Heart, &b, &opts()).unwrap();
        assert_eq!(filled.len(), CANVAS_WIDTH * CANVAS_HEIGHT);
    }

    #[test]
    fn test_filled_shape_keeps_stroked_outline() {
        let mut wide = opts();
        wide.stroke_width = 3;
        for kind in [ShapeKind::Star, ShapeKind::Moon, ShapeKind::Arc] {
            let b = Bounds::circle(128.0, 96.0, 40.0);
            let outline = generate_shape(kind, &b, &wide).unwrap();
            let filled = generate_filled_shape(kind, &b, &wide).unwrap();
            assert!(set(&outline).is_subset(&set(&filled)), "{kind}");
            assert_eq!(filled.len(), set(&filled).len(), "{kind}: duplicates");
        }
    }

    #[test]
    fn test_open_shapes_fill_to_outline() {
        let b = Bounds::circle(100.0, 100.0, 20.0);
        let outline = generate_shape(ShapeKind::Arc, &b, &opts()).unwrap();
        let filled = generate_filled_shape(ShapeKind::Arc, &b, &opts()).unwrap();
        assert_eq!(outline, filled);
        assert!(!is_fillable(ShapeKind::Line));
        assert!(is_fillable(ShapeKind::Kite));
    }

    #[test]
    fn test_fill_clipped_to_canvas() {
        let b = Bounds::circle(0.0, 0.0, 15.0);
        let filled = generate_filled_shape(ShapeKind::Circle, &b, &opts()).unwrap();
        assert!(filled.iter().all(|w| w.x >= 0 && w.y >= 0));
        assert!(filled.iter().any(|w| (w.x, w.y) == (0, 0)));
    }
}
