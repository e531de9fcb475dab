//! Integer rasterization primitives shared by the outline and fill engines.

use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH, PixelWrite, in_canvas};

/// Integer pixel coordinate.
pub type Pixel = (i32, i32);

/// Round a sample to the nearest pixel.
#[inline]
pub fn round_point(x: f32, y: f32) -> Pixel {
    (x.round() as i32, y.round() as i32)
}

/// Bresenham line from `a` to `b`, both endpoints included.
///
/// The path is always walked from the lexicographically smaller endpoint,
/// so (a → b) and (b → a) cover the same pixels; the result is reversed
/// when needed to keep it ordered from `a`.
pub fn line(a: Pixel, b: Pixel) -> Vec<Pixel> {
    if a == b {
        return vec![a];
    }
    let swapped = b < a;
    let (p0, p1) = if swapped { (b, a) } else { (a, b) };

    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut out = Vec::with_capacity(dx.max(-dy) as usize + 1);
    loop {
        out.push((x0, y0));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }

    if swapped {
        out.reverse();
    }
    out
}

/// Rasterize consecutive vertex pairs. The first segment is kept whole;
/// every later segment drops its first pixel, which is the previous
/// segment's last one.
pub fn polyline(vertices: &[Pixel]) -> Vec<Pixel> {
    match vertices {
        [] => Vec::new(),
        [only] => vec![*only],
        _ => {
            let mut out = Vec::new();
            for (i, pair) in vertices.windows(2).enumerate() {
                let seg = line(pair[0], pair[1]);
                if i == 0 {
                    out.extend(seg);
                } else {
                    out.extend(seg.into_iter().skip(1));
                }
            }
            out
        }
    }
}

/// Append the first vertex when the list is not already closed.
pub fn close(mut vertices: Vec<Pixel>) -> Vec<Pixel> {
    if let (Some(first), Some(last)) = (vertices.first().copied(), vertices.last().copied())
        && first != last
    {
        vertices.push(first);
    }
    vertices
}

/// Drop runs of identical consecutive pixels.
pub fn dedup_consecutive(mut points: Vec<Pixel>) -> Vec<Pixel> {
    points.dedup();
    points
}

/// Round float vertices to pixels.
pub fn round_vertices(vertices: &[(f32, f32)]) -> Vec<Pixel> {
    vertices.iter().map(|&(x, y)| round_point(x, y)).collect()
}

/// Widest stroke `finalize` stamps; wider requests are clamped to it.
pub const MAX_STROKE_WIDTH: u32 = 64;

/// Disk offsets for a stroke of the given width: every (dx, dy) with
/// dx² + dy² ≤ (r + 0.5)², where r = (width − 1) / 2.
fn stroke_kernel(width: u32) -> Vec<Pixel> {
    let radius = (width.max(1) - 1) as f32 * 0.5;
    let limit = (radius + 0.5) * (radius + 0.5);
    let reach = radius.ceil() as i32;
    let mut kernel = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if (dx * dx + dy * dy) as f32 <= limit {
                kernel.push((dx, dy));
            }
        }
    }
    kernel
}

/// Turn an ordered outline into clipped, de-duplicated pixel writes.
///
/// Strokes wider than one pixel stamp a disk on every point; the stamp is
/// applied once over the whole outline. Widths are clamped to
/// `1..=MAX_STROKE_WIDTH`, and stamps that cannot touch the canvas are
/// skipped. Off-canvas pixels are discarded, never clamped. First
/// occurrence wins, so order follows the outline.
pub fn finalize(points: &[Pixel], stroke_width: u32, value: u8) -> Vec<PixelWrite> {
    let kernel = stroke_kernel(stroke_width.clamp(1, MAX_STROKE_WIDTH));
    let reach = kernel.iter().map(|&(dx, _)| dx).max().unwrap_or(0);
    let (w, h) = (CANVAS_WIDTH as i32, CANVAS_HEIGHT as i32);

    let mut seen = vec![false; CANVAS_WIDTH * CANVAS_HEIGHT];
    let mut out = Vec::with_capacity(points.len());
    for &(px, py) in points {
        if px.saturating_add(reach) < 0
            || py.saturating_add(reach) < 0
            || px.saturating_sub(reach) >= w
            || py.saturating_sub(reach) >= h
        {
            continue;
        }
        for &(kx, ky) in &kernel {
            let (x, y) = (px + kx, py + ky);
            if !in_canvas(x, y) {
                continue;
            }
            let idx = y as usize * CANVAS_WIDTH + x as usize;
            if !seen[idx] {
                seen[idx] = true;
                out.push(PixelWrite::new(x, y, value));
            }
        }
    }
    out
}
