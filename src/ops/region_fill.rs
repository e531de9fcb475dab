// ============================================================================
// REGION FILL: seed-based 4-connected fills with per-mode paint
// ============================================================================
//
// One traversal serves every mode. The mode picks two things:
//   - the region predicate (which pixels belong to the seed's region)
//   - the paint function (what value each accepted pixel receives)
//
// The traversal is an explicit-stack DFS over a flat visited mask, so no
// recursion depth is tied to region size. Work is capped by a per-mode
// pixel limit; reaching it yields a truncated, partial result.
// ============================================================================

use serde::{Deserialize, Serialize};

use super::procedural::{
    FractalOptions, GradientOptions, PatternOptions, TextureOptions, fractal_value, gradient_bit,
    pattern_bit, texture_bit,
};
use crate::canvas::{
    CANVAS_HEIGHT, CANVAS_WIDTH, FillLimits, PaintMode, PixelGrid, PixelWrite, in_canvas,
};

/// Relaxed-predicate settings for smart fills.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartOptions {
    /// Allowed gap between a pixel's 3×3 density and the seed's.
    pub tolerance: f32,
    /// Refuse to step onto line pixels of the other value.
    pub edge_aware: bool,
}

impl Default for SmartOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.5,
            edge_aware: true,
        }
    }
}

/// Fill mode with its per-mode options.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    Flood,
    Pattern(PatternOptions),
    Gradient(GradientOptions),
    Fractal(FractalOptions),
    Smart(SmartOptions),
    Texture(TextureOptions),
}

impl FillMode {
    /// Mode by name with default options. Unknown names fall back to flood.
    pub fn from_name(name: &str) -> FillMode {
        match name.trim().to_ascii_lowercase().as_str() {
            "flood" => FillMode::Flood,
            "pattern" => FillMode::Pattern(PatternOptions::default()),
            "gradient" => FillMode::Gradient(GradientOptions::default()),
            "fractal" => FillMode::Fractal(FractalOptions::default()),
            "smart" => FillMode::Smart(SmartOptions::default()),
            "texture" => FillMode::Texture(TextureOptions::default()),
            other => {
                log_warn!("Unknown fill mode '{}', using flood", other);
                FillMode::Flood
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FillMode::Flood => "flood",
            FillMode::Pattern(_) => "pattern",
            FillMode::Gradient(_) => "gradient",
            FillMode::Fractal(_) => "fractal",
            FillMode::Smart(_) => "smart",
            FillMode::Texture(_) => "texture",
        }
    }

    /// This mode's entry in the limits table.
    pub fn limit(&self, limits: &FillLimits) -> usize {
        match self {
            FillMode::Flood => limits.flood,
            FillMode::Pattern(_) => limits.pattern,
            FillMode::Gradient(_) => limits.gradient,
            FillMode::Fractal(_) => limits.fractal,
            FillMode::Smart(_) => limits.smart,
            FillMode::Texture(_) => limits.texture,
        }
    }
}

/// Options shared by every fill mode.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FillOptions {
    pub paint: PaintMode,
    /// Overrides the mode's entry in `limits`.
    pub limit: Option<usize>,
    pub limits: FillLimits,
}

impl FillOptions {
    pub fn effective_limit(&self, mode: &FillMode) -> usize {
        self.limit.unwrap_or_else(|| mode.limit(&self.limits))
    }
}

/// Result of one fill.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FillOutcome {
    /// Every accepted pixel, in visit order.
    pub writes: Vec<PixelWrite>,
    /// Writes whose value differs from the grid.
    pub changed_count: usize,
    /// The limit was hit with in-region pixels still unvisited.
    pub truncated: bool,
}

// ============================================================================
// REGION PREDICATES
// ============================================================================

/// Mean value over the in-canvas 3×3 neighbourhood of (x, y).
fn local_density(grid: &PixelGrid, x: i32, y: i32) -> f32 {
    let (mut sum, mut n) = (0u32, 0u32);
    for dy in -1..=1 {
        for dx in -1..=1 {
            if let Some(v) = grid.get(x + dx, y + dy) {
                sum += v as u32;
                n += 1;
            }
        }
    }
    if n == 0 { 0.0 } else { sum as f32 / n as f32 }
}

/// 8-neighbours that do not hold `seed_value`. Off-canvas counts as one.
fn foreign_neighbours(grid: &PixelGrid, x: i32, y: i32, seed_value: u8) -> usize {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if (dx, dy) != (0, 0) && grid.get(x + dx, y + dy) != Some(seed_value) {
                count += 1;
            }
        }
    }
    count
}

enum Region {
    Exact { seed_value: u8 },
    Smart { seed_value: u8, seed_density: f32, opts: SmartOptions },
}

impl Region {
    fn new(grid: &PixelGrid, seed_x: i32, seed_y: i32, seed_value: u8, mode: &FillMode) -> Self {
        match mode {
            FillMode::Smart(opts) => Region::Smart {
                seed_value,
                seed_density: local_density(grid, seed_x, seed_y),
                opts: *opts,
            },
            _ => Region::Exact { seed_value },
        }
    }

    #[inline]
    fn contains(&self, grid: &PixelGrid, x: i32, y: i32, value: u8) -> bool {
        match *self {
            Region::Exact { seed_value } => value == seed_value,
            Region::Smart {
                seed_value,
                seed_density,
                opts,
            } => {
                if (local_density(grid, x, y) - seed_density).abs() > opts.tolerance {
                    return false;
                }
                !(opts.edge_aware
                    && value != seed_value
                    && foreign_neighbours(grid, x, y, seed_value) >= 2)
            }
        }
    }
}

/// Paint value for an accepted pixel.
fn paint_value(mode: &FillMode, paint: PaintMode, x: i32, y: i32, seed_x: i32, seed_y: i32) -> u8 {
    match mode {
        FillMode::Flood | FillMode::Smart(_) => paint.value(),
        FillMode::Pattern(o) => paint.select(pattern_bit(x, y, o)),
        FillMode::Gradient(o) => paint.select(gradient_bit(x, y, seed_x, seed_y, o)),
        FillMode::Fractal(o) => paint.select(fractal_value(x, y, o) >= 0.5),
        FillMode::Texture(o) => paint.select(texture_bit(x, y, o)),
    }
}

// ============================================================================
// TRAVERSAL
// ============================================================================

/// Fill the region containing (seed_x, seed_y).
///
/// The grid is only read; the caller commits `writes` itself. An off-canvas
/// seed yields an empty outcome.
pub fn fill(
    grid: &PixelGrid,
    seed_x: i32,
    seed_y: i32,
    mode: &FillMode,
    options: &FillOptions,
) -> FillOutcome {
    let Some(seed_value) = grid.get(seed_x, seed_y) else {
        return FillOutcome::default();
    };

    let limit = options.effective_limit(mode);
    let region = Region::new(grid, seed_x, seed_y, seed_value, mode);

    let mut visited = vec![false; CANVAS_WIDTH * CANVAS_HEIGHT];
    let mut stack: Vec<(i32, i32)> = Vec::with_capacity(4096);
    stack.push((seed_x, seed_y));

    let mut outcome = FillOutcome::default();

    while let Some((x, y)) = stack.pop() {
        if !in_canvas(x, y) {
            continue;
        }
        let idx = y as usize * CANVAS_WIDTH + x as usize;
        if visited[idx] {
            continue;
        }
        let current = grid.at_index(idx);
        if !region.contains(grid, x, y, current) {
            continue;
        }
        // Another in-region pixel exists but the budget is spent.
        if outcome.writes.len() >= limit {
            outcome.truncated = true;
            break;
        }

        visited[idx] = true;
        let value = paint_value(mode, options.paint, x, y, seed_x, seed_y);
        if value != current {
            outcome.changed_count += 1;
        }
        outcome.writes.push(PixelWrite::new(x, y, value));

        stack.push((x + 1, y));
        stack.push((x - 1, y));
        stack.push((x, y + 1));
        stack.push((x, y - 1));
    }

    if outcome.truncated {
        log_info!(
            "{} fill from ({}, {}) truncated at {} pixels",
            mode.name(),
            seed_x,
            seed_y,
            limit
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::procedural::PatternKind;

    fn with_vertical_wall(x_wall: i32) -> PixelGrid {
        let mut grid = PixelGrid::new();
        for y in 0..CANVAS_HEIGHT as i32 {
            grid.set(x_wall, y, 1);
        }
        grid
    }

    #[test]
    fn test_off_canvas_seed_is_noop() {
        let grid = PixelGrid::new();
        let out = fill(&grid, -1, 5, &FillMode::Flood, &FillOptions::default());
        assert!(out.writes.is_empty());
        assert_eq!(out.changed_count, 0);
        assert!(!out.truncated);
    }

    #[test]
    fn test_flood_blank_canvas_truncates_at_limit() {
        let grid = PixelGrid::new();
        let out = fill(&grid, 0, 0, &FillMode::Flood, &FillOptions::default());
        assert_eq!(out.writes.len(), 50_000);
        assert_eq!(out.changed_count, 50_000);
        assert!(out.truncated);
    }

    #[test]
    fn test_gradient_limit_covers_whole_canvas() {
        let grid = PixelGrid::new();
        let mode = FillMode::Gradient(GradientOptions::default());
        let out = fill(&grid, 10, 10, &mode, &FillOptions::default());
        assert_eq!(out.writes.len(), CANVAS_WIDTH * CANVAS_HEIGHT);
        assert!(!out.truncated);
    }

    #[test]
    fn test_limit_exactly_region_size_is_not_truncated() {
        let grid = with_vertical_wall(10);
        let opts = FillOptions {
            limit: Some(10 * CANVAS_HEIGHT),
            ..Default::default()
        };
        let out = fill(&grid, 0, 0, &FillMode::Flood, &opts);
        assert_eq!(out.writes.len(), 10 * CANVAS_HEIGHT);
        assert!(!out.truncated);

        let tight = FillOptions {
            limit: Some(10 * CANVAS_HEIGHT - 1),
            ..Default::default()
        };
        assert!(fill(&grid, 0, 0, &FillMode::Flood, &tight).truncated);
    }

    #[test]
    fn test_flood_stops_at_wall() {
        let grid = with_vertical_wall(100);
        let out = fill(&grid, 10, 10, &FillMode::Flood, &FillOptions::default());
        assert_eq!(out.writes.len(), 100 * CANVAS_HEIGHT);
        assert!(out.writes.iter().all(|w| w.x < 100));
    }

    #[test]
    fn test_reflood_same_value_changes_nothing() {
        let grid = PixelGrid::new();
        let opts = FillOptions {
            paint: PaintMode::Paper,
            limit: Some(500),
            ..Default::default()
        };
        let out = fill(&grid, 40, 40, &FillMode::Flood, &opts);
        assert_eq!(out.writes.len(), 500);
        assert_eq!(out.changed_count, 0);
    }

    #[test]
    fn test_unknown_mode_name_falls_back_to_flood() {
        assert_eq!(FillMode::from_name("sparkle"), FillMode::Flood);
        assert_eq!(FillMode::from_name("Texture").name(), "texture");
    }

    #[test]
    fn test_pattern_fill_paints_tile() {
        let grid = with_vertical_wall(8);
        let mode = FillMode::Pattern(PatternOptions {
            kind: PatternKind::Checkerboard,
            ..Default::default()
        });
        let out = fill(&grid, 0, 0, &mode, &FillOptions::default());
        let mut painted = grid.clone();
        painted.apply(&out.writes);
        assert_eq!(painted.get(0, 0), Some(1));
        assert_eq!(painted.get(1, 0), Some(0));
        assert_eq!(painted.get(1, 1), Some(1));
    }

    #[test]
    fn test_smart_fill_passes_specks_but_not_lines() {
        let mut grid = with_vertical_wall(100);
        grid.set(50, 50, 1);
        let mode = FillMode::Smart(SmartOptions::default());
        let out = fill(&grid, 10, 10, &mode, &FillOptions::default());
        assert_eq!(out.writes.len(), 100 * CANVAS_HEIGHT);
        assert_eq!(out.changed_count, 100 * CANVAS_HEIGHT - 1);
        assert!(out.writes.iter().all(|w| w.x < 100));

        // Plain flood treats the speck as a hole.
        let plain = fill(&grid, 10, 10, &FillMode::Flood, &FillOptions::default());
        assert_eq!(plain.writes.len(), 100 * CANVAS_HEIGHT - 1);
    }

    #[test]
    fn test_smart_fill_blocked_by_diagonal_line() {
        let mut grid = PixelGrid::new();
        for i in 0..CANVAS_HEIGHT as i32 {
            grid.set(i, i, 1);
        }
        let mode = FillMode::Smart(SmartOptions::default());
        let out = fill(&grid, 100, 10, &mode, &FillOptions::default());
        assert!(out.writes.iter().all(|w| w.x > w.y));
    }

    #[test]
    fn test_fill_mode_deserializes_from_tagged_json() {
        let json = r#"{"mode":"pattern","kind":"grid","scale":2}"#;
        let mode: FillMode = serde_json::from_str(json).unwrap();
        match mode {
            FillMode::Pattern(o) => {
                assert_eq!(o.kind, PatternKind::Grid);
                assert_eq!(o.scale, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
        let flood: FillMode = serde_json::from_str(r#"{"mode":"flood"}"#).unwrap();
        assert_eq!(flood, FillMode::Flood);
    }
}
