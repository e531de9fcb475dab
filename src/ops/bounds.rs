//! Gesture → geometry standardisation.
//!
//! Every shape kind belongs to exactly one of seven categories, and the
//! category decides what the anchor and drag points of a gesture mean.
//! `standardize` turns (kind, anchor, drag, options) into a [`Bounds`]
//! descriptor the rasterizer and fill engine consume.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::shapes::ShapeOptions;
use crate::error::{Result, ZxError};

/// Every drawable shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Circle,
    Ellipse,
    Arc,
    Sector,
    Spiral,
    Star,
    Flower,
    Gear,
    Moon,
    Diamond,
    Rectangle,
    Square,
    Bowtie,
    Trapezoid,
    Parallelogram,
    Triangle,
    House,
    Line,
    Arrow,
    Lightning,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    ArrowLeft,
    Heart,
    X,
    Plus,
    Hourglass,
    Kite,
    Pentagon,
    Hexagon,
    Octagon,
    Ngon,
}

impl ShapeKind {
    /// Canonical kebab-case name.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Arc => "arc",
            ShapeKind::Sector => "sector",
            ShapeKind::Spiral => "spiral",
            ShapeKind::Star => "star",
            ShapeKind::Flower => "flower",
            ShapeKind::Gear => "gear",
            ShapeKind::Moon => "moon",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Square => "square",
            ShapeKind::Bowtie => "bowtie",
            ShapeKind::Trapezoid => "trapezoid",
            ShapeKind::Parallelogram => "parallelogram",
            ShapeKind::Triangle => "triangle",
            ShapeKind::House => "house",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Lightning => "lightning",
            ShapeKind::ArrowUp => "arrow-up",
            ShapeKind::ArrowRight => "arrow-right",
            ShapeKind::ArrowDown => "arrow-down",
            ShapeKind::ArrowLeft => "arrow-left",
            ShapeKind::Heart => "heart",
            ShapeKind::X => "x",
            ShapeKind::Plus => "plus",
            ShapeKind::Hourglass => "hourglass",
            ShapeKind::Kite => "kite",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Octagon => "octagon",
            ShapeKind::Ngon => "ngon",
        }
    }

    /// Parse a shape name. Case-insensitive; `_` and `-` are interchangeable.
    pub fn from_name(name: &str) -> Result<ShapeKind> {
        let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::all()
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ZxError::UnknownShapeKind(name.to_string()))
    }

    /// All shape kinds, in category order.
    pub fn all() -> &'static [ShapeKind] {
        &[
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
            ShapeKind::Rectangle,
            ShapeKind::Square,
            ShapeKind::Bowtie,
            ShapeKind::Trapezoid,
            ShapeKind::Parallelogram,
            ShapeKind::Triangle,
            ShapeKind::House,
            ShapeKind::Line,
            ShapeKind::Arrow,
            ShapeKind::Lightning,
            ShapeKind::ArrowUp,
            ShapeKind::ArrowRight,
            ShapeKind::ArrowDown,
            ShapeKind::ArrowLeft,
            ShapeKind::Heart,
            ShapeKind::X,
            ShapeKind::Plus,
            ShapeKind::Hourglass,
            ShapeKind::Kite,
            ShapeKind::Pentagon,
            ShapeKind::Hexagon,
            ShapeKind::Octagon,
            ShapeKind::Ngon,
        ]
    }

    /// Category from the static table.
    pub fn category(self) -> Result<ShapeCategory> {
        category_map()
            .get(&self)
            .copied()
            .ok_or(ZxError::UnknownShapeCategory(self))
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a shape interprets its anchor and drag points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeCategory {
    /// Anchor is the exact center; radius is the drag distance.
    RadialCenter,
    /// Anchor and drag are opposite bounding-box corners.
    CornerDrag,
    /// Anchor is the bottom-center of the base; shape grows upward.
    BaseUp,
    /// Anchor is the start, drag the end; direction is preserved.
    Directional,
    /// Anchor is the start; only the drag distance is used.
    FixedDirectional,
    /// Anchor is the center; size is the drag distance.
    CenterSymmetric,
    /// Anchor is the center; circumradius is the drag distance.
    PolygonRegular,
}

const CATEGORY_TABLE: &[(ShapeKind, ShapeCategory)] = &[
    (ShapeKind::Circle, ShapeCategory::RadialCenter),
    (ShapeKind::Ellipse, ShapeCategory::RadialCenter),
    (ShapeKind::Arc, ShapeCategory::RadialCenter),
    (ShapeKind::Sector, ShapeCategory::RadialCenter),
    (ShapeKind::Spiral, ShapeCategory::RadialCenter),
    (ShapeKind::Star, ShapeCategory::RadialCenter),
    (ShapeKind::Flower, ShapeCategory::RadialCenter),
    (ShapeKind::Gear, ShapeCategory::RadialCenter),
    (ShapeKind::Moon, ShapeCategory::RadialCenter),
    (ShapeKind::Diamond, ShapeCategory::RadialCenter),
    (ShapeKind::Rectangle, ShapeCategory::CornerDrag),
    (ShapeKind::Square, ShapeCategory::CornerDrag),
    (ShapeKind::Bowtie, ShapeCategory::CornerDrag),
    (ShapeKind::Trapezoid, ShapeCategory::CornerDrag),
    (ShapeKind::Parallelogram, ShapeCategory::CornerDrag),
    (ShapeKind::Triangle, ShapeCategory::BaseUp),
    (ShapeKind::House, ShapeCategory::BaseUp),
    (ShapeKind::Line, ShapeCategory::Directional),
    (ShapeKind::Arrow, ShapeCategory::Directional),
    (ShapeKind::Lightning, ShapeCategory::Directional),
    (ShapeKind::ArrowUp, ShapeCategory::FixedDirectional),
    (ShapeKind::ArrowRight, ShapeCategory::FixedDirectional),
    (ShapeKind::ArrowDown, ShapeCategory::FixedDirectional),
    (ShapeKind::ArrowLeft, ShapeCategory::FixedDirectional),
    (ShapeKind::Heart, ShapeCategory::CenterSymmetric),
    (ShapeKind::X, ShapeCategory::CenterSymmetric),
    (ShapeKind::Plus, ShapeCategory::CenterSymmetric),
    (ShapeKind::Hourglass, ShapeCategory::CenterSymmetric),
    (ShapeKind::Kite, ShapeCategory::CenterSymmetric),
    (ShapeKind::Pentagon, ShapeCategory::PolygonRegular),
    (ShapeKind::Hexagon, ShapeCategory::PolygonRegular),
    (ShapeKind::Octagon, ShapeCategory::PolygonRegular),
    (ShapeKind::Ngon, ShapeCategory::PolygonRegular),
];

fn category_map() -> &'static HashMap<ShapeKind, ShapeCategory> {
    static MAP: OnceLock<HashMap<ShapeKind, ShapeCategory>> = OnceLock::new();
    MAP.get_or_init(|| CATEGORY_TABLE.iter().copied().collect())
}

// ============================================================================
// ANCHOR BEHAVIOUR
// ============================================================================

/// What the first point of a gesture stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorRole {
    Center,
    Corner,
    BaseCenter,
    Start,
}

/// Anchor semantics of one shape kind, for tool hints and cursor feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorBehavior {
    pub role: AnchorRole,
    /// The drag direction (not just its distance) shapes the result.
    pub uses_drag_direction: bool,
    /// Width and height scale together.
    pub uniform_scale: bool,
}

fn anchor_map() -> &'static HashMap<ShapeKind, AnchorBehavior> {
    static MAP: OnceLock<HashMap<ShapeKind, AnchorBehavior>> = OnceLock::new();
    MAP.get_or_init(|| {
        CATEGORY_TABLE
            .iter()
            .map(|&(kind, cat)| {
                let (role, uses_drag_direction, uniform_scale) = match cat {
                    ShapeCategory::RadialCenter => {
                        (AnchorRole::Center, kind == ShapeKind::Ellipse, kind != ShapeKind::Ellipse)
                    }
                    ShapeCategory::CornerDrag => {
                        (AnchorRole::Corner, true, kind == ShapeKind::Square)
                    }
                    ShapeCategory::BaseUp => (AnchorRole::BaseCenter, true, false),
                    ShapeCategory::Directional => (AnchorRole::Start, true, true),
                    ShapeCategory::FixedDirectional => (AnchorRole::Start, false, true),
                    ShapeCategory::CenterSymmetric => (
                        AnchorRole::Center,
                        false,
                        !matches!(kind, ShapeKind::Heart | ShapeKind::Kite),
                    ),
                    ShapeCategory::PolygonRegular => (AnchorRole::Center, false, true),
                };
                (
                    kind,
                    AnchorBehavior {
                        role,
                        uses_drag_direction,
                        uniform_scale,
                    },
                )
            })
            .collect()
    })
}

/// Anchor semantics for `kind`.
pub fn anchor_behavior(kind: ShapeKind) -> Result<AnchorBehavior> {
    anchor_map()
        .get(&kind)
        .copied()
        .ok_or(ZxError::UnknownShapeCategory(kind))
}

// ============================================================================
// BOUNDS
// ============================================================================

/// A gesture coordinate. May be fractional, negative or off-canvas.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x as f32, y as f32)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Fixed pointing direction of the four arrow-* shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowDirection {
    Up,
    Right,
    Down,
    Left,
}

impl ArrowDirection {
    /// Unit vector in screen space (y grows downward).
    pub fn unit(self) -> (f32, f32) {
        match self {
            ArrowDirection::Up => (0.0, -1.0),
            ArrowDirection::Right => (1.0, 0.0),
            ArrowDirection::Down => (0.0, 1.0),
            ArrowDirection::Left => (-1.0, 0.0),
        }
    }

    fn for_kind(kind: ShapeKind) -> ArrowDirection {
        match kind {
            ShapeKind::ArrowUp => ArrowDirection::Up,
            ShapeKind::ArrowDown => ArrowDirection::Down,
            ShapeKind::ArrowLeft => ArrowDirection::Left,
            _ => ArrowDirection::Right,
        }
    }
}

/// Category-specific geometry for one shape, valid for one call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bounds {
    RadialCenter {
        center_x: f32,
        center_y: f32,
        radius: f32,
        radius_x: f32,
        radius_y: f32,
    },
    CornerDrag {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
    },
    BaseUp {
        base_x: f32,
        base_y: f32,
        /// Distance from the base center to each base corner.
        half_width: f32,
        height: f32,
    },
    Directional {
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
        magnitude: f32,
        unit_x: f32,
        unit_y: f32,
        /// atan2(Δy, Δx) in radians.
        angle: f32,
    },
    FixedDirectional {
        start_x: f32,
        start_y: f32,
        magnitude: f32,
        direction: ArrowDirection,
    },
    CenterSymmetric {
        center_x: f32,
        center_y: f32,
        size: f32,
    },
    PolygonRegular {
        center_x: f32,
        center_y: f32,
        circumradius: f32,
        sides: u32,
    },
}

impl Bounds {
    /// Corner-drag bounds from two opposite corners, in any order.
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Bounds {
        Bounds::CornerDrag {
            left: x1.min(x2),
            right: x1.max(x2),
            top: y1.min(y2),
            bottom: y1.max(y2),
        }
    }

    /// Radial bounds with equal radii.
    pub fn circle(center_x: f32, center_y: f32, radius: f32) -> Bounds {
        Bounds::RadialCenter {
            center_x,
            center_y,
            radius,
            radius_x: radius,
            radius_y: radius,
        }
    }

    pub fn category(&self) -> ShapeCategory {
        match self {
            Bounds::RadialCenter { .. } => ShapeCategory::RadialCenter,
            Bounds::CornerDrag { .. } => ShapeCategory::CornerDrag,
            Bounds::BaseUp { .. } => ShapeCategory::BaseUp,
            Bounds::Directional { .. } => ShapeCategory::Directional,
            Bounds::FixedDirectional { .. } => ShapeCategory::FixedDirectional,
            Bounds::CenterSymmetric { .. } => ShapeCategory::CenterSymmetric,
            Bounds::PolygonRegular { .. } => ShapeCategory::PolygonRegular,
        }
    }

    /// Finite fields and non-negative sizes. Zero sizes are valid.
    pub fn is_valid(&self) -> bool {
        let finite = |vals: &[f32]| vals.iter().all(|v| v.is_finite());
        let non_neg = |vals: &[f32]| vals.iter().all(|v| *v >= 0.0);
        match *self {
            Bounds::RadialCenter {
                center_x,
                center_y,
                radius,
                radius_x,
                radius_y,
            } => {
                finite(&[center_x, center_y, radius, radius_x, radius_y])
                    && non_neg(&[radius, radius_x, radius_y])
            }
            Bounds::CornerDrag {
                left,
                right,
                top,
                bottom,
            } => finite(&[left, right, top, bottom]) && left <= right && top <= bottom,
            Bounds::BaseUp {
                base_x,
                base_y,
                half_width,
                height,
            } => finite(&[base_x, base_y, half_width, height]) && non_neg(&[half_width, height]),
            Bounds::Directional {
                start_x,
                start_y,
                end_x,
                end_y,
                magnitude,
                unit_x,
                unit_y,
                angle,
            } => {
                finite(&[start_x, start_y, end_x, end_y, magnitude, unit_x, unit_y, angle])
                    && magnitude >= 0.0
            }
            Bounds::FixedDirectional {
                start_x,
                start_y,
                magnitude,
                ..
            } => finite(&[start_x, start_y, magnitude]) && magnitude >= 0.0,
            Bounds::CenterSymmetric {
                center_x,
                center_y,
                size,
            } => finite(&[center_x, center_y, size]) && size >= 0.0,
            Bounds::PolygonRegular {
                center_x,
                center_y,
                circumradius,
                sides,
            } => finite(&[center_x, center_y, circumradius]) && circumradius >= 0.0 && sides >= 3,
        }
    }
}

/// Side count for a regular polygon kind.
pub fn regular_sides(kind: ShapeKind, options: &ShapeOptions) -> u32 {
    match kind {
        ShapeKind::Pentagon => 5,
        ShapeKind::Hexagon => 6,
        ShapeKind::Octagon => 8,
        _ => options.sides.clamp(3, 64),
    }
}

/// Convert a gesture into category-specific bounds.
///
/// Returns `Ok(None)` for degenerate input (non-finite coordinates); live
/// drag previews produce these constantly, so they are not errors. Fails
/// only when `kind` has no registered category.
pub fn standardize(
    kind: ShapeKind,
    anchor: Point,
    drag: Point,
    options: &ShapeOptions,
) -> Result<Option<Bounds>> {
    let category = kind.category()?;
    if !anchor.is_finite() || !drag.is_finite() {
        return Ok(None);
    }

    let dx = drag.x - anchor.x;
    let dy = drag.y - anchor.y;
    let magnitude = (dx * dx + dy * dy).sqrt();

    let bounds = match category {
        ShapeCategory::RadialCenter => {
            let (radius_x, radius_y) = if kind == ShapeKind::Ellipse {
                (dx.abs(), dy.abs())
            } else {
                (magnitude, magnitude)
            };
            Bounds::RadialCenter {
                center_x: anchor.x,
                center_y: anchor.y,
                radius: magnitude,
                radius_x,
                radius_y,
            }
        }
        ShapeCategory::CornerDrag => {
            let (ex, ey) = if kind == ShapeKind::Square {
                // Shorter axis wins; keep the drag quadrant.
                let side = dx.abs().min(dy.abs());
                (anchor.x + side.copysign(dx), anchor.y + side.copysign(dy))
            } else {
                (drag.x, drag.y)
            };
            Bounds::from_corners(anchor.x, anchor.y, ex, ey)
        }
        ShapeCategory::BaseUp => Bounds::BaseUp {
            base_x: anchor.x,
            base_y: anchor.y,
            half_width: dx.abs(),
            height: dy.abs(),
        },
        ShapeCategory::Directional => {
            let (unit_x, unit_y) = if magnitude > 0.0 {
                (dx / magnitude, dy / magnitude)
            } else {
                (0.0, 0.0)
            };
            Bounds::Directional {
                start_x: anchor.x,
                start_y: anchor.y,
                end_x: drag.x,
                end_y: drag.y,
                magnitude,
                unit_x,
                unit_y,
                angle: dy.atan2(dx),
            }
        }
        ShapeCategory::FixedDirectional => Bounds::FixedDirectional {
            start_x: anchor.x,
            start_y: anchor.y,
            magnitude,
            direction: ArrowDirection::for_kind(kind),
        },
        ShapeCategory::CenterSymmetric => Bounds::CenterSymmetric {
            center_x: anchor.x,
            center_y: anchor.y,
            size: magnitude,
        },
        ShapeCategory::PolygonRegular => Bounds::PolygonRegular {
            center_x: anchor.x,
            center_y: anchor.y,
            circumradius: magnitude,
            sides: regular_sides(kind, options),
        },
    };

    Ok(bounds.is_valid().then_some(bounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ShapeOptions {
        ShapeOptions::default()
    }

    #[test]
    fn test_every_kind_has_one_category() {
        for kind in ShapeKind::all() {
            assert!(kind.category().is_ok(), "{kind} has no category");
            assert!(anchor_behavior(*kind).is_ok());
        }
        assert_eq!(CATEGORY_TABLE.len(), ShapeKind::all().len());
    }

    #[test]
    fn test_from_name_round_trips_and_rejects_unknown() {
        for kind in ShapeKind::all() {
            assert_eq!(ShapeKind::from_name(kind.name()), Ok(*kind));
        }
        assert_eq!(ShapeKind::from_name("Arrow_Up"), Ok(ShapeKind::ArrowUp));
        assert_eq!(
            ShapeKind::from_name("blob"),
            Err(ZxError::UnknownShapeKind("blob".into()))
        );
    }

    #[test]
    fn test_radial_center_uses_anchor_as_center() {
        let b = standardize(
            ShapeKind::Circle,
            Point::new(100.0, 80.0),
            Point::new(103.0, 84.0),
            &opts(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(b, Bounds::circle(100.0, 80.0, 5.0));
    }

    #[test]
    fn test_ellipse_keeps_separate_radii() {
        let b = standardize(
            ShapeKind::Ellipse,
            Point::new(50.0, 50.0),
            Point::new(40.0, 56.0),
            &opts(),
        )
        .unwrap()
        .unwrap();
        match b {
            Bounds::RadialCenter { radius_x, radius_y, .. } => {
                assert_eq!(radius_x, 10.0);
                assert_eq!(radius_y, 6.0);
            }
            other => panic!("unexpected bounds {other:?}"),
        }
    }

    #[test]
    fn test_corner_drag_normalises_corners() {
        let b = standardize(
            ShapeKind::Rectangle,
            Point::new(50.0, 40.0),
            Point::new(10.0, 10.0),
            &opts(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(b, Bounds::from_corners(10.0, 10.0, 50.0, 40.0));
    }

    #[test]
    fn test_square_takes_shorter_axis_in_drag_quadrant() {
        let b = standardize(
            ShapeKind::Square,
            Point::new(50.0, 50.0),
            Point::new(30.0, 90.0),
            &opts(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(b, Bounds::from_corners(30.0, 50.0, 50.0, 70.0));
    }

    #[test]
    fn test_fixed_directional_ignores_drag_direction() {
        let a = standardize(
            ShapeKind::ArrowUp,
            Point::new(10.0, 10.0),
            Point::new(13.0, 14.0),
            &opts(),
        )
        .unwrap()
        .unwrap();
        let b = standardize(
            ShapeKind::ArrowUp,
            Point::new(10.0, 10.0),
            Point::new(5.0, 10.0),
            &opts(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_directional_zero_length_has_zero_unit() {
        let b = standardize(ShapeKind::Line, Point::new(7.0, 7.0), Point::new(7.0, 7.0), &opts())
            .unwrap()
            .unwrap();
        match b {
            Bounds::Directional { magnitude, unit_x, unit_y, .. } => {
                assert_eq!((magnitude, unit_x, unit_y), (0.0, 0.0, 0.0));
            }
            other => panic!("unexpected bounds {other:?}"),
        }
    }

    #[test]
    fn test_ngon_sides_from_options_are_clamped() {
        let mut o = opts();
        o.sides = 2;
        let b = standardize(ShapeKind::Ngon, Point::new(0.0, 0.0), Point::new(10.0, 0.0), &o)
            .unwrap()
            .unwrap();
        assert!(matches!(b, Bounds::PolygonRegular { sides: 3, .. }));
        let b = standardize(ShapeKind::Hexagon, Point::new(0.0, 0.0), Point::new(10.0, 0.0), &o)
            .unwrap()
            .unwrap();
        assert!(matches!(b, Bounds::PolygonRegular { sides: 6, .. }));
    }

    #[test]
    fn test_non_finite_input_is_empty_not_error() {
        let r = standardize(
            ShapeKind::Star,
            Point::new(f32::NAN, 0.0),
            Point::new(1.0, 1.0),
            &opts(),
        );
        assert_eq!(r, Ok(None));
        let r = standardize(
            ShapeKind::Line,
            Point::new(0.0, 0.0),
            Point::new(f32::INFINITY, 1.0),
            &opts(),
        );
        assert_eq!(r, Ok(None));
    }

    #[test]
    fn test_negative_radius_is_invalid() {
        assert!(!Bounds::circle(10.0, 10.0, -1.0).is_valid());
        assert!(Bounds::circle(10.0, 10.0, 0.0).is_valid());
    }
}
