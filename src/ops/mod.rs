//! Drawing operations: shape standardization and rasterization, polygon
//! and region fills, and attribute merging.

pub mod attributes;
pub mod bounds;
pub mod polygon_fill;
pub mod preview;
pub mod procedural;
pub mod raster;
pub mod region_fill;
pub mod shapes;

pub use attributes::{DrawIntent, apply_writes, merge_attribute};
pub use bounds::{
    AnchorBehavior, AnchorRole, Bounds, Point, ShapeCategory, ShapeKind, anchor_behavior,
    standardize,
};
pub use polygon_fill::{FillStrategy, fill_strategy, generate_filled_shape, is_fillable};
pub use region_fill::{FillMode, FillOptions, FillOutcome, SmartOptions, fill};
pub use shapes::{
    MoonOptions, ShapeFillMode, ShapeOptions, generate_shape, render_shape, shape_from_gesture,
};
