use thiserror::Error;

use crate::ops::bounds::ShapeKind;

/// Errors raised by the drawing engine.
///
/// Only caller/engine mismatches surface here. Degenerate drag bounds,
/// off-canvas points and truncated fills are recovered locally and never
/// reach the caller as errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZxError {
    /// A shape name that is not part of the closed shape set.
    #[error("unknown shape kind: {0}")]
    UnknownShapeKind(String),

    /// A shape kind with no entry in the category table.
    #[error("shape kind {0:?} has no registered category")]
    UnknownShapeCategory(ShapeKind),

    /// An ink or paper index outside the 8-colour palette.
    #[error("palette index {0} is out of range (0..8)")]
    PaletteIndexOutOfRange(u8),

    /// An option record that could not be parsed.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, ZxError>;
