//! ZXDraw: shape and fill engine for a 256×192 attribute-constrained
//! bitmap display.
//!
//! The engine turns drag gestures into pixel writes. It never owns a
//! canvas: every operation reads the caller's [`canvas::PixelGrid`] at most
//! and returns a list of [`canvas::PixelWrite`]s to commit.

#![allow(clippy::too_many_arguments)]

#[macro_use]
pub mod logger;

pub mod canvas;
pub mod cli;
pub mod error;
pub mod ops;

pub use error::{Result, ZxError};
