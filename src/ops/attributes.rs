//! Attribute merging for 8×8 colour blocks.
//!
//! A drawing action carries one intended ink/paper/bright/flash set. Each
//! block it touches keeps any channel the user has locked, and takes the
//! intended value for every other one.

use serde::{Deserialize, Serialize};

use crate::canvas::{Attribute, AttributeGrid, PALETTE_SIZE, PixelGrid, PixelWrite};
use crate::error::{Result, ZxError};

/// The attribute a drawing action wants to leave behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawIntent {
    pub ink: u8,
    pub paper: u8,
    pub bright: bool,
    pub flash: bool,
    /// When false, the block keeps its existing ink.
    pub ink_enabled: bool,
    /// When false, the block keeps its existing paper.
    pub paper_enabled: bool,
}

impl Default for DrawIntent {
    fn default() -> Self {
        Self {
            ink: 0,
            paper: 7,
            bright: false,
            flash: false,
            ink_enabled: true,
            paper_enabled: true,
        }
    }
}

impl DrawIntent {
    pub fn new(ink: u8, paper: u8, bright: bool, flash: bool) -> Result<Self> {
        let intent = Self {
            ink,
            paper,
            bright,
            flash,
            ..Default::default()
        };
        intent.validate()?;
        Ok(intent)
    }

    /// Lock or unlock the ink and paper channels.
    pub fn with_locks(mut self, ink_enabled: bool, paper_enabled: bool) -> Self {
        self.ink_enabled = ink_enabled;
        self.paper_enabled = paper_enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for idx in [self.ink, self.paper] {
            if idx >= PALETTE_SIZE {
                return Err(ZxError::PaletteIndexOutOfRange(idx));
            }
        }
        Ok(())
    }
}

/// Merge an intent into an existing block attribute.
///
/// Ink and paper follow their enable flags; bright and flash always take
/// the intended values.
pub fn merge_attribute(existing: Attribute, intent: &DrawIntent) -> Attribute {
    Attribute {
        ink: if intent.ink_enabled { intent.ink } else { existing.ink },
        paper: if intent.paper_enabled { intent.paper } else { existing.paper },
        bright: intent.bright,
        flash: intent.flash,
    }
}

/// Commit `writes` to the bitmap and merge `intent` into every block that
/// holds at least one write. Each block is merged once. Returns the number
/// of pixels that changed.
pub fn apply_writes(
    pixels: &mut PixelGrid,
    attrs: &mut AttributeGrid,
    writes: &[PixelWrite],
    intent: &DrawIntent,
) -> Result<usize> {
    intent.validate()?;
    let changed = pixels.apply(writes);

    let mut touched: Vec<(usize, usize)> = writes
        .iter()
        .filter_map(|w| AttributeGrid::block_of(w.x, w.y))
        .collect();
    touched.sort_unstable();
    touched.dedup();

    for (col, row) in touched {
        if let Some(existing) = attrs.get(col, row) {
            attrs.set(col, row, merge_attribute(existing, intent));
        }
    }
    Ok(changed)
}
