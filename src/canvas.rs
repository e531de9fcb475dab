use serde::{Deserialize, Serialize};

// ============================================================================
// DISPLAY CONFIGURATION
// ============================================================================
//
// The engine targets one fixed-resolution indexed display. These constants
// are the whole configuration surface; a different display of the same
// family only needs new values here.

/// Pixel columns on the bitmap.
pub const CANVAS_WIDTH: usize = 256;
/// Pixel rows on the bitmap.
pub const CANVAS_HEIGHT: usize = 192;
/// Edge length of one attribute block in pixels.
pub const BLOCK_SIZE: usize = 8;
/// Attribute blocks per row.
pub const ATTR_COLS: usize = CANVAS_WIDTH / BLOCK_SIZE;
/// Attribute blocks per column.
pub const ATTR_ROWS: usize = CANVAS_HEIGHT / BLOCK_SIZE;
/// Colours addressable by an ink or paper index.
pub const PALETTE_SIZE: u8 = 8;

/// Which side of the attribute pair a write selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintMode {
    #[default]
    Ink,
    Paper,
}

impl PaintMode {
    /// Bitmap value written for this mode (1 = ink-side, 0 = paper-side).
    #[inline]
    pub fn value(self) -> u8 {
        match self {
            PaintMode::Ink => 1,
            PaintMode::Paper => 0,
        }
    }

    pub fn inverse(self) -> PaintMode {
        match self {
            PaintMode::Ink => PaintMode::Paper,
            PaintMode::Paper => PaintMode::Ink,
        }
    }

    /// Map a procedural bit onto this mode: a set bit takes the mode's
    /// value, a clear bit takes the opposite one.
    #[inline]
    pub fn select(self, bit: bool) -> u8 {
        if bit { self.value() } else { self.inverse().value() }
    }
}

/// One pixel the caller should write into its bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelWrite {
    pub x: i32,
    pub y: i32,
    /// 0 or 1.
    pub value: u8,
}

impl PixelWrite {
    #[inline]
    pub fn new(x: i32, y: i32, value: u8) -> Self {
        Self { x, y, value }
    }
}

/// True when (x, y) addresses a pixel on the bitmap.
#[inline]
pub fn in_canvas(x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as usize) < CANVAS_WIDTH && (y as usize) < CANVAS_HEIGHT
}

// ============================================================================
// PIXEL GRID: 256×192 one-bit bitmap, caller-owned
// ============================================================================

/// The monochrome bitmap. One byte per pixel, row-major, indexed by
/// `y * CANVAS_WIDTH + x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    bits: Vec<u8>,
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelGrid {
    /// An all-paper bitmap.
    pub fn new() -> Self {
        Self {
            bits: vec![0; CANVAS_WIDTH * CANVAS_HEIGHT],
        }
    }

    /// A bitmap with every pixel set to `value` (normalised to 0/1).
    pub fn filled(value: u8) -> Self {
        Self {
            bits: vec![value.min(1); CANVAS_WIDTH * CANVAS_HEIGHT],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        CANVAS_WIDTH
    }

    #[inline]
    pub fn height(&self) -> usize {
        CANVAS_HEIGHT
    }

    /// Pixel value, or `None` off-canvas.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if in_canvas(x, y) {
            Some(self.bits[y as usize * CANVAS_WIDTH + x as usize])
        } else {
            None
        }
    }

    /// Unchecked-by-coordinate access for callers already holding a flat index.
    #[inline]
    pub(crate) fn at_index(&self, idx: usize) -> u8 {
        self.bits[idx]
    }

    /// Set one pixel. Returns `true` when the stored value changed.
    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        if !in_canvas(x, y) {
            return false;
        }
        let idx = y as usize * CANVAS_WIDTH + x as usize;
        let value = value.min(1);
        let changed = self.bits[idx] != value;
        self.bits[idx] = value;
        changed
    }

    /// Commit a write list in order. Off-canvas entries are ignored.
    /// Returns the number of pixels whose value changed.
    pub fn apply(&mut self, writes: &[PixelWrite]) -> usize {
        writes
            .iter()
            .filter(|w| self.set(w.x, w.y, w.value))
            .count()
    }

    /// Number of ink-side pixels.
    pub fn count_ink(&self) -> usize {
        self.bits.iter().filter(|&&b| b != 0).count()
    }

    /// Row-major raw values.
    pub fn as_raw(&self) -> &[u8] {
        &self.bits
    }

    /// Render as text, `#` for ink and `.` for paper, one line per row.
    /// Only rows/columns inside `(x0, y0)..=(x1, y1)` are emitted.
    pub fn to_ascii(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> String {
        let x1 = x1.min(CANVAS_WIDTH - 1);
        let y1 = y1.min(CANVAS_HEIGHT - 1);
        let mut out = String::with_capacity((x1 + 2 - x0.min(x1)) * (y1 + 1 - y0.min(y1)));
        for y in y0..=y1 {
            for x in x0..=x1 {
                let b = self.bits[y * CANVAS_WIDTH + x];
                out.push(if b != 0 { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// ATTRIBUTE GRID: 32×24 blocks of ink/paper/bright/flash
// ============================================================================

/// Colour attributes for one 8×8 block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub ink: u8,
    pub paper: u8,
    pub bright: bool,
    pub flash: bool,
}

impl Default for Attribute {
    /// Black ink on white paper.
    fn default() -> Self {
        Self {
            ink: 0,
            paper: 7,
            bright: false,
            flash: false,
        }
    }
}

impl Attribute {
    /// Pack into the display's native byte: flash(7) bright(6) paper(5..3) ink(2..0).
    pub fn to_byte(self) -> u8 {
        ((self.flash as u8) << 7)
            | ((self.bright as u8) << 6)
            | ((self.paper & 7) << 3)
            | (self.ink & 7)
    }

    pub fn from_byte(b: u8) -> Self {
        Self {
            ink: b & 7,
            paper: (b >> 3) & 7,
            bright: b & 0x40 != 0,
            flash: b & 0x80 != 0,
        }
    }
}

/// Caller-owned attribute map. Each block holds exactly one ink and one
/// paper colour; pixels inside the block select between those two.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeGrid {
    cells: Vec<Attribute>,
}

impl Default for AttributeGrid {
    fn default() -> Self {
        Self::new(Attribute::default())
    }
}

impl AttributeGrid {
    pub fn new(fill: Attribute) -> Self {
        Self {
            cells: vec![fill; ATTR_COLS * ATTR_ROWS],
        }
    }

    /// Attribute of block (col, row).
    pub fn get(&self, col: usize, row: usize) -> Option<Attribute> {
        if col < ATTR_COLS && row < ATTR_ROWS {
            Some(self.cells[row * ATTR_COLS + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, col: usize, row: usize, attr: Attribute) {
        if col < ATTR_COLS && row < ATTR_ROWS {
            self.cells[row * ATTR_COLS + col] = attr;
        }
    }

    /// Block coordinates containing pixel (x, y).
    #[inline]
    pub fn block_of(x: i32, y: i32) -> Option<(usize, usize)> {
        if in_canvas(x, y) {
            Some((x as usize / BLOCK_SIZE, y as usize / BLOCK_SIZE))
        } else {
            None
        }
    }

    /// Attribute governing pixel (x, y).
    pub fn at_pixel(&self, x: i32, y: i32) -> Option<Attribute> {
        Self::block_of(x, y).and_then(|(c, r)| self.get(c, r))
    }
}

// ============================================================================
// FILL LIMITS
// ============================================================================

/// Per-mode ceiling on pixels touched by one region fill. Hitting the
/// ceiling truncates the fill; it is never an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillLimits {
    pub flood: usize,
    pub pattern: usize,
    pub gradient: usize,
    pub fractal: usize,
    pub smart: usize,
    pub texture: usize,
}

impl Default for FillLimits {
    fn default() -> Self {
        Self {
            flood: 50_000,
            pattern: 100_000,
            gradient: CANVAS_WIDTH * CANVAS_HEIGHT,
            fractal: 50_000,
            smart: 75_000,
            texture: 100_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions_match_blocks() {
        assert_eq!(ATTR_COLS, 32);
        assert_eq!(ATTR_ROWS, 24);
        assert_eq!(FillLimits::default().gradient, 49_152);
    }

    #[test]
    fn test_apply_counts_changes_and_skips_off_canvas() {
        let mut grid = PixelGrid::new();
        let writes = [
            PixelWrite::new(0, 0, 1),
            PixelWrite::new(0, 0, 1),
            PixelWrite::new(-1, 4, 1),
            PixelWrite::new(255, 191, 1),
            PixelWrite::new(256, 0, 1),
        ];
        assert_eq!(grid.apply(&writes), 2);
        assert_eq!(grid.count_ink(), 2);
        assert_eq!(grid.get(255, 191), Some(1));
        assert_eq!(grid.get(256, 0), None);
    }

    #[test]
    fn test_attribute_byte_packing() {
        let attr = Attribute {
            ink: 2,
            paper: 5,
            bright: true,
            flash: false,
        };
        assert_eq!(attr.to_byte(), 0b0110_1010);
        assert_eq!(Attribute::from_byte(attr.to_byte()), attr);
    }

    #[test]
    fn test_block_of_pixel() {
        assert_eq!(AttributeGrid::block_of(0, 0), Some((0, 0)));
        assert_eq!(AttributeGrid::block_of(255, 191), Some((31, 23)));
        assert_eq!(AttributeGrid::block_of(17, 9), Some((2, 1)));
        assert_eq!(AttributeGrid::block_of(-1, 9), None);
    }

    #[test]
    fn test_paint_mode_select() {
        assert_eq!(PaintMode::Ink.select(true), 1);
        assert_eq!(PaintMode::Ink.select(false), 0);
        assert_eq!(PaintMode::Paper.select(true), 0);
        assert_eq!(PaintMode::Paper.select(false), 1);
    }
}
