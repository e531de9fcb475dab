// ============================================================================
// ZXDraw CLI: run one shape or fill headlessly and print the result
// ============================================================================
//
// Usage examples:
//   ZXDraw shape --kind circle --anchor 128,96 --drag 160,96
//   ZXDraw shape --kind star --anchor 60,60 --drag 100,60 --fill both --stroke 2
//   ZXDraw shape --kind ngon --anchor 128,96 --drag 150,96 --options '{"sides":9}'
//   ZXDraw fill --at 20,20 --outline rectangle:9,9:51,41 --summary
//   ZXDraw fill --at 0,0 --mode gradient --options '{"kind":"radial","dither":true}'
//   ZXDraw kinds
//
// Every command starts from a blank canvas. Nothing is read from or written
// to disk besides the session log.

use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};

use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH, PaintMode, PixelGrid, PixelWrite};
use crate::error::{Result, ZxError};
use crate::ops::bounds::{Point, ShapeKind, anchor_behavior};
use crate::ops::preview::run_preview;
use crate::ops::region_fill::{FillMode, FillOptions, fill};
use crate::ops::shapes::{ShapeFillMode, ShapeOptions, shape_from_gesture};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// ZXDraw headless shape and fill engine.
#[derive(Parser, Debug)]
#[command(
    name = "ZXDraw",
    about = "Rasterize shapes and region fills on a 256x192 attribute bitmap",
    long_about = "Runs one drawing operation on a blank 256x192 canvas and prints the\n\
                  result as ASCII art ('#' ink, '.' paper) or as a one-line summary.\n\n\
                  Example:\n  \
                  ZXDraw shape --kind heart --anchor 128,96 --drag 150,120 --fill filled\n  \
                  ZXDraw fill --at 20,20 --outline circle:40,40:60,40"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Mirror log lines to stderr and print timing information.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Standardize a drag gesture and rasterize one shape.
    Shape(ShapeArgs),
    /// Fill the region around a seed pixel.
    Fill(FillArgs),
    /// List every shape kind with its category and anchor role.
    Kinds,
}

#[derive(Args, Debug)]
pub struct ShapeArgs {
    /// Shape name, e.g. circle, arrow-up, ngon.
    #[arg(short, long)]
    pub kind: String,

    /// Gesture anchor as X,Y.
    #[arg(short, long, value_parser = parse_point, allow_hyphen_values = true)]
    pub anchor: (i32, i32),

    /// Gesture drag point as X,Y.
    #[arg(short, long, value_parser = parse_point, allow_hyphen_values = true)]
    pub drag: (i32, i32),

    /// outline, filled or both.
    #[arg(short, long, default_value = "outline")]
    pub fill: String,

    /// Stroke width in pixels; overrides --options.
    #[arg(short, long)]
    pub stroke: Option<u32>,

    /// Paint with paper (0) instead of ink (1).
    #[arg(long)]
    pub paper: bool,

    /// Shape options as JSON, e.g. '{"points":7,"inner_radius_ratio":0.5}'.
    #[arg(short, long, value_name = "JSON")]
    pub options: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct FillArgs {
    /// Seed pixel as X,Y.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub at: (i32, i32),

    /// flood, pattern, gradient, fractal, smart or texture.
    #[arg(short, long, default_value = "flood")]
    pub mode: String,

    /// Mode options as JSON, e.g. '{"kind":"checkerboard","scale":2}'.
    #[arg(short, long, value_name = "JSON")]
    pub options: Option<String>,

    /// Paint with paper (0) instead of ink (1).
    #[arg(long)]
    pub paper: bool,

    /// Pixel limit; overrides the mode's default.
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Outline to draw before filling, as KIND:AX,AY:DX,DY. Repeatable.
    #[arg(long, value_name = "SHAPE", allow_hyphen_values = true)]
    pub outline: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Print a one-line summary instead of ASCII art.
    #[arg(long)]
    pub summary: bool,

    /// ASCII window as X0,Y0,X1,Y1; defaults to the written area.
    #[arg(long, value_parser = parse_window)]
    pub window: Option<(usize, usize, usize, usize)>,
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run one command and return an OS exit code.
pub fn run(args: CliArgs) -> ExitCode {
    if args.verbose {
        crate::logger::set_echo(true);
    }
    let start = Instant::now();

    let result = match &args.command {
        Command::Shape(a) => run_shape(a),
        Command::Fill(a) => run_fill(a),
        Command::Kinds => run_kinds(),
    };

    match result {
        Ok(()) => {
            log_info!("CLI command finished in {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_err!("CLI command failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn run_shape(args: &ShapeArgs) -> Result<()> {
    let kind = ShapeKind::from_name(&args.kind)?;
    let fill_mode = parse_shape_fill(&args.fill)?;

    let mut options: ShapeOptions = match &args.options {
        Some(json) => {
            serde_json::from_str(json).map_err(|e| ZxError::InvalidOptions(e.to_string()))?
        }
        None => ShapeOptions::default(),
    };
    if let Some(stroke) = args.stroke {
        options.stroke_width = stroke.max(1);
    }
    if args.paper {
        options.paint = PaintMode::Paper;
    }

    log_info!(
        "shape {} anchor={:?} drag={:?} fill={:?}",
        kind,
        args.anchor,
        args.drag,
        fill_mode
    );

    let timed = run_preview(kind.name(), || {
        shape_from_gesture(kind, args.anchor.into(), args.drag.into(), &options, fill_mode)
    });
    let writes = timed.value?;

    let mut grid = PixelGrid::new();
    let changed = grid.apply(&writes);
    if args.output.summary {
        println!(
            "{}: {} writes, {} changed, {:.2} ms",
            kind,
            writes.len(),
            changed,
            timed.elapsed.as_secs_f64() * 1000.0
        );
    } else {
        print_ascii(&grid, &writes, &args.output);
    }
    Ok(())
}

fn run_fill(args: &FillArgs) -> Result<()> {
    let mode = parse_fill_mode(&args.mode, args.options.as_deref())?;
    let options = FillOptions {
        paint: if args.paper { PaintMode::Paper } else { PaintMode::Ink },
        limit: args.limit,
        ..Default::default()
    };

    let mut grid = PixelGrid::new();
    for outline in &args.outline {
        let (kind, anchor, drag) = parse_outline(outline)?;
        let writes = shape_from_gesture(
            kind,
            anchor,
            drag,
            &ShapeOptions::default(),
            ShapeFillMode::Outline,
        )?;
        grid.apply(&writes);
    }

    log_info!("fill {} at {:?}", mode.name(), args.at);

    let timed = run_preview(mode.name(), || fill(&grid, args.at.0, args.at.1, &mode, &options));
    let outcome = timed.value;
    grid.apply(&outcome.writes);

    if args.output.summary {
        println!(
            "{}: {} writes, {} changed, truncated={}, {:.2} ms",
            mode.name(),
            outcome.writes.len(),
            outcome.changed_count,
            outcome.truncated,
            timed.elapsed.as_secs_f64() * 1000.0
        );
    } else {
        print_ascii(&grid, &outcome.writes, &args.output);
        if outcome.truncated {
            eprintln!("note: fill truncated at {} pixels", outcome.writes.len());
        }
    }
    Ok(())
}

fn run_kinds() -> Result<()> {
    for &kind in ShapeKind::all() {
        let behavior = anchor_behavior(kind)?;
        let category = format!("{:?}", kind.category()?);
        println!("{:<14} {:<18} anchor={:?}", kind.name(), category, behavior.role);
    }
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn print_ascii(grid: &PixelGrid, writes: &[PixelWrite], output: &OutputArgs) {
    let window = output.window.or_else(|| written_area(writes));
    match window {
        Some((x0, y0, x1, y1)) => print!("{}", grid.to_ascii(x0, y0, x1, y1)),
        None => println!("(nothing drawn)"),
    }
}

/// Bounding box of `writes` grown by one pixel, clipped to the canvas.
fn written_area(writes: &[PixelWrite]) -> Option<(usize, usize, usize, usize)> {
    let first = writes.first()?;
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for w in writes {
        x0 = x0.min(w.x);
        y0 = y0.min(w.y);
        x1 = x1.max(w.x);
        y1 = y1.max(w.y);
    }
    Some((
        (x0 - 1).max(0) as usize,
        (y0 - 1).max(0) as usize,
        (x1 + 1).min(CANVAS_WIDTH as i32 - 1) as usize,
        (y1 + 1).min(CANVAS_HEIGHT as i32 - 1) as usize,
    ))
}

// ============================================================================
// Argument parsing helpers
// ============================================================================

fn parse_point(s: &str) -> std::result::Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("bad X in '{}': {}", s, e))?;
    let y = y.trim().parse::<i32>().map_err(|e| format!("bad Y in '{}': {}", s, e))?;
    Ok((x, y))
}

fn parse_window(s: &str) -> std::result::Result<(usize, usize, usize, usize), String> {
    let parts: Vec<usize> = s
        .split(',')
        .map(|p| p.trim().parse::<usize>().map_err(|e| format!("bad window '{}': {}", s, e)))
        .collect::<std::result::Result<_, _>>()?;
    match parts.as_slice() {
        &[x0, y0, x1, y1] if x0 <= x1 && y0 <= y1 => Ok((x0, y0, x1, y1)),
        _ => Err(format!("expected X0,Y0,X1,Y1 with X0<=X1 and Y0<=Y1, got '{}'", s)),
    }
}

fn parse_shape_fill(s: &str) -> Result<ShapeFillMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "outline" => Ok(ShapeFillMode::Outline),
        "filled" | "fill" => Ok(ShapeFillMode::Filled),
        "both" => Ok(ShapeFillMode::Both),
        other => Err(ZxError::InvalidOptions(format!(
            "unknown shape fill mode '{}' (expected outline, filled or both)",
            other
        ))),
    }
}

/// Resolve a mode name plus optional JSON options. The name decides the
/// variant; the JSON only fills in that variant's fields.
fn parse_fill_mode(name: &str, json: Option<&str>) -> Result<FillMode> {
    let mode = FillMode::from_name(name);
    let Some(json) = json else {
        return Ok(mode);
    };
    let mut value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ZxError::InvalidOptions(e.to_string()))?;
    match &mut value {
        serde_json::Value::Object(map) => {
            map.insert("mode".into(), serde_json::Value::from(mode.name()));
        }
        _ => return Err(ZxError::InvalidOptions("fill options must be a JSON object".into())),
    }
    serde_json::from_value(value).map_err(|e| ZxError::InvalidOptions(e.to_string()))
}

/// `KIND:AX,AY:DX,DY`
fn parse_outline(s: &str) -> Result<(ShapeKind, Point, Point)> {
    let mut parts = s.splitn(3, ':');
    let (Some(kind), Some(anchor), Some(drag)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ZxError::InvalidOptions(format!("expected KIND:AX,AY:DX,DY, got '{}'", s)));
    };
    let kind = ShapeKind::from_name(kind)?;
    let anchor = parse_point(anchor).map_err(ZxError::InvalidOptions)?;
    let drag = parse_point(drag).map_err(ZxError::InvalidOptions)?;
    Ok((kind, anchor.into(), drag.into()))
}
