use std::f32::consts::{FRAC_PI_2, PI};

use crate::render::figure::{Axes, Figure, Rect, TextStyle};
use crate::render::style::{viridis, Palette};

pub const FIGSIZE: (f32, f32) = (12.0, 6.0);

const GOLDEN_RATIO: f32 = 1.618_034;

/// Which plot a numeric sequence gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Fibonacci,
    Arithmetic,
    Geometric,
    Generic,
}

impl SequenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceKind::Fibonacci => "fibonacci",
            SequenceKind::Arithmetic => "arithmetic",
            SequenceKind::Geometric => "geometric",
            SequenceKind::Generic => "generic",
        }
    }
}

impl std::fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn draw(kind: SequenceKind, data: &[i64], palette: Palette, dpi: u32) -> Figure {
    let mut fig = Figure::new(FIGSIZE.0, FIGSIZE.1, dpi, palette);
    let panel = fig.subplots(1)[0];
    match kind {
        SequenceKind::Fibonacci => draw_fibonacci(&mut fig, panel, data),
        SequenceKind::Arithmetic => draw_arithmetic(&mut fig, panel, data, palette),
        SequenceKind::Geometric => draw_geometric(&mut fig, panel, data, palette),
        SequenceKind::Generic => draw_generic(&mut fig, panel, data, palette),
    }
    fig
}

/// Lower-left corners of the first Fibonacci squares, laid out right, up,
/// left, down in turn.
pub fn fibonacci_squares(sizes: &[i64]) -> Vec<((f32, f32), f32)> {
    let (mut x, mut y) = (0.0f32, 0.0f32);
    sizes
        .iter()
        .take(6)
        .enumerate()
        .map(|(i, &size)| {
            let size = size as f32;
            let corner = (x, y);
            match i % 4 {
                0 => x += size,
                1 => y += size,
                2 => x -= size,
                _ => y -= size,
            }
            (corner, size)
        })
        .collect()
}

/// Golden spiral r = φ^(t / (π/2)) over one full turn.
fn golden_spiral() -> Vec<(f32, f32)> {
    (0..100)
        .map(|k| {
            let t = 2.0 * PI * k as f32 / 99.0;
            let r = GOLDEN_RATIO.powf(t / FRAC_PI_2);
            (r * t.cos(), r * t.sin())
        })
        .collect()
}

fn draw_fibonacci(fig: &mut Figure, panel: Rect, data: &[i64]) {
    let squares = fibonacci_squares(data);
    let spiral = golden_spiral();

    let corners = squares
        .iter()
        .flat_map(|&((x, y), s)| [(x, y), (x + s, y + s)])
        .chain(spiral.iter().copied());
    let (xlim, ylim) = padded_bounds(corners, 0.05);

    let mut ax = fig.axes(panel, xlim, ylim, true);
    ax.title("Suite de Fibonacci avec Spirale Dorée", 16.0);
    ax.grid(nice_step(xlim.1 - xlim.0), nice_step(ylim.1 - ylim.0), 0.3);

    let n = squares.len();
    for (i, &((x, y), size)) in squares.iter().enumerate() {
        let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
        ax.rect((x, y), (x + size, y + size), 0.0, Some((viridis(t), 0.7)), Some((Palette::BLACK, 2.0)));
        ax.text(
            (x + size / 2.0, y + size / 2.0),
            &(size as i64).to_string(),
            TextStyle::new(12.0, Palette::WHITE),
        );
    }

    ax.polyline(&spiral, 3.0, Palette::GOLD, 0.8);
    ax.legend(&[(Palette::GOLD, "Spirale dorée")]);
}

fn draw_arithmetic(fig: &mut Figure, panel: Rect, data: &[i64], palette: Palette) {
    let points = indexed(data);
    let mut ax = line_axes(fig, panel, &points, "Suite Arithmétique");
    ax.polyline(&points, 3.0, palette.accent, 1.0);
    for &p in &points {
        ax.marker(p, 4.0, palette.accent, 1.0);
    }

    let diff = common_difference(data);
    let label = if diff >= 0 {
        format!("+{}", diff)
    } else {
        diff.to_string()
    };
    let lift = (ax.ylim().1 - ax.ylim().0) * 0.08;
    for pair in points.windows(2) {
        let mid = ((pair[0].0 + pair[1].0) / 2.0, (pair[0].1 + pair[1].1) / 2.0 + lift);
        ax.text(
            mid,
            &label,
            TextStyle::new(10.0, palette.success).boxed(palette.success, 0.3),
        );
    }

    ax.legend(&[(palette.accent, "Suite")]);
    ax.axis_labels("Position", "Valeur");
}

/// Step between the first two terms, saturating at the `i64` bounds.
fn common_difference(data: &[i64]) -> i64 {
    match data {
        [first, second, ..] => second.saturating_sub(*first),
        _ => 0,
    }
}

fn draw_geometric(fig: &mut Figure, panel: Rect, data: &[i64], palette: Palette) {
    // Log scale: non-positive terms have no place on the axis
    let points: Vec<(f32, f32)> = data
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > 0)
        .map(|(i, &v)| (i as f32, (v as f32).log10()))
        .collect();
    let mut ax = line_axes(fig, panel, &points, "Suite Géométrique");
    ax.polyline(&points, 3.0, palette.warning, 1.0);
    for &p in &points {
        ax.square_marker(p, 4.0, palette.warning);
    }
    ax.legend(&[(palette.warning, "Suite")]);
    ax.axis_labels("Position", "Valeur (log10)");
}

fn draw_generic(fig: &mut Figure, panel: Rect, data: &[i64], palette: Palette) {
    let points = indexed(data);
    let mut ax = line_axes(fig, panel, &points, "Suite Numérique");
    ax.polyline(&points, 2.0, palette.error, 1.0);
    for &p in &points {
        ax.diamond(p, 4.0, palette.error);
    }
    ax.legend(&[(palette.error, "Suite")]);
    ax.axis_labels("Position", "Valeur");
}

fn indexed(data: &[i64]) -> Vec<(f32, f32)> {
    data.iter()
        .enumerate()
        .map(|(i, &v)| (i as f32, v as f32))
        .collect()
}

/// Axes fitted around `points` with a light grid and a title.
fn line_axes<'a>(fig: &'a mut Figure, panel: Rect, points: &[(f32, f32)], title: &str) -> Axes<'a> {
    let (xlim, ylim) = padded_bounds(points.iter().copied(), 0.1);
    let mut ax = fig.axes(panel, xlim, ylim, false);
    ax.title(title, 16.0);
    ax.grid(1.0, nice_step(ylim.1 - ylim.0), 0.3);
    ax
}

/// Bounding box of `points`, grown by `pad` of its extent on every side.
/// Degenerate extents are widened to one unit, or to a thousandth of the
/// magnitude for values too large for a unit to register in `f32`.
fn padded_bounds(points: impl Iterator<Item = (f32, f32)>, pad: f32) -> ((f32, f32), (f32, f32)) {
    let (mut x0, mut x1, mut y0, mut y1) = (f32::MAX, f32::MIN, f32::MAX, f32::MIN);
    for (x, y) in points {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if x0 > x1 {
        return ((0.0, 1.0), (0.0, 1.0));
    }
    let grow = |lo: f32, hi: f32| {
        let span = (hi - lo).max(1.0).max(lo.abs().max(hi.abs()) * 1e-3);
        (lo - span * pad, hi + span * pad)
    };
    (grow(x0, x1), grow(y0, y1))
}

/// A 1, 2 or 5 times power-of-ten step giving about five grid lines.
pub fn nice_step(range: f32) -> f32 {
    if range <= 0.0 || !range.is_finite() {
        return 1.0;
    }
    let raw = range / 5.0;
    let magnitude = 10f32.powf(raw.log10().floor());
    let step = match raw / magnitude {
        r if r < 1.5 => 1.0,
        r if r < 3.5 => 2.0,
        r if r < 7.5 => 5.0,
        _ => 10.0,
    };
    step * magnitude
}
