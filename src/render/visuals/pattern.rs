use std::f32::consts::{FRAC_PI_2, PI};

use image::Rgb;

use super::TITLE_SIZE;
use crate::render::figure::{Axes, Figure, TextStyle};
use crate::render::style::Palette;

pub const FIGSIZE: (f32, f32) = (14.0, 8.0);

const GRID: usize = 3;
const CELL: f32 = 2.0;
const SYMBOL_RADIUS: f32 = 0.4;

/// Shapes placed in the grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Disk,
    Ring,
    HalfLeft,
    HalfRight,
    HalfBottom,
    HalfTop,
    Triangle,
    HollowTriangle,
}

pub const SYMBOLS: [Symbol; 8] = [
    Symbol::Disk,
    Symbol::Ring,
    Symbol::HalfLeft,
    Symbol::HalfRight,
    Symbol::HalfBottom,
    Symbol::HalfTop,
    Symbol::Triangle,
    Symbol::HollowTriangle,
];

/// Symbol and color slot for a grid cell, or `None` for the missing center.
pub fn cell_content(row: usize, col: usize) -> Option<(Symbol, usize)> {
    if row == GRID / 2 && col == GRID / 2 {
        return None;
    }
    Some((SYMBOLS[(row + col) % SYMBOLS.len()], (row * GRID + col) % 4))
}

/// 3x3 grid of symbols with the center cell left as a question mark.
pub fn draw(palette: Palette, dpi: u32) -> Figure {
    let mut fig = Figure::new(FIGSIZE.0, FIGSIZE.1, dpi, palette);
    fig.suptitle("Complétion de Motif Visuel", TITLE_SIZE);
    let panel = fig.subplots(1)[0];
    let extent = GRID as f32 * CELL;
    let mut ax = fig.axes(panel, (-0.5, extent + 0.5), (-1.0, extent + 0.5), true);
    let colors = palette.cycle();

    for row in 0..GRID {
        for col in 0..GRID {
            let x = col as f32 * CELL;
            let y = (GRID - 1 - row) as f32 * CELL;
            let center = (x + CELL / 2.0, y + CELL / 2.0);
            let corner = (x + CELL - 0.1, y + CELL - 0.1);
            match cell_content(row, col) {
                None => {
                    let color = palette.error;
                    ax.rect((x, y), corner, 8.0, Some((color, 0.3)), Some((color, 3.0)));
                    ax.text(center, "?", TextStyle::new(36.0, color));
                }
                Some((symbol, slot)) => {
                    let color = colors[slot];
                    ax.rect((x, y), corner, 4.0, Some((color, 0.2)), Some((color, 2.0)));
                    draw_symbol(&mut ax, symbol, center, color);
                }
            }
        }
    }

    for i in 0..=GRID {
        let at = i as f32 * CELL;
        ax.hline(at, 1.0, Palette::GRAY, 0.5);
        ax.vline(at, 1.0, Palette::GRAY, 0.5);
    }

    ax.text(
        (extent / 2.0, -0.5),
        "Analysez le motif et trouvez l'élément manquant",
        TextStyle::new(14.0, Palette::BLACK).boxed(Palette::WHITE, 0.8),
    );

    fig
}

fn draw_symbol(ax: &mut Axes<'_>, symbol: Symbol, center: (f32, f32), color: Rgb<u8>) {
    let r = SYMBOL_RADIUS;
    match symbol {
        Symbol::Disk => ax.fill_circle(center, r, color, 1.0),
        Symbol::Ring => ax.stroke_circle(center, r, 3.0, color, 1.0),
        Symbol::HalfLeft => half_disk(ax, center, FRAC_PI_2, color),
        Symbol::HalfRight => half_disk(ax, center, -FRAC_PI_2, color),
        Symbol::HalfBottom => half_disk(ax, center, PI, color),
        Symbol::HalfTop => half_disk(ax, center, 0.0, color),
        Symbol::Triangle => ax.fill_polygon(&triangle(center, r), color, 1.0),
        Symbol::HollowTriangle => {
            let mut outline = triangle(center, r).to_vec();
            outline.push(outline[0]);
            ax.polyline(&outline, 3.0, color, 1.0);
        }
    }
}

/// Outlined disk with the half starting at angle `start` filled.
fn half_disk(ax: &mut Axes<'_>, center: (f32, f32), start: f32, color: Rgb<u8>) {
    let points: Vec<(f32, f32)> = (0..=32)
        .map(|k| {
            let t = start + PI * k as f32 / 32.0;
            (
                center.0 + SYMBOL_RADIUS * t.cos(),
                center.1 + SYMBOL_RADIUS * t.sin(),
            )
        })
        .collect();
    ax.fill_polygon(&points, color, 1.0);
    ax.stroke_circle(center, SYMBOL_RADIUS, 2.0, color, 1.0);
}

/// Upward equilateral triangle inscribed in a circle of radius `r`.
fn triangle(center: (f32, f32), r: f32) -> [(f32, f32); 3] {
    let vertex = |deg: f32| {
        let t = deg.to_radians();
        (center.0 + r * t.cos(), center.1 + r * t.sin())
    };
    [vertex(90.0), vertex(210.0), vertex(330.0)]
}
