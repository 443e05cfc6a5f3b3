use std::f32::consts::FRAC_PI_2;

use super::{PANEL_TITLE_SIZE, TITLE_SIZE};
use crate::render::figure::{Axes, Figure, TextStyle};
use crate::render::style::Palette;

/// Figure size in inches.
pub const FIGSIZE: (f32, f32) = (14.0, 7.0);

/// Arrow drawn in a matrix cell, or the missing cell.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Arrow(f32),
    Missing,
}

/// 2x2 arrow matrix with the bottom-right cell missing, next to a panel
/// that walks through a 90° clockwise rotation.
pub fn draw(palette: Palette, dpi: u32) -> Figure {
    let mut fig = Figure::new(FIGSIZE.0, FIGSIZE.1, dpi, palette);
    fig.suptitle("Matrice 2×2 avec Rotation 90° Horaire", TITLE_SIZE);
    let panels = fig.subplots(2);

    let mut ax = fig.axes(panels[0], (-0.1, 2.1), (-0.5, 2.5), true);
    draw_matrix(&mut ax, palette);

    let mut ax = fig.axes(panels[1], (-0.5, 2.5), (-0.8, 2.8), true);
    draw_rotation_analysis(&mut ax, palette);

    fig
}

fn draw_matrix(ax: &mut Axes<'_>, palette: Palette) {
    ax.title("Matrice avec élément manquant", PANEL_TITLE_SIZE);

    for i in 0..3 {
        ax.hline(i as f32, 2.0, Palette::INK, 1.0);
        ax.vline(i as f32, 2.0, Palette::INK, 1.0);
    }

    let cells = [
        ((0.5, 1.5), Cell::Arrow(45.0), palette.accent),
        ((1.5, 1.5), Cell::Arrow(-90.0), palette.accent),
        ((0.5, 0.5), Cell::Arrow(90.0), palette.success),
        ((1.5, 0.5), Cell::Missing, palette.error),
    ];
    for (center, cell, color) in cells {
        match cell {
            Cell::Arrow(angle) => ax.arrow_glyph(center, angle, 0.5, 4.0, color),
            Cell::Missing => {
                let (x, y) = center;
                ax.rect(
                    (x - 0.35, y - 0.35),
                    (x + 0.35, y + 0.35),
                    6.0,
                    Some((color, 0.3)),
                    Some((color, 3.0)),
                );
                ax.text(center, "?", TextStyle::new(28.0, color));
            }
        }
    }

    let label = TextStyle::new(12.0, Palette::BLACK);
    ax.text((0.5, -0.3), "A", label);
    ax.text((1.5, -0.3), "B", label);
    ax.text((0.5, 2.3), "C", label);
    ax.text((1.5, 2.3), "D", label);
}

fn draw_rotation_analysis(ax: &mut Axes<'_>, palette: Palette) {
    ax.title("Analyse de la Rotation", PANEL_TITLE_SIZE);
    let colors = palette.cycle();

    ax.stroke_circle((1.0, 1.0), 0.8, 3.0, palette.accent, 1.0);

    // Arrow direction, compass label, label angle
    let steps: [((f32, f32), f32, &str, f32); 4] = [
        ((1.0, 1.8), 45.0, "Nord-Est", 0.0),
        ((1.8, 1.0), -90.0, "Sud", 90.0),
        ((1.0, 0.2), 90.0, "Nord", 180.0),
        ((0.2, 1.0), 0.0, "Est", 270.0),
    ];
    for (i, ((x, y), direction, name, angle)) in steps.into_iter().enumerate() {
        let color = colors[i % colors.len()];
        ax.arrow_glyph((x, y), direction, 0.3, 3.0, color);
        let theta = (angle + 45.0f32).to_radians();
        let label = (x + 0.3 * theta.cos(), y + 0.3 * theta.sin());
        ax.text(label, name, TextStyle::new(10.0, color));
    }

    // Quarter arcs, each but the last ending in an arrow head
    for (i, color) in colors.iter().enumerate() {
        let arc = quarter_arc((1.0, 1.0), 0.6, i);
        ax.polyline(&arc, 3.0, *color, 0.7);
        if i < 3 {
            let n = arc.len();
            ax.arrow(arc[n - 4], arc[n - 1], 1.5, *color);
        }
    }

    ax.text(
        (1.0, 1.0),
        "90°",
        TextStyle::new(20.0, Palette::BLACK).boxed(Palette::WHITE, 0.8),
    );
    ax.text(
        (1.0, -0.5),
        "↑ + 90° = →",
        TextStyle::new(16.0, palette.success).boxed(palette.success, 0.1),
    );
}

/// 25 points along the `quadrant`-th quarter of a circle, counter-clockwise.
fn quarter_arc(center: (f32, f32), radius: f32, quadrant: usize) -> Vec<(f32, f32)> {
    let start = quadrant as f32 * FRAC_PI_2;
    (0..25)
        .map(|k| {
            let t = start + FRAC_PI_2 * k as f32 / 24.0;
            (center.0 + radius * t.cos(), center.1 + radius * t.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_arc_endpoints() {
        let arc = quarter_arc((1.0, 1.0), 0.6, 1);
        assert_eq!(arc.len(), 25);
        assert!((arc[0].0 - 1.0).abs() < 1e-5);
        assert!((arc[0].1 - 1.6).abs() < 1e-5);
        assert!((arc[24].0 - 0.4).abs() < 1e-5);
        assert!((arc[24].1 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_draw_uses_figure_size() {
        let fig = draw(Palette::default(), 20);
        assert_eq!(fig.size(), (280, 140));
    }

    #[test]
    fn test_missing_cell_is_tinted_with_error_color() {
        let palette = Palette::default();
        let img = draw(palette, 40).into_image();
        let bg = palette.background;
        // Somewhere in the image the error color dominates a pixel
        assert!(img
            .pixels()
            .any(|p| *p != bg && p[0] > 200 && p[1] < 120 && p[2] < 140));
    }
}
