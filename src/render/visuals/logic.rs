use super::{PANEL_TITLE_SIZE, TITLE_SIZE};
use crate::render::figure::{Axes, Figure, TextStyle};
use crate::render::style::Palette;

pub const FIGSIZE: (f32, f32) = (16.0, 8.0);

const PREMISES: [&str; 3] = ["Si A > B", "Et B > C", "Alors A ? C"];
const NODES: [(&str, (f32, f32)); 3] = [("A", (1.0, 2.0)), ("B", (2.0, 1.0)), ("C", (3.0, 0.0))];
const NODE_RADIUS: f32 = 0.3;

/// Premises stacked top to bottom, beside the transitivity graph they imply.
pub fn draw(palette: Palette, dpi: u32) -> Figure {
    let mut fig = Figure::new(FIGSIZE.0, FIGSIZE.1, dpi, palette);
    fig.suptitle("Diagramme de Raisonnement Logique", TITLE_SIZE);
    let panels = fig.subplots(2);

    let mut ax = fig.axes(panels[0], (0.0, 4.0), (-0.5, 2.5), false);
    draw_premises(&mut ax, palette);

    let mut ax = fig.axes(panels[1], (0.5, 3.5), (-0.5, 2.5), true);
    draw_deduction(&mut ax, palette);

    fig
}

fn draw_premises(ax: &mut Axes<'_>, palette: Palette) {
    ax.title("Prémisses", PANEL_TITLE_SIZE);
    let colors = [palette.accent, palette.success, palette.warning];

    for (i, (premise, color)) in PREMISES.iter().zip(colors).enumerate() {
        let y = 2.0 - i as f32 * 0.8;
        ax.rect(
            (0.1, y - 0.3),
            (3.9, y + 0.3),
            6.0,
            Some((color, 0.2)),
            Some((color, 2.0)),
        );
        ax.text((2.0, y), premise, TextStyle::new(14.0, color));
        if i + 1 < PREMISES.len() {
            ax.arrow((2.0, y - 0.3), (2.0, y - 0.5), 1.5, color);
        }
    }
}

/// Endpoints of an edge between two node centers, trimmed to the circles.
fn edge_between(from: (f32, f32), to: (f32, f32)) -> ((f32, f32), (f32, f32)) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= 2.0 * NODE_RADIUS {
        return (from, to);
    }
    let (ux, uy) = (dx / len * NODE_RADIUS, dy / len * NODE_RADIUS);
    ((from.0 + ux, from.1 + uy), (to.0 - ux, to.1 - uy))
}

fn draw_deduction(ax: &mut Axes<'_>, palette: Palette) {
    ax.title("Déduction Logique", PANEL_TITLE_SIZE);

    for (name, center) in NODES {
        ax.fill_circle(center, NODE_RADIUS, palette.accent, 0.7);
        ax.stroke_circle(center, NODE_RADIUS, 3.0, Palette::WHITE, 1.0);
        ax.text(center, name, TextStyle::new(16.0, Palette::WHITE));
    }

    let [(_, a), (_, b), (_, c)] = NODES;
    let relation = TextStyle::new(12.0, Palette::BLACK).boxed(Palette::WHITE, 0.8);

    let (from, to) = edge_between(a, b);
    ax.arrow(from, to, 3.0, palette.success);
    ax.text((1.5, 1.7), "A > B", relation);

    let (from, to) = edge_between(b, c);
    ax.arrow(from, to, 3.0, palette.success);
    ax.text((2.5, 0.7), "B > C", relation);

    let (from, to) = edge_between(a, c);
    ax.arrow(from, to, 4.0, palette.error);
    ax.text(
        (2.0, 1.2),
        "A > C\n(Transitivité)",
        TextStyle::new(14.0, palette.error).boxed(palette.error, 0.1),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_trimmed_to_node_boundaries() {
        let (from, to) = edge_between((0.0, 0.0), (3.0, 4.0));
        assert!((from.0 - 0.18).abs() < 1e-5);
        assert!((from.1 - 0.24).abs() < 1e-5);
        assert!((to.0 - 2.82).abs() < 1e-5);
        assert!((to.1 - 3.76).abs() < 1e-5);
    }

    #[test]
    fn test_overlapping_nodes_keep_centers() {
        let (from, to) = edge_between((0.0, 0.0), (0.5, 0.0));
        assert_eq!(from, (0.0, 0.0));
        assert_eq!(to, (0.5, 0.0));
    }

    #[test]
    fn test_graph_is_a_chain() {
        let xs: Vec<f32> = NODES.iter().map(|(_, (x, _))| *x).collect();
        let ys: Vec<f32> = NODES.iter().map(|(_, (_, y))| *y).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
        assert!(ys.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_draw_uses_figure_size() {
        assert_eq!(draw(Palette::default(), 10).size(), (160, 80));
    }
}
