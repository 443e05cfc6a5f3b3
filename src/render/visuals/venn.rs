use super::{PANEL_TITLE_SIZE, TITLE_SIZE};
use crate::render::figure::{Axes, Figure, TextStyle};
use crate::render::style::Palette;

pub const FIGSIZE: (f32, f32) = (16.0, 8.0);

const SET_A: ((f32, f32), f32) = ((0.3, 0.5), 0.3);
const SET_B: ((f32, f32), f32) = ((0.7, 0.5), 0.3);

/// Cardinalities shown on the diagram.
const SIZE_A: u32 = 3;
const SIZE_B: u32 = 4;
const SIZE_INTERSECTION: u32 = 1;

/// |A ∪ B| by inclusion-exclusion.
pub fn union_size(a: u32, b: u32, both: u32) -> u32 {
    (a + b).saturating_sub(both)
}

/// Two-set Venn diagram beside a step-by-step inclusion-exclusion panel.
pub fn draw(palette: Palette, dpi: u32) -> Figure {
    let mut fig = Figure::new(FIGSIZE.0, FIGSIZE.1, dpi, palette);
    fig.suptitle("Principe d'Inclusion-Exclusion", TITLE_SIZE);
    let panels = fig.subplots(2);

    let mut ax = fig.axes(panels[0], (-0.1, 1.1), (0.0, 1.0), true);
    draw_sets(&mut ax, palette);

    let mut ax = fig.axes(panels[1], (0.0, 1.0), (0.0, 1.0), false);
    draw_calculation(&mut ax, palette);

    fig
}

fn draw_sets(ax: &mut Axes<'_>, palette: Palette) {
    ax.title("Ensembles A et B", PANEL_TITLE_SIZE);

    ax.fill_circle(SET_A.0, SET_A.1, palette.accent, 0.6);
    ax.fill_circle(SET_B.0, SET_B.1, palette.success, 0.6);

    // Union overlay: tinted once over both disks, outlined on both circles
    ax.fill_circles(&[SET_A, SET_B], palette.error, 0.2);
    ax.stroke_circle(SET_A.0, SET_A.1, 3.0, palette.error, 1.0);
    ax.stroke_circle(SET_B.0, SET_B.1, 3.0, palette.error, 1.0);

    ax.text(
        (0.15, 0.5),
        &format!("A\n|A|={}", SIZE_A),
        TextStyle::new(14.0, Palette::WHITE).boxed(palette.accent, 1.0),
    );
    ax.text(
        (0.85, 0.5),
        &format!("B\n|B|={}", SIZE_B),
        TextStyle::new(14.0, Palette::WHITE).boxed(palette.success, 1.0),
    );
    ax.text(
        (0.5, 0.5),
        &format!("A∩B\n|A∩B|={}", SIZE_INTERSECTION),
        TextStyle::new(12.0, Palette::WHITE).boxed(palette.warning, 1.0),
    );
    ax.text((0.5, 0.1), "|A∪B| = ?", TextStyle::new(16.0, palette.error));
}

fn draw_calculation(ax: &mut Axes<'_>, palette: Palette) {
    ax.title("Calcul Inclusion-Exclusion", PANEL_TITLE_SIZE);

    let answer = union_size(SIZE_A, SIZE_B, SIZE_INTERSECTION);
    let steps = [
        "1. Formule: |A∪B| = |A|+|B|-|A∩B|".to_string(),
        format!("2. Substitution: |A∪B| = {} + {} - {}", SIZE_A, SIZE_B, SIZE_INTERSECTION),
        format!("3. Calcul: |A∪B| = {} - {}", SIZE_A + SIZE_B, SIZE_INTERSECTION),
        format!("4. Résultat: |A∪B| = {}", answer),
    ];

    for (i, (step, color)) in steps.iter().zip(palette.cycle()).enumerate() {
        let y = 0.8 - i as f32 * 0.15;
        ax.rect(
            (0.05, y - 0.05),
            (0.95, y + 0.05),
            4.0,
            Some((color, 0.1)),
            Some((color, 2.0)),
        );
        ax.text((0.5, y), step, TextStyle::new(14.0, color));
    }

    ax.rect(
        (0.2, 0.05),
        (0.8, 0.2),
        6.0,
        Some((palette.success, 0.3)),
        Some((palette.success, 3.0)),
    );
    ax.text(
        (0.5, 0.125),
        &format!("RÉPONSE: {} éléments", answer),
        TextStyle::new(16.0, palette.success),
    );
}
