use image::Rgb;

use super::{PANEL_TITLE_SIZE, TITLE_SIZE};
use crate::render::figure::{Axes, Figure, TextStyle};
use crate::render::style::Palette;

pub const FIGSIZE_3D: (f32, f32) = (16.0, 8.0);
pub const FIGSIZE_4D: (f32, f32) = (18.0, 10.0);

pub type Vec3 = [f32; 3];

/// Unit cube: bottom face then top face, both counter-clockwise.
pub const UNIT_CUBE: [Vec3; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Vertex pairs of the twelve cube edges.
#[rustfmt::skip]
pub const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Whether the question asks about four dimensions.
pub fn is_four_dimensional(content: &str) -> bool {
    let content = content.to_lowercase();
    content.contains("4d") || content.contains("4 dimension")
}

/// Rotate row vectors by `angle_x` about x then `angle_y` about y
/// (degrees) and drop z.
pub fn project_3d(vertices: &[Vec3], angle_x: f32, angle_y: f32) -> Vec<(f32, f32)> {
    let (sx, cx) = angle_x.to_radians().sin_cos();
    let (sy, cy) = angle_y.to_radians().sin_cos();
    vertices
        .iter()
        .map(|&[x, y, z]| {
            // v @ Rx
            let (u0, u1, u2) = (x, y * cx + z * sx, -y * sx + z * cx);
            // (v @ Rx) @ Ry, first two columns
            (u0 * cy - u2 * sy, u1)
        })
        .collect()
}

/// Shrink factor for a cube sitting at depth `w` along the fourth axis.
fn perspective(w: f32) -> f32 {
    0.7 + w * 0.3
}

fn scaled(vertices: &[Vec3], factor: f32) -> Vec<Vec3> {
    vertices
        .iter()
        .map(|v| [v[0] * factor, v[1] * factor, v[2] * factor])
        .collect()
}

/// Rotate in the xy plane by `degrees`, then shift along x.
fn rotate_xy(vertices: &[Vec3], degrees: f32, shift: f32) -> Vec<Vec3> {
    let (s, c) = degrees.to_radians().sin_cos();
    vertices
        .iter()
        .map(|&[x, y, z]| [c * x - s * y + shift, s * x + c * y, z])
        .collect()
}

fn xy(vertices: &[Vec3]) -> Vec<(f32, f32)> {
    vertices.iter().map(|v| (v[0], v[1])).collect()
}

fn draw_wireframe(ax: &mut Axes<'_>, vertices: &[(f32, f32)], color: Rgb<u8>, alpha: f32, width: f32) {
    for &(a, b) in &CUBE_EDGES {
        ax.line(vertices[a], vertices[b], width, color, alpha);
    }
}

/// Cube before and after a rotation, or the tesseract walkthrough when the
/// content mentions four dimensions.
pub fn draw(content: &str, palette: Palette, dpi: u32) -> Figure {
    if is_four_dimensional(content) {
        draw_4d(palette, dpi)
    } else {
        draw_3d(palette, dpi)
    }
}

pub fn draw_3d(palette: Palette, dpi: u32) -> Figure {
    let mut fig = Figure::new(FIGSIZE_3D.0, FIGSIZE_3D.1, dpi, palette);
    fig.suptitle("Transformation Spatiale 3D", TITLE_SIZE);
    let panels = fig.subplots(2);

    let before = project_3d(&UNIT_CUBE, 30.0, 45.0);
    let after: Vec<(f32, f32)> = project_3d(&UNIT_CUBE, 60.0, 120.0)
        .into_iter()
        .map(|(x, y)| (x * 1.2, y * 1.2))
        .collect();

    let mut ax = fig.axes(panels[0], (-0.5, 1.5), (-0.5, 1.5), true);
    ax.title("Objet Original", PANEL_TITLE_SIZE);
    draw_wireframe(&mut ax, &before, palette.accent, 1.0, 2.0);
    for &v in &before {
        ax.marker(v, 4.0, palette.success, 1.0);
    }

    let mut ax = fig.axes(panels[1], (-0.5, 1.5), (-0.5, 1.5), true);
    ax.title("Après Transformation", PANEL_TITLE_SIZE);
    draw_wireframe(&mut ax, &after, palette.warning, 1.0, 2.0);
    for &v in &after {
        ax.marker(v, 4.0, palette.error, 1.0);
    }
    // Where each vertex moved
    for (&from, &to) in before.iter().zip(&after) {
        ax.arrow(from, to, 1.0, Palette::GRAY);
    }

    fig
}

pub fn draw_4d(palette: Palette, dpi: u32) -> Figure {
    let mut fig = Figure::new(FIGSIZE_4D.0, FIGSIZE_4D.1, dpi, palette);
    fig.suptitle(
        "Transformation 4D : Hypercube → Projection 3D → Projection 2D",
        TITLE_SIZE,
    );
    let panels = fig.subplots(3);
    let colors = palette.cycle();

    // Two cubes, one per end of the w axis
    let cube = scaled(&UNIT_CUBE, 0.8);
    let near = scaled(&cube, perspective(0.0));
    let shifted: Vec<Vec3> = cube
        .iter()
        .map(|v| [v[0] + 0.5, v[1] + 0.5, v[2] + 0.3])
        .collect();
    let far = scaled(&shifted, perspective(1.0));

    {
        let mut ax = fig.axes(panels[0], (-0.5, 2.0), (-0.5, 2.0), false);
        ax.title("Hypercube 4D (Tesseract)\nConceptuel", 14.0);
        let (p, q) = (xy(&near), xy(&far));
        draw_wireframe(&mut ax, &p, palette.accent, 0.7, 2.0);
        draw_wireframe(&mut ax, &q, palette.success, 0.7, 2.0);
        for (&a, &b) in p.iter().zip(&q) {
            ax.dashed_line(a, b, 1.0, palette.warning, 0.5);
        }
        ax.text(
            (0.5, -0.3),
            "2 cubes 3D\nconnectés = Hypercube 4D",
            TextStyle::new(12.0, Palette::BLACK).boxed(palette.accent, 0.2),
        );
    }

    let stages: Vec<(f32, Vec<Vec3>)> = (0..4)
        .map(|i| {
            let degrees = 30.0 * i as f32;
            (degrees, rotate_xy(&near, degrees, i as f32 * 0.3))
        })
        .collect();

    {
        let mut ax = fig.axes(panels[1], (-0.2, 1.4), (-1.0, 1.5), false);
        ax.title("Rotation 4D\n(axes xy, zw)", 14.0);
        for (i, (degrees, vertices)) in stages.iter().enumerate() {
            let color = colors[i];
            draw_wireframe(&mut ax, &xy(vertices), color, 0.8, 2.0);
            ax.text(
                (i as f32 * 0.3 + 0.4, -0.4),
                &format!("{}°", *degrees as i32),
                TextStyle::new(10.0, color),
            );
        }
        for i in 0..3 {
            let i = i as f32;
            ax.arrow((i * 0.3 + 0.5, 0.5), ((i + 1.0) * 0.3 - 0.1, 0.5), 2.0, Palette::GRAY);
        }
        ax.text(
            (0.6, -0.8),
            "Rotation progressive dans l'hyperespace",
            TextStyle::new(12.0, Palette::BLACK).boxed(palette.success, 0.2),
        );
    }

    {
        let mut ax = fig.axes(panels[2], (-0.3, 1.1), (-0.8, 1.1), true);
        ax.title("Projection 2D finale\n(ce qu'on voit)", 14.0);
        let last = stages.last().map(|(_, v)| xy(v)).unwrap_or_default();
        let face: Vec<(f32, f32)> = last.iter().take(4).copied().collect();
        if face.len() == 4 {
            let mut outline = face.clone();
            outline.push(face[0]);
            ax.fill_polygon(&face, palette.error, 0.1);
            ax.polyline(&outline, 3.0, palette.error, 0.8);
        }
        for (i, &(x, y)) in face.iter().enumerate() {
            ax.marker((x, y), 4.0, palette.error, 0.8);
            ax.text(
                (x + 0.05, y + 0.05),
                &format!("V{}", i + 1),
                TextStyle::new(10.0, palette.error).left(),
            );
        }
        ax.text(
            (0.4, -0.6),
            "Résultat final :\nProjection 2D de la rotation 4D",
            TextStyle::new(12.0, Palette::BLACK).boxed(palette.error, 0.2),
        );
    }

    fig.footnote(
        "En 4D, on peut faire tourner un objet selon 6 axes différents (xy, xz, xw, yz, yw, zw)",
        12.0,
        Palette::PANEL_NOTE,
    );
    fig
}
