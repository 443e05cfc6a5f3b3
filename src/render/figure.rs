use anyhow::Result;
use image::{Rgb, RgbImage};

use super::canvas::{Canvas, Point};
use super::encode::to_data_uri;
use super::font::{text_width, CHAR_H, GLYPH_H};
use super::style::Palette;

/// Upper bound on grid lines per axis.
const MAX_GRID_LINES: usize = 50;

/// Pixel rectangle, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// How a label sits relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    Left,
}

/// Text appearance: size in points, color, optional rounded backdrop.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f32,
    pub color: Rgb<u8>,
    pub anchor: Anchor,
    pub backdrop: Option<(Rgb<u8>, f32)>,
}

impl TextStyle {
    pub fn new(size: f32, color: Rgb<u8>) -> Self {
        Self {
            size,
            color,
            anchor: Anchor::Center,
            backdrop: None,
        }
    }

    pub fn boxed(mut self, fill: Rgb<u8>, alpha: f32) -> Self {
        self.backdrop = Some((fill, alpha));
        self
    }

    pub fn left(mut self) -> Self {
        self.anchor = Anchor::Left;
        self
    }
}

/// A whole image: title band on top, panels laid out below.
pub struct Figure {
    canvas: Canvas,
    palette: Palette,
    dpi: u32,
    top: f32,
}

impl Figure {
    /// New figure of `width` x `height` inches.
    pub fn new(width: f32, height: f32, dpi: u32, palette: Palette) -> Self {
        let px = |inches: f32| (inches * dpi as f32).round().max(1.0) as u32;
        Self {
            canvas: Canvas::new(px(width), px(height), palette.background),
            palette,
            dpi,
            top: 0.0,
        }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    /// Integer glyph scale for a font size in points.
    pub fn font_scale(&self, size: f32) -> u32 {
        font_scale(size, self.dpi)
    }

    /// Centered title above all panels. Panels created afterwards start
    /// below it.
    pub fn suptitle(&mut self, text: &str, size: f32) {
        let scale = self.font_scale(size);
        let line_h = (CHAR_H * scale) as f32;
        let center = (self.canvas.width() as f32 / 2.0, line_h);
        draw_label(&mut self.canvas, center, text, TextStyle::new(size, Palette::BLACK), scale);
        self.top = line_h * 2.0;
    }

    /// Boxed note centered along the bottom edge.
    pub fn footnote(&mut self, text: &str, size: f32, fill: Rgb<u8>) {
        let scale = self.font_scale(size);
        let y = self.canvas.height() as f32 - (CHAR_H * scale) as f32 * 1.5;
        let center = (self.canvas.width() as f32 / 2.0, y);
        let style = TextStyle::new(size, Palette::BLACK).boxed(fill, 0.8);
        draw_label(&mut self.canvas, center, text, style, scale);
    }

    /// `cols` equal panels side by side under the title band.
    pub fn subplots(&self, cols: usize) -> Vec<Rect> {
        let cols = cols.max(1);
        let margin = self.canvas.width() as f32 * 0.03;
        let width = (self.canvas.width() as f32 - margin * (cols as f32 + 1.0)) / cols as f32;
        let y = self.top + margin * 0.5;
        let h = self.canvas.height() as f32 - y - margin;
        (0..cols)
            .map(|i| Rect {
                x: margin + i as f32 * (width + margin),
                y,
                w: width,
                h,
            })
            .collect()
    }

    /// Axes over `rect` mapping `xlim` x `ylim` (y pointing up). With
    /// `equal` set, one data unit has the same length on both axes.
    pub fn axes(&mut self, rect: Rect, xlim: (f32, f32), ylim: (f32, f32), equal: bool) -> Axes<'_> {
        Axes::new(&mut self.canvas, self.dpi, rect, xlim, ylim, equal)
    }

    pub fn into_image(self) -> RgbImage {
        self.canvas.into_image()
    }

    pub fn to_data_uri(self) -> Result<String> {
        to_data_uri(&self.into_image())
    }
}

/// A panel with its own data coordinates.
pub struct Axes<'a> {
    canvas: &'a mut Canvas,
    dpi: u32,
    rect: Rect,
    plot: Rect,
    xlim: (f32, f32),
    ylim: (f32, f32),
    sx: f32,
    sy: f32,
}

impl<'a> Axes<'a> {
    fn new(
        canvas: &'a mut Canvas,
        dpi: u32,
        rect: Rect,
        xlim: (f32, f32),
        ylim: (f32, f32),
        equal: bool,
    ) -> Self {
        // Top band of the panel is kept for the panel title
        let band = (CHAR_H * font_scale(16.0, dpi)) as f32 * 2.5;
        let mut plot = Rect {
            x: rect.x,
            y: rect.y + band,
            w: rect.w,
            h: (rect.h - band).max(1.0),
        };
        let xr = (xlim.1 - xlim.0).abs().max(f32::EPSILON);
        let yr = (ylim.1 - ylim.0).abs().max(f32::EPSILON);
        let (mut sx, mut sy) = (plot.w / xr, plot.h / yr);
        if equal {
            let s = sx.min(sy);
            plot.x += (plot.w - s * xr) / 2.0;
            plot.y += (plot.h - s * yr) / 2.0;
            plot.w = s * xr;
            plot.h = s * yr;
            sx = s;
            sy = s;
        }
        Self {
            canvas,
            dpi,
            rect,
            plot,
            xlim,
            ylim,
            sx,
            sy,
        }
    }

    pub fn xlim(&self) -> (f32, f32) {
        self.xlim
    }

    pub fn ylim(&self) -> (f32, f32) {
        self.ylim
    }

    /// Data to pixel coordinates.
    pub fn to_px(&self, (x, y): Point) -> Point {
        (
            self.plot.x + (x - self.xlim.0) * self.sx,
            self.plot.y + self.plot.h - (y - self.ylim.0) * self.sy,
        )
    }

    /// Points to pixels at this figure's dpi.
    fn pt(&self, points: f32) -> f32 {
        points * self.dpi as f32 / 72.0
    }

    pub fn title(&mut self, text: &str, size: f32) {
        let scale = font_scale(size, self.dpi);
        let center = (self.rect.x + self.rect.w / 2.0, self.rect.y + (CHAR_H * scale) as f32);
        draw_label(self.canvas, center, text, TextStyle::new(size, Palette::BLACK), scale);
    }

    pub fn line(&mut self, a: Point, b: Point, width: f32, color: Rgb<u8>, alpha: f32) {
        let (a, b) = (self.to_px(a), self.to_px(b));
        let w = self.pt(width);
        self.canvas.line(a, b, w, color, alpha);
    }

    pub fn dashed_line(&mut self, a: Point, b: Point, width: f32, color: Rgb<u8>, alpha: f32) {
        let (a, b) = (self.to_px(a), self.to_px(b));
        let (w, dash) = (self.pt(width), self.pt(4.0));
        self.canvas.dashed_line(a, b, w, dash, color, alpha);
    }

    pub fn polyline(&mut self, points: &[Point], width: f32, color: Rgb<u8>, alpha: f32) {
        let px: Vec<Point> = points.iter().map(|p| self.to_px(*p)).collect();
        let w = self.pt(width);
        self.canvas.polyline(&px, w, color, alpha);
    }

    /// Horizontal line across the whole x range.
    pub fn hline(&mut self, y: f32, width: f32, color: Rgb<u8>, alpha: f32) {
        self.line((self.xlim.0, y), (self.xlim.1, y), width, color, alpha);
    }

    /// Vertical line across the whole y range.
    pub fn vline(&mut self, x: f32, width: f32, color: Rgb<u8>, alpha: f32) {
        self.line((x, self.ylim.0), (x, self.ylim.1), width, color, alpha);
    }

    /// Disk with a radius in data units (x scale).
    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Rgb<u8>, alpha: f32) {
        let c = self.to_px(center);
        self.canvas.fill_circle(c, radius * self.sx, color, alpha);
    }

    /// Union of disks, filled once.
    pub fn fill_circles(&mut self, disks: &[(Point, f32)], color: Rgb<u8>, alpha: f32) {
        let px: Vec<(Point, f32)> = disks
            .iter()
            .map(|(c, r)| (self.to_px(*c), r * self.sx))
            .collect();
        self.canvas.fill_circles(&px, color, alpha);
    }

    pub fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Rgb<u8>, alpha: f32) {
        let c = self.to_px(center);
        let w = self.pt(width);
        self.canvas.stroke_circle(c, radius * self.sx, w, color, alpha);
    }

    /// Round marker with a radius in points.
    pub fn marker(&mut self, center: Point, radius: f32, color: Rgb<u8>, alpha: f32) {
        let c = self.to_px(center);
        let r = self.pt(radius);
        self.canvas.fill_circle(c, r, color, alpha);
    }

    /// Diamond marker with a half-diagonal in points.
    pub fn diamond(&mut self, center: Point, radius: f32, color: Rgb<u8>) {
        let (cx, cy) = self.to_px(center);
        let r = self.pt(radius);
        self.canvas
            .fill_polygon(&[(cx, cy - r), (cx + r, cy), (cx, cy + r), (cx - r, cy)], color, 1.0);
    }

    /// Square marker with a half-side in points.
    pub fn square_marker(&mut self, center: Point, half: f32, color: Rgb<u8>) {
        let (cx, cy) = self.to_px(center);
        let h = self.pt(half);
        self.canvas.fill_rect((cx - h, cy - h), (cx + h, cy + h), color, 1.0);
    }

    /// Axis-aligned box between two data corners, filled and/or outlined.
    /// `round` is the corner radius in points.
    pub fn rect(
        &mut self,
        a: Point,
        b: Point,
        round: f32,
        fill: Option<(Rgb<u8>, f32)>,
        edge: Option<(Rgb<u8>, f32)>,
    ) {
        let (pa, pb) = (self.to_px(a), self.to_px(b));
        let lo = (pa.0.min(pb.0), pa.1.min(pb.1));
        let hi = (pa.0.max(pb.0), pa.1.max(pb.1));
        let radius = self.pt(round);
        if let Some((color, alpha)) = fill {
            self.canvas.fill_rounded_rect(lo, hi, radius, color, alpha);
        }
        if let Some((color, width)) = edge {
            let w = self.pt(width);
            self.canvas.stroke_rounded_rect(lo, hi, radius, w, color, 1.0);
        }
    }

    pub fn fill_polygon(&mut self, points: &[Point], color: Rgb<u8>, alpha: f32) {
        let px: Vec<Point> = points.iter().map(|p| self.to_px(*p)).collect();
        self.canvas.fill_polygon(&px, color, alpha);
    }

    /// Straight arrow from `from` to `to` with a filled head at `to`.
    pub fn arrow(&mut self, from: Point, to: Point, width: f32, color: Rgb<u8>) {
        let (a, b) = (self.to_px(from), self.to_px(to));
        let head = self.pt(width * 3.0 + 4.0);
        draw_arrow_px(self.canvas, a, b, self.pt(width), head, color);
    }

    /// Arrow of `length` pixels-per-data-unit centered on `center`, pointing
    /// at `angle` degrees counter-clockwise from +x. Stands in for arrow glyphs.
    pub fn arrow_glyph(&mut self, center: Point, angle: f32, length: f32, width: f32, color: Rgb<u8>) {
        let (dx, dy) = (angle.to_radians().cos(), angle.to_radians().sin());
        let half = length / 2.0;
        let from = (center.0 - dx * half, center.1 - dy * half);
        let to = (center.0 + dx * half, center.1 + dy * half);
        let (a, b) = (self.to_px(from), self.to_px(to));
        let len_px = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        draw_arrow_px(self.canvas, a, b, self.pt(width), len_px * 0.4, color);
    }

    pub fn text(&mut self, at: Point, text: &str, style: TextStyle) {
        let p = self.to_px(at);
        let scale = font_scale(style.size, self.dpi);
        draw_label(self.canvas, p, text, style, scale);
    }

    /// Light grid every `step` data units on both axes, with tick labels.
    pub fn grid(&mut self, xstep: f32, ystep: f32, alpha: f32) {
        let scale = font_scale(9.0, self.dpi);
        let tick = TextStyle::new(9.0, Palette::GRAY);
        if xstep > 0.0 {
            let first = (self.xlim.0 / xstep).ceil();
            for k in 0..MAX_GRID_LINES {
                let x = (first + k as f32) * xstep;
                if x > self.xlim.1 + f32::EPSILON {
                    break;
                }
                self.vline(x, 0.8, Palette::GRAY, alpha);
                let (px, _) = self.to_px((x, self.ylim.0));
                let below = self.plot.y + self.plot.h + (CHAR_H * scale) as f32;
                draw_label(self.canvas, (px, below), &format_tick(x), tick, scale);
            }
        }
        if ystep > 0.0 {
            let first = (self.ylim.0 / ystep).ceil();
            for k in 0..MAX_GRID_LINES {
                let y = (first + k as f32) * ystep;
                if y > self.ylim.1 + f32::EPSILON {
                    break;
                }
                self.hline(y, 0.8, Palette::GRAY, alpha);
                let (_, py) = self.to_px((self.xlim.0, y));
                let label = format_tick(y);
                let left = self.plot.x - text_width(&label, scale) as f32 / 2.0 - 4.0;
                draw_label(self.canvas, (left, py), &label, tick, scale);
            }
        }
    }

    /// Axis captions under the plot and left of it.
    pub fn axis_labels(&mut self, xlabel: &str, ylabel: &str) {
        let scale = font_scale(11.0, self.dpi);
        let style = TextStyle::new(11.0, Palette::INK);
        let below = self.plot.y + self.plot.h + (CHAR_H * scale) as f32 * 2.5;
        draw_label(self.canvas, (self.plot.x + self.plot.w / 2.0, below), xlabel, style, scale);
        let left = (self.plot.x - text_width(ylabel, scale) as f32 / 2.0 - 36.0).max(self.rect.x);
        draw_label(self.canvas, (left, self.plot.y - (CHAR_H * scale) as f32), ylabel, style, scale);
    }

    /// Small legend box in the top-right corner: one colored swatch per entry.
    pub fn legend(&mut self, entries: &[(Rgb<u8>, &str)]) {
        let scale = font_scale(10.0, self.dpi);
        let line_h = (CHAR_H * scale) as f32 * 1.4;
        let widest = entries
            .iter()
            .map(|(_, label)| text_width(label, scale))
            .max()
            .unwrap_or(0) as f32;
        let swatch = line_h * 1.2;
        let w = widest + swatch + 24.0;
        let h = line_h * entries.len() as f32 + 10.0;
        let x0 = self.plot.x + self.plot.w - w - 8.0;
        let y0 = self.plot.y + 8.0;
        self.canvas
            .fill_rounded_rect((x0, y0), (x0 + w, y0 + h), 4.0, Palette::WHITE, 0.85);
        self.canvas
            .stroke_rounded_rect((x0, y0), (x0 + w, y0 + h), 4.0, 1.0, Palette::GRAY, 0.6);
        for (i, (color, label)) in entries.iter().enumerate() {
            let cy = y0 + 5.0 + line_h * (i as f32 + 0.5);
            self.canvas
                .line((x0 + 8.0, cy), (x0 + 8.0 + swatch, cy), 3.0, *color, 1.0);
            let style = TextStyle::new(10.0, Palette::INK).left();
            draw_label(self.canvas, (x0 + 14.0 + swatch, cy), label, style, scale);
        }
    }
}

fn font_scale(size: f32, dpi: u32) -> u32 {
    ((size * dpi as f32 / 72.0 / GLYPH_H as f32).round() as u32).max(1)
}

fn format_tick(v: f32) -> String {
    if v.fract().abs() < 0.01 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.1}", v)
    }
}

fn draw_arrow_px(canvas: &mut Canvas, a: Point, b: Point, width: f32, head: f32, color: Rgb<u8>) {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len < f32::EPSILON {
        return;
    }
    let (ux, uy) = (dx / len, dy / len);
    let head = head.min(len * 0.6);
    let base = (b.0 - ux * head, b.1 - uy * head);
    canvas.line(a, base, width, color, 1.0);
    let spread = head * 0.5;
    canvas.fill_polygon(
        &[
            b,
            (base.0 - uy * spread, base.1 + ux * spread),
            (base.0 + uy * spread, base.1 - ux * spread),
        ],
        color,
        1.0,
    );
}

/// Draw possibly multi-line text around `at`, with an optional backdrop.
fn draw_label(canvas: &mut Canvas, at: Point, text: &str, style: TextStyle, scale: u32) {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return;
    }
    let line_h = (CHAR_H * scale) as f32;
    let glyph_h = (GLYPH_H * scale) as f32;
    let block_h = line_h * (lines.len() as f32 - 1.0) + glyph_h;
    let widest = lines
        .iter()
        .map(|l| text_width(l, scale))
        .max()
        .unwrap_or(0) as f32;
    let top = at.1 - block_h / 2.0;
    let left = match style.anchor {
        Anchor::Center => at.0 - widest / 2.0,
        Anchor::Left => at.0,
    };

    if let Some((fill, alpha)) = style.backdrop {
        let pad = 4.0 * scale as f32;
        let lo = (left - pad, top - pad);
        let hi = (left + widest + pad, top + block_h + pad);
        canvas.fill_rounded_rect(lo, hi, pad, fill, alpha);
    }

    for (i, line) in lines.iter().enumerate() {
        let w = text_width(line, scale) as f32;
        let x = match style.anchor {
            Anchor::Center => at.0 - w / 2.0,
            Anchor::Left => left,
        };
        canvas.draw_text(x, top + line_h * i as f32, line, scale, style.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure() -> Figure {
        Figure::new(4.0, 2.0, 50, Palette::default())
    }

    #[test]
    fn test_figure_size_from_inches() {
        assert_eq!(figure().size(), (200, 100));
    }

    #[test]
    fn test_font_scale() {
        assert_eq!(font_scale(14.0, 60), 2);
        assert_eq!(font_scale(10.0, 60), 1);
        assert_eq!(font_scale(1.0, 60), 1);
        assert_eq!(font_scale(28.0, 60), 3);
    }

    #[test]
    fn test_subplots_side_by_side() {
        let fig = figure();
        let panels = fig.subplots(2);
        assert_eq!(panels.len(), 2);
        assert!(panels[0].x + panels[0].w < panels[1].x);
        assert_eq!(panels[0].w, panels[1].w);
        assert!(panels[1].x + panels[1].w <= 200.0);
    }

    #[test]
    fn test_suptitle_pushes_panels_down() {
        let mut fig = figure();
        let before = fig.subplots(1)[0].y;
        fig.suptitle("Titre", 18.0);
        assert!(fig.subplots(1)[0].y > before);
    }

    #[test]
    fn test_axes_mapping_y_up() {
        let mut fig = figure();
        let rect = Rect { x: 0.0, y: 0.0, w: 200.0, h: 100.0 };
        let axes = fig.axes(rect, (0.0, 10.0), (0.0, 10.0), false);
        let (x0, y0) = axes.to_px((0.0, 0.0));
        let (x1, y1) = axes.to_px((10.0, 10.0));
        assert!(x1 > x0);
        assert!(y1 < y0);
        assert_eq!(x0, 0.0);
        assert_eq!(x1, 200.0);
    }

    #[test]
    fn test_equal_aspect_uses_same_scale() {
        let mut fig = figure();
        let rect = Rect { x: 0.0, y: 0.0, w: 200.0, h: 100.0 };
        let axes = fig.axes(rect, (0.0, 4.0), (0.0, 1.0), true);
        let (x0, y0) = axes.to_px((0.0, 0.0));
        let (x1, _) = axes.to_px((1.0, 0.0));
        let (_, y1) = axes.to_px((0.0, 1.0));
        assert!(((x1 - x0) - (y0 - y1)).abs() < 1e-3);
    }

    #[test]
    fn test_drawing_changes_pixels() {
        let mut fig = figure();
        let bg = fig.palette().background;
        let rect = fig.subplots(1)[0];
        {
            let mut axes = fig.axes(rect, (0.0, 1.0), (0.0, 1.0), false);
            axes.fill_circle((0.5, 0.5), 0.2, Palette::BLACK, 1.0);
        }
        let img = fig.into_image();
        assert!(img.pixels().any(|p| *p != bg));
    }

    #[test]
    fn test_grid_finishes_when_step_is_below_precision() {
        let mut fig = figure();
        let rect = Rect { x: 0.0, y: 0.0, w: 200.0, h: 100.0 };
        let mut axes = fig.axes(rect, (9.0e18, 9.0e18 + 1.0e13), (0.0, 1.0), false);
        axes.grid(1.0, 0.25, 0.3);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(3.0), "3");
        assert_eq!(format_tick(-2.0), "-2");
        assert_eq!(format_tick(0.5), "0.5");
    }
}
