use image::{Rgb, RgbImage};

use super::font::{glyph, CHAR_W, GLYPH_W};

/// Pixel-space point, origin top-left, y down.
pub type Point = (f32, f32);

/// Raster surface with alpha-blended, lightly anti-aliased primitives.
///
/// Every primitive visits each pixel at most once, so translucent fills
/// never darken where their own coverage overlaps.
pub struct Canvas {
    img: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            img: RgbImage::from_pixel(width.max(1), height.max(1), background),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.img
    }

    pub fn into_image(self) -> RgbImage {
        self.img
    }

    // --- Primitives ---

    #[inline]
    fn blend(&mut self, x: i64, y: i64, color: Rgb<u8>, alpha: f32) {
        if x < 0 || y < 0 || x >= self.img.width() as i64 || y >= self.img.height() as i64 {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let px = self.img.get_pixel_mut(x as u32, y as u32);
        for c in 0..3 {
            let dst = px[c] as f32;
            px[c] = (dst + (color[c] as f32 - dst) * alpha).round() as u8;
        }
    }

    /// Visit every pixel of the (clipped) box, passing the pixel center.
    fn for_each_pixel(
        &mut self,
        (x0, y0): Point,
        (x1, y1): Point,
        mut coverage: impl FnMut(f32, f32) -> f32,
        color: Rgb<u8>,
        alpha: f32,
    ) {
        let w = self.img.width() as i64;
        let h = self.img.height() as i64;
        let xs = (x0.min(x1).floor() as i64).max(0);
        let xe = (x0.max(x1).ceil() as i64).min(w - 1);
        let ys = (y0.min(y1).floor() as i64).max(0);
        let ye = (y0.max(y1).ceil() as i64).min(h - 1);
        for y in ys..=ye {
            for x in xs..=xe {
                let c = coverage(x as f32 + 0.5, y as f32 + 0.5);
                if c > 0.0 {
                    self.blend(x, y, color, c.min(1.0) * alpha);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, a: Point, b: Point, color: Rgb<u8>, alpha: f32) {
        let (lx, hx) = (a.0.min(b.0), a.0.max(b.0));
        let (ly, hy) = (a.1.min(b.1), a.1.max(b.1));
        self.for_each_pixel(
            a,
            b,
            |x, y| {
                if x >= lx && x <= hx && y >= ly && y <= hy {
                    1.0
                } else {
                    0.0
                }
            },
            color,
            alpha,
        );
    }

    pub fn line(&mut self, a: Point, b: Point, width: f32, color: Rgb<u8>, alpha: f32) {
        let half = (width / 2.0).max(0.5);
        let pad = half + 1.0;
        self.for_each_pixel(
            (a.0.min(b.0) - pad, a.1.min(b.1) - pad),
            (a.0.max(b.0) + pad, a.1.max(b.1) + pad),
            |x, y| half + 0.5 - segment_distance((x, y), a, b),
            color,
            alpha,
        );
    }

    pub fn polyline(&mut self, points: &[Point], width: f32, color: Rgb<u8>, alpha: f32) {
        // Round joins come from the segment distance field; the shared vertex
        // gets blended twice, which is invisible at the widths used here.
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width, color, alpha);
        }
    }

    pub fn dashed_line(
        &mut self,
        a: Point,
        b: Point,
        width: f32,
        dash: f32,
        color: Rgb<u8>,
        alpha: f32,
    ) {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len = (dx * dx + dy * dy).sqrt();
        if len < f32::EPSILON || dash <= 0.0 {
            return;
        }
        let (ux, uy) = (dx / len, dy / len);
        let mut t = 0.0;
        while t < len {
            let end = (t + dash).min(len);
            self.line(
                (a.0 + ux * t, a.1 + uy * t),
                (a.0 + ux * end, a.1 + uy * end),
                width,
                color,
                alpha,
            );
            t += dash * 2.0;
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Rgb<u8>, alpha: f32) {
        self.fill_circles(&[(center, radius)], color, alpha);
    }

    /// Fill the union of several disks in one pass, so overlaps are not
    /// blended twice.
    pub fn fill_circles(&mut self, disks: &[(Point, f32)], color: Rgb<u8>, alpha: f32) {
        if disks.is_empty() {
            return;
        }
        let lo = disks.iter().fold((f32::INFINITY, f32::INFINITY), |acc, (c, r)| {
            (acc.0.min(c.0 - r - 1.0), acc.1.min(c.1 - r - 1.0))
        });
        let hi = disks.iter().fold((f32::NEG_INFINITY, f32::NEG_INFINITY), |acc, (c, r)| {
            (acc.0.max(c.0 + r + 1.0), acc.1.max(c.1 + r + 1.0))
        });
        self.for_each_pixel(
            lo,
            hi,
            |x, y| {
                disks
                    .iter()
                    .map(|(c, r)| 0.5 - (distance((x, y), *c) - r))
                    .fold(0.0, f32::max)
            },
            color,
            alpha,
        );
    }

    pub fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Rgb<u8>,
        alpha: f32,
    ) {
        let half = (width / 2.0).max(0.5);
        let pad = radius + half + 1.0;
        self.for_each_pixel(
            (center.0 - pad, center.1 - pad),
            (center.0 + pad, center.1 + pad),
            |x, y| half + 0.5 - (distance((x, y), center) - radius).abs(),
            color,
            alpha,
        );
    }

    pub fn fill_rounded_rect(
        &mut self,
        a: Point,
        b: Point,
        radius: f32,
        color: Rgb<u8>,
        alpha: f32,
    ) {
        let (center, half) = box_center_half(a, b);
        let radius = radius.min(half.0).min(half.1).max(0.0);
        self.for_each_pixel(
            (a.0 - 1.0, a.1 - 1.0),
            (b.0 + 1.0, b.1 + 1.0),
            |x, y| 0.5 - rounded_box_distance((x, y), center, half, radius),
            color,
            alpha,
        );
    }

    pub fn stroke_rounded_rect(
        &mut self,
        a: Point,
        b: Point,
        radius: f32,
        width: f32,
        color: Rgb<u8>,
        alpha: f32,
    ) {
        let (center, half) = box_center_half(a, b);
        let radius = radius.min(half.0).min(half.1).max(0.0);
        let stroke = (width / 2.0).max(0.5);
        let pad = stroke + 1.0;
        self.for_each_pixel(
            (a.0.min(b.0) - pad, a.1.min(b.1) - pad),
            (a.0.max(b.0) + pad, a.1.max(b.1) + pad),
            |x, y| stroke + 0.5 - rounded_box_distance((x, y), center, half, radius).abs(),
            color,
            alpha,
        );
    }

    /// Even-odd scanline fill sampled at pixel centers.
    pub fn fill_polygon(&mut self, points: &[Point], color: Rgb<u8>, alpha: f32) {
        if points.len() < 3 {
            return;
        }
        let w = self.img.width() as i64;
        let h = self.img.height() as i64;
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let ys = (min_y.floor() as i64).max(0);
        let ye = (max_y.ceil() as i64).min(h - 1);

        let mut crossings = Vec::new();
        for y in ys..=ye {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for i in 0..points.len() {
                let (p, q) = (points[i], points[(i + 1) % points.len()]);
                if (p.1 <= sy && q.1 > sy) || (q.1 <= sy && p.1 > sy) {
                    crossings.push(p.0 + (sy - p.1) / (q.1 - p.1) * (q.0 - p.0));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let xs = ((span[0] - 0.5).ceil() as i64).max(0);
                let xe = ((span[1] - 0.5).floor() as i64).min(w - 1);
                for x in xs..=xe {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// Draw a single line of text with its top-left corner at `(x, y)`.
    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, scale: u32, color: Rgb<u8>) {
        let scale = scale.max(1);
        let x0 = x.round() as i64;
        let y0 = y.round() as i64;
        let mut cursor = 0i64;
        for ch in text.chars() {
            let Some(bits) = glyph(ch) else {
                continue;
            };
            for (row, &mask) in bits.iter().enumerate() {
                for col in 0..GLYPH_W {
                    if mask & (0x10 >> col) == 0 {
                        continue;
                    }
                    let px = x0 + cursor + (col * scale) as i64;
                    let py = y0 + (row as u32 * scale) as i64;
                    for dy in 0..scale as i64 {
                        for dx in 0..scale as i64 {
                            self.blend(px + dx, py + dy, color, 1.0);
                        }
                    }
                }
            }
            cursor += (CHAR_W * scale) as i64;
        }
    }
}

fn distance(p: Point, q: Point) -> f32 {
    ((p.0 - q.0).powi(2) + (p.1 - q.1).powi(2)).sqrt()
}

fn segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    if len2 < f32::EPSILON {
        return distance(p, a);
    }
    let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0);
    distance(p, (a.0 + t * dx, a.1 + t * dy))
}

fn box_center_half(a: Point, b: Point) -> (Point, Point) {
    (
        ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0),
        ((a.0 - b.0).abs() / 2.0, (a.1 - b.1).abs() / 2.0),
    )
}

/// Signed distance to a rounded box: negative inside.
fn rounded_box_distance(p: Point, center: Point, half: Point, radius: f32) -> f32 {
    let qx = (p.0 - center.0).abs() - half.0 + radius;
    let qy = (p.1 - center.1).abs() - half.1 + radius;
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).min(0.0) - radius
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb<u8> = Rgb([255, 255, 255]);
    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn test_new_canvas_is_background() {
        let canvas = Canvas::new(4, 3, BG);
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.height(), 3);
        assert!(canvas.image().pixels().all(|p| *p == BG));
    }

    #[test]
    fn test_zero_size_canvas_clamped() {
        let canvas = Canvas::new(0, 0, BG);
        assert_eq!((canvas.width(), canvas.height()), (1, 1));
    }

    #[test]
    fn test_fill_rect_opaque() {
        let mut canvas = Canvas::new(10, 10, BG);
        canvas.fill_rect((2.0, 2.0), (6.0, 6.0), RED, 1.0);
        assert_eq!(*canvas.image().get_pixel(3, 3), RED);
        assert_eq!(*canvas.image().get_pixel(8, 8), BG);
    }

    #[test]
    fn test_fill_rect_half_alpha_blends() {
        let mut canvas = Canvas::new(4, 4, BG);
        canvas.fill_rect((0.0, 0.0), (4.0, 4.0), RED, 0.5);
        assert_eq!(*canvas.image().get_pixel(1, 1), Rgb([255, 128, 128]));
    }

    #[test]
    fn test_out_of_bounds_drawing_is_clipped() {
        let mut canvas = Canvas::new(5, 5, BG);
        canvas.line((-50.0, -50.0), (50.0, 50.0), 3.0, RED, 1.0);
        canvas.fill_circle((100.0, 100.0), 10.0, RED, 1.0);
        assert_eq!(*canvas.image().get_pixel(2, 2), RED);
        assert_eq!(*canvas.image().get_pixel(4, 0), BG);
    }

    #[test]
    fn test_fill_circle_center_and_outside() {
        let mut canvas = Canvas::new(21, 21, BG);
        canvas.fill_circle((10.5, 10.5), 5.0, RED, 1.0);
        assert_eq!(*canvas.image().get_pixel(10, 10), RED);
        assert_eq!(*canvas.image().get_pixel(0, 0), BG);
    }

    #[test]
    fn test_fill_circles_union_blends_overlap_once() {
        let mut canvas = Canvas::new(40, 20, BG);
        canvas.fill_circles(
            &[((14.5, 10.5), 8.0), ((24.5, 10.5), 8.0)],
            RED,
            0.5,
        );
        // Overlap and non-overlap get the same tint
        assert_eq!(canvas.image().get_pixel(19, 10), canvas.image().get_pixel(8, 10));
        assert_eq!(*canvas.image().get_pixel(19, 10), Rgb([255, 128, 128]));
    }

    #[test]
    fn test_stroke_circle_leaves_center_empty() {
        let mut canvas = Canvas::new(41, 41, BG);
        canvas.stroke_circle((20.5, 20.5), 15.0, 2.0, RED, 1.0);
        assert_eq!(*canvas.image().get_pixel(20, 20), BG);
        assert_eq!(*canvas.image().get_pixel(35, 20), RED);
    }

    #[test]
    fn test_fill_polygon_triangle() {
        let mut canvas = Canvas::new(20, 20, BG);
        canvas.fill_polygon(&[(0.0, 0.0), (20.0, 0.0), (0.0, 20.0)], RED, 1.0);
        assert_eq!(*canvas.image().get_pixel(2, 2), RED);
        assert_eq!(*canvas.image().get_pixel(18, 18), BG);
    }

    #[test]
    fn test_rounded_rect_fill_and_stroke() {
        let mut canvas = Canvas::new(40, 40, BG);
        canvas.fill_rounded_rect((5.0, 5.0), (35.0, 35.0), 6.0, RED, 1.0);
        assert_eq!(*canvas.image().get_pixel(20, 20), RED);
        // Corner is cut by the radius
        assert_eq!(*canvas.image().get_pixel(5, 5), BG);

        let mut outline = Canvas::new(40, 40, BG);
        outline.stroke_rounded_rect((5.0, 5.0), (35.0, 35.0), 6.0, 2.0, RED, 1.0);
        assert_eq!(*outline.image().get_pixel(20, 20), BG);
        assert_eq!(*outline.image().get_pixel(20, 5), RED);
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut canvas = Canvas::new(40, 5, BG);
        canvas.dashed_line((0.0, 2.5), (40.0, 2.5), 1.0, 5.0, RED, 1.0);
        assert_eq!(*canvas.image().get_pixel(2, 2), RED);
        assert_eq!(*canvas.image().get_pixel(8, 2), BG);
    }

    #[test]
    fn test_draw_text_marks_pixels() {
        let mut canvas = Canvas::new(30, 10, BG);
        canvas.draw_text(0.0, 0.0, "I", 1, RED);
        // Top row of 'I' is 0x0E: columns 1..=3
        assert_eq!(*canvas.image().get_pixel(0, 0), BG);
        assert_eq!(*canvas.image().get_pixel(2, 0), RED);
    }

    #[test]
    fn test_draw_text_scaled() {
        let mut canvas = Canvas::new(30, 30, BG);
        canvas.draw_text(0.0, 0.0, "I", 2, RED);
        assert_eq!(*canvas.image().get_pixel(4, 0), RED);
        assert_eq!(*canvas.image().get_pixel(5, 1), RED);
    }

    #[test]
    fn test_segment_distance() {
        assert_eq!(segment_distance((5.0, 3.0), (0.0, 0.0), (10.0, 0.0)), 3.0);
        assert_eq!(segment_distance((13.0, 4.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
    }
}
