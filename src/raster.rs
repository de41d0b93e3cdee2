//! Scanline rasterizer for country silhouettes.
//!
//! Projects lon/lat polygons into a fixed-size RGBA buffer (north up, uniform
//! scale, centred) and fills each outer ring with the even-odd scanline rule.

use bevy_egui::egui;

use crate::geometry::{Bounds, Polygon};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Canvas layouts used by the shape game.
#[derive(Clone, Copy, Debug)]
pub struct CanvasSpec {
    pub width: usize,
    pub height: usize,
    pub padding: f64,
    pub border: usize,
}

pub const MAIN_CANVAS: CanvasSpec = CanvasSpec { width: 600, height: 400, padding: 30.0, border: 0 };
pub const ISLAND_CANVAS: CanvasSpec = CanvasSpec { width: 150, height: 100, padding: 8.0, border: 2 };

#[derive(Clone, Debug)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn blank(width: usize, height: usize) -> Self {
        Self { width, height, pixels: WHITE.repeat(width * height) }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.pixel(x, y) == BLACK
    }

    fn set(&mut self, x: usize, y: usize, color: [u8; 4]) {
        let i = (y * self.width + x) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }

    fn draw_border(&mut self, thickness: usize) {
        let (w, h) = (self.width, self.height);
        for i in 0..thickness.min(w).min(h) {
            for x in 0..w {
                self.set(x, i, BLACK);
                self.set(x, h - 1 - i, BLACK);
            }
            for y in 0..h {
                self.set(i, y, BLACK);
                self.set(w - 1 - i, y, BLACK);
            }
        }
    }

    /// Fills the polygon given in screen coordinates.
    fn fill_ring(&mut self, points: &[(i64, i64)]) {
        if points.len() < 3 {
            return;
        }
        let mut crossings: Vec<i64> = Vec::new();
        for y in 0..self.height as i64 {
            crossings.clear();
            for (i, &(x1, y1)) in points.iter().enumerate() {
                let (x2, y2) = points[(i + 1) % points.len()];
                if (y1 <= y && y < y2) || (y2 <= y && y < y1) {
                    crossings.push(x1 + (y - y1) * (x2 - x1) / (y2 - y1));
                }
            }
            crossings.sort_unstable();
            for pair in crossings.chunks_exact(2) {
                let from = pair[0].max(0);
                let to = pair[1].min(self.width as i64 - 1);
                for x in from..=to {
                    self.set(x as usize, y as usize, BLACK);
                }
            }
        }
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied([self.width, self.height], &self.pixels)
    }
}

/// Renders the outer rings of `polygons` black on white. Degenerate bounds
/// (a point or a line) leave the canvas blank.
pub fn render_shape(polygons: &[Polygon], canvas: CanvasSpec) -> Raster {
    let mut raster = Raster::blank(canvas.width, canvas.height);
    raster.draw_border(canvas.border);

    let Some(bounds) = Bounds::of(polygons) else { return raster };
    if bounds.is_degenerate() {
        return raster;
    }

    let (width, height) = (canvas.width as f64, canvas.height as f64);
    let scale = ((width - 2.0 * canvas.padding) / bounds.width())
        .min((height - 2.0 * canvas.padding) / bounds.height());
    let offset_x = (width - bounds.width() * scale) / 2.0;
    let offset_y = (height - bounds.height() * scale) / 2.0;

    for outer in polygons.iter().filter_map(|p| p.first()) {
        let points: Vec<(i64, i64)> = outer.iter()
            .map(|&[lon, lat]| {
                let x = (lon - bounds.min_x) * scale + offset_x;
                let y = height - (lat - bounds.min_y) * scale - offset_y;
                (x as i64, y as i64)
            })
            .collect();
        raster.fill_ring(&points);
    }
    raster
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: CanvasSpec = CanvasSpec { width: 100, height: 100, padding: 10.0, border: 0 };

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        vec![vec![[x0, y0], [x0 + size, y0], [x0 + size, y0 + size], [x0, y0 + size], [x0, y0]]]
    }

    fn filled_count(raster: &Raster) -> usize {
        (0..raster.height())
            .flat_map(|y| (0..raster.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| raster.is_filled(x, y))
            .count()
    }

    #[test]
    fn square_fills_padded_area() {
        let raster = render_shape(&[square(0.0, 0.0, 1.0)], SMALL);

        assert!(raster.is_filled(50, 50));
        assert!(raster.is_filled(11, 11));
        assert!(!raster.is_filled(5, 50));
        assert!(!raster.is_filled(50, 95));
        let filled = filled_count(&raster);
        assert!((6_400..=8_200).contains(&filled), "filled {filled}");
    }

    #[test]
    fn north_is_up() {
        // Triangle with its apex at the top (highest latitude).
        let triangle = vec![vec![[0.0, 0.0], [2.0, 0.0], [1.0, 2.0], [0.0, 0.0]]];
        let raster = render_shape(&[triangle], SMALL);

        // Narrow near the top row of the shape, wide near the bottom.
        assert!(!raster.is_filled(20, 15));
        assert!(raster.is_filled(50, 15));
        assert!(raster.is_filled(20, 85));
    }

    #[test]
    fn wide_shape_is_centred_vertically() {
        let wide = vec![vec![[0.0, 0.0], [4.0, 0.0], [4.0, 1.0], [0.0, 1.0], [0.0, 0.0]]];
        let raster = render_shape(&[wide], SMALL);

        assert!(raster.is_filled(50, 50));
        assert!(!raster.is_filled(50, 20));
        assert!(!raster.is_filled(50, 80));
    }

    #[test]
    fn degenerate_bounds_render_blank() {
        let line = vec![vec![[0.0, 0.0], [5.0, 0.0], [9.0, 0.0]]];

        assert_eq!(filled_count(&render_shape(&[line], SMALL)), 0);
        assert_eq!(filled_count(&render_shape(&[], SMALL)), 0);
    }

    #[test]
    fn island_canvas_has_border() {
        let raster = render_shape(&[], ISLAND_CANVAS);

        assert!(raster.is_filled(0, 0));
        assert!(raster.is_filled(1, 50));
        assert!(raster.is_filled(149, 99));
        assert!(!raster.is_filled(2, 50));
        assert!(!raster.is_filled(75, 50));
    }

    #[test]
    fn separate_polygons_are_each_drawn() {
        let polygons = vec![square(0.0, 0.0, 1.0), square(3.0, 0.0, 1.0)];
        let raster = render_shape(&polygons, SMALL);

        assert!(raster.is_filled(15, 50));
        assert!(raster.is_filled(85, 50));
        assert!(!raster.is_filled(50, 50));
    }

    #[test]
    fn color_image_matches_dimensions() {
        let image = Raster::blank(12, 7).to_color_image();
        assert_eq!(image.size, [12, 7]);
    }
}
