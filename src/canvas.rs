//! Half-block framebuffer: every terminal cell shows two stacked pixels,
//! the upper one as the `▀` foreground and the lower one as the background.

use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use crate::entities::Hitbox;
use crate::sprites::Sprite;

const UPPER_HALF_BLOCK: &str = "▀";

/// Largest rect inside `area` that shows a `world_width` x `world_height`
/// world at its true aspect ratio (cells are one pixel wide, two tall).
pub fn fit_viewport(area: Rect, world_width: u32, world_height: u32) -> Rect {
    if area.width == 0 || area.height == 0 || world_width == 0 || world_height == 0 {
        return Rect::new(area.x, area.y, 0, 0);
    }

    let scale = (f32::from(area.width) / world_width as f32)
        .min(f32::from(area.height) * 2.0 / world_height as f32);

    let width = ((world_width as f32 * scale).round() as u16).clamp(1, area.width);
    let height = ((world_height as f32 * scale / 2.0).round() as u16).clamp(1, area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Pixel grid covering a world of fixed size, scaled to a terminal region
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u16,
    height: u16,
    scale_x: f32,
    scale_y: f32,
    pixels: Vec<Color>,
}

impl PixelCanvas {
    /// A canvas for `cols` x `rows` terminal cells cleared to `background`
    pub fn new(
        world_width: u32,
        world_height: u32,
        cols: u16,
        rows: u16,
        background: Color,
    ) -> Self {
        let width = cols;
        let height = rows.saturating_mul(2);
        Self {
            width,
            height,
            scale_x: f32::from(width) / world_width.max(1) as f32,
            scale_y: f32::from(height) / world_height.max(1) as f32,
            pixels: vec![background; usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[usize::from(y) * usize::from(self.width) + usize::from(x)])
        } else {
            None
        }
    }

    pub fn plot(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && x < i32::from(self.width) && y < i32::from(self.height) {
            let idx = y as usize * usize::from(self.width) + x as usize;
            self.pixels[idx] = color;
        }
    }

    /// Unclipped pixel span of a world rect. Never thinner than one pixel,
    /// so small objects stay visible at low resolutions.
    fn span(&self, rect: Hitbox) -> (i32, i32, i32, i32) {
        let x0 = (rect.left() as f32 * self.scale_x).floor() as i32;
        let y0 = (rect.top() as f32 * self.scale_y).floor() as i32;
        let x1 = ((rect.right() as f32 * self.scale_x).round() as i32).max(x0 + 1);
        let y1 = ((rect.bottom() as f32 * self.scale_y).round() as i32).max(y0 + 1);
        (x0, y0, x1, y1)
    }

    pub fn fill_rect(&mut self, rect: Hitbox, color: Color) {
        let (x0, y0, x1, y1) = self.span(rect);
        for y in y0.max(0)..y1.min(i32::from(self.height)) {
            for x in x0.max(0)..x1.min(i32::from(self.width)) {
                self.plot(x, y, color);
            }
        }
    }

    /// Draws `sprite` stretched over `rect`, skipping transparent pixels
    pub fn draw_sprite(&mut self, sprite: &Sprite, rect: Hitbox) {
        let (x0, y0, x1, y1) = self.span(rect);
        let span_w = (x1 - x0) as f32;
        let span_h = (y1 - y0) as f32;

        for y in y0.max(0)..y1.min(i32::from(self.height)) {
            let v = ((y - y0) as f32 + 0.5) / span_h;
            for x in x0.max(0)..x1.min(i32::from(self.width)) {
                let u = ((x - x0) as f32 + 0.5) / span_w;
                if let Some([r, g, b]) = sprite.sample(u, v) {
                    self.plot(x, y, Color::Rgb(r, g, b));
                }
            }
        }
    }

    /// Writes the canvas into `buf` with its top-left cell at `area`'s origin
    pub fn present(&self, buf: &mut Buffer, area: Rect) {
        let cols = self.width.min(area.width);
        let rows = (self.height / 2).min(area.height);

        for row in 0..rows {
            for col in 0..cols {
                let top = self.pixel(col, row * 2).unwrap_or(Color::Reset);
                let bottom = self.pixel(col, row * 2 + 1).unwrap_or(Color::Reset);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(UPPER_HALF_BLOCK).set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Color::Rgb(0, 0, 0);
    const RED: Color = Color::Rgb(255, 0, 0);

    #[test]
    fn test_fit_viewport_keeps_aspect_ratio() {
        // 120x40 cells = 120x80 pixels, world is 3:2
        let viewport = fit_viewport(Rect::new(0, 1, 120, 40), 1200, 800);
        assert_eq!(viewport.width, 120);
        assert_eq!(viewport.height, 40);

        // Wider terminal: height limits, result is centered horizontally
        let viewport = fit_viewport(Rect::new(0, 0, 200, 40), 1200, 800);
        assert_eq!(viewport.width, 120);
        assert_eq!(viewport.height, 40);
        assert_eq!(viewport.x, 40);
    }

    #[test]
    fn test_fit_viewport_empty_area() {
        let viewport = fit_viewport(Rect::new(3, 4, 0, 10), 1200, 800);
        assert_eq!(viewport.width, 0);
        assert_eq!(viewport.height, 0);
    }

    #[test]
    fn test_canvas_has_two_pixels_per_row() {
        let canvas = PixelCanvas::new(100, 100, 10, 5, BG);
        assert_eq!(canvas.width(), 10);
        assert_eq!(canvas.height(), 10);
        assert_eq!(canvas.pixel(9, 9), Some(BG));
        assert_eq!(canvas.pixel(10, 0), None);
    }

    #[test]
    fn test_fill_rect_scales_world_coordinates() {
        let mut canvas = PixelCanvas::new(100, 100, 10, 5, BG);
        canvas.fill_rect(Hitbox::new(20, 30, 20, 10), RED);

        assert_eq!(canvas.pixel(2, 3), Some(RED));
        assert_eq!(canvas.pixel(3, 3), Some(RED));
        assert_eq!(canvas.pixel(4, 3), Some(BG));
        assert_eq!(canvas.pixel(2, 4), Some(BG));
    }

    #[test]
    fn test_tiny_rect_still_visible() {
        let mut canvas = PixelCanvas::new(1000, 1000, 10, 5, BG);
        canvas.fill_rect(Hitbox::new(505, 505, 2, 2), RED);
        assert_eq!(canvas.pixel(5, 5), Some(RED));
    }

    #[test]
    fn test_offscreen_rect_is_clipped() {
        let mut canvas = PixelCanvas::new(100, 100, 10, 5, BG);
        canvas.fill_rect(Hitbox::new(-50, -50, 60, 60), RED);
        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(1, 0), Some(BG));
    }

    #[test]
    fn test_draw_sprite_fills_rect() {
        let mut canvas = PixelCanvas::new(100, 100, 10, 5, BG);
        let sprite = Sprite::solid(4, 4, [0, 255, 0]);
        canvas.draw_sprite(&sprite, Hitbox::new(0, 0, 20, 20));

        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(canvas.pixel(x, y), Some(Color::Rgb(0, 255, 0)));
            }
        }
        assert_eq!(canvas.pixel(2, 0), Some(BG));
    }

    #[test]
    fn test_present_writes_half_blocks() {
        let mut canvas = PixelCanvas::new(10, 10, 10, 5, BG);
        canvas.plot(0, 0, RED);

        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        canvas.present(&mut buf, area);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), UPPER_HALF_BLOCK);
        assert_eq!(cell.fg, RED);
        assert_eq!(cell.bg, BG);
        assert_eq!(buf[(1, 0)].fg, BG);
    }
}
