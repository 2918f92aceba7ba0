use macroquad::color::Color;

use super::Surface;

/// In-memory pixel surface that mirrors a canvas.
///
/// Used by headless hosts and tests. `invalidate` simulates the backing
/// element being removed: every later render fails.
#[derive(Clone, Debug)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    available: bool,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::new(0.0, 0.0, 0.0, 0.0); width as usize * height as usize],
            available: true,
        }
    }

    /// Color at (x, y), or None outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.width && y < self.height)
            .then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Row-major pixel buffer
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mark the surface as gone
    pub fn invalidate(&mut self) {
        self.available = false;
    }

    /// Pixel span `[start, end)` covered by `[from, from + len)`, clipped to `0..limit`
    fn clip(from: f32, len: f32, limit: u32) -> (u32, u32) {
        let start = from.round().clamp(0.0, limit as f32) as u32;
        let end = (from + len).round().clamp(0.0, limit as f32) as u32;
        (start, end)
    }
}

impl Surface for PixelSurface {
    fn is_available(&self) -> bool {
        self.available
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::new(0.0, 0.0, 0.0, 0.0); width as usize * height as usize];
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let (x0, x1) = Self::clip(x, width, self.width);
        let (y0, y1) = Self::clip(y, height, self.height);
        for py in y0..y1 {
            let row = (py * self.width) as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::color::{RED, BLUE};

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(-2.0, 2.0, 10.0, 10.0, RED);
        assert_eq!(surface.pixel(0, 2), Some(RED));
        assert_eq!(surface.pixel(3, 3), Some(RED));
        assert_ne!(surface.pixel(0, 1), Some(RED));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn test_resize_clears() {
        let mut surface = PixelSurface::new(2, 2);
        surface.fill_rect(0.0, 0.0, 2.0, 2.0, BLUE);
        surface.resize(3, 1);
        assert_eq!(surface.size(), (3, 1));
        assert_eq!(surface.pixels().len(), 3);
        assert_ne!(surface.pixel(0, 0), Some(BLUE));
    }

    #[test]
    fn test_invalidate() {
        let mut surface = PixelSurface::new(1, 1);
        assert!(surface.is_available());
        surface.invalidate();
        assert!(!surface.is_available());
    }
}
