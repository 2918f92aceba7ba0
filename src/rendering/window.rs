use macroquad::prelude::*;
use macroquad::window::request_new_screen_size;

use super::Surface;

/// Surface backed by the macroquad window.
///
/// Frames are rasterised into an `Image` and only uploaded when something
/// changed; `present` must be called once per display frame because the
/// window back buffer does not persist between frames.
pub struct WindowSurface {
    image: Image,
    texture: Option<Texture2D>,
    dirty: bool,
}

impl WindowSurface {
    pub fn new() -> Self {
        Self {
            image: Image::gen_image_color(1, 1, BLACK),
            texture: None,
            dirty: true,
        }
    }

    /// Draw the last rendered frame at the window origin
    pub fn present(&mut self) {
        let texture = self.texture.get_or_insert_with(|| {
            let texture = Texture2D::from_image(&self.image);
            texture.set_filter(FilterMode::Nearest);
            texture
        });
        if self.dirty {
            texture.update(&self.image);
            self.dirty = false;
        }
        draw_texture(texture, 0.0, 0.0, WHITE);
    }
}

impl Default for WindowSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for WindowSurface {
    fn is_available(&self) -> bool {
        true
    }

    fn resize(&mut self, width: u32, height: u32) {
        let width = width.clamp(1, u16::MAX as u32) as u16;
        let height = height.clamp(1, u16::MAX as u32) as u16;
        self.image = Image::gen_image_color(width, height, BLACK);
        // Texture size is fixed at creation
        self.texture = None;
        self.dirty = true;
        request_new_screen_size(width as f32, height as f32);
    }

    fn size(&self) -> (u32, u32) {
        (self.image.width() as u32, self.image.height() as u32)
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let (w, h) = self.size();
        let x0 = x.round().clamp(0.0, w as f32) as u32;
        let x1 = (x + width).round().clamp(0.0, w as f32) as u32;
        let y0 = y.round().clamp(0.0, h as f32) as u32;
        let y1 = (y + height).round().clamp(0.0, h as f32) as u32;

        for py in y0..y1 {
            for px in x0..x1 {
                self.image.set_pixel(px, py, color);
            }
        }
        self.dirty = true;
    }
}
