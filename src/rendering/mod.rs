//! Drawing of grid generations onto a host surface.
//!
//! The renderer only talks to the `Surface` trait, so the same code paints
//! into the macroquad window and into the in-memory `PixelSurface` used by
//! headless hosts.

mod pixel;
mod window;

pub use pixel::PixelSurface;
pub use window::WindowSurface;

use macroquad::color::Color;
use tracing::{debug, warn};

use crate::domain::GridState;
use crate::error::{EngineError, Result};

/// Something the renderer can paint rectangles onto.
pub trait Surface {
    /// False once the underlying element has gone away
    fn is_available(&self) -> bool;

    /// Resize the drawable area, in pixels
    fn resize(&mut self, width: u32, height: u32);

    /// Current size in pixels
    fn size(&self) -> (u32, u32);

    /// Fill an axis-aligned rectangle; parts outside the surface are clipped
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
}

/// Colors used for a frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub alive: Color,
    pub background: Color,
    pub grid_line: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            alive: Color::from_rgba(0, 255, 150, 255),   // Bright green
            background: Color::from_rgba(15, 15, 15, 255), // Very dark gray
            grid_line: Color::from_rgba(40, 40, 40, 255),  // Dark gray
        }
    }
}

/// Pixel size of a `width` x `height` grid drawn at `cell_size`.
///
/// Fails when `cell_size` is zero or either side does not fit in a `u32`.
pub fn surface_size(width: u32, height: u32, cell_size: u32) -> Result<(u32, u32)> {
    if cell_size == 0 {
        return Err(EngineError::invalid_argument("cell_size", "must be greater than zero"));
    }
    match (width.checked_mul(cell_size), height.checked_mul(cell_size)) {
        (Some(surface_w), Some(surface_h)) => Ok((surface_w, surface_h)),
        _ => Err(EngineError::invalid_argument(
            "cell_size",
            format!("{width}x{height} cells of {cell_size}px overflow the surface size"),
        )),
    }
}

/// Paints whole generations, one `cell_size` square per cell.
pub struct Renderer<S: Surface> {
    surface: S,
    cell_size: u32,
    palette: Palette,
}

impl<S: Surface> Renderer<S> {
    /// Bind a renderer to `surface` and size it for a `width` x `height` grid
    pub fn new(
        mut surface: S,
        cell_size: u32,
        palette: Palette,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let (surface_w, surface_h) = surface_size(width, height, cell_size)?;
        if !surface.is_available() {
            return Err(EngineError::SurfaceUnavailable);
        }

        surface.resize(surface_w, surface_h);
        debug!(width = surface_w, height = surface_h, "sized drawing surface");

        Ok(Self { surface, cell_size, palette })
    }

    pub const fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Repaint the full surface from a settled generation
    pub fn render(&mut self, grid: &GridState) -> Result<()> {
        if !self.surface.is_available() {
            warn!("drawing surface lost, frame not rendered");
            return Err(EngineError::SurfaceUnavailable);
        }

        let px = self.cell_size as f32;
        let width = grid.width() as usize;
        let (surface_w, surface_h) = self.surface.size();

        self.surface
            .fill_rect(0.0, 0.0, surface_w as f32, surface_h as f32, self.palette.background);

        for (idx, _) in grid
            .snapshot()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_alive())
        {
            let col = (idx % width) as f32;
            let row = (idx / width) as f32;
            self.surface.fill_rect(col * px, row * px, px, px, self.palette.alive);
        }

        // 1px lattice on every cell boundary; the far edges coincide with the
        // near ones on a torus
        for col in 0..grid.width() {
            let x = col as f32 * px;
            self.surface.fill_rect(x, 0.0, 1.0, surface_h as f32, self.palette.grid_line);
        }
        for row in 0..grid.height() {
            let y = row as f32 * px;
            self.surface.fill_rect(0.0, y, surface_w as f32, 1.0, self.palette.grid_line);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cell;

    fn grid_with(width: u32, height: u32, alive: &[(i64, i64)]) -> GridState {
        let mut grid =
            GridState::create(width, height, vec![Cell::Dead; (width * height) as usize]).unwrap();
        for &(row, col) in alive {
            grid.set(row, col, Cell::Alive);
        }
        grid
    }

    #[test]
    fn test_new_sizes_surface() {
        let renderer =
            Renderer::new(PixelSurface::new(1, 1), 15, Palette::default(), 50, 40).unwrap();
        assert_eq!(renderer.surface().size(), (750, 600));
    }

    #[test]
    fn test_surface_size_rejects_overflow() {
        assert_eq!(surface_size(50, 40, 15), Ok((750, 600)));
        assert_eq!(surface_size(u32::MAX, 1, 1), Ok((u32::MAX, 1)));
        assert!(matches!(
            surface_size(70_000, 1, 70_000),
            Err(EngineError::InvalidArgument { name: "cell_size", .. })
        ));
        assert!(matches!(
            surface_size(1, 2, u32::MAX),
            Err(EngineError::InvalidArgument { name: "cell_size", .. })
        ));
    }

    #[test]
    fn test_new_rejects_overflowing_surface_before_resizing() {
        let result = Renderer::new(PixelSurface::new(1, 1), 70_000, Palette::default(), 70_000, 1);
        assert!(matches!(
            result,
            Err(EngineError::InvalidArgument { name: "cell_size", .. })
        ));
    }

    #[test]
    fn test_new_rejects_zero_cell_size() {
        let result = Renderer::new(PixelSurface::new(1, 1), 0, Palette::default(), 5, 5);
        assert!(matches!(
            result,
            Err(EngineError::InvalidArgument { name: "cell_size", .. })
        ));
    }

    #[test]
    fn test_render_paints_cells_and_lattice() {
        let palette = Palette::default();
        let grid = grid_with(3, 2, &[(1, 2)]);
        let mut renderer = Renderer::new(PixelSurface::new(1, 1), 4, palette, 3, 2).unwrap();
        renderer.render(&grid).unwrap();

        let surface = renderer.surface();
        // Interior of the live cell at row 1, col 2
        assert_eq!(surface.pixel(10, 6), Some(palette.alive));
        // Interior of a dead cell
        assert_eq!(surface.pixel(2, 2), Some(palette.background));
        // Boundaries
        assert_eq!(surface.pixel(4, 2), Some(palette.grid_line));
        assert_eq!(surface.pixel(2, 4), Some(palette.grid_line));
        assert_eq!(surface.pixel(8, 5), Some(palette.grid_line));
    }

    #[test]
    fn test_render_is_full_repaint() {
        let palette = Palette::default();
        let mut renderer = Renderer::new(PixelSurface::new(1, 1), 4, palette, 3, 3).unwrap();

        renderer.render(&grid_with(3, 3, &[(1, 1)])).unwrap();
        assert_eq!(renderer.surface().pixel(6, 6), Some(palette.alive));

        renderer.render(&grid_with(3, 3, &[])).unwrap();
        assert_eq!(renderer.surface().pixel(6, 6), Some(palette.background));
    }

    #[test]
    fn test_render_fails_on_lost_surface() {
        let grid = grid_with(2, 2, &[]);
        let mut renderer =
            Renderer::new(PixelSurface::new(1, 1), 2, Palette::default(), 2, 2).unwrap();
        renderer.surface_mut().invalidate();
        assert_eq!(renderer.render(&grid), Err(EngineError::SurfaceUnavailable));
    }
}
