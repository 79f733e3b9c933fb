use std::path::Path;

use dilemma_engine::{Grid, Position, Strategy};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::RenderError;

/// Side length of the square canvas, in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 1000;

/// Colors and canvas size used to draw a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStyle {
    pub canvas_size: u32,
    pub cooperate: Rgba<u8>,
    pub defect: Rgba<u8>,
    /// Fill for the strip left over when the canvas is not a multiple of the grid size.
    pub background: Rgba<u8>,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            cooperate: Rgba([0, 0, 255, 255]),
            defect: Rgba([255, 0, 0, 255]),
            background: Rgba([255, 255, 255, 255]),
        }
    }
}

impl FrameStyle {
    #[must_use]
    pub fn color_of(&self, strategy: Strategy) -> Rgba<u8> {
        match strategy {
            Strategy::Cooperate => self.cooperate,
            Strategy::Defect => self.defect,
        }
    }
}

/// Pixel size of one cell for a given grid and canvas.
///
/// Cells are `canvas_size / cols` wide and `canvas_size / rows` high, so they
/// are only square when the grid is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLayout {
    pub cell_width: u32,
    pub cell_height: u32,
    pub rows: u32,
    pub cols: u32,
}

impl CellLayout {
    pub fn new(grid: &Grid, canvas_size: u32) -> Result<Self, RenderError> {
        let too_large = || RenderError::GridTooLarge {
            rows: grid.rows(),
            cols: grid.cols(),
            canvas_size,
        };
        let rows = u32::try_from(grid.rows()).map_err(|_| too_large())?;
        let cols = u32::try_from(grid.cols()).map_err(|_| too_large())?;
        let cell_width = canvas_size / cols;
        let cell_height = canvas_size / rows;
        if cell_width == 0 || cell_height == 0 {
            return Err(too_large());
        }
        Ok(Self {
            cell_width,
            cell_height,
            rows,
            cols,
        })
    }

    /// Returns the cell drawn at pixel `(x, y)`, or `None` for the leftover strip.
    #[must_use]
    pub fn cell_at(&self, x: u32, y: u32) -> Option<Position> {
        let col = x / self.cell_width;
        let row = y / self.cell_height;
        (row < self.rows && col < self.cols).then(|| Position::new(row as usize, col as usize))
    }
}

/// Draws grids as colored rectangles on a square canvas.
///
/// Column indices grow along the x axis and row indices along the y axis,
/// with `(0, 0)` in the top-left corner.
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    style: FrameStyle,
}

impl FrameRenderer {
    #[must_use]
    pub fn new(style: FrameStyle) -> Self {
        Self { style }
    }

    #[must_use]
    pub fn style(&self) -> &FrameStyle {
        &self.style
    }

    /// Checks that `grid` can be drawn on this renderer's canvas.
    pub fn layout(&self, grid: &Grid) -> Result<CellLayout, RenderError> {
        CellLayout::new(grid, self.style.canvas_size)
    }

    pub fn render(&self, grid: &Grid) -> Result<RgbaImage, RenderError> {
        let layout = self.layout(grid)?;
        let size = self.style.canvas_size;
        Ok(RgbaImage::from_fn(size, size, |x, y| {
            layout
                .cell_at(x, y)
                .map_or(self.style.background, |pos| self.style.color_of(grid.get(pos)))
        }))
    }
}

/// Writes `frame` to `path` as a PNG image.
pub fn save_png<P>(frame: &RgbaImage, path: P) -> Result<(), RenderError>
where
    P: AsRef<Path>,
{
    frame.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
