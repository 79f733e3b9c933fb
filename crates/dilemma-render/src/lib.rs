//! Image output for grid generations.
//!
//! - [`FrameRenderer`] - Draws one grid onto a fixed-size canvas
//! - [`save_png`] - Writes a single frame as a PNG still
//! - [`AnimationWriter`] - Streams frames into an infinitely looping GIF
//!
//! # Example
//!
//! ```
//! use dilemma_engine::{Grid, Strategy};
//! use dilemma_render::{FrameRenderer, FrameStyle};
//!
//! let grid = Grid::filled(4, 5, Strategy::Cooperate).unwrap();
//! let renderer = FrameRenderer::new(FrameStyle {
//!     canvas_size: 100,
//!     ..FrameStyle::default()
//! });
//! let frame = renderer.render(&grid).unwrap();
//! assert_eq!(frame.dimensions(), (100, 100));
//! ```

pub use self::{animation::*, frame::*};

mod animation;
mod frame;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RenderError {
    #[display("{rows}x{cols} grid does not fit on a {canvas_size}px canvas")]
    #[from(skip)]
    GridTooLarge {
        rows: usize,
        cols: usize,
        canvas_size: u32,
    },
    #[display("failed to encode image: {_0}")]
    Image(image::ImageError),
    #[display("failed to write image: {_0}")]
    Io(std::io::Error),
}
