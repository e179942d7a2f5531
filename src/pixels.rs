// pixels.rs - RGBA mirror of the active generation, one pixel per cell

use crate::error::LifeError;
use crate::grid::Grid;

pub type Rgba = [u8; 4];

/// Colour of a live cell.
pub const CELL_COLOR: Rgba = [0, 255, 0, 255];

/// Dead cells are fully transparent black.
const DEAD: Rgba = [0, 0, 0, 0];

/// Write `alive_color` for each live cell and transparent black for each dead
/// cell into `buffer`, which must hold exactly `grid.len() * 4` bytes.
pub fn sync_pixel_buffer(grid: &Grid, buffer: &mut [u8], alive_color: Rgba) -> Result<(), LifeError> {
    let expected = grid.len() * 4;
    if buffer.len() != expected {
        return Err(LifeError::BufferSizeMismatch { expected, actual: buffer.len() });
    }

    for (pixel, &alive) in buffer.chunks_exact_mut(4).zip(grid.cells()) {
        pixel.copy_from_slice(if alive { &alive_color } else { &DEAD });
    }
    Ok(())
}

/// Pixel buffer owned alongside a grid and sized for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width  : usize,
    height : usize,
    bytes  : Vec<u8>,
}

impl PixelBuffer {
    /// Buffer matching `grid`, already filled from it.
    pub fn for_grid(grid: &Grid, alive_color: Rgba) -> Self {
        let mut buffer = Self {
            width: grid.width(),
            height: grid.height(),
            bytes: vec![0; grid.len() * 4],
        };
        buffer.sync(grid, alive_color);
        buffer
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Refresh from `grid`. A grid of different dimensions is a caller bug.
    pub fn sync(&mut self, grid: &Grid, alive_color: Rgba) {
        assert_eq!(
            (self.width, self.height),
            (grid.width(), grid.height()),
            "pixel buffer was not reallocated after the grid changed size"
        );
        if let Err(err) = sync_pixel_buffer(grid, &mut self.bytes, alive_color) {
            panic!("{err}");
        }
    }
}
