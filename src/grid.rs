// grid.rs - Double-buffered cell grid for Conway's Game of Life
//
// Cells are stored row-major (index = y * width + x). Off-grid positions are
// permanently dead: the board has hard edges, no wraparound.

use rand::Rng;
use tracing::trace;

use crate::error::LifeError;
use crate::patterns::Pattern;

/// Conway's rule for one cell given its live-neighbour count.
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    match (alive, neighbors) {
        (true, 2) | (true, 3) => true,   // Survival
        (false, 3)            => true,   // Birth
        _                     => false,  // Death or stays dead
    }
}

/// Neighbour offsets, (0, 0) excluded.
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width   : usize,
    height  : usize,
    current : Vec<bool>,   // active generation, read by neighbour counts
    next    : Vec<bool>,   // write target of the step in progress
}

impl Grid {
    /// All-dead grid.
    pub fn new(width: usize, height: usize) -> Result<Self, LifeError> {
        let len = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            current: vec![false; len],
            next: vec![false; len],
        })
    }

    /// Grid where every cell is alive independently with `live_probability`.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        live_probability: f64,
        rng: &mut R,
    ) -> Result<Self, LifeError> {
        validate_probability(live_probability)?;
        let mut grid = Self::new(width, height)?;
        for cell in grid.current.iter_mut() {
            *cell = rng.gen_bool(live_probability);
        }
        Ok(grid)
    }

    /// Random grid drawn from the thread-local generator.
    pub fn initialize(width: usize, height: usize, live_probability: f64) -> Result<Self, LifeError> {
        Self::random(width, height, live_probability, &mut rand::thread_rng())
    }

    /// Build a grid from rows of `#` (alive) and `.` (dead).
    pub fn from_rows(rows: &[&str]) -> Result<Self, LifeError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let mut grid = Self::new(width, height)?;

        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(LifeError::InvalidDimension { width, height });
            }
            for (x, byte) in row.bytes().enumerate() {
                grid.current[y * width + x] = byte == b'#';
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (width * height).
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Always false: zero-sized boards are refused at construction.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Active generation, row-major.
    pub fn cells(&self) -> &[bool] {
        &self.current
    }

    /// Cell state; anything off the board reads as dead.
    pub fn get(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        x < self.width && y < self.height && self.current[self.index(x, y)]
    }

    /// Set a cell in the active generation. Returns false when off the board.
    pub fn set(&mut self, x: usize, y: usize, alive: bool) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = self.index(x, y);
        self.current[index] = alive;
        true
    }

    /// Write a pattern's live cells with its origin at (x, y); cells falling
    /// off the board are dropped.
    pub fn stamp(&mut self, pattern: &Pattern, x: usize, y: usize) {
        for &(dx, dy) in pattern.cells {
            self.set(x + dx, y + dy, true);
        }
    }

    pub fn population(&self) -> usize {
        self.current.iter().filter(|&&alive| alive).count()
    }

    /// Live cells among the 8 positions around (x, y).
    pub fn count_live_neighbors(&self, x: usize, y: usize) -> u8 {
        let (x, y) = (x as isize, y as isize);
        NEIGHBORS
            .iter()
            .filter(|&&(dx, dy)| self.get(x + dx, y + dy))
            .count() as u8
    }

    /// Advance one generation and return the new population.
    ///
    /// Every cell of `next` is written from `current` only, then the two
    /// buffers swap. Callers holding `&self` therefore only ever observe a
    /// completed generation.
    pub fn step(&mut self) -> usize {
        let mut population = 0;

        for y in 0..self.height {
            for x in 0..self.width {
                let index = self.index(x, y);
                let alive = next_state(self.current[index], self.count_live_neighbors(x, y));
                self.next[index] = alive;
                population += alive as usize;
            }
        }

        std::mem::swap(&mut self.current, &mut self.next);
        trace!(population, "grid stepped");
        population
    }
}

/// Cells in a `width` x `height` board. Boards whose RGBA mirror (4 bytes per
/// cell) would not fit in an allocation are rejected along with empty ones.
pub(crate) fn cell_count(width: usize, height: usize) -> Result<usize, LifeError> {
    let len = width.checked_mul(height);
    match len.and_then(|len| len.checked_mul(4)) {
        Some(bytes) if width > 0 && height > 0 && bytes <= isize::MAX as usize => Ok(bytes / 4),
        _ => Err(LifeError::InvalidDimension { width, height }),
    }
}

pub(crate) fn validate_probability(live_probability: f64) -> Result<(), LifeError> {
    if (0.0..=1.0).contains(&live_probability) {
        Ok(())
    } else {
        Err(LifeError::InvalidProbability(live_probability))
    }
}
