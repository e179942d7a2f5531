//! Conway's Game of Life on a bounded grid.
//!
//! [`Grid`] holds the double-buffered cells and applies the rule, [`Simulation`]
//! paces it against a fixed frame cadence and carries the runtime toggles the
//! front end reads back.

pub mod error;
pub mod grid;
pub mod patterns;
pub mod pixels;
pub mod simulation;

pub use error::LifeError;
pub use grid::Grid;
pub use patterns::Pattern;
pub use pixels::{CELL_COLOR, PixelBuffer, Rgba, sync_pixel_buffer};
pub use simulation::{
    Command, Flow, MAX_SPEED, MIN_SPEED, RunState, SPEED_STEP, Simulation, SimulationConfig,
    SimulationState,
};
