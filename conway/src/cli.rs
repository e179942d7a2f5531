// cli.rs - Command-line flags

use clap::Parser;
use conway_life::SimulationConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "conway")]
#[command(about = "Conway's Game of Life in a window", long_about = None)]
pub struct Args {
    /// Board width in cells
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Board height in cells
    #[arg(long, default_value_t = 80)]
    pub height: usize,

    /// Size of each cell in pixels
    #[arg(long = "cell", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub cell_size: u32,

    /// Generations per second, min 0 max 60, + or - to adjust in game
    #[arg(long, default_value_t = 15, allow_negative_numbers = true)]
    pub speed: i64,

    /// Chance that a cell starts alive
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    pub variance: f64,

    /// Show debug info, D to toggle in game
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Draw grid lines, L to toggle in game
    #[arg(long, default_value_t = false)]
    pub lines: bool,

    /// Open fullscreen
    #[arg(long, default_value_t = false)]
    pub fullscreen: bool,

    /// Seed for reproducible boards (reset replays the same board)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start from a named pattern instead of random noise
    #[arg(long)]
    pub pattern: Option<String>,
}

impl Args {
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            width: self.width,
            height: self.height,
            speed: self.speed,
            live_probability: self.variance,
            seed: self.seed,
            pattern: self.pattern.clone(),
            // One pixel per cell: blit the RGBA mirror instead of drawing rects.
            pixel_buffer: self.cell_size == 1,
        }
    }

    /// Window size in logical pixels.
    pub fn window_size(&self) -> [f32; 2] {
        let cell = self.cell_size as f32;
        [self.width as f32 * cell, self.height as f32 * cell]
    }
}
