// simulation.rs - Drives the grid at a generations-per-second target from a fixed frame cadence

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, trace};

use crate::error::LifeError;
use crate::grid::{Grid, cell_count, validate_probability};
use crate::patterns::{self, Pattern};
use crate::pixels::{CELL_COLOR, PixelBuffer};

pub const MIN_SPEED: u32 = 0;
pub const MAX_SPEED: u32 = 60;
/// Speed change applied by one faster/slower command.
pub const SPEED_STEP: i32 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    /// Generations per second; clamped into [MIN_SPEED, MAX_SPEED].
    pub speed: i64,
    pub live_probability: f64,
    /// Fixed seed makes every board, including those after reset, reproducible.
    pub seed: Option<u64>,
    /// Stamp this pattern at the centre instead of filling at random.
    pub pattern: Option<String>,
    /// Keep an RGBA mirror of the grid for one-pixel-per-cell rendering.
    pub pixel_buffer: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 80,
            speed: 15,
            live_probability: 0.5,
            seed: None,
            pattern: None,
            pixel_buffer: false,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), LifeError> {
        cell_count(self.width, self.height)?;
        validate_probability(self.live_probability)?;
        if let Some(name) = &self.pattern {
            patterns::find(name)?;
        }
        Ok(())
    }
}

/// Discrete commands forwarded by the input layer, at most once each per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Reset,
    Step,
    ToggleDebug,
    ToggleGridLines,
    IncreaseSpeed,
    DecreaseSpeed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// What the overlay shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationState {
    pub generation: u64,
    pub population: usize,
    pub speed: u32,
    pub run_state: RunState,
}

pub struct Simulation {
    config       : SimulationConfig,
    rng          : StdRng,
    grid         : Grid,
    pixels       : Option<PixelBuffer>,
    generation   : u64,
    population   : usize,
    speed        : u32,
    ticks        : u32,   // frames since the last step
    debug_overlay: bool,
    grid_lines   : bool,
}

impl Simulation {
    /// Validate `config` and build the first board.
    pub fn configure(config: SimulationConfig) -> Result<Self, LifeError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = seed_grid(&config, &mut rng)?;
        let pixels = config.pixel_buffer.then(|| PixelBuffer::for_grid(&grid, CELL_COLOR));

        let simulation = Self {
            speed: clamp_speed(config.speed),
            population: grid.population(),
            config,
            rng,
            grid,
            pixels,
            generation: 0,
            ticks: 0,
            debug_overlay: false,
            grid_lines: false,
        };
        info!(
            width = simulation.config.width,
            height = simulation.config.height,
            speed = simulation.speed,
            population = simulation.population,
            "simulation configured"
        );
        Ok(simulation)
    }

    /// Start with the overlays already switched on or off.
    pub fn with_overlays(mut self, debug_overlay: bool, grid_lines: bool) -> Self {
        self.debug_overlay = debug_overlay;
        self.grid_lines = grid_lines;
        self
    }

    /// Call once per presentation frame. Returns true when a generation was applied.
    pub fn tick(&mut self, frames_per_second: f64) -> bool {
        if self.speed == 0 {
            return false;
        }

        self.ticks += 1;
        if f64::from(self.ticks) > frames_per_second / f64::from(self.speed) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Apply one generation now, regardless of speed.
    pub fn step_once(&mut self) {
        self.advance();
    }

    fn advance(&mut self) {
        self.population = self.grid.step();
        if let Some(pixels) = self.pixels.as_mut() {
            pixels.sync(&self.grid, CELL_COLOR);
        }
        self.generation += 1;
        self.ticks = 0;
        trace!(generation = self.generation, population = self.population, "generation");
    }

    /// Shift the speed by `delta`, clamped into [MIN_SPEED, MAX_SPEED].
    pub fn set_speed(&mut self, delta: i32) -> u32 {
        self.speed = clamp_speed(i64::from(self.speed) + i64::from(delta));
        debug!(speed = self.speed, "speed changed");
        self.speed
    }

    /// Rebuild the board from the configuration it was built with.
    pub fn reset(&mut self) -> Result<(), LifeError> {
        if let Some(seed) = self.config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.grid = seed_grid(&self.config, &mut self.rng)?;
        self.pixels = self
            .config
            .pixel_buffer
            .then(|| PixelBuffer::for_grid(&self.grid, CELL_COLOR));
        self.population = self.grid.population();
        self.generation = 0;
        self.ticks = 0;
        info!(population = self.population, "simulation reset");
        Ok(())
    }

    pub fn toggle_debug_overlay(&mut self) -> bool {
        self.debug_overlay = !self.debug_overlay;
        debug!(on = self.debug_overlay, "debug overlay toggled");
        self.debug_overlay
    }

    pub fn toggle_grid_lines(&mut self) -> bool {
        self.grid_lines = !self.grid_lines;
        debug!(on = self.grid_lines, "grid lines toggled");
        self.grid_lines
    }

    pub fn apply(&mut self, command: Command) -> Result<Flow, LifeError> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Reset => self.reset()?,
            Command::Step => self.step_once(),
            Command::ToggleDebug => {
                self.toggle_debug_overlay();
            }
            Command::ToggleGridLines => {
                self.toggle_grid_lines();
            }
            Command::IncreaseSpeed => {
                self.set_speed(SPEED_STEP);
            }
            Command::DecreaseSpeed => {
                self.set_speed(-SPEED_STEP);
            }
        }
        Ok(Flow::Continue)
    }

    pub fn state(&self) -> SimulationState {
        SimulationState {
            generation: self.generation,
            population: self.population,
            speed: self.speed,
            run_state: self.run_state(),
        }
    }

    pub fn run_state(&self) -> RunState {
        if self.speed == 0 { RunState::Paused } else { RunState::Running }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// RGBA mirror of the grid, when enabled in the configuration.
    pub fn pixels(&self) -> Option<&PixelBuffer> {
        self.pixels.as_ref()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    pub fn grid_lines(&self) -> bool {
        self.grid_lines
    }
}

fn clamp_speed(speed: i64) -> u32 {
    speed.clamp(i64::from(MIN_SPEED), i64::from(MAX_SPEED)) as u32
}

fn seed_grid(config: &SimulationConfig, rng: &mut StdRng) -> Result<Grid, LifeError> {
    match &config.pattern {
        Some(name) => {
            let pattern = patterns::find(name)?;
            let mut grid = Grid::new(config.width, config.height)?;
            let (x, y) = centered(pattern, &grid);
            grid.stamp(pattern, x, y);
            Ok(grid)
        }
        None => Grid::random(config.width, config.height, config.live_probability, rng),
    }
}

/// Origin that centres `pattern` on `grid`; oversized patterns start at the corner.
fn centered(pattern: &Pattern, grid: &Grid) -> (usize, usize) {
    let (w, h) = pattern.size();
    (grid.width().saturating_sub(w) / 2, grid.height().saturating_sub(h) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(speed: i64) -> Simulation {
        Simulation::configure(SimulationConfig {
            width: 20,
            height: 20,
            speed,
            seed: Some(11),
            ..SimulationConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn defaults_follow_the_command_line_defaults() {
        let config = SimulationConfig::default();
        assert_eq!((config.width, config.height), (80, 80));
        assert_eq!(config.speed, 15);
        assert_eq!(config.live_probability, 0.5);
    }

    #[test]
    fn configure_rejects_bad_input() {
        let bad_size = SimulationConfig { width: 0, ..SimulationConfig::default() };
        assert!(matches!(
            Simulation::configure(bad_size),
            Err(LifeError::InvalidDimension { .. })
        ));

        let bad_probability = SimulationConfig { live_probability: 2.0, ..SimulationConfig::default() };
        assert_eq!(
            Simulation::configure(bad_probability).err(),
            Some(LifeError::InvalidProbability(2.0))
        );

        let bad_pattern = SimulationConfig { pattern: Some("spaceship".into()), ..SimulationConfig::default() };
        assert!(matches!(
            Simulation::configure(bad_pattern),
            Err(LifeError::UnknownPattern(_))
        ));
    }

    #[test]
    fn starts_at_generation_zero() {
        let sim = seeded(15);
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.population(), sim.grid().population());
        assert_eq!(sim.run_state(), RunState::Running);
    }

    #[test]
    fn configured_speed_is_clamped() {
        assert_eq!(seeded(500).speed(), MAX_SPEED);
        assert_eq!(seeded(-3).speed(), MIN_SPEED);
        assert_eq!(seeded(-3).run_state(), RunState::Paused);
    }

    #[test]
    fn paused_never_advances() {
        let mut sim = seeded(0);
        let before = sim.grid().clone();
        for _ in 0..1_000 {
            assert!(!sim.tick(60.0));
        }
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.grid(), &before);
    }

    #[test]
    fn steps_once_the_threshold_is_exceeded() {
        // 60 fps at 15 gen/s: threshold 4 frames, step on the 5th.
        let mut sim = seeded(15);
        let advanced: Vec<bool> = (0..10).map(|_| sim.tick(60.0)).collect();
        assert_eq!(
            advanced,
            [false, false, false, false, true, false, false, false, false, true]
        );
        assert_eq!(sim.generation(), 2);
    }

    #[test]
    fn full_speed_advances_at_most_once_per_tick() {
        let mut sim = seeded(60);
        let mut last = sim.generation();
        for _ in 0..120 {
            sim.tick(60.0);
            assert!(sim.generation() - last <= 1);
            last = sim.generation();
        }
        assert_eq!(sim.generation(), 60);
    }

    #[test]
    fn set_speed_stays_in_range() {
        let mut sim = seeded(15);
        for _ in 0..50 {
            sim.set_speed(SPEED_STEP);
        }
        assert_eq!(sim.speed(), MAX_SPEED);
        assert_eq!(sim.set_speed(i32::MAX), MAX_SPEED);
        assert_eq!(sim.set_speed(i32::MIN), MIN_SPEED);
        assert_eq!(sim.run_state(), RunState::Paused);
        assert_eq!(sim.set_speed(SPEED_STEP), 5);
    }

    #[test]
    fn step_command_works_while_paused() {
        let mut sim = seeded(0);
        assert_eq!(sim.apply(Command::Step), Ok(Flow::Continue));
        assert_eq!(sim.generation(), 1);
        assert_eq!(sim.population(), sim.grid().population());
    }

    #[test]
    fn seeded_reset_reproduces_the_first_board() {
        let mut sim = seeded(60);
        let first = sim.grid().clone();
        for _ in 0..10 {
            sim.tick(60.0);
        }
        assert!(sim.generation() > 0);

        sim.reset().unwrap();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.grid(), &first);
        assert_eq!(sim.population(), first.population());
    }

    #[test]
    fn unseeded_reset_draws_a_fresh_board() {
        let mut sim = Simulation::configure(SimulationConfig {
            width: 64,
            height: 48,
            speed: 60,
            ..SimulationConfig::default()
        })
        .unwrap();
        let first = sim.grid().clone();
        sim.step_once();

        sim.reset().unwrap();
        assert_eq!(sim.generation(), 0);
        assert_eq!((sim.grid().width(), sim.grid().height()), (64, 48));
        assert_eq!(sim.population(), sim.grid().population());
        // 3072 cells at p = 0.5: two independent draws never coincide in practice.
        assert_ne!(sim.grid(), &first);
    }

    #[test]
    fn oversized_board_fails_validation() {
        let config = SimulationConfig {
            width: usize::MAX,
            height: 1,
            pixel_buffer: true,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(LifeError::InvalidDimension { width: usize::MAX, height: 1 })
        );
        assert!(matches!(
            Simulation::configure(config),
            Err(LifeError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn reset_clears_the_accumulator() {
        let mut sim = seeded(15);
        for _ in 0..4 {
            assert!(!sim.tick(60.0));
        }
        sim.reset().unwrap();
        for _ in 0..4 {
            assert!(!sim.tick(60.0));
        }
        assert!(sim.tick(60.0));
    }

    #[test]
    fn commands() {
        let mut sim = seeded(15);
        assert_eq!(sim.apply(Command::IncreaseSpeed), Ok(Flow::Continue));
        assert_eq!(sim.speed(), 20);
        sim.apply(Command::DecreaseSpeed).unwrap();
        sim.apply(Command::DecreaseSpeed).unwrap();
        assert_eq!(sim.speed(), 10);

        assert!(!sim.debug_overlay());
        sim.apply(Command::ToggleDebug).unwrap();
        assert!(sim.debug_overlay());
        sim.apply(Command::ToggleGridLines).unwrap();
        assert!(sim.grid_lines());
        assert_eq!(sim.generation(), 0);

        assert_eq!(sim.apply(Command::Quit), Ok(Flow::Quit));
    }

    #[test]
    fn pattern_is_centred() {
        let sim = Simulation::configure(SimulationConfig {
            width: 5,
            height: 5,
            pattern: Some("blinker".into()),
            ..SimulationConfig::default()
        })
        .unwrap();
        let grid = sim.grid();
        assert_eq!(grid.population(), 3);
        assert!(grid.get(1, 2) && grid.get(2, 2) && grid.get(3, 2));
    }

    #[test]
    fn pixel_buffer_follows_generations() {
        let mut sim = Simulation::configure(SimulationConfig {
            width: 5,
            height: 5,
            pattern: Some("blinker".into()),
            pixel_buffer: true,
            ..SimulationConfig::default()
        })
        .unwrap();

        let lit = |sim: &Simulation| {
            sim.pixels()
                .unwrap()
                .as_bytes()
                .chunks_exact(4)
                .filter(|px| *px == CELL_COLOR)
                .count()
        };
        assert_eq!(lit(&sim), 3);
        sim.step_once();
        assert_eq!(lit(&sim), 3);
        assert_eq!(&sim.pixels().unwrap().as_bytes()[(5 + 2) * 4..][..4], &CELL_COLOR);
        sim.reset().unwrap();
        assert_eq!(&sim.pixels().unwrap().as_bytes()[(5 + 2) * 4..][..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn no_pixel_buffer_unless_asked() {
        assert!(seeded(15).pixels().is_none());
    }
}
