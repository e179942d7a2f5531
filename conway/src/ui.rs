// ui.rs - Window frame loop: input, pacing, and drawing the board

use std::time::Instant;

use conway_life::{CELL_COLOR, Flow, Simulation, SimulationState};
use eframe::egui;
use egui::{Align2, Color32, ColorImage, FontId, Rect, Stroke, TextureHandle, TextureOptions, Vec2, pos2};
use tracing::error;

use crate::clock::{FRAMES_PER_SECOND, FrameClock};
use crate::input;

const CELL: Color32 = Color32::from_rgb(CELL_COLOR[0], CELL_COLOR[1], CELL_COLOR[2]);

pub struct LifeApp {
    simulation : Simulation,
    cell_size  : f32,
    clock      : FrameClock,
    texture    : Option<TextureHandle>,
    dirty      : bool,   // pixel buffer changed since the last upload
}

impl LifeApp {
    pub fn new(simulation: Simulation, cell_size: u32) -> Self {
        Self {
            simulation,
            cell_size: cell_size as f32,
            clock: FrameClock::new(FRAMES_PER_SECOND, Instant::now()),
            texture: None,
            dirty: true,
        }
    }

    /// Apply this frame's commands. Returns false once the app should close.
    fn handle_input(&mut self, ctx: &egui::Context) -> bool {
        let commands = ctx.input(input::collect_commands);
        for command in commands {
            match self.simulation.apply(command) {
                Ok(Flow::Continue) => self.dirty = true,
                Ok(Flow::Quit) => return false,
                Err(err) => {
                    error!(%err, ?command, "command failed");
                    return false;
                }
            }
        }
        true
    }

    fn run_frames(&mut self) {
        let frames = self.clock.advance(Instant::now());
        let fps = self.clock.frames_per_second();
        for _ in 0..frames {
            if self.simulation.tick(fps) {
                self.dirty = true;
            }
        }
    }

    fn draw(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let canvas = response.rect;

        if self.simulation.pixels().is_some() {
            let texture = self.board_texture(ui.ctx());
            let grid = self.simulation.grid();
            let size = Vec2::new(grid.width() as f32, grid.height() as f32) * self.cell_size;
            painter.image(
                texture,
                Rect::from_min_size(canvas.min, size),
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        } else {
            let grid = self.simulation.grid();
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    if grid.cells()[grid.index(x, y)] {
                        let min = canvas.min + Vec2::new(x as f32, y as f32) * self.cell_size;
                        painter.rect_filled(
                            Rect::from_min_size(min, Vec2::splat(self.cell_size)),
                            0.0,
                            CELL,
                        );
                    }
                }
            }
        }

        if self.simulation.grid_lines() {
            let stroke = Stroke::new(1.0, Color32::WHITE);
            for offset in line_offsets(canvas.height(), self.cell_size) {
                let y = canvas.min.y + offset;
                painter.line_segment([pos2(canvas.min.x, y), pos2(canvas.max.x, y)], stroke);
            }
            for offset in line_offsets(canvas.width(), self.cell_size) {
                let x = canvas.min.x + offset;
                painter.line_segment([pos2(x, canvas.min.y), pos2(x, canvas.max.y)], stroke);
            }
        }

        if self.simulation.debug_overlay() {
            painter.text(
                canvas.min + Vec2::splat(5.0),
                Align2::LEFT_TOP,
                overlay_text(&self.simulation.state()),
                FontId::monospace(14.0),
                Color32::WHITE,
            );
        }
    }

    /// Upload the pixel buffer when it changed and hand back the texture id.
    fn board_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        if let Some(pixels) = self.simulation.pixels() {
            if self.dirty || self.texture.is_none() {
                let image = ColorImage::from_rgba_unmultiplied(
                    [pixels.width(), pixels.height()],
                    pixels.as_bytes(),
                );
                match self.texture.as_mut() {
                    Some(handle) => handle.set(image, TextureOptions::NEAREST),
                    None => {
                        self.texture = Some(ctx.load_texture("board", image, TextureOptions::NEAREST));
                    }
                }
                self.dirty = false;
            }
        }
        self.texture
            .as_ref()
            .map_or(egui::TextureId::default(), TextureHandle::id)
    }
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.handle_input(ctx) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        self.run_frames();

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| self.draw(ui));

        // Keep the fixed cadence going even without input.
        ctx.request_repaint_after(self.clock.until_next_frame());
    }
}

/// Offsets of grid lines from 0 up to and including `extent`.
fn line_offsets(extent: f32, cell_size: f32) -> impl Iterator<Item = f32> {
    let count = (extent / cell_size).floor() as usize;
    (0..=count).map(move |i| i as f32 * cell_size)
}

fn overlay_text(state: &SimulationState) -> String {
    format!(
        "Generation {}\nPopulation {}\nSpeed {}",
        state.generation, state.population, state.speed
    )
}
