// ui.rs - Local preview window standing in for the LED display
// The canvas is painted only from screen messages, same as a remote consumer.

use std::time::{Duration, Instant};

use conway::{FrameError, FrameSink, Rgb, ScreenMessage};
use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};
use tracing::warn;

use crate::driver::{Driver, StepReport};

/// Pixel buffer rebuilt from clear/drawPixel messages.
pub struct PreviewCanvas {
    cols: usize,
    rows: usize,
    pixels: Vec<Option<Rgb>>,
}

impl PreviewCanvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            pixels: vec![None; cols * rows],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.cols && y < self.rows {
            self.pixels[x * self.rows + y]
        } else {
            None
        }
    }

    pub fn lit(&self) -> usize {
        self.pixels.iter().flatten().count()
    }
}

impl FrameSink for PreviewCanvas {
    fn publish(&mut self, message: &ScreenMessage) -> Result<(), FrameError> {
        match message {
            ScreenMessage::Clear => self.pixels.fill(None),
            ScreenMessage::DrawPixel { pixel } => {
                let (x, y) = (pixel.coordinate.x, pixel.coordinate.y);
                if x < self.cols && y < self.rows {
                    self.pixels[x * self.rows + y] = Some(pixel.color);
                }
            }
        }
        Ok(())
    }
}

pub struct Preview {
    driver: Driver,
    canvas: PreviewCanvas,
    is_running: bool,
    last_update: Instant,
    update_interval: Duration,
    last_report: Option<StepReport>,
    dead_color: Color32,
}

impl Preview {
    pub fn new(driver: Driver, update_interval: Duration) -> Self {
        let window = driver.window();
        let mut preview = Self {
            driver,
            canvas: PreviewCanvas::new(window.cols, window.rows),
            is_running: true,
            last_update: Instant::now(),
            update_interval,
            last_report: None,
            dead_color: Color32::from_rgb(20, 20, 20),
        };
        preview.refresh();
        preview
    }

    pub fn run(self) -> anyhow::Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([640.0, 760.0]),
            ..Default::default()
        };

        eframe::run_native(
            "Conway RGB preview",
            options,
            Box::new(|_cc| Box::new(self)),
        )
        .map_err(|err| anyhow::anyhow!("preview window failed: {err}"))
    }

    fn step(&mut self) {
        match self.driver.step(&mut self.canvas) {
            Ok(report) => self.last_report = Some(report),
            Err(err) => warn!(error = %err, "preview step failed"),
        }
    }

    // Repaint after a manual edit without advancing a generation
    fn refresh(&mut self) {
        if let Err(err) = self.driver.publish(&mut self.canvas) {
            warn!(error = %err, "preview refresh failed");
        }
    }
}

fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

impl eframe::App for Preview {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.is_running && self.last_update.elapsed() >= self.update_interval {
            self.step();
            self.last_update = Instant::now();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway RGB");

            ui.horizontal(|ui| {
                let button_text = if self.is_running { "⏸ Pause" } else { "▶ Start" };
                if ui.button(button_text).clicked() {
                    self.is_running = !self.is_running;
                    self.last_update = Instant::now();
                }

                if ui.button("⏭ Step").clicked() {
                    self.is_running = false;
                    self.step();
                }

                if ui.button("🎲 Reseed").clicked() {
                    self.driver.world_mut().seed_random();
                    self.refresh();
                }

                if ui.button("✈ Glider").clicked() {
                    self.driver.world_mut().inject_random_glider();
                    self.refresh();
                }

                if ui.button("⏹ Clear").clicked() {
                    self.is_running = false;
                    self.driver.world_mut().clear();
                    self.refresh();
                }
            });

            ui.horizontal(|ui| {
                ui.label("Speed:");
                let mut speed = 1000.0 / self.update_interval.as_millis().max(1) as f32;
                if ui
                    .add(egui::Slider::new(&mut speed, 0.5..=60.0).suffix(" gen/sec"))
                    .changed()
                {
                    self.update_interval = Duration::from_millis((1000.0 / speed) as u64);
                }

                ui.separator();
                ui.label("Dead:");
                ui.color_edit_button_srgba(&mut self.dead_color);
            });

            ui.separator();

            let box_size = 16.0;
            let spacing = 1.0;
            let window = self.driver.window();
            let total_size = Vec2::new(
                (box_size + spacing) * window.cols as f32 - spacing,
                (box_size + spacing) * window.rows as f32 - spacing,
            );
            let (response, painter) = ui.allocate_painter(total_size, egui::Sense::hover());
            let start_pos = response.rect.min;

            painter.rect_filled(Rect::from_min_size(start_pos, total_size), 0.0, Color32::BLACK);

            for x in 0..window.cols {
                for y in 0..window.rows {
                    let rect = Rect::from_min_size(
                        egui::pos2(
                            start_pos.x + x as f32 * (box_size + spacing),
                            start_pos.y + y as f32 * (box_size + spacing),
                        ),
                        Vec2::splat(box_size),
                    );
                    let color = self.canvas.pixel(x, y).map_or(self.dead_color, to_color32);
                    painter.rect_filled(rect, 2.0, color);
                    painter.rect_stroke(rect, 2.0, Stroke::new(0.2, Color32::from_gray(50)));
                }
            }

            ui.separator();

            let world = self.driver.world();
            ui.horizontal(|ui| {
                ui.label(format!("Generation: {}", world.generation()));
                ui.label(format!("Live cells: {}", world.live_count()));
                ui.label(format!("On screen: {}", self.canvas.lit()));
                ui.label(format!("Diversity: {}", world.history_diversity_score()));
            });

            if let Some(report) = self.last_report {
                let mut events = Vec::new();
                if report.stuck.perturbed.is_some() {
                    events.push("perturbed".to_string());
                }
                if report.stuck.reseeded {
                    events.push("reseeded".to_string());
                }
                if let Some(quadrant) = report.stuck.glider {
                    events.push(format!("glider {quadrant:?}"));
                }
                if !events.is_empty() {
                    ui.label(format!("Last step: {}", events.join(", ")));
                }
            }
        });

        if self.is_running {
            ctx.request_repaint_after(self.update_interval);
        }
    }
}
