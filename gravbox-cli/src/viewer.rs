//! Interactive scene viewer.
//!
//! Plays a built-in scene in real time through the fixed-timestep driver and
//! draws every body, coloured by kind and by whether it touched something
//! during the last step.

use eframe::egui;
use gravbox_core::scenes::Scene;
use gravbox_core::{BodyKind, BodyState, Simulation};

/// Real seconds per scene step at speed 1.0 for scenes in per-frame units.
const FRAME_SECONDS: f32 = 1.0 / 8.0;

pub struct SceneViewer {
    scene: &'static Scene,
    sim_opt: Option<Simulation>,
    last_load_error: Option<String>,
    playing: bool,
    speed_multiplier: f32,
}

impl SceneViewer {
    pub fn new(scene: &'static Scene, _cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            scene,
            sim_opt: None,
            last_load_error: None,
            playing: false,
            speed_multiplier: 1.0,
        };

        // Initial load
        app.reload();

        app
    }

    fn reload(&mut self) {
        match self.scene.build() {
            Ok(world) => {
                self.sim_opt = Some(Simulation::new(world));
                self.last_load_error = None;
            }
            Err(e) => {
                self.last_load_error = Some(format!("{}", e));
                self.sim_opt = None;
                self.playing = false;
            }
        }
    }

    /// Scenes stepped at dt = 1 are in frame units; play them slowed down so
    /// individual frames stay visible.
    fn time_scale(&self) -> f32 {
        if self.scene.dt >= 1.0 {
            self.scene.dt / FRAME_SECONDS
        } else {
            1.0
        }
    }

    fn advance(&mut self, elapsed: f32) {
        let scaled = elapsed * self.speed_multiplier * self.time_scale();
        if let Some(ref mut sim) = self.sim_opt {
            if let Err(e) = sim.advance(scaled) {
                self.last_load_error = Some(format!("{}", e));
                self.playing = false;
            }
        }
    }

    fn step_once(&mut self) {
        if let Some(ref mut sim) = self.sim_opt {
            if let Err(e) = sim.run_steps(1) {
                self.last_load_error = Some(format!("{}", e));
            }
        }
    }
}

fn body_colors(state: &BodyState) -> (egui::Color32, egui::Color32) {
    let fill = match state.kind {
        BodyKind::Dynamic => egui::Color32::from_rgb(120, 80, 170),
        BodyKind::Static => egui::Color32::from_rgb(40, 60, 140),
        BodyKind::Kinematic => egui::Color32::from_rgb(40, 140, 120),
    };
    let stroke = if state.contacts.any() {
        egui::Color32::RED
    } else {
        egui::Color32::LIGHT_GRAY
    };
    (fill, stroke)
}

/// World-space bounds enclosing every body, padded a little.
fn world_bounds(states: &[BodyState]) -> egui::Rect {
    let mut bounds = egui::Rect::NOTHING;
    for state in states {
        bounds.extend_with(egui::pos2(state.position.x, state.position.y));
        bounds.extend_with(egui::pos2(
            state.position.x + state.size.x,
            state.position.y + state.size.y,
        ));
    }
    if !bounds.is_positive() {
        return egui::Rect::from_center_size(egui::Pos2::ZERO, egui::vec2(20.0, 20.0));
    }
    bounds.expand(bounds.size().max_elem() * 0.25)
}

impl eframe::App for SceneViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top bar with controls
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                    self.playing = !self.playing;
                }

                if ui.button("⏮ Reset").clicked() {
                    self.reload();
                    self.playing = false;
                }

                if ui.button("⏭ Step").clicked() {
                    self.step_once();
                }

                ui.separator();

                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.speed_multiplier, 0.1..=10.0));

                ui.separator();

                ui.label(format!("Scene: {}", self.scene.name));
                if let Some(ref sim) = self.sim_opt {
                    ui.label(format!("Step: {}", sim.world().step_count()));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.max_rect();
            let painter = ui.painter();

            if let Some(ref sim) = self.sim_opt {
                let states = sim.snapshot();
                let bounds = world_bounds(&states);
                let scale = (rect.width() / bounds.width()).min(rect.height() / bounds.height());
                let to_screen = |x: f32, y: f32| {
                    rect.center()
                        + egui::vec2(x - bounds.center().x, y - bounds.center().y) * scale
                };

                for state in &states {
                    let min = to_screen(state.position.x, state.position.y);
                    let max = to_screen(
                        state.position.x + state.size.x,
                        state.position.y + state.size.y,
                    );
                    let (fill, stroke) = body_colors(state);
                    let body_rect = egui::Rect::from_min_max(min, max);
                    painter.rect_filled(body_rect, 0.0, fill);
                    painter.rect_stroke(body_rect, 0.0, egui::Stroke::new(1.5, stroke));
                }
            }

            if let Some(ref error) = self.last_load_error {
                ui.vertical_centered(|ui| {
                    ui.add_space(rect.height() * 0.4);
                    ui.label(
                        egui::RichText::new(format!("Error: {}", error))
                            .color(egui::Color32::RED)
                            .size(16.0),
                    );
                });
            }
        });

        if self.playing {
            let elapsed = ctx.input(|i| i.stable_dt).min(0.1);
            self.advance(elapsed);
            ctx.request_repaint();
        }
    }
}
