use bevy::prelude::*;
use bevy_egui::EguiContexts;
use bevy_egui::egui;

use crate::resources::{ResetSimulation, SimSettings};
use crate::simulation::Simulation;

pub fn ui_controls(
    mut contexts: EguiContexts,
    mut settings: ResMut<SimSettings>,
    mut sim: ResMut<Simulation>,
    mut frames_rendered: Local<usize>,
    mut reset: ResMut<ResetSimulation>,
) {
    if *frames_rendered < 5 {
        *frames_rendered += 1;
        return;
    }

    let steps = sim.steps();
    let energy = sim.kinetic_energy();
    let momentum = sim.total_momentum();
    let trail_points: usize = sim.bodies().iter().map(|body| body.trail().len()).sum();

    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Window::new("Simulation Controls")
            .default_pos(egui::pos2(10.0, 10.0))
            .max_size([320.0, 310.0])
            .vscroll(true)
            .show(ctx, |ui| {
                ui.heading("Playback");
                ui.add(
                    egui::Slider::new(&mut settings.time_scale, 0.1..=5.0)
                        .text("Time Scale (Speed)"),
                );
                ui.checkbox(&mut settings.paused, "Paused");
                ui.checkbox(&mut settings.show_trails, "Show Trails");

                ui.separator();
                ui.heading("Physics");
                ui.checkbox(&mut sim.config.gravity_enabled, "Gravity");
                ui.add(egui::Slider::new(&mut sim.config.g, 0.0..=50.0).text("G (Gravity)"));
                ui.add(
                    egui::Slider::new(&mut sim.config.restitution, 0.0..=1.0)
                        .text("Restitution"),
                );

                ui.separator();
                ui.label(format!("Steps: {steps}"));
                ui.label(format!("Kinetic energy: {energy:.1}"));
                ui.label(format!("Momentum: ({:.1}, {:.1})", momentum.x, momentum.y));
                ui.label(format!("Trail points: {trail_points}"));

                if ui.button("Reset Simulation").clicked() {
                    reset.pending = true;
                }
            });
    }
}
