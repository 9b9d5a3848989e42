use bevy::camera::ScalingMode;
use bevy::prelude::*;

use crate::render::{world_projection, world_to_screen};
use crate::resources::*;
use crate::simulation::Simulation;

/// Spawns the 2D camera the gizmos are drawn through, framed on the world.
pub fn setup_scene(mut commands: Commands, sim: Res<Simulation>) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(world_projection(sim.config.world_size)),
    ));
    info!(
        "starting simulation with {} bodies, time step {:?}",
        sim.bodies().len(),
        sim.config.time_step
    );
    for (index, body) in sim.bodies().iter().enumerate() {
        debug!(
            "body #{index}: mass {} radius {} at {:?}, trail limit {:?}",
            body.mass(),
            body.radius,
            body.position,
            body.trail().limit()
        );
    }
}

/// Advances the world by the frame's elapsed time scaled by user settings.
pub fn advance_simulation(
    mut sim: ResMut<Simulation>,
    settings: Res<SimSettings>,
    time: Res<Time>,
) {
    if settings.paused {
        return;
    }

    let elapsed = time.delta_secs() * settings.time_scale;
    let report = sim.advance(elapsed);
    if report.contacts > 0 {
        debug!(
            "frame of {:.4}s: {} steps, {} contacts",
            elapsed, report.steps, report.contacts
        );
    }
}

/// Draws each body's trail as points and its outline as a closed polygon.
pub fn draw_bodies(mut gizmos: Gizmos, sim: Res<Simulation>, settings: Res<SimSettings>) {
    let world_size = sim.config.world_size;

    for view in sim.views() {
        if settings.show_trails && view.has_trail() {
            let trail_color = Color::from(view.trail_color());
            for point in view.trail() {
                gizmos.rect_2d(
                    Isometry2d::from_translation(world_to_screen(point, world_size)),
                    Vec2::splat(TRAIL_POINT_SIZE),
                    trail_color,
                );
            }
        }

        let outline = view.outline(CIRCLE_SEGMENTS);
        let closing = outline.first().copied();
        gizmos.linestrip_2d(
            outline
                .into_iter()
                .chain(closing)
                .map(|point| world_to_screen(point, world_size)),
            Color::from(view.color),
        );
    }
}

/// Keeps the camera framing the whole world, including after a reset.
pub fn fit_camera_to_world(sim: Res<Simulation>, mut cameras: Query<&mut Projection>) {
    let world_size = sim.config.world_size;
    for mut projection in &mut cameras {
        let framed = matches!(
            &*projection,
            Projection::Orthographic(ortho) if matches!(
                ortho.scaling_mode,
                ScalingMode::AutoMin { min_width, min_height }
                    if min_width == world_size.x && min_height == world_size.y
            )
        );
        if !framed {
            *projection = Projection::Orthographic(world_projection(world_size));
        }
    }
}

/// Responds to a pending reset: rebuilds the world from the initial scenario.
pub fn apply_reset_request(
    mut sim: ResMut<Simulation>,
    mut reset: ResMut<ResetSimulation>,
    mut settings: ResMut<SimSettings>,
    initial: Res<InitialScenario>,
) {
    if !reset.pending {
        return;
    }
    reset.pending = false;

    match initial.0.build() {
        Ok(fresh) => {
            *sim = fresh;
            *settings = SimSettings::default();
            info!("simulation reset to its initial scenario");
        }
        Err(err) => error!("reset failed: {err:#}"),
    }
}
