use bevy::prelude::*;

use crate::scenario::ScenarioConfig;

// --- Physics Defaults ---
/// Default gravitational constant, scaled up so attraction is visible on screen.
pub const DEFAULT_G: f32 = 6.67;
/// Separation floor used by the force model to keep forces finite.
pub const DEFAULT_MIN_DISTANCE: f32 = 20.0;
/// World units per physics length unit.
pub const DEFAULT_LENGTH_SCALE: f32 = 75.0;
/// Fully elastic collisions.
pub const DEFAULT_RESTITUTION: f32 = 1.0;
/// Extra separation added when pushing overlapping bodies apart.
pub const DEFAULT_SEPARATION_EPSILON: f32 = 0.1;
/// Side length of the square world.
pub const WORLD_SIZE: f32 = 1000.0;
/// Upper bound on fixed substeps consumed per frame.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

// --- Rendering Defaults ---
/// Vertices in the polygon used to outline a body.
pub const CIRCLE_SEGMENTS: usize = 18;
/// Side length of the square drawn for each trail point.
pub const TRAIL_POINT_SIZE: f32 = 3.0;

/// How elapsed wall-clock time is turned into physics steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeStep {
    /// One step per frame using the frame's elapsed time.
    Variable,
    /// Consume elapsed time in `dt` increments, carrying the remainder.
    Fixed { dt: f32, max_substeps: u32 },
}

/// Global tunables of a simulated world.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    pub g: f32,
    pub min_distance: f32,
    pub length_scale: f32,
    pub max_force: Option<f32>,
    pub restitution: f32,
    pub separation_epsilon: f32,
    pub gravity_enabled: bool,
    pub world_size: Vec2,
    pub time_step: TimeStep,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            min_distance: DEFAULT_MIN_DISTANCE,
            length_scale: DEFAULT_LENGTH_SCALE,
            max_force: None,
            restitution: DEFAULT_RESTITUTION,
            separation_epsilon: DEFAULT_SEPARATION_EPSILON,
            gravity_enabled: true,
            world_size: Vec2::splat(WORLD_SIZE),
            time_step: TimeStep::Variable,
        }
    }
}

/// User-facing toggles that drive rendering and playback.
#[derive(Resource)]
pub struct SimSettings {
    pub time_scale: f32,
    pub paused: bool,
    pub show_trails: bool,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            paused: false,
            show_trails: true,
        }
    }
}

/// Scenario the app was started with; resets rebuild the world from it.
#[derive(Resource, Clone)]
pub struct InitialScenario(pub ScenarioConfig);

/// Marker resource to request a simulation reset from the UI.
#[derive(Resource, Default)]
pub struct ResetSimulation {
    pub pending: bool,
}
