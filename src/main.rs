mod body;
mod collision;
mod forces;
mod render;
mod resources;
mod scenario;
mod simulation;
mod systems;

use anyhow::Result;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use clap::Parser;
use std::path::PathBuf;

use crate::resources::{InitialScenario, ResetSimulation, SimSettings, WORLD_SIZE};
use crate::scenario::ScenarioConfig;
use crate::systems::*;

/// Circles under mutual gravity bouncing around a walled square.
#[derive(Parser, Debug)]
struct Args {
    /// YAML scenario to load instead of the built-in pair
    #[arg(short, long, conflicts_with = "random")]
    scenario: Option<PathBuf>,

    /// Spawn this many random bodies
    #[arg(long)]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Step physics in fixed increments of this many seconds
    #[arg(long)]
    fixed_step: Option<f32>,
}

fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    let scenario = match (&args.scenario, args.random) {
        (Some(path), _) => ScenarioConfig::load(path)?,
        (None, Some(count)) => ScenarioConfig::random(count, args.seed)?,
        (None, None) => ScenarioConfig::default(),
    };
    Ok(match args.fixed_step {
        Some(dt) => scenario.with_fixed_step(dt),
        None => scenario,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    let scenario = load_scenario(&args)?;
    let simulation = scenario.build()?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Gravity Circles".into(),
                resolution: WindowResolution::new(WORLD_SIZE as u32, WORLD_SIZE as u32),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(simulation)
        .insert_resource(InitialScenario(scenario))
        .init_resource::<SimSettings>()
        .init_resource::<ResetSimulation>()
        .add_systems(EguiPrimaryContextPass, ui_controls)
        .add_systems(Startup, setup_scene)
        .add_systems(
            Update,
            (
                apply_reset_request,
                fit_camera_to_world,
                advance_simulation,
                draw_bodies,
            )
                .chain(),
        )
        .run();

    Ok(())
}
