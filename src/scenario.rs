//! Scenario descriptions: the tunables and initial bodies of a world.
//!
//! Scenarios are loaded from YAML, for example:
//!
//! ```yaml
//! physics:
//!   g: 6.67
//!   restitution: 0.9
//!   max_force: 5000.0
//!   fixed_step: 0.008
//! bodies:
//!   - radius: 50.0
//!     color: [1.0, 0.0, 0.0]
//!     mass: 1.0
//!     position: [500.0, 500.0]
//!     velocity: [0.0, 50.0]
//!     trail_limit: 300   # omit, null or -1 for an unbounded trail
//! ```
//!
//! Every `physics` key is optional and falls back to the defaults in
//! [`crate::resources`].

use anyhow::{Context, Result, bail, ensure};
use bevy::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::body::Body;
use crate::resources::*;
use crate::simulation::Simulation;

/// Placement attempts per body before a random scenario gives up.
const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

/// Global tunables as written in a scenario file.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsSection {
    pub g: f32,
    pub min_distance: f32,
    pub length_scale: f32,
    pub max_force: Option<f32>,
    pub restitution: f32,
    pub separation_epsilon: f32,
    pub gravity_enabled: bool,
    pub world_size: [f32; 2],
    /// Fixed physics step in seconds; absent means one step per frame.
    pub fixed_step: Option<f32>,
    pub max_substeps: u32,
}

impl Default for PhysicsSection {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            min_distance: DEFAULT_MIN_DISTANCE,
            length_scale: DEFAULT_LENGTH_SCALE,
            max_force: None,
            restitution: DEFAULT_RESTITUTION,
            separation_epsilon: DEFAULT_SEPARATION_EPSILON,
            gravity_enabled: true,
            world_size: [WORLD_SIZE, WORLD_SIZE],
            fixed_step: None,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
        }
    }
}

/// Initial state of one body.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    pub radius: f32,
    pub color: [f32; 3],
    pub mass: f32,
    pub position: [f32; 2],
    #[serde(default)]
    pub velocity: [f32; 2],
    /// Negative values, like an absent key, mean unbounded.
    #[serde(default)]
    pub trail_limit: Option<i64>,
}

/// Top-level scenario loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub physics: PhysicsSection,
    pub bodies: Vec<BodyConfig>,
}

impl Default for ScenarioConfig {
    /// Two equal red and blue circles drifting apart vertically.
    fn default() -> Self {
        Self {
            physics: PhysicsSection::default(),
            bodies: vec![
                BodyConfig {
                    radius: 50.0,
                    color: [1.0, 0.0, 0.0],
                    mass: 1.0,
                    position: [500.0, 500.0],
                    velocity: [0.0, 50.0],
                    trail_limit: None,
                },
                BodyConfig {
                    radius: 50.0,
                    color: [0.0, 0.0, 1.0],
                    mass: 1.0,
                    position: [300.0, 300.0],
                    velocity: [0.0, -50.0],
                    trail_limit: None,
                },
            ],
        }
    }
}

impl BodyConfig {
    fn trail_limit(&self) -> Option<usize> {
        self.trail_limit.and_then(|limit| usize::try_from(limit).ok())
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.mass.is_finite() && self.mass > 0.0,
            "mass must be positive, got {}",
            self.mass
        );
        ensure!(
            self.radius.is_finite() && self.radius > 0.0,
            "radius must be positive, got {}",
            self.radius
        );
        ensure!(
            self.position.iter().chain(&self.velocity).all(|v| v.is_finite()),
            "position and velocity must be finite"
        );
        Ok(())
    }

    fn build(&self) -> Body {
        let [r, g, b] = self.color;
        Body::new(
            self.radius,
            Srgba::rgb(r, g, b),
            self.mass,
            Vec2::from_array(self.position),
            Vec2::from_array(self.velocity),
            self.trail_limit(),
        )
    }
}

impl PhysicsSection {
    fn validate(&self) -> Result<()> {
        ensure!(self.g.is_finite(), "g must be finite, got {}", self.g);
        ensure!(
            (0.0..=1.0).contains(&self.restitution),
            "restitution must lie in [0, 1], got {}",
            self.restitution
        );
        ensure!(
            self.min_distance > 0.0,
            "min_distance must be positive, got {}",
            self.min_distance
        );
        ensure!(
            self.length_scale > 0.0,
            "length_scale must be positive, got {}",
            self.length_scale
        );
        ensure!(
            self.separation_epsilon >= 0.0,
            "separation_epsilon must not be negative, got {}",
            self.separation_epsilon
        );
        ensure!(
            self.world_size.iter().all(|side| *side > 0.0),
            "world_size must be positive, got {:?}",
            self.world_size
        );
        if let Some(max_force) = self.max_force {
            ensure!(max_force > 0.0, "max_force must be positive, got {}", max_force);
        }
        if let Some(dt) = self.fixed_step {
            ensure!(dt > 0.0, "fixed_step must be positive, got {}", dt);
            ensure!(self.max_substeps > 0, "max_substeps must be at least 1");
        }
        Ok(())
    }

    fn build(&self) -> PhysicsConfig {
        PhysicsConfig {
            g: self.g,
            min_distance: self.min_distance,
            length_scale: self.length_scale,
            max_force: self.max_force,
            restitution: self.restitution,
            separation_epsilon: self.separation_epsilon,
            gravity_enabled: self.gravity_enabled,
            world_size: Vec2::from_array(self.world_size),
            time_step: match self.fixed_step {
                Some(dt) => TimeStep::Fixed {
                    dt,
                    max_substeps: self.max_substeps,
                },
                None => TimeStep::Variable,
            },
        }
    }
}

impl ScenarioConfig {
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).context("malformed scenario")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_yaml(&source).with_context(|| format!("in {}", path.display()))
    }

    /// `count` non-overlapping bodies with random size, mass, color and drift.
    pub fn random(count: usize, seed: u64) -> Result<Self> {
        let physics = PhysicsSection::default();
        let world = Vec2::from_array(physics.world_size);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut bodies: Vec<BodyConfig> = Vec::with_capacity(count);

        for index in 0..count {
            let radius = rng.random_range(10.0..40.0);
            let placed = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
                let candidate = vec2(
                    rng.random_range(radius..world.x - radius),
                    rng.random_range(radius..world.y - radius),
                );
                let clear = bodies.iter().all(|other| {
                    candidate.distance(Vec2::from_array(other.position)) > radius + other.radius
                });
                clear.then_some(candidate)
            });
            let Some(position) = placed else {
                bail!(
                    "no room for body {} of {} after {} attempts",
                    index + 1,
                    count,
                    MAX_PLACEMENT_ATTEMPTS
                );
            };

            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(0.0..60.0);
            bodies.push(BodyConfig {
                radius,
                color: [
                    rng.random_range(0.3..1.0),
                    rng.random_range(0.3..1.0),
                    rng.random_range(0.3..1.0),
                ],
                // constant density keeps big circles heavy
                mass: radius * radius / 100.0,
                position: position.to_array(),
                velocity: (Vec2::from_angle(angle) * speed).to_array(),
                trail_limit: Some(400),
            });
        }

        Ok(Self { physics, bodies })
    }

    /// Overrides the scenario's stepping with a fixed `dt`.
    pub fn with_fixed_step(mut self, dt: f32) -> Self {
        self.physics.fixed_step = Some(dt);
        self
    }

    /// Validates the scenario and builds a ready-to-run world.
    pub fn build(&self) -> Result<Simulation> {
        ensure!(!self.bodies.is_empty(), "scenario has no bodies");
        self.physics.validate().context("invalid physics section")?;
        for (index, body) in self.bodies.iter().enumerate() {
            body.validate().with_context(|| format!("invalid body #{index}"))?;
        }

        let bodies = self.bodies.iter().map(BodyConfig::build).collect();
        Ok(Simulation::new(self.physics.build(), bodies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BODY_YAML: &str = r#"
physics:
  g: 10.0
  restitution: 0.8
  max_force: 250.0
  fixed_step: 0.01
bodies:
  - radius: 100.0
    color: [1.0, 0.0, 0.0]
    mass: 50.0
    position: [500.0, 750.0]
    velocity: [50.0, -50.0]
    trail_limit: -1
  - radius: 50.0
    color: [0.0, 0.0, 1.0]
    mass: 25.0
    position: [200.0, 300.0]
    velocity: [25.0, 50.0]
    trail_limit: 120
"#;

    #[test]
    fn parses_yaml_with_partial_physics_section() {
        let scenario = ScenarioConfig::from_yaml(TWO_BODY_YAML).expect("valid scenario");

        assert_eq!(scenario.bodies.len(), 2);
        assert_eq!(scenario.physics.g, 10.0);
        assert_eq!(scenario.physics.min_distance, DEFAULT_MIN_DISTANCE);
        assert_eq!(scenario.bodies[0].trail_limit(), None);
        assert_eq!(scenario.bodies[1].trail_limit(), Some(120));
    }

    #[test]
    fn build_carries_tunables_into_the_world() {
        let sim = ScenarioConfig::from_yaml(TWO_BODY_YAML)
            .and_then(|scenario| scenario.build())
            .expect("scenario builds");

        assert_eq!(sim.config.restitution, 0.8);
        assert_eq!(sim.config.max_force, Some(250.0));
        assert_eq!(
            sim.config.time_step,
            TimeStep::Fixed {
                dt: 0.01,
                max_substeps: DEFAULT_MAX_SUBSTEPS
            }
        );
        assert_eq!(sim.bodies()[1].mass(), 25.0);
        assert_eq!(sim.bodies()[1].trail().limit(), Some(120));
    }

    #[test]
    fn default_scenario_is_the_red_and_blue_pair() {
        let sim = ScenarioConfig::default().build().expect("default builds");

        assert_eq!(sim.bodies().len(), 2);
        assert_eq!(sim.bodies()[0].color, Srgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(sim.bodies()[1].position, vec2(300.0, 300.0));
        assert_eq!(sim.config.time_step, TimeStep::Variable);
    }

    #[test]
    fn bundled_scenario_builds() {
        let scenario = ScenarioConfig::from_yaml(include_str!("../scenarios/three_body.yaml"))
            .expect("bundled scenario parses");
        let sim = scenario.build().expect("bundled scenario builds");

        assert_eq!(sim.bodies().len(), 3);
        assert_eq!(sim.bodies()[2].trail().limit(), None);
    }

    #[test]
    fn rejects_zero_mass() {
        let mut scenario = ScenarioConfig::default();
        scenario.bodies[1].mass = 0.0;

        let err = scenario.build().unwrap_err();
        assert!(format!("{err:#}").contains("mass must be positive"));
    }

    #[test]
    fn rejects_restitution_above_one() {
        let mut scenario = ScenarioConfig::default();
        scenario.physics.restitution = 1.5;

        assert!(scenario.build().is_err());
    }

    #[test]
    fn rejects_non_finite_gravitational_constant() {
        let yaml = "physics:\n  g: .nan\nbodies:\n  - radius: 5.0\n    color: [1.0, 1.0, 1.0]\n    mass: 1.0\n    position: [100.0, 100.0]\n";
        let scenario = ScenarioConfig::from_yaml(yaml).expect("parses");
        let err = scenario.build().unwrap_err();
        assert!(format!("{err:#}").contains("g must be finite"));

        let mut scenario = ScenarioConfig::default();
        scenario.physics.g = f32::INFINITY;
        assert!(scenario.build().is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        let yaml = "bodies: []\nphysics:\n  gravity: 3.0\n";
        assert!(ScenarioConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn rejects_empty_world() {
        let scenario = ScenarioConfig::from_yaml("bodies: []").expect("parses");
        assert!(scenario.build().is_err());
    }

    #[test]
    fn random_scenario_is_seeded_and_non_overlapping() {
        let first = ScenarioConfig::random(12, 7).expect("room for 12 bodies");
        let second = ScenarioConfig::random(12, 7).expect("room for 12 bodies");
        assert_eq!(first, second);

        let sim = first.build().expect("random scenario builds");
        let bodies = sim.bodies();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let gap = bodies[i].position.distance(bodies[j].position);
                assert!(gap > bodies[i].radius + bodies[j].radius);
            }
        }
    }

    #[test]
    fn fixed_step_override_switches_stepping_mode() {
        let sim = ScenarioConfig::default()
            .with_fixed_step(1.0 / 120.0)
            .build()
            .expect("builds");

        assert!(matches!(sim.config.time_step, TimeStep::Fixed { .. }));
    }
}
