use bevy::prelude::*;

use crate::body::Body;
use crate::collision::{colliding, resolve};
use crate::forces::gravitational_force;
use crate::render::BodyView;
use crate::resources::{PhysicsConfig, TimeStep};

/// What happened while advancing the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub steps: u32,
    pub contacts: usize,
}

/// Owns every body in the world and drives the per-frame physics pipeline.
#[derive(Resource, Debug, Clone)]
pub struct Simulation {
    pub config: PhysicsConfig,
    bodies: Vec<Body>,
    accumulator: f32,
    steps: u64,
}

impl Simulation {
    pub fn new(config: PhysicsConfig, bodies: Vec<Body>) -> Self {
        Self {
            config,
            bodies,
            accumulator: 0.0,
            steps: 0,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Steps taken since the world was built.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn views(&self) -> impl Iterator<Item = BodyView<'_>> {
        self.bodies.iter().map(BodyView::from)
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Advances the world by `elapsed` seconds of wall-clock time.
    pub fn advance(&mut self, elapsed: f32) -> StepReport {
        match self.config.time_step {
            TimeStep::Variable => self.step(elapsed),
            TimeStep::Fixed { dt, max_substeps } => {
                self.accumulator += elapsed;
                let mut report = StepReport::default();
                while self.accumulator >= dt {
                    if report.steps == max_substeps {
                        warn!(
                            "dropping {:.4}s of simulation time after {} substeps",
                            self.accumulator, max_substeps
                        );
                        self.accumulator = 0.0;
                        break;
                    }
                    self.accumulator -= dt;
                    let substep = self.step(dt);
                    report.steps += substep.steps;
                    report.contacts += substep.contacts;
                }
                report
            }
        }
    }

    /// Runs one force, integration and collision pass with timestep `dt`.
    pub fn step(&mut self, dt: f32) -> StepReport {
        if self.config.gravity_enabled {
            self.accumulate_gravity();
        }

        let world_size = self.config.world_size;
        for body in &mut self.bodies {
            body.step(dt, world_size);
        }

        let contacts = self.resolve_collisions();
        if contacts > 0 {
            debug!("step {}: resolved {} contacts", self.steps, contacts);
        }

        self.steps += 1;
        StepReport { steps: 1, contacts }
    }

    // Every ordered pair is evaluated, so each interaction is computed twice.
    fn accumulate_gravity(&mut self) {
        let count = self.bodies.len();
        for i in 0..count {
            for j in 0..count {
                if i == j {
                    continue;
                }
                let force = gravitational_force(&self.bodies[i], &self.bodies[j], &self.config);
                self.bodies[i].apply_force(force);
            }
        }
    }

    fn resolve_collisions(&mut self) -> usize {
        let PhysicsConfig {
            restitution,
            separation_epsilon,
            ..
        } = self.config;

        let mut contacts = 0;
        let count = self.bodies.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (head, tail) = self.bodies.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                if colliding(a, b) {
                    resolve(a, b, restitution, separation_epsilon);
                    contacts += 1;
                }
            }
        }
        contacts
    }
}
