use bevy::prelude::*;
use std::collections::VecDeque;

/// Sliding window of past positions, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    history: VecDeque<Vec2>,
    limit: Option<usize>,
}

impl Trail {
    /// `None` keeps every position ever recorded.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            history: VecDeque::new(),
            limit,
        }
    }

    pub fn push(&mut self, point: Vec2) {
        self.history.push_back(point);
        if let Some(limit) = self.limit
            && self.history.len() > limit
        {
            self.history.pop_front();
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.history.iter().copied()
    }
}

/// One simulated circular mass.
#[derive(Debug, Clone)]
pub struct Body {
    pub radius: f32,
    pub color: Srgba,
    mass: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pending_forces: Vec<Vec2>,
    trail: Trail,
}

impl Body {
    pub fn new(
        radius: f32,
        color: Srgba,
        mass: f32,
        position: Vec2,
        velocity: Vec2,
        trail_limit: Option<usize>,
    ) -> Self {
        Self {
            radius,
            color,
            mass,
            position,
            velocity,
            pending_forces: Vec::new(),
            trail: Trail::new(trail_limit),
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    #[cfg(test)]
    pub fn pending_forces(&self) -> &[Vec2] {
        &self.pending_forces
    }

    /// Queues a force to be consumed by the next [`Body::step`].
    pub fn apply_force(&mut self, force: Vec2) {
        self.pending_forces.push(force);
    }

    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// Advances the body by `dt` inside a world spanning `(0, 0)..world_size`.
    pub fn step(&mut self, dt: f32, world_size: Vec2) {
        let resultant = self
            .pending_forces
            .drain(..)
            .fold(Vec2::ZERO, |acc, force| acc + force);
        let acceleration = resultant / self.mass;

        let (position, velocity) = integrate(self.position, self.velocity, acceleration, dt);
        self.position = position;
        self.velocity = reflect_off_walls(position, velocity, self.radius, world_size);

        self.trail.push(self.position);
    }
}

/// Semi-implicit Euler: velocity first, then position with the new velocity.
pub fn integrate(position: Vec2, velocity: Vec2, acceleration: Vec2, dt: f32) -> (Vec2, Vec2) {
    let velocity = velocity + acceleration * dt;
    let position = position + velocity * dt;
    (position, velocity)
}

/// Negates each velocity component whose axis has left `[radius, size - radius]`.
///
/// Position is left alone, so a large `dt` can still carry a body through a wall.
pub fn reflect_off_walls(position: Vec2, velocity: Vec2, radius: f32, world_size: Vec2) -> Vec2 {
    let mut velocity = velocity;
    if position.x < radius || position.x > world_size.x - radius {
        velocity.x = -velocity.x;
    }
    if position.y < radius || position.y > world_size.y - radius {
        velocity.y = -velocity.y;
    }
    velocity
}
