//! Pairwise gravitational attraction between bodies.

use bevy::prelude::*;

use crate::body::Body;
use crate::resources::PhysicsConfig;

/// Force exerted on `a` by `b`.
///
/// The separation is floored at `config.min_distance` and divided by
/// `config.length_scale` before the inverse-square law is applied, so
/// coincident bodies produce a finite force. The magnitude is capped at
/// `config.max_force` when one is set. The direction is the unit vector from
/// `a` towards `b`; coincident centres have no direction and yield zero.
pub fn gravitational_force(a: &Body, b: &Body, config: &PhysicsConfig) -> Vec2 {
    let displacement = b.position - a.position;
    let distance = displacement.length().max(config.min_distance);
    let scaled = distance / config.length_scale;

    let mut magnitude = config.g * a.mass() * b.mass() / (scaled * scaled);
    if let Some(max_force) = config.max_force {
        magnitude = magnitude.min(max_force);
    }

    displacement.normalize_or_zero() * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(mass: f32, position: Vec2) -> Body {
        Body::new(10.0, Srgba::rgb(1.0, 0.0, 0.0), mass, position, Vec2::ZERO, None)
    }

    #[test]
    fn force_follows_scaled_inverse_square_law() {
        let config = PhysicsConfig::default();
        let a = body(2.0, vec2(100.0, 100.0));
        let b = body(3.0, vec2(250.0, 100.0));

        let force = gravitational_force(&a, &b, &config);

        // 150 world units = 2 physics units
        let expected = config.g * 6.0 / 4.0;
        assert!((force.x - expected).abs() < 1e-4);
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn forces_are_equal_and_opposite() {
        let config = PhysicsConfig::default();
        let a = body(50.0, vec2(500.0, 750.0));
        let b = body(25.0, vec2(200.0, 300.0));

        let on_a = gravitational_force(&a, &b, &config);
        let on_b = gravitational_force(&b, &a, &config);

        assert!((on_a + on_b).length() < 1e-4);
        assert!(on_a.dot(b.position - a.position) > 0.0);
    }

    #[test]
    fn magnitude_does_not_increase_with_separation() {
        let config = PhysicsConfig::default();
        let a = body(5.0, Vec2::ZERO);
        let mut previous = f32::INFINITY;
        for step in 0..50 {
            let separation = config.min_distance + step as f32 * 17.0;
            let b = body(7.0, vec2(separation, 0.0));
            let magnitude = gravitational_force(&a, &b, &config).length();
            assert!(magnitude <= previous);
            previous = magnitude;
        }
    }

    #[test]
    fn separation_below_floor_uses_floor() {
        let config = PhysicsConfig::default();
        let a = body(1.0, Vec2::ZERO);
        let near = gravitational_force(&a, &body(1.0, vec2(1.0, 0.0)), &config);
        let at_floor = gravitational_force(&a, &body(1.0, vec2(config.min_distance, 0.0)), &config);
        assert!((near.length() - at_floor.length()).abs() < 1e-4);
    }

    #[test]
    fn cap_limits_close_range_force() {
        let config = PhysicsConfig {
            max_force: Some(10.0),
            ..default()
        };
        let a = body(100.0, Vec2::ZERO);
        let b = body(100.0, vec2(0.0, 0.5));

        let force = gravitational_force(&a, &b, &config);
        assert!((force.length() - 10.0).abs() < 1e-5);
        assert!(force.y > 0.0);
    }

    #[test]
    fn coincident_bodies_yield_finite_force() {
        let config = PhysicsConfig::default();
        let a = body(3.0, vec2(42.0, 42.0));
        let b = body(4.0, vec2(42.0, 42.0));

        let force = gravitational_force(&a, &b, &config);
        assert!(force.is_finite());
        assert_eq!(force, Vec2::ZERO);
    }
}
