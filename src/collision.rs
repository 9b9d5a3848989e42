//! Circle-circle contact detection and response.

use bevy::prelude::*;

use crate::body::Body;

/// True when the two circles touch or overlap. Exact tangency counts.
pub fn colliding(a: &Body, b: &Body) -> bool {
    a.position.distance(b.position) <= a.radius + b.radius
}

/// Exchanges momentum along the contact normal and pushes the bodies apart.
///
/// Resulting normal components are each scaled by `restitution`; tangential
/// components are kept. Coincident centres have no normal and are left alone.
pub fn resolve(a: &mut Body, b: &mut Body, restitution: f32, separation_epsilon: f32) {
    let delta = b.position - a.position;
    let distance = delta.length();
    if distance == 0.0 {
        return;
    }

    let normal = delta / distance;
    let tangent = normal.perp();

    let (a_normal, a_tangent) = (a.velocity.dot(normal), a.velocity.dot(tangent));
    let (b_normal, b_tangent) = (b.velocity.dot(normal), b.velocity.dot(tangent));

    let (ma, mb) = (a.mass(), b.mass());
    let total = ma + mb;
    let a_normal_after = (a_normal * (ma - mb) + 2.0 * mb * b_normal) / total;
    let b_normal_after = (b_normal * (mb - ma) + 2.0 * ma * a_normal) / total;

    a.velocity = tangent * a_tangent + normal * (a_normal_after * restitution);
    b.velocity = tangent * b_tangent + normal * (b_normal_after * restitution);

    let penetration = (a.radius + b.radius - distance) + separation_epsilon;
    let correction = normal * (penetration * 0.5);
    a.position -= correction;
    b.position += correction;
}
