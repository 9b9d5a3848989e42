//! Read-only body snapshots and the geometry the host draws from them.

use bevy::camera::ScalingMode;
use bevy::color::Mix;
use bevy::prelude::*;
use std::f32::consts::TAU;

use crate::body::Body;

/// Brightness of trail points relative to the body outline.
pub const TRAIL_DIMMING: f32 = 0.5;

/// What the renderer needs to know about one body for a frame.
#[derive(Debug, Clone, Copy)]
pub struct BodyView<'a> {
    pub position: Vec2,
    pub radius: f32,
    pub color: Srgba,
    body: &'a Body,
}

impl<'a> From<&'a Body> for BodyView<'a> {
    fn from(body: &'a Body) -> Self {
        Self {
            position: body.position,
            radius: body.radius,
            color: body.color,
            body,
        }
    }
}

impl BodyView<'_> {
    pub fn trail(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.body.trail().points()
    }

    pub fn has_trail(&self) -> bool {
        !self.body.trail().is_empty()
    }

    /// Body color blended towards black, alpha untouched.
    pub fn trail_color(&self) -> Srgba {
        self.color.mix(&Srgba::BLACK, TRAIL_DIMMING)
    }

    pub fn outline(&self, segments: usize) -> Vec<Vec2> {
        circle_outline(self.position, self.radius, segments)
    }
}

/// Vertices of a regular polygon approximating a circle, starting at angle 0.
pub fn circle_outline(center: Vec2, radius: f32, segments: usize) -> Vec<Vec2> {
    let step = TAU / segments as f32;
    (0..segments)
        .map(|i| center + Vec2::from_angle(step * i as f32) * radius)
        .collect()
}

/// Maps world coordinates (origin top-left, y down) onto a camera centred
/// on the world with y up.
pub fn world_to_screen(point: Vec2, world_size: Vec2) -> Vec2 {
    vec2(point.x - world_size.x * 0.5, world_size.y * 0.5 - point.y)
}

/// Orthographic projection that keeps the whole world visible whatever its
/// size or the window's aspect ratio.
pub fn world_projection(world_size: Vec2) -> OrthographicProjection {
    OrthographicProjection {
        scaling_mode: ScalingMode::AutoMin {
            min_width: world_size.x,
            min_height: world_size.y,
        },
        ..OrthographicProjection::default_2d()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_has_requested_vertices_on_the_radius() {
        let center = vec2(250.0, 400.0);
        let points = circle_outline(center, 50.0, 18);

        assert_eq!(points.len(), 18);
        for point in &points {
            assert!((point.distance(center) - 50.0).abs() < 1e-3);
        }
        assert!((points[0] - vec2(300.0, 400.0)).length() < 1e-4);
    }

    #[test]
    fn world_corners_map_to_screen_corners() {
        let size = Vec2::splat(1000.0);
        assert_eq!(world_to_screen(Vec2::ZERO, size), vec2(-500.0, 500.0));
        assert_eq!(world_to_screen(size, size), vec2(500.0, -500.0));
        assert_eq!(world_to_screen(vec2(500.0, 500.0), size), Vec2::ZERO);
    }

    #[test]
    fn view_reflects_body_state() {
        let mut body = Body::new(
            20.0,
            Srgba::rgb(0.8, 0.4, 0.2),
            1.0,
            vec2(100.0, 100.0),
            vec2(10.0, 0.0),
            Some(3),
        );
        body.step(1.0, Vec2::splat(1000.0));
        body.step(1.0, Vec2::splat(1000.0));

        let view = BodyView::from(&body);
        assert_eq!(view.position, vec2(120.0, 100.0));
        assert!(view.has_trail());
        assert_eq!(view.trail().count(), 2);
        assert_eq!(view.trail_color(), Srgba::rgb(0.4, 0.2, 0.1));
    }

    #[test]
    fn fresh_body_has_no_trail() {
        let body = Body::new(5.0, Srgba::WHITE, 1.0, Vec2::ONE, Vec2::ZERO, None);
        assert!(!BodyView::from(&body).has_trail());
    }

    #[test]
    fn large_world_fits_the_projection() {
        let world = Vec2::splat(2000.0);
        let projection = world_projection(world);
        let ScalingMode::AutoMin {
            min_width,
            min_height,
        } = projection.scaling_mode
        else {
            panic!("expected AutoMin scaling, got {:?}", projection.scaling_mode);
        };

        let corners = [Vec2::ZERO, vec2(2000.0, 0.0), vec2(0.0, 2000.0), world];
        for corner in corners.into_iter().chain([vec2(1900.0, 1900.0)]) {
            let screen = world_to_screen(corner, world);
            assert!(screen.x.abs() <= min_width * 0.5, "{corner:?} -> {screen:?}");
            assert!(screen.y.abs() <= min_height * 0.5, "{corner:?} -> {screen:?}");
        }
    }

    #[test]
    fn small_world_is_not_shrunk() {
        let projection = world_projection(vec2(400.0, 300.0));
        assert!(matches!(
            projection.scaling_mode,
            ScalingMode::AutoMin { min_width, min_height } if min_width == 400.0 && min_height == 300.0
        ));
    }
}
