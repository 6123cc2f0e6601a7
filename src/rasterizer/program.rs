//! Vertex and fragment programs
//!
//! Programs are stateless: everything they read comes from the
//! [`GraphicsState`] passed into each call, so a single instance can be shared
//! by several pipelines and swapped between draw calls.

use tracing::trace;

use super::math::{safe_normalize, Scalar, Vec3};
use super::shading::phong;
use super::state::GraphicsState;
use super::types::{Fragment, VertexOut};

/// Normals whose angle with the eye axis puts them this far behind the view
/// plane are treated as interpolated across a silhouette and flipped
pub const NORMAL_FLIP_THRESHOLD: Scalar = -0.15;

/// Per-vertex stage
pub trait VertexProgram {
    fn name(&self) -> &'static str;

    /// Points and lines: position and color only
    fn run(&self, state: &GraphicsState, vertex: Vec3, color: Vec3) -> VertexOut;

    /// Triangles: position, normal and color
    fn run_with_normal(
        &self,
        state: &GraphicsState,
        vertex: Vec3,
        normal: Vec3,
        color: Vec3,
    ) -> VertexOut;
}

/// Per-fragment stage; returns the final color
pub trait FragmentProgram {
    fn name(&self) -> &'static str;

    fn run(&self, state: &GraphicsState, fragment: &Fragment) -> Vec3;
}

/// Passes screen-space input through untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityVertexProgram;

impl VertexProgram for IdentityVertexProgram {
    fn name(&self) -> &'static str {
        "identity vertex program"
    }

    fn run(&self, _state: &GraphicsState, vertex: Vec3, color: Vec3) -> VertexOut {
        VertexOut::screen(vertex, Vec3::ZERO, color)
    }

    fn run_with_normal(
        &self,
        _state: &GraphicsState,
        vertex: Vec3,
        normal: Vec3,
        color: Vec3,
    ) -> VertexOut {
        VertexOut::screen(vertex, normal, color)
    }
}

/// Object space to screen space, optionally with per-vertex lighting
#[derive(Debug, Clone, Copy)]
pub struct TransformVertexProgram {
    /// Replace the vertex color with the Gouraud color for vertices that
    /// carry a normal
    pub lighting: bool,
}

impl Default for TransformVertexProgram {
    fn default() -> Self {
        Self::gouraud()
    }
}

impl TransformVertexProgram {
    pub fn gouraud() -> Self {
        Self { lighting: true }
    }

    pub fn unlit() -> Self {
        Self { lighting: false }
    }

    fn transform(state: &GraphicsState, vertex: Vec3) -> (Vec3, Vec3) {
        let world = state.model.transform_point(vertex);
        let screen = state.projection.transform_point(world);
        (world, screen)
    }
}

impl VertexProgram for TransformVertexProgram {
    fn name(&self) -> &'static str {
        if self.lighting {
            "gouraud vertex program"
        } else {
            "transform vertex program"
        }
    }

    fn run(&self, state: &GraphicsState, vertex: Vec3, color: Vec3) -> VertexOut {
        let (world, screen) = Self::transform(state, vertex);
        VertexOut::new(screen, world, Vec3::ZERO, color)
    }

    fn run_with_normal(
        &self,
        state: &GraphicsState,
        vertex: Vec3,
        normal: Vec3,
        color: Vec3,
    ) -> VertexOut {
        let (world, screen) = Self::transform(state, vertex);

        // Normals transform with the inverse transpose of the model matrix
        let normal = state.inv_model.transpose().transform_direction(normal);
        let normal = match safe_normalize(normal) {
            Some(n) => n,
            None => {
                trace!(?vertex, "zero normal after model transform");
                Vec3::ZERO
            }
        };

        let color = if self.lighting {
            phong(state, world, normal)
        } else {
            color
        };
        VertexOut::new(screen, world, normal, color)
    }
}

/// Writes the interpolated color, clamped to `[0, 1]`
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFragmentProgram;

impl FragmentProgram for IdentityFragmentProgram {
    fn name(&self) -> &'static str {
        "identity fragment program"
    }

    fn run(&self, _state: &GraphicsState, fragment: &Fragment) -> Vec3 {
        fragment.color.saturate()
    }
}

/// Per-pixel Phong shading from the interpolated world position and normal
#[derive(Debug, Clone, Copy, Default)]
pub struct PhongFragmentProgram;

impl FragmentProgram for PhongFragmentProgram {
    fn name(&self) -> &'static str {
        "phong fragment program"
    }

    fn run(&self, state: &GraphicsState, fragment: &Fragment) -> Vec3 {
        let mut normal = fragment.normal.normalize_or_zero();
        if state.view_axis().dot(normal) < NORMAL_FLIP_THRESHOLD {
            normal = -normal;
        }
        phong(state, fragment.position, normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::Mat4;
    use crate::rasterizer::shading::ambient;
    use crate::rasterizer::types::colors;

    #[test]
    fn test_identity_vertex_copies() {
        let state = GraphicsState::new();
        let p = Vec3::new(3.0, 4.0, -0.5);
        let out = IdentityVertexProgram.run_with_normal(&state, p, Vec3::Y, colors::RED);
        assert_eq!(out.position, p);
        assert_eq!(out.world, p);
        assert_eq!(out.normal, Vec3::Y);
        assert_eq!(out.color, colors::RED);
    }

    #[test]
    fn test_transform_applies_model_then_projection() {
        let mut state = GraphicsState::new();
        state.set_model(Mat4::translation(Vec3::new(1.0, 0.0, 0.0)));
        state.projection = Mat4::scaling(Vec3::splat(10.0));

        let out =
            TransformVertexProgram::unlit().run(&state, Vec3::new(1.0, 2.0, 0.0), colors::BLUE);
        assert!(out.world.approx_eq(Vec3::new(2.0, 2.0, 0.0), 1e-12));
        assert!(out.position.approx_eq(Vec3::new(20.0, 20.0, 0.0), 1e-12));
        assert_eq!(out.color, colors::BLUE);
    }

    #[test]
    fn test_normal_survives_non_uniform_scale() {
        let mut state = GraphicsState::new();
        state.set_model(Mat4::scaling(Vec3::new(4.0, 1.0, 1.0)));

        // Plane x + y = 0 has normal (1, 1, 0); after stretching x by 4 it
        // becomes 4y + x = 0 with normal (1, 4, 0)
        let n = Vec3::new(1.0, 1.0, 0.0);
        let unlit = TransformVertexProgram::unlit();
        let out = unlit.run_with_normal(&state, Vec3::ZERO, n, colors::WHITE);
        let expected = safe_normalize(Vec3::new(1.0, 4.0, 0.0)).unwrap();
        assert!(out.normal.approx_eq(expected, 1e-12));
    }

    #[test]
    fn test_gouraud_matches_shared_formula() {
        let mut state = GraphicsState::new();
        state.eye_position = Vec3::new(0.0, 0.0, 10.0);
        state.light.position = Vec3::new(5.0, 5.0, 20.0);
        let gouraud = TransformVertexProgram::gouraud();
        let out = gouraud.run_with_normal(&state, Vec3::ZERO, Vec3::Z, colors::RED);
        assert_eq!(out.color, phong(&state, Vec3::ZERO, Vec3::Z));
    }

    #[test]
    fn test_identity_fragment_clamps() {
        let state = GraphicsState::new();
        let f = Fragment { color: Vec3::new(2.0, -1.0, 0.5), ..Default::default() };
        assert_eq!(IdentityFragmentProgram.run(&state, &f), Vec3::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_phong_fragment_flips_back_normals() {
        let mut state = GraphicsState::new();
        state.eye_position = Vec3::new(0.0, 0.0, 10.0);
        state.light.position = Vec3::new(0.0, 0.0, 100.0);

        let front = Fragment { normal: Vec3::Z, ..Default::default() };
        let back = Fragment { normal: -Vec3::Z, ..Default::default() };
        let lit = PhongFragmentProgram.run(&state, &front);
        assert_eq!(PhongFragmentProgram.run(&state, &back), lit);
        assert_ne!(lit, ambient(&state));
    }

    #[test]
    fn test_phong_fragment_keeps_grazing_normals() {
        let mut state = GraphicsState::new();
        state.eye_position = Vec3::new(0.0, 0.0, 10.0);
        state.light.position = Vec3::new(0.0, 0.0, 100.0);

        // Slightly behind the view plane, inside the threshold: not flipped,
        // so the one-sided test leaves ambient only
        let n = Vec3::new(1.0, 0.0, -0.1);
        let f = Fragment { normal: n, ..Default::default() };
        assert_eq!(PhongFragmentProgram.run(&state, &f), ambient(&state));
    }
}
