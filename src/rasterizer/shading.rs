//! Phong local illumination
//!
//! One formula for both stages: the transform vertex program evaluates it
//! per vertex (Gouraud), the Phong fragment program per pixel.
//!
//! ```text
//! color = clamp(I_a k_a O_a + I_p k_d O_d (N.L) + I_p k_s O_s (R.V)^n)
//! ```
//!
//! Diffuse and specular only contribute when both the light and the viewer
//! are on the side the normal points to. Back faces get ambient light only.

use tracing::trace;

use super::math::{clamp_unit, safe_normalize, Vec3};
use super::state::GraphicsState;

/// Ambient term `I_a * k_a * O_a`, clamped per channel
pub fn ambient(state: &GraphicsState) -> Vec3 {
    let m = &state.material;
    state
        .light
        .ambient
        .mul_elem(m.ambient_color)
        .scale(m.ambient_intensity)
        .saturate()
}

/// Shade a surface point at world `position` with surface `normal`.
///
/// A zero normal, a light at the point or an eye at the point leaves only
/// the ambient term.
pub fn phong(state: &GraphicsState, position: Vec3, normal: Vec3) -> Vec3 {
    let ambient = ambient(state);

    let Some(n) = safe_normalize(normal) else {
        trace!(?position, "zero normal, ambient only");
        return ambient;
    };
    let Some(l) = safe_normalize(state.light.position - position) else {
        trace!(?position, "light coincides with surface point");
        return ambient;
    };
    let Some(v) = safe_normalize(state.eye_position - position) else {
        trace!(?position, "eye coincides with surface point");
        return ambient;
    };

    let l_dot_n = l.dot(n);
    let v_dot_n = v.dot(n);
    if l_dot_n <= 0.0 || v_dot_n <= 0.0 {
        return ambient;
    }

    // Mirror L about N; a reflection below the surface contributes nothing
    let mut r = n.scale(2.0 * l_dot_n) - l;
    if r.dot(n) < 0.0 {
        r = Vec3::ZERO;
    }
    let r = match safe_normalize(r) {
        Some(r) => r,
        None => {
            trace!(?position, "degenerate reflection vector");
            Vec3::ZERO
        }
    };

    let m = &state.material;
    let ip = state.light.intensity;

    let diffuse = ip
        .mul_elem(m.diffuse_color)
        .scale(m.diffuse_intensity * clamp_unit(l_dot_n));

    let highlight = clamp_unit(clamp_unit(r.dot(v)).powf(m.shininess));
    let specular = ip
        .mul_elem(m.specular_color)
        .scale(m.specular_intensity * highlight);

    (ambient + diffuse + specular).saturate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facing_state() -> GraphicsState {
        let mut state = GraphicsState::new();
        state.eye_position = Vec3::new(0.0, 0.0, 10.0);
        state.light.position = Vec3::new(0.0, 0.0, 100.0);
        state
    }

    #[test]
    fn test_head_on_highlight() {
        let state = facing_state();
        let c = phong(&state, Vec3::ZERO, Vec3::Z);
        // ambient 0.25 green + diffuse 0.75 green + specular 0.9 white
        assert!(c.approx_eq(Vec3::new(0.9, 1.0, 0.9), 1e-9));
    }

    #[test]
    fn test_light_behind_is_ambient_only() {
        let mut state = facing_state();
        state.light.position = Vec3::new(0.0, 0.0, -100.0);
        let c = phong(&state, Vec3::ZERO, Vec3::Z);
        assert_eq!(c, ambient(&state));
        assert!(c.approx_eq(Vec3::new(0.0, 0.25, 0.0), 1e-12));
    }

    #[test]
    fn test_viewer_behind_is_ambient_only() {
        let mut state = facing_state();
        state.eye_position = Vec3::new(0.0, 0.0, -10.0);
        assert_eq!(phong(&state, Vec3::ZERO, Vec3::Z), ambient(&state));
    }

    #[test]
    fn test_zero_normal_is_ambient_only() {
        let state = facing_state();
        assert_eq!(phong(&state, Vec3::ZERO, Vec3::ZERO), ambient(&state));
    }

    #[test]
    fn test_output_is_clamped() {
        let mut state = facing_state();
        state.light.intensity = Vec3::splat(50.0);
        state.light.ambient = Vec3::splat(50.0);
        let c = phong(&state, Vec3::ZERO, Vec3::Z);
        for ch in [c.x, c.y, c.z] {
            assert!((0.0..=1.0).contains(&ch));
        }
    }

    #[test]
    fn test_oblique_light_highlight_falls_off() {
        let mut state = facing_state();
        // Light at 60 degrees off the normal, viewer head-on
        state.light.position = Vec3::new(100.0 * 3f64.sqrt(), 0.0, 100.0);
        state.material.specular_color = Vec3::new(0.0, 0.0, 1.0);
        let c = phong(&state, Vec3::ZERO, Vec3::Z);
        // R.V = cos(60 deg), and 0.5^20 leaves almost no highlight
        assert!(c.z > 0.0 && c.z < 1e-5);
        // diffuse 0.75 * cos(60 deg) on top of 0.25 ambient
        assert!((c.y - 0.625).abs() < 1e-9);
    }
}
