//! Graphics state shared by the camera and the programmable stages
//!
//! One record per pipeline. The camera writes the matrix chain, demo code
//! writes the model matrix, light and material between draw calls, and the
//! vertex/fragment programs read it during a draw.

use serde::{Serialize, Deserialize};
use tracing::warn;

use super::math::{Mat4, Scalar, Vec3};

/// The single point light plus ambient light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    /// World-space position of the point light
    pub position: Vec3,
    /// Ambient intensity I_a per channel
    pub ambient: Vec3,
    /// Point light intensity I_p per channel
    pub intensity: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(300.0, 300.0, -300.0),
            ambient: Vec3::splat(0.5),
            intensity: Vec3::ONE,
        }
    }
}

/// Flat material coefficients (k_a, k_d, k_s with their colors O_a, O_d, O_s)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub ambient_intensity: Scalar,
    pub ambient_color: Vec3,
    pub diffuse_intensity: Scalar,
    pub diffuse_color: Vec3,
    pub specular_intensity: Scalar,
    pub specular_color: Vec3,
    /// Specular fall-off exponent
    pub shininess: Scalar,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.5,
            ambient_color: Vec3::new(0.0, 1.0, 0.0),
            diffuse_intensity: 0.75,
            diffuse_color: Vec3::new(0.0, 1.0, 0.0),
            specular_intensity: 0.9,
            specular_color: Vec3::ONE,
            shininess: 20.0,
        }
    }
}

/// Transforms, eye, light and material for the current draw calls
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub model: Mat4,
    pub inv_model: Mat4,

    /// World to eye coordinates
    pub view_orientation: Mat4,
    pub inv_view_orientation: Mat4,

    /// Eye coordinates to the canonical view volume
    pub view_projection: Mat4,
    pub inv_view_projection: Mat4,

    /// Canonical view volume to device pixels
    pub window_viewport: Mat4,
    pub inv_window_viewport: Mat4,

    /// `window_viewport * view_projection * view_orientation`
    pub projection: Mat4,
    pub inv_projection: Mat4,

    /// Eye position in world coordinates
    pub eye_position: Vec3,

    pub light: Light,
    pub material: Material,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsState {
    pub fn new() -> Self {
        Self {
            model: Mat4::IDENTITY,
            inv_model: Mat4::IDENTITY,
            view_orientation: Mat4::IDENTITY,
            inv_view_orientation: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            inv_view_projection: Mat4::IDENTITY,
            window_viewport: Mat4::IDENTITY,
            inv_window_viewport: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            inv_projection: Mat4::IDENTITY,
            eye_position: Vec3::ZERO,
            light: Light::default(),
            material: Material::default(),
        }
    }

    /// Set all matrices to the identity. Light, material and eye are kept.
    pub fn reset_transforms(&mut self) {
        self.model = Mat4::IDENTITY;
        self.inv_model = Mat4::IDENTITY;
        self.view_orientation = Mat4::IDENTITY;
        self.inv_view_orientation = Mat4::IDENTITY;
        self.view_projection = Mat4::IDENTITY;
        self.inv_view_projection = Mat4::IDENTITY;
        self.window_viewport = Mat4::IDENTITY;
        self.inv_window_viewport = Mat4::IDENTITY;
        self.projection = Mat4::IDENTITY;
        self.inv_projection = Mat4::IDENTITY;
    }

    /// Set the model matrix and derive its inverse. A singular model keeps an
    /// identity inverse, which only affects normal transformation.
    pub fn set_model(&mut self, model: Mat4) {
        self.model = model;
        self.inv_model = match model.try_inverse() {
            Some(inv) => inv,
            None => {
                warn!("singular model matrix, normals will not be corrected");
                Mat4::IDENTITY
            }
        };
    }

    /// Set the model matrix with a known inverse
    pub fn set_model_with_inverse(&mut self, model: Mat4, inverse: Mat4) {
        self.model = model;
        self.inv_model = inverse;
    }

    /// The eye-space z axis in world coordinates (points toward the viewer)
    pub fn view_axis(&self) -> Vec3 {
        self.view_orientation.row(2).xyz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_identity() {
        let s = GraphicsState::new();
        assert_eq!(s.projection, Mat4::IDENTITY);
        assert_eq!(s.inv_window_viewport, Mat4::IDENTITY);
        assert_eq!(s.view_axis(), Vec3::Z);
    }

    #[test]
    fn test_set_model_inverts() {
        let mut s = GraphicsState::new();
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0)) * Mat4::rotation_z(0.3);
        s.set_model(m);
        assert!((s.model * s.inv_model).approx_eq(&Mat4::IDENTITY, 1e-9));
    }

    #[test]
    fn test_reset_keeps_material() {
        let mut s = GraphicsState::new();
        s.material.shininess = 3.0;
        s.set_model(Mat4::scaling(Vec3::splat(2.0)));
        s.reset_transforms();
        assert_eq!(s.model, Mat4::IDENTITY);
        assert_eq!(s.material.shininess, 3.0);
    }
}
