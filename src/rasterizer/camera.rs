//! Virtual pin-hole camera
//!
//! Builds the Foley-style viewing chain (Foley et al., 2nd ed., ch. 6):
//!
//! ```text
//! projection = window_viewport * view_projection * view_orientation
//! ```
//!
//! The camera owns no matrices itself; it writes them into the
//! [`GraphicsState`] it is handed.

use serde::{Serialize, Deserialize};
use tracing::debug;

use super::error::PipelineError;
use super::math::{safe_normalize, Mat4, Scalar, Vec2, Vec3, Vec4};
use super::state::GraphicsState;

/// Perspective or parallel view volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionKind {
    #[default]
    Perspective,
    Parallel,
}

/// Viewing parameters: view reference frame, window and clipping planes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewParams {
    /// View reference point (world)
    pub vrp: Vec3,
    /// View-plane normal (world), points toward the viewer
    pub vpn: Vec3,
    /// View-up vector (world)
    pub vup: Vec3,
    /// Projection reference point (view reference coordinates)
    pub prp: Vec3,
    /// Window on the view plane (view reference coordinates)
    pub lower_left: Vec2,
    pub upper_right: Vec2,
    /// Front and back clip planes, measured along the view-plane normal
    pub front: Scalar,
    pub back: Scalar,
    pub viewport_width: Scalar,
    pub viewport_height: Scalar,
    /// Extra device offset, used to re-center sub-regions
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default)]
    pub projection: ProjectionKind,
}

impl ViewParams {
    /// Eye on the -z side of the origin looking down +z: the end-to-end test
    /// camera used for the unit cube.
    pub fn looking_down_z(viewport: Scalar) -> Self {
        Self {
            vrp: Vec3::new(0.0, 0.0, -50.0),
            vpn: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            prp: Vec3::new(0.0, 0.0, 50.0),
            lower_left: Vec2::new(-1.0, -1.0),
            upper_right: Vec2::new(1.0, 1.0),
            front: -1.0,
            back: -100.0,
            viewport_width: viewport,
            viewport_height: viewport,
            translation: Vec3::ZERO,
            projection: ProjectionKind::Perspective,
        }
    }
}

/// Produces the viewing matrices for a pipeline's graphics state
#[derive(Debug, Clone, Default)]
pub struct Camera {
    view: Option<ViewParams>,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to a pipeline's state; same as [`Camera::reset`]
    pub fn init(&mut self, state: &mut GraphicsState) {
        self.reset(state);
    }

    /// All transformation matrices become the identity. Afterwards the
    /// pipeline draws straight into screen coordinates.
    pub fn reset(&mut self, state: &mut GraphicsState) {
        self.view = None;
        state.reset_transforms();
    }

    /// The last viewing parameters applied
    pub fn view(&self) -> Option<&ViewParams> {
        self.view.as_ref()
    }

    /// Recompute the whole viewing chain and the eye position.
    ///
    /// On error the state is left untouched.
    pub fn set_projection(
        &mut self,
        state: &mut GraphicsState,
        view: &ViewParams,
    ) -> Result<(), PipelineError> {
        let view_orientation = Self::compute_view_orientation_matrix(view.vrp, view.vpn, view.vup)?;
        let view_projection = match view.projection {
            ProjectionKind::Perspective => Self::compute_view_projection_matrix(
                view.prp,
                view.lower_left,
                view.upper_right,
                view.front,
                view.back,
            )?,
            ProjectionKind::Parallel => Self::compute_parallel_projection_matrix(
                view.prp,
                view.lower_left,
                view.upper_right,
                view.front,
                view.back,
            )?,
        };
        let window_viewport = Self::compute_window_viewport_matrix(
            view.viewport_width,
            view.viewport_height,
            view.translation,
        )?;

        let inv_view_orientation = view_orientation
            .try_inverse()
            .ok_or(PipelineError::DegenerateView("view orientation is singular"))?;
        let inv_view_projection = view_projection
            .try_inverse()
            .ok_or(PipelineError::DegenerateView(
                "front plane passes through the projection reference point",
            ))?;
        let inv_window_viewport = window_viewport
            .try_inverse()
            .ok_or(PipelineError::DegenerateView("viewport is singular"))?;

        state.view_orientation = view_orientation;
        state.inv_view_orientation = inv_view_orientation;
        state.view_projection = view_projection;
        state.inv_view_projection = inv_view_projection;
        state.window_viewport = window_viewport;
        state.inv_window_viewport = inv_window_viewport;
        state.projection = window_viewport * view_projection * view_orientation;
        state.inv_projection = inv_view_orientation * inv_view_projection * inv_window_viewport;
        state.eye_position = inv_view_orientation.transform_point(view.prp);

        debug!(eye = ?state.eye_position, kind = ?view.projection, "projection updated");
        self.view = Some(*view);
        Ok(())
    }

    /// World to eye coordinates: `R * T(-vrp)` with the orthonormal basis
    /// `n = |vpn|`, `u = |vup x n|`, `v = n x u`.
    pub fn compute_view_orientation_matrix(
        vrp: Vec3,
        vpn: Vec3,
        vup: Vec3,
    ) -> Result<Mat4, PipelineError> {
        let n = safe_normalize(vpn)
            .ok_or(PipelineError::DegenerateView("view-plane normal is zero"))?;
        let u = safe_normalize(vup.cross(n))
            .ok_or(PipelineError::DegenerateView("view-up is parallel to the view-plane normal"))?;
        let v = n.cross(u);

        let rotation = Mat4::from_rows(
            Vec4::from_direction(u),
            Vec4::from_direction(v),
            Vec4::from_direction(n),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        );
        Ok(rotation * Mat4::translation(-vrp))
    }

    /// Eye coordinates to the canonical parallel volume
    /// (`-1 <= x, y <= 1`, `-1 <= z <= 0`) for a perspective view:
    /// `M_per * S_per * SH_per * T(-prp)`.
    ///
    /// The front plane maps to z = 0 and the back plane to z = -1.
    pub fn compute_view_projection_matrix(
        prp: Vec3,
        lower_left: Vec2,
        upper_right: Vec2,
        front: Scalar,
        back: Scalar,
    ) -> Result<Mat4, PipelineError> {
        check_window(lower_left, upper_right, front, back)?;
        if prp.z == 0.0 {
            return Err(PipelineError::DegenerateView(
                "projection reference point lies on the view plane",
            ));
        }

        let shear = shear_to_window_center(prp, lower_left, upper_right);

        // VRP after translating the PRP to the origin
        let vrp_z = -prp.z;
        let far = vrp_z + back;
        if far == 0.0 {
            return Err(PipelineError::DegenerateView(
                "back plane passes through the projection reference point",
            ));
        }

        let scale = Mat4::scaling(Vec3::new(
            2.0 * vrp_z / ((upper_right.x - lower_left.x) * far),
            2.0 * vrp_z / ((upper_right.y - lower_left.y) * far),
            -1.0 / far,
        ));

        let z_min = -(vrp_z + front) / far;
        let m_per = Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0 / (1.0 + z_min), -z_min / (1.0 + z_min)],
            [0.0, 0.0, -1.0, 0.0],
        ]);

        Ok(m_per * scale * shear * Mat4::translation(-prp))
    }

    /// The parallel-projection limit: `S_par * T_par * SH_par`
    pub fn compute_parallel_projection_matrix(
        prp: Vec3,
        lower_left: Vec2,
        upper_right: Vec2,
        front: Scalar,
        back: Scalar,
    ) -> Result<Mat4, PipelineError> {
        check_window(lower_left, upper_right, front, back)?;
        if prp.z == 0.0 {
            return Err(PipelineError::DegenerateView(
                "direction of projection is parallel to the view plane",
            ));
        }

        let shear = shear_to_window_center(prp, lower_left, upper_right);
        let translate = Mat4::translation(Vec3::new(
            -(upper_right.x + lower_left.x) / 2.0,
            -(upper_right.y + lower_left.y) / 2.0,
            -front,
        ));
        let scale = Mat4::scaling(Vec3::new(
            2.0 / (upper_right.x - lower_left.x),
            2.0 / (upper_right.y - lower_left.y),
            1.0 / (front - back),
        ));

        Ok(scale * translate * shear)
    }

    /// Canonical volume to device pixels: x, y in `[-1, 1]` map onto
    /// `[0, width] x [0, height]`, then `translation` is added. Depth is kept.
    pub fn compute_window_viewport_matrix(
        width: Scalar,
        height: Scalar,
        translation: Vec3,
    ) -> Result<Mat4, PipelineError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(PipelineError::DegenerateView("viewport has no area"));
        }
        let half = Vec3::new(width / 2.0, height / 2.0, 0.0);
        Ok(Mat4::translation(half + translation) * Mat4::scaling(Vec3::new(half.x, half.y, 1.0)))
    }
}

fn check_window(
    lower_left: Vec2,
    upper_right: Vec2,
    front: Scalar,
    back: Scalar,
) -> Result<(), PipelineError> {
    if upper_right.x == lower_left.x || upper_right.y == lower_left.y {
        return Err(PipelineError::DegenerateView("view-plane window has no area"));
    }
    if front == back {
        return Err(PipelineError::DegenerateView("front and back planes coincide"));
    }
    Ok(())
}

/// Shear that makes the direction of projection (window center minus PRP)
/// parallel to the z axis
fn shear_to_window_center(prp: Vec3, lower_left: Vec2, upper_right: Vec2) -> Mat4 {
    let center = Vec3::new(
        (upper_right.x + lower_left.x) / 2.0,
        (upper_right.y + lower_left.y) / 2.0,
        0.0,
    );
    let dop = center - prp;
    Mat4([
        [1.0, 0.0, -dop.x / dop.z, 0.0],
        [0.0, 1.0, -dop.y / dop.z, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}
