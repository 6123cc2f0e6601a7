//! Vector and matrix math for the pipeline
//!
//! Row-major 4x4 matrices act on column vectors: `M * v`, so a chain
//! `A * B * C` applies `C` first.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// Scalar type used by every stage of the pipeline
pub type Scalar = f64;

/// Norms below this are treated as zero
pub const EPSILON: Scalar = 1.0e-9;

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: Scalar,
    pub y: Scalar,
    pub z: Scalar,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    pub const X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub const fn new(x: Scalar, y: Scalar, z: Scalar) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: Scalar) -> Self {
        Self { x: v, y: v, z: v }
    }

    pub fn dot(self, other: Vec3) -> Scalar {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> Scalar {
        self.dot(self).sqrt()
    }

    /// True when the norm is below [`EPSILON`]
    pub fn is_zero(self) -> bool {
        self.len() < EPSILON
    }

    /// Unit vector, or zero for a degenerate input
    pub fn normalize_or_zero(self) -> Vec3 {
        safe_normalize(self).unwrap_or(Vec3::ZERO)
    }

    pub fn scale(self, s: Scalar) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Component-wise product (light color times material color)
    pub fn mul_elem(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    /// Clamp every component to `[0, 1]`
    pub fn saturate(self) -> Vec3 {
        Vec3 {
            x: clamp_unit(self.x),
            y: clamp_unit(self.y),
            z: clamp_unit(self.z),
        }
    }

    pub fn approx_eq(self, other: Vec3, eps: Scalar) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.z - other.z).abs() <= eps
    }
}

/// Normalize `v`, or `None` if its norm is below [`EPSILON`].
///
/// This is the one guard used for zero normals, zero light vectors and zero
/// view vectors throughout the pipeline.
pub fn safe_normalize(v: Vec3) -> Option<Vec3> {
    let l = v.len();
    if l < EPSILON {
        None
    } else {
        Some(v.scale(1.0 / l))
    }
}

/// Clamp a scalar to `[0, 1]`
pub fn clamp_unit(value: Scalar) -> Scalar {
    value.clamp(0.0, 1.0)
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<Scalar> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: Scalar) -> Vec3 {
        self.scale(s)
    }
}

impl Div<Scalar> for Vec3 {
    type Output = Vec3;
    fn div(self, s: Scalar) -> Vec3 {
        self.scale(1.0 / s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

/// 2D Vector (view-plane window corners)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: Scalar,
    pub y: Scalar,
}

impl Vec2 {
    pub const fn new(x: Scalar, y: Scalar) -> Self {
        Self { x, y }
    }
}

/// Homogeneous 4D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: Scalar,
    pub y: Scalar,
    pub z: Scalar,
    pub w: Scalar,
}

impl Vec4 {
    pub const fn new(x: Scalar, y: Scalar, z: Scalar, w: Scalar) -> Self {
        Self { x, y, z, w }
    }

    /// Promote a point (w = 1)
    pub fn from_point(p: Vec3) -> Self {
        Self::new(p.x, p.y, p.z, 1.0)
    }

    /// Promote a direction or normal (w = 0)
    pub fn from_direction(d: Vec3) -> Self {
        Self::new(d.x, d.y, d.z, 0.0)
    }

    /// Back to 3D with the homogeneous divide. A zero `w` is left undivided.
    pub fn to_point(self) -> Vec3 {
        if self.w.abs() < EPSILON {
            self.xyz()
        } else {
            Vec3::new(self.x / self.w, self.y / self.w, self.z / self.w)
        }
    }

    /// Drop `w` without dividing
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn dot(self, other: Vec4) -> Scalar {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    fn to_array(self) -> [Scalar; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

/// 4x4 matrix, row-major
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub [[Scalar; 4]; 4]);

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::IDENTITY
    }
}

impl Mat4 {
    pub const ZERO: Mat4 = Mat4([[0.0; 4]; 4]);

    pub const IDENTITY: Mat4 = Mat4([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub fn from_rows(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Mat4([r0.to_array(), r1.to_array(), r2.to_array(), r3.to_array()])
    }

    pub fn get(&self, row: usize, col: usize) -> Scalar {
        self.0[row][col]
    }

    pub fn row(&self, row: usize) -> Vec4 {
        let r = self.0[row];
        Vec4::new(r[0], r[1], r[2], r[3])
    }

    pub fn transpose(&self) -> Mat4 {
        let mut out = Mat4::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                out.0[c][r] = self.0[r][c];
            }
        }
        out
    }

    /// `M * (p, 1)` followed by the homogeneous divide
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::from_point(p)).to_point()
    }

    /// `M * (d, 0)`, no divide
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        (*self * Vec4::from_direction(d)).xyz()
    }

    /// Gauss-Jordan elimination with partial pivoting
    pub fn try_inverse(&self) -> Option<Mat4> {
        let mut a = self.0;
        let mut inv = Mat4::IDENTITY.0;

        for col in 0..4 {
            // Pick the largest pivot in this column
            let mut pivot = col;
            for r in (col + 1)..4 {
                if a[r][col].abs() > a[pivot][col].abs() {
                    pivot = r;
                }
            }
            if a[pivot][col].abs() < EPSILON {
                return None;
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let p = a[col][col];
            for c in 0..4 {
                a[col][c] /= p;
                inv[col][c] /= p;
            }

            for r in 0..4 {
                if r == col {
                    continue;
                }
                let f = a[r][col];
                if f == 0.0 {
                    continue;
                }
                for c in 0..4 {
                    a[r][c] -= f * a[col][c];
                    inv[r][c] -= f * inv[col][c];
                }
            }
        }

        Some(Mat4(inv))
    }

    pub fn approx_eq(&self, other: &Mat4, eps: Scalar) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }

    pub fn translation(t: Vec3) -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, t.x],
            [0.0, 1.0, 0.0, t.y],
            [0.0, 0.0, 1.0, t.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn inverse_translation(t: Vec3) -> Mat4 {
        Mat4::translation(-t)
    }

    pub fn scaling(s: Vec3) -> Mat4 {
        Mat4([
            [s.x, 0.0, 0.0, 0.0],
            [0.0, s.y, 0.0, 0.0],
            [0.0, 0.0, s.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Inverse of [`Mat4::scaling`]; every factor must be non-zero
    pub fn inverse_scaling(s: Vec3) -> Mat4 {
        Mat4::scaling(Vec3::new(1.0 / s.x, 1.0 / s.y, 1.0 / s.z))
    }

    pub fn rotation_x(angle: Scalar) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: Scalar) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(angle: Scalar) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    // Rotations are orthonormal, so the inverse is the transpose.

    pub fn inverse_rotation_x(angle: Scalar) -> Mat4 {
        Mat4::rotation_x(angle).transpose()
    }

    pub fn inverse_rotation_y(angle: Scalar) -> Mat4 {
        Mat4::rotation_y(angle).transpose()
    }

    pub fn inverse_rotation_z(angle: Scalar) -> Mat4 {
        Mat4::rotation_z(angle).transpose()
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = Mat4::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                out.0[r][c] = (0..4).map(|k| self.0[r][k] * rhs.0[k][c]).sum();
            }
        }
        out
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_vec3_cross() {
        let c = Vec3::X.cross(Vec3::Y);
        assert!(c.approx_eq(Vec3::Z, 1e-12));
    }

    #[test]
    fn test_safe_normalize_zero() {
        assert!(safe_normalize(Vec3::ZERO).is_none());
        assert_eq!(Vec3::new(1e-12, 0.0, 0.0).normalize_or_zero(), Vec3::ZERO);
        let n = safe_normalize(Vec3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((n.len() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_homogeneous_divide() {
        let v = Vec4::new(2.0, 4.0, 6.0, 2.0);
        assert!(v.to_point().approx_eq(Vec3::new(1.0, 2.0, 3.0), 1e-12));
        assert_eq!(Vec4::from_direction(Vec3::X).w, 0.0);
        assert_eq!(Vec4::from_point(Vec3::X).w, 1.0);
    }

    #[test]
    fn test_matrix_product_order() {
        // Translate after scaling: (1,0,0) -> (2,0,0) -> (2,5,0)
        let m = Mat4::translation(Vec3::new(0.0, 5.0, 0.0)) * Mat4::scaling(Vec3::splat(2.0));
        let p = m.transform_point(Vec3::X);
        assert!(p.approx_eq(Vec3::new(2.0, 5.0, 0.0), 1e-12));
    }

    #[test]
    fn test_inverse() {
        let m = Mat4::translation(Vec3::new(1.0, -2.0, 3.0))
            * Mat4::rotation_y(0.7)
            * Mat4::scaling(Vec3::new(2.0, 3.0, 0.5));
        let inv = m.try_inverse().unwrap();
        assert!((m * inv).approx_eq(&Mat4::IDENTITY, 1e-9));
        assert!((inv * m).approx_eq(&Mat4::IDENTITY, 1e-9));
    }

    #[test]
    fn test_singular_inverse() {
        assert!(Mat4::ZERO.try_inverse().is_none());
        assert!(Mat4::scaling(Vec3::new(1.0, 0.0, 1.0)).try_inverse().is_none());
    }

    #[test]
    fn test_analytic_inverses() {
        let a = 1.1;
        let z = Mat4::rotation_z(a) * Mat4::inverse_rotation_z(a);
        assert!(z.approx_eq(&Mat4::IDENTITY, 1e-12));
        let x = Mat4::rotation_x(a) * Mat4::inverse_rotation_x(a);
        assert!(x.approx_eq(&Mat4::IDENTITY, 1e-12));
        let s = Vec3::new(2.0, 4.0, 8.0);
        assert!((Mat4::scaling(s) * Mat4::inverse_scaling(s)).approx_eq(&Mat4::IDENTITY, 1e-12));
    }

    #[test]
    fn test_transpose() {
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        let t = m.transpose();
        assert_eq!(t.get(3, 0), 1.0);
        assert_eq!(t.get(0, 3), 0.0);
        assert_eq!(t.transpose(), m);
    }
}
