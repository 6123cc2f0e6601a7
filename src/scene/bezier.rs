//! Cubic Bezier curves and bicubic patches
//!
//! Curves are drawn either by recursive subdivision (de Casteljau in matrix
//! form) or by forward differencing. Patches are subdivided into triangles
//! with normals taken from the patch tangents at each corner.

use tracing::{trace, warn};

use crate::rasterizer::{Scalar, Vec3};

/// Four control points of a cubic curve
pub type CurveGeometry = [Vec3; 4];

/// Sixteen control points; `patch[i][j]` is row `i` along u, column `j` along v
pub type Patch = [[Vec3; 4]; 4];

/// Deeper subdivision than this is clamped
pub const MAX_DEPTH: u32 = 8;

/// Left half of a split at t = 1/2, multiplied on the right of the geometry
/// matrix (control points as columns)
const DBL: [[Scalar; 4]; 4] = [
    [8.0, 4.0, 2.0, 1.0],
    [0.0, 4.0, 4.0, 3.0],
    [0.0, 0.0, 2.0, 3.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Right half of a split at t = 1/2
const DBR: [[Scalar; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [3.0, 2.0, 0.0, 0.0],
    [3.0, 4.0, 4.0, 0.0],
    [1.0, 2.0, 4.0, 8.0],
];

fn apply(g: &CurveGeometry, m: &[[Scalar; 4]; 4]) -> CurveGeometry {
    std::array::from_fn(|j| {
        (0..4).fold(Vec3::ZERO, |acc, i| acc + g[i] * (m[i][j] / 8.0))
    })
}

fn clamp_depth(depth: u32) -> u32 {
    if depth > MAX_DEPTH {
        warn!(depth, max = MAX_DEPTH, "subdivision depth clamped");
        MAX_DEPTH
    } else {
        depth
    }
}

/// Split a curve at t = 1/2
pub fn subdivide_curve(g: &CurveGeometry) -> (CurveGeometry, CurveGeometry) {
    (apply(g, &DBL), apply(g, &DBR))
}

/// Point on the curve by the Bernstein form
pub fn evaluate_curve(g: &CurveGeometry, t: Scalar) -> Vec3 {
    let s = 1.0 - t;
    g[0] * (s * s * s) + g[1] * (3.0 * s * s * t) + g[2] * (3.0 * s * t * t) + g[3] * (t * t * t)
}

/// Polyline through the curve: `2^depth + 1` points from subdivision
pub fn curve_points_subdivided(g: &CurveGeometry, depth: u32) -> Vec<Vec3> {
    let depth = clamp_depth(depth);
    let mut points = vec![g[0]];
    // Right halves go on the stack first so the left half is emitted first
    let mut stack = vec![(*g, depth)];
    while let Some((curve, level)) = stack.pop() {
        if level == 0 {
            points.push(curve[3]);
        } else {
            let (left, right) = subdivide_curve(&curve);
            stack.push((right, level - 1));
            stack.push((left, level - 1));
        }
    }
    points
}

/// Polyline through the curve: `segments + 1` evenly spaced points in t
/// from forward differences
pub fn curve_points_forward(g: &CurveGeometry, segments: u32) -> Vec<Vec3> {
    let segments = segments.max(1);
    let a = -g[0] + g[1] * 3.0 - g[2] * 3.0 + g[3];
    let b = g[0] * 3.0 - g[1] * 6.0 + g[2] * 3.0;
    let c = g[0] * -3.0 + g[1] * 3.0;
    let d = g[0];

    let delta = 1.0 / segments as Scalar;
    let (d2, d3) = (delta * delta, delta * delta * delta);

    let mut f = d;
    let mut df = a * d3 + b * d2 + c * delta;
    let mut d2f = a * (6.0 * d3) + b * (2.0 * d2);
    let d3f = a * (6.0 * d3);

    let mut points = Vec::with_capacity(segments as usize + 1);
    points.push(f);
    for _ in 0..segments {
        f += df;
        df += d2f;
        d2f += d3f;
        points.push(f);
    }
    points
}

/// Vertex of a tessellated patch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

fn column(p: &Patch, j: usize) -> CurveGeometry {
    [p[0][j], p[1][j], p[2][j], p[3][j]]
}

/// Split a patch in both parameters, giving four sub-patches
pub fn subdivide_patch(p: &Patch) -> [Patch; 4] {
    // Along u: split every column
    let mut low_u = [[Vec3::ZERO; 4]; 4];
    let mut high_u = [[Vec3::ZERO; 4]; 4];
    for j in 0..4 {
        let (l, r) = subdivide_curve(&column(p, j));
        for i in 0..4 {
            low_u[i][j] = l[i];
            high_u[i][j] = r[i];
        }
    }

    // Along v: split every row
    let split_v = |q: &Patch| {
        let mut low = [[Vec3::ZERO; 4]; 4];
        let mut high = [[Vec3::ZERO; 4]; 4];
        for i in 0..4 {
            let (l, r) = subdivide_curve(&q[i]);
            low[i] = l;
            high[i] = r;
        }
        (low, high)
    };
    let (a, b) = split_v(&low_u);
    let (c, d) = split_v(&high_u);
    [a, b, c, d]
}

/// Surface normal at a patch corner, from the tangents along u and v
fn corner_normal(p: &Patch, i: usize, j: usize) -> Vec3 {
    let du = if i == 0 { p[1][j] - p[0][j] } else { p[3][j] - p[2][j] };
    let dv = if j == 0 { p[i][1] - p[i][0] } else { p[i][3] - p[i][2] };
    let n = du.cross(dv);
    if n.is_zero() {
        trace!(i, j, "degenerate patch corner, no normal");
    }
    n.normalize_or_zero()
}

/// Tessellate a patch into `2 * 4^depth` triangles
pub fn patch_triangles(p: &Patch, depth: u32) -> Vec<[PatchVertex; 3]> {
    let depth = clamp_depth(depth);
    let mut out = Vec::with_capacity(2 << (2 * depth));
    let mut stack = vec![(*p, depth)];

    while let Some((patch, level)) = stack.pop() {
        if level > 0 {
            for sub in subdivide_patch(&patch) {
                stack.push((sub, level - 1));
            }
            continue;
        }

        let corner = |i: usize, j: usize| PatchVertex {
            position: patch[i][j],
            normal: corner_normal(&patch, i, j),
        };
        let (v00, v30, v33, v03) = (corner(0, 0), corner(3, 0), corner(3, 3), corner(0, 3));
        out.push([v00, v30, v33]);
        out.push([v00, v33, v03]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc() -> CurveGeometry {
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 2.0, 1.0),
            Vec3::new(4.0, 0.0, 0.0),
        ]
    }

    fn flat_patch() -> Patch {
        std::array::from_fn(|i| std::array::from_fn(|j| Vec3::new(i as Scalar, j as Scalar, 0.0)))
    }

    #[test]
    fn test_subdivision_splits_at_midpoint() {
        let g = arc();
        let (l, r) = subdivide_curve(&g);
        let mid = evaluate_curve(&g, 0.5);
        assert!(l[0].approx_eq(g[0], 1e-12));
        assert!(l[3].approx_eq(mid, 1e-12));
        assert!(r[0].approx_eq(mid, 1e-12));
        assert!(r[3].approx_eq(g[3], 1e-12));
        // The left half traced at t is the whole curve at t / 2
        assert!(evaluate_curve(&l, 0.5).approx_eq(evaluate_curve(&g, 0.25), 1e-12));
    }

    #[test]
    fn test_subdivided_polyline_lies_on_curve() {
        let g = arc();
        let pts = curve_points_subdivided(&g, 3);
        assert_eq!(pts.len(), 9);
        for (k, p) in pts.iter().enumerate() {
            assert!(p.approx_eq(evaluate_curve(&g, k as Scalar / 8.0), 1e-9));
        }
    }

    #[test]
    fn test_forward_differences_match_evaluation() {
        let g = arc();
        let pts = curve_points_forward(&g, 10);
        assert_eq!(pts.len(), 11);
        for (k, p) in pts.iter().enumerate() {
            assert!(p.approx_eq(evaluate_curve(&g, k as Scalar / 10.0), 1e-9));
        }
    }

    #[test]
    fn test_patch_triangle_count() {
        let p = flat_patch();
        assert_eq!(patch_triangles(&p, 0).len(), 2);
        assert_eq!(patch_triangles(&p, 2).len(), 32);
    }

    #[test]
    fn test_flat_patch_normals() {
        for tri in patch_triangles(&flat_patch(), 2) {
            for v in tri {
                assert!(v.normal.approx_eq(Vec3::Z, 1e-9));
                assert!(v.position.z.abs() < 1e-12);
                assert!((0.0..=3.0).contains(&v.position.x));
            }
        }
    }

    #[test]
    fn test_depth_is_clamped() {
        let pts = curve_points_subdivided(&arc(), MAX_DEPTH + 5);
        assert_eq!(pts.len(), (1 << MAX_DEPTH) + 1);
    }
}
