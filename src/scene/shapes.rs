//! Unit cube geometry
//!
//! Corner `i` sits at x = +s/2 when bit 0 of `i` is set, y when bit 1 is
//! set, z when bit 2 is set, and at -s/2 otherwise.

use crate::rasterizer::{Scalar, Vec3};

/// Corner pairs joined by the 12 cube edges
#[rustfmt::skip]
pub const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1), (2, 3), (4, 5), (6, 7),
    (0, 2), (1, 3), (4, 6), (5, 7),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// The six faces as corner cycles with their outward normals
pub const CUBE_FACES: [([usize; 4], Vec3); 6] = [
    ([0, 2, 6, 4], Vec3::new(-1.0, 0.0, 0.0)),
    ([1, 3, 7, 5], Vec3::new(1.0, 0.0, 0.0)),
    ([0, 1, 5, 4], Vec3::new(0.0, -1.0, 0.0)),
    ([2, 3, 7, 6], Vec3::new(0.0, 1.0, 0.0)),
    ([0, 1, 3, 2], Vec3::new(0.0, 0.0, -1.0)),
    ([4, 5, 7, 6], Vec3::new(0.0, 0.0, 1.0)),
];

/// Corners of an axis-aligned cube of edge length `size`, centered at the origin
pub fn cube_corners(size: Scalar) -> [Vec3; 8] {
    let h = size / 2.0;
    let pick = |bit: bool| if bit { h } else { -h };
    std::array::from_fn(|i| Vec3::new(pick(i & 1 != 0), pick(i & 2 != 0), pick(i & 4 != 0)))
}

/// A flat-shaded triangle: corners wound counter-clockwise seen from outside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceTriangle {
    pub corners: [Vec3; 3],
    pub normal: Vec3,
}

/// The cube as 12 outward-facing triangles
pub fn cube_triangles(size: Scalar) -> Vec<FaceTriangle> {
    let c = cube_corners(size);
    let mut out = Vec::with_capacity(12);
    for (quad, normal) in CUBE_FACES {
        for [a, b, d] in [[quad[0], quad[1], quad[2]], [quad[0], quad[2], quad[3]]] {
            let (pa, mut pb, mut pd) = (c[a], c[b], c[d]);
            if (pb - pa).cross(pd - pa).dot(normal) < 0.0 {
                std::mem::swap(&mut pb, &mut pd);
            }
            out.push(FaceTriangle { corners: [pa, pb, pd], normal });
        }
    }
    out
}
