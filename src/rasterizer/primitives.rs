//! Point, line and triangle rasterizers
//!
//! A rasterizer turns one screen-space [`Primitive`] into fragments and hands
//! each to `emit`. Rasterizers hold no per-draw state, so a pipeline can swap
//! them between draw calls.

use tracing::trace;

use super::edge::{EdgeRasterizer, EdgeSample};
use super::error::PipelineError;
use super::interpolator::Interpolator;
use super::math::{Scalar, Vec3};
use super::types::{Fragment, Primitive, VertexOut};

pub trait Rasterizer {
    fn name(&self) -> &'static str;

    /// Emit every fragment covered by `primitive`
    fn rasterize(
        &self,
        primitive: &Primitive,
        emit: &mut dyn FnMut(Fragment),
    ) -> Result<(), PipelineError>;
}

fn unsupported(rasterizer: &'static str, primitive: &Primitive) -> PipelineError {
    PipelineError::UnsupportedPrimitive {
        rasterizer,
        primitive: primitive.kind(),
    }
}

fn fragment_at(x: i32, y: i32, v: &VertexOut) -> Fragment {
    Fragment {
        x,
        y,
        depth: v.position.z,
        position: v.world,
        normal: v.normal,
        color: v.color,
    }
}

/// One fragment at the rounded vertex position
#[derive(Debug, Clone, Copy, Default)]
pub struct PointRasterizer;

impl Rasterizer for PointRasterizer {
    fn name(&self) -> &'static str {
        "point rasterizer"
    }

    fn rasterize(
        &self,
        primitive: &Primitive,
        emit: &mut dyn FnMut(Fragment),
    ) -> Result<(), PipelineError> {
        let Primitive::Point(v) = primitive else {
            return Err(unsupported(self.name(), primitive));
        };
        if !v.in_guard_band() {
            trace!("point outside guard band culled");
            return Ok(());
        }
        emit(fragment_at(v.px(), v.py(), v));
        Ok(())
    }
}

/// Incremental line drawing along the major axis
///
/// Both endpoints are drawn. The minor coordinate moves by whole pixels when
/// the integer accumulator crosses half a major step, which rounds exact
/// halves down.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRasterizer;

impl Rasterizer for LineRasterizer {
    fn name(&self) -> &'static str {
        "line rasterizer"
    }

    fn rasterize(
        &self,
        primitive: &Primitive,
        emit: &mut dyn FnMut(Fragment),
    ) -> Result<(), PipelineError> {
        let Primitive::Line([v0, v1]) = primitive else {
            return Err(unsupported(self.name(), primitive));
        };
        if !v0.in_guard_band() || !v1.in_guard_band() {
            trace!("line outside guard band culled");
            return Ok(());
        }

        let (x0, y0) = (v0.px(), v0.py());
        let (x1, y1) = (v1.px(), v1.py());
        let (dx, dy) = (x1 - x0, y1 - y0);

        if dx == 0 && dy == 0 {
            emit(fragment_at(x0, y0, v0));
            return Ok(());
        }

        let x_major = dx.abs() >= dy.abs();
        let (d_major, d_minor) = if x_major { (dx, dy) } else { (dy, dx) };
        let step_major = d_major.signum();
        let step_minor = if d_minor < 0 { -1 } else { 1 };
        let steps = d_major.abs();

        let mut depth = Interpolator::over(0, steps, v0.position.z, v1.position.z);
        let mut normal = Interpolator::over(0, steps, v0.normal, v1.normal);
        let mut position = Interpolator::over(0, steps, v0.world, v1.world);
        let mut color = Interpolator::over(0, steps, v0.color, v1.color);

        let (mut major, mut minor) = if x_major { (x0, y0) } else { (y0, x0) };
        let mut accumulator = 0;

        for _ in 0..=steps {
            let (x, y) = if x_major { (major, minor) } else { (minor, major) };
            emit(Fragment {
                x,
                y,
                depth: depth.value()?,
                position: position.value()?,
                normal: normal.value()?,
                color: color.value()?,
            });

            major += step_major;
            accumulator += 2 * d_minor.abs();
            if accumulator > steps {
                minor += step_minor;
                accumulator -= 2 * steps;
            }
            depth.next_value();
            normal.next_value();
            position.next_value();
            color.next_value();
        }
        Ok(())
    }
}

/// Scanline triangle fill
///
/// The long edge (lowest to highest vertex) and the chain of the two short
/// edges are walked in lock-step; each scanline is filled over the half-open
/// span `[x_left, x_right)`. Shared edges between adjacent triangles are
/// therefore filled exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriangleRasterizer;

impl TriangleRasterizer {
    /// Twice the signed area on the rounded pixel grid
    fn doubled_area(v: &[VertexOut; 3]) -> i64 {
        let (ax, ay) = (v[0].px() as i64, v[0].py() as i64);
        let (bx, by) = (v[1].px() as i64, v[1].py() as i64);
        let (cx, cy) = (v[2].px() as i64, v[2].py() as i64);
        (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
    }

    fn fill_span(
        left: &EdgeSample,
        right: &EdgeSample,
        emit: &mut dyn FnMut(Fragment),
    ) -> Result<(), PipelineError> {
        if left.x >= right.x {
            return Ok(());
        }
        let y = left.y;
        let mut depth = Interpolator::over(left.x, right.x, left.depth, right.depth);
        let mut normal = Interpolator::over(left.x, right.x, left.normal, right.normal);
        let mut position = Interpolator::over(left.x, right.x, left.position, right.position);
        let mut color = Interpolator::over(left.x, right.x, left.color, right.color);

        for x in left.x..right.x {
            emit(Fragment {
                x,
                y,
                depth: depth.value()?,
                position: position.value()?,
                normal: normal.value()?,
                color: color.value()?,
            });
            depth.next_value();
            normal.next_value();
            position.next_value();
            color.next_value();
        }
        Ok(())
    }
}

impl Rasterizer for TriangleRasterizer {
    fn name(&self) -> &'static str {
        "triangle rasterizer"
    }

    fn rasterize(
        &self,
        primitive: &Primitive,
        emit: &mut dyn FnMut(Fragment),
    ) -> Result<(), PipelineError> {
        let Primitive::Triangle(vertices) = primitive else {
            return Err(unsupported(self.name(), primitive));
        };

        if !vertices.iter().all(VertexOut::in_guard_band) {
            trace!("triangle outside guard band culled");
            return Ok(());
        }
        if Self::doubled_area(vertices) == 0 {
            trace!("collinear triangle skipped");
            return Ok(());
        }

        let mut sorted = *vertices;
        sorted.sort_by_key(|v| v.py());
        let [lo, mid, hi] = sorted;

        let mut long_edge = EdgeRasterizer::new();
        let mut short_edges = EdgeRasterizer::new();
        long_edge.init_edge(&lo, &hi)?;
        short_edges.init_edges(&lo, &mid, &hi)?;

        while long_edge.more_fragments() && short_edges.more_fragments() {
            let a = long_edge.sample()?;
            let b = short_edges.sample()?;
            let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
            Self::fill_span(&left, &right, emit)?;

            long_edge.next_fragment();
            short_edges.next_fragment();
        }
        Ok(())
    }
}

/// Collect the fragments of one primitive, mostly for tests and tools
pub fn collect_fragments(
    rasterizer: &dyn Rasterizer,
    primitive: &Primitive,
) -> Result<Vec<Fragment>, PipelineError> {
    let mut fragments = Vec::new();
    rasterizer.rasterize(primitive, &mut |f| fragments.push(f))?;
    Ok(fragments)
}

/// Screen-space vertex helper for callers that bypass the vertex stage
pub fn screen_vertex(x: Scalar, y: Scalar, depth: Scalar, color: Vec3) -> VertexOut {
    VertexOut::screen(Vec3::new(x, y, depth), Vec3::ZERO, color)
}
