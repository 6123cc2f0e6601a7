//! Edge walker for scanline triangle fill
//!
//! Walks one edge, or a chain of two connected edges, one scanline at a time
//! from bottom to top. On every scanline it reports the edge's x and the
//! depth, normal, world position and color interpolated along it.
//!
//! Scanlines are half-open: an edge from `y0` to `y1` covers `y0..y1`, so the
//! top scanline belongs to the next edge up. X is stepped with an integer
//! accumulator and always lands on `ceil` of the exact edge x.

use tracing::trace;

use super::error::PipelineError;
use super::interpolator::Interpolator;
use super::math::{Scalar, Vec3};
use super::types::VertexOut;

/// Everything known about the edge on the current scanline
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSample {
    pub x: i32,
    pub y: i32,
    pub depth: Scalar,
    pub normal: Vec3,
    pub position: Vec3,
    pub color: Vec3,
}

/// True iff both vertices fall on the same scanline
pub fn horizontal_edge(a: &VertexOut, b: &VertexOut) -> bool {
    a.py() == b.py()
}

#[derive(Debug, Clone, Default)]
pub struct EdgeRasterizer {
    valid: bool,

    /// Second edge of a two-edge chain, walked once the first runs out
    pending: Option<(VertexOut, VertexOut)>,

    x_current: i32,
    y_current: i32,
    y_stop: i32,

    delta_x: i32,
    numerator: i32,
    denominator: i32,
    accumulator: i32,

    depth: Interpolator<Scalar>,
    normal: Interpolator<Vec3>,
    position: Interpolator<Vec3>,
    color: Interpolator<Vec3>,
}

impl EdgeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the single edge `v1`-`v2`. The endpoints may come in either order.
    pub fn init_edge(&mut self, v1: &VertexOut, v2: &VertexOut) -> Result<(), PipelineError> {
        self.pending = None;
        self.start_edge(v1, v2)
    }

    /// Walk the chain `v1`-`v2`-`v3`, with `v2` between the others in y.
    ///
    /// A horizontal sub-edge is skipped and only the other edge is walked.
    pub fn init_edges(
        &mut self,
        v1: &VertexOut,
        v2: &VertexOut,
        v3: &VertexOut,
    ) -> Result<(), PipelineError> {
        // Walk bottom to top
        let (v1, v3) = if v1.py() > v3.py() { (v3, v1) } else { (v1, v3) };

        if v2.py() < v1.py() || v2.py() > v3.py() {
            self.valid = false;
            return Err(PipelineError::invalid(
                "EdgeRasterizer::init_edges()",
                "middle vertex is not between the chain ends",
            ));
        }

        match (horizontal_edge(v1, v2), horizontal_edge(v2, v3)) {
            (false, false) => {
                self.start_edge(v1, v2)?;
                self.pending = Some((*v2, *v3));
            }
            (true, false) => {
                trace!("first edge is horizontal, skipped");
                self.pending = None;
                self.start_edge(v2, v3)?;
            }
            (false, true) => {
                trace!("second edge is horizontal, skipped");
                self.pending = None;
                self.start_edge(v1, v2)?;
            }
            (true, true) => {
                self.valid = false;
                return Err(PipelineError::invalid(
                    "EdgeRasterizer::init_edges()",
                    "both edges are horizontal",
                ));
            }
        }
        Ok(())
    }

    fn start_edge(&mut self, a: &VertexOut, b: &VertexOut) -> Result<(), PipelineError> {
        if !a.in_guard_band() || !b.in_guard_band() {
            self.valid = false;
            return Err(PipelineError::invalid(
                "EdgeRasterizer::init_edge()",
                "vertex outside the guard band",
            ));
        }
        if horizontal_edge(a, b) {
            self.valid = false;
            return Err(PipelineError::invalid(
                "EdgeRasterizer::init_edge()",
                "horizontal edge",
            ));
        }
        let (lo, hi) = if a.py() < b.py() { (a, b) } else { (b, a) };

        let (x_start, y_start) = (lo.px(), lo.py());
        let (x_stop, y_stop) = (hi.px(), hi.py());

        self.depth.init(y_start, y_stop, lo.position.z, hi.position.z);
        self.normal.init(y_start, y_stop, lo.normal, hi.normal);
        self.position.init(y_start, y_stop, lo.world, hi.world);
        self.color.init(y_start, y_stop, lo.color, hi.color);

        let dx = x_stop - x_start;
        self.delta_x = if dx < 0 { -1 } else { 1 };
        self.numerator = dx.abs();
        self.denominator = y_stop - y_start;
        self.accumulator = if self.delta_x > 0 { self.denominator } else { 1 };

        self.x_current = x_start;
        self.y_current = y_start;
        self.y_stop = y_stop;
        self.valid = y_start < y_stop;
        Ok(())
    }

    pub fn more_fragments(&self) -> bool {
        self.valid
    }

    /// Advance one scanline, moving on to the second edge of a chain when the
    /// first is done
    pub fn next_fragment(&mut self) {
        if !self.valid {
            return;
        }

        self.y_current += 1;
        if self.y_current >= self.y_stop {
            match self.pending.take() {
                // Both ends were checked in init_edges, so this cannot fail
                Some((a, b)) => {
                    if self.start_edge(&a, &b).is_err() {
                        self.valid = false;
                    }
                }
                None => self.valid = false,
            }
            return;
        }

        self.accumulator += self.numerator;
        while self.accumulator > self.denominator {
            self.x_current += self.delta_x;
            self.accumulator -= self.denominator;
        }
        self.depth.next_value();
        self.normal.next_value();
        self.position.next_value();
        self.color.next_value();
    }

    fn check(&self, accessor: &'static str) -> Result<(), PipelineError> {
        if self.valid {
            Ok(())
        } else {
            Err(PipelineError::invalid(accessor, "edge not initialized or exhausted"))
        }
    }

    pub fn x(&self) -> Result<i32, PipelineError> {
        self.check("EdgeRasterizer::x()")?;
        Ok(self.x_current)
    }

    pub fn y(&self) -> Result<i32, PipelineError> {
        self.check("EdgeRasterizer::y()")?;
        Ok(self.y_current)
    }

    pub fn depth(&self) -> Result<Scalar, PipelineError> {
        self.check("EdgeRasterizer::depth()")?;
        self.depth.value()
    }

    pub fn normal(&self) -> Result<Vec3, PipelineError> {
        self.check("EdgeRasterizer::normal()")?;
        self.normal.value()
    }

    /// Interpolated world position
    pub fn position(&self) -> Result<Vec3, PipelineError> {
        self.check("EdgeRasterizer::position()")?;
        self.position.value()
    }

    pub fn color(&self) -> Result<Vec3, PipelineError> {
        self.check("EdgeRasterizer::color()")?;
        self.color.value()
    }

    /// All attributes on the current scanline at once
    pub fn sample(&self) -> Result<EdgeSample, PipelineError> {
        Ok(EdgeSample {
            x: self.x()?,
            y: self.y()?,
            depth: self.depth()?,
            normal: self.normal()?,
            position: self.position()?,
            color: self.color()?,
        })
    }
}
