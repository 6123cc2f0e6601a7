//! Framebuffer and render pipeline
//!
//! The pipeline owns the color and depth buffers, the graphics state and the
//! currently loaded stages. Every draw call runs vertex program, rasterizer
//! and fragment program, then depth-tests each fragment into the framebuffer.

use std::rc::Rc;

use tracing::{debug, info, warn};

use super::error::PipelineError;
use super::math::{Scalar, Vec3};
use super::primitives::{LineRasterizer, PointRasterizer, Rasterizer, TriangleRasterizer};
use super::program::{
    FragmentProgram, IdentityFragmentProgram, IdentityVertexProgram, PhongFragmentProgram,
    TransformVertexProgram, VertexProgram,
};
use super::state::GraphicsState;
use super::types::{Color, DepthPolarity, Fragment, PipelineSettings, Primitive, VertexOut};

/// Color and depth buffers. Row 0 is the bottom scanline.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pub width: usize,
    pub height: usize,
    colors: Vec<Vec3>,
    depth: Vec<Scalar>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            colors: vec![Vec3::ZERO; width * height],
            depth: vec![DepthPolarity::default().far(); width * height],
        }
    }

    /// Reallocate; previous contents are lost
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self, depth: Scalar, color: Vec3) {
        self.colors.fill(color);
        self.depth.fill(depth);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    pub fn color_at(&self, x: i32, y: i32) -> Option<Vec3> {
        self.index(x, y).map(|i| self.colors[i])
    }

    pub fn depth_at(&self, x: i32, y: i32) -> Option<Scalar> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Write `color` if `depth` passes against the stored depth. Returns true
    /// when the pixel was written.
    pub fn test_and_set(
        &mut self,
        x: i32,
        y: i32,
        depth: Scalar,
        color: Vec3,
        polarity: DepthPolarity,
    ) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        if !polarity.passes(depth, self.depth[i]) {
            return false;
        }
        self.depth[i] = depth;
        self.colors[i] = color;
        true
    }

    /// Write without touching depth (overlays)
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Vec3) {
        if let Some(i) = self.index(x, y) {
            self.colors[i] = color;
        }
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn depths(&self) -> &[Scalar] {
        &self.depth
    }

    /// Display order: top row first
    fn rows_top_down(&self) -> impl Iterator<Item = &[Vec3]> {
        self.colors.chunks(self.width.max(1)).rev()
    }

    /// Packed RGB, top row first
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height * 3);
        for row in self.rows_top_down() {
            for c in row {
                let bytes = Color::from_rgb(*c).to_bytes();
                out.extend_from_slice(&bytes[..3]);
            }
        }
        out
    }

    /// Packed RGBA, top row first (what a display texture wants)
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height * 4);
        for row in self.rows_top_down() {
            for c in row {
                out.extend_from_slice(&Color::from_rgb(*c).to_bytes());
            }
        }
        out
    }
}

/// Receives each finished frame (display, image export)
pub trait FrameSink {
    fn present(&mut self, framebuffer: &Framebuffer, frame: u64) -> Result<(), PipelineError>;
}

/// Per-frame counters reported by [`RenderPipeline::flush`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    /// Fragments produced by the rasterizer
    pub emitted: usize,
    /// Fragments that won the depth test on at least one pixel
    pub written: usize,
    pub depth_rejected: usize,
    /// Fragments outside the framebuffer
    pub clipped: usize,
}

/// One shared instance of every standard stage
#[derive(Clone)]
pub struct Stages {
    pub points: Rc<dyn Rasterizer>,
    pub lines: Rc<dyn Rasterizer>,
    pub triangles: Rc<dyn Rasterizer>,
    pub identity_vertex: Rc<dyn VertexProgram>,
    pub transform_vertex: Rc<dyn VertexProgram>,
    pub gouraud_vertex: Rc<dyn VertexProgram>,
    pub identity_fragment: Rc<dyn FragmentProgram>,
    pub phong_fragment: Rc<dyn FragmentProgram>,
}

impl Stages {
    pub fn standard() -> Self {
        Self {
            points: Rc::new(PointRasterizer),
            lines: Rc::new(LineRasterizer),
            triangles: Rc::new(TriangleRasterizer),
            identity_vertex: Rc::new(IdentityVertexProgram),
            transform_vertex: Rc::new(TransformVertexProgram::unlit()),
            gouraud_vertex: Rc::new(TransformVertexProgram::gouraud()),
            identity_fragment: Rc::new(IdentityFragmentProgram),
            phong_fragment: Rc::new(PhongFragmentProgram),
        }
    }
}

impl Default for Stages {
    fn default() -> Self {
        Self::standard()
    }
}

pub struct RenderPipeline {
    settings: PipelineSettings,
    framebuffer: Framebuffer,
    state: GraphicsState,

    rasterizer: Option<Rc<dyn Rasterizer>>,
    vertex_program: Rc<dyn VertexProgram>,
    fragment_program: Rc<dyn FragmentProgram>,

    debug: bool,
    unit_length: usize,

    stats: FrameStats,
    frame: u64,
}

impl RenderPipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        let mut framebuffer = Framebuffer::new(settings.width, settings.height);
        framebuffer.clear(settings.depth_polarity.far(), settings.clear_color);
        Self {
            settings,
            framebuffer,
            state: GraphicsState::new(),
            rasterizer: None,
            vertex_program: Rc::new(IdentityVertexProgram),
            fragment_program: Rc::new(IdentityFragmentProgram),
            debug: false,
            unit_length: 1,
            stats: FrameStats::default(),
            frame: 0,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Reallocate both buffers and clear them to the configured background
    pub fn set_resolution(&mut self, width: usize, height: usize) {
        info!(width, height, "set resolution");
        self.settings.width = width;
        self.settings.height = height;
        self.framebuffer.resize(width, height);
        self.clear_default();
    }

    pub fn set_depth_polarity(&mut self, polarity: DepthPolarity) {
        self.settings.depth_polarity = polarity;
    }

    pub fn clear(&mut self, depth: Scalar, color: Vec3) {
        self.framebuffer.clear(depth, color);
    }

    /// Clear to the far plane and the configured background color
    pub fn clear_default(&mut self) {
        self.framebuffer
            .clear(self.settings.depth_polarity.far(), self.settings.clear_color);
    }

    pub fn load_rasterizer(&mut self, rasterizer: Rc<dyn Rasterizer>) {
        debug!(stage = rasterizer.name(), "load rasterizer");
        self.rasterizer = Some(rasterizer);
    }

    pub fn load_vertex_program(&mut self, program: Rc<dyn VertexProgram>) {
        debug!(stage = program.name(), "load vertex program");
        self.vertex_program = program;
    }

    pub fn load_fragment_program(&mut self, program: Rc<dyn FragmentProgram>) {
        debug!(stage = program.name(), "load fragment program");
        self.fragment_program = program;
    }

    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GraphicsState {
        &mut self.state
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn draw_point(&mut self, position: Vec3, color: Vec3) -> Result<(), PipelineError> {
        let rasterizer = self.loaded_rasterizer()?;
        let v = self.vertex_program.run(&self.state, position, color);
        self.rasterize(rasterizer.as_ref(), Primitive::Point(v))
    }

    pub fn draw_line(
        &mut self,
        p0: Vec3,
        c0: Vec3,
        p1: Vec3,
        c1: Vec3,
    ) -> Result<(), PipelineError> {
        let rasterizer = self.loaded_rasterizer()?;
        let v0 = self.vertex_program.run(&self.state, p0, c0);
        let v1 = self.vertex_program.run(&self.state, p1, c1);
        self.rasterize(rasterizer.as_ref(), Primitive::Line([v0, v1]))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_triangle(
        &mut self,
        p0: Vec3,
        n0: Vec3,
        c0: Vec3,
        p1: Vec3,
        n1: Vec3,
        c1: Vec3,
        p2: Vec3,
        n2: Vec3,
        c2: Vec3,
    ) -> Result<(), PipelineError> {
        let rasterizer = self.loaded_rasterizer()?;
        let vp = &self.vertex_program;
        let v0 = vp.run_with_normal(&self.state, p0, n0, c0);
        let v1 = vp.run_with_normal(&self.state, p1, n1, c1);
        let v2 = vp.run_with_normal(&self.state, p2, n2, c2);
        self.rasterize(rasterizer.as_ref(), Primitive::Triangle([v0, v1, v2]))
    }

    fn loaded_rasterizer(&self) -> Result<Rc<dyn Rasterizer>, PipelineError> {
        self.rasterizer
            .clone()
            .ok_or(PipelineError::StageNotLoaded("rasterizer"))
    }

    fn rasterize(
        &mut self,
        rasterizer: &dyn Rasterizer,
        primitive: Primitive,
    ) -> Result<(), PipelineError> {
        let fragment_program = Rc::clone(&self.fragment_program);
        rasterizer.rasterize(&primitive, &mut |fragment| {
            self.write_fragment(fragment_program.as_ref(), &fragment)
        })
    }

    /// Shade one fragment and depth-test it into its pixel block
    fn write_fragment(&mut self, program: &dyn FragmentProgram, fragment: &Fragment) {
        self.stats.emitted += 1;

        let n = i32::try_from(self.unit_length).unwrap_or(i32::MAX);
        let (Some(bx), Some(by)) = (fragment.x.checked_mul(n), fragment.y.checked_mul(n)) else {
            self.stats.clipped += 1;
            return;
        };
        if self.framebuffer.index(bx, by).is_none() {
            self.stats.clipped += 1;
            return;
        }

        let color = program.run(&self.state, fragment);
        if self.debug {
            debug!(x = fragment.x, y = fragment.y, depth = fragment.depth, ?color, "fragment");
        }

        // Debug mode leaves a one pixel gutter between blocks
        let size = if self.debug && n > 1 { n - 1 } else { n };
        let polarity = self.settings.depth_polarity;
        let mut written = false;
        for dy in 0..size {
            for dx in 0..size {
                written |= self
                    .framebuffer
                    .test_and_set(bx + dx, by + dy, fragment.depth, color, polarity);
            }
        }
        if written {
            self.stats.written += 1;
        } else {
            self.stats.depth_rejected += 1;
        }
    }

    pub fn debug_on(&mut self) {
        self.debug = true;
    }

    pub fn debug_off(&mut self) {
        self.debug = false;
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Draw every logical pixel as an `n` x `n` block of device pixels
    pub fn unit_length(&mut self, n: usize) {
        if n == 0 {
            warn!("unit length 0 ignored, using 1");
        }
        self.unit_length = n.max(1);
    }

    /// Logical resolution after unit-length scaling
    pub fn logical_size(&self) -> (usize, usize) {
        (
            self.framebuffer.width / self.unit_length,
            self.framebuffer.height / self.unit_length,
        )
    }

    /// Overlay grid lines every `x_spacing` / `y_spacing` device pixels
    pub fn draw_grid(
        &mut self,
        x_spacing: usize,
        y_spacing: usize,
        color: Vec3,
    ) -> Result<(), PipelineError> {
        let (w, h) = (self.framebuffer.width as i32, self.framebuffer.height as i32);
        if x_spacing > 0 {
            for x in (0..w).step_by(x_spacing) {
                self.overlay_line((x, 0), (x, h - 1), color)?;
            }
        }
        if y_spacing > 0 {
            for y in (0..h).step_by(y_spacing) {
                self.overlay_line((0, y), (w - 1, y), color)?;
            }
        }
        Ok(())
    }

    /// Overlay the ideal line between two logical pixel centers at device
    /// resolution, for comparing against the rasterized one
    pub fn draw_debugline(&mut self, p0: Vec3, p1: Vec3, color: Vec3) -> Result<(), PipelineError> {
        let n = self.unit_length as Scalar;
        let center = |p: Vec3| {
            (
                (p.x.round() * n + n / 2.0).floor() as i32,
                (p.y.round() * n + n / 2.0).floor() as i32,
            )
        };
        self.overlay_line(center(p0), center(p1), color)
    }

    fn overlay_line(
        &mut self,
        from: (i32, i32),
        to: (i32, i32),
        color: Vec3,
    ) -> Result<(), PipelineError> {
        let vertex = |(x, y): (i32, i32)| {
            VertexOut::screen(Vec3::new(x as Scalar, y as Scalar, 0.0), Vec3::ZERO, color)
        };
        let line = Primitive::Line([vertex(from), vertex(to)]);
        let framebuffer = &mut self.framebuffer;
        LineRasterizer.rasterize(&line, &mut |f| framebuffer.set_pixel(f.x, f.y, f.color))
    }

    /// Finish the frame and return its counters
    pub fn flush(&mut self) -> FrameStats {
        let stats = FrameStats {
            frame: self.frame,
            ..self.stats
        };
        debug!(
            frame = stats.frame,
            emitted = stats.emitted,
            written = stats.written,
            depth_rejected = stats.depth_rejected,
            clipped = stats.clipped,
            "flush"
        );
        self.frame += 1;
        self.stats = FrameStats::default();
        stats
    }

    /// Finish the frame and hand it to a display or export sink
    pub fn flush_to(&mut self, sink: &mut dyn FrameSink) -> Result<FrameStats, PipelineError> {
        let stats = self.flush();
        sink.present(&self.framebuffer, stats.frame)?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::camera::{Camera, ViewParams};
    use crate::rasterizer::types::colors;

    fn pipeline(width: usize, height: usize) -> RenderPipeline {
        RenderPipeline::new(PipelineSettings {
            width,
            height,
            ..Default::default()
        })
    }

    fn flat_triangle(p: &mut RenderPipeline, z: Scalar, offset: Scalar, color: Vec3) {
        let a = Vec3::new(offset, 0.0, z);
        let b = Vec3::new(offset + 20.0, 0.0, z);
        let c = Vec3::new(offset, 20.0, z);
        p.draw_triangle(a, Vec3::Z, color, b, Vec3::Z, color, c, Vec3::Z, color)
            .unwrap();
    }

    #[test]
    fn test_depth_independent_of_draw_order() {
        let stages = Stages::standard();
        for near_first in [true, false] {
            let mut p = pipeline(32, 32);
            p.load_rasterizer(stages.triangles.clone());
            if near_first {
                flat_triangle(&mut p, -0.2, 0.0, colors::BLUE);
                flat_triangle(&mut p, -0.8, 4.0, colors::RED);
            } else {
                flat_triangle(&mut p, -0.8, 4.0, colors::RED);
                flat_triangle(&mut p, -0.2, 0.0, colors::BLUE);
            }
            // Overlap: blue (nearer under -1 = far) wins
            assert_eq!(p.framebuffer().color_at(6, 2), Some(colors::BLUE));
            // Red only
            assert_eq!(p.framebuffer().color_at(21, 1), Some(colors::RED));
        }
    }

    #[test]
    fn test_positive_far_polarity() {
        let stages = Stages::standard();
        let mut p = RenderPipeline::new(PipelineSettings {
            width: 32,
            height: 32,
            depth_polarity: DepthPolarity::PositiveFar,
            ..Default::default()
        });
        p.clear_default();
        p.load_rasterizer(stages.triangles.clone());
        flat_triangle(&mut p, 0.2, 0.0, colors::BLUE);
        flat_triangle(&mut p, 0.8, 4.0, colors::RED);
        assert_eq!(p.framebuffer().color_at(6, 2), Some(colors::BLUE));
    }

    #[test]
    fn test_cube_wireframe_end_to_end() {
        use crate::scene::shapes::{cube_corners, CUBE_EDGES};

        let stages = Stages::standard();
        let mut p = pipeline(100, 100);
        Camera::new()
            .set_projection(p.state_mut(), &ViewParams::looking_down_z(100.0))
            .unwrap();
        p.clear(-1.0, colors::WHITE);
        p.load_rasterizer(stages.lines.clone());
        p.load_vertex_program(stages.transform_vertex.clone());
        p.load_fragment_program(stages.identity_fragment.clone());

        let corners = cube_corners(1.0);
        let projection = p.state().projection;
        let screen: Vec<(i32, i32)> = corners
            .iter()
            .map(|&c| {
                let s = projection.transform_point(c);
                (s.x.round() as i32, s.y.round() as i32)
            })
            .collect();

        let mut expected_fragments = 0;
        for &(a, b) in CUBE_EDGES.iter() {
            p.draw_line(corners[a], colors::BLACK, corners[b], colors::BLACK).unwrap();
            let (sa, sb) = (screen[a], screen[b]);
            expected_fragments += (sa.0 - sb.0).abs().max((sa.1 - sb.1).abs()) as usize + 1;
        }
        let stats = p.flush();

        // One fragment per major-axis step of every edge, none clipped
        assert_eq!(stats.emitted, expected_fragments);
        assert_eq!(stats.clipped, 0);

        // Every projected corner is drawn
        for &(x, y) in &screen {
            assert_eq!(p.framebuffer().color_at(x, y), Some(colors::BLACK));
        }

        // The cube is about 25 pixels across, centered
        let (min_x, max_x) = screen
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), s| (lo.min(s.0), hi.max(s.0)));
        assert!((24..=27).contains(&(max_x - min_x)));
        assert!((min_x + max_x - 100).abs() <= 1);

        // Only black and white in the frame, and nothing outside the cube's box
        for y in 0..100 {
            for x in 0..100 {
                let c = p.framebuffer().color_at(x, y).unwrap();
                assert!(c == colors::BLACK || c == colors::WHITE);
                if c == colors::BLACK {
                    assert!(x >= min_x && x <= max_x);
                }
            }
        }
    }

    #[test]
    fn test_draw_without_rasterizer() {
        let mut p = pipeline(8, 8);
        assert!(matches!(
            p.draw_point(Vec3::ZERO, colors::RED),
            Err(PipelineError::StageNotLoaded(_))
        ));
    }

    #[test]
    fn test_unit_length_blocks() {
        let stages = Stages::standard();
        let mut p = pipeline(32, 32);
        p.clear(-1.0, colors::BLACK);
        p.load_rasterizer(stages.points.clone());
        p.unit_length(4);
        assert_eq!(p.logical_size(), (8, 8));

        p.draw_point(Vec3::new(2.0, 3.0, 0.0), colors::WHITE).unwrap();
        for y in 12..16 {
            for x in 8..12 {
                assert_eq!(p.framebuffer().color_at(x, y), Some(colors::WHITE));
            }
        }
        assert_eq!(p.framebuffer().color_at(12, 12), Some(colors::BLACK));

        // Debug mode keeps a gutter on the far side of the block
        p.debug_on();
        assert!(p.is_debug());
        p.draw_point(Vec3::new(5.0, 5.0, 0.0), colors::RED).unwrap();
        assert_eq!(p.framebuffer().color_at(20, 20), Some(colors::RED));
        assert_eq!(p.framebuffer().color_at(23, 20), Some(colors::BLACK));
        p.debug_off();
        assert!(!p.is_debug());
    }

    #[test]
    fn test_huge_block_offset_is_clipped() {
        let stages = Stages::standard();
        let mut p = pipeline(8, 8);
        p.load_rasterizer(stages.points.clone());
        p.unit_length(4096);
        // 1e6 * 4096 does not fit in i32
        p.draw_point(Vec3::new(1.0e6, 0.0, 0.0), colors::RED).unwrap();
        let stats = p.flush();
        assert_eq!(stats.emitted, 1);
        assert_eq!(stats.clipped, 1);
        assert_eq!(stats.written, 0);
    }

    #[test]
    fn test_set_depth_polarity() {
        let mut p = pipeline(4, 4);
        assert_eq!(p.settings().depth_polarity, DepthPolarity::NegativeFar);
        p.set_depth_polarity(DepthPolarity::PositiveFar);
        assert_eq!(p.settings().depth_polarity, DepthPolarity::PositiveFar);
        p.clear_default();
        assert!(p.framebuffer().depths().iter().all(|&d| d == DepthPolarity::PositiveFar.far()));
    }

    #[test]
    fn test_fragments_outside_are_clipped() {
        let stages = Stages::standard();
        let mut p = pipeline(10, 10);
        p.load_rasterizer(stages.lines.clone());
        p.draw_line(Vec3::new(-5.0, 2.0, 0.0), colors::RED, Vec3::new(4.0, 2.0, 0.0), colors::RED)
            .unwrap();
        let stats = p.flush();
        assert_eq!(stats.emitted, 10);
        assert_eq!(stats.clipped, 5);
        assert_eq!(stats.written, 5);
    }

    #[test]
    fn test_flush_counts_frames() {
        let stages = Stages::standard();
        let mut p = pipeline(4, 4);
        p.load_rasterizer(stages.points.clone());
        p.draw_point(Vec3::new(1.0, 1.0, -0.5), colors::RED).unwrap();
        p.draw_point(Vec3::new(1.0, 1.0, -0.9), colors::BLUE).unwrap();

        let first = p.flush();
        assert_eq!(first.frame, 0);
        assert_eq!(first.written, 1);
        assert_eq!(first.depth_rejected, 1);
        assert_eq!(p.framebuffer().color_at(1, 1), Some(colors::RED));

        let second = p.flush();
        assert_eq!(second.frame, 1);
        assert_eq!(second.emitted, 0);
    }

    #[test]
    fn test_grid_and_debugline() {
        let mut p = pipeline(16, 16);
        p.clear(-1.0, colors::BLACK);
        p.draw_grid(4, 8, colors::GRAY).unwrap();
        assert_eq!(p.framebuffer().color_at(4, 3), Some(colors::GRAY));
        assert_eq!(p.framebuffer().color_at(5, 8), Some(colors::GRAY));
        assert_eq!(p.framebuffer().color_at(5, 3), Some(colors::BLACK));

        p.unit_length(4);
        p.draw_debugline(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), colors::YELLOW)
            .unwrap();
        // Centers of logical pixels 0 and 3 sit at device x = 2 and 14
        assert_eq!(p.framebuffer().color_at(2, 2), Some(colors::YELLOW));
        assert_eq!(p.framebuffer().color_at(14, 2), Some(colors::YELLOW));
        assert_eq!(p.framebuffer().color_at(15, 2), Some(colors::BLACK));
    }

    #[test]
    fn test_rgb8_is_top_down() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(-1.0, colors::BLACK);
        fb.set_pixel(0, 1, colors::WHITE);
        let bytes = fb.to_rgb8();
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[0..3], &[255, 255, 255]);
        assert_eq!(&bytes[6..9], &[0, 0, 0]);
        assert_eq!(fb.to_rgba8().len(), 16);
    }

    #[test]
    fn test_set_resolution_reallocates() {
        let mut p = pipeline(4, 4);
        p.set_resolution(6, 3);
        assert_eq!(p.framebuffer().colors().len(), 18);
        assert_eq!(p.framebuffer().depths().len(), 18);
        assert!(p.framebuffer().depths().iter().all(|&d| d == -1.0));
        assert_eq!((p.settings().width, p.settings().height), (6, 3));
        assert_eq!(p.framebuffer().depth_at(5, 2), Some(-1.0));
        assert_eq!(p.framebuffer().color_at(6, 0), None);
        assert_eq!(p.framebuffer().color_at(0, 0), Some(colors::GRAY));
    }
}
