//! Core types for the pipeline

use serde::{Serialize, Deserialize};

use super::math::{Scalar, Vec3};

/// RGBA color (0-255 per channel), the display-side pixel format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Quantize a shading color with channels in `[0, 1]`
    pub fn from_rgb(c: Vec3) -> Self {
        let q = |v: Scalar| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(q(c.x), q(c.y), q(c.z))
    }

    /// Convert to [u8; 4] for display buffers
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Named shading colors used by demos and tests
pub mod colors {
    use super::Vec3;

    pub const BLACK: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const GRAY: Vec3 = Vec3::new(0.5, 0.5, 0.5);
    pub const WHITE: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    pub const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const GREEN: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const BLUE: Vec3 = Vec3::new(0.0, 0.0, 1.0);
    pub const YELLOW: Vec3 = Vec3::new(1.0, 245.0 / 255.0, 6.0 / 255.0);
}

/// Screen coordinates beyond this many pixels from the origin are not
/// rasterized. Keeps integer edge and line stepping well inside `i32`.
pub const GUARD_BAND: Scalar = 1_048_576.0;

/// A vertex after the vertex program
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexOut {
    /// Screen x, y and depth
    pub position: Vec3,
    /// World-space position, used for lighting
    pub world: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
}

impl VertexOut {
    pub fn new(position: Vec3, world: Vec3, normal: Vec3, color: Vec3) -> Self {
        Self { position, world, normal, color }
    }

    /// A screen-space vertex that is its own world position (debug draws)
    pub fn screen(position: Vec3, normal: Vec3, color: Vec3) -> Self {
        Self { position, world: position, normal, color }
    }

    /// False for non-finite or far off-screen positions
    pub fn in_guard_band(&self) -> bool {
        self.position.x.abs() <= GUARD_BAND && self.position.y.abs() <= GUARD_BAND
    }

    /// Rounded pixel column
    pub fn px(&self) -> i32 {
        self.position.x.round() as i32
    }

    /// Rounded pixel row
    pub fn py(&self) -> i32 {
        self.position.y.round() as i32
    }
}

/// One candidate pixel write
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fragment {
    pub x: i32,
    pub y: i32,
    pub depth: Scalar,
    /// Interpolated world position
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
}

/// A screen-space primitive ready for rasterization
#[derive(Debug, Clone, Copy)]
pub enum Primitive {
    Point(VertexOut),
    Line([VertexOut; 2]),
    Triangle([VertexOut; 3]),
}

impl Primitive {
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Point(_) => "point",
            Primitive::Line(_) => "line",
            Primitive::Triangle(_) => "triangle",
        }
    }
}

/// Which end of the depth range is far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthPolarity {
    /// -1 is far, 0 is the front plane (the camera's convention)
    #[default]
    NegativeFar,
    /// +1 is far
    PositiveFar,
}

impl DepthPolarity {
    /// Depth to clear the buffer to
    pub fn far(self) -> Scalar {
        match self {
            DepthPolarity::NegativeFar => -1.0,
            DepthPolarity::PositiveFar => 1.0,
        }
    }

    /// True if `incoming` is at least as near as `stored`. Equal depths pass,
    /// so the last write wins.
    pub fn passes(self, incoming: Scalar, stored: Scalar) -> bool {
        match self {
            DepthPolarity::NegativeFar => incoming >= stored,
            DepthPolarity::PositiveFar => incoming <= stored,
        }
    }
}

/// Render pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Framebuffer width in pixels
    pub width: usize,
    /// Framebuffer height in pixels
    pub height: usize,
    /// Depth test direction
    pub depth_polarity: DepthPolarity,
    /// Background color for `clear`
    pub clear_color: Vec3,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            depth_polarity: DepthPolarity::NegativeFar,
            clear_color: colors::GRAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_quantize() {
        assert_eq!(Color::from_rgb(Vec3::ONE), Color::WHITE);
        assert_eq!(Color::from_rgb(Vec3::new(-1.0, 2.0, 0.5)), Color::new(0, 255, 128));
    }

    #[test]
    fn test_guard_band() {
        let v = |x: Scalar, y: Scalar| VertexOut::screen(Vec3::new(x, y, 0.0), Vec3::Z, Vec3::ONE);
        assert!(v(-300.0, 5000.0).in_guard_band());
        assert!(v(GUARD_BAND, -GUARD_BAND).in_guard_band());
        assert!(!v(-2.0e9, 0.0).in_guard_band());
        assert!(!v(0.0, Scalar::NAN).in_guard_band());
        assert!(!v(Scalar::INFINITY, 0.0).in_guard_band());
    }

    #[test]
    fn test_depth_polarity() {
        let n = DepthPolarity::NegativeFar;
        assert!(n.passes(-0.2, -0.5));
        assert!(!n.passes(-0.9, -0.5));
        assert!(n.passes(-0.5, -0.5));

        let p = DepthPolarity::PositiveFar;
        assert!(p.passes(0.2, 0.5));
        assert!(!p.passes(0.9, 0.5));
        assert_eq!(p.far(), 1.0);
    }
}
