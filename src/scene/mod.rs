//! Scene descriptions driving the pipeline
//!
//! A scene is a camera, a light, a material and a list of items. Each item
//! picks the stages it is drawn with through its [`Shading`], so one scene can
//! mix wireframes, Gouraud and Phong shaded surfaces.

pub mod bezier;
pub mod file;
pub mod shapes;

pub use file::{load_scene, load_scene_from_str, save_scene, SceneError};

use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::rasterizer::{
    colors, Camera, GraphicsState, Light, Mat4, Material, PipelineError, PipelineSettings,
    RenderPipeline, Scalar, Stages, Vec3, ViewParams,
};

/// How surfaces are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shading {
    /// Edges only
    #[default]
    Wireframe,
    /// Filled with the item color, no lighting
    Flat,
    /// Lit per vertex
    Gouraud,
    /// Lit per pixel
    Phong,
}

impl Shading {
    fn load(self, pipeline: &mut RenderPipeline, stages: &Stages) {
        let (rasterizer, vertex, fragment) = match self {
            Shading::Wireframe => {
                (&stages.lines, &stages.transform_vertex, &stages.identity_fragment)
            }
            Shading::Flat => {
                (&stages.triangles, &stages.transform_vertex, &stages.identity_fragment)
            }
            Shading::Gouraud => {
                (&stages.triangles, &stages.gouraud_vertex, &stages.identity_fragment)
            }
            Shading::Phong => (&stages.triangles, &stages.transform_vertex, &stages.phong_fragment),
        };
        pipeline.load_rasterizer(rasterizer.clone());
        pipeline.load_vertex_program(vertex.clone());
        pipeline.load_fragment_program(fragment.clone());
    }
}

/// Scale, then rotate about x, y and z (radians), then translate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translate: Vec3,
    pub rotate: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate: Vec3::ZERO,
            rotate: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        let r = self.rotate;
        Mat4::translation(self.translate)
            * Mat4::rotation_z(r.z)
            * Mat4::rotation_y(r.y)
            * Mat4::rotation_x(r.x)
            * Mat4::scaling(self.scale)
    }

    /// Install as the model matrix, with the analytic inverse when the scale
    /// is invertible
    pub fn apply(&self, state: &mut GraphicsState) {
        let s = self.scale;
        if s.x == 0.0 || s.y == 0.0 || s.z == 0.0 {
            state.set_model(self.matrix());
            return;
        }
        let r = self.rotate;
        let inverse = Mat4::inverse_scaling(s)
            * Mat4::inverse_rotation_x(r.x)
            * Mat4::inverse_rotation_y(r.y)
            * Mat4::inverse_rotation_z(r.z)
            * Mat4::inverse_translation(self.translate);
        state.set_model_with_inverse(self.matrix(), inverse);
    }
}

fn white() -> Vec3 {
    colors::WHITE
}

fn default_depth() -> u32 {
    3
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneItem {
    Point {
        position: Vec3,
        #[serde(default = "white")]
        color: Vec3,
    },
    Line {
        from: Vec3,
        to: Vec3,
        #[serde(default = "white")]
        color: Vec3,
    },
    /// Three vertices; without normals the face normal is used
    Triangle {
        vertices: Vec<Vec3>,
        #[serde(default)]
        normals: Option<Vec<Vec3>>,
        #[serde(default = "white")]
        color: Vec3,
        #[serde(default)]
        shading: Shading,
    },
    Cube {
        #[serde(default)]
        transform: Transform,
        #[serde(default = "white")]
        color: Vec3,
        #[serde(default)]
        shading: Shading,
    },
    /// Red x, green y and blue z axes from the origin
    Axes {
        length: Scalar,
        #[serde(default)]
        transform: Transform,
    },
    /// Four control points
    BezierCurve {
        control: Vec<Vec3>,
        #[serde(default = "default_depth")]
        depth: u32,
        #[serde(default)]
        forward_differencing: bool,
        #[serde(default = "white")]
        color: Vec3,
    },
    /// Sixteen control points, row by row
    BezierPatch {
        control: Vec<Vec3>,
        #[serde(default = "default_depth")]
        depth: u32,
        #[serde(default)]
        transform: Transform,
        #[serde(default = "white")]
        color: Vec3,
        #[serde(default)]
        shading: Shading,
    },
    /// Device-pixel grid overlay
    Grid {
        x_spacing: usize,
        y_spacing: usize,
        #[serde(default = "white")]
        color: Vec3,
    },
}

fn fixed<const N: usize>(points: &[Vec3]) -> Option<[Vec3; N]> {
    points.try_into().ok()
}

fn face_normal(v: &[Vec3; 3]) -> Vec3 {
    (v[1] - v[0]).cross(v[2] - v[0]).normalize_or_zero()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub settings: PipelineSettings,
    /// Without a view the items are drawn straight in screen coordinates
    pub view: Option<ViewParams>,
    pub light: Light,
    pub material: Material,
    /// Logical pixel size in device pixels
    #[serde(default = "one")]
    pub unit_length: usize,
    pub debug: bool,
    pub items: Vec<SceneItem>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            settings: PipelineSettings::default(),
            view: None,
            light: Light::default(),
            material: Material::default(),
            unit_length: 1,
            debug: false,
            items: Vec::new(),
        }
    }
}

impl Scene {
    /// Check the point counts serde cannot check
    pub fn validate(&self) -> Result<(), SceneError> {
        let bad = |index: usize, reason: &str| SceneError::Invalid {
            index,
            reason: reason.to_string(),
        };
        for (index, item) in self.items.iter().enumerate() {
            match item {
                SceneItem::Triangle { vertices, normals, .. } => {
                    if vertices.len() != 3 {
                        return Err(bad(index, "a triangle needs 3 vertices"));
                    }
                    if normals.as_ref().is_some_and(|n| n.len() != 3) {
                        return Err(bad(index, "a triangle needs 3 normals"));
                    }
                }
                SceneItem::BezierCurve { control, .. } if control.len() != 4 => {
                    return Err(bad(index, "a cubic curve needs 4 control points"));
                }
                SceneItem::BezierPatch { control, .. } if control.len() != 16 => {
                    return Err(bad(index, "a bicubic patch needs 16 control points"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Set up camera, light and material, clear, and draw every item.
    /// The caller flushes.
    pub fn render(
        &self,
        pipeline: &mut RenderPipeline,
        stages: &Stages,
    ) -> Result<(), PipelineError> {
        let mut camera = Camera::new();
        match &self.view {
            Some(view) => camera.set_projection(pipeline.state_mut(), view)?,
            None => camera.reset(pipeline.state_mut()),
        }
        let state = pipeline.state_mut();
        state.light = self.light;
        state.material = self.material;

        pipeline.unit_length(self.unit_length);
        if self.debug {
            pipeline.debug_on();
        } else {
            pipeline.debug_off();
        }
        pipeline.clear_default();

        for (index, item) in self.items.iter().enumerate() {
            debug!(index, "draw item");
            draw_item(item, pipeline, stages)?;
            pipeline.state_mut().set_model_with_inverse(Mat4::IDENTITY, Mat4::IDENTITY);
        }
        Ok(())
    }
}

fn load_points(pipeline: &mut RenderPipeline, stages: &Stages) {
    pipeline.load_rasterizer(stages.points.clone());
    pipeline.load_vertex_program(stages.transform_vertex.clone());
    pipeline.load_fragment_program(stages.identity_fragment.clone());
}

fn polyline(
    pipeline: &mut RenderPipeline,
    points: &[Vec3],
    color: Vec3,
) -> Result<(), PipelineError> {
    for pair in points.windows(2) {
        pipeline.draw_line(pair[0], color, pair[1], color)?;
    }
    Ok(())
}

/// Triangles with per-vertex normals, as edges or filled per `shading`
fn draw_mesh(
    pipeline: &mut RenderPipeline,
    stages: &Stages,
    shading: Shading,
    triangles: &[([Vec3; 3], [Vec3; 3])],
    color: Vec3,
) -> Result<(), PipelineError> {
    shading.load(pipeline, stages);
    for (v, n) in triangles {
        if shading == Shading::Wireframe {
            polyline(pipeline, &[v[0], v[1], v[2], v[0]], color)?;
        } else {
            pipeline.draw_triangle(v[0], n[0], color, v[1], n[1], color, v[2], n[2], color)?;
        }
    }
    Ok(())
}

fn draw_item(
    item: &SceneItem,
    pipeline: &mut RenderPipeline,
    stages: &Stages,
) -> Result<(), PipelineError> {
    match item {
        SceneItem::Point { position, color } => {
            load_points(pipeline, stages);
            pipeline.draw_point(*position, *color)
        }
        SceneItem::Line { from, to, color } => {
            Shading::Wireframe.load(pipeline, stages);
            pipeline.draw_line(*from, *color, *to, *color)
        }
        SceneItem::Triangle { vertices, normals, color, shading } => {
            let Some(v) = fixed::<3>(vertices) else {
                warn!("triangle without 3 vertices skipped");
                return Ok(());
            };
            let n = normals
                .as_deref()
                .and_then(fixed::<3>)
                .unwrap_or([face_normal(&v); 3]);
            draw_mesh(pipeline, stages, *shading, &[(v, n)], *color)
        }
        SceneItem::Cube { transform, color, shading } => {
            transform.apply(pipeline.state_mut());
            if *shading == Shading::Wireframe {
                Shading::Wireframe.load(pipeline, stages);
                let c = shapes::cube_corners(1.0);
                for (a, b) in shapes::CUBE_EDGES {
                    pipeline.draw_line(c[a], *color, c[b], *color)?;
                }
                return Ok(());
            }
            let triangles: Vec<_> = shapes::cube_triangles(1.0)
                .into_iter()
                .map(|t| (t.corners, [t.normal; 3]))
                .collect();
            draw_mesh(pipeline, stages, *shading, &triangles, *color)
        }
        SceneItem::Axes { length, transform } => {
            transform.apply(pipeline.state_mut());
            Shading::Wireframe.load(pipeline, stages);
            let axes = [(Vec3::X, colors::RED), (Vec3::Y, colors::GREEN), (Vec3::Z, colors::BLUE)];
            for (axis, color) in axes {
                pipeline.draw_line(Vec3::ZERO, color, axis * *length, color)?;
            }
            Ok(())
        }
        SceneItem::BezierCurve { control, depth, forward_differencing, color } => {
            let Some(g) = fixed::<4>(control) else {
                warn!("curve without 4 control points skipped");
                return Ok(());
            };
            let points = if *forward_differencing {
                bezier::curve_points_forward(&g, 1 << (*depth).min(bezier::MAX_DEPTH))
            } else {
                bezier::curve_points_subdivided(&g, *depth)
            };
            Shading::Wireframe.load(pipeline, stages);
            polyline(pipeline, &points, *color)
        }
        SceneItem::BezierPatch { control, depth, transform, color, shading } => {
            let Some(points) = fixed::<16>(control) else {
                warn!("patch without 16 control points skipped");
                return Ok(());
            };
            let patch: bezier::Patch =
                std::array::from_fn(|i| std::array::from_fn(|j| points[i * 4 + j]));
            transform.apply(pipeline.state_mut());
            let triangles: Vec<_> = bezier::patch_triangles(&patch, *depth)
                .into_iter()
                .map(|t| {
                    (
                        [t[0].position, t[1].position, t[2].position],
                        [t[0].normal, t[1].normal, t[2].normal],
                    )
                })
                .collect();
            draw_mesh(pipeline, stages, *shading, &triangles, *color)
        }
        SceneItem::Grid { x_spacing, y_spacing, color } => {
            pipeline.draw_grid(*x_spacing, *y_spacing, *color)
        }
    }
}
