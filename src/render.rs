pub mod clipper;
pub mod software;
pub mod transform;

pub use software::SoftwareGraphics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    DepthTest,
    CullFace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeModel {
    Flat,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixMode {
    Projection,
    ModelView,
}

/// How `begin`/`end` groups the submitted vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    Quads,
    /// A single convex polygon.
    Polygon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearBuffers {
    pub color: bool,
    pub depth: bool,
}

impl ClearBuffers {
    pub const COLOR_AND_DEPTH: ClearBuffers = ClearBuffers { color: true, depth: true };
}

/// Immediate-mode, fixed-function drawing. Angles are in degrees, matrices are
/// post-multiplied onto the one selected by `matrix_mode`.
pub trait Graphics {
    fn enable(&mut self, capability: Capability);

    fn shade_model(&mut self, model: ShadeModel);

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);

    fn clear(&mut self, buffers: ClearBuffers);

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    fn matrix_mode(&mut self, mode: MatrixMode);

    fn load_identity(&mut self);

    fn perspective(&mut self, fovy: f64, aspect: f64, z_near: f64, z_far: f64);

    fn translate(&mut self, x: f64, y: f64, z: f64);

    fn rotate(&mut self, angle: f64, x: f64, y: f64, z: f64);

    fn begin(&mut self, primitive: Primitive);

    fn vertex(&mut self, position: glm::DVec3);

    fn end(&mut self);
}
