use glm::{DMat4, DVec3, DVec4};
use image::{Rgba, RgbaImage};
use crate::render::clipper::clip_polygon;
use crate::render::transform::{identity, perspective, rotation, translation};
use crate::render::{Capability, ClearBuffers, Graphics, MatrixMode, Primitive, ShadeModel};

/// Geometry carries no color, every fragment is opaque white.
const FRAGMENT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Counters since the last color clear.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub primitives: usize,
    pub triangles: usize,
    pub culled: usize,
}

/// Fixed-function pipeline rasterizing into an RGBA color buffer and an `f32` depth buffer.
///
/// Window coordinates have their origin in the lower left corner; row 0 of the color
/// buffer is the top of the window. Front faces wind counter-clockwise.
pub struct SoftwareGraphics {
    color_buffer: RgbaImage,
    depth_buffer: Vec<f32>,
    clear_color: Rgba<u8>,
    viewport: Viewport,
    matrix_mode: MatrixMode,
    projection: DMat4,
    model_view: DMat4,
    depth_test: bool,
    cull_face: bool,
    primitive: Option<Primitive>,
    vertices: Vec<DVec4>,
    stats: FrameStats,
}

fn to_channel(value: f32) -> u8 {
    (value.max(0.0).min(1.0) * 255.0).round() as u8
}

fn edge(a: DVec3, b: DVec3, x: f64, y: f64) -> f64 {
    (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x)
}

fn signed_area(polygon: &[DVec3]) -> f64 {
    let mut area = 0.0;
    for i in 0..polygon.len() {
        let current = polygon[i];
        let next = polygon[(i + 1) % polygon.len()];
        area += current.x * next.y - next.x * current.y;
    }
    area / 2.0
}

impl SoftwareGraphics {
    pub fn new(width: u32, height: u32) -> Self {
        SoftwareGraphics {
            color_buffer: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
            depth_buffer: vec![1.0; (width * height) as usize],
            clear_color: Rgba([0, 0, 0, 0]),
            viewport: Viewport { x: 0, y: 0, width, height },
            matrix_mode: MatrixMode::ModelView,
            projection: identity(),
            model_view: identity(),
            depth_test: false,
            cull_face: false,
            primitive: None,
            vertices: Vec::new(),
            stats: FrameStats::default(),
        }
    }

    /// Reallocates both buffers. Their contents are undefined until the next clear.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size() == (width, height) {
            return;
        }
        self.color_buffer = RgbaImage::new(width, height);
        self.depth_buffer = vec![1.0; (width * height) as usize];
    }

    pub fn size(&self) -> (u32, u32) {
        self.color_buffer.dimensions()
    }

    pub fn color_buffer(&self) -> &RgbaImage {
        &self.color_buffer
    }

    /// Raw RGBA bytes, row by row from the top.
    pub fn color_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.color_buffer
    }

    /// Depth at column `x` of row `y`, rows counted from the top like the color buffer.
    pub fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.depth_buffer[(y * self.color_buffer.width() + x) as usize]
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    fn current_matrix(&mut self) -> &mut DMat4 {
        match self.matrix_mode {
            MatrixMode::Projection => &mut self.projection,
            MatrixMode::ModelView => &mut self.model_view,
        }
    }

    fn multiply(&mut self, m: DMat4) {
        let current = self.current_matrix();
        *current = *current * m;
    }

    fn to_window(&self, clip: DVec4) -> DVec3 {
        let viewport = self.viewport;
        let (x, y, z) = (clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);
        DVec3::new(
            viewport.x as f64 + (x + 1.0) * viewport.width as f64 / 2.0,
            viewport.y as f64 + (y + 1.0) * viewport.height as f64 / 2.0,
            (z + 1.0) / 2.0)
    }

    fn draw_polygon(&mut self, vertices: &[DVec4]) {
        self.stats.primitives += 1;

        let clipped = clip_polygon(vertices);
        if clipped.len() < 3 {
            return;
        }

        let window: Vec<DVec3> = clipped.iter().map(|v| self.to_window(*v)).collect();
        let area = signed_area(&window);
        if area == 0.0 {
            return;
        }
        if self.cull_face && area < 0.0 {
            self.stats.culled += 1;
            return;
        }

        for i in 1..window.len() - 1 {
            self.rasterize_triangle(window[0], window[i], window[i + 1]);
        }
    }

    fn rasterize_triangle(&mut self, a: DVec3, mut b: DVec3, mut c: DVec3) {
        let mut area = edge(a, b, c.x, c.y);
        if area < 0.0 {
            std::mem::swap(&mut b, &mut c);
            area = -area;
        }
        if area == 0.0 {
            return;
        }
        self.stats.triangles += 1;

        let (width, height) = self.size();
        let viewport = self.viewport;
        let x_low = viewport.x.max(0) as f64;
        let y_low = viewport.y.max(0) as f64;
        let x_high = ((viewport.x as i64 + viewport.width as i64).min(width as i64)) as f64;
        let y_high = ((viewport.y as i64 + viewport.height as i64).min(height as i64)) as f64;

        let min_x = a.x.min(b.x).min(c.x).floor().max(x_low) as i64;
        let max_x = a.x.max(b.x).max(c.x).ceil().min(x_high) as i64;
        let min_y = a.y.min(b.y).min(c.y).floor().max(y_low) as i64;
        let max_y = a.y.max(b.y).max(c.y).ceil().min(y_high) as i64;

        for py in min_y..max_y {
            let sample_y = py as f64 + 0.5;
            let row = height - 1 - py as u32;
            for px in min_x..max_x {
                let sample_x = px as f64 + 0.5;
                let w0 = edge(b, c, sample_x, sample_y);
                let w1 = edge(c, a, sample_x, sample_y);
                let w2 = edge(a, b, sample_x, sample_y);
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = ((w0 * a.z + w1 * b.z + w2 * c.z) / area) as f32;
                if self.depth_test {
                    let index = (row * width + px as u32) as usize;
                    if depth >= self.depth_buffer[index] {
                        continue;
                    }
                    self.depth_buffer[index] = depth;
                }
                self.color_buffer.put_pixel(px as u32, row, FRAGMENT_COLOR);
            }
        }
    }
}

impl Graphics for SoftwareGraphics {
    fn enable(&mut self, capability: Capability) {
        match capability {
            Capability::DepthTest => self.depth_test = true,
            Capability::CullFace => self.cull_face = true,
        }
    }

    // Fragments are unlit, so both models produce the same image.
    fn shade_model(&mut self, _model: ShadeModel) {}

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.clear_color = Rgba([to_channel(red), to_channel(green), to_channel(blue), to_channel(alpha)]);
    }

    fn clear(&mut self, buffers: ClearBuffers) {
        if buffers.color {
            let clear_color = self.clear_color;
            for pixel in self.color_buffer.pixels_mut() {
                *pixel = clear_color;
            }
            self.stats = FrameStats::default();
        }
        if buffers.depth {
            for depth in self.depth_buffer.iter_mut() {
                *depth = 1.0;
            }
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = Viewport { x, y, width, height };
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.matrix_mode = mode;
    }

    fn load_identity(&mut self) {
        *self.current_matrix() = identity();
    }

    fn perspective(&mut self, fovy: f64, aspect: f64, z_near: f64, z_far: f64) {
        self.multiply(perspective(fovy, aspect, z_near, z_far));
    }

    fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.multiply(translation(x, y, z));
    }

    fn rotate(&mut self, angle: f64, x: f64, y: f64, z: f64) {
        self.multiply(rotation(angle, x, y, z));
    }

    fn begin(&mut self, primitive: Primitive) {
        self.primitive = Some(primitive);
        self.vertices.clear();
    }

    fn vertex(&mut self, position: DVec3) {
        if self.primitive.is_none() {
            return;
        }
        let eye = self.model_view * DVec4::new(position.x, position.y, position.z, 1.0);
        self.vertices.push(self.projection * eye);
    }

    fn end(&mut self) {
        let primitive = match self.primitive.take() {
            Some(primitive) => primitive,
            None => return
        };
        let vertices = std::mem::take(&mut self.vertices);

        match primitive {
            Primitive::Triangles => {
                for triangle in vertices.chunks_exact(3) {
                    self.draw_polygon(triangle);
                }
            }
            Primitive::Quads => {
                for quad in vertices.chunks_exact(4) {
                    self.draw_polygon(quad);
                }
            }
            Primitive::Polygon => {
                if vertices.len() >= 3 {
                    self.draw_polygon(&vertices);
                }
            }
        }
    }
}
