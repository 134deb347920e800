use log::debug;
use crate::render::{Capability, ClearBuffers, Graphics, MatrixMode, Primitive, ShadeModel};
use crate::scene::mesh::Topology;
use crate::scene::Scene;
use crate::viewer::camera::{Buttons, CameraState, Point, PointerState};

pub mod camera;

const FIELD_OF_VIEW: f64 = 45.0;
const Z_NEAR: f64 = 1.0;
const Z_FAR: f64 = 100.0;

fn primitive_for(topology: Topology) -> Primitive {
    match topology {
        Topology::Triangle => Primitive::Triangles,
        Topology::Quad => Primitive::Quads,
        Topology::GeneralPolygon => Primitive::Polygon,
    }
}

/// Orbit viewer for an imported scene. Every hook runs on the UI thread, in the
/// order the host delivers events.
pub struct Viewer {
    scene: Scene,
    camera: CameraState,
    pointer: PointerState,
    redraw_requested: bool,
}

impl Viewer {
    pub fn new(scene: Scene, zoom: f64) -> Self {
        Viewer {
            scene,
            camera: CameraState::new(zoom),
            pointer: PointerState::default(),
            redraw_requested: false,
        }
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn on_init(&mut self, gfx: &mut dyn Graphics) {
        gfx.enable(Capability::DepthTest);
        gfx.enable(Capability::CullFace);
        gfx.shade_model(ShadeModel::Smooth);
        gfx.clear_color(0.0, 0.0, 0.0, 1.0);
    }

    pub fn on_resize(&mut self, gfx: &mut dyn Graphics, width: u32, height: u32) {
        let height = height.max(1);
        gfx.viewport(0, 0, width, height);
        gfx.matrix_mode(MatrixMode::Projection);
        gfx.load_identity();
        gfx.perspective(FIELD_OF_VIEW, width as f64 / height as f64, Z_NEAR, Z_FAR);
        gfx.matrix_mode(MatrixMode::ModelView);
        gfx.load_identity();
    }

    pub fn on_render(&self, gfx: &mut dyn Graphics) {
        gfx.clear(ClearBuffers::COLOR_AND_DEPTH);
        gfx.load_identity();
        gfx.translate(0.0, 0.0, self.camera.zoom);

        let (x, y, z) = self.camera.rotation_degrees();
        gfx.rotate(x, 1.0, 0.0, 0.0);
        gfx.rotate(y, 0.0, 1.0, 0.0);
        gfx.rotate(z, 0.0, 0.0, 1.0);

        for mesh in self.scene.meshes() {
            for polygon in mesh.polygons() {
                gfx.begin(primitive_for(polygon.topology()));
                for point in polygon.points() {
                    gfx.vertex(*point);
                }
                gfx.end();
            }
        }
    }

    pub fn on_pointer_down(&mut self, pos: Point) {
        self.pointer.press(pos);
    }

    pub fn on_pointer_move(&mut self, pos: Point, buttons: Buttons) {
        if let Some((dx, dy)) = self.pointer.move_to(pos) {
            self.camera.drag(dx, dy, buttons);
        }
        self.redraw_requested = true;
    }

    /// `delta_y` is in eighths of a degree, 120 per wheel notch.
    pub fn on_wheel(&mut self, delta_y: f64) {
        self.camera.zoom_by(delta_y);
        debug!("Zoom is now {}", self.camera.zoom);
        self.redraw_requested = true;
    }

    /// Returns whether a redraw was requested since the last call.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::replace(&mut self.redraw_requested, false)
    }
}
