/// Rotation angle units per pixel of pointer travel.
pub const ROTATION_SPEED: f64 = 8.0;

/// Angles are stored in sixteenths of a degree.
pub const ANGLE_UNITS_PER_DEGREE: f64 = 16.0;

/// Wheel delta of one notch, in eighths of a degree.
pub const WHEEL_DELTA_PER_NOTCH: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Pointer buttons held during a move.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Buttons {
    pub primary: bool,
    pub secondary: bool,
}

impl Buttons {
    pub const NONE: Buttons = Buttons { primary: false, secondary: false };
    pub const PRIMARY: Buttons = Buttons { primary: true, secondary: false };
    pub const SECONDARY: Buttons = Buttons { primary: false, secondary: true };
}

/// Orbit camera. Angles accumulate without wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub x_rotation: f64,
    pub y_rotation: f64,
    pub z_rotation: f64,
    pub zoom: f64,
}

impl CameraState {
    pub fn new(zoom: f64) -> Self {
        CameraState {
            x_rotation: 0.0,
            y_rotation: 0.0,
            z_rotation: 0.0,
            zoom,
        }
    }

    /// Applies a drag of `(dx, dy)` pixels. The primary button orbits around X and Y,
    /// the secondary one around X and Z; the primary one wins if both are held.
    /// Returns whether the camera changed.
    pub fn drag(&mut self, dx: f64, dy: f64, buttons: Buttons) -> bool {
        if buttons.primary {
            self.x_rotation += ROTATION_SPEED * dy;
            self.y_rotation += ROTATION_SPEED * dx;
            true
        } else if buttons.secondary {
            self.x_rotation += ROTATION_SPEED * dy;
            self.z_rotation += ROTATION_SPEED * dx;
            true
        } else {
            false
        }
    }

    /// `delta` is in eighths of a degree; every 15 degrees move the camera one unit.
    pub fn zoom_by(&mut self, delta: f64) {
        let degrees = delta / 8.0;
        let steps = degrees / 15.0;
        self.zoom += steps;
    }

    pub fn rotation_degrees(&self) -> (f64, f64, f64) {
        (
            self.x_rotation / ANGLE_UNITS_PER_DEGREE,
            self.y_rotation / ANGLE_UNITS_PER_DEGREE,
            self.z_rotation / ANGLE_UNITS_PER_DEGREE,
        )
    }
}

/// Last pointer position seen, used to turn absolute positions into deltas.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerState {
    last: Option<Point>,
}

impl PointerState {
    pub fn press(&mut self, pos: Point) {
        self.last = Some(pos);
    }

    /// Records `pos` and returns the offset from the previous position, if any.
    pub fn move_to(&mut self, pos: Point) -> Option<(f64, f64)> {
        let delta = self.last.map(|last| (pos.x - last.x, pos.y - last.y));
        self.last = Some(pos);
        delta
    }

    pub fn last(&self) -> Option<Point> {
        self.last
    }
}
