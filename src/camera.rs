use glam::{Mat4, Vec3};
use winit::event::KeyEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

pub const DEFAULT_FOV_DEGREES: f32 = 60.0;
pub const DEFAULT_SPEED: f32 = 1.0;
pub const DEFAULT_SENSITIVITY: f32 = 0.05;
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;
const BOOST_MULTIPLIER: f32 = 2.0;

#[derive(Default, Clone, Copy)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub boost: bool,
}

impl MovementState {
    const fn to_direction(positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    const fn velocity(&self) -> (f32, f32, f32) {
        (
            Self::to_direction(self.forward, self.backward),
            Self::to_direction(self.right, self.left),
            Self::to_direction(self.up, self.down),
        )
    }
}

/// Fly camera with yaw/pitch in degrees. Pitch never leaves
/// [-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES], so the front vector is
/// never parallel to world up.
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_degrees: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub movement: MovementState,
}

impl Camera {
    /// Starts a short distance down the -Z axis, facing +Z (yaw 90).
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -5.0),
            yaw: 90.0,
            pitch: 0.0,
            fov_degrees: DEFAULT_FOV_DEGREES,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            movement: MovementState::default(),
        }
    }

    pub fn front(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.front())
    }

    /// Mouse-look. dx turns, dy pitches; moving the mouse up looks up
    /// (screen-space dy is positive downward).
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity)
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
    }

    pub fn process_keyboard(&mut self, event: &KeyEvent) {
        let is_pressed = event.state.is_pressed();
        if let PhysicalKey::Code(keycode) = event.physical_key {
            match keycode {
                KeyCode::KeyW => self.movement.forward = is_pressed,
                KeyCode::KeyS => self.movement.backward = is_pressed,
                KeyCode::KeyA => self.movement.left = is_pressed,
                KeyCode::KeyD => self.movement.right = is_pressed,
                KeyCode::Space => self.movement.up = is_pressed,
                KeyCode::KeyC => self.movement.down = is_pressed,
                KeyCode::ShiftLeft => self.movement.boost = is_pressed,
                _ => {}
            }
        }
    }

    /// Advance the position by the currently held keys over `delta`
    /// seconds. Holding Shift doubles the speed.
    pub fn update(&mut self, delta: f32) {
        let (fwd, strafe, vert) = self.movement.velocity();
        let speed = if self.movement.boost {
            self.speed * BOOST_MULTIPLIER
        } else {
            self.speed
        };

        let displacement =
            (self.front() * fwd + self.right() * strafe + Vec3::Y * vert) * speed * delta;
        self.position += displacement;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), self.up())
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, Z_NEAR, Z_FAR)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
