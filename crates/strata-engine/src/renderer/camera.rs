use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    /// `fovy` is the visible height in world units.
    Orthographic,
}

/// A 3D camera described by eye, target and up, the way the demos set it up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees (perspective) or view height (orthographic).
    pub fovy: f32,
    pub projection: Projection,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0,
            projection: Projection::Perspective,
        }
    }
}

/// Near and far clip distances used by `projection_matrix`.
pub const CLIP_NEAR: f32 = 0.01;
pub const CLIP_FAR: f32 = 1000.0;

impl Camera3D {
    pub fn perspective(position: Vec3, target: Vec3, fovy: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fovy,
            projection: Projection::Perspective,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh_gl(self.fovy.to_radians(), aspect, CLIP_NEAR, CLIP_FAR)
            }
            Projection::Orthographic => {
                let top = self.fovy / 2.0;
                let right = top * aspect;
                Mat4::orthographic_rh_gl(-right, right, -top, top, CLIP_NEAR, CLIP_FAR)
            }
        }
    }

    /// Unit vector from position towards target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Forward projected onto the XZ plane.
    pub fn flat_forward(&self) -> Vec3 {
        let f = self.target - self.position;
        Vec3::new(f.x, 0.0, f.z).normalize_or_zero()
    }

    /// `flat_forward × up`, normalised.
    pub fn right(&self) -> Vec3 {
        self.flat_forward().cross(self.up).normalize_or_zero()
    }
}

/// Singleton holding the camera the 3D phases draw with.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainContext {
    pub camera: Camera3D,
}
