use cgmath::{Deg, Matrix4, Point3, Vector3, ortho, perspective};

pub const EYE: [f32; 3] = [0.0, 0.0, 5.0];
pub const FOV_Y_DEG: f32 = 45.0;
pub const NEAR_CLIP: f32 = 0.1;
pub const FAR_CLIP: f32 = 100.0;

/// Drawable size in physical pixels. Never zero in either axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Fixed camera at [`EYE`] looking at the origin with +Y up.
pub fn view_matrix() -> Matrix4<f32> {
    Matrix4::look_at_rh(
        Point3::new(EYE[0], EYE[1], EYE[2]),
        Point3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    )
}

pub fn perspective_projection(viewport: Viewport) -> Matrix4<f32> {
    perspective(Deg(FOV_Y_DEG), viewport.aspect(), NEAR_CLIP, FAR_CLIP)
}

/// Unit orthographic box used while drawing the background quad.
pub fn background_projection() -> Matrix4<f32> {
    ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0)
}
