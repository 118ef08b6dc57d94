use cgmath::{Deg, Matrix4, Vector3};
use posekit_geometry::Vec3;

pub const MIN_SCALE: f32 = 0.1;

/// Placement of the mesh relative to the fixed camera.
///
/// Rotation is in degrees about X, Y and Z, translation in camera-space
/// units. `scale` never drops below [`MIN_SCALE`] once [`clamp`](Self::clamp)
/// has run, which every mutating path does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    pub rotation: Vec3,
    pub translation: Vec3,
    pub scale: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl TransformState {
    pub fn new(rotation: Vec3, translation: Vec3, scale: f32) -> Self {
        let mut state = Self {
            rotation,
            translation,
            scale,
        };
        state.clamp();
        state
    }

    pub fn clamp(&mut self) {
        self.scale = self.scale.max(MIN_SCALE);
    }

    /// Translate, then scale, then rotate about X, Y and Z in that order.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let t = self.translation;
        Matrix4::from_translation(Vector3::new(t.x, t.y, t.z))
            * Matrix4::from_scale(self.scale)
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_z(Deg(self.rotation.z))
    }
}
