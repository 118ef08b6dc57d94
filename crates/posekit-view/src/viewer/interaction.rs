use posekit_geometry::Point2;

use super::input::{PointerButtons, ViewerInput};
use super::pose::TransformState;

/// Degrees of rotation per logical pixel of drag.
pub const ROTATION_PER_PIXEL: f32 = 1.0;
/// Camera-space units of translation per logical pixel of drag.
pub const TRANSLATION_PER_PIXEL: f32 = 0.01;
pub const SCALE_PER_WHEEL_UNIT: f32 = 0.001;
/// Wheel units reported for one notch (one "line") of a mouse wheel.
pub const WHEEL_UNITS_PER_LINE: f32 = 120.0;

/// Turns pointer drags and wheel motion into pose updates.
///
/// Primary-button drags rotate (vertical motion about X, horizontal about Y),
/// secondary-button drags translate in the view plane and the wheel scales.
/// When both buttons are held the primary mapping wins.
///
/// Every method that may change the pose returns `true` when the caller has
/// to schedule a redraw.
#[derive(Clone, Debug, Default)]
pub struct InteractionMapper {
    last_pos: Option<Point2>,
}

impl InteractionMapper {
    pub fn anchor(&self) -> Option<Point2> {
        self.last_pos
    }

    pub fn begin_drag(&mut self, pos: Point2) {
        self.last_pos = Some(pos);
    }

    pub fn drag(
        &mut self,
        pose: &mut TransformState,
        pos: Point2,
        buttons: PointerButtons,
    ) -> bool {
        let Some(last) = self.last_pos else {
            return false;
        };

        let dx = pos.x - last.x;
        let dy = pos.y - last.y;

        if buttons.primary {
            pose.rotation.x += dy * ROTATION_PER_PIXEL;
            pose.rotation.y += dx * ROTATION_PER_PIXEL;
        } else if buttons.secondary {
            pose.translation.x += dx * TRANSLATION_PER_PIXEL;
            // screen Y grows downward, world Y upward
            pose.translation.y -= dy * TRANSLATION_PER_PIXEL;
        }

        self.last_pos = Some(pos);
        true
    }

    pub fn end_drag(&mut self) {
        self.last_pos = None;
    }

    pub fn scroll(&self, pose: &mut TransformState, wheel_delta: f32) -> bool {
        pose.scale += wheel_delta * SCALE_PER_WHEEL_UNIT;
        pose.clamp();
        true
    }

    /// Applies one frame of shell input in event order: press, move, release,
    /// wheel.
    pub fn handle_input(&mut self, pose: &mut TransformState, input: &ViewerInput) -> bool {
        let mut redraw = false;

        if let Some(pos) = input.pointer_pos {
            if input.pressed {
                self.begin_drag(pos);
            } else if input.any_down && input.pointer_moved {
                redraw |= self.drag(pose, pos, input.buttons);
            }
        }

        if input.released {
            self.end_drag();
        }

        if input.scroll_delta != 0.0 {
            redraw |= self.scroll(pose, input.scroll_delta);
        }

        redraw
    }
}
