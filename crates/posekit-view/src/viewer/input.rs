use posekit_geometry::Point2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerButtons {
    pub primary: bool,
    pub secondary: bool,
}

impl PointerButtons {
    pub const NONE: Self = Self {
        primary: false,
        secondary: false,
    };
    pub const PRIMARY: Self = Self {
        primary: true,
        secondary: false,
    };
    pub const SECONDARY: Self = Self {
        primary: false,
        secondary: true,
    };
    pub const BOTH: Self = Self {
        primary: true,
        secondary: true,
    };
}

/// Pointer and wheel activity over the viewport for one shell frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewerInput {
    pub pointer_pos: Option<Point2>,
    pub pointer_moved: bool,
    /// A button went down over the viewport.
    pub pressed: bool,
    /// Every button is up again.
    pub released: bool,
    /// Some button is held, including ones without a mapping.
    pub any_down: bool,
    pub buttons: PointerButtons,
    /// Angle-delta units, 120 per wheel notch.
    pub scroll_delta: f32,
}
