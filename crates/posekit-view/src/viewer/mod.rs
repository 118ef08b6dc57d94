mod camera;
mod frame;
#[cfg(feature = "gui")]
mod gpu_renderer;
mod input;
mod interaction;
mod pose;
mod scene;

pub use camera::{
    EYE, FAR_CLIP, FOV_Y_DEG, NEAR_CLIP, Viewport, background_projection,
    perspective_projection, view_matrix,
};
pub use frame::{
    BACKGROUND_QUAD, BACKGROUND_QUAD_INDICES, BackgroundPass, CLEAR_COLOR, FrameCommand,
    FrameRecorder, FrameRenderer, FrameTarget, GLOBAL_AMBIENT, LIGHT_POSITIONS, MESH_COLOR,
    MeshPass, MeshVertex, QuadVertex, build_mesh_vertices,
};
#[cfg(feature = "gui")]
pub use gpu_renderer::GpuRenderer;
pub use input::{PointerButtons, ViewerInput};
pub use interaction::{
    InteractionMapper, ROTATION_PER_PIXEL, SCALE_PER_WHEEL_UNIT, TRANSLATION_PER_PIXEL,
    WHEEL_UNITS_PER_LINE,
};
pub use pose::{MIN_SCALE, TransformState};
pub use scene::{BackgroundImage, SceneStore};
