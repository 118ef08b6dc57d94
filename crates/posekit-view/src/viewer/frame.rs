use bytemuck::{Pod, Zeroable};
use cgmath::Matrix4;
use posekit_geometry::MeshData;

use super::camera::{Viewport, background_projection, perspective_projection, view_matrix};
use super::pose::TransformState;
use super::scene::{BackgroundImage, SceneStore};

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const MESH_COLOR: [f32; 3] = [0.8, 0.8, 0.8];
pub const GLOBAL_AMBIENT: f32 = 0.2;
/// Eye-space point lights.
pub const LIGHT_POSITIONS: [[f32; 3]; 2] = [[10.0, 10.0, 10.0], [-10.0, -10.0, 10.0]];

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Full-viewport quad in the background's orthographic space, counter-clockwise
/// from the bottom-left corner.
pub const BACKGROUND_QUAD: [QuadVertex; 4] = [
    QuadVertex {
        position: [-1.0, -1.0, -1.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, -1.0, -1.0],
        uv: [1.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0, -1.0],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0, -1.0],
        uv: [0.0, 1.0],
    },
];
pub const BACKGROUND_QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundPass {
    pub projection: Matrix4<f32>,
    pub depth_test: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshPass {
    pub projection: Matrix4<f32>,
    pub model_view: Matrix4<f32>,
    pub lights: [[f32; 3]; 2],
    pub color: [f32; 3],
    pub ambient: f32,
    pub vertex_count: u32,
}

/// Backend that executes the per-frame draw sequence.
///
/// Matrices follow the OpenGL clip convention (depth in `[-1, 1]`). Calls
/// arrive in order: `begin_frame`, optional background upload and draw,
/// optional mesh upload and draw, `end_frame`. Uploads only happen when the
/// scene content changed since the previous upload.
pub trait FrameTarget {
    fn begin_frame(&mut self, viewport: Viewport, clear: [f32; 4]);
    fn upload_background(&mut self, image: &BackgroundImage);
    fn draw_background(&mut self, pass: &BackgroundPass);
    fn upload_mesh(&mut self, vertices: &[MeshVertex]);
    fn draw_mesh(&mut self, pass: &MeshPass);
    fn end_frame(&mut self);
}

pub struct FrameRenderer {
    viewport: Viewport,
    projection: Matrix4<f32>,
    uploaded_background: Option<u64>,
    uploaded_mesh: Option<u64>,
    mesh_vertex_count: u32,
}

impl FrameRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let viewport = Viewport::new(width, height);
        Self {
            viewport,
            projection: perspective_projection(viewport),
            uploaded_background: None,
            uploaded_mesh: None,
            mesh_vertex_count: 0,
        }
    }

    /// Zero-sized axes are treated as one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.projection = perspective_projection(viewport);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    /// Forgets what has been uploaded, forcing the next frame to re-upload.
    /// Needed when the target loses its GPU resources.
    pub fn invalidate_uploads(&mut self) {
        self.uploaded_background = None;
        self.uploaded_mesh = None;
    }

    pub fn render<T: FrameTarget + ?Sized>(
        &mut self,
        target: &mut T,
        scene: &SceneStore,
        pose: &TransformState,
    ) {
        target.begin_frame(self.viewport, CLEAR_COLOR);

        let view = view_matrix();

        if let Some(background) = scene.background() {
            let revision = scene.background_revision();
            if self.uploaded_background != Some(revision) {
                target.upload_background(background);
                self.uploaded_background = Some(revision);
            }
            target.draw_background(&BackgroundPass {
                projection: background_projection(),
                depth_test: false,
            });
        }

        let model_view = view * pose.model_matrix();

        if let Some(mesh) = scene.mesh() {
            let revision = scene.mesh_revision();
            if self.uploaded_mesh != Some(revision) {
                let vertices = build_mesh_vertices(mesh);
                target.upload_mesh(&vertices);
                self.mesh_vertex_count = vertices.len() as u32;
                self.uploaded_mesh = Some(revision);
            }
            target.draw_mesh(&MeshPass {
                projection: self.projection,
                model_view,
                lights: LIGHT_POSITIONS,
                color: MESH_COLOR,
                ambient: GLOBAL_AMBIENT,
                vertex_count: self.mesh_vertex_count,
            });
        }

        target.end_frame();
    }
}

/// Expands every face into three independent vertices, resolving each
/// corner's normal with the fallback rule. Faces that reference a missing
/// vertex are dropped.
pub fn build_mesh_vertices(mesh: &MeshData) -> Vec<MeshVertex> {
    let mut vertices = Vec::with_capacity(mesh.corner_count());
    let mut skipped = 0usize;
    for face in &mesh.faces {
        let positions = [
            mesh.resolve_position(&face[0]),
            mesh.resolve_position(&face[1]),
            mesh.resolve_position(&face[2]),
        ];
        let [Some(p0), Some(p1), Some(p2)] = positions else {
            skipped += 1;
            continue;
        };
        for (corner, position) in face.iter().zip([p0, p1, p2]) {
            vertices.push(MeshVertex {
                position: position.to_array(),
                normal: mesh.resolve_normal(corner).to_array(),
            });
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "faces reference vertices outside the mesh");
    }
    vertices
}

/// Records every [`FrameTarget`] call.
#[derive(Default)]
pub struct FrameRecorder {
    pub commands: Vec<FrameCommand>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FrameCommand {
    Begin {
        viewport: Viewport,
        clear: [f32; 4],
    },
    UploadBackground {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    DrawBackground(BackgroundPass),
    UploadMesh(Vec<MeshVertex>),
    DrawMesh(MeshPass),
    End,
}

impl FrameRecorder {
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn mesh_passes(&self) -> impl Iterator<Item = &MeshPass> {
        self.commands.iter().filter_map(|command| match command {
            FrameCommand::DrawMesh(pass) => Some(pass),
            _ => None,
        })
    }

    pub fn uploaded_vertices(&self) -> Option<&[MeshVertex]> {
        self.commands.iter().rev().find_map(|command| match command {
            FrameCommand::UploadMesh(vertices) => Some(vertices.as_slice()),
            _ => None,
        })
    }
}

impl FrameTarget for FrameRecorder {
    fn begin_frame(&mut self, viewport: Viewport, clear: [f32; 4]) {
        self.commands.push(FrameCommand::Begin { viewport, clear });
    }

    fn upload_background(&mut self, image: &BackgroundImage) {
        self.commands.push(FrameCommand::UploadBackground {
            width: image.width(),
            height: image.height(),
            pixels: image.pixels().to_vec(),
        });
    }

    fn draw_background(&mut self, pass: &BackgroundPass) {
        self.commands.push(FrameCommand::DrawBackground(pass.clone()));
    }

    fn upload_mesh(&mut self, vertices: &[MeshVertex]) {
        self.commands.push(FrameCommand::UploadMesh(vertices.to_vec()));
    }

    fn draw_mesh(&mut self, pass: &MeshPass) {
        self.commands.push(FrameCommand::DrawMesh(pass.clone()));
    }

    fn end_frame(&mut self) {
        self.commands.push(FrameCommand::End);
    }
}

