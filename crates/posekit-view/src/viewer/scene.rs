use posekit_geometry::{DecodedImage, MeshData};

/// Background pixels stored bottom row first, so texture coordinate (0, 0)
/// addresses the visually bottom-left texel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackgroundImage {
    image: DecodedImage,
}

impl BackgroundImage {
    pub fn from_top_down(image: &DecodedImage) -> Self {
        Self {
            image: image.flipped_vertically(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.pixels()
    }

    pub fn row_bytes(&self) -> usize {
        self.image.row_bytes()
    }
}

/// Owns the currently loaded background image and mesh.
///
/// Each slot carries a revision that changes whenever its content is
/// replaced or cleared; renderers compare revisions to decide whether GPU
/// resources are stale. Setters return `true` to request a redraw.
#[derive(Clone, Debug, Default)]
pub struct SceneStore {
    background: Option<BackgroundImage>,
    background_revision: u64,
    mesh: Option<MeshData>,
    mesh_revision: u64,
}

impl SceneStore {
    pub fn set_background(&mut self, image: DecodedImage) -> bool {
        self.background = Some(BackgroundImage::from_top_down(&image));
        self.background_revision = self.background_revision.wrapping_add(1);
        true
    }

    pub fn clear_background(&mut self) -> bool {
        self.background = None;
        self.background_revision = self.background_revision.wrapping_add(1);
        true
    }

    /// Index validity is not checked here; dangling normal references are
    /// resolved at draw time.
    pub fn set_mesh(&mut self, mesh: MeshData) -> bool {
        self.mesh = Some(mesh);
        self.mesh_revision = self.mesh_revision.wrapping_add(1);
        true
    }

    pub fn clear_mesh(&mut self) -> bool {
        self.mesh = None;
        self.mesh_revision = self.mesh_revision.wrapping_add(1);
        true
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        self.mesh.as_ref()
    }

    pub fn background_revision(&self) -> u64 {
        self.background_revision
    }

    pub fn mesh_revision(&self) -> u64 {
        self.mesh_revision
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.mesh.is_none()
    }
}
