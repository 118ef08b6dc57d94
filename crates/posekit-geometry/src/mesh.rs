use crate::math::Vec3;

/// Lighting normal for corners without a usable normal reference.
pub const FALLBACK_NORMAL: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// One vertex's appearance within a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corner {
    pub vertex: usize,
    pub texture: Option<usize>,
    pub normal: Option<usize>,
}

impl Corner {
    pub const fn new(vertex: usize) -> Self {
        Self {
            vertex,
            texture: None,
            normal: None,
        }
    }

    pub const fn with_normal(vertex: usize, normal: usize) -> Self {
        Self {
            vertex,
            texture: None,
            normal: Some(normal),
        }
    }
}

pub type Face = [Corner; 3];

/// Parsed mesh buffers. Every `Corner::vertex` is expected to index `vertices`;
/// normal references are allowed to dangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vec3>, normals: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            vertices,
            normals,
            faces,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    pub fn corner_count(&self) -> usize {
        self.faces.len() * 3
    }

    /// Normal used to light `corner`, falling back when the reference is
    /// absent or out of range.
    pub fn resolve_normal(&self, corner: &Corner) -> Vec3 {
        corner
            .normal
            .and_then(|idx| self.normals.get(idx))
            .copied()
            .unwrap_or(FALLBACK_NORMAL)
    }

    pub fn resolve_position(&self, corner: &Corner) -> Option<Vec3> {
        self.vertices.get(corner.vertex).copied()
    }

    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter();
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min = Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        Some((min, max))
    }
}
