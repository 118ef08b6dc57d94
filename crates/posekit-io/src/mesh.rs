use anyhow::{Context, Result, bail};
use obj::ObjData;
use posekit_geometry::{Corner, Face, MeshData, Vec3};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open OBJ file {}", path.display()))?;
    let mesh = parse_obj(file).with_context(|| format!("parse OBJ file {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        normals = mesh.normals.len(),
        faces = mesh.faces.len(),
        "mesh parsed"
    );
    Ok(mesh)
}

/// Parses Wavefront OBJ text. All objects and groups collapse into one face
/// list; polygons are fan-triangulated.
pub fn parse_obj<R: Read>(reader: R) -> Result<MeshData> {
    let data = ObjData::load_buf(BufReader::new(reader)).context("malformed OBJ data")?;
    mesh_from_obj(&data)
}

fn mesh_from_obj(data: &ObjData) -> Result<MeshData> {
    let vertices: Vec<Vec3> = data.position.iter().copied().map(Vec3::from).collect();
    let normals: Vec<Vec3> = data.normal.iter().copied().map(Vec3::from).collect();

    let mut faces: Vec<Face> = Vec::new();
    let mut skipped = 0usize;
    for object in &data.objects {
        for group in &object.groups {
            for poly in &group.polys {
                let corners: Vec<Corner> = poly
                    .0
                    .iter()
                    .map(|tuple| Corner {
                        vertex: tuple.0,
                        texture: tuple.1,
                        normal: tuple.2,
                    })
                    .collect();
                if corners.len() < 3 {
                    skipped += 1;
                    continue;
                }
                if let Some(corner) = corners.iter().find(|c| c.vertex >= vertices.len()) {
                    bail!(
                        "face in group '{}' references vertex {} but only {} vertices exist",
                        group.name,
                        corner.vertex + 1,
                        vertices.len()
                    );
                }
                for idx in 1..(corners.len() - 1) {
                    faces.push([corners[0], corners[idx], corners[idx + 1]]);
                }
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "ignored polygons with fewer than three corners");
    }

    Ok(MeshData::new(vertices, normals, faces))
}
