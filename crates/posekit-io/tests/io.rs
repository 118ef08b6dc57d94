use anyhow::Result;
use posekit_geometry::{Corner, Vec3};
use posekit_io::{decode_image, load_image, load_obj, parse_obj};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_nanos(),
        Err(_) => 0,
    };
    path.push(format!("posekit_{stamp}_{file_name}"));
    path
}

const TRIANGLE_WITH_NORMALS: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
f 1//1 2//1 3//1
";

#[test]
fn triangle_keeps_normal_indices() -> Result<()> {
    let mesh = parse_obj(TRIANGLE_WITH_NORMALS.as_bytes())?;

    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.normals, vec![Vec3::new(0.0, 0.0, 1.0)]);
    assert_eq!(mesh.faces.len(), 1);
    assert_eq!(mesh.faces[0][1], Corner::with_normal(1, 0));
    Ok(())
}

#[test]
fn quads_are_fan_triangulated() -> Result<()> {
    let text = "\
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
f 1 2 3 4
";
    let mesh = parse_obj(text.as_bytes())?;

    assert_eq!(mesh.faces.len(), 2);
    let vertices: Vec<[usize; 3]> = mesh
        .faces
        .iter()
        .map(|face| [face[0].vertex, face[1].vertex, face[2].vertex])
        .collect();
    assert_eq!(vertices, vec![[0, 1, 2], [0, 2, 3]]);
    assert!(mesh.faces.iter().flatten().all(|corner| corner.normal.is_none()));
    Ok(())
}

#[test]
fn texture_indices_are_carried_but_optional_normals_stay_absent() -> Result<()> {
    let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1 2/2 3/3
";
    let mesh = parse_obj(text.as_bytes())?;

    let corner = mesh.faces[0][2];
    assert_eq!(corner.vertex, 2);
    assert_eq!(corner.texture, Some(2));
    assert_eq!(corner.normal, None);
    Ok(())
}

#[test]
fn out_of_range_vertex_is_rejected() {
    let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 9
";
    assert!(parse_obj(text.as_bytes()).is_err());
}

#[test]
fn load_obj_reads_from_disk() -> Result<()> {
    let path = temp_path("triangle.obj");
    fs::write(&path, TRIANGLE_WITH_NORMALS)?;

    let mesh = load_obj(&path)?;
    assert_eq!(mesh.faces.len(), 1);

    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn missing_obj_file_is_an_error() {
    let path = temp_path("does_not_exist.obj");
    assert!(load_obj(&path).is_err());
}

#[test]
fn png_round_trips_as_top_down_rgba() -> Result<()> {
    let path = temp_path("two_rows.png");
    let mut source = image::RgbaImage::new(3, 2);
    for x in 0..3 {
        source.put_pixel(x, 0, image::Rgba([255, 0, 0, 255]));
        source.put_pixel(x, 1, image::Rgba([0, 0, 255, 255]));
    }
    source.save(&path)?;

    let decoded = load_image(&path)?;
    assert_eq!((decoded.width(), decoded.height()), (3, 2));
    assert_eq!(&decoded.pixels()[..4], &[255, 0, 0, 255]);
    assert_eq!(&decoded.pixels()[decoded.row_bytes()..][..4], &[0, 0, 255, 255]);

    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"definitely not an image").is_err());
}
