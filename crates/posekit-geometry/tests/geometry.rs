use anyhow::Result;
use posekit_geometry::{Corner, DecodedImage, FALLBACK_NORMAL, MeshData, Vec3};

#[test]
fn image_rejects_short_buffer() {
    let result = DecodedImage::new(2, 2, vec![0; 15]);
    assert!(result.is_err());
}

#[test]
fn image_rejects_zero_dimensions() {
    assert!(DecodedImage::new(0, 4, Vec::new()).is_err());
    assert!(DecodedImage::new(4, 0, Vec::new()).is_err());
}

#[test]
fn flip_reverses_rows() -> Result<()> {
    let top = [255, 0, 0, 255];
    let bottom = [0, 0, 255, 255];
    let pixels = [top, bottom].concat();
    let image = DecodedImage::new(1, 2, pixels)?;

    let flipped = image.flipped_vertically();

    assert_eq!(&flipped.pixels()[..4], &bottom);
    assert_eq!(&flipped.pixels()[4..], &top);
    assert_eq!(flipped.flipped_vertically(), image);
    Ok(())
}

#[test]
fn normal_resolution_falls_back() {
    let mesh = MeshData::new(
        vec![Vec3::ZERO; 3],
        vec![Vec3::new(1.0, 0.0, 0.0)],
        vec![[
            Corner::with_normal(0, 0),
            Corner::with_normal(1, 7),
            Corner::new(2),
        ]],
    );
    let face = mesh.faces[0];

    assert_eq!(mesh.resolve_normal(&face[0]), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(mesh.resolve_normal(&face[1]), FALLBACK_NORMAL);
    assert_eq!(mesh.resolve_normal(&face[2]), FALLBACK_NORMAL);
    assert_eq!(mesh.corner_count(), 3);
}

#[test]
fn bounds_cover_all_vertices() {
    let mesh = MeshData::new(
        vec![
            Vec3::new(-1.0, 2.0, 0.5),
            Vec3::new(3.0, -4.0, 0.0),
            Vec3::new(0.0, 0.0, -2.0),
        ],
        Vec::new(),
        Vec::new(),
    );
    let (min, max) = mesh.bounds().expect("bounds");
    assert_eq!(min, Vec3::new(-1.0, -4.0, -2.0));
    assert_eq!(max, Vec3::new(3.0, 2.0, 0.5));
    assert!(mesh.is_empty());
}
