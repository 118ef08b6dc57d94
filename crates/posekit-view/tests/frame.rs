use anyhow::Result;
use approx::assert_relative_eq;
use cgmath::{Deg, Matrix4, Vector3, Vector4, perspective};
use posekit_geometry::{Corner, DecodedImage, FALLBACK_NORMAL, MeshData, Vec3};
use posekit_view::viewer::{
    CLEAR_COLOR, FrameCommand, FrameRecorder, FrameRenderer, GLOBAL_AMBIENT, LIGHT_POSITIONS,
    MESH_COLOR, SceneStore, TransformState, Viewport, background_projection, build_mesh_vertices,
    view_matrix,
};

fn image(width: u32, height: u32) -> Result<DecodedImage> {
    let pixels = vec![128; (width * height * 4) as usize];
    Ok(DecodedImage::new(width, height, pixels)?)
}

fn triangle_with_normals() -> MeshData {
    MeshData::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        vec![Vec3::new(1.0, 0.0, 0.0)],
        vec![[
            Corner::with_normal(0, 0),
            Corner::new(1),
            Corner::with_normal(2, 7),
        ]],
    )
}

fn kinds(recorder: &FrameRecorder) -> Vec<&'static str> {
    recorder
        .commands
        .iter()
        .map(|command| match command {
            FrameCommand::Begin { .. } => "begin",
            FrameCommand::UploadBackground { .. } => "upload_background",
            FrameCommand::DrawBackground(_) => "draw_background",
            FrameCommand::UploadMesh(_) => "upload_mesh",
            FrameCommand::DrawMesh(_) => "draw_mesh",
            FrameCommand::End => "end",
        })
        .collect()
}

#[test]
fn empty_scene_only_clears() {
    let mut renderer = FrameRenderer::new(640, 480);
    let mut recorder = FrameRecorder::default();

    renderer.render(&mut recorder, &SceneStore::default(), &TransformState::default());

    assert_eq!(kinds(&recorder), ["begin", "end"]);
    assert_eq!(
        recorder.commands[0],
        FrameCommand::Begin {
            viewport: Viewport::new(640, 480),
            clear: CLEAR_COLOR,
        }
    );
    assert_eq!(CLEAR_COLOR, [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn background_draws_before_mesh() -> Result<()> {
    let mut scene = SceneStore::default();
    scene.set_background(image(4, 2)?);
    scene.set_mesh(triangle_with_normals());
    let mut renderer = FrameRenderer::new(800, 600);
    let mut recorder = FrameRecorder::default();

    renderer.render(&mut recorder, &scene, &TransformState::default());

    assert_eq!(
        kinds(&recorder),
        [
            "begin",
            "upload_background",
            "draw_background",
            "upload_mesh",
            "draw_mesh",
            "end"
        ]
    );
    Ok(())
}

#[test]
fn background_pass_uses_unit_ortho_without_depth_test() -> Result<()> {
    let mut scene = SceneStore::default();
    scene.set_background(image(2, 2)?);
    let mut renderer = FrameRenderer::new(300, 200);
    let mut recorder = FrameRecorder::default();

    renderer.render(&mut recorder, &scene, &TransformState::default());

    let pass = recorder
        .commands
        .iter()
        .find_map(|command| match command {
            FrameCommand::DrawBackground(pass) => Some(pass.clone()),
            _ => None,
        })
        .expect("background drawn");
    assert!(!pass.depth_test);
    assert_eq!(pass.projection, background_projection());
    let corner = pass.projection * Vector4::new(1.0, 1.0, -1.0, 1.0);
    assert_relative_eq!(corner.x, 1.0);
    assert_relative_eq!(corner.y, 1.0);
    Ok(())
}

#[test]
fn uploads_only_when_content_changes() -> Result<()> {
    let mut scene = SceneStore::default();
    scene.set_background(image(2, 2)?);
    scene.set_mesh(triangle_with_normals());
    let mut renderer = FrameRenderer::new(100, 100);
    let mut recorder = FrameRecorder::default();
    let pose = TransformState::default();

    renderer.render(&mut recorder, &scene, &pose);
    recorder.clear();
    renderer.render(&mut recorder, &scene, &pose);
    assert_eq!(
        kinds(&recorder),
        ["begin", "draw_background", "draw_mesh", "end"]
    );

    scene.set_background(image(3, 1)?);
    recorder.clear();
    renderer.render(&mut recorder, &scene, &pose);
    assert_eq!(
        kinds(&recorder),
        ["begin", "upload_background", "draw_background", "draw_mesh", "end"]
    );
    assert!(matches!(
        recorder.commands[1],
        FrameCommand::UploadBackground {
            width: 3,
            height: 1,
            ..
        }
    ));

    renderer.invalidate_uploads();
    recorder.clear();
    renderer.render(&mut recorder, &scene, &pose);
    assert_eq!(
        kinds(&recorder),
        [
            "begin",
            "upload_background",
            "draw_background",
            "upload_mesh",
            "draw_mesh",
            "end"
        ]
    );
    Ok(())
}

#[test]
fn cleared_slots_are_skipped() -> Result<()> {
    let mut scene = SceneStore::default();
    scene.set_background(image(2, 2)?);
    scene.set_mesh(triangle_with_normals());
    let mut renderer = FrameRenderer::new(100, 100);
    let mut recorder = FrameRecorder::default();
    renderer.render(&mut recorder, &scene, &TransformState::default());

    scene.clear_background();
    scene.clear_mesh();
    recorder.clear();
    renderer.render(&mut recorder, &scene, &TransformState::default());

    assert_eq!(kinds(&recorder), ["begin", "end"]);
    Ok(())
}

#[test]
fn missing_or_dangling_normals_fall_back() {
    let vertices = build_mesh_vertices(&triangle_with_normals());

    assert_eq!(vertices.len(), 3);
    assert_eq!(vertices[0].normal, [1.0, 0.0, 0.0]);
    assert_eq!(vertices[1].normal, FALLBACK_NORMAL.to_array());
    assert_eq!(vertices[2].normal, [0.0, 0.0, 1.0]);
    assert_eq!(vertices[2].position, [0.0, 1.0, 0.0]);
}

#[test]
fn faces_with_missing_vertices_are_dropped() {
    let mut mesh = triangle_with_normals();
    mesh.faces
        .push([Corner::new(0), Corner::new(1), Corner::new(9)]);

    let vertices = build_mesh_vertices(&mesh);

    assert_eq!(vertices.len(), 3);
}

#[test]
fn mesh_pass_carries_lighting_setup() {
    let mut scene = SceneStore::default();
    scene.set_mesh(triangle_with_normals());
    let mut renderer = FrameRenderer::new(100, 100);
    let mut recorder = FrameRecorder::default();

    renderer.render(&mut recorder, &scene, &TransformState::default());

    let pass = recorder.mesh_passes().next().expect("mesh drawn");
    assert_eq!(pass.vertex_count, 3);
    assert_eq!(pass.lights, LIGHT_POSITIONS);
    assert_eq!(pass.lights, [[10.0, 10.0, 10.0], [-10.0, -10.0, 10.0]]);
    assert_eq!(pass.color, MESH_COLOR);
    assert_relative_eq!(pass.ambient, GLOBAL_AMBIENT);
    assert_eq!(pass.model_view, view_matrix());
    assert_eq!(recorder.uploaded_vertices().map(<[_]>::len), Some(3));
}

#[test]
fn camera_sits_five_units_back() {
    let origin = view_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
    assert_relative_eq!(origin.z, -5.0);
    assert_relative_eq!(origin.x, 0.0);
    assert_relative_eq!(origin.y, 0.0);
}

#[test]
fn zero_height_matches_height_one() {
    let mut zero = FrameRenderer::new(640, 480);
    let mut one = FrameRenderer::new(640, 480);

    zero.resize(640, 0);
    one.resize(640, 1);

    assert_eq!(zero.viewport(), one.viewport());
    assert_eq!(zero.projection(), one.projection());
    assert_eq!(zero.viewport(), Viewport::new(640, 1));
}

#[test]
fn resize_rebuilds_perspective() {
    let mut renderer = FrameRenderer::new(100, 100);
    renderer.resize(1200, 800);

    let expected: Matrix4<f32> = perspective(Deg(45.0), 1.5, 0.1, 100.0);
    assert_eq!(renderer.projection(), expected);

    let mut scene = SceneStore::default();
    scene.set_mesh(triangle_with_normals());
    let mut recorder = FrameRecorder::default();
    renderer.render(&mut recorder, &scene, &TransformState::default());
    assert_eq!(
        recorder.commands[0],
        FrameCommand::Begin {
            viewport: Viewport::new(1200, 800),
            clear: CLEAR_COLOR,
        }
    );
    assert_eq!(
        recorder.mesh_passes().next().map(|pass| pass.projection),
        Some(expected)
    );
}

#[test]
fn transform_translates_then_scales_then_rotates() {
    let pose = TransformState::new(
        Vec3::new(90.0, 90.0, 0.0),
        Vec3::new(1.0, 2.0, 3.0),
        2.0,
    );
    let model = pose.model_matrix();

    // Rz, then Ry, then Rx act on the point before scale and translation:
    // (1,0,0) -> Ry(90) -> (0,0,-1) -> Rx(90) -> (0,1,0) -> *2 -> +t
    let p = model * Vector4::new(1.0, 0.0, 0.0, 1.0);
    assert_relative_eq!(p.x, 1.0, epsilon = 1.0e-5);
    assert_relative_eq!(p.y, 4.0, epsilon = 1.0e-5);
    assert_relative_eq!(p.z, 3.0, epsilon = 1.0e-5);

    let expected = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0))
        * Matrix4::from_scale(2.0)
        * Matrix4::from_angle_x(Deg(90.0))
        * Matrix4::from_angle_y(Deg(90.0));
    let model: &[f32; 16] = model.as_ref();
    let expected: &[f32; 16] = expected.as_ref();
    for (a, b) in model.iter().zip(expected) {
        assert_relative_eq!(*a, *b, epsilon = 1.0e-6);
    }
}

#[test]
fn mesh_pass_follows_pose() {
    let mut scene = SceneStore::default();
    scene.set_mesh(triangle_with_normals());
    let pose = TransformState::new(Vec3::ZERO, Vec3::new(0.5, -0.25, 1.0), 1.0);
    let mut renderer = FrameRenderer::new(100, 100);
    let mut recorder = FrameRecorder::default();

    renderer.render(&mut recorder, &scene, &pose);

    let pass = recorder.mesh_passes().next().expect("mesh drawn");
    let origin = pass.model_view * Vector4::new(0.0, 0.0, 0.0, 1.0);
    assert_relative_eq!(origin.x, 0.5);
    assert_relative_eq!(origin.y, -0.25);
    assert_relative_eq!(origin.z, -4.0);
}
