use anyhow::{Context, Result, bail};
use posekit_geometry::Vec3;
use posekit_io::{load_image, load_obj};
use posekit_view::viewer::{FrameCommand, FrameRecorder, FrameRenderer, SceneStore, TransformState};

use crate::cli::{HeadlessCommand, InspectArgs};

pub fn run_headless(command: HeadlessCommand) -> Result<()> {
    match command {
        HeadlessCommand::Inspect(args) => inspect(args),
    }
}

fn inspect(args: InspectArgs) -> Result<()> {
    let mut scene = SceneStore::default();
    if let Some(path) = &args.image {
        let image = load_image(path)?;
        println!("image: {} ({}x{})", path.display(), image.width(), image.height());
        scene.set_background(image);
    }
    if let Some(path) = &args.model {
        let mesh = load_obj(path)?;
        println!(
            "model: {} ({} vertices, {} normals, {} faces)",
            path.display(),
            mesh.vertices.len(),
            mesh.normals.len(),
            mesh.faces.len()
        );
        if let Some((min, max)) = mesh.bounds() {
            println!(
                "bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
                min.x, min.y, min.z, max.x, max.y, max.z
            );
        }
        scene.set_mesh(mesh);
    }

    let pose = TransformState::new(
        parse_triple("--rotation", &args.rotation)?,
        parse_triple("--translation", &args.translation)?,
        args.scale,
    );
    let mut renderer = FrameRenderer::new(args.width, args.height);
    let mut recorder = FrameRecorder::default();
    renderer.render(&mut recorder, &scene, &pose);

    for command in &recorder.commands {
        println!("{}", describe(command));
    }
    Ok(())
}

fn describe(command: &FrameCommand) -> String {
    match command {
        FrameCommand::Begin { viewport, clear } => format!(
            "begin {}x{} clear {:?}",
            viewport.width, viewport.height, clear
        ),
        FrameCommand::UploadBackground { width, height, .. } => {
            format!("upload background {width}x{height}")
        }
        FrameCommand::DrawBackground(pass) => {
            format!("draw background depth_test={}", pass.depth_test)
        }
        FrameCommand::UploadMesh(vertices) => format!("upload mesh {} vertices", vertices.len()),
        FrameCommand::DrawMesh(pass) => {
            let m: [[f32; 4]; 4] = pass.model_view.into();
            format!(
                "draw mesh {} vertices, model-view translation ({:.3}, {:.3}, {:.3})",
                pass.vertex_count, m[3][0], m[3][1], m[3][2]
            )
        }
        FrameCommand::End => "end".to_string(),
    }
}

fn parse_triple(flag: &str, text: &str) -> Result<Vec3> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        bail!("{flag} expects three comma-separated numbers, e.g. 0,45,0");
    }

    let x: f32 = parts[0].trim().parse().with_context(|| format!("invalid {flag} x"))?;
    let y: f32 = parts[1].trim().parse().with_context(|| format!("invalid {flag} y"))?;
    let z: f32 = parts[2].trim().parse().with_context(|| format!("invalid {flag} z"))?;
    Ok(Vec3::new(x, y, z))
}
