use anyhow::{Context, Result};
use clap::Parser;
use fakegl::mesh::{FaceVertex, Mesh, RenderParameters};
use fakegl::{EnableFlag, MatrixMode, Pipeline, Vec3};
use std::path::PathBuf;
use thiserror::Error;

/// The one domain-specific failure this binary reports, distinct from
/// the underlying `std::io::Error` `anyhow::Context` already attaches a
/// path to: which asset (geometry or texture) was unreadable.
#[derive(Error, Debug)]
enum AssetError {
    #[error("geometry file is not readable")]
    Geometry,
    #[error("texture file is not readable")]
    Texture,
}

/// Drives the fakegl software pipeline over a geometry/texture pair.
///
/// Parsing the geometry and texture files themselves is out of scope;
/// this binary only verifies both paths are readable and then renders a
/// small fixed demo scene, mirroring the upstream "load assets, then
/// hand off to the renderer" shape without the windowing layer.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the input geometry file (format parsing out of scope)
    geometry: PathBuf,

    /// Path to the input texture file (format parsing out of scope)
    texture: PathBuf,
}

fn check_readable(path: &PathBuf, kind: AssetError) -> Result<()> {
    std::fs::metadata(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .context(kind)?;
    Ok(())
}

fn demo_triangle_mesh() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.vertices = vec![
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    mesh.normals = vec![Vec3::new(0.0, 0.0, 1.0)];
    mesh.tex_coords = vec![Vec3::zero()];
    mesh.faces = vec![vec![
        FaceVertex { vertex: 0, tex_coord: 0, normal: 0 },
        FaceVertex { vertex: 1, tex_coord: 0, normal: 0 },
        FaceVertex { vertex: 2, tex_coord: 0, normal: 0 },
    ]];
    mesh
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = check_readable(&args.geometry, AssetError::Geometry)
        .and_then(|_| check_readable(&args.texture, AssetError::Texture))
    {
        log::error!("{err:#}");
        eprintln!(
            "Read failed for object {} or texture {}",
            args.geometry.display(),
            args.texture.display()
        );
        std::process::exit(1);
    }

    let mut pipeline = Pipeline::new(640, 480);
    pipeline.matrix_mode(MatrixMode::Projection);
    pipeline.ortho(-2.0, 2.0, -2.0, 2.0, -2.0, 2.0);
    pipeline.matrix_mode(MatrixMode::ModelView);
    pipeline.enable(EnableFlag::DepthTest);
    pipeline.clear_color(0.0, 0.0, 0.0, 1.0);
    pipeline.clear(fakegl::ClearMask::COLOR | fakegl::ClearMask::DEPTH);

    let mesh = demo_triangle_mesh();
    let params = RenderParameters::default();
    fakegl::mesh::render_mesh(&mut pipeline, &mesh, &params);

    log::info!(
        "rendered demo scene for {} / {}",
        args.geometry.display(),
        args.texture.display()
    );

    Ok(())
}
