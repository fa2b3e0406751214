use anyhow::Context;
use clap::{Parser, Subcommand};
use museum_assets::{AssetStore, MeshData};
use museum_input::{ControlKey, ControlKeys};
use museum_render::{
    CameraController, DebugTextRenderer, FrameEntry, FramePlan, Renderer, Scene, SceneDescription,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "museum-cli", about = "CLI tool for museum viewer operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Print the built-in scene description as JSON
    Scene,
    /// Simulate the fly camera with keys held and print the final frame
    Fly {
        /// Number of camera updates
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seconds between updates
        #[arg(long, default_value = "0.016")]
        dt: f64,
        /// Keys held for every update (e.g. forward, look-up, strafe-left)
        #[arg(long, value_delimiter = ',')]
        hold: Vec<ControlKey>,
        /// Load real meshes from this directory instead of empty stand-ins
        #[arg(long)]
        asset_root: Option<PathBuf>,
    },
    /// Load one OBJ file and report its size
    Mesh {
        path: PathBuf,
        /// Read texture coordinates
        #[arg(long)]
        uvs: bool,
    },
    /// Load every asset of the built-in scene
    CheckAssets {
        #[arg(long, default_value = ".")]
        asset_root: PathBuf,
    },
}

/// A scene with one empty mesh per row, for running the camera without assets.
fn stand_in_scene(description: &SceneDescription) -> anyhow::Result<Scene> {
    let mut store = AssetStore::new();
    let entries = description
        .entries
        .iter()
        .map(|row| FrameEntry {
            mesh: store.add_mesh(mesh_label(&row.mesh_path), MeshData::default()),
            vertex_count: 0,
            color: row.color,
            texture: None,
        })
        .collect();
    Ok(Scene::new(entries, &store)?)
}

/// Run `frames` camera updates `dt` seconds apart with `keys` held.
fn simulate(frames: u32, dt: f64, keys: &ControlKeys) -> CameraController {
    let mut camera = CameraController::default();
    // Start the clock with nothing held so every counted update has a real dt.
    camera.compute_matrices_from_inputs(&ControlKeys::new(), 0.0);
    for i in 1..=frames {
        camera.compute_matrices_from_inputs(keys, f64::from(i) * dt);
    }
    camera
}

fn mesh_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("museum-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", museum_common::crate_info());
            println!("input: {}", museum_input::crate_info());
            println!("assets: {}", museum_assets::crate_info());
            println!("render: {}", museum_render::crate_info());
            println!("render-wgpu: {}", museum_render_wgpu::crate_info());
        }
        Commands::Scene => {
            let json = serde_json::to_string_pretty(&SceneDescription::museum())?;
            println!("{json}");
        }
        Commands::Fly {
            frames,
            dt,
            hold,
            asset_root,
        } => {
            let description = SceneDescription::museum();
            let scene = match &asset_root {
                Some(root) => Scene::load(&description, root)?.0,
                None => stand_in_scene(&description)?,
            };
            tracing::debug!("fly over {} scene entries", scene.len());
            let keys = ControlKeys::holding(&hold);
            println!(
                "Fly: frames={frames}, dt={dt}, holding [{}]",
                keys.iter().map(|k| k.name()).collect::<Vec<_>>().join(", ")
            );

            let camera = simulate(frames, dt, &keys);
            let state = camera.state();
            println!(
                "Camera: pos=({:.3}, {:.3}, {:.3}) h={:.3} v={:.3}",
                state.position.x,
                state.position.y,
                state.position.z,
                state.horizontal_angle,
                state.vertical_angle
            );

            let labels = description
                .entries
                .iter()
                .map(|row| mesh_label(&row.mesh_path))
                .collect();
            let plan = FramePlan::build(&scene, camera.matrices());
            print!("{}", DebugTextRenderer::with_labels(labels).render(&plan));
        }
        Commands::Mesh { path, uvs } => {
            let mesh = museum_assets::load_obj(&path, uvs)?;
            println!(
                "{}: {} vertices, {} triangles",
                path.display(),
                mesh.vertex_count(),
                mesh.triangle_count()
            );
        }
        Commands::CheckAssets { asset_root } => {
            let (scene, store) = Scene::load(&SceneDescription::museum(), &asset_root)
                .with_context(|| format!("asset check failed in {}", asset_root.display()))?;
            for ((_, mesh), entry) in store.meshes().zip(scene.entries()) {
                println!("  {:<12} {:>8} vertices", mesh.name, entry.vertex_count);
            }
            println!("{}", serde_json::to_string(&store.summary())?);
        }
    }

    Ok(())
}
