//! Prism command-line renderer.
//!
//! Renders the Cornell box demo scene to a PNG:
//!
//! ```text
//! prism [config.json] [output.png]
//! prism --print-config
//! ```

mod cornell;

use anyhow::{Context, Result};
use clap::Parser;
use prism_core::RenderConfig;
use prism_renderer::{render_parallel, Camera, PhotonMap};
use std::path::PathBuf;
use std::time::Instant;

/// Render the Cornell box with photon-mapped caustics
#[derive(Parser, Debug)]
#[command(name = "prism", version, about)]
struct Args {
    /// JSON render config; defaults apply when omitted
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// PNG file to write
    #[arg(value_name = "OUTPUT", default_value = "render.png")]
    output: PathBuf,

    /// Print the default config as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    if args.print_config {
        println!("{}", RenderConfig::default().to_json_string()?);
        return Ok(());
    }
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let start = Instant::now();

    let config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let scene = cornell::cornell_box();
    log::info!(
        "Scene: {} triangles, {} spheres, {} lights",
        scene.triangles.len(),
        scene.spheres.len(),
        scene.lights.len()
    );
    let suspicious = scene.check_materials();
    if suspicious > 0 {
        log::warn!("{} materials reflect and refract more than they receive", suspicious);
    }

    let photon_map = if config.shading.caustics {
        PhotonMap::build(&scene, &config.photons)
    } else {
        log::info!("Caustics disabled, skipping photon pass");
        PhotonMap::empty()
    };
    log::info!("Photon map size: {}", photon_map.total_photons());

    let camera = Camera::from_config(
        &config.camera,
        config.width,
        config.height,
        config.anti_aliasing,
    );
    let image = render_parallel(&camera, &scene, &photon_map, &config);

    let png = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("Image buffer does not match its dimensions")?;
    png.save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!(
        "Wrote {} in {:.2?}",
        args.output.display(),
        start.elapsed()
    );
    Ok(())
}
