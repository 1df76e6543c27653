use anyhow::Context;
use porchlight::{app::SceneViewer, config::SceneConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::from_env();
    log::info!(
        "Starting {} at {}x{}, textures from {}",
        config.title,
        config.width,
        config.height,
        config.texture_dir.display()
    );

    let viewer = SceneViewer::new(config).context("failed to set up the viewer")?;
    viewer.run().context("viewer stopped with an error")?;
    Ok(())
}
