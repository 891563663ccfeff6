use anyhow::Result;
use clap::Parser;

mod config;
mod controls;
mod hud;
mod rendering;
mod scene;
mod toolbar;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = config::AppConfig::parse();
    log::info!("Starting with {:?}", config);

    pollster::block_on(window::run(config))?;

    Ok(())
}
