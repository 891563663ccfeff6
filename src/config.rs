use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::scene::TextureKind;

/// Truck and loading ramp demo.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct AppConfig {
    /// Directory holding the truck model and the `textures` folder
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// glTF model of the truck, relative to the assets directory
    #[arg(long, default_value = "truck/truck.gltf")]
    pub truck_model: PathBuf,

    /// Milliseconds between animation ticks
    #[arg(long, default_value_t = 10)]
    pub tick_ms: u64,

    /// How long a started animation keeps the controls locked, in seconds
    #[arg(long, default_value_t = 15)]
    pub animation_secs: u64,

    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 720)]
    pub height: u32,
}

impl AppConfig {
    pub fn truck_model_path(&self) -> PathBuf {
        self.assets.join(&self.truck_model)
    }

    pub fn texture_path(&self, texture: TextureKind) -> PathBuf {
        self.assets.join("textures").join(texture.file_name())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn animation_length(&self) -> Duration {
        Duration::from_secs(self.animation_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::parse_from(["truck-ramp"])
    }
}
