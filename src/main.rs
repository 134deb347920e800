use anyhow::Result;
use log::info;
use crate::config::{Command, ViewerConfig, USAGE};
use crate::viewer::Viewer;

mod config;
mod fbx;
mod importer;
mod render;
mod scene;
mod viewer;
mod window;

fn main() -> Result<()> {
    env_logger::init();

    let config = match ViewerConfig::from_args(std::env::args().skip(1))? {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Run(config) => config,
    };

    info!("Loading {}", config.model_path.display());
    let scene = importer::load_scene(&config.model_path);
    info!("Loaded {} meshes with {} polygons", scene.meshes().len(), scene.polygon_count());

    let viewer = Viewer::new(scene, config.initial_zoom);
    window::run(&config, viewer)
}
