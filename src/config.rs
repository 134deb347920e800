use std::path::PathBuf;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: fbxview [MODEL_PATH]

Opens a binary FBX file and shows its meshes in an orbit viewer.

Arguments:
  MODEL_PATH    Model to load (default: 1M_Cube.fbx)

Controls:
  left drag     rotate around X and Y
  right drag    rotate around X and Z
  wheel         zoom
  Esc           quit

Options:
  -h, --help    Print this message";

pub const DEFAULT_MODEL_PATH: &str = "1M_Cube.fbx";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Unknown option '{0}'")]
    UnknownOption(String),
    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub model_path: PathBuf,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub initial_zoom: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            title: "Mesh Viewer".to_string(),
            width: 800,
            height: 600,
            initial_zoom: -5.0,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Run(ViewerConfig),
    Help,
}

impl ViewerConfig {
    /// Parses the arguments following the program name.
    pub fn from_args<I, S>(args: I) -> Result<Command, ConfigError>
        where I: IntoIterator<Item=S>,
              S: Into<String> {
        let mut config = ViewerConfig::default();
        let mut model_path = None;

        for arg in args.into_iter().map(Into::into) {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                option if option.starts_with('-') && option.len() > 1 => {
                    return Err(ConfigError::UnknownOption(arg));
                }
                _ if model_path.is_some() => return Err(ConfigError::UnexpectedArgument(arg)),
                _ => model_path = Some(PathBuf::from(arg)),
            }
        }

        if let Some(path) = model_path {
            config.model_path = path;
        }
        Ok(Command::Run(config))
    }
}
