use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use log::debug;
use crate::fbx::graph::{build_scene_graph, SceneGraph};
use crate::fbx::header::{parse_header, Header};
use crate::fbx::{parse_body, ParseError};
use crate::importer::{ImportSdk, SdkImporter, SdkManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    FailedToOpenFile,
    InvalidFileFormat,
    FileCorrupted,
    NotInitialized,
}

/// Diagnostic reported by a failed importer call.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    code: StatusCode,
    message: String,
}

impl Status {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Status { code, message: message.into() }
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn error_string(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Options an importer reads the file with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoSettings {
    /// When unset, models are imported without their mesh geometry.
    pub import_geometry: bool,
}

impl Default for IoSettings {
    fn default() -> Self {
        IoSettings { import_geometry: true }
    }
}

/// Entry point of the binary FBX reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sdk;

impl ImportSdk for Sdk {
    type Manager = Manager;

    fn create_manager(&self) -> Option<Manager> {
        Some(Manager { importers_created: 0, io_settings: IoSettings::default() })
    }
}

#[derive(Debug)]
pub struct Manager {
    importers_created: usize,
    io_settings: IoSettings,
}

impl Manager {
    pub fn set_io_settings(&mut self, settings: IoSettings) {
        self.io_settings = settings;
    }
}

impl SdkManager for Manager {
    type Settings = IoSettings;
    type Importer = Importer;

    fn io_settings(&self) -> &IoSettings {
        &self.io_settings
    }

    fn create_importer(&mut self) -> Option<Importer> {
        self.importers_created += 1;
        Some(Importer { source: None })
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        debug!("Destroying FBX manager ({} importer(s) created)", self.importers_created);
    }
}

struct Source {
    reader: BufReader<File>,
    header: Header,
    length: u64,
    settings: IoSettings,
}

/// Reads one file. `initialize` opens and validates it, `import` parses the rest.
pub struct Importer {
    source: Option<Source>,
}

impl SdkImporter for Importer {
    type Settings = IoSettings;

    fn initialize(&mut self, path: &Path, settings: &IoSettings) -> Result<(), Status> {
        let file = File::open(path).map_err(|e| Status::new(
            StatusCode::FailedToOpenFile,
            format!("cannot open '{}': {}", path.display(), e)))?;
        let length = file.metadata().map_err(|e| Status::new(
            StatusCode::FailedToOpenFile,
            format!("cannot read metadata of '{}': {}", path.display(), e)))?.len();

        let mut reader = BufReader::new(file);
        let header = parse_header(&mut reader).map_err(|e| {
            let code = match e {
                ParseError::IOError(_) => StatusCode::FileCorrupted,
                _ => StatusCode::InvalidFileFormat,
            };
            Status::new(code, format!("'{}': {}", path.display(), e))
        })?;

        debug!("Opened '{}', FBX version {}", path.display(), header.version);
        self.source = Some(Source { reader, header, length, settings: settings.clone() });
        Ok(())
    }

    fn import(&mut self) -> Result<SceneGraph, Status> {
        let mut source = self.source.take().ok_or_else(|| Status::new(
            StatusCode::NotInitialized,
            "importer was not initialized"))?;

        let document = parse_body(&mut source.reader, source.header, source.length)
            .map_err(|e| Status::new(StatusCode::FileCorrupted, e.to_string()))?;
        build_scene_graph(&document, &source.settings)
            .map_err(|e| Status::new(StatusCode::FileCorrupted, e.to_string()))
    }
}
