use std::path::Path;
use log::{debug, error, info, warn};
use thiserror::Error;
use crate::fbx::{self, AttributeType, MeshAttribute, Node, SceneGraph, Status};
use crate::scene::mesh::{Mesh, Polygon};
use crate::scene::Scene;

#[derive(Debug, Error, PartialEq)]
pub enum ImportError {
    #[error("failed to create FBX manager")]
    ManagerCreationFailed,
    #[error("failed to create FBX importer")]
    ImporterCreationFailed,
    #[error("failed to initialize the FBX importer: {0}")]
    ImporterInitFailed(String),
    #[error("failed to import FBX scene: {0}")]
    SceneImportFailed(String),
}

/// Source of managers. Everything a manager hands out is released when it is dropped.
pub trait ImportSdk {
    type Manager: SdkManager;

    fn create_manager(&self) -> Option<Self::Manager>;
}

/// Owns the IO settings every importer it creates is initialized with.
pub trait SdkManager {
    type Settings;
    type Importer: SdkImporter<Settings=Self::Settings>;

    fn io_settings(&self) -> &Self::Settings;

    fn create_importer(&mut self) -> Option<Self::Importer>;
}

pub trait SdkImporter {
    type Settings;

    fn initialize(&mut self, path: &Path, settings: &Self::Settings) -> Result<(), Status>;

    fn import(&mut self) -> Result<SceneGraph, Status>;
}

/// Imports the model at `path`. Either the complete scene is returned or an error,
/// SDK resources are released on every path out of here.
pub fn import<S: ImportSdk>(sdk: &S, path: &Path) -> Result<Scene, ImportError> {
    let mut manager = sdk.create_manager()
        .ok_or(ImportError::ManagerCreationFailed)?;
    let mut importer = manager.create_importer()
        .ok_or(ImportError::ImporterCreationFailed)?;

    importer.initialize(path, manager.io_settings())
        .map_err(|status| ImportError::ImporterInitFailed(status.error_string().to_string()))?;
    let graph = importer.import()
        .map_err(|status| ImportError::SceneImportFailed(status.error_string().to_string()))?;

    info!("FBX file loaded successfully");
    extract_scene(&graph)
}

/// Imports with the binary FBX reader and falls back to an empty scene on failure.
pub fn load_scene(path: &Path) -> Scene {
    match import(&fbx::Sdk, path) {
        Ok(scene) => scene,
        Err(e) => {
            error!("{}", e);
            Scene::empty()
        }
    }
}

/// Collects every mesh in pre-order: a node before its children, siblings in child order.
pub fn extract_scene(graph: &SceneGraph) -> Result<Scene, ImportError> {
    let mut meshes = Vec::new();
    visit_node(graph.root(), &mut meshes, 0)?;
    Ok(Scene::new(meshes))
}

fn visit_node(node: &Node, meshes: &mut Vec<Mesh>, depth: usize) -> Result<(), ImportError> {
    if depth > fbx::MAX_NODE_DEPTH {
        return Err(ImportError::SceneImportFailed(format!(
            "node hierarchy is nested deeper than {} levels", fbx::MAX_NODE_DEPTH)));
    }

    if node.attribute_type() == Some(AttributeType::Mesh) {
        if let Some(mesh) = node.mesh() {
            meshes.push(extract_mesh(node.name(), mesh)?);
        }
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            visit_node(child, meshes, depth + 1)?;
        }
    }

    Ok(())
}

fn extract_mesh(name: &str, mesh: &MeshAttribute) -> Result<Mesh, ImportError> {
    let control_points = mesh.control_points();
    let polygon_count = mesh.polygon_count();
    let mut polygons = Vec::with_capacity(polygon_count);

    for i in 0..polygon_count {
        let size = mesh.polygon_size(i);
        let mut points = Vec::with_capacity(size);
        for j in 0..size {
            let point = mesh.polygon_vertex(i, j)
                .and_then(|index| control_points.get(index))
                .ok_or_else(|| ImportError::SceneImportFailed(format!(
                    "mesh '{}': polygon {} corner {} references a missing control point", name, i, j)))?;
            points.push(*point);
        }

        match Polygon::new(points) {
            Some(polygon) => polygons.push(polygon),
            None => warn!("Mesh '{}': skipping polygon {} with {} vertices", name, i, size),
        }
    }

    info!("Processed mesh with {} polygons", polygons.len());
    debug!("Mesh '{}' has {} control points", name, control_points.len());
    Ok(Mesh::new(name.to_string(), polygons))
}
