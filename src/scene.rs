use crate::scene::mesh::Mesh;

pub mod mesh;

/// Geometry extracted from one model file, frozen once the import completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub(crate) meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Scene {
            meshes
        }
    }

    pub fn empty() -> Self {
        Scene::default()
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn polygon_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.polygons().len()).sum()
    }
}
