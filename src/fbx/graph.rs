use std::collections::{HashMap, HashSet};
use log::{debug, warn};
use crate::fbx::{Document, IoSettings, ParseError, ParseResult, MAX_NODE_DEPTH};
use crate::fbx::node::NodeRecord;
use crate::fbx::property::PropertyValue;

/// Object id the connections use for the scene root.
const ROOT_ID: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    Mesh,
    Null,
    Skeleton,
    Camera,
    Light,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
enum NodeAttribute {
    Mesh(MeshAttribute),
    Other(AttributeType),
}

/// Geometry of a mesh node: shared control points and the polygons indexing into them.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAttribute {
    control_points: Vec<glm::DVec3>,
    polygons: Vec<Vec<usize>>,
}

impl MeshAttribute {
    pub fn new(control_points: Vec<glm::DVec3>, polygons: Vec<Vec<usize>>) -> Self {
        MeshAttribute {
            control_points,
            polygons,
        }
    }

    pub fn control_points(&self) -> &[glm::DVec3] {
        &self.control_points
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn polygon_size(&self, polygon: usize) -> usize {
        self.polygons.get(polygon).map_or(0, |p| p.len())
    }

    /// Control point index used by corner `vertex` of `polygon`.
    pub fn polygon_vertex(&self, polygon: usize, vertex: usize) -> Option<usize> {
        self.polygons.get(polygon)?.get(vertex).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    attribute: Option<NodeAttribute>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(name: &str, children: Vec<Node>) -> Self {
        Node {
            name: name.to_string(),
            attribute: None,
            children,
        }
    }

    pub fn with_mesh(name: &str, mesh: MeshAttribute, children: Vec<Node>) -> Self {
        Node {
            name: name.to_string(),
            attribute: Some(NodeAttribute::Mesh(mesh)),
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn attribute_type(&self) -> Option<AttributeType> {
        match &self.attribute {
            Some(NodeAttribute::Mesh(_)) => Some(AttributeType::Mesh),
            Some(NodeAttribute::Other(kind)) => Some(*kind),
            None => None
        }
    }

    pub fn mesh(&self) -> Option<&MeshAttribute> {
        match &self.attribute {
            Some(NodeAttribute::Mesh(mesh)) => Some(mesh),
            _ => None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    root: Node,
}

impl SceneGraph {
    pub fn new(root: Node) -> Self {
        SceneGraph { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }
}

struct ModelRecord {
    name: String,
    class: String,
}

fn object_id(record: &NodeRecord) -> ParseResult<i64> {
    record.properties.get(0)
        .and_then(PropertyValue::as_i64)
        .ok_or_else(|| ParseError::ValidationError(format!("{} record has no object id", record.name)))
}

fn string_property(record: &NodeRecord, index: usize) -> &str {
    record.properties.get(index).and_then(PropertyValue::as_str).unwrap_or("")
}

/// Splits a `PolygonVertexIndex` array into polygons. A negative index `k` closes
/// the current polygon and stands for `!k`.
fn split_polygons(indices: &[i32]) -> Vec<Vec<usize>> {
    let mut polygons = Vec::new();
    let mut current = Vec::new();

    for index in indices {
        if *index < 0 {
            current.push((*index ^ -1) as usize);
            polygons.push(std::mem::take(&mut current));
        } else {
            current.push(*index as usize);
        }
    }

    if !current.is_empty() {
        polygons.push(current);
    }

    polygons
}

fn parse_mesh(geometry: &NodeRecord) -> ParseResult<MeshAttribute> {
    let coordinates = match geometry.children.get_multiple("Vertices").first() {
        Some(vertices) => vertices.properties.get(0)
            .and_then(PropertyValue::to_f64_vec)
            .ok_or_else(|| ParseError::ValidationError("unexpected data in Vertices node".to_string()))?,
        None => Vec::new()
    };

    if coordinates.len() % 3 != 0 {
        return Err(ParseError::ValidationError(format!(
            "Vertices holds {} values, not a multiple of 3", coordinates.len())));
    }

    let control_points = coordinates.chunks_exact(3)
        .map(|c| glm::DVec3::new(c[0], c[1], c[2]))
        .collect();

    let polygons = match geometry.children.get_multiple("PolygonVertexIndex").first() {
        Some(indices) => split_polygons(indices.properties.get(0)
            .and_then(PropertyValue::as_i32_slice)
            .ok_or_else(|| ParseError::ValidationError("unexpected data in PolygonVertexIndex node".to_string()))?),
        None => Vec::new()
    };

    Ok(MeshAttribute::new(control_points, polygons))
}

fn attribute_for_class(class: &str) -> Option<AttributeType> {
    match class {
        "" => None,
        "Null" => Some(AttributeType::Null),
        "LimbNode" | "Limb" | "Root" => Some(AttributeType::Skeleton),
        "Camera" => Some(AttributeType::Camera),
        "Light" => Some(AttributeType::Light),
        // a Mesh model without connected geometry carries nothing drawable
        "Mesh" => None,
        _ => Some(AttributeType::Unknown),
    }
}

struct GraphBuilder {
    models: HashMap<i64, ModelRecord>,
    meshes: HashMap<i64, MeshAttribute>,
    children: HashMap<i64, Vec<i64>>,
    model_geometry: HashMap<i64, i64>,
    visited: HashSet<i64>,
}

impl GraphBuilder {
    fn from_document(document: &Document, settings: &IoSettings) -> ParseResult<Self> {
        let mut builder = GraphBuilder {
            models: HashMap::new(),
            meshes: HashMap::new(),
            children: HashMap::new(),
            model_geometry: HashMap::new(),
            visited: HashSet::new(),
        };

        if let Some(objects) = document.nodes.get_multiple("Objects").first() {
            for model in objects.children.get_multiple("Model") {
                builder.models.insert(object_id(model)?, ModelRecord {
                    name: string_property(model, 1).to_string(),
                    class: string_property(model, 2).to_string(),
                });
            }

            for geometry in objects.children.get_multiple("Geometry") {
                if !settings.import_geometry || string_property(geometry, 2) != "Mesh" {
                    continue;
                }
                builder.meshes.insert(object_id(geometry)?, parse_mesh(geometry)?);
            }
        }

        if let Some(connections) = document.nodes.get_multiple("Connections").first() {
            for connection in connections.children.get_multiple("C") {
                if string_property(connection, 0) != "OO" {
                    continue;
                }
                let ids = (
                    connection.properties.get(1).and_then(PropertyValue::as_i64),
                    connection.properties.get(2).and_then(PropertyValue::as_i64),
                );
                if let (Some(child), Some(parent)) = ids {
                    builder.connect(child, parent);
                }
            }
        }

        Ok(builder)
    }

    fn connect(&mut self, child: i64, parent: i64) {
        let parent_is_node = parent == ROOT_ID || self.models.contains_key(&parent);
        if self.models.contains_key(&child) && parent_is_node {
            self.children.entry(parent).or_default().push(child);
        } else if self.meshes.contains_key(&child) && self.models.contains_key(&parent) {
            self.model_geometry.entry(parent).or_insert(child);
        }
    }

    fn build_node(&mut self, id: i64, depth: usize) -> ParseResult<Node> {
        if depth > MAX_NODE_DEPTH {
            return Err(ParseError::ValidationError(format!(
                "model hierarchy is nested deeper than {} levels", MAX_NODE_DEPTH)));
        }

        let child_ids = self.children.get(&id).cloned().unwrap_or_default();
        let mut children = Vec::with_capacity(child_ids.len());
        for child in child_ids {
            if !self.visited.insert(child) {
                warn!("Model {} is connected more than once, ignoring repeated connection", child);
                continue;
            }
            children.push(self.build_node(child, depth + 1)?);
        }

        if id == ROOT_ID {
            return Ok(Node::new("RootNode", children));
        }

        let model = &self.models[&id];
        let mesh = self.model_geometry.get(&id).and_then(|geometry| self.meshes.get(geometry));
        let attribute = match mesh {
            Some(mesh) => Some(NodeAttribute::Mesh(mesh.clone())),
            None => attribute_for_class(&model.class).map(NodeAttribute::Other),
        };

        Ok(Node {
            name: model.name.clone(),
            attribute,
            children,
        })
    }
}

/// Builds the node hierarchy described by the `Objects` and `Connections` sections.
pub(crate) fn build_scene_graph(document: &Document, settings: &IoSettings) -> ParseResult<SceneGraph> {
    let mut builder = GraphBuilder::from_document(document, settings)?;
    debug!("Document holds {} models and {} meshes", builder.models.len(), builder.meshes.len());

    let root = builder.build_node(ROOT_ID, 0)?;
    Ok(SceneGraph::new(root))
}
