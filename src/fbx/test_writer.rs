//! Builds binary FBX documents for tests.

use std::path::PathBuf;
use byteorder::{LittleEndian, WriteBytesExt};
use deflate::deflate_bytes_zlib;
use crate::fbx::header::MAGIC;
use crate::fbx::node::RecordLayout;
use crate::fbx::property::PropertyValue;

pub(crate) struct NodeBuilder {
    name: String,
    properties: Vec<PropertyValue>,
    children: Vec<NodeBuilder>,
    compress_arrays: bool,
}

impl NodeBuilder {
    pub(crate) fn new(name: &str) -> Self {
        NodeBuilder {
            name: name.to_string(),
            properties: Vec::new(),
            children: Vec::new(),
            compress_arrays: false,
        }
    }

    pub(crate) fn property(mut self, value: PropertyValue) -> Self {
        self.properties.push(value);
        self
    }

    pub(crate) fn child(mut self, child: NodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn compressed(mut self) -> Self {
        self.compress_arrays = true;
        self
    }
}

fn write_array<T>(out: &mut Vec<u8>, values: &[T], compress: bool, write: impl Fn(&mut Vec<u8>, &T)) {
    let mut raw = Vec::new();
    for value in values {
        write(&mut raw, value);
    }
    out.write_u32::<LittleEndian>(values.len() as u32).unwrap();
    if compress {
        let compressed = deflate_bytes_zlib(&raw);
        out.write_u32::<LittleEndian>(1).unwrap();
        out.write_u32::<LittleEndian>(compressed.len() as u32).unwrap();
        out.extend_from_slice(&compressed);
    } else {
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(raw.len() as u32).unwrap();
        out.extend_from_slice(&raw);
    }
}

fn write_property(out: &mut Vec<u8>, value: &PropertyValue, compress: bool) {
    out.push(value.type_code());
    match value {
        PropertyValue::SignedInt16(x) => out.write_i16::<LittleEndian>(*x).unwrap(),
        PropertyValue::Boolean(x) => out.push(*x as u8),
        PropertyValue::SignedInt32(x) => out.write_i32::<LittleEndian>(*x).unwrap(),
        PropertyValue::Float(x) => out.write_f32::<LittleEndian>(*x).unwrap(),
        PropertyValue::Double(x) => out.write_f64::<LittleEndian>(*x).unwrap(),
        PropertyValue::SignedInt64(x) => out.write_i64::<LittleEndian>(*x).unwrap(),
        PropertyValue::FloatArray(v) => write_array(out, v, compress, |o, x| o.write_f32::<LittleEndian>(*x).unwrap()),
        PropertyValue::DoubleArray(v) => write_array(out, v, compress, |o, x| o.write_f64::<LittleEndian>(*x).unwrap()),
        PropertyValue::SignedInt64Array(v) => write_array(out, v, compress, |o, x| o.write_i64::<LittleEndian>(*x).unwrap()),
        PropertyValue::SignedInt32Array(v) => write_array(out, v, compress, |o, x| o.write_i32::<LittleEndian>(*x).unwrap()),
        PropertyValue::BooleanArray(v) => write_array(out, v, compress, |o, x| o.push(*x as u8)),
        PropertyValue::String(s) => {
            out.write_u32::<LittleEndian>(s.len() as u32).unwrap();
            out.extend_from_slice(s.as_bytes());
        }
        PropertyValue::BinaryData(bytes) => {
            out.write_u32::<LittleEndian>(bytes.len() as u32).unwrap();
            out.extend_from_slice(bytes);
        }
    }
}

fn write_field(out: &mut Vec<u8>, wide: bool, value: u64) {
    if wide {
        out.write_u64::<LittleEndian>(value).unwrap();
    } else {
        out.write_u32::<LittleEndian>(value as u32).unwrap();
    }
}

fn patch_field(out: &mut Vec<u8>, at: usize, wide: bool, value: u64) {
    if wide {
        out[at..at + 8].copy_from_slice(&value.to_le_bytes());
    } else {
        out[at..at + 4].copy_from_slice(&(value as u32).to_le_bytes());
    }
}

fn write_node(out: &mut Vec<u8>, node: &NodeBuilder, wide: bool, sentinel_length: usize) {
    let field_size = if wide { 8 } else { 4 };
    let start = out.len();
    write_field(out, wide, 0);
    write_field(out, wide, node.properties.len() as u64);
    write_field(out, wide, 0);
    out.push(node.name.len() as u8);
    out.extend_from_slice(node.name.as_bytes());

    let property_start = out.len();
    for property in &node.properties {
        write_property(out, property, node.compress_arrays);
    }
    let property_length = (out.len() - property_start) as u64;
    patch_field(out, start + 2 * field_size, wide, property_length);

    if !node.children.is_empty() {
        for child in &node.children {
            write_node(out, child, wide, sentinel_length);
        }
        out.extend(std::iter::repeat(0u8).take(sentinel_length));
    }

    let end = out.len() as u64;
    patch_field(out, start, wide, end);
}

pub(crate) fn write_document(version: u32, nodes: &[NodeBuilder]) -> Vec<u8> {
    let layout = RecordLayout::for_version(version);
    let sentinel_length = layout.sentinel_length() as usize;
    let wide = sentinel_length == 25;

    let mut out = MAGIC.to_vec();
    out.extend_from_slice(&[0x1a, 0x00]);
    out.write_u32::<LittleEndian>(version).unwrap();
    for node in nodes {
        write_node(&mut out, node, wide, sentinel_length);
    }
    out.extend(std::iter::repeat(0u8).take(sentinel_length));
    out
}

pub(crate) fn model(id: i64, name: &str, class: &str) -> NodeBuilder {
    NodeBuilder::new("Model")
        .property(PropertyValue::SignedInt64(id))
        .property(PropertyValue::String(format!("{}\x00\x01Model", name)))
        .property(PropertyValue::String(class.to_string()))
}

pub(crate) fn geometry(id: i64, name: &str, vertices: &[f64], polygon_vertex_index: &[i32]) -> NodeBuilder {
    NodeBuilder::new("Geometry")
        .property(PropertyValue::SignedInt64(id))
        .property(PropertyValue::String(format!("{}\x00\x01Geometry", name)))
        .property(PropertyValue::String("Mesh".to_string()))
        .child(NodeBuilder::new("Vertices").property(PropertyValue::DoubleArray(vertices.to_vec())))
        .child(NodeBuilder::new("PolygonVertexIndex").property(PropertyValue::SignedInt32Array(polygon_vertex_index.to_vec())))
}

pub(crate) fn connection(child: i64, parent: i64) -> NodeBuilder {
    NodeBuilder::new("C")
        .property(PropertyValue::String("OO".to_string()))
        .property(PropertyValue::SignedInt64(child))
        .property(PropertyValue::SignedInt64(parent))
}

pub(crate) fn scene_document(version: u32, objects: Vec<NodeBuilder>, connections: Vec<NodeBuilder>) -> Vec<u8> {
    let objects = objects.into_iter().fold(NodeBuilder::new("Objects"), |node, child| node.child(child));
    let connections = connections.into_iter().fold(NodeBuilder::new("Connections"), |node, child| node.child(child));
    write_document(version, &[
        NodeBuilder::new("FBXHeaderExtension")
            .child(NodeBuilder::new("FBXVersion").property(PropertyValue::SignedInt32(version as i32))),
        objects,
        connections,
    ])
}

/// Writes `bytes` to a file in the temp directory unique to `name` and this process.
pub(crate) fn write_temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("fbxview-{}-{}.fbx", std::process::id(), name));
    std::fs::write(&path, bytes).unwrap();
    path
}
