use std::io::{Read, Seek};
use std::str::Utf8Error;
use std::string::FromUtf8Error;
use thiserror::Error;
use crate::fbx::header::Header;
use crate::fbx::node::{parse_nodes, RecordLayout};
use crate::fbx::node_collection::NodeCollection;

mod graph;
mod header;
mod node;
mod node_collection;
mod property;
mod sdk;
#[cfg(test)]
pub(crate) mod test_writer;

pub use graph::{AttributeType, MeshAttribute, Node, SceneGraph};
pub use sdk::{IoSettings, Sdk, Status, StatusCode};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    ValidationError(String),
    #[error("malformed data: {0}")]
    FormatError(String),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl From<Utf8Error> for ParseError {
    fn from(e: Utf8Error) -> Self {
        ParseError::FormatError(e.to_string())
    }
}

impl From<FromUtf8Error> for ParseError {
    fn from(e: FromUtf8Error) -> Self {
        ParseError::FormatError(e.to_string())
    }
}

type ParseResult<T> = Result<T, ParseError>;

/// Deepest nesting accepted for node records and for the model hierarchy.
pub const MAX_NODE_DEPTH: usize = 256;

/// The top-level node records of a binary FBX file.
pub(crate) struct Document {
    pub(crate) header: Header,
    pub(crate) nodes: NodeCollection,
}

/// Reads the node records following an already parsed header. The reader must be
/// positioned right after the header.
pub(crate) fn parse_body<R>(reader: &mut R, header: Header, file_length: u64) -> ParseResult<Document>
    where
        R: Read + Seek
{
    let layout = RecordLayout::for_version(header.version);
    let nodes = parse_nodes(reader, layout, file_length)?;

    Ok(Document { header, nodes })
}
