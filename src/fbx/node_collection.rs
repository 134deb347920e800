use multimap::MultiMap;
use crate::fbx::node::NodeRecord;

/// Node records indexed by name. Records sharing a name keep their file order.
#[derive(Debug, Default)]
pub struct NodeCollection {
    nodes: MultiMap<String, NodeRecord>,
}

#[derive(Debug, PartialEq)]
pub enum LookupError {
    MultipleValuesExist,
    NoSuchNode,
}

impl NodeCollection {
    pub fn new() -> Self {
        NodeCollection {
            nodes: MultiMap::new()
        }
    }

    pub fn insert(&mut self, node: NodeRecord) {
        self.nodes.insert(node.name.clone(), node);
    }

    /// Returns the single record called `name`.
    pub fn get(&self, name: &str) -> Result<&NodeRecord, LookupError> {
        match self.nodes.get_vec(name) {
            Some(records) if records.len() == 1 => Ok(&records[0]),
            Some(_) => Err(LookupError::MultipleValuesExist),
            None => Err(LookupError::NoSuchNode)
        }
    }

    pub fn get_multiple(&self, name: &str) -> &[NodeRecord] {
        self.nodes.get_vec(name).map(|records| records.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.iter_all().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
