use crate::fbx::{ParseError, ParseResult, MAX_NODE_DEPTH};
use std::io::{Read, Seek};
use byteorder::{ReadBytesExt, LittleEndian};
use crate::fbx::node_collection::NodeCollection;
use crate::fbx::property::{PropertyValue, parse_properties};

#[derive(Debug)]
pub struct NodeRecord {
    pub(crate) name: String,
    pub(crate) properties: Vec<PropertyValue>,
    pub(crate) children: NodeCollection,
}

/// Width of the record header fields. FBX 7.5 widened them to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RecordLayout {
    wide: bool,
}

impl RecordLayout {
    pub(crate) fn for_version(version: u32) -> Self {
        RecordLayout { wide: version >= 7500 }
    }

    fn read_field(&self, reader: &mut dyn Read) -> ParseResult<u64> {
        if self.wide {
            Ok(reader.read_u64::<LittleEndian>()?)
        } else {
            Ok(reader.read_u32::<LittleEndian>()? as u64)
        }
    }

    /// Size of the all-zero record closing a nested list.
    pub(crate) fn sentinel_length(&self) -> u64 {
        if self.wide { 25 } else { 13 }
    }
}

fn parse_string(reader: &mut dyn Read) -> ParseResult<String> {
    let length = reader.read_u8()? as usize;
    let mut string_bytes = vec![0u8; length];
    reader.read_exact(&mut string_bytes)?;

    Ok(String::from_utf8(string_bytes)?)
}

fn parse_node<R>(reader: &mut R, layout: RecordLayout, file_length: u64, depth: usize) -> ParseResult<Option<NodeRecord>>
    where
        R: Read + Seek
{
    if depth > MAX_NODE_DEPTH {
        return Err(ParseError::ValidationError(format!("node records nested deeper than {} levels", MAX_NODE_DEPTH)));
    }

    let end_offset = layout.read_field(reader)?;
    if end_offset == 0 {
        // Null record
        return Ok(None);
    }

    if end_offset > file_length {
        return Err(ParseError::ValidationError("end offset is outside bounds".to_string()));
    }

    let num_properties = layout.read_field(reader)?;
    let property_length_bytes = layout.read_field(reader)?;
    let name = parse_string(reader)?;

    let property_start_offset = reader.stream_position()?;
    let property_end_offset = property_start_offset.checked_add(property_length_bytes)
        .ok_or_else(|| ParseError::ValidationError(format!("property list length of '{}' overflows", name)))?;
    if property_end_offset > end_offset {
        return Err(ParseError::ValidationError(format!("property list of '{}' is out of bounds", name)));
    }
    let properties = parse_properties(reader, num_properties as usize)?;

    if property_length_bytes != reader.stream_position()? - property_start_offset {
        return Err(ParseError::ValidationError(format!("did not read correct amount of bytes when parsing properties of '{}'", name)));
    }

    let mut children = NodeCollection::new();
    let position = reader.stream_position()?;
    if position < end_offset {
        let sentinel_length = layout.sentinel_length();
        if end_offset - position < sentinel_length {
            return Err(ParseError::ValidationError("insufficient amount of bytes at end of node".to_string()));
        }

        while reader.stream_position()? < end_offset - sentinel_length {
            match parse_node(reader, layout, file_length, depth + 1)? {
                Some(node) => children.insert(node),
                None => return Err(ParseError::ValidationError(format!("unexpected null record inside '{}'", name)))
            }
        }

        let mut sentinel_block = vec![0u8; sentinel_length as usize];
        reader.read_exact(&mut sentinel_block)?;
        if sentinel_block.iter().any(|b| *b != 0) {
            return Err(ParseError::ValidationError("sentinel block contains non-zero values".to_string()));
        }
    }

    if reader.stream_position()? != end_offset {
        return Err(ParseError::ValidationError(format!("end offset of '{}' not reached", name)));
    }

    Ok(Some(NodeRecord {
        name,
        properties,
        children,
    }))
}

pub(crate) fn parse_nodes<R>(reader: &mut R, layout: RecordLayout, file_length: u64) -> ParseResult<NodeCollection>
    where
        R: Read + Seek
{
    let mut result = NodeCollection::new();

    while reader.stream_position()? < file_length {
        match parse_node(reader, layout, file_length, 0)? {
            Some(node) => result.insert(node),
            None => break
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use byteorder::WriteBytesExt;

    const NARROW: RecordLayout = RecordLayout { wide: false };

    /// A narrow record named `name` without properties or children, starting at `offset`.
    fn empty_record(name: &str, offset: u32) -> Vec<u8> {
        let length = 13 + name.len() as u32;
        let mut data = Vec::new();
        data.write_u32::<LittleEndian>(offset + length).unwrap();
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_u8(name.len() as u8).unwrap();
        data.extend_from_slice(name.as_bytes());
        data
    }

    #[test]
    fn record_layout_should_widen_for_7500() {
        assert_eq!(RecordLayout::for_version(7400).sentinel_length(), 13);
        assert_eq!(RecordLayout::for_version(7500).sentinel_length(), 25);
    }

    #[test]
    fn parse_node_should_read_empty_record() {
        // Arrange
        let data = empty_record("Takes", 0);
        let length = data.len() as u64;
        let mut input = Cursor::new(data);

        // Act
        let node = parse_node(&mut input, NARROW, length, 0).unwrap().unwrap();

        // Assert
        assert_eq!(node.name, "Takes");
        assert!(node.properties.is_empty());
        assert!(node.children.is_empty());
        assert_eq!(input.position(), length);
    }

    #[test]
    fn parse_node_should_return_none_for_null_record() {
        let mut input = Cursor::new(vec![0u8; 13]);

        let node = parse_node(&mut input, NARROW, 13, 0).unwrap();

        assert!(node.is_none());
    }

    #[test]
    fn parse_node_should_reject_end_offset_outside_file() {
        // Arrange
        let mut data = empty_record("Takes", 0);
        data[0] = 200;
        let length = data.len() as u64;

        // Act
        let result = parse_node(&mut Cursor::new(data), NARROW, length, 0);

        // Assert
        assert!(matches!(result, Err(ParseError::ValidationError(_))));
    }

    #[test]
    fn parse_node_should_reject_non_zero_sentinel() {
        // Arrange
        // parent header (13 + 6 bytes) + child (13 + 5 bytes) + sentinel (13 bytes)
        let mut data = Vec::new();
        data.write_u32::<LittleEndian>(19 + 18 + 13).unwrap();
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_u8(6).unwrap();
        data.extend_from_slice(b"Parent");
        data.append(&mut empty_record("Child", 19));
        let mut sentinel = vec![0u8; 13];
        sentinel[5] = 1;
        data.append(&mut sentinel);
        let length = data.len() as u64;

        // Act
        let result = parse_node(&mut Cursor::new(data), NARROW, length, 0);

        // Assert
        assert!(matches!(result, Err(ParseError::ValidationError(_))));
    }

    #[test]
    fn parse_nodes_should_stop_at_null_record() {
        // Arrange
        let mut data = empty_record("Documents", 0);
        let offset = data.len() as u32;
        data.append(&mut empty_record("Objects", offset));
        data.append(&mut vec![0u8; 13]);
        // footer garbage after the null record is never looked at
        data.append(&mut vec![0xfau8; 16]);
        let length = data.len() as u64;

        // Act
        let nodes = parse_nodes(&mut Cursor::new(data), NARROW, length).unwrap();

        // Assert
        assert_eq!(nodes.len(), 2);
        assert!(nodes.get("Documents").is_ok());
        assert!(nodes.get("Objects").is_ok());
    }

    #[test]
    fn parse_node_should_reject_property_length_overflow() {
        // Arrange
        let mut data = Vec::new();
        data.write_u64::<LittleEndian>(25 + 5).unwrap();
        data.write_u64::<LittleEndian>(0).unwrap();
        data.write_u64::<LittleEndian>(u64::MAX).unwrap();
        data.write_u8(5).unwrap();
        data.extend_from_slice(b"Takes");
        let length = data.len() as u64;

        // Act
        let result = parse_node(&mut Cursor::new(data), RecordLayout::for_version(7500), length, 0);

        // Assert
        assert!(matches!(result, Err(ParseError::ValidationError(_))));
    }

    /// `count` single-letter records, each nested in the previous one.
    fn nested_records(count: u32) -> Vec<u8> {
        let innermost_end = 14 * count;
        let mut data = Vec::new();
        for level in 0..count {
            data.write_u32::<LittleEndian>(innermost_end + 13 * (count - 1 - level)).unwrap();
            data.write_u32::<LittleEndian>(0).unwrap();
            data.write_u32::<LittleEndian>(0).unwrap();
            data.write_u8(1).unwrap();
            data.push(b'N');
        }
        data.append(&mut vec![0u8; 13 * (count as usize - 1)]);
        data
    }

    #[test]
    fn parse_nodes_should_accept_moderate_nesting() {
        let data = nested_records(10);
        let length = data.len() as u64;

        let nodes = parse_nodes(&mut Cursor::new(data), NARROW, length).unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes.get("N").unwrap().children.len(), 1);
    }

    #[test]
    fn parse_nodes_should_reject_excessive_nesting() {
        // Arrange
        let data = nested_records(MAX_NODE_DEPTH as u32 + 10);
        let length = data.len() as u64;

        // Act
        let result = parse_nodes(&mut Cursor::new(data), NARROW, length);

        // Assert
        assert!(matches!(result, Err(ParseError::ValidationError(_))));
    }
}
