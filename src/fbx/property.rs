use crate::fbx::{ParseError, ParseResult};
use std::io::{Read, Cursor};
use byteorder::{LittleEndian, ReadBytesExt};

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    SignedInt16(i16),
    Boolean(bool),
    SignedInt32(i32),
    Float(f32),
    Double(f64),
    SignedInt64(i64),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    SignedInt64Array(Vec<i64>),
    SignedInt32Array(Vec<i32>),
    BooleanArray(Vec<bool>),
    String(String),
    BinaryData(Vec<u8>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None
        }
    }

    /// Object ids are 64-bit, older exporters occasionally write them as 32-bit.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::SignedInt64(x) => Some(*x),
            PropertyValue::SignedInt32(x) => Some(*x as i64),
            _ => None
        }
    }

    /// Coordinates are normally doubles but single precision arrays are accepted too.
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            PropertyValue::DoubleArray(values) => Some(values.clone()),
            PropertyValue::FloatArray(values) => Some(values.iter().map(|x| *x as f64).collect()),
            _ => None
        }
    }

    pub fn as_i32_slice(&self) -> Option<&[i32]> {
        match self {
            PropertyValue::SignedInt32Array(values) => Some(values),
            _ => None
        }
    }

    pub(crate) fn type_code(&self) -> u8 {
        match self {
            PropertyValue::SignedInt16(_) => b'Y',
            PropertyValue::Boolean(_) => b'C',
            PropertyValue::SignedInt32(_) => b'I',
            PropertyValue::Float(_) => b'F',
            PropertyValue::Double(_) => b'D',
            PropertyValue::SignedInt64(_) => b'L',
            PropertyValue::FloatArray(_) => b'f',
            PropertyValue::DoubleArray(_) => b'd',
            PropertyValue::SignedInt64Array(_) => b'l',
            PropertyValue::SignedInt32Array(_) => b'i',
            PropertyValue::BooleanArray(_) => b'b',
            PropertyValue::String(_) => b'S',
            PropertyValue::BinaryData(_) => b'R',
        }
    }
}

fn parse_i16_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let value = reader.read_i16::<LittleEndian>()?;
    Ok(PropertyValue::SignedInt16(value))
}

fn parse_i32_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let value = reader.read_i32::<LittleEndian>()?;
    Ok(PropertyValue::SignedInt32(value))
}

fn parse_i64_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let value = reader.read_i64::<LittleEndian>()?;
    Ok(PropertyValue::SignedInt64(value))
}

fn parse_f32_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let value = reader.read_f32::<LittleEndian>()?;
    Ok(PropertyValue::Float(value))
}

fn parse_f64_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let value = reader.read_f64::<LittleEndian>()?;
    Ok(PropertyValue::Double(value))
}

fn parse_bool_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let value = reader.read_u8()?;
    Ok(PropertyValue::Boolean(value == 1))
}

struct ArrayMetaData {
    length: u32,
    encoding: u32,
    compressed_length: u32,
}

fn parse_array_metadata(reader: &mut dyn Read) -> ParseResult<ArrayMetaData> {
    let length = reader.read_u32::<LittleEndian>()?;
    let encoding = reader.read_u32::<LittleEndian>()?;
    let compressed_length = reader.read_u32::<LittleEndian>()?;

    Ok(ArrayMetaData {
        length,
        encoding,
        compressed_length
    })
}

/// Reads the payload of an array property, inflating it when it is zlib encoded.
fn get_property_raw_byte_cursor<T>(reader: &mut dyn Read) -> ParseResult<Cursor<Vec<u8>>> {
    let metadata = parse_array_metadata(reader)?;
    let byte_count = std::mem::size_of::<T>() * metadata.length as usize;
    match metadata.encoding {
        0 => {
            let mut array = vec![0u8; byte_count];
            reader.read_exact(&mut array)?;
            Ok(Cursor::new(array))
        }
        1 => {
            let mut deflated_data = vec![0u8; metadata.compressed_length as usize];
            reader.read_exact(&mut deflated_data)?;
            let inflated_data = inflate::inflate_bytes_zlib(&deflated_data)
                .map_err(ParseError::FormatError)?;
            if inflated_data.len() != byte_count {
                return Err(ParseError::FormatError(format!(
                    "array should hold {} bytes but inflated to {}", byte_count, inflated_data.len())));
            }
            Ok(Cursor::new(inflated_data))
        }
        other => Err(ParseError::FormatError(format!("unknown array encoding {}", other)))
    }
}

fn apply_transform_on_byte_stream<T>(input: &mut Cursor<Vec<u8>>, transform: &dyn Fn(&mut Cursor<Vec<u8>>) -> ParseResult<T>) -> ParseResult<Vec<T>> {
    let elements = input.get_ref().len() / std::mem::size_of::<T>();
    let mut array = Vec::with_capacity(elements);
    for _ in 0..elements {
        array.push(transform(input)?);
    }

    Ok(array)
}

fn parse_f32_array_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let mut cursor = get_property_raw_byte_cursor::<f32>(reader)?;
    let array = apply_transform_on_byte_stream(
        &mut cursor,
        &|x| Ok(x.read_f32::<LittleEndian>()?))?;

    Ok(PropertyValue::FloatArray(array))
}

fn parse_f64_array_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let mut cursor = get_property_raw_byte_cursor::<f64>(reader)?;
    let array = apply_transform_on_byte_stream(
        &mut cursor,
        &|x| Ok(x.read_f64::<LittleEndian>()?))?;

    Ok(PropertyValue::DoubleArray(array))
}

fn parse_i64_array_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let mut cursor = get_property_raw_byte_cursor::<i64>(reader)?;
    let array = apply_transform_on_byte_stream(
        &mut cursor,
        &|x| Ok(x.read_i64::<LittleEndian>()?))?;

    Ok(PropertyValue::SignedInt64Array(array))
}

fn parse_i32_array_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let mut cursor = get_property_raw_byte_cursor::<i32>(reader)?;
    let array = apply_transform_on_byte_stream(
        &mut cursor,
        &|x| Ok(x.read_i32::<LittleEndian>()?))?;

    Ok(PropertyValue::SignedInt32Array(array))
}

fn parse_bool_array_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let mut cursor = get_property_raw_byte_cursor::<bool>(reader)?;
    let array = apply_transform_on_byte_stream(
        &mut cursor,
        &|x| Ok(x.read_u8()? == 1))?;

    Ok(PropertyValue::BooleanArray(array))
}

fn parse_string_property(reader: &mut dyn Read) -> ParseResult<PropertyValue> {
    let length = reader.read_u32::<LittleEndian>()? as usize;
    let mut bytes = vec![0u8; length];
    reader.read_exact(&mut bytes)?;

    // Object names are stored as [name][0x00 0x01][class]; only the name is kept.
    let name_length = bytes.iter().position(|x| *x == 0).unwrap_or(bytes.len());

    Ok(PropertyValue::String(String::from_utf8_lossy(&bytes[..name_length]).into_owned()))
}

fn parse_binary_data_property(reader: &mut dyn Read) -> ParseResult<PropertyValue> {
    let length = reader.read_u32::<LittleEndian>()? as usize;
    let mut bytes = vec![0u8; length];
    reader.read_exact(&mut bytes)?;
    Ok(PropertyValue::BinaryData(bytes))
}

fn parse_property(reader: &mut dyn Read) -> ParseResult<PropertyValue>
{
    let type_code = reader.read_u8()?;

    match type_code {
        b'Y' => parse_i16_property(reader),
        b'C' => parse_bool_property(reader),
        b'I' => parse_i32_property(reader),
        b'F' => parse_f32_property(reader),
        b'D' => parse_f64_property(reader),
        b'L' => parse_i64_property(reader),
        b'f' => parse_f32_array_property(reader),
        b'd' => parse_f64_array_property(reader),
        b'l' => parse_i64_array_property(reader),
        b'i' => parse_i32_array_property(reader),
        b'b' => parse_bool_array_property(reader),
        b'S' => parse_string_property(reader),
        b'R' => parse_binary_data_property(reader),
        other => Err(ParseError::FormatError(format!("unexpected property type code 0x{:02x}", other)))
    }
}

pub(crate) fn parse_properties(reader: &mut dyn Read, num_properties: usize) -> ParseResult<Vec<PropertyValue>>
{
    let mut result = Vec::with_capacity(num_properties.min(64));
    for _ in 0..num_properties {
        result.push(parse_property(reader)?);
    }

    Ok(result)
}
