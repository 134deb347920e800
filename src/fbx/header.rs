use std::io::{Read, Seek, SeekFrom};
use crate::fbx::{ParseResult, ParseError};
use byteorder::{ReadBytesExt, LittleEndian};

pub(crate) const MAGIC: &[u8; 21] = b"Kaydara FBX Binary  \0";

/// Files older than 7.0 do not use the Objects/Connections layout.
pub(crate) const MIN_SUPPORTED_VERSION: u32 = 7000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    pub(crate) version: u32,
}

pub(crate) fn parse_header<R>(reader: &mut R) -> ParseResult<Header>
    where
        R: Read + Seek
{
    let mut magic = [0u8; 21];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(ParseError::ValidationError("not a binary FBX file (header magic string is incorrect)".to_string()));
    }
    // Skip past unknown bytes
    reader.seek(SeekFrom::Current(2))?;

    let version = reader.read_u32::<LittleEndian>()?;
    if version < MIN_SUPPORTED_VERSION {
        return Err(ParseError::ValidationError(format!("unsupported FBX version {}", version)));
    }

    Ok(Header { version })
}
