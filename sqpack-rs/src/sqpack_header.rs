use crate::binary_read::BinaryRead;
use crate::binary_reader::BinaryReader;
use crate::error::{Result, SqPackError};
use crate::sqpack_platform::SqPackPlatform;
use std::io::{Read, Seek};

/// Magic bytes at the start of every SqPack file.
pub const SQPACK_MAGIC: [u8; 8] = *b"SqPack\0\0";

/// The fixed header at the start of a SqPack index file.
///
/// | Offset | Size | Field    |
/// |--------|------|----------|
/// | 0x00   | 8    | magic    |
/// | 0x08   | 1    | platform |
/// | 0x09   | 3    | padding  |
/// | 0x0C   | 4    | size     |
/// | 0x10   | 4    | version  |
/// | 0x14   | 4    | type     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqPackHeader {
    /// File magic, `SqPack\0\0` for valid archives.
    pub magic: [u8; 8],
    /// Target platform of the archive.
    pub platform: SqPackPlatform,
    /// Unused bytes after the platform tag.
    pub padding: [u8; 3],
    /// Size of the header in bytes.
    pub size: u32,
    /// Header format version.
    pub version: u32,
    /// Kind of SqPack file (index, data, ...).
    pub index_type: u32,
}

impl SqPackHeader {
    /// Number of bytes the header occupies on disk.
    pub const SIZE: usize = 24;

    /// Checks that the magic identifies a SqPack file.
    pub fn validate(&self) -> Result<()> {
        if self.magic != SQPACK_MAGIC {
            return Err(SqPackError::InvalidData(format!(
                "Invalid SqPack magic: {}",
                hex::encode(self.magic)
            )));
        }
        Ok(())
    }
}

impl BinaryRead for SqPackHeader {
    fn read_from<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let magic = reader.read_byte_array::<8>()?;
        let platform = SqPackPlatform::from(reader.read_u8()?);
        let padding = reader.read_byte_array::<3>()?;
        let size = reader.read_u32()?;
        let version = reader.read_u32()?;
        let index_type = reader.read_u32()?;

        Ok(Self {
            magic,
            platform,
            padding,
            size,
            version,
            index_type,
        })
    }
}
