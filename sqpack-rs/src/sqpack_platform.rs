use std::fmt;

/// The platform an archive index was built for.
///
/// Stored as a single byte directly after the file magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqPackPlatform {
    /// Windows build.
    Win32,
    /// PlayStation 3 build.
    Ps3,
    /// PlayStation 4 build.
    Ps4,
    /// Unknown platform, stores the raw byte value.
    Unknown(u8),
}

impl From<u8> for SqPackPlatform {
    fn from(byte: u8) -> Self {
        match byte {
            0 => SqPackPlatform::Win32,
            1 => SqPackPlatform::Ps3,
            2 => SqPackPlatform::Ps4,
            other => SqPackPlatform::Unknown(other),
        }
    }
}

impl fmt::Display for SqPackPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqPackPlatform::Win32 => f.write_str("win32"),
            SqPackPlatform::Ps3 => f.write_str("ps3"),
            SqPackPlatform::Ps4 => f.write_str("ps4"),
            SqPackPlatform::Unknown(byte) => write!(f, "unknown({byte:#04X})"),
        }
    }
}
