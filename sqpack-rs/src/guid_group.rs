use crate::error::SqPackError;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A composite identifier made of a GUID, a 32-bit hash and a 64-bit part number.
///
/// Rendered as `{guid}:{hash:08x}:{part}`, e.g.
/// `00112233-4455-6677-8899-aabbccddeeff:0000beef:3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuidGroup {
    /// The identifier part of the group.
    pub guid: Uuid,
    /// Checksum or tag attached to the identifier.
    pub hash: u32,
    /// Sequence or part number.
    pub part: u64,
}

impl GuidGroup {
    pub fn new(guid: Uuid, hash: u32, part: u64) -> Self {
        Self { guid, hash, part }
    }
}

impl fmt::Display for GuidGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:08x}:{}", self.guid, self.hash, self.part)
    }
}

impl FromStr for GuidGroup {
    type Err = SqPackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SqPackError::InvalidData(format!("Malformed GUID group '{s}'"));

        let mut parts = s.split(':');
        let (Some(guid), Some(hash), Some(part), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let guid = Uuid::parse_str(guid).map_err(|_| invalid())?;
        let hash = u32::from_str_radix(hash, 16).map_err(|_| invalid())?;
        let part = part.parse::<u64>().map_err(|_| invalid())?;
        Ok(Self { guid, hash, part })
    }
}
