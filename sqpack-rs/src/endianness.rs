use crate::error::SqPackError;
use std::fmt;
use std::str::FromStr;

/// Byte order applied to every multi-byte decode of a [`BinaryReader`].
///
/// Accepts either a symbolic name (`little`, `big`, `native`, `network`) or
/// the single-character byte-order codes `<`, `>`, `@`, `=` and `!`.
///
/// [`BinaryReader`]: crate::binary_reader::BinaryReader
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
    /// Byte order of the host the crate was compiled for.
    Native,
    /// Network byte order, which is big-endian.
    Network,
}

impl Endianness {
    /// Returns `true` when values are decoded least significant byte first.
    pub fn is_little(self) -> bool {
        match self {
            Endianness::Little => true,
            Endianness::Big | Endianness::Network => false,
            Endianness::Native => cfg!(target_endian = "little"),
        }
    }

    /// The symbolic name of this byte order.
    pub fn name(self) -> &'static str {
        match self {
            Endianness::Little => "little",
            Endianness::Big => "big",
            Endianness::Native => "native",
            Endianness::Network => "network",
        }
    }

    fn from_code(code: char) -> Option<Self> {
        match code {
            '<' => Some(Endianness::Little),
            '>' => Some(Endianness::Big),
            '@' | '=' => Some(Endianness::Native),
            '!' => Some(Endianness::Network),
            _ => None,
        }
    }
}

/// Parses a byte-order name or a one-character code.
///
/// Only the codes `<`, `>`, `@`, `=` and `!` are recognised; any other single
/// character is refused with [`SqPackError::InvalidEndianness`], as is any
/// longer token that is not one of the four names.
impl FromStr for Endianness {
    type Err = SqPackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "little" => return Ok(Endianness::Little),
            "big" => return Ok(Endianness::Big),
            "native" => return Ok(Endianness::Native),
            "network" => return Ok(Endianness::Network),
            _ => {}
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Self::from_code(code),
            _ => None,
        }
        .ok_or_else(|| SqPackError::InvalidEndianness(s.to_string()))
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_codes() {
        assert_eq!("little".parse::<Endianness>().unwrap(), Endianness::Little);
        assert_eq!("network".parse::<Endianness>().unwrap(), Endianness::Network);
        assert_eq!(">".parse::<Endianness>().unwrap(), Endianness::Big);
        assert_eq!("=".parse::<Endianness>().unwrap(), Endianness::Native);
        assert!(!Endianness::Network.is_little());
    }

    #[test]
    fn rejects_unknown_tokens() {
        for token in ["", "middle", "<>", "x"] {
            match token.parse::<Endianness>() {
                Err(SqPackError::InvalidEndianness(t)) => assert_eq!(t, token),
                other => panic!("unexpected result for {token:?}: {other:?}"),
            }
        }
    }
}
