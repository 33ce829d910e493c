/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SqPackError>;

/// Represents all possible errors that can occur while reading SqPack data.
///
/// Decoding failures carry the stream position at which the failing read
/// started so that callers can report where a malformed record lives.
#[derive(Debug)]
pub enum SqPackError {
    /// The endianness token was neither a known name nor a byte-order code.
    InvalidEndianness(String),
    /// Fewer bytes were available than a fixed-width decode requires.
    UnexpectedEndOfStream {
        /// Number of bytes the decode asked for.
        requested: usize,
        /// Position at which the read started.
        position: u64,
    },
    /// The bytes were not valid under the declared text encoding.
    StringDecode {
        /// Position of the first byte of the string.
        position: u64,
        /// Description of the decoding failure.
        reason: String,
    },
    /// A variable-length integer ran past the byte cap or out of 64-bit range.
    VarIntOverflow {
        /// Maximum number of bytes accepted.
        limit: usize,
        /// Position of the first byte of the integer.
        position: u64,
    },
    /// A validated offset setter received a negative value.
    NegativeOffset(i64),
    /// The reader has already been closed.
    StreamClosed,
    /// The data read from an archive does not match its expected layout.
    InvalidData(String),
    /// A file that was expected on disk could not be found.
    FileNotFound(String),
    /// Configuration was missing or malformed.
    Config(String),
    /// Represents an error that occurs during I/O operations.
    Io(std::io::Error),
}

impl std::fmt::Display for SqPackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqPackError::InvalidEndianness(token) => write!(f, "Invalid endianness '{token}'"),
            SqPackError::UnexpectedEndOfStream {
                requested,
                position,
            } => write!(
                f,
                "Unexpected end of stream: {requested} bytes requested at {position:#X}"
            ),
            SqPackError::StringDecode { position, reason } => {
                write!(f, "String decode error at {position:#X}: {reason}")
            }
            SqPackError::VarIntOverflow { limit, position } => write!(
                f,
                "Variable-length integer at {position:#X} exceeds {limit} bytes"
            ),
            SqPackError::NegativeOffset(n) => write!(f, "Offset must not be negative: {n}"),
            SqPackError::StreamClosed => write!(f, "Stream is closed"),
            SqPackError::InvalidData(err) => write!(f, "Invalid data: {err}"),
            SqPackError::FileNotFound(name) => write!(f, "File not found: {name}"),
            SqPackError::Config(err) => write!(f, "Configuration error: {err}"),
            SqPackError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for SqPackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SqPackError::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Allows automatic conversion from `std::io::Error` to `SqPackError`.
impl From<std::io::Error> for SqPackError {
    fn from(error: std::io::Error) -> Self {
        SqPackError::Io(error)
    }
}
