//! # sqpack-rs
//!
//! `sqpack-rs` is a pure Rust toolkit for decoding Square Enix SqPack archives.
//! Its core is [`BinaryReader`](binary_reader::BinaryReader), a reading head
//! over any seekable byte stream that understands relative pointers,
//! variable-length integers, aligned fields, GUIDs and runtime-selectable
//! byte order.
//!
//! ## Features
//! - Little, big, native and network byte order, switchable at any time
//! - Marks for checkpointing and restoring positions
//! - Record-relative alignment and forward pattern search
//! - Locating repositories and reading index headers from a game installation
//!
//! ## Usage
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! sqpack-rs = "0.1"
//! ```
//!
//! ### Example: Decoding a Record
//! ```rust
//! use sqpack_rs::binary_reader::BinaryReader;
//! use sqpack_rs::endianness::Endianness;
//!
//! let data = vec![0x00, 0x00, 0x00, 0x08, 0xAC, 0x02, 0x01, 0x00];
//! let mut reader = BinaryReader::load(data, Endianness::Big);
//!
//! let pointer = reader.read_pointer(false).unwrap();
//! assert_eq!(pointer, 8);
//! assert_eq!(reader.read_var_int().unwrap(), 300);
//!
//! reader.set_endianness("little").unwrap();
//! assert_eq!(reader.read_u16().unwrap(), 1);
//! ```

pub mod binary_read;
pub mod binary_reader;
pub mod endianness;
pub mod error;
mod ext;
pub mod guid_group;
pub mod sqpack_config;
pub mod sqpack_header;
pub mod sqpack_platform;
pub mod sqpack_storage;
mod utility;

pub use binary_read::BinaryRead;
pub use binary_reader::BinaryReader;
pub use endianness::Endianness;
pub use error::{Result, SqPackError};
pub use guid_group::GuidGroup;
