use crate::binary_reader::BinaryReader;
use crate::error::Result;
use crate::guid_group::GuidGroup;
use std::io::{Read, Seek};
use uuid::Uuid;

/// A type that can be decoded from a [`BinaryReader`] at its current position.
///
/// Implementations honour the reader's active byte order and advance it by
/// exactly the number of bytes they consume. Used through
/// [`BinaryReader::read_struct`] and [`BinaryReader::read_array`].
pub trait BinaryRead: Sized {
    fn read_from<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Self>;
}

macro_rules! impl_binary_read {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl BinaryRead for $ty {
                fn read_from<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Self> {
                    reader.$method()
                }
            }
        )*
    };
}

impl_binary_read! {
    u8 => read_u8,
    i8 => read_i8,
    bool => read_bool,
    u16 => read_u16,
    i16 => read_i16,
    u32 => read_u32,
    i32 => read_i32,
    u64 => read_u64,
    i64 => read_i64,
    f32 => read_f32,
    f64 => read_f64,
    Uuid => read_guid,
    GuidGroup => read_guid_group,
}

impl<const N: usize> BinaryRead for [u8; N] {
    fn read_from<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Self> {
        reader.read_byte_array::<N>()
    }
}
