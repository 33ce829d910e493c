use crate::binary_read::BinaryRead;
use crate::endianness::Endianness;
use crate::error::{Result, SqPackError};
use crate::ext::io_ext::{ReadExt, SeekExt};
use crate::guid_group::GuidGroup;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use uuid::Uuid;

/// Alignment used by archive records when no other boundary is specified.
pub const DEFAULT_ALIGNMENT: u64 = 16;

/// Maximum number of bytes a variable-length integer may occupy.
///
/// Ten 7-bit groups cover the full 64-bit range.
pub const VAR_INT_MAX_BYTES: usize = 10;

/// A reading head over a seekable byte stream.
///
/// `BinaryReader` decodes fixed-width primitives, length-prefixed strings,
/// variable-length integers, GUIDs and relative pointers, all under a byte
/// order that can be switched at any time. On top of the stream position it
/// tracks a `base_offset` (used for display and alignment), an `entry_offset`
/// (the start of the current record, which [`align`](Self::align) measures
/// from) and a stack of marks for checkpointing.
///
/// ```rust
/// use sqpack_rs::binary_reader::BinaryReader;
/// use sqpack_rs::endianness::Endianness;
///
/// let mut reader = BinaryReader::load(vec![0x01, 0x00, 0x00, 0x00, 0x2A], Endianness::Little);
/// assert_eq!(reader.read_u32().unwrap(), 1);
/// assert_eq!(reader.read_u8().unwrap(), 42);
/// ```
///
/// # Thread Safety
///
/// `BinaryReader` keeps its position and marks without any internal locking.
/// It may be moved to another thread when the stream allows it, but sharing a
/// single reader between threads requires wrapping the whole reader in a
/// mutex. Prefer one reader per thread.
///
/// # Lifecycle
///
/// The reader owns its stream. [`close`](Self::close) releases it and may be
/// called any number of times; dropping the reader releases it as well. Every
/// read on a closed reader fails with [`SqPackError::StreamClosed`].
#[derive(Debug)]
pub struct BinaryReader<R: Read + Seek> {
    /// The underlying stream, `None` once closed.
    stream: Option<R>,
    /// Byte order applied to multi-byte decodes.
    endianness: Endianness,
    /// Offset added to the position for display and alignment.
    base_offset: u64,
    /// Reference point for alignment, usually the start of a record.
    entry_offset: u64,
    /// Saved positions, last in first out.
    marks: Vec<u64>,
}

impl BinaryReader<BufReader<File>> {
    /// Opens the file at `path` for reading.
    pub fn open<P: AsRef<Path>>(path: P, endianness: Endianness) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SqPackError::FileNotFound(path.display().to_string()),
            _ => SqPackError::Io(e),
        })?;
        tracing::debug!(path = %path.display(), %endianness, "opened reader");
        Ok(Self::new(BufReader::new(file), endianness))
    }
}

impl BinaryReader<Cursor<Vec<u8>>> {
    /// Creates a reader over an in-memory buffer.
    pub fn load<D: Into<Vec<u8>>>(data: D, endianness: Endianness) -> Self {
        Self::new(Cursor::new(data.into()), endianness)
    }
}

impl<R: Read + Seek> BinaryReader<R> {
    pub fn new(stream: R, endianness: Endianness) -> Self {
        Self {
            stream: Some(stream),
            endianness,
            base_offset: 0,
            entry_offset: 0,
            marks: Vec::new(),
        }
    }

    fn stream(&mut self) -> Result<&mut R> {
        self.stream.as_mut().ok_or(SqPackError::StreamClosed)
    }

    /// Releases the stream. Calling this on a closed reader does nothing.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::trace!("closed reader");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Consumes the reader, handing back the stream if it is still open.
    pub fn into_inner(mut self) -> Option<R> {
        self.stream.take()
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Selects the byte order from a name (`little`, `big`, `native`,
    /// `network`) or a single byte-order code (`<`, `>`, `@`, `=`, `!`).
    pub fn set_endianness(&mut self, token: &str) -> Result<&mut Self> {
        self.endianness = token.parse()?;
        Ok(self)
    }

    pub fn set_byte_order(&mut self, endianness: Endianness) -> &mut Self {
        self.endianness = endianness;
        self
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.stream()?.stream_position()?)
    }

    /// Moves to the absolute position `pos`. Positions past the end are
    /// accepted and only surface on the next read.
    pub fn set_position(&mut self, pos: u64) -> Result<&mut Self> {
        self.stream()?.seek(SeekFrom::Start(pos))?;
        Ok(self)
    }

    /// Moves the position by `delta` bytes.
    pub fn skip(&mut self, delta: i64) -> Result<&mut Self> {
        let stream = self.stream()?;
        if delta != 0 {
            stream.skip(delta)?;
        }
        Ok(self)
    }

    /// Total length of the stream in bytes.
    pub fn length(&mut self) -> Result<u64> {
        Ok(self.stream()?.stream_length()?)
    }

    /// Bytes left between the current position and the end of the stream.
    pub fn remaining(&mut self) -> Result<u64> {
        let pos = self.position()?;
        Ok(self.length()?.saturating_sub(pos))
    }

    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Sets the base offset. Negative values are ignored and leave the
    /// current value in place; use [`try_set_base_offset`](Self::try_set_base_offset)
    /// to reject them instead.
    pub fn set_base_offset(&mut self, offset: i64) -> &mut Self {
        match u64::try_from(offset) {
            Ok(offset) => self.base_offset = offset,
            Err(_) => tracing::warn!(offset, "ignoring negative base offset"),
        }
        self
    }

    pub fn try_set_base_offset(&mut self, offset: i64) -> Result<&mut Self> {
        self.base_offset = u64::try_from(offset).map_err(|_| SqPackError::NegativeOffset(offset))?;
        Ok(self)
    }

    pub fn entry_offset(&self) -> u64 {
        self.entry_offset
    }

    /// Sets the entry offset used by [`align`](Self::align).
    ///
    /// `None` captures the current position. Negative values are ignored.
    pub fn set_entry_offset(&mut self, offset: Option<i64>) -> Result<&mut Self> {
        match offset {
            None => self.entry_offset = self.position()?,
            Some(offset) => match u64::try_from(offset) {
                Ok(offset) => self.entry_offset = offset,
                Err(_) => tracing::warn!(offset, "ignoring negative entry offset"),
            },
        }
        Ok(self)
    }

    pub fn try_set_entry_offset(&mut self, offset: i64) -> Result<&mut Self> {
        self.entry_offset =
            u64::try_from(offset).map_err(|_| SqPackError::NegativeOffset(offset))?;
        Ok(self)
    }

    /// Pushes the current position onto the mark stack.
    pub fn mark(&mut self) -> Result<&mut Self> {
        let pos = self.position()?;
        self.marks.push(pos);
        Ok(self)
    }

    /// Removes and returns the most recent mark.
    pub fn pop(&mut self) -> Option<u64> {
        self.marks.pop()
    }

    /// Returns the most recent mark without removing it.
    pub fn peek_mark(&self) -> Option<u64> {
        self.marks.last().copied()
    }

    pub fn mark_depth(&self) -> usize {
        self.marks.len()
    }

    /// Pops the most recent mark and seeks back to it.
    pub fn reset(&mut self) -> Result<&mut Self> {
        self.reset_with(true, 0)
    }

    /// Seeks to the most recent mark plus `adjust`, removing the mark when
    /// `pop` is set. Does nothing when no mark has been recorded.
    pub fn reset_with(&mut self, pop: bool, adjust: i64) -> Result<&mut Self> {
        if let Some(mark) = self.peek_mark() {
            let target = mark.checked_add_signed(adjust).ok_or_else(|| {
                SqPackError::InvalidData(format!("Mark {mark:#X} adjusted by {adjust} is out of range"))
            })?;
            if pop {
                self.marks.pop();
            }
            self.set_position(target)?;
        }
        Ok(self)
    }

    /// Advances to the next multiple of `n`, measured from `entry_offset`
    /// and shifted by `base_offset`. Alignments of 0 or 1 do nothing.
    pub fn align(&mut self, n: u64) -> Result<&mut Self> {
        if n > 1 {
            let pos = self.position()?;
            let relative =
                i128::from(pos) - i128::from(self.entry_offset) + i128::from(self.base_offset);
            let rem = relative.rem_euclid(i128::from(n)) as u64;
            if rem > 0 {
                let target = pos.checked_add(n - rem).ok_or_else(|| {
                    SqPackError::InvalidData(format!("Aligning {pos:#X} to {n} is out of range"))
                })?;
                self.set_position(target)?;
            }
        }
        Ok(self)
    }

    /// Scans forward for `pattern`.
    ///
    /// On a match the position is left at the start of the match, or just
    /// past it when `return_after` is set. When the stream ends first the
    /// original position is restored and `Ok(false)` is returned.
    pub fn find(&mut self, pattern: &[u8], return_after: bool) -> Result<bool> {
        let stream = self.stream()?;
        let start = stream.stream_position()?;
        if pattern.is_empty() {
            return Ok(true);
        }

        let mut matched = 0usize;
        let mut byte = [0u8; 1];
        loop {
            match stream.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }

            if byte[0] == pattern[matched] {
                matched += 1;
                if matched == pattern.len() {
                    let end = stream.stream_position()?;
                    if !return_after {
                        stream.seek(SeekFrom::Current(-(matched as i64)))?;
                    }
                    tracing::trace!(start = end - matched as u64, "pattern found");
                    return Ok(true);
                }
            } else if matched != 0 {
                // Restart one byte after the start of the partial match.
                stream.seek(SeekFrom::Current(-(matched as i64)))?;
                matched = 0;
            }
        }

        stream.seek(SeekFrom::Start(start))?;
        tracing::trace!(start, "pattern not found");
        Ok(false)
    }

    /// Formats the current position as `reader @ 0x0000ABCD`.
    pub fn describe_position(&mut self, with_base: bool) -> Result<String> {
        let mut pos = self.position()?;
        if with_base {
            pos += self.base_offset;
        }
        Ok(format!("reader @ 0x{pos:08X}"))
    }

    /// Emits the current position as a debug event.
    pub fn trace_position(&mut self, with_base: bool) -> Result<()> {
        let location = self.describe_position(with_base)?;
        tracing::debug!("{location}");
        Ok(())
    }

    /// Reads up to `count` bytes. A short result means the stream ended.
    pub fn read(&mut self, count: usize) -> Result<Vec<u8>> {
        Ok(self.stream()?.read_up_to(count)?)
    }

    /// Reads everything from the current position to the end of the stream.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.stream()?.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Peeks at the next byte, returning `None` at the end of the stream.
    pub fn peek_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.stream()?.peek_byte()?)
    }

    /// Reads exactly `count` bytes.
    ///
    /// When fewer bytes remain the position is restored and
    /// [`SqPackError::UnexpectedEndOfStream`] is returned.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let stream = self.stream()?;
        let position = stream.stream_position()?;
        let bytes = stream.read_up_to(count)?;
        if bytes.len() < count {
            stream.seek(SeekFrom::Start(position))?;
            return Err(SqPackError::UnexpectedEndOfStream {
                requested: count,
                position,
            });
        }
        Ok(bytes)
    }

    pub fn read_byte_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(&bytes);
        Ok(array)
    }

    fn read_ordered<const N: usize, T>(
        &mut self,
        little: fn(&[u8]) -> T,
        big: fn(&[u8]) -> T,
    ) -> Result<T> {
        let bytes = self.read_byte_array::<N>()?;
        if self.endianness.is_little() {
            Ok(little(&bytes))
        } else {
            Ok(big(&bytes))
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_byte_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Reads one byte; any nonzero value is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_ordered::<2, _>(LittleEndian::read_u16, BigEndian::read_u16)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_ordered::<2, _>(LittleEndian::read_i16, BigEndian::read_i16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_ordered::<4, _>(LittleEndian::read_u32, BigEndian::read_u32)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_ordered::<4, _>(LittleEndian::read_i32, BigEndian::read_i32)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_ordered::<8, _>(LittleEndian::read_u64, BigEndian::read_u64)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_ordered::<8, _>(LittleEndian::read_i64, BigEndian::read_i64)
    }

    /// Reads an IEEE-754 half precision value and widens it to `f32`.
    pub fn read_f16(&mut self) -> Result<f32> {
        Ok(f16_to_f32(self.read_u16()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_ordered::<4, _>(LittleEndian::read_f32, BigEndian::read_f32)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_ordered::<8, _>(LittleEndian::read_f64, BigEndian::read_f64)
    }

    /// Reads a UTF-8 string.
    ///
    /// With `None` the length is read first as a signed 32-bit integer. A
    /// length below 1 yields an empty string and consumes nothing further.
    /// On failure the position is restored to the length prefix.
    pub fn read_string(&mut self, length: Option<usize>) -> Result<String> {
        self.restore_on_error(|reader| reader.decode_string(length))
    }

    fn decode_string(&mut self, length: Option<usize>) -> Result<String> {
        let length = match length {
            Some(length) => length,
            None => match usize::try_from(self.read_i32()?) {
                Ok(length) => length,
                Err(_) => return Ok(String::new()),
            },
        };
        if length == 0 {
            return Ok(String::new());
        }

        let position = self.position()?;
        let bytes = self.read_bytes(length)?;
        String::from_utf8(bytes).map_err(|e| SqPackError::StringDecode {
            position,
            reason: e.to_string(),
        })
    }

    /// Reads a one-byte length `l` followed by `l + 1` ASCII bytes.
    ///
    /// The extra byte is the terminator stored inside the declared length and
    /// is kept in the returned string. On failure the position is restored to
    /// the length byte.
    pub fn read_def_string(&mut self) -> Result<String> {
        self.restore_on_error(Self::decode_def_string)
    }

    fn decode_def_string(&mut self) -> Result<String> {
        let length = self.read_u8()? as usize + 1;
        let position = self.position()?;
        let bytes = self.read_bytes(length)?;
        if let Some(offset) = bytes.iter().position(|b| !b.is_ascii()) {
            return Err(SqPackError::StringDecode {
                position,
                reason: format!("non-ASCII byte {:#04X} at index {offset}", bytes[offset]),
            });
        }
        String::from_utf8(bytes).map_err(|e| SqPackError::StringDecode {
            position,
            reason: e.to_string(),
        })
    }

    /// Reads a base-128 variable-length unsigned integer.
    ///
    /// Fails with [`SqPackError::VarIntOverflow`] after
    /// [`VAR_INT_MAX_BYTES`] bytes or when the value leaves the 64-bit range.
    /// On any failure the position is restored to the first byte.
    pub fn read_var_int(&mut self) -> Result<u64> {
        self.restore_on_error(|reader| {
            let position = reader.position()?;
            reader.decode_var_int(position)
        })
    }

    /// Runs `decode`, seeking back to the starting position if it fails.
    fn restore_on_error<T>(&mut self, decode: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let position = self.position()?;
        let result = decode(self);
        if result.is_err() {
            self.set_position(position)?;
        }
        result
    }

    fn decode_var_int(&mut self, position: u64) -> Result<u64> {
        let overflow = SqPackError::VarIntOverflow {
            limit: VAR_INT_MAX_BYTES,
            position,
        };

        let mut value = 0u64;
        for index in 0..VAR_INT_MAX_BYTES {
            let byte = self.read_u8()?;
            let group = u64::from(byte & 0x7F);
            let shift = 7 * index as u32;
            // Only the lowest bit of the tenth group fits into 64 bits.
            if shift == 63 && group > 1 {
                return Err(overflow);
            }
            value |= group << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(overflow)
    }

    /// Reads a 16-byte GUID stored in the mixed-endian layout: the first
    /// three fields byte-swapped, the last eight bytes literal.
    pub fn read_guid(&mut self) -> Result<Uuid> {
        Ok(Uuid::from_bytes_le(self.read_byte_array::<16>()?))
    }

    /// Reads a GUID, a `u32` hash and a `u64` part number.
    pub fn read_guid_group(&mut self) -> Result<GuidGroup> {
        let guid = self.read_guid()?;
        let hash = self.read_u32()?;
        let part = self.read_u64()?;
        Ok(GuidGroup::new(guid, hash, part))
    }

    /// Reads a `u32` offset relative to where the pointer itself is stored
    /// and returns the absolute position it refers to.
    ///
    /// With `zero_pointer` set, a stored offset of 0 is a null pointer and
    /// yields 0.
    pub fn read_pointer(&mut self, zero_pointer: bool) -> Result<u64> {
        let pos = self.position()?;
        let rel = self.read_u32()?;
        if zero_pointer && rel == 0 {
            return Ok(0);
        }
        Ok(pos + u64::from(rel))
    }

    /// Decodes a single `T` at the current position.
    pub fn read_struct<T: BinaryRead>(&mut self) -> Result<T> {
        T::read_from(self)
    }

    /// Decodes `count` consecutive values of `T`.
    pub fn read_array<T: BinaryRead>(&mut self, count: usize) -> Result<Vec<T>> {
        let mut items = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            items.push(T::read_from(self)?);
        }
        Ok(items)
    }
}

/// Widens IEEE-754 half precision bits to `f32`. Every half value is exactly
/// representable in single precision.
fn f16_to_f32(bits: u16) -> f32 {
    let exponent = (bits >> 10) & 0x1F;
    let mantissa = u32::from(bits & 0x3FF);

    let magnitude = match (exponent, mantissa) {
        (0, m) => m as f32 * f32::powi(2.0, -24),
        (0x1F, 0) => f32::INFINITY,
        (0x1F, _) => f32::NAN,
        (e, m) => f32::from_bits(((u32::from(e) + 127 - 15) << 23) | (m << 13)),
    };

    if bits & 0x8000 != 0 {
        -magnitude
    } else {
        magnitude
    }
}
