use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;

/// Upper bound on the buffer reserved before any bytes have arrived.
const READ_CHUNK: usize = 8 * 1024;

pub trait ReadExt: Read + Seek {
    fn read_up_to(&mut self, count: usize) -> io::Result<Vec<u8>>;

    fn peek_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<T> ReadExt for T
where
    T: Read + Seek,
{
    /// Reads up to `count` bytes, stopping early only at end of stream.
    ///
    /// A short or empty result means the stream ran out; hard failures are
    /// returned as errors and never folded into a short read.
    fn read_up_to(&mut self, count: usize) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(count.min(READ_CHUNK));
        self.by_ref().take(count as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Peeks a single byte from the reader without advancing its position.
    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        let pos = self.stream_position()?;
        let byte = self.read_up_to(1)?.first().copied();
        self.seek(SeekFrom::Start(pos))?;
        Ok(byte)
    }
}

/// Utility methods for working with seekable streams.
pub trait SeekExt: Seek {
    /// Moves the position by `delta` bytes relative to the current position.
    fn skip(&mut self, delta: i64) -> io::Result<u64>;

    /// Returns the total length of the stream, leaving the position untouched.
    fn stream_length(&mut self) -> io::Result<u64>;
}

impl<T> SeekExt for T
where
    T: Seek,
{
    fn skip(&mut self, delta: i64) -> io::Result<u64> {
        self.seek(SeekFrom::Current(delta))
    }

    fn stream_length(&mut self) -> io::Result<u64> {
        let pos = self.stream_position()?;
        let len = self.seek(SeekFrom::End(0))?;
        if pos != len {
            self.seek(SeekFrom::Start(pos))?;
        }
        Ok(len)
    }
}
