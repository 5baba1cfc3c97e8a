//! Flat byte buffers exchanged with the inference backend
//!
//! A [`Buffer`] has a fixed size and a cursor. Conversions rewind the cursor
//! before writing or reading so a buffer can be reused across calls. A buffer
//! must not be used by more than one conversion at a time; callers sharing a
//! buffer between threads must serialize access themselves.

use std::fmt;
use std::mem::size_of;

use bytemuck::Pod;

use crate::error::{Error, Result};

/// Backing buffer holding one layer's data
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Raw bytes
    data: Vec<u8>,

    /// Cursor for relative reads and writes
    position: usize,
}

impl Buffer {
    /// Create a zero-filled buffer of the given size
    pub fn new_zeroed(size: usize) -> Self {
        Self {
            data: vec![0; size],
            position: 0,
        }
    }

    /// Create a buffer by copying the bytes of a slice
    pub fn from_slice<T: Pod>(data: &[T]) -> Self {
        Self {
            data: bytemuck::cast_slice(data).to_vec(),
            position: 0,
        }
    }

    /// Size of the buffer in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Move the cursor back to the start
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Borrow the raw bytes mutably
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Write a byte at the cursor
    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.put_bytes(&[value])
    }

    /// Write a float at the cursor in native byte order
    pub fn put_f32(&mut self, value: f32) -> Result<()> {
        self.put_bytes(bytemuck::bytes_of(&value))
    }

    /// Write every element of a slice at the cursor
    pub fn put_slice<T: Pod>(&mut self, values: &[T]) -> Result<()> {
        self.put_bytes(bytemuck::cast_slice(values))
    }

    /// Read a byte at the cursor
    pub fn get_u8(&mut self) -> Result<u8> {
        let bytes = self.take(1)?;
        Ok(bytes[0])
    }

    /// Read a native byte order float at the cursor
    pub fn get_f32(&mut self) -> Result<f32> {
        let bytes = self.take(size_of::<f32>())?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// Read `count` bytes at the cursor
    pub fn get_bytes(&mut self, count: usize) -> Result<&[u8]> {
        self.take(count)
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.position + bytes.len();
        if end > self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index: end - 1,
                len: self.data.len(),
            });
        }

        self.data[self.position..end].copy_from_slice(bytes);
        self.position = end;
        Ok(())
    }

    fn take(&mut self, count: usize) -> Result<&[u8]> {
        let end = self.position + count;
        if end > self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index: end.saturating_sub(1),
                len: self.data.len(),
            });
        }

        let start = self.position;
        self.position = end;
        Ok(&self.data[start..end])
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("size", &self.data.len())
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let mut buffer = Buffer::new_zeroed(5);
        buffer.put_u8(7).unwrap();
        buffer.put_f32(1.5).unwrap();
        assert_eq!(buffer.remaining(), 0);

        buffer.rewind();
        assert_eq!(buffer.get_u8().unwrap(), 7);
        assert_eq!(buffer.get_f32().unwrap(), 1.5);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut buffer = Buffer::new_zeroed(3);
        assert!(matches!(buffer.put_f32(1.0), Err(Error::IndexOutOfBounds { .. })));
        // A failed write leaves the cursor where it was
        assert_eq!(buffer.position(), 0);
        assert!(matches!(buffer.get_f32(), Err(Error::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_from_slice_native_order() {
        let buffer = Buffer::from_slice(&[1.0f32, 2.0]);
        assert_eq!(buffer.size(), 8);
        assert_eq!(&buffer.as_bytes()[..4], &1.0f32.to_ne_bytes());
    }
}
