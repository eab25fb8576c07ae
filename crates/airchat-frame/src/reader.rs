use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::codec::{MAX_FRAME_LEN, SENTINEL};
use crate::error::{FrameError, Result};

const READ_CHUNK_SIZE: usize = MAX_FRAME_LEN;

/// Reads sentinel-terminated frames from any `Read` stream.
///
/// Bytes read past the end of one frame are kept for the next call, and a
/// frame split across several reads is reassembled before it is returned.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Read> FrameReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(2 * MAX_FRAME_LEN),
        }
    }

    /// Read until a sentinel byte or until `limit` bytes have accumulated
    /// (blocking).
    ///
    /// Returns the frame including its sentinel, or exactly `limit` bytes if
    /// no sentinel arrived in time. Returns an empty buffer when the stream's
    /// read timeout fires first; the partial frame stays buffered. At
    /// end-of-stream any leftover bytes are returned once, then
    /// `Err(FrameError::ConnectionClosed)`.
    pub fn read_until_sentinel(&mut self, limit: usize) -> Result<Bytes> {
        let limit = limit.max(1);
        loop {
            if let Some(frame) = self.take_frame(limit) {
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) =>
                {
                    return Ok(Bytes::new());
                }
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    return Err(FrameError::ConnectionClosed);
                }
                debug!(len = self.buf.len(), "stream ended inside a frame");
                return Ok(self.buf.split().freeze());
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    fn take_frame(&mut self, limit: usize) -> Option<Bytes> {
        if let Some(pos) = self.buf.iter().take(limit).position(|&b| b == SENTINEL) {
            return Some(self.buf.split_to(pos + 1).freeze());
        }
        if self.buf.len() >= limit {
            debug!(limit, "no sentinel within read limit");
            return Some(self.buf.split_to(limit).freeze());
        }
        None
    }

    /// Bytes received but not yet returned as part of a frame.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
