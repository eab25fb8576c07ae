use std::io::{ErrorKind, Write};

use crate::codec::{MAX_FRAME_LEN, SENTINEL};
use crate::error::{FrameError, Result};

/// Writes complete, already-encoded frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Write one frame and flush it (blocking).
    ///
    /// The frame must end with the sentinel and fit the board's buffer;
    /// anything else would desynchronize the remote reader.
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() > MAX_FRAME_LEN || frame.last() != Some(&SENTINEL) {
            return Err(FrameError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                "frame must be at most 256 bytes and end with 0xFF",
            )));
        }

        let mut offset = 0usize;
        while offset < frame.len() {
            match self.inner.write(&frame[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::codec::{decode_inbound, encode_chat, encode_config, ChatMessage, Inbound};
    use crate::reader::FrameReader;

    #[test]
    fn write_single_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let frame = encode_chat("alice", "hello").unwrap();

        writer.write_frame(&frame).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire.as_slice(), frame.as_ref());
    }

    #[test]
    fn write_multiple_frames_in_order() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.write_frame(&encode_config(2, 17).unwrap()).unwrap();
        writer.write_frame(&encode_chat("alice", "one").unwrap()).unwrap();
        writer.write_frame(&encode_chat("alice", "two").unwrap()).unwrap();

        let wire = writer.into_inner().into_inner();
        let mut reader = FrameReader::new(Cursor::new(wire));

        assert_eq!(
            reader.read_until_sentinel(256).unwrap().as_ref(),
            &[1, 2, 17, 0xFF]
        );
        for expected in ["one", "two"] {
            let frame = reader.read_until_sentinel(256).unwrap();
            assert_eq!(
                decode_inbound(&frame),
                Inbound::Chat(ChatMessage {
                    username: "alice".to_string(),
                    text: expected.to_string(),
                })
            );
        }
    }

    #[test]
    fn rejects_unterminated_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let err = writer.write_frame(&[2, 3, b'a', b'b', b'c']).unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::InvalidInput));
        assert!(writer.into_inner().into_inner().is_empty());
    }

    #[test]
    fn rejects_oversized_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let mut frame = vec![b'x'; 300];
        frame.push(0xFF);
        assert!(writer.write_frame(&frame).is_err());
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = FrameWriter::new(sink);

        writer.write_frame(&[3, 0xFF]).unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let writer_impl = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };

        let mut writer = FrameWriter::new(writer_impl);
        writer.write_frame(&[1, 0, 10, 0xFF]).unwrap();

        assert_eq!(writer.into_inner().data, vec![1, 0, 10, 0xFF]);
    }

    #[test]
    fn short_writes_are_completed() {
        let mut writer = FrameWriter::new(OneByteWriter::default());
        let frame = encode_chat("dave", "trickle").unwrap();
        writer.write_frame(&frame).unwrap();
        assert_eq!(writer.get_ref().data.as_slice(), frame.as_ref());
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.write_frame(&[3, 0xFF]).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct OneByteWriter {
        data: Vec<u8>,
    }

    impl Write for OneByteWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            match buf.first() {
                Some(&b) => {
                    self.data.push(b);
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
