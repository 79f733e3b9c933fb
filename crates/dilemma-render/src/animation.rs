use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

use image::{
    Delay, Frame, RgbaImage,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::RenderError;

/// Delay between animation frames when none is given.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 200;

const GIF_ENCODE_SPEED: i32 = 10;

type SharedError = Rc<RefCell<Option<io::Error>>>;

/// Writer handed to the encoder.
///
/// The encoder writes the GIF trailer from its destructor and discards the
/// result, so every I/O failure is recorded here for [`AnimationWriter::finish`]
/// to report. The inner writer is flushed when this is dropped.
struct TrackedWriter<W: Write> {
    inner: W,
    error: SharedError,
}

impl<W: Write> TrackedWriter<W> {
    fn record<T>(&self, result: io::Result<T>) -> io::Result<T> {
        if let Err(e) = &result
            && e.kind() != io::ErrorKind::Interrupted
        {
            self.error
                .borrow_mut()
                .get_or_insert_with(|| io::Error::new(e.kind(), e.to_string()));
        }
        result
    }
}

impl<W: Write> Write for TrackedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.write(buf);
        self.record(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.inner.flush();
        self.record(result)
    }
}

impl<W: Write> Drop for TrackedWriter<W> {
    fn drop(&mut self) {
        let result = self.inner.flush();
        let _ = self.record(result);
    }
}

/// Encodes a sequence of frames into a looping GIF.
///
/// Frames are written as they are pushed, so only one generation has to be
/// kept in memory at a time. Nothing reaches the writer before the first
/// frame. [`finish`](Self::finish) writes the trailer, flushes the writer and
/// reports any error from either step.
pub struct AnimationWriter<W: Write> {
    encoder: GifEncoder<TrackedWriter<W>>,
    error: SharedError,
    delay: Delay,
    frames: usize,
}

impl<W: Write> AnimationWriter<W> {
    pub fn new(writer: W, frame_delay_ms: u32) -> Result<Self, RenderError> {
        let error = SharedError::default();
        let writer = TrackedWriter {
            inner: writer,
            error: Rc::clone(&error),
        };
        let mut encoder = GifEncoder::new_with_speed(writer, GIF_ENCODE_SPEED);
        encoder.set_repeat(Repeat::Infinite)?;
        Ok(Self {
            encoder,
            error,
            delay: Delay::from_numer_denom_ms(frame_delay_ms, 1),
            frames: 0,
        })
    }

    pub fn push_frame(&mut self, frame: &RgbaImage) -> Result<(), RenderError> {
        self.encoder
            .encode_frame(Frame::from_parts(frame.clone(), 0, 0, self.delay))?;
        self.frames += 1;
        Ok(())
    }

    /// Number of frames written so far.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Completes the animation and returns the number of frames written.
    pub fn finish(self) -> Result<usize, RenderError> {
        let Self {
            encoder,
            error,
            frames,
            ..
        } = self;
        drop(encoder);
        match error.take() {
            Some(e) => Err(RenderError::Io(e)),
            None => Ok(frames),
        }
    }
}
