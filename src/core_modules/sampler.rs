// THEORY:
// The `PixelSampler` is the bridge between a raw RGBA byte buffer and the per-pixel
// analysis. It owns the byte-offset math (4 bytes per pixel, row-major scan order)
// and the sampling stride: only every Nth pixel is visited, which keeps a 224x224
// canvas to a few thousand reads.
//
// Malformed buffers fail fast at construction. Once a sampler exists, iteration
// cannot fail.

use crate::core_modules::pixel::pixel::{Byte, Pixel, CHANNELS};
use crate::error::{Result, VisionError};

/// A validated, strided view over an RGBA buffer.
#[derive(Debug, Clone, Copy)]
pub struct PixelSampler<'a> {
    buffer: &'a [Byte],
    /// Visit every `stride`-th pixel in scan order, starting with the first.
    stride: usize,
}

impl<'a> PixelSampler<'a> {
    /// Accepts any buffer that holds a whole number of RGBA pixels.
    pub fn new(buffer: &'a [Byte], stride: usize) -> Result<Self> {
        if stride == 0 {
            return Err(VisionError::InvalidStride);
        }
        if buffer.len() % CHANNELS != 0 {
            return Err(VisionError::MisalignedBuffer { len: buffer.len() });
        }
        Ok(Self { buffer, stride })
    }

    /// Accepts only a buffer of exactly `width * height` RGBA pixels.
    pub fn for_dimensions(buffer: &'a [Byte], width: u32, height: u32, stride: usize) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if buffer.len() != expected {
            return Err(VisionError::BufferLength {
                expected,
                actual: buffer.len(),
            });
        }
        Self::new(buffer, stride)
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of pixels in the underlying buffer.
    pub fn pixel_count(&self) -> usize {
        self.buffer.len() / CHANNELS
    }

    /// Number of pixels `samples` will yield.
    pub fn sample_count(&self) -> usize {
        self.pixel_count().div_ceil(self.stride)
    }

    /// The sampled pixels in scan order.
    pub fn samples(&self) -> impl Iterator<Item = Pixel> + use<'a> {
        let buffer: &'a [Byte] = self.buffer;
        buffer
            .chunks_exact(CHANNELS)
            .step_by(self.stride)
            .map(|bytes| Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3]))
    }
}
