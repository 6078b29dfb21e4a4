//! Shared framebuffer of packed `0x00RRGGBB` pixels.
//!
//! Pixels are atomics so render workers can write their disjoint column
//! ranges through a shared reference without a lock. Relaxed ordering is
//! enough: the worker's release store on its done flag publishes the writes.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use lumen_core::color::unpack_rgb;

use crate::error::{RenderError, RenderResult};

/// Row-major framebuffer, origin at the top-left.
#[derive(Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Box<[AtomicU32]>,
}

impl FrameBuffer {
    /// Create a black framebuffer.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }

        let pixels = (0..width as usize * height as usize)
            .map(|_| AtomicU32::new(0))
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        y as usize * self.width as usize + x as usize
    }

    /// Write a packed pixel.
    #[inline]
    pub fn set(&self, x: u32, y: u32, pixel: u32) {
        self.pixels[self.index(x, y)].store(pixel, Ordering::Relaxed);
    }

    /// Read a packed pixel.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)].load(Ordering::Relaxed)
    }

    /// Set every pixel to `pixel`.
    pub fn clear(&self, pixel: u32) {
        for p in self.pixels.iter() {
            p.store(pixel, Ordering::Relaxed);
        }
    }

    /// Copy of all packed pixels, row-major.
    pub fn pixels(&self) -> Vec<u32> {
        self.pixels.iter().map(|p| p.load(Ordering::Relaxed)).collect()
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for p in self.pixels.iter() {
            let [r, g, b] = unpack_rgb(p.load(Ordering::Relaxed));
            bytes.extend_from_slice(&[r, g, b, 255]);
        }
        bytes
    }

    /// Save the current contents as an image; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        let image = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba8())
            .ok_or(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        image.save(path)?;

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_size() {
        assert!(matches!(
            FrameBuffer::new(0, 10),
            Err(RenderError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_set_get_row_major() {
        let fb = FrameBuffer::new(4, 3).unwrap();
        fb.set(3, 0, 0x00AB_CDEF);
        fb.set(0, 2, 7);

        assert_eq!(fb.get(3, 0), 0x00AB_CDEF);
        assert_eq!(fb.pixels()[3], 0x00AB_CDEF);
        assert_eq!(fb.pixels()[8], 7);
    }

    #[test]
    fn test_clear() {
        let fb = FrameBuffer::new(2, 2).unwrap();
        fb.clear(0x0000_00FF);
        assert!(fb.pixels().iter().all(|&p| p == 0x0000_00FF));
    }

    #[test]
    fn test_to_rgba8() {
        let fb = FrameBuffer::new(2, 1).unwrap();
        fb.set(0, 0, 0x00FF_0000);
        fb.set(1, 0, 0x0000_80FF);
        assert_eq!(fb.to_rgba8(), vec![255, 0, 0, 255, 0, 128, 255, 255]);
    }

    #[test]
    fn test_save_png() {
        let fb = FrameBuffer::new(3, 2).unwrap();
        fb.set(1, 1, 0x0012_3456);

        let path = std::env::temp_dir().join(format!("lumen_fb_test_{}.png", std::process::id()));
        fb.save(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(1, 1).0, [0x12, 0x34, 0x56, 255]);

        let _ = std::fs::remove_file(&path);
    }
}
