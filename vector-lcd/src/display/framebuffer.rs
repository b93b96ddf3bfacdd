//! RGB565 display buffer
//!
//! One buffer per output thread, sized to the panel and zero-filled once.
//! It is reused for every frame and never cleared again: the 2× decimation
//! strategy only paints the centre of the Midas panel and relies on the
//! side bars keeping their initial black.

use super::PanelGeometry;

/// Converted frame, ready to be written to panel RAM
pub struct DisplayBuffer {
    geometry: PanelGeometry,
    pixels: Vec<u16>,
}

impl DisplayBuffer {
    /// Allocate a black buffer for `geometry`
    pub fn new(geometry: PanelGeometry) -> Self {
        Self {
            geometry,
            pixels: vec![0; geometry.buffer_size()],
        }
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    /// Get pixel at coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u16> {
        if x < self.geometry.width && y < self.geometry.height {
            Some(self.pixels[y * self.geometry.width + x])
        } else {
            None
        }
    }

    /// Mutable view of row `y`
    ///
    /// # Panics
    ///
    /// If `y` is outside the panel.
    pub fn row_mut(&mut self, y: usize) -> &mut [u16] {
        let width = self.geometry.width;
        &mut self.pixels[y * width..(y + 1) * width]
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.pixels
    }

    /// Buffer contents in memory order, as sent over SPI
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_black() {
        let buffer = DisplayBuffer::new(PanelGeometry::new(160, 80));
        assert_eq!(buffer.as_slice().len(), 160 * 80);
        assert!(buffer.as_slice().iter().all(|&p| p == 0));
        assert_eq!(buffer.as_bytes().len(), 160 * 80 * 2);
    }

    #[test]
    fn test_row_access() {
        let mut buffer = DisplayBuffer::new(PanelGeometry::new(184, 96));
        buffer.row_mut(3)[5] = 0xF800;

        assert_eq!(buffer.get_pixel(5, 3), Some(0xF800));
        assert_eq!(buffer.get_pixel(4, 3), Some(0));
        assert_eq!(buffer.get_pixel(184, 0), None);
        assert_eq!(buffer.get_pixel(0, 96), None);
    }

    #[test]
    fn test_bytes_are_native_order() {
        let mut buffer = DisplayBuffer::new(PanelGeometry::new(4, 1));
        buffer.row_mut(0)[0] = 0x1234;
        assert_eq!(&buffer.as_bytes()[..2], &0x1234u16.to_ne_bytes());
    }
}
