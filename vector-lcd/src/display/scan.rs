//! Scan conversion from the 240×160 source frame to the panel
//!
//! Three strategies, one per [`RenderMode`]:
//!
//! - **Crop**: centred window copied 1:1
//! - **ScaledNearest**: `src = dst * source_dim / panel_dim` on each axis
//! - **IntegerDecimate2x**: every second pixel, 120×80 result centred
//!   horizontally, written byte-swapped
//!
//! The decimation strategy only touches its own window. Columns outside it
//! keep whatever the [`DisplayBuffer`] held before.

use super::framebuffer::DisplayBuffer;
use super::pixel::{convert_gather, convert_row, ByteOrder};
use super::{PanelGeometry, RenderMode, SOURCE_HEIGHT, SOURCE_WIDTH};

/// Scan strategy bound to one panel geometry
///
/// Sampling tables are built once here, so [`Scanner::render`] does no
/// allocation.
pub struct Scanner {
    mode: RenderMode,
    geometry: PanelGeometry,
    x_map: Vec<usize>,
    y_map: Vec<usize>,
}

impl Scanner {
    pub fn new(mode: RenderMode, geometry: PanelGeometry) -> Self {
        let (x_map, y_map) = match mode {
            RenderMode::ScaledNearest => (
                nearest_map(geometry.width, SOURCE_WIDTH),
                nearest_map(geometry.height, SOURCE_HEIGHT),
            ),
            RenderMode::Crop | RenderMode::IntegerDecimate2x => (Vec::new(), Vec::new()),
        };

        Self {
            mode,
            geometry,
            x_map,
            y_map,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Convert one source frame into `dst`
    ///
    /// `src` must hold 160 rows of at least 240 pixels spaced `stride`
    /// pixels apart; [`crate::video::Frame`] guarantees this.
    pub fn render(&self, src: &[u32], stride: usize, dst: &mut DisplayBuffer) {
        debug_assert_eq!(dst.geometry(), self.geometry);
        debug_assert!(stride >= SOURCE_WIDTH);
        debug_assert!(src.len() >= (SOURCE_HEIGHT - 1) * stride + SOURCE_WIDTH);

        match self.mode {
            RenderMode::Crop => self.render_crop(src, stride, dst),
            RenderMode::ScaledNearest => self.render_scaled(src, stride, dst),
            RenderMode::IntegerDecimate2x => self.render_integer2x(src, stride, dst),
        }
    }

    fn render_crop(&self, src: &[u32], stride: usize, dst: &mut DisplayBuffer) {
        let offset_x = SOURCE_WIDTH.saturating_sub(self.geometry.width) / 2;
        let offset_y = SOURCE_HEIGHT.saturating_sub(self.geometry.height) / 2;
        let cols = self.geometry.width.min(SOURCE_WIDTH);
        let rows = self.geometry.height.min(SOURCE_HEIGHT);

        for y in 0..rows {
            let start = (y + offset_y) * stride + offset_x;
            convert_row(&src[start..start + cols], dst.row_mut(y), ByteOrder::Normal);
        }
    }

    fn render_scaled(&self, src: &[u32], stride: usize, dst: &mut DisplayBuffer) {
        for (y, &src_y) in self.y_map.iter().enumerate() {
            let src_row = &src[src_y * stride..src_y * stride + SOURCE_WIDTH];
            let x_map = &self.x_map;
            convert_gather(dst.row_mut(y), ByteOrder::Normal, |x| src_row[x_map[x]]);
        }
    }

    fn render_integer2x(&self, src: &[u32], stride: usize, dst: &mut DisplayBuffer) {
        let scaled_width = SOURCE_WIDTH / 2;
        let scaled_height = SOURCE_HEIGHT / 2;
        let offset_x = self.geometry.width.saturating_sub(scaled_width) / 2;
        let cols = scaled_width.min(self.geometry.width);
        let rows = scaled_height.min(self.geometry.height);

        for y in 0..rows {
            let src_start = 2 * y * stride;
            let src_row = &src[src_start..src_start + SOURCE_WIDTH];
            let dst_row = &mut dst.row_mut(y)[offset_x..offset_x + cols];
            convert_gather(dst_row, ByteOrder::Swapped, |x| src_row[2 * x]);
        }
    }
}

/// Source index for each destination index: `floor(i * source / panel)`
fn nearest_map(panel: usize, source: usize) -> Vec<usize> {
    (0..panel).map(|i| i * source / panel).collect()
}
