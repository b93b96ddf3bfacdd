//! Panel model, controller bring-up and frame conversion
//!
//! Two controllers ship in the field:
//!
//! | Variant  | Controller | Resolution | Render mode                 |
//! |----------|------------|------------|-----------------------------|
//! | VariantA | Santek     | 184×96     | crop, or scaled when asked  |
//! | VariantB | Midas      | 160×80     | integer 2× decimation       |

pub mod framebuffer;
pub mod init;
pub mod panel;
pub mod pixel;
pub mod scan;

use std::fmt;

pub use framebuffer::DisplayBuffer;
pub use init::InitCommand;
pub use panel::PanelDriver;
pub use scan::Scanner;

use crate::config::GpioSettings;

/// Width of every frame the producer hands over
pub const SOURCE_WIDTH: usize = 240;
/// Height of every frame the producer hands over
pub const SOURCE_HEIGHT: usize = 160;

/// Physical panel controller, fixed once detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelVariant {
    /// Santek controller, 184×96
    VariantA,
    /// Midas controller, 160×80
    VariantB,
}

impl PanelVariant {
    pub const fn geometry(self) -> PanelGeometry {
        match self {
            PanelVariant::VariantA => PanelGeometry::new(184, 96),
            PanelVariant::VariantB => PanelGeometry::new(160, 80),
        }
    }

    pub const fn controller(self) -> &'static str {
        match self {
            PanelVariant::VariantA => "SANTEK",
            PanelVariant::VariantB => "MIDAS",
        }
    }

    /// Bring-up script for this controller
    pub const fn init_script(self) -> &'static [InitCommand] {
        match self {
            PanelVariant::VariantA => init::SANTEK_INIT,
            PanelVariant::VariantB => init::MIDAS_INIT,
        }
    }

    /// Reset line for this controller; D/C is shared
    pub fn reset_pin(self, gpio: &GpioSettings) -> u32 {
        match self {
            PanelVariant::VariantA => gpio.santek_reset_pin,
            PanelVariant::VariantB => gpio.midas_reset_pin,
        }
    }

    /// Scan strategy for this panel
    ///
    /// Midas always decimates; `scaled` only matters on Santek.
    pub const fn render_mode(self, scaled: bool) -> RenderMode {
        match self {
            PanelVariant::VariantB => RenderMode::IntegerDecimate2x,
            PanelVariant::VariantA if scaled => RenderMode::ScaledNearest,
            PanelVariant::VariantA => RenderMode::Crop,
        }
    }
}

impl fmt::Display for PanelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let geometry = self.geometry();
        write!(f, "{} ({}x{})", self.controller(), geometry.width, geometry.height)
    }
}

/// Panel resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelGeometry {
    pub width: usize,
    pub height: usize,
}

impl PanelGeometry {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Pixels in one full frame
    pub const fn buffer_size(&self) -> usize {
        self.width * self.height
    }
}

/// How a 240×160 source frame is mapped onto the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Centred 1:1 window, edges discarded
    Crop,
    /// Nearest-neighbour resample to the full panel
    ScaledNearest,
    /// Every second pixel on both axes, centred horizontally, bytes swapped
    IntegerDecimate2x,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Crop => write!(f, "crop"),
            RenderMode::ScaledNearest => write!(f, "scaled"),
            RenderMode::IntegerDecimate2x => write!(f, "integer 2x"),
        }
    }
}

/// Process-wide display state, decided once at startup and read-only after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoContext {
    pub variant: PanelVariant,
    pub geometry: PanelGeometry,
    pub mode: RenderMode,
}

impl VideoContext {
    pub const fn new(variant: PanelVariant, scaled: bool) -> Self {
        Self {
            variant,
            geometry: variant.geometry(),
            mode: variant.render_mode(scaled),
        }
    }
}
