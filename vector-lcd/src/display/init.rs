//! Controller bring-up scripts
//!
//! Each controller is brought up by replaying a fixed list of commands.
//! The lists are plain data; [`super::PanelDriver::run_script`] is the only
//! code that interprets them.

/// MIPI DCS style command opcodes shared by both controllers
pub mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const GAMSET: u8 = 0x26;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A; // Column address set
    pub const RASET: u8 = 0x2B; // Row address set
    pub const RAMWR: u8 = 0x2C; // Memory write
    pub const MADCTL: u8 = 0x36; // Memory access control
    pub const COLMOD: u8 = 0x3A; // Interface pixel format
    pub const RAMCTRL: u8 = 0xB0;
    pub const PORCTRL: u8 = 0xB2;
    pub const GCTRL: u8 = 0xB7;
    pub const VCOMS: u8 = 0xBB;
    pub const LCMCTRL: u8 = 0xC0;
    pub const VDVVRHEN: u8 = 0xC2;
    pub const VRHS: u8 = 0xC3;
    pub const VDVS: u8 = 0xC4;
    pub const FRCTRL2: u8 = 0xC6;
    pub const PWCTRL1: u8 = 0xD0;
    pub const PVGAMCTRL: u8 = 0xE0;
    pub const NVGAMCTRL: u8 = 0xE1;
    pub const EQCTRL: u8 = 0xE9;
    pub const MIDAS_VENDOR: u8 = 0xFC;
}

/// Longest payload any script entry carries
pub const MAX_PAYLOAD: usize = 16;

/// One step of a bring-up script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitCommand {
    pub command: u8,
    /// 0 to [`MAX_PAYLOAD`] bytes sent in data mode after the opcode
    pub payload: &'static [u8],
    /// Settle time after the command; 0 means none
    pub delay_ms: u32,
}

impl InitCommand {
    pub const fn new(command: u8, payload: &'static [u8], delay_ms: u32) -> Self {
        Self {
            command,
            payload,
            delay_ms,
        }
    }
}

/// Santek panel RAM starts 28 columns in
const SANTEK_COL_SHIFT: u16 = 0x1C;
const SANTEK_WIDTH: u16 = 184;
const SANTEK_HEIGHT: u16 = 96;

/// Midas panel RAM starts 24 rows down
const MIDAS_COL_SHIFT: u16 = 0x00;
const MIDAS_ROW_SHIFT: u16 = 0x18;
const MIDAS_WIDTH: u16 = 160;
const MIDAS_HEIGHT: u16 = 80;

/// Big-endian start/end address window
const fn window(start: u16, len: u16) -> [u8; 4] {
    let end = start + len - 1;
    [(start >> 8) as u8, start as u8, (end >> 8) as u8, end as u8]
}

const SANTEK_CASET: [u8; 4] = window(SANTEK_COL_SHIFT, SANTEK_WIDTH);
const SANTEK_RASET: [u8; 4] = window(0, SANTEK_HEIGHT);
const MIDAS_CASET: [u8; 4] = window(MIDAS_COL_SHIFT, MIDAS_WIDTH);
const MIDAS_RASET: [u8; 4] = window(MIDAS_ROW_SHIFT, MIDAS_HEIGHT);

/// Santek 184×96 bring-up
pub const SANTEK_INIT: &[InitCommand] = &[
    InitCommand::new(cmd::SLPIN, &[0x00], 120),
    InitCommand::new(cmd::CASET, &SANTEK_CASET, 0),
    InitCommand::new(cmd::RASET, &SANTEK_RASET, 0),
    InitCommand::new(cmd::MADCTL, &[0x00], 0),
    // 16 bit/pixel 65k RGB
    InitCommand::new(cmd::COLMOD, &[0x55], 0),
    // LSB first
    InitCommand::new(cmd::RAMCTRL, &[0x00, 0x08], 0),
    InitCommand::new(cmd::PORCTRL, &[0x0C, 0x0C, 0x00, 0x33, 0x33], 0),
    // VGH 14.97v, VGL -8.23v
    InitCommand::new(cmd::GCTRL, &[0x72], 0),
    // 1.575v
    InitCommand::new(cmd::VCOMS, &[0x3B], 0),
    InitCommand::new(cmd::LCMCTRL, &[0x2C], 0),
    InitCommand::new(cmd::VDVVRHEN, &[0x01], 0),
    InitCommand::new(cmd::VRHS, &[0x14], 0),
    InitCommand::new(cmd::VDVS, &[0x20], 0),
    // 60 Hz in normal mode
    InitCommand::new(cmd::FRCTRL2, &[0x0F], 0),
    InitCommand::new(cmd::PWCTRL1, &[0xA4, 0xA1], 0),
    InitCommand::new(
        cmd::PVGAMCTRL,
        &[
            0xD0, 0x10, 0x16, 0x0A, 0x0A, 0x26, 0x3C, 0x53, 0x53, 0x18, 0x15, 0x12, 0x36, 0x3C,
        ],
        0,
    ),
    InitCommand::new(
        cmd::NVGAMCTRL,
        &[
            0xD0, 0x11, 0x19, 0x0A, 0x09, 0x25, 0x3D, 0x35, 0x54, 0x17, 0x15, 0x12, 0x36, 0x3C,
        ],
        0,
    ),
    InitCommand::new(cmd::EQCTRL, &[0x05, 0x05, 0x01], 0),
    InitCommand::new(cmd::INVON, &[0x00], 0),
    InitCommand::new(cmd::SLPOUT, &[0x00], 120),
    InitCommand::new(cmd::DISPON, &[0x00], 120),
];

/// Midas 160×80 bring-up
pub const MIDAS_INIT: &[InitCommand] = &[
    InitCommand::new(cmd::SWRESET, &[], 150),
    InitCommand::new(cmd::SLPOUT, &[], 500),
    InitCommand::new(cmd::INVOFF, &[], 0),
    InitCommand::new(cmd::MADCTL, &[0xA8], 0),
    // RGB565
    InitCommand::new(cmd::COLMOD, &[0x05], 0),
    InitCommand::new(
        cmd::PVGAMCTRL,
        &[
            0x07, 0x0E, 0x08, 0x07, 0x10, 0x07, 0x02, 0x07, 0x09, 0x0F, 0x25, 0x36, 0x00, 0x08,
            0x04, 0x10,
        ],
        0,
    ),
    InitCommand::new(
        cmd::NVGAMCTRL,
        &[
            0x0A, 0x0D, 0x08, 0x07, 0x0F, 0x07, 0x02, 0x07, 0x09, 0x0F, 0x25, 0x35, 0x00, 0x09,
            0x04, 0x10,
        ],
        0,
    ),
    InitCommand::new(cmd::MIDAS_VENDOR, &[0xC0], 0),
    InitCommand::new(cmd::NORON, &[], 100),
    InitCommand::new(cmd::GAMSET, &[0x02], 10),
    InitCommand::new(cmd::DISPON, &[], 10),
    InitCommand::new(cmd::CASET, &MIDAS_CASET, 0),
    InitCommand::new(cmd::RASET, &MIDAS_RASET, 0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payloads_fit_limit() {
        for entry in SANTEK_INIT.iter().chain(MIDAS_INIT) {
            assert!(
                entry.payload.len() <= MAX_PAYLOAD,
                "command {:#04x} carries {} bytes",
                entry.command,
                entry.payload.len()
            );
        }
    }

    #[test]
    fn test_santek_window() {
        let caset = SANTEK_INIT.iter().find(|c| c.command == cmd::CASET).unwrap();
        assert_eq!(caset.payload, &[0x00, 0x1C, 0x00, 0xD3]);

        let raset = SANTEK_INIT.iter().find(|c| c.command == cmd::RASET).unwrap();
        assert_eq!(raset.payload, &[0x00, 0x00, 0x00, 0x5F]);
    }

    #[test]
    fn test_midas_window() {
        let caset = MIDAS_INIT.iter().find(|c| c.command == cmd::CASET).unwrap();
        assert_eq!(caset.payload, &[0x00, 0x00, 0x00, 0x9F]);

        let raset = MIDAS_INIT.iter().find(|c| c.command == cmd::RASET).unwrap();
        assert_eq!(raset.payload, &[0x00, 0x18, 0x00, 0x67]);
    }

    #[test]
    fn test_scripts_end_with_display_on() {
        assert_eq!(SANTEK_INIT.last().unwrap().command, cmd::DISPON);
        assert_eq!(SANTEK_INIT.first().unwrap().command, cmd::SLPIN);

        // Midas sets its window after display on
        let dispon = MIDAS_INIT.iter().position(|c| c.command == cmd::DISPON).unwrap();
        assert_eq!(dispon, MIDAS_INIT.len() - 3);
        assert_eq!(MIDAS_INIT.first().unwrap().command, cmd::SWRESET);
    }

    #[test]
    fn test_total_settle_time() {
        let santek: u32 = SANTEK_INIT.iter().map(|c| c.delay_ms).sum();
        let midas: u32 = MIDAS_INIT.iter().map(|c| c.delay_ms).sum();
        assert_eq!(santek, 360);
        assert_eq!(midas, 770);
    }
}
