//! 32-bit to RGB565 pixel conversion
//!
//! Source pixels come from the renderer as 32-bit words with 8-bit
//! channels; the panels take 16-bit 5-6-5 color. Field extraction:
//!
//! | Channel | Source bits | Width | Packed position |
//! |---------|-------------|-------|-----------------|
//! | red     | 19..24      | 5     | 11..16          |
//! | green   | 10..16      | 6     | 5..11           |
//! | blue    | 3..8        | 5     | 0..5            |
//!
//! The 4-wide path and the scalar path must agree bit for bit: row
//! converters run whole groups of four through [`rgb565_x4`] and finish the
//! tail with [`rgb565`].

use wide::u32x4;

/// Byte order of the packed 16-bit value in the display buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Plain 5-6-5
    Normal,
    /// High and low byte exchanged (Midas bus order)
    Swapped,
}

/// Convert one pixel
#[inline]
pub const fn rgb565(pixel: u32) -> u16 {
    let r = (pixel >> 19) & 0x1F;
    let g = (pixel >> 10) & 0x3F;
    let b = (pixel >> 3) & 0x1F;
    ((r << 11) | (g << 5) | b) as u16
}

/// Convert one pixel and exchange its bytes
#[inline]
pub const fn rgb565_swapped(pixel: u32) -> u16 {
    rgb565(pixel).swap_bytes()
}

#[inline]
fn pack_x4(pixels: u32x4) -> u32x4 {
    let r = (pixels >> 19) & u32x4::splat(0x1F);
    let g = (pixels >> 10) & u32x4::splat(0x3F);
    let b = (pixels >> 3) & u32x4::splat(0x1F);
    (r << 11) | (g << 5) | b
}

#[inline]
fn narrow(packed: u32x4) -> [u16; 4] {
    packed.to_array().map(|v| v as u16)
}

/// Convert four pixels at once
#[inline]
pub fn rgb565_x4(pixels: [u32; 4]) -> [u16; 4] {
    narrow(pack_x4(u32x4::new(pixels)))
}

/// Convert four pixels at once, bytes exchanged
#[inline]
pub fn rgb565_swapped_x4(pixels: [u32; 4]) -> [u16; 4] {
    let packed = pack_x4(u32x4::new(pixels));
    narrow(((packed >> 8) | (packed << 8)) & u32x4::splat(0xFFFF))
}

#[inline]
fn convert_one(pixel: u32, order: ByteOrder) -> u16 {
    match order {
        ByteOrder::Normal => rgb565(pixel),
        ByteOrder::Swapped => rgb565_swapped(pixel),
    }
}

#[inline]
fn convert_four(pixels: [u32; 4], order: ByteOrder) -> [u16; 4] {
    match order {
        ByteOrder::Normal => rgb565_x4(pixels),
        ByteOrder::Swapped => rgb565_swapped_x4(pixels),
    }
}

/// Convert a contiguous run of pixels
///
/// Converts `min(src.len(), dst.len())` pixels.
pub fn convert_row(src: &[u32], dst: &mut [u16], order: ByteOrder) {
    let len = src.len().min(dst.len());
    let (src, dst) = (&src[..len], &mut dst[..len]);

    let mut src_groups = src.chunks_exact(4);
    let mut dst_groups = dst.chunks_exact_mut(4);

    for (s, d) in (&mut src_groups).zip(&mut dst_groups) {
        let group = [s[0], s[1], s[2], s[3]];
        d.copy_from_slice(&convert_four(group, order));
    }

    for (s, d) in src_groups
        .remainder()
        .iter()
        .zip(dst_groups.into_remainder())
    {
        *d = convert_one(*s, order);
    }
}

/// Convert pixels fetched by index
///
/// `dst[i]` receives the converted value of `sample(i)`. Used by the
/// resampling strategies, whose source pixels are not contiguous.
pub fn convert_gather<F>(dst: &mut [u16], order: ByteOrder, sample: F)
where
    F: Fn(usize) -> u32,
{
    let mut groups = dst.chunks_exact_mut(4);
    let mut base = 0;

    for d in &mut groups {
        let group = [sample(base), sample(base + 1), sample(base + 2), sample(base + 3)];
        d.copy_from_slice(&convert_four(group, order));
        base += 4;
    }

    for (i, d) in groups.into_remainder().iter_mut().enumerate() {
        *d = convert_one(sample(base + i), order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_primary_colors() {
        assert_eq!(rgb565(0x00F8_0000), 0xF800);
        assert_eq!(rgb565(0x0000_FC00), 0x07E0);
        assert_eq!(rgb565(0x0000_00F8), 0x001F);
        assert_eq!(rgb565(0x00FF_FFFF), 0xFFFF);
        assert_eq!(rgb565(0xFF00_0000), 0x0000);
        assert_eq!(rgb565(0x0000_0007), 0x0000);
    }

    #[test]
    fn test_swapped_primaries() {
        assert_eq!(rgb565_swapped(0x00F8_0000), 0x00F8);
        assert_eq!(rgb565_swapped(0x0000_00F8), 0x1F00);
        assert_eq!(rgb565_swapped_x4([0x00F8_0000; 4]), [0x00F8; 4]);
    }

    /// Every combination of the 16 bits the converter reads, with the
    /// ignored bits set to a pattern that must not leak through
    #[test]
    fn test_vector_matches_scalar_over_all_fields() {
        for fields in 0u32..=0xFFFF {
            let r = fields >> 11;
            let g = (fields >> 5) & 0x3F;
            let b = fields & 0x1F;
            let noise = 0xA503_0207;
            let pixel = (r << 19) | (g << 10) | (b << 3) | (noise & !0x00F8_FCF8);

            let group = [pixel, !pixel, pixel ^ 0x5555_5555, pixel.rotate_left(7)];
            let expected = group.map(rgb565);
            assert_eq!(rgb565_x4(group), expected);
            assert_eq!(rgb565(pixel), fields as u16);
        }
    }

    #[test]
    fn test_row_tail_uses_scalar_path() {
        let src: Vec<u32> = (0..11u32).map(|i| i.wrapping_mul(0x0101_0743)).collect();
        let mut dst = vec![0u16; 11];

        convert_row(&src, &mut dst, ByteOrder::Normal);
        let expected: Vec<u16> = src.iter().map(|&p| rgb565(p)).collect();
        assert_eq!(dst, expected);

        convert_row(&src, &mut dst, ByteOrder::Swapped);
        let expected: Vec<u16> = src.iter().map(|&p| rgb565_swapped(p)).collect();
        assert_eq!(dst, expected);
    }

    #[test]
    fn test_row_stops_at_shorter_slice() {
        let src = [0x00F8_0000u32; 6];
        let mut dst = [0xAAAAu16; 9];
        convert_row(&src, &mut dst, ByteOrder::Normal);
        assert_eq!(&dst[..6], &[0xF800; 6]);
        assert_eq!(&dst[6..], &[0xAAAA; 3]);
    }

    #[test]
    fn test_gather_visits_each_index_once() {
        let src: Vec<u32> = (0..64u32).map(|i| i << 3).collect();
        let mut dst = vec![0u16; 7];

        convert_gather(&mut dst, ByteOrder::Normal, |i| src[i * 9]);

        let expected: Vec<u16> = (0..7).map(|i| rgb565(src[i * 9])).collect();
        assert_eq!(dst, expected);
    }

    proptest! {
        #[test]
        fn vector_and_scalar_agree(a: u32, b: u32, c: u32, d: u32) {
            let group = [a, b, c, d];
            prop_assert_eq!(rgb565_x4(group), group.map(rgb565));
            prop_assert_eq!(rgb565_swapped_x4(group), group.map(rgb565_swapped));
        }

        #[test]
        fn swapped_is_byte_exchange(pixel: u32) {
            let normal = u32::from(rgb565(pixel));
            let expected = ((normal >> 8) | (normal << 8)) & 0xFFFF;
            prop_assert_eq!(u32::from(rgb565_swapped(pixel)), expected);
        }

        #[test]
        fn row_matches_per_pixel(src in proptest::collection::vec(any::<u32>(), 0..64)) {
            let mut dst = vec![0u16; src.len()];
            convert_row(&src, &mut dst, ByteOrder::Swapped);
            let expected: Vec<u16> = src.iter().map(|&p| rgb565_swapped(p)).collect();
            prop_assert_eq!(dst, expected);
        }
    }
}
