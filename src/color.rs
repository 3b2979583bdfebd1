//! Tier color generation
//!
//! Colors are packed 0xRRGGBB integers. Hue is in degrees, saturation and
//! lightness in [0, 1] (tier tables store them as percentages).

use crate::normalize_degrees;
use crate::rng::UnitRng;
use crate::tier::{HslRange, RarityTier};

/// An HSL triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Degrees in [0, 360)
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn to_hex(self) -> u32 {
        hsl_to_hex(self.h, self.s, self.l)
    }
}

/// Convert HSL to packed RGB
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> u32 {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    let a = s * l.min(1.0 - l);
    let channel = |n: f64| -> u32 {
        let k = (n + h / 30.0).rem_euclid(12.0);
        let f = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * f).round().clamp(0.0, 255.0) as u32
    };
    (channel(0.0) << 16) | (channel(8.0) << 8) | channel(4.0)
}

/// Convert packed RGB to HSL
pub fn hex_to_hsl(hex: u32) -> Hsl {
    let r = ((hex >> 16) & 0xFF) as f64 / 255.0;
    let g = ((hex >> 8) & 0xFF) as f64 / 255.0;
    let b = (hex & 0xFF) as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        // Achromatic
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl {
        h: normalize_degrees(h * 60.0),
        s,
        l,
    }
}

/// Rotate the hue of a packed RGB color, keeping saturation and lightness
pub fn shift_hue(base: u32, shift_degrees: f64) -> u32 {
    let hsl = hex_to_hsl(base & 0xFF_FFFF);
    hsl_to_hex(normalize_degrees(hsl.h + shift_degrees), hsl.s, hsl.l)
}

/// Base color followed by `count` accents, each `step_degrees` further round
pub fn accent_palette(base: u32, count: usize, step_degrees: f64) -> Vec<u32> {
    let base = base & 0xFF_FFFF;
    std::iter::once(base)
        .chain((1..=count).map(|i| shift_hue(base, step_degrees * i as f64)))
        .collect()
}

/// Uniform hue within a range, spreading draws over both halves of a
/// wrapping range in proportion to their length
pub fn sample_hue<R: UnitRng + ?Sized>(range: &HslRange, rng: &mut R) -> f64 {
    if range.wraps() {
        let upper_len = 360.0 - range.min;
        let draw = rng.next_unit() * range.span();
        if draw < upper_len {
            normalize_degrees(range.min + draw)
        } else {
            (draw - upper_len).min(range.max)
        }
    } else {
        rng.next_in(range.min, range.max)
    }
}

/// Draw a full HSL triple from a tier's ranges
pub fn sample_hsl<R: UnitRng + ?Sized>(tier: &RarityTier, rng: &mut R) -> Hsl {
    let h = sample_hue(&tier.hue, rng);
    let s = rng.next_in(tier.saturation.min, tier.saturation.max) / 100.0;
    let l = rng.next_in(tier.lightness.min, tier.lightness.max) / 100.0;
    Hsl { h, s, l }
}

/// Random color for a tier
pub fn color_for_tier<R: UnitRng + ?Sized>(tier: &RarityTier, rng: &mut R) -> u32 {
    sample_hsl(tier, rng).to_hex()
}

/// Format as `#rrggbb`
pub fn to_css(hex: u32) -> String {
    format!("#{:06x}", hex & 0xFF_FFFF)
}
