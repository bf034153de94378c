// THEORY:
// The pixel classifier answers two independent yes/no questions about one pixel:
// does its color sit inside a skin-tone band, and does it look like hair? A pixel may
// be both, neither, or either.
//
// - Skin tone: membership in any of the four calibrated RGB boxes.
// - Hair-like: any of four independent rules (dark, brown, blonde, gray/white). The
//   rules overlap and have no priority; the answer is their OR. `matching_hair_rules`
//   reports every rule that fired for callers that want to see the overlap.
//
// The classifier is total over 8-bit input and holds no state.

use crate::core_modules::calibration::{hair, SkinTone, SKIN_TONE_BANDS};
use crate::core_modules::pixel::pixel::Pixel;
use serde::Serialize;

/// One of the four hair-likeness heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HairRule {
    /// Near-black or dark brown: dim and nearly achromatic.
    DarkLowSpread,
    /// Warm brown: red > green > blue, moderately dim.
    Brown,
    /// Blonde: bright red and green, low blue, mid brightness.
    Blonde,
    /// Gray or white: balanced channels, bright.
    GrayWhite,
}

pub const HAIR_RULES: [HairRule; 4] = [
    HairRule::DarkLowSpread,
    HairRule::Brown,
    HairRule::Blonde,
    HairRule::GrayWhite,
];

impl HairRule {
    pub fn matches(&self, pixel: &Pixel) -> bool {
        let brightness = pixel.brightness();
        match self {
            HairRule::DarkLowSpread => {
                brightness < hair::DARK_MAX_BRIGHTNESS && pixel.spread() < hair::DARK_MAX_SPREAD
            }
            HairRule::Brown => {
                pixel.red > pixel.green
                    && pixel.green > pixel.blue
                    && pixel.red < hair::BROWN_MAX_RED
                    && brightness < hair::BROWN_MAX_BRIGHTNESS
            }
            HairRule::Blonde => {
                pixel.red > hair::BLONDE_MIN_RED
                    && pixel.green > hair::BLONDE_MIN_GREEN
                    && pixel.blue < hair::BLONDE_MAX_BLUE
                    && brightness > hair::BLONDE_MIN_BRIGHTNESS
                    && brightness < hair::BLONDE_MAX_BRIGHTNESS
            }
            HairRule::GrayWhite => {
                let red_green = (pixel.red as i16 - pixel.green as i16).abs();
                let green_blue = (pixel.green as i16 - pixel.blue as i16).abs();
                red_green < hair::GRAY_MAX_CHANNEL_GAP
                    && green_blue < hair::GRAY_MAX_CHANNEL_GAP
                    && brightness > hair::GRAY_MIN_BRIGHTNESS
            }
        }
    }
}

/// The classifier's verdict for one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PixelClass {
    pub is_skin_tone: bool,
    pub is_hair_like: bool,
}

pub fn is_skin_tone(pixel: &Pixel) -> bool {
    SKIN_TONE_BANDS.iter().any(|band| band.contains(pixel))
}

/// Every tone band containing the pixel; the bands overlap.
pub fn matching_skin_tones(pixel: &Pixel) -> Vec<SkinTone> {
    SKIN_TONE_BANDS
        .iter()
        .filter(|band| band.contains(pixel))
        .map(|band| band.tone)
        .collect()
}

pub fn is_hair_like(pixel: &Pixel) -> bool {
    HAIR_RULES.iter().any(|rule| rule.matches(pixel))
}

pub fn matching_hair_rules(pixel: &Pixel) -> Vec<HairRule> {
    HAIR_RULES.iter().copied().filter(|rule| rule.matches(pixel)).collect()
}

pub fn classify(pixel: &Pixel) -> PixelClass {
    PixelClass {
        is_skin_tone: is_skin_tone(pixel),
        is_hair_like: is_hair_like(pixel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_corners_are_skin() {
        for (r, g, b) in [(180, 140, 120), (255, 220, 200), (120, 90, 70), (60, 40, 20), (140, 120, 80), (200, 180, 140)] {
            assert!(is_skin_tone(&Pixel::rgb(r, g, b)), "({r}, {g}, {b}) should be skin");
        }
    }

    #[test]
    fn black_and_yellow_are_not_skin() {
        assert!(!is_skin_tone(&Pixel::rgb(0, 0, 0)));
        assert!(!is_skin_tone(&Pixel::rgb(255, 255, 0)));
    }

    #[test]
    fn overlapping_bands_are_all_reported() {
        // Inside both medium and olive.
        let tones = matching_skin_tones(&Pixel::rgb(150, 125, 100));
        assert_eq!(tones, vec![SkinTone::Medium, SkinTone::Olive]);
    }

    #[test]
    fn dark_low_spread_is_hair() {
        let pixel = Pixel::rgb(30, 25, 20);
        assert!(is_hair_like(&pixel));
        assert!(matching_hair_rules(&pixel).contains(&HairRule::DarkLowSpread));
    }

    #[test]
    fn dark_but_saturated_is_not_dark_hair() {
        assert!(!HairRule::DarkLowSpread.matches(&Pixel::rgb(0, 0, 100)));
    }

    #[test]
    fn brown_requires_strict_channel_order() {
        assert!(HairRule::Brown.matches(&Pixel::rgb(120, 80, 40)));
        assert!(!HairRule::Brown.matches(&Pixel::rgb(120, 80, 80)));
        assert!(!HairRule::Brown.matches(&Pixel::rgb(150, 80, 40)));
    }

    #[test]
    fn blonde_band() {
        assert!(HairRule::Blonde.matches(&Pixel::rgb(200, 170, 100)));
        // Too bright: mean 180 is not < 180.
        assert!(!HairRule::Blonde.matches(&Pixel::rgb(220, 210, 110)));
    }

    #[test]
    fn gray_and_white_are_hair() {
        assert!(HairRule::GrayWhite.matches(&Pixel::rgb(200, 200, 200)));
        assert!(HairRule::GrayWhite.matches(&Pixel::rgb(255, 255, 255)));
        assert!(!HairRule::GrayWhite.matches(&Pixel::rgb(100, 100, 100)));
    }

    #[test]
    fn rules_are_not_exclusive() {
        // Dim warm brown with a small spread fires two rules.
        let rules = matching_hair_rules(&Pixel::rgb(50, 40, 30));
        assert_eq!(rules, vec![HairRule::DarkLowSpread, HairRule::Brown]);
    }

    #[test]
    fn mid_skin_tone_is_skin_but_not_hair() {
        let class = classify(&Pixel::rgb(190, 150, 120));
        assert_eq!(
            class,
            PixelClass {
                is_skin_tone: true,
                is_hair_like: false
            }
        );
    }

    #[test]
    fn pixel_can_be_both() {
        // Dark skin band and brown hair rule.
        let class = classify(&Pixel::rgb(90, 60, 30));
        assert!(class.is_skin_tone && class.is_hair_like);
    }
}
