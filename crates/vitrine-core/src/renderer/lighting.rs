// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Type-tag driven lighting and stage backgrounds.
//!
//! Each instance carries one or two type tags (primary first). The tags select
//! a key light, an ambient term and a two-color stage background. Unknown tags
//! resolve to `normal`.

use std::fmt;

/// An 8-bit-per-channel sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a packed `0xRRGGBB` literal.
    pub const fn hex(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }

    /// Parses `#rrggbb` or `#rgb` (the `#` is optional).
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let packed = u32::from_str_radix(&expanded, 16).ok()?;
        Some(Self::hex(packed))
    }

    /// Mixes `ratio` of `self` with `1 - ratio` of `other`, rounding per channel.
    pub fn blend(self, other: Rgb8, ratio: f32) -> Rgb8 {
        let mix = |a: u8, b: u8| (a as f32 * ratio + b as f32 * (1.0 - ratio)).round() as u8;
        Rgb8::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Moves each channel `amount` of the way towards white.
    pub fn lighten(self, amount: f32) -> Rgb8 {
        let up = |c: u8| (c as f32 + (255.0 - c as f32) * amount).round().min(255.0) as u8;
        Rgb8::new(up(self.r), up(self.g), up(self.b))
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Lights and background colors for one type tag (or a blend of two).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingProfile {
    /// Key light color.
    pub main_light: Rgb8,
    /// Key light intensity.
    pub intensity: f32,
    /// Ambient light color.
    pub ambient_color: Rgb8,
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Primary background color.
    pub background: Rgb8,
    /// Secondary background color, used for gradients.
    pub secondary: Rgb8,
}

/// Weight of the primary type when blending two profiles.
const PRIMARY_WEIGHT: f32 = 0.7;

const fn profile(
    main_light: u32,
    intensity: f32,
    ambient_color: u32,
    ambient_intensity: f32,
    background: u32,
    secondary: u32,
) -> LightingProfile {
    LightingProfile {
        main_light: Rgb8::hex(main_light),
        intensity,
        ambient_color: Rgb8::hex(ambient_color),
        ambient_intensity,
        background: Rgb8::hex(background),
        secondary: Rgb8::hex(secondary),
    }
}

const NORMAL: LightingProfile = profile(0xa8a878, 1.0, 0xd9d9d9, 0.3, 0xa8a878, 0xc6c6a7);

static TYPE_LIGHTING: [(&str, LightingProfile); 18] = [
    ("normal", NORMAL),
    ("fire", profile(0xff9248, 1.3, 0x3a1f00, 0.4, 0xf08030, 0xfd7d24)),
    ("water", profile(0x90e0ef, 0.9, 0x0077b6, 0.3, 0x6890f0, 0x5cc1e3)),
    ("electric", profile(0xffee32, 1.2, 0xfcbf49, 0.5, 0xf8d030, 0xfae078)),
    ("grass", profile(0x80b918, 1.0, 0x1b4332, 0.35, 0x78c850, 0xa7db8d)),
    ("ice", profile(0xcaf0f8, 0.8, 0xa8dadc, 0.4, 0x98d8d8, 0xbce6e6)),
    ("fighting", profile(0xe76f51, 1.1, 0xbc6c25, 0.35, 0xc03028, 0xd67873)),
    ("poison", profile(0xc77dff, 0.9, 0x7b2cbf, 0.4, 0xa040a0, 0xc183c1)),
    ("ground", profile(0xddbea9, 1.05, 0x6b705c, 0.3, 0xe0c068, 0xebd69d)),
    ("flying", profile(0xade8f4, 1.0, 0x90e0ef, 0.4, 0xa890f0, 0xc6b7f5)),
    ("psychic", profile(0xff70a6, 1.0, 0xff9770, 0.3, 0xf85888, 0xfa92b2)),
    ("bug", profile(0xd8f3dc, 1.0, 0x606c38, 0.35, 0xa8b820, 0xc6d16e)),
    ("rock", profile(0xced4da, 1.1, 0x6c584c, 0.25, 0xb8a038, 0xd1c17d)),
    ("ghost", profile(0x7400b8, 0.7, 0x5e60ce, 0.3, 0x705898, 0xa292bc)),
    ("dragon", profile(0x5e60ce, 1.1, 0x240046, 0.3, 0x7038f8, 0x8c6ff1)),
    ("dark", profile(0x343a40, 0.7, 0x212529, 0.2, 0x705848, 0xa29288)),
    ("steel", profile(0xdee2e6, 1.2, 0x6c757d, 0.3, 0xb8b8d0, 0xd1d1e0)),
    ("fairy", profile(0xffc8dd, 0.9, 0xffafcc, 0.4, 0xee99ac, 0xf4bdc9)),
];

impl LightingProfile {
    /// Every type tag with a dedicated profile, `normal` first.
    pub fn type_tags() -> impl Iterator<Item = &'static str> {
        TYPE_LIGHTING.iter().map(|(name, _)| *name)
    }

    /// Looks up a single tag, case-insensitively. Unknown tags map to `normal`.
    pub fn for_type(tag: &str) -> LightingProfile {
        TYPE_LIGHTING
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map(|(_, profile)| *profile)
            .unwrap_or(NORMAL)
    }

    /// Resolves the profile for an instance's tags.
    ///
    /// Without `blend`, or with a single tag, the primary tag wins. With `blend`
    /// and two tags, colors and intensities are mixed 70/30.
    pub fn for_types<S: AsRef<str>>(tags: &[S], blend: bool) -> LightingProfile {
        match tags {
            [] => NORMAL,
            [primary] => Self::for_type(primary.as_ref()),
            [primary, secondary, ..] => {
                let primary = Self::for_type(primary.as_ref());
                if !blend {
                    return primary;
                }
                primary.blend(&Self::for_type(secondary.as_ref()), PRIMARY_WEIGHT)
            }
        }
    }

    fn blend(&self, other: &LightingProfile, ratio: f32) -> LightingProfile {
        LightingProfile {
            main_light: self.main_light.blend(other.main_light, ratio),
            intensity: self.intensity * ratio + other.intensity * (1.0 - ratio),
            ambient_color: self.ambient_color.blend(other.ambient_color, ratio),
            ambient_intensity: self.ambient_intensity * ratio
                + other.ambient_intensity * (1.0 - ratio),
            background: self.background.blend(other.background, ratio),
            secondary: self.secondary.blend(other.secondary, ratio),
        }
    }
}

/// A diagonal stage background built from the instance's type tags.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundGradient {
    /// Color stops as `(color, position in percent)`.
    pub stops: Vec<(Rgb8, f32)>,
}

impl BackgroundGradient {
    /// Angle of the gradient, in degrees.
    pub const ANGLE_DEG: u32 = 135;

    /// Builds the full-strength background for `tags`.
    pub fn for_types<S: AsRef<str>>(tags: &[S]) -> Self {
        Self::build(tags, false)
    }

    /// Builds a lightened background that does not compete with the model.
    pub fn soft_for_types<S: AsRef<str>>(tags: &[S]) -> Self {
        Self::build(tags, true)
    }

    fn build<S: AsRef<str>>(tags: &[S], soft: bool) -> Self {
        match tags {
            [] => Self::two_stop(&NORMAL, soft),
            [only] => Self::two_stop(&LightingProfile::for_type(only.as_ref()), soft),
            [primary, secondary, ..] => {
                let p = LightingProfile::for_type(primary.as_ref());
                let s = LightingProfile::for_type(secondary.as_ref());
                let (bg, sec) = if soft { (0.25, 0.4) } else { (0.0, 0.0) };
                Self {
                    stops: vec![
                        (p.background.lighten(bg), 0.0),
                        (p.secondary.lighten(sec), 45.0),
                        (s.background.lighten(bg), 55.0),
                        (s.secondary.lighten(sec), 100.0),
                    ],
                }
            }
        }
    }

    fn two_stop(profile: &LightingProfile, soft: bool) -> Self {
        let (bg, sec) = if soft { (0.3, 0.4) } else { (0.0, 0.0) };
        Self {
            stops: vec![
                (profile.background.lighten(bg), 0.0),
                (profile.secondary.lighten(sec), 100.0),
            ],
        }
    }

    /// Renders the gradient as a CSS `linear-gradient(...)` value.
    pub fn to_css(&self) -> String {
        let stops = self
            .stops
            .iter()
            .map(|(color, at)| format!("{color} {at}%"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("linear-gradient({}deg, {stops})", Self::ANGLE_DEG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_short_and_long_forms() {
        assert_eq!(Rgb8::parse("#a8a878"), Some(Rgb8::new(0xa8, 0xa8, 0x78)));
        assert_eq!(Rgb8::parse("fff"), Some(Rgb8::new(255, 255, 255)));
        assert_eq!(Rgb8::parse("#12"), None);
        assert_eq!(Rgb8::parse("#zzzzzz"), None);
        assert_eq!(Rgb8::hex(0xf08030).to_string(), "#f08030");
    }

    #[test]
    fn lookup_is_case_insensitive_with_normal_fallback() {
        assert_eq!(LightingProfile::for_type("FIRE").intensity, 1.3);
        assert_eq!(LightingProfile::for_type("shadow"), NORMAL);
        let empty: [&str; 0] = [];
        assert_eq!(LightingProfile::for_types(&empty, true), NORMAL);
        assert_eq!(LightingProfile::type_tags().count(), 18);
    }

    #[test]
    fn primary_wins_unless_blending() {
        let fire = LightingProfile::for_type("fire");
        assert_eq!(LightingProfile::for_types(&["fire", "flying"], false), fire);

        let blended = LightingProfile::for_types(&["fire", "water"], true);
        // 0.7 * 1.3 + 0.3 * 0.9
        assert!((blended.intensity - 1.18).abs() < 1e-5);
        // 0xff * 0.7 + 0x90 * 0.3 = 221.7
        assert_eq!(blended.main_light.r, 222);
    }

    #[test]
    fn lighten_saturates_at_white() {
        assert_eq!(Rgb8::new(0, 0, 0).lighten(1.0), Rgb8::new(255, 255, 255));
        assert_eq!(Rgb8::new(100, 200, 255).lighten(0.5), Rgb8::new(178, 228, 255));
    }

    #[test]
    fn dual_type_background_has_four_stops() {
        let g = BackgroundGradient::for_types(&["grass", "poison"]);
        assert_eq!(g.stops.len(), 4);
        assert_eq!(g.stops[0].0, Rgb8::hex(0x78c850));
        assert_eq!(g.stops[3].0, Rgb8::hex(0xc183c1));
        assert!(g.to_css().starts_with("linear-gradient(135deg, #78c850 0%"));

        let soft = BackgroundGradient::soft_for_types(&["grass"]);
        assert_eq!(soft.stops.len(), 2);
        assert_eq!(soft.stops[0].0, Rgb8::hex(0x78c850).lighten(0.3));
    }
}
