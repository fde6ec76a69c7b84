#![forbid(unsafe_code)]

//! Color specification parsing.
//!
//! Accepted forms, all case-insensitive:
//!
//! - `#rgb`, `#rrggbb`, `#rrrgggbbb`, `#rrrrggggbbbb`: each channel's digits
//!   are the *high-order* bits of a 16-bit value, so `#fff` is `0xf0f0f0`.
//! - `rgb:r/g/b` with 1 to 4 hex digits per channel: each channel is scaled
//!   to full range, so `rgb:f/f/f` is white.
//! - A name from the built-in table (`red`, `dark slate gray`, `grey42`,
//!   ...). Spaces are ignored.

use bevelbar_render::PackedRgba;
use thiserror::Error;

/// Why a color spec was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The spec was empty or only whitespace.
    #[error("empty color specification")]
    Empty,
    /// A `#` or `rgb:` spec with bad digits or channel lengths.
    #[error("malformed numeric color '{0}'")]
    Malformed(String),
    /// Not a numeric spec and not a known name.
    #[error("unknown color name '{0}'")]
    UnknownName(String),
}

/// Parse a color spec into an opaque color.
pub fn parse_color(spec: &str) -> Result<PackedRgba, ColorParseError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(ColorParseError::Empty);
    }

    if let Some(hex) = spec.strip_prefix('#') {
        return parse_sharp(hex).ok_or_else(|| ColorParseError::Malformed(spec.to_owned()));
    }

    if let Some(body) = spec
        .get(..4)
        .filter(|prefix| prefix.eq_ignore_ascii_case("rgb:"))
        .and_then(|_| spec.get(4..))
    {
        return parse_rgb_device(body).ok_or_else(|| ColorParseError::Malformed(spec.to_owned()));
    }

    lookup_name(spec).ok_or_else(|| ColorParseError::UnknownName(spec.to_owned()))
}

fn hex_value(digits: &str) -> Option<u16> {
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

fn parse_sharp(hex: &str) -> Option<PackedRgba> {
    if hex.is_empty() || hex.len() % 3 != 0 || hex.len() > 12 {
        return None;
    }
    let n = hex.len() / 3;
    let shift = 16 - 4 * n as u32;
    let channel = |i: usize| -> Option<u8> {
        let v = hex_value(hex.get(i * n..(i + 1) * n)?)?;
        Some(((u32::from(v) << shift) >> 8) as u8)
    };
    Some(PackedRgba::rgb(channel(0)?, channel(1)?, channel(2)?))
}

fn parse_rgb_device(body: &str) -> Option<PackedRgba> {
    let mut parts = body.split('/');
    let mut channel = || -> Option<u8> {
        let digits = parts.next()?;
        let v = u32::from(hex_value(digits)?);
        let max = (1u32 << (4 * digits.len() as u32)) - 1;
        Some(((v * 255 + max / 2) / max) as u8)
    };
    let (r, g, b) = (channel()?, channel()?, channel()?);
    if parts.next().is_some() {
        return None;
    }
    Some(PackedRgba::rgb(r, g, b))
}

/// Common X11 color names, lowercase with spaces removed.
const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("aliceblue", (240, 248, 255)),
    ("antiquewhite", (250, 235, 215)),
    ("aquamarine", (127, 255, 212)),
    ("azure", (240, 255, 255)),
    ("beige", (245, 245, 220)),
    ("black", (0, 0, 0)),
    ("blue", (0, 0, 255)),
    ("blueviolet", (138, 43, 226)),
    ("brown", (165, 42, 42)),
    ("burlywood", (222, 184, 135)),
    ("cadetblue", (95, 158, 160)),
    ("chartreuse", (127, 255, 0)),
    ("chocolate", (210, 105, 30)),
    ("coral", (255, 127, 80)),
    ("cornflowerblue", (100, 149, 237)),
    ("cornsilk", (255, 248, 220)),
    ("cyan", (0, 255, 255)),
    ("darkblue", (0, 0, 139)),
    ("darkcyan", (0, 139, 139)),
    ("darkgoldenrod", (184, 134, 11)),
    ("darkgray", (169, 169, 169)),
    ("darkgreen", (0, 100, 0)),
    ("darkgrey", (169, 169, 169)),
    ("darkkhaki", (189, 183, 107)),
    ("darkmagenta", (139, 0, 139)),
    ("darkolivegreen", (85, 107, 47)),
    ("darkorange", (255, 140, 0)),
    ("darkorchid", (153, 50, 204)),
    ("darkred", (139, 0, 0)),
    ("darksalmon", (233, 150, 122)),
    ("darkseagreen", (143, 188, 143)),
    ("darkslateblue", (72, 61, 139)),
    ("darkslategray", (47, 79, 79)),
    ("darkslategrey", (47, 79, 79)),
    ("darkturquoise", (0, 206, 209)),
    ("darkviolet", (148, 0, 211)),
    ("deeppink", (255, 20, 147)),
    ("deepskyblue", (0, 191, 255)),
    ("dimgray", (105, 105, 105)),
    ("dimgrey", (105, 105, 105)),
    ("dodgerblue", (30, 144, 255)),
    ("firebrick", (178, 34, 34)),
    ("forestgreen", (34, 139, 34)),
    ("gainsboro", (220, 220, 220)),
    ("gold", (255, 215, 0)),
    ("goldenrod", (218, 165, 32)),
    ("gray", (190, 190, 190)),
    ("green", (0, 255, 0)),
    ("greenyellow", (173, 255, 47)),
    ("grey", (190, 190, 190)),
    ("honeydew", (240, 255, 240)),
    ("hotpink", (255, 105, 180)),
    ("indianred", (205, 92, 92)),
    ("ivory", (255, 255, 240)),
    ("khaki", (240, 230, 140)),
    ("lavender", (230, 230, 250)),
    ("lawngreen", (124, 252, 0)),
    ("lightblue", (173, 216, 230)),
    ("lightcoral", (240, 128, 128)),
    ("lightcyan", (224, 255, 255)),
    ("lightgray", (211, 211, 211)),
    ("lightgreen", (144, 238, 144)),
    ("lightgrey", (211, 211, 211)),
    ("lightpink", (255, 182, 193)),
    ("lightsalmon", (255, 160, 122)),
    ("lightseagreen", (32, 178, 170)),
    ("lightskyblue", (135, 206, 250)),
    ("lightslategray", (119, 136, 153)),
    ("lightslategrey", (119, 136, 153)),
    ("lightsteelblue", (176, 196, 222)),
    ("lightyellow", (255, 255, 224)),
    ("limegreen", (50, 205, 50)),
    ("linen", (250, 240, 230)),
    ("magenta", (255, 0, 255)),
    ("maroon", (176, 48, 96)),
    ("midnightblue", (25, 25, 112)),
    ("mintcream", (245, 255, 250)),
    ("navajowhite", (255, 222, 173)),
    ("navy", (0, 0, 128)),
    ("navyblue", (0, 0, 128)),
    ("olivedrab", (107, 142, 35)),
    ("orange", (255, 165, 0)),
    ("orangered", (255, 69, 0)),
    ("orchid", (218, 112, 214)),
    ("palegreen", (152, 251, 152)),
    ("paleturquoise", (175, 238, 238)),
    ("peachpuff", (255, 218, 185)),
    ("peru", (205, 133, 63)),
    ("pink", (255, 192, 203)),
    ("plum", (221, 160, 221)),
    ("powderblue", (176, 224, 230)),
    ("purple", (160, 32, 240)),
    ("red", (255, 0, 0)),
    ("rosybrown", (188, 143, 143)),
    ("royalblue", (65, 105, 225)),
    ("saddlebrown", (139, 69, 19)),
    ("salmon", (250, 128, 114)),
    ("sandybrown", (244, 164, 96)),
    ("seagreen", (46, 139, 87)),
    ("sienna", (160, 82, 45)),
    ("skyblue", (135, 206, 235)),
    ("slateblue", (106, 90, 205)),
    ("slategray", (112, 128, 144)),
    ("slategrey", (112, 128, 144)),
    ("snow", (255, 250, 250)),
    ("springgreen", (0, 255, 127)),
    ("steelblue", (70, 130, 180)),
    ("tan", (210, 180, 140)),
    ("thistle", (216, 191, 216)),
    ("tomato", (255, 99, 71)),
    ("turquoise", (64, 224, 208)),
    ("violet", (238, 130, 238)),
    ("wheat", (245, 222, 179)),
    ("white", (255, 255, 255)),
    ("whitesmoke", (245, 245, 245)),
    ("yellow", (255, 255, 0)),
    ("yellowgreen", (154, 205, 50)),
];

fn lookup_name(name: &str) -> Option<PackedRgba> {
    let key: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if let Some(level) = key
        .strip_prefix("gray")
        .or_else(|| key.strip_prefix("grey"))
        .filter(|rest| !rest.is_empty())
    {
        return gray_level(level);
    }

    NAMED
        .binary_search_by(|(n, _)| n.cmp(&key.as_str()))
        .ok()
        .map(|i| {
            let (r, g, b) = NAMED[i].1;
            PackedRgba::rgb(r, g, b)
        })
}

/// `grayN` for N in 0..=100, rounded the way the X color database is.
fn gray_level(level: &str) -> Option<PackedRgba> {
    if !level.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u32 = level.parse().ok().filter(|n| *n <= 100)?;
    let v = (f64::from(n) * 2.55 + 0.5) as u8;
    Some(PackedRgba::rgb(v, v, v))
}
