//! Packed 8-bit ARGB colors, and conversions to normalized floats and HSV.
//!
//! Everything here is pure and infallible. Out-of-range float inputs are clamped rather than rejected.

/// A packed `0xAARRGGBB` color, as stored by the host palette.
///
/// `repr(transparent)` over a `u32`, so a host's `&[u32]` can be viewed as `&[Argb]` through
/// [`bytemuck::cast_slice`] with no copy.
#[repr(transparent)]
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Argb(pub u32);

impl std::fmt::Debug for Argb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Argb({:#010X})", self.0)
    }
}

/// Separate 8-bit RGB channels, with no alpha.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
impl Rgb8 {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Argb {
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self(0xFF00_0000);
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    #[must_use]
    pub const fn from_channels(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }
    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
    #[must_use]
    pub const fn rgb(self) -> Rgb8 {
        Rgb8 {
            r: (self.0 >> 16) as u8,
            g: (self.0 >> 8) as u8,
            b: self.0 as u8,
        }
    }
    /// Replace the color channels, keeping this color's alpha.
    #[must_use]
    pub const fn with_rgb(self, rgb: Rgb8) -> Self {
        Self::from_channels(self.alpha(), rgb.r, rgb.g, rgb.b)
    }
    /// Normalized `[r, g, b, a]`.
    #[must_use]
    pub fn to_float4(self) -> [f32; 4] {
        argb_to_float4(self)
    }
    #[must_use]
    pub fn from_float4(rgba: [f32; 4]) -> Self {
        float4_to_argb(rgba)
    }
    #[must_use]
    pub fn to_hsv(self) -> Hsv {
        let [r, g, b, _] = self.to_float4();
        rgb_to_hsv(r, g, b)
    }
    /// Build a color from HSV, taking alpha from `self`.
    #[must_use]
    pub fn from_hsv_keep_alpha(self, hsv: Hsv) -> Self {
        let (r, g, b) = hsv_to_rgb(hsv.h, hsv.s, hsv.v);
        let a = f32::from(self.alpha()) / 255.0;
        float4_to_argb([r, g, b, a])
    }
    /// `AARRGGBB`, upper case, no prefix.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:08X}", self.0)
    }
}

#[must_use]
pub fn argb_to_float4(color: Argb) -> [f32; 4] {
    let Rgb8 { r, g, b } = color.rgb();
    [r, g, b, color.alpha()].map(|c| f32::from(c) / 255.0)
}

/// Pack normalized channels, clamping each to `[0, 1]` and rounding to the nearest byte.
///
/// Rounding makes this the exact inverse of [`argb_to_float4`] for every byte pattern.
#[must_use]
pub fn float4_to_argb(rgba: [f32; 4]) -> Argb {
    let [r, g, b, a] = rgba.map(unit_to_byte);
    Argb::from_channels(a, r, g, b)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_byte(value: f32) -> u8 {
    // NaN falls through `clamp` untouched, and `as` saturates it to zero.
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert normalized RGB to HSV.
///
/// Grays (including black) report a hue of zero, and black reports zero saturation.
#[must_use]
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };

    let h = if delta <= 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    Hsv {
        h: normalize_degrees(h),
        s,
        v,
    }
}

/// Convert HSV back to normalized RGB. Hue wraps, so 360 and -360 behave as 0.
#[must_use]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    if s <= 0.0 {
        return (v, v, v);
    }

    let h = normalize_degrees(h) / 60.0;
    let sector = h.floor();
    let fract = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * fract);
    let t = v * (1.0 - s * (1.0 - fract));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Wrap any angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly the modulus for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Parse editor hex text against the color being edited.
///
/// Six digits are `RRGGBB` and keep `current`'s alpha, eight digits are `AARRGGBB`.
/// Surrounding whitespace and a single leading `#` are tolerated. Anything else is `None`.
#[must_use]
pub fn parse_hex(text: &str, current: Argb) -> Option<Argb> {
    let text = text.trim();
    let digits = text.strip_prefix('#').unwrap_or(text);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        // Also rejects the `+` that from_str_radix would allow.
        return None;
    }
    match digits.len() {
        6 => {
            let rgb = u32::from_str_radix(digits, 16).ok()?;
            Some(Argb(u32::from(current.alpha()) << 24 | rgb))
        }
        8 => u32::from_str_radix(digits, 16).ok().map(Argb),
        _ => None,
    }
}

/// `#RRGGBB`, as shown next to the picker preview swatch.
#[must_use]
pub fn hex_rgb_label(rgb: Rgb8) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.r, rgb.g, rgb.b)
}
