use serde::{Deserialize, Serialize};

/// Color representation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<Color> for String {
    fn from(val: Color) -> Self {
        val.to_hex()
    }
}

impl Color {
    /// White color: `#FFFFFFFF`
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// Black color: `#000000FF`
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Gray color: `#AAAAAAFF`
    pub const GRAY: Color = Color::rgba(170, 170, 170, 255);

    /// Constructs color from its RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Converts the color into an f32 array with channels in `[0, 1]`.
    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Converts the color into HEX8 string: `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Parses a color from the hex string. Hex string can be either HEX6 (`#RRGGBB`) or HEX8 (`#RRGGBBAA`).
    pub fn try_from_hex(hex_string: &str) -> Option<Self> {
        let digits = hex_string.strip_prefix('#')?;
        if (digits.len() != 6 && digits.len() != 8) || !digits.is_ascii() {
            return None;
        }

        let channel = |index: usize| u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16).ok();
        let a = if digits.len() == 8 { channel(3)? } else { 255 };

        Some(Self::rgba(channel(0)?, channel(1)?, channel(2)?, a))
    }

    /// Linear interpolation between two colors channel by channel.
    pub fn lerp(&self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Red component of the color in RGBA space.
    pub fn r(&self) -> u8 {
        self.r
    }

    /// Green component of the color in RGBA space.
    pub fn g(&self) -> u8 {
        self.g
    }

    /// Blue component of the color in RGBA space.
    pub fn b(&self) -> u8 {
        self.b
    }

    /// Opacity component of the color.
    pub fn a(&self) -> u8 {
        self.a
    }
}

/// One color of a [`ColorGradient`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position of the stop in `[0, 1]`.
    pub position: f64,
    /// Color at the position.
    pub color: Color,
}

/// Piecewise linear color gradient over `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<GradientStop>", into = "Vec<GradientStop>")]
pub struct ColorGradient {
    stops: Vec<GradientStop>,
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self::solid(Color::GRAY)
    }
}

impl From<Vec<GradientStop>> for ColorGradient {
    fn from(value: Vec<GradientStop>) -> Self {
        Self::new(value)
    }
}

impl From<ColorGradient> for Vec<GradientStop> {
    fn from(value: ColorGradient) -> Self {
        value.stops
    }
}

impl ColorGradient {
    /// Creates a gradient from its stops. Stops are sorted by position, stops with non-finite positions are dropped.
    pub fn new(mut stops: Vec<GradientStop>) -> Self {
        stops.retain(|stop| stop.position.is_finite());
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { stops }
    }

    /// Gradient with a single color.
    pub fn solid(color: Color) -> Self {
        Self {
            stops: vec![GradientStop {
                position: 0.0,
                color,
            }],
        }
    }

    /// Stops of the gradient, sorted by position.
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at position `t`. Positions outside of the stops range take the color of the nearest stop.
    pub fn evaluate(&self, t: f64) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::GRAY;
        };

        if t.is_nan() || t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            if t <= to.position {
                let span = to.position - from.position;
                if span <= 0.0 {
                    return to.color;
                }
                return from.color.lerp(to.color, (t - from.position) / span);
            }
        }

        last.color
    }
}
