use std::str::FromStr;

use super::constants::BPM_DEFAULT;

/// 8-bit RGB with a float alpha, the form the canvas understands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Scale the current alpha, saturating into [0, 1].
    #[inline]
    pub fn fade(self, k: f32) -> Self {
        self.with_alpha(self.a * k)
    }

    pub fn to_css(self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Convert HSL (hue in degrees, saturation and lightness in percent) to RGB.
pub fn hsl_to_rgb(hue_deg: f32, sat_pct: f32, light_pct: f32) -> [u8; 3] {
    let h = hue_deg.rem_euclid(360.0) / 60.0;
    let s = (sat_pct / 100.0).clamp(0.0, 1.0);
    let l = (light_pct / 100.0).clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c * 0.5;
    let to8 = |v: f32| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u8;
    [to8(r1), to8(g1), to8(b1)]
}

/// Base palette parameters. Swapped wholesale on theme change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            hue: 200.0,
            saturation: 80.0,
            lightness: 55.0,
        }
    }
}

// Degrees of hue rotation per semitone of pitch class
const HUE_PER_PITCH_CLASS: f32 = 30.0;
const HUE_PER_BPM: f32 = 0.25;
const LIGHTNESS_PER_VELOCITY: f32 = 12.0;

impl Theme {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            saturation: saturation.clamp(0.0, 100.0),
            lightness: lightness.clamp(0.0, 100.0),
        }
    }

    /// Color of a note bar or burst for the given pitch, velocity and tempo.
    pub fn note_color(&self, note: i32, velocity: f32, bpm: f32) -> Rgba {
        let pitch_class = note.rem_euclid(12) as f32;
        let hue = self.hue + pitch_class * HUE_PER_PITCH_CLASS + (bpm - BPM_DEFAULT) * HUE_PER_BPM;
        let light =
            (self.lightness + velocity.clamp(0.0, 1.0) * LIGHTNESS_PER_VELOCITY).clamp(0.0, 95.0);
        let [r, g, b] = hsl_to_rgb(hue, self.saturation, light);
        Rgba::new(r, g, b, 1.0)
    }

    /// Near-black background tinted toward the base hue.
    pub fn background(&self) -> Rgba {
        let [r, g, b] = hsl_to_rgb(self.hue, self.saturation * 0.35, 4.0);
        Rgba::new(r, g, b, 1.0)
    }

    /// Guide and floor line color.
    pub fn guide(&self) -> Rgba {
        let [r, g, b] = hsl_to_rgb(self.hue, self.saturation * 0.5, 80.0);
        Rgba::new(r, g, b, 1.0)
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aurora" | "default" => Ok(Theme::default()),
            "ember" => Ok(Theme::new(18.0, 90.0, 52.0)),
            "neon" => Ok(Theme::new(300.0, 100.0, 58.0)),
            "mono" => Ok(Theme::new(210.0, 0.0, 70.0)),
            other => Err(anyhow::anyhow!("unknown theme '{}'", other)),
        }
    }
}
