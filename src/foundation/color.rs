/// Straight (non-premultiplied) RGBA8 color.
///
/// Scene models speak straight alpha; premultiplication happens inside the
/// rasterizing painter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Straight alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Build a color from channel values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale the alpha channel by `alpha` in `[0, 1]`; color channels are
    /// untouched. Out-of-range factors clamp.
    pub fn scale_alpha(self, alpha: f64) -> Self {
        let a = (f64::from(self.a) * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

/// HSL color; hue in degrees (any value, wrapped), saturation and lightness
/// in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hsl {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation.
    pub s: f64,
    /// Lightness.
    pub l: f64,
}

impl Hsl {
    /// Build an HSL color.
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Convert to straight RGBA8 with the given alpha in `[0, 1]`.
    pub fn to_rgba8(self, alpha: f64) -> Rgba8 {
        let h = self.h.rem_euclid(360.0);
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = l - c / 2.0;

        let (r1, g1, b1) = match h {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba8::new(
            to_u8(r1),
            to_u8(g1),
            to_u8(b1),
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primary_anchors() {
        assert_eq!(Hsl::new(0.0, 1.0, 0.5).to_rgba8(1.0), Rgba8::new(255, 0, 0, 255));
        assert_eq!(Hsl::new(120.0, 1.0, 0.5).to_rgba8(1.0), Rgba8::new(0, 255, 0, 255));
        assert_eq!(Hsl::new(240.0, 1.0, 0.5).to_rgba8(1.0), Rgba8::new(0, 0, 255, 255));
        assert_eq!(Hsl::new(180.0, 1.0, 0.5).to_rgba8(1.0), Rgba8::new(0, 255, 255, 255));
    }

    #[test]
    fn hsl_extremes_are_white_and_black() {
        assert_eq!(Hsl::new(42.0, 0.7, 1.0).to_rgba8(1.0), Rgba8::new(255, 255, 255, 255));
        assert_eq!(Hsl::new(42.0, 0.7, 0.0).to_rgba8(1.0), Rgba8::new(0, 0, 0, 255));
    }

    #[test]
    fn hue_wraps_in_both_directions() {
        let a = Hsl::new(-90.0, 1.0, 0.5).to_rgba8(1.0);
        let b = Hsl::new(270.0, 1.0, 0.5).to_rgba8(1.0);
        assert_eq!(a, b);
        let a = Hsl::new(540.0, 1.0, 0.5).to_rgba8(1.0);
        let b = Hsl::new(180.0, 1.0, 0.5).to_rgba8(1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn scale_alpha_clamps() {
        let c = Rgba8::new(10, 20, 30, 200);
        assert_eq!(c.scale_alpha(0.5).a, 100);
        assert_eq!(c.scale_alpha(2.0).a, 200);
        assert_eq!(c.scale_alpha(-1.0).a, 0);
    }
}
