use kurbo::{CubicBez, Point};

use crate::foundation::color::Rgba8;

/// A color stop along a stroked gradient, `t` in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the stroke.
    pub t: f64,
    /// Color at this position.
    pub color: Rgba8,
}

impl GradientStop {
    /// Build a stop.
    pub const fn new(t: f64, color: Rgba8) -> Self {
        Self { t, color }
    }
}

/// Sample a stop list (sorted by `t`) at position `t`, interpolating channels
/// linearly between neighbors and clamping at the ends.
pub(crate) fn sample_gradient(stops: &[GradientStop], t: f64) -> Rgba8 {
    let Some(first) = stops.first() else {
        return Rgba8::TRANSPARENT;
    };
    if t <= first.t {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.t {
            let span = b.t - a.t;
            let u = if span <= f64::EPSILON {
                1.0
            } else {
                (t - a.t) / span
            };
            let ch = |x: u8, y: u8| -> u8 {
                (f64::from(x) + (f64::from(y) - f64::from(x)) * u).round() as u8
            };
            return Rgba8::new(
                ch(a.color.r, b.color.r),
                ch(a.color.g, b.color.g),
                ch(a.color.b, b.color.b),
                ch(a.color.a, b.color.a),
            );
        }
    }
    stops[stops.len() - 1].color
}

/// Drawing primitives consumed by scene models.
///
/// Implementations own how marks become pixels; scenes never touch a buffer.
/// Colors are straight-alpha. A `glow` color asks the painter to add a soft
/// halo of that color around the mark, however it chooses to realize it.
pub trait Painter {
    /// Fill a circle, optionally glowing.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8, glow: Option<Rgba8>);

    /// Stroke a circle outline, optionally glowing.
    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        width: f64,
        color: Rgba8,
        glow: Option<Rgba8>,
    );

    /// Stroke a straight segment in a flat color.
    fn stroke_line(&mut self, a: Point, b: Point, width: f64, color: Rgba8);

    /// Stroke a cubic curve with a gradient from `t = 0` to `t = 1`.
    fn stroke_cubic(&mut self, curve: CubicBez, width: f64, stops: &[GradientStop]);

    /// Stroke a polyline with a gradient over its index range, optionally
    /// glowing.
    fn stroke_polyline(
        &mut self,
        points: &[Point],
        width: f64,
        stops: &[GradientStop],
        glow: Option<Rgba8>,
    );
}
