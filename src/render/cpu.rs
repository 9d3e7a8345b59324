use kurbo::{BezPath, Cap, Circle, CubicBez, Join, ParamCurve, PathEl, Point, Shape, Stroke, StrokeOpts};

use crate::foundation::color::Rgba8;
use crate::foundation::error::{UndulaError, UndulaResult};
use crate::render::blur::{blur_premul_rgba8, gaussian_kernel_q16};
use crate::render::composite::{fill_premul, premul_over_in_place};
use crate::render::painter::{GradientStop, Painter, sample_gradient};

/// Flattening/stroking tolerance in pixels.
const PATH_TOLERANCE: f64 = 0.1;
/// Segments used to approximate a gradient stroke along a cubic.
const CUBIC_GRADIENT_SEGMENTS: usize = 24;

/// CPU painter rasterizing with `vello_cpu`.
///
/// Marks are recorded into two passes: a crisp pass and a glow pass. At
/// [`finish`](Self::finish) the glow pass is rasterized, softened with a
/// separable Gaussian blur, and composited under the crisp pass — the
/// engine's rendition of a per-mark shadow blur at a fixed cost per frame.
pub struct CpuPainter {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    glow_ctx: vello_cpu::RenderContext,
    has_glow: bool,
    kernel: Vec<u32>,
    main_pm: vello_cpu::Pixmap,
    glow_pm: vello_cpu::Pixmap,
    blur_a: Vec<u8>,
    blur_b: Vec<u8>,
}

impl CpuPainter {
    /// Create a painter for a `width x height` surface with the given glow
    /// kernel parameters.
    pub fn new(width: u32, height: u32, glow_radius_px: u32, glow_sigma: f32) -> UndulaResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| UndulaError::surface(format!("painter width exceeds u16: {width}")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| UndulaError::surface(format!("painter height exceeds u16: {height}")))?;
        if w == 0 || h == 0 {
            return Err(UndulaError::surface("painter requires non-zero dimensions"));
        }
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            glow_ctx: vello_cpu::RenderContext::new(w, h),
            has_glow: false,
            kernel: gaussian_kernel_q16(glow_radius_px, glow_sigma)?,
            main_pm: vello_cpu::Pixmap::new(w, h),
            glow_pm: vello_cpu::Pixmap::new(w, h),
            blur_a: Vec::new(),
            blur_b: Vec::new(),
        })
    }

    /// Start recording a new frame, dropping all marks from the previous one.
    pub fn begin(&mut self) {
        self.ctx.reset();
        self.glow_ctx.reset();
        self.has_glow = false;
    }

    /// Rasterize the recorded frame into `dst`: clear, blurred glow pass,
    /// crisp pass on top.
    pub fn finish(
        &mut self,
        dst: &mut vello_cpu::Pixmap,
        clear_rgba: Option<[u8; 4]>,
    ) -> UndulaResult<()> {
        if dst.width() != self.width || dst.height() != self.height {
            return Err(UndulaError::render(format!(
                "surface is {}x{} but painter is {}x{}",
                dst.width(),
                dst.height(),
                self.width,
                self.height
            )));
        }

        match clear_rgba {
            Some(c) => fill_premul(dst.data_as_u8_slice_mut(), c),
            None => dst.data_as_u8_slice_mut().fill(0),
        }

        if self.has_glow {
            let n = (self.width as usize) * (self.height as usize) * 4;
            self.glow_ctx.flush();
            self.glow_ctx.render_to_pixmap(&mut self.glow_pm);
            self.blur_a.resize(n, 0);
            self.blur_b.resize(n, 0);
            blur_premul_rgba8(
                self.glow_pm.data_as_u8_slice(),
                &mut self.blur_a,
                &mut self.blur_b,
                u32::from(self.width),
                u32::from(self.height),
                &self.kernel,
            );
            premul_over_in_place(dst.data_as_u8_slice_mut(), &self.blur_a)?;
        }

        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.main_pm);
        premul_over_in_place(dst.data_as_u8_slice_mut(), self.main_pm.data_as_u8_slice())?;
        Ok(())
    }

    fn fill_into(ctx: &mut vello_cpu::RenderContext, path: &BezPath, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn glow_into(&mut self, path: &BezPath, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.has_glow = true;
        Self::fill_into(&mut self.glow_ctx, path, color);
    }
}

impl Painter for CpuPainter {
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8, glow: Option<Rgba8>) {
        let path = circle_path(center, radius);
        Self::fill_into(&mut self.ctx, &path, color);
        if let Some(g) = glow {
            self.glow_into(&path, g);
        }
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        width: f64,
        color: Rgba8,
        glow: Option<Rgba8>,
    ) {
        let ring = stroke_to_fill(circle_path(center, radius).iter(), width);
        Self::fill_into(&mut self.ctx, &ring, color);
        if let Some(g) = glow {
            self.glow_into(&ring, g);
        }
    }

    fn stroke_line(&mut self, a: Point, b: Point, width: f64, color: Rgba8) {
        let path = stroke_to_fill(line_path(a, b).iter(), width);
        Self::fill_into(&mut self.ctx, &path, color);
    }

    fn stroke_cubic(&mut self, curve: CubicBez, width: f64, stops: &[GradientStop]) {
        // vello_cpu fills only; a gradient stroke becomes short flat-color
        // segments with round caps welding them together.
        let n = CUBIC_GRADIENT_SEGMENTS;
        let mut prev = curve.eval(0.0);
        for i in 1..=n {
            let t = i as f64 / n as f64;
            let next = curve.eval(t);
            let color = sample_gradient(stops, t - 0.5 / n as f64);
            if color.a > 0 {
                let path = stroke_to_fill(line_path(prev, next).iter(), width);
                Self::fill_into(&mut self.ctx, &path, color);
            }
            prev = next;
        }
    }

    fn stroke_polyline(
        &mut self,
        points: &[Point],
        width: f64,
        stops: &[GradientStop],
        glow: Option<Rgba8>,
    ) {
        if points.len() < 2 {
            return;
        }
        let span = (points.len() - 1) as f64;
        for (i, pair) in points.windows(2).enumerate() {
            let t = (i as f64 + 0.5) / span;
            let color = sample_gradient(stops, t);
            if color.a > 0 {
                let path = stroke_to_fill(line_path(pair[0], pair[1]).iter(), width);
                Self::fill_into(&mut self.ctx, &path, color);
            }
        }
        if let Some(g) = glow {
            let mut full = BezPath::new();
            full.move_to(points[0]);
            for &p in &points[1..] {
                full.line_to(p);
            }
            let path = stroke_to_fill(full.iter(), width);
            self.glow_into(&path, g);
        }
    }
}

fn circle_path(center: Point, radius: f64) -> BezPath {
    let mut path = BezPath::new();
    for el in Circle::new(center, radius).path_elements(PATH_TOLERANCE) {
        path.push(el);
    }
    path
}

fn line_path(a: Point, b: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(a);
    path.line_to(b);
    path
}

fn stroke_to_fill(els: impl IntoIterator<Item = PathEl>, width: f64) -> BezPath {
    let style = Stroke::new(width)
        .with_caps(Cap::Round)
        .with_join(Join::Round);
    kurbo::stroke(els, &style, &StrokeOpts::default(), PATH_TOLERANCE)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(pm: &vello_cpu::Pixmap, x: u32, y: u32) -> u8 {
        let idx = ((y * u32::from(pm.width()) + x) * 4 + 3) as usize;
        pm.data_as_u8_slice()[idx]
    }

    #[test]
    fn filled_circle_covers_center_not_corner() {
        let mut p = CpuPainter::new(32, 32, 0, 1.0).unwrap();
        let mut dst = vello_cpu::Pixmap::new(32, 32);
        p.begin();
        p.fill_circle(Point::new(16.0, 16.0), 5.0, Rgba8::WHITE, None);
        p.finish(&mut dst, None).unwrap();
        assert_eq!(alpha_at(&dst, 16, 16), 255);
        assert_eq!(alpha_at(&dst, 1, 1), 0);
    }

    #[test]
    fn clear_color_fills_background() {
        let mut p = CpuPainter::new(8, 8, 0, 1.0).unwrap();
        let mut dst = vello_cpu::Pixmap::new(8, 8);
        p.begin();
        p.finish(&mut dst, Some([5, 5, 5, 255])).unwrap();
        assert_eq!(alpha_at(&dst, 0, 0), 255);
    }

    #[test]
    fn glow_reaches_beyond_the_crisp_mark() {
        let mut crisp = CpuPainter::new(32, 32, 4, 2.0).unwrap();
        let mut dst_crisp = vello_cpu::Pixmap::new(32, 32);
        crisp.begin();
        crisp.fill_circle(Point::new(16.0, 16.0), 2.0, Rgba8::WHITE, None);
        crisp.finish(&mut dst_crisp, None).unwrap();
        assert_eq!(alpha_at(&dst_crisp, 21, 16), 0);

        let mut glowing = CpuPainter::new(32, 32, 4, 2.0).unwrap();
        let mut dst_glow = vello_cpu::Pixmap::new(32, 32);
        glowing.begin();
        glowing.fill_circle(Point::new(16.0, 16.0), 2.0, Rgba8::WHITE, Some(Rgba8::WHITE));
        glowing.finish(&mut dst_glow, None).unwrap();
        assert!(alpha_at(&dst_glow, 21, 16) > 0);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let mut p = CpuPainter::new(16, 16, 0, 1.0).unwrap();
        let mut dst = vello_cpu::Pixmap::new(8, 8);
        p.begin();
        assert!(p.finish(&mut dst, None).is_err());
    }
}
