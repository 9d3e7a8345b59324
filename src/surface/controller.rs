use crate::foundation::core::{Bounds, FrameRgba8};
use crate::foundation::error::UndulaResult;

/// What a resize notification did to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Width changed: the backing store was reprovisioned and any geometry
    /// computed in absolute pixel coordinates must be rebuilt.
    Reinitialized,
    /// Height-only jitter (window chrome, mobile URL bar): deliberately
    /// ignored so the simulation does not restart.
    Ignored,
    /// Bounds identical to the current ones.
    Unchanged,
}

/// Owner of the backing pixel surface.
///
/// The surface is always reprovisioned on a real resize, never rescaled:
/// stretching old pixel content is exactly the artifact this exists to avoid.
#[derive(Debug, Default)]
pub struct SurfaceController {
    bounds: Bounds,
    pixmap: Option<vello_cpu::Pixmap>,
}

impl SurfaceController {
    /// Create a detached controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a container and allocate a backing store for its bounds.
    ///
    /// Zero-area bounds are not an error: the controller stays pending and
    /// frames no-op until a drawable resize arrives.
    pub fn attach(&mut self, bounds: Bounds) -> UndulaResult<()> {
        self.bounds = bounds;
        self.pixmap = if bounds.is_drawable() {
            let pixmap = Self::provision(bounds)?;
            tracing::debug!(width = bounds.width, height = bounds.height, "surface attached");
            Some(pixmap)
        } else {
            tracing::warn!(
                width = bounds.width,
                height = bounds.height,
                "attach with zero-area bounds, surface deferred"
            );
            None
        };
        Ok(())
    }

    /// Apply an observed bounds change.
    pub fn observe(&mut self, bounds: Bounds) -> UndulaResult<ResizeOutcome> {
        if bounds == self.bounds {
            return Ok(ResizeOutcome::Unchanged);
        }
        if bounds.width == self.bounds.width {
            tracing::debug!(
                old_height = self.bounds.height,
                new_height = bounds.height,
                "ignoring height-only resize"
            );
            return Ok(ResizeOutcome::Ignored);
        }
        tracing::debug!(
            width = bounds.width,
            height = bounds.height,
            "reprovisioning surface"
        );
        self.bounds = bounds;
        self.pixmap = if bounds.is_drawable() {
            Some(Self::provision(bounds)?)
        } else {
            None
        };
        Ok(ResizeOutcome::Reinitialized)
    }

    /// Release the surface. Idempotent.
    pub fn detach(&mut self) {
        self.pixmap = None;
    }

    /// Currently observed bounds.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Whether a drawable backing store exists.
    pub fn has_surface(&self) -> bool {
        self.pixmap.is_some()
    }

    /// Mutable access to the backing store for the resolve step.
    pub(crate) fn pixmap_mut(&mut self) -> Option<&mut vello_cpu::Pixmap> {
        self.pixmap.as_mut()
    }

    /// Copy the current surface contents out.
    pub fn frame_rgba8(&self) -> Option<FrameRgba8> {
        let pm = self.pixmap.as_ref()?;
        Some(FrameRgba8 {
            width: u32::from(pm.width()),
            height: u32::from(pm.height()),
            data: pm.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn provision(bounds: Bounds) -> UndulaResult<vello_cpu::Pixmap> {
        let (w, h) = bounds.checked_u16()?;
        Ok(vello_cpu::Pixmap::new(w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_provisions_surface_matching_bounds() {
        let mut c = SurfaceController::new();
        c.attach(Bounds::new(320, 200)).unwrap();
        assert!(c.has_surface());
        let f = c.frame_rgba8().unwrap();
        assert_eq!((f.width, f.height), (320, 200));
        assert_eq!(f.data.len(), 320 * 200 * 4);
    }

    #[test]
    fn zero_area_attach_defers_surface() {
        let mut c = SurfaceController::new();
        c.attach(Bounds::new(0, 600)).unwrap();
        assert!(!c.has_surface());
        assert!(c.frame_rgba8().is_none());
    }

    #[test]
    fn width_change_reprovisions() {
        let mut c = SurfaceController::new();
        c.attach(Bounds::new(800, 600)).unwrap();
        let out = c.observe(Bounds::new(1600, 600)).unwrap();
        assert_eq!(out, ResizeOutcome::Reinitialized);
        let f = c.frame_rgba8().unwrap();
        assert_eq!((f.width, f.height), (1600, 600));
    }

    #[test]
    fn height_only_change_is_ignored() {
        let mut c = SurfaceController::new();
        c.attach(Bounds::new(800, 600)).unwrap();
        let out = c.observe(Bounds::new(800, 650)).unwrap();
        assert_eq!(out, ResizeOutcome::Ignored);
        // The backing store keeps its original dimensions.
        let f = c.frame_rgba8().unwrap();
        assert_eq!((f.width, f.height), (800, 600));
        assert_eq!(c.bounds(), Bounds::new(800, 600));
    }

    #[test]
    fn identical_bounds_are_unchanged() {
        let mut c = SurfaceController::new();
        c.attach(Bounds::new(800, 600)).unwrap();
        assert_eq!(c.observe(Bounds::new(800, 600)).unwrap(), ResizeOutcome::Unchanged);
    }

    #[test]
    fn detach_is_idempotent() {
        let mut c = SurfaceController::new();
        c.attach(Bounds::new(64, 64)).unwrap();
        c.detach();
        c.detach();
        assert!(!c.has_surface());
    }
}
