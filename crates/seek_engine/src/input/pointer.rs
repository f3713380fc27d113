//! Pointer state for picking operations
//!
//! Converts pixel coordinates delivered by the windowing layer into
//! Normalized Device Coordinates (NDC) for ray casting.

/// A single pointer click in viewport pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// X position in pixels from the left edge
    pub x: f32,
    /// Y position in pixels from the top edge
    pub y: f32,
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
}

impl PointerEvent {
    /// Create a pointer event from pixel position and viewport size
    pub fn new(x: f32, y: f32, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            x,
            y,
            viewport_width,
            viewport_height,
        }
    }

    /// Convert the pixel position to Normalized Device Coordinates
    ///
    /// NDC range: [-1, 1] where:
    /// - X: -1 = left, +1 = right
    /// - Y: -1 = bottom, +1 = top (pixel rows grow downwards, so Y is flipped)
    ///
    /// Returns `None` for an empty or non-finite viewport.
    pub fn to_ndc(&self) -> Option<(f32, f32)> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.viewport_width) || !valid(self.viewport_height) {
            return None;
        }

        let ndc_x = (self.x / self.viewport_width) * 2.0 - 1.0;
        let ndc_y = -(self.y / self.viewport_height) * 2.0 + 1.0;
        Some((ndc_x, ndc_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_ndc_center() {
        let (ndc_x, ndc_y) = PointerEvent::new(960.0, 540.0, 1920.0, 1080.0).to_ndc().unwrap();
        assert!((ndc_x - 0.0).abs() < 0.001);
        assert!((ndc_y - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_screen_to_ndc_corners() {
        let (ndc_x, ndc_y) = PointerEvent::new(0.0, 0.0, 1920.0, 1080.0).to_ndc().unwrap();
        assert!((ndc_x - (-1.0)).abs() < 0.001); // Left edge
        assert!((ndc_y - 1.0).abs() < 0.001); // Top edge

        let (ndc_x, ndc_y) = PointerEvent::new(1920.0, 1080.0, 1920.0, 1080.0).to_ndc().unwrap();
        assert!((ndc_x - 1.0).abs() < 0.001); // Right edge
        assert!((ndc_y - (-1.0)).abs() < 0.001); // Bottom edge
    }

    #[test]
    fn test_empty_viewport() {
        assert!(PointerEvent::new(10.0, 10.0, 0.0, 720.0).to_ndc().is_none());
        assert!(PointerEvent::new(10.0, 10.0, 1280.0, f32::NAN).to_ndc().is_none());
    }
}
