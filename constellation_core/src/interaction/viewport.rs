//! Canvas projection - from authored layout space to screen pixels.

use story_atlas::Position;

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

/// Projects layout coordinates onto a canvas: centered, uniformly scaled.
///
/// The scale steps down on narrow viewports so the constellation keeps
/// fitting; [`resize`] re-derives it from the breakpoints.
///
/// [`resize`]: Viewport::resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    scale: f32,
}

impl Viewport {
    /// Below this width the graph renders unscaled.
    pub const MEDIUM_BREAKPOINT: f32 = 768.0;

    /// Below this width the graph renders slightly reduced.
    pub const WIDE_BREAKPOINT: f32 = 1280.0;

    const NARROW_SCALE: f32 = 1.0;
    const MEDIUM_SCALE: f32 = 1.25;
    const WIDE_SCALE: f32 = 1.5;

    /// Viewport with the scale chosen from the width breakpoints.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scale: Self::scale_for(width),
        }
    }

    /// Viewport with an explicit scale, for hosts that manage zoom
    /// themselves.
    pub fn with_scale(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }

    fn scale_for(width: f32) -> f32 {
        if width < Self::MEDIUM_BREAKPOINT {
            Self::NARROW_SCALE
        } else if width < Self::WIDE_BREAKPOINT {
            Self::MEDIUM_SCALE
        } else {
            Self::WIDE_SCALE
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.scale = Self::scale_for(width);
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Project a layout-space position to canvas pixels.
    pub fn project(&self, position: Position) -> CanvasPoint {
        CanvasPoint {
            x: self.width / 2.0 + position.x * self.scale,
            y: self.height / 2.0 + position.y * self.scale,
        }
    }
}
